//! FFT analysis thread and the byte-spectrum conversion it runs.

use rustfft::{num_complex::Complex, Fft, FftPlanner};
use std::f32::consts::PI;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Sender;
use std::sync::{Arc, Mutex, PoisonError};
use std::thread;
use std::time::Duration;

use super::spectrum::SpectrumFrame;
use super::AudioEvent;
use crate::params::AnalyserConfig;

/// Turns blocks of time-domain samples into 8-bit magnitude spectra.
///
/// Mirrors a browser `AnalyserNode`: windowed FFT, per-bin exponential
/// smoothing across calls, then decibels mapped linearly onto `0..=255`.
pub struct SpectrumProcessor {
    config: AnalyserConfig,
    fft: Arc<dyn Fft<f32>>,
    window: Vec<f32>,
    buffer: Vec<Complex<f32>>,
    smoothed: Vec<f32>,
}

impl SpectrumProcessor {
    pub fn new(config: AnalyserConfig) -> Self {
        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(config.fft_size);
        let window = (0..config.fft_size)
            .map(|i| hann_window(i, config.fft_size))
            .collect();

        Self {
            fft,
            window,
            buffer: vec![Complex::new(0.0, 0.0); config.fft_size],
            smoothed: vec![0.0; config.bin_count()],
            config,
        }
    }

    /// Analyse the most recent `fft_size` samples.
    ///
    /// Shorter input is treated as preceded by silence. Returns
    /// `fft_size / 2` byte magnitudes.
    pub fn process(&mut self, samples: &[f32]) -> Vec<u8> {
        let size = self.config.fft_size;
        let recent = &samples[samples.len().saturating_sub(size)..];
        let pad = size - recent.len();

        for (i, slot) in self.buffer.iter_mut().enumerate() {
            let sample = if i < pad { 0.0 } else { recent[i - pad] };
            *slot = Complex::new(sample * self.window[i], 0.0);
        }
        self.fft.process(&mut self.buffer);

        let tau = self.config.smoothing;
        let min_db = self.config.min_db;
        let db_span = self.config.max_db - self.config.min_db;
        let scale = size as f32;

        self.smoothed
            .iter_mut()
            .zip(&self.buffer)
            .map(|(smoothed, bin)| {
                *smoothed = tau * *smoothed + (1.0 - tau) * bin.norm() / scale;
                let db = 20.0 * smoothed.log10();
                // -inf for silent bins clamps to 0
                (255.0 * (db - min_db) / db_span)
                    .floor()
                    .clamp(0.0, 255.0) as u8
            })
            .collect()
    }
}

/// Spawn FFT analysis thread
///
/// Every `update_interval_ms` the thread analyses the newest samples and
/// sends a [`SpectrumFrame`]. It exits when `shutdown` is set or the
/// receiving side hangs up.
pub fn spawn_fft_thread(
    config: AnalyserConfig,
    sample_rate: f32,
    sample_buffer: Arc<Mutex<Vec<f32>>>,
    events: Sender<AudioEvent>,
    shutdown: Arc<AtomicBool>,
) -> std::io::Result<thread::JoinHandle<()>> {
    thread::Builder::new()
        .name("fft-analysis".into())
        .spawn(move || {
            let interval = Duration::from_millis(config.update_interval_ms);
            let fft_size = config.fft_size;
            let mut processor = SpectrumProcessor::new(config);
            let mut block = Vec::with_capacity(fft_size);

            while !shutdown.load(Ordering::Relaxed) {
                thread::sleep(interval);

                {
                    let mut samples = sample_buffer
                        .lock()
                        .unwrap_or_else(PoisonError::into_inner);
                    if samples.len() < fft_size {
                        continue;
                    }
                    // Keep only the newest window so the buffer stays bounded
                    let excess = samples.len() - fft_size;
                    samples.drain(..excess);
                    block.clear();
                    block.extend_from_slice(&samples);
                }

                let frame = SpectrumFrame {
                    bins: processor.process(&block),
                    sample_rate,
                };
                if events.send(AudioEvent::Spectrum(frame)).is_err() {
                    break;
                }
            }
            log::debug!("FFT analysis thread stopped");
        })
}

/// Hann window function for FFT analysis
pub fn hann_window(index: usize, size: usize) -> f32 {
    0.5 * (1.0 - ((2.0 * PI * index as f32) / (size as f32 - 1.0)).cos())
}
