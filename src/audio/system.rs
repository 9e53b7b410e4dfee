//! Audio system managing microphone capture and FFT analysis.

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread;

use super::fft::spawn_fft_thread;
use super::spectrum::SpectrumFrame;
use super::AudioEvent;
use crate::error::AudioError;
use crate::params::AnalyserConfig;

/// Live microphone input feeding byte spectra to the frame loop
pub struct AudioSystem {
    /// Spectra and stream failures from the capture side
    events: Receiver<AudioEvent>,

    sample_rate: f32,

    /// Tells the FFT thread to exit
    shutdown: Arc<AtomicBool>,

    /// Audio input stream (kept alive)
    _stream: cpal::Stream,

    fft_thread: Option<thread::JoinHandle<()>>,
}

impl AudioSystem {
    /// Open the default input device and start analysing it
    pub fn open(config: AnalyserConfig) -> Result<Self, AudioError> {
        config.validate()?;

        let host = cpal::default_host();
        let device = host
            .default_input_device()
            .ok_or(AudioError::NoInputDevice)?;
        let supported = device.default_input_config()?;

        let sample_rate = supported.sample_rate().0 as f32;
        let channels = supported.channels() as usize;
        log::info!(
            "Audio input: {} @ {}Hz, {} channel(s), {:?}, {:.1}Hz per bin",
            device.name().unwrap_or_else(|_| "Unknown".to_string()),
            sample_rate,
            channels,
            supported.sample_format(),
            config.bin_to_hz(1, sample_rate)
        );

        let (events_tx, events) = mpsc::channel();
        let sample_buffer = Arc::new(Mutex::new(Vec::with_capacity(config.fft_size * 2)));
        // Backlog cap in case the analysis thread falls behind
        let capacity = config.fft_size * 4;

        let error_tx = events_tx.clone();
        let err_fn = move |err: cpal::StreamError| {
            log::error!("Audio stream error: {}", err);
            let _ = error_tx.send(AudioEvent::Failed(err.into()));
        };

        let stream_config: cpal::StreamConfig = supported.config();
        let capture = Capture {
            channels,
            capacity,
            buffer: Arc::clone(&sample_buffer),
        };
        let stream = match supported.sample_format() {
            cpal::SampleFormat::F32 => {
                capture.build::<f32, _, _>(&device, &stream_config, |s| s, err_fn)?
            }
            cpal::SampleFormat::I16 => capture.build::<i16, _, _>(
                &device,
                &stream_config,
                |s| s as f32 / i16::MAX as f32,
                err_fn,
            )?,
            cpal::SampleFormat::U16 => capture.build::<u16, _, _>(
                &device,
                &stream_config,
                |s| (s as f32 - 32768.0) / 32768.0,
                err_fn,
            )?,
            other => return Err(AudioError::UnsupportedFormat(other)),
        };
        stream.play()?;

        let shutdown = Arc::new(AtomicBool::new(false));
        let fft_thread = spawn_fft_thread(
            config,
            sample_rate,
            sample_buffer,
            events_tx,
            Arc::clone(&shutdown),
        )?;

        Ok(Self {
            events,
            sample_rate,
            shutdown,
            _stream: stream,
            fft_thread: Some(fft_thread),
        })
    }

    /// Newest spectrum published since the last call, without blocking.
    ///
    /// Returns `Ok(None)` when nothing new arrived and `Err` once the stream
    /// has failed or the FFT worker has exited.
    pub fn latest(&self) -> Result<Option<SpectrumFrame>, AudioError> {
        let worker_alive = self
            .fft_thread
            .as_ref()
            .is_some_and(|handle| !handle.is_finished());
        drain_events(&self.events, worker_alive)
    }

    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }
}

/// Drain pending events, keeping only the newest spectrum.
///
/// A dead worker is reported once its last spectra have been delivered. The
/// stream's error callback holds a sender, so the channel alone never
/// disconnects while the stream lives.
fn drain_events(
    events: &Receiver<AudioEvent>,
    worker_alive: bool,
) -> Result<Option<SpectrumFrame>, AudioError> {
    let mut newest = None;
    loop {
        match events.try_recv() {
            Ok(AudioEvent::Spectrum(frame)) => newest = Some(frame),
            Ok(AudioEvent::Failed(err)) => return Err(err),
            Err(TryRecvError::Empty | TryRecvError::Disconnected) => break,
        }
    }
    match newest {
        Some(frame) => Ok(Some(frame)),
        None if worker_alive => Ok(None),
        None => Err(AudioError::WorkerStopped),
    }
}

impl Drop for AudioSystem {
    fn drop(&mut self) {
        self.shutdown.store(true, Ordering::Relaxed);
        if let Some(handle) = self.fft_thread.take() {
            if handle.join().is_err() {
                log::warn!("FFT analysis thread panicked");
            }
        }
    }
}

/// Shared state for the input callback: down-mixes to mono and appends
struct Capture {
    channels: usize,
    capacity: usize,
    buffer: Arc<Mutex<Vec<f32>>>,
}

impl Capture {
    fn build<T, F, E>(
        self,
        device: &cpal::Device,
        config: &cpal::StreamConfig,
        to_f32: F,
        err_fn: E,
    ) -> Result<cpal::Stream, cpal::BuildStreamError>
    where
        T: cpal::SizedSample,
        F: Fn(T) -> f32 + Send + 'static,
        E: FnMut(cpal::StreamError) + Send + 'static,
    {
        let Capture {
            channels,
            capacity,
            buffer,
        } = self;
        let channels = channels.max(1);

        device.build_input_stream(
            config,
            move |data: &[T], _: &cpal::InputCallbackInfo| {
                let mut samples = buffer.lock().unwrap_or_else(PoisonError::into_inner);
                for frame in data.chunks(channels) {
                    let sum: f32 = frame.iter().map(|&s| to_f32(s)).sum();
                    samples.push(sum / frame.len() as f32);
                }
                if samples.len() > capacity {
                    let excess = samples.len() - capacity;
                    samples.drain(..excess);
                }
            },
            err_fn,
            None,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn spectrum(level: u8) -> SpectrumFrame {
        SpectrumFrame {
            bins: vec![level; 8],
            sample_rate: 16000.0,
        }
    }

    #[test]
    fn test_drain_keeps_newest_spectrum() {
        let (tx, rx) = mpsc::channel();
        tx.send(AudioEvent::Spectrum(spectrum(1))).unwrap();
        tx.send(AudioEvent::Spectrum(spectrum(2))).unwrap();

        assert_eq!(drain_events(&rx, true).unwrap(), Some(spectrum(2)));
        assert_eq!(drain_events(&rx, true).unwrap(), None);
    }

    #[test]
    fn test_drain_reports_stream_failure() {
        let (tx, rx) = mpsc::channel();
        tx.send(AudioEvent::Spectrum(spectrum(1))).unwrap();
        tx.send(AudioEvent::Failed(AudioError::NoInputDevice)).unwrap();

        assert!(matches!(
            drain_events(&rx, true),
            Err(AudioError::NoInputDevice)
        ));
    }

    #[test]
    fn test_dead_worker_is_an_error_while_sender_lives() {
        // The stream's error callback keeps a sender alive
        let (_stream_tx, rx) = mpsc::channel::<AudioEvent>();

        assert!(matches!(
            drain_events(&rx, false),
            Err(AudioError::WorkerStopped)
        ));
    }

    #[test]
    fn test_dead_worker_delivers_last_spectrum_first() {
        let (tx, rx) = mpsc::channel();
        tx.send(AudioEvent::Spectrum(spectrum(7))).unwrap();

        assert_eq!(drain_events(&rx, false).unwrap(), Some(spectrum(7)));
        assert!(matches!(
            drain_events(&rx, false),
            Err(AudioError::WorkerStopped)
        ));
    }

    #[test]
    fn test_exited_fft_thread_is_detected() {
        let (tx, rx) = mpsc::channel();
        let stream_tx = tx.clone();
        let shutdown = Arc::new(AtomicBool::new(true));
        let handle = spawn_fft_thread(
            AnalyserConfig::default(),
            44100.0,
            Arc::new(Mutex::new(Vec::new())),
            tx,
            shutdown,
        )
        .unwrap();

        while !handle.is_finished() {
            thread::sleep(Duration::from_millis(1));
        }
        assert!(matches!(
            drain_events(&rx, !handle.is_finished()),
            Err(AudioError::WorkerStopped)
        ));
        drop(stream_tx);
    }
}
