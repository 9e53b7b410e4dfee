//! Band energy and overall level extraction from 8-bit spectra.
//!
//! Every query works against a [`SpectrumSource`]: either a live spectrum
//! or the deterministic synthetic signal used in fallback mode.

use rand::Rng;

use super::bands::{BandState, FrequencyBand, FREQUENCY_BANDS};

/// Chance per frame that the synthetic level jumps to a random transient
const TRANSIENT_PROBABILITY: f64 = 0.05;

/// Upper bound of a synthetic transient
const TRANSIENT_MAX: f32 = 0.8;

/// Perceptual compression exponent applied to the live overall level
const LEVEL_CURVE: f32 = 0.8;

/// One spectrum as published by the capture side
#[derive(Debug, Clone, PartialEq)]
pub struct SpectrumFrame {
    /// Byte magnitudes, one per FFT bin, covering 0 Hz..nyquist
    pub bins: Vec<u8>,
    pub sample_rate: f32,
}

/// Where a frame's spectrum comes from
#[derive(Debug, Clone, Copy)]
pub enum SpectrumSource<'a> {
    Live(&'a SpectrumFrame),
    /// No live audio; derive a reproducible signal from the frame counter
    Synthetic { frame_count: u64 },
}

/// Mean normalized magnitude of the bins covering `[min_hz, max_hz]`.
///
/// Bin indices are `floor(hz / nyquist * bin_count)`, inclusive on both ends
/// and clipped to the buffer. Returns 0 when no bin falls in range.
pub fn band_energy(min_hz: f32, max_hz: f32, bins: &[u8], sample_rate: f32) -> f32 {
    if bins.is_empty() || sample_rate <= 0.0 {
        return 0.0;
    }
    let nyquist = sample_rate / 2.0;
    let bin_count = bins.len();
    let min_bin = (min_hz / nyquist * bin_count as f32).floor() as i64;
    let max_bin = (max_hz / nyquist * bin_count as f32).floor() as i64;

    let first = min_bin.max(0);
    let last = max_bin.min(bin_count as i64 - 1);
    if first > last {
        return 0.0;
    }

    let slice = &bins[first as usize..=last as usize];
    let sum: u32 = slice.iter().map(|&b| b as u32).sum();
    sum as f32 / (slice.len() as f32 * 255.0)
}

/// Fallback band energy: `0.1 + 0.2 * sin(frame * 0.05 + min_hz * 0.001)`
pub fn synthetic_band_energy(min_hz: f32, frame_count: u64) -> f32 {
    (0.1 + 0.2 * (frame_count as f64 * 0.05 + min_hz as f64 * 0.001).sin()) as f32
}

/// Mean normalized magnitude of the whole spectrum, compressed by `^0.8`
pub fn overall_level(bins: &[u8]) -> f32 {
    if bins.is_empty() {
        return 0.0;
    }
    let sum: u64 = bins.iter().map(|&b| b as u64).sum();
    let mean = sum as f32 / (bins.len() as f32 * 255.0);
    mean.powf(LEVEL_CURVE)
}

/// Deterministic part of the fallback level: `0.3 + 0.3 * sin(frame * 0.05)`
pub fn synthetic_level(frame_count: u64) -> f32 {
    (0.3 + 0.3 * (frame_count as f64 * 0.05).sin()) as f32
}

/// Converts a spectrum source into per-band energies and an overall level
#[derive(Debug, Clone, Copy)]
pub struct SpectrumAnalyzer {
    bands: &'static [FrequencyBand],
}

impl Default for SpectrumAnalyzer {
    fn default() -> Self {
        Self::new(&FREQUENCY_BANDS)
    }
}

impl SpectrumAnalyzer {
    pub fn new(bands: &'static [FrequencyBand]) -> Self {
        Self { bands }
    }

    pub fn bands(&self) -> &'static [FrequencyBand] {
        self.bands
    }

    /// Energy of one band for this frame
    pub fn band_energy(&self, source: SpectrumSource<'_>, band: &FrequencyBand) -> f32 {
        match source {
            SpectrumSource::Live(frame) => {
                band_energy(band.min_hz, band.max_hz, &frame.bins, frame.sample_rate)
            }
            SpectrumSource::Synthetic { frame_count } => {
                synthetic_band_energy(band.min_hz, frame_count)
            }
        }
    }

    /// Overall level for this frame; the synthetic path occasionally
    /// substitutes a random transient
    pub fn overall_level<R: Rng>(&self, source: SpectrumSource<'_>, rng: &mut R) -> f32 {
        match source {
            SpectrumSource::Live(frame) => overall_level(&frame.bins),
            SpectrumSource::Synthetic { frame_count } => {
                if rng.gen_bool(TRANSIENT_PROBABILITY) {
                    rng.gen_range(0.0..TRANSIENT_MAX)
                } else {
                    synthetic_level(frame_count)
                }
            }
        }
    }

    /// Record the energy of every band into `states` (one entry per band)
    pub fn analyze(&self, source: SpectrumSource<'_>, states: &mut [BandState]) {
        for (band, state) in self.bands.iter().zip(states.iter_mut()) {
            state.record(band, self.band_energy(source, band));
        }
    }
}
