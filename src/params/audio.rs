//! Audio analysis configuration.

use crate::error::ConfigError;

/// Spectrum analyser configuration, modelled on a browser `AnalyserNode`
#[derive(Debug, Clone)]
pub struct AnalyserConfig {
    /// FFT window size (must be power of 2); yields `fft_size / 2` bins
    pub fft_size: usize,

    /// Temporal smoothing between successive spectra, in [0, 1]
    pub smoothing: f32,

    /// Magnitude mapped to byte 0 (dBFS)
    pub min_db: f32,

    /// Magnitude mapped to byte 255 (dBFS)
    pub max_db: f32,

    /// FFT update interval (milliseconds)
    /// 16 ms ≈ one spectrum per displayed frame at 60 Hz
    pub update_interval_ms: u64,
}

impl Default for AnalyserConfig {
    fn default() -> Self {
        Self {
            fft_size: 2048,
            smoothing: 0.4,
            min_db: -100.0,
            max_db: -30.0,
            update_interval_ms: 16,
        }
    }
}

impl AnalyserConfig {
    /// Number of frequency bins produced per spectrum
    pub fn bin_count(&self) -> usize {
        self.fft_size / 2
    }

    /// Centre frequency of a bin (Hz) at the given sample rate
    pub fn bin_to_hz(&self, bin: usize, sample_rate_hz: f32) -> f32 {
        bin as f32 * sample_rate_hz / self.fft_size as f32
    }

    /// Validate configuration (FFT size must be power of 2, etc.)
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.fft_size < 32 || !self.fft_size.is_power_of_two() {
            return Err(ConfigError::FftSize(self.fft_size));
        }
        if !(0.0..=1.0).contains(&self.smoothing) {
            return Err(ConfigError::Smoothing(self.smoothing));
        }
        if self.min_db >= self.max_db {
            return Err(ConfigError::DecibelRange {
                min: self.min_db,
                max: self.max_db,
            });
        }
        Ok(())
    }
}
