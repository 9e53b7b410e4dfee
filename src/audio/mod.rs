//! Microphone capture and spectrum analysis.
//!
//! Captures mono samples with cpal, turns them into byte spectra on a worker
//! thread, and extracts per-band energies for the spawning policy.

pub mod bands;
mod fft;
pub mod spectrum;
mod system;

// Re-export public types
pub use bands::{BandGroup, BandState, FrequencyBand, BAND_COUNT, FREQUENCY_BANDS};
pub use fft::{hann_window, SpectrumProcessor};
pub use spectrum::{SpectrumAnalyzer, SpectrumFrame, SpectrumSource};
pub use system::AudioSystem;

use crate::error::AudioError;

/// Messages from the capture side to the frame loop
#[derive(Debug)]
pub enum AudioEvent {
    Spectrum(SpectrumFrame),
    /// The input stream failed after it was opened
    Failed(AudioError),
}
