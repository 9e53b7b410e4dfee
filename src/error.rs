//! Error types for audio capture, rendering and configuration.

use thiserror::Error;

/// Invalid parameter values
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("FFT size must be a power of 2 and at least 32, got {0}")]
    FftSize(usize),

    #[error("smoothing must be within [0, 1], got {0}")]
    Smoothing(f32),

    #[error("decibel range is empty: min {min} dB >= max {max} dB")]
    DecibelRange { min: f32, max: f32 },
}

/// Microphone acquisition and stream failures
///
/// Every variant is recoverable: the sketch switches to fallback mode.
#[derive(Debug, Error)]
pub enum AudioError {
    #[error("invalid analyser config: {0}")]
    Config(#[from] ConfigError),

    #[error("no audio input device found")]
    NoInputDevice,

    #[error("failed to query input config: {0}")]
    DefaultConfig(#[from] cpal::DefaultStreamConfigError),

    #[error("unsupported input sample format: {0:?}")]
    UnsupportedFormat(cpal::SampleFormat),

    #[error("failed to build input stream: {0}")]
    BuildStream(#[from] cpal::BuildStreamError),

    #[error("failed to start input stream: {0}")]
    PlayStream(#[from] cpal::PlayStreamError),

    #[error("input stream error: {0}")]
    Stream(#[from] cpal::StreamError),

    #[error("failed to spawn FFT worker: {0}")]
    Worker(#[from] std::io::Error),

    #[error("FFT worker stopped unexpectedly")]
    WorkerStopped,
}

/// GPU initialisation failures
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to create surface: {0}")]
    Surface(#[from] wgpu::CreateSurfaceError),

    #[error("no suitable GPU adapter")]
    NoAdapter,

    #[error("failed to request device: {0}")]
    Device(#[from] wgpu::RequestDeviceError),

    #[error("surface has no supported texture format")]
    NoSurfaceFormat,
}
