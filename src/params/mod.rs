//! Parameter definitions with units and documented semantics.
//!
//! All tuning constants live here with:
//! - Units (pixels, frames, Hz, decibels)
//! - Documented ranges and meanings
//! - `validate()` where a value has a hard invariant

mod audio;
mod field;
mod particle;
mod render;

// Re-export all types
pub use audio::AnalyserConfig;
pub use field::FieldParams;
pub use particle::{ParticleParams, SpawnParams};
pub use render::RenderConfig;
