//! Spectraflow library - audio-reactive flow-field particle visualizer

pub mod audio;
pub mod error;
pub mod field;
pub mod math;
pub mod params;
pub mod particles;
pub mod rendering;
pub mod sketch;
pub mod spawn;
