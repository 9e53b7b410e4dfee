//! Scene description, tessellation, text labels and the wgpu backend that
//! draws them.

mod gpu;
pub mod mesh;
pub mod scene;
pub mod text;

pub use gpu::RenderSystem;
pub use mesh::{tessellate, Vertex};
pub use scene::{LegendBox, LevelIndicator, Prompt, Scene, TrailStroke};
pub use text::{scene_labels, Anchor, TextLabel};
