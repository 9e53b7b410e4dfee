//! Flow field configuration.

/// Flow field noise and grid parameters
#[derive(Debug, Clone)]
pub struct FieldParams {
    /// Edge length of one grid cell (pixels)
    pub scale: f32,

    /// Noise-space distance between neighbouring cells (dimensionless)
    pub noise_step: f64,

    /// Noise-time advance per regeneration (dimensionless)
    pub z_step: f64,

    /// Length of every flow vector (pixels per frame²)
    pub magnitude: f32,

    /// Full turns covered by the noise range: angle = noise * TAU * turns
    pub angle_turns: f32,

    /// Perlin noise seed
    pub noise_seed: u32,
}

impl Default for FieldParams {
    fn default() -> Self {
        Self {
            scale: 20.0,
            noise_step: 0.1,
            z_step: 0.01,
            magnitude: 0.5,
            angle_turns: 2.0,
            noise_seed: 42,
        }
    }
}
