//! Particle lifetime and spawning parameters.

/// Per-particle integration and lifetime parameters
#[derive(Debug, Clone)]
pub struct ParticleParams {
    /// Lifespan a particle is born with (frames × decay)
    pub max_lifespan: i32,

    /// Lifespan lost per frame
    pub lifespan_decay: i32,

    /// Trail stroke weight at full lifespan (pixels)
    pub max_stroke_weight: f32,

    /// Lower clamp for the spawned particle speed limit (pixels per frame)
    pub min_speed: f32,

    /// Upper clamp for the spawned particle speed limit (pixels per frame)
    pub max_speed: f32,
}

impl Default for ParticleParams {
    fn default() -> Self {
        Self {
            max_lifespan: 1000,
            lifespan_decay: 10,
            max_stroke_weight: 10.0,
            min_speed: 1.0,
            max_speed: 16.0,
        }
    }
}

/// Dominant-band emission parameters
#[derive(Debug, Clone)]
pub struct SpawnParams {
    /// Particles emitted when a band just crosses its threshold
    pub burst_min: f32,

    /// Particles emitted when a band reaches full energy (1.0)
    pub burst_max: f32,

    /// Optional hard cap on particles per frame (None = uncapped extrapolation)
    pub max_burst: Option<usize>,

    /// Fraction of the canvas width the emission line spans
    pub spawn_width_fraction: f32,

    /// Vertical spread around the canvas centre, as a fraction of its height
    pub vertical_spread: f32,

    /// Horizontal jitter in band-index units
    pub jitter: f32,

    /// Rotation phase advance per frame (radians)
    pub rotation_step: f32,
}

impl Default for SpawnParams {
    fn default() -> Self {
        Self {
            burst_min: 1.0,
            burst_max: 60.0,
            max_burst: None,
            spawn_width_fraction: 0.9,
            vertical_spread: 0.2,
            jitter: 1.0,
            rotation_step: 0.0,
        }
    }
}
