//! Live particle collection with the per-frame follow/update/edges/show pass.

use glam::Vec2;
use rand::Rng;

use super::Particle;
use crate::field::VectorField;
use crate::params::ParticleParams;
use crate::rendering::TrailStroke;

/// Owns every live particle
pub struct ParticleSystem {
    particles: Vec<Particle>,
    params: ParticleParams,
}

impl ParticleSystem {
    pub fn new(params: ParticleParams) -> Self {
        Self {
            particles: Vec::new(),
            params,
        }
    }

    /// Create and add a particle at full lifespan with a random darkness
    pub fn emit<R: Rng>(&mut self, position: Vec2, color: [u8; 3], max_speed: f32, rng: &mut R) {
        let darkness = rng.gen_range(0.0..=1.0);
        self.particles.push(Particle::new(
            position,
            color,
            max_speed,
            self.params.max_lifespan,
            darkness,
        ));
    }

    /// Step every particle one frame, appending its trail stroke to `strokes`.
    ///
    /// Particles are visited newest-first; dead ones are removed only after
    /// the whole pass.
    pub fn step<R: Rng>(
        &mut self,
        field: &VectorField,
        width: f32,
        height: f32,
        rng: &mut R,
        strokes: &mut Vec<TrailStroke>,
    ) {
        for particle in self.particles.iter_mut().rev() {
            particle.follow(field);
            particle.update(self.params.lifespan_decay);
            particle.edges(width, height);
            strokes.push(particle.show(&self.params, rng));
        }
        self.particles.retain(|p| !p.is_dead());
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn params(&self) -> &ParticleParams {
        &self.params
    }
}
