//! Dominant-band selection and particle emission.

use glam::Vec2;
use rand::Rng;
use std::f32::consts::TAU;

use crate::audio::{BandGroup, BandState, FrequencyBand};
use crate::math::map_range;
use crate::params::{ParticleParams, SpawnParams};
use crate::particles::ParticleSystem;

/// Pick the band whose energy most exceeds its threshold and mark it active.
///
/// Only bands strictly above their threshold compete; ties go to the lower
/// band. Every other band is marked inactive.
pub fn select_dominant(bands: &[FrequencyBand], states: &mut [BandState]) -> Option<usize> {
    let mut dominant: Option<(usize, f32)> = None;
    for (i, (band, state)) in bands.iter().zip(states.iter()).enumerate() {
        if !state.exceeds(band) {
            continue;
        }
        if dominant.map_or(true, |(_, best)| state.relative_energy > best) {
            dominant = Some((i, state.relative_energy));
        }
    }

    for (i, state) in states.iter_mut().enumerate() {
        state.is_active = dominant.is_some_and(|(d, _)| d == i);
    }
    dominant.map(|(i, _)| i)
}

/// Speed cap for a new particle; bass needs more energy to get fast, highs
/// saturate at half energy
pub fn max_speed(band: &FrequencyBand, energy: f32, params: &ParticleParams) -> f32 {
    let speed = match band.group {
        BandGroup::Bass => map_range(energy, band.threshold, 1.0, 0.1, 4.0),
        BandGroup::High => map_range(energy, band.threshold, 0.5, 0.1, 4.0),
        BandGroup::Mid => map_range(energy, band.threshold, 1.0, 1.0, 4.0),
    };
    speed.clamp(params.min_speed, params.max_speed)
}

/// Turns the dominant band into a burst of particles
#[derive(Debug, Clone)]
pub struct SpawnPolicy {
    params: SpawnParams,
    /// Phase offsetting emission and the legend horizontally
    rotation: f32,
}

impl SpawnPolicy {
    pub fn new(params: SpawnParams) -> Self {
        Self {
            params,
            rotation: 0.0,
        }
    }

    pub fn rotation(&self) -> f32 {
        self.rotation
    }

    /// Advance the rotation phase by one frame
    pub fn advance(&mut self) {
        self.rotation += self.params.rotation_step;
    }

    /// Particles to emit for a band at `energy`.
    ///
    /// Linear from `burst_min` at the threshold to `burst_max` at 1.0 and
    /// beyond, unless `max_burst` caps it.
    pub fn spawn_count(&self, band: &FrequencyBand, energy: f32) -> usize {
        let count = map_range(
            energy,
            band.threshold,
            1.0,
            self.params.burst_min,
            self.params.burst_max,
        )
        .floor()
        .max(0.0) as usize;

        match self.params.max_burst {
            Some(cap) => count.min(cap),
            None => count,
        }
    }

    /// Emission point for band `index` of `band_count`
    pub fn spawn_position<R: Rng>(
        &self,
        index: usize,
        band_count: usize,
        width: f32,
        height: f32,
        rng: &mut R,
    ) -> Vec2 {
        let jitter = if self.params.jitter > 0.0 {
            rng.gen_range(-self.params.jitter..self.params.jitter)
        } else {
            0.0
        };
        let last = band_count.saturating_sub(1).max(1) as f32;
        let x = map_range(
            self.rotation % TAU + jitter + index as f32,
            0.0,
            last,
            0.0,
            self.params.spawn_width_fraction * width,
        );

        let spread = self.params.vertical_spread;
        let offset = if spread > 0.0 {
            rng.gen_range(-spread..spread)
        } else {
            0.0
        };
        Vec2::new(x, 0.5 * height + height * offset)
    }

    /// Emit the burst for the dominant band, returning how many particles
    /// were added
    #[allow(clippy::too_many_arguments)]
    pub fn spawn<R: Rng>(
        &self,
        index: usize,
        band: &FrequencyBand,
        state: &BandState,
        band_count: usize,
        width: f32,
        height: f32,
        particles: &mut ParticleSystem,
        rng: &mut R,
    ) -> usize {
        let energy = state.current_energy;
        let count = self.spawn_count(band, energy);
        let speed = max_speed(band, energy, particles.params());

        for _ in 0..count {
            let position = self.spawn_position(index, band_count, width, height, rng);
            particles.emit(position, band.color, speed, rng);
        }
        count
    }
}
