//! Flow field of steering vectors driven by 3D Perlin noise.

use glam::Vec2;
use noise::{NoiseFn, Perlin};
use std::f32::consts::TAU;

use crate::params::FieldParams;

/// Grid of flow vectors covering the canvas
///
/// Cell `(x, y)` lives at index `x + y * cols`. The grid is reallocated on
/// resize and rewritten in full by every [`VectorField::regenerate`].
pub struct VectorField {
    field: Vec<Vec2>,
    cols: usize,
    rows: usize,
    /// Noise-time coordinate, advanced once per regeneration
    z_offset: f64,
    perlin: Perlin,
    params: FieldParams,
}

impl VectorField {
    /// Create a zeroed field sized for a `width × height` canvas
    pub fn new(params: FieldParams, width: f32, height: f32) -> Self {
        let mut field = Self {
            field: Vec::new(),
            cols: 0,
            rows: 0,
            z_offset: 0.0,
            perlin: Perlin::new(params.noise_seed),
            params,
        };
        field.resize(width, height);
        field
    }

    /// Reallocate the grid for new canvas dimensions.
    ///
    /// Old vectors are discarded; every cell is zero until the next
    /// regeneration.
    pub fn resize(&mut self, width: f32, height: f32) {
        self.cols = (width / self.params.scale).floor().max(0.0) as usize;
        self.rows = (height / self.params.scale).floor().max(0.0) as usize;
        self.field = vec![Vec2::ZERO; self.cols * self.rows];
    }

    /// Overwrite every cell from noise, then advance noise time
    pub fn regenerate(&mut self) {
        let step = self.params.noise_step;
        for y in 0..self.rows {
            for x in 0..self.cols {
                let sample = self
                    .perlin
                    .get([x as f64 * step, y as f64 * step, self.z_offset]);
                // Perlin output is roughly [-1, 1]; fold it onto [0, 1]
                let unit = ((sample as f32 + 1.0) * 0.5).clamp(0.0, 1.0);
                let angle = unit * TAU * self.params.angle_turns;
                self.field[x + y * self.cols] = Vec2::from_angle(angle) * self.params.magnitude;
            }
        }
        self.z_offset += self.params.z_step;
    }

    /// Force at a canvas position, or zero when the position is off-grid
    pub fn sample(&self, position: Vec2) -> Vec2 {
        let x = (position.x / self.params.scale).floor() as i64;
        let y = (position.y / self.params.scale).floor() as i64;
        let index = x + y * self.cols as i64;

        usize::try_from(index)
            .ok()
            .and_then(|i| self.field.get(i))
            .copied()
            .unwrap_or(Vec2::ZERO)
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn z_offset(&self) -> f64 {
        self.z_offset
    }

    pub fn vectors(&self) -> &[Vec2] {
        &self.field
    }
}
