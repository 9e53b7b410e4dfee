//! A single trail-drawing particle.

use glam::Vec2;
use rand::Rng;

use crate::field::VectorField;
use crate::params::ParticleParams;
use crate::rendering::TrailStroke;

/// Point mass steered by the flow field, drawn as a fading line segment
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub position: Vec2,
    pub velocity: Vec2,
    /// Force accumulated this frame, cleared by [`Particle::update`]
    pub acceleration: Vec2,
    /// Where the trail segment starts
    pub prev_position: Vec2,
    pub max_speed: f32,
    pub lifespan: i32,
    pub color: [u8; 3],
    /// Per-particle opacity scalar in [0, 1], fixed at creation
    pub darkness: f32,
}

impl Particle {
    pub fn new(position: Vec2, color: [u8; 3], max_speed: f32, lifespan: i32, darkness: f32) -> Self {
        Self {
            position,
            velocity: Vec2::ZERO,
            acceleration: Vec2::ZERO,
            prev_position: position,
            max_speed,
            lifespan,
            color,
            darkness,
        }
    }

    pub fn apply_force(&mut self, force: Vec2) {
        self.acceleration += force;
    }

    /// Accumulate the flow vector under the particle (none when off-grid)
    pub fn follow(&mut self, field: &VectorField) {
        self.apply_force(field.sample(self.position));
    }

    /// Integrate one frame and age the particle
    pub fn update(&mut self, lifespan_decay: i32) {
        self.velocity = (self.velocity + self.acceleration).clamp_length_max(self.max_speed);
        self.position += self.velocity;
        self.acceleration = Vec2::ZERO;
        self.lifespan -= lifespan_decay;
    }

    /// Wrap across canvas edges; a wrapped particle restarts its trail
    pub fn edges(&mut self, width: f32, height: f32) {
        if self.position.x > width {
            self.position.x = 0.0;
            self.update_prev();
        }
        if self.position.x < 0.0 {
            self.position.x = width;
            self.update_prev();
        }
        if self.position.y > height {
            self.position.y = 0.0;
            self.update_prev();
        }
        if self.position.y < 0.0 {
            self.position.y = height;
            self.update_prev();
        }
    }

    /// Produce this frame's trail segment, then start the next one here
    pub fn show<R: Rng>(&mut self, params: &ParticleParams, rng: &mut R) -> TrailStroke {
        let stroke = TrailStroke::for_particle(self, params, rng);
        self.update_prev();
        stroke
    }

    pub fn update_prev(&mut self) {
        self.prev_position = self.position;
    }

    pub fn is_dead(&self) -> bool {
        self.lifespan <= 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn particle_at(x: f32, y: f32) -> Particle {
        Particle::new(Vec2::new(x, y), [255, 0, 0], 4.0, 1000, 1.0)
    }

    #[test]
    fn test_update_integrates_and_ages() {
        let mut p = particle_at(10.0, 10.0);
        p.apply_force(Vec2::new(1.0, 0.5));
        p.update(10);

        assert_eq!(p.velocity, Vec2::new(1.0, 0.5));
        assert_eq!(p.position, Vec2::new(11.0, 10.5));
        assert_eq!(p.acceleration, Vec2::ZERO);
        assert_eq!(p.lifespan, 990);
    }

    #[test]
    fn test_update_clamps_speed() {
        let mut p = particle_at(0.0, 0.0);
        p.apply_force(Vec2::new(30.0, 40.0));
        p.update(10);

        assert!((p.velocity.length() - 4.0).abs() < 1e-5);
        assert!((p.velocity.normalize() - Vec2::new(0.6, 0.8)).length() < 1e-5);
    }

    #[test]
    fn test_edges_wrap_right_and_resync_trail() {
        let mut p = particle_at(798.0, 300.0);
        p.apply_force(Vec2::new(4.0, 0.0));
        p.update(10);
        assert_eq!(p.position.x, 802.0);
        assert_eq!(p.prev_position.x, 798.0);

        p.edges(800.0, 600.0);

        assert_eq!(p.position, Vec2::new(0.0, 300.0));
        assert_eq!(p.prev_position, Vec2::new(0.0, 300.0));
    }

    #[test]
    fn test_edges_wrap_left_top_bottom() {
        let mut left = particle_at(-1.0, 50.0);
        left.edges(800.0, 600.0);
        assert_eq!(left.position, Vec2::new(800.0, 50.0));
        assert_eq!(left.prev_position, left.position);

        let mut top = particle_at(50.0, -0.5);
        top.edges(800.0, 600.0);
        assert_eq!(top.position, Vec2::new(50.0, 600.0));

        let mut bottom = particle_at(50.0, 601.0);
        bottom.edges(800.0, 600.0);
        assert_eq!(bottom.position, Vec2::new(50.0, 0.0));
    }

    #[test]
    fn test_edges_leave_inside_particles_alone() {
        let mut p = particle_at(400.0, 300.0);
        p.prev_position = Vec2::new(398.0, 299.0);
        p.edges(800.0, 600.0);

        assert_eq!(p.position, Vec2::new(400.0, 300.0));
        assert_eq!(p.prev_position, Vec2::new(398.0, 299.0));
    }

    #[test]
    fn test_is_dead_at_zero() {
        let mut p = Particle::new(Vec2::ZERO, [0, 0, 0], 1.0, 20, 0.5);
        p.update(10);
        assert!(!p.is_dead());
        p.update(10);
        assert!(p.is_dead());
    }

    proptest! {
        #[test]
        fn prop_speed_clamp_holds(
            ax in -1000.0f32..1000.0,
            ay in -1000.0f32..1000.0,
            vx in -20.0f32..20.0,
            vy in -20.0f32..20.0,
            max_speed in 1.0f32..16.0,
        ) {
            let mut p = Particle::new(Vec2::ZERO, [0, 0, 0], max_speed, 1000, 1.0);
            p.velocity = Vec2::new(vx, vy);
            p.apply_force(Vec2::new(ax, ay));
            p.update(10);
            prop_assert!(p.velocity.length() <= max_speed * (1.0 + 1e-5));
        }
    }
}
