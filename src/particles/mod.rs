//! Flow-field particles and the collection that steps them.

mod particle;
mod system;

pub use particle::Particle;
pub use system::ParticleSystem;
