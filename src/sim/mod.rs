//! Firework simulation
//!
//! Launchers rise until gravity cancels their launch speed, explode into a
//! cluster of particles, and those particles shed trails as they fall. Every
//! entity is advanced exactly once per tick and retired lazily: it is flagged
//! (or reports that it is done) during the pass and dropped when the owning
//! collection is compacted at the end of the same pass.

pub mod firework;
pub mod particle;
pub mod simulation;
pub mod trail;

pub use firework::Firework;
pub use particle::{DecayPolicy, Particle};
pub use simulation::Simulation;
pub use trail::Trail;

/// Fireworks added by one burst launch
pub const BURST_SIZE: usize = 10;

/// Past its lifespan an entity is retired with a 1-in-`DECAY_ODDS` chance per tick
pub(crate) const DECAY_ODDS: u32 = 16;

/// Uniform draw from [-1, 1)
pub(crate) fn uniform(rng: &mut fastrand::Rng) -> f32 {
    rng.f32() * 2.0 - 1.0
}
