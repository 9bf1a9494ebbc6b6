use glam::Vec2;

use super::DECAY_ODDS;
use super::particle::{DecayPolicy, Particle};
use crate::color::{self, Rgb};
use crate::config::Config;
use crate::render::Canvas;

/// Ticks of age between one-unit size reductions
const SHRINK_PERIOD: u32 = 100;
/// Per-tick brightening of each colour channel
const FADE_STEP: u8 = 5;

/// A short-lived streak dropped behind a falling explosion particle.
///
/// Trails never move after they are placed. They are owned by the simulation,
/// not by the firework whose particle dropped them, so they outlive it.
#[derive(Debug, Clone)]
pub struct Trail {
    particle: Particle,
}

impl Trail {
    /// Spawns a trail near `parent`, one size smaller. Like an explosion particle
    /// it takes one scattered step (and one fade) as it is placed.
    pub fn new(parent: &Particle, config: &Config, rng: &mut fastrand::Rng) -> Self {
        let mut particle = Particle::with_policy(
            parent.position,
            false,
            parent.color,
            DecayPolicy::Trail,
            config,
            rng,
        );
        particle.size = (parent.size - 1.0).max(0.0);
        Self { particle }
    }

    /// Ages the trail one tick. Returns true once it should be dropped.
    pub fn decay(&mut self, config: &Config, rng: &mut fastrand::Rng) -> bool {
        self.particle.decay(config, rng)
    }

    pub fn position(&self) -> Vec2 {
        self.particle.position
    }

    pub fn size(&self) -> f32 {
        self.particle.size
    }

    pub fn color(&self) -> Rgb {
        self.particle.color
    }

    pub fn age(&self) -> u32 {
        self.particle.age
    }

    pub fn draw<C: Canvas + ?Sized>(&self, canvas: &mut C) {
        self.particle.draw(canvas);
    }

    #[cfg(test)]
    pub(crate) fn set_age(&mut self, age: u32) {
        self.particle.age = age;
    }
}

/// Trail decay: shrink every `SHRINK_PERIOD` ticks, brighten toward white, and
/// report retirement rather than flagging it.
pub(super) fn fade(particle: &mut Particle, config: &Config, rng: &mut fastrand::Rng) -> bool {
    particle.age += 1;
    if particle.age % SHRINK_PERIOD == 0 {
        particle.size -= 1.0;
    }
    particle.size = particle.size.max(0.0);
    particle.color = color::brighten(particle.color, FADE_STEP);

    let lifespan = config.trail.lifespan as f32;
    let age = particle.age as f32;
    if age > lifespan && rng.u32(0..DECAY_ODDS) == 0 {
        return true;
    }
    age > lifespan * 1.5
}
