use glam::Vec2;

use super::particle::Particle;
use super::trail::Trail;
use crate::color::{self, Rgb};
use crate::config::Config;
use crate::render::Canvas;

/// One launcher and, once it has burst, the particles it burst into.
///
/// Ascending until the launcher's vertical velocity reaches zero, then exploded
/// for the rest of its life. `particles` stays empty while ascending.
#[derive(Debug, Clone)]
pub struct Firework {
    base_color: Rgb,
    palette: [Rgb; 3],
    launcher: Particle,
    exploded: bool,
    particles: Vec<Particle>,
}

impl Firework {
    /// A launcher at a random column on the bottom edge of the world.
    pub fn new(config: &Config, rng: &mut fastrand::Rng) -> Self {
        let base_color = color::random(rng);
        let palette = [color::random(rng), color::random(rng), color::random(rng)];
        let x = rng.i32(0..=config.display.width as i32) as f32;
        let launcher = Particle::new(
            Vec2::new(x, config.display.height),
            true,
            base_color,
            config,
            rng,
        );

        Self {
            base_color,
            palette,
            launcher,
            exploded: false,
            particles: Vec::new(),
        }
    }

    /// Advances the firework one tick and draws it. Trails dropped by its
    /// particles go to `trails`.
    pub fn update<C: Canvas + ?Sized>(
        &mut self,
        config: &Config,
        rng: &mut fastrand::Rng,
        trails: &mut Vec<Trail>,
        canvas: &mut C,
    ) {
        if !self.exploded {
            self.launcher.apply_force(Vec2::new(0.0, config.firework.gravity));
            self.launcher.step(config, rng);
            canvas.draw_circle(self.base_color, self.launcher.position, self.launcher.size);

            // Apex: gravity has used up the launch speed
            if self.launcher.velocity.y >= 0.0 {
                self.exploded = true;
                self.explode(config, rng);
            }
        } else {
            for particle in &mut self.particles {
                particle.update(config, rng, trails);
                particle.draw(canvas);
            }
        }
    }

    fn explode(&mut self, config: &Config, rng: &mut fastrand::Rng) {
        let amount = rng.usize(config.particle.min_count..=config.particle.max_count);
        let origin = self.launcher.position;

        self.particles = (0..amount)
            .map(|_| {
                let color = if config.firework.colorful {
                    self.palette[rng.usize(..self.palette.len())]
                } else {
                    self.base_color
                };
                Particle::new(origin, false, color, config, rng)
            })
            .collect();

        log::trace!(
            "firework burst at ({:.0}, {:.0}) into {} particles",
            origin.x,
            origin.y,
            amount
        );
    }

    /// Purges retired particles. True once the firework has exploded and every
    /// particle is gone; never true before the explosion.
    pub fn remove(&mut self) -> bool {
        if !self.exploded {
            return false;
        }

        self.particles.retain(|p| !p.pending_removal);
        self.particles.is_empty()
    }

    pub fn is_exploded(&self) -> bool {
        self.exploded
    }

    pub fn launcher(&self) -> &Particle {
        &self.launcher
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn base_color(&self) -> Rgb {
        self.base_color
    }

    pub fn palette(&self) -> &[Rgb; 3] {
        &self.palette
    }
}

#[cfg(test)]
impl Firework {
    /// Skips the ascent and bursts where the launcher stands.
    pub(crate) fn burst_now(&mut self, config: &Config, rng: &mut fastrand::Rng) {
        self.exploded = true;
        self.explode(config, rng);
    }

    pub(crate) fn flag_all_particles(&mut self) {
        for particle in &mut self.particles {
            particle.pending_removal = true;
        }
    }
}
