use glam::Vec2;

use super::BURST_SIZE;
use super::firework::Firework;
use super::trail::Trail;
use crate::config::Config;
use crate::render::Canvas;

/// Radius of a background star
const STAR_RADIUS: f32 = 1.0;

/// Owns every live firework and trail, the random source and the star field,
/// and advances them one tick at a time.
pub struct Simulation {
    config: Config,
    rng: fastrand::Rng,
    fireworks: Vec<Firework>,
    trails: Vec<Trail>,
    stars: Vec<Vec2>,
    ticks: u64,
}

impl Simulation {
    /// Starts an empty sky. The star field is laid out here and never changes.
    pub fn new(config: Config, seed: u64) -> Self {
        let mut rng = fastrand::Rng::with_seed(seed);
        let width = config.display.width as i32;
        let height = config.display.height as i32;
        let stars = (0..config.display.star_count)
            .map(|_| Vec2::new(rng.i32(0..=width) as f32, rng.i32(0..=height) as f32))
            .collect();

        log::info!(
            "simulation seeded with {seed}: {}x{} world, {} stars",
            width,
            height,
            config.display.star_count
        );

        Self {
            config,
            rng,
            fireworks: Vec::new(),
            trails: Vec::new(),
            stars,
            ticks: 0,
        }
    }

    pub fn launch(&mut self) {
        self.fireworks.push(Firework::new(&self.config, &mut self.rng));
        log::debug!("launch, {} fireworks live", self.fireworks.len());
    }

    pub fn launch_burst(&mut self) {
        for _ in 0..BURST_SIZE {
            self.fireworks.push(Firework::new(&self.config, &mut self.rng));
        }
        log::debug!("burst launch, {} fireworks live", self.fireworks.len());
    }

    pub fn draw_stars<C: Canvas + ?Sized>(&self, canvas: &mut C) {
        for &star in &self.stars {
            canvas.draw_circle(self.config.display.star_color, star, STAR_RADIUS);
        }
    }

    /// One frame: trails, then fireworks, then maybe an automatic launch.
    ///
    /// Each collection is walked once and compacted in the same pass, so an
    /// entity retired this tick is neither skipped nor visited twice.
    pub fn tick<C: Canvas + ?Sized>(&mut self, canvas: &mut C) {
        let Self {
            config,
            rng,
            fireworks,
            trails,
            ..
        } = self;

        trails.retain_mut(|trail| {
            trail.draw(canvas);
            !trail.decay(config, rng)
        });

        fireworks.retain_mut(|firework| {
            firework.update(config, rng, trails, canvas);
            let done = firework.remove();
            if done {
                log::trace!("firework burned out");
            }
            !done
        });

        if rng.f64() < config.firework.auto_launch_chance {
            fireworks.push(Firework::new(config, rng));
        }

        self.ticks += 1;
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn fireworks(&self) -> &[Firework] {
        &self.fireworks
    }

    pub fn trails(&self) -> &[Trail] {
        &self.trails
    }

    pub fn stars(&self) -> &[Vec2] {
        &self.stars
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }
}
