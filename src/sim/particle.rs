use glam::Vec2;

use super::trail::{self, Trail};
use super::{DECAY_ODDS, uniform};
use crate::color::Rgb;
use crate::config::Config;
use crate::render::Canvas;

/// Lowest per-axis speed factor of a freshly spawned explosion particle
const SPAWN_SPEED_MIN: i32 = 7;
/// Headroom above the explosion radius for the per-axis speed factor
const SPAWN_SPEED_HEADROOM: i32 = 2;

/// How a particle ages out once its lifespan is spent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecayPolicy {
    /// Sets `pending_removal`, which the owning firework purges
    Particle,
    /// Shrinks and brightens; reports retirement to the trail pass instead of flagging
    Trail,
}

#[derive(Debug, Clone)]
pub struct Particle {
    pub position: Vec2,
    /// Where the particle was spawned
    pub origin: Vec2,
    pub velocity: Vec2,
    /// Force accumulated since the last step
    pub acceleration: Vec2,
    pub is_launcher: bool,
    pub age: u32,
    pub color: Rgb,
    pub size: f32,
    pub explosion_radius: i32,
    /// Ticks between trail emissions, always >= 1
    pub trail_emission_period: u32,
    /// Set once, never cleared
    pub pending_removal: bool,
    /// Result of the radius check made at spawn. Recorded only; nothing removes
    /// a particle because of it.
    pub spawned_outside_radius: bool,
    policy: DecayPolicy,
}

impl Particle {
    /// A launcher rising from `position`, or an explosion particle bursting from it.
    pub fn new(
        position: Vec2,
        is_launcher: bool,
        color: Rgb,
        config: &Config,
        rng: &mut fastrand::Rng,
    ) -> Self {
        Self::with_policy(position, is_launcher, color, DecayPolicy::Particle, config, rng)
    }

    pub(super) fn with_policy(
        position: Vec2,
        is_launcher: bool,
        color: Rgb,
        policy: DecayPolicy,
        config: &Config,
        rng: &mut fastrand::Rng,
    ) -> Self {
        let pc = &config.particle;
        let explosion_radius = rng.i32(pc.explosion_radius_min..=pc.explosion_radius_max);
        let jitter = config.trail.jitter;
        let trail_emission_period = config
            .trail
            .frequency
            .saturating_add(rng.i32(-jitter..=jitter))
            .max(1) as u32;

        let mut particle = Self {
            position,
            origin: position,
            velocity: Vec2::ZERO,
            acceleration: Vec2::ZERO,
            is_launcher,
            age: 0,
            color,
            size: 0.0,
            explosion_radius,
            trail_emission_period,
            pending_removal: false,
            spawned_outside_radius: false,
            policy,
        };

        if is_launcher {
            let fc = &config.firework;
            particle.velocity = Vec2::new(0.0, -(rng.i32(fc.speed_min..=fc.speed_max) as f32));
            particle.size = fc.size;
        } else {
            let speed_max = explosion_radius.saturating_add(SPAWN_SPEED_HEADROOM);
            let direction = Vec2::new(uniform(rng), uniform(rng));
            let speed = Vec2::new(
                rng.i32(SPAWN_SPEED_MIN..=speed_max) as f32,
                rng.i32(SPAWN_SPEED_MIN..=speed_max) as f32,
            );
            particle.velocity = direction * speed;
            particle.size = rng.i32(pc.size.saturating_sub(1)..=pc.size.saturating_add(1)) as f32;

            // Explosion particles leave the constructor one step out
            particle.step(config, rng);
            particle.spawned_outside_radius = particle.outside_spawn_radius();
        }

        particle
    }

    pub fn policy(&self) -> DecayPolicy {
        self.policy
    }

    /// Accumulates a force; it reaches the velocity on the next step.
    pub fn apply_force(&mut self, force: Vec2) {
        self.acceleration += force;
    }

    /// Integrates one tick of motion, then applies the decay policy. Returns what
    /// the policy decided.
    pub fn step(&mut self, config: &Config, rng: &mut fastrand::Rng) -> bool {
        if !self.is_launcher {
            self.velocity *= Vec2::new(config.particle.x_spread, config.particle.y_spread);
        }

        self.velocity += self.acceleration;
        self.position += self.velocity;
        self.acceleration = Vec2::ZERO;

        self.decay(config, rng)
    }

    /// Per-tick update of an explosion particle: ages it, drops a trail every
    /// `trail_emission_period` ticks, then wobbles and falls.
    pub fn update(&mut self, config: &Config, rng: &mut fastrand::Rng, trails: &mut Vec<Trail>) {
        self.age += 1;
        if config.trail.enabled && self.age % self.trail_emission_period == 0 {
            trails.push(Trail::new(self, config, rng));
        }

        let pc = &config.particle;
        let wobble = Vec2::new(
            uniform(rng) / pc.x_wiggle_scale,
            pc.gravity + uniform(rng) / pc.y_wiggle_scale,
        );
        self.apply_force(wobble);
        self.step(config, rng);
    }

    pub fn decay(&mut self, config: &Config, rng: &mut fastrand::Rng) -> bool {
        match self.policy {
            DecayPolicy::Particle => {
                let lifespan = config.particle.lifespan as f32;
                let age = self.age as f32;
                if age > lifespan && rng.u32(0..DECAY_ODDS) == 0 {
                    self.pending_removal = true;
                }
                if age > lifespan * 1.5 {
                    self.pending_removal = true;
                }
                self.pending_removal
            }
            DecayPolicy::Trail => trail::fade(self, config, rng),
        }
    }

    /// Whether the particle has drifted further from its origin than its
    /// explosion radius.
    pub fn outside_spawn_radius(&self) -> bool {
        self.position.distance(self.origin) > self.explosion_radius as f32
    }

    pub fn draw<C: Canvas + ?Sized>(&self, canvas: &mut C) {
        canvas.draw_circle(self.color, self.position, self.size);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn spark(config: &Config, rng: &mut fastrand::Rng) -> Particle {
        Particle::new(Vec2::new(500.0, 300.0), false, (200, 40, 40), config, rng)
    }

    #[test]
    fn launcher_rises_straight_up() {
        let config = Config::default();
        let mut rng = fastrand::Rng::with_seed(7);
        for _ in 0..50 {
            let launcher = Particle::new(Vec2::new(10.0, 1000.0), true, (1, 2, 3), &config, &mut rng);
            assert_eq!(launcher.velocity.x, 0.0);
            assert!((-25.0..=-15.0).contains(&launcher.velocity.y));
            assert_eq!(launcher.size, 6.0);
            assert_eq!(launcher.position, launcher.origin);
            assert!(!launcher.pending_removal);
        }
    }

    #[test]
    fn explosion_particle_is_pre_advanced_one_step() {
        let config = Config::default();
        let mut rng = fastrand::Rng::with_seed(11);
        for _ in 0..50 {
            let p = spark(&config, &mut rng);
            assert_eq!(p.age, 0);
            assert!((p.position - p.origin - p.velocity).length() < 1e-3);
            assert_eq!(p.acceleration, Vec2::ZERO);
            assert!((3.0..=5.0).contains(&p.size));
            assert!((15..=35).contains(&p.explosion_radius));
            assert!((5..=11).contains(&p.trail_emission_period));
        }
    }

    #[test]
    fn outside_spawn_radius_matches_euclidean_distance() {
        let mut config = Config::default();
        config.particle.explosion_radius_min = 20;
        config.particle.explosion_radius_max = 20;
        let mut rng = fastrand::Rng::with_seed(3);

        for _ in 0..200 {
            let p = spark(&config, &mut rng);
            assert_eq!(p.explosion_radius, 20);
            let dx = p.position.x - p.origin.x;
            let dy = p.position.y - p.origin.y;
            let expected = (dx * dx + dy * dy).sqrt() > 20.0;
            assert_eq!(p.outside_spawn_radius(), expected);
            assert_eq!(p.spawned_outside_radius, expected);
        }
    }

    #[test]
    fn outside_radius_particles_are_not_flagged() {
        let mut config = Config::default();
        config.particle.explosion_radius_min = 5;
        config.particle.explosion_radius_max = 5;
        let mut rng = fastrand::Rng::with_seed(5);

        let outliers: Vec<_> = (0..200)
            .map(|_| spark(&config, &mut rng))
            .filter(|p| p.spawned_outside_radius)
            .collect();
        assert!(!outliers.is_empty());
        assert!(outliers.iter().all(|p| !p.pending_removal));
    }

    #[test]
    fn force_waits_for_next_step() {
        let config = Config::default();
        let mut rng = fastrand::Rng::with_seed(1);
        let mut launcher = Particle::new(Vec2::ZERO, true, (0, 0, 0), &config, &mut rng);
        let before = launcher.velocity;

        launcher.apply_force(Vec2::new(0.0, 0.3));
        launcher.apply_force(Vec2::new(0.0, 0.3));
        assert_eq!(launcher.velocity, before);
        assert_eq!(launcher.acceleration, Vec2::new(0.0, 0.6));

        launcher.step(&config, &mut rng);
        assert!((launcher.velocity.y - (before.y + 0.6)).abs() < 1e-5);
        assert_eq!(launcher.acceleration, Vec2::ZERO);
    }

    #[test]
    fn launcher_keeps_its_speed_without_spread() {
        let config = Config::default();
        let mut rng = fastrand::Rng::with_seed(2);
        let mut launcher = Particle::new(Vec2::ZERO, true, (0, 0, 0), &config, &mut rng);
        let v = launcher.velocity;
        launcher.step(&config, &mut rng);
        assert_eq!(launcher.velocity, v);
        assert_eq!(launcher.position, v);
    }

    #[test]
    fn young_particle_never_decays() {
        let config = Config::default();
        let mut rng = fastrand::Rng::with_seed(9);
        let mut p = spark(&config, &mut rng);
        p.age = config.particle.lifespan;
        for _ in 0..500 {
            assert!(!p.decay(&config, &mut rng));
        }
        assert!(!p.pending_removal);
    }

    #[test]
    fn old_particle_always_decays() {
        let config = Config::default();
        let mut rng = fastrand::Rng::with_seed(9);
        let mut p = spark(&config, &mut rng);
        p.age = config.particle.lifespan * 3 / 2 + 1;
        assert!(p.decay(&config, &mut rng));
        assert!(p.pending_removal);
    }

    #[test]
    fn removal_flag_is_sticky() {
        let config = Config::default();
        let mut rng = fastrand::Rng::with_seed(4);
        let mut p = spark(&config, &mut rng);
        p.pending_removal = true;
        p.age = 0;
        assert!(p.decay(&config, &mut rng));
        assert!(p.pending_removal);
    }

    #[test]
    fn update_emits_trail_on_period() {
        let config = Config::default();
        let mut rng = fastrand::Rng::with_seed(21);
        let mut p = spark(&config, &mut rng);
        let mut trails = Vec::new();

        let period = p.trail_emission_period;
        for _ in 0..period - 1 {
            p.update(&config, &mut rng, &mut trails);
        }
        assert!(trails.is_empty());

        p.update(&config, &mut rng, &mut trails);
        assert_eq!(trails.len(), 1);
        assert_eq!(p.age, period);
    }

    #[test]
    fn disabled_trails_are_never_emitted() {
        let mut config = Config::default();
        config.trail.enabled = false;
        let mut rng = fastrand::Rng::with_seed(21);
        let mut p = spark(&config, &mut rng);
        let mut trails = Vec::new();
        for _ in 0..100 {
            p.update(&config, &mut rng, &mut trails);
        }
        assert!(trails.is_empty());
    }

    #[test]
    fn emission_period_never_drops_below_one() {
        let mut config = Config::default();
        config.trail.frequency = 1;
        config.trail.jitter = 4;
        let mut rng = fastrand::Rng::with_seed(8);
        for _ in 0..100 {
            assert!(spark(&config, &mut rng).trail_emission_period >= 1);
        }
    }

    #[test]
    fn extreme_unvalidated_settings_do_not_overflow() {
        let mut config = Config::default();
        config.trail.frequency = i32::MAX;
        config.particle.explosion_radius_min = i32::MAX;
        config.particle.explosion_radius_max = i32::MAX;
        config.particle.size = i32::MAX;
        let mut rng = fastrand::Rng::with_seed(10);

        let p = spark(&config, &mut rng);
        assert_eq!(p.explosion_radius, i32::MAX);
        assert!(p.trail_emission_period >= 1);
        assert!(p.size > 0.0);
    }

    #[test]
    fn draw_uses_current_state() {
        let config = Config::default();
        let mut rng = fastrand::Rng::with_seed(6);
        let p = spark(&config, &mut rng);
        let mut canvas = crate::render::RecordingCanvas::default();
        p.draw(&mut canvas);
        assert_eq!(canvas.circles, vec![(p.color, p.position, p.size)]);
    }

    proptest! {
        #[test]
        fn trails_are_one_size_smaller_and_one_fade_brighter(seed in any::<u64>(), ticks in 0usize..400) {
            let config = Config::default();
            let mut rng = fastrand::Rng::with_seed(seed);
            let mut p = spark(&config, &mut rng);
            let parent_color = p.color;
            let mut trails = Vec::new();
            for _ in 0..ticks {
                p.update(&config, &mut rng, &mut trails);
                prop_assert!(p.size >= 0.0);
            }
            prop_assert_eq!(p.color, parent_color);
            for trail in &trails {
                prop_assert_eq!(trail.size(), (p.size - 1.0).max(0.0));
                // Placed with exactly one fade step over the parent colour
                prop_assert_eq!(trail.color(), (205, 45, 45));
            }
        }
    }
}
