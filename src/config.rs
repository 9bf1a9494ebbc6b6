//! Start-up configuration
//!
//! Fixed once the simulation starts. Loaded from an optional TOML file; any key
//! left out keeps its default.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::color::Rgb;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("cannot read config file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("config parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Ceiling for integer settings that feed random draw ranges
pub const MAX_INT_SETTING: i32 = 1_000_000;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub display: DisplayConfig,
    pub firework: FireworkConfig,
    pub particle: ParticleConfig,
    pub trail: TrailConfig,
}

/// World size, sky and frame rate
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// World width in simulation units (pixels of the original 1000x1000 window)
    pub width: f32,
    pub height: f32,
    pub background: Rgb,
    pub star_color: Rgb,
    pub star_count: usize,
    /// Target ticks per second
    pub frame_rate: u32,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            width: 1000.0,
            height: 1000.0,
            background: (10, 10, 40),
            star_color: (255, 255, 255),
            star_count: 100,
            frame_rate: 60,
        }
    }
}

/// The rising launcher and how often new ones appear
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FireworkConfig {
    /// Downward pull on the launcher per tick
    pub gravity: f32,
    pub speed_min: i32,
    pub speed_max: i32,
    pub size: f32,
    /// Chance per tick of an automatic launch
    pub auto_launch_chance: f64,
    /// Explosion particles pick from the 3-colour palette instead of the base colour
    pub colorful: bool,
}

impl Default for FireworkConfig {
    fn default() -> Self {
        Self {
            gravity: 0.3,
            speed_min: 15,
            speed_max: 25,
            size: 6.0,
            auto_launch_chance: 1.0 / 71.0,
            colorful: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ParticleConfig {
    pub gravity: f32,
    /// Age after which a particle may be retired; forced at 1.5x
    pub lifespan: u32,
    pub x_spread: f32,
    pub y_spread: f32,
    /// Drawn sizes are size-1..=size+1
    pub size: i32,
    pub min_count: usize,
    pub max_count: usize,
    /// Larger values mean less random wobble
    pub x_wiggle_scale: f32,
    pub y_wiggle_scale: f32,
    pub explosion_radius_min: i32,
    pub explosion_radius_max: i32,
}

impl Default for ParticleConfig {
    fn default() -> Self {
        Self {
            gravity: 0.07,
            lifespan: 100,
            x_spread: 0.8,
            y_spread: 0.8,
            size: 4,
            min_count: 100,
            max_count: 300,
            x_wiggle_scale: 15.0,
            y_wiggle_scale: 10.0,
            explosion_radius_min: 15,
            explosion_radius_max: 35,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TrailConfig {
    pub enabled: bool,
    pub lifespan: u32,
    /// Ticks between trail emissions; larger means fewer trails
    pub frequency: i32,
    /// Per-particle jitter applied to `frequency`
    pub jitter: i32,
}

impl Default for TrailConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            lifespan: ParticleConfig::default().lifespan / 2,
            frequency: 8,
            jitter: 3,
        }
    }
}

impl Config {
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> ConfigResult<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects settings that would make a random draw range empty or stall the
    /// launcher forever.
    pub fn validate(&self) -> ConfigResult<()> {
        let display = &self.display;
        if !(display.width > 0.0 && display.height > 0.0) {
            return invalid("display width and height must be positive");
        }
        if display.frame_rate == 0 {
            return invalid("display.frame_rate must be at least 1");
        }

        let firework = &self.firework;
        if !(firework.gravity > 0.0) {
            return invalid("firework.gravity must be positive or launchers never explode");
        }
        if firework.speed_min < 0 || firework.speed_max > MAX_INT_SETTING {
            return invalid(&format!("firework speeds must be within [0, {MAX_INT_SETTING}]"));
        }
        if firework.speed_min > firework.speed_max {
            return invalid("firework.speed_min is greater than firework.speed_max");
        }
        if !(0.0..=1.0).contains(&firework.auto_launch_chance) {
            return invalid("firework.auto_launch_chance must be within [0, 1]");
        }

        let particle = &self.particle;
        if !(2..=MAX_INT_SETTING).contains(&particle.size) {
            return invalid(&format!("particle.size must be within [2, {MAX_INT_SETTING}]"));
        }
        if particle.min_count == 0 {
            return invalid("particle.min_count must be at least 1");
        }
        if particle.min_count > particle.max_count {
            return invalid("particle.min_count is greater than particle.max_count");
        }
        // Per-axis explosion speed is drawn from 7..=radius+2
        if particle.explosion_radius_min < 5 {
            return invalid("particle.explosion_radius_min must be at least 5");
        }
        if particle.explosion_radius_max > MAX_INT_SETTING {
            return invalid(&format!("particle.explosion_radius_max must be at most {MAX_INT_SETTING}"));
        }
        if particle.explosion_radius_min > particle.explosion_radius_max {
            return invalid("particle.explosion_radius_min is greater than particle.explosion_radius_max");
        }
        for (name, spread) in [("x_spread", particle.x_spread), ("y_spread", particle.y_spread)] {
            if !(spread > 0.0 && spread <= 1.0) {
                return invalid(&format!("particle.{name} must be within (0, 1]"));
            }
        }
        if !(particle.x_wiggle_scale > 0.0 && particle.y_wiggle_scale > 0.0) {
            return invalid("particle wiggle scales must be positive");
        }

        if !(0..=MAX_INT_SETTING).contains(&self.trail.jitter) {
            return invalid(&format!("trail.jitter must be within [0, {MAX_INT_SETTING}]"));
        }
        if !(1..=MAX_INT_SETTING).contains(&self.trail.frequency) {
            return invalid(&format!("trail.frequency must be within [1, {MAX_INT_SETTING}]"));
        }

        Ok(())
    }
}

fn invalid(message: &str) -> ConfigResult<()> {
    Err(ConfigError::Invalid(message.to_string()))
}
