//! termfireworks - fireworks in the terminal
//!
//! Modules:
//! - `sim`: launchers, explosion particles, trails and the per-tick update
//! - `render`: the circle-drawing surface and its half-block terminal encoder
//! - `config`: start-up settings, loadable from TOML
//! - `input`: key bindings
//! - `pacing`: fixed-rate frame clock

pub mod color;
pub mod config;
pub mod error;
pub mod input;
pub mod pacing;
pub mod render;
pub mod sim;

pub use config::Config;
pub use error::{Error, Result};
pub use render::{Canvas, Framebuffer};
pub use sim::{Firework, Particle, Simulation, Trail};
