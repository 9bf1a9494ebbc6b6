//! Drawing surface
//!
//! The simulation only ever asks for filled circles. `Framebuffer` rasterises
//! them onto a pixel grid twice as tall as the terminal and encodes each pair
//! of rows as one line of `▄` cells: background colour on top, foreground below.

use std::io::{self, Write};

use glam::Vec2;

use crate::color::Rgb;

pub trait Canvas {
    /// Fills a circle of `radius` world units. A radius below 1 draws nothing.
    fn draw_circle(&mut self, color: Rgb, center: Vec2, radius: f32);
}

pub struct Framebuffer {
    width: usize,
    height: usize,
    /// Pixels per world unit on each axis
    scale: Vec2,
    background: Rgb,
    pixels: Vec<Rgb>,
    output_buf: Vec<u8>,
}

impl Framebuffer {
    /// A buffer for a `cols` x `rows` terminal showing a `world`-sized scene.
    pub fn new(cols: usize, rows: usize, world: Vec2, background: Rgb) -> Self {
        let width = cols;
        let height = rows * 2;
        Self {
            width,
            height,
            scale: Vec2::new(width as f32 / world.x, height as f32 / world.y),
            background,
            pixels: vec![background; width * height],
            output_buf: Vec::with_capacity(width * height * 25),
        }
    }

    pub fn clear(&mut self) {
        self.pixels.fill(self.background);
    }

    #[cfg(test)]
    fn pixel(&self, x: usize, y: usize) -> Option<Rgb> {
        if x < self.width && y < self.height {
            Some(self.pixels[y * self.width + x])
        } else {
            None
        }
    }

    fn put(&mut self, x: i64, y: i64, color: Rgb) {
        if x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height {
            self.pixels[y as usize * self.width + x as usize] = color;
        }
    }

    /// Writes the whole frame, homing the cursor first and only switching
    /// colours when they change.
    pub fn present<W: Write>(&mut self, out: &mut W) -> io::Result<()> {
        self.output_buf.clear();
        self.output_buf.extend_from_slice(b"\x1b[H");

        let mut prev_top: Option<Rgb> = None;
        let mut prev_bot: Option<Rgb> = None;

        for y in (0..self.height).step_by(2) {
            for x in 0..self.width {
                let top = self.pixels[y * self.width + x];
                let bot = if y + 1 < self.height {
                    self.pixels[(y + 1) * self.width + x]
                } else {
                    top
                };

                if prev_top != Some(top) {
                    write!(self.output_buf, "\x1b[48;2;{};{};{}m", top.0, top.1, top.2)?;
                    prev_top = Some(top);
                }
                if prev_bot != Some(bot) {
                    write!(self.output_buf, "\x1b[38;2;{};{};{}m", bot.0, bot.1, bot.2)?;
                    prev_bot = Some(bot);
                }

                self.output_buf.extend_from_slice("▄".as_bytes());
            }
            self.output_buf.extend_from_slice(b"\x1b[0m");
            prev_top = None;
            prev_bot = None;
            if y + 2 < self.height {
                self.output_buf.extend_from_slice(b"\r\n");
            }
        }

        out.write_all(&self.output_buf)?;
        out.flush()
    }
}

impl Canvas for Framebuffer {
    fn draw_circle(&mut self, color: Rgb, center: Vec2, radius: f32) {
        if !(radius >= 1.0) || self.pixels.is_empty() {
            return;
        }

        let c = center * self.scale;
        if !c.is_finite() {
            return;
        }
        let r = (Vec2::splat(radius) * self.scale).max(Vec2::splat(0.5));

        let x0 = ((c.x - r.x).floor() as i64).max(0);
        let x1 = ((c.x + r.x).ceil() as i64).min(self.width as i64 - 1);
        let y0 = ((c.y - r.y).floor() as i64).max(0);
        let y1 = ((c.y + r.y).ceil() as i64).min(self.height as i64 - 1);

        for py in y0..=y1 {
            for px in x0..=x1 {
                let dx = (px as f32 + 0.5 - c.x) / r.x;
                let dy = (py as f32 + 0.5 - c.y) / r.y;
                if dx * dx + dy * dy <= 1.0 {
                    self.put(px, py, color);
                }
            }
        }

        // Small circles still light the pixel they sit in
        self.put(c.x.floor() as i64, c.y.floor() as i64, color);
    }
}

/// Records every draw call, in order.
#[cfg(test)]
#[derive(Debug, Default)]
pub(crate) struct RecordingCanvas {
    pub circles: Vec<(Rgb, Vec2, f32)>,
}

#[cfg(test)]
impl Canvas for RecordingCanvas {
    fn draw_circle(&mut self, color: Rgb, center: Vec2, radius: f32) {
        self.circles.push((color, center, radius));
    }
}
