//! RGB colours as plain `(r, g, b)` triples.

pub type Rgb = (u8, u8, u8);

pub fn random(rng: &mut fastrand::Rng) -> Rgb {
    (rng.u8(..), rng.u8(..), rng.u8(..))
}

/// Moves every channel toward 255 by `step`, saturating.
pub fn brighten(color: Rgb, step: u8) -> Rgb {
    (
        color.0.saturating_add(step),
        color.1.saturating_add(step),
        color.2.saturating_add(step),
    )
}

/// Parses `RRGGBB` with or without a leading `#`.
pub fn parse_hex(hex: &str) -> Option<Rgb> {
    let hex = hex.trim_start_matches('#');
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }

    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;

    Some((r, g, b))
}
