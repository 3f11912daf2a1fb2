//! Hex color parsing and contrast helpers.

use image::Rgba;

/// Parse `#RGB`, `#RRGGBB` or `#RRGGBBAA` (leading `#` optional).
///
/// Returns `None` for anything else; callers pick their own fallback.
pub fn parse_hex_color(hex: &str) -> Option<Rgba<u8>> {
    let digits = hex.trim().trim_start_matches('#');
    if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }

    let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();
    match digits.len() {
        3 => {
            let mut out = [0u8, 0, 0, 255];
            for (slot, c) in out.iter_mut().zip(digits.chars()) {
                let v = c.to_digit(16)? as u8;
                *slot = v * 17;
            }
            Some(Rgba(out))
        }
        6 => Some(Rgba([channel(0)?, channel(2)?, channel(4)?, 255])),
        8 => Some(Rgba([channel(0)?, channel(2)?, channel(4)?, channel(6)?])),
        _ => None,
    }
}

/// Parse a color, substituting `fallback` when the input is malformed.
pub fn parse_or(hex: &str, fallback: Rgba<u8>) -> Rgba<u8> {
    parse_hex_color(hex).unwrap_or_else(|| {
        tracing::warn!(color = hex, "unparseable color, using fallback");
        fallback
    })
}

/// Relative luminance in 0.0–1.0 using Rec. 601 weights.
pub fn luminance(color: Rgba<u8>) -> f64 {
    let [r, g, b, _] = color.0;
    (0.299 * r as f64 + 0.587 * g as f64 + 0.114 * b as f64) / 255.0
}

/// `"#000000"` on light backgrounds, `"#FFFFFF"` otherwise.
///
/// Malformed input counts as dark, so it gets white text.
pub fn contrast_color(background_hex: &str) -> &'static str {
    match parse_hex_color(background_hex) {
        Some(color) if luminance(color) > 0.5 => "#000000",
        _ => "#FFFFFF",
    }
}

pub const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);
pub const BLACK: Rgba<u8> = Rgba([0, 0, 0, 255]);
