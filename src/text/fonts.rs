//! Font loading with per-weight fallback chains.
//!
//! Each weight resolves through, in order:
//!
//! 1. the primary family file in `fonts.dir`
//! 2. the secondary family file in `fonts.dir`
//! 3. named system fonts searched in `fonts.system_dirs`
//! 4. the built-in bitmap font
//!
//! Semibold searches the bold system list; when its chain reaches the
//! built-in font it reuses whatever face bold resolved to. Loading never
//! fails. The resulting [`FontBook`] is read-only and shared by reference.

use super::builtin;
use crate::config::FontsConfig;
use crate::imaging::effects::blend_pixel;
use image::{Rgba, RgbaImage};
use rusttype::{Font, Scale, point};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontWeight {
    Regular,
    Bold,
    Semibold,
}

/// A loaded typeface.
#[derive(Clone)]
pub enum FontFace {
    Outline(Font<'static>),
    Builtin,
}

impl FontFace {
    pub fn is_builtin(&self) -> bool {
        matches!(self, FontFace::Builtin)
    }
}

impl std::fmt::Debug for FontFace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FontFace::Outline(_) => f.write_str("Outline"),
            FontFace::Builtin => f.write_str("Builtin"),
        }
    }
}

/// Faces for every weight the renderer uses.
#[derive(Debug, Clone)]
pub struct FontBook {
    regular: FontFace,
    bold: FontFace,
    semibold: FontFace,
}

impl FontBook {
    /// Resolve all weights from config.
    pub fn load(config: &FontsConfig) -> Self {
        let regular = resolve_chain(
            config,
            &config.primary.regular,
            &config.secondary.regular,
            &config.system.regular,
        );
        let bold = resolve_chain(
            config,
            &config.primary.bold,
            &config.secondary.bold,
            &config.system.bold,
        );
        let semibold = match resolve_chain(
            config,
            &config.primary.semibold,
            &config.secondary.semibold,
            &config.system.bold,
        ) {
            FontFace::Builtin => bold.clone(),
            face => face,
        };

        let book = Self {
            regular,
            bold,
            semibold,
        };
        tracing::debug!(
            regular = ?book.regular,
            bold = ?book.bold,
            semibold = ?book.semibold,
            "font book loaded"
        );
        book
    }

    /// Book using only the built-in bitmap font.
    pub fn builtin() -> Self {
        Self {
            regular: FontFace::Builtin,
            bold: FontFace::Builtin,
            semibold: FontFace::Builtin,
        }
    }

    pub fn face(&self, weight: FontWeight) -> &FontFace {
        match weight {
            FontWeight::Regular => &self.regular,
            FontWeight::Bold => &self.bold,
            FontWeight::Semibold => &self.semibold,
        }
    }

    /// The face for `weight` at `px` pixels.
    pub fn sized(&self, weight: FontWeight, px: u32) -> SizedFont<'_> {
        SizedFont {
            face: self.face(weight),
            px: px.max(1) as f32,
        }
    }
}

fn resolve_chain(
    config: &FontsConfig,
    primary: &str,
    secondary: &str,
    system: &[String],
) -> FontFace {
    let bundled = [primary, secondary]
        .into_iter()
        .filter(|name| !name.is_empty())
        .map(|name| config.dir.join(name));
    let system = system
        .iter()
        .flat_map(|name| config.system_dirs.iter().map(move |dir| dir.join(name)));

    for path in bundled.chain(system) {
        if let Some(font) = load_font_file(&path) {
            tracing::debug!(path = %path.display(), "loaded font");
            return FontFace::Outline(font);
        }
    }

    tracing::warn!(primary, "no font file found, using built-in bitmap font");
    FontFace::Builtin
}

fn load_font_file(path: &Path) -> Option<Font<'static>> {
    let bytes = std::fs::read(path).ok()?;
    let font = Font::try_from_vec(bytes);
    if font.is_none() {
        tracing::debug!(path = %path.display(), "not a usable font file");
    }
    font
}

/// A face at a fixed pixel size.
#[derive(Debug, Clone, Copy)]
pub struct SizedFont<'a> {
    face: &'a FontFace,
    px: f32,
}

impl SizedFont<'_> {
    pub fn px(&self) -> f32 {
        self.px
    }

    /// Line height at this size.
    pub fn line_height(&self) -> u32 {
        match self.face {
            FontFace::Outline(font) => {
                let v = font.v_metrics(Scale::uniform(self.px));
                (v.ascent - v.descent).ceil().max(1.0) as u32
            }
            FontFace::Builtin => builtin::line_height(builtin::scale_for(self.px)),
        }
    }

    /// `(width, height)` of one line: ink extent by line height.
    pub fn measure(&self, text: &str) -> (u32, u32) {
        let width = match self.face {
            FontFace::Outline(font) => {
                let scale = Scale::uniform(self.px);
                let v = font.v_metrics(scale);
                font.layout(text, scale, point(0.0, v.ascent))
                    .filter_map(|g| g.pixel_bounding_box())
                    .map(|bb| bb.max.x.max(0) as u32)
                    .max()
                    .unwrap_or(0)
            }
            FontFace::Builtin => builtin::text_width(text, builtin::scale_for(self.px)),
        };
        (width, self.line_height())
    }

    /// Draw one line with its top-left at `(x, y)`.
    pub fn draw(&self, canvas: &mut RgbaImage, text: &str, (x, y): (i64, i64), color: Rgba<u8>) {
        match self.face {
            FontFace::Outline(font) => {
                let scale = Scale::uniform(self.px);
                let v = font.v_metrics(scale);
                let origin = point(x as f32, y as f32 + v.ascent);
                for glyph in font.layout(text, scale, origin) {
                    let Some(bb) = glyph.pixel_bounding_box() else {
                        continue;
                    };
                    glyph.draw(|gx, gy, coverage| {
                        blend_pixel(
                            canvas,
                            bb.min.x as i64 + gx as i64,
                            bb.min.y as i64 + gy as i64,
                            color,
                            coverage,
                        );
                    });
                }
            }
            FontFace::Builtin => {
                builtin::draw(canvas, text, (x, y), builtin::scale_for(self.px), color)
            }
        }
    }
}
