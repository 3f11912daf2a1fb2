//! Layout archetypes and zone geometry.
//!
//! A [`LayoutSpec`] names one composition template: where the product, the
//! headline, body copy, CTA button and logo may go, each as a fractional
//! [`LayoutZone`] of the canvas. Specs are immutable values; the built-in
//! table is a `static`.
//!
//! Archetype names arrive as free text from the concept provider, so
//! [`get_layout_spec`] resolves them in three steps:
//!
//! 1. exact name match
//! 2. closest name by similarity ratio, if it reaches [`FUZZY_CUTOFF`]
//! 3. the default archetype ([`DEFAULT_ARCHETYPE`])
//!
//! Resolution never fails.

use serde::Serialize;

/// Minimum similarity ratio for a fuzzy archetype match.
pub const FUZZY_CUTOFF: f64 = 0.4;

/// Archetype returned when nothing matches.
pub const DEFAULT_ARCHETYPE: &str = "Minimal Product Focus";

/// A rectangle expressed as fractions (0.0–1.0) of the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LayoutZone {
    pub x_start: f64,
    pub x_end: f64,
    pub y_start: f64,
    pub y_end: f64,
}

impl LayoutZone {
    /// Build a zone, panicking at compile time when used in a `const`
    /// context with inverted or out-of-range edges.
    pub const fn new(x_start: f64, x_end: f64, y_start: f64, y_end: f64) -> Self {
        assert!(x_start >= 0.0 && x_end <= 1.0 && x_start < x_end);
        assert!(y_start >= 0.0 && y_end <= 1.0 && y_start < y_end);
        Self {
            x_start,
            x_end,
            y_start,
            y_end,
        }
    }

    /// Pixel bounds `(x1, y1, x2, y2)`, each edge truncated toward zero.
    pub fn get_bounds(&self, width: u32, height: u32) -> (u32, u32, u32, u32) {
        (
            (width as f64 * self.x_start) as u32,
            (height as f64 * self.y_start) as u32,
            (width as f64 * self.x_end) as u32,
            (height as f64 * self.y_end) as u32,
        )
    }

    /// Integer midpoint of the pixel bounds.
    pub fn get_center(&self, width: u32, height: u32) -> (u32, u32) {
        let (x1, y1, x2, y2) = self.get_bounds(width, height);
        ((x1 + x2) / 2, (y1 + y2) / 2)
    }

    /// Width and height of the pixel bounds.
    pub fn get_size(&self, width: u32, height: u32) -> (u32, u32) {
        let (x1, y1, x2, y2) = self.get_bounds(width, height);
        (x2 - x1, y2 - y1)
    }
}

/// Complete zone and typography template for one archetype.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LayoutSpec {
    pub name: &'static str,
    pub description: &'static str,
    pub product_zone: LayoutZone,
    pub headline_zone: LayoutZone,
    pub body_zone: LayoutZone,
    pub cta_zone: LayoutZone,
    pub logo_zone: LayoutZone,
    /// Reserved for co-branded layouts that place the second logo apart.
    pub secondary_logo_zone: Option<LayoutZone>,
    /// Font sizes as a ratio of canvas height.
    pub headline_font_ratio: f64,
    pub body_font_ratio: f64,
    pub cta_font_ratio: f64,
}

const BODY_FONT_RATIO: f64 = 0.025;
const CTA_FONT_RATIO: f64 = 0.028;

static ARCHETYPES: [LayoutSpec; 4] = [
    // Product dominates the center, copy overlaid bottom-left
    LayoutSpec {
        name: "Hero Product with Stat Overlay",
        description: "Product centered and prominent, with key stat/headline overlaid at bottom",
        product_zone: LayoutZone::new(0.15, 0.85, 0.10, 0.70),
        headline_zone: LayoutZone::new(0.05, 0.65, 0.68, 0.82),
        body_zone: LayoutZone::new(0.05, 0.65, 0.82, 0.92),
        cta_zone: LayoutZone::new(0.05, 0.40, 0.88, 0.98),
        logo_zone: LayoutZone::new(0.75, 0.95, 0.03, 0.12),
        secondary_logo_zone: None,
        headline_font_ratio: 0.05,
        body_font_ratio: BODY_FONT_RATIO,
        cta_font_ratio: CTA_FONT_RATIO,
    },
    // Text on the left half, product on the right
    LayoutSpec {
        name: "Problem/Solution Split",
        description: "Vertical split: text on left, product on right",
        product_zone: LayoutZone::new(0.50, 0.95, 0.10, 0.85),
        headline_zone: LayoutZone::new(0.05, 0.48, 0.15, 0.35),
        body_zone: LayoutZone::new(0.05, 0.48, 0.38, 0.65),
        cta_zone: LayoutZone::new(0.05, 0.35, 0.70, 0.85),
        logo_zone: LayoutZone::new(0.05, 0.25, 0.03, 0.12),
        secondary_logo_zone: None,
        headline_font_ratio: 0.042,
        body_font_ratio: BODY_FONT_RATIO,
        cta_font_ratio: CTA_FONT_RATIO,
    },
    // Small product bottom-right, large storytelling copy top-left
    LayoutSpec {
        name: "Lifestyle Context Shot",
        description: "Emphasis on lifestyle context, product positioned subtly",
        product_zone: LayoutZone::new(0.55, 0.95, 0.50, 0.95),
        headline_zone: LayoutZone::new(0.05, 0.70, 0.08, 0.25),
        body_zone: LayoutZone::new(0.05, 0.55, 0.28, 0.45),
        cta_zone: LayoutZone::new(0.05, 0.35, 0.50, 0.62),
        logo_zone: LayoutZone::new(0.75, 0.95, 0.03, 0.12),
        secondary_logo_zone: None,
        headline_font_ratio: 0.048,
        body_font_ratio: BODY_FONT_RATIO,
        cta_font_ratio: CTA_FONT_RATIO,
    },
    // Centered product, centered copy stack below
    LayoutSpec {
        name: DEFAULT_ARCHETYPE,
        description: "Clean, minimal design with centered product and text below",
        product_zone: LayoutZone::new(0.20, 0.80, 0.12, 0.62),
        headline_zone: LayoutZone::new(0.10, 0.90, 0.65, 0.78),
        body_zone: LayoutZone::new(0.15, 0.85, 0.78, 0.88),
        cta_zone: LayoutZone::new(0.30, 0.70, 0.88, 0.96),
        logo_zone: LayoutZone::new(0.40, 0.60, 0.02, 0.10),
        secondary_logo_zone: None,
        headline_font_ratio: 0.04,
        body_font_ratio: BODY_FONT_RATIO,
        cta_font_ratio: CTA_FONT_RATIO,
    },
];

impl Default for LayoutSpec {
    fn default() -> Self {
        default_spec()
    }
}

fn default_spec() -> LayoutSpec {
    ARCHETYPES
        .iter()
        .find(|spec| spec.name == DEFAULT_ARCHETYPE)
        .copied()
        .unwrap_or(ARCHETYPES[ARCHETYPES.len() - 1])
}

/// Resolve an archetype name to its spec. Never fails.
pub fn get_layout_spec(archetype: &str) -> LayoutSpec {
    if let Some(spec) = ARCHETYPES.iter().find(|spec| spec.name == archetype) {
        return *spec;
    }

    let mut best: Option<(f64, &LayoutSpec)> = None;
    for spec in &ARCHETYPES {
        let score = similarity_ratio(archetype, spec.name);
        if score >= FUZZY_CUTOFF && best.is_none_or(|(top, _)| score > top) {
            best = Some((score, spec));
        }
    }

    match best {
        Some((score, spec)) => {
            tracing::debug!(archetype, matched = spec.name, score, "fuzzy layout match");
            *spec
        }
        None => {
            tracing::debug!(archetype, "no layout match, using default");
            default_spec()
        }
    }
}

/// Names of all built-in archetypes, in registry order.
pub fn list_archetypes() -> Vec<&'static str> {
    ARCHETYPES.iter().map(|spec| spec.name).collect()
}

/// Ratcliff/Obershelp similarity: `2 * matched / (len(a) + len(b))`.
///
/// Matched characters are counted by repeatedly taking the longest common
/// block and recursing on both sides of it. Case-sensitive, counted over
/// `char`s.
pub fn similarity_ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }
    2.0 * matching_chars(&a, &b) as f64 / total as f64
}

fn matching_chars(a: &[char], b: &[char]) -> usize {
    let (start_a, start_b, len) = longest_common_block(a, b);
    if len == 0 {
        return 0;
    }
    len + matching_chars(&a[..start_a], &b[..start_b])
        + matching_chars(&a[start_a + len..], &b[start_b + len..])
}

/// Longest common contiguous block, earliest in `a` then earliest in `b`.
fn longest_common_block(a: &[char], b: &[char]) -> (usize, usize, usize) {
    let mut best = (0, 0, 0);
    // lengths[j + 1] = length of the common run ending at a[i], b[j]
    let mut lengths = vec![0usize; b.len() + 1];
    for (i, ca) in a.iter().enumerate() {
        let mut next = vec![0usize; b.len() + 1];
        for (j, cb) in b.iter().enumerate() {
            if ca == cb {
                let run = lengths[j] + 1;
                next[j + 1] = run;
                if run > best.2 {
                    best = (i + 1 - run, j + 1 - run, run);
                }
            }
        }
        lengths = next;
    }
    best
}
