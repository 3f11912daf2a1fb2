//! Parameter types for product placement and effects.
//!
//! Free-text directives from the concept provider are converted once into
//! the tags here; nothing downstream inspects the original strings.
//!
//! ## Types
//!
//! - [`SizeCategory`]: dominant / balanced / subtle, with the canvas multiplier.
//! - [`Anchor`]: where the product sits inside its zone.
//! - [`TreatmentKind`]: drop shadow, reflection, or the subtle default shadow.
//! - [`ShadowParams`] / [`ReflectionParams`]: effect settings per treatment.
//! - [`PlacementDirective`]: the three tags together.
//! - [`Quality`]: JPEG encoding quality (1 to 100, default 95). Clamped on construction.

use crate::types::ProductPlacement;
use image::Rgba;

/// Quality setting for lossy image encoding (1-100).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quality(pub u8);

impl Quality {
    pub fn new(value: u8) -> Self {
        Self(value.clamp(1, 100))
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(95)
    }
}

/// How much of the canvas the product occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SizeCategory {
    Dominant,
    #[default]
    Balanced,
    Subtle,
}

impl SizeCategory {
    /// Unrecognized values map to [`SizeCategory::Balanced`].
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "dominant" => Self::Dominant,
            "subtle" => Self::Subtle,
            _ => Self::Balanced,
        }
    }

    /// Fraction of the canvas short edge given to the product's long edge.
    pub fn multiplier(self) -> f64 {
        match self {
            Self::Dominant => 0.65,
            Self::Balanced => 0.45,
            Self::Subtle => 0.30,
        }
    }
}

/// Product anchor within its layout zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Anchor {
    #[default]
    Center,
    Left,
    Right,
    Top,
    Bottom,
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl Anchor {
    /// Parse a free-text position such as `"bottom-right"` or `"left third"`.
    ///
    /// Corners win over single edges; `"center"` only counts as pure center
    /// when no vertical edge is named.
    pub fn parse(value: &str) -> Self {
        let position = value.to_lowercase().replace(['-', ' '], "_");
        let has = |word: &str| position.contains(word);
        let vertical = if has("top") {
            Some(Self::Top)
        } else if has("bottom") {
            Some(Self::Bottom)
        } else {
            None
        };

        match (vertical, has("left"), has("right")) {
            (Some(Self::Top), true, _) => Self::TopLeft,
            (Some(Self::Top), _, true) => Self::TopRight,
            (Some(Self::Bottom), true, _) => Self::BottomLeft,
            (Some(Self::Bottom), _, true) => Self::BottomRight,
            (None, _, _) if has("center") => Self::Center,
            (_, true, _) => Self::Left,
            (_, _, true) => Self::Right,
            (Some(edge), _, _) => edge,
            (None, _, _) => Self::Center,
        }
    }
}

/// Visual treatment applied to the product before compositing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TreatmentKind {
    DropShadow,
    Reflection,
    #[default]
    SubtleShadow,
}

impl TreatmentKind {
    pub fn parse(value: &str) -> Self {
        let lower = value.to_lowercase();
        if lower.contains("shadow") || lower.contains("floating") {
            Self::DropShadow
        } else if lower.contains("reflection") || lower.contains("surface") {
            Self::Reflection
        } else {
            Self::SubtleShadow
        }
    }
}

/// Drop shadow settings.
///
/// - `offset`: shadow displacement from the image in pixels
/// - `blur_radius`: Gaussian blur radius, also used as sigma
/// - `color`: shadow color; its alpha scales the source alpha
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShadowParams {
    pub offset: (i32, i32),
    pub blur_radius: u32,
    pub color: Rgba<u8>,
}

impl ShadowParams {
    /// Subtle shadow for products without an explicit treatment.
    pub fn subtle() -> Self {
        Self {
            offset: (5, 5),
            blur_radius: 10,
            color: Rgba([0, 0, 0, 60]),
        }
    }

    /// Margin added on every side so the blurred shadow is not clipped.
    pub fn extend(&self) -> u32 {
        self.blur_radius * 2 + self.offset.0.unsigned_abs().max(self.offset.1.unsigned_abs())
    }
}

impl Default for ShadowParams {
    fn default() -> Self {
        Self {
            offset: (8, 8),
            blur_radius: 15,
            color: Rgba([0, 0, 0, 100]),
        }
    }
}

/// Reflection settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReflectionParams {
    /// Reflection height as a fraction of the product height.
    pub height_fraction: f64,
    /// Peak reflection opacity, at the row touching the product.
    pub opacity: f64,
}

impl Default for ReflectionParams {
    fn default() -> Self {
        Self {
            height_fraction: 0.4,
            opacity: 0.3,
        }
    }
}

/// Placement tags converted from a [`ProductPlacement`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PlacementDirective {
    pub anchor: Anchor,
    pub size: SizeCategory,
    pub treatment: TreatmentKind,
}

impl From<&ProductPlacement> for PlacementDirective {
    fn from(placement: &ProductPlacement) -> Self {
        Self {
            anchor: Anchor::parse(&placement.position),
            size: SizeCategory::parse(&placement.size),
            treatment: TreatmentKind::parse(&placement.treatment),
        }
    }
}
