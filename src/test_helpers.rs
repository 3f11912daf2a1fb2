//! Shared test utilities for the compositor test suite.
//!
//! Provides fixture image writers and sample collaborator payloads
//! (brand, concept, copy, channel) so unit tests can assemble a complete
//! [`CompositionInput`] without touching the network.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = TempDir::new().unwrap();
//! let input = sample_input(tmp.path(), 1080, 1080);
//! let asset = Compositor::with_fonts(CompositorConfig::default(), FontBook::builtin())
//!     .compose(&input)
//!     .unwrap();
//! assert_eq!((asset.width, asset.height), (1080, 1080));
//! ```

use image::{Rgb, RgbImage, Rgba, RgbaImage};
use std::path::{Path, PathBuf};

use crate::types::{
    AdCopy, BrandIdentity, ChannelSpec, ColorPalette, CompositionInput, CreativeConcept,
    Dimensions, ProductPlacement,
};

// =========================================================================
// Fixture images
// =========================================================================

/// Write a solid RGBA PNG and return its path.
pub fn write_png(dir: &Path, name: &str, width: u32, height: u32, color: [u8; 4]) -> PathBuf {
    let path = dir.join(name);
    RgbaImage::from_pixel(width, height, Rgba(color))
        .save(&path)
        .unwrap();
    path
}

/// Write a solid RGB PNG (no alpha channel) and return its path.
pub fn write_rgb_png(dir: &Path, name: &str, width: u32, height: u32, color: [u8; 3]) -> PathBuf {
    let path = dir.join(name);
    RgbImage::from_pixel(width, height, Rgb(color))
        .save(&path)
        .unwrap();
    path
}

/// Write a diagonal gradient RGB PNG, a stand-in for a rendered scene.
pub fn write_gradient_png(dir: &Path, name: &str, width: u32, height: u32) -> PathBuf {
    let path = dir.join(name);
    RgbImage::from_fn(width, height, |x, y| {
        Rgb([
            (x * 255 / width.max(1)) as u8,
            (y * 255 / height.max(1)) as u8,
            96,
        ])
    })
    .save(&path)
    .unwrap();
    path
}

/// Write an RGBA product shot: opaque colored block on a transparent field.
pub fn write_cutout_png(dir: &Path, name: &str, width: u32, height: u32) -> PathBuf {
    let path = dir.join(name);
    RgbaImage::from_fn(width, height, |x, y| {
        let inside = x > width / 5 && x < width * 4 / 5 && y > height / 5 && y < height * 4 / 5;
        if inside {
            Rgba([230, 120, 20, 255])
        } else {
            Rgba([0, 0, 0, 0])
        }
    })
    .save(&path)
    .unwrap();
    path
}

// =========================================================================
// Sample payloads
// =========================================================================

pub fn sample_store_brand() -> BrandIdentity {
    BrandIdentity {
        name: "TestStore".to_string(),
        voice: "friendly".to_string(),
        tone_keywords: vec!["fresh".to_string(), "local".to_string()],
        visual_style: "clean".to_string(),
        color_palette: ColorPalette {
            primary: "#E94560".to_string(),
            secondary: Some("#1A1A2E".to_string()),
            accent: Some("#FFCC00".to_string()),
            background: None,
        },
        logo: String::new(),
        tagline: None,
    }
}

pub fn sample_product_brand() -> BrandIdentity {
    BrandIdentity {
        name: "Acme".to_string(),
        voice: "bold".to_string(),
        tone_keywords: Vec::new(),
        visual_style: "modern".to_string(),
        color_palette: ColorPalette {
            primary: "#0F3460".to_string(),
            secondary: None,
            accent: None,
            background: None,
        },
        logo: String::new(),
        tagline: Some("Built to last".to_string()),
    }
}

pub fn sample_concept() -> CreativeConcept {
    CreativeConcept {
        big_idea: Some("Weeknight hero".to_string()),
        scene_description: "Kitchen counter at dusk".to_string(),
        mood: "warm".to_string(),
        color_direction: "amber highlights".to_string(),
        layout_archetype: "Hero Product with Stat Overlay".to_string(),
        product_placement: ProductPlacement {
            position: "center".to_string(),
            size: "balanced".to_string(),
            treatment: "soft shadow".to_string(),
        },
        focal_point: None,
    }
}

pub fn sample_copy() -> AdCopy {
    AdCopy {
        headline: "Dinner in 15 minutes".to_string(),
        subheadline: Some("Fresh picks, zero fuss".to_string()),
        body_copy: "Everything you need for a weeknight win, ready when you are.".to_string(),
        cta_text: "Shop now".to_string(),
        cta_urgency: Some("Ends Sunday".to_string()),
        legal_disclaimer: Some("While supplies last.".to_string()),
    }
}

pub fn sample_channel(width: u32, height: u32) -> ChannelSpec {
    ChannelSpec {
        platform: "instagram".to_string(),
        placement: "feed".to_string(),
        dimensions: Dimensions { width, height },
        text_limits: None,
    }
}

/// A complete input with background and product fixtures written to `dir`.
pub fn sample_input(dir: &Path, width: u32, height: u32) -> CompositionInput {
    let background = write_gradient_png(dir, "background.png", 640, 480);
    let product = write_cutout_png(dir, "product.png", 400, 300);
    CompositionInput::builder()
        .background_path(background)
        .product_source(product.to_string_lossy())
        .copy(sample_copy())
        .concept(sample_concept())
        .store_brand(sample_store_brand())
        .channel(sample_channel(width, height))
        .output_path(dir.join("out").join("ad.png"))
        .build()
        .unwrap()
}
