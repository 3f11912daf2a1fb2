//! Typed inputs and outputs of a composition call.
//!
//! The collaborator payloads (brand, concept, copy, channel) mirror what the
//! upstream providers emit and are (de)serializable so job files can be read
//! from JSON. [`CompositionInputBuilder::build`] rejects incomplete requests
//! with a [`ValidationError`]; [`CompositionInput::validate`] holds the
//! content rules and runs again at the start of every composition, so an
//! input edited after `build` is still rejected before any stage runs.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("missing required field: {0}")]
    MissingField(&'static str),
    #[error("required field is empty: {0}")]
    EmptyField(&'static str),
    #[error("brand '{0}' has no primary color")]
    MissingPrimaryColor(String),
    #[error("channel dimensions must be positive, got {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },
}

/// Brand color scheme with hex codes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorPalette {
    pub primary: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secondary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accent: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background: Option<String>,
}

impl ColorPalette {
    /// Accent color, falling back to primary.
    pub fn accent_or_primary(&self) -> &str {
        self.accent.as_deref().unwrap_or(&self.primary)
    }
}

/// One brand's visual identity. Used for both the store and product brand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrandIdentity {
    pub name: String,
    #[serde(default)]
    pub voice: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tone_keywords: Vec<String>,
    #[serde(default)]
    pub visual_style: String,
    pub color_palette: ColorPalette,
    /// Local path or URL of the logo. Empty means no logo.
    #[serde(default)]
    pub logo: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tagline: Option<String>,
}

/// Which brand leads the composition.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BrandStrategy {
    #[default]
    StoreDominant,
    ProductDominant,
    CoBranded,
}

/// Free-text placement directives as emitted by the concept provider.
///
/// Converted once into [`PlacementDirective`](crate::imaging::PlacementDirective)
/// before the placer sees it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductPlacement {
    /// e.g. "center", "left-third", "bottom-right"
    pub position: String,
    /// "dominant", "balanced" or "subtle"
    pub size: String,
    /// e.g. "floating with shadow", "on reflective surface"
    pub treatment: String,
}

/// Creative concept for one segment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreativeConcept {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub big_idea: Option<String>,
    #[serde(default)]
    pub scene_description: String,
    #[serde(default)]
    pub mood: String,
    #[serde(default)]
    pub color_direction: String,
    /// Layout archetype name, matched fuzzily against the registry.
    pub layout_archetype: String,
    pub product_placement: ProductPlacement,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub focal_point: Option<String>,
}

/// Ad copy for one segment. Character limits are enforced upstream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdCopy {
    pub headline: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subheadline: Option<String>,
    pub body_copy: String,
    pub cta_text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cta_urgency: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub legal_disclaimer: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

/// Character limits for the copy provider. Carried but not enforced here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextLimits {
    pub headline_max_chars: u32,
    pub body_max_chars: u32,
    pub cta_max_chars: u32,
}

/// Target channel of the ad.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelSpec {
    #[serde(default)]
    pub platform: String,
    #[serde(default)]
    pub placement: String,
    pub dimensions: Dimensions,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_limits: Option<TextLimits>,
}

/// Encoding of the exported ad.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OutputFormat {
    #[default]
    #[serde(alias = "png")]
    Png,
    #[serde(alias = "jpeg", alias = "JPG", alias = "jpg")]
    Jpeg,
}

impl OutputFormat {
    pub fn supports_alpha(self) -> bool {
        matches!(self, OutputFormat::Png)
    }
}

/// Full, validated request for one ad.
#[derive(Debug, Clone, PartialEq)]
pub struct CompositionInput {
    pub background_path: PathBuf,
    /// Local path or http(s) URL.
    pub product_source: String,
    pub copy: AdCopy,
    pub concept: CreativeConcept,
    pub store_brand: BrandIdentity,
    pub product_brand: Option<BrandIdentity>,
    pub brand_strategy: BrandStrategy,
    pub channel: ChannelSpec,
    pub output_path: PathBuf,
    pub output_format: OutputFormat,
    pub remove_product_background: bool,
    /// Caller's correlation key (customer segment). Only used for logging.
    pub segment_id: Option<String>,
}

impl CompositionInput {
    pub fn builder() -> CompositionInputBuilder {
        CompositionInputBuilder::default()
    }

    /// Content rules for a complete input: non-blank paths, product source,
    /// headline and CTA, a primary color per brand, non-zero dimensions.
    ///
    /// Fields are public, so [`Compositor::compose`](crate::Compositor::compose)
    /// re-checks before any stage runs.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.background_path.as_os_str().is_empty() {
            return Err(ValidationError::EmptyField("background_path"));
        }
        if self.product_source.trim().is_empty() {
            return Err(ValidationError::EmptyField("product_source"));
        }
        if self.copy.headline.trim().is_empty() {
            return Err(ValidationError::EmptyField("copy.headline"));
        }
        if self.copy.cta_text.trim().is_empty() {
            return Err(ValidationError::EmptyField("copy.cta_text"));
        }
        check_brand(&self.store_brand)?;
        if let Some(product) = &self.product_brand {
            check_brand(product)?;
        }
        let Dimensions { width, height } = self.channel.dimensions;
        if width == 0 || height == 0 {
            return Err(ValidationError::InvalidDimensions { width, height });
        }
        if self.output_path.as_os_str().is_empty() {
            return Err(ValidationError::EmptyField("output_path"));
        }
        Ok(())
    }

    /// Brand whose colors drive the text.
    pub fn dominant_brand(&self) -> &BrandIdentity {
        match (&self.brand_strategy, &self.product_brand) {
            (BrandStrategy::ProductDominant, Some(product)) => product,
            _ => &self.store_brand,
        }
    }
}

/// Collects the fields of a [`CompositionInput`]; `build` validates them.
#[derive(Debug, Clone, Default)]
pub struct CompositionInputBuilder {
    background_path: Option<PathBuf>,
    product_source: Option<String>,
    copy: Option<AdCopy>,
    concept: Option<CreativeConcept>,
    store_brand: Option<BrandIdentity>,
    product_brand: Option<BrandIdentity>,
    brand_strategy: BrandStrategy,
    channel: Option<ChannelSpec>,
    output_path: Option<PathBuf>,
    output_format: OutputFormat,
    remove_product_background: Option<bool>,
    segment_id: Option<String>,
}

impl CompositionInputBuilder {
    pub fn background_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.background_path = Some(path.into());
        self
    }

    pub fn product_source(mut self, source: impl Into<String>) -> Self {
        self.product_source = Some(source.into());
        self
    }

    pub fn copy(mut self, copy: AdCopy) -> Self {
        self.copy = Some(copy);
        self
    }

    pub fn concept(mut self, concept: CreativeConcept) -> Self {
        self.concept = Some(concept);
        self
    }

    pub fn store_brand(mut self, brand: BrandIdentity) -> Self {
        self.store_brand = Some(brand);
        self
    }

    pub fn product_brand(mut self, brand: Option<BrandIdentity>) -> Self {
        self.product_brand = brand;
        self
    }

    pub fn brand_strategy(mut self, strategy: BrandStrategy) -> Self {
        self.brand_strategy = strategy;
        self
    }

    pub fn channel(mut self, channel: ChannelSpec) -> Self {
        self.channel = Some(channel);
        self
    }

    pub fn output_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_path = Some(path.into());
        self
    }

    pub fn output_format(mut self, format: OutputFormat) -> Self {
        self.output_format = format;
        self
    }

    pub fn remove_product_background(mut self, remove: bool) -> Self {
        self.remove_product_background = Some(remove);
        self
    }

    pub fn segment_id(mut self, id: Option<String>) -> Self {
        self.segment_id = id;
        self
    }

    /// Check presence of every required field, then the content rules of
    /// [`CompositionInput::validate`].
    pub fn build(self) -> Result<CompositionInput, ValidationError> {
        let missing = ValidationError::MissingField;
        let input = CompositionInput {
            background_path: self.background_path.ok_or(missing("background_path"))?,
            product_source: self.product_source.ok_or(missing("product_source"))?,
            copy: self.copy.ok_or(missing("copy"))?,
            concept: self.concept.ok_or(missing("concept"))?,
            store_brand: self.store_brand.ok_or(missing("store_brand"))?,
            product_brand: self.product_brand,
            brand_strategy: self.brand_strategy,
            channel: self.channel.ok_or(missing("channel"))?,
            output_path: self.output_path.ok_or(missing("output_path"))?,
            output_format: self.output_format,
            remove_product_background: self.remove_product_background.unwrap_or(true),
            segment_id: self.segment_id,
        };
        input.validate()?;
        Ok(input)
    }
}

fn check_brand(brand: &BrandIdentity) -> Result<(), ValidationError> {
    if brand.color_palette.primary.trim().is_empty() {
        return Err(ValidationError::MissingPrimaryColor(brand.name.clone()));
    }
    Ok(())
}

/// A composition job as read from a JSON file.
///
/// Required fields are optional here so a malformed job surfaces as a
/// [`ValidationError`] naming the field rather than a serde message.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CompositionRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub segment_id: Option<String>,
    pub background_path: Option<PathBuf>,
    pub product_image: Option<String>,
    pub copy: Option<AdCopy>,
    pub concept: Option<CreativeConcept>,
    pub store_brand: Option<BrandIdentity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_brand: Option<BrandIdentity>,
    #[serde(default)]
    pub brand_strategy: BrandStrategy,
    pub channel: Option<ChannelSpec>,
    pub output_path: Option<PathBuf>,
    #[serde(default)]
    pub output_format: OutputFormat,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remove_product_background: Option<bool>,
}

impl TryFrom<CompositionRequest> for CompositionInput {
    type Error = ValidationError;

    fn try_from(req: CompositionRequest) -> Result<Self, Self::Error> {
        let mut builder = CompositionInput::builder()
            .product_brand(req.product_brand)
            .brand_strategy(req.brand_strategy)
            .output_format(req.output_format)
            .segment_id(req.segment_id);
        if let Some(path) = req.background_path {
            builder = builder.background_path(path);
        }
        if let Some(source) = req.product_image {
            builder = builder.product_source(source);
        }
        if let Some(copy) = req.copy {
            builder = builder.copy(copy);
        }
        if let Some(concept) = req.concept {
            builder = builder.concept(concept);
        }
        if let Some(brand) = req.store_brand {
            builder = builder.store_brand(brand);
        }
        if let Some(channel) = req.channel {
            builder = builder.channel(channel);
        }
        if let Some(path) = req.output_path {
            builder = builder.output_path(path);
        }
        if let Some(remove) = req.remove_product_background {
            builder = builder.remove_product_background(remove);
        }
        builder.build()
    }
}

/// A finished ad on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageAsset {
    pub path: PathBuf,
    pub width: u32,
    pub height: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{sample_channel, sample_concept, sample_copy, sample_store_brand};

    fn complete_builder() -> CompositionInputBuilder {
        CompositionInput::builder()
            .background_path("/tmp/bg.png")
            .product_source("/tmp/product.png")
            .copy(sample_copy())
            .concept(sample_concept())
            .store_brand(sample_store_brand())
            .channel(sample_channel(1080, 1080))
            .output_path("/tmp/out/ad.png")
    }

    #[test]
    fn builder_with_all_fields_succeeds() {
        let input = complete_builder().build().unwrap();
        assert_eq!(input.brand_strategy, BrandStrategy::StoreDominant);
        assert_eq!(input.output_format, OutputFormat::Png);
        assert!(input.remove_product_background);
    }

    #[test]
    fn builder_missing_background_fails() {
        let result = CompositionInput::builder()
            .product_source("/tmp/product.png")
            .copy(sample_copy())
            .concept(sample_concept())
            .store_brand(sample_store_brand())
            .channel(sample_channel(1080, 1080))
            .output_path("/tmp/out.png")
            .build();
        assert_eq!(result, Err(ValidationError::MissingField("background_path")));
    }

    #[test]
    fn builder_missing_store_brand_fails() {
        let result = CompositionInput::builder()
            .background_path("/tmp/bg.png")
            .product_source("/tmp/product.png")
            .copy(sample_copy())
            .concept(sample_concept())
            .channel(sample_channel(1080, 1080))
            .output_path("/tmp/out.png")
            .build();
        assert_eq!(result, Err(ValidationError::MissingField("store_brand")));
    }

    #[test]
    fn builder_rejects_blank_primary_color() {
        let mut brand = sample_store_brand();
        brand.color_palette.primary = "  ".to_string();
        let result = complete_builder().store_brand(brand).build();
        assert!(matches!(
            result,
            Err(ValidationError::MissingPrimaryColor(name)) if name == "TestStore"
        ));
    }

    #[test]
    fn builder_rejects_zero_dimensions() {
        let result = complete_builder().channel(sample_channel(0, 1080)).build();
        assert_eq!(
            result,
            Err(ValidationError::InvalidDimensions {
                width: 0,
                height: 1080
            })
        );
    }

    #[test]
    fn builder_rejects_empty_headline() {
        let mut copy = sample_copy();
        copy.headline = String::new();
        let result = complete_builder().copy(copy).build();
        assert_eq!(result, Err(ValidationError::EmptyField("copy.headline")));
    }

    #[test]
    fn validate_catches_edits_after_build() {
        let mut input = complete_builder().build().unwrap();
        assert_eq!(input.validate(), Ok(()));

        input.channel.dimensions.width = 0;
        assert_eq!(
            input.validate(),
            Err(ValidationError::InvalidDimensions {
                width: 0,
                height: 1080
            })
        );

        input.channel.dimensions.width = 1080;
        input.product_source = " ".to_string();
        assert_eq!(
            input.validate(),
            Err(ValidationError::EmptyField("product_source"))
        );
    }

    #[test]
    fn dominant_brand_follows_strategy() {
        let mut product = sample_store_brand();
        product.name = "Acme".to_string();

        let input = complete_builder()
            .product_brand(Some(product.clone()))
            .brand_strategy(BrandStrategy::ProductDominant)
            .build()
            .unwrap();
        assert_eq!(input.dominant_brand().name, "Acme");

        let input = complete_builder()
            .product_brand(Some(product))
            .brand_strategy(BrandStrategy::CoBranded)
            .build()
            .unwrap();
        assert_eq!(input.dominant_brand().name, "TestStore");

        // product_dominant without a product brand falls back to the store
        let input = complete_builder()
            .brand_strategy(BrandStrategy::ProductDominant)
            .build()
            .unwrap();
        assert_eq!(input.dominant_brand().name, "TestStore");
    }

    #[test]
    fn request_json_converts_to_input() {
        let json = r##"{
            "segment_id": "icp-commuters",
            "background_path": "scenes/commute.png",
            "product_image": "https://cdn.example.org/headphones.png",
            "copy": {
                "headline": "Your Focus, Engineered",
                "body_copy": "Noise-canceling for the daily grind.",
                "cta_text": "Shop Now"
            },
            "concept": {
                "layout_archetype": "Problem/Solution Split",
                "product_placement": {
                    "position": "right",
                    "size": "balanced",
                    "treatment": "on reflective surface"
                }
            },
            "store_brand": {
                "name": "TestStore",
                "color_palette": { "primary": "#E94560", "accent": "#16213E" },
                "logo": ""
            },
            "brand_strategy": "co_branded",
            "channel": { "platform": "Instagram", "dimensions": { "width": 1080, "height": 1350 } },
            "output_path": "out/commuters.jpg",
            "output_format": "jpeg"
        }"##;
        let request: CompositionRequest = serde_json::from_str(json).unwrap();
        let input = CompositionInput::try_from(request).unwrap();
        assert_eq!(input.segment_id.as_deref(), Some("icp-commuters"));
        assert_eq!(input.brand_strategy, BrandStrategy::CoBranded);
        assert_eq!(input.output_format, OutputFormat::Jpeg);
        assert_eq!(input.channel.dimensions.height, 1350);
        assert_eq!(input.store_brand.color_palette.accent_or_primary(), "#16213E");
    }

    #[test]
    fn request_missing_copy_is_validation_error() {
        let json = r##"{
            "background_path": "bg.png",
            "product_image": "p.png",
            "output_path": "out.png"
        }"##;
        let request: CompositionRequest = serde_json::from_str(json).unwrap();
        let result = CompositionInput::try_from(request);
        assert_eq!(result, Err(ValidationError::MissingField("copy")));
    }

    #[test]
    fn output_format_alpha_support() {
        assert!(OutputFormat::Png.supports_alpha());
        assert!(!OutputFormat::Jpeg.supports_alpha());
    }
}
