//! Composition pipeline.
//!
//! One [`Compositor::compose`] call turns a [`CompositionInput`] into a
//! finished ad on disk. Stages run in a fixed order on a call-local canvas:
//!
//! ```text
//! 1. Background   load, drop alpha, resize to channel size (Lanczos3)
//! 2. Layout       resolve the archetype to zones
//! 3. Product      load, matte, size, treat, position, composite
//! 4. Text         headline → subheadline → body → CTA → urgency
//! 5. Logos        per brand strategy, text fallback on failure
//! 6. Disclaimer   bottom-center, if present
//! 7. Export       PNG with alpha, or JPEG flattened onto white
//! ```
//!
//! Any failure in stages 1, 3 or 7 aborts the call. Logo failures are
//! logged and replaced with a text logo. The compositor holds only
//! read-only state, so one instance can serve many threads.

use crate::assets::{AssetError, AssetLoader, is_placeholder_logo, load_local};
use crate::color::{WHITE, parse_or};
use crate::config::CompositorConfig;
use crate::imaging::effects::{fit_within, flatten_onto_white};
use crate::imaging::{
    BackgroundRemover, ColorKeyRemover, MattingError, PlacementDirective, Quality,
};
use crate::layout::{LayoutSpec, get_layout_spec};
use crate::placer::{PlacementError, ProductPlacer};
use crate::text::{Align, FontBook, FontWeight, TextRenderer, font_px};
use crate::types::{
    AdCopy, BrandIdentity, BrandStrategy, ChannelSpec, CompositionInput, CreativeConcept,
    ImageAsset, OutputFormat, ValidationError,
};
use image::codecs::jpeg::JpegEncoder;
use image::imageops::{self, FilterType};
use image::{ImageFormat, Rgba, RgbaImage};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

const URGENCY_RATIO: f64 = 0.018;
const URGENCY_COLOR: Rgba<u8> = Rgba([0xFF, 0xCC, 0x00, 255]);
const CAPTION_COLOR: Rgba<u8> = Rgba([0xCC, 0xCC, 0xCC, 255]);
const HEADLINE_GAP: u32 = 20;
const SUBHEADLINE_GAP: u32 = 15;
const LOGO_GAP: u32 = 10;

#[derive(Error, Debug)]
pub enum ComposeError {
    #[error("invalid composition input: {0}")]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Asset(#[from] AssetError),
    #[error(transparent)]
    Matting(#[from] MattingError),
    #[error("failed to encode {}: {source}", path.display())]
    Encode {
        path: PathBuf,
        source: image::ImageError,
    },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<PlacementError> for ComposeError {
    fn from(err: PlacementError) -> Self {
        match err {
            PlacementError::Asset(e) => ComposeError::Asset(e),
            PlacementError::Matting(e) => ComposeError::Matting(e),
        }
    }
}

/// Deterministic ad composition engine.
pub struct Compositor {
    config: CompositorConfig,
    fonts: FontBook,
    loader: AssetLoader,
    remover: Box<dyn BackgroundRemover>,
}

impl Compositor {
    /// Build a compositor, resolving fonts from `config.fonts`.
    pub fn new(config: CompositorConfig) -> Self {
        let fonts = FontBook::load(&config.fonts);
        Self::with_fonts(config, fonts)
    }

    /// Build a compositor around an already-loaded [`FontBook`].
    pub fn with_fonts(config: CompositorConfig, fonts: FontBook) -> Self {
        let loader = AssetLoader::new(config.fetch.timeout());
        Self {
            config,
            fonts,
            loader,
            remover: Box::new(ColorKeyRemover::default()),
        }
    }

    /// Replace the default color-key matting with another collaborator.
    pub fn with_remover(mut self, remover: impl BackgroundRemover + 'static) -> Self {
        self.remover = Box::new(remover);
        self
    }

    pub fn config(&self) -> &CompositorConfig {
        &self.config
    }

    pub fn fonts(&self) -> &FontBook {
        &self.fonts
    }

    /// Run the full pipeline and write the ad to `input.output_path`.
    pub fn compose(&self, input: &CompositionInput) -> Result<ImageAsset, ComposeError> {
        input.validate()?;
        let segment = input.segment_id.as_deref().unwrap_or("-");
        let dims = input.channel.dimensions;
        tracing::info!(
            segment,
            width = dims.width,
            height = dims.height,
            "starting composition"
        );

        let mut canvas = self.load_background(&input.background_path, dims.width, dims.height)?;
        tracing::info!(segment, "background prepared");

        let layout = get_layout_spec(&input.concept.layout_archetype);
        tracing::info!(segment, layout = layout.name, "layout resolved");

        let directive = PlacementDirective::from(&input.concept.product_placement);
        let placed = ProductPlacer::new(&self.loader, self.remover.as_ref()).place(
            &mut canvas,
            &input.product_source,
            &directive,
            &layout.product_zone,
            input.remove_product_background,
        )?;
        tracing::info!(
            segment,
            x = placed.x,
            y = placed.y,
            matted = placed.matted,
            "product placed"
        );

        let text = TextRenderer::new(&self.fonts);
        self.render_copy(&mut canvas, &text, input, &layout);
        tracing::info!(segment, "text rendered");

        self.render_logos(&mut canvas, &text, input, &layout);
        tracing::info!(segment, strategy = ?input.brand_strategy, "logos added");

        if let Some(disclaimer) = non_blank(&input.copy.legal_disclaimer) {
            text.render_disclaimer(&mut canvas, disclaimer, None);
            tracing::info!(segment, "disclaimer added");
        }

        self.export(&canvas, &input.output_path, input.output_format)?;
        tracing::info!(segment, path = %input.output_path.display(), "saved ad");

        Ok(ImageAsset {
            path: input.output_path.clone(),
            width: canvas.width(),
            height: canvas.height(),
        })
    }

    fn load_background(
        &self,
        path: &Path,
        width: u32,
        height: u32,
    ) -> Result<RgbaImage, ComposeError> {
        let background = load_local(path)?.to_rgb8();
        let background = if background.dimensions() == (width, height) {
            background
        } else {
            imageops::resize(&background, width, height, FilterType::Lanczos3)
        };
        Ok(image::DynamicImage::ImageRgb8(background).to_rgba8())
    }

    fn render_copy(
        &self,
        canvas: &mut RgbaImage,
        text: &TextRenderer<'_>,
        input: &CompositionInput,
        layout: &LayoutSpec,
    ) {
        let brand = input.dominant_brand();
        let palette = &brand.color_palette;
        let primary = parse_or(&palette.primary, WHITE);
        let copy = &input.copy;

        let headline_h = text.render_headline(
            canvas,
            &copy.headline,
            &layout.headline_zone,
            primary,
            layout.headline_font_ratio,
            Align::Left,
        );
        let mut y_offset = headline_h + HEADLINE_GAP;

        if let Some(subheadline) = non_blank(&copy.subheadline) {
            let sub_h =
                text.render_subheadline(canvas, subheadline, &layout.headline_zone, y_offset);
            y_offset += sub_h + SUBHEADLINE_GAP;
        }
        tracing::debug!(headline_h, y_offset, "headline block");

        if !copy.body_copy.trim().is_empty() {
            text.render_body(
                canvas,
                &copy.body_copy,
                &layout.body_zone,
                0,
                layout.body_font_ratio,
                Align::Left,
            );
        }

        text.render_cta_button(
            canvas,
            &copy.cta_text,
            &layout.cta_zone,
            palette.accent_or_primary(),
            layout.cta_font_ratio,
        );

        if let Some(urgency) = non_blank(&copy.cta_urgency) {
            let (x1, _, _, y2) = layout.cta_zone.get_bounds(canvas.width(), canvas.height());
            text.render_label(
                canvas,
                urgency,
                (x1 as i64, y2 as i64 + 10),
                FontWeight::Regular,
                font_px(canvas.height(), URGENCY_RATIO),
                URGENCY_COLOR,
            );
        }
    }

    fn render_logos(
        &self,
        canvas: &mut RgbaImage,
        text: &TextRenderer<'_>,
        input: &CompositionInput,
        layout: &LayoutSpec,
    ) {
        let (x1, y1, x2, y2) = layout.logo_zone.get_bounds(canvas.width(), canvas.height());
        let (zone_w, zone_h) = (x2 - x1, y2 - y1);
        let origin = (x1 as i64, y1 as i64);

        match (input.brand_strategy, &input.product_brand) {
            (BrandStrategy::ProductDominant, Some(product)) => {
                self.place_logo(canvas, text, product, origin, (zone_w, zone_h));
                let caption = format!("Available at {}", input.store_brand.name);
                text.render_label(
                    canvas,
                    &caption,
                    (10, canvas.height() as i64 - 30),
                    FontWeight::Regular,
                    font_px(canvas.height(), URGENCY_RATIO),
                    CAPTION_COLOR,
                );
            }
            (BrandStrategy::CoBranded, product) => {
                let half = zone_w / 2;
                let max = (half.saturating_sub(LOGO_GAP), zone_h);
                self.place_logo(canvas, text, &input.store_brand, origin, max);
                if let Some(product) = product {
                    let right = (origin.0 + (half + LOGO_GAP) as i64, origin.1);
                    self.place_logo(canvas, text, product, right, max);
                }
            }
            (BrandStrategy::ProductDominant, None) => {
                tracing::warn!("product_dominant without a product brand, using store logo");
                self.place_logo(canvas, text, &input.store_brand, origin, (zone_w, zone_h));
            }
            (BrandStrategy::StoreDominant, _) => {
                self.place_logo(canvas, text, &input.store_brand, origin, (zone_w, zone_h));
            }
        }
    }

    /// Draw a brand's logo fitted to `max`, or its name when the logo is
    /// absent or fails to load.
    fn place_logo(
        &self,
        canvas: &mut RgbaImage,
        text: &TextRenderer<'_>,
        brand: &BrandIdentity,
        position: (i64, i64),
        max: (u32, u32),
    ) {
        if is_placeholder_logo(&brand.logo) {
            tracing::debug!(brand = %brand.name, logo = %brand.logo, "no usable logo reference");
            text.render_text_logo(canvas, &brand.name, position, max);
            return;
        }

        match self.loader.load_image(&brand.logo) {
            Ok(logo) => {
                let logo = fit_within(&logo, max.0, max.1);
                imageops::overlay(canvas, &logo, position.0, position.1);
            }
            Err(e) => {
                tracing::warn!(brand = %brand.name, error = %e, "logo load failed, using text logo");
                text.render_text_logo(canvas, &brand.name, position, max);
            }
        }
    }

    fn export(
        &self,
        canvas: &RgbaImage,
        path: &Path,
        format: OutputFormat,
    ) -> Result<(), ComposeError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let encode_err = |source| ComposeError::Encode {
            path: path.to_path_buf(),
            source,
        };

        if format.supports_alpha() {
            return canvas
                .save_with_format(path, ImageFormat::Png)
                .map_err(encode_err);
        }

        let quality = Quality::new(self.config.output.jpeg_quality.min(100) as u8);
        let flat = flatten_onto_white(canvas);
        let mut writer = BufWriter::new(File::create(path)?);
        JpegEncoder::new_with_quality(&mut writer, quality.value())
            .encode_image(&flat)
            .map_err(encode_err)?;
        writer.flush()?;
        Ok(())
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.trim().is_empty())
}

/// Compose one ad from its parts, validating them first.
#[allow(clippy::too_many_arguments)]
pub fn compose_ad(
    compositor: &Compositor,
    background_path: impl Into<PathBuf>,
    product_source: impl Into<String>,
    copy: AdCopy,
    concept: CreativeConcept,
    store_brand: BrandIdentity,
    product_brand: Option<BrandIdentity>,
    brand_strategy: BrandStrategy,
    channel: ChannelSpec,
    output_path: impl Into<PathBuf>,
    output_format: OutputFormat,
    remove_product_background: bool,
) -> Result<ImageAsset, ComposeError> {
    let input = CompositionInput::builder()
        .background_path(background_path)
        .product_source(product_source)
        .copy(copy)
        .concept(concept)
        .store_brand(store_brand)
        .product_brand(product_brand)
        .brand_strategy(brand_strategy)
        .channel(channel)
        .output_path(output_path)
        .output_format(output_format)
        .remove_product_background(remove_product_background)
        .build()?;
    compositor.compose(&input)
}
