//! Product placement: load, matte, size, treat, position, composite.

use crate::assets::{AssetError, AssetLoader};
use crate::imaging::effects::{apply_treatment, has_transparency, resize_product_image};
use crate::imaging::backend::run_matting;
use crate::imaging::{
    BackgroundRemover, MattingError, PlacementDirective, calculate_product_position,
    calculate_product_size,
};
use crate::layout::LayoutZone;
use image::RgbaImage;
use image::imageops;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PlacementError {
    #[error(transparent)]
    Asset(#[from] AssetError),
    #[error(transparent)]
    Matting(#[from] MattingError),
}

/// Where and how the product ended up on the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlacedProduct {
    pub x: u32,
    pub y: u32,
    /// Size after treatment, including shadow margins or reflection.
    pub width: u32,
    pub height: u32,
    pub matted: bool,
}

/// Places product images using a shared loader and matting collaborator.
pub struct ProductPlacer<'a> {
    loader: &'a AssetLoader,
    remover: &'a dyn BackgroundRemover,
}

impl<'a> ProductPlacer<'a> {
    pub fn new(loader: &'a AssetLoader, remover: &'a dyn BackgroundRemover) -> Self {
        Self { loader, remover }
    }

    /// Composite the product at `source` onto `canvas` inside `zone`.
    ///
    /// Matting runs only when `remove_background` is set and the image has
    /// no meaningful transparency of its own.
    pub fn place(
        &self,
        canvas: &mut RgbaImage,
        source: &str,
        directive: &PlacementDirective,
        zone: &LayoutZone,
        remove_background: bool,
    ) -> Result<PlacedProduct, PlacementError> {
        let mut product = self.loader.load_image(source)?;
        tracing::info!(source, size = ?product.dimensions(), "loaded product image");

        let matted = remove_background && !has_transparency(&product);
        if matted {
            product = run_matting(self.remover, &product)?;
            tracing::info!(remover = self.remover.name(), "removed product background");
        }

        let target = calculate_product_size(canvas.dimensions(), directive.size);
        let product = resize_product_image(&product, target);
        tracing::debug!(target, size = ?product.dimensions(), "resized product");

        let product = apply_treatment(&product, directive.treatment);
        let (x, y) = calculate_product_position(
            canvas.dimensions(),
            product.dimensions(),
            directive.anchor,
            zone,
        );
        tracing::debug!(
            treatment = ?directive.treatment,
            anchor = ?directive.anchor,
            x,
            y,
            "product position"
        );

        imageops::overlay(canvas, &product, x as i64, y as i64);
        Ok(PlacedProduct {
            x,
            y,
            width: product.width(),
            height: product.height(),
            matted,
        })
    }
}
