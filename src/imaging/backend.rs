//! Background-removal (matting) collaborator.
//!
//! The [`BackgroundRemover`] trait is the seam where a segmentation model
//! plugs in: it takes an opaque product photo and returns the same image
//! with the background made transparent.
//!
//! The crate ships [`ColorKeyRemover`](super::color_key::ColorKeyRemover),
//! which keys out the photo's border color. It handles studio shots on flat
//! backdrops; anything harder needs an injected model.

use image::RgbaImage;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MattingError {
    #[error("background removal failed: {0}")]
    Failed(String),
    #[error("matting changed image size from {expected:?} to {actual:?}")]
    SizeMismatch {
        expected: (u32, u32),
        actual: (u32, u32),
    },
}

/// Separates a product from its background.
///
/// Implementations must be `Send + Sync`: one remover is shared by every
/// composition running on the pool.
pub trait BackgroundRemover: Send + Sync {
    /// Return `image` with background pixels made transparent. Output must
    /// keep the input dimensions.
    fn remove_background(&self, image: &RgbaImage) -> Result<RgbaImage, MattingError>;

    /// Short name for logs.
    fn name(&self) -> &str;
}

/// Run a remover and check it kept the image size.
pub fn run_matting(
    remover: &dyn BackgroundRemover,
    image: &RgbaImage,
) -> Result<RgbaImage, MattingError> {
    let matted = remover.remove_background(image)?;
    if matted.dimensions() != image.dimensions() {
        return Err(MattingError::SizeMismatch {
            expected: image.dimensions(),
            actual: matted.dimensions(),
        });
    }
    Ok(matted)
}
