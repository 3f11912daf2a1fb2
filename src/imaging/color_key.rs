//! Border color-key background removal.
//!
//! Samples the outermost ring of pixels, takes their mean as the backdrop
//! color, and fades alpha for pixels close to it. Distance is Euclidean in
//! RGB; pixels within `tolerance` become fully transparent and pixels
//! between `tolerance` and `tolerance + feather` ramp back to opaque.

use super::backend::{BackgroundRemover, MattingError};
use image::{Rgba, RgbaImage};

/// Keys out the border color of a product photo.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorKeyRemover {
    pub tolerance: f32,
    pub feather: f32,
}

impl Default for ColorKeyRemover {
    fn default() -> Self {
        Self {
            tolerance: 40.0,
            feather: 30.0,
        }
    }
}

impl ColorKeyRemover {
    /// Mean color of the one-pixel border ring.
    pub fn border_color(image: &RgbaImage) -> Option<Rgba<u8>> {
        let (w, h) = image.dimensions();
        if w == 0 || h == 0 {
            return None;
        }

        let mut sum = [0u64; 3];
        let mut count = 0u64;
        for (x, y, px) in image.enumerate_pixels() {
            if x == 0 || y == 0 || x == w - 1 || y == h - 1 {
                for (acc, c) in sum.iter_mut().zip(px.0) {
                    *acc += c as u64;
                }
                count += 1;
            }
        }
        let mean = |i: usize| (sum[i] / count) as u8;
        Some(Rgba([mean(0), mean(1), mean(2), 255]))
    }
}

impl BackgroundRemover for ColorKeyRemover {
    fn remove_background(&self, image: &RgbaImage) -> Result<RgbaImage, MattingError> {
        let key = Self::border_color(image)
            .ok_or_else(|| MattingError::Failed("empty image".to_string()))?;

        let mut out = image.clone();
        for px in out.pixels_mut() {
            let dist = px
                .0
                .iter()
                .zip(key.0)
                .take(3)
                .map(|(&c, k)| (c as f32 - k as f32).powi(2))
                .sum::<f32>()
                .sqrt();
            let keep = if dist <= self.tolerance {
                0.0
            } else if self.feather > 0.0 {
                ((dist - self.tolerance) / self.feather).min(1.0)
            } else {
                1.0
            };
            px.0[3] = (px.0[3] as f32 * keep).round() as u8;
        }
        Ok(out)
    }

    fn name(&self) -> &str {
        "color-key"
    }
}
