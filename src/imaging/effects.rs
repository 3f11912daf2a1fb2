//! Pixel-level effects on RGBA buffers.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Resize | `image::imageops::resize` with `Lanczos3` |
//! | Shadow blur | `image::imageops::blur` (Gaussian, sigma = radius) |
//! | Compositing | `image::imageops::overlay` (source-over) |
//! | Flip | `image::imageops::flip_vertical` |
//!
//! Rounded rectangles, single-pixel blending and JPEG flattening are done
//! here by hand since `image` has no drawing primitives.

use super::calculations::{calculate_box_fit, calculate_fit_dimensions};
use super::params::{ReflectionParams, ShadowParams, TreatmentKind};
use image::imageops::{self, FilterType};
use image::{Rgb, RgbImage, Rgba, RgbaImage};

/// Lowest alpha value in the image (255 for an empty image).
pub fn min_alpha(image: &RgbaImage) -> u8 {
    image.pixels().map(|p| p.0[3]).min().unwrap_or(255)
}

/// True when any pixel is meaningfully transparent (alpha below 250).
pub fn has_transparency(image: &RgbaImage) -> bool {
    min_alpha(image) < 250
}

/// Shrink so the longer edge is at most `max_edge`. Never upscales.
pub fn resize_product_image(image: &RgbaImage, max_edge: u32) -> RgbaImage {
    let (w, h) = calculate_fit_dimensions(image.dimensions(), max_edge);
    if (w, h) == image.dimensions() {
        return image.clone();
    }
    imageops::resize(image, w, h, FilterType::Lanczos3)
}

/// Shrink to fit a `max_w × max_h` box. Never upscales.
pub fn fit_within(image: &RgbaImage, max_w: u32, max_h: u32) -> RgbaImage {
    let (w, h) = calculate_box_fit(image.dimensions(), max_w, max_h);
    if (w, h) == image.dimensions() {
        return image.clone();
    }
    imageops::resize(image, w, h, FilterType::Lanczos3)
}

/// Add a blurred drop shadow behind the image.
///
/// The result grows by [`ShadowParams::extend`] on every side; the original
/// sits at `(extend, extend)` and the shadow at `extend + offset`.
pub fn apply_drop_shadow(image: &RgbaImage, params: &ShadowParams) -> RgbaImage {
    let extend = params.extend();
    let (w, h) = image.dimensions();
    let mut layer = RgbaImage::new(w + extend * 2, h + extend * 2);

    let shadow_x = extend as i64 + params.offset.0 as i64;
    let shadow_y = extend as i64 + params.offset.1 as i64;
    let [r, g, b, a] = params.color.0;
    for (x, y, px) in image.enumerate_pixels() {
        let alpha = (a as u32 * px.0[3] as u32 / 255) as u8;
        layer.put_pixel(
            (shadow_x + x as i64) as u32,
            (shadow_y + y as i64) as u32,
            Rgba([r, g, b, alpha]),
        );
    }

    let mut out = if params.blur_radius > 0 {
        imageops::blur(&layer, params.blur_radius as f32)
    } else {
        layer
    };
    imageops::overlay(&mut out, image, extend as i64, extend as i64);
    out
}

/// Append a faded, mirrored copy of the image below it.
///
/// Output height is `⌊h·(1 + height_fraction)⌋`. The reflection starts at
/// `opacity` times the source alpha and fades linearly toward the bottom of
/// the mirrored image.
pub fn apply_reflection(image: &RgbaImage, params: &ReflectionParams) -> RgbaImage {
    let (w, h) = image.dimensions();
    let total_h = (h as f64 * (1.0 + params.height_fraction)) as u32;
    let reflection_h = ((h as f64 * params.height_fraction) as u32).min(total_h - h);

    let mut out = RgbaImage::new(w, total_h);
    for (x, y, px) in image.enumerate_pixels() {
        out.put_pixel(x, y, *px);
    }

    let flipped = imageops::flip_vertical(image);
    for y in 0..reflection_h {
        let fade = params.opacity * (1.0 - y as f64 / h as f64);
        for x in 0..w {
            let [r, g, b, a] = flipped.get_pixel(x, y).0;
            let alpha = (a as f64 * fade) as u8;
            out.put_pixel(x, h + y, Rgba([r, g, b, alpha]));
        }
    }
    out
}

/// Apply the treatment's effect with its stock parameters.
pub fn apply_treatment(image: &RgbaImage, treatment: TreatmentKind) -> RgbaImage {
    match treatment {
        TreatmentKind::DropShadow => apply_drop_shadow(image, &ShadowParams::default()),
        TreatmentKind::Reflection => apply_reflection(image, &ReflectionParams::default()),
        TreatmentKind::SubtleShadow => apply_drop_shadow(image, &ShadowParams::subtle()),
    }
}

/// Source-over blend of `color`, scaled by `coverage` (0.0–1.0), onto one pixel.
///
/// Out-of-bounds coordinates are ignored.
pub fn blend_pixel(canvas: &mut RgbaImage, x: i64, y: i64, color: Rgba<u8>, coverage: f32) {
    if x < 0 || y < 0 || x >= canvas.width() as i64 || y >= canvas.height() as i64 {
        return;
    }
    let src_a = color.0[3] as f32 / 255.0 * coverage.clamp(0.0, 1.0);
    if src_a <= 0.0 {
        return;
    }

    let dst = canvas.get_pixel_mut(x as u32, y as u32);
    let dst_a = dst.0[3] as f32 / 255.0;
    let out_a = src_a + dst_a * (1.0 - src_a);
    for c in 0..3 {
        let blended =
            (color.0[c] as f32 * src_a + dst.0[c] as f32 * dst_a * (1.0 - src_a)) / out_a;
        dst.0[c] = blended.round().clamp(0.0, 255.0) as u8;
    }
    dst.0[3] = (out_a * 255.0).round() as u8;
}

/// Fill an anti-aliased rounded rectangle with top-left `(x, y)`.
pub fn fill_rounded_rect(
    canvas: &mut RgbaImage,
    (x, y): (i64, i64),
    (width, height): (u32, u32),
    radius: u32,
    color: Rgba<u8>,
) {
    let radius = radius.min(width / 2).min(height / 2) as f32;
    let (w, h) = (width as f32, height as f32);

    for dy in 0..height {
        for dx in 0..width {
            // Pixel center, distance measured against the nearest corner circle
            let px = dx as f32 + 0.5;
            let py = dy as f32 + 0.5;
            let cx = px.clamp(radius, w - radius);
            let cy = py.clamp(radius, h - radius);
            let dist = ((px - cx).powi(2) + (py - cy).powi(2)).sqrt();
            let coverage = if radius == 0.0 {
                1.0
            } else {
                (radius + 0.5 - dist).clamp(0.0, 1.0)
            };
            blend_pixel(canvas, x + dx as i64, y + dy as i64, color, coverage);
        }
    }
}

/// Composite onto a white background and drop alpha, for formats without it.
pub fn flatten_onto_white(image: &RgbaImage) -> RgbImage {
    RgbImage::from_fn(image.width(), image.height(), |x, y| {
        let [r, g, b, a] = image.get_pixel(x, y).0;
        let alpha = a as u32;
        let mix = |c: u8| ((c as u32 * alpha + 255 * (255 - alpha) + 127) / 255) as u8;
        Rgb([mix(r), mix(g), mix(b)])
    })
}
