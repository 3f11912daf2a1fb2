//! Pure calculation functions for product sizing and placement.
//!
//! All functions here are pure and testable without any I/O or images.
//! Fractional results truncate toward zero.

use super::params::{Anchor, SizeCategory};
use crate::layout::LayoutZone;

/// Target length of the product's longer edge.
///
/// # Examples
/// ```
/// # use ad_compositor::imaging::{calculate_product_size, SizeCategory};
/// assert_eq!(calculate_product_size((1080, 1080), SizeCategory::Dominant), 702);
/// assert_eq!(calculate_product_size((1080, 1920), SizeCategory::Subtle), 324);
/// ```
pub fn calculate_product_size(canvas: (u32, u32), size: SizeCategory) -> u32 {
    let base = canvas.0.min(canvas.1);
    (base as f64 * size.multiplier()) as u32
}

/// Dimensions that fit `source` within `max_edge` on its longer side.
///
/// Never upscales: sources already within the limit come back unchanged.
/// Both edges stay at least 1 pixel.
pub fn calculate_fit_dimensions(source: (u32, u32), max_edge: u32) -> (u32, u32) {
    let (w, h) = source;
    let longest = w.max(h);
    if longest <= max_edge || longest == 0 {
        return source;
    }
    let scale = max_edge as f64 / longest as f64;
    (
        ((w as f64 * scale) as u32).max(1),
        ((h as f64 * scale) as u32).max(1),
    )
}

/// Dimensions that fit `source` inside a `max_w × max_h` box, never upscaling.
pub fn calculate_box_fit(source: (u32, u32), max_w: u32, max_h: u32) -> (u32, u32) {
    let (w, h) = source;
    if w == 0 || h == 0 || (w <= max_w && h <= max_h) {
        return source;
    }
    let scale = (max_w as f64 / w as f64).min(max_h as f64 / h as f64);
    (
        ((w as f64 * scale) as u32).max(1),
        ((h as f64 * scale) as u32).max(1),
    )
}

/// Top-left position for a product inside `zone`, clamped to the canvas.
///
/// Edge anchors inset by 15% (left) or 10% (right, top, bottom) of the zone;
/// corners apply 10% on both axes. A product larger than the canvas sits at 0.
pub fn calculate_product_position(
    canvas: (u32, u32),
    product: (u32, u32),
    anchor: Anchor,
    zone: &LayoutZone,
) -> (u32, u32) {
    let (canvas_w, canvas_h) = (canvas.0 as i64, canvas.1 as i64);
    let (prod_w, prod_h) = (product.0 as i64, product.1 as i64);

    let (x1, y1, x2, y2) = zone.get_bounds(canvas.0, canvas.1);
    let (x1, y1, x2, y2) = (x1 as i64, y1 as i64, x2 as i64, y2 as i64);
    let zone_w = x2 - x1;
    let zone_h = y2 - y1;

    let inset = |len: i64, fraction: f64| (len as f64 * fraction) as i64;
    let center_x = x1 + zone_w / 2 - prod_w / 2;
    let center_y = y1 + zone_h / 2 - prod_h / 2;
    let left_x = x1 + inset(zone_w, 0.1);
    let right_x = x2 - prod_w - inset(zone_w, 0.1);
    let top_y = y1 + inset(zone_h, 0.1);
    let bottom_y = y2 - prod_h - inset(zone_h, 0.1);

    let (x, y) = match anchor {
        Anchor::Center => (center_x, center_y),
        Anchor::Left => (x1 + inset(zone_w, 0.15), center_y),
        Anchor::Right => (right_x, center_y),
        Anchor::Top => (center_x, top_y),
        Anchor::Bottom => (center_x, bottom_y),
        Anchor::TopLeft => (left_x, top_y),
        Anchor::TopRight => (right_x, top_y),
        Anchor::BottomLeft => (left_x, bottom_y),
        Anchor::BottomRight => (right_x, bottom_y),
    };

    // Upper bound first so an oversized product lands on 0
    let x = x.min(canvas_w - prod_w).max(0);
    let y = y.min(canvas_h - prod_h).max(0);
    (x as u32, y as u32)
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL: LayoutZone = LayoutZone::new(0.0, 1.0, 0.0, 1.0);
    const HERO_PRODUCT: LayoutZone = LayoutZone::new(0.15, 0.85, 0.10, 0.70);

    // =========================================================================
    // calculate_product_size tests
    // =========================================================================

    #[test]
    fn product_size_per_category_square() {
        let canvas = (1080, 1080);
        assert_eq!(calculate_product_size(canvas, SizeCategory::Dominant), 702);
        assert_eq!(calculate_product_size(canvas, SizeCategory::Balanced), 486);
        assert_eq!(calculate_product_size(canvas, SizeCategory::Subtle), 324);
    }

    #[test]
    fn product_size_uses_short_edge() {
        assert_eq!(
            calculate_product_size((1920, 1080), SizeCategory::Balanced),
            486
        );
    }

    #[test]
    fn product_size_unknown_is_balanced() {
        let size = SizeCategory::parse("huge");
        assert_eq!(calculate_product_size((1080, 1080), size), 486);
    }

    // =========================================================================
    // calculate_fit_dimensions tests
    // =========================================================================

    #[test]
    fn fit_downscales_preserving_aspect() {
        // 2000x1000 into 500 → scale 0.25
        assert_eq!(calculate_fit_dimensions((2000, 1000), 500), (500, 250));
    }

    #[test]
    fn fit_truncates() {
        // 1000x333 into 500 → 500x166.5 → 166
        assert_eq!(calculate_fit_dimensions((1000, 333), 500), (500, 166));
    }

    #[test]
    fn fit_never_upscales() {
        assert_eq!(calculate_fit_dimensions((300, 200), 486), (300, 200));
        assert_eq!(calculate_fit_dimensions((486, 100), 486), (486, 100));
    }

    #[test]
    fn fit_keeps_one_pixel_minimum() {
        assert_eq!(calculate_fit_dimensions((10_000, 1), 100), (100, 1));
    }

    #[test]
    fn box_fit_limits_both_axes() {
        assert_eq!(calculate_box_fit((400, 100), 200, 200), (200, 50));
        assert_eq!(calculate_box_fit((100, 400), 200, 100), (25, 100));
        assert_eq!(calculate_box_fit((50, 50), 200, 100), (50, 50));
    }

    // =========================================================================
    // calculate_product_position tests
    // =========================================================================

    #[test]
    fn position_center_of_zone() {
        // Zone 162..918 x 108..756, center (540, 432)
        let pos = calculate_product_position((1080, 1080), (200, 100), Anchor::Center, &HERO_PRODUCT);
        assert_eq!(pos, (440, 382));
    }

    #[test]
    fn position_left_uses_fifteen_percent_inset() {
        let pos = calculate_product_position((1000, 1000), (100, 100), Anchor::Left, &FULL);
        assert_eq!(pos, (150, 450));
    }

    #[test]
    fn position_right_and_bottom_use_ten_percent_inset() {
        let right = calculate_product_position((1000, 1000), (100, 100), Anchor::Right, &FULL);
        assert_eq!(right, (800, 450));
        let bottom = calculate_product_position((1000, 1000), (100, 100), Anchor::Bottom, &FULL);
        assert_eq!(bottom, (450, 800));
        let top = calculate_product_position((1000, 1000), (100, 100), Anchor::Top, &FULL);
        assert_eq!(top, (450, 100));
    }

    #[test]
    fn position_corners() {
        let canvas = (1000, 1000);
        let product = (100, 100);
        assert_eq!(
            calculate_product_position(canvas, product, Anchor::BottomRight, &FULL),
            (800, 800)
        );
        assert_eq!(
            calculate_product_position(canvas, product, Anchor::TopLeft, &FULL),
            (100, 100)
        );
    }

    #[test]
    fn position_clamped_when_product_exceeds_zone() {
        let zone = LayoutZone::new(0.9, 1.0, 0.9, 1.0);
        let (x, y) = calculate_product_position((1000, 1000), (400, 300), Anchor::Left, &zone);
        assert!(x + 400 <= 1000);
        assert!(y + 300 <= 1000);
    }

    #[test]
    fn position_oversized_product_is_zero() {
        let pos = calculate_product_position((100, 100), (300, 300), Anchor::Center, &FULL);
        assert_eq!(pos, (0, 0));
    }

    #[test]
    fn position_always_within_canvas() {
        let anchors = [
            Anchor::Center,
            Anchor::Left,
            Anchor::Right,
            Anchor::Top,
            Anchor::Bottom,
            Anchor::TopLeft,
            Anchor::TopRight,
            Anchor::BottomLeft,
            Anchor::BottomRight,
        ];
        let zones = [FULL, HERO_PRODUCT, LayoutZone::new(0.0, 0.05, 0.95, 1.0)];
        for anchor in anchors {
            for zone in &zones {
                for product in [(10, 10), (500, 900), (1080, 1080)] {
                    let (x, y) = calculate_product_position((1080, 1080), product, anchor, zone);
                    assert!(x + product.0 <= 1080, "{anchor:?} {product:?}");
                    assert!(y + product.1 <= 1080, "{anchor:?} {product:?}");
                }
            }
        }
    }
}
