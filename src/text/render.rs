//! Text layout and rendering onto the canvas.
//!
//! Free functions do the measuring and wrapping; [`TextRenderer`] binds a
//! [`FontBook`] and knows the styling of each ad element (headline, body,
//! CTA button, disclaimer, labels, text logos).

use super::fonts::{FontBook, FontWeight, SizedFont};
use crate::color::{WHITE, contrast_color, parse_or};
use crate::imaging::effects::fill_rounded_rect;
use crate::layout::LayoutZone;
use image::{Rgba, RgbaImage};

/// Legibility shadow drawn under every text block line.
pub const TEXT_SHADOW: Rgba<u8> = Rgba([0, 0, 0, 128]);
pub const TEXT_SHADOW_OFFSET: (i64, i64) = (2, 2);

pub const SUBHEADLINE_RATIO: f64 = 0.030;
pub const SUBHEADLINE_COLOR: Rgba<u8> = Rgba([0xCC, 0xCC, 0xCC, 255]);
pub const SUBHEADLINE_SPACING: u32 = 8;

pub const DISCLAIMER_PX: u32 = 12;
pub const DISCLAIMER_COLOR: Rgba<u8> = Rgba([0x99, 0x99, 0x99, 255]);
const DISCLAIMER_MARGIN: u32 = 10;

const TEXT_LOGO_MAX_PX: u32 = 30;

/// Horizontal alignment inside a text block's max width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Align {
    #[default]
    Left,
    Center,
    Right,
}

/// Greedy word wrap: a word joins the current line while the candidate
/// still measures within `max_width`. A word wider than `max_width` gets a
/// line to itself.
pub fn wrap_text(text: &str, font: &SizedFont<'_>, max_width: u32) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if current.is_empty() {
            current.push_str(word);
            continue;
        }
        let candidate = format!("{current} {word}");
        if font.measure(&candidate).0 <= max_width {
            current = candidate;
        } else {
            lines.push(std::mem::replace(&mut current, word.to_string()));
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// Bounding size of already-wrapped lines: widest line by summed heights
/// plus `spacing` between consecutive lines.
pub fn get_text_size(lines: &[String], font: &SizedFont<'_>, spacing: u32) -> (u32, u32) {
    let mut width = 0;
    let mut height = 0;
    for (i, line) in lines.iter().enumerate() {
        let (w, h) = font.measure(line);
        width = width.max(w);
        height += h;
        if i + 1 < lines.len() {
            height += spacing;
        }
    }
    (width, height)
}

/// Style of one wrapped text block.
#[derive(Debug, Clone, Copy)]
pub struct BlockStyle {
    pub color: Rgba<u8>,
    pub max_width: u32,
    pub spacing: u32,
    pub align: Align,
    pub shadow: bool,
}

/// Wrap and draw `text` with its top-left at `origin`.
///
/// Returns the block height: Σ(line height + spacing) − spacing, or 0 when
/// there is nothing to draw.
pub fn render_text_block(
    canvas: &mut RgbaImage,
    text: &str,
    origin: (i64, i64),
    font: &SizedFont<'_>,
    style: &BlockStyle,
) -> u32 {
    let lines = wrap_text(text, font, style.max_width);
    if lines.is_empty() {
        return 0;
    }

    let (x, y) = origin;
    let mut total = 0u32;
    for line in &lines {
        let (line_w, line_h) = font.measure(line);
        let slack = style.max_width as i64 - line_w as i64;
        let line_x = match style.align {
            Align::Left => x,
            Align::Center => x + slack.div_euclid(2),
            Align::Right => x + slack,
        };
        let line_y = y + total as i64;

        if style.shadow {
            let (dx, dy) = TEXT_SHADOW_OFFSET;
            font.draw(canvas, line, (line_x + dx, line_y + dy), TEXT_SHADOW);
        }
        font.draw(canvas, line, (line_x, line_y), style.color);
        total += line_h + style.spacing;
    }
    total - style.spacing
}

/// Renders styled ad elements with a shared [`FontBook`].
#[derive(Debug, Clone, Copy)]
pub struct TextRenderer<'a> {
    fonts: &'a FontBook,
}

impl<'a> TextRenderer<'a> {
    pub fn new(fonts: &'a FontBook) -> Self {
        Self { fonts }
    }

    pub fn fonts(&self) -> &'a FontBook {
        self.fonts
    }

    /// Bold headline at the zone's top-left. Returns the height used.
    pub fn render_headline(
        &self,
        canvas: &mut RgbaImage,
        text: &str,
        zone: &LayoutZone,
        color: Rgba<u8>,
        font_ratio: f64,
        align: Align,
    ) -> u32 {
        let (x1, y1, x2, _) = zone.get_bounds(canvas.width(), canvas.height());
        let size = font_px(canvas.height(), font_ratio);
        let font = self.fonts.sized(FontWeight::Bold, size);
        let style = BlockStyle {
            color,
            max_width: x2 - x1,
            spacing: (size as f64 * 0.3) as u32,
            align,
            shadow: true,
        };
        render_text_block(canvas, text, (x1 as i64, y1 as i64), &font, &style)
    }

    /// Semibold subheadline in the zone, `y_offset` below its top.
    pub fn render_subheadline(
        &self,
        canvas: &mut RgbaImage,
        text: &str,
        zone: &LayoutZone,
        y_offset: u32,
    ) -> u32 {
        let (x1, y1, x2, _) = zone.get_bounds(canvas.width(), canvas.height());
        let size = font_px(canvas.height(), SUBHEADLINE_RATIO);
        let font = self.fonts.sized(FontWeight::Semibold, size);
        let style = BlockStyle {
            color: SUBHEADLINE_COLOR,
            max_width: x2 - x1,
            spacing: SUBHEADLINE_SPACING,
            align: Align::Left,
            shadow: true,
        };
        let origin = (x1 as i64, y1 as i64 + y_offset as i64);
        render_text_block(canvas, text, origin, &font, &style)
    }

    /// White body copy in the zone, `y_offset` below its top.
    pub fn render_body(
        &self,
        canvas: &mut RgbaImage,
        text: &str,
        zone: &LayoutZone,
        y_offset: u32,
        font_ratio: f64,
        align: Align,
    ) -> u32 {
        let (x1, y1, x2, _) = zone.get_bounds(canvas.width(), canvas.height());
        let size = font_px(canvas.height(), font_ratio);
        let font = self.fonts.sized(FontWeight::Regular, size);
        let style = BlockStyle {
            color: WHITE,
            max_width: x2 - x1,
            spacing: (size as f64 * 0.4) as u32,
            align,
            shadow: true,
        };
        let origin = (x1 as i64, y1 as i64 + y_offset as i64);
        render_text_block(canvas, text, origin, &font, &style)
    }

    /// Rounded CTA button at the zone's top-left, filled with `accent_hex`
    /// and labelled in its contrast color. Returns the button size.
    pub fn render_cta_button(
        &self,
        canvas: &mut RgbaImage,
        text: &str,
        zone: &LayoutZone,
        accent_hex: &str,
        font_ratio: f64,
    ) -> (u32, u32) {
        let (x1, y1, _, _) = zone.get_bounds(canvas.width(), canvas.height());
        let size = font_px(canvas.height(), font_ratio);
        let font = self.fonts.sized(FontWeight::Semibold, size);
        let (text_w, text_h) = font.measure(text);

        let pad_x = (size as f64 * 1.2) as u32;
        let pad_y = (size as f64 * 0.6) as u32;
        let button = (text_w + pad_x * 2, text_h + pad_y * 2);
        let radius = (button.1 as f64 * 0.3) as u32;

        let fill = parse_or(accent_hex, WHITE);
        let label = parse_or(contrast_color(accent_hex), WHITE);
        let (bx, by) = (x1 as i64, y1 as i64);
        fill_rounded_rect(canvas, (bx, by), button, radius, fill);
        font.draw(canvas, text, (bx + pad_x as i64, by + pad_y as i64), label);

        tracing::debug!(text, x = bx, y = by, w = button.0, h = button.1, "cta button");
        button
    }

    /// Small disclaimer line, bottom-center by default.
    pub fn render_disclaimer(
        &self,
        canvas: &mut RgbaImage,
        text: &str,
        position: Option<(i64, i64)>,
    ) {
        let font = self.fonts.sized(FontWeight::Regular, DISCLAIMER_PX);
        let (text_w, text_h) = font.measure(text);
        let position = position.unwrap_or_else(|| {
            (
                (canvas.width() as i64 - text_w as i64).div_euclid(2),
                canvas.height() as i64 - text_h as i64 - DISCLAIMER_MARGIN as i64,
            )
        });
        font.draw(canvas, text, position, DISCLAIMER_COLOR);
    }

    /// Single unwrapped line without shadow (urgency microcopy, captions).
    pub fn render_label(
        &self,
        canvas: &mut RgbaImage,
        text: &str,
        position: (i64, i64),
        weight: FontWeight,
        px: u32,
        color: Rgba<u8>,
    ) -> (u32, u32) {
        let font = self.fonts.sized(weight, px);
        font.draw(canvas, text, position, color);
        font.measure(text)
    }

    /// Brand name in bold white, standing in for a missing logo.
    ///
    /// Starts at `min(max_h, 30)` px and shrinks until the name fits
    /// `max_w`. A name still too wide at the smallest size is cut from the
    /// end. Returns the drawn size.
    pub fn render_text_logo(
        &self,
        canvas: &mut RgbaImage,
        name: &str,
        position: (i64, i64),
        (max_w, max_h): (u32, u32),
    ) -> (u32, u32) {
        let mut px = max_h.min(TEXT_LOGO_MAX_PX).max(1);
        while px > 1 && self.fonts.sized(FontWeight::Bold, px).measure(name).0 > max_w {
            px -= 1;
        }

        let font = self.fonts.sized(FontWeight::Bold, px);
        let mut shown = name.to_string();
        while !shown.is_empty() && font.measure(&shown).0 > max_w {
            shown.pop();
        }
        shown.truncate(shown.trim_end().len());
        if shown.len() < name.len() {
            tracing::debug!(name, shown = %shown, max_w, "text logo cut to fit");
        }
        self.render_label(canvas, &shown, position, FontWeight::Bold, px, WHITE)
    }
}

/// Font size in pixels for a ratio of canvas height, truncated.
pub fn font_px(canvas_height: u32, ratio: f64) -> u32 {
    (canvas_height as f64 * ratio) as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::get_layout_spec;

    fn canvas(w: u32, h: u32) -> RgbaImage {
        RgbaImage::from_pixel(w, h, Rgba([20, 20, 20, 255]))
    }

    fn changed_pixels(a: &RgbaImage, b: &RgbaImage) -> usize {
        a.pixels().zip(b.pixels()).filter(|(p, q)| p != q).count()
    }

    // Built-in font at 8px: scale 1, 6px advance, 5px glyphs, 8px lines
    fn small(book: &FontBook) -> SizedFont<'_> {
        book.sized(FontWeight::Regular, 8)
    }

    #[test]
    fn wrap_empty_text_has_no_lines() {
        let book = FontBook::builtin();
        assert!(wrap_text("", &small(&book), 100).is_empty());
        assert!(wrap_text("   \n\t", &small(&book), 100).is_empty());
    }

    #[test]
    fn wrap_greedy() {
        let book = FontBook::builtin();
        // "AAA BBB" measures 41px, "AAA" 17px
        let lines = wrap_text("AAA BBB CCC", &small(&book), 41);
        assert_eq!(lines, vec!["AAA BBB", "CCC"]);
    }

    #[test]
    fn wrap_single_long_word_gets_own_line() {
        let book = FontBook::builtin();
        let lines = wrap_text("A VERYLONGWORD B", &small(&book), 20);
        assert_eq!(lines, vec!["A", "VERYLONGWORD", "B"]);
    }

    #[test]
    fn wrapped_lines_fit_unless_single_word() {
        let book = FontBook::builtin();
        let font = small(&book);
        let text = "Fresh picks for busy weeknights with zero compromise on taste";
        for line in wrap_text(text, &font, 90) {
            assert!(font.measure(&line).0 <= 90 || !line.contains(' '), "{line}");
        }
    }

    #[test]
    fn text_size_sums_heights_and_spacing() {
        let book = FontBook::builtin();
        let lines = vec!["AB".to_string(), "ABCD".to_string()];
        assert_eq!(get_text_size(&lines, &small(&book), 4), (23, 8 + 4 + 8));
        assert_eq!(get_text_size(&[], &small(&book), 4), (0, 0));
    }

    #[test]
    fn text_block_height_drops_trailing_spacing() {
        let book = FontBook::builtin();
        let mut img = canvas(200, 100);
        let style = BlockStyle {
            color: WHITE,
            max_width: 41,
            spacing: 3,
            align: Align::Left,
            shadow: true,
        };
        let h = render_text_block(&mut img, "AAA BBB CCC", (0, 0), &small(&book), &style);
        assert_eq!(h, 8 + 3 + 8);
        assert_eq!(render_text_block(&mut img, "", (0, 0), &small(&book), &style), 0);
    }

    #[test]
    fn text_block_alignment_shifts_lines() {
        let book = FontBook::builtin();
        let base = canvas(120, 20);
        let style = |align| BlockStyle {
            color: WHITE,
            max_width: 100,
            spacing: 0,
            align,
            shadow: false,
        };

        let mut right = base.clone();
        render_text_block(&mut right, "I", (0, 0), &small(&book), &style(Align::Right));
        let mut left = base.clone();
        render_text_block(&mut left, "I", (0, 0), &small(&book), &style(Align::Left));

        let first_lit = |img: &RgbaImage| {
            (0..img.width())
                .find(|&x| (0..img.height()).any(|y| img.get_pixel(x, y).0[0] == 255))
                .unwrap()
        };
        assert!(first_lit(&right) > first_lit(&left) + 80);
    }

    #[test]
    fn headline_draws_in_zone() {
        let book = FontBook::builtin();
        let renderer = TextRenderer::new(&book);
        let spec = get_layout_spec("Minimal Product Focus");
        let before = canvas(1080, 1080);
        let mut after = before.clone();
        let h = renderer.render_headline(
            &mut after,
            "Dinner in 15",
            &spec.headline_zone,
            Rgba([233, 69, 96, 255]),
            spec.headline_font_ratio,
            Align::Left,
        );
        assert!(h > 0);
        assert!(changed_pixels(&before, &after) > 0);
    }

    #[test]
    fn cta_button_size_includes_padding() {
        let book = FontBook::builtin();
        let renderer = TextRenderer::new(&book);
        let mut img = canvas(1080, 1080);
        let zone = LayoutZone::new(0.1, 0.5, 0.8, 0.95);
        // 0.028 * 1080 = 30px → scale 3, text 3 chars = 51 x 24
        let (w, h) = renderer.render_cta_button(&mut img, "BUY", &zone, "#FFCC00", 0.028);
        assert_eq!((w, h), (51 + 36 * 2, 24 + 18 * 2));
        let (x1, y1, _, _) = zone.get_bounds(1080, 1080);
        // Button fill visible just inside the left edge, vertically centered
        let px = img.get_pixel(x1 + 2, y1 + h / 2).0;
        assert_eq!(px, [255, 204, 0, 255]);
    }

    #[test]
    fn disclaimer_bottom_center() {
        let book = FontBook::builtin();
        let renderer = TextRenderer::new(&book);
        let before = canvas(400, 200);
        let mut after = before.clone();
        renderer.render_disclaimer(&mut after, "TERMS APPLY", None);
        // 12px → scale 1, 8px line, drawn at y = 200 - 8 - 10
        let touched_rows: Vec<u32> = (0..200)
            .filter(|&y| (0..400).any(|x| after.get_pixel(x, y) != before.get_pixel(x, y)))
            .collect();
        assert!(touched_rows.iter().all(|&y| (182..190).contains(&y)));
        assert!(!touched_rows.is_empty());
    }

    #[test]
    fn text_logo_shrinks_to_fit() {
        let book = FontBook::builtin();
        let renderer = TextRenderer::new(&book);
        let mut img = canvas(400, 100);
        let (w, _) = renderer.render_text_logo(&mut img, "FRESHMART", (0, 0), (60, 40));
        assert!(w <= 60);
    }

    #[test]
    fn long_text_logo_is_cut_to_max_width() {
        let book = FontBook::builtin();
        let renderer = TextRenderer::new(&book);
        let before = canvas(400, 100);
        let mut after = before.clone();
        let name = "NEIGHBORHOOD FARMERS MARKET COOPERATIVE";
        let (w, _) = renderer.render_text_logo(&mut after, name, (10, 10), (60, 40));
        assert!(w > 0 && w <= 60, "width {w}");

        // Nothing drawn past the box
        let spilled = (0..100)
            .flat_map(|y| (70..400).map(move |x| (x, y)))
            .any(|(x, y)| after.get_pixel(x, y) != before.get_pixel(x, y));
        assert!(!spilled);
    }

    #[test]
    fn font_px_truncates() {
        assert_eq!(font_px(1080, 0.045), 48);
        assert_eq!(font_px(1080, 0.028), 30);
        assert_eq!(font_px(1080, 0.018), 19);
    }
}
