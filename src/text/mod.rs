//! Text measurement, wrapping and rendering.
//!
//! - **Fonts**: [`FontBook`] resolves each weight through a fallback chain
//!   ending in a built-in bitmap font, so rendering never fails for want of
//!   a font file.
//! - **Render**: [`TextRenderer`] draws headline, subheadline, body, CTA
//!   button, disclaimer and text logos with the ad's styling rules.

mod builtin;
pub mod fonts;
pub mod render;

pub use fonts::{FontBook, FontFace, FontWeight, SizedFont};
pub use render::{
    Align, BlockStyle, TextRenderer, font_px, get_text_size, render_text_block, wrap_text,
};
