//! # Ad Compositor
//!
//! Deterministic ad composition: takes a rendered background scene, a product
//! photo, brand identities, ad copy and a creative concept, and produces one
//! finished image at a channel's exact pixel dimensions.
//!
//! # Architecture: One Canvas, Fixed Stages
//!
//! A composition runs as a fixed sequence of stages over a call-local canvas:
//!
//! ```text
//! 1. Validate   CompositionInput        (typed inputs, required fields)
//! 2. Layout     archetype name → LayoutSpec   (exact, fuzzy, default)
//! 3. Background scene → canvas          (exact resize to channel size)
//! 4. Product    load → matte → size → treatment → position → composite
//! 5. Copy       headline, subheadline, body, CTA, urgency, disclaimer
//! 6. Logos      by brand strategy, text fallback for missing logos
//! 7. Caption    co-branded only
//! 8. Export     PNG, or JPEG flattened onto white
//! ```
//!
//! Each stage is a pure function of its inputs and the canvas, so the same
//! inputs and the same fonts yield pixel-identical output.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`compositor`] | Orchestrates the stages above; [`Compositor::compose`] and [`compose_ad`] |
//! | [`layout`] | Archetype registry, zone geometry and fuzzy name resolution |
//! | [`placer`] | Product placement pipeline on top of [`imaging`] |
//! | [`imaging`] | Sizing math, placement directives, shadow/reflection effects, matting seam |
//! | [`text`] | Font resolution with a built-in fallback, wrapping, text blocks, CTA button |
//! | [`color`] | Hex color parsing and contrast selection |
//! | [`assets`] | Image loading from local paths or HTTP(S) URLs |
//! | [`types`] | Input/output payloads and the validated [`CompositionInput`] |
//! | [`config`] | `config.toml` loading, merging over stock defaults, validation |
//! | [`output`] | CLI output formatting and file digests |
//!
//! # Design Decisions
//!
//! ## Typed Directives Over Free Text
//!
//! Concept providers describe placement in prose ("bottom-right", "soft
//! shadow", "dominant"). Those strings are converted once into
//! [`imaging::PlacementDirective`] tags, so geometry code never matches on
//! strings and unknown phrasing falls back to documented defaults.
//!
//! ## Fonts Never Fail
//!
//! Every weight resolves through brand fonts, configured system fonts and
//! finally a built-in bitmap face. A missing font file degrades the look of
//! an ad, never the ability to produce one.
//!
//! ## Matting Is a Collaborator
//!
//! Background removal sits behind [`imaging::BackgroundRemover`]. The default
//! is a pure-Rust color-key remover; tests inject a recording mock. The
//! compositor only decides *when* to matte (opaque product, flag set).

pub mod assets;
pub mod color;
pub mod compositor;
pub mod config;
pub mod imaging;
pub mod layout;
pub mod output;
pub mod placer;
pub mod text;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use compositor::{ComposeError, Compositor, compose_ad};
pub use types::{CompositionInput, ImageAsset};
