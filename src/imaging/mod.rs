//! Image processing for product placement, pure Rust on the `image` crate.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Resize** | `imageops::resize`, Lanczos3, never upscaling |
//! | **Drop shadow** | alpha-shaped layer + `imageops::blur` |
//! | **Reflection** | `imageops::flip_vertical` + linear alpha fade |
//! | **Matting** | [`BackgroundRemover`] collaborator, [`ColorKeyRemover`] default |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for size and position math (unit testable)
//! - **Parameters**: Tags and settings converted from free-text directives
//! - **Effects**: Pixel operations on RGBA buffers
//! - **Backend**: [`BackgroundRemover`] trait + [`ColorKeyRemover`]

pub mod backend;
mod calculations;
pub mod color_key;
pub mod effects;
mod params;

pub use backend::{BackgroundRemover, MattingError};
pub use calculations::{
    calculate_box_fit, calculate_fit_dimensions, calculate_product_position,
    calculate_product_size,
};
pub use color_key::ColorKeyRemover;
pub use params::{
    Anchor, PlacementDirective, Quality, ReflectionParams, ShadowParams, SizeCategory,
    TreatmentKind,
};
