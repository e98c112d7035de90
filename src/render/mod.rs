//! Still composition: mirrored video plus the HUD overlay, rendered at
//! an arbitrary output resolution and encoded to an opaque image buffer.

pub mod compose;
pub mod crop;
mod font;
pub mod hud;

pub use compose::{compose_still, encode_rgb, render_composite};
pub use crop::{cover_crop, CropRect};
pub use hud::{draw_hud, REFERENCE_WIDTH};

use thiserror::Error;

/// Errors from composition and encoding. All of these surface to the
/// caller as a capture failure; none leave partial output behind.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("source frame has empty dimensions: {width}x{height}")]
    EmptySource { width: u32, height: u32 },

    #[error("source frame data size mismatch: got {got} bytes, expected {expected}")]
    SourceSizeMismatch { got: usize, expected: usize },

    #[error("output dimensions are empty: {width}x{height}")]
    EmptyTarget { width: u32, height: u32 },

    #[error("image encoding failed: {0}")]
    Encode(#[from] image::ImageError),
}
