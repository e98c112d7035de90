//! Cover-fit crop geometry.

use serde::{Deserialize, Serialize};

/// Source-space rectangle to sample when filling a target of a
/// different aspect ratio. Coordinates are fractional source pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CropRect {
    pub sx: f32,
    pub sy: f32,
    pub s_width: f32,
    pub s_height: f32,
}

/// Maximal centered source rectangle that fills the target with no
/// letterboxing when scaled (object-fit: cover).
///
/// The result is always contained in the source bounds and centered on
/// both axes. Dimensions must be non-zero; the compositor validates
/// before calling.
pub fn cover_crop(source_w: u32, source_h: u32, target_w: u32, target_h: u32) -> CropRect {
    let source_w = source_w as f32;
    let source_h = source_h as f32;
    let source_ratio = source_w / source_h;
    let target_ratio = target_w as f32 / target_h as f32;

    if source_ratio > target_ratio {
        // Source relatively wider: crop width, keep full height
        let s_width = source_h * target_ratio;
        CropRect {
            sx: (source_w - s_width) / 2.0,
            sy: 0.0,
            s_width,
            s_height: source_h,
        }
    } else {
        // Source relatively taller or equal: crop height, keep full width
        let s_height = source_w / target_ratio;
        CropRect {
            sx: 0.0,
            sy: (source_h - s_height) / 2.0,
            s_width: source_w,
            s_height,
        }
    }
}
