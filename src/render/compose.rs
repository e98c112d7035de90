//! Composite rendering: mirrored cover-cropped video plus HUD, encoded
//! to an opaque image buffer.
//!
//! The draw is a pure function of (source frame, pose snapshot, target
//! resolution); nothing here reads live state, so a capture rendered
//! after the fact matches what was on screen when it was requested.

use std::io::Cursor;

use bytes::Bytes;
use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ImageFormat};

use crate::types::{CaptureRequest, OutputFormat, PoseState, VideoFrame};

use super::crop::cover_crop;
use super::hud::{draw_hud, REFERENCE_WIDTH};
use super::RenderError;

/// Render the full composite into a packed RGB buffer of the requested
/// output size.
pub fn render_composite(
    frame: &VideoFrame,
    pose: &PoseState,
    out_width: u32,
    out_height: u32,
) -> Result<Vec<u8>, RenderError> {
    if frame.width == 0 || frame.height == 0 {
        return Err(RenderError::EmptySource {
            width: frame.width,
            height: frame.height,
        });
    }
    if !frame.is_well_formed() {
        return Err(RenderError::SourceSizeMismatch {
            got: frame.data.len(),
            expected: (frame.width as usize) * (frame.height as usize) * 3,
        });
    }
    if out_width == 0 || out_height == 0 {
        return Err(RenderError::EmptyTarget {
            width: out_width,
            height: out_height,
        });
    }

    // Crop against the output aspect ratio, not the preview's: captures
    // must be self-consistent at whatever resolution was asked for.
    let crop = cover_crop(frame.width, frame.height, out_width, out_height);

    let mut out = vec![0u8; (out_width as usize) * (out_height as usize) * 3];
    for oy in 0..out_height {
        let v = (oy as f32 + 0.5) / out_height as f32;
        let sy = crop.sy + v * crop.s_height;
        for ox in 0..out_width {
            // Selfie view: mirror the horizontal axis before sampling
            let u = 1.0 - (ox as f32 + 0.5) / out_width as f32;
            let sx = crop.sx + u * crop.s_width;
            let rgb = sample_bilinear(&frame.data, frame.width, frame.height, sx, sy);
            let idx = ((oy * out_width + ox) as usize) * 3;
            out[idx..idx + 3].copy_from_slice(&rgb);
        }
    }

    let scale = out_width as f32 / REFERENCE_WIDTH;
    draw_hud(&mut out, out_width, out_height, pose, scale);

    Ok(out)
}

/// Encode a packed RGB buffer into the requested container format.
pub fn encode_rgb(
    rgb: Vec<u8>,
    width: u32,
    height: u32,
    format: OutputFormat,
    jpeg_quality: u8,
) -> Result<Bytes, RenderError> {
    let img = image::RgbImage::from_vec(width, height, rgb).ok_or(
        RenderError::SourceSizeMismatch {
            got: 0,
            expected: (width as usize) * (height as usize) * 3,
        },
    )?;
    let dynamic = DynamicImage::ImageRgb8(img);

    let mut cursor = Cursor::new(Vec::new());
    match format {
        OutputFormat::Png => dynamic.write_to(&mut cursor, ImageFormat::Png)?,
        OutputFormat::Jpeg => {
            let encoder = JpegEncoder::new_with_quality(&mut cursor, jpeg_quality);
            dynamic.write_with_encoder(encoder)?;
        }
    }
    Ok(Bytes::from(cursor.into_inner()))
}

/// Render and encode one still from a capture request.
pub fn compose_still(frame: &VideoFrame, request: &CaptureRequest) -> Result<Bytes, RenderError> {
    let rgb = render_composite(frame, &request.pose, request.width, request.height)?;
    encode_rgb(
        rgb,
        request.width,
        request.height,
        request.format,
        request.jpeg_quality,
    )
}

/// Sample the source at fractional coordinates with bilinear filtering.
/// Coordinates are clamped to the source bounds.
fn sample_bilinear(data: &[u8], width: u32, height: u32, x: f32, y: f32) -> [u8; 3] {
    let max_x = (width - 1) as f32;
    let max_y = (height - 1) as f32;
    let x = (x - 0.5).clamp(0.0, max_x);
    let y = (y - 0.5).clamp(0.0, max_y);

    let x0 = x.floor() as usize;
    let y0 = y.floor() as usize;
    let x1 = (x0 + 1).min(width as usize - 1);
    let y1 = (y0 + 1).min(height as usize - 1);
    let fx = x - x0 as f32;
    let fy = y - y0 as f32;

    let stride = width as usize * 3;
    let mut rgb = [0u8; 3];
    for c in 0..3 {
        let p00 = data[y0 * stride + x0 * 3 + c] as f32;
        let p10 = data[y0 * stride + x1 * 3 + c] as f32;
        let p01 = data[y1 * stride + x0 * 3 + c] as f32;
        let p11 = data[y1 * stride + x1 * 3 + c] as f32;
        let top = p00 + (p10 - p00) * fx;
        let bottom = p01 + (p11 - p01) * fx;
        rgb[c] = (top + (bottom - top) * fy).round().clamp(0.0, 255.0) as u8;
    }
    rgb
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid_frame(width: u32, height: u32, rgb: [u8; 3]) -> VideoFrame {
        let mut data = Vec::with_capacity((width * height * 3) as usize);
        for _ in 0..width * height {
            data.extend_from_slice(&rgb);
        }
        VideoFrame::new(data, width, height, "test".to_string())
    }

    /// Left half red, right half blue.
    fn split_frame(width: u32, height: u32) -> VideoFrame {
        let mut data = Vec::with_capacity((width * height * 3) as usize);
        for _ in 0..height {
            for x in 0..width {
                if x < width / 2 {
                    data.extend_from_slice(&[200, 0, 0]);
                } else {
                    data.extend_from_slice(&[0, 0, 200]);
                }
            }
        }
        VideoFrame::new(data, width, height, "test".to_string())
    }

    #[test]
    fn test_mirror_flips_horizontally() {
        let frame = split_frame(64, 64);
        let out = render_composite(&frame, &PoseState::default(), 64, 64).unwrap();
        // Sample along the bottom edge, well clear of the HUD panel
        let y = 62usize;
        let left = &out[(y * 64 + 2) * 3..(y * 64 + 2) * 3 + 3];
        let right = &out[(y * 64 + 61) * 3..(y * 64 + 61) * 3 + 3];
        // Source left was red, so mirrored output shows blue on the left
        assert!(left[2] > left[0], "left should be blue, got {:?}", left);
        assert!(right[0] > right[2], "right should be red, got {:?}", right);
    }

    #[test]
    fn test_composite_is_deterministic() {
        let frame = split_frame(96, 54);
        let pose = PoseState {
            pitch: 10,
            yaw: -20,
            roll: 3,
            distance: 40,
            volume: 61,
            tracking: true,
        };
        let a = render_composite(&frame, &pose, 200, 356).unwrap();
        let b = render_composite(&frame, &pose, 200, 356).unwrap();
        assert_eq!(a, b);

        let ea = encode_rgb(a, 200, 356, OutputFormat::Png, 90).unwrap();
        let eb = encode_rgb(b, 200, 356, OutputFormat::Png, 90).unwrap();
        assert_eq!(ea, eb);
    }

    #[test]
    fn test_output_resolution_is_independent_of_source() {
        let frame = solid_frame(640, 480, [9, 9, 9]);
        let out = render_composite(&frame, &PoseState::default(), 1080, 1920).unwrap();
        assert_eq!(out.len(), 1080 * 1920 * 3);
    }

    #[test]
    fn test_malformed_frame_is_rejected() {
        let mut frame = solid_frame(16, 16, [0, 0, 0]);
        frame.data.truncate(7);
        let err = render_composite(&frame, &PoseState::default(), 32, 32).unwrap_err();
        assert!(matches!(err, RenderError::SourceSizeMismatch { .. }));
    }

    #[test]
    fn test_empty_dimensions_are_rejected() {
        let frame = solid_frame(16, 16, [0, 0, 0]);
        assert!(matches!(
            render_composite(&frame, &PoseState::default(), 0, 32),
            Err(RenderError::EmptyTarget { .. })
        ));

        let empty = VideoFrame::new(Vec::new(), 0, 16, "test".to_string());
        assert!(matches!(
            render_composite(&empty, &PoseState::default(), 32, 32),
            Err(RenderError::EmptySource { .. })
        ));
    }

    #[test]
    fn test_png_payload_has_signature() {
        let frame = solid_frame(32, 32, [40, 80, 120]);
        let request = CaptureRequest::new(64, 64, PoseState::default());
        let bytes = compose_still(&frame, &request).unwrap();
        assert_eq!(&bytes[..8], &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]);
    }

    #[test]
    fn test_jpeg_payload_has_signature() {
        let frame = solid_frame(32, 32, [40, 80, 120]);
        let request = CaptureRequest::new(64, 64, PoseState::default())
            .with_format(OutputFormat::Jpeg, 85);
        let bytes = compose_still(&frame, &request).unwrap();
        assert_eq!(&bytes[..2], &[0xFF, 0xD8]);
    }
}
