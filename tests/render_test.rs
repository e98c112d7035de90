//! Integration tests for cover cropping and still composition.

use proptest::prelude::*;

use posecam::render::{compose_still, cover_crop, render_composite, RenderError};
use posecam::testing::synthetic_video_frame;
use posecam::types::{CaptureRequest, OutputFormat, PoseState, VideoFrame};

fn pose() -> PoseState {
    PoseState {
        pitch: -8,
        yaw: 21,
        roll: 4,
        distance: 37,
        volume: 48,
        tracking: true,
    }
}

#[test]
fn crop_matches_portrait_spec_case() {
    let rect = cover_crop(1920, 1080, 9, 16);
    assert_eq!(rect.s_height, 1080.0);
    assert!(rect.s_width <= 1920.0);
    assert!((rect.sx - (1920.0 - rect.s_width) / 2.0).abs() < 1e-3);
    assert_eq!(rect.sy, 0.0);
}

proptest! {
    /// INVARIANT: the crop rectangle is contained in the source and
    /// centered on both axes.
    #[test]
    fn crop_contained_and_centered(
        sw in 1u32..2000,
        sh in 1u32..2000,
        tw in 1u32..4000,
        th in 1u32..4000,
    ) {
        let rect = cover_crop(sw, sh, tw, th);
        prop_assert!(rect.s_width > 0.0 && rect.s_height > 0.0);
        prop_assert!(rect.sx >= 0.0 && rect.sy >= 0.0);
        prop_assert!(rect.sx + rect.s_width <= sw as f32 + 1e-2);
        prop_assert!(rect.sy + rect.s_height <= sh as f32 + 1e-2);
        // Centered: equal margins on both sides
        prop_assert!((rect.sx * 2.0 + rect.s_width - sw as f32).abs() < 1e-2);
        prop_assert!((rect.sy * 2.0 + rect.s_height - sh as f32).abs() < 1e-2);
    }

    /// INVARIANT: doubling the source scales the crop linearly.
    #[test]
    fn crop_is_scale_invariant(
        sw in 1u32..1000,
        sh in 1u32..1000,
        tw in 1u32..2000,
        th in 1u32..2000,
    ) {
        let rect = cover_crop(sw, sh, tw, th);
        let doubled = cover_crop(sw * 2, sh * 2, tw, th);
        prop_assert!((doubled.sx - rect.sx * 2.0).abs() < 1e-2);
        prop_assert!((doubled.sy - rect.sy * 2.0).abs() < 1e-2);
        prop_assert!((doubled.s_width - rect.s_width * 2.0).abs() < 1e-2);
        prop_assert!((doubled.s_height - rect.s_height * 2.0).abs() < 1e-2);
    }
}

#[test]
fn composite_is_byte_deterministic() {
    let frame = synthetic_video_frame(3, 320, 180);
    let request = CaptureRequest::new(216, 384, pose());

    let a = compose_still(&frame, &request).unwrap();
    let b = compose_still(&frame, &request).unwrap();
    assert_eq!(a, b);
}

#[test]
fn composite_jpeg_is_byte_deterministic() {
    let frame = synthetic_video_frame(7, 320, 180);
    let request =
        CaptureRequest::new(216, 384, pose()).with_format(OutputFormat::Jpeg, 85);

    let a = compose_still(&frame, &request).unwrap();
    let b = compose_still(&frame, &request).unwrap();
    assert_eq!(a, b);
    assert_eq!(&a[..2], &[0xFF, 0xD8]);
}

#[test]
fn output_size_tracks_request_not_source() {
    let frame = synthetic_video_frame(0, 640, 480);
    for &(w, h) in &[(100u32, 100u32), (540, 960), (1080, 1920)] {
        let rgb = render_composite(&frame, &pose(), w, h).unwrap();
        assert_eq!(rgb.len(), (w * h * 3) as usize);
    }
}

#[test]
fn capture_at_higher_resolution_preserves_proportions() {
    // The HUD panel must occupy the same fraction of the frame at both
    // resolutions; compare dark-panel coverage ratios.
    let frame = synthetic_video_frame(5, 640, 360);

    let small = render_composite(&frame, &pose(), 400, 712).unwrap();
    let large = render_composite(&frame, &pose(), 800, 1424).unwrap();

    let small_ratio = panel_fraction(&small, 400, 712);
    let large_ratio = panel_fraction(&large, 800, 1424);
    assert!(
        (small_ratio - large_ratio).abs() < 0.01,
        "panel fractions diverge: {} vs {}",
        small_ratio,
        large_ratio
    );
}

/// Fraction of pixels that are much darker than the synthetic gradient,
/// a rough proxy for panel area.
fn panel_fraction(rgb: &[u8], width: u32, height: u32) -> f32 {
    let dark = rgb
        .chunks(3)
        .filter(|px| px.iter().all(|&b| b < 40))
        .count();
    dark as f32 / (width * height) as f32
}

#[test]
fn malformed_source_aborts_without_output() {
    let mut frame = synthetic_video_frame(0, 64, 64);
    frame.data.pop();
    let request = CaptureRequest::new(64, 64, pose());
    assert!(matches!(
        compose_still(&frame, &request),
        Err(RenderError::SourceSizeMismatch { .. })
    ));
}

#[test]
fn empty_source_aborts_without_output() {
    let frame = VideoFrame::new(Vec::new(), 0, 0, "test".to_string());
    let request = CaptureRequest::new(64, 64, pose());
    assert!(matches!(
        compose_still(&frame, &request),
        Err(RenderError::EmptySource { .. })
    ));
}
