//! HUD overlay drawing.
//!
//! All layout constants are expressed in units of a 400-pixel-wide
//! reference design and multiplied by one scale factor derived from the
//! output width, so the panel occupies the same proportion of the frame
//! at any capture resolution.

use crate::types::PoseState;

use super::font;

/// Fixed design reference width the HUD layout is authored against.
/// Calibration value, kept verbatim.
pub const REFERENCE_WIDTH: f32 = 400.0;

// Layout in reference units
const MARGIN: f32 = 16.0;
const PADDING: f32 = 12.0;
const PANEL_WIDTH: f32 = 132.0;
const CORNER_RADIUS: f32 = 10.0;
const LINE_HEIGHT: f32 = 18.0;
const SEPARATOR_GAP: f32 = 8.0;
const TEXT_SCALE: f32 = 1.6;
const STATUS_GAP: f32 = 12.0;
const STATUS_DOT_RADIUS: f32 = 5.0;

const PANEL_COLOR: [u8; 3] = [10, 10, 14];
const PANEL_ALPHA: f32 = 0.6;
const VALUE_COLOR: [u8; 3] = [240, 240, 245];
const SEPARATOR_ALPHA: f32 = 0.25;
const STATUS_LABEL_COLOR: [u8; 3] = [229, 231, 235];

const YAW_COLOR: [u8; 3] = [56, 189, 248];
const PITCH_COLOR: [u8; 3] = [74, 222, 128];
const ROLL_COLOR: [u8; 3] = [251, 191, 36];
const DIST_COLOR: [u8; 3] = [167, 139, 250];
const VOL_COLOR: [u8; 3] = [244, 114, 182];

const TRACKING_COLOR: [u8; 3] = [34, 197, 94];
const NO_FACE_COLOR: [u8; 3] = [239, 68, 68];

/// Draw the readout panel and status indicator onto an RGB canvas.
///
/// `scale` is `output_width / REFERENCE_WIDTH`, computed by the
/// compositor; every dimension below is multiplied by it.
pub fn draw_hud(data: &mut [u8], width: u32, height: u32, pose: &PoseState, scale: f32) {
    let x0 = MARGIN * scale;
    let y0 = MARGIN * scale;
    let panel_w = PANEL_WIDTH * scale;
    let panel_h = (PADDING * 2.0 + LINE_HEIGHT * 5.0 + SEPARATOR_GAP) * scale;

    fill_rounded_rect(
        data,
        width,
        height,
        x0,
        y0,
        x0 + panel_w,
        y0 + panel_h,
        CORNER_RADIUS * scale,
        PANEL_COLOR,
        PANEL_ALPHA,
    );

    let text_scale = TEXT_SCALE * scale;
    let text_x = x0 + PADDING * scale;
    let value_right = x0 + panel_w - PADDING * scale;
    let mut line_y = y0 + PADDING * scale;

    let angle_rows: [(&str, i32, [u8; 3]); 3] = [
        ("YAW", pose.yaw.abs(), YAW_COLOR),
        ("PITCH", pose.pitch.abs(), PITCH_COLOR),
        ("ROLL", pose.roll.abs(), ROLL_COLOR),
    ];
    for (label, value, color) in angle_rows {
        draw_row(
            data, width, height, text_x, value_right, line_y, text_scale, label, value, color,
        );
        line_y += LINE_HEIGHT * scale;
    }

    // Separator rule between the angle block and the scalar block
    let sep_y = line_y + (SEPARATOR_GAP / 2.0 - 0.5) * scale;
    fill_rect(
        data,
        width,
        height,
        text_x,
        sep_y,
        value_right,
        sep_y + 1.0 * scale,
        [255, 255, 255],
        SEPARATOR_ALPHA,
    );
    line_y += SEPARATOR_GAP * scale;

    let scalar_rows: [(&str, i32, [u8; 3]); 2] = [
        ("DIST", pose.distance, DIST_COLOR),
        ("VOL", pose.volume, VOL_COLOR),
    ];
    for (label, value, color) in scalar_rows {
        draw_row(
            data, width, height, text_x, value_right, line_y, text_scale, label, value, color,
        );
        line_y += LINE_HEIGHT * scale;
    }

    // Status indicator below the panel
    let (dot_color, status_text) = if pose.tracking {
        (TRACKING_COLOR, "TRACKING")
    } else {
        (NO_FACE_COLOR, "NO FACE")
    };
    let status_y = y0 + panel_h + STATUS_GAP * scale;
    let dot_r = STATUS_DOT_RADIUS * scale;
    fill_circle(
        data,
        width,
        height,
        x0 + dot_r,
        status_y + dot_r,
        dot_r,
        dot_color,
    );
    font::draw_text(
        data,
        width,
        height,
        x0 + dot_r * 2.0 + 6.0 * scale,
        status_y + dot_r - font::line_height(text_scale) / 2.0,
        status_text,
        text_scale,
        STATUS_LABEL_COLOR,
    );
}

#[allow(clippy::too_many_arguments)]
fn draw_row(
    data: &mut [u8],
    width: u32,
    height: u32,
    label_x: f32,
    value_right: f32,
    y: f32,
    text_scale: f32,
    label: &str,
    value: i32,
    label_color: [u8; 3],
) {
    font::draw_text(data, width, height, label_x, y, label, text_scale, label_color);
    let value_text = value.to_string();
    let value_x = value_right - font::text_width(&value_text, text_scale);
    font::draw_text(
        data, width, height, value_x, y, &value_text, text_scale, VALUE_COLOR,
    );
}

pub(super) fn blend_px(
    data: &mut [u8],
    width: u32,
    height: u32,
    x: i64,
    y: i64,
    color: [u8; 3],
    alpha: f32,
) {
    if x < 0 || y < 0 || x >= width as i64 || y >= height as i64 {
        return;
    }
    let idx = (y as usize * width as usize + x as usize) * 3;
    for c in 0..3 {
        let src = data[idx + c] as f32;
        let dst = src * (1.0 - alpha) + color[c] as f32 * alpha;
        data[idx + c] = dst.round().clamp(0.0, 255.0) as u8;
    }
}

#[allow(clippy::too_many_arguments)]
pub(super) fn fill_rect(
    data: &mut [u8],
    width: u32,
    height: u32,
    x0: f32,
    y0: f32,
    x1: f32,
    y1: f32,
    color: [u8; 3],
    alpha: f32,
) {
    let px0 = x0.round() as i64;
    let px1 = x1.round() as i64;
    let py0 = y0.round() as i64;
    let py1 = y1.round() as i64;
    for py in py0..py1 {
        for px in px0..px1 {
            blend_px(data, width, height, px, py, color, alpha);
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn fill_rounded_rect(
    data: &mut [u8],
    width: u32,
    height: u32,
    x0: f32,
    y0: f32,
    x1: f32,
    y1: f32,
    radius: f32,
    color: [u8; 3],
    alpha: f32,
) {
    let radius = radius.min((x1 - x0) / 2.0).min((y1 - y0) / 2.0).max(0.0);
    let px0 = x0.round() as i64;
    let px1 = x1.round() as i64;
    let py0 = y0.round() as i64;
    let py1 = y1.round() as i64;

    for py in py0..py1 {
        for px in px0..px1 {
            let fx = px as f32 + 0.5;
            let fy = py as f32 + 0.5;

            // Distance test only matters inside the corner squares
            let cx = if fx < x0 + radius {
                Some(x0 + radius)
            } else if fx > x1 - radius {
                Some(x1 - radius)
            } else {
                None
            };
            let cy = if fy < y0 + radius {
                Some(y0 + radius)
            } else if fy > y1 - radius {
                Some(y1 - radius)
            } else {
                None
            };

            if let (Some(cx), Some(cy)) = (cx, cy) {
                let dx = fx - cx;
                let dy = fy - cy;
                if dx * dx + dy * dy > radius * radius {
                    continue;
                }
            }
            blend_px(data, width, height, px, py, color, alpha);
        }
    }
}

fn fill_circle(
    data: &mut [u8],
    width: u32,
    height: u32,
    cx: f32,
    cy: f32,
    radius: f32,
    color: [u8; 3],
) {
    let px0 = (cx - radius).floor() as i64;
    let px1 = (cx + radius).ceil() as i64;
    let py0 = (cy - radius).floor() as i64;
    let py1 = (cy + radius).ceil() as i64;
    for py in py0..py1 {
        for px in px0..px1 {
            let dx = px as f32 + 0.5 - cx;
            let dy = py as f32 + 0.5 - cy;
            if dx * dx + dy * dy <= radius * radius {
                blend_px(data, width, height, px, py, color, 1.0);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blank(width: u32, height: u32) -> Vec<u8> {
        vec![0u8; (width * height * 3) as usize]
    }

    #[test]
    fn test_hud_draws_within_bounds() {
        let (w, h) = (400u32, 300u32);
        let mut data = blank(w, h);
        let pose = PoseState {
            pitch: -12,
            yaw: 34,
            roll: 5,
            distance: 30,
            volume: 55,
            tracking: true,
        };
        draw_hud(&mut data, w, h, &pose, 1.0);
        // Panel landed in the top-left corner
        let idx = ((MARGIN as u32 + 4) * w + MARGIN as u32 + 4) as usize * 3;
        assert_ne!(&data[idx..idx + 3], &[0, 0, 0]);
        // Bottom-right corner stays untouched
        let idx = ((h - 2) * w + (w - 2)) as usize * 3;
        assert_eq!(&data[idx..idx + 3], &[0, 0, 0]);
    }

    #[test]
    fn test_hud_scales_with_output_width() {
        let pose = PoseState::default();

        let mut small = blank(400, 300);
        draw_hud(&mut small, 400, 300, &pose, 1.0);
        let small_panel = count_non_black(&small);

        let mut large = blank(800, 600);
        draw_hud(&mut large, 800, 600, &pose, 2.0);
        let large_panel = count_non_black(&large);

        // Panel area grows ~4x when linear scale doubles
        let ratio = large_panel as f32 / small_panel as f32;
        assert!(
            (3.0..5.0).contains(&ratio),
            "panel pixel ratio {} out of range",
            ratio
        );
    }

    #[test]
    fn test_status_reflects_tracking_flag() {
        let (w, h) = (400u32, 300u32);
        let mut tracked = blank(w, h);
        draw_hud(
            &mut tracked,
            w,
            h,
            &PoseState {
                tracking: true,
                ..Default::default()
            },
            1.0,
        );
        let mut lost = blank(w, h);
        draw_hud(&mut lost, w, h, &PoseState::default(), 1.0);
        assert_ne!(tracked, lost);
    }

    #[test]
    fn test_tiny_canvas_does_not_panic() {
        let mut data = blank(8, 8);
        draw_hud(&mut data, 8, 8, &PoseState::default(), 8.0 / REFERENCE_WIDTH);
    }

    fn count_non_black(data: &[u8]) -> usize {
        data.chunks(3).filter(|px| px.iter().any(|&b| b != 0)).count()
    }
}
