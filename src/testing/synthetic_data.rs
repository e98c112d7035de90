//! Synthetic frames, transforms, and audio windows.
//!
//! These mirror the shapes the live capabilities produce, so sessions
//! and renders can be exercised end to end in tests and in the CLI demo
//! mode with no hardware attached.

use crate::audio::{AudioAnalyser, AudioWindow, WINDOW_SIZE};
use crate::camera::FrameSource;
use crate::tracking::{FaceTracker, FaceTransform};
use crate::types::VideoFrame;

/// Create a synthetic RGB frame with a per-frame-number gradient so
/// consecutive frames differ.
pub fn synthetic_video_frame(frame_number: u64, width: u32, height: u32) -> VideoFrame {
    let mut data = vec![0u8; (width * height * 3) as usize];

    let base = (frame_number % 256) as u8;
    for y in 0..height {
        for x in 0..width {
            let idx = ((y * width + x) * 3) as usize;
            data[idx] = base.wrapping_add((x % 256) as u8);
            data[idx + 1] = base.wrapping_add((y % 256) as u8);
            data[idx + 2] = base.wrapping_add(((x + y) % 256) as u8);
        }
    }

    VideoFrame::new(data, width, height, "synthetic".to_string())
}

/// Build a row-major tracking matrix from Euler angles in degrees plus
/// a camera distance, in the convention the pose decoder reads back:
/// rotation composed yaw-about-Y, then pitch-about-X, then roll-about-Z,
/// translation in the fourth row with the face at negative Z.
pub fn transform_from_euler(pitch_deg: f32, yaw_deg: f32, roll_deg: f32, distance: f32) -> [f32; 16] {
    let p = pitch_deg.to_radians();
    let y = yaw_deg.to_radians();
    let r = roll_deg.to_radians();

    let (sp, cp) = p.sin_cos();
    let (sy, cy) = y.sin_cos();
    let (sr, cr) = r.sin_cos();

    [
        cy * cr + sy * sp * sr,
        -cy * sr + sy * sp * cr,
        sy * cp,
        0.0,
        cp * sr,
        cp * cr,
        -sp,
        0.0,
        -sy * cr + cy * sp * sr,
        sy * sr + cy * sp * cr,
        cy * cp,
        0.0,
        0.0,
        0.0,
        -distance,
        1.0,
    ]
}

/// Create a synthetic analysis window oscillating at the given
/// amplitude (0.0 = silence, 1.0 = full scale).
pub fn synthetic_audio_window(amplitude: f32, phase: u64) -> AudioWindow {
    let amplitude = amplitude.clamp(0.0, 1.0);
    let mut samples = Vec::with_capacity(WINDOW_SIZE);
    for i in 0..WINDOW_SIZE {
        let t = (phase as usize * WINDOW_SIZE + i) as f32 / 48_000.0;
        let value = (2.0 * std::f32::consts::PI * 440.0 * t).sin() * amplitude;
        samples.push((value * 128.0 + 128.0).clamp(0.0, 255.0) as u8);
    }
    AudioWindow::new(samples, phase as f64 * WINDOW_SIZE as f64 / 48_000.0)
}

/// Frame source producing gradient frames, fresh on every poll.
pub struct SyntheticCamera {
    width: u32,
    height: u32,
    frame_number: u64,
}

impl SyntheticCamera {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            frame_number: 0,
        }
    }
}

impl FrameSource for SyntheticCamera {
    fn poll_frame(&mut self) -> Option<VideoFrame> {
        self.frame_number += 1;
        Some(synthetic_video_frame(
            self.frame_number,
            self.width,
            self.height,
        ))
    }

    fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

/// Tracker reporting a fixed or slowly orbiting face pose.
pub struct SyntheticTracker {
    pitch: f32,
    yaw: f32,
    roll: f32,
    distance: f32,
    orbit: bool,
    calls: u64,
}

impl SyntheticTracker {
    /// A face held at one fixed pose.
    pub fn still(pitch: f32, yaw: f32, roll: f32, distance: f32) -> Self {
        Self {
            pitch,
            yaw,
            roll,
            distance,
            orbit: false,
            calls: 0,
        }
    }

    /// A face slowly sweeping its yaw back and forth, for demos.
    pub fn orbiting(distance: f32) -> Self {
        Self {
            pitch: 0.0,
            yaw: 0.0,
            roll: 0.0,
            distance,
            orbit: true,
            calls: 0,
        }
    }
}

impl FaceTracker for SyntheticTracker {
    fn track(&mut self, _frame: &VideoFrame, timestamp: f64) -> Option<FaceTransform> {
        self.calls += 1;
        let yaw = if self.orbit {
            (self.calls as f32 / 30.0).sin() * 40.0
        } else {
            self.yaw
        };
        Some(FaceTransform::new(
            transform_from_euler(self.pitch, yaw, self.roll, self.distance),
            timestamp,
        ))
    }
}

/// Analyser producing a constant-amplitude tone window on every poll.
pub struct SyntheticAnalyser {
    amplitude: f32,
    phase: u64,
}

impl SyntheticAnalyser {
    pub fn new(amplitude: f32) -> Self {
        Self {
            amplitude,
            phase: 0,
        }
    }
}

impl AudioAnalyser for SyntheticAnalyser {
    fn sample_window(&mut self) -> Option<AudioWindow> {
        self.phase += 1;
        Some(synthetic_audio_window(self.amplitude, self.phase))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_synthetic_frame_correct_size() {
        let frame = synthetic_video_frame(0, 320, 240);
        assert_eq!(frame.width, 320);
        assert_eq!(frame.height, 240);
        assert!(frame.is_well_formed());
    }

    #[test]
    fn test_synthetic_frames_differ() {
        let a = synthetic_video_frame(0, 64, 48);
        let b = synthetic_video_frame(1, 64, 48);
        assert_ne!(a.data[0], b.data[0]);
    }

    #[test]
    fn test_audio_window_size_and_center() {
        let window = synthetic_audio_window(0.0, 0);
        assert_eq!(window.samples.len(), WINDOW_SIZE);
        assert!(window.samples.iter().all(|&s| s == 128));
    }

    #[test]
    fn test_euler_translation_sign() {
        let matrix = transform_from_euler(0.0, 0.0, 0.0, 25.0);
        assert_eq!(matrix[14], -25.0);
        assert_eq!(matrix[15], 1.0);
    }

    #[test]
    fn test_synthetic_camera_reports_dimensions() {
        let mut camera = SyntheticCamera::new(160, 120);
        assert_eq!(camera.dimensions(), (160, 120));
        let frame = camera.poll_frame().unwrap();
        assert_eq!((frame.width, frame.height), (160, 120));
    }
}
