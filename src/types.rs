//! Core data types shared across the capture pipeline.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single decoded video frame in packed RGB24.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoFrame {
    pub id: Uuid,
    /// Packed RGB data, `width * height * 3` bytes
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
    /// Seconds since the owning session's clock started
    pub timestamp: f64,
    pub source_id: String,
    pub size_bytes: usize,
}

impl VideoFrame {
    pub fn new(data: Vec<u8>, width: u32, height: u32, source_id: String) -> Self {
        let size_bytes = data.len();
        Self {
            id: Uuid::new_v4(),
            data,
            width,
            height,
            timestamp: 0.0,
            source_id,
            size_bytes,
        }
    }

    pub fn with_timestamp(mut self, timestamp: f64) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Whether the buffer length matches the declared dimensions.
    pub fn is_well_formed(&self) -> bool {
        self.data.len() == (self.width as usize) * (self.height as usize) * 3
    }
}

/// One instantaneous pose reading decoded from a single tracking matrix.
///
/// All four fields come from the same matrix; there are no partial updates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoseSample {
    /// Degrees, positive looking up
    pub pitch: i32,
    /// Degrees, positive looking left (camera-relative)
    pub yaw: i32,
    /// Degrees, positive tilting counter-clockwise
    pub roll: i32,
    /// Camera-relative depth, arbitrary non-negative unit
    pub distance: i32,
}

/// The published per-tick snapshot read by the UI and the compositor.
///
/// Replaced whole on every tick, never mutated in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoseState {
    pub pitch: i32,
    pub yaw: i32,
    pub roll: i32,
    pub distance: i32,
    pub volume: i32,
    /// Whether the most recent tick had a tracked face
    pub tracking: bool,
}

impl PoseState {
    pub fn apply_sample(&self, sample: PoseSample) -> Self {
        Self {
            pitch: sample.pitch,
            yaw: sample.yaw,
            roll: sample.roll,
            distance: sample.distance,
            volume: self.volume,
            tracking: true,
        }
    }
}

impl Default for PoseState {
    fn default() -> Self {
        Self {
            pitch: 0,
            yaw: 0,
            roll: 0,
            distance: 0,
            volume: 0,
            tracking: false,
        }
    }
}

/// Encoded image container formats for captured stills.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Png,
    Jpeg,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Png => "png",
            OutputFormat::Jpeg => "jpg",
        }
    }
}

/// Everything a still capture needs, snapshotted at trigger time.
///
/// Consumed exactly once by the compositor; results are deterministic
/// from this value plus the frozen source frame.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptureRequest {
    pub id: Uuid,
    /// Target output width in device pixels (pixel-ratio already applied)
    pub width: u32,
    /// Target output height in device pixels
    pub height: u32,
    pub pose: PoseState,
    pub format: OutputFormat,
    /// JPEG quality, ignored for PNG
    pub jpeg_quality: u8,
    pub requested_at: DateTime<Utc>,
}

impl CaptureRequest {
    pub fn new(width: u32, height: u32, pose: PoseState) -> Self {
        Self {
            id: Uuid::new_v4(),
            width,
            height,
            pose,
            format: OutputFormat::Png,
            jpeg_quality: 90,
            requested_at: Utc::now(),
        }
    }

    pub fn with_format(mut self, format: OutputFormat, jpeg_quality: u8) -> Self {
        self.format = format;
        self.jpeg_quality = jpeg_quality;
        self
    }
}

/// A finished still: the encoded composite plus its metadata.
#[derive(Debug, Clone)]
pub struct CapturedStill {
    pub id: Uuid,
    /// Opaque encoded image payload (PNG or JPEG)
    pub data: bytes::Bytes,
    pub width: u32,
    pub height: u32,
    pub format: OutputFormat,
    pub pose: PoseState,
    pub captured_at: DateTime<Utc>,
}

impl CapturedStill {
    /// Default on-disk file name, derived from the capture timestamp.
    pub fn suggested_file_name(&self, prefix: &str) -> String {
        format!(
            "{}_{}.{}",
            prefix,
            self.captured_at.format("%Y%m%d_%H%M%S%3f"),
            self.format.extension()
        )
    }
}
