//! Live video frame source.
//!
//! The tick loop never waits on the camera: decoded frames land in a
//! single latest-frame slot from the capture callback, and each tick
//! drains the slot. An empty slot means "no fresh frame this tick" and
//! the previous pose is carried forward.

use std::sync::{Arc, Mutex};

use nokhwa::pixel_format::RgbFormat;
use nokhwa::utils::{CameraFormat, CameraIndex, FrameFormat, RequestedFormat, RequestedFormatType, Resolution};
use nokhwa::CallbackCamera;

use crate::errors::PoseCamError;
use crate::timing::SessionClock;
use crate::types::VideoFrame;

/// Non-blocking source of decoded RGB frames.
pub trait FrameSource: Send {
    /// Take the freshest frame if one arrived since the last poll.
    fn poll_frame(&mut self) -> Option<VideoFrame>;

    /// Native source dimensions.
    fn dimensions(&self) -> (u32, u32);
}

/// Camera-backed frame source using the platform capture backend.
pub struct CameraSource {
    camera: CallbackCamera,
    slot: Arc<Mutex<Option<VideoFrame>>>,
    dimensions: (u32, u32),
    device_id: String,
}

impl CameraSource {
    /// Open a camera by index and start streaming into the frame slot.
    pub fn new(
        device_index: u32,
        width: u32,
        height: u32,
        fps: u32,
        clock: SessionClock,
    ) -> Result<Self, PoseCamError> {
        let requested = RequestedFormat::new::<RgbFormat>(RequestedFormatType::Closest(
            CameraFormat::new(Resolution::new(width, height), FrameFormat::MJPEG, fps),
        ));

        let slot: Arc<Mutex<Option<VideoFrame>>> = Arc::new(Mutex::new(None));
        let slot_cb = slot.clone();
        let device_id = format!("camera:{}", device_index);
        let source_id = device_id.clone();
        let clock_cb = clock.clone();

        let mut camera = CallbackCamera::new(
            CameraIndex::Index(device_index),
            requested,
            move |buffer| match buffer.decode_image::<RgbFormat>() {
                Ok(decoded) => {
                    let (w, h) = (decoded.width(), decoded.height());
                    let frame = VideoFrame::new(decoded.into_raw(), w, h, source_id.clone())
                        .with_timestamp(clock_cb.seconds());
                    if let Ok(mut slot) = slot_cb.lock() {
                        *slot = Some(frame);
                    }
                }
                Err(e) => {
                    log::warn!("Failed to decode camera frame: {}", e);
                }
            },
        )
        .map_err(|e| PoseCamError::CameraError(format!("Failed to open camera: {}", e)))?;

        camera
            .open_stream()
            .map_err(|e| PoseCamError::CameraError(format!("Failed to start stream: {}", e)))?;

        let resolution = camera
            .resolution()
            .map_err(|e| PoseCamError::CameraError(format!("Failed to query resolution: {}", e)))?;
        let dimensions = (resolution.width(), resolution.height());

        log::info!(
            "Camera {} streaming at {}x{}",
            device_id,
            dimensions.0,
            dimensions.1
        );

        Ok(Self {
            camera,
            slot,
            dimensions,
            device_id,
        })
    }
}

impl FrameSource for CameraSource {
    fn poll_frame(&mut self) -> Option<VideoFrame> {
        self.slot.lock().ok()?.take()
    }

    fn dimensions(&self) -> (u32, u32) {
        self.dimensions
    }
}

impl Drop for CameraSource {
    fn drop(&mut self) {
        if let Err(e) = self.camera.stop_stream() {
            log::debug!("Ignoring stream stop error for {}: {}", self.device_id, e);
        } else {
            log::info!("Camera {} released", self.device_id);
        }
    }
}

/// Basic information about an attached camera.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct CameraDeviceInfo {
    pub index: u32,
    pub name: String,
    pub description: String,
}

/// Enumerate cameras visible to the platform backend.
pub fn list_cameras() -> Result<Vec<CameraDeviceInfo>, PoseCamError> {
    let devices = nokhwa::query(nokhwa::utils::ApiBackend::Auto)
        .map_err(|e| PoseCamError::CameraError(format!("Failed to enumerate cameras: {}", e)))?;

    Ok(devices
        .into_iter()
        .map(|info| CameraDeviceInfo {
            index: match info.index() {
                CameraIndex::Index(i) => *i,
                CameraIndex::String(_) => 0,
            },
            name: info.human_name(),
            description: info.description().to_string(),
        })
        .collect())
}
