use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tauri::command;

use crate::errors::PoseCamError;
use crate::types::{CaptureRequest, CapturedStill, OutputFormat, PoseState};

/// Serializable capture result handed back to the host.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CapturePayload {
    pub id: String,
    pub width: u32,
    pub height: u32,
    pub format: OutputFormat,
    pub pose: PoseState,
    pub captured_at: String,
    /// Encoded image bytes (PNG or JPEG)
    pub data: Vec<u8>,
}

impl From<CapturedStill> for CapturePayload {
    fn from(still: CapturedStill) -> Self {
        Self {
            id: still.id.to_string(),
            width: still.width,
            height: still.height,
            format: still.format,
            pose: still.pose,
            captured_at: still.captured_at.to_rfc3339(),
            data: still.data.to_vec(),
        }
    }
}

/// Capture a still at the given CSS-pixel resolution.
///
/// The configured device pixel ratio is applied here, so captures come
/// out at higher fidelity than the on-screen preview. A capture already
/// in flight rejects this request immediately.
#[command]
pub async fn capture_still(
    session_id: String,
    width: u32,
    height: u32,
) -> Result<CapturePayload, String> {
    let entry = super::session::get_session(&session_id).await?;
    let config = super::config::current_config().await;

    let scaled_w = (width as f32 * config.capture.pixel_ratio).round() as u32;
    let scaled_h = (height as f32 * config.capture.pixel_ratio).round() as u32;
    log::info!(
        "Capture requested for session {}: {}x{} (scaled {}x{})",
        session_id,
        width,
        height,
        scaled_w,
        scaled_h
    );

    let still = tokio::task::spawn_blocking(move || {
        let request = CaptureRequest::new(scaled_w, scaled_h, entry.session.pose_state())
            .with_format(config.capture.format, config.capture.jpeg_quality);
        entry.session.capture(request)
    })
    .await
    .map_err(|e| format!("Task join error: {}", e))?
    .map_err(|e| match e {
        PoseCamError::CaptureInProgress => "Capture already in progress".to_string(),
        other => format!("Capture failed: {}", other),
    })?;

    Ok(still.into())
}

/// Capture a still and write it under the configured output directory.
/// Returns the absolute path of the saved file.
#[command]
pub async fn save_still_to_disk(
    session_id: String,
    width: u32,
    height: u32,
    file_name: Option<String>,
) -> Result<String, String> {
    let entry = super::session::get_session(&session_id).await?;
    let config = super::config::current_config().await;

    let scaled_w = (width as f32 * config.capture.pixel_ratio).round() as u32;
    let scaled_h = (height as f32 * config.capture.pixel_ratio).round() as u32;

    let path = tokio::task::spawn_blocking(move || {
        let request = CaptureRequest::new(scaled_w, scaled_h, entry.session.pose_state())
            .with_format(config.capture.format, config.capture.jpeg_quality);
        let still = entry
            .session
            .capture(request)
            .map_err(|e| format!("Capture failed: {}", e))?;

        let dir = PathBuf::from(&config.storage.output_directory);
        std::fs::create_dir_all(&dir)
            .map_err(|e| format!("Failed to create output directory: {}", e))?;

        let name = file_name
            .unwrap_or_else(|| still.suggested_file_name(&config.storage.file_prefix));
        let path = dir.join(name);
        std::fs::write(&path, &still.data)
            .map_err(|e| format!("Failed to write still: {}", e))?;

        log::info!("Saved still to {:?} ({} bytes)", path, still.data.len());
        Ok::<String, String>(path.to_string_lossy().to_string())
    })
    .await
    .map_err(|e| format!("Task join error: {}", e))??;

    Ok(path)
}
