use tauri::command;

use crate::camera::{list_cameras, CameraDeviceInfo};

/// Get list of cameras visible to the platform backend.
#[command]
pub async fn get_available_cameras() -> Result<Vec<CameraDeviceInfo>, String> {
    match tokio::task::spawn_blocking(list_cameras).await {
        Ok(Ok(cameras)) => {
            log::info!("Found {} cameras", cameras.len());
            for camera in &cameras {
                log::debug!("Camera: {} - {}", camera.index, camera.name);
            }
            Ok(cameras)
        }
        Ok(Err(e)) => {
            log::error!("Failed to list cameras: {}", e);
            Err(format!("Failed to list cameras: {}", e))
        }
        Err(e) => Err(format!("Task join error: {}", e)),
    }
}

/// Check whether at least one camera is present.
#[command]
pub async fn check_camera_availability() -> Result<bool, String> {
    let cameras = get_available_cameras().await?;
    Ok(!cameras.is_empty())
}

/// Get crate name, version, and description.
#[command]
pub async fn get_plugin_info() -> Result<crate::CrateInfo, String> {
    Ok(crate::get_info())
}
