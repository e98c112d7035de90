use std::collections::HashMap;
use std::sync::Arc;

use tauri::command;
use tokio::sync::RwLock;

use crate::audio::AudioAnalyser;
use crate::camera::CameraSource;
use crate::session::CaptureSession;
use crate::timing::SessionClock;
use crate::tracking::{FaceTransform, PushTracker, TransformInbox};
use crate::types::PoseState;

/// One registered session plus the inbox the host pushes transforms into.
pub(crate) struct SessionEntry {
    pub(crate) session: Arc<CaptureSession>,
    pub(crate) inbox: TransformInbox,
}

// Global session registry, keyed by session id
lazy_static::lazy_static! {
    pub(crate) static ref SESSION_REGISTRY: Arc<RwLock<HashMap<String, Arc<SessionEntry>>>> =
        Arc::new(RwLock::new(HashMap::new()));
}

pub(crate) async fn get_session(session_id: &str) -> Result<Arc<SessionEntry>, String> {
    let registry = SESSION_REGISTRY.read().await;
    registry
        .get(session_id)
        .cloned()
        .ok_or_else(|| format!("No active session with ID: {}", session_id))
}

/// Start a capture session using the current configuration.
/// Returns the new session's ID.
#[command]
pub async fn start_session() -> Result<String, String> {
    let config = super::config::current_config().await;
    if let Err(e) = config.validate() {
        return Err(format!("Invalid configuration: {}", e));
    }

    let session_id = uuid::Uuid::new_v4().to_string();
    log::info!("Starting capture session {}", session_id);

    let entry = tokio::task::spawn_blocking(move || {
        let clock = SessionClock::new();
        let source = CameraSource::new(
            config.camera.device_index,
            config.camera.resolution[0],
            config.camera.resolution[1],
            config.camera.fps,
            clock.clone(),
        )
        .map_err(|e| format!("Failed to open camera: {}", e))?;

        let (tracker, inbox) = PushTracker::new();

        let analyser: Option<Box<dyn AudioAnalyser>> = build_analyser(&config, &clock);

        let session = CaptureSession::start(
            Box::new(source),
            Box::new(tracker),
            analyser,
            config.session.tick_rate_hz,
            clock,
        )
        .map_err(|e| format!("Failed to start session: {}", e))?;

        Ok::<SessionEntry, String>(SessionEntry {
            session: Arc::new(session),
            inbox,
        })
    })
    .await
    .map_err(|e| format!("Task join error: {}", e))??;

    let mut registry = SESSION_REGISTRY.write().await;
    registry.insert(session_id.clone(), Arc::new(entry));

    log::info!("Capture session {} started", session_id);
    Ok(session_id)
}

#[cfg(feature = "audio")]
fn build_analyser(
    config: &crate::config::PoseCamConfig,
    clock: &SessionClock,
) -> Option<Box<dyn AudioAnalyser>> {
    if !config.session.audio_enabled {
        return None;
    }
    let device = if config.session.audio_device.is_empty() {
        None
    } else {
        Some(config.session.audio_device.as_str())
    };
    match crate::audio::MicrophoneAnalyser::new(device, clock.clone()) {
        Ok(analyser) => Some(Box::new(analyser)),
        Err(e) => {
            // Missing audio is non-fatal; the session runs without volume
            log::warn!("Audio analyser unavailable, continuing without: {}", e);
            None
        }
    }
}

#[cfg(not(feature = "audio"))]
fn build_analyser(
    _config: &crate::config::PoseCamConfig,
    _clock: &SessionClock,
) -> Option<Box<dyn AudioAnalyser>> {
    None
}

/// Stop a session and remove it from the registry.
#[command]
pub async fn stop_session(session_id: String) -> Result<String, String> {
    log::info!("Stopping session: {}", session_id);

    let mut registry = SESSION_REGISTRY.write().await;
    if let Some(entry) = registry.remove(&session_id) {
        tokio::task::spawn_blocking(move || entry.session.stop())
            .await
            .map_err(|e| format!("Task join error: {}", e))?;
        Ok(format!("Session {} stopped", session_id))
    } else {
        let msg = format!("No active session with ID: {}", session_id);
        log::info!("{}", msg);
        Ok(msg) // Not an error if the session was already gone
    }
}

/// Read the latest published pose snapshot.
#[command]
pub async fn get_pose_state(session_id: String) -> Result<PoseState, String> {
    let entry = get_session(&session_id).await?;
    Ok(entry.session.pose_state())
}

/// Push one face transform from the host's landmark model.
///
/// `matrix` is the 16-element row-major transform; `timestamp` orders
/// requests and stale pushes are dropped.
#[command]
pub async fn submit_face_transform(
    session_id: String,
    matrix: Vec<f32>,
    timestamp: f64,
) -> Result<(), String> {
    if matrix.len() != 16 {
        return Err(format!(
            "Transform must have 16 elements, got {}",
            matrix.len()
        ));
    }
    let entry = get_session(&session_id).await?;

    let mut fixed = [0f32; 16];
    fixed.copy_from_slice(&matrix);
    entry.inbox.push(FaceTransform::new(fixed, timestamp));
    Ok(())
}

/// Report that the host's landmark model currently sees no face.
#[command]
pub async fn clear_face_tracking(session_id: String) -> Result<(), String> {
    let entry = get_session(&session_id).await?;
    entry.inbox.clear();
    Ok(())
}
