//! PoseCam: real-time face pose and audio level readout with
//! composited still capture for Tauri applications.
//!
//! The crate turns a live face-tracking transform and a live audio
//! stream into a continuously refreshed pose/volume snapshot, and can
//! freeze any moment into a composited still that matches the mirrored
//! on-screen presentation pixel for pixel, at arbitrary output
//! resolutions.
//!
//! # Features
//! - Tick-driven pose/volume sampling at display refresh cadence
//! - Matrix-to-Euler pose decoding with defensive domain clamping
//! - Exponentially smoothed pseudo-dB volume metering
//! - Mirrored, cover-cropped, resolution-independent still composition
//!   with a proportionally scaled HUD overlay
//! - Camera capture through the cross-platform backend, microphone
//!   analysis behind the `audio` feature
//!
//! # Usage
//! Add this to your `Cargo.toml`:
//! ```toml
//! [dependencies]
//! posecam = { version = "0.3", features = ["plugin", "audio"] }
//! tauri = { version = "2.0", features = ["protocol-asset"] }
//! ```
//!
//! Then in your Tauri app:
//! ```rust,ignore
//! use posecam;
//!
//! fn main() {
//!     tauri::Builder::default()
//!         .plugin(posecam::init())
//!         .run(tauri::generate_context!())
//!         .expect("error while running tauri application");
//! }
//! ```

pub mod audio;
pub mod camera;
#[cfg(feature = "plugin")]
pub mod commands;
pub mod config;
pub mod errors;
pub mod pose;
pub mod render;
pub mod sampler;
pub mod session;
pub mod timing;
pub mod tracking;
pub mod types;

// Testing utilities - synthetic capabilities for offline use
pub mod testing;

// Re-exports for convenience
pub use config::PoseCamConfig;
pub use errors::PoseCamError;
pub use sampler::FrameSampler;
pub use session::CaptureSession;
pub use types::{CaptureRequest, CapturedStill, OutputFormat, PoseSample, PoseState, VideoFrame};

#[cfg(feature = "plugin")]
use tauri::{
    plugin::{Builder, TauriPlugin},
    Runtime,
};

/// Initialize the PoseCam plugin with all commands
#[cfg(feature = "plugin")]
pub fn init<R: Runtime>() -> TauriPlugin<R> {
    Builder::new("posecam")
        .invoke_handler(tauri::generate_handler![
            // Initialization commands
            commands::init::get_available_cameras,
            commands::init::check_camera_availability,
            commands::init::get_plugin_info,
            // Session commands
            commands::session::start_session,
            commands::session::stop_session,
            commands::session::get_pose_state,
            commands::session::submit_face_transform,
            commands::session::clear_face_tracking,
            // Capture commands
            commands::capture::capture_still,
            commands::capture::save_still_to_disk,
            // Configuration commands
            commands::config::get_config,
            commands::config::update_config,
            commands::config::reset_config,
        ])
        .build()
}

/// Initialize logging for the capture pipeline
pub fn init_logging() {
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "posecam=info");
    }
    let _ = env_logger::try_init();
}

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

/// Get crate information
pub fn get_info() -> CrateInfo {
    CrateInfo {
        name: NAME.to_string(),
        version: VERSION.to_string(),
        description: DESCRIPTION.to_string(),
    }
}

/// Crate information structure
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct CrateInfo {
    pub name: String,
    pub version: String,
    pub description: String,
}
