use std::fmt;

#[derive(Debug)]
pub enum PoseCamError {
    InitializationError(String),
    CameraError(String),
    TrackingError(String),
    CaptureError(String),
    CaptureInProgress,
    RenderError(String),
    ConfigError(String),
    SessionClosed,
    #[cfg(feature = "audio")]
    AudioError(String),
}

impl fmt::Display for PoseCamError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            PoseCamError::InitializationError(msg) => write!(f, "Initialization error: {}", msg),
            PoseCamError::CameraError(msg) => write!(f, "Camera error: {}", msg),
            PoseCamError::TrackingError(msg) => write!(f, "Tracking error: {}", msg),
            PoseCamError::CaptureError(msg) => write!(f, "Capture error: {}", msg),
            PoseCamError::CaptureInProgress => {
                write!(f, "Capture already in progress, request rejected")
            }
            PoseCamError::RenderError(msg) => write!(f, "Render error: {}", msg),
            PoseCamError::ConfigError(msg) => write!(f, "Configuration error: {}", msg),
            PoseCamError::SessionClosed => write!(f, "Session is closed"),
            #[cfg(feature = "audio")]
            PoseCamError::AudioError(msg) => write!(f, "Audio error: {}", msg),
        }
    }
}

impl std::error::Error for PoseCamError {}

impl From<crate::render::RenderError> for PoseCamError {
    fn from(err: crate::render::RenderError) -> Self {
        match err {
            crate::render::RenderError::Encode(_) => PoseCamError::RenderError(err.to_string()),
            other => PoseCamError::CaptureError(other.to_string()),
        }
    }
}
