//! Configuration management for PoseCam
//!
//! Provides configuration loading, saving, and validation for session
//! cadence, camera selection, capture output, and storage preferences.
//! Signal-path calibration values (dB offset, smoothing coefficient,
//! HUD reference width) are fixed constants, not configuration.

use crate::errors::PoseCamError;
use crate::types::OutputFormat;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoseCamConfig {
    pub session: SessionConfig,
    pub camera: CameraConfig,
    pub capture: CaptureConfig,
    pub storage: StorageConfig,
}

/// Tick-loop configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Tick rate in Hz; should match the host display refresh rate
    pub tick_rate_hz: u32,
    /// Enable the microphone analyser when the crate is built with audio
    pub audio_enabled: bool,
    /// Input device name, empty for the system default
    pub audio_device: String,
}

/// Camera selection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CameraConfig {
    /// Camera index as reported by the platform backend
    pub device_index: u32,
    /// Requested resolution [width, height]
    pub resolution: [u32; 2],
    /// Requested frames per second
    pub fps: u32,
}

/// Still-capture output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptureConfig {
    /// Encoded container format for stills
    pub format: OutputFormat,
    /// JPEG quality (1-100), ignored for PNG
    pub jpeg_quality: u8,
    /// Device pixel ratio multiplier applied to capture resolutions
    pub pixel_ratio: f32,
}

/// Storage and file naming configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Default output directory for captured stills
    pub output_directory: String,
    /// File name prefix for captured stills
    pub file_prefix: String,
}

impl Default for PoseCamConfig {
    fn default() -> Self {
        Self {
            session: SessionConfig {
                tick_rate_hz: 60,
                audio_enabled: true,
                audio_device: String::new(),
            },
            camera: CameraConfig {
                device_index: 0,
                resolution: [1280, 720],
                fps: 30,
            },
            capture: CaptureConfig {
                format: OutputFormat::Png,
                jpeg_quality: 90,
                pixel_ratio: 2.0,
            },
            storage: StorageConfig {
                output_directory: "./captures".to_string(),
                file_prefix: "posecam".to_string(),
            },
        }
    }
}

impl PoseCamConfig {
    /// Load configuration from TOML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, PoseCamError> {
        let path = path.as_ref();

        if !path.exists() {
            log::info!("Config file not found at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path).map_err(|e| {
            PoseCamError::ConfigError(format!("Failed to read config file: {}", e))
        })?;

        let config: PoseCamConfig = toml::from_str(&contents).map_err(|e| {
            PoseCamError::ConfigError(format!("Failed to parse config file: {}", e))
        })?;

        log::info!("Loaded configuration from {:?}", path);
        Ok(config)
    }

    /// Save configuration to TOML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), PoseCamError> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                PoseCamError::ConfigError(format!("Failed to create config directory: {}", e))
            })?;
        }

        let toml_string = toml::to_string_pretty(self).map_err(|e| {
            PoseCamError::ConfigError(format!("Failed to serialize config: {}", e))
        })?;

        fs::write(path, toml_string).map_err(|e| {
            PoseCamError::ConfigError(format!("Failed to write config file: {}", e))
        })?;

        log::info!("Saved configuration to {:?}", path);
        Ok(())
    }

    /// Get default config file path
    pub fn default_path() -> PathBuf {
        PathBuf::from("posecam.toml")
    }

    /// Load from default location or fall back to defaults
    pub fn load_or_default() -> Self {
        Self::load_from_file(Self::default_path()).unwrap_or_else(|e| {
            log::warn!("Failed to load config, using defaults: {}", e);
            Self::default()
        })
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), String> {
        if self.session.tick_rate_hz == 0 || self.session.tick_rate_hz > 240 {
            return Err("Tick rate must be 1-240 Hz".to_string());
        }

        if self.camera.resolution[0] == 0 || self.camera.resolution[1] == 0 {
            return Err("Invalid camera resolution".to_string());
        }
        if self.camera.fps == 0 || self.camera.fps > 240 {
            return Err("Invalid camera FPS (must be 1-240)".to_string());
        }

        if self.capture.jpeg_quality == 0 || self.capture.jpeg_quality > 100 {
            return Err("JPEG quality must be between 1 and 100".to_string());
        }
        if !(self.capture.pixel_ratio.is_finite() && self.capture.pixel_ratio > 0.0) {
            return Err("Pixel ratio must be a positive number".to_string());
        }

        if self.storage.file_prefix.is_empty() {
            return Err("File prefix must not be empty".to_string());
        }

        Ok(())
    }
}
