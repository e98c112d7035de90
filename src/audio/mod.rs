//! Audio analysis: time-domain windows in, smoothed level out.
//!
//! The estimator consumes the unsigned-byte window shape used by web
//! audio analysers (128-centered, full range 0..=255) so transforms can
//! be compared sample-for-sample against the reference behavior.

pub mod level;

#[cfg(feature = "audio")]
pub mod analyser;

pub use level::VolumeEstimator;

#[cfg(feature = "audio")]
pub use analyser::MicrophoneAnalyser;

/// Number of byte samples in one analysis window.
pub const WINDOW_SIZE: usize = 2048;

/// One fixed-size time-domain analysis window.
#[derive(Debug, Clone)]
pub struct AudioWindow {
    /// Unsigned amplitude bytes centered at 128
    pub samples: Vec<u8>,
    /// Seconds since the session clock started
    pub timestamp: f64,
}

impl AudioWindow {
    pub fn new(samples: Vec<u8>, timestamp: f64) -> Self {
        Self { samples, timestamp }
    }

    /// A silent window (all samples at the 128 midpoint).
    pub fn silence(timestamp: f64) -> Self {
        Self {
            samples: vec![128; WINDOW_SIZE],
            timestamp,
        }
    }
}

/// Source of analysis windows, polled once per tick.
///
/// `sample_window` must never block; `None` means no fresh window this
/// tick and the caller holds the previous level.
pub trait AudioAnalyser: Send {
    fn sample_window(&mut self) -> Option<AudioWindow>;
}
