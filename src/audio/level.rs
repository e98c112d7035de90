//! Smoothed volume estimation over byte-encoded time-domain windows.

/// Decibel offset mapping typical speech and silence into a positive
/// display range. Calibration value, kept verbatim.
pub const DB_OFFSET: f32 = 95.0;

/// Mixing coefficient of the exponential moving average. A step change
/// settles within roughly 10-15 ticks.
pub const SMOOTHING: f32 = 0.15;

/// Level reported for an all-zero RMS window instead of -inf.
pub const SILENCE_FLOOR_DB: f32 = -100.0;

/// Exponentially smoothed pseudo-dB volume.
///
/// State persists across ticks for the lifetime of the estimator and is
/// only advanced when a window is actually supplied; skipped ticks hold
/// the previous value.
#[derive(Debug, Clone)]
pub struct VolumeEstimator {
    smoothed: f32,
}

impl VolumeEstimator {
    pub fn new() -> Self {
        Self { smoothed: 0.0 }
    }

    /// Feed one analysis window, returning the updated display level.
    pub fn process_window(&mut self, samples: &[u8]) -> i32 {
        if samples.is_empty() {
            return self.level();
        }
        let raw = raw_level(samples);
        self.smoothed = SMOOTHING * raw + (1.0 - SMOOTHING) * self.smoothed;
        self.level()
    }

    /// Current displayed volume, rounded to an integer.
    pub fn level(&self) -> i32 {
        self.smoothed.round() as i32
    }

    /// Unrounded smoothed value, for tests asserting the EMA exactly.
    pub fn smoothed(&self) -> f32 {
        self.smoothed
    }
}

impl Default for VolumeEstimator {
    fn default() -> Self {
        Self::new()
    }
}

/// Instantaneous (pre-smoothing) level of one window.
pub fn raw_level(samples: &[u8]) -> f32 {
    let sum_squares: f32 = samples
        .iter()
        .map(|&s| {
            let amplitude = (s as f32 - 128.0) / 128.0;
            amplitude * amplitude
        })
        .sum();
    let rms = (sum_squares / samples.len() as f32).sqrt();
    let db = if rms > 0.0 {
        20.0 * rms.log10()
    } else {
        SILENCE_FLOOR_DB
    };
    (db + DB_OFFSET).max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_silence_is_zero_raw() {
        let window = vec![128u8; 2048];
        assert_eq!(raw_level(&window), 0.0);
    }

    #[test]
    fn test_silence_is_idempotent() {
        let mut estimator = VolumeEstimator::new();
        let window = vec![128u8; 2048];
        for _ in 0..50 {
            assert_eq!(estimator.process_window(&window), 0);
        }
        assert_eq!(estimator.smoothed(), 0.0);
    }

    #[test]
    fn test_full_scale_raw_level() {
        // Samples at 0 have amplitude -1.0, rms 1.0, 0 dB
        let window = vec![0u8; 1024];
        let raw = raw_level(&window);
        assert!((raw - DB_OFFSET).abs() < 1e-4);
    }

    #[test]
    fn test_half_scale_raw_level() {
        // 128 + 64 -> amplitude 0.5 -> 20*log10(0.5) ~ -6.0206 dB
        let window = vec![192u8; 1024];
        let expected = 20.0 * 0.5_f32.log10() + DB_OFFSET;
        assert!((raw_level(&window) - expected).abs() < 1e-3);
    }

    #[test]
    fn test_step_response_matches_ema() {
        let mut estimator = VolumeEstimator::new();
        let window = vec![0u8; 1024]; // raw = DB_OFFSET = 95
        let raw = raw_level(&window);

        for n in 1..=30 {
            estimator.process_window(&window);
            let expected = raw * (1.0 - (1.0 - SMOOTHING).powi(n));
            assert!(
                (estimator.smoothed() - expected).abs() < 1e-3,
                "tick {}: smoothed {} expected {}",
                n,
                estimator.smoothed(),
                expected
            );
        }
    }

    #[test]
    fn test_decay_toward_silence() {
        let mut estimator = VolumeEstimator::new();
        let loud = vec![0u8; 1024];
        for _ in 0..40 {
            estimator.process_window(&loud);
        }
        let peak = estimator.smoothed();

        let quiet = vec![128u8; 1024];
        for _ in 0..40 {
            estimator.process_window(&quiet);
        }
        assert!(estimator.smoothed() < peak * 0.01);
    }

    #[test]
    fn test_empty_window_holds_level() {
        let mut estimator = VolumeEstimator::new();
        let loud = vec![0u8; 1024];
        let before = estimator.process_window(&loud);
        assert_eq!(estimator.process_window(&[]), before);
    }
}
