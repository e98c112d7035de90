//! Session clock for frame and tracking timestamps.

use std::sync::Arc;
use std::time::Instant;

/// Monotonic clock shared by everything inside one capture session.
///
/// Frame timestamps and tracking-request sequencing all derive from this
/// single source so orderings stay consistent.
#[derive(Debug, Clone)]
pub struct SessionClock {
    start: Arc<Instant>,
}

impl SessionClock {
    pub fn new() -> Self {
        Self {
            start: Arc::new(Instant::now()),
        }
    }

    /// Seconds elapsed since the session started.
    #[inline]
    pub fn seconds(&self) -> f64 {
        self.start.elapsed().as_secs_f64()
    }
}

impl Default for SessionClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clock_is_monotonic() {
        let clock = SessionClock::new();
        let a = clock.seconds();
        let b = clock.seconds();
        assert!(b >= a);
    }

    #[test]
    fn test_clones_share_timebase() {
        let clock = SessionClock::new();
        let other = clock.clone();
        std::thread::sleep(std::time::Duration::from_millis(5));
        assert!((clock.seconds() - other.seconds()).abs() < 0.005);
    }
}
