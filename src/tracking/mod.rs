//! Face-tracking capability seam.
//!
//! The landmark model itself lives outside this crate (typically in the
//! embedding application); what flows across the seam is zero-or-one
//! 4x4 transforms per tick plus a timestamp used only for sequencing.

use std::sync::{Arc, Mutex};

use crate::types::VideoFrame;

/// One face transform as reported by the external tracker.
#[derive(Debug, Clone, Copy)]
pub struct FaceTransform {
    /// Row-major 4x4 rigid transform, face space to camera space
    pub matrix: [f32; 16],
    /// Seconds on the session clock when the transform was produced
    pub timestamp: f64,
}

impl FaceTransform {
    pub fn new(matrix: [f32; 16], timestamp: f64) -> Self {
        Self { matrix, timestamp }
    }
}

/// Per-tick tracking seam. `track` is called once per tick with the
/// frame that tick observed; `None` means no face right now and the
/// sampler carries the previous pose forward.
pub trait FaceTracker: Send {
    fn track(&mut self, frame: &VideoFrame, timestamp: f64) -> Option<FaceTransform>;
}

/// Latest-value slot for transforms pushed from outside the tick loop.
///
/// The embedding application pushes a transform whenever its model
/// produces one; the tick loop takes at most one per tick. Pushes
/// replace, they never queue, and stale (out-of-order) pushes are
/// dropped by timestamp.
#[derive(Clone, Default)]
pub struct TransformInbox {
    slot: Arc<Mutex<Option<FaceTransform>>>,
}

impl TransformInbox {
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish a transform. Replaces any unconsumed one unless it is
    /// older than what the slot already holds.
    pub fn push(&self, transform: FaceTransform) {
        let mut slot = self.slot.lock().expect("transform slot poisoned");
        match slot.as_ref() {
            Some(held) if held.timestamp > transform.timestamp => {
                log::debug!(
                    "dropping stale transform ({} < {})",
                    transform.timestamp,
                    held.timestamp
                );
            }
            _ => *slot = Some(transform),
        }
    }

    /// Signal that no face is currently tracked, clearing any pending
    /// transform.
    pub fn clear(&self) {
        self.slot.lock().expect("transform slot poisoned").take();
    }

    fn take(&self) -> Option<FaceTransform> {
        self.slot.lock().expect("transform slot poisoned").take()
    }
}

/// Tracker fed by a [`TransformInbox`]. This is the production seam for
/// plugin hosts where the landmark model runs in the webview.
pub struct PushTracker {
    inbox: TransformInbox,
}

impl PushTracker {
    pub fn new() -> (Self, TransformInbox) {
        let inbox = TransformInbox::new();
        (
            Self {
                inbox: inbox.clone(),
            },
            inbox,
        )
    }
}

impl FaceTracker for PushTracker {
    fn track(&mut self, _frame: &VideoFrame, _timestamp: f64) -> Option<FaceTransform> {
        self.inbox.take()
    }
}
