//! Per-tick state merge.
//!
//! Once per display refresh the session asks for "whatever is fresh":
//! maybe a pose sample, maybe an audio window, often neither. The merge
//! is last-value-wins per field group: the four angle fields replace
//! together or not at all, volume replaces independently, and nothing is
//! ever interpolated.

use crate::audio::{AudioWindow, VolumeEstimator};
use crate::types::{PoseSample, PoseState};

/// Outcome of one tick's tracking poll.
///
/// `Skipped` (no fresh frame, tracker never ran) carries the whole
/// previous snapshot; `NoFace` (tracker ran and found nothing, or the
/// sample was rejected) keeps the last-known-good angles but drops the
/// tracked status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackPoll {
    Skipped,
    NoFace,
    Face(PoseSample),
}

impl TrackPoll {
    /// Wrap a decode result from a tracker that did run this tick.
    pub fn from_sample(sample: Option<PoseSample>) -> Self {
        match sample {
            Some(sample) => TrackPoll::Face(sample),
            None => TrackPoll::NoFace,
        }
    }
}

/// Pure merge of one tick's inputs into the next published snapshot.
pub fn merge_tick(prev: &PoseState, poll: TrackPoll, volume: Option<i32>) -> PoseState {
    let mut next = match poll {
        TrackPoll::Face(sample) => prev.apply_sample(sample),
        TrackPoll::NoFace => PoseState {
            tracking: false,
            ..*prev
        },
        TrackPoll::Skipped => *prev,
    };
    if let Some(volume) = volume {
        next.volume = volume;
    }
    next
}

/// Owns the per-tick state the merge threads through: the previous
/// snapshot and the volume estimator's smoothing memory.
#[derive(Debug, Clone, Default)]
pub struct FrameSampler {
    state: PoseState,
    estimator: VolumeEstimator,
}

impl FrameSampler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance one tick and return the new snapshot.
    ///
    /// A `None` window skips the estimator entirely so the level holds.
    pub fn tick(&mut self, poll: TrackPoll, window: Option<&AudioWindow>) -> PoseState {
        let volume = window.map(|w| self.estimator.process_window(&w.samples));
        self.state = merge_tick(&self.state, poll, volume);
        self.state
    }

    /// The snapshot published by the most recent tick.
    pub fn state(&self) -> PoseState {
        self.state
    }
}
