//! Live capture session: the tick loop and the still-capture path.
//!
//! One session owns one frame source, one tracker and (optionally) one
//! audio analyser, drives them from a single tick thread at display
//! cadence, and publishes an immutable [`PoseState`] snapshot per tick.
//! Consumers read the snapshot; captures freeze it together with the
//! latest frame.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use chrono::Utc;

use crate::audio::AudioAnalyser;
use crate::camera::FrameSource;
use crate::errors::PoseCamError;
use crate::pose::decode_pose;
use crate::render::compose_still;
use crate::sampler::{FrameSampler, TrackPoll};
use crate::timing::SessionClock;
use crate::tracking::FaceTracker;
use crate::types::{CaptureRequest, CapturedStill, PoseState, VideoFrame};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SessionState {
    Running,
    Stopped,
}

/// One-shot mutual exclusion for still captures. A second acquisition
/// while a guard is alive is refused, not queued.
#[derive(Debug, Default)]
pub(crate) struct CaptureGate {
    busy: AtomicBool,
}

impl CaptureGate {
    pub(crate) fn try_acquire(&self) -> Option<CaptureGuard<'_>> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| CaptureGuard { gate: self })
    }
}

pub(crate) struct CaptureGuard<'a> {
    gate: &'a CaptureGate,
}

impl Drop for CaptureGuard<'_> {
    fn drop(&mut self) {
        self.gate.busy.store(false, Ordering::Release);
    }
}

struct Shared {
    state: Mutex<SessionState>,
    /// Published snapshot; replaced whole each tick, never field-mutated
    pose: Mutex<PoseState>,
    /// Most recent decoded frame, frozen into captures
    latest_frame: Mutex<Option<VideoFrame>>,
    capture_gate: CaptureGate,
    stop_flag: AtomicBool,
}

/// A running capture session.
pub struct CaptureSession {
    shared: Arc<Shared>,
    tick_thread: Mutex<Option<JoinHandle<()>>>,
    clock: SessionClock,
}

impl CaptureSession {
    /// Start the tick loop over the provided capability seams.
    ///
    /// `tick_rate_hz` should match the host display refresh rate. Ticks
    /// never queue: a slow tick simply delays the next one, and missed
    /// cadence is dropped rather than replayed.
    pub fn start(
        source: Box<dyn FrameSource>,
        tracker: Box<dyn FaceTracker>,
        analyser: Option<Box<dyn AudioAnalyser>>,
        tick_rate_hz: u32,
        clock: SessionClock,
    ) -> Result<Self, PoseCamError> {
        if tick_rate_hz == 0 {
            return Err(PoseCamError::InitializationError(
                "tick rate must be non-zero".to_string(),
            ));
        }

        let shared = Arc::new(Shared {
            state: Mutex::new(SessionState::Running),
            pose: Mutex::new(PoseState::default()),
            latest_frame: Mutex::new(None),
            capture_gate: CaptureGate::default(),
            stop_flag: AtomicBool::new(false),
        });

        let thread_shared = shared.clone();
        let thread_clock = clock.clone();
        let tick_interval = Duration::from_secs_f64(1.0 / tick_rate_hz as f64);

        let handle = std::thread::Builder::new()
            .name("posecam-tick".to_string())
            .spawn(move || {
                tick_loop(
                    thread_shared,
                    source,
                    tracker,
                    analyser,
                    tick_interval,
                    thread_clock,
                );
            })
            .map_err(|e| {
                PoseCamError::InitializationError(format!("Failed to spawn tick thread: {}", e))
            })?;

        log::info!("Capture session started at {} Hz", tick_rate_hz);

        Ok(Self {
            shared,
            tick_thread: Mutex::new(Some(handle)),
            clock,
        })
    }

    /// The snapshot produced by the most recent tick.
    pub fn pose_state(&self) -> PoseState {
        *self.shared.pose.lock().expect("pose lock poisoned")
    }

    /// Seconds since this session's clock started.
    pub fn elapsed(&self) -> f64 {
        self.clock.seconds()
    }

    pub fn is_running(&self) -> bool {
        *self.shared.state.lock().expect("state lock poisoned") == SessionState::Running
    }

    /// Freeze the current moment into an encoded still.
    ///
    /// Rejected with [`PoseCamError::CaptureInProgress`] while another
    /// capture is rendering; safe to retry as soon as that one settles.
    /// Once started the render runs to completion or failure.
    pub fn capture(&self, request: CaptureRequest) -> Result<CapturedStill, PoseCamError> {
        if !self.is_running() {
            return Err(PoseCamError::SessionClosed);
        }
        let _guard = self
            .shared
            .capture_gate
            .try_acquire()
            .ok_or(PoseCamError::CaptureInProgress)?;

        let frame = self
            .shared
            .latest_frame
            .lock()
            .expect("frame lock poisoned")
            .clone()
            .ok_or_else(|| {
                PoseCamError::CaptureError("no video frame available yet".to_string())
            })?;

        log::info!(
            "Capturing still {} at {}x{} from source frame {}x{}",
            request.id,
            request.width,
            request.height,
            frame.width,
            frame.height
        );

        let data = compose_still(&frame, &request)?;
        let still = CapturedStill {
            id: request.id,
            data,
            width: request.width,
            height: request.height,
            format: request.format,
            pose: request.pose,
            captured_at: Utc::now(),
        };

        log::info!("Captured still {} ({} bytes)", still.id, still.data.len());
        Ok(still)
    }

    /// Convenience wrapper: snapshot the current pose and capture at the
    /// given output resolution.
    pub fn capture_now(&self, width: u32, height: u32) -> Result<CapturedStill, PoseCamError> {
        let request = CaptureRequest::new(width, height, self.pose_state());
        self.capture(request)
    }

    /// Stop the tick loop and release the underlying capabilities.
    /// Idempotent. An in-flight capture finishes on its own thread.
    pub fn stop(&self) {
        {
            let mut state = self.shared.state.lock().expect("state lock poisoned");
            if *state == SessionState::Stopped {
                return;
            }
            *state = SessionState::Stopped;
        }
        self.shared.stop_flag.store(true, Ordering::Relaxed);

        if let Some(handle) = self
            .tick_thread
            .lock()
            .expect("thread lock poisoned")
            .take()
        {
            if handle.join().is_err() {
                log::error!("Tick thread panicked during shutdown");
            }
        }
        log::info!("Capture session stopped");
    }
}

impl Drop for CaptureSession {
    fn drop(&mut self) {
        self.stop();
    }
}

fn tick_loop(
    shared: Arc<Shared>,
    mut source: Box<dyn FrameSource>,
    mut tracker: Box<dyn FaceTracker>,
    mut analyser: Option<Box<dyn AudioAnalyser>>,
    tick_interval: Duration,
    clock: SessionClock,
) {
    let mut sampler = FrameSampler::new();

    while !shared.stop_flag.load(Ordering::Relaxed) {
        let tick_started = Instant::now();

        // Non-blocking polls; anything not ready is skipped this tick
        let frame = source.poll_frame();
        let poll = match frame.as_ref() {
            None => TrackPoll::Skipped,
            Some(frame) => TrackPoll::from_sample(
                tracker
                    .track(frame, clock.seconds())
                    .and_then(|t| decode_pose(&t.matrix)),
            ),
        };
        let window = analyser.as_mut().and_then(|a| a.sample_window());

        let next = sampler.tick(poll, window.as_ref());
        *shared.pose.lock().expect("pose lock poisoned") = next;

        if let Some(frame) = frame {
            *shared.latest_frame.lock().expect("frame lock poisoned") = Some(frame);
        }

        // Fixed cadence, no backlog: sleep out the remainder of this
        // tick and start fresh, dropping any missed intervals.
        let elapsed = tick_started.elapsed();
        if elapsed < tick_interval {
            std::thread::sleep(tick_interval - elapsed);
        }
    }

    // Sources are dropped here, releasing camera and microphone
    log::debug!("Tick loop exited");
}
