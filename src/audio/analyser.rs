//! Microphone-backed analysis windows.
//!
//! A cpal input stream feeds f32 PCM through a bounded channel; polls
//! drain whatever has arrived into a rolling window and re-quantize it
//! to the unsigned-byte shape the estimator consumes. Polling never
//! blocks and never waits on the capture thread.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Stream, StreamConfig};

use super::{AudioAnalyser, AudioWindow, WINDOW_SIZE};
use crate::errors::PoseCamError;
use crate::timing::SessionClock;

/// Maximum PCM chunks buffered before the oldest are dropped. Keeps the
/// analyser from growing without bound if polls stall.
const MAX_BUFFER_CHUNKS: usize = 64;

/// Live microphone analyser producing fixed-size time-domain windows.
pub struct MicrophoneAnalyser {
    stream: Option<Stream>,
    receiver: crossbeam_channel::Receiver<Vec<f32>>,
    is_running: Arc<AtomicBool>,
    ring: VecDeque<u8>,
    primed: bool,
    clock: SessionClock,
}

impl MicrophoneAnalyser {
    /// Open the default (or named) input device and start streaming.
    ///
    /// The `clock` should be the owning session's clock so window
    /// timestamps share the frame timebase.
    pub fn new(device_name: Option<&str>, clock: SessionClock) -> Result<Self, PoseCamError> {
        let host = cpal::default_host();
        let device = match device_name {
            None | Some("") | Some("default") => host.default_input_device().ok_or_else(|| {
                PoseCamError::AudioError("No default audio input device".to_string())
            })?,
            Some(name) => host
                .input_devices()
                .map_err(|e| {
                    PoseCamError::AudioError(format!("Failed to enumerate devices: {}", e))
                })?
                .find(|d| d.name().ok().as_deref() == Some(name))
                .ok_or_else(|| {
                    PoseCamError::AudioError(format!("Audio device not found: {}", name))
                })?,
        };

        let supported = device
            .default_input_config()
            .map_err(|e| PoseCamError::AudioError(format!("No supported input config: {}", e)))?;
        let config = StreamConfig {
            channels: supported.channels(),
            sample_rate: supported.sample_rate(),
            buffer_size: cpal::BufferSize::Default,
        };
        let channels = config.channels as usize;

        let (sender, receiver) = crossbeam_channel::bounded(MAX_BUFFER_CHUNKS);
        let is_running = Arc::new(AtomicBool::new(true));
        let is_running_cb = is_running.clone();

        let stream = device
            .build_input_stream(
                &config,
                move |data: &[f32], _: &cpal::InputCallbackInfo| {
                    if !is_running_cb.load(Ordering::Relaxed) {
                        return;
                    }
                    // Downmix interleaved channels to mono before handoff
                    let mono: Vec<f32> = data
                        .chunks(channels.max(1))
                        .map(|frame| frame.iter().sum::<f32>() / frame.len() as f32)
                        .collect();
                    let _ = sender.try_send(mono);
                },
                move |err| {
                    log::error!("Microphone stream error: {}", err);
                },
                None,
            )
            .map_err(|e| PoseCamError::AudioError(format!("Failed to build stream: {}", e)))?;

        stream
            .play()
            .map_err(|e| PoseCamError::AudioError(format!("Failed to start stream: {}", e)))?;

        log::info!(
            "Microphone analyser started ({} Hz, {} ch)",
            config.sample_rate.0,
            config.channels
        );

        Ok(Self {
            stream: Some(stream),
            receiver,
            is_running,
            ring: VecDeque::with_capacity(WINDOW_SIZE),
            primed: false,
            clock,
        })
    }

    /// Stop the stream (idempotent).
    pub fn stop(&mut self) {
        self.is_running.store(false, Ordering::Relaxed);
        if let Some(stream) = self.stream.take() {
            drop(stream);
            log::info!("Microphone analyser stopped");
        }
    }

    fn quantize(sample: f32) -> u8 {
        // Inverse of the (s - 128) / 128 normalization the estimator does
        (sample * 128.0 + 128.0).clamp(0.0, 255.0) as u8
    }
}

impl AudioAnalyser for MicrophoneAnalyser {
    fn sample_window(&mut self) -> Option<AudioWindow> {
        let mut fresh = false;
        while let Ok(chunk) = self.receiver.try_recv() {
            fresh = true;
            for sample in chunk {
                if self.ring.len() == WINDOW_SIZE {
                    self.ring.pop_front();
                }
                self.ring.push_back(Self::quantize(sample));
            }
        }

        if self.ring.len() < WINDOW_SIZE {
            return None;
        }
        if !fresh && self.primed {
            // Nothing new arrived since the last poll
            return None;
        }
        self.primed = true;

        let samples: Vec<u8> = self.ring.iter().copied().collect();
        Some(AudioWindow::new(samples, self.clock.seconds()))
    }
}

impl Drop for MicrophoneAnalyser {
    fn drop(&mut self) {
        self.stop();
    }
}
