//! Headless smoke tool for the capture pipeline.
//!
//! Runs a live session and prints the pose/volume readout; optionally
//! freezes one composited still to disk. `--synthetic` swaps the
//! hardware seams for the built-in synthetic capabilities so the whole
//! pipeline can be exercised on machines with no camera or microphone.
//!
//! Usage:
//!   posecam-cli [--synthetic] [--json] [--capture WIDTHxHEIGHT] [--seconds N]

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};

use posecam::audio::AudioAnalyser;
use posecam::camera::{CameraSource, FrameSource};
use posecam::session::CaptureSession;
use posecam::testing::{SyntheticAnalyser, SyntheticCamera, SyntheticTracker};
use posecam::timing::SessionClock;
use posecam::tracking::{FaceTracker, PushTracker};
use posecam::{CaptureRequest, PoseCamConfig};

struct CliArgs {
    synthetic: bool,
    json: bool,
    capture: Option<(u32, u32)>,
    seconds: Option<u64>,
}

fn parse_args() -> Result<CliArgs> {
    let mut args = CliArgs {
        synthetic: false,
        json: false,
        capture: None,
        seconds: None,
    };

    let mut iter = std::env::args().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--synthetic" => args.synthetic = true,
            "--json" => args.json = true,
            "--capture" => {
                let spec = iter.next().context("--capture requires WIDTHxHEIGHT")?;
                let (w, h) = spec
                    .split_once('x')
                    .context("capture size must look like 1080x1920")?;
                args.capture = Some((w.parse()?, h.parse()?));
            }
            "--seconds" => {
                let value = iter.next().context("--seconds requires a number")?;
                args.seconds = Some(value.parse()?);
            }
            "--help" | "-h" => {
                println!(
                    "posecam-cli [--synthetic] [--json] [--capture WIDTHxHEIGHT] [--seconds N]"
                );
                std::process::exit(0);
            }
            other => bail!("Unknown argument: {}", other),
        }
    }
    Ok(args)
}

fn main() -> Result<()> {
    posecam::init_logging();
    let args = parse_args()?;
    let config = PoseCamConfig::load_or_default();
    config.validate().map_err(anyhow::Error::msg)?;

    let clock = SessionClock::new();
    let (source, tracker, analyser): (
        Box<dyn FrameSource>,
        Box<dyn FaceTracker>,
        Option<Box<dyn AudioAnalyser>>,
    ) = if args.synthetic {
        (
            Box::new(SyntheticCamera::new(
                config.camera.resolution[0],
                config.camera.resolution[1],
            )),
            Box::new(SyntheticTracker::orbiting(30.0)),
            Some(Box::new(SyntheticAnalyser::new(0.25))),
        )
    } else {
        let source = CameraSource::new(
            config.camera.device_index,
            config.camera.resolution[0],
            config.camera.resolution[1],
            config.camera.fps,
            clock.clone(),
        )
        .context("failed to open camera (try --synthetic)")?;
        // Live tracking comes from an embedding host; standalone runs
        // show NO FACE until one is pushed.
        let (tracker, _inbox) = PushTracker::new();
        (
            Box::new(source),
            Box::new(tracker),
            open_microphone(&config, &clock),
        )
    };

    let session = CaptureSession::start(
        source,
        tracker,
        analyser,
        config.session.tick_rate_hz,
        clock,
    )?;

    let running = Arc::new(AtomicBool::new(true));
    let running_handler = running.clone();
    ctrlc::set_handler(move || {
        running_handler.store(false, Ordering::SeqCst);
    })
    .context("failed to install signal handler")?;

    if let Some((width, height)) = args.capture {
        // Let a few ticks land so there is a frame and a settled level
        std::thread::sleep(Duration::from_millis(500));

        let pixel_ratio = config.capture.pixel_ratio;
        let scaled_w = (width as f32 * pixel_ratio).round() as u32;
        let scaled_h = (height as f32 * pixel_ratio).round() as u32;
        let request = CaptureRequest::new(scaled_w, scaled_h, session.pose_state())
            .with_format(config.capture.format, config.capture.jpeg_quality);
        let still = session.capture(request)?;

        let dir = std::path::PathBuf::from(&config.storage.output_directory);
        std::fs::create_dir_all(&dir)?;
        let path = dir.join(still.suggested_file_name(&config.storage.file_prefix));
        std::fs::write(&path, &still.data)?;
        println!("Saved {}x{} still to {}", still.width, still.height, path.display());

        session.stop();
        return Ok(());
    }

    println!("Live readout (ctrl-c to stop)");
    let deadline = args
        .seconds
        .map(|s| std::time::Instant::now() + Duration::from_secs(s));

    while running.load(Ordering::SeqCst) {
        if let Some(deadline) = deadline {
            if std::time::Instant::now() >= deadline {
                break;
            }
        }
        let pose = session.pose_state();
        if args.json {
            println!("{}", serde_json::to_string(&pose)?);
        } else {
            println!(
                "yaw {:>4}  pitch {:>4}  roll {:>4}  dist {:>4}  vol {:>4}  [{}]",
                pose.yaw,
                pose.pitch,
                pose.roll,
                pose.distance,
                pose.volume,
                if pose.tracking { "tracking" } else { "no face" }
            );
        }
        std::thread::sleep(Duration::from_millis(250));
    }

    session.stop();
    Ok(())
}

#[cfg(feature = "audio")]
fn open_microphone(
    config: &PoseCamConfig,
    clock: &SessionClock,
) -> Option<Box<dyn AudioAnalyser>> {
    if !config.session.audio_enabled {
        return None;
    }
    let device = if config.session.audio_device.is_empty() {
        None
    } else {
        Some(config.session.audio_device.as_str())
    };
    match posecam::audio::MicrophoneAnalyser::new(device, clock.clone()) {
        Ok(analyser) => Some(Box::new(analyser)),
        Err(e) => {
            eprintln!("Audio unavailable, continuing without: {}", e);
            None
        }
    }
}

#[cfg(not(feature = "audio"))]
fn open_microphone(
    _config: &PoseCamConfig,
    _clock: &SessionClock,
) -> Option<Box<dyn AudioAnalyser>> {
    None
}
