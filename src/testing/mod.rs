//! Testing utilities - synthetic capability implementations for
//! offline testing without camera, microphone, or tracker hardware.

pub mod synthetic_data;

pub use synthetic_data::{
    synthetic_audio_window, synthetic_video_frame, transform_from_euler, SyntheticAnalyser,
    SyntheticCamera, SyntheticTracker,
};
