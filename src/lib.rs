//! picospeak - streaming speech output for the SVOX Pico synthesizer
//!
//! Pushes text into a synthesis engine, drains the PCM it produces and
//! routes every chunk to an encoded file, a playback device, or both.

pub mod audio;
pub mod error;
pub mod speech;
pub mod state;

pub use error::{PicoSpeakError, Result};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const APP_NAME: &str = "picospeak";

/// Rate of the PCM the synthesis engine produces (mono, 16-bit)
pub const SOURCE_SAMPLE_RATE: u32 = 16_000;

/// Device rate that engages the 1:3 upsampler
pub const UPSAMPLED_RATE: u32 = 48_000;
