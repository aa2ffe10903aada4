//! Platform audio output backends

// Blocking writes over a cpal output stream
#[cfg(feature = "playback")]
pub mod cpal_device;
