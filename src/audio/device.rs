//! Playback device abstraction
//!
//! A device accepts one fixed-size buffer per blocking `write`. Its native
//! rate decides whether the playback writer upsamples.

use crate::Result;
use log::info;

/// Blocking audio output device
pub trait OutputDevice {
    /// Native sample rate of the device stream
    fn sample_rate(&self) -> u32;

    /// Write one buffer, blocking until the device has taken it
    fn write(&mut self, samples: &[i16]) -> Result<()>;

    /// Start the device stream
    fn start(&mut self) -> Result<()> {
        Ok(())
    }

    /// Stop the device stream once queued audio has played
    fn stop(&mut self) -> Result<()> {
        Ok(())
    }
}

impl<T: OutputDevice + ?Sized> OutputDevice for Box<T> {
    fn sample_rate(&self) -> u32 {
        (**self).sample_rate()
    }

    fn write(&mut self, samples: &[i16]) -> Result<()> {
        (**self).write(samples)
    }

    fn start(&mut self) -> Result<()> {
        (**self).start()
    }

    fn stop(&mut self) -> Result<()> {
        (**self).stop()
    }
}

/// Open the default output device at `sample_rate`
///
/// `buffer_size` is the number of samples passed to each `write`.
#[cfg(feature = "playback")]
pub fn create_device(sample_rate: u32, buffer_size: usize) -> Result<Box<dyn OutputDevice>> {
    use super::backends::cpal_device::CpalDevice;

    info!("Opening default output device at {} Hz", sample_rate);
    let device = CpalDevice::open(sample_rate, buffer_size)?;
    info!("✓ Output device ready");
    Ok(Box::new(device))
}

/// Open the default output device at `sample_rate`
///
/// This build has no audio output support compiled in.
#[cfg(not(feature = "playback"))]
pub fn create_device(sample_rate: u32, buffer_size: usize) -> Result<Box<dyn OutputDevice>> {
    info!(
        "Requested {} Hz output device ({} sample buffers), but playback is not compiled in",
        sample_rate, buffer_size
    );
    Err(crate::PicoSpeakError::Device(
        "Playback support not compiled in: rebuild with `--features playback` \
         or write to a file with -o"
            .to_string(),
    ))
}
