//! Fixed-capacity device buffer
//!
//! Samples are copied into the buffer until it is exactly full, at which
//! point the whole buffer goes to the device in one blocking write and the
//! buffer starts over, zeroed. When the device runs at 48 kHz the copy is
//! replaced by the upsampler and the buffer counts as full once no more
//! triplets fit.

use crate::audio::{OutputDevice, Sink, Upsampler, UPSAMPLE_FACTOR};
use crate::{PicoSpeakError, Result, SOURCE_SAMPLE_RATE, UPSAMPLED_RATE};
use log::{debug, warn};

/// Device buffer size for a requested capacity
///
/// When upsampling, the size is rounded down to whole triplets so no
/// silent slot lands inside continuous speech.
pub fn playback_capacity(requested: usize, upsample: bool) -> usize {
    if upsample {
        (requested - requested % UPSAMPLE_FACTOR).max(UPSAMPLE_FACTOR)
    } else {
        requested
    }
}

/// Accumulates chunks into device-sized buffers
pub struct PlaybackBufferWriter<D> {
    device: D,
    buffer: Vec<i16>,
    /// Write cursor, never past `buffer.len()`
    pos: usize,
    upsampler: Option<Upsampler>,
    /// Device writes issued so far
    writes: usize,
}

impl<D: OutputDevice> PlaybackBufferWriter<D> {
    /// Wrap `device` with a buffer of `capacity` samples at the device rate
    pub fn new(device: D, capacity: usize) -> Result<Self> {
        let upsampler = match device.sample_rate() {
            SOURCE_SAMPLE_RATE => None,
            UPSAMPLED_RATE => Some(Upsampler::new()),
            rate => {
                return Err(PicoSpeakError::Device(format!(
                    "Unsupported device rate {} Hz (expected {} or {})",
                    rate, SOURCE_SAMPLE_RATE, UPSAMPLED_RATE
                )));
            }
        };

        let minimum = if upsampler.is_some() { UPSAMPLE_FACTOR } else { 1 };
        if capacity < minimum {
            return Err(PicoSpeakError::Config(format!(
                "Playback buffer of {} samples is too small (minimum {})",
                capacity, minimum
            )));
        }

        if upsampler.is_some() && capacity % UPSAMPLE_FACTOR != 0 {
            warn!(
                "Playback buffer of {} samples is not a multiple of {}; \
                 each device write ends with a silent slot",
                capacity, UPSAMPLE_FACTOR
            );
        }

        debug!(
            "Playback buffer: {} samples, upsampling {}",
            capacity,
            if upsampler.is_some() { "on" } else { "off" }
        );

        Ok(Self {
            device,
            buffer: vec![0; capacity],
            pos: 0,
            upsampler,
            writes: 0,
        })
    }

    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn is_upsampling(&self) -> bool {
        self.upsampler.is_some()
    }

    /// Samples waiting for the next device write
    pub fn buffered(&self) -> &[i16] {
        &self.buffer[..self.pos]
    }

    /// Number of device writes issued
    pub fn writes(&self) -> usize {
        self.writes
    }

    pub fn device(&self) -> &D {
        &self.device
    }

    pub fn device_mut(&mut self) -> &mut D {
        &mut self.device
    }

    pub fn into_device(self) -> D {
        self.device
    }

    /// Copy `chunk` into the buffer, writing to the device each time it fills
    pub fn write(&mut self, chunk: &[i16]) -> Result<()> {
        let mut offset = 0;

        while offset < chunk.len() {
            let rest = &chunk[offset..];
            let consumed = match self.upsampler.as_mut() {
                Some(upsampler) => {
                    let (consumed, pos) = upsampler.process(rest, &mut self.buffer, self.pos);
                    self.pos = pos;
                    consumed
                }
                None => {
                    let n = rest.len().min(self.buffer.len() - self.pos);
                    self.buffer[self.pos..self.pos + n].copy_from_slice(&rest[..n]);
                    self.pos += n;
                    n
                }
            };
            offset += consumed;

            if self.is_full() {
                self.write_buffer()?;
            }
        }

        Ok(())
    }

    /// Write out a partially filled buffer before the device is stopped
    ///
    /// The unfilled tail is silence. Without this the trailing audio is lost.
    pub fn finish(&mut self) -> Result<()> {
        if self.pos == 0 {
            return Ok(());
        }
        debug!("Writing final partial buffer ({} samples)", self.pos);
        self.write_buffer()
    }

    fn is_full(&self) -> bool {
        let room = self.buffer.len() - self.pos;
        match self.upsampler {
            Some(_) => room < UPSAMPLE_FACTOR,
            None => room == 0,
        }
    }

    fn write_buffer(&mut self) -> Result<()> {
        self.device.write(&self.buffer)?;
        self.writes += 1;
        self.buffer.fill(0);
        self.pos = 0;
        Ok(())
    }
}

impl<D: OutputDevice> Sink for PlaybackBufferWriter<D> {
    fn write_chunk(&mut self, chunk: &[i16]) -> Result<()> {
        self.write(chunk)
    }
}
