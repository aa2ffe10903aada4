//! Blocking output device over a cpal stream
//!
//! cpal pulls audio from a callback, so writes go through a single-producer
//! ring that the callback drains. `write` blocks until the whole buffer has
//! been queued, which gives the pipeline the blocking device write it
//! expects.

use crate::audio::OutputDevice;
use crate::{PicoSpeakError, Result};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use log::{debug, error, info, warn};
use ringbuf::traits::{Consumer, Observer, Producer, Split};
use ringbuf::{HeapCons, HeapProd, HeapRb};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

/// How long a blocked writer sleeps before checking the ring again
const WRITE_POLL: Duration = Duration::from_millis(2);

/// Ring capacity in device buffers
const RING_BUFFERS: usize = 4;

/// Extra time allowed for a full ring to play out on stop
const DRAIN_SLACK: Duration = Duration::from_millis(500);

/// Longest `stop` waits for `queued` samples to play at `sample_rate`
fn drain_timeout(queued: usize, sample_rate: u32) -> Duration {
    let rate = u64::from(sample_rate.max(1));
    Duration::from_millis(queued as u64 * 1000 / rate) + DRAIN_SLACK
}

/// Default output device playing mono 16-bit PCM
pub struct CpalDevice {
    stream: cpal::Stream,
    producer: HeapProd<i16>,
    sample_rate: u32,
    /// Set by the stream error callback
    failed: Arc<AtomicBool>,
    playing: bool,
}

impl CpalDevice {
    /// Open the default output device at `sample_rate`
    ///
    /// The stream is created paused; call `start` before writing.
    pub fn open(sample_rate: u32, buffer_size: usize) -> Result<Self> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or_else(|| PicoSpeakError::Device("No output device available".to_string()))?;
        if let Ok(name) = device.name() {
            info!("Using output device: {}", name);
        }

        let default_config = device
            .default_output_config()
            .map_err(|e| PicoSpeakError::Device(format!("Failed to query device config: {}", e)))?;

        let config = cpal::StreamConfig {
            channels: default_config.channels(),
            sample_rate: cpal::SampleRate(sample_rate),
            buffer_size: cpal::BufferSize::Default,
        };

        let (producer, consumer) = HeapRb::<i16>::new(buffer_size.max(1) * RING_BUFFERS).split();
        let failed = Arc::new(AtomicBool::new(false));

        let stream = match default_config.sample_format() {
            cpal::SampleFormat::F32 => build_stream::<f32>(&device, &config, consumer, failed.clone())?,
            cpal::SampleFormat::I16 => build_stream::<i16>(&device, &config, consumer, failed.clone())?,
            cpal::SampleFormat::U16 => build_stream::<u16>(&device, &config, consumer, failed.clone())?,
            format => {
                return Err(PicoSpeakError::Device(format!(
                    "Unsupported sample format: {:?}",
                    format
                )));
            }
        };

        debug!(
            "Output stream: {} Hz, {} channels, {} sample ring",
            sample_rate,
            config.channels,
            buffer_size * RING_BUFFERS
        );

        Ok(Self {
            stream,
            producer,
            sample_rate,
            failed,
            playing: false,
        })
    }

    fn check_stream(&self) -> Result<()> {
        if self.failed.load(Ordering::Relaxed) {
            return Err(PicoSpeakError::device_write("output stream reported an error"));
        }
        Ok(())
    }
}

fn build_stream<T>(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
    mut consumer: HeapCons<i16>,
    failed: Arc<AtomicBool>,
) -> Result<cpal::Stream>
where
    T: cpal::SizedSample + cpal::FromSample<i16>,
{
    let channels = config.channels as usize;

    let stream = device
        .build_output_stream(
            config,
            move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
                // Mono source, same sample on every channel; silence on underrun
                for frame in data.chunks_mut(channels) {
                    let sample = consumer.try_pop().unwrap_or(0);
                    for out in frame.iter_mut() {
                        *out = T::from_sample(sample);
                    }
                }
            },
            move |err| {
                error!("Audio stream error: {}", err);
                failed.store(true, Ordering::Relaxed);
            },
            None,
        )
        .map_err(|e| PicoSpeakError::Device(format!("Failed to open output stream: {}", e)))?;

    Ok(stream)
}

impl OutputDevice for CpalDevice {
    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn write(&mut self, samples: &[i16]) -> Result<()> {
        if !self.playing {
            self.start()?;
        }

        let mut offset = 0;
        while offset < samples.len() {
            self.check_stream()?;
            let pushed = self.producer.push_slice(&samples[offset..]);
            offset += pushed;
            if pushed == 0 {
                thread::sleep(WRITE_POLL);
            }
        }
        Ok(())
    }

    fn start(&mut self) -> Result<()> {
        debug!("Starting output stream");
        self.stream
            .play()
            .map_err(|e| PicoSpeakError::Device(format!("Failed to start stream: {}", e)))?;
        self.playing = true;
        Ok(())
    }

    fn stop(&mut self) -> Result<()> {
        if !self.playing {
            return Ok(());
        }

        // Let queued audio play out
        let queued = self.producer.occupied_len();
        let deadline = Instant::now() + drain_timeout(queued, self.sample_rate);
        while !self.producer.is_empty() {
            self.check_stream()?;
            if Instant::now() >= deadline {
                warn!(
                    "Output stream stalled with {} samples queued, stopping anyway",
                    self.producer.occupied_len()
                );
                break;
            }
            thread::sleep(WRITE_POLL);
        }

        debug!("Stopping output stream");
        self.stream
            .pause()
            .map_err(|e| PicoSpeakError::Device(format!("Failed to stop stream: {}", e)))?;
        self.playing = false;
        Ok(())
    }
}

impl Drop for CpalDevice {
    fn drop(&mut self) {
        debug!("Shutting down output device");
        if self.playing {
            let _ = self.stream.pause();
        }
    }
}
