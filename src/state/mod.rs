//! Speech session state
//!
//! A Session owns the synthesis driver and whichever sinks are configured,
//! and wires them together for each call. It also knows the order things
//! must be shut down in so no trailing audio is lost.

pub mod config;

use crate::audio::{DeliveryMultiplexer, FileSink, OutputDevice, PlaybackBufferWriter, Sink};
use crate::speech::{DriverConfig, SynthEngine, SynthesisDriver};
use crate::{PicoSpeakError, Result};
use log::{error, info};
use std::path::Path;

/// One engine plus its file and playback outputs
pub struct Session<E = Box<dyn SynthEngine>, D = Box<dyn OutputDevice>> {
    driver: SynthesisDriver<E>,

    /// Encoded file output, if configured
    file: Option<FileSink>,

    /// Device output, if configured
    playback: Option<PlaybackBufferWriter<D>>,

    /// Set when a call failed; the engine may hold a half-rendered utterance
    halted: bool,
}

impl<E: SynthEngine, D: OutputDevice> Session<E, D> {
    pub fn new(engine: E, config: DriverConfig) -> Self {
        Self {
            driver: SynthesisDriver::new(engine, config),
            file: None,
            playback: None,
            halted: false,
        }
    }

    pub fn driver(&self) -> &SynthesisDriver<E> {
        &self.driver
    }

    pub fn file(&self) -> Option<&FileSink> {
        self.file.as_ref()
    }

    pub fn playback(&self) -> Option<&PlaybackBufferWriter<D>> {
        self.playback.as_ref()
    }

    pub fn is_halted(&self) -> bool {
        self.halted
    }

    /// Send audio to `path`; the container follows the file extension
    ///
    /// An already open file output is finalized first.
    pub fn set_file_output(&mut self, path: impl AsRef<Path>) -> Result<()> {
        self.close_file_output()?;
        self.file = Some(FileSink::create(path)?);
        Ok(())
    }

    /// Finalize and detach the file output, if any
    pub fn close_file_output(&mut self) -> Result<()> {
        // Detach first so the sink is unreachable while it is finalized
        match self.file.take() {
            Some(sink) => {
                info!("Closing file output {}", sink.path().display());
                sink.finalize()
            }
            None => Ok(()),
        }
    }

    /// Play audio on `device` through a buffer of `capacity` samples
    ///
    /// An already configured device gets its partial buffer and is stopped
    /// first.
    pub fn set_playback(&mut self, device: D, capacity: usize) -> Result<()> {
        self.close_playback()?;
        let mut writer = PlaybackBufferWriter::new(device, capacity)?;
        writer.device_mut().start()?;
        info!(
            "Playback at {} Hz ({} sample buffer)",
            writer.device().sample_rate(),
            capacity
        );
        self.playback = Some(writer);
        Ok(())
    }

    /// Write the partial device buffer, stop the device and detach it
    pub fn close_playback(&mut self) -> Result<()> {
        match self.playback.take() {
            Some(mut writer) => {
                info!("Closing playback after {} device writes", writer.writes());
                let result = writer.finish().and_then(|_| writer.device_mut().stop());
                if let Err(e) = &result {
                    error!("Failed to finish playback: {}", e);
                }
                result
            }
            None => Ok(()),
        }
    }

    /// Synthesize `text`, delivering audio as sentences complete
    pub fn send_text(&mut self, text: &str) -> Result<()> {
        self.ensure_running()?;
        let result = {
            let (driver, mut mux) = self.split();
            driver.send_text(text, &mut mux)
        };
        self.halt_on_error(result)
    }

    /// Render whatever text is still waiting on a sentence end
    pub fn flush_pending_text(&mut self) -> Result<()> {
        self.ensure_running()?;
        let result = {
            let (driver, mut mux) = self.split();
            driver.flush_pending_text(&mut mux)
        };
        self.halt_on_error(result)
    }

    /// Shut the outputs down without losing trailing audio
    ///
    /// Flushes pending text, writes the partial device buffer, stops the
    /// device and closes the file. Every step runs; the first error wins.
    pub fn finish(&mut self) -> Result<()> {
        let flushed = if self.halted {
            Ok(())
        } else {
            self.flush_pending_text()
        };

        let played = self.close_playback();
        let closed = self.close_file_output();
        flushed.and(played).and(closed)
    }

    fn split(&mut self) -> (&mut SynthesisDriver<E>, DeliveryMultiplexer<'_>) {
        let mux = DeliveryMultiplexer::new(
            self.file.as_mut().map(|sink| sink as &mut dyn Sink),
            self.playback.as_mut().map(|sink| sink as &mut dyn Sink),
        );
        (&mut self.driver, mux)
    }

    fn ensure_running(&self) -> Result<()> {
        if self.halted {
            return Err(PicoSpeakError::Halted);
        }
        Ok(())
    }

    fn halt_on_error(&mut self, result: Result<()>) -> Result<()> {
        if let Err(e) = &result {
            error!("Halting session: {}", e);
            self.halted = true;
        }
        result
    }
}
