//! Text push / sample pull protocol with the synthesis engine
//!
//! Every push is followed by a drain: the engine is pulled until it reports
//! completion and the produced samples are handed to a [`Sink`] in the
//! order they were produced. Everything runs on the caller's thread.

use crate::audio::Sink;
use crate::speech::{EngineStatus, PullStatus, SynthEngine};
use crate::{PicoSpeakError, Result};
use log::debug;

/// Pushed to make the engine render a trailing sentence fragment
const END_OF_INPUT: [u8; 1] = [0];

/// Sizes used by the drain loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DriverConfig {
    /// Maximum samples requested by one pull
    pub pull_size: usize,
    /// Capacity of the local working buffer in samples
    pub chunk_capacity: usize,
}

impl DriverConfig {
    pub const DEFAULT_PULL_SIZE: usize = 128;
    pub const DEFAULT_CHUNK_PULLS: usize = 16;

    /// Working buffer holding `chunk_pulls` full pulls
    pub fn new(pull_size: usize, chunk_pulls: usize) -> Result<Self> {
        if pull_size == 0 || chunk_pulls == 0 {
            return Err(PicoSpeakError::Config(format!(
                "pull size ({}) and pulls per chunk ({}) must be positive",
                pull_size, chunk_pulls
            )));
        }
        Ok(Self {
            pull_size,
            chunk_capacity: pull_size * chunk_pulls,
        })
    }
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            pull_size: Self::DEFAULT_PULL_SIZE,
            chunk_capacity: Self::DEFAULT_PULL_SIZE * Self::DEFAULT_CHUNK_PULLS,
        }
    }
}

/// Drives a synthesis engine and forwards its output
pub struct SynthesisDriver<E> {
    engine: E,
    config: DriverConfig,
    /// Accumulates pulled samples between deliveries
    work: Vec<i16>,
}

impl<E: SynthEngine> SynthesisDriver<E> {
    pub fn new(engine: E, config: DriverConfig) -> Self {
        debug!(
            "Creating synthesis driver: pull size {}, chunk capacity {}",
            config.pull_size, config.chunk_capacity
        );
        Self {
            engine,
            config,
            work: vec![0; config.chunk_capacity.max(config.pull_size)],
        }
    }

    pub fn config(&self) -> &DriverConfig {
        &self.config
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }

    /// Push `text` into the engine, delivering audio as it is produced
    ///
    /// The engine may take only part of the text per push; the unsent
    /// suffix is offered again after each drain until all of it is in.
    pub fn send_text<S: Sink + ?Sized>(&mut self, text: &str, sink: &mut S) -> Result<()> {
        let bytes = text.as_bytes();
        let mut offset = 0;

        while offset < bytes.len() {
            let remaining = bytes.len() - offset;
            let sent = self
                .engine
                .put_text(&bytes[offset..])
                .map_err(|status| self.engine_error("sending text", status))?;
            if sent > remaining {
                return Err(PicoSpeakError::Engine {
                    context: "sending text".to_string(),
                    message: format!("engine accepted {} of {} bytes", sent, remaining),
                });
            }
            debug!("Engine accepted {} of {} bytes", sent, remaining);
            offset += sent;

            self.drain(sink)?;
        }

        Ok(())
    }

    /// Force out audio for text still waiting on a sentence end
    ///
    /// Safe to call with nothing pending.
    pub fn flush_pending_text<S: Sink + ?Sized>(&mut self, sink: &mut S) -> Result<()> {
        debug!("Flushing pending engine input");
        self.engine
            .put_text(&END_OF_INPUT)
            .map_err(|status| self.engine_error("sending text", status))?;
        self.drain(sink)
    }

    /// Pull until the engine is idle, delivering the accumulated samples
    fn drain<S: Sink + ?Sized>(&mut self, sink: &mut S) -> Result<()> {
        let pull = self.config.pull_size;
        let mut filled = 0;

        loop {
            // The next pull might not fit, deliver what we have now
            if self.work.len() - filled < pull {
                Self::deliver(sink, &self.work[..filled])?;
                filled = 0;
            }

            let (received, status) = self.engine.get_data(&mut self.work[filled..filled + pull]);
            filled += received.min(pull);

            match status {
                PullStatus::Producing => {}
                PullStatus::Complete => break,
                PullStatus::Error(status) => {
                    return Err(self.engine_error("getting data", status));
                }
            }
        }

        Self::deliver(sink, &self.work[..filled])
    }

    fn deliver<S: Sink + ?Sized>(sink: &mut S, chunk: &[i16]) -> Result<()> {
        if chunk.is_empty() {
            return Ok(());
        }
        debug!("Delivering chunk of {} samples", chunk.len());
        sink.write_chunk(chunk)
    }

    fn engine_error(&self, context: &str, status: EngineStatus) -> PicoSpeakError {
        PicoSpeakError::Engine {
            context: context.to_string(),
            message: self.engine.status_message(status),
        }
    }
}
