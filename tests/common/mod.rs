//! Shared test doubles for the speech pipeline
#![allow(dead_code)]

use picospeak::audio::{OutputDevice, Sink};
use picospeak::speech::{EngineStatus, PullStatus, SynthEngine};
use picospeak::{PicoSpeakError, Result};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

/// Deterministic engine stub
///
/// Buffers text until a sentence end ('.', '!' or '?') or a NUL flush
/// byte, then renders `samples_per_byte` samples for every buffered byte.
/// A push stops right after a sentence end, like a real engine that only
/// takes one sentence at a time.
pub struct ScriptedEngine {
    pub samples_per_byte: usize,
    /// Most bytes accepted by one push
    pub max_accept: usize,
    /// Most samples returned by one pull
    pub max_pull: usize,
    /// Fail the pull with this (1-based) index
    pub fail_on_pull: Option<usize>,
    /// Reject the push with this (1-based) index
    pub fail_on_push: Option<usize>,
    pub pushes: Vec<Vec<u8>>,
    pub pulls: usize,
    pending: Vec<u8>,
    queued: VecDeque<i16>,
}

impl ScriptedEngine {
    pub fn new(samples_per_byte: usize) -> Self {
        Self {
            samples_per_byte,
            max_accept: usize::MAX,
            max_pull: usize::MAX,
            fail_on_pull: None,
            fail_on_push: None,
            pushes: Vec::new(),
            pulls: 0,
            pending: Vec::new(),
            queued: VecDeque::new(),
        }
    }

    /// Text waiting for a sentence end
    pub fn pending(&self) -> &[u8] {
        &self.pending
    }

    fn render(&mut self) {
        for &byte in &self.pending {
            for k in 0..self.samples_per_byte {
                self.queued.push_back(i16::from(byte) * 100 + k as i16);
            }
        }
        self.pending.clear();
    }
}

impl SynthEngine for ScriptedEngine {
    fn put_text(&mut self, text: &[u8]) -> std::result::Result<usize, EngineStatus> {
        if self.fail_on_push == Some(self.pushes.len() + 1) {
            self.pushes.push(Vec::new());
            return Err(EngineStatus(-7));
        }
        let mut accepted = 0;
        for &byte in text.iter().take(self.max_accept) {
            accepted += 1;
            if byte == 0 {
                self.render();
                continue;
            }
            self.pending.push(byte);
            if matches!(byte, b'.' | b'!' | b'?') {
                self.render();
                break;
            }
        }
        self.pushes.push(text[..accepted].to_vec());
        Ok(accepted)
    }

    fn get_data(&mut self, out: &mut [i16]) -> (usize, PullStatus) {
        self.pulls += 1;
        if self.fail_on_pull == Some(self.pulls) {
            return (0, PullStatus::Error(EngineStatus(-42)));
        }
        if self.queued.is_empty() {
            return (0, PullStatus::Complete);
        }
        let n = out.len().min(self.max_pull).min(self.queued.len());
        for slot in out.iter_mut().take(n) {
            *slot = self.queued.pop_front().unwrap();
        }
        (n, PullStatus::Producing)
    }

    fn status_message(&self, status: EngineStatus) -> String {
        format!("scripted failure {}", status.0)
    }
}

/// Samples the scripted engine renders for `text`
pub fn expected_samples(text: &str, samples_per_byte: usize) -> Vec<i16> {
    text.bytes()
        .flat_map(|byte| (0..samples_per_byte).map(move |k| i16::from(byte) * 100 + k as i16))
        .collect()
}

/// Keeps every chunk it is given
#[derive(Default)]
pub struct ChunkRecorder {
    pub chunks: Vec<Vec<i16>>,
}

impl ChunkRecorder {
    pub fn samples(&self) -> Vec<i16> {
        self.chunks.concat()
    }
}

impl Sink for ChunkRecorder {
    fn write_chunk(&mut self, chunk: &[i16]) -> Result<()> {
        self.chunks.push(chunk.to_vec());
        Ok(())
    }
}

/// What happened to a recording device, shared with the test
#[derive(Default)]
pub struct DeviceLog {
    pub writes: Vec<Vec<i16>>,
    pub events: Vec<&'static str>,
    pub fail_writes: bool,
}

/// Device that records buffers instead of playing them
pub struct RecordingDevice {
    rate: u32,
    pub log: Rc<RefCell<DeviceLog>>,
}

impl RecordingDevice {
    pub fn new(rate: u32) -> (Self, Rc<RefCell<DeviceLog>>) {
        let log = Rc::new(RefCell::new(DeviceLog::default()));
        (Self { rate, log: log.clone() }, log)
    }
}

impl OutputDevice for RecordingDevice {
    fn sample_rate(&self) -> u32 {
        self.rate
    }

    fn write(&mut self, samples: &[i16]) -> Result<()> {
        let mut log = self.log.borrow_mut();
        if log.fail_writes {
            return Err(PicoSpeakError::device_write("device unplugged"));
        }
        log.writes.push(samples.to_vec());
        log.events.push("write");
        Ok(())
    }

    fn start(&mut self) -> Result<()> {
        self.log.borrow_mut().events.push("start");
        Ok(())
    }

    fn stop(&mut self) -> Result<()> {
        self.log.borrow_mut().events.push("stop");
        Ok(())
    }
}
