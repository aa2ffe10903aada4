//! Chunk sinks and the multiplexer that fans chunks out to them

use crate::Result;
use log::error;

/// A destination for finished audio chunks
///
/// Chunks are 16 kHz mono PCM, borrowed for the duration of the call.
pub trait Sink {
    fn write_chunk(&mut self, chunk: &[i16]) -> Result<()>;
}

/// Routes each chunk to the configured file and device sinks
///
/// The sinks are borrowed for one driver call; opening and closing them
/// stays with the caller.
#[derive(Default)]
pub struct DeliveryMultiplexer<'a> {
    file: Option<&'a mut dyn Sink>,
    device: Option<&'a mut dyn Sink>,
}

impl<'a> DeliveryMultiplexer<'a> {
    pub fn new(file: Option<&'a mut dyn Sink>, device: Option<&'a mut dyn Sink>) -> Self {
        Self { file, device }
    }

    pub fn with_file(mut self, sink: &'a mut dyn Sink) -> Self {
        self.file = Some(sink);
        self
    }

    pub fn with_device(mut self, sink: &'a mut dyn Sink) -> Self {
        self.device = Some(sink);
        self
    }

    /// No sinks configured; chunks are dropped
    pub fn is_empty(&self) -> bool {
        self.file.is_none() && self.device.is_none()
    }

    /// Hand `chunk` to the file sink, then the device sink
    ///
    /// A failing file sink does not keep the chunk from the device. The
    /// first failure is returned once both have been tried.
    pub fn deliver(&mut self, chunk: &[i16]) -> Result<()> {
        let file_result = match self.file.as_deref_mut() {
            Some(file) => file.write_chunk(chunk),
            None => Ok(()),
        };
        if let Err(e) = &file_result {
            error!("File sink failed: {}", e);
        }

        let device_result = match self.device.as_deref_mut() {
            Some(device) => device.write_chunk(chunk),
            None => Ok(()),
        };
        if let Err(e) = &device_result {
            error!("Device sink failed: {}", e);
        }

        file_result.and(device_result)
    }
}

impl Sink for DeliveryMultiplexer<'_> {
    fn write_chunk(&mut self, chunk: &[i16]) -> Result<()> {
        self.deliver(chunk)
    }
}
