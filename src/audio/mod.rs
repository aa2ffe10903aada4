//! Delivery side of the pipeline: sinks, buffering and rate conversion

pub mod backends;
pub mod buffer;
pub mod device;
pub mod file;
pub mod sink;
pub mod upsample;

pub use buffer::{playback_capacity, PlaybackBufferWriter};
pub use device::{create_device, OutputDevice};
pub use file::{FileFormat, FileSink};
pub use sink::{DeliveryMultiplexer, Sink};
pub use upsample::{Upsampler, UPSAMPLE_FACTOR};
