//! Encoded file output
//!
//! The container is picked from the destination name: `.wav` gives WAVE,
//! `.au` gives Sun AU, anything else is headerless little-endian PCM.
//! All formats hold 16-bit mono samples at 16 kHz.

use crate::audio::Sink;
use crate::{PicoSpeakError, Result, SOURCE_SAMPLE_RATE};
use hound::{SampleFormat, WavSpec, WavWriter};
use log::{debug, info};
use std::fs::File;
use std::io::{self, BufWriter, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

/// AU header: magic, data offset, data size, encoding, rate, channels
const AU_HEADER_LEN: u32 = 24;
const AU_MAGIC: u32 = 0x2e73_6e64;
/// 16-bit linear PCM
const AU_ENCODING_LINEAR_16: u32 = 3;
const AU_UNKNOWN_SIZE: u32 = 0xffff_ffff;

/// Container format of a file sink
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Wav,
    Au,
    Raw,
}

impl FileFormat {
    /// Pick the format from the file extension (case-insensitive)
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
            .as_deref()
        {
            Some("wav") => FileFormat::Wav,
            Some("au") => FileFormat::Au,
            _ => FileFormat::Raw,
        }
    }
}

enum Encoder {
    Wav(WavWriter<BufWriter<File>>),
    Au(BufWriter<File>),
    Raw(BufWriter<File>),
}

/// Streams samples into an encoded file
pub struct FileSink {
    path: PathBuf,
    format: FileFormat,
    encoder: Encoder,
    samples: u64,
}

impl FileSink {
    /// Create (or truncate) `path` and write the container header
    pub fn create(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let format = FileFormat::from_path(&path);
        debug!("Opening {:?} output {:?}", format, path);

        let open_err = |e: io::Error| {
            PicoSpeakError::file_write(format!("unable to open output {}: {}", path.display(), e))
        };

        let encoder = match format {
            FileFormat::Wav => {
                let spec = WavSpec {
                    channels: 1,
                    sample_rate: SOURCE_SAMPLE_RATE,
                    bits_per_sample: 16,
                    sample_format: SampleFormat::Int,
                };
                Encoder::Wav(WavWriter::create(&path, spec)?)
            }
            FileFormat::Au => {
                let mut writer = BufWriter::new(File::create(&path).map_err(open_err)?);
                for field in [
                    AU_MAGIC,
                    AU_HEADER_LEN,
                    AU_UNKNOWN_SIZE,
                    AU_ENCODING_LINEAR_16,
                    SOURCE_SAMPLE_RATE,
                    1,
                ] {
                    writer.write_all(&field.to_be_bytes()).map_err(open_err)?;
                }
                Encoder::Au(writer)
            }
            FileFormat::Raw => Encoder::Raw(BufWriter::new(File::create(&path).map_err(open_err)?)),
        };

        info!("Writing {:?} audio to {}", format, path.display());
        Ok(Self {
            path,
            format,
            encoder,
            samples: 0,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn format(&self) -> FileFormat {
        self.format
    }

    /// Samples written so far
    pub fn samples_written(&self) -> u64 {
        self.samples
    }

    /// Append samples to the file
    pub fn write_samples(&mut self, samples: &[i16]) -> Result<()> {
        match &mut self.encoder {
            Encoder::Wav(writer) => {
                for &sample in samples {
                    writer.write_sample(sample)?;
                }
            }
            Encoder::Au(writer) => {
                for &sample in samples {
                    writer.write_all(&sample.to_be_bytes()).map_err(write_err)?;
                }
            }
            Encoder::Raw(writer) => {
                for &sample in samples {
                    writer.write_all(&sample.to_le_bytes()).map_err(write_err)?;
                }
            }
        }
        self.samples += samples.len() as u64;
        Ok(())
    }

    /// Flush buffered data and complete the container header
    pub fn finalize(self) -> Result<()> {
        debug!(
            "Closing {} after {} samples",
            self.path.display(),
            self.samples
        );
        match self.encoder {
            Encoder::Wav(writer) => writer.finalize()?,
            Encoder::Au(writer) => {
                let mut file = writer.into_inner().map_err(|e| write_err(e.into_error()))?;
                let data_len = u32::try_from(self.samples * 2).unwrap_or(AU_UNKNOWN_SIZE);
                file.seek(SeekFrom::Start(8)).map_err(write_err)?;
                file.write_all(&data_len.to_be_bytes()).map_err(write_err)?;
                file.flush().map_err(write_err)?;
            }
            Encoder::Raw(mut writer) => writer.flush().map_err(write_err)?,
        }
        Ok(())
    }
}

fn write_err(e: io::Error) -> PicoSpeakError {
    PicoSpeakError::file_write(e.to_string())
}

impl Sink for FileSink {
    fn write_chunk(&mut self, chunk: &[i16]) -> Result<()> {
        self.write_samples(chunk)
    }
}
