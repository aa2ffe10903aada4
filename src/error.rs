//! Error types for picospeak

use std::io;
use thiserror::Error;

/// Main error type for picospeak
#[derive(Error, Debug)]
pub enum PicoSpeakError {
    /// The synthesis engine reported a status that is neither busy nor idle.
    /// Chunks delivered before the failure stay delivered.
    #[error("Engine error {context}: {message}")]
    Engine { context: String, message: String },

    /// A file or device sink rejected a write
    #[error("{sink} sink write failed: {message}")]
    SinkWrite { sink: &'static str, message: String },

    #[error("Audio device error: {0}")]
    Device(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("INI parse error: {0}")]
    IniParse(String),

    #[error("Unsupported language: {0}")]
    Language(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Session halted after an earlier failure")]
    Halted,

    #[error("{0}")]
    Other(String),
}

impl PicoSpeakError {
    /// Failure writing to the file sink
    pub fn file_write(message: impl Into<String>) -> Self {
        PicoSpeakError::SinkWrite {
            sink: "file",
            message: message.into(),
        }
    }

    /// Failure writing to the device sink
    pub fn device_write(message: impl Into<String>) -> Self {
        PicoSpeakError::SinkWrite {
            sink: "device",
            message: message.into(),
        }
    }
}

/// Result type alias for picospeak operations
pub type Result<T> = std::result::Result<T, PicoSpeakError>;

impl From<String> for PicoSpeakError {
    fn from(s: String) -> Self {
        PicoSpeakError::Other(s)
    }
}

impl From<&str> for PicoSpeakError {
    fn from(s: &str) -> Self {
        PicoSpeakError::Other(s.to_string())
    }
}

impl From<hound::Error> for PicoSpeakError {
    fn from(e: hound::Error) -> Self {
        PicoSpeakError::file_write(format!("WAV encoder: {}", e))
    }
}
