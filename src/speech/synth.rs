//! Synthesis engine abstraction
//!
//! The engine is push/pull: text goes in through `put_text`, which may
//! accept only part of what it is offered, and PCM comes out through
//! repeated `get_data` calls until the engine reports it is idle.

use crate::speech::Language;
use crate::Result;
use log::info;
use std::fmt;
use std::path::Path;

/// Engine-defined status code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineStatus(pub i32);

impl fmt::Display for EngineStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "status {}", self.0)
    }
}

/// Outcome of a single pull from the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PullStatus {
    /// Still processing; more samples may follow
    Producing,
    /// Everything pushed so far has been rendered
    Complete,
    /// The engine failed
    Error(EngineStatus),
}

/// Speech synthesis engine trait
///
/// Implemented by native engines and by test stubs.
pub trait SynthEngine {
    /// Push UTF-8 text, returning how many bytes the engine accepted
    fn put_text(&mut self, text: &[u8]) -> std::result::Result<usize, EngineStatus>;

    /// Pull produced samples into `out`, returning the count written and the step status
    fn get_data(&mut self, out: &mut [i16]) -> (usize, PullStatus);

    /// Human-readable message for an engine status code
    fn status_message(&self, status: EngineStatus) -> String {
        status.to_string()
    }
}

impl<T: SynthEngine + ?Sized> SynthEngine for Box<T> {
    fn put_text(&mut self, text: &[u8]) -> std::result::Result<usize, EngineStatus> {
        (**self).put_text(text)
    }

    fn get_data(&mut self, out: &mut [i16]) -> (usize, PullStatus) {
        (**self).get_data(out)
    }

    fn status_message(&self, status: EngineStatus) -> String {
        (**self).status_message(status)
    }
}

/// Create the native synthesis engine for `language`
///
/// Lingware files are looked up in `lang_dir`.
#[cfg(feature = "pico")]
pub fn create_engine(language: Language, lang_dir: &Path) -> Result<Box<dyn SynthEngine>> {
    use super::backends::pico::PicoEngine;

    info!("Creating Pico engine for {} from {}", language, lang_dir.display());
    let engine = PicoEngine::new(language, lang_dir)?;
    info!("✓ Pico engine ready");
    Ok(Box::new(engine))
}

/// Create the native synthesis engine for `language`
///
/// This build has no native engine compiled in.
#[cfg(not(feature = "pico"))]
pub fn create_engine(language: Language, lang_dir: &Path) -> Result<Box<dyn SynthEngine>> {
    info!(
        "Requested engine for {} ({}), but Pico support is not compiled in",
        language,
        lang_dir.display()
    );
    Err(crate::PicoSpeakError::Other(
        "No synthesis engine available: rebuild with `--features pico` \
         (requires libttspico, e.g. sudo apt install libttspico-dev)"
            .to_string(),
    ))
}
