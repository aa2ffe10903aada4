//! Speech synthesis side of the pipeline

pub mod backends;
pub mod driver;
pub mod lang;
pub mod synth;

pub use driver::{DriverConfig, SynthesisDriver};
pub use lang::{parse_language_name, supported_languages, Language, LanguageInfo};
pub use synth::{create_engine, EngineStatus, PullStatus, SynthEngine};
