//! Configuration management

use crate::speech::{parse_language_name, DriverConfig, Language};
use crate::{PicoSpeakError, Result};
use ini::Ini;
use log::{debug, info};
use std::path::{Path, PathBuf};

/// Persistent settings for the speech pipeline
///
/// Stored as INI in ~/.picospeak.cfg. Command-line options take
/// precedence over anything read here.
pub struct Config {
    /// INI configuration storage
    ini: Ini,

    /// Config file path
    path: PathBuf,
}

impl Config {
    /// Load configuration from ~/.picospeak.cfg, creating it if missing
    pub fn load() -> Result<Self> {
        Self::load_from(Self::config_path())
    }

    /// Load configuration from `path`, creating it with defaults if missing
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        debug!("Loading config from {:?}", path);

        let ini = if path.exists() {
            Ini::load_from_file(&path)
                .map_err(|e| PicoSpeakError::IniParse(format!("Failed to load config: {}", e)))?
        } else {
            info!("Config file not found, creating default");
            let default = Self::default_config();
            default
                .write_to_file(&path)
                .map_err(|e| PicoSpeakError::IniParse(format!("Failed to write config: {}", e)))?;
            default
        };

        Ok(Self { ini, path })
    }

    /// Save configuration to disk
    pub fn save(&self) -> Result<()> {
        debug!("Saving config to {:?}", self.path);
        self.ini
            .write_to_file(&self.path)
            .map_err(|e| PicoSpeakError::Config(format!("Failed to save config: {}", e)))
    }

    /// Default config file path (~/.picospeak.cfg)
    fn config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".picospeak.cfg")
    }

    /// Expose the config file path for display
    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    /// Create default configuration
    fn default_config() -> Ini {
        let mut ini = Ini::new();

        ini.with_section(Some("speech"))
            .set("language", "en-US")
            .set("lang_dir", "/usr/share/pico/lang/")
            .set("pull_size", DriverConfig::DEFAULT_PULL_SIZE.to_string())
            .set("chunk_pulls", DriverConfig::DEFAULT_CHUNK_PULLS.to_string());

        ini.with_section(Some("playback"))
            .set("upsample", "false")
            .set("buffer_size", "1536");

        ini
    }

    /// Get a boolean value from config
    pub fn get_bool(&self, section: &str, key: &str, default: bool) -> bool {
        self.ini
            .get_from(Some(section), key)
            .and_then(|v| v.parse().ok())
            .unwrap_or(default)
    }

    /// Get a string value from config
    pub fn get_string(&self, section: &str, key: &str, default: &str) -> String {
        self.ini
            .get_from(Some(section), key)
            .unwrap_or(default)
            .to_string()
    }

    /// Get an unsigned integer value from config
    pub fn get_usize(&self, section: &str, key: &str, default: usize) -> usize {
        self.ini
            .get_from(Some(section), key)
            .and_then(|v| v.parse().ok())
            .unwrap_or(default)
    }

    /// Set a value in config
    pub fn set(&mut self, section: &str, key: &str, value: &str) {
        self.ini.with_section(Some(section)).set(key, value);
    }

    /// Synthesis language; unknown names fall back to en-US
    pub fn language(&self) -> Language {
        parse_language_name(&self.get_string("speech", "language", "en-US"))
    }

    /// Directory holding the lingware files
    pub fn lang_dir(&self) -> PathBuf {
        PathBuf::from(self.get_string("speech", "lang_dir", "/usr/share/pico/lang/"))
    }

    /// Drain loop sizes
    pub fn driver_config(&self) -> Result<DriverConfig> {
        DriverConfig::new(
            self.get_usize("speech", "pull_size", DriverConfig::DEFAULT_PULL_SIZE),
            self.get_usize("speech", "chunk_pulls", DriverConfig::DEFAULT_CHUNK_PULLS),
        )
    }

    /// Should playback run at 48 kHz through the upsampler?
    pub fn upsample(&self) -> bool {
        self.get_bool("playback", "upsample", false)
    }

    /// Device buffer capacity in samples at the device rate
    pub fn buffer_size(&self) -> usize {
        self.get_usize("playback", "buffer_size", 1536)
    }
}
