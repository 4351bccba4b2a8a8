//! Spectrogram presets stored as TOML.
//!
//! A preset holds any subset of [`SpectrogramConfig`] fields; missing
//! fields take their defaults.
//!
//! ```toml
//! base_freq = 2000.0
//! top_freq = 12000.0
//! exponent = 1.5
//! sines = 512
//! ```

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::stego::SpectrogramConfig;

/// Errors that can occur while reading or writing presets.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParseError(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerializeError(#[from] toml::ser::Error),
}

impl SpectrogramConfig {
    /// Parses a preset from TOML text.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Serializes the preset to TOML text.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Loads a preset file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Writes the preset to a file, creating parent directories as needed.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(path, self.to_toml()?)?;
        Ok(())
    }
}
