//! # Configuration Management
//!
//! Centralized configuration for the codec and envelope layer.
//!
//! This module provides structured configuration for decode limits and logging.
//!
//! ## Configuration Sources
//! - TOML files via `from_file()`
//! - Direct instantiation with defaults
//! - Environment-specific overrides (`BIT_PROTOCOL_*`)
//!
//! ## Security Considerations
//! - Envelope decoding checks every length prefix against these limits before
//!   allocating, so a hostile prefix cannot force a large allocation

use crate::core::assigned::MAX_ASSIGNED_LEN;
use crate::error::{ProtocolError, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;
use tracing::Level;

/// Max accepted envelope size in bytes (16 MB)
pub const MAX_ENVELOPE_SIZE: usize = 16 * 1024 * 1024;

/// Max accepted type tag length in bytes
pub const MAX_TYPE_TAG_LEN: usize = 256;

/// Main configuration structure
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct ProtocolConfig {
    /// Envelope codec limits
    #[serde(default)]
    pub codec: CodecConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl ProtocolConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut file = File::open(path)
            .map_err(|e| ProtocolError::ConfigError(format!("Failed to open config file: {e}")))?;

        let mut contents = String::new();
        file.read_to_string(&mut contents)
            .map_err(|e| ProtocolError::ConfigError(format!("Failed to read config file: {e}")))?;

        Self::from_toml(&contents)
    }

    /// Load configuration from TOML string
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str::<Self>(content)
            .map_err(|e| ProtocolError::ConfigError(format!("Failed to parse TOML: {e}")))
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(size) = std::env::var("BIT_PROTOCOL_MAX_ENVELOPE_SIZE") {
            if let Ok(val) = size.parse::<usize>() {
                config.codec.max_envelope_size = val;
            }
        }

        if let Ok(len) = std::env::var("BIT_PROTOCOL_MAX_TYPE_TAG_LEN") {
            if let Ok(val) = len.parse::<usize>() {
                config.codec.max_type_tag_len = val;
            }
        }

        if let Ok(size) = std::env::var("BIT_PROTOCOL_MAX_PAYLOAD_SIZE") {
            if let Ok(val) = size.parse::<usize>() {
                config.codec.max_payload_size = val;
            }
        }

        if let Ok(level) = std::env::var("BIT_PROTOCOL_LOG_LEVEL") {
            config.logging.log_level = Level::from_str(&level).map_err(|_| {
                ProtocolError::ConfigError(format!("Invalid log level: {level}"))
            })?;
        }

        Ok(config)
    }

    /// Apply overrides to the default configuration
    pub fn default_with_overrides<F>(mutator: F) -> Self
    where
        F: FnOnce(&mut Self),
    {
        let mut config = Self::default();
        mutator(&mut config);
        config
    }

    /// Generate example configuration file content
    pub fn example_config() -> String {
        toml::to_string_pretty(&Self::default())
            .unwrap_or_else(|_| String::from("# Failed to generate example config"))
    }

    /// Save configuration to a file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| ProtocolError::ConfigError(format!("Failed to serialize config: {e}")))?;

        std::fs::write(path, content)
            .map_err(|e| ProtocolError::ConfigError(format!("Failed to write config file: {e}")))?;

        Ok(())
    }

    /// Validate the configuration for common issues and misconfigurations
    ///
    /// Returns a list of validation errors. Empty list means configuration is valid.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        errors.extend(self.codec.validate());
        errors.extend(self.logging.validate());
        errors
    }

    /// Validate and return Result - convenience method
    pub fn validate_strict(&self) -> Result<()> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(())
        } else {
            Err(ProtocolError::ConfigError(format!(
                "Configuration validation failed:\n  - {}",
                errors.join("\n  - ")
            )))
        }
    }
}

/// Limits applied while decoding envelopes
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CodecConfig {
    /// Largest encoded envelope accepted, in bytes
    pub max_envelope_size: usize,

    /// Longest type tag accepted, in bytes
    pub max_type_tag_len: usize,

    /// Largest payload accepted, in bytes
    pub max_payload_size: usize,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            max_envelope_size: MAX_ENVELOPE_SIZE,
            max_type_tag_len: MAX_TYPE_TAG_LEN,
            max_payload_size: MAX_ENVELOPE_SIZE,
        }
    }
}

impl CodecConfig {
    /// Validate codec limits
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        // Envelope header alone is two 4-byte prefixes
        if self.max_envelope_size < 8 {
            errors.push("Max envelope size too small (minimum: 8 bytes)".to_string());
        } else if self.max_envelope_size > MAX_ASSIGNED_LEN {
            errors.push(format!(
                "Max envelope size too large: {} bytes (maximum: {MAX_ASSIGNED_LEN})",
                self.max_envelope_size
            ));
        }

        if self.max_type_tag_len == 0 {
            errors.push("Max type tag length must be greater than 0".to_string());
        } else if self.max_type_tag_len > 4096 {
            errors.push(format!(
                "Max type tag length too large: {} (maximum: 4096)",
                self.max_type_tag_len
            ));
        }

        if self.max_payload_size > self.max_envelope_size {
            errors.push("Max payload size cannot be larger than max envelope size".to_string());
        }

        errors
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Application name for logs
    pub app_name: String,

    /// Log level
    #[serde(with = "log_level_serde")]
    pub log_level: Level,

    /// Whether to log to console
    pub log_to_console: bool,

    /// Whether to log to file
    pub log_to_file: bool,

    /// Path to log file (if log_to_file is true)
    pub log_file_path: Option<String>,

    /// Whether to use JSON formatting for logs
    pub json_format: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            app_name: String::from("bit-protocol"),
            log_level: Level::INFO,
            log_to_console: true,
            log_to_file: false,
            log_file_path: None,
            json_format: false,
        }
    }
}

impl LoggingConfig {
    /// Validate logging configuration
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.app_name.is_empty() {
            errors.push("Application name cannot be empty".to_string());
        } else if self.app_name.len() > 64 {
            errors.push(format!(
                "Application name too long: {} characters (maximum: 64)",
                self.app_name.len()
            ));
        }

        if self.log_to_file {
            if let Some(ref path) = self.log_file_path {
                if let Some(parent) = std::path::Path::new(path).parent() {
                    if !parent.as_os_str().is_empty() && !parent.exists() {
                        errors.push(format!(
                            "Log file directory does not exist: {}",
                            parent.display()
                        ));
                    }
                }
            } else {
                errors.push("log_file_path must be specified when log_to_file is true".to_string());
            }
        }

        if !self.log_to_console && !self.log_to_file {
            errors
                .push("At least one logging output (console or file) must be enabled".to_string());
        }

        errors
    }
}

/// Helper module for tracing::Level serialization/deserialization
mod log_level_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::str::FromStr;
    use tracing::Level;

    pub fn serialize<S>(level: &Level, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let level_str = match *level {
            Level::TRACE => "trace",
            Level::DEBUG => "debug",
            Level::INFO => "info",
            Level::WARN => "warn",
            Level::ERROR => "error",
        };
        level_str.serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Level, D::Error>
    where
        D: Deserializer<'de>,
    {
        let level_str = String::deserialize(deserializer)?;
        Level::from_str(&level_str)
            .map_err(|_| serde::de::Error::custom(format!("Invalid log level: {level_str}")))
    }
}
