//! Structured logging setup.
//!
//! Installs a `tracing-subscriber` fmt subscriber from a [`LoggingConfig`].
//! `RUST_LOG` takes precedence over the configured level when set.

use crate::config::LoggingConfig;
use crate::error::{ProtocolError, Result};
use std::fs::OpenOptions;
use std::sync::Mutex;
use tracing::debug;
use tracing_subscriber::fmt::writer::{BoxMakeWriter, MakeWriterExt};
use tracing_subscriber::EnvFilter;

/// Install the global subscriber.
///
/// Calling this again after a subscriber is installed is a no-op.
pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.as_str().to_lowercase()));

    let file = if config.log_to_file {
        let path = config.log_file_path.as_deref().ok_or_else(|| {
            ProtocolError::ConfigError(
                "log_file_path must be specified when log_to_file is true".to_string(),
            )
        })?;
        Some(OpenOptions::new().create(true).append(true).open(path)?)
    } else {
        None
    };

    let writer = match (config.log_to_console, file) {
        (true, Some(file)) => BoxMakeWriter::new(std::io::stderr.and(Mutex::new(file))),
        (false, Some(file)) => BoxMakeWriter::new(Mutex::new(file)),
        (_, None) => BoxMakeWriter::new(std::io::stderr),
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(!config.log_to_file)
        .with_writer(writer);

    let installed = if config.json_format {
        builder.json().try_init()
    } else {
        builder.try_init()
    };

    match installed {
        Ok(()) => debug!(app = %config.app_name, "Logging initialized"),
        Err(_) => debug!("Global subscriber already installed, keeping it"),
    }
    Ok(())
}
