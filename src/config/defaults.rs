//! Built-in defaults, the lowest configuration layer.

use crate::dispatch::DispatcherConfig;
use crate::frame::GridConfig;
use crate::logging::LoggingConfig;
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError};

/// A builder with every key's default set.
pub fn builder_with_defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    let dispatcher = DispatcherConfig::default();
    let grid = GridConfig::default();
    let logging = LoggingConfig::default();

    Config::builder()
        .set_default("dispatcher.max_concurrent", dispatcher.max_concurrent as u64)?
        .set_default("dispatcher.max_dimension", dispatcher.max_dimension as u64)?
        .set_default("grid.initial_column_width", grid.initial_column_width as u64)?
        .set_default("logging.level", logging.level)?
        .set_default("logging.format", logging.format)?
        .set_default("logging.output", logging.output)?
        .set_default("logging.file", logging.file.to_string_lossy().into_owned())?
        .set_default("logging.color", logging.color)
}
