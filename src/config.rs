//! Configuration System
//!
//! Layered configuration for the dispatcher, the grid and logging. Layers,
//! lowest to highest: built-in defaults, the user config file, an explicit
//! file, then `FRAME_ENGINE__SECTION__KEY` environment variables.

use crate::dispatch::DispatcherConfig;
use crate::error::EngineError;
use crate::frame::GridConfig;
use crate::logging::LoggingConfig;
use config::{Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

mod defaults;
mod global_file;

pub use global_file::global_config_path;

pub const ENV_PREFIX: &str = "FRAME_ENGINE";
const ENV_SEPARATOR: &str = "__";

/// Root configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub dispatcher: DispatcherConfig,

    #[serde(default)]
    pub grid: GridConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Configuration validation errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    Dispatcher(String),
    Grid(String),
    Logging(String),
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::Dispatcher(msg) => write!(f, "dispatcher: {}", msg),
            ValidationError::Grid(msg) => write!(f, "grid: {}", msg),
            ValidationError::Logging(msg) => write!(f, "logging: {}", msg),
        }
    }
}

impl std::error::Error for ValidationError {}

impl EngineConfig {
    /// Validate every section, collecting all violations.
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if let Err(e) = self.dispatcher.validate() {
            errors.push(ValidationError::Dispatcher(e));
        }
        if let Err(e) = self.grid.validate() {
            errors.push(ValidationError::Grid(e));
        }
        if let Err(e) = self.logging.validate() {
            errors.push(ValidationError::Logging(e));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Render the configuration as TOML.
    pub fn to_toml(&self) -> Result<String, EngineError> {
        toml::to_string_pretty(self)
            .map_err(|e| EngineError::Config(format!("Failed to render configuration: {}", e)))
    }
}

/// Builds an [`EngineConfig`] from the configuration layers.
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    explicit_file: Option<PathBuf>,
    user_file: bool,
    environment: bool,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self {
            explicit_file: None,
            user_file: true,
            environment: true,
        }
    }
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Layer a file above the user config. The file must exist.
    pub fn with_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.explicit_file = Some(path.into());
        self
    }

    /// Skip the user config file.
    pub fn without_user_file(mut self) -> Self {
        self.user_file = false;
        self
    }

    /// Skip environment overrides.
    pub fn without_environment(mut self) -> Self {
        self.environment = false;
        self
    }

    /// Load, then validate.
    pub fn load(&self) -> Result<EngineConfig, EngineError> {
        let mut builder = defaults::builder_with_defaults()?;

        if self.user_file {
            builder = global_file::add_to_builder(builder);
        }

        if let Some(path) = &self.explicit_file {
            builder = builder.add_source(explicit_source(path)?);
        }

        if self.environment {
            builder = builder.add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator(ENV_SEPARATOR)
                    .separator(ENV_SEPARATOR)
                    .try_parsing(true),
            );
        }

        let config: EngineConfig = builder.build()?.try_deserialize()?;
        config.validate().map_err(|errors| {
            let messages: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
            EngineError::Config(format!(
                "Configuration validation failed:\n{}",
                messages.join("\n")
            ))
        })?;

        debug!(?config, "Configuration loaded");
        Ok(config)
    }
}

fn explicit_source(
    path: &Path,
) -> Result<File<config::FileSourceFile, FileFormat>, EngineError> {
    if !path.is_file() {
        return Err(EngineError::Config(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }
    Ok(File::from(path).format(FileFormat::Toml).required(true))
}
