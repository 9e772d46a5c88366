//! User config file source: `<config dir>/frame-engine/config.toml`.

use config::builder::DefaultState;
use config::{ConfigBuilder, File, FileFormat};
use directories::ProjectDirs;
use std::path::PathBuf;
use tracing::debug;

const CONFIG_FILE_NAME: &str = "config.toml";

/// Path to the user config file, if the platform has a config directory.
pub fn global_config_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "frame-engine").map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
}

/// Add the user config file to the builder if it exists.
pub fn add_to_builder(builder: ConfigBuilder<DefaultState>) -> ConfigBuilder<DefaultState> {
    match global_config_path() {
        Some(path) if path.is_file() => {
            debug!(config_path = %path.display(), "Loading user configuration");
            builder.add_source(File::from(path).format(FileFormat::Toml).required(false))
        }
        Some(path) => {
            debug!(config_path = %path.display(), "No user configuration file");
            builder
        }
        None => builder,
    }
}
