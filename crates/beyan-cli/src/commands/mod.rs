//! Subcommand implementations.

pub mod batch;
pub mod config;
pub mod process;
pub mod rules;

use std::path::Path;

use beyan_core::BeyanConfig;

/// Load the configuration given by `--config`, else the user config file,
/// else the defaults.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<BeyanConfig> {
    if let Some(path) = config_path {
        return Ok(BeyanConfig::from_file(Path::new(path))?);
    }

    let default_path = config::default_config_path();
    if default_path.exists() {
        Ok(BeyanConfig::from_file(&default_path)?)
    } else {
        Ok(BeyanConfig::default())
    }
}
