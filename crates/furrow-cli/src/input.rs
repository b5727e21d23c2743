//! Scenario file loading.
//!
//! Every command takes its structured inputs (locations, plants, weather,
//! site profiles, regional calendars) as YAML files using the same field
//! names as the JSON output.

use std::path::Path;

use serde::de::DeserializeOwned;

use tracing::info;

use furrow_engine::EngineConfig;

use crate::error::CliError;

/// Config file picked up from the working directory when `--config` is
/// not given.
pub const DEFAULT_CONFIG_PATH: &str = "furrow.yaml";

/// Read and parse a YAML file.
pub fn read_yaml<T: DeserializeOwned>(path: &Path) -> Result<T, CliError> {
    let contents = std::fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_yml::from_str(&contents).map_err(|source| CliError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Read an optional YAML file.
pub fn read_optional<T: DeserializeOwned>(path: Option<&Path>) -> Result<Option<T>, CliError> {
    path.map(read_yaml).transpose()
}

/// Load configuration from `path`, or from [`DEFAULT_CONFIG_PATH`] when it
/// exists, or fall back to defaults.
pub fn load_config(path: Option<&Path>) -> Result<EngineConfig, CliError> {
    if let Some(path) = path {
        return Ok(EngineConfig::from_file(path)?);
    }
    let default_path = Path::new(DEFAULT_CONFIG_PATH);
    if default_path.exists() {
        Ok(EngineConfig::from_file(default_path)?)
    } else {
        let mut config = EngineConfig::default();
        config.logging.apply_env_overrides();
        Ok(config)
    }
}

/// Log where the configuration came from. Called once logging is up.
pub fn log_config_source(path: Option<&Path>) {
    match path {
        Some(path) => info!(path = %path.display(), "Configuration loaded"),
        None if Path::new(DEFAULT_CONFIG_PATH).exists() => {
            info!(path = DEFAULT_CONFIG_PATH, "Configuration loaded");
        }
        None => info!("Config file not found, using defaults"),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
