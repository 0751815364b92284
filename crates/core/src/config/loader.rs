//! Loading and validation of the orchestrator configuration file.

use std::path::Path;
use tracing::{debug, warn};

use crate::config::error::{ConfigError, ConfigResult};
use crate::config::models::OrchestratorConfig;

/// Load the configuration from a TOML file.
///
/// # Errors
///
/// Returns [`ConfigError::FileRead`] if the file cannot be read,
/// [`ConfigError::TomlParse`] if it is not valid TOML, or
/// [`ConfigError::InvalidConfig`] for out-of-range values.
pub fn load_config(path: &Path) -> ConfigResult<OrchestratorConfig> {
    let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;

    let config: OrchestratorConfig =
        toml::from_str(&contents).map_err(|source| ConfigError::TomlParse {
            path: path.to_path_buf(),
            source,
        })?;

    if config.max_global_concurrency == 0 {
        return Err(ConfigError::InvalidConfig {
            path: path.to_path_buf(),
            reason: "max_global_concurrency must be at least 1".to_string(),
        });
    }
    if config.poll_interval_ms == 0 {
        return Err(ConfigError::InvalidConfig {
            path: path.to_path_buf(),
            reason: "poll_interval_ms must be at least 1".to_string(),
        });
    }

    warn_on_missing_tools(&config);
    Ok(config)
}

/// Load the configuration, falling back to defaults when the file is absent.
///
/// A missing file is normal for local runs; any other error still propagates.
pub fn load_config_or_default(path: &Path) -> ConfigResult<OrchestratorConfig> {
    if path.exists() {
        load_config(path)
    } else {
        debug!(path = %path.display(), "config file not found, using defaults");
        let config = OrchestratorConfig::default();
        warn_on_missing_tools(&config);
        Ok(config)
    }
}

/// Log a warning for every configured stage tool that cannot be resolved.
///
/// Missing tools are not a startup error: a job using them fails at spawn
/// time, which is reported as a stage failure on that job.
fn warn_on_missing_tools(config: &OrchestratorConfig) {
    let tools = [
        ("separation", &config.tools.separation),
        ("transcription", &config.tools.transcription),
        ("translation", &config.tools.translation),
        ("synthesis", &config.tools.synthesis),
        ("mux", &config.tools.mux),
    ];

    for (stage, program) in tools {
        if which::which(program).is_err() {
            warn!(stage, program = %program.display(), "stage tool not found on PATH");
        }
    }
}
