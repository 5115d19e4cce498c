use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use std::path::Path;

use super::{types::ToolsConfig, ConfigError};

/// Environment variables that override the tool paths directly.
const PATH_OVERRIDE_VARS: &[&str] = &["FFMPEG_PATH", "FFPROBE_PATH"];

/// Prefix for every other environment override.
const ENV_PREFIX: &str = "FFKIT_";

fn base_figment() -> Figment {
    Figment::from(Serialized::defaults(ToolsConfig::default()))
}

fn with_env(figment: Figment) -> Figment {
    figment
        .merge(Env::prefixed(ENV_PREFIX))
        .merge(Env::raw().only(PATH_OVERRIDE_VARS))
}

/// Load configuration from file with environment variable overrides
pub fn load_config(path: &Path) -> Result<ToolsConfig, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::FileNotFound(path.display().to_string()));
    }

    let config: ToolsConfig = with_env(base_figment().merge(Toml::file(path)))
        .extract()
        .map_err(|e| ConfigError::ParseError(e.to_string()))?;

    Ok(config)
}

/// Load configuration from TOML string (useful for testing)
pub fn load_config_from_str(toml_str: &str) -> Result<ToolsConfig, ConfigError> {
    toml::from_str(toml_str).map_err(|e| ConfigError::ParseError(e.to_string()))
}

impl ToolsConfig {
    /// Builds the configuration from defaults and the process environment.
    ///
    /// `FFMPEG_PATH` and `FFPROBE_PATH` override the tool locations;
    /// `FFKIT_QUICK_TIMEOUT_SECS` overrides the quick-query timeout.
    pub fn from_env() -> Result<Self, ConfigError> {
        with_env(base_figment())
            .extract()
            .map_err(|e| ConfigError::ParseError(e.to_string()))
    }
}
