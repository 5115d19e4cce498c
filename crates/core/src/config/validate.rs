use super::{types::ToolsConfig, ConfigError};

/// Validate configuration
/// Currently validates:
/// - Quick-query timeout is not 0
/// - Tool path overrides, when given, are not directories
pub fn validate_config(config: &ToolsConfig) -> Result<(), ConfigError> {
    if config.quick_timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "quick_timeout_secs cannot be 0".to_string(),
        ));
    }

    for (key, path) in [
        ("ffmpeg_path", &config.ffmpeg_path),
        ("ffprobe_path", &config.ffprobe_path),
    ] {
        if let Some(path) = path {
            if path.is_dir() {
                return Err(ConfigError::ValidationError(format!(
                    "{} points to a directory: {}",
                    key,
                    path.display()
                )));
            }
        }
    }

    Ok(())
}
