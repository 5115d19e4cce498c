use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Configuration for locating and running the external tools.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ToolsConfig {
    /// Explicit path to the ffmpeg binary. When unset, `ffmpeg` is looked up
    /// through the default execution path.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ffmpeg_path: Option<PathBuf>,

    /// Explicit path to the ffprobe binary.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ffprobe_path: Option<PathBuf>,

    /// Timeout for quick queries (capability and version discovery).
    #[serde(default = "default_quick_timeout")]
    pub quick_timeout_secs: u64,
}

fn default_quick_timeout() -> u64 {
    5
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            ffmpeg_path: None,
            ffprobe_path: None,
            quick_timeout_secs: default_quick_timeout(),
        }
    }
}

impl ToolsConfig {
    /// Creates a config with explicit tool paths.
    pub fn with_paths(ffmpeg_path: PathBuf, ffprobe_path: PathBuf) -> Self {
        Self {
            ffmpeg_path: Some(ffmpeg_path),
            ffprobe_path: Some(ffprobe_path),
            ..Default::default()
        }
    }

    /// Sets the quick-query timeout in seconds.
    pub fn with_quick_timeout(mut self, secs: u64) -> Self {
        self.quick_timeout_secs = secs;
        self
    }

    pub fn quick_timeout(&self) -> Duration {
        Duration::from_secs(self.quick_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ToolsConfig::default();
        assert_eq!(config.ffmpeg_path, None);
        assert_eq!(config.ffprobe_path, None);
        assert_eq!(config.quick_timeout_secs, 5);
        assert_eq!(config.quick_timeout(), Duration::from_secs(5));
    }

    #[test]
    fn test_config_builder() {
        let config = ToolsConfig::with_paths(
            PathBuf::from("/opt/ffmpeg/bin/ffmpeg"),
            PathBuf::from("/opt/ffmpeg/bin/ffprobe"),
        )
        .with_quick_timeout(10);

        assert_eq!(
            config.ffmpeg_path,
            Some(PathBuf::from("/opt/ffmpeg/bin/ffmpeg"))
        );
        assert_eq!(config.quick_timeout_secs, 10);
    }

    #[test]
    fn test_config_serialization_skips_unset_paths() {
        let config = ToolsConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        assert!(!json.contains("ffmpeg_path"));
        let parsed: ToolsConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, config);
    }
}
