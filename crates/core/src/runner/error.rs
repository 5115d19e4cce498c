//! Error types for tool invocation, capability checks and inspection.

use std::path::PathBuf;
use thiserror::Error;

use super::Tool;
use crate::config::ConfigError;

/// Errors surfaced by every tool-facing operation.
#[derive(Debug, Error)]
pub enum ToolError {
    /// A tool path override does not name an existing file.
    #[error("Specified {tool} path is invalid: {path}")]
    InvalidToolPath { tool: Tool, path: PathBuf },

    /// Configuration could not be loaded or validated.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The tool binary could not be spawned because it was not found.
    #[error("{tool} not found at path: {path}")]
    ToolNotFound { tool: Tool, path: PathBuf },

    /// The source does not exist or the tool could not read it as media.
    #[error("No usable media: {reason}")]
    NoMedia { reason: String },

    /// Requested encoder is not known to ffmpeg.
    #[error("Unsupported encoder {name}")]
    UnsupportedEncoder { name: String },

    /// Requested encoder exists but produces a different kind of stream.
    #[error("{encoder_kind} encoder {name} can't be used for {stream_kind} stream")]
    EncoderKindMismatch {
        name: String,
        encoder_kind: String,
        stream_kind: String,
    },

    /// Requested container format is not known to ffmpeg.
    #[error("Unsupported format {name}")]
    UnsupportedFormat { name: String },

    /// Requested thumbnail image format is not supported.
    #[error("Image format {format} is not supported")]
    UnsupportedImageFormat { format: String },

    /// The tool exited with a non-zero status.
    #[error("{tool} failed with exit code {code:?}: {stderr}")]
    ToolFailed {
        tool: Tool,
        code: Option<i32>,
        stderr: String,
    },

    /// A quick query did not finish in time.
    #[error("{tool} timed out after {timeout_secs} seconds")]
    Timeout { tool: Tool, timeout_secs: u64 },

    /// Structured output carried a stream kind this crate does not model.
    #[error("Unsupported codec type '{kind}'")]
    UnknownStreamKind { kind: String },

    /// Tool output could not be decoded.
    #[error("Failed to parse tool output: {reason}")]
    Parse { reason: String },

    /// I/O error while spawning or talking to a tool.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ToolError {
    /// Creates a new "no usable media" error.
    pub fn no_media(reason: impl Into<String>) -> Self {
        Self::NoMedia {
            reason: reason.into(),
        }
    }

    /// Creates a new parse error.
    pub fn parse(reason: impl Into<String>) -> Self {
        Self::Parse {
            reason: reason.into(),
        }
    }

    /// Creates a new tool failure error.
    pub fn tool_failed(tool: Tool, code: Option<i32>, stderr: impl Into<String>) -> Self {
        Self::ToolFailed {
            tool,
            code,
            stderr: stderr.into(),
        }
    }

    /// Whether this error means the requested source cannot be used.
    pub fn is_unusable_source(&self) -> bool {
        matches!(self, Self::NoMedia { .. })
    }

    /// Whether this error comes from validating a requested encoder or format.
    pub fn is_unsupported_capability(&self) -> bool {
        matches!(
            self,
            Self::UnsupportedEncoder { .. }
                | Self::EncoderKindMismatch { .. }
                | Self::UnsupportedFormat { .. }
                | Self::UnsupportedImageFormat { .. }
        )
    }

    /// Whether this error is a configuration problem.
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::InvalidToolPath { .. } | Self::Config(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = ToolError::EncoderKindMismatch {
            name: "aac".to_string(),
            encoder_kind: "audio".to_string(),
            stream_kind: "video".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "audio encoder aac can't be used for video stream"
        );

        let err = ToolError::InvalidToolPath {
            tool: Tool::Ffmpeg,
            path: PathBuf::from("/missing/ffmpeg"),
        };
        assert_eq!(
            err.to_string(),
            "Specified ffmpeg path is invalid: /missing/ffmpeg"
        );
    }

    #[test]
    fn test_classification() {
        assert!(ToolError::no_media("gone").is_unusable_source());
        assert!(ToolError::UnsupportedFormat {
            name: "nope".to_string()
        }
        .is_unsupported_capability());
        assert!(!ToolError::parse("bad").is_unsupported_capability());
        assert!(ToolError::InvalidToolPath {
            tool: Tool::Ffprobe,
            path: PathBuf::from("x"),
        }
        .is_configuration());
    }
}
