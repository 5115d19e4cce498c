//! The process seam: everything above it builds argument vectors,
//! everything below it spawns processes.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use super::error::ToolError;

/// The two external tools this crate drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tool {
    /// The transcoding tool.
    Ffmpeg,
    /// The inspection tool.
    Ffprobe,
}

impl Tool {
    /// Executable name searched on the default execution path.
    pub fn default_name(&self) -> &'static str {
        match self {
            Self::Ffmpeg => "ffmpeg",
            Self::Ffprobe => "ffprobe",
        }
    }
}

impl fmt::Display for Tool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.default_name())
    }
}

/// A fully resolved command line, ready to spawn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolInvocation {
    pub tool: Tool,
    /// Executable to spawn.
    pub program: PathBuf,
    /// Arguments, baseline flags included.
    pub args: Vec<String>,
    /// Kill the process if it runs longer than this. `None` means no limit.
    pub timeout: Option<Duration>,
}

impl ToolInvocation {
    /// The command line as a single display string.
    pub fn command_line(&self) -> String {
        let mut line = self.program.to_string_lossy().to_string();
        for arg in &self.args {
            line.push(' ');
            line.push_str(arg);
        }
        line
    }
}

/// Output captured from a finished process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolOutput {
    /// Exit code, `None` if the process was terminated by a signal.
    pub code: Option<i32>,
    /// Captured standard output.
    pub stdout: Vec<u8>,
    /// Captured standard error (lossy UTF-8).
    pub stderr: String,
}

impl ToolOutput {
    /// A successful run with the given stdout.
    pub fn success(stdout: impl Into<Vec<u8>>) -> Self {
        Self {
            code: Some(0),
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    /// A failed run with the given exit code and stderr.
    pub fn failure(code: i32, stderr: impl Into<String>) -> Self {
        Self {
            code: Some(code),
            stdout: Vec::new(),
            stderr: stderr.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.code == Some(0)
    }

    /// Stdout decoded as lossy UTF-8.
    pub fn stdout_text(&self) -> String {
        String::from_utf8_lossy(&self.stdout).to_string()
    }
}

/// Runs one child process per call.
///
/// Implementations report a non-zero exit through [`ToolOutput::code`];
/// they only return an error when the process could not be run at all or
/// exceeded its timeout.
#[async_trait]
pub trait ToolRunner: Send + Sync {
    async fn run(&self, invocation: &ToolInvocation) -> Result<ToolOutput, ToolError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_line() {
        let invocation = ToolInvocation {
            tool: Tool::Ffprobe,
            program: PathBuf::from("ffprobe"),
            args: vec!["-hide_banner".to_string(), "-version".to_string()],
            timeout: None,
        };
        assert_eq!(invocation.command_line(), "ffprobe -hide_banner -version");
    }

    #[test]
    fn test_output_helpers() {
        let ok = ToolOutput::success("hello");
        assert!(ok.is_success());
        assert_eq!(ok.stdout_text(), "hello");

        let failed = ToolOutput::failure(1, "boom");
        assert!(!failed.is_success());
        assert!(!ToolOutput::default().is_success());
    }

    #[test]
    fn test_tool_names() {
        assert_eq!(Tool::Ffmpeg.to_string(), "ffmpeg");
        assert_eq!(Tool::Ffprobe.default_name(), "ffprobe");
    }
}
