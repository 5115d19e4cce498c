//! Resolved tool locations plus the invocation rules shared by every call.

use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use super::error::ToolError;
use super::process::ProcessRunner;
use super::traits::{Tool, ToolInvocation, ToolOutput, ToolRunner};
use crate::config::ToolsConfig;

/// Flags passed to both tools on every invocation.
pub const BASE_FLAGS: &[&str] = &["-hide_banner", "-v", "error"];

/// Flags passed to ffmpeg on every invocation (baseline plus overwrite).
pub const FFMPEG_FLAGS: &[&str] = &["-hide_banner", "-v", "error", "-y"];

/// ffmpeg flags for progress reporting on stdout.
///
/// Reserved: no call path requests progress output yet.
pub const FFMPEG_FLAGS_PROGRESS: &[&str] =
    &["-hide_banner", "-v", "error", "-y", "-progress", "-"];

/// Flags passed to ffprobe on every invocation (baseline plus JSON output).
pub const FFPROBE_FLAGS: &[&str] = &["-hide_banner", "-v", "error", "-of", "json"];

/// How long an invocation may run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvocationMode {
    /// Capability and version discovery, bounded by the quick timeout.
    Quick,
    /// Transcodes and inspections, unbounded.
    Full,
}

/// Executable locations for both tools.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolPaths {
    pub ffmpeg: PathBuf,
    pub ffprobe: PathBuf,
}

impl ToolPaths {
    /// Resolves both tools from the configured overrides.
    ///
    /// An override must name an existing file; without one the bare tool
    /// name is used and resolved through the default execution path.
    pub fn resolve(config: &ToolsConfig) -> Result<Self, ToolError> {
        Ok(Self {
            ffmpeg: resolve_tool(Tool::Ffmpeg, config.ffmpeg_path.as_deref())?,
            ffprobe: resolve_tool(Tool::Ffprobe, config.ffprobe_path.as_deref())?,
        })
    }

    pub fn get(&self, tool: Tool) -> &Path {
        match tool {
            Tool::Ffmpeg => &self.ffmpeg,
            Tool::Ffprobe => &self.ffprobe,
        }
    }
}

fn resolve_tool(tool: Tool, override_path: Option<&Path>) -> Result<PathBuf, ToolError> {
    match override_path {
        Some(path) if !path.as_os_str().is_empty() => {
            if path.is_file() {
                Ok(path.to_path_buf())
            } else {
                Err(ToolError::InvalidToolPath {
                    tool,
                    path: path.to_path_buf(),
                })
            }
        }
        _ => Ok(PathBuf::from(tool.default_name())),
    }
}

/// Runs ffmpeg and ffprobe with the fixed baseline flags.
///
/// Every call spawns exactly one process through the configured
/// [`ToolRunner`] and is attempted once.
#[derive(Clone)]
pub struct Toolchain {
    paths: ToolPaths,
    quick_timeout: Duration,
    runner: Arc<dyn ToolRunner>,
}

impl std::fmt::Debug for Toolchain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Toolchain")
            .field("paths", &self.paths)
            .field("quick_timeout", &self.quick_timeout)
            .finish_non_exhaustive()
    }
}

impl Toolchain {
    /// Creates a toolchain that spawns real processes.
    pub fn new(config: &ToolsConfig) -> Result<Self, ToolError> {
        Self::with_runner(config, Arc::new(ProcessRunner::new()))
    }

    /// Creates a toolchain configured from the process environment.
    pub fn from_env() -> Result<Self, ToolError> {
        Self::new(&ToolsConfig::from_env()?)
    }

    /// Creates a toolchain with a custom process layer.
    pub fn with_runner(
        config: &ToolsConfig,
        runner: Arc<dyn ToolRunner>,
    ) -> Result<Self, ToolError> {
        Ok(Self {
            paths: ToolPaths::resolve(config)?,
            quick_timeout: config.quick_timeout(),
            runner,
        })
    }

    pub fn paths(&self) -> &ToolPaths {
        &self.paths
    }

    /// Builds the full invocation for a tool: resolved path, baseline
    /// flags, then the call-specific arguments.
    pub fn prepare(&self, tool: Tool, args: &[String], mode: InvocationMode) -> ToolInvocation {
        let flags = match tool {
            Tool::Ffmpeg => FFMPEG_FLAGS,
            Tool::Ffprobe => FFPROBE_FLAGS,
        };

        let mut full_args: Vec<String> = flags.iter().map(|f| f.to_string()).collect();
        full_args.extend(args.iter().cloned());

        ToolInvocation {
            tool,
            program: self.paths.get(tool).to_path_buf(),
            args: full_args,
            timeout: match mode {
                InvocationMode::Quick => Some(self.quick_timeout),
                InvocationMode::Full => None,
            },
        }
    }

    async fn invoke(
        &self,
        tool: Tool,
        args: &[String],
        mode: InvocationMode,
    ) -> Result<ToolOutput, ToolError> {
        let invocation = self.prepare(tool, args, mode);
        let output = self.runner.run(&invocation).await?;
        if output.is_success() {
            return Ok(output);
        }

        let stderr = output.stderr.trim().to_string();
        warn!("{} exited with code {:?}: {}", tool, output.code, stderr);

        Err(match tool {
            Tool::Ffprobe => ToolError::no_media(stderr),
            Tool::Ffmpeg => ToolError::tool_failed(tool, output.code, stderr),
        })
    }

    /// Runs ffmpeg and returns its stdout.
    ///
    /// A non-zero exit is a [`ToolError::ToolFailed`] carrying stderr.
    pub async fn ffmpeg(
        &self,
        args: &[String],
        mode: InvocationMode,
    ) -> Result<Vec<u8>, ToolError> {
        Ok(self.invoke(Tool::Ffmpeg, args, mode).await?.stdout)
    }

    /// Runs ffmpeg and returns its stdout as (lossy) text.
    pub async fn ffmpeg_text(
        &self,
        args: &[String],
        mode: InvocationMode,
    ) -> Result<String, ToolError> {
        Ok(self.invoke(Tool::Ffmpeg, args, mode).await?.stdout_text())
    }

    /// Runs ffprobe and returns its stdout as text.
    ///
    /// A non-zero exit is a [`ToolError::NoMedia`] carrying stderr.
    pub async fn ffprobe(
        &self,
        args: &[String],
        mode: InvocationMode,
    ) -> Result<String, ToolError> {
        Ok(self.invoke(Tool::Ffprobe, args, mode).await?.stdout_text())
    }

    /// Runs ffprobe and decodes its JSON output.
    ///
    /// Output that is not valid JSON is reported as [`ToolError::NoMedia`].
    pub async fn ffprobe_json(&self, args: &[String]) -> Result<Value, ToolError> {
        let text = self.ffprobe(args, InvocationMode::Full).await?;
        debug!("ffprobe returned {} bytes of JSON", text.len());
        serde_json::from_str(&text)
            .map_err(|e| ToolError::no_media(format!("unreadable ffprobe output: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScriptedRunner;

    fn toolchain(runner: &ScriptedRunner) -> Toolchain {
        Toolchain::with_runner(&ToolsConfig::default(), Arc::new(runner.clone())).unwrap()
    }

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_flag_sets_share_baseline() {
        assert!(FFMPEG_FLAGS.starts_with(BASE_FLAGS));
        assert!(FFPROBE_FLAGS.starts_with(BASE_FLAGS));
        assert!(FFMPEG_FLAGS_PROGRESS.starts_with(FFMPEG_FLAGS));
    }

    #[test]
    fn test_resolve_defaults_to_bare_names() {
        let paths = ToolPaths::resolve(&ToolsConfig::default()).unwrap();
        assert_eq!(paths.ffmpeg, PathBuf::from("ffmpeg"));
        assert_eq!(paths.ffprobe, PathBuf::from("ffprobe"));
    }

    #[test]
    fn test_resolve_empty_override_is_unset() {
        let config = ToolsConfig {
            ffmpeg_path: Some(PathBuf::new()),
            ..Default::default()
        };
        let paths = ToolPaths::resolve(&config).unwrap();
        assert_eq!(paths.ffmpeg, PathBuf::from("ffmpeg"));
    }

    #[test]
    fn test_resolve_invalid_override_fails() {
        let config = ToolsConfig {
            ffprobe_path: Some(PathBuf::from("/nonexistent/ffprobe")),
            ..Default::default()
        };
        let err = ToolPaths::resolve(&config).unwrap_err();
        assert!(matches!(
            err,
            ToolError::InvalidToolPath {
                tool: Tool::Ffprobe,
                ..
            }
        ));
    }

    #[test]
    fn test_resolve_existing_override() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let config = ToolsConfig {
            ffmpeg_path: Some(file.path().to_path_buf()),
            ..Default::default()
        };
        let paths = ToolPaths::resolve(&config).unwrap();
        assert_eq!(paths.ffmpeg, file.path());
    }

    #[test]
    fn test_prepare_prepends_baseline_flags() {
        let runner = ScriptedRunner::new();
        let chain = toolchain(&runner);

        let ffmpeg = chain.prepare(Tool::Ffmpeg, &args(&["-i", "in.mkv"]), InvocationMode::Full);
        assert_eq!(
            ffmpeg.args,
            args(&["-hide_banner", "-v", "error", "-y", "-i", "in.mkv"])
        );
        assert_eq!(ffmpeg.timeout, None);

        let ffprobe = chain.prepare(Tool::Ffprobe, &args(&["-version"]), InvocationMode::Quick);
        assert_eq!(
            ffprobe.args,
            args(&["-hide_banner", "-v", "error", "-of", "json", "-version"])
        );
        assert_eq!(ffprobe.timeout, Some(Duration::from_secs(5)));
    }

    #[tokio::test]
    async fn test_ffmpeg_failure_carries_stderr() {
        let runner = ScriptedRunner::new();
        runner.push_output(ToolOutput::failure(1, "  Unknown encoder 'nope'\n"));
        let chain = toolchain(&runner);

        let err = chain
            .ffmpeg(&args(&["-i", "in.mkv", "out.mp4"]), InvocationMode::Full)
            .await
            .unwrap_err();

        match err {
            ToolError::ToolFailed { tool, code, stderr } => {
                assert_eq!(tool, Tool::Ffmpeg);
                assert_eq!(code, Some(1));
                assert_eq!(stderr, "Unknown encoder 'nope'");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_ffprobe_failure_is_no_media() {
        let runner = ScriptedRunner::new();
        runner.push_output(ToolOutput::failure(1, "Invalid data found when processing input"));
        let chain = toolchain(&runner);

        let err = chain.ffprobe_json(&args(&["junk.bin"])).await.unwrap_err();
        assert!(err.is_unusable_source());
        assert!(err.to_string().contains("Invalid data"));
    }

    #[tokio::test]
    async fn test_ffprobe_json_rejects_garbage() {
        let runner = ScriptedRunner::new();
        runner.push_output(ToolOutput::success("not json"));
        let chain = toolchain(&runner);

        let err = chain.ffprobe_json(&args(&["x.mkv"])).await.unwrap_err();
        assert!(err.is_unusable_source());
    }

    #[tokio::test]
    async fn test_ffmpeg_returns_stdout_bytes() {
        let runner = ScriptedRunner::new();
        runner.push_output(ToolOutput::success(vec![0x89, b'P', b'N', b'G']));
        let chain = toolchain(&runner);

        let bytes = chain
            .ffmpeg(&args(&["-i", "in.mkv", "-"]), InvocationMode::Full)
            .await
            .unwrap();
        assert_eq!(bytes, vec![0x89, b'P', b'N', b'G']);
        assert_eq!(runner.invocation_count(), 1);
    }
}
