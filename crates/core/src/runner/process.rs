//! Child-process implementation of [`ToolRunner`].

use async_trait::async_trait;
use std::process::Stdio;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::{debug, warn};

use super::error::ToolError;
use super::traits::{ToolInvocation, ToolOutput, ToolRunner};

/// Spawns the real tool binaries with `tokio::process`.
///
/// Stdin is closed, stdout and stderr are captured separately. The child
/// sees only `PATH` from the parent environment, plus
/// `AV_LOG_FORCE_NOCOLOR` so stderr can be surfaced verbatim.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessRunner;

impl ProcessRunner {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ToolRunner for ProcessRunner {
    async fn run(&self, invocation: &ToolInvocation) -> Result<ToolOutput, ToolError> {
        debug!("Running {}", invocation.command_line());

        let mut command = Command::new(&invocation.program);
        command.env_clear();
        if let Some(path) = std::env::var_os("PATH") {
            command.env("PATH", path);
        }

        let child = command
            .args(&invocation.args)
            .env("AV_LOG_FORCE_NOCOLOR", "1")
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    ToolError::ToolNotFound {
                        tool: invocation.tool,
                        path: invocation.program.clone(),
                    }
                } else {
                    ToolError::Io(e)
                }
            })?;

        let output = match invocation.timeout {
            Some(limit) => match timeout(limit, child.wait_with_output()).await {
                Ok(result) => result?,
                Err(_) => {
                    // Dropping the wait future drops the child, which kills it.
                    warn!(
                        "{} did not finish within {:?}, killed",
                        invocation.tool, limit
                    );
                    return Err(ToolError::Timeout {
                        tool: invocation.tool,
                        timeout_secs: limit.as_secs(),
                    });
                }
            },
            None => child.wait_with_output().await?,
        };

        Ok(ToolOutput {
            code: output.status.code(),
            stdout: output.stdout,
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        })
    }
}
