//! Scripted process layer for testing.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::runner::{Tool, ToolError, ToolInvocation, ToolOutput, ToolRunner};

#[derive(Debug, Clone)]
enum Scripted {
    Output(ToolOutput),
    Timeout,
}

#[derive(Debug, Clone)]
struct Rule {
    tool: Tool,
    trigger: String,
    response: Scripted,
}

#[derive(Debug, Default)]
struct State {
    invocations: Vec<ToolInvocation>,
    queue: VecDeque<Scripted>,
    rules: Vec<Rule>,
    default: Option<ToolOutput>,
}

/// Mock implementation of the [`ToolRunner`] trait.
///
/// Provides controllable behavior for testing:
/// - Record every invocation for assertions (program, args, timeout)
/// - Replay queued outputs in order
/// - Answer invocations containing a trigger argument with a fixed output
/// - Simulate quick-query timeouts
///
/// Lookup order for each call: the queue, then the rules, then the default
/// output. With none of those, the call fails like a missing binary.
///
/// # Example
///
/// ```rust,ignore
/// use ffkit_core::testing::{fixtures, ScriptedRunner};
///
/// let runner = ScriptedRunner::new();
/// runner.respond(Tool::Ffmpeg, "-encoders", ToolOutput::success(fixtures::ENCODERS_LISTING));
///
/// // ... run code against Toolchain::with_runner(&config, Arc::new(runner.clone())) ...
///
/// assert_eq!(runner.invocation_count(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ScriptedRunner {
    state: Arc<Mutex<State>>,
}

impl ScriptedRunner {
    /// Create a new scripted runner with nothing scripted.
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Queue an output for the next unanswered call.
    pub fn push_output(&self, output: ToolOutput) {
        self.state().queue.push_back(Scripted::Output(output));
    }

    /// Queue a timeout for the next unanswered call.
    pub fn push_timeout(&self) {
        self.state().queue.push_back(Scripted::Timeout);
    }

    /// Answer every call to `tool` whose arguments contain `trigger`.
    pub fn respond(&self, tool: Tool, trigger: impl Into<String>, output: ToolOutput) {
        self.state().rules.push(Rule {
            tool,
            trigger: trigger.into(),
            response: Scripted::Output(output),
        });
    }

    /// Output used when neither the queue nor a rule answers a call.
    pub fn set_default(&self, output: ToolOutput) {
        self.state().default = Some(output);
    }

    /// All invocations seen so far, in order.
    pub fn invocations(&self) -> Vec<ToolInvocation> {
        self.state().invocations.clone()
    }

    /// The most recent invocation.
    pub fn last_invocation(&self) -> Option<ToolInvocation> {
        self.state().invocations.last().cloned()
    }

    /// Number of processes that would have been spawned.
    pub fn invocation_count(&self) -> usize {
        self.state().invocations.len()
    }

    /// Number of invocations whose arguments contain `arg`.
    pub fn count_with_arg(&self, arg: &str) -> usize {
        self.state()
            .invocations
            .iter()
            .filter(|i| i.args.iter().any(|a| a == arg))
            .count()
    }

    /// Clear recorded invocations.
    pub fn clear_recorded(&self) {
        self.state().invocations.clear();
    }
}

#[async_trait]
impl ToolRunner for ScriptedRunner {
    async fn run(&self, invocation: &ToolInvocation) -> Result<ToolOutput, ToolError> {
        let response = {
            let mut state = self.state();
            state.invocations.push(invocation.clone());

            let queued = state.queue.pop_front();
            let ruled = || {
                state
                    .rules
                    .iter()
                    .find(|r| r.tool == invocation.tool && invocation.args.contains(&r.trigger))
                    .map(|r| r.response.clone())
            };

            queued
                .or_else(ruled)
                .or_else(|| state.default.clone().map(Scripted::Output))
        };

        match response {
            Some(Scripted::Output(output)) => Ok(output),
            Some(Scripted::Timeout) => Err(ToolError::Timeout {
                tool: invocation.tool,
                timeout_secs: invocation.timeout.map(|t| t.as_secs()).unwrap_or_default(),
            }),
            None => Err(ToolError::ToolNotFound {
                tool: invocation.tool,
                path: invocation.program.clone(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn invocation(tool: Tool, args: &[&str]) -> ToolInvocation {
        ToolInvocation {
            tool,
            program: PathBuf::from(tool.default_name()),
            args: args.iter().map(|s| s.to_string()).collect(),
            timeout: None,
        }
    }

    #[tokio::test]
    async fn test_queue_then_rules_then_default() {
        let runner = ScriptedRunner::new();
        runner.push_output(ToolOutput::success("first"));
        runner.respond(Tool::Ffmpeg, "-formats", ToolOutput::success("formats"));
        runner.set_default(ToolOutput::success("fallback"));

        let a = runner.run(&invocation(Tool::Ffmpeg, &["-formats"])).await.unwrap();
        let b = runner.run(&invocation(Tool::Ffmpeg, &["-formats"])).await.unwrap();
        let c = runner.run(&invocation(Tool::Ffprobe, &["-formats"])).await.unwrap();

        assert_eq!(a.stdout_text(), "first");
        assert_eq!(b.stdout_text(), "formats");
        assert_eq!(c.stdout_text(), "fallback");
        assert_eq!(runner.invocation_count(), 3);
        assert_eq!(runner.count_with_arg("-formats"), 3);
    }

    #[tokio::test]
    async fn test_unscripted_call_fails() {
        let runner = ScriptedRunner::new();
        let result = runner.run(&invocation(Tool::Ffprobe, &["x"])).await;
        assert!(matches!(result, Err(ToolError::ToolNotFound { .. })));
        assert_eq!(runner.invocation_count(), 1);
    }

    #[tokio::test]
    async fn test_scripted_timeout() {
        let runner = ScriptedRunner::new();
        runner.push_timeout();
        let result = runner.run(&invocation(Tool::Ffmpeg, &["-codecs"])).await;
        assert!(matches!(result, Err(ToolError::Timeout { .. })));
    }

    #[test]
    fn test_clear_recorded() {
        let runner = ScriptedRunner::new();
        let _ = tokio_test::block_on(runner.run(&invocation(Tool::Ffmpeg, &["-version"])));
        assert!(runner.last_invocation().is_some());
        runner.clear_recorded();
        assert_eq!(runner.invocation_count(), 0);
    }
}
