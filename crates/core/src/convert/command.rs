//! A complete ffmpeg invocation: inputs followed by outputs.

use std::fmt;
use tracing::info;

use super::input::Input;
use super::output::Output;
use crate::runner::{InvocationMode, ToolError, Toolchain};

/// An ffmpeg run over one or more inputs, producing one or more outputs.
///
/// # Example
///
/// ```ignore
/// let caps = toolkit.capabilities().capabilities().await?;
/// let command = FfmpegCommand::new(
///     [Input::new("input.mkv")?.with_seek(300u32).with_duration(60u32)],
///     [Output::new("output.mp4")
///         .with_stream(
///             Video::h265(caps.encoders, Some("veryfast"), Some(20))?.with_scale((-1, 1080)),
///         )
///         .with_stream(Audio::aac(caps.encoders)?.with_bit_rate("160k"))
///         .with_stream(Subtitle::disabled())],
/// );
/// command.run(toolkit.toolchain()).await?;
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FfmpegCommand {
    inputs: Vec<Input>,
    outputs: Vec<Output>,
}

impl FfmpegCommand {
    pub fn new<I, O>(inputs: I, outputs: O) -> Self
    where
        I: IntoIterator<Item = Input>,
        O: IntoIterator,
        O::Item: Into<Output>,
    {
        Self {
            inputs: inputs.into_iter().collect(),
            outputs: outputs.into_iter().map(Into::into).collect(),
        }
    }

    /// Convert one file to another with ffmpeg's default choices.
    pub fn simple(source: impl Into<String>, target: impl Into<Output>) -> Result<Self, ToolError> {
        Ok(Self::new([Input::new(source)?], [target.into()]))
    }

    pub fn inputs(&self) -> &[Input] {
        &self.inputs
    }

    pub fn outputs(&self) -> &[Output] {
        &self.outputs
    }

    /// The argument vector, without the baseline flags the toolchain adds.
    pub fn to_args(&self) -> Vec<String> {
        self.inputs
            .iter()
            .flat_map(Input::to_args)
            .chain(self.outputs.iter().flat_map(Output::to_args))
            .collect()
    }

    /// Run to completion and return ffmpeg's stdout.
    pub async fn run(&self, toolchain: &Toolchain) -> Result<Vec<u8>, ToolError> {
        info!(
            "Running ffmpeg with {} input(s) and {} output(s)",
            self.inputs.len(),
            self.outputs.len()
        );
        toolchain.ffmpeg(&self.to_args(), InvocationMode::Full).await
    }

    /// Like [`run`](Self::run), with stdout decoded as text.
    pub async fn run_text(&self, toolchain: &Toolchain) -> Result<String, ToolError> {
        toolchain
            .ffmpeg_text(&self.to_args(), InvocationMode::Full)
            .await
    }
}

impl fmt::Display for FfmpegCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_args().join(" "))
    }
}
