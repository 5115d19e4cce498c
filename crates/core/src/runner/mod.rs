//! Process invocation for the ffmpeg and ffprobe command-line tools.
//!
//! [`Toolchain`] resolves the executables, prepends the fixed baseline
//! flags and maps exit codes onto [`ToolError`]. The actual spawning goes
//! through the [`ToolRunner`] trait so tests can substitute a scripted
//! process layer.
//!
//! # Example
//!
//! ```ignore
//! use ffkit_core::runner::{InvocationMode, Toolchain};
//!
//! let toolchain = Toolchain::from_env()?;
//! let listing = toolchain
//!     .ffmpeg_text(&["-formats".to_string()], InvocationMode::Quick)
//!     .await?;
//! ```

mod error;
mod process;
mod toolchain;
mod traits;

pub use error::ToolError;
pub use process::ProcessRunner;
pub use toolchain::{
    InvocationMode, ToolPaths, Toolchain, BASE_FLAGS, FFMPEG_FLAGS, FFMPEG_FLAGS_PROGRESS,
    FFPROBE_FLAGS,
};
pub use traits::{Tool, ToolInvocation, ToolOutput, ToolRunner};
