//! Typed ffmpeg command lines.
//!
//! Inputs, output streams and formats are validated when they are built,
//! so a [`FfmpegCommand`] that exists can always be serialized. Encoder
//! and format names are checked against the tables of a
//! [`CapabilityDirectory`](crate::capabilities::CapabilityDirectory).

mod command;
mod format;
mod input;
mod output;
mod stream;
mod time_spec;

pub use command::FfmpegCommand;
pub use format::Format;
pub use input::Input;
pub use output::Output;
pub use stream::{Audio, BitRate, EncoderChoice, Scale, Stream, Subtitle, Video};
pub use time_spec::TimeSpec;
