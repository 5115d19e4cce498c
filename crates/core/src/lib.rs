pub mod capabilities;
pub mod config;
pub mod convert;
pub mod locator;
pub mod probe;
pub mod runner;
pub mod testing;
pub mod time;
pub mod toolkit;

pub use capabilities::{Capabilities, CapabilityDirectory, Codec, Encoder, MediaKind};
pub use config::{load_config, load_config_from_str, validate_config, ConfigError, ToolsConfig};
pub use convert::{
    Audio, BitRate, EncoderChoice, FfmpegCommand, Format, Input, Output, Scale, Stream, Subtitle,
    TimeSpec, Video,
};
pub use locator::Locator;
pub use probe::{inspect, MediaInfo, StreamInfo, StreamKind};
pub use runner::{InvocationMode, ProcessRunner, Tool, ToolError, ToolRunner, Toolchain};
pub use toolkit::{AudioConvertOptions, ThumbnailFormat, Toolkit, VideoConvertOptions};
