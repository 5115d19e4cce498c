//! Media inspection through ffprobe.
//!
//! [`inspect`] runs the tool and [`MediaInfo`] turns its JSON into typed
//! container and stream records. Optional values missing from the output
//! are `None`, never zero.

mod parse;
mod prober;
mod types;

pub use prober::inspect;
pub use types::{
    AudioStream, CodecInfo, ContainerInfo, DataStream, MediaInfo, Rational, StreamBase,
    StreamInfo, StreamKind, SubtitleStream, VideoStream,
};
