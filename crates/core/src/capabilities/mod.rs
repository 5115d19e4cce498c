//! What the installed ffmpeg can do: codecs, encoders, container formats
//! and tool versions.
//!
//! The listings are parsed from the plain-text tables ffmpeg prints for
//! `-codecs`, `-encoders` and `-formats`, and cached by
//! [`CapabilityDirectory`] for the lifetime of the directory.

mod directory;
mod parse;
mod types;

pub use directory::{Capabilities, CapabilityDirectory};
pub use parse::parse_version;
pub use types::{
    CapabilityTable, Codec, CodecTable, Encoder, EncoderTable, Format, FormatTable,
    ListingRecord, MediaKind,
};
