//! Capability records and the name-keyed table that holds them.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use super::parse::{rows_after_separator, split_row};

/// Kind of media a codec or encoder handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Video,
    Audio,
    Subtitle,
}

impl MediaKind {
    /// Kind from a listing flags field. `V` wins over `A`, `A` over `S`.
    pub fn from_flags(flags: &str) -> Option<Self> {
        if flags.contains('V') {
            Some(Self::Video)
        } else if flags.contains('A') {
            Some(Self::Audio)
        } else if flags.contains('S') {
            Some(Self::Subtitle)
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Video => "video",
            Self::Audio => "audio",
            Self::Subtitle => "subtitle",
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of `ffmpeg -codecs`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Codec {
    pub name: String,
    pub description: String,
    pub kind: MediaKind,
    pub can_encode: bool,
    pub can_decode: bool,
    pub all_intra: bool,
    pub lossy: bool,
    /// Set whenever the flags contain `S`, which is also the subtitle
    /// marker, so subtitle codecs always read as lossless.
    pub lossless: bool,
}

/// One row of `ffmpeg -encoders`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Encoder {
    pub name: String,
    pub description: String,
    pub kind: MediaKind,
}

/// One row of `ffmpeg -formats`.
///
/// Rows are keyed by the full name token, so a demuxer listed as
/// `matroska,webm` is a single entry under that name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Format {
    pub name: String,
    pub description: String,
    pub can_mux: bool,
    pub can_demux: bool,
}

/// A record that can be read from one listing row.
pub trait ListingRecord: Sized {
    /// Build the record from the three row fields, or `None` to drop it.
    fn from_row(flags: &str, name: &str, description: &str) -> Option<Self>;

    fn name(&self) -> &str;
}

impl ListingRecord for Codec {
    fn from_row(flags: &str, name: &str, description: &str) -> Option<Self> {
        let kind = MediaKind::from_flags(flags)?;
        Some(Self {
            name: name.to_string(),
            description: description.to_string(),
            kind,
            can_encode: flags.contains('E'),
            can_decode: flags.contains('D'),
            all_intra: flags.contains('I'),
            lossy: flags.contains('L'),
            lossless: flags.contains('S'),
        })
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl ListingRecord for Encoder {
    fn from_row(flags: &str, name: &str, description: &str) -> Option<Self> {
        let kind = MediaKind::from_flags(flags)?;
        Some(Self {
            name: name.to_string(),
            description: description.to_string(),
            kind,
        })
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl ListingRecord for Format {
    fn from_row(flags: &str, name: &str, description: &str) -> Option<Self> {
        Some(Self {
            name: name.to_string(),
            description: description.to_string(),
            can_mux: flags.contains('E'),
            can_demux: flags.contains('D'),
        })
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Name-keyed capability table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapabilityTable<T> {
    entries: BTreeMap<String, T>,
}

pub type CodecTable = CapabilityTable<Codec>;
pub type EncoderTable = CapabilityTable<Encoder>;
pub type FormatTable = CapabilityTable<Format>;

impl<T> Default for CapabilityTable<T> {
    fn default() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }
}

impl<T: ListingRecord> CapabilityTable<T> {
    /// Parse a tool listing. Everything up to the `--` separator line is
    /// legend; rows that don't yield a record are skipped.
    pub fn parse_listing(text: &str) -> Self {
        let mut entries = BTreeMap::new();
        for line in rows_after_separator(text) {
            let record = split_row(line)
                .and_then(|(flags, name, description)| T::from_row(flags, name, description));
            match record {
                Some(record) => {
                    entries.insert(record.name().to_string(), record);
                }
                None => tracing::trace!("Skipping listing row: {:?}", line),
            }
        }
        Self { entries }
    }
}

impl<T> CapabilityTable<T> {
    pub fn get(&self, name: &str) -> Option<&T> {
        self.entries.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Records in name order.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.entries.values()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

impl<T: ListingRecord> FromIterator<T> for CapabilityTable<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|r| (r.name().to_string(), r))
                .collect(),
        }
    }
}
