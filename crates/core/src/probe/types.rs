//! Metadata records produced by inspection.

use chrono::TimeDelta;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crate::runner::ToolError;

/// An exact fraction in lowest terms with a positive denominator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rational {
    num: i64,
    den: i64,
}

impl Rational {
    /// `None` when `den` is zero or the normalised fraction does not fit
    /// in `i64`.
    pub fn new(num: i64, den: i64) -> Option<Self> {
        if den == 0 {
            return None;
        }
        let divisor = i128::from(gcd(num.unsigned_abs(), den.unsigned_abs()));
        let sign = if den < 0 { -1 } else { 1 };
        Some(Self {
            num: i64::try_from(sign * (i128::from(num) / divisor)).ok()?,
            den: i64::try_from(sign * (i128::from(den) / divisor)).ok()?,
        })
    }

    pub fn numerator(&self) -> i64 {
        self.num
    }

    pub fn denominator(&self) -> i64 {
        self.den
    }

    pub fn as_f64(&self) -> f64 {
        self.num as f64 / self.den as f64
    }

    /// Parses `"n/d"` (or a bare integer), mapping a zero denominator to
    /// `Ok(None)`.
    pub fn parse_lenient(s: &str) -> Result<Option<Self>, ToolError> {
        let (num, den) = match s.trim().split_once('/') {
            Some((num, den)) => (num.trim(), den.trim()),
            None => (s.trim(), "1"),
        };
        let num: i64 = num
            .parse()
            .map_err(|_| ToolError::parse(format!("invalid rational: {:?}", s)))?;
        let den: i64 = den
            .parse()
            .map_err(|_| ToolError::parse(format!("invalid rational: {:?}", s)))?;
        Ok(Self::new(num, den))
    }
}

fn gcd(mut a: u64, mut b: u64) -> u64 {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a.max(1)
}

impl FromStr for Rational {
    type Err = ToolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_lenient(s)?
            .ok_or_else(|| ToolError::parse(format!("zero denominator in {:?}", s)))
    }
}

impl fmt::Display for Rational {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.num, self.den)
    }
}

/// Stream kind as reported by the inspection tool's `codec_type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StreamKind {
    Video,
    Audio,
    Subtitle,
    Data,
}

impl StreamKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Video => "video",
            Self::Audio => "audio",
            Self::Subtitle => "subtitle",
            Self::Data => "data",
        }
    }
}

impl FromStr for StreamKind {
    type Err = ToolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "video" => Ok(Self::Video),
            "audio" => Ok(Self::Audio),
            "subtitle" => Ok(Self::Subtitle),
            "data" => Ok(Self::Data),
            other => Err(ToolError::UnknownStreamKind {
                kind: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for StreamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Container-level information.
#[derive(Debug, Clone, PartialEq)]
pub struct ContainerInfo {
    /// Format name, possibly several comma-separated aliases.
    pub name: String,
    /// `name` split into its aliases.
    pub names: Vec<String>,
    pub description: Option<String>,
    pub start_time: Option<TimeDelta>,
    pub duration: Option<TimeDelta>,
    /// Size in bytes.
    pub size: Option<u64>,
    pub bit_rate: Option<u64>,
    pub tags: HashMap<String, String>,
}

/// The codec used by a stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodecInfo {
    pub name: String,
    pub kind: StreamKind,
    pub description: Option<String>,
    pub profile: Option<String>,
}

impl fmt::Display for CodecInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Fields every stream carries.
#[derive(Debug, Clone, PartialEq)]
pub struct StreamBase {
    pub codec: CodecInfo,
    /// Zero-based position in the container.
    pub index: u32,
    /// Unit of the stream's timestamps.
    pub time_base: Rational,
    pub frame_count: Option<u64>,
    pub start_time: Option<TimeDelta>,
    pub duration: Option<TimeDelta>,
    /// Duration in `time_base` units.
    pub duration_ts: Option<i64>,
    pub bit_rate: Option<u64>,
    pub tags: HashMap<String, String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VideoStream {
    pub base: StreamBase,
    pub width: u32,
    pub height: u32,
    /// In `W:H` form.
    pub display_aspect_ratio: Option<String>,
    pub pix_fmt: Option<String>,
    /// Frames that may need reordering for B-frame decoding, 0 without B-frames.
    pub has_b_frames: u32,
    /// Average frame rate; `None` when the tool reports it as undefined.
    pub frame_rate: Option<Rational>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AudioStream {
    pub base: StreamBase,
    pub channels: u32,
    pub channel_layout: Option<String>,
    pub sample_fmt: String,
    /// In Hz.
    pub sample_rate: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SubtitleStream {
    pub base: StreamBase,
    pub language: Option<String>,
}

/// A stream this crate has no dedicated model for; the tool's fields are
/// kept as they were reported.
#[derive(Debug, Clone, PartialEq)]
pub struct DataStream {
    pub base: StreamBase,
    pub raw: Map<String, Value>,
}

/// One stream of an inspected source.
#[derive(Debug, Clone, PartialEq)]
pub enum StreamInfo {
    Video(VideoStream),
    Audio(AudioStream),
    Subtitle(SubtitleStream),
    Data(DataStream),
}

impl StreamInfo {
    pub fn base(&self) -> &StreamBase {
        match self {
            Self::Video(s) => &s.base,
            Self::Audio(s) => &s.base,
            Self::Subtitle(s) => &s.base,
            Self::Data(s) => &s.base,
        }
    }

    pub fn kind(&self) -> StreamKind {
        self.base().codec.kind
    }

    pub fn index(&self) -> u32 {
        self.base().index
    }

    pub fn codec(&self) -> &CodecInfo {
        &self.base().codec
    }
}

/// Everything known about an inspected source.
#[derive(Debug, Clone, PartialEq)]
pub struct MediaInfo {
    /// The inspection tool's JSON output, untouched.
    pub raw: Value,
    pub format: ContainerInfo,
    pub streams: Vec<StreamInfo>,
}

impl MediaInfo {
    pub fn video_streams(&self) -> Vec<&VideoStream> {
        self.streams
            .iter()
            .filter_map(|s| match s {
                StreamInfo::Video(v) => Some(v),
                _ => None,
            })
            .collect()
    }

    pub fn audio_streams(&self) -> Vec<&AudioStream> {
        self.streams
            .iter()
            .filter_map(|s| match s {
                StreamInfo::Audio(a) => Some(a),
                _ => None,
            })
            .collect()
    }

    pub fn subtitle_streams(&self) -> Vec<&SubtitleStream> {
        self.streams
            .iter()
            .filter_map(|s| match s {
                StreamInfo::Subtitle(t) => Some(t),
                _ => None,
            })
            .collect()
    }

    pub fn has_video(&self) -> bool {
        self.streams.iter().any(|s| s.kind() == StreamKind::Video)
    }

    pub fn has_audio(&self) -> bool {
        self.streams.iter().any(|s| s.kind() == StreamKind::Audio)
    }

    pub fn has_subtitles(&self) -> bool {
        self.streams.iter().any(|s| s.kind() == StreamKind::Subtitle)
    }
}
