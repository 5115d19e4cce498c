//! Output stream definitions.

use std::fmt;

use crate::capabilities::{EncoderTable, MediaKind};
use crate::runner::ToolError;

/// Which encoder a stream uses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EncoderChoice {
    /// Drop streams of this kind from the output.
    Disabled,
    /// Pass streams through without re-encoding.
    Copy,
    /// Re-encode with the named encoder.
    Named(String),
}

impl EncoderChoice {
    /// Encoder name as passed to ffmpeg, `None` when disabled.
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Disabled => None,
            Self::Copy => Some("copy"),
            Self::Named(name) => Some(name),
        }
    }

    /// Checks a named encoder against the table. Disabled and copy always pass.
    fn validate(&self, encoders: &EncoderTable, kind: MediaKind) -> Result<(), ToolError> {
        let name = match self {
            Self::Named(name) if name != "copy" => name,
            _ => return Ok(()),
        };

        let encoder = encoders
            .get(name)
            .ok_or_else(|| ToolError::UnsupportedEncoder { name: name.clone() })?;

        if encoder.kind != kind {
            return Err(ToolError::EncoderKindMismatch {
                name: name.clone(),
                encoder_kind: encoder.kind.to_string(),
                stream_kind: kind.to_string(),
            });
        }
        Ok(())
    }
}

impl From<&str> for EncoderChoice {
    fn from(name: &str) -> Self {
        match name {
            "copy" => Self::Copy,
            _ => Self::Named(name.to_string()),
        }
    }
}

impl From<String> for EncoderChoice {
    fn from(name: String) -> Self {
        if name == "copy" {
            Self::Copy
        } else {
            Self::Named(name)
        }
    }
}

impl<T: Into<EncoderChoice>> From<Option<T>> for EncoderChoice {
    fn from(name: Option<T>) -> Self {
        name.map(Into::into).unwrap_or(Self::Disabled)
    }
}

/// Output frame size for `-vf scale=...`.
///
/// Either dimension may be `-1` to keep the aspect ratio, or `0` to keep
/// the source size.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scale {
    Size(i32, i32),
    /// A raw scale filter argument, e.g. `iw/2:-1`.
    Expr(String),
}

impl fmt::Display for Scale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Size(w, h) => write!(f, "{}:{}", w, h),
            Self::Expr(expr) => f.write_str(expr),
        }
    }
}

impl From<(i32, i32)> for Scale {
    fn from((w, h): (i32, i32)) -> Self {
        Self::Size(w, h)
    }
}

impl From<&str> for Scale {
    fn from(expr: &str) -> Self {
        Self::Expr(expr.to_string())
    }
}

/// Target bit rate, in bits per second or ffmpeg's `NUMk`/`NUMm` notation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BitRate(String);

impl BitRate {
    pub fn kbps(value: u32) -> Self {
        Self(format!("{}k", value))
    }

    pub fn mbps(value: u32) -> Self {
        Self(format!("{}m", value))
    }
}

impl fmt::Display for BitRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<u64> for BitRate {
    fn from(bps: u64) -> Self {
        Self(bps.to_string())
    }
}

impl From<&str> for BitRate {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for BitRate {
    fn from(value: String) -> Self {
        Self(value)
    }
}

fn codec_args(flag: &str, encoder: &EncoderChoice) -> Option<Vec<String>> {
    encoder
        .name()
        .map(|name| vec![flag.to_string(), name.to_string()])
}

/// Video output stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Video {
    encoder: EncoderChoice,
    scale: Option<Scale>,
    bit_rate: Option<BitRate>,
    frames: Option<u64>,
    extra: Vec<String>,
}

impl Video {
    /// A video stream using `encoder`, which must be a known video encoder
    /// unless it is disabled or copy.
    pub fn new(
        encoder: impl Into<EncoderChoice>,
        encoders: &EncoderTable,
    ) -> Result<Self, ToolError> {
        let encoder = encoder.into();
        encoder.validate(encoders, MediaKind::Video)?;
        Ok(Self::unchecked(encoder))
    }

    /// No video in the output (`-vn`).
    pub fn disabled() -> Self {
        Self::unchecked(EncoderChoice::Disabled)
    }

    /// Copy video without re-encoding.
    pub fn copy() -> Self {
        Self::unchecked(EncoderChoice::Copy)
    }

    fn unchecked(encoder: EncoderChoice) -> Self {
        Self {
            encoder,
            scale: None,
            bit_rate: None,
            frames: None,
            extra: Vec::new(),
        }
    }

    /// H.264 through libx264, with optional preset and constant rate factor.
    pub fn h264(
        encoders: &EncoderTable,
        preset: Option<&str>,
        crf: Option<u8>,
    ) -> Result<Self, ToolError> {
        Ok(Self::new("libx264", encoders)?.with_extra(preset_args(preset, crf)))
    }

    /// H.265 through libx265, with optional preset and constant rate factor.
    pub fn h265(
        encoders: &EncoderTable,
        preset: Option<&str>,
        crf: Option<u8>,
    ) -> Result<Self, ToolError> {
        Ok(Self::new("libx265", encoders)?.with_extra(preset_args(preset, crf)))
    }

    /// VP9 through libvpx-vp9 in constant quality mode (CRF 31 by default).
    pub fn vp9(encoders: &EncoderTable, crf: Option<u8>) -> Result<Self, ToolError> {
        let crf = crf.unwrap_or(31).to_string();
        Ok(Self::new("libvpx-vp9", encoders)?
            .with_extra(["-crf", crf.as_str(), "-b:v", "0", "-quality", "good"]))
    }

    /// AV1 through the libaom reference encoder (CRF 30 by default). Very slow.
    pub fn av1(encoders: &EncoderTable, crf: Option<u8>) -> Result<Self, ToolError> {
        let crf = crf.unwrap_or(30).to_string();
        Ok(Self::new("libaom-av1", encoders)?
            .with_extra(["-crf", crf.as_str(), "-b:v", "0", "-strict", "experimental"]))
    }

    pub fn with_scale(mut self, scale: impl Into<Scale>) -> Self {
        self.scale = Some(scale.into());
        self
    }

    pub fn with_bit_rate(mut self, bit_rate: impl Into<BitRate>) -> Self {
        self.bit_rate = Some(bit_rate.into());
        self
    }

    /// Stop after this many frames. Zero means no limit.
    pub fn with_frames(mut self, frames: u64) -> Self {
        self.frames = (frames > 0).then_some(frames);
        self
    }

    /// Arguments appended after the stream's own flags.
    pub fn with_extra<I, S>(mut self, extra: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extra.extend(extra.into_iter().map(Into::into));
        self
    }

    pub fn encoder(&self) -> &EncoderChoice {
        &self.encoder
    }

    pub fn to_args(&self) -> Vec<String> {
        let Some(mut args) = codec_args("-c:v", &self.encoder) else {
            return vec!["-vn".to_string()];
        };
        if let Some(scale) = &self.scale {
            args.push("-vf".to_string());
            args.push(format!("scale={}", scale));
        }
        if let Some(bit_rate) = &self.bit_rate {
            args.push("-b:v".to_string());
            args.push(bit_rate.to_string());
        }
        if let Some(frames) = self.frames {
            args.push("-frames:v".to_string());
            args.push(frames.to_string());
        }
        args.extend(self.extra.iter().cloned());
        args
    }
}

fn preset_args(preset: Option<&str>, crf: Option<u8>) -> Vec<String> {
    let mut args = Vec::new();
    if let Some(preset) = preset {
        args.push("-preset".to_string());
        args.push(preset.to_string());
    }
    if let Some(crf) = crf {
        args.push("-crf".to_string());
        args.push(crf.to_string());
    }
    args
}

/// Audio output stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Audio {
    encoder: EncoderChoice,
    channels: Option<u32>,
    bit_rate: Option<BitRate>,
    extra: Vec<String>,
}

impl Audio {
    /// An audio stream using `encoder`, which must be a known audio encoder
    /// unless it is disabled or copy.
    pub fn new(
        encoder: impl Into<EncoderChoice>,
        encoders: &EncoderTable,
    ) -> Result<Self, ToolError> {
        let encoder = encoder.into();
        encoder.validate(encoders, MediaKind::Audio)?;
        Ok(Self::unchecked(encoder))
    }

    /// No audio in the output (`-an`).
    pub fn disabled() -> Self {
        Self::unchecked(EncoderChoice::Disabled)
    }

    /// Copy audio without re-encoding.
    pub fn copy() -> Self {
        Self::unchecked(EncoderChoice::Copy)
    }

    fn unchecked(encoder: EncoderChoice) -> Self {
        Self {
            encoder,
            channels: None,
            bit_rate: None,
            extra: Vec::new(),
        }
    }

    pub fn aac(encoders: &EncoderTable) -> Result<Self, ToolError> {
        Self::new("aac", encoders)
    }

    /// Opus through libopus.
    pub fn opus(encoders: &EncoderTable) -> Result<Self, ToolError> {
        Self::new("libopus", encoders)
    }

    /// Downmix to this many channels. Zero keeps the source layout.
    pub fn with_channels(mut self, channels: u32) -> Self {
        self.channels = (channels > 0).then_some(channels);
        self
    }

    pub fn with_bit_rate(mut self, bit_rate: impl Into<BitRate>) -> Self {
        self.bit_rate = Some(bit_rate.into());
        self
    }

    pub fn with_extra<I, S>(mut self, extra: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extra.extend(extra.into_iter().map(Into::into));
        self
    }

    pub fn encoder(&self) -> &EncoderChoice {
        &self.encoder
    }

    pub fn to_args(&self) -> Vec<String> {
        let Some(mut args) = codec_args("-c:a", &self.encoder) else {
            return vec!["-an".to_string()];
        };
        if let Some(channels) = self.channels {
            args.push("-ac".to_string());
            args.push(channels.to_string());
        }
        if let Some(bit_rate) = &self.bit_rate {
            args.push("-b:a".to_string());
            args.push(bit_rate.to_string());
        }
        args.extend(self.extra.iter().cloned());
        args
    }
}

/// Subtitle output stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subtitle {
    encoder: EncoderChoice,
    extra: Vec<String>,
}

impl Subtitle {
    pub fn new(
        encoder: impl Into<EncoderChoice>,
        encoders: &EncoderTable,
    ) -> Result<Self, ToolError> {
        let encoder = encoder.into();
        encoder.validate(encoders, MediaKind::Subtitle)?;
        Ok(Self::unchecked(encoder))
    }

    /// No subtitles in the output (`-sn`).
    pub fn disabled() -> Self {
        Self::unchecked(EncoderChoice::Disabled)
    }

    pub fn copy() -> Self {
        Self::unchecked(EncoderChoice::Copy)
    }

    fn unchecked(encoder: EncoderChoice) -> Self {
        Self {
            encoder,
            extra: Vec::new(),
        }
    }

    pub fn with_extra<I, S>(mut self, extra: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extra.extend(extra.into_iter().map(Into::into));
        self
    }

    pub fn encoder(&self) -> &EncoderChoice {
        &self.encoder
    }

    pub fn to_args(&self) -> Vec<String> {
        let Some(mut args) = codec_args("-c:s", &self.encoder) else {
            return vec!["-sn".to_string()];
        };
        args.extend(self.extra.iter().cloned());
        args
    }
}

/// Any output stream definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stream {
    Video(Video),
    Audio(Audio),
    Subtitle(Subtitle),
}

impl Stream {
    pub fn kind(&self) -> MediaKind {
        match self {
            Self::Video(_) => MediaKind::Video,
            Self::Audio(_) => MediaKind::Audio,
            Self::Subtitle(_) => MediaKind::Subtitle,
        }
    }

    pub fn to_args(&self) -> Vec<String> {
        match self {
            Self::Video(v) => v.to_args(),
            Self::Audio(a) => a.to_args(),
            Self::Subtitle(s) => s.to_args(),
        }
    }
}

impl fmt::Display for Stream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_args().join(" "))
    }
}

impl From<Video> for Stream {
    fn from(v: Video) -> Self {
        Self::Video(v)
    }
}

impl From<Audio> for Stream {
    fn from(a: Audio) -> Self {
        Self::Audio(a)
    }
}

impl From<Subtitle> for Stream {
    fn from(s: Subtitle) -> Self {
        Self::Subtitle(s)
    }
}
