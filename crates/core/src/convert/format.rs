//! Output container format definitions.

use std::fmt;

use crate::capabilities::FormatTable;
use crate::runner::ToolError;

/// An explicit output container format (`-f name`).
///
/// Without one, ffmpeg guesses the format from the output file name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Format {
    name: String,
    extra: Vec<String>,
}

impl Format {
    /// A format that must appear in the format table.
    pub fn new(name: impl Into<String>, formats: &FormatTable) -> Result<Self, ToolError> {
        let name = name.into();
        if !formats.contains(&name) {
            return Err(ToolError::UnsupportedFormat { name });
        }
        Ok(Self {
            name,
            extra: Vec::new(),
        })
    }

    /// MP4. With `faststart` the index is moved to the front so playback
    /// can begin before the whole file has arrived.
    pub fn mp4(formats: &FormatTable, faststart: bool) -> Result<Self, ToolError> {
        let format = Self::new("mp4", formats)?;
        Ok(if faststart {
            format.with_extra(["-movflags", "faststart"])
        } else {
            format
        })
    }

    pub fn webm(formats: &FormatTable) -> Result<Self, ToolError> {
        Self::new("webm", formats)
    }

    pub fn matroska(formats: &FormatTable) -> Result<Self, ToolError> {
        Self::new("matroska", formats)
    }

    pub fn ogg(formats: &FormatTable) -> Result<Self, ToolError> {
        Self::new("ogg", formats)
    }

    /// The image sequence muxer, used for single-frame output.
    pub(crate) fn image2(formats: &FormatTable) -> Result<Self, ToolError> {
        Self::new("image2", formats)
    }

    pub fn with_extra<I, S>(mut self, extra: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extra.extend(extra.into_iter().map(Into::into));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn to_args(&self) -> Vec<String> {
        let mut args = vec!["-f".to_string(), self.name.clone()];
        args.extend(self.extra.iter().cloned());
        args
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_args().join(" "))
    }
}
