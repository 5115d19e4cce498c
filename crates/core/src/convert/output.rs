//! Output definitions.

use std::fmt;

use super::format::Format;
use super::stream::Stream;

/// One output of an ffmpeg run.
///
/// Without streams, ffmpeg picks default codecs for the format. Without a
/// format, ffmpeg guesses it from the target name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Output {
    target: String,
    streams: Vec<Stream>,
    format: Option<Format>,
    extra: Vec<String>,
}

impl Output {
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            streams: Vec::new(),
            format: None,
            extra: Vec::new(),
        }
    }

    pub fn with_stream(mut self, stream: impl Into<Stream>) -> Self {
        self.streams.push(stream.into());
        self
    }

    pub fn with_streams<I>(mut self, streams: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Stream>,
    {
        self.streams.extend(streams.into_iter().map(Into::into));
        self
    }

    pub fn with_format(mut self, format: Format) -> Self {
        self.format = Some(format);
        self
    }

    /// Arguments placed just before the target.
    pub fn with_extra<I, S>(mut self, extra: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extra.extend(extra.into_iter().map(Into::into));
        self
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn streams(&self) -> &[Stream] {
        &self.streams
    }

    pub fn format(&self) -> Option<&Format> {
        self.format.as_ref()
    }

    pub fn to_args(&self) -> Vec<String> {
        let mut args: Vec<String> = self.streams.iter().flat_map(Stream::to_args).collect();
        if let Some(format) = &self.format {
            args.extend(format.to_args());
        }
        args.extend(self.extra.iter().cloned());
        args.push(self.target.clone());
        args
    }
}

impl From<&str> for Output {
    fn from(target: &str) -> Self {
        Self::new(target)
    }
}

impl From<String> for Output {
    fn from(target: String) -> Self {
        Self::new(target)
    }
}

impl fmt::Display for Output {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_args().join(" "))
    }
}
