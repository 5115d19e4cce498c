//! Input definitions.

use std::fmt;

use super::time_spec::TimeSpec;
use crate::locator::Locator;
use crate::runner::ToolError;

/// One input to an ffmpeg run: a local file or any URL ffmpeg can open.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Input {
    source: String,
    seek: Option<TimeSpec>,
    duration: Option<TimeSpec>,
    extra: Vec<String>,
}

impl Input {
    /// Fails with [`ToolError::NoMedia`] if `source` is a local path (no
    /// scheme, or `file:`) that does not name an existing file.
    pub fn new(source: impl Into<String>) -> Result<Self, ToolError> {
        let source = source.into();
        Locator::parse(&source).ensure_exists()?;
        Ok(Self {
            source,
            seek: None,
            duration: None,
            extra: Vec::new(),
        })
    }

    /// Start reading at this offset (`-ss`). Zero clears the seek.
    pub fn with_seek(mut self, seek: impl Into<TimeSpec>) -> Self {
        self.seek = Some(seek.into()).filter(|t| !t.is_zero());
        self
    }

    /// Read at most this much of the source (`-t`). Zero means no limit.
    pub fn with_duration(mut self, duration: impl Into<TimeSpec>) -> Self {
        self.duration = Some(duration.into()).filter(|t| !t.is_zero());
        self
    }

    /// Arguments placed just before `-i`.
    pub fn with_extra<I, S>(mut self, extra: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extra.extend(extra.into_iter().map(Into::into));
        self
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn to_args(&self) -> Vec<String> {
        let mut args = Vec::new();
        if let Some(seek) = self.seek {
            args.push("-ss".to_string());
            args.push(seek.to_string());
        }
        if let Some(duration) = self.duration {
            args.push("-t".to_string());
            args.push(duration.to_string());
        }
        args.extend(self.extra.iter().cloned());
        args.push("-i".to_string());
        args.push(self.source.clone());
        args
    }
}

impl fmt::Display for Input {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_args().join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeDelta;
    use std::time::Duration;
    use tempfile::NamedTempFile;

    fn source() -> (NamedTempFile, String) {
        let file = NamedTempFile::new().unwrap();
        let path = file.path().to_string_lossy().to_string();
        (file, path)
    }

    #[test]
    fn test_plain_input() {
        let (_file, path) = source();
        assert_eq!(Input::new(path.as_str()).unwrap().to_args(), vec!["-i", path.as_str()]);
    }

    #[test]
    fn test_seek_and_duration() {
        let (_file, path) = source();
        let input = Input::new(path.as_str())
            .unwrap()
            .with_seek(3u32)
            .with_duration(TimeSpec::try_from(TimeDelta::milliseconds(3140)).unwrap())
            .with_extra(["-re"]);
        assert_eq!(
            input.to_args(),
            vec!["-ss", "3.0", "-t", "3.14", "-re", "-i", path.as_str()]
        );
    }

    #[test]
    fn test_zero_seek_and_duration_are_unset() {
        let (_file, path) = source();
        let input = Input::new(path.as_str())
            .unwrap()
            .with_seek(TimeSpec::ZERO)
            .with_duration(0u32);
        assert_eq!(input.to_args(), vec!["-i", path.as_str()]);

        let input = input.with_seek(5u32).with_seek(Duration::ZERO);
        assert_eq!(input.to_args(), vec!["-i", path.as_str()]);
    }

    #[test]
    fn test_missing_local_file() {
        let err = Input::new("/nonexistent/input.mkv").unwrap_err();
        assert!(err.is_unusable_source());
        assert!(err.to_string().contains("/nonexistent/input.mkv"));

        assert!(Input::new("file:///nonexistent/input.mkv").is_err());
    }

    #[test]
    fn test_remote_input_not_checked() {
        let input = Input::new("https://example.radio.fm/stream.aac")
            .unwrap()
            .with_duration(60u32);
        assert_eq!(
            input.to_string(),
            "-t 60.0 -i https://example.radio.fm/stream.aac"
        );
    }
}
