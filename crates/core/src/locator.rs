//! Classification of media locators into local paths and remote URLs.

use std::fmt;
use std::path::{Path, PathBuf};

use url::Url;

use crate::runner::ToolError;

/// Where a media source lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Locator {
    /// A path on the local filesystem (no scheme, or the `file` scheme).
    Local(PathBuf),
    /// Anything with another scheme: network streams, capture devices, pipes.
    Remote(String),
}

impl Locator {
    /// Classifies a locator string.
    ///
    /// Single-letter schemes are Windows drive letters, not URLs.
    pub fn parse(source: &str) -> Self {
        match Url::parse(source) {
            Ok(url) if url.scheme() == "file" => {
                let path = url
                    .to_file_path()
                    .unwrap_or_else(|_| PathBuf::from(url.path()));
                Self::Local(path)
            }
            Ok(url) if url.scheme().len() > 1 => Self::Remote(source.to_string()),
            _ => Self::Local(PathBuf::from(source)),
        }
    }

    pub fn local_path(&self) -> Option<&Path> {
        match self {
            Self::Local(path) => Some(path),
            Self::Remote(_) => None,
        }
    }

    pub fn is_local(&self) -> bool {
        matches!(self, Self::Local(_))
    }

    /// Fails with [`ToolError::NoMedia`] if a local locator does not name an
    /// existing regular file. Remote locators are not checked.
    pub fn ensure_exists(&self) -> Result<(), ToolError> {
        match self {
            Self::Local(path) if !path.is_file() => Err(ToolError::no_media(format!(
                "Source file not found: {}",
                path.display()
            ))),
            _ => Ok(()),
        }
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Local(path) => write!(f, "{}", path.display()),
            Self::Remote(url) => f.write_str(url),
        }
    }
}
