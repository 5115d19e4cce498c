//! Lazily discovered, process-lifetime capability caches.

use tokio::sync::OnceCell;
use tracing::{debug, info};

use super::parse::parse_version;
use super::types::{CapabilityTable, CodecTable, EncoderTable, FormatTable, ListingRecord};
use crate::runner::{InvocationMode, Tool, ToolError, Toolchain};

/// Encoders and formats borrowed from a [`CapabilityDirectory`], used to
/// validate command model parts.
#[derive(Debug, Clone, Copy)]
pub struct Capabilities<'a> {
    pub encoders: &'a EncoderTable,
    pub formats: &'a FormatTable,
}

/// What the installed ffmpeg supports.
///
/// Each table is discovered on first use with one quick-mode invocation
/// and kept for the life of the directory. Concurrent first callers wait
/// on the same discovery. A failed discovery is not cached, so the next
/// call tries again.
#[derive(Debug)]
pub struct CapabilityDirectory {
    toolchain: Toolchain,
    codecs: OnceCell<CodecTable>,
    encoders: OnceCell<EncoderTable>,
    formats: OnceCell<FormatTable>,
    ffmpeg_version: OnceCell<String>,
    ffprobe_version: OnceCell<String>,
}

impl CapabilityDirectory {
    pub fn new(toolchain: Toolchain) -> Self {
        Self {
            toolchain,
            codecs: OnceCell::new(),
            encoders: OnceCell::new(),
            formats: OnceCell::new(),
            ffmpeg_version: OnceCell::new(),
            ffprobe_version: OnceCell::new(),
        }
    }

    pub fn toolchain(&self) -> &Toolchain {
        &self.toolchain
    }

    /// Codecs from `ffmpeg -codecs`.
    pub async fn codecs(&self) -> Result<&CodecTable, ToolError> {
        self.codecs
            .get_or_try_init(|| self.discover("-codecs"))
            .await
    }

    /// Encoders from `ffmpeg -encoders`.
    pub async fn encoders(&self) -> Result<&EncoderTable, ToolError> {
        self.encoders
            .get_or_try_init(|| self.discover("-encoders"))
            .await
    }

    /// Container formats from `ffmpeg -formats`.
    pub async fn formats(&self) -> Result<&FormatTable, ToolError> {
        self.formats
            .get_or_try_init(|| self.discover("-formats"))
            .await
    }

    pub async fn ffmpeg_version(&self) -> Result<&str, ToolError> {
        self.ffmpeg_version
            .get_or_try_init(|| self.version(Tool::Ffmpeg))
            .await
            .map(String::as_str)
    }

    pub async fn ffprobe_version(&self) -> Result<&str, ToolError> {
        self.ffprobe_version
            .get_or_try_init(|| self.version(Tool::Ffprobe))
            .await
            .map(String::as_str)
    }

    /// Encoders and formats together, discovering whichever is missing.
    pub async fn capabilities(&self) -> Result<Capabilities<'_>, ToolError> {
        Ok(Capabilities {
            encoders: self.encoders().await?,
            formats: self.formats().await?,
        })
    }

    async fn discover<T: ListingRecord>(
        &self,
        flag: &str,
    ) -> Result<CapabilityTable<T>, ToolError> {
        let listing = self
            .toolchain
            .ffmpeg_text(&[flag.to_string()], InvocationMode::Quick)
            .await?;
        let table = CapabilityTable::<T>::parse_listing(&listing);
        info!("ffmpeg {} listed {} entries", flag, table.len());
        Ok(table)
    }

    async fn version(&self, tool: Tool) -> Result<String, ToolError> {
        let args = ["-version".to_string()];
        let banner = match tool {
            Tool::Ffmpeg => {
                self.toolchain
                    .ffmpeg_text(&args, InvocationMode::Quick)
                    .await?
            }
            Tool::Ffprobe => self.toolchain.ffprobe(&args, InvocationMode::Quick).await?,
        };
        let version = parse_version(&banner)?;
        debug!("{} version {}", tool, version);
        Ok(version)
    }
}
