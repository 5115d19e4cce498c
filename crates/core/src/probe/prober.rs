//! Running the inspection tool against a source.

use tracing::debug;

use super::types::MediaInfo;
use crate::locator::Locator;
use crate::runner::{ToolError, Toolchain};

/// Inspects a local file or stream URL.
///
/// Local sources are checked before the tool is started; a missing file is
/// [`ToolError::NoMedia`] without any process being spawned. Every call
/// runs the tool again.
pub async fn inspect(toolchain: &Toolchain, source: &str) -> Result<MediaInfo, ToolError> {
    let locator = Locator::parse(source);
    locator.ensure_exists()?;
    debug!("Inspecting {}", locator);

    let args = vec![
        "-show_format".to_string(),
        "-show_streams".to_string(),
        source.to_string(),
    ];
    let raw = toolchain.ffprobe_json(&args).await?;
    MediaInfo::from_value(raw)
}
