//! Readers for the text listings and version banners printed by ffmpeg.

use crate::runner::ToolError;

/// Lines that follow the first `--` separator line.
pub(crate) fn rows_after_separator(text: &str) -> impl Iterator<Item = &str> {
    text.lines()
        .skip_while(|line| !line.trim_start().starts_with("--"))
        .skip(1)
}

/// Split a row into flags, name and description. The description keeps
/// its inner whitespace. Rows with fewer than three fields yield `None`.
pub(crate) fn split_row(line: &str) -> Option<(&str, &str, &str)> {
    let (flags, rest) = line.trim().split_once(char::is_whitespace)?;
    let (name, description) = rest.trim_start().split_once(char::is_whitespace)?;
    let description = description.trim();
    if description.is_empty() {
        return None;
    }
    Some((flags, name, description))
}

/// Version token from a `-version` banner such as
/// `ffmpeg version 4.1.2 Copyright (c) ...`.
pub fn parse_version(output: &str) -> Result<String, ToolError> {
    let first = output.lines().next().unwrap_or_default();
    first
        .split(' ')
        .nth(2)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .ok_or_else(|| ToolError::parse(format!("unrecognised version banner: {:?}", first)))
}
