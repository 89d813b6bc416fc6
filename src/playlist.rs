//! Extended M3U output
//!
//! Format: an `#EXTM3U` header followed by one `#EXTINF:-1,<title>` / `<address>` pair per entry.
//! Titles are written verbatim, nothing is escaped.

use std::{fmt::Write as _, path::Path};

use thiserror::Error;

use crate::structs::Entry;

pub const HEADER: &str = "#EXTM3U";

#[derive(Debug, Error)]
#[error("Malformed playlist: {0}")]
pub struct MalformedPlaylist(String);

/// Renders entries as an extended M3U playlist, skipping entries without an address
#[must_use]
pub fn render(entries: &[Entry]) -> String {
    let mut out = String::from(HEADER);
    out.push('\n');
    for entry in entries.iter().filter(|e| !e.address.is_empty()) {
        writeln!(out, "#EXTINF:-1,{}", entry.title).ok();
        writeln!(out, "{}", entry.address).ok();
    }
    out
}

/// Writes the rendered playlist to `path` as UTF-8, replacing any existing file
///
/// # Errors
/// Errors when the file cannot be created or written
pub async fn write(path: &Path, entries: &[Entry]) -> std::io::Result<()> {
    tokio::fs::write(path, render(entries)).await
}

/// Reads an extended M3U playlist back into entries
///
/// The title is everything after the first comma of an `#EXTINF` line, kept verbatim.
/// Addresses without a preceding `#EXTINF` get an empty title.
///
/// # Errors
/// Errors when the content does not start with the `#EXTM3U` header
pub fn parse(content: &str) -> Result<Vec<Entry>, MalformedPlaylist> {
    let mut lines = content.lines().filter(|l| !l.trim().is_empty());
    match lines.next() {
        Some(first) if first.trim_end().starts_with(HEADER) => {}
        Some(first) => {
            return Err(MalformedPlaylist(format!(
                "expected `{HEADER}` header, found `{first}`"
            )));
        }
        None => return Err(MalformedPlaylist("empty playlist".to_string())),
    }

    let mut entries = Vec::new();
    let mut current_title: Option<&str> = None;

    for line in lines {
        if let Some(info) = line.strip_prefix("#EXTINF:") {
            // Duration and attributes end at the first comma, the title is the rest
            current_title = Some(info.split_once(',').map_or("", |(_, title)| title));
        } else if !line.starts_with('#') {
            entries.push(Entry::new(current_title.take().unwrap_or_default(), line));
        }
    }

    Ok(entries)
}
