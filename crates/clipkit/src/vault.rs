//! Vault sync
//!
//! Writes notes into a folder of a Markdown vault (e.g. an Obsidian vault)
//! under a dated, filesystem-safe file name. The vault root must already
//! exist; only the target folder is created.

use crate::error::ReadError;
use crate::note::format_note;
use crate::types::ReadResult;
use chrono::{Local, NaiveDate};
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use url::Url;

/// Maximum length of the title part of a generated file name, in characters
pub const DEFAULT_MAX_NAME_LEN: usize = 50;

/// Folder inside the vault that notes are written to by default
pub const DEFAULT_FOLDER: &str = "Clippings";

/// Characters not allowed in file names on common filesystems
fn is_forbidden(c: char) -> bool {
    matches!(c, '<' | '>' | ':' | '"' | '/' | '\\' | '|' | '?' | '*' | '\0'..='\u{1F}')
}

/// Generate a note file name (without extension) for the given date
///
/// Whitespace runs in the title become single spaces. The title is then
/// stripped of forbidden and control characters and truncated to `max_len`
/// characters. An empty title falls back to the URL's hostname, then to
/// `untitled`. The result is prefixed with `YYYY-MM-DD `.
pub fn generate_file_name(title: &str, url: &str, max_len: usize, date: NaiveDate) -> String {
    let mut name: String = title
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .chars()
        .filter(|&c| !is_forbidden(c))
        .collect::<String>()
        .trim()
        .to_string();

    if name.is_empty() {
        name = Url::parse(url)
            .ok()
            .and_then(|u| u.host_str().map(str::to_string))
            .filter(|h| !h.is_empty())
            .unwrap_or_else(|| "untitled".to_string());
    }

    if name.chars().count() > max_len {
        name = name.chars().take(max_len).collect::<String>().trim().to_string();
    }

    format!("{} {}", date.format("%Y-%m-%d"), name)
}

/// Generate a note file name dated today (local time)
pub fn generate_file_name_today(title: &str, url: &str, max_len: usize) -> String {
    generate_file_name(title, url, max_len, Local::now().date_naive())
}

/// Write note content into `root/folder`
///
/// `file_name` is used verbatim when given, otherwise a name is generated
/// from `title` and `url`. `.md` is appended when missing. Existing files
/// are overwritten. Returns the path written.
pub fn sync_to_vault(
    content: &str,
    root: &Path,
    folder: &str,
    file_name: Option<&str>,
    title: &str,
    url: &str,
) -> Result<PathBuf, ReadError> {
    if content.is_empty() {
        return Err(ReadError::EmptyContent);
    }
    if !root.is_dir() {
        return Err(ReadError::VaultNotFound(root.to_path_buf()));
    }

    let mut name = match file_name {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => generate_file_name_today(title, url, DEFAULT_MAX_NAME_LEN),
    };
    if !name.ends_with(".md") {
        name.push_str(".md");
    }

    let dir = root.join(folder);
    std::fs::create_dir_all(&dir).map_err(|source| ReadError::CreateDir {
        path: dir.clone(),
        source,
    })?;

    let path = dir.join(name);
    debug!(path = %path.display(), bytes = content.len(), "Writing note");
    std::fs::write(&path, content).map_err(|source| ReadError::Write {
        path: path.clone(),
        source,
    })?;

    info!(path = %path.display(), "Saved note to vault");
    Ok(path)
}

/// Format a read result as a note and write it into the vault
pub fn sync_read_result(
    result: &ReadResult,
    root: &Path,
    folder: &str,
) -> Result<PathBuf, ReadError> {
    let note = format_note(result);
    sync_to_vault(
        &note,
        root,
        folder,
        None,
        result.display_title(),
        &result.source,
    )
}
