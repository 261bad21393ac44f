//! Screenshot naming and atomic placement.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::{SecondsFormat, Utc};
use tempfile::NamedTempFile;

use crate::Result;

/// Replace everything outside `[A-Za-z0-9-_]` with `_`.
pub fn safe_file_name(label: &str) -> String {
    let cleaned: String = label
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    if cleaned.is_empty() {
        "page".to_string()
    } else {
        cleaned
    }
}

/// UTC timestamp with millisecond precision and no `:` or `.`.
pub fn screenshot_timestamp() -> String {
    Utc::now()
        .to_rfc3339_opts(SecondsFormat::Millis, true)
        .replace(|c: char| c == ':' || c == '.', "-")
}

/// Write `png` into `dir` as `<label>_<timestamp>.png` and return the path.
///
/// The bytes land in a temporary file inside `dir` first and are moved into
/// place without overwriting; a clash gets a numeric suffix.
pub fn persist_screenshot(dir: &Path, label: &str, png: &[u8]) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)?;

    let mut temp = NamedTempFile::with_prefix_in(".capture_", dir)?;
    temp.write_all(png)?;
    temp.flush()?;

    let stem = format!("{}_{}", safe_file_name(label), screenshot_timestamp());
    let mut attempt = 0u32;
    loop {
        let file_name = if attempt == 0 {
            format!("{stem}.png")
        } else {
            format!("{stem}_{attempt}.png")
        };
        let target = dir.join(file_name);
        match temp.persist_noclobber(&target) {
            Ok(_) => return Ok(target),
            Err(err) if err.error.kind() == io::ErrorKind::AlreadyExists => {
                temp = err.file;
                attempt += 1;
            }
            Err(err) => return Err(err.error.into()),
        }
    }
}
