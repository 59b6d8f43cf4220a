use std::ffi::OsString;
use std::path::{Path, PathBuf};

use super::{IoError, Result};

pub(crate) fn extension(path: &Path) -> Result<String> {
    let ext = path
        .extension()
        .and_then(|value| value.to_str())
        .map(|value| value.to_ascii_lowercase())
        .ok_or_else(|| IoError::UnsupportedFormat(path.to_string_lossy().to_string()))?;
    Ok(ext)
}

/// Appends `.{suffix}` unless the file name already ends with one of
/// `accepted` (compared case-insensitively).
pub(crate) fn with_suffix(path: &Path, suffix: &str, accepted: &[&str]) -> PathBuf {
    let has_suffix = path
        .extension()
        .and_then(|value| value.to_str())
        .is_some_and(|ext| accepted.iter().any(|item| ext.eq_ignore_ascii_case(item)));
    if has_suffix {
        return path.to_path_buf();
    }
    let mut name = OsString::from(path.as_os_str());
    name.push(".");
    name.push(suffix);
    PathBuf::from(name)
}
