use std::fs;
use std::path::{Path, PathBuf};

use crate::measure::MeasurementList;

use super::Result;
use super::util::with_suffix;

pub fn text_path(path: &Path) -> PathBuf {
    with_suffix(path, "txt", &["txt"])
}

/// Writes the list header and rows; returns the path actually written.
pub fn export_text(path: impl AsRef<Path>, list: &MeasurementList) -> Result<PathBuf> {
    let path = text_path(path.as_ref());
    fs::write(&path, list.to_text())?;
    tracing::info!(path = %path.display(), rows = list.len(), "measurements exported");
    Ok(path)
}
