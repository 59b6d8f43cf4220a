use std::path::{Path, PathBuf};

use crate::model::{ImageDocument, PixelBuffer};

use super::raster::{read_raster, write_jpeg};
use super::util::{extension, with_suffix};
use super::{IoError, Result};

/// Saved images are always JPEG at this quality.
pub const JPEG_QUALITY: u8 = 90;

pub fn supported_formats() -> &'static [&'static str] {
    &["png", "jpg", "jpeg", "bmp", "tif", "tiff"]
}

pub fn open_image(path: impl AsRef<Path>) -> Result<PixelBuffer> {
    let path = path.as_ref();
    let extension = extension(path)?;
    if !supported_formats().contains(&extension.as_str()) {
        return Err(IoError::UnsupportedFormat(extension));
    }
    read_raster(path)
}

/// Opens `path` as a document. A file that cannot be read still yields a
/// document, with an empty buffer, so the tab shows the placeholder.
pub fn load_document(path: impl AsRef<Path>) -> ImageDocument {
    let path = path.as_ref();
    match open_image(path) {
        Ok(buffer) => {
            tracing::info!(
                path = %path.display(),
                rows = buffer.rows(),
                cols = buffer.cols(),
                channels = buffer.channels(),
                "image opened"
            );
            ImageDocument::from_path(path, buffer)
        }
        Err(error) => {
            tracing::warn!(path = %path.display(), %error, "image could not be opened");
            ImageDocument::from_path(path, PixelBuffer::empty())
        }
    }
}

pub fn jpeg_path(path: &Path) -> PathBuf {
    with_suffix(path, "jpg", &["jpg", "jpeg"])
}

/// Encodes `buffer` as JPEG next to `path` (with `.jpg` appended when
/// needed) and returns the written path.
pub fn save_jpeg(path: impl AsRef<Path>, buffer: &PixelBuffer) -> Result<PathBuf> {
    let path = jpeg_path(path.as_ref());
    write_jpeg(&path, buffer, JPEG_QUALITY)?;
    tracing::info!(path = %path.display(), "image saved");
    Ok(path)
}
