use crate::model::CoreError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, IoError>;

#[derive(Debug, Error)]
pub enum IoError {
    #[error("unsupported image format: {0}")]
    UnsupportedFormat(String),

    #[error("unsupported buffer layout for this format: {0}")]
    UnsupportedLayout(String),

    #[error("nothing to save: the image is empty")]
    EmptyBuffer,

    #[error("I/O failure: {0}")]
    Io(#[from] std::io::Error),

    #[error("image decode/encode failure: {0}")]
    Image(#[from] image::ImageError),

    #[error("core buffer failure: {0}")]
    Core(#[from] CoreError),
}
