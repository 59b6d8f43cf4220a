use crate::commands::OpsError;
use crate::formats::IoError;
use crate::model::CoreError;
use thiserror::Error;

use super::ShellMode;

pub type Result<T> = std::result::Result<T, ShellError>;

#[derive(Debug, Error)]
pub enum ShellError {
    #[error("busy: {0:?} must be confirmed or cancelled first")]
    Busy(ShellMode),

    #[error("no image is loaded in the active tab")]
    NoImage,

    #[error("the last open document cannot be closed")]
    LastDocument,

    #[error("no document at index {0}")]
    NoSuchDocument(usize),

    #[error("no operation or measurement is active")]
    NotActive,

    #[error("areas were already measured on this image")]
    AlreadyMeasured,

    #[error("file error: {0}")]
    Io(#[from] IoError),

    #[error("operation error: {0}")]
    Ops(#[from] OpsError),

    #[error("buffer error: {0}")]
    Core(#[from] CoreError),
}
