use crate::model::CoreError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, OpsError>;

#[derive(Debug, Error)]
pub enum OpsError {
    #[error("invalid operation parameters: {0}")]
    InvalidParams(String),

    #[error("unsupported buffer layout: {0}")]
    UnsupportedLayout(String),

    #[error("core buffer error: {0}")]
    Core(#[from] CoreError),
}
