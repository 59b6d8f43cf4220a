use thiserror::Error;

pub type Result<T> = std::result::Result<T, CoreError>;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("unsupported channel count {0}: expected 1 or 3")]
    UnsupportedChannels(usize),

    #[error(
        "sample count mismatch: {actual} samples for a {rows}x{cols}x{channels} buffer"
    )]
    SampleCount {
        rows: usize,
        cols: usize,
        channels: usize,
        actual: usize,
    },

    #[error("crop rectangle {rect:?} exceeds {rows}x{cols} buffer")]
    CropOutOfBounds {
        rect: super::PixelRect,
        rows: usize,
        cols: usize,
    },

    #[error("selection has zero width or height")]
    EmptySelection,

    #[error("buffer holds no pixels")]
    EmptyBuffer,

    #[error("invalid buffer shape: {0}")]
    Shape(#[from] ndarray::ShapeError),
}
