mod buffer;
mod document;
mod error;
mod scale;


pub use buffer::{PixelBuffer, PixelDepth, PixelRect};
pub use document::{ImageDocument, ImageSummary};
pub use error::{CoreError, Result};
pub use scale::MeasurementScale;
