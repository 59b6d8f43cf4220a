mod api;
mod error;
mod raster;
mod text;
mod util;


pub use api::{
    JPEG_QUALITY, jpeg_path, load_document, open_image, save_jpeg, supported_formats,
};
pub use error::{IoError, Result};
pub use text::{export_text, text_path};
