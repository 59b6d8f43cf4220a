mod error;
mod settings;

pub use error::{ConfigError, Result};
pub use settings::{OverlayColors, Settings, load_settings};
