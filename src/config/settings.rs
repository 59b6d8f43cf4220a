use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::model::MeasurementScale;

use super::{ConfigError, Result};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayColors {
    /// Committed annotations.
    pub annotation: [u8; 3],
    /// Selection being dragged.
    pub live: [u8; 3],
    pub label: [u8; 3],
}

impl Default for OverlayColors {
    fn default() -> Self {
        Self {
            annotation: [255, 255, 0],
            live: [0, 255, 255],
            label: [255, 64, 64],
        }
    }
}

/// User settings. Every field is optional in the file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub fit_to_screen: bool,
    /// Unit label shown before any calibration; empty means pixels.
    pub default_unit: String,
    /// `tracing` filter directive used when `RUST_LOG` is unset.
    pub log_filter: String,
    pub window_size: [f32; 2],
    pub overlay: OverlayColors,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            fit_to_screen: true,
            default_unit: String::new(),
            log_filter: "info".to_string(),
            window_size: [1280.0, 800.0],
            overlay: OverlayColors::default(),
        }
    }
}

impl Settings {
    pub fn validate(&self) -> Result<()> {
        if !self.default_unit.is_empty() && !MeasurementScale::is_valid_unit(&self.default_unit) {
            return Err(ConfigError::Invalid(format!(
                "default_unit must contain letters only, got {:?}",
                self.default_unit
            )));
        }
        if self.window_size.iter().any(|side| !side.is_finite() || *side < 200.0) {
            return Err(ConfigError::Invalid(format!(
                "window_size must be at least 200x200, got {:?}",
                self.window_size
            )));
        }
        Ok(())
    }

    /// Scale given to newly opened documents.
    pub fn default_scale(&self) -> MeasurementScale {
        MeasurementScale::new(1.0, self.default_unit.clone())
    }
}

/// Reads YAML (`.yaml`/`.yml`) or JSON settings, by extension.
pub fn load_settings(path: impl AsRef<Path>) -> Result<Settings> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path)?;
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase();
    let settings = if matches!(extension.as_str(), "yaml" | "yml") {
        serde_yaml::from_str::<Settings>(&raw)?
    } else {
        serde_json::from_str::<Settings>(&raw)?
    };
    settings.validate()?;
    Ok(settings)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::tempdir;

    use super::{ConfigError, Settings, load_settings};

    #[test]
    fn yaml_fills_missing_fields_with_defaults() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("imageq.yaml");
        fs::write(&path, "fit_to_screen: false\ndefault_unit: um\n").expect("write");

        let settings = load_settings(&path).expect("load");
        assert!(!settings.fit_to_screen);
        assert_eq!(settings.default_unit, "um");
        assert_eq!(settings.window_size, Settings::default().window_size);
        assert_eq!(settings.default_scale().unit_label(), "um");
    }

    #[test]
    fn json_is_used_for_other_extensions() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("imageq.json");
        fs::write(&path, r#"{"overlay": {"live": [1, 2, 3]}}"#).expect("write");

        let settings = load_settings(&path).expect("load");
        assert_eq!(settings.overlay.live, [1, 2, 3]);
        assert_eq!(settings.overlay.label, [255, 64, 64]);
        assert!(settings.fit_to_screen);
    }

    #[test]
    fn invalid_unit_is_rejected() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("imageq.yml");
        fs::write(&path, "default_unit: \"m2\"\n").expect("write");
        assert!(matches!(load_settings(&path), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn default_scale_is_pixels() {
        assert_eq!(Settings::default().default_scale().unit_label(), "px");
    }
}
