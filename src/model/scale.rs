use serde::{Deserialize, Serialize};

const DEFAULT_UNIT: &str = "px";

/// Pixel-to-physical conversion attached to a document.
///
/// `factor` is physical units per pixel: lengths are multiplied by it and
/// areas by its square.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeasurementScale {
    pub factor: f64,
    pub unit: String,
}

impl Default for MeasurementScale {
    fn default() -> Self {
        Self {
            factor: 1.0,
            unit: String::new(),
        }
    }
}

impl MeasurementScale {
    pub fn new(factor: f64, unit: impl Into<String>) -> Self {
        Self {
            factor,
            unit: unit.into(),
        }
    }

    /// Derives a scale from a reference line of `pixels` length known to
    /// measure `known_length` units.
    pub fn from_reference(pixels: f64, known_length: f64, unit: impl Into<String>) -> Option<Self> {
        if pixels <= 0.0 || !known_length.is_finite() || known_length <= 0.0 {
            return None;
        }
        Some(Self::new(known_length / pixels, unit))
    }

    /// Unit labels are restricted to ASCII letters.
    pub fn is_valid_unit(unit: &str) -> bool {
        !unit.is_empty() && unit.chars().all(|c| c.is_ascii_alphabetic())
    }

    pub fn length(&self, pixels: f64) -> f64 {
        pixels * self.factor
    }

    pub fn area(&self, pixels: f64) -> f64 {
        pixels * self.factor * self.factor
    }

    pub fn unit_label(&self) -> &str {
        if self.unit.is_empty() {
            DEFAULT_UNIT
        } else {
            &self.unit
        }
    }

    pub fn area_unit_label(&self) -> String {
        format!("{}²", self.unit_label())
    }

    pub fn describe(&self) -> String {
        format!("{:.4} {}/px", self.factor, self.unit_label())
    }
}
