use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::overlay::OverlayLayer;

use super::{MeasurementScale, PixelBuffer};

/// Metadata shown for the working image.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImageSummary {
    pub title: String,
    pub width: usize,
    pub height: usize,
    pub channels: usize,
    pub depth: String,
    pub min: f32,
    pub max: f32,
    pub source: Option<String>,
}

/// One open image: the live buffer, a single-slot undo backup and the
/// original it was created from.
#[derive(Debug, Clone)]
pub struct ImageDocument {
    title: String,
    source: Option<PathBuf>,
    current: PixelBuffer,
    previous: Option<PixelBuffer>,
    first: PixelBuffer,
    overlay: OverlayLayer,
    scale: MeasurementScale,
    areas_measured: bool,
}

impl ImageDocument {
    pub fn new(title: impl Into<String>, buffer: PixelBuffer) -> Self {
        Self {
            title: title.into(),
            source: None,
            current: buffer.clone(),
            previous: None,
            first: buffer,
            overlay: OverlayLayer::default(),
            scale: MeasurementScale::default(),
            areas_measured: false,
        }
    }

    pub fn from_path(path: &Path, buffer: PixelBuffer) -> Self {
        let title = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let mut document = Self::new(title, buffer);
        document.source = Some(path.to_path_buf());
        document
    }

    /// Empty document shown when nothing is loaded or a load failed.
    pub fn placeholder() -> Self {
        Self::new("Untitled", PixelBuffer::empty())
    }

    pub fn with_scale(mut self, scale: MeasurementScale) -> Self {
        self.scale = scale;
        self
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    pub fn current(&self) -> &PixelBuffer {
        &self.current
    }

    pub fn previous(&self) -> Option<&PixelBuffer> {
        self.previous.as_ref()
    }

    pub fn first(&self) -> &PixelBuffer {
        &self.first
    }

    pub fn is_empty(&self) -> bool {
        self.current.is_empty()
    }

    /// Replaces the live buffer; the backup slot is left alone.
    pub fn set_current(&mut self, buffer: PixelBuffer) {
        self.current = buffer;
        self.areas_measured = false;
    }

    pub fn backup(&mut self) {
        self.previous = Some(self.current.clone());
    }

    /// Restores the backup. Returns `false` when there is nothing to restore.
    pub fn undo(&mut self) -> bool {
        match &self.previous {
            Some(previous) => {
                self.current = previous.clone();
                self.areas_measured = false;
                true
            }
            None => false,
        }
    }

    /// Restores the original buffer and drops the backup.
    pub fn revert(&mut self) {
        self.current = self.first.clone();
        self.previous = None;
        self.areas_measured = false;
        self.overlay.clear();
    }

    pub fn overlay(&self) -> &OverlayLayer {
        &self.overlay
    }

    pub fn overlay_mut(&mut self) -> &mut OverlayLayer {
        &mut self.overlay
    }

    pub fn scale(&self) -> &MeasurementScale {
        &self.scale
    }

    pub fn set_scale(&mut self, scale: MeasurementScale) {
        self.scale = scale;
    }

    pub fn areas_measured(&self) -> bool {
        self.areas_measured
    }

    pub fn mark_areas_measured(&mut self) {
        self.areas_measured = true;
    }

    pub fn summary(&self) -> ImageSummary {
        let (min, max) = self.current.min_max().unwrap_or((0.0, 0.0));
        ImageSummary {
            title: self.title.clone(),
            width: self.current.cols(),
            height: self.current.rows(),
            channels: self.current.channels(),
            depth: self.current.depth().label().to_string(),
            min,
            max,
            source: self.source.as_ref().map(|path| path.display().to_string()),
        }
    }

    /// Pixel readout for the hover panel: `v` for gray, `(r, g, b)` for color.
    pub fn sample_text(&self, x: usize, y: usize) -> Option<String> {
        let pixel = self.current.pixel(y, x)?;
        let text = match pixel.as_slice() {
            [value] => format!("{value}"),
            values => format!(
                "({})",
                values
                    .iter()
                    .map(|value| format!("{value}"))
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
        };
        Some(text)
    }
}
