use eframe::egui::{Pos2, pos2};

use crate::commands::ComponentLabels;
use crate::model::{ImageDocument, MeasurementScale, PixelRect};
use crate::overlay::{Annotation, PointerEvent, Selection, SelectionEvent, SelectionMode};

use super::{MeasurementKind, MeasurementList};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeasureMode {
    Distance,
    /// Reference line for scale calibration.
    Scale,
    Crop,
}

impl MeasureMode {
    pub const fn selection_mode(self) -> SelectionMode {
        match self {
            Self::Distance => SelectionMode::Distance,
            Self::Scale => SelectionMode::Line,
            Self::Crop => SelectionMode::Rectangle,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Distance => "distance",
            Self::Scale => "set scale",
            Self::Crop => "crop",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum MeasureOutcome {
    /// A distance row was appended with this number.
    Measured(usize),
    ReferenceSelected(u32),
    RectangleSelected(PixelRect),
    CropAccepted(PixelRect),
    Exited,
}

/// Draft scale edited by the calibration window; applied only on OK.
#[derive(Debug, Clone, PartialEq)]
pub struct ScaleCalibration {
    pixels: u32,
    known_length: f64,
    unit: String,
}

impl ScaleCalibration {
    pub fn new(current: &MeasurementScale) -> Self {
        Self {
            pixels: 0,
            known_length: 1.0,
            unit: current.unit.clone(),
        }
    }

    pub fn pixels(&self) -> u32 {
        self.pixels
    }

    /// Inclusive pixel count covered by a reference line.
    pub fn set_reference(&mut self, start: Pos2, end: Pos2) -> u32 {
        self.pixels = start.distance(end).floor() as u32 + 1;
        self.pixels
    }

    pub fn known_length(&self) -> f64 {
        self.known_length
    }

    pub fn set_known_length(&mut self, length: f64) {
        if length.is_finite() && length > 0.0 {
            self.known_length = length;
        }
    }

    pub fn unit(&self) -> &str {
        &self.unit
    }

    /// Accepts letters-only units; anything else leaves the unit unchanged.
    pub fn set_unit(&mut self, unit: &str) -> bool {
        if !MeasurementScale::is_valid_unit(unit) {
            return false;
        }
        self.unit = unit.to_string();
        true
    }

    pub fn scale(&self) -> Option<MeasurementScale> {
        MeasurementScale::from_reference(
            f64::from(self.pixels),
            self.known_length,
            self.unit.clone(),
        )
    }
}

/// Drives one measurement flow on the active document: routes pointer
/// input through the selection state machine and records what it yields.
#[derive(Debug, Clone)]
pub struct MeasurementController {
    mode: MeasureMode,
    selection: Selection,
    distances: MeasurementList,
    calibration: ScaleCalibration,
}

impl MeasurementController {
    pub fn start(mode: MeasureMode, document: &ImageDocument) -> Self {
        let mut selection = Selection::default();
        selection.enter(mode.selection_mode());
        tracing::info!(mode = mode.label(), document = document.title(), "measurement started");
        Self {
            mode,
            selection,
            distances: MeasurementList::new(MeasurementKind::Distance),
            calibration: ScaleCalibration::new(document.scale()),
        }
    }

    pub fn mode(&self) -> MeasureMode {
        self.mode
    }

    pub fn distances(&self) -> &MeasurementList {
        &self.distances
    }

    pub fn calibration(&self) -> &ScaleCalibration {
        &self.calibration
    }

    pub fn calibration_mut(&mut self) -> &mut ScaleCalibration {
        &mut self.calibration
    }

    pub fn is_selecting(&self) -> bool {
        self.selection.is_active()
    }

    /// Re-arms line selection for another calibration reference.
    pub fn reselect(&mut self) {
        self.selection.enter(self.mode.selection_mode());
    }

    pub fn handle_pointer(
        &mut self,
        document: &mut ImageDocument,
        event: PointerEvent,
    ) -> Option<MeasureOutcome> {
        let selected = self.selection.handle(event, document.overlay_mut())?;
        let outcome = match (self.mode, selected) {
            (MeasureMode::Distance, SelectionEvent::LineSelected { start, end }) => {
                let scale = document.scale();
                let value = scale.length(f64::from(start.distance(end)));
                let unit = scale.unit_label().to_string();
                let index = self.distances.push(value, unit);
                let overlay = document.overlay_mut();
                overlay.push(Annotation::line(start, end));
                overlay.push(Annotation::label(midpoint(start, end), index.to_string()));
                tracing::debug!(index, value, "distance measured");
                MeasureOutcome::Measured(index)
            }
            (MeasureMode::Scale, SelectionEvent::LineSelected { start, end }) => {
                let pixels = self.calibration.set_reference(start, end);
                MeasureOutcome::ReferenceSelected(pixels)
            }
            (_, SelectionEvent::RectangleSelected(rect)) => MeasureOutcome::RectangleSelected(rect),
            (_, SelectionEvent::CropAccepted(rect)) => MeasureOutcome::CropAccepted(rect),
            (_, SelectionEvent::Exited) => MeasureOutcome::Exited,
            (mode, event) => {
                tracing::warn!(?mode, ?event, "selection event ignored");
                return None;
            }
        };
        Some(outcome)
    }

    /// Ends the flow. An accepted calibration is written to the document;
    /// the distance list is handed back for display and export.
    pub fn finish(mut self, document: &mut ImageDocument, accept: bool) -> MeasurementList {
        self.selection.exit(document.overlay_mut());
        if self.mode == MeasureMode::Scale && accept {
            match self.calibration.scale() {
                Some(scale) => {
                    tracing::info!(scale = %scale.describe(), "scale applied");
                    document.set_scale(scale);
                }
                None => tracing::warn!("scale calibration has no reference line"),
            }
        }
        self.distances
    }
}

/// Numbers every foreground component at its centroid and lists its scaled
/// area. The background component (label 0) is skipped.
pub fn measure_areas(document: &mut ImageDocument, components: &ComponentLabels) -> MeasurementList {
    let mut list = MeasurementList::new(MeasurementKind::Area);
    let scale = document.scale().clone();
    let unit = scale.area_unit_label();
    for stats in components.stats.iter().filter(|stats| stats.label != 0) {
        let index = list.push(scale.area(stats.area as f64), unit.clone());
        let (x, y) = stats.centroid;
        document
            .overlay_mut()
            .push(Annotation::label(pos2(x as f32, y as f32), index.to_string()));
    }
    document.mark_areas_measured();
    tracing::info!(components = list.len(), "areas measured");
    list
}

fn midpoint(a: Pos2, b: Pos2) -> Pos2 {
    pos2((a.x + b.x) / 2.0, (a.y + b.y) / 2.0)
}
