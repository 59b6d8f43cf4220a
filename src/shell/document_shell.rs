use std::mem;
use std::path::{Path, PathBuf};

use crate::commands::{channel_histogram, connected_components};
use crate::formats::{load_document, save_jpeg};
use crate::measure::{
    MeasureMode, MeasureOutcome, MeasurementController, MeasurementList, measure_areas,
};
use crate::model::{CoreError, ImageDocument, ImageSummary, MeasurementScale, PixelRect};
use crate::overlay::PointerEvent;
use crate::session::{DocumentEvent, DocumentObserver, EditOutcome, EditSession, EventBus};
use crate::windows::{ActiveWindow, OperationKind};

use super::{Adjustment, ChannelSplit, Result, ShellError, ShellMode};

#[derive(Debug)]
struct ActiveEdit {
    index: usize,
    session: EditSession,
    window: ActiveWindow,
}

/// Owns every open document and coordinates the single active flow.
///
/// While an operation runs, its document lives inside the [`EditSession`]
/// and the tab slot holds a placeholder; [`DocumentShell::document_at`]
/// resolves the slot to the session's document.
#[derive(Debug)]
pub struct DocumentShell {
    documents: Vec<ImageDocument>,
    active: usize,
    edit: Option<ActiveEdit>,
    measurement: Option<MeasurementController>,
    events: EventBus,
    default_scale: MeasurementScale,
    last_measurements: Option<MeasurementList>,
}

impl Default for DocumentShell {
    fn default() -> Self {
        Self::new(MeasurementScale::default())
    }
}

impl DocumentShell {
    pub fn new(default_scale: MeasurementScale) -> Self {
        Self {
            documents: vec![ImageDocument::placeholder()],
            active: 0,
            edit: None,
            measurement: None,
            events: EventBus::default(),
            default_scale,
            last_measurements: None,
        }
    }

    pub fn subscribe(&mut self, observer: impl DocumentObserver + 'static) {
        self.events.subscribe(observer);
    }

    pub fn mode(&self) -> ShellMode {
        if let Some(edit) = &self.edit {
            ShellMode::Operation(edit.window.kind())
        } else if let Some(controller) = &self.measurement {
            ShellMode::Measurement(controller.mode())
        } else {
            ShellMode::Idle
        }
    }

    fn ensure_idle(&self) -> Result<()> {
        match self.mode() {
            ShellMode::Idle => Ok(()),
            mode => Err(ShellError::Busy(mode)),
        }
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn active_index(&self) -> usize {
        self.active
    }

    pub fn titles(&self) -> Vec<&str> {
        (0..self.documents.len())
            .filter_map(|index| self.document_at(index))
            .map(ImageDocument::title)
            .collect()
    }

    pub fn document_at(&self, index: usize) -> Option<&ImageDocument> {
        match &self.edit {
            Some(edit) if edit.index == index => Some(edit.session.document()),
            _ => self.documents.get(index),
        }
    }

    pub fn active_document(&self) -> Option<&ImageDocument> {
        self.document_at(self.active)
    }

    pub fn has_image(&self) -> bool {
        self.active_document().is_some_and(|document| !document.is_empty())
    }

    fn active_mut(&mut self) -> Result<&mut ImageDocument> {
        let index = self.active;
        self.documents
            .get_mut(index)
            .ok_or(ShellError::NoSuchDocument(index))
    }

    fn active_image_mut(&mut self) -> Result<&mut ImageDocument> {
        let document = self.active_mut()?;
        if document.is_empty() {
            return Err(ShellError::NoImage);
        }
        Ok(document)
    }

    fn publish(&mut self, event: DocumentEvent) -> DocumentEvent {
        self.events.publish(&event);
        event
    }

    // Documents

    pub fn open(&mut self, path: impl AsRef<Path>) -> Result<usize> {
        let document = load_document(path).with_scale(self.default_scale.clone());
        self.add_document(document)
    }

    /// Adds a tab and activates it. A lone placeholder tab is replaced.
    pub fn add_document(&mut self, document: ImageDocument) -> Result<usize> {
        self.ensure_idle()?;
        let replace_placeholder = self.documents.len() == 1
            && self.documents[0].is_empty()
            && self.documents[0].source().is_none();
        let index = if replace_placeholder {
            self.documents[0] = document;
            0
        } else {
            self.documents.push(document);
            self.documents.len() - 1
        };
        self.publish(DocumentEvent::Opened { index });
        self.activate(index);
        Ok(index)
    }

    fn activate(&mut self, index: usize) {
        if index != self.active
            && let Some(previous) = self.documents.get_mut(self.active)
        {
            previous.overlay_mut().clear();
        }
        self.active = index;
        self.publish(DocumentEvent::Activated { index });
    }

    /// Switches tabs and returns the metadata of the newly active document.
    pub fn switch_to(&mut self, index: usize) -> Result<ImageSummary> {
        self.ensure_idle()?;
        if index >= self.documents.len() {
            return Err(ShellError::NoSuchDocument(index));
        }
        self.activate(index);
        Ok(self.documents[index].summary())
    }

    pub fn close_active(&mut self) -> Result<()> {
        self.ensure_idle()?;
        if self.documents.len() <= 1 {
            return Err(ShellError::LastDocument);
        }
        let index = self.active;
        let closed = self.documents.remove(index);
        tracing::info!(document = closed.title(), "document closed");
        self.publish(DocumentEvent::Closed { index });
        self.active = index.min(self.documents.len() - 1);
        let active = self.active;
        self.publish(DocumentEvent::Activated { index: active });
        Ok(())
    }

    pub fn save_active(&mut self, path: impl AsRef<Path>) -> Result<PathBuf> {
        self.ensure_idle()?;
        let document = self.active_image_mut()?;
        Ok(save_jpeg(path, document.current())?)
    }

    pub fn revert(&mut self) -> Result<DocumentEvent> {
        self.ensure_idle()?;
        self.active_image_mut()?.revert();
        tracing::info!("document reverted");
        Ok(self.publish(DocumentEvent::Updated {
            operation: "revert",
            outcome: EditOutcome::Committed,
        }))
    }

    /// Restores the single backup. Returns `false` when there is none.
    pub fn undo(&mut self) -> Result<bool> {
        self.ensure_idle()?;
        let document = self.active_image_mut()?;
        if !document.undo() {
            return Ok(false);
        }
        document.overlay_mut().clear();
        self.publish(DocumentEvent::Updated {
            operation: "undo",
            outcome: EditOutcome::Committed,
        });
        Ok(true)
    }

    // One-shot edits

    pub fn apply_adjustment(&mut self, adjustment: Adjustment) -> Result<DocumentEvent> {
        self.ensure_idle()?;
        let document = self.active_image_mut()?;
        let output = adjustment.apply(document.current())?;
        document.backup();
        document.set_current(output);
        document.overlay_mut().clear();
        tracing::info!(operation = adjustment.name(), "adjustment applied");
        Ok(self.publish(DocumentEvent::Updated {
            operation: adjustment.name(),
            outcome: EditOutcome::Committed,
        }))
    }

    /// Opens each channel of the active image as a new gray tab.
    pub fn split_channels(&mut self, split: ChannelSplit) -> Result<Vec<usize>> {
        self.ensure_idle()?;
        let document = self.active_image_mut()?;
        let planes = split.apply(document.current())?;
        let title = document.title().to_string();
        let scale = document.scale().clone();
        let mut indices = Vec::with_capacity(planes.len());
        for (buffer, suffix) in planes.into_iter().zip(split.suffixes()) {
            let child = ImageDocument::new(format!("{title} ({suffix})"), buffer)
                .with_scale(scale.clone());
            indices.push(self.add_document(child)?);
        }
        Ok(indices)
    }

    pub fn histogram(&self) -> Result<Vec<u64>> {
        let document = self.active_document().ok_or(ShellError::NoImage)?;
        if document.is_empty() {
            return Err(ShellError::NoImage);
        }
        Ok(channel_histogram(document.current(), 0))
    }

    /// Derives a new document from `rect` of the active image.
    pub fn crop_active(&mut self, rect: PixelRect) -> Result<usize> {
        self.ensure_idle()?;
        let child = self.cropped_active(rect)?;
        self.add_document(child)
    }

    /// Crops the active image to `rect`, clipped to the image bounds.
    fn cropped_active(&mut self, rect: PixelRect) -> Result<ImageDocument> {
        let document = self.active_image_mut()?;
        let current = document.current();
        let rect = rect
            .clamped(current.cols(), current.rows())
            .ok_or(CoreError::EmptySelection)?;
        let buffer = current.crop(rect)?;
        let child = ImageDocument::new(format!("{} (crop)", document.title()), buffer)
            .with_scale(document.scale().clone());
        tracing::info!(?rect, "image cropped");
        Ok(child)
    }

    pub fn clear_overlay(&mut self) -> Result<()> {
        self.ensure_idle()?;
        self.active_mut()?.overlay_mut().clear();
        self.publish(DocumentEvent::OverlayChanged);
        Ok(())
    }

    // Operation windows

    /// Takes the active document into a new edit session and shows the
    /// default preview.
    pub fn begin_operation(&mut self, kind: OperationKind) -> Result<Option<DocumentEvent>> {
        self.ensure_idle()?;
        let index = self.active;
        self.active_image_mut()?;
        let document = mem::replace(&mut self.documents[index], ImageDocument::placeholder());
        let window = ActiveWindow::open(kind, document.current());
        let mut session = EditSession::begin(kind.name(), document);
        let event = match window.preview(&mut session) {
            Ok(event) => Some(self.publish(event)),
            Err(error) => {
                tracing::warn!(operation = kind.name(), %error, "initial preview failed");
                None
            }
        };
        self.edit = Some(ActiveEdit {
            index,
            session,
            window,
        });
        Ok(event)
    }

    pub fn window(&self) -> Option<&ActiveWindow> {
        self.edit.as_ref().map(|edit| &edit.window)
    }

    /// Applies a control change to the active window and recomputes. A
    /// failed recompute leaves the previous preview on screen.
    pub fn edit_operation(
        &mut self,
        change: impl FnOnce(&mut ActiveWindow),
    ) -> Result<DocumentEvent> {
        let edit = self.edit.as_mut().ok_or(ShellError::NotActive)?;
        change(&mut edit.window);
        let event = edit.window.preview(&mut edit.session)?;
        Ok(self.publish(event))
    }

    /// OK (`commit`) or Cancel for the active operation window.
    pub fn finish_operation(&mut self, commit: bool) -> Result<DocumentEvent> {
        let ActiveEdit { index, session, .. } = self.edit.take().ok_or(ShellError::NotActive)?;
        let (mut document, event) = session.end(commit);
        if commit {
            document.overlay_mut().clear();
        }
        self.documents[index] = document;
        Ok(self.publish(event))
    }

    // Measurements

    pub fn begin_measurement(&mut self, mode: MeasureMode) -> Result<()> {
        self.ensure_idle()?;
        let controller = MeasurementController::start(mode, self.active_image_mut()?);
        self.measurement = Some(controller);
        Ok(())
    }

    pub fn measurement(&self) -> Option<&MeasurementController> {
        self.measurement.as_ref()
    }

    pub fn measurement_mut(&mut self) -> Option<&mut MeasurementController> {
        self.measurement.as_mut()
    }

    /// Routes a pointer event (image coordinates) to the measurement flow.
    /// An accepted crop ends the flow and opens the cropped tab; a double
    /// click ends distance measurement.
    pub fn handle_pointer(&mut self, event: PointerEvent) -> Result<Option<MeasureOutcome>> {
        let controller = self.measurement.as_mut().ok_or(ShellError::NotActive)?;
        let document = self
            .documents
            .get_mut(self.active)
            .ok_or(ShellError::NoSuchDocument(self.active))?;
        let mode = controller.mode();
        let outcome = controller.handle_pointer(document, event);
        match &outcome {
            Some(MeasureOutcome::CropAccepted(rect)) => {
                let child = self.cropped_active(*rect)?;
                self.finish_measurement(true)?;
                self.add_document(child)?;
            }
            Some(MeasureOutcome::Exited) if mode != MeasureMode::Scale => {
                self.finish_measurement(true)?;
            }
            Some(_) => {
                self.publish(DocumentEvent::OverlayChanged);
            }
            None => {}
        }
        Ok(outcome)
    }

    /// Ends the measurement flow. A calibration is applied only when
    /// `accept` is set; distance rows are kept as the last measurement list.
    pub fn finish_measurement(&mut self, accept: bool) -> Result<MeasurementList> {
        let controller = self.measurement.take().ok_or(ShellError::NotActive)?;
        let document = self.active_mut()?;
        let list = controller.finish(document, accept);
        if !list.is_empty() {
            self.last_measurements = Some(list.clone());
        }
        self.publish(DocumentEvent::OverlayChanged);
        Ok(list)
    }

    /// Labels every particle of the active (binary) image and lists areas.
    pub fn measure_particles(&mut self) -> Result<MeasurementList> {
        self.ensure_idle()?;
        let document = self.active_image_mut()?;
        if document.areas_measured() {
            return Err(ShellError::AlreadyMeasured);
        }
        let components = connected_components(document.current());
        let list = measure_areas(document, &components);
        self.last_measurements = Some(list.clone());
        self.publish(DocumentEvent::OverlayChanged);
        Ok(list)
    }

    pub fn last_measurements(&self) -> Option<&MeasurementList> {
        self.last_measurements.as_ref()
    }
}
