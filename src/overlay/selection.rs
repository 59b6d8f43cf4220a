use eframe::egui::{Pos2, pos2};

use crate::model::PixelRect;

use super::{Annotation, OverlayLayer};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectionMode {
    #[default]
    None,
    /// Single reference line, used by scale calibration.
    Line,
    /// Crop rectangle, accepted with a double click.
    Rectangle,
    /// Repeated distance measurements.
    Distance,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerKind {
    Press,
    Drag,
    Release,
    DoubleClick,
}

/// Pointer input already mapped (and clamped) into image coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub kind: PointerKind,
    pub pos: Pos2,
}

impl PointerEvent {
    pub fn new(kind: PointerKind, pos: Pos2) -> Self {
        Self { kind, pos }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SelectionEvent {
    LineSelected { start: Pos2, end: Pos2 },
    RectangleSelected(PixelRect),
    CropAccepted(PixelRect),
    Exited,
}

/// Press/drag/release tracker for the active selection mode.
///
/// While dragging, the primitive is shown as the overlay's live item. Line
/// and rectangle selections stay live after release until they are replaced
/// or accepted; distance segments are handed back for the caller to commit.
#[derive(Debug, Clone, Default)]
pub struct Selection {
    mode: SelectionMode,
    anchor: Option<Pos2>,
    pending: Option<PixelRect>,
}

impl Selection {
    pub fn mode(&self) -> SelectionMode {
        self.mode
    }

    pub fn is_active(&self) -> bool {
        self.mode != SelectionMode::None
    }

    pub fn is_dragging(&self) -> bool {
        self.anchor.is_some()
    }

    pub fn pending_rect(&self) -> Option<PixelRect> {
        self.pending
    }

    pub fn enter(&mut self, mode: SelectionMode) {
        self.mode = mode;
        self.anchor = None;
        self.pending = None;
    }

    pub fn exit(&mut self, overlay: &mut OverlayLayer) {
        overlay.take_live();
        self.enter(SelectionMode::None);
    }

    pub fn handle(
        &mut self,
        event: PointerEvent,
        overlay: &mut OverlayLayer,
    ) -> Option<SelectionEvent> {
        if self.mode == SelectionMode::None {
            return None;
        }
        match event.kind {
            PointerKind::Press => {
                self.anchor = Some(event.pos);
                overlay.set_live(self.primitive(event.pos, event.pos));
                None
            }
            PointerKind::Drag => {
                let anchor = self.anchor?;
                overlay.set_live(self.primitive(anchor, event.pos));
                None
            }
            PointerKind::Release => {
                let anchor = self.anchor.take()?;
                self.release(anchor, event.pos, overlay)
            }
            PointerKind::DoubleClick => self.double_click(overlay),
        }
    }

    fn primitive(&self, a: Pos2, b: Pos2) -> Annotation {
        match self.mode {
            SelectionMode::Rectangle => Annotation::rect(a, b),
            _ => Annotation::line(a, b),
        }
    }

    fn release(
        &mut self,
        start: Pos2,
        end: Pos2,
        overlay: &mut OverlayLayer,
    ) -> Option<SelectionEvent> {
        match self.mode {
            SelectionMode::Rectangle => {
                let Some(rect) = PixelRect::from_corners((start.x, start.y), (end.x, end.y))
                else {
                    self.restore_pending(overlay);
                    return None;
                };
                overlay.set_live(Annotation::rect(start, end));
                self.pending = Some(rect);
                Some(SelectionEvent::RectangleSelected(rect))
            }
            SelectionMode::Line | SelectionMode::Distance => {
                if start.distance(end) <= f32::EPSILON {
                    overlay.take_live();
                    return None;
                }
                if self.mode == SelectionMode::Distance {
                    overlay.take_live();
                } else {
                    overlay.set_live(Annotation::line(start, end));
                }
                Some(SelectionEvent::LineSelected { start, end })
            }
            SelectionMode::None => None,
        }
    }

    /// A click without a drag keeps the previously selected rectangle.
    fn restore_pending(&self, overlay: &mut OverlayLayer) {
        match self.pending {
            Some(rect) => overlay.set_live(Annotation::rect(
                pos2(rect.x as f32, rect.y as f32),
                pos2(rect.right() as f32, rect.bottom() as f32),
            )),
            None => {
                overlay.take_live();
            }
        }
    }

    fn double_click(&mut self, overlay: &mut OverlayLayer) -> Option<SelectionEvent> {
        match self.mode {
            SelectionMode::Rectangle => {
                let rect = self.pending.take()?;
                self.exit(overlay);
                Some(SelectionEvent::CropAccepted(rect))
            }
            _ => {
                self.exit(overlay);
                Some(SelectionEvent::Exited)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use eframe::egui::pos2;

    use crate::model::PixelRect;

    use super::{
        OverlayLayer, PointerEvent, PointerKind, Selection, SelectionEvent, SelectionMode,
    };

    fn drag(
        selection: &mut Selection,
        overlay: &mut OverlayLayer,
        from: (f32, f32),
        to: (f32, f32),
    ) -> Option<SelectionEvent> {
        let from = pos2(from.0, from.1);
        let to = pos2(to.0, to.1);
        selection.handle(PointerEvent::new(PointerKind::Press, from), overlay);
        selection.handle(PointerEvent::new(PointerKind::Drag, to), overlay);
        assert!(overlay.live().is_some());
        selection.handle(PointerEvent::new(PointerKind::Release, to), overlay)
    }

    #[test]
    fn inactive_selection_ignores_pointer() {
        let mut selection = Selection::default();
        let mut overlay = OverlayLayer::default();
        let event = PointerEvent::new(PointerKind::Press, pos2(1.0, 1.0));
        assert_eq!(selection.handle(event, &mut overlay), None);
        assert!(overlay.is_empty());
    }

    #[test]
    fn rectangle_is_accepted_on_double_click() {
        let mut selection = Selection::default();
        let mut overlay = OverlayLayer::default();
        selection.enter(SelectionMode::Rectangle);

        let released = drag(&mut selection, &mut overlay, (60.0, 60.0), (10.0, 10.0));
        let rect = PixelRect::new(10, 10, 50, 50);
        assert_eq!(released, Some(SelectionEvent::RectangleSelected(rect)));
        assert!(overlay.live().is_some());

        let accepted = selection.handle(
            PointerEvent::new(PointerKind::DoubleClick, pos2(20.0, 20.0)),
            &mut overlay,
        );
        assert_eq!(accepted, Some(SelectionEvent::CropAccepted(rect)));
        assert_eq!(selection.mode(), SelectionMode::None);
        assert!(overlay.is_empty());
    }

    #[test]
    fn zero_area_rectangle_is_ignored() {
        let mut selection = Selection::default();
        let mut overlay = OverlayLayer::default();
        selection.enter(SelectionMode::Rectangle);
        let released = drag(&mut selection, &mut overlay, (5.0, 5.0), (5.0, 40.0));
        assert_eq!(released, None);
        assert!(overlay.live().is_none());
        assert_eq!(selection.pending_rect(), None);
    }

    #[test]
    fn distance_segments_are_handed_back_and_cleared() {
        let mut selection = Selection::default();
        let mut overlay = OverlayLayer::default();
        selection.enter(SelectionMode::Distance);
        let released = drag(&mut selection, &mut overlay, (0.0, 0.0), (3.0, 4.0));
        assert_eq!(
            released,
            Some(SelectionEvent::LineSelected {
                start: pos2(0.0, 0.0),
                end: pos2(3.0, 4.0)
            })
        );
        assert!(overlay.live().is_none());
        assert_eq!(drag(&mut selection, &mut overlay, (2.0, 2.0), (2.0, 2.0)), None);
    }

    #[test]
    fn double_click_leaves_line_mode() {
        let mut selection = Selection::default();
        let mut overlay = OverlayLayer::default();
        selection.enter(SelectionMode::Line);
        drag(&mut selection, &mut overlay, (0.0, 0.0), (10.0, 0.0));
        assert!(overlay.live().is_some());
        let exited = selection.handle(
            PointerEvent::new(PointerKind::DoubleClick, pos2(0.0, 0.0)),
            &mut overlay,
        );
        assert_eq!(exited, Some(SelectionEvent::Exited));
        assert!(!selection.is_active());
    }
}
