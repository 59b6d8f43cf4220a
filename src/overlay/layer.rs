use eframe::egui::{Pos2, Rect};

/// One overlay primitive, in image pixel coordinates.
#[derive(Debug, Clone, PartialEq)]
pub enum Annotation {
    Line { start: Pos2, end: Pos2 },
    Rect { rect: Rect },
    Label { at: Pos2, text: String },
}

impl Annotation {
    pub fn line(start: Pos2, end: Pos2) -> Self {
        Self::Line { start, end }
    }

    pub fn rect(a: Pos2, b: Pos2) -> Self {
        Self::Rect {
            rect: Rect::from_two_pos(a, b),
        }
    }

    pub fn label(at: Pos2, text: impl Into<String>) -> Self {
        Self::Label {
            at,
            text: text.into(),
        }
    }
}

/// Annotations drawn over a document without touching its pixels.
///
/// `live` is the primitive following an in-progress drag; it is drawn but
/// not part of `items` until committed.
#[derive(Debug, Clone, Default)]
pub struct OverlayLayer {
    items: Vec<Annotation>,
    live: Option<Annotation>,
}

impl OverlayLayer {
    pub fn push(&mut self, annotation: Annotation) {
        self.items.push(annotation);
    }

    pub fn set_live(&mut self, annotation: Annotation) {
        self.live = Some(annotation);
    }

    pub fn take_live(&mut self) -> Option<Annotation> {
        self.live.take()
    }

    /// Moves the live primitive into the committed list.
    pub fn commit_live(&mut self) -> bool {
        match self.live.take() {
            Some(annotation) => {
                self.items.push(annotation);
                true
            }
            None => false,
        }
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.live = None;
    }

    pub fn items(&self) -> &[Annotation] {
        &self.items
    }

    pub fn live(&self) -> Option<&Annotation> {
        self.live.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty() && self.live.is_none()
    }

    /// Committed primitives followed by the live one.
    pub fn visible(&self) -> impl Iterator<Item = &Annotation> {
        self.items.iter().chain(self.live.iter())
    }
}

#[cfg(test)]
mod tests {
    use eframe::egui::pos2;

    use super::{Annotation, OverlayLayer};

    #[test]
    fn live_primitive_is_visible_but_not_committed() {
        let mut layer = OverlayLayer::default();
        layer.push(Annotation::label(pos2(1.0, 1.0), "1"));
        layer.set_live(Annotation::line(pos2(0.0, 0.0), pos2(4.0, 3.0)));
        assert_eq!(layer.items().len(), 1);
        assert_eq!(layer.visible().count(), 2);

        assert!(layer.commit_live());
        assert!(!layer.commit_live());
        assert_eq!(layer.items().len(), 2);

        layer.clear();
        assert!(layer.is_empty());
    }

    #[test]
    fn rect_annotation_is_normalized() {
        let Annotation::Rect { rect } = Annotation::rect(pos2(8.0, 6.0), pos2(2.0, 1.0)) else {
            panic!("expected a rectangle");
        };
        assert_eq!(rect.min, pos2(2.0, 1.0));
        assert_eq!(rect.max, pos2(8.0, 6.0));
    }
}
