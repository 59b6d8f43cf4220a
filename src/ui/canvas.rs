use eframe::egui;

use crate::config::OverlayColors;
use crate::model::PixelBuffer;
use crate::overlay::{Annotation, DisplayMapper, OverlayLayer, PointerEvent, PointerKind};

/// Pointer state of the canvas response for one frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(super) struct PointerFlags {
    pub(super) started: bool,
    pub(super) dragged: bool,
    pub(super) stopped: bool,
    pub(super) double_clicked: bool,
}

impl PointerFlags {
    pub(super) fn from_response(response: &egui::Response) -> Self {
        Self {
            started: response.drag_started(),
            dragged: response.dragged(),
            stopped: response.drag_stopped(),
            double_clicked: response.double_clicked(),
        }
    }
}

/// Turns canvas responses into selection events in image coordinates.
/// The release reuses the last dragged position, since egui may report no
/// pointer position on the frame the button goes up.
#[derive(Debug, Clone, Default)]
pub(super) struct CanvasInput {
    last: Option<egui::Pos2>,
}

impl CanvasInput {
    pub(super) fn translate(
        &mut self,
        flags: PointerFlags,
        image_pos: Option<egui::Pos2>,
    ) -> Vec<PointerEvent> {
        let mut events = Vec::new();
        if let Some(pos) = image_pos {
            if flags.started {
                events.push(PointerEvent::new(PointerKind::Press, pos));
            } else if flags.dragged {
                events.push(PointerEvent::new(PointerKind::Drag, pos));
            }
            if flags.started || flags.dragged {
                self.last = Some(pos);
            }
        }
        if flags.stopped
            && let Some(pos) = image_pos.or(self.last.take())
        {
            events.push(PointerEvent::new(PointerKind::Release, pos));
        }
        if flags.double_clicked
            && let Some(pos) = image_pos
        {
            events.push(PointerEvent::new(PointerKind::DoubleClick, pos));
        }
        events
    }
}

/// Texture pixels for a buffer, or `None` when it holds nothing to show.
pub(super) fn to_color_image(buffer: &PixelBuffer) -> Option<egui::ColorImage> {
    if buffer.is_empty() {
        return None;
    }
    let size = [buffer.cols(), buffer.rows()];
    let samples = buffer.to_u8_samples();
    let image = match buffer.channels() {
        1 => egui::ColorImage::from_gray(size, &samples),
        _ => egui::ColorImage::from_rgb(size, &samples),
    };
    Some(image)
}

fn color(rgb: [u8; 3]) -> egui::Color32 {
    egui::Color32::from_rgb(rgb[0], rgb[1], rgb[2])
}

pub(super) fn draw_overlay(
    painter: &egui::Painter,
    mapper: &DisplayMapper,
    origin: egui::Pos2,
    overlay: &OverlayLayer,
    colors: &OverlayColors,
) {
    let to_screen = |pos: egui::Pos2| mapper.image_to_label(pos).map(|label| label + origin.to_vec2());
    let committed = egui::Stroke::new(1.5, color(colors.annotation));
    let live = egui::Stroke::new(1.5, color(colors.live));

    let items = overlay.items().iter().map(|item| (item, committed));
    for (annotation, stroke) in items.chain(overlay.live().map(|item| (item, live))) {
        match annotation {
            Annotation::Line { start, end } => {
                if let (Some(a), Some(b)) = (to_screen(*start), to_screen(*end)) {
                    painter.line_segment([a, b], stroke);
                }
            }
            Annotation::Rect { rect } => {
                if let (Some(min), Some(max)) = (to_screen(rect.min), to_screen(rect.max)) {
                    painter.rect_stroke(
                        egui::Rect::from_min_max(min, max),
                        0.0,
                        stroke,
                        egui::StrokeKind::Outside,
                    );
                }
            }
            Annotation::Label { at, text } => {
                if let Some(at) = to_screen(*at) {
                    painter.text(
                        at,
                        egui::Align2::CENTER_CENTER,
                        text,
                        egui::FontId::proportional(14.0),
                        color(colors.label),
                    );
                }
            }
        }
    }
}

/// 256 bars scaled to the tallest bin, with an optional vertical marker at
/// a bin position.
pub(super) fn draw_histogram(
    painter: &egui::Painter,
    rect: egui::Rect,
    bins: &[u64],
    marker: Option<f32>,
) {
    painter.rect_filled(rect, 0.0, egui::Color32::WHITE);
    if bins.is_empty() {
        return;
    }
    let max = bins.iter().copied().max().unwrap_or(1).max(1) as f32;
    let bar_width = rect.width() / bins.len() as f32;

    for (index, count) in bins.iter().enumerate() {
        let height = (*count as f32 / max).clamp(0.0, 1.0) * (rect.height() - 2.0);
        let x0 = rect.left() + index as f32 * bar_width;
        painter.rect_filled(
            egui::Rect::from_min_max(
                egui::pos2(x0, rect.bottom() - height),
                egui::pos2(x0 + bar_width.max(1.0), rect.bottom()),
            ),
            0.0,
            egui::Color32::from_gray(90),
        );
    }

    if let Some(marker) = marker {
        let x = rect.left() + marker * bar_width;
        painter.line_segment(
            [egui::pos2(x, rect.top()), egui::pos2(x, rect.bottom())],
            egui::Stroke::new(1.0, egui::Color32::RED),
        );
    }
}
