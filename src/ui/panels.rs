use std::fmt::Debug;

use eframe::egui;

use crate::commands::{
    AdaptiveMethod, BlurMethod, CANNY_APERTURES, GradientMethod, MorphologyOp, StructuringShape,
};
use crate::measure::{MeasurementList, ScaleCalibration};
use crate::model::ImageSummary;
use crate::windows::{
    ActiveWindow, BlurWindow, CANNY_SLIDER_MAX, CannyThresholdMode, CannyWindow, GradientWindow,
    MAX_BLOCK_SIZE, MAX_BLUR_SIZE, MAX_ELEMENT_SIZE, MAX_ITERATIONS, MAX_LAPLACIAN_SIZE,
    MAX_SOBEL_SIZE, MorphologyWindow, ThresholdStyle, ThresholdWindow,
};

use super::canvas::draw_histogram;

const HISTOGRAM_SIZE: egui::Vec2 = egui::vec2(256.0, 120.0);

fn combo<T: Copy + PartialEq + Debug>(
    ui: &mut egui::Ui,
    label: &str,
    current: T,
    options: &[T],
) -> Option<T> {
    let mut selected = current;
    egui::ComboBox::from_label(label)
        .selected_text(format!("{current:?}"))
        .show_ui(ui, |ui| {
            for option in options {
                ui.selectable_value(&mut selected, *option, format!("{option:?}"));
            }
        });
    (selected != current).then_some(selected)
}

fn histogram(ui: &mut egui::Ui, bins: &[u64], marker: Option<f32>) {
    let (rect, _) = ui.allocate_exact_size(HISTOGRAM_SIZE, egui::Sense::hover());
    draw_histogram(ui.painter(), rect, bins, marker);
}

/// Draws the controls of the active window into `ui`. Returns `true` when a
/// control changed and the preview must be recomputed.
pub(super) fn window_controls(ui: &mut egui::Ui, window: &mut ActiveWindow) -> bool {
    match window {
        ActiveWindow::Blur(window) => blur_controls(ui, window),
        ActiveWindow::Canny(window) => canny_controls(ui, window),
        ActiveWindow::Gradient(window) => gradient_controls(ui, window),
        ActiveWindow::Morphology(window) => morphology_controls(ui, window),
        ActiveWindow::Threshold(window) => threshold_controls(ui, window),
    }
}

fn blur_controls(ui: &mut egui::Ui, window: &mut BlurWindow) -> bool {
    let mut changed = false;
    let methods = [BlurMethod::Average, BlurMethod::Gaussian, BlurMethod::Median];
    if let Some(method) = combo(ui, "Method", window.method(), &methods) {
        window.set_method(method);
        changed = true;
    }
    let mut size = window.size();
    if ui
        .add(egui::Slider::new(&mut size, 1..=MAX_BLUR_SIZE).text("Size"))
        .changed()
    {
        window.set_size(size);
        changed = true;
    }
    changed
}

fn canny_controls(ui: &mut egui::Ui, window: &mut CannyWindow) -> bool {
    let mut changed = false;
    let mut mode = window.mode();
    ui.horizontal(|ui| {
        ui.radio_value(&mut mode, CannyThresholdMode::Manual, "Manual");
        ui.radio_value(&mut mode, CannyThresholdMode::Mean, "Mean");
        ui.radio_value(&mut mode, CannyThresholdMode::Median, "Median");
    });
    if mode != window.mode() {
        window.set_mode(mode);
        changed = true;
    }

    let manual = window.mode() == CannyThresholdMode::Manual;
    let mut low = window.low();
    if ui
        .add_enabled(
            manual,
            egui::Slider::new(&mut low, 0..=CANNY_SLIDER_MAX).text("Min"),
        )
        .changed()
    {
        window.set_low(low);
        changed = true;
    }
    let mut high = window.high();
    if ui
        .add_enabled(
            manual,
            egui::Slider::new(&mut high, 0..=CANNY_SLIDER_MAX).text("Max"),
        )
        .changed()
    {
        window.set_high(high);
        changed = true;
    }
    let (low, high) = window.bounds();
    ui.label(format!("Bounds: {low:.1} / {high:.1}"));

    if let Some(aperture) = combo(ui, "Aperture", window.aperture(), &CANNY_APERTURES) {
        window.set_aperture(aperture);
        changed = true;
    }
    let mut l2 = window.l2_gradient();
    if ui.checkbox(&mut l2, "L2 gradient").changed() {
        window.set_l2_gradient(l2);
        changed = true;
    }
    changed
}

fn gradient_controls(ui: &mut egui::Ui, window: &mut GradientWindow) -> bool {
    let mut changed = false;
    let methods = [
        GradientMethod::Sobel,
        GradientMethod::Scharr,
        GradientMethod::Laplacian,
    ];
    if let Some(method) = combo(ui, "Operator", window.method(), &methods) {
        window.set_method(method);
        changed = true;
    }

    let orders = window.orders_enabled();
    let max_order = window.max_order();
    let mut dx = window.dx();
    if ui
        .add_enabled(orders, egui::Slider::new(&mut dx, 0..=max_order).text("dx"))
        .changed()
    {
        window.set_dx(dx);
        changed = true;
    }
    let mut dy = window.dy();
    if ui
        .add_enabled(orders, egui::Slider::new(&mut dy, 0..=max_order).text("dy"))
        .changed()
    {
        window.set_dy(dy);
        changed = true;
    }

    let range = match window.method() {
        GradientMethod::Laplacian => 1..=MAX_LAPLACIAN_SIZE,
        _ => 3..=MAX_SOBEL_SIZE,
    };
    let mut size = window.size();
    if ui
        .add_enabled(
            window.size_enabled(),
            egui::Slider::new(&mut size, range).step_by(2.0).text("Size"),
        )
        .changed()
    {
        window.set_size(size);
        changed = true;
    }

    let mut absolute = window.absolute();
    if ui
        .add_enabled(
            window.absolute_enabled(),
            egui::Checkbox::new(&mut absolute, "Absolute value"),
        )
        .changed()
    {
        window.set_absolute(absolute);
        changed = true;
    }
    let mut magnitude = window.magnitude();
    if ui
        .add_enabled(
            window.magnitude_enabled(),
            egui::Checkbox::new(&mut magnitude, "Magnitude"),
        )
        .changed()
    {
        window.set_magnitude(magnitude);
        changed = true;
    }
    changed
}

fn morphology_controls(ui: &mut egui::Ui, window: &mut MorphologyWindow) -> bool {
    let mut changed = false;
    let ops = [
        MorphologyOp::Erode,
        MorphologyOp::Dilate,
        MorphologyOp::Open,
        MorphologyOp::Close,
    ];
    if let Some(op) = combo(ui, "Operation", window.op(), &ops) {
        window.set_op(op);
        changed = true;
    }
    let shapes = [
        StructuringShape::Square,
        StructuringShape::Cross,
        StructuringShape::Disk,
        StructuringShape::X,
        StructuringShape::Custom,
    ];
    if let Some(shape) = combo(ui, "Element", window.shape(), &shapes) {
        window.set_shape(shape);
        changed = true;
    }
    let mut size = window.size();
    if ui
        .add(
            egui::Slider::new(&mut size, 1..=MAX_ELEMENT_SIZE)
                .step_by(2.0)
                .text("Size"),
        )
        .changed()
    {
        window.set_size(size);
        changed = true;
    }
    let mut iterations = window.iterations();
    if ui
        .add_enabled(
            window.iterations_enabled(),
            egui::Slider::new(&mut iterations, 1..=MAX_ITERATIONS).text("Iterations"),
        )
        .changed()
    {
        window.set_iterations(iterations);
        changed = true;
    }
    element_preview(ui, window);
    changed
}

fn element_preview(ui: &mut egui::Ui, window: &MorphologyWindow) {
    let element = window.element();
    let (rows, cols) = element.dim();
    let cell = (96.0 / rows.max(cols) as f32).clamp(2.0, 16.0);
    let (rect, _) = ui.allocate_exact_size(
        egui::vec2(cols as f32 * cell, rows as f32 * cell),
        egui::Sense::hover(),
    );
    let painter = ui.painter();
    for ((row, col), inside) in element.indexed_iter() {
        let min = rect.min + egui::vec2(col as f32 * cell, row as f32 * cell);
        let fill = if *inside {
            egui::Color32::from_gray(230)
        } else {
            egui::Color32::from_gray(40)
        };
        painter.rect_filled(
            egui::Rect::from_min_size(min, egui::vec2(cell, cell)),
            0.0,
            fill,
        );
    }
}

fn threshold_controls(ui: &mut egui::Ui, window: &mut ThresholdWindow) -> bool {
    let mut changed = false;
    histogram(ui, window.histogram(), window.marker());

    let mut adaptive = window.adaptive();
    if ui.checkbox(&mut adaptive, "Adaptive").changed() {
        window.set_adaptive(adaptive);
        changed = true;
    }
    let mut otsu = window.otsu();
    if ui
        .add_enabled(!window.adaptive(), egui::Checkbox::new(&mut otsu, "Otsu"))
        .changed()
    {
        window.set_otsu(otsu);
        changed = true;
    }

    let label = if window.adaptive() { "Offset" } else { "Value" };
    let mut value = window.value();
    if ui
        .add_enabled(
            !window.otsu(),
            egui::Slider::new(&mut value, window.value_range()).text(label),
        )
        .changed()
    {
        window.set_value(value);
        changed = true;
    }

    if window.adaptive() {
        let methods = [AdaptiveMethod::Mean, AdaptiveMethod::Gaussian];
        if let Some(method) = combo(ui, "Method", window.method(), &methods) {
            window.set_method(method);
            changed = true;
        }
        let mut block = window.block_size();
        if ui
            .add(
                egui::Slider::new(&mut block, 3..=MAX_BLOCK_SIZE)
                    .step_by(2.0)
                    .text("Block size"),
            )
            .changed()
        {
            window.set_block_size(block);
            changed = true;
        }
    } else {
        let styles = [
            ThresholdStyle::Binary,
            ThresholdStyle::Truncate,
            ThresholdStyle::ToZero,
        ];
        if let Some(style) = combo(ui, "Type", window.style(), &styles) {
            window.set_style(style);
            changed = true;
        }
    }

    let mut inverted = window.inverted();
    if ui
        .add_enabled(
            window.inverted_enabled(),
            egui::Checkbox::new(&mut inverted, "Inverted"),
        )
        .changed()
    {
        window.set_inverted(inverted);
        changed = true;
    }
    changed
}

pub(super) fn info_panel(ui: &mut egui::Ui, summary: Option<&ImageSummary>, hover: Option<&str>) {
    ui.heading("Image");
    let Some(summary) = summary else {
        ui.label("No image");
        return;
    };
    egui::Grid::new("image-info").num_columns(2).show(ui, |ui| {
        ui.label("Title");
        ui.label(&summary.title);
        ui.end_row();
        ui.label("Size");
        ui.label(format!("{} x {}", summary.width, summary.height));
        ui.end_row();
        ui.label("Channels");
        ui.label(summary.channels.to_string());
        ui.end_row();
        ui.label("Depth");
        ui.label(&summary.depth);
        ui.end_row();
        ui.label("Min / max");
        ui.label(format!("{} / {}", summary.min, summary.max));
        ui.end_row();
    });
    ui.separator();
    ui.label(hover.unwrap_or("-"));
}

/// Changes made in the calibration window this frame.
#[derive(Debug, Clone, PartialEq)]
pub(super) enum CalibrationEdit {
    KnownLength(f64),
    Unit(String),
    Reselect,
}

pub(super) fn scale_controls(
    ui: &mut egui::Ui,
    calibration: &ScaleCalibration,
    selecting: bool,
) -> Option<CalibrationEdit> {
    let mut edit = None;
    ui.label(format!("Distance in pixels: {}", calibration.pixels()));
    let mut known = calibration.known_length();
    ui.horizontal(|ui| {
        ui.label("Known distance");
        if ui
            .add(egui::DragValue::new(&mut known).speed(0.1).range(0.0001..=1.0e6))
            .changed()
        {
            edit = Some(CalibrationEdit::KnownLength(known));
        }
    });
    let mut unit = calibration.unit().to_string();
    ui.horizontal(|ui| {
        ui.label("Unit");
        if ui.text_edit_singleline(&mut unit).changed() {
            edit = Some(CalibrationEdit::Unit(unit.clone()));
        }
    });
    match calibration.scale() {
        Some(scale) => ui.label(format!("Scale: {}", scale.describe())),
        None => ui.label("Draw a reference line on the image"),
    };
    if ui
        .add_enabled(!selecting, egui::Button::new("Select again"))
        .clicked()
    {
        edit = Some(CalibrationEdit::Reselect);
    }
    edit
}

pub(super) fn measurement_table(ui: &mut egui::Ui, list: &MeasurementList) {
    egui::ScrollArea::vertical().max_height(240.0).show(ui, |ui| {
        egui::Grid::new("measurements").striped(true).show(ui, |ui| {
            for column in list.header().split('\t') {
                ui.strong(column);
            }
            ui.end_row();
            for row in list.rows() {
                for cell in row.to_line().split('\t') {
                    ui.label(cell);
                }
                ui.end_row();
            }
        });
    });
}

pub(super) fn histogram_view(ui: &mut egui::Ui, bins: &[u64]) {
    histogram(ui, bins, None);
}
