use std::cell::Cell;
use std::path::PathBuf;
use std::rc::Rc;

use eframe::egui;
use rfd::FileDialog;

use crate::config::Settings;
use crate::formats::{export_text, supported_formats};
use crate::measure::{MeasureMode, MeasureOutcome, MeasurementList};
use crate::model::{ImageDocument, ImageSummary};
use crate::overlay::{DisplayMapper, PointerEvent};
use crate::session::DocumentEvent;
use crate::shell::{self, ChannelSplit, DocumentShell, MenuAction, ShellError};
use crate::windows::ActiveWindow;

use super::canvas::{self, CanvasInput, PointerFlags};
use super::panels::{self, CalibrationEdit};

const ABOUT_TEXT: &str = "Interactive image editor. Operations preview live on the \
    active image and are kept with OK or rolled back with Cancel.";

/// Everything the user asked for during one frame, applied after drawing.
#[derive(Debug, Clone)]
pub(super) enum UiAction {
    Menu(MenuAction),
    SwitchTab(usize),
    SetFit(bool),
    EditWindow(ActiveWindow),
    FinishOperation(bool),
    Pointer(PointerEvent),
    Calibrate(CalibrationEdit),
    FinishMeasurement(bool),
    ExportMeasurements,
}

pub(super) struct ImageqApp {
    shell: DocumentShell,
    settings: Settings,
    mapper: DisplayMapper,
    canvas: CanvasInput,
    texture: Option<egui::TextureHandle>,
    summary: Option<ImageSummary>,
    /// Set by the document observer whenever pixels or the active tab change.
    dirty: Rc<Cell<bool>>,
    status: String,
    hover: Option<String>,
    histogram: Option<Vec<u64>>,
    measurements: Option<MeasurementList>,
    show_about: bool,
}

impl ImageqApp {
    pub(super) fn new(settings: Settings, inputs: Vec<PathBuf>) -> Self {
        let mut shell = DocumentShell::new(settings.default_scale());
        let dirty = Rc::new(Cell::new(true));
        let flag = Rc::clone(&dirty);
        shell.subscribe(move |event: &DocumentEvent| {
            if !matches!(event, DocumentEvent::OverlayChanged) {
                flag.set(true);
            }
        });

        let mut app = Self {
            shell,
            mapper: DisplayMapper::new(settings.fit_to_screen),
            settings,
            canvas: CanvasInput::default(),
            texture: None,
            summary: None,
            dirty,
            status: "Ready".to_string(),
            hover: None,
            histogram: None,
            measurements: None,
            show_about: false,
        };
        for path in inputs {
            let result = app.shell.open(&path);
            app.report(result);
        }
        app
    }

    /// Logs a failed action and shows it in the status line.
    fn report<T>(&mut self, result: shell::Result<T>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(error) => {
                tracing::warn!(%error, "action failed");
                self.status = error.to_string();
                None
            }
        }
    }

    fn refresh_texture(&mut self, ctx: &egui::Context) {
        if !self.dirty.replace(false) {
            return;
        }
        let document = self.shell.active_document();
        self.summary = document
            .filter(|document| !document.is_empty())
            .map(ImageDocument::summary);
        let Some(image) = document.and_then(|document| canvas::to_color_image(document.current()))
        else {
            self.texture = None;
            return;
        };
        if let Some(texture) = &mut self.texture {
            texture.set(image, egui::TextureOptions::NEAREST);
        } else {
            self.texture =
                Some(ctx.load_texture("imageq-canvas", image, egui::TextureOptions::NEAREST));
        }
    }

    fn draw_menu_bar(&self, ui: &mut egui::Ui, actions: &mut Vec<UiAction>) {
        let mode = self.shell.mode();
        let has_image = self.shell.has_image();
        let groups: [(&str, &[MenuAction]); 4] = [
            ("File", &MenuAction::FILE),
            ("Image", &MenuAction::IMAGE),
            ("Process", &MenuAction::PROCESS),
            ("Analyze", &MenuAction::ANALYZE),
        ];
        egui::menu::bar(ui, |ui| {
            for (title, items) in groups {
                ui.menu_button(title, |ui| {
                    for action in items {
                        let enabled = action.is_enabled(mode, has_image);
                        if ui
                            .add_enabled(enabled, egui::Button::new(action.label()))
                            .clicked()
                        {
                            actions.push(UiAction::Menu(*action));
                            ui.close_menu();
                        }
                    }
                });
            }
            ui.menu_button("View", |ui| {
                let mut fit = self.mapper.fit();
                if ui.checkbox(&mut fit, "Fit to screen").changed() {
                    actions.push(UiAction::SetFit(fit));
                }
            });
            ui.menu_button("Help", |ui| {
                if ui.button(MenuAction::About.label()).clicked() {
                    actions.push(UiAction::Menu(MenuAction::About));
                    ui.close_menu();
                }
            });
        });
    }

    fn draw_tabs(&self, ui: &mut egui::Ui, actions: &mut Vec<UiAction>) {
        let idle = self.shell.mode().is_idle();
        let active = self.shell.active_index();
        ui.horizontal_wrapped(|ui| {
            for (index, title) in self.shell.titles().into_iter().enumerate() {
                let selected = index == active;
                let clicked = ui
                    .add_enabled(idle || selected, egui::SelectableLabel::new(selected, title))
                    .clicked();
                if clicked && !selected {
                    actions.push(UiAction::SwitchTab(index));
                }
            }
        });
    }

    fn draw_canvas(&mut self, ui: &mut egui::Ui, actions: &mut Vec<UiAction>) {
        let available = ui.available_size();
        let size = egui::vec2(available.x.max(1.0), available.y.max(1.0));
        let (rect, response) = ui.allocate_exact_size(size, egui::Sense::click_and_drag());
        let painter = ui.painter_at(rect);
        painter.rect_filled(rect, 0.0, egui::Color32::from_gray(16));
        self.hover = None;

        let Some(document) = self.shell.active_document() else {
            return;
        };
        if document.is_empty() {
            painter.text(
                rect.center(),
                egui::Align2::CENTER_CENTER,
                "No image",
                egui::FontId::proportional(18.0),
                egui::Color32::GRAY,
            );
            return;
        }

        let buffer = document.current();
        self.mapper.sync(buffer.cols(), buffer.rows(), rect.size());
        let offset = rect.min.to_vec2();
        if let (Some(texture), Some(display)) = (&self.texture, self.mapper.display_rect()) {
            painter.image(
                texture.id(),
                display.translate(offset),
                egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
                egui::Color32::WHITE,
            );
        }
        canvas::draw_overlay(
            &painter,
            &self.mapper,
            rect.min,
            document.overlay(),
            &self.settings.overlay,
        );

        self.hover = response
            .hover_pos()
            .and_then(|pos| self.mapper.hover_pixel(pos - offset))
            .and_then(|(x, y)| {
                document
                    .sample_text(x, y)
                    .map(|value| format!("x={x}, y={y}, value={value}"))
            });

        if self
            .shell
            .measurement()
            .is_some_and(|controller| controller.is_selecting())
        {
            let image_pos = response
                .interact_pointer_pos()
                .and_then(|pos| self.mapper.clamp_to_image(pos - offset));
            let events = self
                .canvas
                .translate(PointerFlags::from_response(&response), image_pos);
            actions.extend(events.into_iter().map(UiAction::Pointer));
        }
    }

    fn draw_windows(&mut self, ctx: &egui::Context, actions: &mut Vec<UiAction>) {
        if let Some(window) = self.shell.window() {
            let mut edited = window.clone();
            egui::Window::new(window.kind().title())
                .id(egui::Id::new("imageq-operation"))
                .collapsible(false)
                .resizable(false)
                .show(ctx, |ui| {
                    if panels::window_controls(ui, &mut edited) {
                        actions.push(UiAction::EditWindow(edited.clone()));
                    }
                    ui.separator();
                    ui.horizontal(|ui| {
                        if ui.button("Cancel").clicked() {
                            actions.push(UiAction::FinishOperation(false));
                        }
                        if ui.button("OK").clicked() {
                            actions.push(UiAction::FinishOperation(true));
                        }
                    });
                });
        }

        if let Some(controller) = self.shell.measurement() {
            let mode = controller.mode();
            let title = match mode {
                MeasureMode::Scale => "Set Scale",
                MeasureMode::Distance => "Distance",
                MeasureMode::Crop => "Crop",
            };
            egui::Window::new(title)
                .id(egui::Id::new("imageq-measurement"))
                .collapsible(false)
                .resizable(false)
                .show(ctx, |ui| {
                    match mode {
                        MeasureMode::Scale => {
                            let edit = panels::scale_controls(
                                ui,
                                controller.calibration(),
                                controller.is_selecting(),
                            );
                            actions.extend(edit.map(UiAction::Calibrate));
                        }
                        MeasureMode::Distance => {
                            ui.label("Drag to measure, double-click to finish.");
                            panels::measurement_table(ui, controller.distances());
                        }
                        MeasureMode::Crop => {
                            ui.label("Drag a rectangle, then double-click to crop.");
                        }
                    }
                    ui.separator();
                    ui.horizontal(|ui| {
                        if ui.button("Cancel").clicked() {
                            actions.push(UiAction::FinishMeasurement(false));
                        }
                        if mode != MeasureMode::Crop && ui.button("OK").clicked() {
                            actions.push(UiAction::FinishMeasurement(true));
                        }
                    });
                });
        }

        if let Some(bins) = &self.histogram {
            let mut open = true;
            egui::Window::new("Histogram")
                .open(&mut open)
                .resizable(false)
                .show(ctx, |ui| panels::histogram_view(ui, bins));
            if !open {
                self.histogram = None;
            }
        }

        if let Some(list) = &self.measurements {
            let mut open = true;
            egui::Window::new(list.title())
                .id(egui::Id::new("imageq-measurements"))
                .open(&mut open)
                .show(ctx, |ui| {
                    panels::measurement_table(ui, list);
                    if ui.button("Export...").clicked() {
                        actions.push(UiAction::ExportMeasurements);
                    }
                });
            if !open {
                self.measurements = None;
            }
        }

        if self.show_about {
            egui::Window::new("About")
                .open(&mut self.show_about)
                .collapsible(false)
                .resizable(false)
                .show(ctx, |ui| {
                    ui.heading("imageq");
                    ui.label(format!("Version {}", env!("CARGO_PKG_VERSION")));
                    ui.label(ABOUT_TEXT);
                });
        }
    }

    fn apply(&mut self, action: UiAction) {
        match action {
            UiAction::Menu(menu) => self.run_menu(menu),
            UiAction::SwitchTab(index) => {
                let result = self.shell.switch_to(index);
                if let Some(summary) = self.report(result) {
                    self.status = format!(
                        "{}: {} x {}, {} channel(s), {}",
                        summary.title, summary.width, summary.height, summary.channels, summary.depth
                    );
                }
            }
            UiAction::SetFit(fit) => self.mapper.set_fit(fit),
            UiAction::EditWindow(window) => {
                let result = self.shell.edit_operation(|active| *active = window);
                self.report(result);
            }
            UiAction::FinishOperation(commit) => {
                let result = self.shell.finish_operation(commit);
                self.report(result);
            }
            UiAction::Pointer(event) => {
                let result = self.shell.handle_pointer(event);
                match self.report(result).flatten() {
                    Some(MeasureOutcome::Measured(index)) => {
                        self.status = format!("Distance {index} measured");
                    }
                    Some(MeasureOutcome::ReferenceSelected(pixels)) => {
                        self.status = format!("Reference line covers {pixels} px");
                    }
                    Some(MeasureOutcome::RectangleSelected(rect)) => {
                        self.status = format!(
                            "Selected {} x {} at ({}, {})",
                            rect.width, rect.height, rect.x, rect.y
                        );
                    }
                    Some(MeasureOutcome::CropAccepted(_)) => {
                        self.status = "Cropped into a new tab".to_string();
                    }
                    Some(MeasureOutcome::Exited) => {
                        if self.shell.measurement().is_none() {
                            self.measurements = self.shell.last_measurements().cloned();
                        }
                    }
                    None => {}
                }
            }
            UiAction::Calibrate(edit) => {
                let Some(controller) = self.shell.measurement_mut() else {
                    return;
                };
                match edit {
                    CalibrationEdit::KnownLength(length) => {
                        controller.calibration_mut().set_known_length(length);
                    }
                    CalibrationEdit::Unit(unit) => {
                        if !controller.calibration_mut().set_unit(&unit) {
                            self.status = "Units may contain letters only".to_string();
                        }
                    }
                    CalibrationEdit::Reselect => controller.reselect(),
                }
            }
            UiAction::FinishMeasurement(accept) => {
                let result = self.shell.finish_measurement(accept);
                if let Some(list) = self.report(result)
                    && !list.is_empty()
                {
                    self.measurements = Some(list);
                }
            }
            UiAction::ExportMeasurements => self.export_measurements(),
        }
    }

    fn run_menu(&mut self, action: MenuAction) {
        if let Some(kind) = action.operation() {
            let result = self.shell.begin_operation(kind);
            self.report(result);
            return;
        }
        if let Some(mode) = action.measurement() {
            let result = self.shell.begin_measurement(mode);
            if self.report(result).is_some() {
                self.canvas = CanvasInput::default();
                self.status = format!("{} started", mode.label());
            }
            return;
        }
        if let Some(adjustment) = action.adjustment() {
            let result = self.shell.apply_adjustment(adjustment);
            self.report(result);
            return;
        }

        match action {
            MenuAction::Open => self.open_dialog(),
            MenuAction::Save => self.save_dialog(),
            MenuAction::Revert => {
                let result = self.shell.revert();
                self.report(result);
            }
            MenuAction::Undo => {
                let result = self.shell.undo();
                if self.report(result) == Some(false) {
                    self.status = "Nothing to undo".to_string();
                }
            }
            MenuAction::Close => {
                let result = self.shell.close_active();
                self.report(result);
            }
            MenuAction::Histogram => {
                let result = self.shell.histogram();
                self.histogram = self.report(result);
            }
            MenuAction::SplitRgb | MenuAction::SplitHsv => {
                let split = if action == MenuAction::SplitRgb {
                    ChannelSplit::Rgb
                } else {
                    ChannelSplit::Hsv
                };
                let result = self.shell.split_channels(split);
                self.report(result);
            }
            MenuAction::Particles => {
                let result = self.shell.measure_particles();
                if let Some(list) = self.report(result) {
                    self.status = format!("{} particles measured", list.len());
                    self.measurements = Some(list);
                }
            }
            MenuAction::ClearOverlay => {
                let result = self.shell.clear_overlay();
                self.report(result);
            }
            MenuAction::About => self.show_about = true,
            other => tracing::debug!(?other, "menu action handled above"),
        }
    }

    fn open_dialog(&mut self) {
        let paths = FileDialog::new()
            .add_filter("Images", supported_formats())
            .set_title("Open Image")
            .pick_files()
            .unwrap_or_default();
        for path in paths {
            let result = self.shell.open(&path);
            self.report(result);
        }
    }

    fn save_dialog(&mut self) {
        let Some(path) = FileDialog::new()
            .add_filter("JPEG", &["jpg", "jpeg"])
            .set_title("Save Image")
            .save_file()
        else {
            return;
        };
        let result = self.shell.save_active(path);
        if let Some(written) = self.report(result) {
            self.status = format!("Saved {}", written.display());
        }
    }

    fn export_measurements(&mut self) {
        let Some(list) = self.measurements.clone() else {
            return;
        };
        let Some(path) = FileDialog::new()
            .add_filter("Text", &["txt"])
            .set_title("Export Measurements")
            .save_file()
        else {
            return;
        };
        let result = export_text(&path, &list).map_err(ShellError::from);
        if let Some(written) = self.report(result) {
            self.status = format!("Exported {}", written.display());
        }
    }
}

impl eframe::App for ImageqApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.refresh_texture(ctx);

        let mut actions = Vec::new();
        egui::TopBottomPanel::top("imageq-header").show(ctx, |ui| {
            self.draw_menu_bar(ui, &mut actions);
            self.draw_tabs(ui, &mut actions);
        });
        egui::TopBottomPanel::bottom("imageq-status").show(ctx, |ui| {
            ui.label(&self.status);
        });
        egui::SidePanel::right("imageq-info")
            .resizable(true)
            .default_width(220.0)
            .show(ctx, |ui| {
                panels::info_panel(ui, self.summary.as_ref(), self.hover.as_deref());
            });
        egui::CentralPanel::default().show(ctx, |ui| self.draw_canvas(ui, &mut actions));
        self.draw_windows(ctx, &mut actions);

        for action in actions {
            self.apply(action);
        }
        if self.dirty.get() {
            ctx.request_repaint();
        }
    }
}

#[cfg(test)]
mod tests {
    use ndarray::Array2;

    use crate::config::Settings;
    use crate::model::{ImageDocument, PixelBuffer, PixelDepth};
    use crate::shell::{MenuAction, ShellMode};
    use crate::windows::{ActiveWindow, OperationKind};

    use super::{ImageqApp, UiAction};

    fn app_with_image() -> ImageqApp {
        let mut app = ImageqApp::new(Settings::default(), Vec::new());
        let plane = Array2::from_shape_fn((8, 8), |(y, x)| (x * 20 + y) as f32);
        let document = ImageDocument::new("ramp", PixelBuffer::from_gray(plane, PixelDepth::U8));
        app.shell.add_document(document).expect("idle");
        app
    }

    #[test]
    fn missing_inputs_leave_an_empty_tab() {
        let app = ImageqApp::new(Settings::default(), vec!["/nonexistent/a.png".into()]);
        assert_eq!(app.shell.len(), 1);
        assert!(!app.shell.has_image());
    }

    #[test]
    fn operation_window_round_trip_through_actions() {
        let mut app = app_with_image();
        app.dirty.set(false);
        app.apply(UiAction::Menu(MenuAction::Blur));
        assert_eq!(app.shell.mode(), ShellMode::Operation(OperationKind::Blur));
        assert!(app.dirty.get());

        let Some(ActiveWindow::Blur(mut blur)) = app.shell.window().cloned() else {
            panic!("blur window expected");
        };
        blur.set_size(5);
        app.apply(UiAction::EditWindow(ActiveWindow::Blur(blur)));
        app.apply(UiAction::FinishOperation(false));
        assert_eq!(app.shell.mode(), ShellMode::Idle);
    }

    #[test]
    fn failures_are_shown_in_the_status_line() {
        let mut app = ImageqApp::new(Settings::default(), Vec::new());
        app.apply(UiAction::Menu(MenuAction::Histogram));
        assert_eq!(app.status, "no image is loaded in the active tab");
        assert!(app.histogram.is_none());
    }

    #[test]
    fn particles_open_the_measurement_window() {
        let mut app = app_with_image();
        app.apply(UiAction::Menu(MenuAction::Particles));
        let list = app.measurements.as_ref().expect("areas listed");
        assert_eq!(list.title(), "Areas");
    }
}
