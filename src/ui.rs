mod app;
mod canvas;
mod panels;

use std::path::PathBuf;

use eframe::egui;

use crate::config::Settings;

use app::ImageqApp;

const MIN_WINDOW_SIZE: [f32; 2] = [640.0, 480.0];

/// Opens the editor window with `inputs` loaded as tabs and blocks until it
/// is closed.
pub fn run(settings: Settings, inputs: Vec<PathBuf>) -> Result<(), String> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("imageq")
            .with_inner_size(settings.window_size)
            .with_min_inner_size(MIN_WINDOW_SIZE)
            .with_resizable(true),
        ..Default::default()
    };

    eframe::run_native(
        "imageq",
        options,
        Box::new(move |_cc| Ok(Box::new(ImageqApp::new(settings, inputs)))),
    )
    .map_err(|error| error.to_string())
}
