pub mod cli;
pub mod commands;
pub mod config;
pub mod formats;
pub mod logging;
pub mod measure;
pub mod model;
pub mod overlay;
pub mod session;
pub mod shell;
pub mod ui;
pub mod windows;

pub fn run_cli() -> Result<(), String> {
    cli::run_cli()
}
