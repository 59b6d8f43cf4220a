use clap::Parser;

use crate::config::{Settings, load_settings};
use crate::formats::open_image;
use crate::logging;
use crate::model::ImageDocument;

use super::types::{Cli, Commands};

pub fn run_cli() -> Result<(), String> {
    let cli = Cli::parse();
    let settings = configure(&cli)?;

    match cli.command {
        Some(Commands::Info { input }) => {
            let buffer = open_image(&input).map_err(|error| error.to_string())?;
            let summary = ImageDocument::from_path(&input, buffer).summary();
            println!(
                "{}",
                serde_json::to_string_pretty(&summary).map_err(|error| error.to_string())?
            );
            Ok(())
        }
        None => crate::ui::run(settings, cli.inputs),
    }
}

/// Loads the settings file and installs logging from it; the load is
/// reported once the subscriber exists.
fn configure(cli: &Cli) -> Result<Settings, String> {
    let settings = match &cli.config {
        Some(path) => load_settings(path).map_err(|error| error.to_string())?,
        None => Settings::default(),
    };
    logging::init(cli.verbose, &settings.log_filter);
    match &cli.config {
        Some(path) => tracing::debug!(path = %path.display(), ?settings, "settings loaded"),
        None => tracing::debug!("default settings"),
    }
    Ok(settings)
}
