use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(
    name = "imageq",
    version,
    about = "Interactive image editor with live preview, commit and rollback",
    args_conflicts_with_subcommands = true
)]
pub(super) struct Cli {
    /// Settings file (YAML or JSON, chosen by extension)
    #[arg(long, global = true)]
    pub(super) config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub(super) verbose: bool,

    #[command(subcommand)]
    pub(super) command: Option<Commands>,

    /// Images to open in tabs when the editor starts
    pub(super) inputs: Vec<PathBuf>,
}

#[derive(Debug, Subcommand)]
pub(super) enum Commands {
    /// Print dimensions, channels, depth and min/max of an image as JSON
    Info { input: PathBuf },
}
