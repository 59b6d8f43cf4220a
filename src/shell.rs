mod actions;
mod document_shell;
mod error;

#[cfg(test)]
mod tests;

pub use actions::{Adjustment, ChannelSplit, MenuAction, ShellMode};
pub use document_shell::DocumentShell;
pub use error::{Result, ShellError};
