mod edit;
mod events;

#[cfg(test)]
mod tests;

pub use edit::EditSession;
pub use events::{DocumentEvent, DocumentObserver, EditOutcome, EventBus};
