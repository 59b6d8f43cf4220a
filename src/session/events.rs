use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum EditOutcome {
    Committed,
    RolledBack,
}

/// Notifications published by the shell whenever a document changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum DocumentEvent {
    Opened { index: usize },
    Closed { index: usize },
    Activated { index: usize },
    /// A preview replaced the live buffer of the document under edit.
    Previewed { operation: &'static str },
    /// Published exactly once when an edit ends.
    Updated {
        operation: &'static str,
        outcome: EditOutcome,
    },
    OverlayChanged,
}

pub trait DocumentObserver {
    fn notify(&mut self, event: &DocumentEvent);
}

impl<F> DocumentObserver for F
where
    F: FnMut(&DocumentEvent),
{
    fn notify(&mut self, event: &DocumentEvent) {
        self(event);
    }
}

#[derive(Default)]
pub struct EventBus {
    observers: Vec<Box<dyn DocumentObserver>>,
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("EventBus")
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl EventBus {
    pub fn subscribe(&mut self, observer: impl DocumentObserver + 'static) {
        self.observers.push(Box::new(observer));
    }

    pub fn publish(&mut self, event: &DocumentEvent) {
        tracing::trace!(?event, observers = self.observers.len(), "publish");
        for observer in &mut self.observers {
            observer.notify(event);
        }
    }
}
