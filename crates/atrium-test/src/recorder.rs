//! Shared ordering recorder for lifecycle tests.

use std::sync::Arc;

use parking_lot::Mutex;

/// Cloneable, append-only event log.
///
/// Tests hand clones to subscribers and callbacks, then assert on the
/// recorded order with [`snapshot`](Self::snapshot).
///
/// # Example
///
/// ```
/// use atrium_test::EventLog;
///
/// let log = EventLog::new();
/// let writer = log.clone();
/// writer.push("first");
/// writer.push("second");
/// assert_eq!(log.snapshot(), vec!["first", "second"]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    entries: Arc<Mutex<Vec<String>>>,
}

impl EventLog {
    /// Creates an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an entry.
    pub fn push(&self, entry: impl Into<String>) {
        self.entries.lock().push(entry.into());
    }

    /// Returns a copy of all entries in append order.
    #[must_use]
    pub fn snapshot(&self) -> Vec<String> {
        self.entries.lock().clone()
    }

    /// Returns the number of recorded entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// Returns `true` if nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}
