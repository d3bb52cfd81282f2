//! Append-only invocation audit log.
//!
//! One entry per tool invocation, success or failure. The UI layer reads
//! it for presentation; the ledger never consults it.

use parking_lot::RwLock;
use serde::Serialize;
use serde_json::Value;

/// One recorded invocation.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AuditEntry {
    /// Tool name as invoked.
    pub tool_name: String,
    /// The raw argument object the driver sent.
    pub input: Value,
    /// The structured response the driver received.
    pub output: Value,
}

/// Append-only log of every tool invocation.
#[derive(Default)]
pub struct AuditLog {
    entries: RwLock<Vec<AuditEntry>>,
}

impl AuditLog {
    /// Create an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry.
    pub fn record(&self, entry: AuditEntry) {
        self.entries.write().push(entry);
    }

    /// A point-in-time copy of all entries, oldest first.
    pub fn snapshot(&self) -> Vec<AuditEntry> {
        self.entries.read().clone()
    }

    /// Number of recorded invocations.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Whether anything has been recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}
