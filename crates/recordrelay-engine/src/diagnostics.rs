//! Diagnostic attachments: out-of-band audit copies of payloads.
//!
//! Fire-and-forget by contract: an attachment never raises and never
//! affects control flow.

use std::sync::Mutex;

/// Sink for diagnostic artifacts.
pub trait DiagnosticSink: Send + Sync {
    /// Attach one labeled artifact. Must not fail.
    fn attach(&self, label: &str, content: &str, mime: &str);
}

/// Emits attachments as structured log events.
#[derive(Debug, Default)]
pub struct LogDiagnostics;

impl DiagnosticSink for LogDiagnostics {
    fn attach(&self, label: &str, content: &str, mime: &str) {
        tracing::debug!(label, mime, bytes = content.len(), "diagnostic attachment");
    }
}

/// One captured attachment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub label: String,
    pub content: String,
    pub mime: String,
}

/// In-memory capture of attachments, used by tests and the CLI's verbose
/// mode to inspect the audit trail of a run.
#[derive(Debug, Default)]
pub struct MemoryDiagnostics {
    entries: Mutex<Vec<Attachment>>,
}

impl MemoryDiagnostics {
    /// Snapshot of all attachments in arrival order.
    #[must_use]
    pub fn entries(&self) -> Vec<Attachment> {
        self.entries.lock().map(|e| e.clone()).unwrap_or_default()
    }

    /// First attachment with the given label, if any.
    #[must_use]
    pub fn find(&self, label: &str) -> Option<Attachment> {
        self.entries().into_iter().find(|a| a.label == label)
    }
}

impl DiagnosticSink for MemoryDiagnostics {
    fn attach(&self, label: &str, content: &str, mime: &str) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.push(Attachment {
                label: label.to_string(),
                content: content.to_string(),
                mime: mime.to_string(),
            });
        }
    }
}
