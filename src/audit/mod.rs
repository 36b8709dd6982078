//! Best-effort audit log of classifications and completions.
//!
//! Inserts are dispatched fire-and-forget by the router; a sink failure is
//! logged inside that task and never observable to the caller. There is no
//! read path.

pub mod postgres;

use std::sync::Mutex;

use async_trait::async_trait;
use thiserror::Error;

use crate::catalog::TaskCategory;
use crate::classifier::ClassificationSource;

pub use self::postgres::PostgresAuditSink;

/// Errors from the audit backend.
#[derive(Debug, Error)]
pub enum AuditError {
    #[error("audit database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// One appended audit record.
#[derive(Debug, Clone)]
pub struct AuditEntry {
    pub prompt_hash: String,
    /// First 200 characters of the prompt.
    pub prompt_preview: String,
    pub category: TaskCategory,
    pub confidence: f64,
    pub source: ClassificationSource,
    pub model: String,
    pub cost_usd: f64,
    pub latency_ms: u64,
}

impl AuditEntry {
    /// Truncate a prompt to the stored preview length (char-boundary safe).
    pub fn preview_of(prompt: &str) -> String {
        prompt.chars().take(200).collect()
    }
}

/// Append-only audit capability.
#[async_trait]
pub trait AuditSink: Send + Sync {
    async fn insert(&self, entry: AuditEntry) -> Result<(), AuditError>;
}

/// In-memory sink for tests and local runs without a database.
#[derive(Default)]
pub struct InMemoryAuditSink {
    entries: Mutex<Vec<AuditEntry>>,
}

impl InMemoryAuditSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything appended so far.
    pub fn entries(&self) -> Vec<AuditEntry> {
        self.entries.lock().expect("audit entries poisoned").clone()
    }
}

#[async_trait]
impl AuditSink for InMemoryAuditSink {
    async fn insert(&self, entry: AuditEntry) -> Result<(), AuditError> {
        self.entries
            .lock()
            .expect("audit entries poisoned")
            .push(entry);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preview_truncates_at_200_chars() {
        let short = AuditEntry::preview_of("hello");
        assert_eq!(short, "hello");

        let long: String = "x".repeat(500);
        assert_eq!(AuditEntry::preview_of(&long).chars().count(), 200);

        // Multi-byte characters stay intact.
        let emoji: String = "é".repeat(500);
        let preview = AuditEntry::preview_of(&emoji);
        assert_eq!(preview.chars().count(), 200);
        assert!(preview.chars().all(|c| c == 'é'));
    }

    #[tokio::test]
    async fn in_memory_sink_appends() {
        let sink = InMemoryAuditSink::new();
        sink.insert(AuditEntry {
            prompt_hash: "abc".into(),
            prompt_preview: "hello".into(),
            category: TaskCategory::Simple,
            confidence: 0.9,
            source: ClassificationSource::Semantic,
            model: "m".into(),
            cost_usd: 0.0002,
            latency_ms: 200,
        })
        .await
        .unwrap();
        assert_eq!(sink.entries().len(), 1);
        assert_eq!(sink.entries()[0].model, "m");
    }
}
