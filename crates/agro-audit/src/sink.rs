//! # Audit Sinks
//!
//! Destinations for [`AuditRecord`]s. The trail calls [`AuditSink::emit`]
//! synchronously once per record.

use parking_lot::Mutex;
use thiserror::Error;

use crate::event::AuditCategory;
use crate::record::{AuditLevel, AuditRecord};

/// Failure writing a record. The trail logs and drops these.
#[derive(Error, Debug)]
pub enum SinkError {
    #[error("failed to serialize audit record: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("audit sink unavailable: {0}")]
    Unavailable(String),
}

/// A destination for audit records.
pub trait AuditSink: Send + Sync {
    fn emit(&self, record: &AuditRecord) -> Result<(), SinkError>;
}

// ---------------------------------------------------------------------------
// TracingSink
// ---------------------------------------------------------------------------

/// Writes each record as a `tracing` event on target `agro::audit`, at the
/// record's level, with the JSON record in the `audit` field.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl AuditSink for TracingSink {
    fn emit(&self, record: &AuditRecord) -> Result<(), SinkError> {
        let audit = serde_json::to_string(record)?;
        let category = record.category.as_str();
        match record.level {
            AuditLevel::Info => {
                tracing::info!(target: "agro::audit", category, audit = %audit, "{}", record.message)
            }
            AuditLevel::Warn => {
                tracing::warn!(target: "agro::audit", category, audit = %audit, "{}", record.message)
            }
            AuditLevel::Error => {
                tracing::error!(target: "agro::audit", category, audit = %audit, "{}", record.message)
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// MemorySink
// ---------------------------------------------------------------------------

/// Keeps every record in memory, in emission order.
#[derive(Debug, Default)]
pub struct MemorySink {
    records: Mutex<Vec<AuditRecord>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all records emitted so far.
    pub fn records(&self) -> Vec<AuditRecord> {
        self.records.lock().clone()
    }

    pub fn by_category(&self, category: AuditCategory) -> Vec<AuditRecord> {
        self.records
            .lock()
            .iter()
            .filter(|r| r.category == category)
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.lock().is_empty()
    }

    pub fn clear(&self) {
        self.records.lock().clear();
    }
}

impl AuditSink for MemorySink {
    fn emit(&self, record: &AuditRecord) -> Result<(), SinkError> {
        self.records.lock().push(record.clone());
        Ok(())
    }
}
