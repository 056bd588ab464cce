//! # Audit Trail
//!
//! One emission function per category. Each call builds exactly one
//! [`AuditRecord`] and hands it to the configured sink. Emission never
//! fails toward the caller: sink errors are logged and dropped.

use std::sync::Arc;

use crate::event::{
    AuditCategory, AuthEvent, BusinessErrorEvent, CrudEvent, DataAccessEvent, GenericAuditEvent,
    PerformanceEvent, ValidationEvent,
};
use crate::record::{AuditLevel, AuditPayload, AuditRecord};
use crate::sink::{AuditSink, TracingSink};

/// Durations above this many milliseconds are emitted at warn level.
pub const SLOW_PERFORMANCE_THRESHOLD_MS: u64 = 5000;

/// Cloneable handle to an audit sink.
#[derive(Clone)]
pub struct AuditTrail {
    sink: Arc<dyn AuditSink>,
}

impl std::fmt::Debug for AuditTrail {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuditTrail").finish_non_exhaustive()
    }
}

impl Default for AuditTrail {
    fn default() -> Self {
        Self::tracing()
    }
}

impl AuditTrail {
    /// Trail writing to `sink`.
    pub fn new(sink: Arc<dyn AuditSink>) -> Self {
        Self { sink }
    }

    /// Trail writing to [`TracingSink`].
    pub fn tracing() -> Self {
        Self::new(Arc::new(TracingSink))
    }

    fn emit(&self, payload: AuditPayload) {
        let level = level_for(&payload);
        let record = AuditRecord::new(payload, level);
        if let Err(e) = self.sink.emit(&record) {
            tracing::warn!(
                category = %record.category,
                error = %e,
                "dropping audit record"
            );
        }
    }

    /// Login, logout and token events.
    pub fn log_auth(&self, event: AuthEvent) {
        self.emit(AuditPayload::Auth(event));
    }

    /// A successful create, read, update or delete.
    pub fn log_crud(&self, event: CrudEvent) {
        self.emit(AuditPayload::Crud(event));
    }

    /// The outcome of a domain validation, pass or fail.
    pub fn log_validation(&self, event: ValidationEvent) {
        self.emit(AuditPayload::Validation(event));
    }

    /// A failed operation. Always error level.
    pub fn log_business_error(&self, event: BusinessErrorEvent) {
        self.emit(AuditPayload::BusinessError(event));
    }

    /// Operation timing. Warn level above [`SLOW_PERFORMANCE_THRESHOLD_MS`].
    pub fn log_performance(&self, event: PerformanceEvent) {
        self.emit(AuditPayload::Performance(event));
    }

    /// A read or export of sensitive records.
    pub fn log_data_access(&self, event: DataAccessEvent) {
        self.emit(AuditPayload::DataAccess(event));
    }

    /// Anything the other categories do not cover.
    pub fn log_audit(&self, event: GenericAuditEvent) {
        self.emit(AuditPayload::Audit(event));
    }
}

impl AuditCategory {
    /// Level used for records of this category, ignoring duration.
    pub fn default_level(&self) -> AuditLevel {
        match self {
            Self::BusinessError => AuditLevel::Error,
            _ => AuditLevel::Info,
        }
    }
}

fn level_for(payload: &AuditPayload) -> AuditLevel {
    match payload {
        AuditPayload::Performance(event) if event.duration > SLOW_PERFORMANCE_THRESHOLD_MS => {
            AuditLevel::Warn
        }
        other => other.category().default_level(),
    }
}
