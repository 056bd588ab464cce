//! # agro-audit — Structured Audit Trail
//!
//! Every state-changing operation and every sensitive read in the registry
//! produces one structured record here. Records are categorized by a fixed
//! taxonomy, stamped with a UTC timestamp, and handed to an [`AuditSink`].
//!
//! ## Architecture
//!
//! - **Events** (`event.rs`): one typed payload per category (AUTH, CRUD,
//!   VALIDATION, BUSINESS_ERROR, PERFORMANCE, DATA_ACCESS, AUDIT).
//!
//! - **Record** (`record.rs`): the envelope (timestamp, literal message,
//!   category, level) wrapped around a payload.
//!
//! - **Trail** (`trail.rs`): one emission function per category. Emission
//!   is synchronous and infallible toward the caller.
//!
//! - **Sinks** (`sink.rs`): `TracingSink` for production, `MemorySink` for
//!   tests and embedding.
//!
//! - **Redaction** (`redact.rs`): helpers callers use to keep tax IDs,
//!   passwords and tokens out of `details`.
//!
//! ## Crate Policy
//!
//! - Depends only on `agro-core` internally.
//! - Redaction is decided by the caller; sinks write what they are given.

pub mod event;
pub mod record;
pub mod redact;
pub mod sink;
pub mod trail;

pub use event::{
    AuditCategory, AuthAction, AuthEvent, BusinessErrorEvent, CrudAction, CrudEvent,
    DataAccessAction, DataAccessEvent, GenericAuditEvent, PerformanceEvent, SensitiveDataType,
    ValidationAction, ValidationEvent,
};
pub use record::{AuditLevel, AuditPayload, AuditRecord};
pub use redact::{redact_presence, sanitize_details, REDACTED};
pub use sink::{AuditSink, MemorySink, SinkError, TracingSink};
pub use trail::{AuditTrail, SLOW_PERFORMANCE_THRESHOLD_MS};
