//! # Audit Record Envelope
//!
//! An [`AuditRecord`] wraps one category payload with the fields every
//! record carries: timestamp, literal message, category and level. The
//! payload's fields are flattened into the top-level JSON object.

use agro_core::Timestamp;
use serde::Serialize;

use crate::event::{
    AuditCategory, AuthEvent, BusinessErrorEvent, CrudEvent, DataAccessEvent, GenericAuditEvent,
    PerformanceEvent, ValidationEvent,
};

/// Severity a sink should use when writing a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AuditLevel {
    Info,
    Warn,
    Error,
}

/// The category-specific part of a record.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AuditPayload {
    Auth(AuthEvent),
    Crud(CrudEvent),
    Validation(ValidationEvent),
    BusinessError(BusinessErrorEvent),
    Performance(PerformanceEvent),
    DataAccess(DataAccessEvent),
    Audit(GenericAuditEvent),
}

impl AuditPayload {
    pub fn category(&self) -> AuditCategory {
        match self {
            Self::Auth(_) => AuditCategory::Auth,
            Self::Crud(_) => AuditCategory::Crud,
            Self::Validation(_) => AuditCategory::Validation,
            Self::BusinessError(_) => AuditCategory::BusinessError,
            Self::Performance(_) => AuditCategory::Performance,
            Self::DataAccess(_) => AuditCategory::DataAccess,
            Self::Audit(_) => AuditCategory::Audit,
        }
    }
}

/// One emitted audit record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuditRecord {
    pub timestamp: Timestamp,
    pub message: &'static str,
    pub category: AuditCategory,
    #[serde(skip)]
    pub level: AuditLevel,
    #[serde(flatten)]
    pub payload: AuditPayload,
}

impl AuditRecord {
    /// Stamp `payload` with the current time and its category's message.
    pub fn new(payload: AuditPayload, level: AuditLevel) -> Self {
        let category = payload.category();
        Self {
            timestamp: Timestamp::now(),
            message: category.message(),
            category,
            level,
            payload,
        }
    }

    /// Render as a JSON value. Serialization of these types cannot fail;
    /// a null is returned if it ever does.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }

    pub fn as_crud(&self) -> Option<&CrudEvent> {
        match &self.payload {
            AuditPayload::Crud(e) => Some(e),
            _ => None,
        }
    }

    pub fn as_validation(&self) -> Option<&ValidationEvent> {
        match &self.payload {
            AuditPayload::Validation(e) => Some(e),
            _ => None,
        }
    }

    pub fn as_business_error(&self) -> Option<&BusinessErrorEvent> {
        match &self.payload {
            AuditPayload::BusinessError(e) => Some(e),
            _ => None,
        }
    }

    pub fn as_performance(&self) -> Option<&PerformanceEvent> {
        match &self.payload {
            AuditPayload::Performance(e) => Some(e),
            _ => None,
        }
    }

    pub fn as_data_access(&self) -> Option<&DataAccessEvent> {
        match &self.payload {
            AuditPayload::DataAccess(e) => Some(e),
            _ => None,
        }
    }
}
