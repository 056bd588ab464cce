//! # Audit Event Taxonomy
//!
//! One payload type per category. Field names serialize in camelCase and
//! optional fields are omitted when absent, so a record's JSON shape is
//! fixed per category.

use serde::{Deserialize, Serialize};
use serde_json::Value;

// ---------------------------------------------------------------------------
// Categories and action vocabularies
// ---------------------------------------------------------------------------

/// The category tag carried by every audit record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditCategory {
    Auth,
    Crud,
    Validation,
    BusinessError,
    Performance,
    DataAccess,
    Audit,
}

impl AuditCategory {
    /// Wire name of the category.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Auth => "AUTH",
            Self::Crud => "CRUD",
            Self::Validation => "VALIDATION",
            Self::BusinessError => "BUSINESS_ERROR",
            Self::Performance => "PERFORMANCE",
            Self::DataAccess => "DATA_ACCESS",
            Self::Audit => "AUDIT",
        }
    }

    /// The literal human-readable message for records of this category.
    pub fn message(&self) -> &'static str {
        match self {
            Self::Auth => "Authentication Event",
            Self::Crud => "CRUD Operation",
            Self::Validation => "Validation Event",
            Self::BusinessError => "Business Error",
            Self::Performance => "Performance Metric",
            Self::DataAccess => "Sensitive Data Access",
            Self::Audit => "Audit Event",
        }
    }
}

impl std::fmt::Display for AuditCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What happened in an AUTH record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuthAction {
    Login,
    Logout,
    Register,
    LoginFailed,
}

/// The operation recorded by a CRUD record. Also names the failed
/// operation in BUSINESS_ERROR records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CrudAction {
    Create,
    Read,
    Update,
    Delete,
}

impl CrudAction {
    /// Wire name of the action.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Create => "CREATE",
            Self::Read => "READ",
            Self::Update => "UPDATE",
            Self::Delete => "DELETE",
        }
    }
}

/// Which check a VALIDATION record reports on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ValidationAction {
    /// Producer identification, when a CPF was supplied.
    CpfValidation,
    /// Producer identification, when only a CNPJ was supplied.
    CnpjValidation,
    /// Property area split or crop-season planted-area capacity.
    AreaValidation,
}

/// Sensitive-read actions. The lowercase spellings are part of the wire
/// vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DataAccessAction {
    #[serde(rename = "READ")]
    Read,
    #[serde(rename = "export")]
    Export,
    #[serde(rename = "search")]
    Search,
}

/// The kind of sensitive data a DATA_ACCESS record covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SensitiveDataType {
    Cpf,
    Cnpj,
    ProducerData,
    PropertyData,
}

// ---------------------------------------------------------------------------
// Payloads
// ---------------------------------------------------------------------------

/// AUTH: login / register / logout attempts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthEvent {
    pub action: AuthAction,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

impl AuthEvent {
    pub fn new(action: AuthAction) -> Self {
        Self {
            action,
            user_id: None,
            ip: None,
            user_agent: None,
            details: None,
        }
    }

    pub fn with_user_id(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    pub fn with_ip(mut self, ip: Option<String>) -> Self {
        self.ip = ip;
        self
    }

    pub fn with_user_agent(mut self, user_agent: Option<String>) -> Self {
        self.user_agent = user_agent;
        self
    }

    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }
}

/// CRUD: create / read / update / delete of a tracked resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrudEvent {
    pub user_id: String,
    pub action: CrudAction,
    pub resource: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip: Option<String>,
}

impl CrudEvent {
    pub fn new(user_id: impl Into<String>, action: CrudAction, resource: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            action,
            resource: resource.into(),
            resource_id: None,
            details: None,
            ip: None,
        }
    }

    pub fn with_resource_id(mut self, resource_id: impl ToString) -> Self {
        self.resource_id = Some(resource_id.to_string());
        self
    }

    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    pub fn with_ip(mut self, ip: Option<String>) -> Self {
        self.ip = ip;
        self
    }
}

/// VALIDATION: one invariant check, pass or fail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationEvent {
    pub action: ValidationAction,
    pub resource: String,
    pub success: bool,
    pub details: Value,
}

impl ValidationEvent {
    pub fn new(
        action: ValidationAction,
        resource: impl Into<String>,
        success: bool,
        details: Value,
    ) -> Self {
        Self {
            action,
            resource: resource.into(),
            success,
            details,
        }
    }
}

/// BUSINESS_ERROR: a domain or persistence failure surfaced to the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusinessErrorEvent {
    pub action: String,
    pub resource: String,
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip: Option<String>,
}

impl BusinessErrorEvent {
    pub fn new(
        action: impl Into<String>,
        resource: impl Into<String>,
        error: impl Into<String>,
    ) -> Self {
        Self {
            action: action.into(),
            resource: resource.into(),
            error: error.into(),
            user_id: None,
            details: None,
            ip: None,
        }
    }

    pub fn with_user_id(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    pub fn with_ip(mut self, ip: Option<String>) -> Self {
        self.ip = ip;
        self
    }
}

/// PERFORMANCE: duration of one operation, in milliseconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceEvent {
    pub operation: String,
    pub duration: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

impl PerformanceEvent {
    pub fn new(operation: impl Into<String>, duration_ms: u64) -> Self {
        Self {
            operation: operation.into(),
            duration: duration_ms,
            resource: None,
            details: None,
        }
    }

    pub fn with_resource(mut self, resource: impl Into<String>) -> Self {
        self.resource = Some(resource.into());
        self
    }

    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }
}

/// DATA_ACCESS: reads or exports of sensitive data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataAccessEvent {
    pub user_id: String,
    pub action: DataAccessAction,
    pub data_type: SensitiveDataType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
}

impl DataAccessEvent {
    pub fn new(
        user_id: impl Into<String>,
        action: DataAccessAction,
        data_type: SensitiveDataType,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            action,
            data_type,
            count: None,
            ip: None,
            user_agent: None,
        }
    }

    pub fn with_count(mut self, count: usize) -> Self {
        self.count = Some(count as u64);
        self
    }

    pub fn with_ip(mut self, ip: Option<String>) -> Self {
        self.ip = ip;
        self
    }

    pub fn with_user_agent(mut self, user_agent: Option<String>) -> Self {
        self.user_agent = user_agent;
        self
    }
}

/// AUDIT: catch-all for occurrences the other categories do not cover.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenericAuditEvent {
    pub action: String,
    pub resource: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
}

impl GenericAuditEvent {
    pub fn new(action: impl Into<String>, resource: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            resource: resource.into(),
            user_id: None,
            resource_id: None,
            details: None,
            ip: None,
            user_agent: None,
        }
    }

    pub fn with_user_id(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    pub fn with_resource_id(mut self, resource_id: impl ToString) -> Self {
        self.resource_id = Some(resource_id.to_string());
        self
    }

    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    pub fn with_ip(mut self, ip: Option<String>) -> Self {
        self.ip = ip;
        self
    }

    pub fn with_user_agent(mut self, user_agent: Option<String>) -> Self {
        self.user_agent = user_agent;
        self
    }
}
