//! Domain and repository error types.

use agro_core::{Resource, ValidationError};
use thiserror::Error;

/// The unique key a write collided with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UniqueField {
    Cpf,
    Cnpj,
}

impl UniqueField {
    /// Column name used by persistence adapters.
    pub fn column(&self) -> &'static str {
        match self {
            Self::Cpf => "cpf",
            Self::Cnpj => "cnpj",
        }
    }

    /// User-facing conflict message.
    pub fn conflict_message(&self) -> &'static str {
        match self {
            Self::Cpf => "CPF já cadastrado no sistema",
            Self::Cnpj => "CNPJ já cadastrado no sistema",
        }
    }
}

/// Failure reported by a repository implementation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RepositoryError {
    #[error("unique constraint violated on {}", .field.column())]
    UniqueViolation { field: UniqueField },

    #[error("persistence backend error: {0}")]
    Backend(String),
}

/// Error returned by every domain service operation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    /// Caller input violated a field rule or invariant.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The record does not exist or is not owned by the caller's scope.
    #[error("{}", .resource.not_found_message(.id))]
    NotFound { resource: Resource, id: String },

    /// A unique tax ID is already registered.
    #[error("{}", .0.conflict_message())]
    Conflict(UniqueField),

    /// Persistence failed.
    #[error("upstream failure: {0}")]
    Upstream(#[source] RepositoryError),
}

impl DomainError {
    pub fn not_found(resource: Resource, id: impl ToString) -> Self {
        Self::NotFound {
            resource,
            id: id.to_string(),
        }
    }

    /// Stable machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation(e) => e.code(),
            Self::NotFound { .. } => "NOT_FOUND",
            Self::Conflict(_) => "CONFLICT",
            Self::Upstream(_) => "UPSTREAM",
        }
    }
}

impl From<RepositoryError> for DomainError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::UniqueViolation { field } => Self::Conflict(field),
            other => Self::Upstream(other),
        }
    }
}
