//! # Validation Errors
//!
//! Every rule a caller can violate by sending bad input. The `Display`
//! output of each variant is the literal, user-facing message; its wording
//! is part of the public contract and changing it is a breaking change.
//! [`ValidationError::code`] gives the stable machine-readable rule name.

use thiserror::Error;

use crate::area::AreaField;

/// Client input is malformed or violates a stated invariant.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// CPF failed normalization, length, repeated-digit or checksum checks.
    #[error("CPF inválido")]
    InvalidCpf,

    /// CNPJ failed normalization, length, repeated-digit or checksum checks.
    #[error("CNPJ inválido")]
    InvalidCnpj,

    /// Neither CPF nor CNPJ was supplied.
    #[error("É necessário fornecer pelo menos um documento de identificação (CPF ou CNPJ)")]
    MissingIdentification,

    /// Both CPF and CNPJ were supplied.
    #[error("Não é permitido fornecer CPF e CNPJ simultaneamente")]
    ConflictingIdentification,

    /// `arable + vegetation > total` on a property.
    #[error("A soma das áreas agricultável e de vegetação não pode exceder a área total")]
    AreaExceedsTotal {
        /// Declared total area.
        total: f64,
        /// Arable plus vegetation.
        sum: f64,
    },

    /// Planted area across the seasons of a property exceeds its arable area.
    #[error("A soma das áreas plantadas não pode exceder a área agricultável da propriedade")]
    PlantedAreaExceedsArable {
        /// Arable area of the property.
        capacity: f64,
        /// Sibling planted area plus the candidate season.
        sum: f64,
    },

    /// Planting date is not strictly before the expected harvest date.
    #[error("A data de plantio deve ser anterior à data prevista de colheita")]
    InvalidDateOrder,

    /// An area figure is above the registry ceiling.
    #[error("Área {field} não pode exceder 1 milhão de hectares")]
    AreaAboveCeiling {
        /// Which figure.
        field: AreaField,
    },

    /// An area figure is negative.
    #[error("Área {field} não pode ser negativa")]
    NegativeArea {
        /// Which figure.
        field: AreaField,
    },

    /// A descriptive field failed its format or length rule.
    #[error("{message}")]
    InvalidField {
        /// Name of the offending field.
        field: &'static str,
        /// User-facing message.
        message: String,
    },
}

impl ValidationError {
    /// Stable rule code for this violation.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidCpf => "INVALID_CPF",
            Self::InvalidCnpj => "INVALID_CNPJ",
            Self::MissingIdentification => "MISSING_IDENTIFICATION",
            Self::ConflictingIdentification => "CONFLICTING_IDENTIFICATION",
            Self::AreaExceedsTotal { .. } => "AREA_EXCEEDS_TOTAL",
            Self::PlantedAreaExceedsArable { .. } => "PLANTED_AREA_EXCEEDS_ARABLE",
            Self::InvalidDateOrder => "INVALID_DATE_ORDER",
            Self::AreaAboveCeiling { .. } | Self::NegativeArea { .. } => "AREA_OUT_OF_RANGE",
            Self::InvalidField { .. } => "INVALID_FIELD",
        }
    }

    /// Shorthand for a descriptive-field violation.
    pub fn field(field: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidField {
            field,
            message: message.into(),
        }
    }
}
