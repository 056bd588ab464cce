//! # Area Figures
//!
//! Property and crop-season areas are expressed in hectares. Each figure
//! must be finite and lie in `[0, MAX_AREA_HECTARES]`; [`Hectares::new`]
//! is the only way to obtain one.
//!
//! Figures are held as whole hundredths of a hectare, the precision of the
//! `NUMERIC(10,2)` columns they are stored in. Sums and comparisons run on
//! the integer form, so `0.1 + 0.2` equals `0.3` exactly.

use serde::{Serialize, Serializer};

use crate::error::ValidationError;

/// Registry ceiling for any single area figure.
pub const MAX_AREA_HECTARES: f64 = 1_000_000.0;

/// Which area figure a value belongs to. Used in messages and audit details.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AreaField {
    /// Total property area.
    Total,
    /// Arable part of a property.
    Arable,
    /// Native vegetation part of a property.
    Vegetation,
    /// Area planted by a crop season.
    Planted,
}

impl AreaField {
    /// The Portuguese qualifier used in user-facing messages.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Total => "total",
            Self::Arable => "agricultável",
            Self::Vegetation => "de vegetação",
            Self::Planted => "plantada",
        }
    }
}

impl std::fmt::Display for AreaField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Round a hectare figure to whole hundredths.
///
/// Used for sums read back from storage, which may carry binary
/// floating-point noise (`0.30000000000000004`).
pub fn to_hundredths(value: f64) -> i64 {
    (value * 100.0).round() as i64
}

/// A validated area in hectares, rounded to two decimals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Hectares(i64);

impl Hectares {
    /// Zero hectares.
    pub const ZERO: Hectares = Hectares(0);

    /// Validate a raw figure for the given field.
    ///
    /// # Errors
    ///
    /// - [`ValidationError::InvalidField`] for NaN or infinite input.
    /// - [`ValidationError::NegativeArea`] below zero.
    /// - [`ValidationError::AreaAboveCeiling`] above [`MAX_AREA_HECTARES`].
    pub fn new(field: AreaField, value: f64) -> Result<Self, ValidationError> {
        if !value.is_finite() {
            return Err(ValidationError::field(
                "area",
                format!("Área {field} deve ser um número válido"),
            ));
        }
        if value < 0.0 {
            return Err(ValidationError::NegativeArea { field });
        }
        if value > MAX_AREA_HECTARES {
            return Err(ValidationError::AreaAboveCeiling { field });
        }
        Ok(Self(to_hundredths(value)))
    }

    /// The figure in hectares.
    pub fn value(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// The figure in whole hundredths of a hectare.
    pub fn hundredths(&self) -> i64 {
        self.0
    }
}

impl Serialize for Hectares {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.value())
    }
}

impl std::fmt::Display for Hectares {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ha", self.value())
    }
}
