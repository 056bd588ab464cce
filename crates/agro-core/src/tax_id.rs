//! # Brazilian Tax IDs
//!
//! CPF (individuals, 11 digits) and CNPJ (legal entities, 14 digits) are
//! both protected by two trailing mod-11 check digits.
//!
//! ## Validation
//!
//! 1. Strip punctuation (`.`, `-`, `/`, whitespace). Any other non-digit
//!    character rejects the value.
//! 2. Reject on wrong digit count.
//! 3. Reject sequences of one repeated digit (`111.111.111-11` passes the
//!    mod-11 arithmetic but is not an issued number).
//! 4. Recompute both check digits and compare.
//!
//! [`is_valid_cpf`] / [`is_valid_cnpj`] treat an absent value as valid;
//! whether a document must be present is decided by the producer
//! identification rule, not here.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

const CPF_LEN: usize = 11;
const CNPJ_LEN: usize = 14;

const CNPJ_FIRST_WEIGHTS: [u32; 12] = [5, 4, 3, 2, 9, 8, 7, 6, 5, 4, 3, 2];
const CNPJ_SECOND_WEIGHTS: [u32; 13] = [6, 5, 4, 3, 2, 9, 8, 7, 6, 5, 4, 3, 2];

/// Strip accepted punctuation and return the digit values, or `None` if any
/// other character is present.
fn normalize(value: &str) -> Option<Vec<u32>> {
    let mut digits = Vec::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '.' | '-' | '/' => {}
            c if c.is_whitespace() => {}
            c => digits.push(c.to_digit(10)?),
        }
    }
    Some(digits)
}

fn all_same(digits: &[u32]) -> bool {
    digits.windows(2).all(|w| w[0] == w[1])
}

/// Mod-11 check digit over `digits` with the given weights.
fn check_digit(digits: &[u32], weights: impl Iterator<Item = u32>) -> u32 {
    let sum: u32 = digits.iter().zip(weights).map(|(d, w)| d * w).sum();
    let remainder = sum % 11;
    if remainder < 2 {
        0
    } else {
        11 - remainder
    }
}

/// Compute the two CPF check digits for a 9-digit base.
fn cpf_check_digits(base: &[u32]) -> (u32, u32) {
    let first = check_digit(&base[..9], (2..=10).rev());
    let mut extended = base[..9].to_vec();
    extended.push(first);
    let second = check_digit(&extended, (2..=11).rev());
    (first, second)
}

/// Compute the two CNPJ check digits for a 12-digit base.
fn cnpj_check_digits(base: &[u32]) -> (u32, u32) {
    let first = check_digit(&base[..12], CNPJ_FIRST_WEIGHTS.iter().copied());
    let mut extended = base[..12].to_vec();
    extended.push(first);
    let second = check_digit(&extended, CNPJ_SECOND_WEIGHTS.iter().copied());
    (first, second)
}

fn cpf_digits_valid(digits: &[u32]) -> bool {
    if digits.len() != CPF_LEN || all_same(digits) {
        return false;
    }
    cpf_check_digits(digits) == (digits[9], digits[10])
}

fn cnpj_digits_valid(digits: &[u32]) -> bool {
    if digits.len() != CNPJ_LEN || all_same(digits) {
        return false;
    }
    cnpj_check_digits(digits) == (digits[12], digits[13])
}

/// Whether `value` is an acceptable CPF. `None` is accepted.
pub fn is_valid_cpf(value: Option<&str>) -> bool {
    match value {
        None => true,
        Some(v) => normalize(v).is_some_and(|d| cpf_digits_valid(&d)),
    }
}

/// Whether `value` is an acceptable CNPJ. `None` is accepted.
pub fn is_valid_cnpj(value: Option<&str>) -> bool {
    match value {
        None => true,
        Some(v) => normalize(v).is_some_and(|d| cnpj_digits_valid(&d)),
    }
}

fn digits_to_string(digits: &[u32]) -> String {
    digits
        .iter()
        .filter_map(|d| char::from_digit(*d, 10))
        .collect()
}

/// Helper macro for `Deserialize` on validated string newtypes: parse a
/// plain string, then route it through `new()` so that invalid values are
/// rejected at deserialization time.
macro_rules! impl_validating_deserialize {
    ($ty:ident) => {
        impl<'de> Deserialize<'de> for $ty {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                let raw = String::deserialize(deserializer)?;
                Self::new(raw).map_err(serde::de::Error::custom)
            }
        }
    };
}

/// A checksum-valid CPF, stored as its 11 normalized digits.
///
/// `Debug` never prints the number; `Display` and serialization render the
/// punctuated form `000.000.000-00`.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Cpf(String);

impl_validating_deserialize!(Cpf);

impl Cpf {
    /// Validate and normalize a CPF.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidCpf`] if the value fails any step
    /// of the validation pipeline.
    pub fn new(value: impl AsRef<str>) -> Result<Self, ValidationError> {
        let digits = normalize(value.as_ref()).ok_or(ValidationError::InvalidCpf)?;
        if !cpf_digits_valid(&digits) {
            return Err(ValidationError::InvalidCpf);
        }
        Ok(Self(digits_to_string(&digits)))
    }

    /// The 11 normalized digits.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Punctuated form: `000.000.000-00`.
    pub fn formatted(&self) -> String {
        format!(
            "{}.{}.{}-{}",
            &self.0[..3],
            &self.0[3..6],
            &self.0[6..9],
            &self.0[9..]
        )
    }
}

impl std::fmt::Debug for Cpf {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Cpf([REDACTED])")
    }
}

impl std::fmt::Display for Cpf {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.formatted())
    }
}

impl Serialize for Cpf {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.formatted())
    }
}

/// A checksum-valid CNPJ, stored as its 14 normalized digits.
///
/// `Debug` never prints the number; `Display` and serialization render the
/// punctuated form `00.000.000/0000-00`.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Cnpj(String);

impl_validating_deserialize!(Cnpj);

impl Cnpj {
    /// Validate and normalize a CNPJ.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidCnpj`] if the value fails any step
    /// of the validation pipeline.
    pub fn new(value: impl AsRef<str>) -> Result<Self, ValidationError> {
        let digits = normalize(value.as_ref()).ok_or(ValidationError::InvalidCnpj)?;
        if !cnpj_digits_valid(&digits) {
            return Err(ValidationError::InvalidCnpj);
        }
        Ok(Self(digits_to_string(&digits)))
    }

    /// The 14 normalized digits.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Punctuated form: `00.000.000/0000-00`.
    pub fn formatted(&self) -> String {
        format!(
            "{}.{}.{}/{}-{}",
            &self.0[..2],
            &self.0[2..5],
            &self.0[5..8],
            &self.0[8..12],
            &self.0[12..]
        )
    }
}

impl std::fmt::Debug for Cnpj {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Cnpj([REDACTED])")
    }
}

impl std::fmt::Display for Cnpj {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.formatted())
    }
}

impl Serialize for Cnpj {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.formatted())
    }
}

/// The single national document identifying a producer.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TaxId {
    /// An individual, identified by CPF.
    Cpf(Cpf),
    /// A legal entity, identified by CNPJ.
    Cnpj(Cnpj),
}

impl TaxId {
    /// The CPF, when this producer is an individual.
    pub fn cpf(&self) -> Option<&Cpf> {
        match self {
            Self::Cpf(cpf) => Some(cpf),
            Self::Cnpj(_) => None,
        }
    }

    /// The CNPJ, when this producer is a legal entity.
    pub fn cnpj(&self) -> Option<&Cnpj> {
        match self {
            Self::Cpf(_) => None,
            Self::Cnpj(cnpj) => Some(cnpj),
        }
    }

    /// `"CPF"` or `"CNPJ"`.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Cpf(_) => "CPF",
            Self::Cnpj(_) => "CNPJ",
        }
    }
}
