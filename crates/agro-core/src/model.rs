//! # Entity Records and Input Drafts
//!
//! The three persisted records and the unvalidated input they are built
//! from. Relations are explicit foreign keys (`producer_id`,
//! `property_id`); there is no navigation from a parent to its children.
//!
//! Drafts carry raw caller input. Their `into_*` conversions apply the
//! field-level rules (lengths, UF code, area ranges) and nothing else:
//! cross-field invariants (area sum, date order, planted-area capacity,
//! CPF XOR CNPJ) are checked by the domain layer so that each check can be
//! audited.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::area::{AreaField, Hectares};
use crate::error::ValidationError;
use crate::identity::{CropSeasonId, PropertyId, ProducerId};
use crate::tax_id::TaxId;
use crate::temporal::Timestamp;

/// Check that `value` (trimmed) has between `min` and `max` characters.
fn check_length(
    field: &'static str,
    label: &str,
    value: &str,
    min: usize,
    max: usize,
) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    let len = trimmed.chars().count();
    if len < min || len > max {
        return Err(ValidationError::field(
            field,
            format!("{label} deve ter entre {min} e {max} caracteres"),
        ));
    }
    Ok(trimmed.to_string())
}

fn non_blank(value: Option<&String>) -> Option<&str> {
    value.map(|s| s.trim()).filter(|s| !s.is_empty())
}

// ---------------------------------------------------------------------------
// Producer
// ---------------------------------------------------------------------------

/// A person or legal entity identified by exactly one tax ID.
#[derive(Debug, Clone, PartialEq)]
pub struct Producer {
    pub id: ProducerId,
    pub tax_id: TaxId,
    pub name: String,
}

#[derive(Serialize)]
struct ProducerView<'a> {
    id: &'a ProducerId,
    cpf: Option<String>,
    cnpj: Option<String>,
    name: &'a str,
}

impl Serialize for Producer {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        ProducerView {
            id: &self.id,
            cpf: self.tax_id.cpf().map(|c| c.formatted()),
            cnpj: self.tax_id.cnpj().map(|c| c.formatted()),
            name: &self.name,
        }
        .serialize(serializer)
    }
}

/// Caller input for creating or replacing a producer.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProducerDraft {
    #[serde(default)]
    pub cpf: Option<String>,
    #[serde(default)]
    pub cnpj: Option<String>,
    pub name: String,
}

impl ProducerDraft {
    /// The CPF, treating blank strings as absent.
    pub fn cpf(&self) -> Option<&str> {
        non_blank(self.cpf.as_ref())
    }

    /// The CNPJ, treating blank strings as absent.
    pub fn cnpj(&self) -> Option<&str> {
        non_blank(self.cnpj.as_ref())
    }

    /// The display name after field rules (3 to 255 characters).
    pub fn validated_name(&self) -> Result<String, ValidationError> {
        check_length("name", "Nome do produtor", &self.name, 3, 255)
    }
}

// ---------------------------------------------------------------------------
// Property
// ---------------------------------------------------------------------------

/// A tract of land owned by one producer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Property {
    pub id: PropertyId,
    pub producer_id: ProducerId,
    pub name: String,
    pub city: String,
    /// Two-letter UF code.
    pub state: String,
    pub area_total: Hectares,
    pub area_arable: Hectares,
    pub area_vegetation: Hectares,
}

/// Caller input for creating or replacing a property.
#[derive(Debug, Clone, Deserialize)]
pub struct PropertyDraft {
    pub name: String,
    pub city: String,
    pub state: String,
    pub area_total: f64,
    pub area_arable: f64,
    pub area_vegetation: f64,
}

impl PropertyDraft {
    /// Apply field rules and build the record.
    ///
    /// # Errors
    ///
    /// Returns the first violated field rule. The area-sum invariant is
    /// *not* checked here.
    pub fn into_property(
        self,
        id: PropertyId,
        producer_id: ProducerId,
    ) -> Result<Property, ValidationError> {
        let name = check_length("name", "Nome da propriedade", &self.name, 3, 255)?;
        let city = check_length("city", "Cidade", &self.city, 3, 100)?;
        let state = self.state.trim();
        if state.len() != 2 || !state.chars().all(|c| c.is_ascii_uppercase()) {
            return Err(ValidationError::field(
                "state",
                "Estado deve ser uma sigla de 2 letras maiúsculas",
            ));
        }
        Ok(Property {
            id,
            producer_id,
            name,
            city,
            state: state.to_string(),
            area_total: Hectares::new(AreaField::Total, self.area_total)?,
            area_arable: Hectares::new(AreaField::Arable, self.area_arable)?,
            area_vegetation: Hectares::new(AreaField::Vegetation, self.area_vegetation)?,
        })
    }
}

// ---------------------------------------------------------------------------
// CropSeason
// ---------------------------------------------------------------------------

/// One crop planted on a property for one harvest year.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CropSeason {
    pub id: CropSeasonId,
    pub property_id: PropertyId,
    pub crop_name: String,
    pub harvest_year: i32,
    pub planting_date: NaiveDate,
    pub expected_harvest_date: NaiveDate,
    pub planted_area: Hectares,
    pub created_at: Timestamp,
}

/// Caller input for creating or replacing a crop season.
#[derive(Debug, Clone, Deserialize)]
pub struct CropSeasonDraft {
    pub property_id: PropertyId,
    pub crop_name: String,
    pub harvest_year: i32,
    pub planting_date: NaiveDate,
    pub expected_harvest_date: NaiveDate,
    pub planted_area: f64,
}

impl CropSeasonDraft {
    /// Apply field rules and build the record.
    ///
    /// # Errors
    ///
    /// Returns the first violated field rule. Date order and planted-area
    /// capacity are *not* checked here.
    pub fn into_crop_season(
        self,
        id: CropSeasonId,
        created_at: Timestamp,
    ) -> Result<CropSeason, ValidationError> {
        let crop_name = check_length("crop_name", "Nome da cultura", &self.crop_name, 2, 100)?;
        if !(2000..=2100).contains(&self.harvest_year) {
            return Err(ValidationError::field(
                "harvest_year",
                "Ano da safra deve estar entre 2000 e 2100",
            ));
        }
        Ok(CropSeason {
            id,
            property_id: self.property_id,
            crop_name,
            harvest_year: self.harvest_year,
            planting_date: self.planting_date,
            expected_harvest_date: self.expected_harvest_date,
            planted_area: Hectares::new(AreaField::Planted, self.planted_area)?,
            created_at,
        })
    }
}
