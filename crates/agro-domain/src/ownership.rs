//! # Ownership Resolution
//!
//! Owner-scoped lookups for properties and crop seasons. A record that
//! exists under a different producer resolves exactly like a record that
//! does not exist at all: [`DomainError::NotFound`] with the same message.
//!
//! Also home to the producer identification rule (CPF XOR CNPJ).

use std::sync::Arc;

use agro_audit::{AuditTrail, ValidationAction, ValidationEvent};
use agro_core::{
    Cnpj, Cpf, CropSeason, CropSeasonId, Producer, ProducerId, Property, PropertyId, Resource,
    TaxId, ValidationError,
};
use serde_json::json;

use crate::error::DomainError;
use crate::repository::{CropSeasonRepository, PropertyRepository, ProducerRepository};

#[derive(Clone)]
pub struct OwnershipResolver {
    producers: Arc<dyn ProducerRepository>,
    properties: Arc<dyn PropertyRepository>,
    crop_seasons: Arc<dyn CropSeasonRepository>,
}

impl OwnershipResolver {
    pub fn new(
        producers: Arc<dyn ProducerRepository>,
        properties: Arc<dyn PropertyRepository>,
        crop_seasons: Arc<dyn CropSeasonRepository>,
    ) -> Self {
        Self {
            producers,
            properties,
            crop_seasons,
        }
    }

    /// The owner itself. Child collections are only reachable through an
    /// existing producer.
    pub async fn resolve_producer(&self, id: ProducerId) -> Result<Producer, DomainError> {
        self.producers
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found(Resource::Producer, id))
    }

    pub async fn resolve_property(
        &self,
        id: PropertyId,
        owner: ProducerId,
    ) -> Result<Property, DomainError> {
        self.properties
            .find_for_producer(id, owner)
            .await?
            .ok_or_else(|| DomainError::not_found(Resource::Property, id))
    }

    pub async fn resolve_crop_season(
        &self,
        id: CropSeasonId,
        owner: ProducerId,
    ) -> Result<CropSeason, DomainError> {
        self.crop_seasons
            .find_for_producer(id, owner)
            .await?
            .ok_or_else(|| DomainError::not_found(Resource::CropSeason, id))
    }
}

/// Enforce that exactly one of `cpf` / `cnpj` is supplied and that it
/// passes its checksum.
///
/// Emits one VALIDATION record per call carrying `hasCpf` and `hasCnpj`,
/// plus `documentValid` when exactly one document was supplied. The action
/// is `CPF_VALIDATION` whenever a CPF is present.
pub fn validate_identification(
    audit: &AuditTrail,
    cpf: Option<&str>,
    cnpj: Option<&str>,
) -> Result<TaxId, ValidationError> {
    let has_cpf = cpf.is_some();
    let has_cnpj = cnpj.is_some();
    let action = if has_cpf {
        ValidationAction::CpfValidation
    } else {
        ValidationAction::CnpjValidation
    };

    let mut details = json!({ "hasCpf": has_cpf, "hasCnpj": has_cnpj });
    let result = match (cpf, cnpj) {
        (Some(_), Some(_)) => Err(ValidationError::ConflictingIdentification),
        (None, None) => Err(ValidationError::MissingIdentification),
        (Some(raw), None) => Cpf::new(raw).map(TaxId::Cpf),
        (None, Some(raw)) => Cnpj::new(raw).map(TaxId::Cnpj),
    };
    if has_cpf != has_cnpj {
        details["documentValid"] = json!(result.is_ok());
    }

    audit.log_validation(ValidationEvent::new(
        action,
        Resource::Producer.as_str(),
        result.is_ok(),
        details,
    ));
    result
}
