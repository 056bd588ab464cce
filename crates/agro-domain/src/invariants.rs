//! # Area and Date Invariants
//!
//! Pure checks plus an [`AreaInvariantChecker`] that wraps the area checks
//! with exactly one `AREA_VALIDATION` audit record per call, pass or fail.
//!
//! All area comparisons are non-strict and run on whole hundredths of a
//! hectare: a sum equal to its capacity is valid.

use agro_audit::{AuditTrail, ValidationAction, ValidationEvent};
use agro_core::{to_hundredths, CropSeasonId, Hectares, PropertyId, Resource, ValidationError};
use chrono::NaiveDate;
use serde_json::json;

use crate::error::DomainError;
use crate::repository::CropSeasonRepository;

/// `arable + vegetation <= total`.
pub fn check_areas(total: Hectares, arable: Hectares, vegetation: Hectares) -> Result<(), ValidationError> {
    let sum = arable.hundredths() + vegetation.hundredths();
    if sum > total.hundredths() {
        return Err(ValidationError::AreaExceedsTotal {
            total: total.value(),
            sum: as_hectares(sum),
        });
    }
    Ok(())
}

/// `existing + planted <= capacity`.
pub fn check_planted_capacity(
    planted: Hectares,
    existing: f64,
    capacity: Hectares,
) -> Result<(), ValidationError> {
    let sum = to_hundredths(existing) + planted.hundredths();
    if sum > capacity.hundredths() {
        return Err(ValidationError::PlantedAreaExceedsArable {
            capacity: capacity.value(),
            sum: as_hectares(sum),
        });
    }
    Ok(())
}

fn as_hectares(hundredths: i64) -> f64 {
    hundredths as f64 / 100.0
}

/// Planting must be strictly before the expected harvest.
pub fn validate_date_order(planting: NaiveDate, harvest: NaiveDate) -> Result<(), ValidationError> {
    if planting >= harvest {
        return Err(ValidationError::InvalidDateOrder);
    }
    Ok(())
}

/// Area checks with audit emission.
#[derive(Debug, Clone)]
pub struct AreaInvariantChecker {
    audit: AuditTrail,
}

impl AreaInvariantChecker {
    pub fn new(audit: AuditTrail) -> Self {
        Self { audit }
    }

    /// Check a property's area split.
    pub fn validate_areas(
        &self,
        resource: Resource,
        total: Hectares,
        arable: Hectares,
        vegetation: Hectares,
    ) -> Result<(), ValidationError> {
        let result = check_areas(total, arable, vegetation);
        self.audit.log_validation(ValidationEvent::new(
            ValidationAction::AreaValidation,
            resource.as_str(),
            result.is_ok(),
            json!({
                "area_total": total.value(),
                "area_arable": arable.value(),
                "area_vegetation": vegetation.value(),
                "soma": as_hectares(arable.hundredths() + vegetation.hundredths()),
            }),
        ));
        result
    }

    /// Check that a season's planted area fits in what is left of the
    /// property's arable area. Sibling seasons are summed through the
    /// repository, skipping `exclude` so an update is not counted twice.
    ///
    /// The sum and the subsequent write are not atomic.
    pub async fn validate_planted_area_capacity(
        &self,
        repo: &dyn CropSeasonRepository,
        planted: Hectares,
        capacity: Hectares,
        property_id: PropertyId,
        exclude: Option<CropSeasonId>,
    ) -> Result<(), DomainError> {
        let existing = repo.sum_planted_area(property_id, exclude).await?;
        let result = check_planted_capacity(planted, existing, capacity);
        self.audit.log_validation(ValidationEvent::new(
            ValidationAction::AreaValidation,
            Resource::CropSeason.as_str(),
            result.is_ok(),
            json!({
                "area_planted": planted.value(),
                "area_existing": as_hectares(to_hundredths(existing)),
                "area_arable": capacity.value(),
                "soma": as_hectares(to_hundredths(existing) + planted.hundredths()),
            }),
        ));
        result.map_err(DomainError::from)
    }
}
