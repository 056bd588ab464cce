//! Crop season lifecycle, scoped to the producer that owns the property.

use std::sync::Arc;

use agro_audit::{AuditTrail, CrudAction};
use agro_core::{CropSeason, CropSeasonDraft, CropSeasonId, ProducerId, Resource, Timestamp};
use serde_json::{json, Value};

use super::{Operation, ServiceSettings};
use crate::context::RequestContext;
use crate::error::DomainError;
use crate::invariants::{validate_date_order, AreaInvariantChecker};
use crate::ownership::OwnershipResolver;
use crate::repository::CropSeasonRepository;

fn write_details(season: &CropSeason) -> Value {
    json!({
        "property_id": season.property_id,
        "cultura": season.crop_name,
        "ano_safra": season.harvest_year,
        "area_plantada": season.planted_area.value(),
    })
}

#[derive(Clone)]
pub struct CropSeasonService {
    repo: Arc<dyn CropSeasonRepository>,
    resolver: OwnershipResolver,
    checker: AreaInvariantChecker,
    audit: AuditTrail,
    settings: ServiceSettings,
}

impl CropSeasonService {
    pub fn new(
        repo: Arc<dyn CropSeasonRepository>,
        resolver: OwnershipResolver,
        audit: AuditTrail,
        settings: ServiceSettings,
    ) -> Self {
        Self {
            repo,
            resolver,
            checker: AreaInvariantChecker::new(audit.clone()),
            audit,
            settings,
        }
    }

    fn op<'a>(&'a self, ctx: &'a RequestContext, action: CrudAction) -> Operation<'a> {
        Operation::start(&self.audit, &self.settings, ctx, action, Resource::CropSeason)
    }

    /// Resolve the target property under `producer_id`, apply field rules,
    /// date order, then planted-area capacity (skipping `exclude`).
    async fn build(
        &self,
        producer_id: ProducerId,
        id: CropSeasonId,
        created_at: Timestamp,
        exclude: Option<CropSeasonId>,
        draft: CropSeasonDraft,
    ) -> Result<CropSeason, DomainError> {
        let property = self
            .resolver
            .resolve_property(draft.property_id, producer_id)
            .await?;
        let season = draft.into_crop_season(id, created_at)?;
        validate_date_order(season.planting_date, season.expected_harvest_date)?;
        self.checker
            .validate_planted_area_capacity(
                &*self.repo,
                season.planted_area,
                property.area_arable,
                property.id,
                exclude,
            )
            .await?;
        Ok(season)
    }

    pub async fn create(
        &self,
        ctx: &RequestContext,
        producer_id: ProducerId,
        draft: CropSeasonDraft,
    ) -> Result<CropSeason, DomainError> {
        let op = self.op(ctx, CrudAction::Create);
        let result = async {
            let season = self
                .build(producer_id, CropSeasonId::new(), Timestamp::now(), None, draft)
                .await?;
            Ok::<_, DomainError>(self.repo.save(season).await?)
        }
        .await;
        op.finish(result, |s| (Some(s.id.to_string()), Some(write_details(s))))
    }

    pub async fn get(
        &self,
        ctx: &RequestContext,
        producer_id: ProducerId,
        id: CropSeasonId,
    ) -> Result<CropSeason, DomainError> {
        let op = self.op(ctx, CrudAction::Read);
        let result = self.resolver.resolve_crop_season(id, producer_id).await;
        op.finish(result, |s| (Some(s.id.to_string()), None))
    }

    /// Every season on every property of the producer.
    pub async fn list_for_producer(
        &self,
        ctx: &RequestContext,
        producer_id: ProducerId,
    ) -> Result<Vec<CropSeason>, DomainError> {
        let op = self.op(ctx, CrudAction::Read);
        let result = async {
            self.resolver.resolve_producer(producer_id).await?;
            Ok::<_, DomainError>(self.repo.list_for_producer(producer_id).await?)
        }
        .await;
        op.finish_list("LIST_SAFRAS_CULTURAS", result, |op, count| {
            op.crud_with(json!({ "producer_id": producer_id, "count": count }));
        })
    }

    /// Replace a season. The season may move to another property of the
    /// same producer; its own previous area is excluded from the capacity
    /// sum.
    pub async fn update(
        &self,
        ctx: &RequestContext,
        producer_id: ProducerId,
        id: CropSeasonId,
        draft: CropSeasonDraft,
    ) -> Result<CropSeason, DomainError> {
        let op = self.op(ctx, CrudAction::Update);
        let result = async {
            let existing = self.resolver.resolve_crop_season(id, producer_id).await?;
            let season = self
                .build(producer_id, existing.id, existing.created_at, Some(existing.id), draft)
                .await?;
            Ok::<_, DomainError>(self.repo.save(season).await?)
        }
        .await;
        op.finish(result, |s| (Some(s.id.to_string()), Some(write_details(s))))
    }

    pub async fn delete(
        &self,
        ctx: &RequestContext,
        producer_id: ProducerId,
        id: CropSeasonId,
    ) -> Result<(), DomainError> {
        let op = self.op(ctx, CrudAction::Delete);
        let result = async {
            self.resolver.resolve_crop_season(id, producer_id).await?;
            match self.repo.delete(id).await? {
                0 => Err(DomainError::not_found(Resource::CropSeason, id)),
                _ => Ok::<_, DomainError>(()),
            }
        }
        .await;
        op.finish(result, |_| (Some(id.to_string()), None))
    }
}
