//! Property lifecycle, scoped to an owning producer.

use std::sync::Arc;

use agro_audit::{AuditTrail, CrudAction, DataAccessAction, DataAccessEvent, SensitiveDataType};
use agro_core::{ProducerId, Property, PropertyDraft, PropertyId, Resource};
use serde_json::{json, Value};

use super::{Operation, ServiceSettings};
use crate::context::RequestContext;
use crate::error::DomainError;
use crate::invariants::AreaInvariantChecker;
use crate::ownership::OwnershipResolver;
use crate::repository::PropertyRepository;

fn write_details(property: &Property) -> Value {
    json!({
        "producer_id": property.producer_id,
        "nome_propriedade": property.name,
        "area_total": property.area_total.value(),
    })
}

#[derive(Clone)]
pub struct PropertyService {
    repo: Arc<dyn PropertyRepository>,
    resolver: OwnershipResolver,
    checker: AreaInvariantChecker,
    audit: AuditTrail,
    settings: ServiceSettings,
}

impl PropertyService {
    pub fn new(
        repo: Arc<dyn PropertyRepository>,
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
        Operation::start(&self.audit, &self.settings, ctx, action, Resource::Property)
    }

    /// Field rules, then the area-sum invariant.
    fn build(
        &self,
        id: PropertyId,
        producer_id: ProducerId,
        draft: PropertyDraft,
    ) -> Result<Property, DomainError> {
        let property = draft.into_property(id, producer_id)?;
        self.checker.validate_areas(
            Resource::Property,
            property.area_total,
            property.area_arable,
            property.area_vegetation,
        )?;
        Ok(property)
    }

    pub async fn create(
        &self,
        ctx: &RequestContext,
        producer_id: ProducerId,
        draft: PropertyDraft,
    ) -> Result<Property, DomainError> {
        let op = self.op(ctx, CrudAction::Create);
        let result = async {
            self.resolver.resolve_producer(producer_id).await?;
            let property = self.build(PropertyId::new(), producer_id, draft)?;
            Ok::<_, DomainError>(self.repo.save(property).await?)
        }
        .await;
        op.finish(result, |p| (Some(p.id.to_string()), Some(write_details(p))))
    }

    pub async fn get(
        &self,
        ctx: &RequestContext,
        producer_id: ProducerId,
        id: PropertyId,
    ) -> Result<Property, DomainError> {
        let op = self.op(ctx, CrudAction::Read);
        let result = self.resolver.resolve_property(id, producer_id).await;
        op.finish(result, |p| (Some(p.id.to_string()), None))
    }

    /// The producer's properties. Recorded as a sensitive read.
    pub async fn list_for_producer(
        &self,
        ctx: &RequestContext,
        producer_id: ProducerId,
    ) -> Result<Vec<Property>, DomainError> {
        let op = self.op(ctx, CrudAction::Read);
        let result = async {
            self.resolver.resolve_producer(producer_id).await?;
            Ok::<_, DomainError>(self.repo.list_for_producer(producer_id).await?)
        }
        .await;
        op.finish_list("LIST_PROPRIEDADES", result, |op, count| {
            op.audit().log_data_access(
                DataAccessEvent::new(
                    op.ctx().actor(),
                    DataAccessAction::Read,
                    SensitiveDataType::PropertyData,
                )
                .with_count(count)
                .with_ip(op.ctx().ip.clone())
                .with_user_agent(op.ctx().user_agent.clone()),
            );
        })
    }

    pub async fn update(
        &self,
        ctx: &RequestContext,
        producer_id: ProducerId,
        id: PropertyId,
        draft: PropertyDraft,
    ) -> Result<Property, DomainError> {
        let op = self.op(ctx, CrudAction::Update);
        let result = async {
            let existing = self.resolver.resolve_property(id, producer_id).await?;
            let property = self.build(existing.id, existing.producer_id, draft)?;
            Ok::<_, DomainError>(self.repo.save(property).await?)
        }
        .await;
        op.finish(result, |p| (Some(p.id.to_string()), Some(write_details(p))))
    }

    /// Delete a property with its crop seasons.
    pub async fn delete(
        &self,
        ctx: &RequestContext,
        producer_id: ProducerId,
        id: PropertyId,
    ) -> Result<(), DomainError> {
        let op = self.op(ctx, CrudAction::Delete);
        let result = async {
            self.resolver.resolve_property(id, producer_id).await?;
            match self.repo.delete(id).await? {
                0 => Err(DomainError::not_found(Resource::Property, id)),
                _ => Ok::<_, DomainError>(()),
            }
        }
        .await;
        op.finish(result, |_| (Some(id.to_string()), None))
    }
}
