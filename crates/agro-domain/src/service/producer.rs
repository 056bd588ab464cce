//! Producer lifecycle.

use std::sync::Arc;

use agro_audit::{
    redact_presence, AuditTrail, CrudAction, DataAccessAction, DataAccessEvent, SensitiveDataType,
};
use agro_core::{Producer, ProducerDraft, ProducerId, Resource};
use serde_json::{json, Value};

use super::{Operation, ServiceSettings};
use crate::context::RequestContext;
use crate::error::DomainError;
use crate::ownership::validate_identification;
use crate::repository::ProducerRepository;

/// Audit details for a producer write. Tax IDs are never included, only
/// whether each was supplied.
fn write_details(producer: &Producer) -> Value {
    json!({
        "cpf": redact_presence(producer.tax_id.cpf().is_some()),
        "cnpj": redact_presence(producer.tax_id.cnpj().is_some()),
        "nome_produtor": producer.name,
    })
}

#[derive(Clone)]
pub struct ProducerService {
    repo: Arc<dyn ProducerRepository>,
    audit: AuditTrail,
    settings: ServiceSettings,
}

impl ProducerService {
    pub fn new(repo: Arc<dyn ProducerRepository>, audit: AuditTrail, settings: ServiceSettings) -> Self {
        Self {
            repo,
            audit,
            settings,
        }
    }

    fn op<'a>(&'a self, ctx: &'a RequestContext, action: CrudAction) -> Operation<'a> {
        Operation::start(&self.audit, &self.settings, ctx, action, Resource::Producer)
    }

    /// Build a producer from `draft`: name rule first, then identification.
    fn build(&self, id: ProducerId, draft: &ProducerDraft) -> Result<Producer, DomainError> {
        let name = draft.validated_name()?;
        let tax_id = validate_identification(&self.audit, draft.cpf(), draft.cnpj())?;
        Ok(Producer { id, tax_id, name })
    }

    async fn load(&self, id: ProducerId) -> Result<Producer, DomainError> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found(Resource::Producer, id))
    }

    pub async fn create(
        &self,
        ctx: &RequestContext,
        draft: ProducerDraft,
    ) -> Result<Producer, DomainError> {
        let op = self.op(ctx, CrudAction::Create);
        let result = async {
            let producer = self.build(ProducerId::new(), &draft)?;
            Ok::<_, DomainError>(self.repo.save(producer).await?)
        }
        .await;
        op.finish(result, |p| (Some(p.id.to_string()), Some(write_details(p))))
    }

    pub async fn get(&self, ctx: &RequestContext, id: ProducerId) -> Result<Producer, DomainError> {
        let op = self.op(ctx, CrudAction::Read);
        let result = self.load(id).await;
        op.finish(result, |p| (Some(p.id.to_string()), None))
    }

    /// All producers. Recorded as a sensitive read.
    pub async fn list(&self, ctx: &RequestContext) -> Result<Vec<Producer>, DomainError> {
        let op = self.op(ctx, CrudAction::Read);
        let result = self.repo.list().await.map_err(DomainError::from);
        op.finish_list("LIST_PRODUTORES", result, |op, count| {
            op.audit().log_data_access(
                DataAccessEvent::new(
                    op.ctx().actor(),
                    DataAccessAction::Read,
                    SensitiveDataType::ProducerData,
                )
                .with_count(count)
                .with_ip(op.ctx().ip.clone())
                .with_user_agent(op.ctx().user_agent.clone()),
            );
        })
    }

    /// Replace name and identification of an existing producer.
    pub async fn update(
        &self,
        ctx: &RequestContext,
        id: ProducerId,
        draft: ProducerDraft,
    ) -> Result<Producer, DomainError> {
        let op = self.op(ctx, CrudAction::Update);
        let result = async {
            let existing = self.load(id).await?;
            let producer = self.build(existing.id, &draft)?;
            Ok::<_, DomainError>(self.repo.save(producer).await?)
        }
        .await;
        op.finish(result, |p| (Some(p.id.to_string()), Some(write_details(p))))
    }

    /// Delete a producer with its properties and crop seasons.
    pub async fn delete(&self, ctx: &RequestContext, id: ProducerId) -> Result<(), DomainError> {
        let op = self.op(ctx, CrudAction::Delete);
        let result = match self.repo.delete(id).await {
            Ok(0) => Err(DomainError::not_found(Resource::Producer, id)),
            Ok(_) => Ok(()),
            Err(e) => Err(e.into()),
        };
        op.finish(result, |_| (Some(id.to_string()), None))
    }
}
