//! End-to-end service behavior over the in-memory store, with every audit
//! record captured for inspection.

use std::sync::Arc;

use agro_audit::{AuditCategory, AuditTrail, CrudAction, MemorySink, ValidationAction};
use agro_core::{
    CropSeason, CropSeasonDraft, CropSeasonId, Producer, ProducerDraft, ProducerId, Property,
    PropertyDraft, PropertyId, Resource,
};
use agro_domain::{
    CropSeasonRepository, CropSeasonService, DomainError, MemoryStore, OwnershipResolver,
    PropertyRepository, PropertyService, ProducerRepository, ProducerService, RepositoryError,
    RequestContext, ServiceSettings, UniqueField,
};
use async_trait::async_trait;
use chrono::NaiveDate;

const CPF: &str = "529.982.247-25";
const CNPJ: &str = "11.444.777/0001-61";

struct Harness {
    producers: ProducerService,
    properties: PropertyService,
    seasons: CropSeasonService,
    sink: Arc<MemorySink>,
    ctx: RequestContext,
}

fn harness() -> Harness {
    harness_over(Arc::new(MemoryStore::new()))
}

fn harness_over<S>(store: Arc<S>) -> Harness
where
    S: ProducerRepository + PropertyRepository + CropSeasonRepository + 'static,
{
    let sink = Arc::new(MemorySink::new());
    let audit = AuditTrail::new(sink.clone());
    let settings = ServiceSettings::default();
    let resolver = OwnershipResolver::new(store.clone(), store.clone(), store.clone());
    Harness {
        producers: ProducerService::new(store.clone(), audit.clone(), settings),
        properties: PropertyService::new(store.clone(), resolver.clone(), audit.clone(), settings),
        seasons: CropSeasonService::new(store, resolver, audit, settings),
        sink,
        ctx: RequestContext::for_user("user-1"),
    }
}

fn producer_draft(cpf: Option<&str>, cnpj: Option<&str>) -> ProducerDraft {
    ProducerDraft {
        cpf: cpf.map(String::from),
        cnpj: cnpj.map(String::from),
        name: "João Silva".into(),
    }
}

fn property_draft(total: f64, arable: f64, vegetation: f64) -> PropertyDraft {
    PropertyDraft {
        name: "Fazenda São João".into(),
        city: "Ribeirão Preto".into(),
        state: "SP".into(),
        area_total: total,
        area_arable: arable,
        area_vegetation: vegetation,
    }
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn season_draft(property_id: PropertyId, area: f64) -> CropSeasonDraft {
    CropSeasonDraft {
        property_id,
        crop_name: "Soja".into(),
        harvest_year: 2024,
        planting_date: date(2024, 1, 15),
        expected_harvest_date: date(2024, 5, 15),
        planted_area: area,
    }
}

async fn seeded_producer(h: &Harness, cpf: &str) -> ProducerId {
    h.producers
        .create(&h.ctx, producer_draft(Some(cpf), None))
        .await
        .unwrap()
        .id
}

// ---------------------------------------------------------------------------
// Producers
// ---------------------------------------------------------------------------

#[tokio::test]
async fn create_producer_with_valid_cpf() {
    let h = harness();
    let producer = h
        .producers
        .create(&h.ctx, producer_draft(Some(CPF), None))
        .await
        .unwrap();
    assert_eq!(producer.tax_id.kind(), "CPF");

    let validations = h.sink.by_category(AuditCategory::Validation);
    assert_eq!(validations.len(), 1);
    let v = validations[0].as_validation().unwrap();
    assert_eq!(v.action, ValidationAction::CpfValidation);
    assert!(v.success);

    let cruds = h.sink.by_category(AuditCategory::Crud);
    assert_eq!(cruds.len(), 1);
    let crud = cruds[0].as_crud().unwrap();
    assert_eq!(crud.action, CrudAction::Create);
    assert_eq!(crud.resource, "PRODUTOR");
    assert_eq!(crud.user_id, "user-1");
    let details = crud.details.as_ref().unwrap();
    assert_eq!(details["cpf"], "[REDACTED]");
    assert!(details["cnpj"].is_null());
    assert!(!details.to_string().contains("529"));
}

#[tokio::test]
async fn create_producer_with_both_documents_fails() {
    let h = harness();
    let err = h
        .producers
        .create(&h.ctx, producer_draft(Some(CPF), Some(CNPJ)))
        .await
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "Não é permitido fornecer CPF e CNPJ simultaneamente"
    );

    let v = h.sink.by_category(AuditCategory::Validation);
    assert_eq!(v.len(), 1);
    let event = v[0].as_validation().unwrap();
    assert_eq!(event.action, ValidationAction::CpfValidation);
    assert!(!event.success);
    assert_eq!(event.details["hasCpf"], true);
    assert_eq!(event.details["hasCnpj"], true);

    assert_eq!(h.sink.by_category(AuditCategory::BusinessError).len(), 1);
    assert!(h.sink.by_category(AuditCategory::Crud).is_empty());
}

#[tokio::test]
async fn duplicate_cpf_is_conflict() {
    let h = harness();
    seeded_producer(&h, CPF).await;
    let err = h
        .producers
        .create(&h.ctx, producer_draft(Some("52998224725"), None))
        .await
        .unwrap_err();
    assert_eq!(err, DomainError::Conflict(UniqueField::Cpf));
    assert_eq!(err.to_string(), "CPF já cadastrado no sistema");
}

#[tokio::test]
async fn list_producers_records_sensitive_read_and_performance() {
    let h = harness();
    seeded_producer(&h, CPF).await;
    h.sink.clear();

    let all = h.producers.list(&h.ctx).await.unwrap();
    assert_eq!(all.len(), 1);

    let records = h.sink.records();
    assert_eq!(records.len(), 2);
    let access = records[0].as_data_access().unwrap();
    assert_eq!(access.count, Some(1));
    let perf = records[1].as_performance().unwrap();
    assert_eq!(perf.operation, "LIST_PRODUTORES");
}

#[tokio::test]
async fn delete_missing_producer_is_not_found() {
    let h = harness();
    let id = ProducerId::new();
    let err = h.producers.delete(&h.ctx, id).await.unwrap_err();
    assert_eq!(err.to_string(), format!("Produtor com ID {id} não encontrado"));
    assert_eq!(h.sink.by_category(AuditCategory::BusinessError).len(), 1);
}

#[tokio::test]
async fn update_producer_switches_to_cnpj() {
    let h = harness();
    let id = seeded_producer(&h, CPF).await;
    let updated = h
        .producers
        .update(&h.ctx, id, producer_draft(None, Some(CNPJ)))
        .await
        .unwrap();
    assert_eq!(updated.id, id);
    assert_eq!(updated.tax_id.kind(), "CNPJ");
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

#[tokio::test]
async fn property_area_sum_above_total_fails() {
    let h = harness();
    let owner = seeded_producer(&h, CPF).await;
    h.sink.clear();

    let err = h
        .properties
        .create(&h.ctx, owner, property_draft(1000.0, 800.0, 300.0))
        .await
        .unwrap_err();
    assert_eq!(err.code(), "AREA_EXCEEDS_TOTAL");

    let v = h.sink.by_category(AuditCategory::Validation);
    assert_eq!(v.len(), 1);
    let event = v[0].as_validation().unwrap();
    assert_eq!(event.action, ValidationAction::AreaValidation);
    assert!(!event.success);
    assert_eq!(event.details["soma"], 1100.0);
}

#[tokio::test]
async fn property_area_sum_equal_to_total_passes() {
    let h = harness();
    let owner = seeded_producer(&h, CPF).await;
    assert!(h
        .properties
        .create(&h.ctx, owner, property_draft(1000.0, 800.0, 200.0))
        .await
        .is_ok());
}

#[tokio::test]
async fn property_of_other_producer_is_indistinguishable_from_missing() {
    let h = harness();
    let a = seeded_producer(&h, CPF).await;
    let b = h
        .producers
        .create(&h.ctx, producer_draft(None, Some(CNPJ)))
        .await
        .unwrap()
        .id;
    let b_property = h
        .properties
        .create(&h.ctx, b, property_draft(1000.0, 800.0, 200.0))
        .await
        .unwrap();

    let foreign = h.properties.get(&h.ctx, a, b_property.id).await.unwrap_err();
    let missing_id = PropertyId::new();
    let missing = h.properties.get(&h.ctx, a, missing_id).await.unwrap_err();

    assert_eq!(foreign, DomainError::not_found(Resource::Property, b_property.id));
    assert_eq!(missing, DomainError::not_found(Resource::Property, missing_id));
    assert_eq!(foreign.code(), missing.code());
    assert_eq!(
        foreign.to_string().replace(&b_property.id.to_string(), ""),
        missing.to_string().replace(&missing_id.to_string(), "")
    );
}

#[tokio::test]
async fn property_for_missing_producer_is_not_found() {
    let h = harness();
    let err = h
        .properties
        .create(&h.ctx, ProducerId::new(), property_draft(10.0, 5.0, 5.0))
        .await
        .unwrap_err();
    assert!(err.to_string().starts_with("Produtor com ID"));
}

// ---------------------------------------------------------------------------
// Crop seasons
// ---------------------------------------------------------------------------

#[tokio::test]
async fn planted_area_aggregate_with_update_exclusion() {
    let h = harness();
    let owner = seeded_producer(&h, CPF).await;
    let property = h
        .properties
        .create(&h.ctx, owner, property_draft(1500.0, 1000.0, 500.0))
        .await
        .unwrap();
    let existing = h
        .seasons
        .create(&h.ctx, owner, season_draft(property.id, 600.0))
        .await
        .unwrap();

    let err = h
        .seasons
        .create(&h.ctx, owner, season_draft(property.id, 500.0))
        .await
        .unwrap_err();
    assert_eq!(err.code(), "PLANTED_AREA_EXCEEDS_ARABLE");

    h.sink.clear();
    let updated = h
        .seasons
        .update(&h.ctx, owner, existing.id, season_draft(property.id, 900.0))
        .await
        .unwrap();
    assert_eq!(updated.planted_area.value(), 900.0);
    assert_eq!(updated.created_at, existing.created_at);

    let v = h.sink.by_category(AuditCategory::Validation);
    assert_eq!(v.len(), 1);
    let details = &v[0].as_validation().unwrap().details;
    assert_eq!(details["area_existing"], 0.0);
    assert_eq!(details["soma"], 900.0);
}

#[tokio::test]
async fn planting_after_harvest_fails() {
    let h = harness();
    let owner = seeded_producer(&h, CPF).await;
    let property = h
        .properties
        .create(&h.ctx, owner, property_draft(1500.0, 1000.0, 500.0))
        .await
        .unwrap();
    h.sink.clear();

    let mut draft = season_draft(property.id, 100.0);
    draft.planting_date = date(2024, 5, 15);
    draft.expected_harvest_date = date(2024, 1, 15);
    let err = h.seasons.create(&h.ctx, owner, draft).await.unwrap_err();
    assert_eq!(
        err.to_string(),
        "A data de plantio deve ser anterior à data prevista de colheita"
    );

    let records = h.sink.records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].category, AuditCategory::BusinessError);
}

#[tokio::test]
async fn season_of_other_producer_is_not_found() {
    let h = harness();
    let a = seeded_producer(&h, CPF).await;
    let b = h
        .producers
        .create(&h.ctx, producer_draft(None, Some(CNPJ)))
        .await
        .unwrap()
        .id;
    let property = h
        .properties
        .create(&h.ctx, b, property_draft(1500.0, 1000.0, 500.0))
        .await
        .unwrap();
    let season = h
        .seasons
        .create(&h.ctx, b, season_draft(property.id, 100.0))
        .await
        .unwrap();

    let err = h.seasons.get(&h.ctx, a, season.id).await.unwrap_err();
    assert_eq!(err, DomainError::not_found(Resource::CropSeason, season.id));

    let err = h
        .seasons
        .create(&h.ctx, a, season_draft(property.id, 10.0))
        .await
        .unwrap_err();
    assert_eq!(err, DomainError::not_found(Resource::Property, property.id));
}

#[tokio::test]
async fn every_mutation_emits_exactly_one_outcome_record() {
    let h = harness();
    let owner = seeded_producer(&h, CPF).await;
    let property = h
        .properties
        .create(&h.ctx, owner, property_draft(1500.0, 1000.0, 500.0))
        .await
        .unwrap();
    let season = h
        .seasons
        .create(&h.ctx, owner, season_draft(property.id, 100.0))
        .await
        .unwrap();
    h.seasons.delete(&h.ctx, owner, season.id).await.unwrap();
    h.properties.delete(&h.ctx, owner, property.id).await.unwrap();
    let _ = h.seasons.delete(&h.ctx, owner, season.id).await.unwrap_err();
    h.producers.delete(&h.ctx, owner).await.unwrap();

    let outcomes = h
        .sink
        .records()
        .into_iter()
        .filter(|r| {
            matches!(
                r.category,
                AuditCategory::Crud | AuditCategory::BusinessError
            )
        })
        .count();
    assert_eq!(outcomes, 7);
}

#[tokio::test]
async fn list_seasons_records_crud_read_with_count() {
    let h = harness();
    let owner = seeded_producer(&h, CPF).await;
    let property = h
        .properties
        .create(&h.ctx, owner, property_draft(1500.0, 1000.0, 500.0))
        .await
        .unwrap();
    for area in [100.0, 200.0] {
        h.seasons
            .create(&h.ctx, owner, season_draft(property.id, area))
            .await
            .unwrap();
    }
    h.sink.clear();

    let seasons = h.seasons.list_for_producer(&h.ctx, owner).await.unwrap();
    assert_eq!(seasons.len(), 2);
    let records = h.sink.records();
    let crud = records[0].as_crud().unwrap();
    assert_eq!(crud.action, CrudAction::Read);
    assert_eq!(crud.details.as_ref().unwrap()["count"], 2);
    assert_eq!(records[1].as_performance().unwrap().operation, "LIST_SAFRAS_CULTURAS");
}

#[tokio::test]
async fn decimal_areas_at_their_limits_are_accepted() {
    let h = harness();
    let owner = seeded_producer(&h, CPF).await;
    let property = h
        .properties
        .create(&h.ctx, owner, property_draft(0.3, 0.1, 0.2))
        .await
        .unwrap();
    assert_eq!(property.area_total.value(), 0.3);

    let exact = h
        .properties
        .create(&h.ctx, owner, property_draft(10.0, 0.3, 0.0))
        .await
        .unwrap();
    for _ in 0..3 {
        h.seasons
            .create(&h.ctx, owner, season_draft(exact.id, 0.1))
            .await
            .unwrap();
    }
    let err = h
        .seasons
        .create(&h.ctx, owner, season_draft(exact.id, 0.01))
        .await
        .unwrap_err();
    assert_eq!(err.code(), "PLANTED_AREA_EXCEEDS_ARABLE");
}

// ---------------------------------------------------------------------------
// Backend failures
// ---------------------------------------------------------------------------

/// Delegates to a [`MemoryStore`] but fails the selected calls.
#[derive(Default)]
struct FailingStore {
    inner: MemoryStore,
    fail_save: bool,
    fail_sum: bool,
}

fn backend_down() -> RepositoryError {
    RepositoryError::Backend("connection refused".into())
}

#[async_trait]
impl ProducerRepository for FailingStore {
    async fn find_by_id(&self, id: ProducerId) -> Result<Option<Producer>, RepositoryError> {
        ProducerRepository::find_by_id(&self.inner, id).await
    }

    async fn list(&self) -> Result<Vec<Producer>, RepositoryError> {
        ProducerRepository::list(&self.inner).await
    }

    async fn save(&self, producer: Producer) -> Result<Producer, RepositoryError> {
        if self.fail_save {
            return Err(backend_down());
        }
        ProducerRepository::save(&self.inner, producer).await
    }

    async fn delete(&self, id: ProducerId) -> Result<u64, RepositoryError> {
        ProducerRepository::delete(&self.inner, id).await
    }
}

#[async_trait]
impl PropertyRepository for FailingStore {
    async fn find_for_producer(
        &self,
        id: PropertyId,
        producer_id: ProducerId,
    ) -> Result<Option<Property>, RepositoryError> {
        PropertyRepository::find_for_producer(&self.inner, id, producer_id).await
    }

    async fn list_for_producer(
        &self,
        producer_id: ProducerId,
    ) -> Result<Vec<Property>, RepositoryError> {
        PropertyRepository::list_for_producer(&self.inner, producer_id).await
    }

    async fn save(&self, property: Property) -> Result<Property, RepositoryError> {
        if self.fail_save {
            return Err(backend_down());
        }
        PropertyRepository::save(&self.inner, property).await
    }

    async fn delete(&self, id: PropertyId) -> Result<u64, RepositoryError> {
        PropertyRepository::delete(&self.inner, id).await
    }
}

#[async_trait]
impl CropSeasonRepository for FailingStore {
    async fn find_for_producer(
        &self,
        id: CropSeasonId,
        producer_id: ProducerId,
    ) -> Result<Option<CropSeason>, RepositoryError> {
        CropSeasonRepository::find_for_producer(&self.inner, id, producer_id).await
    }

    async fn list_for_producer(
        &self,
        producer_id: ProducerId,
    ) -> Result<Vec<CropSeason>, RepositoryError> {
        CropSeasonRepository::list_for_producer(&self.inner, producer_id).await
    }

    async fn save(&self, season: CropSeason) -> Result<CropSeason, RepositoryError> {
        if self.fail_save {
            return Err(backend_down());
        }
        CropSeasonRepository::save(&self.inner, season).await
    }

    async fn delete(&self, id: CropSeasonId) -> Result<u64, RepositoryError> {
        CropSeasonRepository::delete(&self.inner, id).await
    }

    async fn sum_planted_area(
        &self,
        property_id: PropertyId,
        exclude: Option<CropSeasonId>,
    ) -> Result<f64, RepositoryError> {
        if self.fail_sum {
            return Err(backend_down());
        }
        self.inner.sum_planted_area(property_id, exclude).await
    }
}

fn assert_single_business_error(sink: &MemorySink, action: &str) {
    let failures = sink.by_category(AuditCategory::BusinessError);
    assert_eq!(failures.len(), 1);
    let event = failures[0].as_business_error().unwrap();
    assert_eq!(event.action, action);
    let details = event.details.as_ref().unwrap();
    assert_eq!(details["code"], "UPSTREAM");
    assert!(details["duration"].is_u64());
    assert!(sink.by_category(AuditCategory::Crud).is_empty());
}

#[tokio::test]
async fn failed_write_is_reraised_unchanged() {
    let h = harness_over(Arc::new(FailingStore {
        fail_save: true,
        ..FailingStore::default()
    }));

    let err = h
        .producers
        .create(&h.ctx, producer_draft(Some(CPF), None))
        .await
        .unwrap_err();
    assert_eq!(err, DomainError::Upstream(backend_down()));
    assert_eq!(err.code(), "UPSTREAM");
    assert_single_business_error(&h.sink, "CREATE");
}

#[tokio::test]
async fn failed_planted_area_sum_is_reraised_unchanged() {
    let store = Arc::new(FailingStore {
        fail_sum: true,
        ..FailingStore::default()
    });
    let h = harness_over(store.clone());
    let owner = seeded_producer(&h, CPF).await;
    let property = h
        .properties
        .create(&h.ctx, owner, property_draft(1500.0, 1000.0, 500.0))
        .await
        .unwrap();
    h.sink.clear();

    let err = h
        .seasons
        .create(&h.ctx, owner, season_draft(property.id, 100.0))
        .await
        .unwrap_err();
    assert_eq!(err, DomainError::Upstream(backend_down()));
    assert_single_business_error(&h.sink, "CREATE");
    assert!(h.sink.by_category(AuditCategory::Validation).is_empty());
    assert!(CropSeasonRepository::list_for_producer(&store.inner, owner)
        .await
        .unwrap()
        .is_empty());
}
