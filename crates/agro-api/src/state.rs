//! # Application State
//!
//! Shared across handlers via Axum's `State` extractor. Holds the three
//! domain services, wired to one repository backend and one audit trail.

use std::sync::Arc;

use agro_audit::AuditTrail;
use agro_domain::{
    CropSeasonRepository, CropSeasonService, MemoryStore, OwnershipResolver, PropertyRepository,
    PropertyService, ProducerRepository, ProducerService, ServiceSettings,
};
use sqlx::PgPool;

use crate::config::AppConfig;
use crate::db::PgStore;

#[derive(Clone)]
pub struct AppState {
    pub producers: ProducerService,
    pub properties: PropertyService,
    pub crop_seasons: CropSeasonService,
    pub config: AppConfig,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    /// In-memory storage, tracing audit sink, default configuration.
    pub fn new() -> Self {
        Self::with_store(AppConfig::default(), Arc::new(MemoryStore::new()), AuditTrail::tracing())
    }

    /// Postgres storage when a pool is given, in-memory otherwise.
    pub fn with_config(config: AppConfig, db_pool: Option<PgPool>) -> Self {
        let audit = AuditTrail::tracing();
        match db_pool {
            Some(pool) => Self::with_store(config, Arc::new(PgStore::new(pool)), audit),
            None => Self::with_store(config, Arc::new(MemoryStore::new()), audit),
        }
    }

    /// Wire all services to a single backend implementing every repository.
    pub fn with_store<S>(config: AppConfig, store: Arc<S>, audit: AuditTrail) -> Self
    where
        S: ProducerRepository + PropertyRepository + CropSeasonRepository + 'static,
    {
        let settings = ServiceSettings::with_slow_operation_ms(config.slow_operation_ms);
        let resolver = OwnershipResolver::new(store.clone(), store.clone(), store.clone());
        Self {
            producers: ProducerService::new(store.clone(), audit.clone(), settings),
            properties: PropertyService::new(store.clone(), resolver.clone(), audit.clone(), settings),
            crop_seasons: CropSeasonService::new(store, resolver, audit, settings),
            config,
        }
    }
}
