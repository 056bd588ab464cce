//! # Repository Ports
//!
//! Persistence interfaces consumed by the services. Implementations live
//! outside this module: [`crate::MemoryStore`] here, the Postgres adapter
//! in `agro-api`.
//!
//! Owner-scoped lookups (`find_for_producer`) are single calls: an
//! implementation must answer "does this record exist *under this owner*"
//! in one query, never by loading the record and then its parent.

use agro_core::{CropSeason, CropSeasonId, Producer, ProducerId, Property, PropertyId};
use async_trait::async_trait;

use crate::error::RepositoryError;

#[async_trait]
pub trait ProducerRepository: Send + Sync {
    async fn find_by_id(&self, id: ProducerId) -> Result<Option<Producer>, RepositoryError>;

    async fn list(&self) -> Result<Vec<Producer>, RepositoryError>;

    /// Insert or replace. Fails with `UniqueViolation` on a cpf/cnpj clash.
    async fn save(&self, producer: Producer) -> Result<Producer, RepositoryError>;

    /// Delete the producer and, transitively, its properties and seasons.
    /// Returns the number of producer rows removed.
    async fn delete(&self, id: ProducerId) -> Result<u64, RepositoryError>;
}

#[async_trait]
pub trait PropertyRepository: Send + Sync {
    async fn find_for_producer(
        &self,
        id: PropertyId,
        producer_id: ProducerId,
    ) -> Result<Option<Property>, RepositoryError>;

    async fn list_for_producer(
        &self,
        producer_id: ProducerId,
    ) -> Result<Vec<Property>, RepositoryError>;

    async fn save(&self, property: Property) -> Result<Property, RepositoryError>;

    /// Delete the property and its seasons.
    async fn delete(&self, id: PropertyId) -> Result<u64, RepositoryError>;
}

#[async_trait]
pub trait CropSeasonRepository: Send + Sync {
    /// The season, if its property belongs to `producer_id`.
    async fn find_for_producer(
        &self,
        id: CropSeasonId,
        producer_id: ProducerId,
    ) -> Result<Option<CropSeason>, RepositoryError>;

    async fn list_for_producer(
        &self,
        producer_id: ProducerId,
    ) -> Result<Vec<CropSeason>, RepositoryError>;

    async fn save(&self, season: CropSeason) -> Result<CropSeason, RepositoryError>;

    async fn delete(&self, id: CropSeasonId) -> Result<u64, RepositoryError>;

    /// Sum of `planted_area` over the property's seasons, skipping `exclude`.
    async fn sum_planted_area(
        &self,
        property_id: PropertyId,
        exclude: Option<CropSeasonId>,
    ) -> Result<f64, RepositoryError>;
}
