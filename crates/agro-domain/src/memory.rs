//! # In-Memory Repository Adapter
//!
//! [`MemoryStore`] implements all three repository ports over
//! `parking_lot::RwLock`-guarded hash maps. It enforces the same
//! constraints the relational schema does: unique cpf / cnpj, foreign keys
//! on insert, and cascading deletes.
//!
//! Cloning a `MemoryStore` shares the underlying tables.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Arc;

use agro_core::{CropSeason, CropSeasonId, Producer, ProducerId, Property, PropertyId};
use async_trait::async_trait;
use parking_lot::RwLock;

use crate::error::{RepositoryError, UniqueField};
use crate::repository::{CropSeasonRepository, PropertyRepository, ProducerRepository};

/// Thread-safe keyed table.
struct Table<K, V> {
    data: Arc<RwLock<HashMap<K, V>>>,
}

impl<K, V> Clone for Table<K, V> {
    fn clone(&self) -> Self {
        Self {
            data: Arc::clone(&self.data),
        }
    }
}

impl<K: Eq + Hash, V: Clone> Table<K, V> {
    fn new() -> Self {
        Self {
            data: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    fn get(&self, id: &K) -> Option<V> {
        self.data.read().get(id).cloned()
    }

    fn filter(&self, predicate: impl Fn(&V) -> bool) -> Vec<V> {
        self.data
            .read()
            .values()
            .filter(|v| predicate(v))
            .cloned()
            .collect()
    }

}

/// Shared in-memory storage for producers, properties and crop seasons.
#[derive(Clone)]
pub struct MemoryStore {
    producers: Table<ProducerId, Producer>,
    properties: Table<PropertyId, Property>,
    crop_seasons: Table<CropSeasonId, CropSeason>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for MemoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryStore")
            .field("producers", &self.producers.data.read().len())
            .field("properties", &self.properties.data.read().len())
            .field("crop_seasons", &self.crop_seasons.data.read().len())
            .finish()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            producers: Table::new(),
            properties: Table::new(),
            crop_seasons: Table::new(),
        }
    }
}

#[async_trait]
impl ProducerRepository for MemoryStore {
    async fn find_by_id(&self, id: ProducerId) -> Result<Option<Producer>, RepositoryError> {
        Ok(self.producers.get(&id))
    }

    async fn list(&self) -> Result<Vec<Producer>, RepositoryError> {
        let mut producers = self.producers.filter(|_| true);
        producers.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(producers)
    }

    async fn save(&self, producer: Producer) -> Result<Producer, RepositoryError> {
        let mut guard = self.producers.data.write();
        for other in guard.values().filter(|p| p.id != producer.id) {
            if producer.tax_id.cpf().is_some() && producer.tax_id.cpf() == other.tax_id.cpf() {
                return Err(RepositoryError::UniqueViolation {
                    field: UniqueField::Cpf,
                });
            }
            if producer.tax_id.cnpj().is_some() && producer.tax_id.cnpj() == other.tax_id.cnpj() {
                return Err(RepositoryError::UniqueViolation {
                    field: UniqueField::Cnpj,
                });
            }
        }
        guard.insert(producer.id, producer.clone());
        Ok(producer)
    }

    async fn delete(&self, id: ProducerId) -> Result<u64, RepositoryError> {
        let mut producers = self.producers.data.write();
        let mut properties = self.properties.data.write();
        let mut seasons = self.crop_seasons.data.write();
        if producers.remove(&id).is_none() {
            return Ok(0);
        }
        let owned: Vec<PropertyId> = properties
            .values()
            .filter(|p| p.producer_id == id)
            .map(|p| p.id)
            .collect();
        properties.retain(|_, p| p.producer_id != id);
        seasons.retain(|_, s| !owned.contains(&s.property_id));
        Ok(1)
    }
}

#[async_trait]
impl PropertyRepository for MemoryStore {
    async fn find_for_producer(
        &self,
        id: PropertyId,
        producer_id: ProducerId,
    ) -> Result<Option<Property>, RepositoryError> {
        Ok(self
            .properties
            .get(&id)
            .filter(|p| p.producer_id == producer_id))
    }

    async fn list_for_producer(
        &self,
        producer_id: ProducerId,
    ) -> Result<Vec<Property>, RepositoryError> {
        let mut properties = self.properties.filter(|p| p.producer_id == producer_id);
        properties.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(properties)
    }

    async fn save(&self, property: Property) -> Result<Property, RepositoryError> {
        // Parent guard is held across the insert so a cascading delete
        // cannot run in between.
        let producers = self.producers.data.read();
        if !producers.contains_key(&property.producer_id) {
            return Err(RepositoryError::Backend(format!(
                "foreign key violation: producer {} does not exist",
                property.producer_id
            )));
        }
        self.properties
            .data
            .write()
            .insert(property.id, property.clone());
        Ok(property)
    }

    async fn delete(&self, id: PropertyId) -> Result<u64, RepositoryError> {
        let mut properties = self.properties.data.write();
        let mut seasons = self.crop_seasons.data.write();
        if properties.remove(&id).is_none() {
            return Ok(0);
        }
        seasons.retain(|_, s| s.property_id != id);
        Ok(1)
    }
}

#[async_trait]
impl CropSeasonRepository for MemoryStore {
    async fn find_for_producer(
        &self,
        id: CropSeasonId,
        producer_id: ProducerId,
    ) -> Result<Option<CropSeason>, RepositoryError> {
        let properties = self.properties.data.read();
        Ok(self.crop_seasons.get(&id).filter(|s| {
            properties
                .get(&s.property_id)
                .is_some_and(|p| p.producer_id == producer_id)
        }))
    }

    async fn list_for_producer(
        &self,
        producer_id: ProducerId,
    ) -> Result<Vec<CropSeason>, RepositoryError> {
        // Lock order is properties before crop_seasons everywhere.
        let owned: Vec<PropertyId> = self
            .properties
            .filter(|p| p.producer_id == producer_id)
            .into_iter()
            .map(|p| p.id)
            .collect();
        let mut seasons = self
            .crop_seasons
            .filter(|s| owned.contains(&s.property_id));
        seasons.sort_by_key(|s| s.created_at);
        Ok(seasons)
    }

    async fn save(&self, season: CropSeason) -> Result<CropSeason, RepositoryError> {
        let properties = self.properties.data.read();
        if !properties.contains_key(&season.property_id) {
            return Err(RepositoryError::Backend(format!(
                "foreign key violation: property {} does not exist",
                season.property_id
            )));
        }
        self.crop_seasons.data.write().insert(season.id, season.clone());
        Ok(season)
    }

    async fn delete(&self, id: CropSeasonId) -> Result<u64, RepositoryError> {
        Ok(u64::from(self.crop_seasons.data.write().remove(&id).is_some()))
    }

    async fn sum_planted_area(
        &self,
        property_id: PropertyId,
        exclude: Option<CropSeasonId>,
    ) -> Result<f64, RepositoryError> {
        let hundredths: i64 = self
            .crop_seasons
            .data
            .read()
            .values()
            .filter(|s| s.property_id == property_id && Some(s.id) != exclude)
            .map(|s| s.planted_area.hundredths())
            .sum();
        Ok(hundredths as f64 / 100.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agro_core::{AreaField, Cnpj, Cpf, Hectares, TaxId, Timestamp};
    use chrono::NaiveDate;

    fn producer(cpf: &str) -> Producer {
        Producer {
            id: ProducerId::new(),
            tax_id: TaxId::Cpf(Cpf::new(cpf).unwrap()),
            name: "João Silva".into(),
        }
    }

    fn property(owner: ProducerId) -> Property {
        Property {
            id: PropertyId::new(),
            producer_id: owner,
            name: "Fazenda Boa Vista".into(),
            city: "Sorriso".into(),
            state: "MT".into(),
            area_total: Hectares::new(AreaField::Total, 1000.0).unwrap(),
            area_arable: Hectares::new(AreaField::Arable, 800.0).unwrap(),
            area_vegetation: Hectares::new(AreaField::Vegetation, 200.0).unwrap(),
        }
    }

    fn season(property_id: PropertyId, area: f64) -> CropSeason {
        CropSeason {
            id: CropSeasonId::new(),
            property_id,
            crop_name: "Soja".into(),
            harvest_year: 2024,
            planting_date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            expected_harvest_date: NaiveDate::from_ymd_opt(2024, 5, 15).unwrap(),
            planted_area: Hectares::new(AreaField::Planted, area).unwrap(),
            created_at: Timestamp::now(),
        }
    }

    #[tokio::test]
    async fn duplicate_cpf_is_unique_violation() {
        let store = MemoryStore::new();
        ProducerRepository::save(&store, producer("529.982.247-25")).await.unwrap();
        let err = ProducerRepository::save(&store, producer("52998224725"))
            .await
            .unwrap_err();
        assert_eq!(
            err,
            RepositoryError::UniqueViolation {
                field: UniqueField::Cpf
            }
        );
    }

    #[tokio::test]
    async fn resaving_same_producer_is_not_a_violation() {
        let store = MemoryStore::new();
        let p = ProducerRepository::save(&store, producer("529.982.247-25")).await.unwrap();
        assert!(ProducerRepository::save(&store, p).await.is_ok());
    }

    #[tokio::test]
    async fn duplicate_cnpj_is_unique_violation() {
        let store = MemoryStore::new();
        let mut a = producer("529.982.247-25");
        a.tax_id = TaxId::Cnpj(Cnpj::new("11.444.777/0001-61").unwrap());
        let mut b = a.clone();
        b.id = ProducerId::new();
        ProducerRepository::save(&store, a).await.unwrap();
        let err = ProducerRepository::save(&store, b).await.unwrap_err();
        assert_eq!(
            err,
            RepositoryError::UniqueViolation {
                field: UniqueField::Cnpj
            }
        );
    }

    #[tokio::test]
    async fn scoped_lookups_hide_foreign_records() {
        let store = MemoryStore::new();
        let owner = ProducerRepository::save(&store, producer("529.982.247-25")).await.unwrap();
        let prop = PropertyRepository::save(&store, property(owner.id)).await.unwrap();
        let s = CropSeasonRepository::save(&store, season(prop.id, 100.0)).await.unwrap();
        let stranger = ProducerId::new();

        assert!(PropertyRepository::find_for_producer(&store, prop.id, owner.id)
            .await
            .unwrap()
            .is_some());
        assert!(PropertyRepository::find_for_producer(&store, prop.id, stranger)
            .await
            .unwrap()
            .is_none());
        assert!(CropSeasonRepository::find_for_producer(&store, s.id, stranger)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn sum_excludes_requested_season() {
        let store = MemoryStore::new();
        let owner = ProducerRepository::save(&store, producer("529.982.247-25")).await.unwrap();
        let prop = PropertyRepository::save(&store, property(owner.id)).await.unwrap();
        let a = CropSeasonRepository::save(&store, season(prop.id, 300.0)).await.unwrap();
        CropSeasonRepository::save(&store, season(prop.id, 200.0)).await.unwrap();

        assert_eq!(store.sum_planted_area(prop.id, None).await.unwrap(), 500.0);
        assert_eq!(store.sum_planted_area(prop.id, Some(a.id)).await.unwrap(), 200.0);
    }

    #[tokio::test]
    async fn producer_delete_cascades() {
        let store = MemoryStore::new();
        let owner = ProducerRepository::save(&store, producer("529.982.247-25")).await.unwrap();
        let prop = PropertyRepository::save(&store, property(owner.id)).await.unwrap();
        CropSeasonRepository::save(&store, season(prop.id, 100.0)).await.unwrap();

        assert_eq!(ProducerRepository::delete(&store, owner.id).await.unwrap(), 1);
        assert_eq!(ProducerRepository::delete(&store, owner.id).await.unwrap(), 0);
        assert!(PropertyRepository::list_for_producer(&store, owner.id)
            .await
            .unwrap()
            .is_empty());
        assert_eq!(store.sum_planted_area(prop.id, None).await.unwrap(), 0.0);
    }

    #[tokio::test]
    async fn property_requires_existing_producer() {
        let store = MemoryStore::new();
        let err = PropertyRepository::save(&store, property(ProducerId::new()))
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::Backend(_)));
    }

    #[tokio::test]
    async fn sum_of_decimal_areas_is_exact() {
        let store = MemoryStore::new();
        let owner = ProducerRepository::save(&store, producer("529.982.247-25")).await.unwrap();
        let prop = PropertyRepository::save(&store, property(owner.id)).await.unwrap();
        for _ in 0..3 {
            CropSeasonRepository::save(&store, season(prop.id, 0.1)).await.unwrap();
        }
        assert_eq!(store.sum_planted_area(prop.id, None).await.unwrap(), 0.3);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_delete_never_leaves_orphans() {
        let store = MemoryStore::new();
        for _ in 0..200 {
            let owner = ProducerRepository::save(&store, producer("529.982.247-25")).await.unwrap();
            let prop = property(owner.id);
            let prop_id = prop.id;

            let saver = {
                let store = store.clone();
                tokio::spawn(async move { PropertyRepository::save(&store, prop).await })
            };
            let deleter = {
                let store = store.clone();
                tokio::spawn(async move { ProducerRepository::delete(&store, owner.id).await })
            };
            let _ = saver.await.unwrap();
            deleter.await.unwrap().unwrap();

            assert!(store.producers.get(&owner.id).is_none());
            assert!(store.properties.get(&prop_id).is_none(), "orphan property left behind");
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_property_delete_never_leaves_orphan_seasons() {
        let store = MemoryStore::new();
        let owner = ProducerRepository::save(&store, producer("529.982.247-25")).await.unwrap();
        for _ in 0..200 {
            let prop = PropertyRepository::save(&store, property(owner.id)).await.unwrap();
            let s = season(prop.id, 10.0);
            let season_id = s.id;

            let saver = {
                let store = store.clone();
                tokio::spawn(async move { CropSeasonRepository::save(&store, s).await })
            };
            let deleter = {
                let store = store.clone();
                tokio::spawn(async move { PropertyRepository::delete(&store, prop.id).await })
            };
            let _ = saver.await.unwrap();
            deleter.await.unwrap().unwrap();

            assert!(store.crop_seasons.get(&season_id).is_none(), "orphan season left behind");
        }
    }
}
