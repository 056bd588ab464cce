//! Postgres implementation of the repository ports.
//!
//! Writes are upserts keyed on `id`. Unique violations (`23505`) on the
//! `cpf` / `cnpj` constraints are reported as
//! [`RepositoryError::UniqueViolation`]; every other database failure
//! becomes [`RepositoryError::Backend`].
//!
//! Area columns are `NUMERIC(10,2)`. Planted-area sums run in exact decimal
//! and are read back as `DOUBLE PRECISION`; the domain rounds them to whole
//! hundredths before comparing.

use agro_core::{
    AreaField, Cnpj, Cpf, CropSeason, CropSeasonId, Hectares, Producer, ProducerId, Property,
    PropertyId, TaxId, Timestamp,
};
use agro_domain::{
    CropSeasonRepository, PropertyRepository, ProducerRepository, RepositoryError, UniqueField,
};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::PgPool;
use uuid::Uuid;

const UNIQUE_VIOLATION: &str = "23505";

fn map_err(err: sqlx::Error) -> RepositoryError {
    if let sqlx::Error::Database(db) = &err {
        if db.code().as_deref() == Some(UNIQUE_VIOLATION) {
            match db.constraint() {
                Some("produtores_cpf_key") => {
                    return RepositoryError::UniqueViolation {
                        field: UniqueField::Cpf,
                    }
                }
                Some("produtores_cnpj_key") => {
                    return RepositoryError::UniqueViolation {
                        field: UniqueField::Cnpj,
                    }
                }
                _ => {}
            }
        }
    }
    tracing::error!(error = %err, "database operation failed");
    RepositoryError::Backend(err.to_string())
}

fn corrupt(what: &str, id: Uuid) -> RepositoryError {
    RepositoryError::Backend(format!("stored {what} {id} fails validation"))
}

// ---------------------------------------------------------------------------
// Row types
// ---------------------------------------------------------------------------

#[derive(sqlx::FromRow)]
struct ProducerRow {
    id: Uuid,
    cpf: Option<String>,
    cnpj: Option<String>,
    nome_produtor: String,
}

impl ProducerRow {
    fn into_record(self) -> Result<Producer, RepositoryError> {
        let tax_id = match (self.cpf, self.cnpj) {
            (Some(cpf), None) => TaxId::Cpf(Cpf::new(cpf).map_err(|_| corrupt("producer", self.id))?),
            (None, Some(cnpj)) => {
                TaxId::Cnpj(Cnpj::new(cnpj).map_err(|_| corrupt("producer", self.id))?)
            }
            _ => return Err(corrupt("producer", self.id)),
        };
        Ok(Producer {
            id: ProducerId::from_uuid(self.id),
            tax_id,
            name: self.nome_produtor,
        })
    }
}

#[derive(sqlx::FromRow)]
struct PropertyRow {
    id: Uuid,
    produtor_id: Uuid,
    nome_propriedade: String,
    cidade: String,
    estado: String,
    area_total: f64,
    area_agricultavel: f64,
    area_vegetacao: f64,
}

impl PropertyRow {
    fn into_record(self) -> Result<Property, RepositoryError> {
        let area = |field, value| Hectares::new(field, value).map_err(|_| corrupt("property", self.id));
        Ok(Property {
            id: PropertyId::from_uuid(self.id),
            producer_id: ProducerId::from_uuid(self.produtor_id),
            area_total: area(AreaField::Total, self.area_total)?,
            area_arable: area(AreaField::Arable, self.area_agricultavel)?,
            area_vegetation: area(AreaField::Vegetation, self.area_vegetacao)?,
            name: self.nome_propriedade,
            city: self.cidade,
            state: self.estado.trim().to_string(),
        })
    }
}

#[derive(sqlx::FromRow)]
struct CropSeasonRow {
    id: Uuid,
    propriedade_id: Uuid,
    nome_cultura: String,
    ano_safra: i32,
    data_plantio: NaiveDate,
    data_colheita_prevista: NaiveDate,
    area_plantada: f64,
    created_at: DateTime<Utc>,
}

impl CropSeasonRow {
    fn into_record(self) -> Result<CropSeason, RepositoryError> {
        Ok(CropSeason {
            id: CropSeasonId::from_uuid(self.id),
            property_id: PropertyId::from_uuid(self.propriedade_id),
            crop_name: self.nome_cultura,
            harvest_year: self.ano_safra,
            planting_date: self.data_plantio,
            expected_harvest_date: self.data_colheita_prevista,
            planted_area: Hectares::new(AreaField::Planted, self.area_plantada)
                .map_err(|_| corrupt("crop season", self.id))?,
            created_at: Timestamp::from_datetime(self.created_at),
        })
    }
}

const SEASON_COLUMNS: &str = "s.id, s.propriedade_id, s.nome_cultura, s.ano_safra, s.data_plantio,
     s.data_colheita_prevista, s.area_plantada::DOUBLE PRECISION AS area_plantada, s.created_at";

// ---------------------------------------------------------------------------
// PgStore
// ---------------------------------------------------------------------------

/// Repository backend over a Postgres pool.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProducerRepository for PgStore {
    async fn find_by_id(&self, id: ProducerId) -> Result<Option<Producer>, RepositoryError> {
        sqlx::query_as::<_, ProducerRow>(
            "SELECT id, cpf, cnpj, nome_produtor FROM produtores WHERE id = $1",
        )
        .bind(*id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_err)?
        .map(ProducerRow::into_record)
        .transpose()
    }

    async fn list(&self) -> Result<Vec<Producer>, RepositoryError> {
        sqlx::query_as::<_, ProducerRow>(
            "SELECT id, cpf, cnpj, nome_produtor FROM produtores ORDER BY nome_produtor",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(map_err)?
        .into_iter()
        .map(ProducerRow::into_record)
        .collect()
    }

    async fn save(&self, producer: Producer) -> Result<Producer, RepositoryError> {
        sqlx::query(
            "INSERT INTO produtores (id, cpf, cnpj, nome_produtor)
             VALUES ($1, $2, $3, $4)
             ON CONFLICT (id) DO UPDATE SET
                cpf = EXCLUDED.cpf, cnpj = EXCLUDED.cnpj,
                nome_produtor = EXCLUDED.nome_produtor, updated_at = now()",
        )
        .bind(*producer.id.as_uuid())
        .bind(producer.tax_id.cpf().map(|c| c.as_str().to_string()))
        .bind(producer.tax_id.cnpj().map(|c| c.as_str().to_string()))
        .bind(&producer.name)
        .execute(&self.pool)
        .await
        .map_err(map_err)?;
        Ok(producer)
    }

    async fn delete(&self, id: ProducerId) -> Result<u64, RepositoryError> {
        let result = sqlx::query("DELETE FROM produtores WHERE id = $1")
            .bind(*id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(map_err)?;
        Ok(result.rows_affected())
    }
}

#[async_trait]
impl PropertyRepository for PgStore {
    async fn find_for_producer(
        &self,
        id: PropertyId,
        producer_id: ProducerId,
    ) -> Result<Option<Property>, RepositoryError> {
        sqlx::query_as::<_, PropertyRow>(
            "SELECT id, produtor_id, nome_propriedade, cidade, estado,
                    area_total::DOUBLE PRECISION AS area_total,
                    area_agricultavel::DOUBLE PRECISION AS area_agricultavel,
                    area_vegetacao::DOUBLE PRECISION AS area_vegetacao
             FROM propriedades WHERE id = $1 AND produtor_id = $2",
        )
        .bind(*id.as_uuid())
        .bind(*producer_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_err)?
        .map(PropertyRow::into_record)
        .transpose()
    }

    async fn list_for_producer(
        &self,
        producer_id: ProducerId,
    ) -> Result<Vec<Property>, RepositoryError> {
        sqlx::query_as::<_, PropertyRow>(
            "SELECT id, produtor_id, nome_propriedade, cidade, estado,
                    area_total::DOUBLE PRECISION AS area_total,
                    area_agricultavel::DOUBLE PRECISION AS area_agricultavel,
                    area_vegetacao::DOUBLE PRECISION AS area_vegetacao
             FROM propriedades WHERE produtor_id = $1 ORDER BY nome_propriedade",
        )
        .bind(*producer_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(map_err)?
        .into_iter()
        .map(PropertyRow::into_record)
        .collect()
    }

    async fn save(&self, property: Property) -> Result<Property, RepositoryError> {
        sqlx::query(
            "INSERT INTO propriedades (id, produtor_id, nome_propriedade, cidade, estado,
                                       area_total, area_agricultavel, area_vegetacao)
             VALUES ($1, $2, $3, $4, $5, $6::NUMERIC(10,2), $7::NUMERIC(10,2), $8::NUMERIC(10,2))
             ON CONFLICT (id) DO UPDATE SET
                nome_propriedade = EXCLUDED.nome_propriedade, cidade = EXCLUDED.cidade,
                estado = EXCLUDED.estado, area_total = EXCLUDED.area_total,
                area_agricultavel = EXCLUDED.area_agricultavel,
                area_vegetacao = EXCLUDED.area_vegetacao, updated_at = now()",
        )
        .bind(*property.id.as_uuid())
        .bind(*property.producer_id.as_uuid())
        .bind(&property.name)
        .bind(&property.city)
        .bind(&property.state)
        .bind(property.area_total.value())
        .bind(property.area_arable.value())
        .bind(property.area_vegetation.value())
        .execute(&self.pool)
        .await
        .map_err(map_err)?;
        Ok(property)
    }

    async fn delete(&self, id: PropertyId) -> Result<u64, RepositoryError> {
        let result = sqlx::query("DELETE FROM propriedades WHERE id = $1")
            .bind(*id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(map_err)?;
        Ok(result.rows_affected())
    }
}

#[async_trait]
impl CropSeasonRepository for PgStore {
    async fn find_for_producer(
        &self,
        id: CropSeasonId,
        producer_id: ProducerId,
    ) -> Result<Option<CropSeason>, RepositoryError> {
        let sql = format!(
            "SELECT {SEASON_COLUMNS}
             FROM safras_culturas s
             JOIN propriedades p ON p.id = s.propriedade_id
             WHERE s.id = $1 AND p.produtor_id = $2"
        );
        sqlx::query_as::<_, CropSeasonRow>(&sql)
        .bind(*id.as_uuid())
        .bind(*producer_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_err)?
        .map(CropSeasonRow::into_record)
        .transpose()
    }

    async fn list_for_producer(
        &self,
        producer_id: ProducerId,
    ) -> Result<Vec<CropSeason>, RepositoryError> {
        let sql = format!(
            "SELECT {SEASON_COLUMNS}
             FROM safras_culturas s
             JOIN propriedades p ON p.id = s.propriedade_id
             WHERE p.produtor_id = $1
             ORDER BY s.created_at"
        );
        sqlx::query_as::<_, CropSeasonRow>(&sql)
        .bind(*producer_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(map_err)?
        .into_iter()
        .map(CropSeasonRow::into_record)
        .collect()
    }

    async fn save(&self, season: CropSeason) -> Result<CropSeason, RepositoryError> {
        sqlx::query(
            "INSERT INTO safras_culturas (id, propriedade_id, nome_cultura, ano_safra, data_plantio,
                                          data_colheita_prevista, area_plantada, created_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7::NUMERIC(10,2), $8)
             ON CONFLICT (id) DO UPDATE SET
                propriedade_id = EXCLUDED.propriedade_id, nome_cultura = EXCLUDED.nome_cultura,
                ano_safra = EXCLUDED.ano_safra, data_plantio = EXCLUDED.data_plantio,
                data_colheita_prevista = EXCLUDED.data_colheita_prevista,
                area_plantada = EXCLUDED.area_plantada, updated_at = now()",
        )
        .bind(*season.id.as_uuid())
        .bind(*season.property_id.as_uuid())
        .bind(&season.crop_name)
        .bind(season.harvest_year)
        .bind(season.planting_date)
        .bind(season.expected_harvest_date)
        .bind(season.planted_area.value())
        .bind(*season.created_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(map_err)?;
        Ok(season)
    }

    async fn delete(&self, id: CropSeasonId) -> Result<u64, RepositoryError> {
        let result = sqlx::query("DELETE FROM safras_culturas WHERE id = $1")
            .bind(*id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(map_err)?;
        Ok(result.rows_affected())
    }

    async fn sum_planted_area(
        &self,
        property_id: PropertyId,
        exclude: Option<CropSeasonId>,
    ) -> Result<f64, RepositoryError> {
        sqlx::query_scalar::<_, f64>(
            "SELECT COALESCE(SUM(area_plantada), 0)::DOUBLE PRECISION
             FROM safras_culturas
             WHERE propriedade_id = $1 AND ($2::UUID IS NULL OR id <> $2)",
        )
        .bind(*property_id.as_uuid())
        .bind(exclude.map(|id| *id.as_uuid()))
        .fetch_one(&self.pool)
        .await
        .map_err(map_err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn producer_row_with_cpf_converts() {
        let row = ProducerRow {
            id: Uuid::new_v4(),
            cpf: Some("52998224725".into()),
            cnpj: None,
            nome_produtor: "João Silva".into(),
        };
        let producer = row.into_record().unwrap();
        assert_eq!(producer.tax_id.kind(), "CPF");
    }

    #[test]
    fn producer_row_with_both_documents_is_rejected() {
        let row = ProducerRow {
            id: Uuid::new_v4(),
            cpf: Some("52998224725".into()),
            cnpj: Some("11444777000161".into()),
            nome_produtor: "João Silva".into(),
        };
        assert!(matches!(row.into_record(), Err(RepositoryError::Backend(_))));
    }

    #[test]
    fn property_row_trims_padded_state() {
        let row = PropertyRow {
            id: Uuid::new_v4(),
            produtor_id: Uuid::new_v4(),
            nome_propriedade: "Fazenda Boa Vista".into(),
            cidade: "Sorriso".into(),
            estado: "MT".into(),
            area_total: 1000.0,
            area_agricultavel: 800.0,
            area_vegetacao: 200.0,
        };
        let property = row.into_record().unwrap();
        assert_eq!(property.state, "MT");
        assert_eq!(property.area_arable.value(), 800.0);
    }

    #[test]
    fn non_unique_database_errors_are_backend() {
        let err = map_err(sqlx::Error::RowNotFound);
        assert!(matches!(err, RepositoryError::Backend(_)));
    }
}
