//! Castle and castle-type repository implementation.

use async_trait::async_trait;
use pgvector::Vector;
use sqlx::{Pool, Postgres, Row};
use tracing::debug;

use prasat_core::{
    defaults::TEXT_EMBED_DIMENSION, validate_vector_dimension, Castle, CastleRepository,
    CastleResponse, CastleType, CreateCastleRequest, CreateCastleTypeRequest, Error, Location,
    Page, Result,
};

use crate::escape_like;

/// PostgreSQL implementation of CastleRepository.
pub struct PgCastleRepository {
    pool: Pool<Postgres>,
}

impl PgCastleRepository {
    /// Create a new PgCastleRepository with the given connection pool.
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

const CASTLE_COLUMNS: &str =
    "castle_id, castle_name, castle_description, era, type_id, text_vector";

#[async_trait]
impl CastleRepository for PgCastleRepository {
    async fn insert(&self, req: CreateCastleRequest) -> Result<i32> {
        req.validate()?;

        let castle_id: i32 = sqlx::query_scalar(
            "INSERT INTO castles (castle_name, castle_description, era, type_id, text_vector)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING castle_id",
        )
        .bind(&req.castle_name)
        .bind(&req.castle_description)
        .bind(&req.era)
        .bind(req.type_id)
        .bind(req.text_vector.map(Vector::from))
        .fetch_one(&self.pool)
        .await
        .map_err(Error::from_sqlx)?;

        debug!(
            subsystem = "database",
            component = "castles",
            op = "insert",
            castle_id,
            "Castle created"
        );
        Ok(castle_id)
    }

    async fn get(&self, castle_id: i32) -> Result<Option<Castle>> {
        sqlx::query_as::<_, Castle>(&format!(
            "SELECT {CASTLE_COLUMNS} FROM castles WHERE castle_id = $1"
        ))
        .bind(castle_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Database)
    }

    async fn get_with_location(&self, castle_id: i32) -> Result<Option<CastleResponse>> {
        // Location is a read projection resolved through the 1:1 link
        // table in the same query, not a stored foreign key.
        let row = sqlx::query(
            "SELECT c.castle_id, c.castle_name, c.castle_description, c.era, c.type_id,
                    l.location_id, l.latitude, l.longitude,
                    l.sub_district, l.district, l.province
             FROM castles c
             LEFT JOIN location_castles lc ON lc.castle_id = c.castle_id
             LEFT JOIN locations l ON l.location_id = lc.location_id
             WHERE c.castle_id = $1",
        )
        .bind(castle_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(row.map(|row| {
            let location = row
                .get::<Option<i32>, _>("location_id")
                .map(|location_id| Location {
                    location_id,
                    latitude: row.get("latitude"),
                    longitude: row.get("longitude"),
                    sub_district: row.get("sub_district"),
                    district: row.get("district"),
                    province: row.get("province"),
                });
            CastleResponse {
                castle_id: row.get("castle_id"),
                castle_name: row.get("castle_name"),
                castle_description: row.get("castle_description"),
                era: row.get("era"),
                type_id: row.get("type_id"),
                location,
            }
        }))
    }

    async fn list(&self, page: Page) -> Result<Vec<Castle>> {
        sqlx::query_as::<_, Castle>(&format!(
            "SELECT {CASTLE_COLUMNS} FROM castles ORDER BY castle_name LIMIT $1 OFFSET $2"
        ))
        .bind(page.limit)
        .bind(page.offset)
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)
    }

    async fn search_by_name(&self, name: &str, limit: i64) -> Result<Vec<Castle>> {
        let pattern = format!("%{}%", escape_like(name));
        sqlx::query_as::<_, Castle>(&format!(
            "SELECT {CASTLE_COLUMNS} FROM castles
             WHERE castle_name ILIKE $1
             ORDER BY castle_name
             LIMIT $2"
        ))
        .bind(pattern)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)
    }

    async fn update(&self, castle_id: i32, req: CreateCastleRequest) -> Result<()> {
        req.validate()?;

        let result = sqlx::query(
            "UPDATE castles
             SET castle_name = $2, castle_description = $3, era = $4,
                 type_id = $5, text_vector = $6
             WHERE castle_id = $1",
        )
        .bind(castle_id)
        .bind(&req.castle_name)
        .bind(&req.castle_description)
        .bind(&req.era)
        .bind(req.type_id)
        .bind(req.text_vector.map(Vector::from))
        .execute(&self.pool)
        .await
        .map_err(Error::from_sqlx)?;

        if result.rows_affected() == 0 {
            return Err(Error::NotFound(format!("castle {castle_id}")));
        }
        Ok(())
    }

    async fn update_text_vector(&self, castle_id: i32, vector: Vec<f32>) -> Result<()> {
        validate_vector_dimension("text_vector", &vector, TEXT_EMBED_DIMENSION)?;

        let result = sqlx::query("UPDATE castles SET text_vector = $2 WHERE castle_id = $1")
            .bind(castle_id)
            .bind(Vector::from(vector))
            .execute(&self.pool)
            .await
            .map_err(Error::Database)?;

        if result.rows_affected() == 0 {
            return Err(Error::NotFound(format!("castle {castle_id}")));
        }
        Ok(())
    }

    async fn delete(&self, castle_id: i32) -> Result<()> {
        let result = sqlx::query("DELETE FROM castles WHERE castle_id = $1")
            .bind(castle_id)
            .execute(&self.pool)
            .await
            .map_err(Error::Database)?;

        if result.rows_affected() == 0 {
            return Err(Error::NotFound(format!("castle {castle_id}")));
        }
        debug!(
            subsystem = "database",
            component = "castles",
            op = "delete",
            castle_id,
            "Castle deleted, asset and link rows cascaded"
        );
        Ok(())
    }

    async fn insert_type(&self, req: CreateCastleTypeRequest) -> Result<i32> {
        sqlx::query_scalar(
            "INSERT INTO castle_types (type_detail) VALUES ($1) RETURNING type_id",
        )
        .bind(&req.type_detail)
        .fetch_one(&self.pool)
        .await
        .map_err(Error::from_sqlx)
    }

    async fn get_type(&self, type_id: i32) -> Result<Option<CastleType>> {
        sqlx::query_as::<_, CastleType>(
            "SELECT type_id, type_detail FROM castle_types WHERE type_id = $1",
        )
        .bind(type_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Database)
    }

    async fn list_types(&self) -> Result<Vec<CastleType>> {
        sqlx::query_as::<_, CastleType>(
            "SELECT type_id, type_detail FROM castle_types ORDER BY type_id",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)
    }

    async fn delete_type(&self, type_id: i32) -> Result<()> {
        // Castles referencing this type keep existing with type_id NULL.
        let result = sqlx::query("DELETE FROM castle_types WHERE type_id = $1")
            .bind(type_id)
            .execute(&self.pool)
            .await
            .map_err(Error::Database)?;

        if result.rows_affected() == 0 {
            return Err(Error::NotFound(format!("castle type {type_id}")));
        }
        Ok(())
    }
}
