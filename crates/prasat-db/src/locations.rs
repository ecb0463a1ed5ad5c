//! Location repository and the 1:1 castle link.
//!
//! The link table carries castle_id as its primary key and a unique
//! constraint on location_id; together they make the association
//! one-to-one in both directions. Violations surface as conflicts.

use async_trait::async_trait;
use sqlx::{Pool, Postgres};

use prasat_core::{
    CreateLocationRequest, Error, Location, LocationRepository, Result,
};

/// PostgreSQL implementation of LocationRepository.
pub struct PgLocationRepository {
    pool: Pool<Postgres>,
}

impl PgLocationRepository {
    /// Create a new PgLocationRepository with the given connection pool.
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LocationRepository for PgLocationRepository {
    async fn insert(&self, req: CreateLocationRequest) -> Result<i32> {
        req.validate()?;

        sqlx::query_scalar(
            "INSERT INTO locations (latitude, longitude, sub_district, district, province)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING location_id",
        )
        .bind(req.latitude)
        .bind(req.longitude)
        .bind(&req.sub_district)
        .bind(&req.district)
        .bind(&req.province)
        .fetch_one(&self.pool)
        .await
        .map_err(Error::from_sqlx)
    }

    async fn get(&self, location_id: i32) -> Result<Option<Location>> {
        sqlx::query_as::<_, Location>(
            "SELECT location_id, latitude, longitude, sub_district, district, province
             FROM locations WHERE location_id = $1",
        )
        .bind(location_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Database)
    }

    async fn update(&self, location_id: i32, req: CreateLocationRequest) -> Result<()> {
        req.validate()?;

        let result = sqlx::query(
            "UPDATE locations
             SET latitude = $2, longitude = $3, sub_district = $4, district = $5, province = $6
             WHERE location_id = $1",
        )
        .bind(location_id)
        .bind(req.latitude)
        .bind(req.longitude)
        .bind(&req.sub_district)
        .bind(&req.district)
        .bind(&req.province)
        .execute(&self.pool)
        .await
        .map_err(Error::from_sqlx)?;

        if result.rows_affected() == 0 {
            return Err(Error::NotFound(format!("location {location_id}")));
        }
        Ok(())
    }

    async fn delete(&self, location_id: i32) -> Result<()> {
        let result = sqlx::query("DELETE FROM locations WHERE location_id = $1")
            .bind(location_id)
            .execute(&self.pool)
            .await
            .map_err(Error::Database)?;

        if result.rows_affected() == 0 {
            return Err(Error::NotFound(format!("location {location_id}")));
        }
        Ok(())
    }

    async fn link_castle(&self, castle_id: i32, location_id: i32) -> Result<()> {
        sqlx::query(
            "INSERT INTO location_castles (castle_id, location_id) VALUES ($1, $2)",
        )
        .bind(castle_id)
        .bind(location_id)
        .execute(&self.pool)
        .await
        .map_err(Error::from_sqlx)?;
        Ok(())
    }

    async fn unlink_castle(&self, castle_id: i32) -> Result<()> {
        let result = sqlx::query("DELETE FROM location_castles WHERE castle_id = $1")
            .bind(castle_id)
            .execute(&self.pool)
            .await
            .map_err(Error::Database)?;

        if result.rows_affected() == 0 {
            return Err(Error::NotFound(format!("location link for castle {castle_id}")));
        }
        Ok(())
    }

    async fn get_for_castle(&self, castle_id: i32) -> Result<Option<Location>> {
        sqlx::query_as::<_, Location>(
            "SELECT l.location_id, l.latitude, l.longitude,
                    l.sub_district, l.district, l.province
             FROM locations l
             JOIN location_castles lc ON lc.location_id = l.location_id
             WHERE lc.castle_id = $1",
        )
        .bind(castle_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Database)
    }
}
