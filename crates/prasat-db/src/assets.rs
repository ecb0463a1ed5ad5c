//! Castle asset repository: architectures, images, events, nearby
//! places. All four relations are owned by their castle and cascade on
//! castle deletion.

use async_trait::async_trait;
use pgvector::Vector;
use sqlx::{Pool, Postgres};

use prasat_core::{
    Architecture, CastleAssetRepository, CreateArchitectureRequest, CreateEventRequest,
    CreateImageRequest, CreateNearbyPlaceRequest, Error, Event, Image, ImageResponse, NearbyPlace,
    Result,
};

/// PostgreSQL implementation of CastleAssetRepository.
pub struct PgCastleAssetRepository {
    pool: Pool<Postgres>,
}

impl PgCastleAssetRepository {
    /// Create a new PgCastleAssetRepository with the given connection pool.
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CastleAssetRepository for PgCastleAssetRepository {
    async fn insert_architecture(&self, req: CreateArchitectureRequest) -> Result<i32> {
        sqlx::query_scalar(
            "INSERT INTO architectures (castle_id, architec_detail)
             VALUES ($1, $2)
             RETURNING architec_id",
        )
        .bind(req.castle_id)
        .bind(&req.architec_detail)
        .fetch_one(&self.pool)
        .await
        .map_err(Error::from_sqlx)
    }

    async fn list_architectures(&self, castle_id: i32) -> Result<Vec<Architecture>> {
        sqlx::query_as::<_, Architecture>(
            "SELECT architec_id, castle_id, architec_detail
             FROM architectures WHERE castle_id = $1 ORDER BY architec_id",
        )
        .bind(castle_id)
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)
    }

    async fn delete_architecture(&self, architec_id: i32) -> Result<()> {
        let result = sqlx::query("DELETE FROM architectures WHERE architec_id = $1")
            .bind(architec_id)
            .execute(&self.pool)
            .await
            .map_err(Error::Database)?;

        if result.rows_affected() == 0 {
            return Err(Error::NotFound(format!("architecture {architec_id}")));
        }
        Ok(())
    }

    async fn insert_image(&self, req: CreateImageRequest) -> Result<i32> {
        req.validate()?;

        sqlx::query_scalar(
            "INSERT INTO images (castle_id, img_description, image_vector)
             VALUES ($1, $2, $3)
             RETURNING img_id",
        )
        .bind(req.castle_id)
        .bind(&req.img_description)
        .bind(req.image_vector.map(Vector::from))
        .fetch_one(&self.pool)
        .await
        .map_err(Error::from_sqlx)
    }

    async fn get_image(&self, img_id: i32) -> Result<Option<Image>> {
        sqlx::query_as::<_, Image>(
            "SELECT img_id, castle_id, img_description, image_vector
             FROM images WHERE img_id = $1",
        )
        .bind(img_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Database)
    }

    async fn list_images(&self, castle_id: i32) -> Result<Vec<ImageResponse>> {
        // Vectors stay inside the storage layer; listings project them out.
        let images = sqlx::query_as::<_, Image>(
            "SELECT img_id, castle_id, img_description, image_vector
             FROM images WHERE castle_id = $1 ORDER BY img_id",
        )
        .bind(castle_id)
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(images.into_iter().map(ImageResponse::from).collect())
    }

    async fn delete_image(&self, img_id: i32) -> Result<()> {
        let result = sqlx::query("DELETE FROM images WHERE img_id = $1")
            .bind(img_id)
            .execute(&self.pool)
            .await
            .map_err(Error::Database)?;

        if result.rows_affected() == 0 {
            return Err(Error::NotFound(format!("image {img_id}")));
        }
        Ok(())
    }

    async fn insert_event(&self, req: CreateEventRequest) -> Result<i32> {
        req.validate()?;

        sqlx::query_scalar(
            "INSERT INTO events
                 (castle_id, event_name, event_description, event_start, event_end, event_time)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING event_id",
        )
        .bind(req.castle_id)
        .bind(&req.event_name)
        .bind(&req.event_description)
        .bind(req.event_start)
        .bind(req.event_end)
        .bind(&req.event_time)
        .fetch_one(&self.pool)
        .await
        .map_err(Error::from_sqlx)
    }

    async fn get_event(&self, event_id: i32) -> Result<Option<Event>> {
        sqlx::query_as::<_, Event>(
            "SELECT event_id, castle_id, event_name, event_description,
                    event_start, event_end, event_time
             FROM events WHERE event_id = $1",
        )
        .bind(event_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Database)
    }

    async fn list_events(&self, castle_id: i32) -> Result<Vec<Event>> {
        sqlx::query_as::<_, Event>(
            "SELECT event_id, castle_id, event_name, event_description,
                    event_start, event_end, event_time
             FROM events WHERE castle_id = $1 ORDER BY event_start",
        )
        .bind(castle_id)
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)
    }

    async fn update_event(&self, event_id: i32, req: CreateEventRequest) -> Result<()> {
        req.validate()?;

        let result = sqlx::query(
            "UPDATE events
             SET castle_id = $2, event_name = $3, event_description = $4,
                 event_start = $5, event_end = $6, event_time = $7
             WHERE event_id = $1",
        )
        .bind(event_id)
        .bind(req.castle_id)
        .bind(&req.event_name)
        .bind(&req.event_description)
        .bind(req.event_start)
        .bind(req.event_end)
        .bind(&req.event_time)
        .execute(&self.pool)
        .await
        .map_err(Error::from_sqlx)?;

        if result.rows_affected() == 0 {
            return Err(Error::NotFound(format!("event {event_id}")));
        }
        Ok(())
    }

    async fn delete_event(&self, event_id: i32) -> Result<()> {
        let result = sqlx::query("DELETE FROM events WHERE event_id = $1")
            .bind(event_id)
            .execute(&self.pool)
            .await
            .map_err(Error::Database)?;

        if result.rows_affected() == 0 {
            return Err(Error::NotFound(format!("event {event_id}")));
        }
        Ok(())
    }

    async fn insert_nearby_place(&self, req: CreateNearbyPlaceRequest) -> Result<i32> {
        sqlx::query_scalar(
            "INSERT INTO nearby_places (castle_id, place_name, nearby_detail)
             VALUES ($1, $2, $3)
             RETURNING place_id",
        )
        .bind(req.castle_id)
        .bind(&req.place_name)
        .bind(&req.nearby_detail)
        .fetch_one(&self.pool)
        .await
        .map_err(Error::from_sqlx)
    }

    async fn list_nearby_places(&self, castle_id: i32) -> Result<Vec<NearbyPlace>> {
        sqlx::query_as::<_, NearbyPlace>(
            "SELECT place_id, castle_id, place_name, nearby_detail
             FROM nearby_places WHERE castle_id = $1 ORDER BY place_id",
        )
        .bind(castle_id)
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)
    }

    async fn delete_nearby_place(&self, place_id: i32) -> Result<()> {
        let result = sqlx::query("DELETE FROM nearby_places WHERE place_id = $1")
            .bind(place_id)
            .execute(&self.pool)
            .await
            .map_err(Error::Database)?;

        if result.rows_affected() == 0 {
            return Err(Error::NotFound(format!("nearby place {place_id}")));
        }
        Ok(())
    }
}
