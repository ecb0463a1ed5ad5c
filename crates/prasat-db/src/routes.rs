//! Route repository and the route ↔ castle many-to-many link.

use async_trait::async_trait;
use sqlx::{Pool, Postgres};

use prasat_core::{
    Castle, CreateRouteRequest, Error, Page, Result, Route, RouteRepository,
};

/// PostgreSQL implementation of RouteRepository.
pub struct PgRouteRepository {
    pool: Pool<Postgres>,
}

impl PgRouteRepository {
    /// Create a new PgRouteRepository with the given connection pool.
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RouteRepository for PgRouteRepository {
    async fn insert(&self, req: CreateRouteRequest) -> Result<i32> {
        sqlx::query_scalar(
            "INSERT INTO routes (route_name, description_gps)
             VALUES ($1, $2)
             RETURNING route_id",
        )
        .bind(&req.route_name)
        .bind(&req.description_gps)
        .fetch_one(&self.pool)
        .await
        .map_err(Error::from_sqlx)
    }

    async fn get(&self, route_id: i32) -> Result<Option<Route>> {
        sqlx::query_as::<_, Route>(
            "SELECT route_id, route_name, description_gps FROM routes WHERE route_id = $1",
        )
        .bind(route_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Database)
    }

    async fn list(&self, page: Page) -> Result<Vec<Route>> {
        sqlx::query_as::<_, Route>(
            "SELECT route_id, route_name, description_gps
             FROM routes ORDER BY route_name LIMIT $1 OFFSET $2",
        )
        .bind(page.limit)
        .bind(page.offset)
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)
    }

    async fn update(&self, route_id: i32, req: CreateRouteRequest) -> Result<()> {
        let result = sqlx::query(
            "UPDATE routes SET route_name = $2, description_gps = $3 WHERE route_id = $1",
        )
        .bind(route_id)
        .bind(&req.route_name)
        .bind(&req.description_gps)
        .execute(&self.pool)
        .await
        .map_err(Error::from_sqlx)?;

        if result.rows_affected() == 0 {
            return Err(Error::NotFound(format!("route {route_id}")));
        }
        Ok(())
    }

    async fn delete(&self, route_id: i32) -> Result<()> {
        let result = sqlx::query("DELETE FROM routes WHERE route_id = $1")
            .bind(route_id)
            .execute(&self.pool)
            .await
            .map_err(Error::Database)?;

        if result.rows_affected() == 0 {
            return Err(Error::NotFound(format!("route {route_id}")));
        }
        Ok(())
    }

    async fn add_castle(&self, route_id: i32, castle_id: i32) -> Result<()> {
        // Composite primary key makes a repeated pair a conflict.
        sqlx::query("INSERT INTO route_castles (route_id, castle_id) VALUES ($1, $2)")
            .bind(route_id)
            .bind(castle_id)
            .execute(&self.pool)
            .await
            .map_err(Error::from_sqlx)?;
        Ok(())
    }

    async fn remove_castle(&self, route_id: i32, castle_id: i32) -> Result<()> {
        let result =
            sqlx::query("DELETE FROM route_castles WHERE route_id = $1 AND castle_id = $2")
                .bind(route_id)
                .bind(castle_id)
                .execute(&self.pool)
                .await
                .map_err(Error::Database)?;

        if result.rows_affected() == 0 {
            return Err(Error::NotFound(format!(
                "castle {castle_id} on route {route_id}"
            )));
        }
        Ok(())
    }

    async fn list_castles(&self, route_id: i32) -> Result<Vec<Castle>> {
        sqlx::query_as::<_, Castle>(
            "SELECT c.castle_id, c.castle_name, c.castle_description, c.era,
                    c.type_id, c.text_vector
             FROM castles c
             JOIN route_castles rc ON rc.castle_id = c.castle_id
             WHERE rc.route_id = $1
             ORDER BY c.castle_name",
        )
        .bind(route_id)
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)
    }
}
