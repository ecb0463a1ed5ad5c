//! User activity history repository: search log, visit log, interests.
//!
//! The two history tables are append-only; there are no update
//! operations on them by design.

use async_trait::async_trait;
use sqlx::{Pool, Postgres};

use prasat_core::{
    CreateInterestRequest, CreateSearchHistoryRequest, CreateVisitHistoryRequest, Error,
    HistoryRepository, Interest, Result, SearchHistory, VisitHistory,
};

/// PostgreSQL implementation of HistoryRepository.
pub struct PgHistoryRepository {
    pool: Pool<Postgres>,
}

impl PgHistoryRepository {
    /// Create a new PgHistoryRepository with the given connection pool.
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl HistoryRepository for PgHistoryRepository {
    async fn record_search(&self, req: CreateSearchHistoryRequest) -> Result<i32> {
        sqlx::query_scalar(
            "INSERT INTO search_histories (user_id, query_text, search_time)
             VALUES ($1, $2, $3)
             RETURNING search_id",
        )
        .bind(req.user_id)
        .bind(&req.query_text)
        .bind(req.search_time)
        .fetch_one(&self.pool)
        .await
        .map_err(Error::from_sqlx)
    }

    async fn list_searches(&self, user_id: i32, limit: i64) -> Result<Vec<SearchHistory>> {
        sqlx::query_as::<_, SearchHistory>(
            "SELECT search_id, user_id, query_text, search_time
             FROM search_histories
             WHERE user_id = $1
             ORDER BY search_time DESC
             LIMIT $2",
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)
    }

    async fn record_visit(&self, req: CreateVisitHistoryRequest) -> Result<i32> {
        sqlx::query_scalar(
            "INSERT INTO visit_histories (user_id, castle_id, visit_date)
             VALUES ($1, $2, $3)
             RETURNING visit_id",
        )
        .bind(req.user_id)
        .bind(req.castle_id)
        .bind(req.visit_date)
        .fetch_one(&self.pool)
        .await
        .map_err(Error::from_sqlx)
    }

    async fn list_visits(&self, user_id: i32, limit: i64) -> Result<Vec<VisitHistory>> {
        sqlx::query_as::<_, VisitHistory>(
            "SELECT visit_id, user_id, castle_id, visit_date
             FROM visit_histories
             WHERE user_id = $1
             ORDER BY visit_date DESC
             LIMIT $2",
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)
    }

    async fn add_interest(&self, req: CreateInterestRequest) -> Result<i32> {
        sqlx::query_scalar(
            "INSERT INTO interests (user_id, castle_id, interest_name)
             VALUES ($1, $2, $3)
             RETURNING interest_id",
        )
        .bind(req.user_id)
        .bind(req.castle_id)
        .bind(&req.interest_name)
        .fetch_one(&self.pool)
        .await
        .map_err(Error::from_sqlx)
    }

    async fn list_interests(&self, user_id: i32) -> Result<Vec<Interest>> {
        sqlx::query_as::<_, Interest>(
            "SELECT interest_id, user_id, castle_id, interest_name
             FROM interests
             WHERE user_id = $1
             ORDER BY interest_id",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)
    }

    async fn remove_interest(&self, interest_id: i32) -> Result<()> {
        let result = sqlx::query("DELETE FROM interests WHERE interest_id = $1")
            .bind(interest_id)
            .execute(&self.pool)
            .await
            .map_err(Error::Database)?;

        if result.rows_affected() == 0 {
            return Err(Error::NotFound(format!("interest {interest_id}")));
        }
        Ok(())
    }
}
