//! Trip plan and itinerary repository implementation.
//!
//! Creating a plan together with its stops is a single transaction:
//! either the plan row and every itinerary row land, or none do.

use async_trait::async_trait;
use sqlx::{Pool, Postgres, Transaction};
use tracing::debug;

use prasat_core::{
    CreateTripItineraryRequest, CreateTripPlanRequest, Error, Result, TripItinerary, TripPlan,
    TripRepository, TripStop,
};

/// PostgreSQL implementation of TripRepository.
pub struct PgTripRepository {
    pool: Pool<Postgres>,
}

impl PgTripRepository {
    /// Create a new PgTripRepository with the given connection pool.
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    async fn insert_plan_tx(
        tx: &mut Transaction<'_, Postgres>,
        req: &CreateTripPlanRequest,
    ) -> Result<i32> {
        sqlx::query_scalar(
            "INSERT INTO trip_plans
                 (user_id, route_id, event_id, plan_name, event_description,
                  start_date, end_date, duration)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING plan_id",
        )
        .bind(req.user_id)
        .bind(req.route_id)
        .bind(req.event_id)
        .bind(&req.plan_name)
        .bind(&req.event_description)
        .bind(req.start_date)
        .bind(req.end_date)
        .bind(req.duration)
        .fetch_one(&mut **tx)
        .await
        .map_err(Error::from_sqlx)
    }

    async fn insert_itinerary_tx(
        tx: &mut Transaction<'_, Postgres>,
        plan_id: i32,
        stop: &TripStop,
    ) -> Result<i32> {
        sqlx::query_scalar(
            "INSERT INTO trip_itineraries
                 (plan_id, castle_id, event_id, start_time, end_time)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING itinerary_id",
        )
        .bind(plan_id)
        .bind(stop.castle_id)
        .bind(stop.event_id)
        .bind(stop.start_time)
        .bind(stop.end_time)
        .fetch_one(&mut **tx)
        .await
        .map_err(Error::from_sqlx)
    }
}

#[async_trait]
impl TripRepository for PgTripRepository {
    async fn create_plan(&self, req: CreateTripPlanRequest) -> Result<i32> {
        self.create_plan_with_itineraries(req, Vec::new()).await
    }

    async fn create_plan_with_itineraries(
        &self,
        req: CreateTripPlanRequest,
        stops: Vec<TripStop>,
    ) -> Result<i32> {
        // All validation happens before the transaction opens; a
        // rejected request never touches storage.
        req.validate()?;
        for stop in &stops {
            stop.validate()?;
        }

        let mut tx = self.pool.begin().await.map_err(Error::Database)?;
        let plan_id = Self::insert_plan_tx(&mut tx, &req).await?;
        for stop in &stops {
            Self::insert_itinerary_tx(&mut tx, plan_id, stop).await?;
        }
        tx.commit().await.map_err(Error::Database)?;

        debug!(
            subsystem = "database",
            component = "trips",
            op = "create_plan",
            plan_id,
            row_count = stops.len() + 1,
            "Trip plan created"
        );
        Ok(plan_id)
    }

    async fn get_plan(&self, plan_id: i32) -> Result<Option<TripPlan>> {
        sqlx::query_as::<_, TripPlan>(
            "SELECT plan_id, user_id, route_id, event_id, plan_name, event_description,
                    start_date, end_date, duration
             FROM trip_plans WHERE plan_id = $1",
        )
        .bind(plan_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Database)
    }

    async fn list_plans_for_user(&self, user_id: i32) -> Result<Vec<TripPlan>> {
        sqlx::query_as::<_, TripPlan>(
            "SELECT plan_id, user_id, route_id, event_id, plan_name, event_description,
                    start_date, end_date, duration
             FROM trip_plans WHERE user_id = $1 ORDER BY start_date",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)
    }

    async fn update_plan(&self, plan_id: i32, req: CreateTripPlanRequest) -> Result<()> {
        req.validate()?;

        let result = sqlx::query(
            "UPDATE trip_plans
             SET user_id = $2, route_id = $3, event_id = $4, plan_name = $5,
                 event_description = $6, start_date = $7, end_date = $8, duration = $9
             WHERE plan_id = $1",
        )
        .bind(plan_id)
        .bind(req.user_id)
        .bind(req.route_id)
        .bind(req.event_id)
        .bind(&req.plan_name)
        .bind(&req.event_description)
        .bind(req.start_date)
        .bind(req.end_date)
        .bind(req.duration)
        .execute(&self.pool)
        .await
        .map_err(Error::from_sqlx)?;

        if result.rows_affected() == 0 {
            return Err(Error::NotFound(format!("trip plan {plan_id}")));
        }
        Ok(())
    }

    async fn delete_plan(&self, plan_id: i32) -> Result<()> {
        let result = sqlx::query("DELETE FROM trip_plans WHERE plan_id = $1")
            .bind(plan_id)
            .execute(&self.pool)
            .await
            .map_err(Error::Database)?;

        if result.rows_affected() == 0 {
            return Err(Error::NotFound(format!("trip plan {plan_id}")));
        }
        Ok(())
    }

    async fn add_itinerary(&self, req: CreateTripItineraryRequest) -> Result<i32> {
        req.validate()?;

        sqlx::query_scalar(
            "INSERT INTO trip_itineraries
                 (plan_id, castle_id, event_id, start_time, end_time)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING itinerary_id",
        )
        .bind(req.plan_id)
        .bind(req.castle_id)
        .bind(req.event_id)
        .bind(req.start_time)
        .bind(req.end_time)
        .fetch_one(&self.pool)
        .await
        .map_err(Error::from_sqlx)
    }

    async fn list_itineraries(&self, plan_id: i32) -> Result<Vec<TripItinerary>> {
        sqlx::query_as::<_, TripItinerary>(
            "SELECT itinerary_id, plan_id, castle_id, event_id, start_time, end_time
             FROM trip_itineraries
             WHERE plan_id = $1
             ORDER BY start_time",
        )
        .bind(plan_id)
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)
    }

    async fn delete_itinerary(&self, itinerary_id: i32) -> Result<()> {
        let result = sqlx::query("DELETE FROM trip_itineraries WHERE itinerary_id = $1")
            .bind(itinerary_id)
            .execute(&self.pool)
            .await
            .map_err(Error::Database)?;

        if result.rows_affected() == 0 {
            return Err(Error::NotFound(format!("itinerary {itinerary_id}")));
        }
        Ok(())
    }
}
