//! Integration tests for routes, route membership, trip plans, and
//! itinerary atomicity.
//!
//! This test suite validates:
//! - Duplicate route/castle pairs surfacing as conflicts (composite PK)
//! - Referential violations surfacing as client errors
//! - Plan + itineraries created in one transaction, all or nothing
//! - Itineraries listed ordered by start_time
//!
//! **IMPORTANT**: These tests require a fully migrated PostgreSQL
//! database reachable via `DATABASE_URL`. They skip silently when the
//! variable is unset.

use std::time::{SystemTime, UNIX_EPOCH};

use chrono::{Duration, TimeZone, Utc};
use prasat_db::{
    CastleRepository, CreateCastleRequest, CreateRouteRequest, CreateTripPlanRequest,
    CreateUserRequest, CreateVisitHistoryRequest, Database, Error, HistoryRepository,
    RouteRepository, TripRepository, TripStop, UserRepository,
};

async fn setup_test_db() -> Option<Database> {
    let url = match std::env::var("DATABASE_URL") {
        Ok(url) => url,
        Err(_) => {
            eprintln!("DATABASE_URL not set; skipping integration test");
            return None;
        }
    };
    Some(
        Database::connect(&url)
            .await
            .expect("Failed to connect to test database"),
    )
}

fn unique(prefix: &str) -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    format!("{prefix}_{nanos}")
}

async fn create_castle(db: &Database, name: &str) -> i32 {
    db.castles
        .insert(CreateCastleRequest {
            castle_name: unique(name),
            castle_description: None,
            era: None,
            type_id: None,
            text_vector: None,
        })
        .await
        .expect("Failed to create castle")
}

async fn create_user(db: &Database) -> i32 {
    db.users
        .insert(CreateUserRequest {
            username: unique("traveler"),
            email: format!("{}@example.com", unique("traveler")),
            tel: None,
            roles: None,
            password: "argon2id$test-hash".to_string(),
        })
        .await
        .expect("Failed to create user")
}

#[tokio::test]
async fn test_duplicate_route_castle_pair_is_conflict() {
    let Some(db) = setup_test_db().await else { return };

    let route_id = db
        .routes
        .insert(CreateRouteRequest {
            route_name: unique("Khmer trail"),
            description_gps: None,
        })
        .await
        .unwrap();
    let castle_id = create_castle(&db, "pair").await;

    db.routes
        .add_castle(route_id, castle_id)
        .await
        .expect("First pair should insert");

    let err = db
        .routes
        .add_castle(route_id, castle_id)
        .await
        .expect_err("Second identical pair must fail");
    assert!(matches!(err, Error::Conflict(_)), "got: {err}");

    let castles = db.routes.list_castles(route_id).await.unwrap();
    assert_eq!(castles.len(), 1);

    db.routes.delete(route_id).await.unwrap();
    db.castles.delete(castle_id).await.unwrap();
}

#[tokio::test]
async fn test_referential_violation_is_client_error() {
    let Some(db) = setup_test_db().await else { return };

    // Visit log referencing a user that does not exist.
    let err = db
        .history
        .record_visit(CreateVisitHistoryRequest {
            user_id: i32::MAX,
            castle_id: i32::MAX,
            visit_date: Utc::now(),
        })
        .await
        .expect_err("Dangling foreign key must fail");
    assert!(matches!(err, Error::ForeignKey(_)), "got: {err}");
}

#[tokio::test]
async fn test_plan_with_itineraries_is_atomic() {
    let Some(db) = setup_test_db().await else { return };

    let user_id = create_user(&db).await;
    let castle_id = create_castle(&db, "stop").await;
    let day = Utc.with_ymd_and_hms(2026, 5, 1, 8, 0, 0).unwrap();

    // A stop referencing a nonexistent castle rolls back the plan too.
    let err = db
        .trips
        .create_plan_with_itineraries(
            CreateTripPlanRequest {
                user_id,
                route_id: None,
                event_id: None,
                plan_name: "doomed plan".to_string(),
                event_description: None,
                start_date: day,
                end_date: day + Duration::days(2),
                duration: 3,
            },
            vec![
                TripStop {
                    castle_id,
                    event_id: None,
                    start_time: day,
                    end_time: day + Duration::hours(3),
                },
                TripStop {
                    castle_id: i32::MAX,
                    event_id: None,
                    start_time: day + Duration::hours(4),
                    end_time: day + Duration::hours(6),
                },
            ],
        )
        .await
        .expect_err("Dangling castle reference must fail the whole plan");
    assert!(matches!(err, Error::ForeignKey(_)));
    assert!(
        db.trips.list_plans_for_user(user_id).await.unwrap().is_empty(),
        "No plan row may survive a failed itinerary insert"
    );

    // A valid plan lands with its stops, listed by start_time.
    let plan_id = db
        .trips
        .create_plan_with_itineraries(
            CreateTripPlanRequest {
                user_id,
                route_id: None,
                event_id: None,
                plan_name: "Isan weekend".to_string(),
                event_description: None,
                start_date: day,
                end_date: day + Duration::days(2),
                duration: 3,
            },
            vec![
                // Deliberately out of order.
                TripStop {
                    castle_id,
                    event_id: None,
                    start_time: day + Duration::hours(6),
                    end_time: day + Duration::hours(8),
                },
                TripStop {
                    castle_id,
                    event_id: None,
                    start_time: day,
                    end_time: day + Duration::hours(3),
                },
            ],
        )
        .await
        .expect("Valid plan should land");

    let stops = db.trips.list_itineraries(plan_id).await.unwrap();
    assert_eq!(stops.len(), 2);
    assert!(stops[0].start_time <= stops[1].start_time);

    // Deleting the plan cascades the stops.
    db.trips.delete_plan(plan_id).await.unwrap();
    assert!(db.trips.list_itineraries(plan_id).await.unwrap().is_empty());

    db.users.delete(user_id).await.unwrap();
    db.castles.delete(castle_id).await.unwrap();
}

#[tokio::test]
async fn test_plan_date_range_rejected_before_storage() {
    let Some(db) = setup_test_db().await else { return };

    let user_id = create_user(&db).await;
    let day = Utc.with_ymd_and_hms(2026, 5, 1, 8, 0, 0).unwrap();

    let err = db
        .trips
        .create_plan(CreateTripPlanRequest {
            user_id,
            route_id: None,
            event_id: None,
            plan_name: "backwards".to_string(),
            event_description: None,
            start_date: day,
            end_date: day - Duration::days(1),
            duration: 1,
        })
        .await
        .expect_err("end_date before start_date must be rejected");
    assert!(matches!(err, Error::Validation(_)));
    assert!(db.trips.list_plans_for_user(user_id).await.unwrap().is_empty());

    db.users.delete(user_id).await.unwrap();
}

#[tokio::test]
async fn test_user_delete_cascades_plans() {
    let Some(db) = setup_test_db().await else { return };

    let user_id = create_user(&db).await;
    let day = Utc.with_ymd_and_hms(2026, 6, 1, 8, 0, 0).unwrap();

    let plan_id = db
        .trips
        .create_plan(CreateTripPlanRequest {
            user_id,
            route_id: None,
            event_id: None,
            plan_name: "orphan check".to_string(),
            event_description: None,
            start_date: day,
            end_date: day,
            duration: 1,
        })
        .await
        .unwrap();

    db.users.delete(user_id).await.unwrap();
    assert!(db.trips.get_plan(plan_id).await.unwrap().is_none());
}
