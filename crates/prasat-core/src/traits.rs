//! Repository traits and request shapes.
//!
//! Request structs are the validated input side of the transfer
//! contract; each carries a `validate` method that is run before any
//! storage operation. Traits define the interfaces the PostgreSQL
//! implementations in `prasat-db` satisfy, keeping upstream layers
//! testable against mocks.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::defaults::{IMAGE_EMBED_DIMENSION, TEXT_EMBED_DIMENSION};
use crate::error::Result;
use crate::models::*;
use crate::validation::{
    validate_email, validate_latitude, validate_longitude, validate_time_range,
    validate_vector_dimension,
};

// =============================================================================
// USER REQUESTS
// =============================================================================

/// Request for creating a user. `password` is the upstream-computed
/// hash; `roles` defaults to "user" when omitted.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateUserRequest {
    pub username: String,
    pub email: String,
    pub tel: Option<String>,
    pub roles: Option<String>,
    pub password: String,
}

impl CreateUserRequest {
    pub fn validate(&self) -> Result<()> {
        validate_email(&self.email)
    }
}

/// Full-record user update. Password changes are an auth-layer
/// concern and deliberately not part of this shape.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateUserRequest {
    pub username: String,
    pub email: String,
    pub tel: Option<String>,
    pub roles: String,
}

impl UpdateUserRequest {
    pub fn validate(&self) -> Result<()> {
        validate_email(&self.email)
    }
}

// =============================================================================
// HISTORY REQUESTS
// =============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct CreateSearchHistoryRequest {
    pub user_id: i32,
    pub query_text: String,
    pub search_time: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateVisitHistoryRequest {
    pub user_id: i32,
    pub castle_id: i32,
    pub visit_date: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateInterestRequest {
    pub user_id: i32,
    pub castle_id: i32,
    pub interest_name: String,
}

// =============================================================================
// CASTLE REQUESTS
// =============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct CreateCastleTypeRequest {
    pub type_detail: String,
}

/// Request for creating or fully updating a castle. The text
/// embedding, when supplied, must be exactly 768-dimensional.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateCastleRequest {
    pub castle_name: String,
    pub castle_description: Option<String>,
    pub era: Option<String>,
    pub type_id: Option<i32>,
    pub text_vector: Option<Vec<f32>>,
}

impl CreateCastleRequest {
    pub fn validate(&self) -> Result<()> {
        if let Some(v) = &self.text_vector {
            validate_vector_dimension("text_vector", v, TEXT_EMBED_DIMENSION)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateArchitectureRequest {
    pub castle_id: i32,
    pub architec_detail: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateLocationRequest {
    pub latitude: f64,
    pub longitude: f64,
    pub sub_district: Option<String>,
    pub district: Option<String>,
    pub province: Option<String>,
}

impl CreateLocationRequest {
    pub fn validate(&self) -> Result<()> {
        validate_latitude(self.latitude)?;
        validate_longitude(self.longitude)
    }
}

// =============================================================================
// ASSET REQUESTS
// =============================================================================

/// Request for creating an image. The embedding, when supplied, must
/// be exactly 512-dimensional.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateImageRequest {
    pub castle_id: i32,
    pub img_description: Option<String>,
    pub image_vector: Option<Vec<f32>>,
}

impl CreateImageRequest {
    pub fn validate(&self) -> Result<()> {
        if let Some(v) = &self.image_vector {
            validate_vector_dimension("image_vector", v, IMAGE_EMBED_DIMENSION)?;
        }
        Ok(())
    }
}

/// Request for creating an event. `event_end` must not precede
/// `event_start`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateEventRequest {
    pub castle_id: i32,
    pub event_name: String,
    pub event_description: Option<String>,
    pub event_start: DateTime<Utc>,
    pub event_end: DateTime<Utc>,
    pub event_time: Option<String>,
}

impl CreateEventRequest {
    pub fn validate(&self) -> Result<()> {
        validate_time_range("event", self.event_start, self.event_end)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateNearbyPlaceRequest {
    pub castle_id: i32,
    pub place_name: String,
    pub nearby_detail: Option<String>,
}

// =============================================================================
// ROUTE REQUESTS
// =============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct CreateRouteRequest {
    pub route_name: String,
    pub description_gps: Option<String>,
}

// =============================================================================
// TRIP REQUESTS
// =============================================================================

/// Request for creating a trip plan. `route_id` and `event_id` are
/// optional references resolved against existing rows.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateTripPlanRequest {
    pub user_id: i32,
    pub route_id: Option<i32>,
    pub event_id: Option<i32>,
    pub plan_name: String,
    pub event_description: Option<String>,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub duration: i32,
}

impl CreateTripPlanRequest {
    pub fn validate(&self) -> Result<()> {
        validate_time_range("trip_plan", self.start_date, self.end_date)
    }
}

/// One stop of a plan being created atomically with its itineraries
/// (the plan id is assigned by the server inside the transaction).
#[derive(Debug, Clone, Deserialize)]
pub struct TripStop {
    pub castle_id: i32,
    pub event_id: Option<i32>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

impl TripStop {
    pub fn validate(&self) -> Result<()> {
        validate_time_range("itinerary", self.start_time, self.end_time)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateTripItineraryRequest {
    pub plan_id: i32,
    pub castle_id: i32,
    pub event_id: Option<i32>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

impl CreateTripItineraryRequest {
    pub fn validate(&self) -> Result<()> {
        validate_time_range("itinerary", self.start_time, self.end_time)
    }
}

// =============================================================================
// DOCUMENT REQUESTS
// =============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct CreateDocumentRequest {
    pub castle_id: i32,
    pub document_name: String,
}

/// Request for creating a retrieval chunk. The embedding, when
/// supplied, must be exactly 768-dimensional.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatePlaceRequest {
    pub document_id: i32,
    pub castle_id: Option<i32>,
    pub document_vector: Option<Vec<f32>>,
}

impl CreatePlaceRequest {
    pub fn validate(&self) -> Result<()> {
        if let Some(v) = &self.document_vector {
            validate_vector_dimension("document_vector", v, TEXT_EMBED_DIMENSION)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateKeywordRequest {
    pub keyword: String,
}

// =============================================================================
// PAGINATION
// =============================================================================

/// Limit/offset pair for list operations.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Page {
    pub limit: i64,
    pub offset: i64,
}

impl Default for Page {
    fn default() -> Self {
        Self {
            limit: crate::defaults::DEFAULT_PAGE_SIZE,
            offset: 0,
        }
    }
}

// =============================================================================
// REPOSITORY TRAITS
// =============================================================================

/// Repository for user CRUD operations.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new user, returning the assigned id. Duplicate
    /// username or email surfaces as `Error::Conflict`.
    async fn insert(&self, req: CreateUserRequest) -> Result<i32>;

    /// Fetch a user by id.
    async fn get(&self, user_id: i32) -> Result<Option<User>>;

    /// Fetch a user by unique username.
    async fn get_by_username(&self, username: &str) -> Result<Option<User>>;

    /// List users, newest id first.
    async fn list(&self, page: Page) -> Result<Vec<User>>;

    /// Full-record update. `Error::NotFound` when the id is unknown.
    async fn update(&self, user_id: i32, req: UpdateUserRequest) -> Result<()>;

    /// Delete a user; owned histories, interests, and plans cascade.
    async fn delete(&self, user_id: i32) -> Result<()>;
}

/// Repository for the append-only user activity logs and interests.
#[async_trait]
pub trait HistoryRepository: Send + Sync {
    async fn record_search(&self, req: CreateSearchHistoryRequest) -> Result<i32>;
    async fn list_searches(&self, user_id: i32, limit: i64) -> Result<Vec<SearchHistory>>;

    async fn record_visit(&self, req: CreateVisitHistoryRequest) -> Result<i32>;
    async fn list_visits(&self, user_id: i32, limit: i64) -> Result<Vec<VisitHistory>>;

    async fn add_interest(&self, req: CreateInterestRequest) -> Result<i32>;
    async fn list_interests(&self, user_id: i32) -> Result<Vec<Interest>>;
    async fn remove_interest(&self, interest_id: i32) -> Result<()>;
}

/// Repository for castles and their type lookup.
#[async_trait]
pub trait CastleRepository: Send + Sync {
    async fn insert(&self, req: CreateCastleRequest) -> Result<i32>;
    async fn get(&self, castle_id: i32) -> Result<Option<Castle>>;

    /// Fetch a castle projected for response, with its linked location
    /// resolved through the link table in the same query.
    async fn get_with_location(&self, castle_id: i32) -> Result<Option<CastleResponse>>;

    async fn list(&self, page: Page) -> Result<Vec<Castle>>;

    /// Case-insensitive name search.
    async fn search_by_name(&self, name: &str, limit: i64) -> Result<Vec<Castle>>;

    /// Full-record update.
    async fn update(&self, castle_id: i32, req: CreateCastleRequest) -> Result<()>;

    /// Replace only the text embedding (re-embedding pipeline hook).
    async fn update_text_vector(&self, castle_id: i32, vector: Vec<f32>) -> Result<()>;

    /// Delete a castle; all owned asset rows and link rows cascade.
    async fn delete(&self, castle_id: i32) -> Result<()>;

    async fn insert_type(&self, req: CreateCastleTypeRequest) -> Result<i32>;
    async fn get_type(&self, type_id: i32) -> Result<Option<CastleType>>;
    async fn list_types(&self) -> Result<Vec<CastleType>>;
    async fn delete_type(&self, type_id: i32) -> Result<()>;
}

/// Repository for locations and the 1:1 castle link.
#[async_trait]
pub trait LocationRepository: Send + Sync {
    async fn insert(&self, req: CreateLocationRequest) -> Result<i32>;
    async fn get(&self, location_id: i32) -> Result<Option<Location>>;
    async fn update(&self, location_id: i32, req: CreateLocationRequest) -> Result<()>;
    async fn delete(&self, location_id: i32) -> Result<()>;

    /// Link a location to a castle. A second link for either side
    /// surfaces as `Error::Conflict` (castle_id is the link primary
    /// key; location_id is unique).
    async fn link_castle(&self, castle_id: i32, location_id: i32) -> Result<()>;
    async fn unlink_castle(&self, castle_id: i32) -> Result<()>;
    async fn get_for_castle(&self, castle_id: i32) -> Result<Option<Location>>;
}

/// Repository for castle-owned asset rows: architectures, images,
/// events, nearby places.
#[async_trait]
pub trait CastleAssetRepository: Send + Sync {
    async fn insert_architecture(&self, req: CreateArchitectureRequest) -> Result<i32>;
    async fn list_architectures(&self, castle_id: i32) -> Result<Vec<Architecture>>;
    async fn delete_architecture(&self, architec_id: i32) -> Result<()>;

    async fn insert_image(&self, req: CreateImageRequest) -> Result<i32>;
    async fn get_image(&self, img_id: i32) -> Result<Option<Image>>;
    async fn list_images(&self, castle_id: i32) -> Result<Vec<ImageResponse>>;
    async fn delete_image(&self, img_id: i32) -> Result<()>;

    async fn insert_event(&self, req: CreateEventRequest) -> Result<i32>;
    async fn get_event(&self, event_id: i32) -> Result<Option<Event>>;
    async fn list_events(&self, castle_id: i32) -> Result<Vec<Event>>;
    async fn update_event(&self, event_id: i32, req: CreateEventRequest) -> Result<()>;
    async fn delete_event(&self, event_id: i32) -> Result<()>;

    async fn insert_nearby_place(&self, req: CreateNearbyPlaceRequest) -> Result<i32>;
    async fn list_nearby_places(&self, castle_id: i32) -> Result<Vec<NearbyPlace>>;
    async fn delete_nearby_place(&self, place_id: i32) -> Result<()>;
}

/// Repository for routes and their castle membership.
#[async_trait]
pub trait RouteRepository: Send + Sync {
    async fn insert(&self, req: CreateRouteRequest) -> Result<i32>;
    async fn get(&self, route_id: i32) -> Result<Option<Route>>;
    async fn list(&self, page: Page) -> Result<Vec<Route>>;
    async fn update(&self, route_id: i32, req: CreateRouteRequest) -> Result<()>;
    async fn delete(&self, route_id: i32) -> Result<()>;

    /// Add a castle to a route. Adding the same pair twice surfaces as
    /// `Error::Conflict` (composite primary key).
    async fn add_castle(&self, route_id: i32, castle_id: i32) -> Result<()>;
    async fn remove_castle(&self, route_id: i32, castle_id: i32) -> Result<()>;
    async fn list_castles(&self, route_id: i32) -> Result<Vec<Castle>>;
}

/// Repository for trip plans and their itineraries.
#[async_trait]
pub trait TripRepository: Send + Sync {
    async fn create_plan(&self, req: CreateTripPlanRequest) -> Result<i32>;

    /// Create a plan and all its stops in one transaction; either the
    /// plan and every itinerary row land, or none do.
    async fn create_plan_with_itineraries(
        &self,
        req: CreateTripPlanRequest,
        stops: Vec<TripStop>,
    ) -> Result<i32>;

    async fn get_plan(&self, plan_id: i32) -> Result<Option<TripPlan>>;
    async fn list_plans_for_user(&self, user_id: i32) -> Result<Vec<TripPlan>>;
    async fn update_plan(&self, plan_id: i32, req: CreateTripPlanRequest) -> Result<()>;
    async fn delete_plan(&self, plan_id: i32) -> Result<()>;

    async fn add_itinerary(&self, req: CreateTripItineraryRequest) -> Result<i32>;

    /// Itineraries of a plan, ordered by start_time.
    async fn list_itineraries(&self, plan_id: i32) -> Result<Vec<TripItinerary>>;
    async fn delete_itinerary(&self, itinerary_id: i32) -> Result<()>;
}

/// Repository for retrieval documents, their chunks, and keywords.
#[async_trait]
pub trait DocumentRepository: Send + Sync {
    async fn insert(&self, req: CreateDocumentRequest) -> Result<i32>;
    async fn get(&self, document_id: i32) -> Result<Option<Document>>;
    async fn list_for_castle(&self, castle_id: i32) -> Result<Vec<Document>>;
    async fn delete(&self, document_id: i32) -> Result<()>;

    async fn insert_place(&self, req: CreatePlaceRequest) -> Result<i32>;
    async fn get_place(&self, place_id: i32) -> Result<Option<Place>>;
    async fn list_places(&self, document_id: i32) -> Result<Vec<PlaceResponse>>;
    async fn delete_place(&self, place_id: i32) -> Result<()>;

    /// Insert a keyword. Duplicate text surfaces as `Error::Conflict`.
    async fn insert_keyword(&self, req: CreateKeywordRequest) -> Result<i32>;
    async fn list_keywords(&self) -> Result<Vec<Keyword>>;
    async fn delete_keyword(&self, keyword_id: i32) -> Result<()>;

    async fn tag_place(&self, place_id: i32, keyword_id: i32) -> Result<()>;
    async fn untag_place(&self, place_id: i32, keyword_id: i32) -> Result<()>;
    async fn keywords_for_place(&self, place_id: i32) -> Result<Vec<Keyword>>;
    async fn places_for_keyword(&self, keyword_id: i32) -> Result<Vec<PlaceResponse>>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_create_user_request_rejects_bad_email() {
        let req = CreateUserRequest {
            username: "alice".to_string(),
            email: "nope".to_string(),
            tel: None,
            roles: None,
            password: "secret".to_string(),
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_create_image_request_dimension_check() {
        let mut req = CreateImageRequest {
            castle_id: 5,
            img_description: None,
            image_vector: Some(vec![0.0; 511]),
        };
        assert!(req.validate().is_err());
        req.image_vector = Some(vec![0.0; 512]);
        assert!(req.validate().is_ok());
        req.image_vector = None;
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_create_event_request_range_check() {
        let start = Utc.with_ymd_and_hms(2026, 4, 13, 9, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2026, 4, 15, 18, 0, 0).unwrap();
        let mut req = CreateEventRequest {
            castle_id: 1,
            event_name: "Songkran fair".to_string(),
            event_description: None,
            event_start: start,
            event_end: end,
            event_time: Some("09:00-18:00".to_string()),
        };
        assert!(req.validate().is_ok());
        req.event_end = start - chrono::Duration::days(1);
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_create_trip_plan_request_range_check() {
        let start = Utc.with_ymd_and_hms(2026, 5, 1, 0, 0, 0).unwrap();
        let req = CreateTripPlanRequest {
            user_id: 1,
            route_id: None,
            event_id: None,
            plan_name: "Isan loop".to_string(),
            event_description: None,
            start_date: start,
            end_date: start - chrono::Duration::hours(1),
            duration: 3,
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_create_place_request_dimension_check() {
        let req = CreatePlaceRequest {
            document_id: 1,
            castle_id: None,
            document_vector: Some(vec![0.0; 768]),
        };
        assert!(req.validate().is_ok());
        let short = CreatePlaceRequest {
            document_vector: Some(vec![0.0; 767]),
            ..req
        };
        assert!(short.validate().is_err());
    }

    #[test]
    fn test_page_default() {
        let page = Page::default();
        assert_eq!(page.limit, crate::defaults::DEFAULT_PAGE_SIZE);
        assert_eq!(page.offset, 0);
    }
}
