//! Core data models for the prasat castle information system.
//!
//! Storage-row structs map 1:1 to relations; response projections are
//! the outward transfer shapes. Rows that carry embedding vectors do
//! not implement serde — vectors are retrieval-internal and never
//! cross the system boundary, and the response types omit them.

use chrono::{DateTime, Utc};
use pgvector::Vector;
use serde::{Deserialize, Serialize};

// =============================================================================
// USER MANAGEMENT
// =============================================================================

/// A registered user. `password` holds the upstream-computed hash and
/// must never be serialized outward; project through [`UserResponse`].
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    pub user_id: i32,
    pub username: String,
    pub password: String,
    pub email: String,
    pub tel: Option<String>,
    pub roles: String,
}

/// Outward projection of [`User`]. Structurally excludes `password`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub user_id: i32,
    pub username: String,
    pub email: String,
    pub tel: Option<String>,
    pub roles: String,
}

impl From<User> for UserResponse {
    fn from(u: User) -> Self {
        Self {
            user_id: u.user_id,
            username: u.username,
            email: u.email,
            tel: u.tel,
            roles: u.roles,
        }
    }
}

/// Append-only log of a user's search queries.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct SearchHistory {
    pub search_id: i32,
    pub user_id: i32,
    pub query_text: String,
    pub search_time: DateTime<Utc>,
}

/// Append-only log of a user's castle visits.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct VisitHistory {
    pub visit_id: i32,
    pub user_id: i32,
    pub castle_id: i32,
    pub visit_date: DateTime<Utc>,
}

/// A user's declared interest in a castle.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Interest {
    pub interest_id: i32,
    pub user_id: i32,
    pub castle_id: i32,
    pub interest_name: String,
}

// =============================================================================
// CASTLE CORE DATA
// =============================================================================

/// Lookup table of castle classifications.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct CastleType {
    pub type_id: i32,
    pub type_detail: String,
}

/// A heritage castle. `text_vector` is a 768-dim embedding of the
/// description, consumed by an external retrieval component.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Castle {
    pub castle_id: i32,
    pub castle_name: String,
    pub castle_description: Option<String>,
    pub era: Option<String>,
    pub type_id: Option<i32>,
    pub text_vector: Option<Vector>,
}

/// Outward projection of [`Castle`], optionally embedding the linked
/// location. The location is resolved by a query-time join through the
/// link table, not stored on the castle row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CastleResponse {
    pub castle_id: i32,
    pub castle_name: String,
    pub castle_description: Option<String>,
    pub era: Option<String>,
    pub type_id: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
}

impl Castle {
    /// Project into a response, attaching an already-fetched location.
    pub fn into_response(self, location: Option<Location>) -> CastleResponse {
        CastleResponse {
            castle_id: self.castle_id,
            castle_name: self.castle_name,
            castle_description: self.castle_description,
            era: self.era,
            type_id: self.type_id,
            location,
        }
    }
}

/// Architectural detail belonging to a castle.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Architecture {
    pub architec_id: i32,
    pub castle_id: i32,
    pub architec_detail: String,
}

/// A geographic location. Linked 1:1 to a castle via
/// [`LocationCastle`].
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Location {
    pub location_id: i32,
    pub latitude: f64,
    pub longitude: f64,
    pub sub_district: Option<String>,
    pub district: Option<String>,
    pub province: Option<String>,
}

/// Link row enforcing the one-to-one Castle ↔ Location association.
/// `castle_id` is the primary key; a unique constraint on
/// `location_id` prevents one location serving two castles.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct LocationCastle {
    pub castle_id: i32,
    pub location_id: i32,
}

// =============================================================================
// CASTLE RELATED ASSETS
// =============================================================================

/// An image of a castle with its 512-dim embedding.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Image {
    pub img_id: i32,
    pub castle_id: i32,
    pub img_description: Option<String>,
    pub image_vector: Option<Vector>,
}

/// Outward projection of [`Image`], without the embedding.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageResponse {
    pub img_id: i32,
    pub castle_id: i32,
    pub img_description: Option<String>,
}

impl From<Image> for ImageResponse {
    fn from(i: Image) -> Self {
        Self {
            img_id: i.img_id,
            castle_id: i.castle_id,
            img_description: i.img_description,
        }
    }
}

/// An event held at a castle. `event_end >= event_start` is validated
/// on create.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Event {
    pub event_id: i32,
    pub castle_id: i32,
    pub event_name: String,
    pub event_description: Option<String>,
    pub event_start: DateTime<Utc>,
    pub event_end: DateTime<Utc>,
    pub event_time: Option<String>,
}

/// A point of interest near a castle.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct NearbyPlace {
    pub place_id: i32,
    pub castle_id: i32,
    pub place_name: String,
    pub nearby_detail: Option<String>,
}

// =============================================================================
// ROUTES
// =============================================================================

/// A suggested travel route visiting several castles.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Route {
    pub route_id: i32,
    pub route_name: String,
    pub description_gps: Option<String>,
}

/// Many-to-many link between routes and castles. Composite primary key
/// prevents duplicate pairs.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct RouteCastle {
    pub route_id: i32,
    pub castle_id: i32,
}

// =============================================================================
// TRIP PLANNING
// =============================================================================

/// A user's planned trip, optionally following a route or pinned to an
/// event.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct TripPlan {
    pub plan_id: i32,
    pub user_id: i32,
    pub route_id: Option<i32>,
    pub event_id: Option<i32>,
    pub plan_name: String,
    pub event_description: Option<String>,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub duration: i32,
}

/// One stop within a trip plan. Itineraries of a plan are ordered by
/// `start_time`.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct TripItinerary {
    pub itinerary_id: i32,
    pub plan_id: i32,
    pub castle_id: i32,
    pub event_id: Option<i32>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

// =============================================================================
// RETRIEVAL DOCUMENTS
// =============================================================================

/// A source document describing a castle.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Document {
    pub document_id: i32,
    pub castle_id: i32,
    pub document_name: String,
}

/// A retrieval chunk of a document with its 768-dim embedding.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Place {
    pub place_id: i32,
    pub document_id: i32,
    pub castle_id: Option<i32>,
    pub document_vector: Option<Vector>,
}

/// Outward projection of [`Place`], without the embedding.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaceResponse {
    pub place_id: i32,
    pub document_id: i32,
    pub castle_id: Option<i32>,
}

impl From<Place> for PlaceResponse {
    fn from(p: Place) -> Self {
        Self {
            place_id: p.place_id,
            document_id: p.document_id,
            castle_id: p.castle_id,
        }
    }
}

/// A retrieval keyword. `keyword` is unique.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Keyword {
    pub keyword_id: i32,
    pub keyword: String,
}

/// Many-to-many link between places and keywords. Composite primary
/// key prevents duplicate pairs.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct PlaceKeyword {
    pub place_id: i32,
    pub keyword_id: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user() -> User {
        User {
            user_id: 1,
            username: "alice".to_string(),
            password: "argon2id$hashed".to_string(),
            email: "a@x.com".to_string(),
            tel: Some("0123456789".to_string()),
            roles: "user".to_string(),
        }
    }

    #[test]
    fn test_user_response_never_serializes_password() {
        let resp: UserResponse = sample_user().into();
        let json = serde_json::to_string(&resp).unwrap();
        assert!(!json.contains("password"));
        assert!(!json.contains("hashed"));
    }

    #[test]
    fn test_user_response_carries_all_public_fields() {
        let resp: UserResponse = sample_user().into();
        let json: serde_json::Value = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["user_id"], 1);
        assert_eq!(json["username"], "alice");
        assert_eq!(json["email"], "a@x.com");
        assert_eq!(json["tel"], "0123456789");
        assert_eq!(json["roles"], "user");
    }

    #[test]
    fn test_castle_response_omits_absent_location() {
        let castle = Castle {
            castle_id: 5,
            castle_name: "Phanom Rung".to_string(),
            castle_description: None,
            era: Some("Khmer".to_string()),
            type_id: Some(2),
            text_vector: None,
        };
        let json = serde_json::to_string(&castle.into_response(None)).unwrap();
        assert!(!json.contains("location"));
        assert!(!json.contains("text_vector"));
    }

    #[test]
    fn test_castle_response_embeds_location() {
        let castle = Castle {
            castle_id: 5,
            castle_name: "Phanom Rung".to_string(),
            castle_description: None,
            era: None,
            type_id: None,
            text_vector: None,
        };
        let location = Location {
            location_id: 9,
            latitude: 14.5319,
            longitude: 102.9400,
            sub_district: None,
            district: Some("Chaloem Phra Kiat".to_string()),
            province: Some("Buriram".to_string()),
        };
        let resp = castle.into_response(Some(location));
        let json: serde_json::Value = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["location"]["location_id"], 9);
        assert_eq!(json["location"]["province"], "Buriram");
    }

    #[test]
    fn test_image_response_omits_vector() {
        let image = Image {
            img_id: 3,
            castle_id: 5,
            img_description: Some("east gate".to_string()),
            image_vector: Some(Vector::from(vec![0.0f32; 512])),
        };
        let resp: ImageResponse = image.into();
        let json = serde_json::to_string(&resp).unwrap();
        assert!(!json.contains("image_vector"));
        assert!(json.contains("east gate"));
    }

    #[test]
    fn test_place_response_omits_vector() {
        let place = Place {
            place_id: 2,
            document_id: 1,
            castle_id: None,
            document_vector: Some(Vector::from(vec![0.0f32; 768])),
        };
        let resp: PlaceResponse = place.into();
        let json = serde_json::to_string(&resp).unwrap();
        assert!(!json.contains("document_vector"));
    }
}
