//! Integration tests for retrieval documents, place chunks, and
//! keyword tagging.
//!
//! This test suite validates:
//! - Document/place round trip with vector dimension enforcement
//! - Keyword uniqueness surfacing as a conflict
//! - Place/keyword tagging with composite-key deduplication
//! - Document deletion cascading places and their tags
//!
//! **IMPORTANT**: These tests require a fully migrated PostgreSQL
//! database reachable via `DATABASE_URL`. They skip silently when the
//! variable is unset.

use std::time::{SystemTime, UNIX_EPOCH};

use prasat_db::{
    CastleRepository, CreateCastleRequest, CreateDocumentRequest, CreateKeywordRequest,
    CreatePlaceRequest, Database, DocumentRepository, Error,
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

async fn create_castle_with_document(db: &Database) -> (i32, i32) {
    let castle_id = db
        .castles
        .insert(CreateCastleRequest {
            castle_name: unique("doc-castle"),
            castle_description: None,
            era: None,
            type_id: None,
            text_vector: None,
        })
        .await
        .unwrap();
    let document_id = db
        .documents
        .insert(CreateDocumentRequest {
            castle_id,
            document_name: unique("gazetteer"),
        })
        .await
        .unwrap();
    (castle_id, document_id)
}

#[tokio::test]
async fn test_place_round_trip_and_dimension_check() {
    let Some(db) = setup_test_db().await else { return };

    let (castle_id, document_id) = create_castle_with_document(&db).await;

    let err = db
        .documents
        .insert_place(CreatePlaceRequest {
            document_id,
            castle_id: Some(castle_id),
            document_vector: Some(vec![0.0; 100]),
        })
        .await
        .expect_err("100-dim document vector must be rejected");
    assert!(matches!(err, Error::Validation(_)));

    let place_id = db
        .documents
        .insert_place(CreatePlaceRequest {
            document_id,
            castle_id: Some(castle_id),
            document_vector: Some(vec![0.125; 768]),
        })
        .await
        .expect("768-dim vector should be accepted");

    let place = db.documents.get_place(place_id).await.unwrap().unwrap();
    assert_eq!(place.document_id, document_id);
    assert_eq!(place.castle_id, Some(castle_id));

    // The listing projection carries no vector field.
    let listed = db.documents.list_places(document_id).await.unwrap();
    assert_eq!(listed.len(), 1);
    let json = serde_json::to_string(&listed[0]).unwrap();
    assert!(!json.contains("document_vector"));

    db.castles.delete(castle_id).await.unwrap();
}

#[tokio::test]
async fn test_keyword_uniqueness_is_conflict() {
    let Some(db) = setup_test_db().await else { return };

    let word = unique("prang");
    let keyword_id = db
        .documents
        .insert_keyword(CreateKeywordRequest { keyword: word.clone() })
        .await
        .expect("First keyword should insert");

    let err = db
        .documents
        .insert_keyword(CreateKeywordRequest { keyword: word })
        .await
        .expect_err("Duplicate keyword text must fail");
    assert!(matches!(err, Error::Conflict(_)));

    db.documents.delete_keyword(keyword_id).await.unwrap();
}

#[tokio::test]
async fn test_place_tagging_round_trip() {
    let Some(db) = setup_test_db().await else { return };

    let (castle_id, document_id) = create_castle_with_document(&db).await;
    let place_id = db
        .documents
        .insert_place(CreatePlaceRequest {
            document_id,
            castle_id: None,
            document_vector: None,
        })
        .await
        .unwrap();
    let keyword_id = db
        .documents
        .insert_keyword(CreateKeywordRequest {
            keyword: unique("laterite"),
        })
        .await
        .unwrap();

    db.documents.tag_place(place_id, keyword_id).await.unwrap();

    // Composite key rejects the duplicate pair.
    let err = db
        .documents
        .tag_place(place_id, keyword_id)
        .await
        .expect_err("Duplicate tag pair must fail");
    assert!(matches!(err, Error::Conflict(_)));

    let keywords = db.documents.keywords_for_place(place_id).await.unwrap();
    assert_eq!(keywords.len(), 1);
    assert_eq!(keywords[0].keyword_id, keyword_id);

    let places = db.documents.places_for_keyword(keyword_id).await.unwrap();
    assert!(places.iter().any(|p| p.place_id == place_id));

    db.documents.untag_place(place_id, keyword_id).await.unwrap();
    assert!(db.documents.keywords_for_place(place_id).await.unwrap().is_empty());

    db.castles.delete(castle_id).await.unwrap();
    db.documents.delete_keyword(keyword_id).await.unwrap();
}

#[tokio::test]
async fn test_document_delete_cascades_places_and_tags() {
    let Some(db) = setup_test_db().await else { return };

    let (castle_id, document_id) = create_castle_with_document(&db).await;
    let place_id = db
        .documents
        .insert_place(CreatePlaceRequest {
            document_id,
            castle_id: None,
            document_vector: None,
        })
        .await
        .unwrap();
    let keyword_id = db
        .documents
        .insert_keyword(CreateKeywordRequest {
            keyword: unique("gopura"),
        })
        .await
        .unwrap();
    db.documents.tag_place(place_id, keyword_id).await.unwrap();

    db.documents.delete(document_id).await.unwrap();

    assert!(db.documents.get_place(place_id).await.unwrap().is_none());
    // The keyword itself survives; only the tag rows cascade.
    assert!(db.documents.places_for_keyword(keyword_id).await.unwrap().is_empty());
    let keywords = db.documents.list_keywords().await.unwrap();
    assert!(keywords.iter().any(|k| k.keyword_id == keyword_id));

    db.documents.delete_keyword(keyword_id).await.unwrap();
    db.castles.delete(castle_id).await.unwrap();
}
