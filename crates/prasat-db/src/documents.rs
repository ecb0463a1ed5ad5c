//! Retrieval document repository: documents, place chunks, keywords,
//! and the place ↔ keyword tagging link.

use async_trait::async_trait;
use pgvector::Vector;
use sqlx::{Pool, Postgres};

use prasat_core::{
    CreateDocumentRequest, CreateKeywordRequest, CreatePlaceRequest, Document, DocumentRepository,
    Error, Keyword, Place, PlaceResponse, Result,
};

/// PostgreSQL implementation of DocumentRepository.
pub struct PgDocumentRepository {
    pool: Pool<Postgres>,
}

impl PgDocumentRepository {
    /// Create a new PgDocumentRepository with the given connection pool.
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DocumentRepository for PgDocumentRepository {
    async fn insert(&self, req: CreateDocumentRequest) -> Result<i32> {
        sqlx::query_scalar(
            "INSERT INTO documents (castle_id, document_name)
             VALUES ($1, $2)
             RETURNING document_id",
        )
        .bind(req.castle_id)
        .bind(&req.document_name)
        .fetch_one(&self.pool)
        .await
        .map_err(Error::from_sqlx)
    }

    async fn get(&self, document_id: i32) -> Result<Option<Document>> {
        sqlx::query_as::<_, Document>(
            "SELECT document_id, castle_id, document_name
             FROM documents WHERE document_id = $1",
        )
        .bind(document_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Database)
    }

    async fn list_for_castle(&self, castle_id: i32) -> Result<Vec<Document>> {
        sqlx::query_as::<_, Document>(
            "SELECT document_id, castle_id, document_name
             FROM documents WHERE castle_id = $1 ORDER BY document_name",
        )
        .bind(castle_id)
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)
    }

    async fn delete(&self, document_id: i32) -> Result<()> {
        let result = sqlx::query("DELETE FROM documents WHERE document_id = $1")
            .bind(document_id)
            .execute(&self.pool)
            .await
            .map_err(Error::Database)?;

        if result.rows_affected() == 0 {
            return Err(Error::NotFound(format!("document {document_id}")));
        }
        Ok(())
    }

    async fn insert_place(&self, req: CreatePlaceRequest) -> Result<i32> {
        req.validate()?;

        sqlx::query_scalar(
            "INSERT INTO places_rag (document_id, castle_id, document_vector)
             VALUES ($1, $2, $3)
             RETURNING place_id",
        )
        .bind(req.document_id)
        .bind(req.castle_id)
        .bind(req.document_vector.map(Vector::from))
        .fetch_one(&self.pool)
        .await
        .map_err(Error::from_sqlx)
    }

    async fn get_place(&self, place_id: i32) -> Result<Option<Place>> {
        sqlx::query_as::<_, Place>(
            "SELECT place_id, document_id, castle_id, document_vector
             FROM places_rag WHERE place_id = $1",
        )
        .bind(place_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Database)
    }

    async fn list_places(&self, document_id: i32) -> Result<Vec<PlaceResponse>> {
        let places = sqlx::query_as::<_, Place>(
            "SELECT place_id, document_id, castle_id, document_vector
             FROM places_rag WHERE document_id = $1 ORDER BY place_id",
        )
        .bind(document_id)
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(places.into_iter().map(PlaceResponse::from).collect())
    }

    async fn delete_place(&self, place_id: i32) -> Result<()> {
        let result = sqlx::query("DELETE FROM places_rag WHERE place_id = $1")
            .bind(place_id)
            .execute(&self.pool)
            .await
            .map_err(Error::Database)?;

        if result.rows_affected() == 0 {
            return Err(Error::NotFound(format!("place {place_id}")));
        }
        Ok(())
    }

    async fn insert_keyword(&self, req: CreateKeywordRequest) -> Result<i32> {
        sqlx::query_scalar("INSERT INTO keywords (keyword) VALUES ($1) RETURNING keyword_id")
            .bind(&req.keyword)
            .fetch_one(&self.pool)
            .await
            .map_err(Error::from_sqlx)
    }

    async fn list_keywords(&self) -> Result<Vec<Keyword>> {
        sqlx::query_as::<_, Keyword>("SELECT keyword_id, keyword FROM keywords ORDER BY keyword")
            .fetch_all(&self.pool)
            .await
            .map_err(Error::Database)
    }

    async fn delete_keyword(&self, keyword_id: i32) -> Result<()> {
        let result = sqlx::query("DELETE FROM keywords WHERE keyword_id = $1")
            .bind(keyword_id)
            .execute(&self.pool)
            .await
            .map_err(Error::Database)?;

        if result.rows_affected() == 0 {
            return Err(Error::NotFound(format!("keyword {keyword_id}")));
        }
        Ok(())
    }

    async fn tag_place(&self, place_id: i32, keyword_id: i32) -> Result<()> {
        // Composite primary key makes a repeated pair a conflict.
        sqlx::query("INSERT INTO place_keywords (place_id, keyword_id) VALUES ($1, $2)")
            .bind(place_id)
            .bind(keyword_id)
            .execute(&self.pool)
            .await
            .map_err(Error::from_sqlx)?;
        Ok(())
    }

    async fn untag_place(&self, place_id: i32, keyword_id: i32) -> Result<()> {
        let result =
            sqlx::query("DELETE FROM place_keywords WHERE place_id = $1 AND keyword_id = $2")
                .bind(place_id)
                .bind(keyword_id)
                .execute(&self.pool)
                .await
                .map_err(Error::Database)?;

        if result.rows_affected() == 0 {
            return Err(Error::NotFound(format!(
                "keyword {keyword_id} on place {place_id}"
            )));
        }
        Ok(())
    }

    async fn keywords_for_place(&self, place_id: i32) -> Result<Vec<Keyword>> {
        sqlx::query_as::<_, Keyword>(
            "SELECT k.keyword_id, k.keyword
             FROM keywords k
             JOIN place_keywords pk ON pk.keyword_id = k.keyword_id
             WHERE pk.place_id = $1
             ORDER BY k.keyword",
        )
        .bind(place_id)
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)
    }

    async fn places_for_keyword(&self, keyword_id: i32) -> Result<Vec<PlaceResponse>> {
        let places = sqlx::query_as::<_, Place>(
            "SELECT p.place_id, p.document_id, p.castle_id, p.document_vector
             FROM places_rag p
             JOIN place_keywords pk ON pk.place_id = p.place_id
             WHERE pk.keyword_id = $1
             ORDER BY p.place_id",
        )
        .bind(keyword_id)
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(places.into_iter().map(PlaceResponse::from).collect())
    }
}
