//! # prasat-db
//!
//! PostgreSQL database layer for the prasat castle information system.
//!
//! This crate provides:
//! - Connection pool management
//! - Repository implementations for all core entities
//! - pgvector storage for text (768-dim) and image (512-dim) embeddings
//! - Embedded schema migrations (behind the `migrations` feature)
//!
//! ## Example
//!
//! ```rust,ignore
//! use prasat_db::{database_url, CreateUserRequest, Database};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let db = Database::connect(&database_url()).await?;
//!
//!     let user_id = db.users.insert(CreateUserRequest {
//!         username: "alice".to_string(),
//!         email: "a@x.com".to_string(),
//!         tel: Some("0123456789".to_string()),
//!         roles: None, // defaults to "user"
//!         password: "argon2id$...".to_string(),
//!     }).await?;
//!
//!     println!("Created user: {}", user_id);
//!     Ok(())
//! }
//! ```

pub mod assets;
pub mod castles;
pub mod documents;
pub mod history;
pub mod locations;
pub mod pool;
pub mod routes;
pub mod trips;
pub mod users;

// Re-export core types
pub use prasat_core::*;

/// Escape LIKE/ILIKE wildcard characters (`%`, `_`, `\`) in user input.
pub fn escape_like(input: &str) -> String {
    input
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

// Re-export repository implementations
pub use assets::PgCastleAssetRepository;
pub use castles::PgCastleRepository;
pub use documents::PgDocumentRepository;
pub use history::PgHistoryRepository;
pub use locations::PgLocationRepository;
pub use pool::{
    create_pool, create_pool_with_config, create_pool_with_retry, database_url, log_pool_metrics,
    PoolConfig,
};
pub use routes::PgRouteRepository;
pub use trips::PgTripRepository;
pub use users::PgUserRepository;

/// Combined database context with all repositories.
///
/// Constructed explicitly from a connection pool and passed down to
/// callers; there is no process-wide database handle.
pub struct Database {
    /// The underlying connection pool.
    pub pool: sqlx::Pool<sqlx::Postgres>,
    /// User repository for account rows.
    pub users: PgUserRepository,
    /// Search/visit history and interest repository.
    pub history: PgHistoryRepository,
    /// Castle and castle-type repository.
    pub castles: PgCastleRepository,
    /// Location repository and the 1:1 castle link.
    pub locations: PgLocationRepository,
    /// Castle asset repository (architectures, images, events, nearby places).
    pub assets: PgCastleAssetRepository,
    /// Route repository and route membership.
    pub routes: PgRouteRepository,
    /// Trip plan and itinerary repository.
    pub trips: PgTripRepository,
    /// Retrieval document, place, and keyword repository.
    pub documents: PgDocumentRepository,
}

impl Database {
    /// Create a new Database instance from a connection pool.
    pub fn new(pool: sqlx::Pool<sqlx::Postgres>) -> Self {
        Self {
            users: PgUserRepository::new(pool.clone()),
            history: PgHistoryRepository::new(pool.clone()),
            castles: PgCastleRepository::new(pool.clone()),
            locations: PgLocationRepository::new(pool.clone()),
            assets: PgCastleAssetRepository::new(pool.clone()),
            routes: PgRouteRepository::new(pool.clone()),
            trips: PgTripRepository::new(pool.clone()),
            documents: PgDocumentRepository::new(pool.clone()),
            pool,
        }
    }

    /// Create a new Database instance by connecting to the given URL.
    pub async fn connect(url: &str) -> Result<Self> {
        let pool = create_pool(url).await?;
        Ok(Self::new(pool))
    }

    /// Create with custom pool configuration.
    pub async fn connect_with_config(url: &str, config: PoolConfig) -> Result<Self> {
        let pool = create_pool_with_config(url, config).await?;
        Ok(Self::new(pool))
    }

    /// Run pending migrations.
    #[cfg(feature = "migrations")]
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("../../migrations")
            .run(&self.pool)
            .await
            .map_err(|e| Error::Database(sqlx::Error::Migrate(Box::new(e))))?;
        Ok(())
    }

    /// Get the underlying connection pool.
    pub fn pool(&self) -> &sqlx::Pool<sqlx::Postgres> {
        &self.pool
    }
}

impl Clone for Database {
    fn clone(&self) -> Self {
        Self::new(self.pool.clone())
    }
}
