//! User repository implementation.

use async_trait::async_trait;
use sqlx::{Pool, Postgres};
use tracing::debug;

use prasat_core::{
    defaults::DEFAULT_ROLE, CreateUserRequest, Error, Page, Result, UpdateUserRequest, User,
    UserRepository,
};

/// PostgreSQL implementation of UserRepository.
pub struct PgUserRepository {
    pool: Pool<Postgres>,
}

impl PgUserRepository {
    /// Create a new PgUserRepository with the given connection pool.
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn insert(&self, req: CreateUserRequest) -> Result<i32> {
        req.validate()?;
        let roles = req.roles.unwrap_or_else(|| DEFAULT_ROLE.to_string());

        let user_id: i32 = sqlx::query_scalar(
            "INSERT INTO users (username, password, email, tel, roles)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING user_id",
        )
        .bind(&req.username)
        .bind(&req.password)
        .bind(&req.email)
        .bind(&req.tel)
        .bind(&roles)
        .fetch_one(&self.pool)
        .await
        .map_err(Error::from_sqlx)?;

        debug!(
            subsystem = "database",
            component = "users",
            op = "insert",
            user_id,
            "User created"
        );
        Ok(user_id)
    }

    async fn get(&self, user_id: i32) -> Result<Option<User>> {
        sqlx::query_as::<_, User>(
            "SELECT user_id, username, password, email, tel, roles
             FROM users WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Database)
    }

    async fn get_by_username(&self, username: &str) -> Result<Option<User>> {
        sqlx::query_as::<_, User>(
            "SELECT user_id, username, password, email, tel, roles
             FROM users WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Database)
    }

    async fn list(&self, page: Page) -> Result<Vec<User>> {
        sqlx::query_as::<_, User>(
            "SELECT user_id, username, password, email, tel, roles
             FROM users ORDER BY user_id DESC LIMIT $1 OFFSET $2",
        )
        .bind(page.limit)
        .bind(page.offset)
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)
    }

    async fn update(&self, user_id: i32, req: UpdateUserRequest) -> Result<()> {
        req.validate()?;

        let result = sqlx::query(
            "UPDATE users SET username = $2, email = $3, tel = $4, roles = $5
             WHERE user_id = $1",
        )
        .bind(user_id)
        .bind(&req.username)
        .bind(&req.email)
        .bind(&req.tel)
        .bind(&req.roles)
        .execute(&self.pool)
        .await
        .map_err(Error::from_sqlx)?;

        if result.rows_affected() == 0 {
            return Err(Error::NotFound(format!("user {user_id}")));
        }
        Ok(())
    }

    async fn delete(&self, user_id: i32) -> Result<()> {
        let result = sqlx::query("DELETE FROM users WHERE user_id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(Error::Database)?;

        if result.rows_affected() == 0 {
            return Err(Error::NotFound(format!("user {user_id}")));
        }
        debug!(
            subsystem = "database",
            component = "users",
            op = "delete",
            user_id,
            "User deleted, owned rows cascaded"
        );
        Ok(())
    }
}
