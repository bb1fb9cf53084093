//! The user record store.
//!
//! Owns the `users` table. Reads borrow a pooled connection for the length of one call;
//! writes run inside their own transaction, which rolls back when dropped without a commit.

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;
use thiserror::Error;

use crate::models::User;

const CREATE_USERS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    email TEXT NOT NULL UNIQUE,
    password TEXT NOT NULL
)"#;

/// Failures reported by the store
#[derive(Debug, Error)]
pub(crate) enum StoreError {
    /// An insert would have given a second record the same email.
    #[error("a record with this email already exists")]
    DuplicateKey,

    #[error("no record with id {0}")]
    NotFound(i64),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

pub(crate) type StoreResult<T> = Result<T, StoreError>;

/// Handle to the user table, cheap to clone.
#[derive(Debug, Clone)]
pub(crate) struct UserStore {
    pool: SqlitePool,
}

impl UserStore {
    /// Open a pool against `database_url`, creating the database file if it is missing.
    pub(crate) async fn open(database_url: &str, max_connections: u32) -> StoreResult<Self> {
        let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await?;

        Ok(Self { pool })
    }

    /// Create the `users` table if it does not exist yet. Safe to call repeatedly.
    pub(crate) async fn init_schema(&self) -> StoreResult<()> {
        let mut conn = self.pool.acquire().await?;
        sqlx::query(CREATE_USERS_TABLE).execute(&mut *conn).await?;
        Ok(())
    }

    /// Close every pooled connection. Outstanding calls finish first.
    pub(crate) async fn close(&self) {
        self.pool.close().await;
    }

    /// Persist a new user and return it with its assigned id.
    ///
    /// An existing email is turned away before a transaction is opened. The `UNIQUE` constraint
    /// on `email` is checked again by the insert statement itself, so two concurrent inserts of
    /// one email can never both commit.
    pub(crate) async fn insert(&self, name: &str, email: &str, password: &str) -> StoreResult<User> {
        if let Some(existing) = self.find_by_email(email).await? {
            tracing::debug!(id = existing.id, "email already registered");
            return Err(StoreError::DuplicateKey);
        }

        let mut tx = self.pool.begin().await?;

        let user = sqlx::query_as::<_, User>(
            r#"INSERT INTO users (name, email, password) VALUES (?, ?, ?)
            RETURNING id, name, email, password"#,
        )
        .bind(name)
        .bind(email)
        .bind(password)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => StoreError::DuplicateKey,
            e => StoreError::Sqlx(e),
        })?;

        tx.commit().await?;

        tracing::debug!(id = user.id, "created user");
        Ok(user)
    }

    /// Every user, oldest first.
    pub(crate) async fn list_all(&self) -> StoreResult<Vec<User>> {
        let mut conn = self.pool.acquire().await?;

        let users = sqlx::query_as::<_, User>(
            r#"SELECT id, name, email, password FROM users ORDER BY id ASC"#,
        )
        .fetch_all(&mut *conn)
        .await?;

        Ok(users)
    }

    pub(crate) async fn find_by_id(&self, id: i64) -> StoreResult<User> {
        let mut conn = self.pool.acquire().await?;

        sqlx::query_as::<_, User>(r#"SELECT id, name, email, password FROM users WHERE id = ?"#)
            .bind(id)
            .fetch_optional(&mut *conn)
            .await?
            .ok_or(StoreError::NotFound(id))
    }

    /// Exact-match lookup on email. Returns `None` rather than an error when absent.
    pub(crate) async fn find_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let mut conn = self.pool.acquire().await?;

        let user = sqlx::query_as::<_, User>(
            r#"SELECT id, name, email, password FROM users WHERE email = ?"#,
        )
        .bind(email)
        .fetch_optional(&mut *conn)
        .await?;

        Ok(user)
    }

    /// Remove the user with `id`. Nothing is written when no such user exists.
    pub(crate) async fn delete(&self, id: i64) -> StoreResult<()> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(r#"DELETE FROM users WHERE id = ?"#)
            .bind(id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(id));
        }

        tx.commit().await?;

        tracing::info!(id, "deleted user");
        Ok(())
    }
}
