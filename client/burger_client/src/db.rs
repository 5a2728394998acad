//! Database layer — migrations and the SQLite-backed credential store.

use async_trait::async_trait;
use burger_store::{CredentialStore, PersistenceError};
use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
use tracing::info;

use crate::errors::Result;

const ACCESS_TOKEN: &str = "access_token";
const REFRESH_TOKEN: &str = "refresh_token";

/// Establish a SQLite connection pool and run pending migrations.
pub async fn init_pool(database_url: &str) -> Result<SqlitePool> {
    // Make sure the file is created if it doesn't exist yet.
    let url = if database_url.starts_with("sqlite:") {
        database_url.to_string()
    } else {
        format!("sqlite:{database_url}")
    };
    let url = if url.contains(":memory:") || url.contains('?') {
        url
    } else {
        format!("{url}?mode=rwc")
    };

    // An in-memory database exists per connection, so keep exactly one.
    let max_connections = if url.contains(":memory:") { 1 } else { 5 };

    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect(&url)
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;
    info!("Database migrations applied successfully");
    Ok(pool)
}

/// Session credentials persisted in the `credentials` table.
#[derive(Debug, Clone)]
pub struct SqliteCredentials {
    pool: SqlitePool,
}

impl SqliteCredentials {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    async fn get(&self, name: &str) -> Result<Option<String>> {
        let row: Option<(String,)> = sqlx::query_as("SELECT value FROM credentials WHERE name = ?1")
            .bind(name)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(|(v,)| v))
    }

    async fn set(&self, name: &str, value: &str) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO credentials (name, value, updated_at)
            VALUES (?1, ?2, strftime('%s', 'now'))
            ON CONFLICT(name) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at
            "#,
        )
        .bind(name)
        .bind(value)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn delete(&self, name: &str) -> Result<()> {
        sqlx::query("DELETE FROM credentials WHERE name = ?1")
            .bind(name)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

#[async_trait]
impl CredentialStore for SqliteCredentials {
    async fn access_token(&self) -> std::result::Result<Option<String>, PersistenceError> {
        Ok(self.get(ACCESS_TOKEN).await?)
    }

    async fn set_access_token(&self, token: &str) -> std::result::Result<(), PersistenceError> {
        Ok(self.set(ACCESS_TOKEN, token).await?)
    }

    async fn delete_access_token(&self) -> std::result::Result<(), PersistenceError> {
        Ok(self.delete(ACCESS_TOKEN).await?)
    }

    async fn refresh_token(&self) -> std::result::Result<Option<String>, PersistenceError> {
        Ok(self.get(REFRESH_TOKEN).await?)
    }

    async fn set_refresh_token(&self, token: &str) -> std::result::Result<(), PersistenceError> {
        Ok(self.set(REFRESH_TOKEN, token).await?)
    }

    async fn clear_all(&self) -> std::result::Result<(), PersistenceError> {
        sqlx::query("DELETE FROM credentials")
            .execute(&self.pool)
            .await
            .map_err(|e| PersistenceError(e.to_string()))?;
        info!("Stored credentials cleared");
        Ok(())
    }
}
