//! Application-wide error types.

use burger_store::PersistenceError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, ClientError>;

impl From<ClientError> for PersistenceError {
    fn from(e: ClientError) -> Self {
        PersistenceError(e.to_string())
    }
}
