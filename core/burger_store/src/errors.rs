//! Error types shared across the store.

use thiserror::Error;

/// Failure reported by a [`BurgerApi`](crate::ports::BurgerApi) implementation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Access token expired and could not be refreshed")]
    Unauthorized,
}

/// Failure reported by a [`CredentialStore`](crate::ports::CredentialStore).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Credential storage error: {0}")]
pub struct PersistenceError(pub String);

/// Local validation failure of a constructor edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ConstructorError {
    #[error("Filling index {index} out of bounds (len {len})")]
    IndexOutOfBounds { index: usize, len: usize },
}

/// Local validation failure before an order is sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum OrderError {
    #[error("A bun must be selected before placing an order")]
    MissingBun,
}

/// Failure applying an action to the store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error(transparent)]
    Constructor(#[from] ConstructorError),
}

/// Failure of an asynchronous store effect.
///
/// The slice has already recorded its own error message by the time one of
/// these reaches the caller.
#[derive(Debug, Error)]
pub enum EffectError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Persistence(#[from] PersistenceError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Order(#[from] OrderError),

    #[error("{0} was rejected by the server")]
    Rejected(&'static str),

    #[error("An authenticated session is required")]
    Unauthenticated,

    #[error("Order {0} not found")]
    OrderNotFound(u64),
}

pub type Result<T> = std::result::Result<T, EffectError>;
