//! Storage error types.

use thiserror::Error;

/// Errors surfaced by a [`Datastore`](super::Datastore) or by the gateway
/// translating documents at its boundary.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Transport fault talking to the backend, passed through verbatim.
    #[error("connection failure: {0}")]
    Connection(String),

    /// A document could not be encoded or decoded.
    #[error("failed to decode document: {0}")]
    Decode(#[from] serde_json::Error),

    /// The store accepted an insert but reported no generated key.
    #[error("store reported no generated key for insert")]
    NoGeneratedKey,
}

/// Result type alias for storage operations
pub type StoreResult<T> = Result<T, StoreError>;
