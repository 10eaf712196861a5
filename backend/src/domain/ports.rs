//! Domain ports defining the edges of the hexagon.
//!
//! Ports describe how the domain expects to interact with driven adapters.
//! Each trait exposes strongly typed errors so adapters map their failures
//! into predictable variants instead of returning `anyhow::Result`.

use async_trait::async_trait;
use thiserror::Error;

use super::user::{User, UserDraft};

/// Failure modes surfaced by user persistence adapters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UserPersistenceError {
    /// Repository connection could not be established.
    #[error("user repository connection failed: {message}")]
    Connection {
        /// Adapter-provided context.
        message: String,
    },
    /// Query or mutation failed during execution.
    #[error("user repository query failed: {message}")]
    Query {
        /// Adapter-provided context.
        message: String,
    },
    /// The store rejected the write over a uniqueness constraint.
    #[error("user repository rejected a duplicate: {message}")]
    Conflict {
        /// Adapter-provided context.
        message: String,
    },
}

impl UserPersistenceError {
    /// Helper for connection oriented failures.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Helper for query failures.
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }

    /// Helper for uniqueness-constraint rejections.
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }
}

/// Persistence port for user records.
///
/// Mutating operations report affected-row counts so handlers can
/// distinguish "nothing matched" from success without a second query.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a validated draft and return the stored row, including the
    /// store-assigned identifier.
    async fn create(&self, draft: &UserDraft) -> Result<User, UserPersistenceError>;

    /// Apply a full field update to the row matching `id`, returning the
    /// number of rows affected (zero when no row matched).
    async fn update(&self, id: i64, draft: &UserDraft) -> Result<u64, UserPersistenceError>;

    /// Delete the row matching `id`, returning the number of rows affected.
    async fn delete(&self, id: i64) -> Result<u64, UserPersistenceError>;

    /// Fetch a user by identifier.
    async fn find_by_id(&self, id: i64) -> Result<Option<User>, UserPersistenceError>;

    /// Fetch one page of users ordered by ascending identifier, plus the
    /// total row count.
    async fn list(&self, offset: i64, limit: i64)
    -> Result<(Vec<User>, i64), UserPersistenceError>;
}
