//! Port for the append-only profile change ledger.
//!
//! History is diagnostic only. Appends are best-effort: the synchronization
//! service reports success even when the ledger write fails, logging the
//! loss instead of rolling back the primary write.

use async_trait::async_trait;

use crate::domain::{ProfileChangeRecord, UserId};

/// Errors raised by ledger adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProfileHistoryError {
    /// Store connection could not be established.
    #[error("history store connection failed: {message}")]
    Connection { message: String },
    /// Read or write failed during execution.
    #[error("history store operation failed: {message}")]
    Query { message: String },
    /// A stored record could not be decoded.
    #[error("stored history record is malformed: {message}")]
    Serialization { message: String },
}

impl ProfileHistoryError {
    /// Create a connection error with the given message.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Create a query error with the given message.
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }

    /// Create a serialization error with the given message.
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization {
            message: message.into(),
        }
    }
}

/// Port for the change ledger.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProfileHistoryRepository: Send + Sync {
    /// Append records to the ledger, preserving order.
    ///
    /// Records are write-once; adapters must never rewrite existing entries.
    async fn append(&self, records: &[ProfileChangeRecord]) -> Result<(), ProfileHistoryError>;

    /// Read a user's ledger, oldest first.
    async fn list(&self, user_id: &UserId)
        -> Result<Vec<ProfileChangeRecord>, ProfileHistoryError>;
}

/// Fixture implementation that discards appends and reads an empty ledger.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureProfileHistoryRepository;

#[async_trait]
impl ProfileHistoryRepository for FixtureProfileHistoryRepository {
    async fn append(&self, _records: &[ProfileChangeRecord]) -> Result<(), ProfileHistoryError> {
        Ok(())
    }

    async fn list(
        &self,
        _user_id: &UserId,
    ) -> Result<Vec<ProfileChangeRecord>, ProfileHistoryError> {
        Ok(Vec::new())
    }
}
