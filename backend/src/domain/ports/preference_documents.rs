//! Port for the document store holding preference documents.
//!
//! The profile synchronization service is the sole writer through this
//! port; no other component may touch the document store. Documents are
//! whole-replaced: section-level restriction is enforced by the service,
//! which patches one section of the loaded document before saving.

use async_trait::async_trait;

use crate::domain::{PreferenceDocument, UserId};

/// Errors raised by document store adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PreferenceDocumentRepositoryError {
    /// Store connection could not be established.
    #[error("document store connection failed: {message}")]
    Connection { message: String },
    /// Read or write failed during execution.
    #[error("document store operation failed: {message}")]
    Query { message: String },
    /// A stored document could not be decoded.
    #[error("stored preference document is malformed: {message}")]
    Serialization { message: String },
}

impl PreferenceDocumentRepositoryError {
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

/// Port for preference document storage.
///
/// There is at most one document per user; `find` returning `None` means
/// the user has not completed any profile-setup write yet, and callers fall
/// back to defaults rather than failing.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PreferenceDocumentRepository: Send + Sync {
    /// Fetch the document for a user, if one has been written.
    async fn find(
        &self,
        user_id: &UserId,
    ) -> Result<Option<PreferenceDocument>, PreferenceDocumentRepositoryError>;

    /// Store the document for a user, replacing any previous version.
    ///
    /// Last write wins; there is no revision check.
    async fn save(
        &self,
        user_id: &UserId,
        document: &PreferenceDocument,
    ) -> Result<(), PreferenceDocumentRepositoryError>;
}

/// Fixture implementation for wiring tests without a document store.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixturePreferenceDocumentRepository;

#[async_trait]
impl PreferenceDocumentRepository for FixturePreferenceDocumentRepository {
    async fn find(
        &self,
        _user_id: &UserId,
    ) -> Result<Option<PreferenceDocument>, PreferenceDocumentRepositoryError> {
        Ok(None)
    }

    async fn save(
        &self,
        _user_id: &UserId,
        _document: &PreferenceDocument,
    ) -> Result<(), PreferenceDocumentRepositoryError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use chrono::Utc;

    #[tokio::test]
    async fn fixture_repository_reads_none_and_accepts_writes() {
        let repo = FixturePreferenceDocumentRepository;
        let user_id = UserId::random();

        assert!(repo.find(&user_id).await.expect("find").is_none());
        repo.save(&user_id, &PreferenceDocument::empty(Utc::now()))
            .await
            .expect("save succeeds");
    }
}
