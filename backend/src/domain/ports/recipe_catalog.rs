//! Port for the shared recipe catalog.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::Recipe;

/// Errors raised by catalog adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RecipeCatalogError {
    /// Store connection could not be established.
    #[error("recipe catalog connection failed: {message}")]
    Connection { message: String },
    /// Query failed during execution.
    #[error("recipe catalog query failed: {message}")]
    Query { message: String },
}

impl RecipeCatalogError {
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
}

/// Read-only port over the canonical recipe catalog.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecipeCatalogRepository: Send + Sync {
    /// List recipes, optionally filtered by a name/ingredient search term.
    async fn list(
        &self,
        query: Option<String>,
        limit: i64,
    ) -> Result<Vec<Recipe>, RecipeCatalogError>;

    /// Fetch one catalog recipe by id.
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Recipe>, RecipeCatalogError>;
}

/// Fixture implementation serving an empty catalog.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureRecipeCatalogRepository;

#[async_trait]
impl RecipeCatalogRepository for FixtureRecipeCatalogRepository {
    async fn list(
        &self,
        _query: Option<String>,
        _limit: i64,
    ) -> Result<Vec<Recipe>, RecipeCatalogError> {
        Ok(Vec::new())
    }

    async fn find_by_id(&self, _id: Uuid) -> Result<Option<Recipe>, RecipeCatalogError> {
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;

    #[tokio::test]
    async fn fixture_catalog_is_empty() {
        let repo = FixtureRecipeCatalogRepository;
        assert!(repo.list(None, 20).await.expect("list").is_empty());
        assert!(repo
            .find_by_id(Uuid::new_v4())
            .await
            .expect("find")
            .is_none());
    }
}
