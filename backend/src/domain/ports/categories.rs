//! Port for user-scoped recipe categories and their assignments.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Category, UserId};

/// Errors raised by category adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CategoryRepositoryError {
    /// Store connection could not be established.
    #[error("category store connection failed: {message}")]
    Connection { message: String },
    /// Query or mutation failed during execution.
    #[error("category store query failed: {message}")]
    Query { message: String },
}

impl CategoryRepositoryError {
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

/// Port for category storage and the recipe/category join.
///
/// Deleting a category (or a user recipe) cascades to its assignments; the
/// other parent is never touched.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CategoryRepository: Send + Sync {
    /// Insert a new category.
    async fn insert(&self, category: &Category) -> Result<(), CategoryRepositoryError>;

    /// List a user's categories by name.
    async fn list_for_user(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<Category>, CategoryRepositoryError>;

    /// Fetch one category by id.
    async fn find(
        &self,
        user_id: &UserId,
        id: Uuid,
    ) -> Result<Option<Category>, CategoryRepositoryError>;

    /// Delete a category. Returns `false` when absent.
    async fn delete(&self, user_id: &UserId, id: Uuid) -> Result<bool, CategoryRepositoryError>;

    /// Assign a category to a saved recipe. Idempotent.
    async fn assign(
        &self,
        user_recipe_id: Uuid,
        category_id: Uuid,
    ) -> Result<(), CategoryRepositoryError>;

    /// Remove an assignment. Returns `false` when absent.
    async fn unassign(
        &self,
        user_recipe_id: Uuid,
        category_id: Uuid,
    ) -> Result<bool, CategoryRepositoryError>;

    /// Category ids assigned to one saved recipe.
    async fn assignments_for_recipe(
        &self,
        user_recipe_id: Uuid,
    ) -> Result<Vec<Uuid>, CategoryRepositoryError>;
}

/// Fixture implementation storing nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureCategoryRepository;

#[async_trait]
impl CategoryRepository for FixtureCategoryRepository {
    async fn insert(&self, _category: &Category) -> Result<(), CategoryRepositoryError> {
        Ok(())
    }

    async fn list_for_user(
        &self,
        _user_id: &UserId,
    ) -> Result<Vec<Category>, CategoryRepositoryError> {
        Ok(Vec::new())
    }

    async fn find(
        &self,
        _user_id: &UserId,
        _id: Uuid,
    ) -> Result<Option<Category>, CategoryRepositoryError> {
        Ok(None)
    }

    async fn delete(&self, _user_id: &UserId, _id: Uuid) -> Result<bool, CategoryRepositoryError> {
        Ok(false)
    }

    async fn assign(
        &self,
        _user_recipe_id: Uuid,
        _category_id: Uuid,
    ) -> Result<(), CategoryRepositoryError> {
        Ok(())
    }

    async fn unassign(
        &self,
        _user_recipe_id: Uuid,
        _category_id: Uuid,
    ) -> Result<bool, CategoryRepositoryError> {
        Ok(false)
    }

    async fn assignments_for_recipe(
        &self,
        _user_recipe_id: Uuid,
    ) -> Result<Vec<Uuid>, CategoryRepositoryError> {
        Ok(Vec::new())
    }
}
