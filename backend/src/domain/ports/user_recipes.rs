//! Port for user-owned recipe rows (favorites and custom recipes).

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{UserId, UserRecipe};

/// Errors raised by user recipe adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserRecipeRepositoryError {
    /// Store connection could not be established.
    #[error("user recipe store connection failed: {message}")]
    Connection { message: String },
    /// Query or mutation failed during execution.
    #[error("user recipe store query failed: {message}")]
    Query { message: String },
    /// The `(user, original_recipe_id)` unique constraint was violated.
    #[error("recipe is already favorited")]
    DuplicateFavorite,
}

impl UserRecipeRepositoryError {
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

/// Port for the user's saved recipes.
///
/// Every operation is scoped to the owning user; a row belonging to another
/// user behaves as absent.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRecipeRepository: Send + Sync {
    /// Insert a favorite or custom row.
    ///
    /// Fails with [`UserRecipeRepositoryError::DuplicateFavorite`] when the
    /// `(user, original_recipe_id)` pair already exists.
    async fn insert(&self, recipe: &UserRecipe) -> Result<(), UserRecipeRepositoryError>;

    /// List a user's saved recipes, newest first.
    async fn list_for_user(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<UserRecipe>, UserRecipeRepositoryError>;

    /// Fetch one saved recipe by row id.
    async fn find(
        &self,
        user_id: &UserId,
        id: Uuid,
    ) -> Result<Option<UserRecipe>, UserRecipeRepositoryError>;

    /// Fetch the favorite row referencing a catalog recipe, if any.
    async fn find_favorite(
        &self,
        user_id: &UserId,
        original_recipe_id: Uuid,
    ) -> Result<Option<UserRecipe>, UserRecipeRepositoryError>;

    /// Replace the content of an existing row.
    ///
    /// Returns `false` when the row does not exist for this user.
    async fn update(&self, recipe: &UserRecipe) -> Result<bool, UserRecipeRepositoryError>;

    /// Delete a saved recipe. Returns `false` when absent.
    ///
    /// Category assignments cascade with the row.
    async fn delete(&self, user_id: &UserId, id: Uuid) -> Result<bool, UserRecipeRepositoryError>;
}

/// Fixture implementation storing nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureUserRecipeRepository;

#[async_trait]
impl UserRecipeRepository for FixtureUserRecipeRepository {
    async fn insert(&self, _recipe: &UserRecipe) -> Result<(), UserRecipeRepositoryError> {
        Ok(())
    }

    async fn list_for_user(
        &self,
        _user_id: &UserId,
    ) -> Result<Vec<UserRecipe>, UserRecipeRepositoryError> {
        Ok(Vec::new())
    }

    async fn find(
        &self,
        _user_id: &UserId,
        _id: Uuid,
    ) -> Result<Option<UserRecipe>, UserRecipeRepositoryError> {
        Ok(None)
    }

    async fn find_favorite(
        &self,
        _user_id: &UserId,
        _original_recipe_id: Uuid,
    ) -> Result<Option<UserRecipe>, UserRecipeRepositoryError> {
        Ok(None)
    }

    async fn update(&self, _recipe: &UserRecipe) -> Result<bool, UserRecipeRepositoryError> {
        Ok(false)
    }

    async fn delete(
        &self,
        _user_id: &UserId,
        _id: Uuid,
    ) -> Result<bool, UserRecipeRepositoryError> {
        Ok(false)
    }
}
