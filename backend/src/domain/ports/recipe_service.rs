//! Driving port for recipe discovery, favorites, custom recipes, and
//! categories.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Category, Error, Recipe, RecipeContent, UserId, UserRecipe};

/// Domain use-case port for the recipe box.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecipeService: Send + Sync {
    /// Browse the shared catalog, optionally filtered by a search term.
    async fn browse_catalog(
        &self,
        query: Option<String>,
        limit: i64,
    ) -> Result<Vec<Recipe>, Error>;

    /// List the user's saved recipes (favorites and custom).
    async fn list_saved(&self, user_id: &UserId) -> Result<Vec<UserRecipe>, Error>;

    /// Favorite a catalog recipe, copying its content.
    async fn favorite(&self, user_id: &UserId, recipe_id: Uuid) -> Result<UserRecipe, Error>;

    /// Remove a favorite.
    async fn unfavorite(&self, user_id: &UserId, recipe_id: Uuid) -> Result<(), Error>;

    /// Create a custom recipe from validated content.
    async fn create_custom(
        &self,
        user_id: &UserId,
        content: RecipeContent,
    ) -> Result<UserRecipe, Error>;

    /// Replace the content of a custom recipe.
    async fn update_custom(
        &self,
        user_id: &UserId,
        id: Uuid,
        content: RecipeContent,
    ) -> Result<UserRecipe, Error>;

    /// Delete a saved recipe (favorite or custom).
    async fn delete_saved(&self, user_id: &UserId, id: Uuid) -> Result<(), Error>;

    /// Create a category.
    async fn create_category(&self, user_id: &UserId, name: String) -> Result<Category, Error>;

    /// List the user's categories.
    async fn list_categories(&self, user_id: &UserId) -> Result<Vec<Category>, Error>;

    /// Delete a category; assignments cascade, recipes stay.
    async fn delete_category(&self, user_id: &UserId, id: Uuid) -> Result<(), Error>;

    /// Tag a saved recipe with a category.
    async fn assign_category(
        &self,
        user_id: &UserId,
        recipe_id: Uuid,
        category_id: Uuid,
    ) -> Result<(), Error>;

    /// Remove a tag from a saved recipe.
    async fn unassign_category(
        &self,
        user_id: &UserId,
        recipe_id: Uuid,
        category_id: Uuid,
    ) -> Result<(), Error>;
}

/// Fixture implementation for wiring tests.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureRecipeService;

#[async_trait]
impl RecipeService for FixtureRecipeService {
    async fn browse_catalog(
        &self,
        _query: Option<String>,
        _limit: i64,
    ) -> Result<Vec<Recipe>, Error> {
        Ok(Vec::new())
    }

    async fn list_saved(&self, _user_id: &UserId) -> Result<Vec<UserRecipe>, Error> {
        Ok(Vec::new())
    }

    async fn favorite(&self, _user_id: &UserId, _recipe_id: Uuid) -> Result<UserRecipe, Error> {
        Err(Error::not_found("recipe not found"))
    }

    async fn unfavorite(&self, _user_id: &UserId, _recipe_id: Uuid) -> Result<(), Error> {
        Err(Error::not_found("favorite not found"))
    }

    async fn create_custom(
        &self,
        _user_id: &UserId,
        _content: RecipeContent,
    ) -> Result<UserRecipe, Error> {
        Err(Error::internal("recipe service not configured"))
    }

    async fn update_custom(
        &self,
        _user_id: &UserId,
        _id: Uuid,
        _content: RecipeContent,
    ) -> Result<UserRecipe, Error> {
        Err(Error::not_found("recipe not found"))
    }

    async fn delete_saved(&self, _user_id: &UserId, _id: Uuid) -> Result<(), Error> {
        Err(Error::not_found("recipe not found"))
    }

    async fn create_category(&self, _user_id: &UserId, _name: String) -> Result<Category, Error> {
        Err(Error::internal("recipe service not configured"))
    }

    async fn list_categories(&self, _user_id: &UserId) -> Result<Vec<Category>, Error> {
        Ok(Vec::new())
    }

    async fn delete_category(&self, _user_id: &UserId, _id: Uuid) -> Result<(), Error> {
        Err(Error::not_found("category not found"))
    }

    async fn assign_category(
        &self,
        _user_id: &UserId,
        _recipe_id: Uuid,
        _category_id: Uuid,
    ) -> Result<(), Error> {
        Err(Error::not_found("recipe not found"))
    }

    async fn unassign_category(
        &self,
        _user_id: &UserId,
        _recipe_id: Uuid,
        _category_id: Uuid,
    ) -> Result<(), Error> {
        Err(Error::not_found("recipe not found"))
    }
}
