//! Recipe box domain service.
//!
//! Implements the [`RecipeService`] driving port: catalog discovery,
//! favoriting (copy-on-favorite), custom recipes, and category tagging.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use serde_json::json;
use uuid::Uuid;

use crate::domain::ports::{
    CategoryRepository, CategoryRepositoryError, RecipeCatalogError, RecipeCatalogRepository,
    RecipeService, UserRecipeRepository, UserRecipeRepositoryError,
};
use crate::domain::recipes::{CategoryValidationError, RecipeValidationError};
use crate::domain::{Category, Error, Recipe, RecipeContent, UserId, UserRecipe};

/// Default and maximum page sizes for catalog browsing.
pub const CATALOG_DEFAULT_LIMIT: i64 = 20;
/// Upper bound on requested catalog pages.
pub const CATALOG_MAX_LIMIT: i64 = 100;

/// Recipe service over the catalog, user recipe, and category stores.
#[derive(Clone)]
pub struct RecipeBoxService<C, R, G> {
    catalog: Arc<C>,
    saved: Arc<R>,
    categories: Arc<G>,
}

impl<C, R, G> RecipeBoxService<C, R, G> {
    /// Create a new service with the given repositories.
    pub fn new(catalog: Arc<C>, saved: Arc<R>, categories: Arc<G>) -> Self {
        Self {
            catalog,
            saved,
            categories,
        }
    }
}

impl<C, R, G> RecipeBoxService<C, R, G>
where
    C: RecipeCatalogRepository,
    R: UserRecipeRepository,
    G: CategoryRepository,
{
    fn map_catalog_error(error: RecipeCatalogError) -> Error {
        Error::persistence(format!("recipe catalog failure: {error}"))
    }

    fn map_saved_error(error: UserRecipeRepositoryError) -> Error {
        match error {
            UserRecipeRepositoryError::DuplicateFavorite => {
                Error::conflict("recipe is already favorited")
            }
            UserRecipeRepositoryError::Connection { .. }
            | UserRecipeRepositoryError::Query { .. } => {
                Error::persistence(format!("user recipe store failure: {error}"))
            }
        }
    }

    fn map_category_error(error: CategoryRepositoryError) -> Error {
        Error::persistence(format!("category store failure: {error}"))
    }

    fn map_content_error(error: RecipeValidationError) -> Error {
        let code = error.code();
        Error::validation(error.to_string()).with_details(json!({ "code": code }))
    }

    async fn require_saved(&self, user_id: &UserId, id: Uuid) -> Result<UserRecipe, Error> {
        self.saved
            .find(user_id, id)
            .await
            .map_err(Self::map_saved_error)?
            .ok_or_else(|| Error::not_found("recipe not found"))
    }

    async fn require_category(&self, user_id: &UserId, id: Uuid) -> Result<Category, Error> {
        self.categories
            .find(user_id, id)
            .await
            .map_err(Self::map_category_error)?
            .ok_or_else(|| Error::not_found("category not found"))
    }
}

#[async_trait]
impl<C, R, G> RecipeService for RecipeBoxService<C, R, G>
where
    C: RecipeCatalogRepository,
    R: UserRecipeRepository,
    G: CategoryRepository,
{
    async fn browse_catalog(
        &self,
        query: Option<String>,
        limit: i64,
    ) -> Result<Vec<Recipe>, Error> {
        let limit = limit.clamp(1, CATALOG_MAX_LIMIT);
        self.catalog
            .list(query, limit)
            .await
            .map_err(Self::map_catalog_error)
    }

    async fn list_saved(&self, user_id: &UserId) -> Result<Vec<UserRecipe>, Error> {
        self.saved
            .list_for_user(user_id)
            .await
            .map_err(Self::map_saved_error)
    }

    async fn favorite(&self, user_id: &UserId, recipe_id: Uuid) -> Result<UserRecipe, Error> {
        let recipe = self
            .catalog
            .find_by_id(recipe_id)
            .await
            .map_err(Self::map_catalog_error)?
            .ok_or_else(|| Error::not_found("recipe not found"))?;

        if self
            .saved
            .find_favorite(user_id, recipe_id)
            .await
            .map_err(Self::map_saved_error)?
            .is_some()
        {
            return Err(Error::conflict("recipe is already favorited"));
        }

        let favorite = UserRecipe::favorite_of(*user_id, &recipe, Utc::now());
        // The unique constraint still backstops concurrent favoriting.
        self.saved
            .insert(&favorite)
            .await
            .map_err(Self::map_saved_error)?;
        Ok(favorite)
    }

    async fn unfavorite(&self, user_id: &UserId, recipe_id: Uuid) -> Result<(), Error> {
        let favorite = self
            .saved
            .find_favorite(user_id, recipe_id)
            .await
            .map_err(Self::map_saved_error)?
            .ok_or_else(|| Error::not_found("favorite not found"))?;

        let removed = self
            .saved
            .delete(user_id, favorite.id)
            .await
            .map_err(Self::map_saved_error)?;
        if !removed {
            return Err(Error::not_found("favorite not found"));
        }
        Ok(())
    }

    async fn create_custom(
        &self,
        user_id: &UserId,
        content: RecipeContent,
    ) -> Result<UserRecipe, Error> {
        content.validate().map_err(Self::map_content_error)?;
        let recipe = UserRecipe::custom(*user_id, content, Utc::now());
        self.saved
            .insert(&recipe)
            .await
            .map_err(Self::map_saved_error)?;
        Ok(recipe)
    }

    async fn update_custom(
        &self,
        user_id: &UserId,
        id: Uuid,
        content: RecipeContent,
    ) -> Result<UserRecipe, Error> {
        content.validate().map_err(Self::map_content_error)?;
        let mut recipe = self.require_saved(user_id, id).await?;
        if !recipe.is_custom {
            return Err(
                Error::validation("only custom recipes can be edited; remove the favorite instead")
                    .with_details(json!({ "code": "favorite_not_editable" })),
            );
        }

        recipe.content = content;
        recipe.updated_at = Utc::now();
        let updated = self
            .saved
            .update(&recipe)
            .await
            .map_err(Self::map_saved_error)?;
        if !updated {
            return Err(Error::not_found("recipe not found"));
        }
        Ok(recipe)
    }

    async fn delete_saved(&self, user_id: &UserId, id: Uuid) -> Result<(), Error> {
        let removed = self
            .saved
            .delete(user_id, id)
            .await
            .map_err(Self::map_saved_error)?;
        if !removed {
            return Err(Error::not_found("recipe not found"));
        }
        Ok(())
    }

    async fn create_category(&self, user_id: &UserId, name: String) -> Result<Category, Error> {
        let category = Category::new(*user_id, name, Utc::now()).map_err(|err| match err {
            CategoryValidationError::EmptyName => Error::validation(err.to_string())
                .with_details(json!({ "field": "name", "code": "empty_name" })),
        })?;
        self.categories
            .insert(&category)
            .await
            .map_err(Self::map_category_error)?;
        Ok(category)
    }

    async fn list_categories(&self, user_id: &UserId) -> Result<Vec<Category>, Error> {
        self.categories
            .list_for_user(user_id)
            .await
            .map_err(Self::map_category_error)
    }

    async fn delete_category(&self, user_id: &UserId, id: Uuid) -> Result<(), Error> {
        // Assignments cascade with the category; recipes stay untouched.
        let removed = self
            .categories
            .delete(user_id, id)
            .await
            .map_err(Self::map_category_error)?;
        if !removed {
            return Err(Error::not_found("category not found"));
        }
        Ok(())
    }

    async fn assign_category(
        &self,
        user_id: &UserId,
        recipe_id: Uuid,
        category_id: Uuid,
    ) -> Result<(), Error> {
        let recipe = self.require_saved(user_id, recipe_id).await?;
        let category = self.require_category(user_id, category_id).await?;
        self.categories
            .assign(recipe.id, category.id)
            .await
            .map_err(Self::map_category_error)
    }

    async fn unassign_category(
        &self,
        user_id: &UserId,
        recipe_id: Uuid,
        category_id: Uuid,
    ) -> Result<(), Error> {
        let recipe = self.require_saved(user_id, recipe_id).await?;
        let removed = self
            .categories
            .unassign(recipe.id, category_id)
            .await
            .map_err(Self::map_category_error)?;
        if !removed {
            return Err(Error::not_found("category assignment not found"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::ports::{
        MockCategoryRepository, MockRecipeCatalogRepository, MockUserRecipeRepository,
    };
    use crate::domain::recipes::Ingredient;
    use crate::domain::ErrorCode;
    use rstest::rstest;

    type Service = RecipeBoxService<
        MockRecipeCatalogRepository,
        MockUserRecipeRepository,
        MockCategoryRepository,
    >;

    fn service(
        catalog: MockRecipeCatalogRepository,
        saved: MockUserRecipeRepository,
        categories: MockCategoryRepository,
    ) -> Service {
        RecipeBoxService::new(Arc::new(catalog), Arc::new(saved), Arc::new(categories))
    }

    fn catalog_recipe(id: Uuid) -> Recipe {
        Recipe {
            id,
            content: valid_content(),
            created_at: Utc::now(),
        }
    }

    fn valid_content() -> RecipeContent {
        RecipeContent {
            name: "Lentil soup".into(),
            description: None,
            ingredients: vec![Ingredient {
                name: "lentils".into(),
                quantity: 200.0,
                unit: Some("g".into()),
            }],
            instructions: vec!["Simmer.".into()],
            servings: 4,
            prep_minutes: 10,
            cook_minutes: 30,
            nutrition: None,
        }
    }

    #[tokio::test]
    async fn favorite_copies_catalog_content() {
        let recipe_id = Uuid::new_v4();
        let user_id = UserId::random();
        let mut catalog = MockRecipeCatalogRepository::new();
        catalog
            .expect_find_by_id()
            .times(1)
            .return_once(move |id| Ok(Some(catalog_recipe(id))));
        let mut saved = MockUserRecipeRepository::new();
        saved
            .expect_find_favorite()
            .times(1)
            .return_once(|_, _| Ok(None));
        saved
            .expect_insert()
            .withf(move |recipe: &UserRecipe| {
                recipe.original_recipe_id == Some(recipe_id)
                    && !recipe.is_custom
                    && recipe.content.name == "Lentil soup"
            })
            .times(1)
            .return_once(|_| Ok(()));

        let favorite = service(catalog, saved, MockCategoryRepository::new())
            .favorite(&user_id, recipe_id)
            .await
            .expect("favorite succeeds");

        assert_eq!(favorite.user_id, user_id);
    }

    #[tokio::test]
    async fn favoriting_twice_is_a_conflict() {
        let recipe_id = Uuid::new_v4();
        let mut catalog = MockRecipeCatalogRepository::new();
        catalog
            .expect_find_by_id()
            .times(1)
            .return_once(move |id| Ok(Some(catalog_recipe(id))));
        let mut saved = MockUserRecipeRepository::new();
        let user_id = UserId::random();
        saved.expect_find_favorite().times(1).return_once(move |uid, _| {
            Ok(Some(UserRecipe::favorite_of(
                *uid,
                &catalog_recipe(recipe_id),
                Utc::now(),
            )))
        });
        saved.expect_insert().times(0);

        let err = service(catalog, saved, MockCategoryRepository::new())
            .favorite(&user_id, recipe_id)
            .await
            .expect_err("duplicate favorite");

        assert_eq!(err.code(), ErrorCode::Conflict);
    }

    #[tokio::test]
    async fn favorite_race_maps_constraint_violation_to_conflict() {
        let recipe_id = Uuid::new_v4();
        let mut catalog = MockRecipeCatalogRepository::new();
        catalog
            .expect_find_by_id()
            .times(1)
            .return_once(move |id| Ok(Some(catalog_recipe(id))));
        let mut saved = MockUserRecipeRepository::new();
        saved
            .expect_find_favorite()
            .times(1)
            .return_once(|_, _| Ok(None));
        saved
            .expect_insert()
            .times(1)
            .return_once(|_| Err(UserRecipeRepositoryError::DuplicateFavorite));

        let err = service(catalog, saved, MockCategoryRepository::new())
            .favorite(&UserId::random(), recipe_id)
            .await
            .expect_err("constraint violation");

        assert_eq!(err.code(), ErrorCode::Conflict);
    }

    #[tokio::test]
    async fn favoriting_an_unknown_catalog_recipe_is_not_found() {
        let mut catalog = MockRecipeCatalogRepository::new();
        catalog
            .expect_find_by_id()
            .times(1)
            .return_once(|_| Ok(None));
        let mut saved = MockUserRecipeRepository::new();
        saved.expect_insert().times(0);

        let err = service(catalog, saved, MockCategoryRepository::new())
            .favorite(&UserId::random(), Uuid::new_v4())
            .await
            .expect_err("unknown recipe");

        assert_eq!(err.code(), ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn unfavorite_removes_the_favorite_row() {
        let recipe_id = Uuid::new_v4();
        let user_id = UserId::random();
        let favorite = UserRecipe::favorite_of(user_id, &catalog_recipe(recipe_id), Utc::now());
        let favorite_id = favorite.id;
        let mut saved = MockUserRecipeRepository::new();
        saved
            .expect_find_favorite()
            .times(1)
            .return_once(move |_, _| Ok(Some(favorite)));
        saved
            .expect_delete()
            .withf(move |_, id| *id == favorite_id)
            .times(1)
            .return_once(|_, _| Ok(true));

        service(
            MockRecipeCatalogRepository::new(),
            saved,
            MockCategoryRepository::new(),
        )
        .unfavorite(&user_id, recipe_id)
        .await
        .expect("unfavorite succeeds");
    }

    #[tokio::test]
    async fn unfavorite_of_absent_row_is_not_found() {
        let mut saved = MockUserRecipeRepository::new();
        saved
            .expect_find_favorite()
            .times(1)
            .return_once(|_, _| Ok(None));

        let err = service(
            MockRecipeCatalogRepository::new(),
            saved,
            MockCategoryRepository::new(),
        )
        .unfavorite(&UserId::random(), Uuid::new_v4())
        .await
        .expect_err("absent favorite");

        assert_eq!(err.code(), ErrorCode::NotFound);
    }

    #[rstest]
    #[case::empty_name("", 4)]
    #[case::zero_servings("Soup", 0)]
    #[tokio::test]
    async fn create_custom_rejects_invalid_content(#[case] name: &str, #[case] servings: u32) {
        let mut saved = MockUserRecipeRepository::new();
        saved.expect_insert().times(0);
        let mut content = valid_content();
        content.name = name.into();
        content.servings = servings;

        let err = service(
            MockRecipeCatalogRepository::new(),
            saved,
            MockCategoryRepository::new(),
        )
        .create_custom(&UserId::random(), content)
        .await
        .expect_err("invalid content");

        assert_eq!(err.code(), ErrorCode::Validation);
    }

    #[tokio::test]
    async fn favorites_cannot_be_edited() {
        let user_id = UserId::random();
        let favorite = UserRecipe::favorite_of(user_id, &catalog_recipe(Uuid::new_v4()), Utc::now());
        let row_id = favorite.id;
        let mut saved = MockUserRecipeRepository::new();
        saved
            .expect_find()
            .times(1)
            .return_once(move |_, _| Ok(Some(favorite)));
        saved.expect_update().times(0);

        let err = service(
            MockRecipeCatalogRepository::new(),
            saved,
            MockCategoryRepository::new(),
        )
        .update_custom(&user_id, row_id, valid_content())
        .await
        .expect_err("favorites are immutable");

        assert_eq!(err.code(), ErrorCode::Validation);
    }

    #[tokio::test]
    async fn assign_category_checks_ownership_of_both_parents() {
        let user_id = UserId::random();
        let recipe = UserRecipe::custom(user_id, valid_content(), Utc::now());
        let recipe_id = recipe.id;
        let category = Category::new(user_id, "weeknight", Utc::now()).expect("category");
        let category_id = category.id;

        let mut saved = MockUserRecipeRepository::new();
        saved
            .expect_find()
            .times(1)
            .return_once(move |_, _| Ok(Some(recipe)));
        let mut categories = MockCategoryRepository::new();
        categories
            .expect_find()
            .times(1)
            .return_once(move |_, _| Ok(Some(category)));
        categories
            .expect_assign()
            .withf(move |r, c| *r == recipe_id && *c == category_id)
            .times(1)
            .return_once(|_, _| Ok(()));

        service(MockRecipeCatalogRepository::new(), saved, categories)
            .assign_category(&user_id, recipe_id, category_id)
            .await
            .expect("assignment succeeds");
    }

    #[tokio::test]
    async fn delete_category_of_absent_row_is_not_found() {
        let mut categories = MockCategoryRepository::new();
        categories
            .expect_delete()
            .times(1)
            .return_once(|_, _| Ok(false));

        let err = service(
            MockRecipeCatalogRepository::new(),
            MockUserRecipeRepository::new(),
            categories,
        )
        .delete_category(&UserId::random(), Uuid::new_v4())
        .await
        .expect_err("absent category");

        assert_eq!(err.code(), ErrorCode::NotFound);
    }
}
