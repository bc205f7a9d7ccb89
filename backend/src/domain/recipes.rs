//! Recipe catalog, user recipes, and categories.
//!
//! Catalog recipes are canonical, shared, and read-only from the user's
//! perspective. A [`UserRecipe`] is either a favorite (content copied from
//! the catalog at favorite time, linked through `original_recipe_id`) or a
//! fully user-authored custom recipe with no catalog link.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::UserId;

/// One ingredient line of a recipe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Ingredient {
    pub name: String,
    pub quantity: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
}

/// Per-serving nutrition facts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NutritionFacts {
    pub calories: u32,
    pub protein_g: f64,
    pub carbs_g: f64,
    pub fat_g: f64,
}

/// The content fields shared by catalog, favorite, and custom recipes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecipeContent {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub ingredients: Vec<Ingredient>,
    pub instructions: Vec<String>,
    pub servings: u32,
    pub prep_minutes: u32,
    pub cook_minutes: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nutrition: Option<NutritionFacts>,
}

/// Validation failures for user-submitted recipe content.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RecipeValidationError {
    #[error("recipe name must not be empty")]
    EmptyName,
    #[error("recipe must have at least one ingredient")]
    NoIngredients,
    #[error("ingredient names must not be blank")]
    BlankIngredientName,
    #[error("servings must be greater than zero")]
    ZeroServings,
}

impl RecipeValidationError {
    /// Machine-readable code used in error details.
    pub fn code(&self) -> &'static str {
        match self {
            Self::EmptyName => "empty_name",
            Self::NoIngredients => "no_ingredients",
            Self::BlankIngredientName => "blank_ingredient_name",
            Self::ZeroServings => "zero_servings",
        }
    }
}

impl RecipeContent {
    /// Validate user-submitted content before it reaches a store.
    pub fn validate(&self) -> Result<(), RecipeValidationError> {
        if self.name.trim().is_empty() {
            return Err(RecipeValidationError::EmptyName);
        }
        if self.ingredients.is_empty() {
            return Err(RecipeValidationError::NoIngredients);
        }
        if self
            .ingredients
            .iter()
            .any(|ingredient| ingredient.name.trim().is_empty())
        {
            return Err(RecipeValidationError::BlankIngredientName);
        }
        if self.servings == 0 {
            return Err(RecipeValidationError::ZeroServings);
        }
        Ok(())
    }
}

/// Canonical catalog recipe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    pub id: Uuid,
    #[serde(flatten)]
    pub content: RecipeContent,
    pub created_at: DateTime<Utc>,
}

/// A recipe row owned by one user: a favorite or a custom creation.
///
/// ## Invariants
/// - At most one favorite per `(user, original_recipe_id)` pair.
/// - `is_custom` is true exactly when `original_recipe_id` is absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserRecipe {
    pub id: Uuid,
    #[schema(value_type = String)]
    pub user_id: UserId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_recipe_id: Option<Uuid>,
    pub is_custom: bool,
    #[serde(flatten)]
    pub content: RecipeContent,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserRecipe {
    /// Copy a catalog recipe into a favorite row for the given user.
    pub fn favorite_of(user_id: UserId, recipe: &Recipe, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            original_recipe_id: Some(recipe.id),
            is_custom: false,
            content: recipe.content.clone(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Build a custom recipe row from validated content.
    pub fn custom(user_id: UserId, content: RecipeContent, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            original_recipe_id: None,
            is_custom: true,
            content,
            created_at: now,
            updated_at: now,
        }
    }
}

/// User-scoped tag applied to saved recipes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: Uuid,
    #[schema(value_type = String)]
    pub user_id: UserId,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// Validation failures for category names.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CategoryValidationError {
    #[error("category name must not be empty")]
    EmptyName,
}

impl Category {
    /// Build a new category after validating the name.
    pub fn new(
        user_id: UserId,
        name: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Result<Self, CategoryValidationError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(CategoryValidationError::EmptyName);
        }
        Ok(Self {
            id: Uuid::new_v4(),
            user_id,
            name,
            created_at: now,
        })
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    fn valid_content() -> RecipeContent {
        RecipeContent {
            name: "Lentil soup".into(),
            description: None,
            ingredients: vec![Ingredient {
                name: "lentils".into(),
                quantity: 200.0,
                unit: Some("g".into()),
            }],
            instructions: vec!["Simmer for 30 minutes.".into()],
            servings: 4,
            prep_minutes: 10,
            cook_minutes: 30,
            nutrition: None,
        }
    }

    #[rstest]
    fn valid_content_passes_validation() {
        assert!(valid_content().validate().is_ok());
    }

    #[rstest]
    fn empty_name_is_rejected() {
        let mut content = valid_content();
        content.name = "  ".into();
        assert_eq!(content.validate(), Err(RecipeValidationError::EmptyName));
    }

    #[rstest]
    fn missing_ingredients_are_rejected() {
        let mut content = valid_content();
        content.ingredients.clear();
        assert_eq!(content.validate(), Err(RecipeValidationError::NoIngredients));
    }

    #[rstest]
    fn zero_servings_are_rejected() {
        let mut content = valid_content();
        content.servings = 0;
        assert_eq!(content.validate(), Err(RecipeValidationError::ZeroServings));
    }

    #[rstest]
    fn favorite_copies_catalog_content_and_links_back() {
        let recipe = Recipe {
            id: Uuid::new_v4(),
            content: valid_content(),
            created_at: Utc::now(),
        };
        let user_id = UserId::random();

        let favorite = UserRecipe::favorite_of(user_id, &recipe, Utc::now());

        assert_eq!(favorite.original_recipe_id, Some(recipe.id));
        assert!(!favorite.is_custom);
        assert_eq!(favorite.content, recipe.content);
    }

    #[rstest]
    fn custom_recipe_has_no_catalog_link() {
        let custom = UserRecipe::custom(UserId::random(), valid_content(), Utc::now());
        assert_eq!(custom.original_recipe_id, None);
        assert!(custom.is_custom);
    }

    #[rstest]
    fn blank_category_name_is_rejected() {
        let result = Category::new(UserId::random(), "   ", Utc::now());
        assert_eq!(result, Err(CategoryValidationError::EmptyName));
    }
}
