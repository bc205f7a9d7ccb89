//! PostgreSQL-backed `UserRecipeRepository` implementation using Diesel.
//!
//! The partial unique index on `(user_id, original_recipe_id)` is the
//! authority on duplicate favorites; violations map to the port's
//! `DuplicateFavorite` variant.

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::debug;
use uuid::Uuid;

use crate::domain::ports::{UserRecipeRepository, UserRecipeRepositoryError};
use crate::domain::recipes::{Ingredient, NutritionFacts};
use crate::domain::{RecipeContent, UserId, UserRecipe};

use super::json_columns::{from_json, from_json_opt, to_json};
use super::models::{NewUserRecipeRow, UserRecipeRow, UserRecipeUpdate};
use super::pool::{DbPool, PoolError};
use super::schema::user_recipes;

/// Diesel-backed implementation of the `UserRecipeRepository` port.
#[derive(Clone)]
pub struct DieselUserRecipeRepository {
    pool: DbPool,
}

impl DieselUserRecipeRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> UserRecipeRepositoryError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            UserRecipeRepositoryError::connection(message)
        }
    }
}

fn map_diesel_error(error: diesel::result::Error) -> UserRecipeRepositoryError {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match &error {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
            debug!(constraint = info.constraint_name(), "duplicate favorite");
            UserRecipeRepositoryError::DuplicateFavorite
        }
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            UserRecipeRepositoryError::connection("database connection error")
        }
        _ => {
            debug!(error = %error, "diesel operation failed");
            UserRecipeRepositoryError::query("database error")
        }
    }
}

fn cast_count(value: i32, field: &str) -> Result<u32, UserRecipeRepositoryError> {
    u32::try_from(value)
        .map_err(|_| UserRecipeRepositoryError::query(format!("stored {field} is negative")))
}

fn cast_count_for_db(value: u32) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}

fn row_to_user_recipe(row: UserRecipeRow) -> Result<UserRecipe, UserRecipeRepositoryError> {
    let ingredients: Vec<Ingredient> =
        from_json(row.ingredients).map_err(UserRecipeRepositoryError::query)?;
    let instructions: Vec<String> =
        from_json(row.instructions).map_err(UserRecipeRepositoryError::query)?;
    let nutrition: Option<NutritionFacts> =
        from_json_opt(row.nutrition).map_err(UserRecipeRepositoryError::query)?;

    Ok(UserRecipe {
        id: row.id,
        user_id: UserId::from_uuid(row.user_id),
        original_recipe_id: row.original_recipe_id,
        is_custom: row.is_custom,
        content: RecipeContent {
            name: row.name,
            description: row.description,
            ingredients,
            instructions,
            servings: cast_count(row.servings, "servings")?,
            prep_minutes: cast_count(row.prep_minutes, "prep time")?,
            cook_minutes: cast_count(row.cook_minutes, "cook time")?,
            nutrition,
        },
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

#[async_trait]
impl UserRecipeRepository for DieselUserRecipeRepository {
    async fn insert(&self, recipe: &UserRecipe) -> Result<(), UserRecipeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let content = &recipe.content;
        let row = NewUserRecipeRow {
            id: recipe.id,
            user_id: *recipe.user_id.as_uuid(),
            original_recipe_id: recipe.original_recipe_id,
            is_custom: recipe.is_custom,
            name: &content.name,
            description: content.description.as_deref(),
            ingredients: to_json(&content.ingredients).map_err(UserRecipeRepositoryError::query)?,
            instructions: to_json(&content.instructions)
                .map_err(UserRecipeRepositoryError::query)?,
            servings: cast_count_for_db(content.servings),
            prep_minutes: cast_count_for_db(content.prep_minutes),
            cook_minutes: cast_count_for_db(content.cook_minutes),
            nutrition: content
                .nutrition
                .as_ref()
                .map(to_json)
                .transpose()
                .map_err(UserRecipeRepositoryError::query)?,
            created_at: recipe.created_at,
            updated_at: recipe.updated_at,
        };

        diesel::insert_into(user_recipes::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn list_for_user(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<UserRecipe>, UserRecipeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<UserRecipeRow> = user_recipes::table
            .filter(user_recipes::user_id.eq(user_id.as_uuid()))
            .select(UserRecipeRow::as_select())
            .order(user_recipes::created_at.desc())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter().map(row_to_user_recipe).collect()
    }

    async fn find(
        &self,
        user_id: &UserId,
        id: Uuid,
    ) -> Result<Option<UserRecipe>, UserRecipeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<UserRecipeRow> = user_recipes::table
            .filter(user_recipes::user_id.eq(user_id.as_uuid()))
            .filter(user_recipes::id.eq(id))
            .select(UserRecipeRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_user_recipe).transpose()
    }

    async fn find_favorite(
        &self,
        user_id: &UserId,
        original_recipe_id: Uuid,
    ) -> Result<Option<UserRecipe>, UserRecipeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<UserRecipeRow> = user_recipes::table
            .filter(user_recipes::user_id.eq(user_id.as_uuid()))
            .filter(user_recipes::original_recipe_id.eq(Some(original_recipe_id)))
            .select(UserRecipeRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_user_recipe).transpose()
    }

    async fn update(&self, recipe: &UserRecipe) -> Result<bool, UserRecipeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let content = &recipe.content;
        let update = UserRecipeUpdate {
            name: &content.name,
            description: content.description.as_deref(),
            ingredients: to_json(&content.ingredients).map_err(UserRecipeRepositoryError::query)?,
            instructions: to_json(&content.instructions)
                .map_err(UserRecipeRepositoryError::query)?,
            servings: cast_count_for_db(content.servings),
            prep_minutes: cast_count_for_db(content.prep_minutes),
            cook_minutes: cast_count_for_db(content.cook_minutes),
            nutrition: content
                .nutrition
                .as_ref()
                .map(to_json)
                .transpose()
                .map_err(UserRecipeRepositoryError::query)?,
            updated_at: Utc::now(),
        };

        let updated_rows = diesel::update(
            user_recipes::table
                .filter(user_recipes::user_id.eq(recipe.user_id.as_uuid()))
                .filter(user_recipes::id.eq(recipe.id)),
        )
        .set(&update)
        .execute(&mut conn)
        .await
        .map_err(map_diesel_error)?;
        Ok(updated_rows > 0)
    }

    async fn delete(
        &self,
        user_id: &UserId,
        id: Uuid,
    ) -> Result<bool, UserRecipeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        // Category assignments cascade via the foreign key.
        let deleted_rows = diesel::delete(
            user_recipes::table
                .filter(user_recipes::user_id.eq(user_id.as_uuid()))
                .filter(user_recipes::id.eq(id)),
        )
        .execute(&mut conn)
        .await
        .map_err(map_diesel_error)?;
        Ok(deleted_rows > 0)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    fn unique_violation_maps_to_duplicate_favorite() {
        let err = map_diesel_error(diesel::result::Error::DatabaseError(
            diesel::result::DatabaseErrorKind::UniqueViolation,
            Box::new("duplicate key value".to_owned()),
        ));
        assert_eq!(err, UserRecipeRepositoryError::DuplicateFavorite);
    }

    #[rstest]
    fn row_round_trips_content_columns() {
        let row = UserRecipeRow {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            original_recipe_id: Some(Uuid::new_v4()),
            is_custom: false,
            name: "Lentil soup".into(),
            description: Some("Hearty".into()),
            ingredients: json!([{ "name": "lentils", "quantity": 200.0 }]),
            instructions: json!(["Simmer."]),
            servings: 4,
            prep_minutes: 10,
            cook_minutes: 30,
            nutrition: Some(json!({
                "calories": 320,
                "proteinG": 18.0,
                "carbsG": 50.0,
                "fatG": 4.0,
            })),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let recipe = row_to_user_recipe(row).expect("valid row");
        assert!(!recipe.is_custom);
        assert_eq!(recipe.content.nutrition.map(|n| n.calories), Some(320));
    }
}
