//! PostgreSQL-backed `RecipeCatalogRepository` implementation using Diesel.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::PgTextExpressionMethods;
use diesel_async::RunQueryDsl;
use tracing::debug;
use uuid::Uuid;

use crate::domain::ports::{RecipeCatalogError, RecipeCatalogRepository};
use crate::domain::recipes::{Ingredient, NutritionFacts};
use crate::domain::{Recipe, RecipeContent};

use super::json_columns::{from_json, from_json_opt};
use super::models::RecipeRow;
use super::pool::{DbPool, PoolError};
use super::schema::recipes;

/// Diesel-backed implementation of the `RecipeCatalogRepository` port.
#[derive(Clone)]
pub struct DieselRecipeCatalogRepository {
    pool: DbPool,
}

impl DieselRecipeCatalogRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> RecipeCatalogError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            RecipeCatalogError::connection(message)
        }
    }
}

fn map_diesel_error(error: diesel::result::Error) -> RecipeCatalogError {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match &error {
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            RecipeCatalogError::connection("database connection error")
        }
        _ => {
            debug!(error = %error, "diesel operation failed");
            RecipeCatalogError::query("database error")
        }
    }
}

fn cast_count(value: i32, field: &str) -> Result<u32, RecipeCatalogError> {
    u32::try_from(value)
        .map_err(|_| RecipeCatalogError::query(format!("stored {field} is negative")))
}

pub(super) fn row_to_recipe(row: RecipeRow) -> Result<Recipe, RecipeCatalogError> {
    let ingredients: Vec<Ingredient> =
        from_json(row.ingredients).map_err(RecipeCatalogError::query)?;
    let instructions: Vec<String> =
        from_json(row.instructions).map_err(RecipeCatalogError::query)?;
    let nutrition: Option<NutritionFacts> =
        from_json_opt(row.nutrition).map_err(RecipeCatalogError::query)?;

    Ok(Recipe {
        id: row.id,
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
    })
}

#[async_trait]
impl RecipeCatalogRepository for DieselRecipeCatalogRepository {
    async fn list(
        &self,
        query: Option<String>,
        limit: i64,
    ) -> Result<Vec<Recipe>, RecipeCatalogError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let mut statement = recipes::table
            .select(RecipeRow::as_select())
            .order(recipes::created_at.desc())
            .limit(limit)
            .into_boxed();
        if let Some(term) = query.filter(|term| !term.trim().is_empty()) {
            statement = statement.filter(recipes::name.ilike(format!("%{}%", term.trim())));
        }

        let rows: Vec<RecipeRow> = statement
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter().map(row_to_recipe).collect()
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Recipe>, RecipeCatalogError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<RecipeRow> = recipes::table
            .filter(recipes::id.eq(id))
            .select(RecipeRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_recipe).transpose()
    }
}
