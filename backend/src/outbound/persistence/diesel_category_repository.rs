//! PostgreSQL-backed `CategoryRepository` implementation using Diesel.
//!
//! Assignment rows cascade with either parent via foreign keys; the
//! adapter never deletes them explicitly.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::debug;
use uuid::Uuid;

use crate::domain::ports::{CategoryRepository, CategoryRepositoryError};
use crate::domain::{Category, UserId};

use super::models::{AssignmentRow, CategoryRow};
use super::pool::{DbPool, PoolError};
use super::schema::{categories, category_assignments};

/// Diesel-backed implementation of the `CategoryRepository` port.
#[derive(Clone)]
pub struct DieselCategoryRepository {
    pool: DbPool,
}

impl DieselCategoryRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> CategoryRepositoryError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            CategoryRepositoryError::connection(message)
        }
    }
}

fn map_diesel_error(error: diesel::result::Error) -> CategoryRepositoryError {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match &error {
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            CategoryRepositoryError::connection("database connection error")
        }
        _ => {
            debug!(error = %error, "diesel operation failed");
            CategoryRepositoryError::query("database error")
        }
    }
}

fn row_to_category(row: CategoryRow) -> Category {
    Category {
        id: row.id,
        user_id: UserId::from_uuid(row.user_id),
        name: row.name,
        created_at: row.created_at,
    }
}

#[async_trait]
impl CategoryRepository for DieselCategoryRepository {
    async fn insert(&self, category: &Category) -> Result<(), CategoryRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = CategoryRow {
            id: category.id,
            user_id: *category.user_id.as_uuid(),
            name: category.name.clone(),
            created_at: category.created_at,
        };

        diesel::insert_into(categories::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn list_for_user(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<Category>, CategoryRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<CategoryRow> = categories::table
            .filter(categories::user_id.eq(user_id.as_uuid()))
            .select(CategoryRow::as_select())
            .order(categories::name.asc())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows.into_iter().map(row_to_category).collect())
    }

    async fn find(
        &self,
        user_id: &UserId,
        id: Uuid,
    ) -> Result<Option<Category>, CategoryRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<CategoryRow> = categories::table
            .filter(categories::user_id.eq(user_id.as_uuid()))
            .filter(categories::id.eq(id))
            .select(CategoryRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(row.map(row_to_category))
    }

    async fn delete(&self, user_id: &UserId, id: Uuid) -> Result<bool, CategoryRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let deleted_rows = diesel::delete(
            categories::table
                .filter(categories::user_id.eq(user_id.as_uuid()))
                .filter(categories::id.eq(id)),
        )
        .execute(&mut conn)
        .await
        .map_err(map_diesel_error)?;
        Ok(deleted_rows > 0)
    }

    async fn assign(
        &self,
        user_recipe_id: Uuid,
        category_id: Uuid,
    ) -> Result<(), CategoryRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = AssignmentRow {
            user_recipe_id,
            category_id,
        };

        diesel::insert_into(category_assignments::table)
            .values(&row)
            .on_conflict((
                category_assignments::user_recipe_id,
                category_assignments::category_id,
            ))
            .do_nothing()
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn unassign(
        &self,
        user_recipe_id: Uuid,
        category_id: Uuid,
    ) -> Result<bool, CategoryRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let deleted_rows = diesel::delete(
            category_assignments::table
                .filter(category_assignments::user_recipe_id.eq(user_recipe_id))
                .filter(category_assignments::category_id.eq(category_id)),
        )
        .execute(&mut conn)
        .await
        .map_err(map_diesel_error)?;
        Ok(deleted_rows > 0)
    }

    async fn assignments_for_recipe(
        &self,
        user_recipe_id: Uuid,
    ) -> Result<Vec<Uuid>, CategoryRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        category_assignments::table
            .filter(category_assignments::user_recipe_id.eq(user_recipe_id))
            .select(category_assignments::category_id)
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)
    }
}
