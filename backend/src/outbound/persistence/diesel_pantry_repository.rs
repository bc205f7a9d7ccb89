//! PostgreSQL-backed `PantryRepository` implementation using Diesel.

use async_trait::async_trait;
use chrono::NaiveDate;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::debug;
use uuid::Uuid;

use crate::domain::ports::{PantryRepository, PantryRepositoryError};
use crate::domain::{PantryItem, UserId};

use super::models::{NewPantryItemRow, PantryItemRow, PantryItemUpdate};
use super::pool::{DbPool, PoolError};
use super::schema::pantry_items;

/// Diesel-backed implementation of the `PantryRepository` port.
#[derive(Clone)]
pub struct DieselPantryRepository {
    pool: DbPool,
}

impl DieselPantryRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> PantryRepositoryError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            PantryRepositoryError::connection(message)
        }
    }
}

fn map_diesel_error(error: diesel::result::Error) -> PantryRepositoryError {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match &error {
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            PantryRepositoryError::connection("database connection error")
        }
        _ => {
            debug!(error = %error, "diesel operation failed");
            PantryRepositoryError::query("database error")
        }
    }
}

fn row_to_item(row: PantryItemRow) -> PantryItem {
    PantryItem {
        id: row.id,
        user_id: UserId::from_uuid(row.user_id),
        name: row.name,
        quantity: row.quantity,
        unit: row.unit,
        category: row.category,
        expires_on: row.expires_on,
        added_at: row.added_at,
        updated_at: row.updated_at,
    }
}

#[async_trait]
impl PantryRepository for DieselPantryRepository {
    async fn insert(&self, item: &PantryItem) -> Result<(), PantryRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewPantryItemRow {
            id: item.id,
            user_id: *item.user_id.as_uuid(),
            name: &item.name,
            quantity: item.quantity,
            unit: item.unit.as_deref(),
            category: item.category.as_deref(),
            expires_on: item.expires_on,
            added_at: item.added_at,
            updated_at: item.updated_at,
        };

        diesel::insert_into(pantry_items::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn list_for_user(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<PantryItem>, PantryRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<PantryItemRow> = pantry_items::table
            .filter(pantry_items::user_id.eq(user_id.as_uuid()))
            .select(PantryItemRow::as_select())
            .order(pantry_items::added_at.desc())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows.into_iter().map(row_to_item).collect())
    }

    async fn find(
        &self,
        user_id: &UserId,
        id: Uuid,
    ) -> Result<Option<PantryItem>, PantryRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<PantryItemRow> = pantry_items::table
            .filter(pantry_items::user_id.eq(user_id.as_uuid()))
            .filter(pantry_items::id.eq(id))
            .select(PantryItemRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(row.map(row_to_item))
    }

    async fn update(&self, item: &PantryItem) -> Result<bool, PantryRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let update = PantryItemUpdate {
            name: &item.name,
            quantity: item.quantity,
            unit: item.unit.as_deref(),
            category: item.category.as_deref(),
            expires_on: item.expires_on,
            updated_at: item.updated_at,
        };

        let updated_rows = diesel::update(
            pantry_items::table
                .filter(pantry_items::user_id.eq(item.user_id.as_uuid()))
                .filter(pantry_items::id.eq(item.id)),
        )
        .set(&update)
        .execute(&mut conn)
        .await
        .map_err(map_diesel_error)?;
        Ok(updated_rows > 0)
    }

    async fn delete(&self, user_id: &UserId, id: Uuid) -> Result<bool, PantryRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let deleted_rows = diesel::delete(
            pantry_items::table
                .filter(pantry_items::user_id.eq(user_id.as_uuid()))
                .filter(pantry_items::id.eq(id)),
        )
        .execute(&mut conn)
        .await
        .map_err(map_diesel_error)?;
        Ok(deleted_rows > 0)
    }

    async fn expiring_within(
        &self,
        user_id: &UserId,
        from: NaiveDate,
        until: NaiveDate,
    ) -> Result<Vec<PantryItem>, PantryRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<PantryItemRow> = pantry_items::table
            .filter(pantry_items::user_id.eq(user_id.as_uuid()))
            .filter(pantry_items::expires_on.is_not_null())
            .filter(pantry_items::expires_on.ge(Some(from)))
            .filter(pantry_items::expires_on.le(Some(until)))
            .select(PantryItemRow::as_select())
            .order(pantry_items::expires_on.asc())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows.into_iter().map(row_to_item).collect())
    }

    async fn delete_expired(
        &self,
        user_id: &UserId,
        before: NaiveDate,
    ) -> Result<u64, PantryRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let deleted_rows = diesel::delete(
            pantry_items::table
                .filter(pantry_items::user_id.eq(user_id.as_uuid()))
                .filter(pantry_items::expires_on.lt(Some(before))),
        )
        .execute(&mut conn)
        .await
        .map_err(map_diesel_error)?;
        Ok(deleted_rows as u64)
    }
}
