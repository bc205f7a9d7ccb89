//! Port for pantry item storage.

use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

use crate::domain::{PantryItem, UserId};

/// Errors raised by pantry adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PantryRepositoryError {
    /// Store connection could not be established.
    #[error("pantry store connection failed: {message}")]
    Connection { message: String },
    /// Query or mutation failed during execution.
    #[error("pantry store query failed: {message}")]
    Query { message: String },
}

impl PantryRepositoryError {
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

/// Port for pantry item storage, scoped to the owning user.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PantryRepository: Send + Sync {
    /// Insert a new item.
    async fn insert(&self, item: &PantryItem) -> Result<(), PantryRepositoryError>;

    /// List a user's items, most recently added first.
    async fn list_for_user(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<PantryItem>, PantryRepositoryError>;

    /// Fetch one item by id.
    async fn find(
        &self,
        user_id: &UserId,
        id: Uuid,
    ) -> Result<Option<PantryItem>, PantryRepositoryError>;

    /// Replace an existing item. Returns `false` when absent.
    async fn update(&self, item: &PantryItem) -> Result<bool, PantryRepositoryError>;

    /// Delete an item. Returns `false` when absent.
    async fn delete(&self, user_id: &UserId, id: Uuid) -> Result<bool, PantryRepositoryError>;

    /// Items with an expiry date on or before the horizon, soonest first.
    async fn expiring_within(
        &self,
        user_id: &UserId,
        from: NaiveDate,
        until: NaiveDate,
    ) -> Result<Vec<PantryItem>, PantryRepositoryError>;

    /// Delete every item that expired before the given date.
    ///
    /// Returns the number of rows removed.
    async fn delete_expired(
        &self,
        user_id: &UserId,
        before: NaiveDate,
    ) -> Result<u64, PantryRepositoryError>;
}

/// Fixture implementation storing nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixturePantryRepository;

#[async_trait]
impl PantryRepository for FixturePantryRepository {
    async fn insert(&self, _item: &PantryItem) -> Result<(), PantryRepositoryError> {
        Ok(())
    }

    async fn list_for_user(
        &self,
        _user_id: &UserId,
    ) -> Result<Vec<PantryItem>, PantryRepositoryError> {
        Ok(Vec::new())
    }

    async fn find(
        &self,
        _user_id: &UserId,
        _id: Uuid,
    ) -> Result<Option<PantryItem>, PantryRepositoryError> {
        Ok(None)
    }

    async fn update(&self, _item: &PantryItem) -> Result<bool, PantryRepositoryError> {
        Ok(false)
    }

    async fn delete(&self, _user_id: &UserId, _id: Uuid) -> Result<bool, PantryRepositoryError> {
        Ok(false)
    }

    async fn expiring_within(
        &self,
        _user_id: &UserId,
        _from: NaiveDate,
        _until: NaiveDate,
    ) -> Result<Vec<PantryItem>, PantryRepositoryError> {
        Ok(Vec::new())
    }

    async fn delete_expired(
        &self,
        _user_id: &UserId,
        _before: NaiveDate,
    ) -> Result<u64, PantryRepositoryError> {
        Ok(0)
    }
}
