//! Driving port for pantry tracking.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Error, PantryItem, PantryItemDraft, PantryStats, UserId};

/// Domain use-case port for the pantry.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PantryService: Send + Sync {
    /// Validate and store a new item.
    async fn add_item(&self, user_id: &UserId, draft: PantryItemDraft)
        -> Result<PantryItem, Error>;

    /// List the user's items, most recently added first.
    async fn list_items(&self, user_id: &UserId) -> Result<Vec<PantryItem>, Error>;

    /// Fetch one item.
    async fn get_item(&self, user_id: &UserId, id: Uuid) -> Result<PantryItem, Error>;

    /// Replace an item's user-editable fields.
    async fn update_item(
        &self,
        user_id: &UserId,
        id: Uuid,
        draft: PantryItemDraft,
    ) -> Result<PantryItem, Error>;

    /// Delete an item.
    async fn remove_item(&self, user_id: &UserId, id: Uuid) -> Result<(), Error>;

    /// Aggregate statistics over the user's pantry.
    async fn stats(&self, user_id: &UserId) -> Result<PantryStats, Error>;

    /// Items expiring within the given number of days, soonest first.
    async fn expiring(&self, user_id: &UserId, within_days: u32)
        -> Result<Vec<PantryItem>, Error>;

    /// Remove expired items, returning the removed count.
    async fn cleanup(&self, user_id: &UserId) -> Result<u64, Error>;
}

/// Fixture implementation for wiring tests.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixturePantryService;

#[async_trait]
impl PantryService for FixturePantryService {
    async fn add_item(
        &self,
        _user_id: &UserId,
        _draft: PantryItemDraft,
    ) -> Result<PantryItem, Error> {
        Err(Error::internal("pantry service not configured"))
    }

    async fn list_items(&self, _user_id: &UserId) -> Result<Vec<PantryItem>, Error> {
        Ok(Vec::new())
    }

    async fn get_item(&self, _user_id: &UserId, _id: Uuid) -> Result<PantryItem, Error> {
        Err(Error::not_found("pantry item not found"))
    }

    async fn update_item(
        &self,
        _user_id: &UserId,
        _id: Uuid,
        _draft: PantryItemDraft,
    ) -> Result<PantryItem, Error> {
        Err(Error::not_found("pantry item not found"))
    }

    async fn remove_item(&self, _user_id: &UserId, _id: Uuid) -> Result<(), Error> {
        Err(Error::not_found("pantry item not found"))
    }

    async fn stats(&self, _user_id: &UserId) -> Result<PantryStats, Error> {
        Ok(PantryStats {
            total_items: 0,
            expiring_soon: 0,
            by_category: Vec::new(),
        })
    }

    async fn expiring(
        &self,
        _user_id: &UserId,
        _within_days: u32,
    ) -> Result<Vec<PantryItem>, Error> {
        Ok(Vec::new())
    }

    async fn cleanup(&self, _user_id: &UserId) -> Result<u64, Error> {
        Ok(0)
    }
}
