//! Pantry tracking domain service.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use serde_json::json;
use tracing::info;
use uuid::Uuid;

use crate::domain::pantry::{PantryValidationError, EXPIRING_SOON_DAYS};
use crate::domain::ports::{PantryRepository, PantryRepositoryError, PantryService};
use crate::domain::{Error, PantryItem, PantryItemDraft, PantryStats, UserId};

/// Pantry service over the pantry item store.
#[derive(Clone)]
pub struct PantryTrackerService<P> {
    items: Arc<P>,
}

impl<P> PantryTrackerService<P> {
    /// Create a new service with the given repository.
    pub fn new(items: Arc<P>) -> Self {
        Self { items }
    }
}

impl<P> PantryTrackerService<P>
where
    P: PantryRepository,
{
    fn map_repository_error(error: PantryRepositoryError) -> Error {
        Error::persistence(format!("pantry store failure: {error}"))
    }

    fn map_validation_error(error: PantryValidationError) -> Error {
        let code = error.code();
        Error::validation(error.to_string()).with_details(json!({ "code": code }))
    }
}

#[async_trait]
impl<P> PantryService for PantryTrackerService<P>
where
    P: PantryRepository,
{
    async fn add_item(
        &self,
        user_id: &UserId,
        draft: PantryItemDraft,
    ) -> Result<PantryItem, Error> {
        draft.validate().map_err(Self::map_validation_error)?;
        let item = draft.into_item(*user_id, Utc::now());
        self.items
            .insert(&item)
            .await
            .map_err(Self::map_repository_error)?;
        Ok(item)
    }

    async fn list_items(&self, user_id: &UserId) -> Result<Vec<PantryItem>, Error> {
        self.items
            .list_for_user(user_id)
            .await
            .map_err(Self::map_repository_error)
    }

    async fn get_item(&self, user_id: &UserId, id: Uuid) -> Result<PantryItem, Error> {
        self.items
            .find(user_id, id)
            .await
            .map_err(Self::map_repository_error)?
            .ok_or_else(|| Error::not_found("pantry item not found"))
    }

    async fn update_item(
        &self,
        user_id: &UserId,
        id: Uuid,
        draft: PantryItemDraft,
    ) -> Result<PantryItem, Error> {
        draft.validate().map_err(Self::map_validation_error)?;
        let existing = self.get_item(user_id, id).await?;

        let item = PantryItem {
            id: existing.id,
            user_id: existing.user_id,
            name: draft.name,
            quantity: draft.quantity,
            unit: draft.unit,
            category: draft.category,
            expires_on: draft.expires_on,
            added_at: existing.added_at,
            updated_at: Utc::now(),
        };
        let updated = self
            .items
            .update(&item)
            .await
            .map_err(Self::map_repository_error)?;
        if !updated {
            return Err(Error::not_found("pantry item not found"));
        }
        Ok(item)
    }

    async fn remove_item(&self, user_id: &UserId, id: Uuid) -> Result<(), Error> {
        let removed = self
            .items
            .delete(user_id, id)
            .await
            .map_err(Self::map_repository_error)?;
        if !removed {
            return Err(Error::not_found("pantry item not found"));
        }
        Ok(())
    }

    async fn stats(&self, user_id: &UserId) -> Result<PantryStats, Error> {
        let items = self.list_items(user_id).await?;
        let today = Utc::now().date_naive();
        Ok(PantryStats::from_items(&items, today, EXPIRING_SOON_DAYS))
    }

    async fn expiring(
        &self,
        user_id: &UserId,
        within_days: u32,
    ) -> Result<Vec<PantryItem>, Error> {
        let today = Utc::now().date_naive();
        let horizon = today + Duration::days(i64::from(within_days));
        self.items
            .expiring_within(user_id, today, horizon)
            .await
            .map_err(Self::map_repository_error)
    }

    async fn cleanup(&self, user_id: &UserId) -> Result<u64, Error> {
        let today = Utc::now().date_naive();
        let removed = self
            .items
            .delete_expired(user_id, today)
            .await
            .map_err(Self::map_repository_error)?;
        if removed > 0 {
            info!(user_id = %user_id, removed, "pantry cleanup removed expired items");
        }
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::ports::MockPantryRepository;
    use crate::domain::ErrorCode;
    use chrono::NaiveDate;
    use rstest::rstest;

    fn service(items: MockPantryRepository) -> PantryTrackerService<MockPantryRepository> {
        PantryTrackerService::new(Arc::new(items))
    }

    fn draft(name: &str, quantity: f64) -> PantryItemDraft {
        PantryItemDraft {
            name: name.into(),
            quantity,
            unit: None,
            category: Some("dairy".into()),
            expires_on: NaiveDate::from_ymd_opt(2030, 1, 1),
        }
    }

    #[tokio::test]
    async fn add_item_stores_validated_draft() {
        let user_id = UserId::random();
        let mut items = MockPantryRepository::new();
        items
            .expect_insert()
            .withf(move |item: &PantryItem| item.user_id == user_id && item.name == "milk")
            .times(1)
            .return_once(|_| Ok(()));

        let item = service(items)
            .add_item(&user_id, draft("milk", 1.0))
            .await
            .expect("add succeeds");

        assert_eq!(item.category.as_deref(), Some("dairy"));
    }

    #[rstest]
    #[case::blank_name("  ", 1.0)]
    #[case::zero_quantity("milk", 0.0)]
    #[tokio::test]
    async fn add_item_rejects_invalid_drafts(#[case] name: &str, #[case] quantity: f64) {
        let mut items = MockPantryRepository::new();
        items.expect_insert().times(0);

        let err = service(items)
            .add_item(&UserId::random(), draft(name, quantity))
            .await
            .expect_err("invalid draft");

        assert_eq!(err.code(), ErrorCode::Validation);
    }

    #[tokio::test]
    async fn update_item_preserves_identity_and_added_at() {
        let user_id = UserId::random();
        let existing = draft("milk", 1.0).into_item(user_id, Utc::now());
        let existing_id = existing.id;
        let added_at = existing.added_at;
        let mut items = MockPantryRepository::new();
        items
            .expect_find()
            .times(1)
            .return_once(move |_, _| Ok(Some(existing)));
        items
            .expect_update()
            .withf(move |item: &PantryItem| {
                item.id == existing_id && item.added_at == added_at && item.quantity > 1.9
            })
            .times(1)
            .return_once(|_| Ok(true));

        let updated = service(items)
            .update_item(&user_id, existing_id, draft("milk", 2.0))
            .await
            .expect("update succeeds");

        assert_eq!(updated.id, existing_id);
    }

    #[tokio::test]
    async fn missing_item_surfaces_not_found() {
        let mut items = MockPantryRepository::new();
        items.expect_find().times(1).return_once(|_, _| Ok(None));

        let err = service(items)
            .get_item(&UserId::random(), Uuid::new_v4())
            .await
            .expect_err("absent item");

        assert_eq!(err.code(), ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn cleanup_returns_removed_count() {
        let mut items = MockPantryRepository::new();
        items
            .expect_delete_expired()
            .times(1)
            .return_once(|_, _| Ok(3));

        let removed = service(items)
            .cleanup(&UserId::random())
            .await
            .expect("cleanup succeeds");

        assert_eq!(removed, 3);
    }

    #[tokio::test]
    async fn expiring_queries_the_requested_window() {
        let mut items = MockPantryRepository::new();
        items
            .expect_expiring_within()
            .withf(|_, from, until| (*until - *from).num_days() == 7)
            .times(1)
            .return_once(|_, _, _| Ok(Vec::new()));

        let result = service(items)
            .expiring(&UserId::random(), 7)
            .await
            .expect("query succeeds");

        assert!(result.is_empty());
    }
}
