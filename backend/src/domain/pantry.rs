//! Pantry items and derived statistics.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::UserId;

/// Default window, in days, for the "expiring soon" statistic.
pub const EXPIRING_SOON_DAYS: u32 = 3;

/// One tracked pantry item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PantryItem {
    pub id: Uuid,
    #[schema(value_type = String)]
    pub user_id: UserId,
    pub name: String,
    pub quantity: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_on: Option<NaiveDate>,
    pub added_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PantryItem {
    /// Whether the item has expired as of the given date.
    pub fn is_expired(&self, today: NaiveDate) -> bool {
        self.expires_on.is_some_and(|date| date < today)
    }
}

/// User-submitted fields for creating or replacing a pantry item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PantryItemDraft {
    pub name: String,
    pub quantity: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_on: Option<NaiveDate>,
}

/// Validation failures for pantry drafts.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PantryValidationError {
    #[error("item name must not be empty")]
    EmptyName,
    #[error("quantity must be greater than zero (got {value})")]
    NonPositiveQuantity { value: f64 },
}

impl PantryValidationError {
    /// Machine-readable code used in error details.
    pub fn code(&self) -> &'static str {
        match self {
            Self::EmptyName => "empty_name",
            Self::NonPositiveQuantity { .. } => "non_positive_quantity",
        }
    }
}

impl PantryItemDraft {
    /// Validate user-submitted fields before they reach the store.
    pub fn validate(&self) -> Result<(), PantryValidationError> {
        if self.name.trim().is_empty() {
            return Err(PantryValidationError::EmptyName);
        }
        if self.quantity <= 0.0 {
            return Err(PantryValidationError::NonPositiveQuantity {
                value: self.quantity,
            });
        }
        Ok(())
    }

    /// Materialise a new item owned by the given user.
    pub fn into_item(self, user_id: UserId, now: DateTime<Utc>) -> PantryItem {
        PantryItem {
            id: Uuid::new_v4(),
            user_id,
            name: self.name,
            quantity: self.quantity,
            unit: self.unit,
            category: self.category,
            expires_on: self.expires_on,
            added_at: now,
            updated_at: now,
        }
    }
}

/// Item count for one category label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategoryCount {
    pub category: String,
    pub count: u64,
}

/// Aggregate pantry statistics for one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PantryStats {
    pub total_items: u64,
    /// Items expiring inside the [`EXPIRING_SOON_DAYS`] window.
    pub expiring_soon: u64,
    pub by_category: Vec<CategoryCount>,
}

impl PantryStats {
    /// Compute statistics from a user's items.
    ///
    /// Category counts are sorted by label so output is deterministic.
    pub fn from_items(items: &[PantryItem], today: NaiveDate, soon_days: u32) -> Self {
        let horizon = today + chrono::Duration::days(i64::from(soon_days));
        let expiring_soon = items
            .iter()
            .filter(|item| {
                item.expires_on
                    .is_some_and(|date| date >= today && date <= horizon)
            })
            .count() as u64;

        let mut counts = std::collections::BTreeMap::<String, u64>::new();
        for item in items {
            let label = item
                .category
                .clone()
                .unwrap_or_else(|| "uncategorised".to_owned());
            *counts.entry(label).or_default() += 1;
        }

        Self {
            total_items: items.len() as u64,
            expiring_soon,
            by_category: counts
                .into_iter()
                .map(|(category, count)| CategoryCount { category, count })
                .collect(),
        }
    }
}
