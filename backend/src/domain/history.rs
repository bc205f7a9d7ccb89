//! Append-only profile change ledger entries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use super::profile::FieldChange;
use super::UserId;

/// One write-once ledger entry recording a single field change.
///
/// ## Invariants
/// - Records are never mutated or deleted once appended.
/// - Ordering is append order; readers receive entries oldest first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProfileChangeRecord {
    #[schema(value_type = String)]
    pub user_id: UserId,
    /// Dotted field path, e.g. `dietary.restrictions`.
    pub field_path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub old_value: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_value: Option<Value>,
    pub recorded_at: DateTime<Utc>,
}

impl ProfileChangeRecord {
    /// Build a ledger entry from a computed field change.
    pub fn from_change(user_id: UserId, change: FieldChange, recorded_at: DateTime<Utc>) -> Self {
        Self {
            user_id,
            field_path: change.path,
            old_value: change.old,
            new_value: change.new,
            recorded_at,
        }
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    fn record_serializes_to_camel_case() {
        let record = ProfileChangeRecord {
            user_id: UserId::random(),
            field_path: "budget.currency".into(),
            old_value: None,
            new_value: Some(json!("EUR")),
            recorded_at: Utc::now(),
        };

        let value = serde_json::to_value(&record).expect("serialise");
        assert_eq!(value["fieldPath"], "budget.currency");
        assert_eq!(value["newValue"], "EUR");
        assert!(value.get("oldValue").is_none());
    }

    #[rstest]
    fn from_change_carries_path_and_values() {
        let user_id = UserId::random();
        let change = FieldChange {
            path: "dietary.restrictions".into(),
            old: Some(json!([])),
            new: Some(json!(["vegan"])),
        };
        let now = Utc::now();

        let record = ProfileChangeRecord::from_change(user_id, change, now);
        assert_eq!(record.field_path, "dietary.restrictions");
        assert_eq!(record.old_value, Some(json!([])));
        assert_eq!(record.new_value, Some(json!(["vegan"])));
        assert_eq!(record.recorded_at, now);
    }
}
