//! Field-level diffing for the change ledger.
//!
//! The ledger records one entry per changed field, addressed by a dotted
//! path such as `dietary.restrictions`. Diffing happens on the serialised
//! JSON form so the ledger stays stable across struct refactors.

use serde_json::{Map, Value};

use super::ProfileSection;

/// A single changed field between two section states.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldChange {
    /// Dotted path, e.g. `budget.weeklyAmount`.
    pub path: String,
    /// Value before the update; `None` when the field was absent.
    pub old: Option<Value>,
    /// Value after the update; `None` when the field was removed.
    pub new: Option<Value>,
}

fn as_object(value: &Value) -> Map<String, Value> {
    value.as_object().cloned().unwrap_or_default()
}

/// Compute the changed fields between the old and new state of one section.
///
/// Keys present in either state are compared; unchanged fields produce no
/// entry, so re-applying an identical patch yields an empty diff.
pub fn changed_fields(
    section: ProfileSection,
    old: Option<&Value>,
    new: &Value,
) -> Vec<FieldChange> {
    let old_map = old.map(as_object).unwrap_or_default();
    let new_map = as_object(new);

    let mut keys: Vec<&String> = old_map.keys().chain(new_map.keys()).collect();
    keys.sort();
    keys.dedup();

    keys.into_iter()
        .filter_map(|key| {
            let old_value = old_map.get(key);
            let new_value = new_map.get(key);
            if old_value == new_value {
                return None;
            }
            Some(FieldChange {
                path: format!("{section}.{key}"),
                old: old_value.cloned(),
                new: new_value.cloned(),
            })
        })
        .collect()
}
