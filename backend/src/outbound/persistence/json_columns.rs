//! Helpers for JSONB columns holding typed domain values.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

/// Serialise a domain value into a JSONB column value.
pub(super) fn to_json<T: Serialize>(value: &T) -> Result<Value, String> {
    serde_json::to_value(value).map_err(|err| format!("JSON column encode failed: {err}"))
}

/// Decode a JSONB column value back into a domain value.
pub(super) fn from_json<T: DeserializeOwned>(value: Value) -> Result<T, String> {
    serde_json::from_value(value).map_err(|err| format!("JSON column decode failed: {err}"))
}

/// Decode an optional JSONB column.
pub(super) fn from_json_opt<T: DeserializeOwned>(value: Option<Value>) -> Result<Option<T>, String> {
    value.map(from_json).transpose()
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::recipes::Ingredient;

    #[test]
    fn ingredient_lists_round_trip() {
        let ingredients = vec![Ingredient {
            name: "lentils".into(),
            quantity: 200.0,
            unit: Some("g".into()),
        }];

        let encoded = to_json(&ingredients).expect("encode");
        let decoded: Vec<Ingredient> = from_json(encoded).expect("decode");
        assert_eq!(decoded, ingredients);
    }

    #[test]
    fn malformed_column_values_are_reported() {
        let result: Result<Vec<Ingredient>, String> = from_json(serde_json::json!("not-a-list"));
        assert!(result.is_err());
    }
}
