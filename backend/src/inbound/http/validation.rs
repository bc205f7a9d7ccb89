//! Shared validation helpers for inbound HTTP adapters.

use serde_json::json;

use crate::domain::{Email, Error, UserValidationError, Username};

/// Build a validation error for one field with a machine-readable code.
pub(crate) fn field_error(field: &str, message: impl Into<String>, code: &str) -> Error {
    Error::validation(message).with_details(json!({
        "field": field,
        "code": code,
    }))
}

pub(crate) fn missing_field_error(field: &str) -> Error {
    field_error(field, format!("missing required field: {field}"), "missing_field")
}

fn user_validation_code(error: &UserValidationError) -> &'static str {
    match error {
        UserValidationError::EmptyEmail => "empty_email",
        UserValidationError::InvalidEmail => "invalid_email",
        UserValidationError::EmptyUsername => "empty_username",
        UserValidationError::UsernameTooShort { .. } => "username_too_short",
        UserValidationError::UsernameTooLong { .. } => "username_too_long",
        UserValidationError::UsernameInvalidCharacters => "username_invalid_characters",
    }
}

/// Parse and validate an email field.
pub(crate) fn parse_email(raw: String) -> Result<Email, Error> {
    Email::new(raw).map_err(|err| field_error("email", err.to_string(), user_validation_code(&err)))
}

/// Parse and validate a username field.
pub(crate) fn parse_username(raw: String) -> Result<Username, Error> {
    Username::new(raw)
        .map_err(|err| field_error("username", err.to_string(), user_validation_code(&err)))
}
