//! Password policy and credential hashing.
//!
//! Plaintext passwords travel as [`SecretString`] so they are never
//! Debug-printed or logged. Hashes are argon2id PHC strings with an embedded
//! random salt; nothing recoverable is stored.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, SaltString};
use argon2::{Argon2, PasswordHasher, PasswordVerifier};
use secrecy::{ExposeSecret, SecretString};

/// Minimum allowed password length.
pub const PASSWORD_MIN_LEN: usize = 8;

/// Policy violations detected before any hashing takes place.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PasswordPolicyError {
    #[error("password must be at least {min} characters")]
    TooShort { min: usize },
    #[error("password must contain an uppercase letter")]
    MissingUppercase,
    #[error("password must contain a digit")]
    MissingDigit,
}

impl PasswordPolicyError {
    /// Machine-readable code used in error details.
    pub fn code(&self) -> &'static str {
        match self {
            Self::TooShort { .. } => "password_too_short",
            Self::MissingUppercase => "password_missing_uppercase",
            Self::MissingDigit => "password_missing_digit",
        }
    }
}

/// Check a candidate password against the account policy.
///
/// # Examples
/// ```
/// use foodi_backend::domain::password::validate_policy;
/// use secrecy::SecretString;
///
/// assert!(validate_policy(&SecretString::from("SecurePass123".to_owned())).is_ok());
/// assert!(validate_policy(&SecretString::from("short".to_owned())).is_err());
/// ```
pub fn validate_policy(password: &SecretString) -> Result<(), PasswordPolicyError> {
    let raw = password.expose_secret();
    if raw.chars().count() < PASSWORD_MIN_LEN {
        return Err(PasswordPolicyError::TooShort {
            min: PASSWORD_MIN_LEN,
        });
    }
    if !raw.chars().any(char::is_uppercase) {
        return Err(PasswordPolicyError::MissingUppercase);
    }
    if !raw.chars().any(|c| c.is_ascii_digit()) {
        return Err(PasswordPolicyError::MissingDigit);
    }
    Ok(())
}

/// Failures raised while hashing or verifying credentials.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PasswordHashError {
    #[error("password hashing failed: {message}")]
    Hash { message: String },
    #[error("stored password hash is malformed: {message}")]
    Malformed { message: String },
}

/// Hash a plaintext password into an argon2id PHC string.
pub fn hash_password(password: &SecretString) -> Result<String, PasswordHashError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.expose_secret().as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|err| PasswordHashError::Hash {
            message: err.to_string(),
        })
}

/// Verify a plaintext candidate against a stored PHC string.
///
/// Returns `Ok(false)` on mismatch; errors are reserved for malformed
/// stored hashes.
pub fn verify_password(
    password: &SecretString,
    stored_hash: &str,
) -> Result<bool, PasswordHashError> {
    let parsed = PasswordHash::new(stored_hash).map_err(|err| PasswordHashError::Malformed {
        message: err.to_string(),
    })?;
    Ok(Argon2::default()
        .verify_password(password.expose_secret().as_bytes(), &parsed)
        .is_ok())
}
