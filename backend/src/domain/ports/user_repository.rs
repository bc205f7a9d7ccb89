//! Port for the relational identity store.
//!
//! The [`UserRepository`] trait is the only path to user rows. Uniqueness of
//! email and username is enforced by the store; adapters surface violations
//! as the dedicated duplicate variants so the service can map them to the
//! conflict vocabulary without string matching.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{Email, User, UserId};

/// Errors raised by identity store adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserRepositoryError {
    /// Store connection could not be established.
    #[error("identity store connection failed: {message}")]
    Connection { message: String },
    /// Query or mutation failed during execution.
    #[error("identity store query failed: {message}")]
    Query { message: String },
    /// The email column's unique constraint was violated.
    #[error("an account with this email already exists")]
    DuplicateEmail,
    /// The username column's unique constraint was violated.
    #[error("this username is already taken")]
    DuplicateUsername,
}

impl UserRepositoryError {
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

/// A user row to insert, with credential material kept out of [`User`].
#[derive(Debug, Clone, PartialEq)]
pub struct NewUserRecord {
    pub user: User,
    /// Argon2id PHC string; absent for social accounts.
    pub password_hash: Option<String>,
    /// SHA-256 digest of the outstanding verification token.
    pub verification_token_digest: Option<String>,
    pub verification_sent_at: Option<DateTime<Utc>>,
}

/// The credential view used by login.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredCredentials {
    pub user: User,
    pub password_hash: Option<String>,
}

/// Port for user identity storage and retrieval.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new user row.
    ///
    /// Fails with the duplicate variants when email or username collide.
    async fn insert(&self, record: &NewUserRecord) -> Result<(), UserRepositoryError>;

    /// Fetch a user by id.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserRepositoryError>;

    /// Fetch a user by email.
    async fn find_by_email(&self, email: &Email) -> Result<Option<User>, UserRepositoryError>;

    /// Fetch the credential view for login.
    async fn credentials_by_email(
        &self,
        email: &Email,
    ) -> Result<Option<StoredCredentials>, UserRepositoryError>;

    /// Look up the account holding an outstanding verification token digest.
    ///
    /// Returns the user together with the token issue timestamp.
    async fn find_by_verification_digest(
        &self,
        digest: &str,
    ) -> Result<Option<(User, DateTime<Utc>)>, UserRepositoryError>;

    /// Mark an account's email verified and clear the outstanding token.
    async fn mark_verified(&self, id: &UserId) -> Result<(), UserRepositoryError>;

    /// Replace the optional name fields.
    async fn update_names(
        &self,
        id: &UserId,
        first_name: Option<String>,
        last_name: Option<String>,
    ) -> Result<(), UserRepositoryError>;
}

/// Fixture implementation for wiring tests without a real database.
///
/// Lookups return `None` and mutations are discarded.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureUserRepository;

#[async_trait]
impl UserRepository for FixtureUserRepository {
    async fn insert(&self, _record: &NewUserRecord) -> Result<(), UserRepositoryError> {
        Ok(())
    }

    async fn find_by_id(&self, _id: &UserId) -> Result<Option<User>, UserRepositoryError> {
        Ok(None)
    }

    async fn find_by_email(&self, _email: &Email) -> Result<Option<User>, UserRepositoryError> {
        Ok(None)
    }

    async fn credentials_by_email(
        &self,
        _email: &Email,
    ) -> Result<Option<StoredCredentials>, UserRepositoryError> {
        Ok(None)
    }

    async fn find_by_verification_digest(
        &self,
        _digest: &str,
    ) -> Result<Option<(User, DateTime<Utc>)>, UserRepositoryError> {
        Ok(None)
    }

    async fn mark_verified(&self, _id: &UserId) -> Result<(), UserRepositoryError> {
        Ok(())
    }

    async fn update_names(
        &self,
        _id: &UserId,
        _first_name: Option<String>,
        _last_name: Option<String>,
    ) -> Result<(), UserRepositoryError> {
        Ok(())
    }
}
