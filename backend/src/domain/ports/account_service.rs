//! Driving port for account registration, authentication, and verification.
//!
//! Inbound adapters call this port without knowing the backing
//! infrastructure, which keeps HTTP handler tests deterministic.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use secrecy::SecretString;

use crate::domain::{Email, Error, User, Username};

/// Payload for creating a new account.
#[derive(Debug, Clone)]
pub struct RegisterRequest {
    pub email: Email,
    pub username: Username,
    pub password: SecretString,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

/// Payload for provisioning or signing in through a social provider.
///
/// The provider access token is trusted as upstream-verified; this service
/// only provisions or loads the matching account.
#[derive(Debug, Clone)]
pub struct SocialLoginRequest {
    pub provider: String,
    pub access_token: SecretString,
    pub email: Email,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

/// A signed-in account: the user plus a fresh bearer token.
#[derive(Debug, Clone)]
pub struct AuthenticatedAccount {
    pub user: User,
    pub token: String,
    pub token_expires_at: DateTime<Utc>,
}

/// Domain use-case port for account lifecycle operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountService: Send + Sync {
    /// Create an account and return a session.
    ///
    /// Validation precedes any store mutation; uniqueness violations map to
    /// `UserAlreadyExistsError`.
    async fn register(&self, request: RegisterRequest) -> Result<AuthenticatedAccount, Error>;

    /// Authenticate with email and password.
    ///
    /// The error shape is identical whether the email is unknown or the
    /// password wrong.
    async fn login(
        &self,
        email: Email,
        password: SecretString,
    ) -> Result<AuthenticatedAccount, Error>;

    /// Sign in (provisioning on first sight) through a social provider.
    async fn social_login(
        &self,
        request: SocialLoginRequest,
    ) -> Result<AuthenticatedAccount, Error>;

    /// Redeem an email verification token.
    ///
    /// Idempotent: already-verified accounts succeed as a no-op.
    async fn verify_email(&self, token: &str) -> Result<(), Error>;
}

/// Fixture implementation that refuses every operation.
///
/// Useful for wiring tests of endpoints that never reach the account port.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureAccountService;

#[async_trait]
impl AccountService for FixtureAccountService {
    async fn register(&self, _request: RegisterRequest) -> Result<AuthenticatedAccount, Error> {
        Err(Error::internal("account service not configured"))
    }

    async fn login(
        &self,
        _email: Email,
        _password: SecretString,
    ) -> Result<AuthenticatedAccount, Error> {
        Err(Error::authentication("invalid email or password"))
    }

    async fn social_login(
        &self,
        _request: SocialLoginRequest,
    ) -> Result<AuthenticatedAccount, Error> {
        Err(Error::internal("account service not configured"))
    }

    async fn verify_email(&self, _token: &str) -> Result<(), Error> {
        Err(Error::invalid_token("verification token is not recognised"))
    }
}
