//! Account lifecycle domain service.
//!
//! Implements the [`AccountService`] driving port over the identity store,
//! the verification mailer, and the session token signer. All validation
//! happens before any store mutation; the only best-effort step is the
//! verification email, which is logged and never fails registration.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use secrecy::SecretString;
use serde_json::json;
use tracing::{info, warn};

use crate::domain::ports::{
    AccountService, AuthenticatedAccount, NewUserRecord, RegisterRequest, SocialLoginRequest,
    StoredCredentials, UserRepository, UserRepositoryError, VerificationMailer,
};
use crate::domain::password::{self, PasswordPolicyError};
use crate::domain::tokens::VERIFICATION_TOKEN_TTL_HOURS;
use crate::domain::{
    Email, Error, SessionTokens, User, UserId, Username, VerificationToken,
};

/// Account service wired to an identity store and a mailer.
#[derive(Clone)]
pub struct IdentityService<R, M> {
    users: Arc<R>,
    mailer: Arc<M>,
    tokens: SessionTokens,
}

impl<R, M> IdentityService<R, M> {
    /// Create a new service with the given collaborators.
    pub fn new(users: Arc<R>, mailer: Arc<M>, tokens: SessionTokens) -> Self {
        Self {
            users,
            mailer,
            tokens,
        }
    }
}

impl<R, M> IdentityService<R, M>
where
    R: UserRepository,
    M: VerificationMailer,
{
    fn map_repository_error(error: UserRepositoryError) -> Error {
        match error {
            UserRepositoryError::DuplicateEmail => {
                Error::user_already_exists("an account with this email already exists")
                    .with_details(json!({ "field": "email", "code": "duplicate_email" }))
            }
            UserRepositoryError::DuplicateUsername => {
                Error::user_already_exists("this username is already taken")
                    .with_details(json!({ "field": "username", "code": "duplicate_username" }))
            }
            UserRepositoryError::Connection { .. } | UserRepositoryError::Query { .. } => {
                Error::persistence(format!("identity store failure: {error}"))
            }
        }
    }

    fn map_policy_error(error: PasswordPolicyError) -> Error {
        Error::validation(error.to_string())
            .with_details(json!({ "field": "password", "code": error.code() }))
    }

    /// Identical error shape for unknown email, wrong password, and
    /// deactivated or password-less accounts.
    fn invalid_credentials() -> Error {
        Error::authentication("invalid email or password")
    }

    /// Derive a unique-enough handle from the email local part.
    fn derive_username(email: &Email) -> Result<Username, Error> {
        let base: String = email
            .local_part()
            .chars()
            .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
            .take(24)
            .collect();
        let base = if base.chars().count() < 3 {
            "user".to_owned()
        } else {
            base
        };
        let suffix = rand::random::<u32>() & 0x00ff_ffff;
        Username::new(format!("{base}_{suffix:06x}"))
            .map_err(|err| Error::internal(format!("derived username invalid: {err}")))
    }

    fn session(&self, user: User) -> Result<AuthenticatedAccount, Error> {
        let issued = self
            .tokens
            .issue(user.id())
            .map_err(|err| Error::internal(format!("session token issue failed: {err}")))?;
        Ok(AuthenticatedAccount {
            user,
            token: issued.token,
            token_expires_at: issued.expires_at,
        })
    }
}

#[async_trait]
impl<R, M> AccountService for IdentityService<R, M>
where
    R: UserRepository,
    M: VerificationMailer,
{
    async fn register(&self, request: RegisterRequest) -> Result<AuthenticatedAccount, Error> {
        password::validate_policy(&request.password).map_err(Self::map_policy_error)?;
        let password_hash = password::hash_password(&request.password)
            .map_err(|err| Error::internal(format!("password hashing failed: {err}")))?;

        let verification = VerificationToken::generate();
        let now = Utc::now();
        let user = User::builder(UserId::random(), request.email, request.username)
            .names(request.first_name, request.last_name)
            .timestamps(now, now)
            .build();

        let record = NewUserRecord {
            user: user.clone(),
            password_hash: Some(password_hash),
            verification_token_digest: Some(verification.digest.clone()),
            verification_sent_at: Some(now),
        };
        self.users
            .insert(&record)
            .await
            .map_err(Self::map_repository_error)?;

        // Best-effort: the account exists regardless of delivery.
        if let Err(err) = self
            .mailer
            .send_verification(user.email(), &verification.plaintext)
            .await
        {
            warn!(user_id = %user.id(), error = %err, "verification email dispatch failed");
        }

        self.session(user)
    }

    async fn login(
        &self,
        email: Email,
        password: SecretString,
    ) -> Result<AuthenticatedAccount, Error> {
        let credentials = self
            .users
            .credentials_by_email(&email)
            .await
            .map_err(Self::map_repository_error)?;

        let Some(StoredCredentials {
            user,
            password_hash,
        }) = credentials
        else {
            return Err(Self::invalid_credentials());
        };
        if !user.is_active() {
            return Err(Self::invalid_credentials());
        }
        let Some(stored_hash) = password_hash else {
            // Social accounts carry no password; do not reveal that.
            return Err(Self::invalid_credentials());
        };

        let matches = password::verify_password(&password, &stored_hash)
            .map_err(|err| Error::internal(format!("stored credentials unreadable: {err}")))?;
        if !matches {
            return Err(Self::invalid_credentials());
        }

        self.session(user)
    }

    async fn social_login(
        &self,
        request: SocialLoginRequest,
    ) -> Result<AuthenticatedAccount, Error> {
        if let Some(user) = self
            .users
            .find_by_email(&request.email)
            .await
            .map_err(Self::map_repository_error)?
        {
            if !user.is_active() {
                return Err(Self::invalid_credentials());
            }
            return self.session(user);
        }

        let username = Self::derive_username(&request.email)?;
        let now = Utc::now();
        let user = User::builder(UserId::random(), request.email, username)
            .names(request.first_name, request.last_name)
            .email_verified(true)
            .timestamps(now, now)
            .build();

        let record = NewUserRecord {
            user: user.clone(),
            password_hash: None,
            verification_token_digest: None,
            verification_sent_at: None,
        };
        self.users
            .insert(&record)
            .await
            .map_err(Self::map_repository_error)?;
        info!(user_id = %user.id(), provider = %request.provider, "provisioned social account");

        self.session(user)
    }

    async fn verify_email(&self, token: &str) -> Result<(), Error> {
        let digest = VerificationToken::digest_of(token);
        let found = self
            .users
            .find_by_verification_digest(&digest)
            .await
            .map_err(Self::map_repository_error)?;

        let Some((user, sent_at)) = found else {
            return Err(Error::invalid_token("verification token is not recognised"));
        };
        if user.email_verified() {
            // Idempotent: repeat verification is a no-op success.
            return Ok(());
        }
        if Utc::now() - sent_at > Duration::hours(VERIFICATION_TOKEN_TTL_HOURS) {
            return Err(Error::invalid_token("verification token has expired"));
        }

        self.users
            .mark_verified(user.id())
            .await
            .map_err(Self::map_repository_error)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::ports::{MockUserRepository, MockVerificationMailer};
    use crate::domain::ErrorCode;
    use mockall::predicate::always;
    use rstest::rstest;

    fn tokens() -> SessionTokens {
        SessionTokens::new(&SecretString::from("identity-test-secret".to_owned()), 60)
    }

    fn service(
        users: MockUserRepository,
        mailer: MockVerificationMailer,
    ) -> IdentityService<MockUserRepository, MockVerificationMailer> {
        IdentityService::new(Arc::new(users), Arc::new(mailer), tokens())
    }

    fn register_request(password: &str) -> RegisterRequest {
        RegisterRequest {
            email: Email::new("john@example.com").expect("email"),
            username: Username::new("johndoe").expect("username"),
            password: SecretString::from(password.to_owned()),
            first_name: Some("John".into()),
            last_name: None,
        }
    }

    fn stored_user(email: &str, verified: bool) -> User {
        User::builder(
            UserId::random(),
            Email::new(email).expect("email"),
            Username::new("johndoe").expect("username"),
        )
        .email_verified(verified)
        .build()
    }

    #[tokio::test]
    async fn register_stores_hash_and_digest_never_plaintext() {
        let mut users = MockUserRepository::new();
        users
            .expect_insert()
            .withf(|record: &NewUserRecord| {
                let hash_ok = record
                    .password_hash
                    .as_deref()
                    .is_some_and(|hash| hash.starts_with("$argon2id$") && hash != "SecurePass123");
                let digest_ok = record
                    .verification_token_digest
                    .as_deref()
                    .is_some_and(|digest| digest.len() == 64);
                hash_ok && digest_ok && !record.user.email_verified()
            })
            .times(1)
            .return_once(|_| Ok(()));
        let mut mailer = MockVerificationMailer::new();
        mailer
            .expect_send_verification()
            .times(1)
            .return_once(|_, _| Ok(()));

        let service = service(users, mailer);
        let account = service
            .register(register_request("SecurePass123"))
            .await
            .expect("registration succeeds");

        let verified = tokens().verify(&account.token).expect("token verifies");
        assert_eq!(&verified, account.user.id());
    }

    #[rstest]
    #[case::too_short("Ab1")]
    #[case::no_uppercase("lowercase1")]
    #[case::no_digit("NoDigitsHere")]
    #[tokio::test]
    async fn register_rejects_weak_passwords_before_any_write(#[case] password: &str) {
        let mut users = MockUserRepository::new();
        users.expect_insert().times(0);
        let mut mailer = MockVerificationMailer::new();
        mailer.expect_send_verification().times(0);

        let err = service(users, mailer)
            .register(register_request(password))
            .await
            .expect_err("weak password");

        assert_eq!(err.code(), ErrorCode::Validation);
    }

    #[tokio::test]
    async fn register_maps_duplicate_email_to_conflict() {
        let mut users = MockUserRepository::new();
        users
            .expect_insert()
            .times(1)
            .return_once(|_| Err(UserRepositoryError::DuplicateEmail));
        let mut mailer = MockVerificationMailer::new();
        mailer.expect_send_verification().times(0);

        let err = service(users, mailer)
            .register(register_request("SecurePass123"))
            .await
            .expect_err("duplicate email");

        assert_eq!(err.code(), ErrorCode::UserAlreadyExists);
    }

    #[tokio::test]
    async fn register_succeeds_when_email_dispatch_fails() {
        let mut users = MockUserRepository::new();
        users.expect_insert().times(1).return_once(|_| Ok(()));
        let mut mailer = MockVerificationMailer::new();
        mailer
            .expect_send_verification()
            .times(1)
            .return_once(|_, _| Err(crate::domain::ports::MailerError::send("smtp down")));

        let result = service(users, mailer)
            .register(register_request("SecurePass123"))
            .await;

        assert!(result.is_ok(), "email delivery is best-effort");
    }

    #[tokio::test]
    async fn login_error_shape_is_identical_for_unknown_and_wrong() {
        let mut unknown_users = MockUserRepository::new();
        unknown_users
            .expect_credentials_by_email()
            .times(1)
            .return_once(|_| Ok(None));
        let unknown_err = service(unknown_users, MockVerificationMailer::new())
            .login(
                Email::new("nobody@example.com").expect("email"),
                SecretString::from("SecurePass123".to_owned()),
            )
            .await
            .expect_err("unknown email");

        let hash = password::hash_password(&SecretString::from("OtherPass123".to_owned()))
            .expect("hash");
        let mut wrong_users = MockUserRepository::new();
        wrong_users
            .expect_credentials_by_email()
            .times(1)
            .return_once(move |_| {
                Ok(Some(StoredCredentials {
                    user: stored_user("john@example.com", true),
                    password_hash: Some(hash),
                }))
            });
        let wrong_err = service(wrong_users, MockVerificationMailer::new())
            .login(
                Email::new("john@example.com").expect("email"),
                SecretString::from("SecurePass123".to_owned()),
            )
            .await
            .expect_err("wrong password");

        assert_eq!(unknown_err, wrong_err);
        assert_eq!(unknown_err.code(), ErrorCode::Authentication);
    }

    #[tokio::test]
    async fn login_returns_session_for_valid_credentials() {
        let hash = password::hash_password(&SecretString::from("SecurePass123".to_owned()))
            .expect("hash");
        let user = stored_user("john@example.com", true);
        let expected_id = *user.id();
        let mut users = MockUserRepository::new();
        users
            .expect_credentials_by_email()
            .with(always())
            .times(1)
            .return_once(move |_| {
                Ok(Some(StoredCredentials {
                    user,
                    password_hash: Some(hash),
                }))
            });

        let account = service(users, MockVerificationMailer::new())
            .login(
                Email::new("john@example.com").expect("email"),
                SecretString::from("SecurePass123".to_owned()),
            )
            .await
            .expect("login succeeds");

        assert_eq!(account.user.id(), &expected_id);
        assert!(account.token_expires_at > Utc::now());
    }

    #[tokio::test]
    async fn verify_email_is_idempotent_for_verified_accounts() {
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_verification_digest()
            .times(1)
            .return_once(|_| Ok(Some((stored_user("john@example.com", true), Utc::now()))));
        users.expect_mark_verified().times(0);

        let result = service(users, MockVerificationMailer::new())
            .verify_email("deadbeef")
            .await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn verify_email_rejects_unknown_and_expired_tokens() {
        let mut unknown_users = MockUserRepository::new();
        unknown_users
            .expect_find_by_verification_digest()
            .times(1)
            .return_once(|_| Ok(None));
        let unknown = service(unknown_users, MockVerificationMailer::new())
            .verify_email("deadbeef")
            .await
            .expect_err("unknown token");
        assert_eq!(unknown.code(), ErrorCode::InvalidToken);

        let mut expired_users = MockUserRepository::new();
        expired_users
            .expect_find_by_verification_digest()
            .times(1)
            .return_once(|_| {
                let sent_at = Utc::now() - Duration::hours(VERIFICATION_TOKEN_TTL_HOURS + 1);
                Ok(Some((stored_user("john@example.com", false), sent_at)))
            });
        expired_users.expect_mark_verified().times(0);
        let expired = service(expired_users, MockVerificationMailer::new())
            .verify_email("deadbeef")
            .await
            .expect_err("expired token");
        assert_eq!(expired.code(), ErrorCode::InvalidToken);
    }

    #[tokio::test]
    async fn verify_email_marks_fresh_tokens_verified() {
        let user = stored_user("john@example.com", false);
        let user_id = *user.id();
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_verification_digest()
            .times(1)
            .return_once(move |_| Ok(Some((user, Utc::now()))));
        users
            .expect_mark_verified()
            .withf(move |id: &UserId| id == &user_id)
            .times(1)
            .return_once(|_| Ok(()));

        service(users, MockVerificationMailer::new())
            .verify_email("deadbeef")
            .await
            .expect("verification succeeds");
    }

    #[tokio::test]
    async fn social_login_provisions_verified_account_on_first_sight() {
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_email()
            .times(1)
            .return_once(|_| Ok(None));
        users
            .expect_insert()
            .withf(|record: &NewUserRecord| {
                record.password_hash.is_none() && record.user.email_verified()
            })
            .times(1)
            .return_once(|_| Ok(()));

        let account = service(users, MockVerificationMailer::new())
            .social_login(SocialLoginRequest {
                provider: "google".into(),
                access_token: SecretString::from("upstream-token".to_owned()),
                email: Email::new("jane@example.com").expect("email"),
                first_name: Some("Jane".into()),
                last_name: None,
            })
            .await
            .expect("social login succeeds");

        assert!(account.user.email_verified());
        assert!(account.user.username().as_ref().starts_with("jane_"));
    }

    #[tokio::test]
    async fn social_login_reuses_existing_account() {
        let user = stored_user("john@example.com", true);
        let user_id = *user.id();
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_email()
            .times(1)
            .return_once(move |_| Ok(Some(user)));
        users.expect_insert().times(0);

        let account = service(users, MockVerificationMailer::new())
            .social_login(SocialLoginRequest {
                provider: "google".into(),
                access_token: SecretString::from("upstream-token".to_owned()),
                email: Email::new("john@example.com").expect("email"),
                first_name: None,
                last_name: None,
            })
            .await
            .expect("social login succeeds");

        assert_eq!(account.user.id(), &user_id);
    }
}
