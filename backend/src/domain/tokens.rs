//! Session and verification tokens.
//!
//! Session tokens are signed HS256 JWTs carrying the user id and an expiry;
//! checking validity performs no I/O. Email verification tokens are random
//! bytes sent to the user in hex form and persisted only as a SHA-256
//! digest, so a leaked identity store never reveals a usable token.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use rand::RngCore;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use super::UserId;

/// Hours a verification token stays redeemable after issue.
pub const VERIFICATION_TOKEN_TTL_HOURS: i64 = 24;

/// Failures raised while issuing or checking session tokens.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    #[error("failed to sign session token: {message}")]
    Encode { message: String },
    #[error("session token has expired")]
    Expired,
    #[error("session token is invalid")]
    Invalid,
}

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: Uuid,
    iat: i64,
    exp: i64,
}

/// A freshly issued bearer token and its expiry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Signer/verifier for stateless session tokens.
#[derive(Clone)]
pub struct SessionTokens {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl_minutes: i64,
}

impl SessionTokens {
    /// Build a signer from the shared secret and token lifetime.
    pub fn new(secret: &SecretString, ttl_minutes: i64) -> Self {
        let bytes = secret.expose_secret().as_bytes();
        Self {
            encoding: EncodingKey::from_secret(bytes),
            decoding: DecodingKey::from_secret(bytes),
            ttl_minutes,
        }
    }

    /// Issue a signed token for the given user.
    pub fn issue(&self, user_id: &UserId) -> Result<IssuedToken, TokenError> {
        let now = Utc::now();
        let expires_at = now + Duration::minutes(self.ttl_minutes);
        let claims = Claims {
            sub: *user_id.as_uuid(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding).map_err(
            |err| TokenError::Encode {
                message: err.to_string(),
            },
        )?;
        Ok(IssuedToken { token, expires_at })
    }

    /// Check a presented token and return the user it belongs to.
    ///
    /// Side-effect free: expiry is enforced from the embedded claim only.
    pub fn verify(&self, token: &str) -> Result<UserId, TokenError> {
        let validation = Validation::new(Algorithm::HS256);
        let data = decode::<Claims>(token, &self.decoding, &validation).map_err(|err| {
            match err.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Invalid,
            }
        })?;
        Ok(UserId::from_uuid(data.claims.sub))
    }
}

/// A newly generated email verification token.
///
/// `plaintext` goes into the outbound email; only `digest` may be stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationToken {
    pub plaintext: String,
    pub digest: String,
}

impl VerificationToken {
    /// Generate a fresh 32-byte token.
    pub fn generate() -> Self {
        let mut bytes = [0_u8; 32];
        rand::rngs::OsRng.fill_bytes(&mut bytes);
        let plaintext = hex::encode(bytes);
        let digest = Self::digest_of(&plaintext);
        Self { plaintext, digest }
    }

    /// SHA-256 hex digest of a presented token.
    pub fn digest_of(presented: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(presented.as_bytes());
        hex::encode(hasher.finalize())
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    fn signer(ttl_minutes: i64) -> SessionTokens {
        SessionTokens::new(
            &SecretString::from("test-secret-key-for-tokens".to_owned()),
            ttl_minutes,
        )
    }

    #[rstest]
    fn issued_token_verifies_to_same_user() {
        let tokens = signer(60);
        let user_id = UserId::random();

        let issued = tokens.issue(&user_id).expect("issue succeeds");
        let verified = tokens.verify(&issued.token).expect("verify succeeds");

        assert_eq!(verified, user_id);
        assert!(issued.expires_at > Utc::now());
    }

    #[rstest]
    fn expired_token_is_rejected() {
        let tokens = signer(-5);
        let user_id = UserId::random();

        let issued = tokens.issue(&user_id).expect("issue succeeds");
        assert_eq!(tokens.verify(&issued.token), Err(TokenError::Expired));
    }

    #[rstest]
    #[case::garbage("not-a-token")]
    #[case::empty("")]
    fn malformed_tokens_are_invalid(#[case] raw: &str) {
        assert_eq!(signer(60).verify(raw), Err(TokenError::Invalid));
    }

    #[rstest]
    fn tokens_signed_with_other_secret_are_invalid() {
        let issued = signer(60).issue(&UserId::random()).expect("issue");
        let other = SessionTokens::new(&SecretString::from("different-secret".to_owned()), 60);
        assert_eq!(other.verify(&issued.token), Err(TokenError::Invalid));
    }

    #[rstest]
    fn verification_token_digest_matches_plaintext() {
        let token = VerificationToken::generate();

        assert_eq!(token.plaintext.len(), 64);
        assert_eq!(VerificationToken::digest_of(&token.plaintext), token.digest);
        assert_ne!(token.plaintext, token.digest);
    }

    #[rstest]
    fn verification_tokens_are_unique() {
        let first = VerificationToken::generate();
        let second = VerificationToken::generate();
        assert_ne!(first.plaintext, second.plaintext);
    }
}
