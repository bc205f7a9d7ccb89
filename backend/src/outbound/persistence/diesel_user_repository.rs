//! PostgreSQL-backed `UserRepository` implementation using Diesel.
//!
//! Uniqueness of email and username is enforced by database constraints;
//! violations are mapped to the port's duplicate variants by constraint
//! name so the service never string-matches error text.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::debug;

use crate::domain::ports::{
    NewUserRecord, StoredCredentials, UserRepository, UserRepositoryError,
};
use crate::domain::{Email, User, UserId, Username};

use super::models::{NewUserRow, UserRow};
use super::pool::{DbPool, PoolError};
use super::schema::users;

/// Diesel-backed implementation of the `UserRepository` port.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> UserRepositoryError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            UserRepositoryError::connection(message)
        }
    }
}

fn map_diesel_error(error: diesel::result::Error) -> UserRepositoryError {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match &error {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
            let constraint = info.constraint_name().unwrap_or_default();
            debug!(constraint, "unique violation on users table");
            if constraint.contains("email") {
                return UserRepositoryError::DuplicateEmail;
            }
            if constraint.contains("username") {
                return UserRepositoryError::DuplicateUsername;
            }
            UserRepositoryError::query("unique constraint violation")
        }
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            UserRepositoryError::connection("database connection error")
        }
        _ => {
            debug!(error = %error, "diesel operation failed");
            UserRepositoryError::query("database error")
        }
    }
}

fn row_to_user(row: &UserRow) -> Result<User, UserRepositoryError> {
    let email = Email::new(&row.email)
        .map_err(|err| UserRepositoryError::query(format!("stored email invalid: {err}")))?;
    let username = Username::new(&row.username)
        .map_err(|err| UserRepositoryError::query(format!("stored username invalid: {err}")))?;

    Ok(User::builder(UserId::from_uuid(row.id), email, username)
        .names(row.first_name.clone(), row.last_name.clone())
        .email_verified(row.email_verified)
        .is_active(row.is_active)
        .timestamps(row.created_at, row.updated_at)
        .build())
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn insert(&self, record: &NewUserRecord) -> Result<(), UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let user = &record.user;
        let row = NewUserRow {
            id: *user.id().as_uuid(),
            email: user.email().as_ref(),
            username: user.username().as_ref(),
            password_hash: record.password_hash.as_deref(),
            first_name: user.first_name(),
            last_name: user.last_name(),
            email_verified: user.email_verified(),
            verification_token_digest: record.verification_token_digest.as_deref(),
            verification_sent_at: record.verification_sent_at,
            is_active: user.is_active(),
        };

        diesel::insert_into(users::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<UserRow> = users::table
            .filter(users::id.eq(id.as_uuid()))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.as_ref().map(row_to_user).transpose()
    }

    async fn find_by_email(&self, email: &Email) -> Result<Option<User>, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<UserRow> = users::table
            .filter(users::email.eq(email.as_ref()))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.as_ref().map(row_to_user).transpose()
    }

    async fn credentials_by_email(
        &self,
        email: &Email,
    ) -> Result<Option<StoredCredentials>, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<UserRow> = users::table
            .filter(users::email.eq(email.as_ref()))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(|row| {
            Ok(StoredCredentials {
                user: row_to_user(&row)?,
                password_hash: row.password_hash,
            })
        })
        .transpose()
    }

    async fn find_by_verification_digest(
        &self,
        digest: &str,
    ) -> Result<Option<(User, DateTime<Utc>)>, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<UserRow> = users::table
            .filter(users::verification_token_digest.eq(digest))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(|row| {
            let user = row_to_user(&row)?;
            let sent_at = row.verification_sent_at.unwrap_or(row.created_at);
            Ok((user, sent_at))
        })
        .transpose()
    }

    async fn mark_verified(&self, id: &UserId) -> Result<(), UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::update(users::table.filter(users::id.eq(id.as_uuid())))
            .set((
                users::email_verified.eq(true),
                users::verification_token_digest.eq(None::<String>),
                users::verification_sent_at.eq(None::<DateTime<Utc>>),
                users::updated_at.eq(Utc::now()),
            ))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn update_names(
        &self,
        id: &UserId,
        first_name: Option<String>,
        last_name: Option<String>,
    ) -> Result<(), UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::update(users::table.filter(users::id.eq(id.as_uuid())))
            .set((
                users::first_name.eq(first_name),
                users::last_name.eq(last_name),
                users::updated_at.eq(Utc::now()),
            ))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn pool_errors_map_to_connection_errors() {
        let err = map_pool_error(PoolError::checkout("connection refused"));
        assert!(matches!(err, UserRepositoryError::Connection { .. }));
        assert!(err.to_string().contains("connection refused"));
    }

    #[rstest]
    fn not_found_maps_to_query_error() {
        let err = map_diesel_error(diesel::result::Error::NotFound);
        assert!(matches!(err, UserRepositoryError::Query { .. }));
    }

    #[rstest]
    fn row_to_user_preserves_flags() {
        let now = Utc::now();
        let row = UserRow {
            id: uuid::Uuid::new_v4(),
            email: "john@example.com".into(),
            username: "johndoe".into(),
            password_hash: Some("$argon2id$...".into()),
            first_name: Some("John".into()),
            last_name: None,
            email_verified: true,
            verification_token_digest: None,
            verification_sent_at: None,
            is_active: false,
            created_at: now,
            updated_at: now,
        };

        let user = row_to_user(&row).expect("valid row");
        assert!(user.email_verified());
        assert!(!user.is_active());
        assert_eq!(user.first_name(), Some("John"));
    }

    #[rstest]
    fn malformed_stored_email_is_a_query_error() {
        let now = Utc::now();
        let row = UserRow {
            id: uuid::Uuid::new_v4(),
            email: "not-an-email".into(),
            username: "johndoe".into(),
            password_hash: None,
            first_name: None,
            last_name: None,
            email_verified: false,
            verification_token_digest: None,
            verification_sent_at: None,
            is_active: true,
            created_at: now,
            updated_at: now,
        };

        assert!(row_to_user(&row).is_err());
    }
}
