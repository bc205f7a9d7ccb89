//! Redis-backed `PreferenceDocumentRepository` implementation.
//!
//! One JSON document per user under `profile:doc:v1:<user_id>`. Keys are
//! versioned so a schema change can roll out without clobbering old data.

use async_trait::async_trait;
use bb8_redis::redis::AsyncCommands;

use crate::domain::ports::{PreferenceDocumentRepository, PreferenceDocumentRepositoryError};
use crate::domain::{PreferenceDocument, UserId};

use super::redis_pool::{RedisPool, RedisPoolError};

const DOC_KEY_PREFIX: &str = "profile:doc:v1";

/// Redis-backed implementation of the `PreferenceDocumentRepository` port.
#[derive(Clone)]
pub struct RedisPreferenceDocumentRepository {
    pool: RedisPool,
}

impl RedisPreferenceDocumentRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: RedisPool) -> Self {
        Self { pool }
    }

    fn key(user_id: &UserId) -> String {
        format!("{DOC_KEY_PREFIX}:{user_id}")
    }
}

fn map_pool_error(error: RedisPoolError) -> PreferenceDocumentRepositoryError {
    PreferenceDocumentRepositoryError::connection(error.to_string())
}

fn map_redis_error(error: bb8_redis::redis::RedisError) -> PreferenceDocumentRepositoryError {
    PreferenceDocumentRepositoryError::query(error.to_string())
}

#[async_trait]
impl PreferenceDocumentRepository for RedisPreferenceDocumentRepository {
    async fn find(
        &self,
        user_id: &UserId,
    ) -> Result<Option<PreferenceDocument>, PreferenceDocumentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let raw: Option<String> = conn
            .get(Self::key(user_id))
            .await
            .map_err(map_redis_error)?;

        raw.map(|payload| {
            serde_json::from_str(&payload).map_err(|err| {
                PreferenceDocumentRepositoryError::serialization(err.to_string())
            })
        })
        .transpose()
    }

    async fn save(
        &self,
        user_id: &UserId,
        document: &PreferenceDocument,
    ) -> Result<(), PreferenceDocumentRepositoryError> {
        let payload = serde_json::to_string(document)
            .map_err(|err| PreferenceDocumentRepositoryError::serialization(err.to_string()))?;

        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        // Last write wins; there is no revision check on the document.
        conn.set::<_, _, ()>(Self::key(user_id), payload)
            .await
            .map_err(map_redis_error)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn keys_are_namespaced_and_versioned() {
        let user_id = UserId::random();
        let key = RedisPreferenceDocumentRepository::key(&user_id);
        assert!(key.starts_with("profile:doc:v1:"));
        assert!(key.ends_with(&user_id.to_string()));
    }
}
