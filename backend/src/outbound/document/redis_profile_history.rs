//! Redis-backed `ProfileHistoryRepository` implementation.
//!
//! The ledger is an append-only list under `profile:history:v1:<user_id>`:
//! `RPUSH` preserves append order and `LRANGE 0 -1` reads oldest first.
//! Entries are never rewritten or removed.

use async_trait::async_trait;
use bb8_redis::redis::AsyncCommands;

use crate::domain::ports::{ProfileHistoryError, ProfileHistoryRepository};
use crate::domain::{ProfileChangeRecord, UserId};

use super::redis_pool::{RedisPool, RedisPoolError};

const HISTORY_KEY_PREFIX: &str = "profile:history:v1";

/// Redis-backed implementation of the `ProfileHistoryRepository` port.
#[derive(Clone)]
pub struct RedisProfileHistoryRepository {
    pool: RedisPool,
}

impl RedisProfileHistoryRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: RedisPool) -> Self {
        Self { pool }
    }

    fn key(user_id: &UserId) -> String {
        format!("{HISTORY_KEY_PREFIX}:{user_id}")
    }
}

fn map_pool_error(error: RedisPoolError) -> ProfileHistoryError {
    ProfileHistoryError::connection(error.to_string())
}

fn map_redis_error(error: bb8_redis::redis::RedisError) -> ProfileHistoryError {
    ProfileHistoryError::query(error.to_string())
}

#[async_trait]
impl ProfileHistoryRepository for RedisProfileHistoryRepository {
    async fn append(&self, records: &[ProfileChangeRecord]) -> Result<(), ProfileHistoryError> {
        let Some(first) = records.first() else {
            return Ok(());
        };

        let mut payloads = Vec::with_capacity(records.len());
        for record in records {
            payloads.push(
                serde_json::to_string(record)
                    .map_err(|err| ProfileHistoryError::serialization(err.to_string()))?,
            );
        }

        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        conn.rpush::<_, _, ()>(Self::key(&first.user_id), payloads)
            .await
            .map_err(map_redis_error)
    }

    async fn list(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<ProfileChangeRecord>, ProfileHistoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let payloads: Vec<String> = conn
            .lrange(Self::key(user_id), 0, -1)
            .await
            .map_err(map_redis_error)?;

        payloads
            .into_iter()
            .map(|payload| {
                serde_json::from_str(&payload)
                    .map_err(|err| ProfileHistoryError::serialization(err.to_string()))
            })
            .collect()
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
        let key = RedisProfileHistoryRepository::key(&user_id);
        assert!(key.starts_with("profile:history:v1:"));
        assert!(key.ends_with(&user_id.to_string()));
    }
}
