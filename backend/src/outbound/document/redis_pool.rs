//! Connection pool for the Redis document store.

use bb8_redis::{bb8, RedisConnectionManager};

/// Errors raised while building or using the Redis pool.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RedisPoolError {
    /// The pool could not be constructed.
    #[error("failed to build redis pool: {message}")]
    Build { message: String },
    /// No connection became available.
    #[error("failed to get redis connection: {message}")]
    Checkout { message: String },
}

impl RedisPoolError {
    /// Create a build error with the given message.
    pub fn build(message: impl Into<String>) -> Self {
        Self::Build {
            message: message.into(),
        }
    }

    /// Create a checkout error with the given message.
    pub fn checkout(message: impl Into<String>) -> Self {
        Self::Checkout {
            message: message.into(),
        }
    }
}

/// bb8-managed Redis connection pool.
#[derive(Clone)]
pub struct RedisPool {
    inner: bb8::Pool<RedisConnectionManager>,
}

impl RedisPool {
    /// Connect to the document store at the given URL.
    ///
    /// # Errors
    ///
    /// Returns [`RedisPoolError::Build`] for an invalid URL or an
    /// unreachable server.
    pub async fn connect(url: &str) -> Result<Self, RedisPoolError> {
        let manager = RedisConnectionManager::new(url)
            .map_err(|err| RedisPoolError::build(err.to_string()))?;
        let inner = bb8::Pool::builder()
            .build(manager)
            .await
            .map_err(|err| RedisPoolError::build(err.to_string()))?;
        Ok(Self { inner })
    }

    /// Get a connection from the pool.
    ///
    /// # Errors
    ///
    /// Returns [`RedisPoolError::Checkout`] when no connection becomes
    /// available within the pool's timeout.
    pub async fn get(
        &self,
    ) -> Result<bb8::PooledConnection<'_, RedisConnectionManager>, RedisPoolError> {
        self.inner
            .get()
            .await
            .map_err(|err| RedisPoolError::checkout(err.to_string()))
    }
}
