//! HTTP server configuration object.
//!
//! Built once in `main` and handed to `create_server`; there is no
//! module-level configuration state.

use std::net::SocketAddr;

use secrecy::SecretString;

use crate::inbound::http::rate_limit::{LOGIN_PER_MINUTE, REGISTER_PER_MINUTE};
use crate::outbound::document::RedisPool;
use crate::outbound::persistence::DbPool;

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) jwt_secret: SecretString,
    pub(crate) token_ttl_minutes: i64,
    pub(crate) db_pool: Option<DbPool>,
    pub(crate) redis_pool: Option<RedisPool>,
    pub(crate) register_per_minute: u32,
    pub(crate) login_per_minute: u32,
}

impl ServerConfig {
    /// Construct a configuration with default token lifetime and limits.
    #[must_use]
    pub fn new(bind_addr: SocketAddr, jwt_secret: SecretString) -> Self {
        Self {
            bind_addr,
            jwt_secret,
            token_ttl_minutes: 60,
            db_pool: None,
            redis_pool: None,
            register_per_minute: REGISTER_PER_MINUTE,
            login_per_minute: LOGIN_PER_MINUTE,
        }
    }

    /// Attach the relational store pool.
    ///
    /// Without one, the server runs on fixture adapters (useful in tests).
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    /// Attach the document store pool.
    #[must_use]
    pub fn with_redis_pool(mut self, pool: RedisPool) -> Self {
        self.redis_pool = Some(pool);
        self
    }

    /// Override the session token lifetime.
    #[must_use]
    pub fn with_token_ttl_minutes(mut self, minutes: i64) -> Self {
        self.token_ttl_minutes = minutes;
        self
    }

    /// Override the per-minute admission budgets.
    #[must_use]
    pub fn with_rate_limits(mut self, register_per_minute: u32, login_per_minute: u32) -> Self {
        self.register_per_minute = register_per_minute;
        self.login_per_minute = login_per_minute;
        self
    }

    /// Return the socket address the server will bind to.
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }
}
