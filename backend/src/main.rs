//! Backend entry-point: builds the application context and runs the server.

use std::env;
use std::net::SocketAddr;

use actix_web::web;
use rand::RngCore;
use secrecy::SecretString;
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

use foodi_backend::inbound::http::health::HealthState;
use foodi_backend::outbound::document::RedisPool;
use foodi_backend::outbound::persistence::{DbPool, PoolConfig, MIGRATIONS};
use foodi_backend::server::{create_server, ServerConfig};

fn load_jwt_secret() -> std::io::Result<SecretString> {
    let secret_path =
        env::var("JWT_SECRET_FILE").unwrap_or_else(|_| "/var/run/secrets/jwt_secret".into());
    match std::fs::read_to_string(&secret_path) {
        Ok(raw) => Ok(SecretString::from(raw.trim().to_owned())),
        Err(e) => {
            let allow_dev = env::var("JWT_ALLOW_EPHEMERAL").ok().as_deref() == Some("1");
            if cfg!(debug_assertions) || allow_dev {
                warn!(path = %secret_path, error = %e, "using ephemeral JWT secret (dev only)");
                let mut bytes = [0_u8; 32];
                rand::rngs::OsRng.fill_bytes(&mut bytes);
                Ok(SecretString::from(hex::encode(bytes)))
            } else {
                Err(std::io::Error::other(format!(
                    "failed to read JWT secret at {secret_path}: {e}"
                )))
            }
        }
    }
}

async fn run_migrations(database_url: String) -> std::io::Result<()> {
    tokio::task::spawn_blocking(move || {
        use diesel::Connection;
        use diesel_migrations::MigrationHarness;

        let mut conn = diesel::PgConnection::establish(&database_url)
            .map_err(|e| std::io::Error::other(format!("database connection failed: {e}")))?;
        conn.run_pending_migrations(MIGRATIONS)
            .map(|applied| info!(count = applied.len(), "migrations applied"))
            .map_err(|e| std::io::Error::other(format!("migrations failed: {e}")))
    })
    .await
    .map_err(|e| std::io::Error::other(format!("migration task failed: {e}")))?
}

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let bind_addr: SocketAddr = env::var("BIND_ADDR")
        .unwrap_or_else(|_| "0.0.0.0:8080".into())
        .parse()
        .map_err(|e| std::io::Error::other(format!("invalid BIND_ADDR: {e}")))?;

    let jwt_secret = load_jwt_secret()?;
    let mut config = ServerConfig::new(bind_addr, jwt_secret);

    if let Ok(ttl) = env::var("TOKEN_TTL_MINUTES") {
        let minutes = ttl
            .parse()
            .map_err(|e| std::io::Error::other(format!("invalid TOKEN_TTL_MINUTES: {e}")))?;
        config = config.with_token_ttl_minutes(minutes);
    }

    match env::var("DATABASE_URL") {
        Ok(database_url) => {
            run_migrations(database_url.clone()).await?;
            let pool = DbPool::new(PoolConfig::new(database_url))
                .await
                .map_err(|e| std::io::Error::other(format!("database pool failed: {e}")))?;
            config = config.with_db_pool(pool);
        }
        Err(_) => warn!("DATABASE_URL not set; identity and catalog stores are fixtures"),
    }

    match env::var("REDIS_URL") {
        Ok(redis_url) => {
            let pool = RedisPool::connect(&redis_url)
                .await
                .map_err(|e| std::io::Error::other(format!("redis pool failed: {e}")))?;
            config = config.with_redis_pool(pool);
        }
        Err(_) => warn!("REDIS_URL not set; preference documents are not persisted"),
    }

    let health_state = web::Data::new(HealthState::new());
    info!(%bind_addr, "starting server");
    let server = create_server(health_state, config)?;
    server.await
}
