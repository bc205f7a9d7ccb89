//! HTTP state construction from server configuration.
//!
//! Real adapters are wired when the relevant pool is configured; fixture
//! implementations keep the server bootable without backing stores, which
//! the wiring tests rely on.

use std::sync::Arc;

use tracing::warn;

use crate::domain::ports::{
    FixturePantryService, FixturePreferenceDocumentRepository, FixtureProfileHistoryRepository,
    FixtureProfileService, FixtureRecipeService,
};
use crate::domain::ports::{AccountService, PantryService, ProfileService, RecipeService};
use crate::domain::{
    IdentityService, PantryTrackerService, ProfileSyncService, RecipeBoxService, SessionTokens,
};
use crate::inbound::http::rate_limit::RateLimits;
use crate::inbound::http::state::{HttpState, HttpStatePorts};
use crate::outbound::document::{
    RedisPreferenceDocumentRepository, RedisProfileHistoryRepository,
};
use crate::outbound::email::LoggingVerificationMailer;
use crate::outbound::persistence::{
    DieselCategoryRepository, DieselPantryRepository, DieselRecipeCatalogRepository,
    DieselUserRecipeRepository, DieselUserRepository,
};

use super::config::ServerConfig;
use crate::domain::ports::FixtureAccountService;

/// Build the HTTP state for the configured stores.
pub fn build_http_state(config: &ServerConfig) -> HttpState {
    let tokens = SessionTokens::new(&config.jwt_secret, config.token_ttl_minutes);
    let rate_limits = RateLimits::per_minute(config.register_per_minute, config.login_per_minute);

    let Some(db_pool) = config.db_pool.clone() else {
        warn!("no database configured; serving fixture adapters");
        let ports = HttpStatePorts {
            accounts: Arc::new(FixtureAccountService),
            profiles: Arc::new(FixtureProfileService),
            recipes: Arc::new(FixtureRecipeService),
            pantry: Arc::new(FixturePantryService),
        };
        return HttpState::new(ports, tokens, rate_limits);
    };

    let users = Arc::new(DieselUserRepository::new(db_pool.clone()));
    let accounts: Arc<dyn AccountService> = Arc::new(IdentityService::new(
        users.clone(),
        Arc::new(LoggingVerificationMailer::new()),
        tokens.clone(),
    ));

    let profiles: Arc<dyn ProfileService> = match config.redis_pool.clone() {
        Some(redis) => Arc::new(ProfileSyncService::new(
            users.clone(),
            Arc::new(RedisPreferenceDocumentRepository::new(redis.clone())),
            Arc::new(RedisProfileHistoryRepository::new(redis)),
        )),
        None => {
            // Profiles still read identity fields; documents fall back to
            // defaults and history reads empty.
            warn!("no document store configured; preference documents are not persisted");
            Arc::new(ProfileSyncService::new(
                users,
                Arc::new(FixturePreferenceDocumentRepository),
                Arc::new(FixtureProfileHistoryRepository),
            ))
        }
    };

    let recipes: Arc<dyn RecipeService> = Arc::new(RecipeBoxService::new(
        Arc::new(DieselRecipeCatalogRepository::new(db_pool.clone())),
        Arc::new(DieselUserRecipeRepository::new(db_pool.clone())),
        Arc::new(DieselCategoryRepository::new(db_pool.clone())),
    ));
    let pantry: Arc<dyn PantryService> = Arc::new(PantryTrackerService::new(Arc::new(
        DieselPantryRepository::new(db_pool),
    )));

    HttpState::new(
        HttpStatePorts {
            accounts,
            profiles,
            recipes,
            pantry,
        },
        tokens,
        rate_limits,
    )
}
