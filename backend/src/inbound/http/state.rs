//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{AccountService, PantryService, ProfileService, RecipeService};
use crate::domain::SessionTokens;
use crate::inbound::http::rate_limit::RateLimits;

/// Parameter object bundling all port implementations for HTTP handlers.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub accounts: Arc<dyn AccountService>,
    pub profiles: Arc<dyn ProfileService>,
    pub recipes: Arc<dyn RecipeService>,
    pub pantry: Arc<dyn PantryService>,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub accounts: Arc<dyn AccountService>,
    pub profiles: Arc<dyn ProfileService>,
    pub recipes: Arc<dyn RecipeService>,
    pub pantry: Arc<dyn PantryService>,
    /// Bearer-token signer shared by handlers and the auth extractor.
    pub tokens: SessionTokens,
    /// Per-endpoint fixed-window rate limiters.
    pub rate_limits: RateLimits,
}

impl HttpState {
    /// Construct state from a ports bundle plus the cross-cutting pieces.
    pub fn new(ports: HttpStatePorts, tokens: SessionTokens, rate_limits: RateLimits) -> Self {
        let HttpStatePorts {
            accounts,
            profiles,
            recipes,
            pantry,
        } = ports;
        Self {
            accounts,
            profiles,
            recipes,
            pantry,
            tokens,
            rate_limits,
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    //! Fixture state for handler tests.

    use super::*;
    use crate::domain::ports::{
        FixtureAccountService, FixturePantryService, FixtureProfileService, FixtureRecipeService,
    };
    use secrecy::SecretString;

    /// Session token signer with a fixed secret for tests.
    pub fn test_tokens() -> SessionTokens {
        SessionTokens::new(&SecretString::from("handler-test-secret".to_owned()), 60)
    }

    /// State wired entirely with fixtures.
    pub fn fixture_state() -> HttpState {
        HttpState::new(
            HttpStatePorts {
                accounts: Arc::new(FixtureAccountService),
                profiles: Arc::new(FixtureProfileService),
                recipes: Arc::new(FixtureRecipeService),
                pantry: Arc::new(FixturePantryService),
            },
            test_tokens(),
            RateLimits::default(),
        )
    }

    /// State with the given ports and default limits.
    pub fn state_with_ports(ports: HttpStatePorts) -> HttpState {
        HttpState::new(ports, test_tokens(), RateLimits::default())
    }
}
