//! Fixed-window rate limiting keyed by client identity.
//!
//! The only admission control in the system: a per-endpoint counter over a
//! fixed window, not load-adaptive. Counters live in process memory; the
//! system model is request-scoped with no cross-request shared state beyond
//! the stores, so no external backend is involved.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use actix_web::HttpRequest;

use crate::domain::Error;

/// Registrations allowed per client per minute.
pub const REGISTER_PER_MINUTE: u32 = 5;
/// Logins allowed per client per minute.
pub const LOGIN_PER_MINUTE: u32 = 10;

#[derive(Debug, Clone, Copy)]
struct Window {
    started: Instant,
    count: u32,
}

/// A fixed-window counter keyed by client identity.
pub struct FixedWindowLimiter {
    limit: u32,
    window: Duration,
    windows: Mutex<HashMap<String, Window>>,
}

impl FixedWindowLimiter {
    /// Create a limiter allowing `limit` requests per `window`.
    pub fn new(limit: u32, window: Duration) -> Self {
        Self {
            limit,
            window,
            windows: Mutex::new(HashMap::new()),
        }
    }

    /// Record one request for `key` and report whether it is admitted.
    pub fn allow(&self, key: &str) -> bool {
        let now = Instant::now();
        let mut windows = match self.windows.lock() {
            Ok(guard) => guard,
            // A poisoned counter map must not take the endpoint down.
            Err(poisoned) => poisoned.into_inner(),
        };

        let window = windows.entry(key.to_owned()).or_insert(Window {
            started: now,
            count: 0,
        });
        if now.duration_since(window.started) >= self.window {
            window.started = now;
            window.count = 0;
        }
        if window.count >= self.limit {
            return false;
        }
        window.count += 1;
        true
    }
}

/// The per-endpoint limiters carried in HTTP state.
#[derive(Clone)]
pub struct RateLimits {
    pub register: Arc<FixedWindowLimiter>,
    pub login: Arc<FixedWindowLimiter>,
}

impl RateLimits {
    /// Build limiters from per-minute budgets.
    pub fn per_minute(register: u32, login: u32) -> Self {
        Self {
            register: Arc::new(FixedWindowLimiter::new(register, Duration::from_secs(60))),
            login: Arc::new(FixedWindowLimiter::new(login, Duration::from_secs(60))),
        }
    }
}

impl Default for RateLimits {
    fn default() -> Self {
        Self::per_minute(REGISTER_PER_MINUTE, LOGIN_PER_MINUTE)
    }
}

/// Client identity for rate limiting: forwarded address when present,
/// otherwise the peer address.
pub fn client_key(request: &HttpRequest) -> String {
    if let Some(forwarded) = request
        .headers()
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
        .and_then(|raw| raw.split(',').next())
        .map(str::trim)
        .filter(|addr| !addr.is_empty())
    {
        return forwarded.to_owned();
    }
    request
        .peer_addr()
        .map(|addr| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_owned())
}

/// Admit or reject one request against a limiter.
pub fn enforce(limiter: &FixedWindowLimiter, request: &HttpRequest) -> Result<(), Error> {
    if limiter.allow(&client_key(request)) {
        Ok(())
    } else {
        Err(Error::rate_limited(
            "too many requests; retry after the current window",
        ))
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn limiter_admits_up_to_the_budget_then_rejects() {
        let limiter = FixedWindowLimiter::new(3, Duration::from_secs(60));

        assert!(limiter.allow("1.2.3.4"));
        assert!(limiter.allow("1.2.3.4"));
        assert!(limiter.allow("1.2.3.4"));
        assert!(!limiter.allow("1.2.3.4"));
    }

    #[rstest]
    fn clients_are_counted_independently() {
        let limiter = FixedWindowLimiter::new(1, Duration::from_secs(60));

        assert!(limiter.allow("1.2.3.4"));
        assert!(!limiter.allow("1.2.3.4"));
        assert!(limiter.allow("5.6.7.8"));
    }

    #[rstest]
    fn window_resets_after_expiry() {
        let limiter = FixedWindowLimiter::new(1, Duration::from_millis(10));

        assert!(limiter.allow("1.2.3.4"));
        assert!(!limiter.allow("1.2.3.4"));
        std::thread::sleep(Duration::from_millis(15));
        assert!(limiter.allow("1.2.3.4"));
    }

    #[actix_web::test]
    async fn client_key_prefers_the_forwarded_header() {
        let request = actix_web::test::TestRequest::default()
            .insert_header(("x-forwarded-for", "10.0.0.9, 172.16.0.1"))
            .to_http_request();

        assert_eq!(client_key(&request), "10.0.0.9");
    }
}
