//! Rate limiting for the credential endpoints and the API as a whole.
//!
//! Both limiters key on the peer IP. Quotas come from `CONFIG` so they can be
//! loosened in development.

use actix_governor::governor::clock::QuantaInstant;
use actix_governor::governor::middleware::NoOpMiddleware;
use actix_governor::{GovernorConfig, GovernorConfigBuilder, PeerIpKeyExtractor};

use crate::config::CONFIG;

pub type RateLimiterConfig = GovernorConfig<PeerIpKeyExtractor, NoOpMiddleware<QuantaInstant>>;

/// Strict limiter for register and login.
///
/// With the defaults a client gets a burst of 5 and then one request every 6 seconds.
/// Returns `None` if the configured quota is zero.
pub fn create_auth_rate_limiter_config() -> Option<RateLimiterConfig> {
    GovernorConfigBuilder::default()
        .seconds_per_request(CONFIG.auth_rate_limit_seconds)
        .burst_size(CONFIG.auth_rate_limit_burst)
        .finish()
}

/// General limiter wrapping the whole `/api` scope.
pub fn create_api_rate_limiter_config() -> Option<RateLimiterConfig> {
    GovernorConfigBuilder::default()
        .milliseconds_per_request(CONFIG.api_rate_limit_millis)
        .burst_size(CONFIG.api_rate_limit_burst)
        .finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_limiters_build() {
        assert!(create_auth_rate_limiter_config().is_some());
        assert!(create_api_rate_limiter_config().is_some());
    }

    #[test]
    fn test_zero_quota_is_rejected() {
        assert!(GovernorConfigBuilder::default()
            .seconds_per_request(0)
            .burst_size(5)
            .finish()
            .is_none());
    }
}
