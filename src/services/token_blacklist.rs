//! In-memory revocation list for logged-out JWTs.
//!
//! Entries live until the token would have expired anyway, so the map only
//! ever holds tokens that could still pass signature validation.

use chrono::Utc;
use dashmap::DashMap;
use log::{debug, info};
use sha2::{Digest, Sha256};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

const CLEANUP_INTERVAL: Duration = Duration::from_secs(300);

/// Thread-safe token blacklist shared between the logout handler and the auth middleware.
#[derive(Clone)]
pub struct TokenBlacklist {
    /// SHA-256 of the token -> moment it stops mattering
    tokens: Arc<DashMap<String, Instant>>,
    last_cleanup: Arc<RwLock<Instant>>,
}

impl TokenBlacklist {
    pub fn new() -> Self {
        Self {
            tokens: Arc::new(DashMap::new()),
            last_cleanup: Arc::new(RwLock::new(Instant::now())),
        }
    }

    /// Revoke `token` until `exp` (Unix seconds). Already-expired tokens are ignored.
    pub async fn blacklist_token(&self, token: &str, exp: usize) {
        let now_secs = Utc::now().timestamp().max(0) as usize;

        if exp > now_secs {
            let ttl = Duration::from_secs((exp - now_secs) as u64);
            self.tokens.insert(Self::hash_token(token), Instant::now() + ttl);
            debug!("Token blacklisted, will expire in {:?}", ttl);
        }

        self.maybe_cleanup().await;
    }

    pub fn is_blacklisted(&self, token: &str) -> bool {
        let key = Self::hash_token(token);

        let expired = match self.tokens.get(&key) {
            Some(expires_at) if *expires_at > Instant::now() => return true,
            Some(_) => true,
            None => false,
        };
        if expired {
            self.tokens.remove(&key);
        }
        false
    }

    fn hash_token(token: &str) -> String {
        hex::encode(Sha256::digest(token.as_bytes()))
    }

    async fn maybe_cleanup(&self) {
        let due = self.last_cleanup.read().await.elapsed() >= CLEANUP_INTERVAL;
        if !due {
            return;
        }

        let mut last = self.last_cleanup.write().await;
        if last.elapsed() >= CLEANUP_INTERVAL {
            self.cleanup();
            *last = Instant::now();
        }
    }

    fn cleanup(&self) {
        let now = Instant::now();
        let before = self.tokens.len();
        self.tokens.retain(|_, expires_at| *expires_at > now);

        let removed = before - self.tokens.len();
        if removed > 0 {
            info!(
                "Token blacklist cleanup: removed {} expired entries, {} remaining",
                removed,
                self.tokens.len()
            );
        }
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

impl Default for TokenBlacklist {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn in_an_hour() -> usize {
        (Utc::now().timestamp() + 3600) as usize
    }

    #[actix_web::test]
    async fn test_blacklisted_token_is_rejected() {
        let blacklist = TokenBlacklist::new();
        blacklist.blacklist_token("token-a", in_an_hour()).await;

        assert!(blacklist.is_blacklisted("token-a"));
        assert!(!blacklist.is_blacklisted("token-b"));
        assert_eq!(blacklist.len(), 1);
    }

    #[actix_web::test]
    async fn test_expired_token_is_not_stored() {
        let blacklist = TokenBlacklist::new();
        blacklist.blacklist_token("old", 1).await;

        assert!(blacklist.is_empty());
        assert!(!blacklist.is_blacklisted("old"));
    }

    #[actix_web::test]
    async fn test_clones_share_state() {
        let blacklist = TokenBlacklist::new();
        let middleware_copy = blacklist.clone();
        blacklist.blacklist_token("shared", in_an_hour()).await;

        assert!(middleware_copy.is_blacklisted("shared"));
    }

    #[test]
    fn test_hash_hides_raw_token() {
        let key = TokenBlacklist::hash_token("secret-token");
        assert_eq!(key.len(), 64);
        assert!(!key.contains("secret"));
    }
}
