//! Optional Redis read-through cache.
//!
//! When `REDIS_URL` is unset or unreachable every call is a no-op and reads miss.
//! Listing keys embed a per-namespace generation number; invalidating a namespace
//! is a single `INCR`, so stale pages simply stop being addressed and age out by TTL.

use log::{debug, info, warn};
use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use serde::de::DeserializeOwned;
use serde::Serialize;

#[derive(Clone)]
pub struct CacheService {
    conn: Option<ConnectionManager>,
    prefix: String,
    ttl_seconds: u64,
}

impl CacheService {
    /// Connect to Redis, falling back to a disabled cache on any error.
    pub async fn connect(url: Option<&str>, prefix: &str, ttl_seconds: u64) -> Self {
        let Some(url) = url else {
            info!("REDIS_URL not set, caching disabled");
            return Self::disabled(prefix, ttl_seconds);
        };

        let conn = match redis::Client::open(url) {
            Ok(client) => match client.get_connection_manager().await {
                Ok(conn) => {
                    info!("Connected to Redis cache");
                    Some(conn)
                }
                Err(e) => {
                    warn!("Redis unavailable, caching disabled: {}", e);
                    None
                }
            },
            Err(e) => {
                warn!("Invalid REDIS_URL, caching disabled: {}", e);
                None
            }
        };

        Self {
            conn,
            prefix: prefix.to_string(),
            ttl_seconds,
        }
    }

    pub fn disabled(prefix: &str, ttl_seconds: u64) -> Self {
        Self {
            conn: None,
            prefix: prefix.to_string(),
            ttl_seconds,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.conn.is_some()
    }

    fn key(&self, key: &str) -> String {
        format!("{}{}", self.prefix, key)
    }

    fn generation_key(&self, namespace: &str) -> String {
        self.key(&format!("{}:gen", namespace))
    }

    pub async fn get_json<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let mut conn = self.conn.clone()?;
        let full_key = self.key(key);

        let raw: Option<String> = match conn.get(&full_key).await {
            Ok(raw) => raw,
            Err(e) => {
                warn!("Cache read failed for {}: {}", full_key, e);
                return None;
            }
        };

        match serde_json::from_str(&raw?) {
            Ok(value) => {
                debug!("Cache hit: {}", full_key);
                Some(value)
            }
            Err(e) => {
                warn!("Discarding undecodable cache entry {}: {}", full_key, e);
                None
            }
        }
    }

    pub async fn set_json<T: Serialize>(&self, key: &str, value: &T) {
        let Some(mut conn) = self.conn.clone() else {
            return;
        };
        let full_key = self.key(key);

        let payload = match serde_json::to_string(value) {
            Ok(payload) => payload,
            Err(e) => {
                warn!("Could not serialize cache entry {}: {}", full_key, e);
                return;
            }
        };

        let result: redis::RedisResult<()> = conn.set_ex(&full_key, payload, self.ttl_seconds).await;
        if let Err(e) = result {
            warn!("Cache write failed for {}: {}", full_key, e);
        }
    }

    /// Current generation of a namespace (0 when unset or disabled).
    pub async fn generation(&self, namespace: &str) -> u64 {
        let Some(mut conn) = self.conn.clone() else {
            return 0;
        };
        let result: redis::RedisResult<Option<u64>> = conn.get(self.generation_key(namespace)).await;
        match result {
            Ok(generation) => generation.unwrap_or(0),
            Err(e) => {
                warn!("Cache generation read failed for {}: {}", namespace, e);
                0
            }
        }
    }

    /// Invalidate every listing cached under `namespace`.
    pub async fn bump_generation(&self, namespace: &str) {
        let Some(mut conn) = self.conn.clone() else {
            return;
        };
        let result: redis::RedisResult<u64> = conn.incr(self.generation_key(namespace), 1).await;
        match result {
            Ok(generation) => debug!("Cache namespace {} now at generation {}", namespace, generation),
            Err(e) => warn!("Cache invalidation failed for {}: {}", namespace, e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys_are_prefixed() {
        let cache = CacheService::disabled("cargo:", 60);
        assert_eq!(cache.key("companies:1"), "cargo:companies:1");
        assert_eq!(cache.generation_key("companies"), "cargo:companies:gen");
    }

    #[actix_web::test]
    async fn test_disabled_cache_is_a_no_op() {
        let cache = CacheService::connect(None, "cargo:", 60).await;
        assert!(!cache.is_enabled());

        cache.set_json("k", &vec![1, 2, 3]).await;
        let value: Option<Vec<i32>> = cache.get_json("k").await;
        assert!(value.is_none());

        cache.bump_generation("companies").await;
        assert_eq!(cache.generation("companies").await, 0);
    }

    #[actix_web::test]
    async fn test_malformed_url_disables_cache() {
        let cache = CacheService::connect(Some("not a url"), "cargo:", 60).await;
        assert!(!cache.is_enabled());
    }
}
