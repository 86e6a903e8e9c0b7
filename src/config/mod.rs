use std::env;
use std::str::FromStr;

use lazy_static::lazy_static;
use log::warn;

lazy_static! {
    pub static ref CONFIG: Config = Config::from_env();
}

#[derive(Debug, Clone)]
pub struct Config {
    pub server_host: String,
    pub server_port: u16,
    pub mongodb_uri: String,
    pub database_name: String,
    pub jwt_secret: String,
    pub jwt_expiration_hours: i64,
    pub upload_dir: String,

    /// Caching is disabled when this is `None`.
    pub redis_url: Option<String>,
    pub cache_ttl_seconds: u64,
    pub cache_prefix: String,

    pub payment_gateway_url: String,
    pub payment_key_id: String,
    pub payment_key_secret: String,
    pub payment_webhook_secret: String,
    pub payment_currency: String,

    pub seed_admin: bool,
    pub admin_email: String,
    pub admin_password: String,
    pub admin_name: String,

    pub auth_rate_limit_seconds: u64,
    pub auth_rate_limit_burst: u32,
    pub api_rate_limit_millis: u64,
    pub api_rate_limit_burst: u32,

    /// Days of cover after the expected arrival date.
    pub policy_grace_days: i64,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv::dotenv().ok();

        Self {
            server_host: env::var("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            server_port: parse_or("SERVER_PORT", 8080),
            mongodb_uri: env::var("MONGODB_URI")
                .unwrap_or_else(|_| "mongodb://localhost:27017".to_string()),
            database_name: env::var("DATABASE_NAME")
                .unwrap_or_else(|_| "cargo_insurance".to_string()),
            jwt_secret: env::var("JWT_SECRET")
                .unwrap_or_else(|_| "your-super-secret-jwt-key-change-in-production".to_string()),
            jwt_expiration_hours: parse_or("JWT_EXPIRATION_HOURS", 24),
            upload_dir: env::var("UPLOAD_DIR").unwrap_or_else(|_| "./uploads".to_string()),

            redis_url: env::var("REDIS_URL").ok().filter(|url| !url.trim().is_empty()),
            cache_ttl_seconds: parse_or("CACHE_TTL_SECONDS", 300),
            cache_prefix: env::var("CACHE_PREFIX").unwrap_or_else(|_| "cargo:".to_string()),

            payment_gateway_url: env::var("PAYMENT_GATEWAY_URL")
                .unwrap_or_else(|_| "https://api.razorpay.com/v1".to_string()),
            payment_key_id: env::var("PAYMENT_KEY_ID").unwrap_or_default(),
            payment_key_secret: env::var("PAYMENT_KEY_SECRET").unwrap_or_default(),
            payment_webhook_secret: env::var("PAYMENT_WEBHOOK_SECRET").unwrap_or_default(),
            payment_currency: env::var("PAYMENT_CURRENCY").unwrap_or_else(|_| "INR".to_string()),

            seed_admin: parse_or("SEED_ADMIN", true),
            admin_email: env::var("ADMIN_EMAIL")
                .unwrap_or_else(|_| "admin@cargoinsure.local".to_string()),
            admin_password: env::var("ADMIN_PASSWORD")
                .unwrap_or_else(|_| "ChangeMe123!".to_string()),
            admin_name: env::var("ADMIN_NAME").unwrap_or_else(|_| "System Administrator".to_string()),

            auth_rate_limit_seconds: parse_or("AUTH_RATE_LIMIT_SECONDS", 6),
            auth_rate_limit_burst: parse_or("AUTH_RATE_LIMIT_BURST", 5),
            api_rate_limit_millis: parse_or("API_RATE_LIMIT_MILLIS", 100),
            api_rate_limit_burst: parse_or("API_RATE_LIMIT_BURST", 100),

            policy_grace_days: parse_or("POLICY_GRACE_DAYS", 30),
        }
    }
}

/// Read and parse an environment variable, falling back to `default` when it is
/// missing or malformed.
fn parse_or<T: FromStr>(key: &str, default: T) -> T {
    match env::var(key) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!("{} has an invalid value '{}', using default", key, raw);
            default
        }),
        Err(_) => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_or_uses_default_when_missing() {
        assert_eq!(parse_or("CARGO_INSURE_TEST_MISSING_KEY", 42u16), 42);
    }

    #[test]
    fn test_parse_or_falls_back_on_garbage() {
        env::set_var("CARGO_INSURE_TEST_BAD_PORT", "not-a-port");
        assert_eq!(parse_or("CARGO_INSURE_TEST_BAD_PORT", 8080u16), 8080);
    }

    #[test]
    fn test_parse_or_reads_value() {
        env::set_var("CARGO_INSURE_TEST_BURST", " 7 ");
        assert_eq!(parse_or("CARGO_INSURE_TEST_BURST", 5u32), 7);
    }
}
