//! Request middleware and the helpers handlers use to read what it attached.

pub mod auth_helpers;
pub mod auth_middleware;
pub mod rate_limiter;
pub mod request_ext;

pub use auth_helpers::*;
pub use auth_middleware::{AuthMiddleware, BearerToken};
pub use rate_limiter::*;
pub use request_ext::RequestExt;
