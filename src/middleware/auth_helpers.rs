//! Authentication and authorization helper functions.
//!
//! These helpers reduce boilerplate in handlers by providing common patterns for:
//! - Extracting claims from authenticated requests
//! - Restricting endpoints to customer or back-office accounts

use actix_web::HttpRequest;
use log::warn;

use crate::constants::{
    CODE_ADMIN_REQUIRED, CODE_AUTH_REQUIRED, CODE_FORBIDDEN, CODE_SUPERADMIN_REQUIRED,
    ERR_ADMIN_REQUIRED, ERR_AUTH_REQUIRED, ERR_SUPERADMIN_REQUIRED, ERR_USER_ACCOUNT_REQUIRED,
};
use crate::errors::ApiError;
use crate::models::TokenClaims;

use super::RequestExt;

/// Extract claims from request or return Unauthorized error.
///
/// # Example
/// ```ignore
/// let claims = require_auth(&req)?;
/// ```
pub fn require_auth(req: &HttpRequest) -> Result<TokenClaims, ApiError> {
    req.get_claims().ok_or_else(|| {
        warn!("Failed to get claims from request");
        ApiError::unauthorized(CODE_AUTH_REQUIRED, ERR_AUTH_REQUIRED)
    })
}

/// Customer-only endpoints (shipments, policies, claims, payments).
pub fn require_user(claims: &TokenClaims) -> Result<(), ApiError> {
    if !claims.is_user() {
        warn!("Account {} ({}) called a customer endpoint", claims.sub, claims.role);
        return Err(ApiError::forbidden(CODE_FORBIDDEN, ERR_USER_ACCOUNT_REQUIRED));
    }
    Ok(())
}

/// Require admin role or return Forbidden error.
///
/// # Example
/// ```ignore
/// let claims = require_auth(&req)?;
/// require_admin(&claims)?;
/// ```
pub fn require_admin(claims: &TokenClaims) -> Result<(), ApiError> {
    if !claims.is_admin() {
        warn!("Non-admin account {} attempted admin action", claims.sub);
        return Err(ApiError::forbidden(CODE_ADMIN_REQUIRED, ERR_ADMIN_REQUIRED));
    }
    Ok(())
}

pub fn require_superadmin(claims: &TokenClaims) -> Result<(), ApiError> {
    if !claims.is_superadmin() {
        warn!("Account {} attempted to manage admin accounts", claims.sub);
        return Err(ApiError::forbidden(
            CODE_SUPERADMIN_REQUIRED,
            ERR_SUPERADMIN_REQUIRED,
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{ROLE_ADMIN, ROLE_SUPERADMIN, ROLE_USER};

    fn claims(role: &str) -> TokenClaims {
        TokenClaims {
            sub: "507f1f77bcf86cd799439011".into(),
            email: "someone@example.com".into(),
            role: role.into(),
            exp: 0,
            iat: 0,
        }
    }

    #[test]
    fn test_role_gates() {
        assert!(require_user(&claims(ROLE_USER)).is_ok());
        assert_eq!(require_user(&claims(ROLE_ADMIN)).unwrap_err().code(), CODE_FORBIDDEN);

        assert!(require_admin(&claims(ROLE_ADMIN)).is_ok());
        assert!(require_admin(&claims(ROLE_SUPERADMIN)).is_ok());
        assert_eq!(require_admin(&claims(ROLE_USER)).unwrap_err().code(), CODE_ADMIN_REQUIRED);

        assert!(require_superadmin(&claims(ROLE_SUPERADMIN)).is_ok());
        assert_eq!(
            require_superadmin(&claims(ROLE_ADMIN)).unwrap_err().code(),
            CODE_SUPERADMIN_REQUIRED
        );
    }

    #[test]
    fn test_require_auth_without_claims() {
        let req = actix_web::test::TestRequest::default().to_http_request();
        assert_eq!(require_auth(&req).unwrap_err().code(), CODE_AUTH_REQUIRED);
    }
}
