//! JWT Authentication middleware for protected routes.

use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    Error, HttpMessage,
};
use futures::future::{ok, LocalBoxFuture, Ready};
use log::debug;
use std::rc::Rc;

use crate::constants::{
    CODE_AUTH_REQUIRED, CODE_INVALID_TOKEN, CODE_TOKEN_REVOKED, ERR_INVALID_AUTH_HEADER,
    ERR_INVALID_TOKEN, ERR_TOKEN_REVOKED,
};
use crate::errors::ApiError;
use crate::services::auth_service::decode_token;
use crate::services::TokenBlacklist;

/// Raw bearer token of the current request, kept so logout can revoke it.
#[derive(Debug, Clone)]
pub struct BearerToken(pub String);

/// Pull the token out of an `Authorization: Bearer <token>` header value.
pub fn bearer_token(header: Option<&str>) -> Option<&str> {
    header
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

/// JWT Authentication middleware.
///
/// Validates the bearer token, rejects tokens revoked at logout, and stores
/// the decoded claims plus the raw token in the request extensions.
pub struct AuthMiddleware {
    blacklist: TokenBlacklist,
    required: bool,
}

impl AuthMiddleware {
    pub fn new(blacklist: TokenBlacklist) -> Self {
        Self {
            blacklist,
            required: true,
        }
    }

    /// Lets anonymous requests through untouched. A token that is present
    /// must still be valid; handlers call `require_auth` where needed.
    pub fn optional(blacklist: TokenBlacklist) -> Self {
        Self {
            blacklist,
            required: false,
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = AuthMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ok(AuthMiddlewareService {
            service: Rc::new(service),
            blacklist: self.blacklist.clone(),
            required: self.required,
        })
    }
}

pub struct AuthMiddlewareService<S> {
    service: Rc<S>,
    blacklist: TokenBlacklist,
    required: bool,
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let blacklist = self.blacklist.clone();
        let required = self.required;

        Box::pin(async move {
            let header = req
                .headers()
                .get("Authorization")
                .and_then(|h| h.to_str().ok());

            let token = match bearer_token(header) {
                Some(token) => token.to_string(),
                None if !required => return service.call(req).await,
                None => {
                    debug!("Rejected {} without a bearer token", req.path());
                    return Err(
                        ApiError::unauthorized(CODE_AUTH_REQUIRED, ERR_INVALID_AUTH_HEADER).into(),
                    );
                }
            };

            if blacklist.is_blacklisted(&token) {
                return Err(ApiError::unauthorized(CODE_TOKEN_REVOKED, ERR_TOKEN_REVOKED).into());
            }

            let claims = decode_token(&token)
                .map_err(|_| ApiError::unauthorized(CODE_INVALID_TOKEN, ERR_INVALID_TOKEN))?;

            req.extensions_mut().insert(BearerToken(token));
            req.extensions_mut().insert(claims);

            service.call(req).await
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bearer_token_parsing() {
        assert_eq!(bearer_token(Some("Bearer abc.def")), Some("abc.def"));
        assert_eq!(bearer_token(Some("Bearer   ")), None);
        assert_eq!(bearer_token(Some("Basic abc")), None);
        assert_eq!(bearer_token(None), None);
    }
}
