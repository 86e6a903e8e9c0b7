//! Request extension trait for reading what `AuthMiddleware` attached.

use actix_web::HttpMessage;

use super::BearerToken;
use crate::models::TokenClaims;

pub trait RequestExt {
    /// Claims of the authenticated account, if the request passed `AuthMiddleware`.
    fn get_claims(&self) -> Option<TokenClaims>;

    /// The raw bearer token, used to revoke it on logout.
    fn get_token(&self) -> Option<String>;
}

impl RequestExt for actix_web::HttpRequest {
    fn get_claims(&self) -> Option<TokenClaims> {
        self.extensions().get::<TokenClaims>().cloned()
    }

    fn get_token(&self) -> Option<String> {
        self.extensions().get::<BearerToken>().map(|t| t.0.clone())
    }
}
