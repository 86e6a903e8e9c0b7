use std::sync::Arc;

use actix_governor::Governor;
use actix_web::{error, web, HttpResponse, ResponseError};
use utoipa::OpenApi;

use crate::constants::{CODE_BAD_REQUEST, CODE_NOT_FOUND, ERR_ROUTE_NOT_FOUND};
use crate::errors::ApiError;
use crate::handlers;
use crate::middleware::{AuthMiddleware, RateLimiterConfig};
use crate::models::HealthResponse;
use crate::openapi::ApiDoc;
use crate::services::TokenBlacklist;

/// Shared state the route tree needs at construction time.
///
/// Built once before the server starts so every worker shares the same
/// limiter quotas and revocation list.
#[derive(Clone)]
pub struct RouteState {
    pub blacklist: TokenBlacklist,
    pub auth_limiter: Arc<RateLimiterConfig>,
    pub api_limiter: Arc<RateLimiterConfig>,
}

pub fn configure_routes(cfg: &mut web::ServiceConfig, state: &RouteState) {
    let auth = || AuthMiddleware::new(state.blacklist.clone());

    cfg.service(
        web::scope("/api")
            .wrap(Governor::new(&*state.api_limiter))
            .route("/health", web::get().to(health_check))
            .route("/openapi.json", web::get().to(openapi_json))
            // Credential endpoints (strict limiter)
            .service(
                web::scope("/auth")
                    .wrap(Governor::new(&*state.auth_limiter))
                    .route("/register", web::post().to(handlers::register))
                    .route("/login", web::post().to(handlers::login))
                    .service(
                        web::resource("/logout")
                            .wrap(auth())
                            .route(web::post().to(handlers::logout)),
                    ),
            )
            // Must be registered before the protected /admin scope
            .service(
                web::scope("/admin/auth")
                    .wrap(Governor::new(&*state.auth_limiter))
                    .route("/login", web::post().to(handlers::admin_login)),
            )
            // Customer self-service
            .service(
                web::scope("/users")
                    .wrap(auth())
                    .route("/me", web::get().to(handlers::get_current_user))
                    .route("/me", web::put().to(handlers::update_current_user))
                    .route("/me/password", web::patch().to(handlers::change_password)),
            )
            // Public catalogue; posting a review needs a token
            .service(
                web::scope("/companies")
                    .route("", web::get().to(handlers::list_companies))
                    .route("/{id}", web::get().to(handlers::get_company))
                    .service(
                        web::resource("/{id}/reviews")
                            .wrap(AuthMiddleware::optional(state.blacklist.clone()))
                            .route(web::get().to(handlers::list_reviews))
                            .route(web::post().to(handlers::create_review)),
                    ),
            )
            .service(
                web::scope("/shipments")
                    .wrap(auth())
                    .route("", web::post().to(handlers::create_shipment))
                    .route("", web::get().to(handlers::list_shipments))
                    .route("/{id}", web::get().to(handlers::get_shipment))
                    .route("/{id}", web::put().to(handlers::update_shipment))
                    .route("/{id}", web::delete().to(handlers::delete_shipment)),
            )
            .service(
                web::scope("/policies")
                    .wrap(auth())
                    // Before /{id} so "quote" is never taken for an ID
                    .route("/quote", web::post().to(handlers::quote_policy))
                    .route("", web::post().to(handlers::create_policy))
                    .route("", web::get().to(handlers::list_policies))
                    .route("/{id}", web::get().to(handlers::get_policy))
                    .route("/{id}/cancel", web::post().to(handlers::cancel_policy)),
            )
            .service(
                web::scope("/claims")
                    .wrap(auth())
                    .route("", web::post().to(handlers::create_claim))
                    .route("", web::get().to(handlers::list_claims))
                    .route("/{id}", web::get().to(handlers::get_claim))
                    .route(
                        "/{id}/documents",
                        web::post().to(handlers::upload_claim_document),
                    )
                    .route("/{id}/withdraw", web::post().to(handlers::withdraw_claim)),
            )
            // The gateway signs its webhook; it never carries a JWT
            .route(
                "/payments/webhook",
                web::post().to(handlers::payment_webhook),
            )
            .service(
                web::scope("/payments")
                    .wrap(auth())
                    .route("/orders", web::post().to(handlers::create_order))
                    .route("/verify", web::post().to(handlers::verify_payment))
                    .route("", web::get().to(handlers::list_payments)),
            )
            .service(
                web::scope("/admin")
                    .wrap(auth())
                    .route("/me", web::get().to(handlers::get_current_admin))
                    .route("/dashboard", web::get().to(handlers::get_dashboard))
                    // Users
                    .route("/users", web::get().to(handlers::list_users))
                    .route(
                        "/users/bulk-status",
                        web::patch().to(handlers::bulk_update_user_status),
                    )
                    .route(
                        "/users/{id}/status",
                        web::patch().to(handlers::update_user_status),
                    )
                    // Back-office accounts (superadmin)
                    .route("/admins", web::get().to(handlers::list_admins))
                    .route("/admins", web::post().to(handlers::create_admin))
                    .route(
                        "/admins/{id}/status",
                        web::patch().to(handlers::update_admin_status),
                    )
                    // Companies
                    .route("/companies", web::get().to(handlers::admin_list_companies))
                    .route("/companies", web::post().to(handlers::create_company))
                    .route("/companies/{id}", web::put().to(handlers::update_company))
                    .route("/companies/{id}", web::delete().to(handlers::delete_company))
                    .route(
                        "/companies/{id}/status",
                        web::patch().to(handlers::update_company_status),
                    )
                    .route("/companies/{id}/logo", web::post().to(handlers::upload_logo))
                    // Shipments
                    .route("/shipments", web::get().to(handlers::admin_list_shipments))
                    .route("/shipments/{id}", web::get().to(handlers::admin_get_shipment))
                    .route(
                        "/shipments/{id}/status",
                        web::patch().to(handlers::update_shipment_status),
                    )
                    // Policies, claims, payments
                    .route("/policies", web::get().to(handlers::admin_list_policies))
                    .route("/claims", web::get().to(handlers::admin_list_claims))
                    .route("/claims/{id}", web::get().to(handlers::admin_get_claim))
                    .route("/claims/{id}/review", web::patch().to(handlers::review_claim))
                    .route("/payments", web::get().to(handlers::admin_list_payments)),
            ),
    );
}

/// Malformed JSON bodies get the same error envelope as everything else.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        let message = err.to_string();
        error::InternalError::from_response(
            err,
            ApiError::bad_request(CODE_BAD_REQUEST, message).error_response(),
        )
        .into()
    })
}

/// Unparseable query strings (bad enum values, non-numeric pages) become 400s.
pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err, _req| {
        let message = err.to_string();
        error::InternalError::from_response(
            err,
            ApiError::bad_request(CODE_BAD_REQUEST, message).error_response(),
        )
        .into()
    })
}

/// Health check
#[utoipa::path(
    get,
    path = "/api/health",
    tag = "Health",
    responses(
        (status = 200, description = "Server is running", body = HealthResponse)
    )
)]
pub async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(HealthResponse {
        status: "OK".to_string(),
        message: "Server is running".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Fallback for unknown paths so clients always get the JSON error envelope.
pub async fn not_found() -> Result<HttpResponse, ApiError> {
    Err(ApiError::not_found(CODE_NOT_FOUND, ERR_ROUTE_NOT_FOUND))
}

async fn openapi_json() -> HttpResponse {
    HttpResponse::Ok().json(ApiDoc::openapi())
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::dev::ServiceResponse;
    use actix_web::http::StatusCode;
    use actix_web::{test, App};
    use std::net::SocketAddr;

    use crate::middleware::{create_api_rate_limiter_config, create_auth_rate_limiter_config};

    fn state() -> RouteState {
        RouteState {
            blacklist: TokenBlacklist::new(),
            auth_limiter: Arc::new(create_auth_rate_limiter_config().unwrap()),
            api_limiter: Arc::new(create_api_rate_limiter_config().unwrap()),
        }
    }

    fn peer() -> SocketAddr {
        "127.0.0.1:40000".parse().unwrap()
    }

    fn status_of(result: Result<ServiceResponse, actix_web::Error>) -> StatusCode {
        match result {
            Ok(resp) => resp.status(),
            Err(err) => err.as_response_error().status_code(),
        }
    }

    #[actix_web::test]
    async fn test_health_check() {
        let state = state();
        let app =
            test::init_service(App::new().configure(|cfg| configure_routes(cfg, &state))).await;

        let req = test::TestRequest::get()
            .uri("/api/health")
            .peer_addr(peer())
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["status"], "OK");
    }

    #[actix_web::test]
    async fn test_unknown_route_gets_json_404() {
        let app = test::init_service(
            App::new().default_service(web::to(not_found)),
        )
        .await;

        let req = test::TestRequest::get().uri("/nope").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["code"], "NOT_FOUND");
    }

    #[actix_web::test]
    async fn test_openapi_document_lists_routes() {
        let state = state();
        let app =
            test::init_service(App::new().configure(|cfg| configure_routes(cfg, &state))).await;

        let req = test::TestRequest::get()
            .uri("/api/openapi.json")
            .peer_addr(peer())
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert!(body["paths"]["/api/policies/quote"].is_object());
        assert!(body["paths"]["/api/admin/claims/{id}/review"].is_object());
    }

    #[actix_web::test]
    async fn test_protected_routes_require_token() {
        let state = state();
        let app =
            test::init_service(App::new().configure(|cfg| configure_routes(cfg, &state))).await;

        for uri in ["/api/shipments", "/api/users/me", "/api/admin/dashboard"] {
            let req = test::TestRequest::get()
                .uri(uri)
                .peer_addr(peer())
                .to_request();
            let status = status_of(test::try_call_service(&app, req).await);
            assert_eq!(status, StatusCode::UNAUTHORIZED, "{}", uri);
        }
    }

    #[actix_web::test]
    async fn test_garbage_token_is_rejected() {
        let state = state();
        let app =
            test::init_service(App::new().configure(|cfg| configure_routes(cfg, &state))).await;

        let req = test::TestRequest::get()
            .uri("/api/policies")
            .insert_header(("Authorization", "Bearer not.a.jwt"))
            .peer_addr(peer())
            .to_request();
        let status = status_of(test::try_call_service(&app, req).await);
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn test_review_post_checks_token_even_on_public_scope() {
        let state = state();
        let app =
            test::init_service(App::new().configure(|cfg| configure_routes(cfg, &state))).await;

        let req = test::TestRequest::post()
            .uri("/api/companies/507f1f77bcf86cd799439011/reviews")
            .insert_header(("Authorization", "Bearer not.a.jwt"))
            .set_json(serde_json::json!({ "rating": 5 }))
            .peer_addr(peer())
            .to_request();
        let status = status_of(test::try_call_service(&app, req).await);
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }
}
