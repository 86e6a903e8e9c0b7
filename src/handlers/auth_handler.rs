//! Authentication handlers for registration, login, and logout.

use actix_web::{web, HttpRequest, HttpResponse};
use log::info;
use validator::Validate;

use crate::constants::{MSG_LOGIN_SUCCESS, MSG_LOGOUT_SUCCESS, MSG_USER_REGISTERED};
use crate::errors::ApiError;
use crate::middleware::{require_auth, RequestExt};
use crate::models::{
    AdminAuthResponse, ApiResponse, AuthResponse, LoginRequest, RegisterRequest, UserResponse,
};
use crate::services::{AuthService, TokenBlacklist, UserService};
use crate::validators::validation_errors_to_api_error;

/// Register a new customer account
#[utoipa::path(
    post,
    path = "/api/auth/register",
    tag = "Authentication",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User registered successfully", body = UserResponse),
        (status = 400, description = "Validation error", body = crate::models::ErrorResponse),
        (status = 409, description = "Email already exists", body = crate::models::ErrorResponse),
        (status = 429, description = "Too many requests")
    )
)]
pub async fn register(
    user_service: web::Data<UserService>,
    body: web::Json<RegisterRequest>,
) -> Result<HttpResponse, ApiError> {
    body.validate().map_err(validation_errors_to_api_error)?;

    let user = user_service.register(body.into_inner()).await?;
    let user_response: UserResponse = user.into();

    Ok(HttpResponse::Created().json(ApiResponse::success(MSG_USER_REGISTERED, user_response)))
}

/// Authenticate a customer and get a JWT token
#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "Authentication",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = AuthResponse),
        (status = 400, description = "Validation error", body = crate::models::ErrorResponse),
        (status = 401, description = "Invalid credentials or deactivated account", body = crate::models::ErrorResponse)
    )
)]
pub async fn login(
    auth_service: web::Data<AuthService>,
    body: web::Json<LoginRequest>,
) -> Result<HttpResponse, ApiError> {
    body.validate().map_err(validation_errors_to_api_error)?;

    let (user, token) = auth_service.login_user(body.into_inner()).await?;

    Ok(HttpResponse::Ok().json(AuthResponse {
        success: true,
        message: MSG_LOGIN_SUCCESS.to_string(),
        token,
        user: user.into(),
    }))
}

/// Authenticate an administrator
#[utoipa::path(
    post,
    path = "/api/admin/auth/login",
    tag = "Authentication",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = AdminAuthResponse),
        (status = 401, description = "Invalid credentials or deactivated account", body = crate::models::ErrorResponse)
    )
)]
pub async fn admin_login(
    auth_service: web::Data<AuthService>,
    body: web::Json<LoginRequest>,
) -> Result<HttpResponse, ApiError> {
    body.validate().map_err(validation_errors_to_api_error)?;

    let (admin, token) = auth_service.login_admin(body.into_inner()).await?;

    Ok(HttpResponse::Ok().json(AdminAuthResponse {
        success: true,
        message: MSG_LOGIN_SUCCESS.to_string(),
        token,
        admin: admin.into(),
    }))
}

/// Logout the current account
///
/// The presented token is blacklisted server-side until its natural expiry.
#[utoipa::path(
    post,
    path = "/api/auth/logout",
    tag = "Authentication",
    responses(
        (status = 200, description = "Logout successful"),
        (status = 401, description = "Invalid or missing token", body = crate::models::ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn logout(
    req: HttpRequest,
    token_blacklist: web::Data<TokenBlacklist>,
) -> Result<HttpResponse, ApiError> {
    let claims = require_auth(&req)?;

    if let Some(token) = req.get_token() {
        token_blacklist.blacklist_token(&token, claims.exp).await;
        info!("Account {} logged out", claims.sub);
    }

    Ok(HttpResponse::Ok().json(ApiResponse::<()>::message(MSG_LOGOUT_SUCCESS)))
}
