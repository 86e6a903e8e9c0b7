//! Self-service profile handlers for customer accounts.

use actix_web::{web, HttpRequest, HttpResponse};
use log::debug;
use validator::Validate;

use crate::constants::{MSG_PASSWORD_CHANGED, MSG_USER_PROFILE_RETRIEVED, MSG_USER_UPDATED};
use crate::errors::ApiError;
use crate::middleware::{require_auth, require_user};
use crate::models::{ApiResponse, ChangePasswordRequest, UpdateProfileRequest, UserResponse};
use crate::services::UserService;
use crate::validators::validation_errors_to_api_error;

/// Get the currently authenticated customer's profile
#[utoipa::path(
    get,
    path = "/api/users/me",
    tag = "Users",
    responses(
        (status = 200, description = "Current user profile", body = UserResponse),
        (status = 401, description = "Unauthorized", body = crate::models::ErrorResponse),
        (status = 404, description = "User not found", body = crate::models::ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_current_user(
    user_service: web::Data<UserService>,
    req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
    let claims = require_auth(&req)?;
    require_user(&claims)?;
    debug!("Fetching current user with id: {}", claims.sub);

    let user = user_service.get_user(&claims.sub).await?;
    let user_response: UserResponse = user.into();
    Ok(HttpResponse::Ok().json(ApiResponse::success(MSG_USER_PROFILE_RETRIEVED, user_response)))
}

/// Update the current customer's profile
#[utoipa::path(
    put,
    path = "/api/users/me",
    tag = "Users",
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Profile updated", body = UserResponse),
        (status = 400, description = "Validation error", body = crate::models::ErrorResponse),
        (status = 409, description = "Email already exists", body = crate::models::ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn update_current_user(
    user_service: web::Data<UserService>,
    req: HttpRequest,
    body: web::Json<UpdateProfileRequest>,
) -> Result<HttpResponse, ApiError> {
    let claims = require_auth(&req)?;
    require_user(&claims)?;
    body.validate().map_err(validation_errors_to_api_error)?;

    let user = user_service
        .update_profile(&claims.sub, body.into_inner())
        .await?;
    let user_response: UserResponse = user.into();
    Ok(HttpResponse::Ok().json(ApiResponse::success(MSG_USER_UPDATED, user_response)))
}

/// Change the current customer's password
#[utoipa::path(
    patch,
    path = "/api/users/me/password",
    tag = "Users",
    request_body = ChangePasswordRequest,
    responses(
        (status = 200, description = "Password changed"),
        (status = 400, description = "Passwords do not match or are unchanged", body = crate::models::ErrorResponse),
        (status = 401, description = "Current password is wrong", body = crate::models::ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn change_password(
    user_service: web::Data<UserService>,
    req: HttpRequest,
    body: web::Json<ChangePasswordRequest>,
) -> Result<HttpResponse, ApiError> {
    let claims = require_auth(&req)?;
    require_user(&claims)?;
    body.validate().map_err(validation_errors_to_api_error)?;

    user_service
        .change_password(&claims.sub, body.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::<()>::message(MSG_PASSWORD_CHANGED)))
}
