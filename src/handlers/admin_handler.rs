//! Back-office handlers: admin profile, dashboard, customers and admin accounts.

use actix_web::{web, HttpRequest, HttpResponse};
use log::info;
use validator::Validate;

use crate::constants::{
    MSG_ADMIN_CREATED, MSG_ADMIN_PROFILE, MSG_ADMIN_STATUS_UPDATED, MSG_DASHBOARD,
    MSG_USER_ACTIVATED, MSG_USER_DEACTIVATED,
};
use crate::errors::ApiError;
use crate::middleware::{require_admin, require_auth, require_superadmin};
use crate::models::{
    AdminResponse, ApiResponse, BulkUpdateStatusRequest, CreateAdminRequest, PageQuery,
    UpdateStatusRequest, UserListQuery, UserResponse,
};
use crate::services::{AdminService, DashboardService, UserService};
use crate::validators::{validate_bulk_ids, validation_errors_to_api_error};

/// Get the current administrator's profile
#[utoipa::path(
    get,
    path = "/api/admin/me",
    tag = "Admin",
    responses(
        (status = 200, description = "Admin profile", body = AdminResponse),
        (status = 403, description = "Not an administrator", body = crate::models::ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_current_admin(
    admin_service: web::Data<AdminService>,
    req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
    let claims = require_auth(&req)?;
    require_admin(&claims)?;

    let admin = admin_service.get_admin(&claims.sub).await?;
    let admin_response: AdminResponse = admin.into();
    Ok(HttpResponse::Ok().json(ApiResponse::success(MSG_ADMIN_PROFILE, admin_response)))
}

/// Marketplace overview for the back office
#[utoipa::path(
    get,
    path = "/api/admin/dashboard",
    tag = "Admin",
    responses(
        (status = 200, description = "Dashboard statistics", body = crate::models::DashboardStats),
        (status = 403, description = "Not an administrator", body = crate::models::ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_dashboard(
    dashboard_service: web::Data<DashboardService>,
    req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
    let claims = require_auth(&req)?;
    require_admin(&claims)?;

    let stats = dashboard_service.stats().await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(MSG_DASHBOARD, stats)))
}

/// List customer accounts with pagination and optional filters
#[utoipa::path(
    get,
    path = "/api/admin/users",
    tag = "Admin",
    params(
        ("page" = Option<u64>, Query, description = "Page number (default: 1)"),
        ("per_page" = Option<u64>, Query, description = "Items per page (default: 10, max: 100)"),
        ("is_active" = Option<bool>, Query, description = "Filter by active status"),
        ("search" = Option<String>, Query, description = "Search by email or name")
    ),
    responses(
        (status = 200, description = "List of users", body = crate::models::PaginatedUsers),
        (status = 403, description = "Not an administrator", body = crate::models::ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn list_users(
    user_service: web::Data<UserService>,
    query: web::Query<UserListQuery>,
    req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
    let claims = require_auth(&req)?;
    require_admin(&claims)?;

    let page = user_service.list_users(&query).await?;
    Ok(HttpResponse::Ok().json(page))
}

/// Activate or deactivate a customer account
#[utoipa::path(
    patch,
    path = "/api/admin/users/{id}/status",
    tag = "Admin",
    params(
        ("id" = String, Path, description = "User ID")
    ),
    request_body = UpdateStatusRequest,
    responses(
        (status = 200, description = "Status updated", body = UserResponse),
        (status = 404, description = "User not found", body = crate::models::ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn update_user_status(
    user_service: web::Data<UserService>,
    path: web::Path<String>,
    body: web::Json<UpdateStatusRequest>,
    req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
    let claims = require_auth(&req)?;
    require_admin(&claims)?;

    let user_id = path.into_inner();
    let user = user_service.update_status(&user_id, body.is_active).await?;
    let user_response: UserResponse = user.into();

    let message = if body.is_active {
        MSG_USER_ACTIVATED
    } else {
        MSG_USER_DEACTIVATED
    };
    Ok(HttpResponse::Ok().json(ApiResponse::success(message, user_response)))
}

/// Bulk activate or deactivate customer accounts
///
/// Each id is processed independently; the response reports the outcome per id.
#[utoipa::path(
    patch,
    path = "/api/admin/users/bulk-status",
    tag = "Admin",
    request_body = BulkUpdateStatusRequest,
    responses(
        (status = 200, description = "Bulk update completed", body = crate::models::BulkUpdateResponse),
        (status = 400, description = "Empty or oversized id list", body = crate::models::ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn bulk_update_user_status(
    user_service: web::Data<UserService>,
    body: web::Json<BulkUpdateStatusRequest>,
    req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
    let claims = require_auth(&req)?;
    require_admin(&claims)?;
    validate_bulk_ids(&body.user_ids)?;

    info!(
        "Admin {} performing bulk {} on {} users",
        claims.sub,
        if body.is_active {
            "activation"
        } else {
            "deactivation"
        },
        body.user_ids.len()
    );

    let response = user_service
        .bulk_update_status(&body.user_ids, body.is_active)
        .await?;
    Ok(HttpResponse::Ok().json(response))
}

/// List administrator accounts (superadmin only)
#[utoipa::path(
    get,
    path = "/api/admin/admins",
    tag = "Admin",
    params(
        ("page" = Option<u64>, Query, description = "Page number (default: 1)"),
        ("per_page" = Option<u64>, Query, description = "Items per page (default: 10, max: 100)")
    ),
    responses(
        (status = 200, description = "List of admins", body = crate::models::PaginatedAdmins),
        (status = 403, description = "Superadmin required", body = crate::models::ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn list_admins(
    admin_service: web::Data<AdminService>,
    query: web::Query<PageQuery>,
    req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
    let claims = require_auth(&req)?;
    require_superadmin(&claims)?;

    let page = admin_service.list_admins(query.params()).await?;
    Ok(HttpResponse::Ok().json(page))
}

/// Create an administrator account (superadmin only)
#[utoipa::path(
    post,
    path = "/api/admin/admins",
    tag = "Admin",
    request_body = CreateAdminRequest,
    responses(
        (status = 201, description = "Admin created", body = AdminResponse),
        (status = 400, description = "Validation error", body = crate::models::ErrorResponse),
        (status = 403, description = "Superadmin required", body = crate::models::ErrorResponse),
        (status = 409, description = "Email already exists", body = crate::models::ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn create_admin(
    admin_service: web::Data<AdminService>,
    body: web::Json<CreateAdminRequest>,
    req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
    let claims = require_auth(&req)?;
    require_superadmin(&claims)?;
    body.validate().map_err(validation_errors_to_api_error)?;

    let admin = admin_service.create_admin(body.into_inner()).await?;
    let admin_response: AdminResponse = admin.into();
    Ok(HttpResponse::Created().json(ApiResponse::success(MSG_ADMIN_CREATED, admin_response)))
}

/// Activate or deactivate an administrator (superadmin only)
#[utoipa::path(
    patch,
    path = "/api/admin/admins/{id}/status",
    tag = "Admin",
    params(
        ("id" = String, Path, description = "Admin ID")
    ),
    request_body = UpdateStatusRequest,
    responses(
        (status = 200, description = "Status updated", body = AdminResponse),
        (status = 400, description = "Cannot deactivate yourself", body = crate::models::ErrorResponse),
        (status = 404, description = "Admin not found", body = crate::models::ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn update_admin_status(
    admin_service: web::Data<AdminService>,
    path: web::Path<String>,
    body: web::Json<UpdateStatusRequest>,
    req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
    let claims = require_auth(&req)?;
    require_superadmin(&claims)?;

    let admin = admin_service
        .update_status(&claims.sub, &path.into_inner(), body.is_active)
        .await?;
    let admin_response: AdminResponse = admin.into();
    Ok(HttpResponse::Ok().json(ApiResponse::success(MSG_ADMIN_STATUS_UPDATED, admin_response)))
}
