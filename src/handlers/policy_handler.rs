//! Policy handlers: quoting, purchase and cancellation.

use actix_web::{web, HttpRequest, HttpResponse};
use validator::Validate;

use crate::constants::{
    MSG_POLICY_CANCELLED, MSG_POLICY_CREATED, MSG_POLICY_FOUND, MSG_QUOTE_CALCULATED,
};
use crate::errors::ApiError;
use crate::middleware::{require_admin, require_auth, require_user};
use crate::models::{ApiResponse, PolicyListQuery, PolicyResponse, QuoteRequest};
use crate::services::PolicyService;
use crate::validators::validation_errors_to_api_error;

/// Price cover for a shipment without creating anything
#[utoipa::path(
    post,
    path = "/api/policies/quote",
    tag = "Policies",
    request_body = QuoteRequest,
    responses(
        (status = 200, description = "Premium breakdown", body = crate::models::QuoteResponse),
        (status = 400, description = "Coverage unsupported or cargo value too high", body = crate::models::ErrorResponse),
        (status = 404, description = "Shipment or company not found", body = crate::models::ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn quote_policy(
    policy_service: web::Data<PolicyService>,
    body: web::Json<QuoteRequest>,
    req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
    let claims = require_auth(&req)?;
    require_user(&claims)?;
    body.validate().map_err(validation_errors_to_api_error)?;

    let quote = policy_service.quote(&claims.sub, &body).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(MSG_QUOTE_CALCULATED, quote)))
}

/// Buy a policy; it stays `pending_payment` until the premium is paid
#[utoipa::path(
    post,
    path = "/api/policies",
    tag = "Policies",
    request_body = QuoteRequest,
    responses(
        (status = 201, description = "Policy created", body = PolicyResponse),
        (status = 400, description = "Shipment not insurable or coverage invalid", body = crate::models::ErrorResponse),
        (status = 409, description = "Shipment already insured", body = crate::models::ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn create_policy(
    policy_service: web::Data<PolicyService>,
    body: web::Json<QuoteRequest>,
    req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
    let claims = require_auth(&req)?;
    require_user(&claims)?;
    body.validate().map_err(validation_errors_to_api_error)?;

    let policy = policy_service.create(&claims.sub, &body).await?;
    let policy_response: PolicyResponse = policy.into();
    Ok(HttpResponse::Created().json(ApiResponse::success(MSG_POLICY_CREATED, policy_response)))
}

/// List the caller's policies
#[utoipa::path(
    get,
    path = "/api/policies",
    tag = "Policies",
    params(
        ("page" = Option<u64>, Query, description = "Page number (default: 1)"),
        ("per_page" = Option<u64>, Query, description = "Items per page (default: 10, max: 100)"),
        ("status" = Option<String>, Query, description = "pending_payment, active, expired, claimed or cancelled")
    ),
    responses(
        (status = 200, description = "Policies", body = crate::models::PaginatedPolicies)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn list_policies(
    policy_service: web::Data<PolicyService>,
    query: web::Query<PolicyListQuery>,
    req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
    let claims = require_auth(&req)?;
    require_user(&claims)?;

    let page = policy_service.list_for_user(&claims.sub, &query).await?;
    Ok(HttpResponse::Ok().json(page))
}

/// Get one of the caller's policies
#[utoipa::path(
    get,
    path = "/api/policies/{id}",
    tag = "Policies",
    params(
        ("id" = String, Path, description = "Policy ID")
    ),
    responses(
        (status = 200, description = "Policy found", body = PolicyResponse),
        (status = 403, description = "Not the owner", body = crate::models::ErrorResponse),
        (status = 404, description = "Policy not found", body = crate::models::ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_policy(
    policy_service: web::Data<PolicyService>,
    path: web::Path<String>,
    req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
    let claims = require_auth(&req)?;
    require_user(&claims)?;

    let policy = policy_service
        .get_owned(&path.into_inner(), &claims.sub)
        .await?;
    let policy_response: PolicyResponse = policy.into();
    Ok(HttpResponse::Ok().json(ApiResponse::success(MSG_POLICY_FOUND, policy_response)))
}

/// Cancel an unpaid policy
#[utoipa::path(
    post,
    path = "/api/policies/{id}/cancel",
    tag = "Policies",
    params(
        ("id" = String, Path, description = "Policy ID")
    ),
    responses(
        (status = 200, description = "Policy cancelled", body = PolicyResponse),
        (status = 409, description = "Policy is no longer pending payment", body = crate::models::ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn cancel_policy(
    policy_service: web::Data<PolicyService>,
    path: web::Path<String>,
    req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
    let claims = require_auth(&req)?;
    require_user(&claims)?;

    let policy = policy_service
        .cancel(&path.into_inner(), &claims.sub)
        .await?;
    let policy_response: PolicyResponse = policy.into();
    Ok(HttpResponse::Ok().json(ApiResponse::success(MSG_POLICY_CANCELLED, policy_response)))
}

/// List every policy (admin only)
#[utoipa::path(
    get,
    path = "/api/admin/policies",
    tag = "Admin",
    params(
        ("page" = Option<u64>, Query, description = "Page number (default: 1)"),
        ("per_page" = Option<u64>, Query, description = "Items per page (default: 10, max: 100)"),
        ("status" = Option<String>, Query, description = "Filter by status"),
        ("company_id" = Option<String>, Query, description = "Filter by insurer")
    ),
    responses(
        (status = 200, description = "Policies", body = crate::models::PaginatedPolicies)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn admin_list_policies(
    policy_service: web::Data<PolicyService>,
    query: web::Query<PolicyListQuery>,
    req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
    let claims = require_auth(&req)?;
    require_admin(&claims)?;

    let page = policy_service.list_admin(&query).await?;
    Ok(HttpResponse::Ok().json(page))
}
