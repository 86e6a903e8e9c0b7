//! Claim handlers for policyholders and the admin review desk.

use actix_multipart::Multipart;
use actix_web::{web, HttpRequest, HttpResponse};
use validator::Validate;

use crate::constants::{
    MSG_CLAIM_FOUND, MSG_CLAIM_REVIEWED, MSG_CLAIM_SUBMITTED, MSG_CLAIM_WITHDRAWN,
    MSG_DOCUMENT_UPLOADED,
};
use crate::errors::ApiError;
use crate::middleware::{require_admin, require_auth, require_user};
use crate::models::{
    ApiResponse, ClaimListQuery, ClaimResponse, CreateClaimRequest, ReviewClaimRequest,
};
use crate::services::ClaimService;
use crate::validators::validation_errors_to_api_error;

/// Lodge a claim against an active policy
#[utoipa::path(
    post,
    path = "/api/claims",
    tag = "Claims",
    request_body = CreateClaimRequest,
    responses(
        (status = 201, description = "Claim submitted", body = ClaimResponse),
        (status = 400, description = "Policy not active, or date/amount outside cover", body = crate::models::ErrorResponse),
        (status = 409, description = "Another claim is open on this policy", body = crate::models::ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn create_claim(
    claim_service: web::Data<ClaimService>,
    body: web::Json<CreateClaimRequest>,
    req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
    let claims = require_auth(&req)?;
    require_user(&claims)?;
    body.validate().map_err(validation_errors_to_api_error)?;

    let claim = claim_service
        .create(&claims.sub, body.into_inner())
        .await?;
    let claim_response: ClaimResponse = claim.into();
    Ok(HttpResponse::Created().json(ApiResponse::success(MSG_CLAIM_SUBMITTED, claim_response)))
}

/// List the caller's claims
#[utoipa::path(
    get,
    path = "/api/claims",
    tag = "Claims",
    params(
        ("page" = Option<u64>, Query, description = "Page number (default: 1)"),
        ("per_page" = Option<u64>, Query, description = "Items per page (default: 10, max: 100)"),
        ("status" = Option<String>, Query, description = "submitted, under_review, approved, rejected, settled or withdrawn")
    ),
    responses(
        (status = 200, description = "Claims", body = crate::models::PaginatedClaims)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn list_claims(
    claim_service: web::Data<ClaimService>,
    query: web::Query<ClaimListQuery>,
    req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
    let claims = require_auth(&req)?;
    require_user(&claims)?;

    let page = claim_service.list_for_user(&claims.sub, &query).await?;
    Ok(HttpResponse::Ok().json(page))
}

/// Get one of the caller's claims
#[utoipa::path(
    get,
    path = "/api/claims/{id}",
    tag = "Claims",
    params(
        ("id" = String, Path, description = "Claim ID")
    ),
    responses(
        (status = 200, description = "Claim found", body = ClaimResponse),
        (status = 403, description = "Not the owner", body = crate::models::ErrorResponse),
        (status = 404, description = "Claim not found", body = crate::models::ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_claim(
    claim_service: web::Data<ClaimService>,
    path: web::Path<String>,
    req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
    let claims = require_auth(&req)?;
    require_user(&claims)?;

    let claim = claim_service
        .get_owned(&path.into_inner(), &claims.sub)
        .await?;
    let claim_response: ClaimResponse = claim.into();
    Ok(HttpResponse::Ok().json(ApiResponse::success(MSG_CLAIM_FOUND, claim_response)))
}

/// Attach a supporting document to a claim
///
/// Multipart field `document`. Accepts JPEG, PNG, WebP and PDF up to 10MB,
/// at most 10 documents per claim.
#[utoipa::path(
    post,
    path = "/api/claims/{id}/documents",
    tag = "Claims",
    params(
        ("id" = String, Path, description = "Claim ID")
    ),
    request_body(content = Vec<u8>, content_type = "multipart/form-data", description = "Supporting document"),
    responses(
        (status = 200, description = "Document uploaded", body = ClaimResponse),
        (status = 400, description = "Invalid file or document limit reached", body = crate::models::ErrorResponse),
        (status = 409, description = "Claim no longer accepts documents", body = crate::models::ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn upload_claim_document(
    claim_service: web::Data<ClaimService>,
    path: web::Path<String>,
    mut payload: Multipart,
    req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
    let claims = require_auth(&req)?;
    require_user(&claims)?;

    let claim = claim_service
        .upload_document(&path.into_inner(), &claims.sub, &mut payload)
        .await?;
    let claim_response: ClaimResponse = claim.into();
    Ok(HttpResponse::Ok().json(ApiResponse::success(MSG_DOCUMENT_UPLOADED, claim_response)))
}

/// Withdraw a claim that has not been picked up for review
#[utoipa::path(
    post,
    path = "/api/claims/{id}/withdraw",
    tag = "Claims",
    params(
        ("id" = String, Path, description = "Claim ID")
    ),
    responses(
        (status = 200, description = "Claim withdrawn", body = ClaimResponse),
        (status = 409, description = "Claim is already being reviewed", body = crate::models::ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn withdraw_claim(
    claim_service: web::Data<ClaimService>,
    path: web::Path<String>,
    req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
    let claims = require_auth(&req)?;
    require_user(&claims)?;

    let claim = claim_service
        .withdraw(&path.into_inner(), &claims.sub)
        .await?;
    let claim_response: ClaimResponse = claim.into();
    Ok(HttpResponse::Ok().json(ApiResponse::success(MSG_CLAIM_WITHDRAWN, claim_response)))
}

/// List every claim (admin only)
#[utoipa::path(
    get,
    path = "/api/admin/claims",
    tag = "Admin",
    params(
        ("page" = Option<u64>, Query, description = "Page number (default: 1)"),
        ("per_page" = Option<u64>, Query, description = "Items per page (default: 10, max: 100)"),
        ("status" = Option<String>, Query, description = "Filter by status"),
        ("company_id" = Option<String>, Query, description = "Filter by insurer")
    ),
    responses(
        (status = 200, description = "Claims", body = crate::models::PaginatedClaims)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn admin_list_claims(
    claim_service: web::Data<ClaimService>,
    query: web::Query<ClaimListQuery>,
    req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
    let claims = require_auth(&req)?;
    require_admin(&claims)?;

    let page = claim_service.list_admin(&query).await?;
    Ok(HttpResponse::Ok().json(page))
}

/// Get any claim (admin only)
#[utoipa::path(
    get,
    path = "/api/admin/claims/{id}",
    tag = "Admin",
    params(
        ("id" = String, Path, description = "Claim ID")
    ),
    responses(
        (status = 200, description = "Claim found", body = ClaimResponse),
        (status = 404, description = "Claim not found", body = crate::models::ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn admin_get_claim(
    claim_service: web::Data<ClaimService>,
    path: web::Path<String>,
    req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
    let claims = require_auth(&req)?;
    require_admin(&claims)?;

    let claim = claim_service.get(&path.into_inner()).await?;
    let claim_response: ClaimResponse = claim.into();
    Ok(HttpResponse::Ok().json(ApiResponse::success(MSG_CLAIM_FOUND, claim_response)))
}

/// Record a review decision on a claim (admin only)
///
/// Allowed moves: submitted to under_review or rejected, under_review to
/// approved or rejected, approved to settled.
#[utoipa::path(
    patch,
    path = "/api/admin/claims/{id}/review",
    tag = "Admin",
    params(
        ("id" = String, Path, description = "Claim ID")
    ),
    request_body = ReviewClaimRequest,
    responses(
        (status = 200, description = "Claim updated", body = ClaimResponse),
        (status = 400, description = "Transition not allowed or invalid amount", body = crate::models::ErrorResponse),
        (status = 409, description = "Claim changed while reviewing", body = crate::models::ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn review_claim(
    claim_service: web::Data<ClaimService>,
    path: web::Path<String>,
    body: web::Json<ReviewClaimRequest>,
    req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
    let claims = require_auth(&req)?;
    require_admin(&claims)?;
    body.validate().map_err(validation_errors_to_api_error)?;

    let claim = claim_service
        .review(&path.into_inner(), &claims.sub, body.into_inner())
        .await?;
    let claim_response: ClaimResponse = claim.into();
    Ok(HttpResponse::Ok().json(ApiResponse::success(MSG_CLAIM_REVIEWED, claim_response)))
}
