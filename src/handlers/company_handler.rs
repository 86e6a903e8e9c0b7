//! Company catalogue handlers: public browsing, reviews and admin management.

use actix_multipart::Multipart;
use actix_web::{web, HttpRequest, HttpResponse};
use log::info;
use validator::Validate;

use crate::constants::{
    MSG_COMPANY_CREATED, MSG_COMPANY_DELETED, MSG_COMPANY_FOUND, MSG_COMPANY_STATUS_UPDATED,
    MSG_COMPANY_UPDATED, MSG_LOGO_UPLOADED, MSG_REVIEW_CREATED,
};
use crate::errors::ApiError;
use crate::middleware::{require_admin, require_auth, require_user};
use crate::models::{
    ApiResponse, CompanyListQuery, CompanyResponse, CreateCompanyRequest, CreateReviewRequest,
    PageQuery, ReviewResponse, UpdateCompanyRequest, UpdateStatusRequest,
};
use crate::services::CompanyService;
use crate::validators::validation_errors_to_api_error;

/// Browse active insurance companies
///
/// Results are cached when Redis is configured.
#[utoipa::path(
    get,
    path = "/api/companies",
    tag = "Companies",
    params(
        ("page" = Option<u64>, Query, description = "Page number (default: 1)"),
        ("per_page" = Option<u64>, Query, description = "Items per page (default: 10, max: 100)"),
        ("search" = Option<String>, Query, description = "Case-insensitive match on name or description"),
        ("coverage_type" = Option<String>, Query, description = "basic, standard or comprehensive"),
        ("cargo_type" = Option<String>, Query, description = "Only companies insuring this cargo type"),
        ("min_rating" = Option<f64>, Query, description = "Minimum average rating"),
        ("sort_by" = Option<String>, Query, description = "rating (default), premium, name, settlement or newest"),
        ("order" = Option<String>, Query, description = "asc or desc")
    ),
    responses(
        (status = 200, description = "List of companies", body = crate::models::PaginatedCompanies)
    )
)]
pub async fn list_companies(
    company_service: web::Data<CompanyService>,
    query: web::Query<CompanyListQuery>,
) -> Result<HttpResponse, ApiError> {
    let page = company_service.list_public(&query).await?;
    Ok(HttpResponse::Ok().json(page))
}

/// Get an active company by ID
#[utoipa::path(
    get,
    path = "/api/companies/{id}",
    tag = "Companies",
    params(
        ("id" = String, Path, description = "Company ID")
    ),
    responses(
        (status = 200, description = "Company found", body = CompanyResponse),
        (status = 404, description = "Company not found or inactive", body = crate::models::ErrorResponse)
    )
)]
pub async fn get_company(
    company_service: web::Data<CompanyService>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let company = company_service.get_public(&path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(MSG_COMPANY_FOUND, company)))
}

/// List a company's reviews, newest first
#[utoipa::path(
    get,
    path = "/api/companies/{id}/reviews",
    tag = "Companies",
    params(
        ("id" = String, Path, description = "Company ID"),
        ("page" = Option<u64>, Query, description = "Page number (default: 1)"),
        ("per_page" = Option<u64>, Query, description = "Items per page (default: 10, max: 100)")
    ),
    responses(
        (status = 200, description = "Reviews", body = crate::models::PaginatedReviews),
        (status = 404, description = "Company not found", body = crate::models::ErrorResponse)
    )
)]
pub async fn list_reviews(
    company_service: web::Data<CompanyService>,
    path: web::Path<String>,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse, ApiError> {
    let page = company_service
        .list_reviews(&path.into_inner(), query.params())
        .await?;
    Ok(HttpResponse::Ok().json(page))
}

/// Review a company (one review per customer)
#[utoipa::path(
    post,
    path = "/api/companies/{id}/reviews",
    tag = "Companies",
    params(
        ("id" = String, Path, description = "Company ID")
    ),
    request_body = CreateReviewRequest,
    responses(
        (status = 201, description = "Review created", body = ReviewResponse),
        (status = 400, description = "Validation error", body = crate::models::ErrorResponse),
        (status = 409, description = "Already reviewed", body = crate::models::ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn create_review(
    company_service: web::Data<CompanyService>,
    path: web::Path<String>,
    body: web::Json<CreateReviewRequest>,
    req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
    let claims = require_auth(&req)?;
    require_user(&claims)?;
    body.validate().map_err(validation_errors_to_api_error)?;

    let review = company_service
        .add_review(&path.into_inner(), &claims.sub, body.into_inner())
        .await?;
    let review_response: ReviewResponse = review.into();
    Ok(HttpResponse::Created().json(ApiResponse::success(MSG_REVIEW_CREATED, review_response)))
}

/// List all companies, including inactive ones (admin only)
#[utoipa::path(
    get,
    path = "/api/admin/companies",
    tag = "Admin",
    params(
        ("page" = Option<u64>, Query, description = "Page number (default: 1)"),
        ("per_page" = Option<u64>, Query, description = "Items per page (default: 10, max: 100)"),
        ("search" = Option<String>, Query, description = "Case-insensitive match on name or description"),
        ("is_active" = Option<bool>, Query, description = "Filter by active status"),
        ("sort_by" = Option<String>, Query, description = "rating (default), premium, name, settlement or newest"),
        ("order" = Option<String>, Query, description = "asc or desc")
    ),
    responses(
        (status = 200, description = "List of companies", body = crate::models::PaginatedCompanies),
        (status = 403, description = "Not an administrator", body = crate::models::ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn admin_list_companies(
    company_service: web::Data<CompanyService>,
    query: web::Query<CompanyListQuery>,
    req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
    let claims = require_auth(&req)?;
    require_admin(&claims)?;

    let page = company_service.list_admin(&query).await?;
    Ok(HttpResponse::Ok().json(page))
}

/// List a new company (admin only)
#[utoipa::path(
    post,
    path = "/api/admin/companies",
    tag = "Admin",
    request_body = CreateCompanyRequest,
    responses(
        (status = 201, description = "Company created", body = CompanyResponse),
        (status = 400, description = "Validation error", body = crate::models::ErrorResponse),
        (status = 409, description = "A company with this name exists", body = crate::models::ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn create_company(
    company_service: web::Data<CompanyService>,
    body: web::Json<CreateCompanyRequest>,
    req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
    let claims = require_auth(&req)?;
    require_admin(&claims)?;
    body.validate().map_err(validation_errors_to_api_error)?;

    let company = company_service.create(body.into_inner()).await?;
    info!("Admin {} created company {}", claims.sub, company.slug);
    let company_response: CompanyResponse = company.into();
    Ok(HttpResponse::Created().json(ApiResponse::success(MSG_COMPANY_CREATED, company_response)))
}

/// Partially update a company (admin only)
#[utoipa::path(
    put,
    path = "/api/admin/companies/{id}",
    tag = "Admin",
    params(
        ("id" = String, Path, description = "Company ID")
    ),
    request_body = UpdateCompanyRequest,
    responses(
        (status = 200, description = "Company updated", body = CompanyResponse),
        (status = 404, description = "Company not found", body = crate::models::ErrorResponse),
        (status = 409, description = "A company with this name exists", body = crate::models::ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn update_company(
    company_service: web::Data<CompanyService>,
    path: web::Path<String>,
    body: web::Json<UpdateCompanyRequest>,
    req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
    let claims = require_auth(&req)?;
    require_admin(&claims)?;
    body.validate().map_err(validation_errors_to_api_error)?;

    let company = company_service
        .update(&path.into_inner(), body.into_inner())
        .await?;
    let company_response: CompanyResponse = company.into();
    Ok(HttpResponse::Ok().json(ApiResponse::success(MSG_COMPANY_UPDATED, company_response)))
}

/// Activate or deactivate a company (admin only)
#[utoipa::path(
    patch,
    path = "/api/admin/companies/{id}/status",
    tag = "Admin",
    params(
        ("id" = String, Path, description = "Company ID")
    ),
    request_body = UpdateStatusRequest,
    responses(
        (status = 200, description = "Status updated", body = CompanyResponse),
        (status = 404, description = "Company not found", body = crate::models::ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn update_company_status(
    company_service: web::Data<CompanyService>,
    path: web::Path<String>,
    body: web::Json<UpdateStatusRequest>,
    req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
    let claims = require_auth(&req)?;
    require_admin(&claims)?;

    let company = company_service
        .set_status(&path.into_inner(), body.is_active)
        .await?;
    let company_response: CompanyResponse = company.into();
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        MSG_COMPANY_STATUS_UPDATED,
        company_response,
    )))
}

/// Delete a company that has never sold a policy (admin only)
#[utoipa::path(
    delete,
    path = "/api/admin/companies/{id}",
    tag = "Admin",
    params(
        ("id" = String, Path, description = "Company ID")
    ),
    responses(
        (status = 200, description = "Company deleted"),
        (status = 404, description = "Company not found", body = crate::models::ErrorResponse),
        (status = 409, description = "Company has policies", body = crate::models::ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn delete_company(
    company_service: web::Data<CompanyService>,
    path: web::Path<String>,
    req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
    let claims = require_auth(&req)?;
    require_admin(&claims)?;

    let company_id = path.into_inner();
    company_service.delete(&company_id).await?;
    info!("Admin {} deleted company {}", claims.sub, company_id);
    Ok(HttpResponse::Ok().json(ApiResponse::<()>::message(MSG_COMPANY_DELETED)))
}

/// Upload a company logo (admin only)
///
/// Multipart field `logo`. Accepts JPEG, PNG, WebP and SVG up to 2MB.
#[utoipa::path(
    post,
    path = "/api/admin/companies/{id}/logo",
    tag = "Admin",
    params(
        ("id" = String, Path, description = "Company ID")
    ),
    request_body(content = Vec<u8>, content_type = "multipart/form-data", description = "Logo image file"),
    responses(
        (status = 200, description = "Logo uploaded", body = CompanyResponse),
        (status = 400, description = "Invalid file type or size", body = crate::models::ErrorResponse),
        (status = 404, description = "Company not found", body = crate::models::ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn upload_logo(
    company_service: web::Data<CompanyService>,
    path: web::Path<String>,
    mut payload: Multipart,
    req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
    let claims = require_auth(&req)?;
    require_admin(&claims)?;

    let company = company_service
        .upload_logo(&path.into_inner(), &mut payload)
        .await?;
    let company_response: CompanyResponse = company.into();
    Ok(HttpResponse::Ok().json(ApiResponse::success(MSG_LOGO_UPLOADED, company_response)))
}
