//! Shipment handlers for customers and the admin status workflow.

use actix_web::{web, HttpRequest, HttpResponse};
use validator::Validate;

use crate::constants::{
    MSG_SHIPMENT_CREATED, MSG_SHIPMENT_DELETED, MSG_SHIPMENT_FOUND, MSG_SHIPMENT_UPDATED,
};
use crate::errors::ApiError;
use crate::middleware::{require_admin, require_auth, require_user};
use crate::models::{
    ApiResponse, CreateShipmentRequest, ShipmentListQuery, ShipmentResponse,
    UpdateShipmentRequest, UpdateShipmentStatusRequest,
};
use crate::services::ShipmentService;
use crate::validators::validation_errors_to_api_error;

/// Register a shipment to insure
#[utoipa::path(
    post,
    path = "/api/shipments",
    tag = "Shipments",
    request_body = CreateShipmentRequest,
    responses(
        (status = 201, description = "Shipment created", body = ShipmentResponse),
        (status = 400, description = "Validation error", body = crate::models::ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn create_shipment(
    shipment_service: web::Data<ShipmentService>,
    body: web::Json<CreateShipmentRequest>,
    req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
    let claims = require_auth(&req)?;
    require_user(&claims)?;
    body.validate().map_err(validation_errors_to_api_error)?;

    let shipment = shipment_service
        .create(&claims.sub, body.into_inner())
        .await?;
    let shipment_response: ShipmentResponse = shipment.into();
    Ok(HttpResponse::Created().json(ApiResponse::success(MSG_SHIPMENT_CREATED, shipment_response)))
}

/// List the caller's shipments
#[utoipa::path(
    get,
    path = "/api/shipments",
    tag = "Shipments",
    params(
        ("page" = Option<u64>, Query, description = "Page number (default: 1)"),
        ("per_page" = Option<u64>, Query, description = "Items per page (default: 10, max: 100)"),
        ("status" = Option<String>, Query, description = "pending, in_transit, delivered or cancelled")
    ),
    responses(
        (status = 200, description = "Shipments", body = crate::models::PaginatedShipments)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn list_shipments(
    shipment_service: web::Data<ShipmentService>,
    query: web::Query<ShipmentListQuery>,
    req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
    let claims = require_auth(&req)?;
    require_user(&claims)?;

    let page = shipment_service.list_for_user(&claims.sub, &query).await?;
    Ok(HttpResponse::Ok().json(page))
}

/// Get one of the caller's shipments
#[utoipa::path(
    get,
    path = "/api/shipments/{id}",
    tag = "Shipments",
    params(
        ("id" = String, Path, description = "Shipment ID")
    ),
    responses(
        (status = 200, description = "Shipment found", body = ShipmentResponse),
        (status = 403, description = "Not the owner", body = crate::models::ErrorResponse),
        (status = 404, description = "Shipment not found", body = crate::models::ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_shipment(
    shipment_service: web::Data<ShipmentService>,
    path: web::Path<String>,
    req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
    let claims = require_auth(&req)?;
    require_user(&claims)?;

    let shipment = shipment_service
        .get_owned(&path.into_inner(), &claims.sub)
        .await?;
    let shipment_response: ShipmentResponse = shipment.into();
    Ok(HttpResponse::Ok().json(ApiResponse::success(MSG_SHIPMENT_FOUND, shipment_response)))
}

/// Edit a pending, uninsured shipment
#[utoipa::path(
    put,
    path = "/api/shipments/{id}",
    tag = "Shipments",
    params(
        ("id" = String, Path, description = "Shipment ID")
    ),
    request_body = UpdateShipmentRequest,
    responses(
        (status = 200, description = "Shipment updated", body = ShipmentResponse),
        (status = 400, description = "Validation error", body = crate::models::ErrorResponse),
        (status = 409, description = "Shipment is locked", body = crate::models::ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn update_shipment(
    shipment_service: web::Data<ShipmentService>,
    path: web::Path<String>,
    body: web::Json<UpdateShipmentRequest>,
    req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
    let claims = require_auth(&req)?;
    require_user(&claims)?;
    body.validate().map_err(validation_errors_to_api_error)?;

    let shipment = shipment_service
        .update(&path.into_inner(), &claims.sub, body.into_inner())
        .await?;
    let shipment_response: ShipmentResponse = shipment.into();
    Ok(HttpResponse::Ok().json(ApiResponse::success(MSG_SHIPMENT_UPDATED, shipment_response)))
}

/// Delete a pending, uninsured shipment
#[utoipa::path(
    delete,
    path = "/api/shipments/{id}",
    tag = "Shipments",
    params(
        ("id" = String, Path, description = "Shipment ID")
    ),
    responses(
        (status = 200, description = "Shipment deleted"),
        (status = 409, description = "Shipment is locked", body = crate::models::ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn delete_shipment(
    shipment_service: web::Data<ShipmentService>,
    path: web::Path<String>,
    req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
    let claims = require_auth(&req)?;
    require_user(&claims)?;

    shipment_service
        .delete(&path.into_inner(), &claims.sub)
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::<()>::message(MSG_SHIPMENT_DELETED)))
}

/// List every shipment (admin only)
#[utoipa::path(
    get,
    path = "/api/admin/shipments",
    tag = "Admin",
    params(
        ("page" = Option<u64>, Query, description = "Page number (default: 1)"),
        ("per_page" = Option<u64>, Query, description = "Items per page (default: 10, max: 100)"),
        ("status" = Option<String>, Query, description = "Filter by status"),
        ("user_id" = Option<String>, Query, description = "Filter by owner")
    ),
    responses(
        (status = 200, description = "Shipments", body = crate::models::PaginatedShipments)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn admin_list_shipments(
    shipment_service: web::Data<ShipmentService>,
    query: web::Query<ShipmentListQuery>,
    req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
    let claims = require_auth(&req)?;
    require_admin(&claims)?;

    let page = shipment_service.list_admin(&query).await?;
    Ok(HttpResponse::Ok().json(page))
}

/// Get any shipment (admin only)
#[utoipa::path(
    get,
    path = "/api/admin/shipments/{id}",
    tag = "Admin",
    params(
        ("id" = String, Path, description = "Shipment ID")
    ),
    responses(
        (status = 200, description = "Shipment found", body = ShipmentResponse),
        (status = 404, description = "Shipment not found", body = crate::models::ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn admin_get_shipment(
    shipment_service: web::Data<ShipmentService>,
    path: web::Path<String>,
    req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
    let claims = require_auth(&req)?;
    require_admin(&claims)?;

    let shipment = shipment_service.get(&path.into_inner()).await?;
    let shipment_response: ShipmentResponse = shipment.into();
    Ok(HttpResponse::Ok().json(ApiResponse::success(MSG_SHIPMENT_FOUND, shipment_response)))
}

/// Move a shipment along its lifecycle (admin only)
#[utoipa::path(
    patch,
    path = "/api/admin/shipments/{id}/status",
    tag = "Admin",
    params(
        ("id" = String, Path, description = "Shipment ID")
    ),
    request_body = UpdateShipmentStatusRequest,
    responses(
        (status = 200, description = "Status updated", body = ShipmentResponse),
        (status = 400, description = "Transition not allowed", body = crate::models::ErrorResponse),
        (status = 404, description = "Shipment not found", body = crate::models::ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn update_shipment_status(
    shipment_service: web::Data<ShipmentService>,
    path: web::Path<String>,
    body: web::Json<UpdateShipmentStatusRequest>,
    req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
    let claims = require_auth(&req)?;
    require_admin(&claims)?;

    let shipment = shipment_service
        .update_status(&path.into_inner(), body.status)
        .await?;
    let shipment_response: ShipmentResponse = shipment.into();
    Ok(HttpResponse::Ok().json(ApiResponse::success(MSG_SHIPMENT_UPDATED, shipment_response)))
}
