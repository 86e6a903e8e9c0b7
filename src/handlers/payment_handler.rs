//! Premium payment handlers: order creation, checkout verification and the
//! gateway webhook.

use actix_web::{web, HttpRequest, HttpResponse};
use validator::Validate;

use crate::constants::{MSG_ORDER_CREATED, MSG_PAYMENT_VERIFIED, MSG_WEBHOOK_ACCEPTED};
use crate::errors::ApiError;
use crate::middleware::{require_admin, require_auth, require_user};
use crate::models::{
    ApiResponse, CreateOrderRequest, PaymentListQuery, PolicyResponse, VerifyPaymentRequest,
};
use crate::services::PaymentService;
use crate::validators::validation_errors_to_api_error;

/// Header carrying the webhook body signature.
pub const WEBHOOK_SIGNATURE_HEADER: &str = "X-Razorpay-Signature";

/// Open a gateway order for a pending policy
#[utoipa::path(
    post,
    path = "/api/payments/orders",
    tag = "Payments",
    request_body = CreateOrderRequest,
    responses(
        (status = 200, description = "Order ready for checkout", body = crate::models::OrderResponse),
        (status = 409, description = "Policy is not awaiting payment", body = crate::models::ErrorResponse),
        (status = 502, description = "Payment gateway unavailable", body = crate::models::ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn create_order(
    payment_service: web::Data<PaymentService>,
    body: web::Json<CreateOrderRequest>,
    req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
    let claims = require_auth(&req)?;
    require_user(&claims)?;
    body.validate().map_err(validation_errors_to_api_error)?;

    let order = payment_service.create_order(&claims.sub, &body).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(MSG_ORDER_CREATED, order)))
}

/// Verify a checkout signature and activate the policy
#[utoipa::path(
    post,
    path = "/api/payments/verify",
    tag = "Payments",
    request_body = VerifyPaymentRequest,
    responses(
        (status = 200, description = "Payment verified", body = PolicyResponse),
        (status = 400, description = "Signature mismatch", body = crate::models::ErrorResponse),
        (status = 404, description = "Order not found", body = crate::models::ErrorResponse),
        (status = 409, description = "Policy is no longer awaiting payment", body = crate::models::ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn verify_payment(
    payment_service: web::Data<PaymentService>,
    body: web::Json<VerifyPaymentRequest>,
    req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
    let claims = require_auth(&req)?;
    require_user(&claims)?;
    body.validate().map_err(validation_errors_to_api_error)?;

    let policy = payment_service.verify(&claims.sub, &body).await?;
    let policy_response: PolicyResponse = policy.into();
    Ok(HttpResponse::Ok().json(ApiResponse::success(MSG_PAYMENT_VERIFIED, policy_response)))
}

/// Payment gateway webhook
///
/// The raw body is authenticated with the `X-Razorpay-Signature` header.
#[utoipa::path(
    post,
    path = "/api/payments/webhook",
    tag = "Payments",
    request_body(content = serde_json::Value, content_type = "application/json", description = "Gateway event payload"),
    responses(
        (status = 200, description = "Event processed or ignored"),
        (status = 400, description = "Bad signature or malformed event", body = crate::models::ErrorResponse)
    )
)]
pub async fn payment_webhook(
    payment_service: web::Data<PaymentService>,
    body: web::Bytes,
    req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
    let signature = req
        .headers()
        .get(WEBHOOK_SIGNATURE_HEADER)
        .and_then(|value| value.to_str().ok());

    payment_service.handle_webhook(&body, signature).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::<()>::message(MSG_WEBHOOK_ACCEPTED)))
}

/// The caller's payment history
#[utoipa::path(
    get,
    path = "/api/payments",
    tag = "Payments",
    params(
        ("page" = Option<u64>, Query, description = "Page number (default: 1)"),
        ("per_page" = Option<u64>, Query, description = "Items per page (default: 10, max: 100)"),
        ("status" = Option<String>, Query, description = "created, paid or failed")
    ),
    responses(
        (status = 200, description = "Payments", body = crate::models::PaginatedPayments)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn list_payments(
    payment_service: web::Data<PaymentService>,
    query: web::Query<PaymentListQuery>,
    req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
    let claims = require_auth(&req)?;
    require_user(&claims)?;

    let page = payment_service.list_for_user(&claims.sub, &query).await?;
    Ok(HttpResponse::Ok().json(page))
}

/// Every payment log (admin only)
#[utoipa::path(
    get,
    path = "/api/admin/payments",
    tag = "Admin",
    params(
        ("page" = Option<u64>, Query, description = "Page number (default: 1)"),
        ("per_page" = Option<u64>, Query, description = "Items per page (default: 10, max: 100)"),
        ("status" = Option<String>, Query, description = "created, paid or failed")
    ),
    responses(
        (status = 200, description = "Payments", body = crate::models::PaginatedPayments)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn admin_list_payments(
    payment_service: web::Data<PaymentService>,
    query: web::Query<PaymentListQuery>,
    req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
    let claims = require_auth(&req)?;
    require_admin(&claims)?;

    let page = payment_service.list_admin(&query).await?;
    Ok(HttpResponse::Ok().json(page))
}
