//! Payment request models.

use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::models::PaymentStatus;

/// Request payload for opening a gateway order for a policy premium
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateOrderRequest {
    #[validate(length(equal = 24, message = "Invalid policy ID"))]
    #[schema(example = "507f1f77bcf86cd799439011")]
    pub policy_id: String,
}

/// Checkout callback forwarded by the client after payment
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct VerifyPaymentRequest {
    #[validate(length(min = 1, message = "Order ID is required"))]
    #[schema(example = "order_JrR3mK9xYz12")]
    pub order_id: String,
    #[validate(length(min = 1, message = "Payment ID is required"))]
    #[schema(example = "pay_JrR4aB7cDe34")]
    pub payment_id: String,
    #[validate(length(equal = 64, message = "Signature must be a hex-encoded SHA-256 HMAC"))]
    pub signature: String,
}

/// Query parameters for payment listings
#[derive(Debug, Deserialize)]
pub struct PaymentListQuery {
    pub page: Option<u64>,
    pub per_page: Option<u64>,
    pub status: Option<PaymentStatus>,
}
