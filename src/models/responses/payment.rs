//! Payment response models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::{PaymentLog, PaymentStatus};
use crate::utils::time::{to_utc, to_utc_opt};

#[derive(Debug, Serialize, Deserialize, Clone, ToSchema)]
pub struct PaymentResponse {
    pub id: String,
    pub user_id: String,
    pub policy_id: String,
    #[schema(example = "order_JrR3mK9xYz12")]
    pub order_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_id: Option<String>,
    pub amount: i64,
    pub currency: String,
    pub status: PaymentStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure_reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paid_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl From<PaymentLog> for PaymentResponse {
    fn from(log: PaymentLog) -> Self {
        Self {
            id: log.id.map(|id| id.to_hex()).unwrap_or_default(),
            user_id: log.user_id.to_hex(),
            policy_id: log.policy_id.to_hex(),
            order_id: log.order_id,
            payment_id: log.payment_id,
            amount: log.amount,
            currency: log.currency,
            status: log.status,
            failure_reason: log.failure_reason,
            paid_at: to_utc_opt(log.paid_at),
            created_at: to_utc(log.created_at),
        }
    }
}

/// What the client needs to open the gateway checkout
#[derive(Debug, Serialize, ToSchema)]
pub struct OrderResponse {
    #[schema(example = "order_JrR3mK9xYz12")]
    pub order_id: String,
    /// Amount in minor units
    pub amount: i64,
    #[schema(example = "INR")]
    pub currency: String,
    /// Public gateway key for the checkout widget
    pub key_id: String,
    pub policy_id: String,
    pub policy_number: String,
}
