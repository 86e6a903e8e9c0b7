//! Razorpay-style payment gateway client and HMAC signature checks.

use std::time::Duration;

use async_trait::async_trait;
use hmac::{Hmac, Mac};
use log::{error, info};
use serde::{Deserialize, Serialize};
use sha2::Sha256;

use crate::constants::{CODE_PAYMENT_GATEWAY_ERROR, ERR_PAYMENT_GATEWAY};
use crate::errors::ApiError;
use crate::utils::log_sanitizer::mask_reference;

type HmacSha256 = Hmac<Sha256>;

const GATEWAY_TIMEOUT: Duration = Duration::from_secs(15);

/// Order creation request sent to the gateway.
#[derive(Debug, Serialize)]
pub struct NewOrder {
    /// Minor currency units
    pub amount: i64,
    pub currency: String,
    /// Our reference, shown in the gateway dashboard
    pub receipt: String,
    pub notes: OrderNotes,
}

#[derive(Debug, Serialize)]
pub struct OrderNotes {
    pub policy_id: String,
    pub user_id: String,
}

/// The part of the gateway's order response we keep.
#[derive(Debug, Clone, Deserialize)]
pub struct GatewayOrder {
    pub id: String,
    pub amount: i64,
    pub currency: String,
}

/// Outbound seam to the payment provider, faked in tests.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn create_order(&self, order: &NewOrder) -> Result<GatewayOrder, ApiError>;

    /// Public key handed to the checkout widget.
    fn key_id(&self) -> &str;
}

pub struct HttpPaymentGateway {
    client: reqwest::Client,
    base_url: String,
    key_id: String,
    key_secret: String,
}

impl HttpPaymentGateway {
    pub fn new(base_url: &str, key_id: &str, key_secret: &str) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(GATEWAY_TIMEOUT).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            key_id: key_id.to_string(),
            key_secret: key_secret.to_string(),
        })
    }
}

#[async_trait]
impl PaymentGateway for HttpPaymentGateway {
    async fn create_order(&self, order: &NewOrder) -> Result<GatewayOrder, ApiError> {
        let response = self
            .client
            .post(format!("{}/orders", self.base_url))
            .basic_auth(&self.key_id, Some(&self.key_secret))
            .json(order)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("Gateway rejected order for {}: {} {}", order.receipt, status, body);
            return Err(ApiError::BadGateway {
                code: CODE_PAYMENT_GATEWAY_ERROR.to_string(),
                message: ERR_PAYMENT_GATEWAY.to_string(),
            });
        }

        let created: GatewayOrder = response.json().await?;
        info!(
            "Gateway order {} opened for {}",
            mask_reference(&created.id),
            order.receipt
        );
        Ok(created)
    }

    fn key_id(&self) -> &str {
        &self.key_id
    }
}

/// Hex-encoded HMAC-SHA256 of `message`.
pub fn sign(secret: &str, message: &[u8]) -> Result<String, ApiError> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|e| ApiError::internal(format!("HMAC key rejected: {}", e)))?;
    mac.update(message);
    Ok(hex::encode(mac.finalize().into_bytes()))
}

/// Constant-time comparison of a hex signature against the expected HMAC.
/// An unset secret never verifies.
pub fn verify_signature(secret: &str, message: &[u8], signature_hex: &str) -> bool {
    if secret.is_empty() {
        return false;
    }
    let Ok(provided) = hex::decode(signature_hex.trim()) else {
        return false;
    };
    let Ok(mut mac) = HmacSha256::new_from_slice(secret.as_bytes()) else {
        return false;
    };
    mac.update(message);
    mac.verify_slice(&provided).is_ok()
}

/// Checkout callback signature: `HMAC(key_secret, "<order_id>|<payment_id>")`.
pub fn verify_payment_signature(
    key_secret: &str,
    order_id: &str,
    payment_id: &str,
    signature: &str,
) -> bool {
    let message = format!("{}|{}", order_id, payment_id);
    verify_signature(key_secret, message.as_bytes(), signature)
}

/// Webhook signature: `HMAC(webhook_secret, raw_body)`.
pub fn verify_webhook_signature(webhook_secret: &str, body: &[u8], signature: &str) -> bool {
    verify_signature(webhook_secret, body, signature)
}

/// Webhook envelope. Only the payment entity is read.
#[derive(Debug, Deserialize)]
pub struct WebhookEvent {
    pub event: String,
    #[serde(default)]
    pub payload: WebhookPayload,
}

#[derive(Debug, Default, Deserialize)]
pub struct WebhookPayload {
    pub payment: Option<WebhookEntity<WebhookPayment>>,
}

#[derive(Debug, Deserialize)]
pub struct WebhookEntity<T> {
    pub entity: T,
}

#[derive(Debug, Deserialize)]
pub struct WebhookPayment {
    pub id: String,
    pub order_id: Option<String>,
    pub error_description: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    const ORDER: &str = "order_IEIaMR65cu6nz3";
    const PAYMENT: &str = "pay_IH4NVgf4Dreq1l";
    const KNOWN_SIGNATURE: &str =
        "2d67c3fceac8e3487e54e2d6ea7815a350a8562ed56d521a80eb43a393e9ab52";

    #[test]
    fn test_payment_signature_matches_reference_value() {
        assert!(verify_payment_signature("test_secret", ORDER, PAYMENT, KNOWN_SIGNATURE));
        assert_eq!(
            sign("test_secret", format!("{}|{}", ORDER, PAYMENT).as_bytes()).unwrap(),
            KNOWN_SIGNATURE
        );
    }

    #[test]
    fn test_payment_signature_rejects_tampering() {
        assert!(!verify_payment_signature("other_secret", ORDER, PAYMENT, KNOWN_SIGNATURE));
        assert!(!verify_payment_signature("test_secret", ORDER, "pay_other", KNOWN_SIGNATURE));
        assert!(!verify_payment_signature("test_secret", ORDER, PAYMENT, "zz-not-hex"));
        assert!(!verify_payment_signature("test_secret", ORDER, PAYMENT, &KNOWN_SIGNATURE[..32]));
    }

    #[test]
    fn test_empty_secret_never_verifies() {
        let forged = sign("", b"anything").unwrap();
        assert!(!verify_signature("", b"anything", &forged));
    }

    #[test]
    fn test_webhook_signature_over_raw_body() {
        let body = br#"{"event":"payment.captured"}"#;
        let signature = "4673dd707ef4c41b987cb7fefe1583142dc702388c93145b7814b9ad3d3c183e";
        assert!(verify_webhook_signature("whsec", body, signature));
        assert!(!verify_webhook_signature("whsec", br#"{"event":"payment.failed"}"#, signature));
    }

    #[test]
    fn test_webhook_payload_parsing() {
        let event: WebhookEvent = serde_json::from_str(
            r#"{
                "event": "payment.failed",
                "payload": { "payment": { "entity": {
                    "id": "pay_1", "order_id": "order_1", "amount": 100,
                    "error_description": "Card declined"
                }}}
            }"#,
        )
        .unwrap();
        let payment = event.payload.payment.unwrap().entity;
        assert_eq!(event.event, "payment.failed");
        assert_eq!(payment.order_id.as_deref(), Some("order_1"));
        assert_eq!(payment.error_description.as_deref(), Some("Card declined"));

        let bare: WebhookEvent = serde_json::from_str(r#"{"event":"refund.created"}"#).unwrap();
        assert!(bare.payload.payment.is_none());
    }
}
