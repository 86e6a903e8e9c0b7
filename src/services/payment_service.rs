//! Premium payments: gateway orders, checkout verification and webhooks.

use std::sync::Arc;

use log::{debug, info, warn};
use mongodb::bson::{doc, oid::ObjectId, Document};

use crate::config::CONFIG;
use crate::constants::{
    CODE_INVALID_SIGNATURE, CODE_INVALID_TRANSITION, CODE_INVALID_WEBHOOK, CODE_PAYMENT_NOT_FOUND,
    CODE_POLICY_NOT_FOUND, ERR_INVALID_SIGNATURE, ERR_INVALID_WEBHOOK, ERR_PAYMENT_NOT_FOUND,
    ERR_POLICY_NOT_FOUND, ERR_POLICY_NOT_PAYABLE,
};
use crate::errors::ApiError;
use crate::models::{
    CreateOrderRequest, OrderResponse, PageParams, PaginatedResponse, PaymentListQuery, PaymentLog,
    PaymentResponse, PaymentStatus, Policy, PolicyStatus, VerifyPaymentRequest,
};
use crate::repositories::{PaymentRepository, PolicyRepository};
use crate::services::payment_gateway::{
    verify_payment_signature, verify_webhook_signature, NewOrder, OrderNotes, PaymentGateway,
    WebhookEvent,
};
use crate::services::PolicyService;
use crate::utils::log_sanitizer::mask_reference;
use crate::validators::{ensure_owner, parse_object_id};

const SIGNATURE_MISMATCH: &str = "signature mismatch";
const DEFAULT_FAILURE_REASON: &str = "payment failed";

/// What a verified webhook asks us to do.
#[derive(Debug, PartialEq, Eq)]
pub enum WebhookAction {
    MarkPaid { order_id: String, payment_id: String },
    MarkFailed { order_id: String, reason: String },
    Ignore,
}

pub fn classify_webhook(event: &WebhookEvent) -> WebhookAction {
    let Some(payment) = event.payload.payment.as_ref().map(|p| &p.entity) else {
        return WebhookAction::Ignore;
    };
    let Some(order_id) = payment.order_id.clone() else {
        return WebhookAction::Ignore;
    };

    match event.event.as_str() {
        "payment.captured" | "order.paid" => WebhookAction::MarkPaid {
            order_id,
            payment_id: payment.id.clone(),
        },
        "payment.failed" => WebhookAction::MarkFailed {
            order_id,
            reason: payment
                .error_description
                .clone()
                .unwrap_or_else(|| DEFAULT_FAILURE_REASON.to_string()),
        },
        _ => WebhookAction::Ignore,
    }
}

/// How a captured payment relates to the policy it was ordered for.
#[derive(Debug, PartialEq, Eq)]
pub enum Settlement {
    /// Policy is still awaiting payment.
    Activate,
    /// Policy already carries this payment, so replays are harmless.
    AlreadySettled,
    /// Policy moved on without this payment; the money must not count as collected.
    Refuse,
}

pub fn settle_payment(
    status: PolicyStatus,
    settled_payment_id: Option<&str>,
    payment_id: &str,
) -> Settlement {
    if settled_payment_id == Some(payment_id) {
        return Settlement::AlreadySettled;
    }
    match status {
        PolicyStatus::PendingPayment => Settlement::Activate,
        _ => Settlement::Refuse,
    }
}

fn refusal_reason(status: PolicyStatus) -> String {
    format!("payment captured on a {} policy", status.as_str())
}

fn payment_not_found() -> ApiError {
    ApiError::not_found(CODE_PAYMENT_NOT_FOUND, ERR_PAYMENT_NOT_FOUND)
}

fn policy_not_found() -> ApiError {
    ApiError::not_found(CODE_POLICY_NOT_FOUND, ERR_POLICY_NOT_FOUND)
}

fn order_response(log: &PaymentLog, policy: &Policy, key_id: &str) -> OrderResponse {
    OrderResponse {
        order_id: log.order_id.clone(),
        amount: log.amount,
        currency: log.currency.clone(),
        key_id: key_id.to_string(),
        policy_id: log.policy_id.to_hex(),
        policy_number: policy.policy_number.clone(),
    }
}

pub struct PaymentService {
    payments: Arc<PaymentRepository>,
    policy_repository: Arc<PolicyRepository>,
    policies: Arc<PolicyService>,
    gateway: Arc<dyn PaymentGateway>,
    key_secret: String,
    webhook_secret: String,
}

impl PaymentService {
    pub fn new(
        payments: Arc<PaymentRepository>,
        policy_repository: Arc<PolicyRepository>,
        policies: Arc<PolicyService>,
        gateway: Arc<dyn PaymentGateway>,
    ) -> Self {
        Self {
            payments,
            policy_repository,
            policies,
            gateway,
            key_secret: CONFIG.payment_key_secret.clone(),
            webhook_secret: CONFIG.payment_webhook_secret.clone(),
        }
    }

    /// Open a gateway order for a policy awaiting payment, reusing an open one.
    pub async fn create_order(
        &self,
        user_id: &str,
        req: &CreateOrderRequest,
    ) -> Result<OrderResponse, ApiError> {
        let policy = self.policies.get_owned(&req.policy_id, user_id).await?;
        let policy_id = policy.id.ok_or_else(policy_not_found)?;

        if policy.status != PolicyStatus::PendingPayment {
            return Err(ApiError::conflict(
                CODE_INVALID_TRANSITION,
                format!("Policy is {}, no payment is due", policy.status.as_str()),
            ));
        }

        if let Some(open) = self.payments.find_open_for_policy(policy_id).await? {
            debug!(
                "Reusing order {} for policy {}",
                mask_reference(&open.order_id),
                policy.policy_number
            );
            return Ok(order_response(&open, &policy, self.gateway.key_id()));
        }

        let order = self
            .gateway
            .create_order(&NewOrder {
                amount: policy.premium,
                currency: CONFIG.payment_currency.clone(),
                receipt: policy.policy_number.clone(),
                notes: OrderNotes {
                    policy_id: policy_id.to_hex(),
                    user_id: user_id.to_string(),
                },
            })
            .await?;

        let now = mongodb::bson::DateTime::now();
        let log = PaymentLog {
            id: None,
            user_id: policy.user_id,
            policy_id,
            order_id: order.id,
            payment_id: None,
            signature: None,
            amount: order.amount,
            currency: order.currency,
            status: PaymentStatus::Created,
            failure_reason: None,
            paid_at: None,
            created_at: now,
            updated_at: now,
        };
        self.payments.insert(&log).await?;

        info!(
            "Payment order {} created for policy {}",
            mask_reference(&log.order_id),
            policy.policy_number
        );
        Ok(order_response(&log, &policy, self.gateway.key_id()))
    }

    /// Check the checkout signature and activate the policy on success.
    pub async fn verify(&self, user_id: &str, req: &VerifyPaymentRequest) -> Result<Policy, ApiError> {
        let log = self
            .payments
            .find_by_order_id(&req.order_id)
            .await?
            .ok_or_else(payment_not_found)?;
        ensure_owner(log.user_id, user_id)?;

        if log.status == PaymentStatus::Paid {
            debug!("Order {} already paid", mask_reference(&log.order_id));
            return self.current_policy(log.policy_id).await;
        }

        if !verify_payment_signature(&self.key_secret, &req.order_id, &req.payment_id, &req.signature) {
            warn!(
                "Signature mismatch for order {}",
                mask_reference(&req.order_id)
            );
            self.payments.mark_failed(&req.order_id, SIGNATURE_MISMATCH).await?;
            return Err(ApiError::bad_request(CODE_INVALID_SIGNATURE, ERR_INVALID_SIGNATURE));
        }

        self.apply_payment(&log, &req.payment_id, Some(&req.signature))
            .await?
            .ok_or_else(|| ApiError::conflict(CODE_INVALID_TRANSITION, ERR_POLICY_NOT_PAYABLE))
    }

    /// Apply a gateway webhook. Unknown orders and events are acknowledged.
    pub async fn handle_webhook(&self, body: &[u8], signature: Option<&str>) -> Result<(), ApiError> {
        let signature = signature.unwrap_or_default();
        if !verify_webhook_signature(&self.webhook_secret, body, signature) {
            warn!("Rejected webhook with a bad signature");
            return Err(ApiError::bad_request(CODE_INVALID_SIGNATURE, ERR_INVALID_SIGNATURE));
        }

        let event: WebhookEvent = serde_json::from_slice(body)
            .map_err(|_| ApiError::bad_request(CODE_INVALID_WEBHOOK, ERR_INVALID_WEBHOOK))?;

        match classify_webhook(&event) {
            WebhookAction::MarkPaid { order_id, payment_id } => {
                let Some(log) = self.payments.find_by_order_id(&order_id).await? else {
                    warn!("Webhook for unknown order {}", mask_reference(&order_id));
                    return Ok(());
                };
                // A refused payment is flagged on its log and still acknowledged
                self.apply_payment(&log, &payment_id, None).await?;
            }
            WebhookAction::MarkFailed { order_id, reason } => {
                info!(
                    "Gateway reported failure for order {}: {}",
                    mask_reference(&order_id),
                    reason
                );
                self.payments.mark_failed(&order_id, &reason).await?;
            }
            WebhookAction::Ignore => debug!("Ignoring webhook event {}", event.event),
        }
        Ok(())
    }

    /// Settle a captured payment against its policy.
    ///
    /// Returns `None` when the policy no longer accepts it; the log is then
    /// marked failed so it never counts towards collected premium.
    async fn apply_payment(
        &self,
        log: &PaymentLog,
        payment_id: &str,
        signature: Option<&str>,
    ) -> Result<Option<Policy>, ApiError> {
        let policy = self.current_policy(log.policy_id).await?;
        let policy = match settle_payment(policy.status, policy.payment_id.as_deref(), payment_id) {
            Settlement::Activate => {
                match self.policy_repository.activate(log.policy_id, payment_id).await? {
                    Some(active) => {
                        info!("Policy {} activated", active.policy_number);
                        active
                    }
                    // Cancelled or paid for concurrently; judge the fresh state
                    None => {
                        let current = self.current_policy(log.policy_id).await?;
                        match settle_payment(current.status, current.payment_id.as_deref(), payment_id) {
                            Settlement::AlreadySettled => current,
                            _ => return self.refuse_payment(log, payment_id, &current).await,
                        }
                    }
                }
            }
            Settlement::AlreadySettled => policy,
            Settlement::Refuse => return self.refuse_payment(log, payment_id, &policy).await,
        };

        self.payments.mark_paid(&log.order_id, payment_id, signature).await?;
        Ok(Some(policy))
    }

    async fn refuse_payment(
        &self,
        log: &PaymentLog,
        payment_id: &str,
        policy: &Policy,
    ) -> Result<Option<Policy>, ApiError> {
        warn!(
            "Payment {} on order {} not applied: policy {} is {}",
            mask_reference(payment_id),
            mask_reference(&log.order_id),
            policy.policy_number,
            policy.status.as_str()
        );
        self.payments
            .mark_failed(&log.order_id, &refusal_reason(policy.status))
            .await?;
        Ok(None)
    }

    async fn current_policy(&self, policy_id: ObjectId) -> Result<Policy, ApiError> {
        self.policy_repository
            .find_by_id(policy_id)
            .await?
            .ok_or_else(policy_not_found)
    }

    pub async fn list_for_user(
        &self,
        user_id: &str,
        query: &PaymentListQuery,
    ) -> Result<PaginatedResponse<PaymentResponse>, ApiError> {
        let mut filter = doc! { "user_id": parse_object_id(user_id)? };
        if let Some(status) = query.status {
            filter.insert("status", status.as_str());
        }
        self.page(filter, PageParams::new(query.page, query.per_page)).await
    }

    pub async fn list_admin(
        &self,
        query: &PaymentListQuery,
    ) -> Result<PaginatedResponse<PaymentResponse>, ApiError> {
        let mut filter = doc! {};
        if let Some(status) = query.status {
            filter.insert("status", status.as_str());
        }
        self.page(filter, PageParams::new(query.page, query.per_page)).await
    }

    async fn page(
        &self,
        filter: Document,
        params: PageParams,
    ) -> Result<PaginatedResponse<PaymentResponse>, ApiError> {
        let total = self.payments.count(filter.clone()).await?;
        let logs = self
            .payments
            .find_with_filter(filter, params.skip(), params.limit())
            .await?;
        Ok(PaginatedResponse::new(
            logs.into_iter().map(PaymentResponse::from).collect(),
            total,
            params,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(json: &str) -> WebhookEvent {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_captured_and_order_paid_mark_paid() {
        for name in ["payment.captured", "order.paid"] {
            let action = classify_webhook(&event(&format!(
                r#"{{"event":"{}","payload":{{"payment":{{"entity":{{"id":"pay_1","order_id":"order_1"}}}}}}}}"#,
                name
            )));
            assert_eq!(
                action,
                WebhookAction::MarkPaid {
                    order_id: "order_1".into(),
                    payment_id: "pay_1".into()
                }
            );
        }
    }

    #[test]
    fn test_failed_payment_carries_reason() {
        let action = classify_webhook(&event(
            r#"{"event":"payment.failed","payload":{"payment":{"entity":{"id":"pay_1","order_id":"order_1","error_description":"Card declined"}}}}"#,
        ));
        assert_eq!(
            action,
            WebhookAction::MarkFailed {
                order_id: "order_1".into(),
                reason: "Card declined".into()
            }
        );

        let action = classify_webhook(&event(
            r#"{"event":"payment.failed","payload":{"payment":{"entity":{"id":"pay_1","order_id":"order_1"}}}}"#,
        ));
        assert_eq!(
            action,
            WebhookAction::MarkFailed {
                order_id: "order_1".into(),
                reason: DEFAULT_FAILURE_REASON.into()
            }
        );
    }

    #[test]
    fn test_pending_policy_is_activated() {
        assert_eq!(
            settle_payment(PolicyStatus::PendingPayment, None, "pay_1"),
            Settlement::Activate
        );
    }

    #[test]
    fn test_replayed_payment_is_already_settled() {
        assert_eq!(
            settle_payment(PolicyStatus::Active, Some("pay_1"), "pay_1"),
            Settlement::AlreadySettled
        );
        // A late webhook after a claim was filed
        assert_eq!(
            settle_payment(PolicyStatus::Claimed, Some("pay_1"), "pay_1"),
            Settlement::AlreadySettled
        );
    }

    #[test]
    fn test_payment_on_cancelled_or_settled_policy_is_refused() {
        assert_eq!(
            settle_payment(PolicyStatus::Cancelled, None, "pay_1"),
            Settlement::Refuse
        );
        assert_eq!(
            settle_payment(PolicyStatus::Expired, None, "pay_1"),
            Settlement::Refuse
        );
        // Second payment for a policy another payment already activated
        assert_eq!(
            settle_payment(PolicyStatus::Active, Some("pay_1"), "pay_2"),
            Settlement::Refuse
        );
        assert_eq!(
            settle_payment(PolicyStatus::Active, None, "pay_2"),
            Settlement::Refuse
        );
    }

    #[test]
    fn test_refusal_reason_names_policy_status() {
        assert_eq!(
            refusal_reason(PolicyStatus::Cancelled),
            "payment captured on a cancelled policy"
        );
    }

    #[test]
    fn test_other_events_are_ignored() {
        assert_eq!(classify_webhook(&event(r#"{"event":"refund.created"}"#)), WebhookAction::Ignore);
        assert_eq!(
            classify_webhook(&event(
                r#"{"event":"payment.captured","payload":{"payment":{"entity":{"id":"pay_1"}}}}"#
            )),
            WebhookAction::Ignore
        );
    }
}
