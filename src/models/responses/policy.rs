//! Policy and quote response models.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::{CoverageType, Policy, PolicyStatus};
use crate::utils::time::{to_utc, to_utc_opt};

#[derive(Debug, Serialize, Deserialize, Clone, ToSchema)]
pub struct PolicyResponse {
    pub id: String,
    #[schema(example = "POL-20261019-3FA85F64")]
    pub policy_number: String,
    pub user_id: String,
    pub company_id: String,
    pub shipment_id: String,
    pub coverage_type: CoverageType,
    pub coverage_amount: i64,
    pub premium: i64,
    pub deductible: i64,
    #[schema(value_type = String, format = Date)]
    pub start_date: NaiveDate,
    #[schema(value_type = String, format = Date)]
    pub end_date: NaiveDate,
    pub status: PolicyStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub activated_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl From<Policy> for PolicyResponse {
    fn from(policy: Policy) -> Self {
        Self {
            id: policy.id.map(|id| id.to_hex()).unwrap_or_default(),
            policy_number: policy.policy_number,
            user_id: policy.user_id.to_hex(),
            company_id: policy.company_id.to_hex(),
            shipment_id: policy.shipment_id.to_hex(),
            coverage_type: policy.coverage_type,
            coverage_amount: policy.coverage_amount,
            premium: policy.premium,
            deductible: policy.deductible,
            start_date: policy.start_date,
            end_date: policy.end_date,
            status: policy.status,
            payment_id: policy.payment_id,
            activated_at: to_utc_opt(policy.activated_at),
            created_at: to_utc(policy.created_at),
        }
    }
}

/// Premium breakdown for a shipment, company and coverage combination
#[derive(Debug, Serialize, Clone, PartialEq, ToSchema)]
pub struct QuoteResponse {
    pub shipment_id: String,
    pub company_id: String,
    pub company_name: String,
    pub coverage_type: CoverageType,
    pub cargo_value: i64,
    pub base_rate_bps: i64,
    /// Cargo value times the base rate, before loadings
    pub base_premium: i64,
    pub coverage_factor_percent: i64,
    pub cargo_factor_percent: i64,
    pub transport_factor_percent: i64,
    /// Final premium in minor units
    #[schema(example = 1670625)]
    pub premium: i64,
    /// True when the company minimum premium was charged instead
    pub min_premium_applied: bool,
    pub coverage_amount: i64,
    pub deductible: i64,
    #[schema(value_type = String, format = Date)]
    pub start_date: NaiveDate,
    #[schema(value_type = String, format = Date)]
    pub end_date: NaiveDate,
    #[schema(example = "INR")]
    pub currency: String,
}
