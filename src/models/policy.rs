use chrono::NaiveDate;
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::CoverageType;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum PolicyStatus {
    PendingPayment,
    Active,
    Expired,
    Cancelled,
    Claimed,
}

impl PolicyStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PolicyStatus::PendingPayment => "pending_payment",
            PolicyStatus::Active => "active",
            PolicyStatus::Expired => "expired",
            PolicyStatus::Cancelled => "cancelled",
            PolicyStatus::Claimed => "claimed",
        }
    }

    /// Statuses that keep a shipment insured (and therefore locked).
    pub fn live() -> [PolicyStatus; 3] {
        [
            PolicyStatus::PendingPayment,
            PolicyStatus::Active,
            PolicyStatus::Claimed,
        ]
    }

    pub fn all() -> [PolicyStatus; 5] {
        [
            PolicyStatus::PendingPayment,
            PolicyStatus::Active,
            PolicyStatus::Expired,
            PolicyStatus::Cancelled,
            PolicyStatus::Claimed,
        ]
    }
}

/// Insurance policy bought for a shipment
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Policy {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub policy_number: String,
    pub user_id: ObjectId,
    pub company_id: ObjectId,
    pub shipment_id: ObjectId,
    pub coverage_type: CoverageType,
    pub coverage_amount: i64,
    pub premium: i64,
    pub deductible: i64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub status: PolicyStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub activated_at: Option<mongodb::bson::DateTime>,
    pub created_at: mongodb::bson::DateTime,
    pub updated_at: mongodb::bson::DateTime,
}

impl Policy {
    pub fn covers_date(&self, date: NaiveDate) -> bool {
        date >= self.start_date && date <= self.end_date
    }
}
