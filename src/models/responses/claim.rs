//! Claim response models.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::{Claim, ClaimStatus, ClaimStatusChange, IncidentType};
use crate::utils::time::{to_utc, to_utc_opt};

/// One entry of the claim's audit trail
#[derive(Debug, Serialize, Deserialize, Clone, ToSchema)]
pub struct ClaimHistoryEntry {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<ClaimStatus>,
    pub to: ClaimStatus,
    /// Account id of whoever made the change
    pub by: String,
    pub at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl From<ClaimStatusChange> for ClaimHistoryEntry {
    fn from(change: ClaimStatusChange) -> Self {
        Self {
            from: change.from,
            to: change.to,
            by: change.by,
            at: to_utc(change.at),
            notes: change.notes,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, ToSchema)]
pub struct ClaimResponse {
    pub id: String,
    #[schema(example = "CLM-20261019-3FA85F64")]
    pub claim_number: String,
    pub policy_id: String,
    pub user_id: String,
    pub company_id: String,
    pub shipment_id: String,
    pub incident_type: IncidentType,
    #[schema(value_type = String, format = Date)]
    pub incident_date: NaiveDate,
    pub description: String,
    pub claimed_amount: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub approved_amount: Option<i64>,
    pub status: ClaimStatus,
    pub documents: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub review_notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reviewed_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reviewed_at: Option<DateTime<Utc>>,
    pub history: Vec<ClaimHistoryEntry>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Claim> for ClaimResponse {
    fn from(claim: Claim) -> Self {
        Self {
            id: claim.id.map(|id| id.to_hex()).unwrap_or_default(),
            claim_number: claim.claim_number,
            policy_id: claim.policy_id.to_hex(),
            user_id: claim.user_id.to_hex(),
            company_id: claim.company_id.to_hex(),
            shipment_id: claim.shipment_id.to_hex(),
            incident_type: claim.incident_type,
            incident_date: claim.incident_date,
            description: claim.description,
            claimed_amount: claim.claimed_amount,
            approved_amount: claim.approved_amount,
            status: claim.status,
            documents: claim.documents,
            review_notes: claim.review_notes,
            reviewed_by: claim.reviewed_by,
            reviewed_at: to_utc_opt(claim.reviewed_at),
            history: claim.history.into_iter().map(Into::into).collect(),
            created_at: to_utc(claim.created_at),
            updated_at: to_utc(claim.updated_at),
        }
    }
}
