use chrono::NaiveDate;
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum IncidentType {
    Damage,
    Loss,
    Theft,
    Delay,
    Contamination,
    Other,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ClaimStatus {
    Submitted,
    UnderReview,
    Approved,
    Rejected,
    Settled,
    Withdrawn,
}

impl ClaimStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClaimStatus::Submitted => "submitted",
            ClaimStatus::UnderReview => "under_review",
            ClaimStatus::Approved => "approved",
            ClaimStatus::Rejected => "rejected",
            ClaimStatus::Settled => "settled",
            ClaimStatus::Withdrawn => "withdrawn",
        }
    }

    /// Claims in these states block a new claim on the same policy.
    pub fn open() -> [ClaimStatus; 3] {
        [
            ClaimStatus::Submitted,
            ClaimStatus::UnderReview,
            ClaimStatus::Approved,
        ]
    }

    pub fn all() -> [ClaimStatus; 6] {
        [
            ClaimStatus::Submitted,
            ClaimStatus::UnderReview,
            ClaimStatus::Approved,
            ClaimStatus::Rejected,
            ClaimStatus::Settled,
            ClaimStatus::Withdrawn,
        ]
    }

    /// Transitions available to a reviewing admin.
    pub fn can_review_to(&self, next: ClaimStatus) -> bool {
        matches!(
            (self, next),
            (ClaimStatus::Submitted, ClaimStatus::UnderReview)
                | (ClaimStatus::Submitted, ClaimStatus::Rejected)
                | (ClaimStatus::UnderReview, ClaimStatus::Approved)
                | (ClaimStatus::UnderReview, ClaimStatus::Rejected)
                | (ClaimStatus::Approved, ClaimStatus::Settled)
        )
    }

    pub fn can_withdraw(&self) -> bool {
        matches!(self, ClaimStatus::Submitted)
    }

    pub fn accepts_documents(&self) -> bool {
        matches!(self, ClaimStatus::Submitted | ClaimStatus::UnderReview)
    }
}

/// One entry in a claim's audit trail
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ClaimStatusChange {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<ClaimStatus>,
    pub to: ClaimStatus,
    /// Account id of whoever made the change.
    pub by: String,
    pub at: mongodb::bson::DateTime,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Claim lodged against an active policy
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claim {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub claim_number: String,
    pub policy_id: ObjectId,
    pub user_id: ObjectId,
    pub company_id: ObjectId,
    pub shipment_id: ObjectId,
    pub incident_type: IncidentType,
    pub incident_date: NaiveDate,
    pub description: String,
    pub claimed_amount: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub approved_amount: Option<i64>,
    pub status: ClaimStatus,
    #[serde(default)]
    pub documents: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub review_notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reviewed_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reviewed_at: Option<mongodb::bson::DateTime>,
    #[serde(default)]
    pub history: Vec<ClaimStatusChange>,
    pub created_at: mongodb::bson::DateTime,
    pub updated_at: mongodb::bson::DateTime,
}

#[cfg(test)]
mod tests {
    use super::*;
    use ClaimStatus::*;

    #[test]
    fn test_review_transitions() {
        assert!(Submitted.can_review_to(UnderReview));
        assert!(Submitted.can_review_to(Rejected));
        assert!(UnderReview.can_review_to(Approved));
        assert!(UnderReview.can_review_to(Rejected));
        assert!(Approved.can_review_to(Settled));
    }

    #[test]
    fn test_review_cannot_skip_or_reopen() {
        assert!(!Submitted.can_review_to(Approved));
        assert!(!Submitted.can_review_to(Settled));
        assert!(!Approved.can_review_to(Rejected));
        assert!(!Rejected.can_review_to(UnderReview));
        assert!(!Settled.can_review_to(Approved));
        assert!(!Submitted.can_review_to(Withdrawn));
    }

    #[test]
    fn test_withdraw_only_before_review() {
        assert!(Submitted.can_withdraw());
        assert!(!UnderReview.can_withdraw());
        assert!(!Approved.can_withdraw());
    }

    #[test]
    fn test_every_transition_target_is_known() {
        for from in ClaimStatus::all() {
            for to in ClaimStatus::all() {
                if from.can_review_to(to) {
                    assert_ne!(from, to);
                }
            }
        }
    }
}
