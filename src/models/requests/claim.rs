//! Claim request models.

use chrono::NaiveDate;
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::models::{ClaimStatus, IncidentType};

/// Request payload for lodging a claim
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateClaimRequest {
    #[validate(length(equal = 24, message = "Invalid policy ID"))]
    #[schema(example = "507f1f77bcf86cd799439011")]
    pub policy_id: String,
    pub incident_type: IncidentType,
    #[schema(value_type = String, format = Date, example = "2026-11-15")]
    pub incident_date: NaiveDate,
    #[validate(length(min = 20, max = 5000, message = "Description must be between 20 and 5000 characters"))]
    pub description: String,
    #[validate(range(min = 1, message = "Claimed amount must be positive"))]
    #[schema(example = 1200000)]
    pub claimed_amount: i64,
}

/// Request payload for a reviewer decision (admin only)
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ReviewClaimRequest {
    /// Target status: under_review, approved, rejected or settled
    pub status: ClaimStatus,
    /// Required when approving
    #[validate(range(min = 1, message = "Approved amount must be positive"))]
    pub approved_amount: Option<i64>,
    /// Required when rejecting
    #[validate(length(max = 2000, message = "Notes must be at most 2000 characters"))]
    pub notes: Option<String>,
}

/// Query parameters for claim listings
#[derive(Debug, Deserialize)]
pub struct ClaimListQuery {
    pub page: Option<u64>,
    pub per_page: Option<u64>,
    pub status: Option<ClaimStatus>,
    /// Only honoured on the admin listing.
    pub company_id: Option<String>,
}
