use std::collections::HashMap;

use serde::Serialize;
use utoipa::ToSchema;

use super::ClaimResponse;

#[derive(Debug, Serialize, ToSchema)]
pub struct CountSummary {
    pub total: u64,
    pub active: u64,
}

/// Back-office overview (admin only)
#[derive(Debug, Serialize, ToSchema)]
pub struct DashboardStats {
    pub users: CountSummary,
    pub companies: CountSummary,
    pub shipments: u64,
    /// Policy count keyed by status
    pub policies_by_status: HashMap<String, u64>,
    /// Claim count keyed by status
    pub claims_by_status: HashMap<String, u64>,
    /// Sum of paid premiums, minor units
    pub premium_collected: i64,
    /// Sum of approved amounts on settled claims, minor units
    pub claims_settled_amount: i64,
    pub recent_claims: Vec<ClaimResponse>,
}
