//! Policy request models.

use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::models::{CoverageType, PolicyStatus};

/// Request payload for quoting or buying a policy
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct QuoteRequest {
    #[validate(length(equal = 24, message = "Invalid shipment ID"))]
    #[schema(example = "507f1f77bcf86cd799439011")]
    pub shipment_id: String,
    #[validate(length(equal = 24, message = "Invalid company ID"))]
    #[schema(example = "507f1f77bcf86cd799439012")]
    pub company_id: String,
    pub coverage_type: CoverageType,
}

/// Query parameters for policy listings
#[derive(Debug, Deserialize)]
pub struct PolicyListQuery {
    pub page: Option<u64>,
    pub per_page: Option<u64>,
    pub status: Option<PolicyStatus>,
    /// Only honoured on the admin listing.
    pub company_id: Option<String>,
}
