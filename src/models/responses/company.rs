//! Company and review response models.
//!
//! `CompanyResponse` is also the cached representation, hence `Deserialize`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::{CargoType, Company, CoverageType, Review};
use crate::utils::time::to_utc;

#[derive(Debug, Serialize, Deserialize, Clone, ToSchema)]
pub struct CompanyResponse {
    #[schema(example = "507f1f77bcf86cd799439011")]
    pub id: String,
    #[schema(example = "Oceanic Marine Insurance")]
    pub name: String,
    #[schema(example = "oceanic-marine-insurance")]
    pub slug: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    pub contact_email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub headquarters: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub founded_year: Option<i32>,
    pub coverage_types: Vec<CoverageType>,
    pub cargo_types: Vec<CargoType>,
    /// Base premium rate in basis points of the cargo value
    #[schema(example = 45)]
    pub base_rate_bps: i64,
    pub min_premium: i64,
    pub max_coverage: i64,
    pub deductible_bps: i64,
    #[schema(example = 96.5)]
    pub claim_settlement_ratio: f64,
    #[schema(example = 4.3)]
    pub rating: f64,
    pub review_count: i64,
    pub is_verified: bool,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Company> for CompanyResponse {
    fn from(company: Company) -> Self {
        Self {
            id: company.id.map(|id| id.to_hex()).unwrap_or_default(),
            name: company.name,
            slug: company.slug,
            description: company.description,
            logo_url: company.logo_url,
            website: company.website,
            contact_email: company.contact_email,
            contact_phone: company.contact_phone,
            headquarters: company.headquarters,
            founded_year: company.founded_year,
            coverage_types: company.coverage_types,
            cargo_types: company.cargo_types,
            base_rate_bps: company.base_rate_bps,
            min_premium: company.min_premium,
            max_coverage: company.max_coverage,
            deductible_bps: company.deductible_bps,
            claim_settlement_ratio: company.claim_settlement_ratio,
            rating: company.rating,
            review_count: company.review_count,
            is_verified: company.is_verified,
            is_active: company.is_active,
            created_at: to_utc(company.created_at),
            updated_at: to_utc(company.updated_at),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, ToSchema)]
pub struct ReviewResponse {
    pub id: String,
    pub company_id: String,
    pub user_id: String,
    pub user_name: String,
    #[schema(example = 5)]
    pub rating: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<Review> for ReviewResponse {
    fn from(review: Review) -> Self {
        Self {
            id: review.id.map(|id| id.to_hex()).unwrap_or_default(),
            company_id: review.company_id.to_hex(),
            user_id: review.user_id.to_hex(),
            user_name: review.user_name,
            rating: review.rating,
            comment: review.comment,
            created_at: to_utc(review.created_at),
        }
    }
}
