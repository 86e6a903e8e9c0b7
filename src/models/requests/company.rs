//! Company and review request models.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::models::{CargoType, CoverageType};
use crate::validators::validate_not_blank;

/// Request payload for listing a new company (admin only)
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateCompanyRequest {
    #[validate(
        length(min = 2, max = 120, message = "Name must be between 2 and 120 characters"),
        custom(function = "validate_not_blank")
    )]
    #[schema(example = "Oceanic Marine Insurance")]
    pub name: String,
    #[validate(length(min = 10, max = 2000, message = "Description must be between 10 and 2000 characters"))]
    pub description: String,
    #[validate(url(message = "Website must be a valid URL"))]
    pub website: Option<String>,
    #[validate(email(message = "Invalid contact email"))]
    pub contact_email: String,
    #[validate(length(max = 20, message = "Phone must be at most 20 characters"))]
    pub contact_phone: Option<String>,
    #[validate(length(max = 120, message = "Headquarters must be at most 120 characters"))]
    pub headquarters: Option<String>,
    #[validate(range(min = 1800, max = 2100, message = "Founded year is out of range"))]
    pub founded_year: Option<i32>,
    #[validate(length(min = 1, message = "At least one coverage type is required"))]
    pub coverage_types: Vec<CoverageType>,
    #[validate(length(min = 1, message = "At least one cargo type is required"))]
    pub cargo_types: Vec<CargoType>,
    /// Base premium rate in basis points (1-10000)
    #[validate(range(min = 1, max = 10000, message = "Base rate must be between 1 and 10000 bps"))]
    #[schema(example = 45)]
    pub base_rate_bps: i64,
    #[validate(range(min = 0, message = "Minimum premium cannot be negative"))]
    #[schema(example = 50000)]
    pub min_premium: i64,
    #[validate(range(min = 1, message = "Maximum coverage must be positive"))]
    #[schema(example = 500000000)]
    pub max_coverage: i64,
    #[validate(range(min = 0, max = 5000, message = "Deductible must be between 0 and 5000 bps"))]
    #[serde(default)]
    pub deductible_bps: i64,
    #[validate(range(min = 0.0, max = 100.0, message = "Settlement ratio must be between 0 and 100"))]
    #[schema(example = 96.5)]
    pub claim_settlement_ratio: f64,
    #[serde(default)]
    pub is_verified: bool,
}

/// Partial update of a company (admin only)
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateCompanyRequest {
    #[validate(
        length(min = 2, max = 120, message = "Name must be between 2 and 120 characters"),
        custom(function = "validate_not_blank")
    )]
    pub name: Option<String>,
    #[validate(length(min = 10, max = 2000, message = "Description must be between 10 and 2000 characters"))]
    pub description: Option<String>,
    #[validate(url(message = "Website must be a valid URL"))]
    pub website: Option<String>,
    #[validate(email(message = "Invalid contact email"))]
    pub contact_email: Option<String>,
    #[validate(length(max = 20, message = "Phone must be at most 20 characters"))]
    pub contact_phone: Option<String>,
    #[validate(length(max = 120, message = "Headquarters must be at most 120 characters"))]
    pub headquarters: Option<String>,
    #[validate(range(min = 1800, max = 2100, message = "Founded year is out of range"))]
    pub founded_year: Option<i32>,
    #[validate(length(min = 1, message = "At least one coverage type is required"))]
    pub coverage_types: Option<Vec<CoverageType>>,
    #[validate(length(min = 1, message = "At least one cargo type is required"))]
    pub cargo_types: Option<Vec<CargoType>>,
    #[validate(range(min = 1, max = 10000, message = "Base rate must be between 1 and 10000 bps"))]
    pub base_rate_bps: Option<i64>,
    #[validate(range(min = 0, message = "Minimum premium cannot be negative"))]
    pub min_premium: Option<i64>,
    #[validate(range(min = 1, message = "Maximum coverage must be positive"))]
    pub max_coverage: Option<i64>,
    #[validate(range(min = 0, max = 5000, message = "Deductible must be between 0 and 5000 bps"))]
    pub deductible_bps: Option<i64>,
    #[validate(range(min = 0.0, max = 100.0, message = "Settlement ratio must be between 0 and 100"))]
    pub claim_settlement_ratio: Option<f64>,
    pub is_verified: Option<bool>,
}

/// Request payload for reviewing a company
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateReviewRequest {
    #[validate(range(min = 1, max = 5, message = "Rating must be between 1 and 5"))]
    #[schema(example = 4)]
    pub rating: i32,
    #[validate(length(max = 1000, message = "Comment must be at most 1000 characters"))]
    pub comment: Option<String>,
}

/// Sort keys for the public company listing
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum CompanySort {
    #[default]
    Rating,
    Premium,
    Name,
    Settlement,
    Newest,
}

impl CompanySort {
    pub fn field(&self) -> &'static str {
        match self {
            CompanySort::Rating => "rating",
            CompanySort::Premium => "base_rate_bps",
            CompanySort::Name => "name",
            CompanySort::Settlement => "claim_settlement_ratio",
            CompanySort::Newest => "created_at",
        }
    }

    /// Direction used when the caller doesn't pick one.
    pub fn default_ascending(&self) -> bool {
        matches!(self, CompanySort::Premium | CompanySort::Name)
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

/// Query parameters for listing companies.
///
/// Serialized as part of the cache key, so field order matters.
#[derive(Debug, Default, Deserialize, Serialize, Clone)]
pub struct CompanyListQuery {
    pub page: Option<u64>,
    pub per_page: Option<u64>,
    pub search: Option<String>,
    pub coverage_type: Option<CoverageType>,
    pub cargo_type: Option<CargoType>,
    pub min_rating: Option<f64>,
    pub sort_by: Option<CompanySort>,
    pub order: Option<SortOrder>,
    /// Only honoured on the admin listing.
    pub is_active: Option<bool>,
}

impl CompanyListQuery {
    /// MongoDB sort direction (1 or -1) for the requested key.
    pub fn sort_direction(&self) -> i32 {
        let sort = self.sort_by.unwrap_or_default();
        let ascending = match self.order {
            Some(SortOrder::Asc) => true,
            Some(SortOrder::Desc) => false,
            None => sort.default_ascending(),
        };
        if ascending {
            1
        } else {
            -1
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_direction_defaults() {
        let mut query = CompanyListQuery::default();
        assert_eq!(query.sort_direction(), -1);

        query.sort_by = Some(CompanySort::Premium);
        assert_eq!(query.sort_direction(), 1);

        query.order = Some(SortOrder::Desc);
        assert_eq!(query.sort_direction(), -1);
    }

    #[test]
    fn test_sort_field_mapping() {
        assert_eq!(CompanySort::Premium.field(), "base_rate_bps");
        assert_eq!(CompanySort::Settlement.field(), "claim_settlement_ratio");
    }

    #[test]
    fn test_create_company_validation() {
        let request: CreateCompanyRequest = serde_json::from_value(serde_json::json!({
            "name": "Oceanic",
            "description": "Marine cargo specialists",
            "contact_email": "hello@oceanic.example",
            "coverage_types": [],
            "cargo_types": ["general"],
            "base_rate_bps": 0,
            "min_premium": 100,
            "max_coverage": 1000,
            "claim_settlement_ratio": 101.0
        }))
        .unwrap();

        let errors = request.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("coverage_types"));
        assert!(fields.contains_key("base_rate_bps"));
        assert!(fields.contains_key("claim_settlement_ratio"));
        assert!(!fields.contains_key("cargo_types"));
    }
}
