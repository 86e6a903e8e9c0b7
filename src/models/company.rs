use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Scope of cover a company sells.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum CoverageType {
    /// Named perils only (fire, sinking, collision)
    Basic,
    /// Named perils plus theft and non-delivery
    Standard,
    /// All risks
    Comprehensive,
}

impl CoverageType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CoverageType::Basic => "basic",
            CoverageType::Standard => "standard",
            CoverageType::Comprehensive => "comprehensive",
        }
    }

    /// Premium loading in percent.
    pub fn factor_percent(&self) -> i64 {
        match self {
            CoverageType::Basic => 100,
            CoverageType::Standard => 135,
            CoverageType::Comprehensive => 175,
        }
    }
}

/// Kind of goods being shipped.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum CargoType {
    General,
    Perishable,
    Fragile,
    Hazardous,
    Electronics,
    Vehicles,
    Bulk,
}

impl CargoType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CargoType::General => "general",
            CargoType::Perishable => "perishable",
            CargoType::Fragile => "fragile",
            CargoType::Hazardous => "hazardous",
            CargoType::Electronics => "electronics",
            CargoType::Vehicles => "vehicles",
            CargoType::Bulk => "bulk",
        }
    }

    /// Risk loading in percent.
    pub fn factor_percent(&self) -> i64 {
        match self {
            CargoType::General => 100,
            CargoType::Perishable => 140,
            CargoType::Fragile => 130,
            CargoType::Hazardous => 180,
            CargoType::Electronics => 125,
            CargoType::Vehicles => 115,
            CargoType::Bulk => 90,
        }
    }
}

/// Insurance company listed on the marketplace
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Company {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub name: String,
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
    /// Base premium rate in basis points of the cargo value.
    pub base_rate_bps: i64,
    /// Floor for any premium, minor currency units.
    pub min_premium: i64,
    /// Largest cargo value the company will cover, minor currency units.
    pub max_coverage: i64,
    /// Deductible in basis points of the coverage amount.
    pub deductible_bps: i64,
    /// Share of claims settled, 0-100.
    pub claim_settlement_ratio: f64,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub review_count: i64,
    #[serde(default)]
    pub is_verified: bool,
    pub is_active: bool,
    pub created_at: mongodb::bson::DateTime,
    pub updated_at: mongodb::bson::DateTime,
}

impl Company {
    pub fn covers(&self, coverage: CoverageType, cargo: CargoType) -> bool {
        self.coverage_types.contains(&coverage) && self.cargo_types.contains(&cargo)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enum_wire_format() {
        assert_eq!(
            serde_json::to_value(CoverageType::Comprehensive).unwrap(),
            serde_json::json!("comprehensive")
        );
        let cargo: CargoType = serde_json::from_str("\"perishable\"").unwrap();
        assert_eq!(cargo, CargoType::Perishable);
        assert_eq!(cargo.as_str(), "perishable");
    }
}
