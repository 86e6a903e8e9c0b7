//! Shipment request models.

use chrono::NaiveDate;
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::models::{CargoType, ShipmentStatus, TransportMode};
use crate::validators::validate_not_blank;

/// Request payload for registering a shipment
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateShipmentRequest {
    #[validate(
        length(min = 2, max = 120, message = "Origin must be between 2 and 120 characters"),
        custom(function = "validate_not_blank")
    )]
    #[schema(example = "Nhava Sheva, IN")]
    pub origin: String,
    #[validate(
        length(min = 2, max = 120, message = "Destination must be between 2 and 120 characters"),
        custom(function = "validate_not_blank")
    )]
    #[schema(example = "Rotterdam, NL")]
    pub destination: String,
    pub cargo_type: CargoType,
    #[validate(length(min = 3, max = 1000, message = "Description must be between 3 and 1000 characters"))]
    #[schema(example = "40ft container of machine parts")]
    pub description: String,
    /// Declared value in minor currency units
    #[validate(range(min = 1, message = "Cargo value must be positive"))]
    #[schema(example = 250000000)]
    pub cargo_value: i64,
    #[validate(range(min = 0.001, message = "Weight must be positive"))]
    #[schema(example = 18500.0)]
    pub weight_kg: f64,
    pub transport_mode: TransportMode,
    #[schema(value_type = String, format = Date, example = "2026-11-01")]
    pub departure_date: NaiveDate,
    #[schema(value_type = String, format = Date, example = "2026-11-28")]
    pub arrival_date: NaiveDate,
}

/// Partial update of a pending shipment
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateShipmentRequest {
    #[validate(
        length(min = 2, max = 120, message = "Origin must be between 2 and 120 characters"),
        custom(function = "validate_not_blank")
    )]
    pub origin: Option<String>,
    #[validate(
        length(min = 2, max = 120, message = "Destination must be between 2 and 120 characters"),
        custom(function = "validate_not_blank")
    )]
    pub destination: Option<String>,
    pub cargo_type: Option<CargoType>,
    #[validate(length(min = 3, max = 1000, message = "Description must be between 3 and 1000 characters"))]
    pub description: Option<String>,
    #[validate(range(min = 1, message = "Cargo value must be positive"))]
    pub cargo_value: Option<i64>,
    #[validate(range(min = 0.001, message = "Weight must be positive"))]
    pub weight_kg: Option<f64>,
    pub transport_mode: Option<TransportMode>,
    #[schema(value_type = Option<String>, format = Date)]
    pub departure_date: Option<NaiveDate>,
    #[schema(value_type = Option<String>, format = Date)]
    pub arrival_date: Option<NaiveDate>,
}

/// Request payload for moving a shipment along its lifecycle (admin only)
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateShipmentStatusRequest {
    pub status: ShipmentStatus,
}

/// Query parameters for shipment listings
#[derive(Debug, Deserialize)]
pub struct ShipmentListQuery {
    pub page: Option<u64>,
    pub per_page: Option<u64>,
    pub status: Option<ShipmentStatus>,
    /// Only honoured on the admin listing.
    pub user_id: Option<String>,
}
