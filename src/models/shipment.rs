use chrono::NaiveDate;
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::CargoType;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum TransportMode {
    Sea,
    Air,
    Road,
    Rail,
}

impl TransportMode {
    /// Premium loading in percent.
    pub fn factor_percent(&self) -> i64 {
        match self {
            TransportMode::Sea => 110,
            TransportMode::Air => 90,
            TransportMode::Road => 100,
            TransportMode::Rail => 95,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ShipmentStatus {
    Pending,
    InTransit,
    Delivered,
    Cancelled,
}

impl ShipmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ShipmentStatus::Pending => "pending",
            ShipmentStatus::InTransit => "in_transit",
            ShipmentStatus::Delivered => "delivered",
            ShipmentStatus::Cancelled => "cancelled",
        }
    }

    /// Transitions an admin may apply.
    pub fn can_transition_to(&self, next: ShipmentStatus) -> bool {
        matches!(
            (self, next),
            (ShipmentStatus::Pending, ShipmentStatus::InTransit)
                | (ShipmentStatus::Pending, ShipmentStatus::Cancelled)
                | (ShipmentStatus::InTransit, ShipmentStatus::Delivered)
        )
    }

    pub fn is_insurable(&self) -> bool {
        matches!(self, ShipmentStatus::Pending | ShipmentStatus::InTransit)
    }
}

/// Consignment owned by a customer
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Shipment {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub user_id: ObjectId,
    pub tracking_number: String,
    pub origin: String,
    pub destination: String,
    pub cargo_type: CargoType,
    pub description: String,
    /// Declared value, minor currency units.
    pub cargo_value: i64,
    pub weight_kg: f64,
    pub transport_mode: TransportMode,
    pub departure_date: NaiveDate,
    pub arrival_date: NaiveDate,
    pub status: ShipmentStatus,
    pub created_at: mongodb::bson::DateTime,
    pub updated_at: mongodb::bson::DateTime,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shipment_transitions() {
        use ShipmentStatus::*;
        assert!(Pending.can_transition_to(InTransit));
        assert!(Pending.can_transition_to(Cancelled));
        assert!(InTransit.can_transition_to(Delivered));
        assert!(!InTransit.can_transition_to(Cancelled));
        assert!(!Delivered.can_transition_to(Pending));
        assert!(!Cancelled.can_transition_to(InTransit));
    }

    #[test]
    fn test_insurable_states() {
        assert!(ShipmentStatus::Pending.is_insurable());
        assert!(ShipmentStatus::InTransit.is_insurable());
        assert!(!ShipmentStatus::Delivered.is_insurable());
    }
}
