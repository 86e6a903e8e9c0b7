use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::{CargoType, Shipment, ShipmentStatus, TransportMode};
use crate::utils::time::to_utc;

#[derive(Debug, Serialize, Deserialize, Clone, ToSchema)]
pub struct ShipmentResponse {
    pub id: String,
    pub user_id: String,
    #[schema(example = "SHP-20261019-3FA85F64")]
    pub tracking_number: String,
    pub origin: String,
    pub destination: String,
    pub cargo_type: CargoType,
    pub description: String,
    pub cargo_value: i64,
    pub weight_kg: f64,
    pub transport_mode: TransportMode,
    #[schema(value_type = String, format = Date)]
    pub departure_date: NaiveDate,
    #[schema(value_type = String, format = Date)]
    pub arrival_date: NaiveDate,
    pub status: ShipmentStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Shipment> for ShipmentResponse {
    fn from(shipment: Shipment) -> Self {
        Self {
            id: shipment.id.map(|id| id.to_hex()).unwrap_or_default(),
            user_id: shipment.user_id.to_hex(),
            tracking_number: shipment.tracking_number,
            origin: shipment.origin,
            destination: shipment.destination,
            cargo_type: shipment.cargo_type,
            description: shipment.description,
            cargo_value: shipment.cargo_value,
            weight_kg: shipment.weight_kg,
            transport_mode: shipment.transport_mode,
            departure_date: shipment.departure_date,
            arrival_date: shipment.arrival_date,
            status: shipment.status,
            created_at: to_utc(shipment.created_at),
            updated_at: to_utc(shipment.updated_at),
        }
    }
}
