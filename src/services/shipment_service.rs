//! Customer shipments and the admin status workflow.

use std::sync::Arc;

use log::{debug, info, warn};
use mongodb::bson::{doc, oid::ObjectId, Document};

use crate::constants::{
    CODE_INVALID_TRANSITION, CODE_SHIPMENT_LOCKED, CODE_SHIPMENT_NOT_FOUND, ERR_SHIPMENT_LOCKED,
    ERR_SHIPMENT_NOT_FOUND,
};
use crate::errors::ApiError;
use crate::models::{
    CreateShipmentRequest, PageParams, PaginatedResponse, Shipment, ShipmentListQuery,
    ShipmentResponse, ShipmentStatus, UpdateShipmentRequest,
};
use crate::repositories::{PolicyRepository, ShipmentRepository};
use crate::utils::{generate_reference, today, TRACKING_PREFIX};
use crate::validators::{ensure_owner, parse_object_id, validate_route_and_dates};

fn not_found() -> ApiError {
    ApiError::not_found(CODE_SHIPMENT_NOT_FOUND, ERR_SHIPMENT_NOT_FOUND)
}

fn locked() -> ApiError {
    ApiError::conflict(CODE_SHIPMENT_LOCKED, ERR_SHIPMENT_LOCKED)
}

/// A shipment can be edited or deleted only while pending and uninsured.
pub fn ensure_editable(shipment: &Shipment, has_live_policy: bool) -> Result<(), ApiError> {
    if shipment.status != ShipmentStatus::Pending || has_live_policy {
        return Err(locked());
    }
    Ok(())
}

pub fn ensure_transition(from: ShipmentStatus, to: ShipmentStatus) -> Result<(), ApiError> {
    if !from.can_transition_to(to) {
        return Err(ApiError::bad_request(
            CODE_INVALID_TRANSITION,
            format!("Cannot move shipment from {} to {}", from.as_str(), to.as_str()),
        ));
    }
    Ok(())
}

pub struct ShipmentService {
    shipments: Arc<ShipmentRepository>,
    policies: Arc<PolicyRepository>,
}

impl ShipmentService {
    pub fn new(shipments: Arc<ShipmentRepository>, policies: Arc<PolicyRepository>) -> Self {
        Self {
            shipments,
            policies,
        }
    }

    pub async fn create(
        &self,
        user_id: &str,
        req: CreateShipmentRequest,
    ) -> Result<Shipment, ApiError> {
        let user_oid = parse_object_id(user_id)?;
        let today = today();
        validate_route_and_dates(
            &req.origin,
            &req.destination,
            req.departure_date,
            req.arrival_date,
            today,
            true,
        )?;

        let now = mongodb::bson::DateTime::now();
        let shipment = Shipment {
            id: None,
            user_id: user_oid,
            tracking_number: generate_reference(TRACKING_PREFIX, today),
            origin: req.origin.trim().to_string(),
            destination: req.destination.trim().to_string(),
            cargo_type: req.cargo_type,
            description: req.description.trim().to_string(),
            cargo_value: req.cargo_value,
            weight_kg: req.weight_kg,
            transport_mode: req.transport_mode,
            departure_date: req.departure_date,
            arrival_date: req.arrival_date,
            status: ShipmentStatus::Pending,
            created_at: now,
            updated_at: now,
        };

        let id = self.shipments.insert(&shipment).await?;
        info!("Shipment {} created for user {}", shipment.tracking_number, user_id);
        Ok(Shipment {
            id: Some(id),
            ..shipment
        })
    }

    pub async fn list_for_user(
        &self,
        user_id: &str,
        query: &ShipmentListQuery,
    ) -> Result<PaginatedResponse<ShipmentResponse>, ApiError> {
        let mut filter = doc! { "user_id": parse_object_id(user_id)? };
        if let Some(status) = query.status {
            filter.insert("status", status.as_str());
        }
        self.page(filter, PageParams::new(query.page, query.per_page)).await
    }

    pub async fn list_admin(
        &self,
        query: &ShipmentListQuery,
    ) -> Result<PaginatedResponse<ShipmentResponse>, ApiError> {
        let mut filter = doc! {};
        if let Some(status) = query.status {
            filter.insert("status", status.as_str());
        }
        if let Some(user_id) = query.user_id.as_deref() {
            filter.insert("user_id", parse_object_id(user_id)?);
        }
        self.page(filter, PageParams::new(query.page, query.per_page)).await
    }

    async fn page(
        &self,
        filter: Document,
        params: PageParams,
    ) -> Result<PaginatedResponse<ShipmentResponse>, ApiError> {
        let total = self.shipments.count(filter.clone()).await?;
        let shipments = self
            .shipments
            .find_with_filter(filter, params.skip(), params.limit())
            .await?;
        Ok(PaginatedResponse::new(
            shipments.into_iter().map(ShipmentResponse::from).collect(),
            total,
            params,
        ))
    }

    pub async fn get(&self, shipment_id: &str) -> Result<Shipment, ApiError> {
        let object_id = parse_object_id(shipment_id)?;
        self.shipments
            .find_by_id(object_id)
            .await?
            .ok_or_else(not_found)
    }

    /// Fetch a shipment on behalf of its owner.
    pub async fn get_owned(&self, shipment_id: &str, user_id: &str) -> Result<Shipment, ApiError> {
        let shipment = self.get(shipment_id).await?;
        ensure_owner(shipment.user_id, user_id).inspect_err(|_| {
            warn!("User {} tried to access shipment {}", user_id, shipment_id);
        })?;
        Ok(shipment)
    }

    async fn ensure_unlocked(&self, shipment: &Shipment) -> Result<ObjectId, ApiError> {
        let id = shipment.id.ok_or_else(not_found)?;
        let insured = self.policies.find_live_for_shipment(id).await?.is_some();
        ensure_editable(shipment, insured)?;
        Ok(id)
    }

    pub async fn update(
        &self,
        shipment_id: &str,
        user_id: &str,
        req: UpdateShipmentRequest,
    ) -> Result<Shipment, ApiError> {
        let existing = self.get_owned(shipment_id, user_id).await?;
        let id = self.ensure_unlocked(&existing).await?;

        let origin = req.origin.as_deref().map(str::trim).unwrap_or(&existing.origin);
        let destination = req
            .destination
            .as_deref()
            .map(str::trim)
            .unwrap_or(&existing.destination);
        let departure = req.departure_date.unwrap_or(existing.departure_date);
        let arrival = req.arrival_date.unwrap_or(existing.arrival_date);
        let departure_changed = departure != existing.departure_date;

        validate_route_and_dates(origin, destination, departure, arrival, today(), departure_changed)?;

        let mut set = doc! {};
        if origin != existing.origin {
            set.insert("origin", origin);
        }
        if destination != existing.destination {
            set.insert("destination", destination);
        }
        if departure_changed {
            set.insert("departure_date", departure.to_string());
        }
        if arrival != existing.arrival_date {
            set.insert("arrival_date", arrival.to_string());
        }
        if let Some(cargo_type) = req.cargo_type {
            set.insert("cargo_type", cargo_type.as_str());
        }
        if let Some(description) = req.description {
            set.insert("description", description.trim());
        }
        if let Some(cargo_value) = req.cargo_value {
            set.insert("cargo_value", cargo_value);
        }
        if let Some(weight_kg) = req.weight_kg {
            set.insert("weight_kg", weight_kg);
        }
        if let Some(mode) = req.transport_mode {
            set.insert("transport_mode", mongodb::bson::to_bson(&mode)?);
        }

        if set.is_empty() {
            debug!("No changes detected for shipment {}", shipment_id);
            return Ok(existing);
        }

        let updated = self.shipments.update_pending(id, set).await?.ok_or_else(locked)?;
        info!("Shipment {} updated", updated.tracking_number);
        Ok(updated)
    }

    pub async fn delete(&self, shipment_id: &str, user_id: &str) -> Result<(), ApiError> {
        let existing = self.get_owned(shipment_id, user_id).await?;
        let id = self.ensure_unlocked(&existing).await?;

        let result = self.shipments.delete_pending(id).await?;
        if result.deleted_count == 0 {
            return Err(locked());
        }
        info!("Shipment {} deleted", existing.tracking_number);
        Ok(())
    }

    /// Admin status change along the shipment lifecycle.
    pub async fn update_status(
        &self,
        shipment_id: &str,
        status: ShipmentStatus,
    ) -> Result<Shipment, ApiError> {
        let existing = self.get(shipment_id).await?;
        let id = existing.id.ok_or_else(not_found)?;
        ensure_transition(existing.status, status)?;

        let updated = self
            .shipments
            .transition(id, existing.status, status)
            .await?
            .ok_or_else(|| {
                ApiError::bad_request(
                    CODE_INVALID_TRANSITION,
                    "Shipment status changed concurrently, reload and retry",
                )
            })?;

        info!(
            "Shipment {} moved from {} to {}",
            updated.tracking_number,
            existing.status.as_str(),
            status.as_str()
        );
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CargoType, TransportMode};
    use chrono::NaiveDate;

    fn shipment(status: ShipmentStatus) -> Shipment {
        let now = mongodb::bson::DateTime::now();
        Shipment {
            id: Some(ObjectId::new()),
            user_id: ObjectId::new(),
            tracking_number: "SHP-20261019-ABCDEF01".into(),
            origin: "Mumbai".into(),
            destination: "Rotterdam".into(),
            cargo_type: CargoType::General,
            description: "Machine parts".into(),
            cargo_value: 1_000_000,
            weight_kg: 1200.0,
            transport_mode: TransportMode::Sea,
            departure_date: NaiveDate::from_ymd_opt(2026, 11, 1).unwrap(),
            arrival_date: NaiveDate::from_ymd_opt(2026, 11, 28).unwrap(),
            status,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_pending_uninsured_shipment_is_editable() {
        assert!(ensure_editable(&shipment(ShipmentStatus::Pending), false).is_ok());
    }

    #[test]
    fn test_insured_or_moving_shipment_is_locked() {
        let err = ensure_editable(&shipment(ShipmentStatus::Pending), true).unwrap_err();
        assert_eq!(err.code(), CODE_SHIPMENT_LOCKED);

        let err = ensure_editable(&shipment(ShipmentStatus::InTransit), false).unwrap_err();
        assert_eq!(err.code(), CODE_SHIPMENT_LOCKED);
    }

    #[test]
    fn test_invalid_transition_is_bad_request() {
        assert!(ensure_transition(ShipmentStatus::Pending, ShipmentStatus::InTransit).is_ok());
        let err = ensure_transition(ShipmentStatus::Delivered, ShipmentStatus::Pending).unwrap_err();
        assert_eq!(err.code(), CODE_INVALID_TRANSITION);
        assert!(err.message().contains("delivered"));
    }
}
