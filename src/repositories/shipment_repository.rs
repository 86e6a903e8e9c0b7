//! Shipment persistence.

use futures::TryStreamExt;
use log::{debug, info};
use mongodb::bson::{doc, oid::ObjectId, Document};
use mongodb::options::ReturnDocument;
use mongodb::results::DeleteResult;
use mongodb::{Collection, Database};

use super::{index, inserted_object_id, unique_index};
use crate::constants::COLLECTION_SHIPMENTS;
use crate::errors::ApiError;
use crate::models::{Shipment, ShipmentStatus};

pub struct ShipmentRepository {
    collection: Collection<Shipment>,
}

impl ShipmentRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection(COLLECTION_SHIPMENTS),
        }
    }

    pub async fn create_indexes(&self) -> Result<(), ApiError> {
        info!("Creating database indexes for shipments collection...");
        self.collection
            .create_indexes(vec![
                unique_index(doc! { "tracking_number": 1 }),
                index(doc! { "user_id": 1, "created_at": -1 }),
                index(doc! { "status": 1 }),
            ])
            .await?;
        Ok(())
    }

    pub async fn insert(&self, shipment: &Shipment) -> Result<ObjectId, ApiError> {
        let result = self.collection.insert_one(shipment).await?;
        inserted_object_id(result)
    }

    pub async fn find_by_id(&self, id: ObjectId) -> Result<Option<Shipment>, ApiError> {
        Ok(self.collection.find_one(doc! { "_id": id }).await?)
    }

    pub async fn find_with_filter(
        &self,
        filter: Document,
        skip: u64,
        limit: i64,
    ) -> Result<Vec<Shipment>, ApiError> {
        debug!("Repository: Finding shipments with filter: {:?}", filter);
        let cursor = self
            .collection
            .find(filter)
            .sort(doc! { "created_at": -1 })
            .skip(skip)
            .limit(limit)
            .await?;
        Ok(cursor.try_collect().await?)
    }

    pub async fn count(&self, filter: Document) -> Result<u64, ApiError> {
        Ok(self.collection.count_documents(filter).await?)
    }

    /// Apply an edit only while the shipment is still `pending`.
    ///
    /// Returns `None` when the shipment left `pending` in the meantime.
    pub async fn update_pending(
        &self,
        id: ObjectId,
        mut set: Document,
    ) -> Result<Option<Shipment>, ApiError> {
        set.insert("updated_at", mongodb::bson::DateTime::now());
        Ok(self
            .collection
            .find_one_and_update(
                doc! { "_id": id, "status": ShipmentStatus::Pending.as_str() },
                doc! { "$set": set },
            )
            .return_document(ReturnDocument::After)
            .await?)
    }

    /// Move the shipment from `from` to `to`; `None` if it was no longer in `from`.
    pub async fn transition(
        &self,
        id: ObjectId,
        from: ShipmentStatus,
        to: ShipmentStatus,
    ) -> Result<Option<Shipment>, ApiError> {
        Ok(self
            .collection
            .find_one_and_update(
                doc! { "_id": id, "status": from.as_str() },
                doc! { "$set": {
                    "status": to.as_str(),
                    "updated_at": mongodb::bson::DateTime::now()
                }},
            )
            .return_document(ReturnDocument::After)
            .await?)
    }

    pub async fn delete_pending(&self, id: ObjectId) -> Result<DeleteResult, ApiError> {
        Ok(self
            .collection
            .delete_one(doc! { "_id": id, "status": ShipmentStatus::Pending.as_str() })
            .await?)
    }
}
