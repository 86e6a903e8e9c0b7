//! Payment log persistence.

use futures::TryStreamExt;
use log::{debug, info};
use mongodb::bson::{doc, oid::ObjectId, Document};
use mongodb::options::ReturnDocument;
use mongodb::{Collection, Database};

use super::{index, inserted_object_id, numeric, unique_index};
use crate::constants::COLLECTION_PAYMENT_LOGS;
use crate::errors::ApiError;
use crate::models::{PaymentLog, PaymentStatus};

pub struct PaymentRepository {
    collection: Collection<PaymentLog>,
}

impl PaymentRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection(COLLECTION_PAYMENT_LOGS),
        }
    }

    pub async fn create_indexes(&self) -> Result<(), ApiError> {
        info!("Creating database indexes for payment_logs collection...");
        self.collection
            .create_indexes(vec![
                unique_index(doc! { "order_id": 1 }),
                index(doc! { "policy_id": 1, "status": 1 }),
                index(doc! { "user_id": 1, "created_at": -1 }),
            ])
            .await?;
        Ok(())
    }

    pub async fn insert(&self, log: &PaymentLog) -> Result<ObjectId, ApiError> {
        let result = self.collection.insert_one(log).await?;
        inserted_object_id(result)
    }

    pub async fn find_by_order_id(&self, order_id: &str) -> Result<Option<PaymentLog>, ApiError> {
        Ok(self.collection.find_one(doc! { "order_id": order_id }).await?)
    }

    /// An unpaid order already opened for the policy, reused instead of creating a new one.
    pub async fn find_open_for_policy(&self, policy_id: ObjectId) -> Result<Option<PaymentLog>, ApiError> {
        Ok(self
            .collection
            .find_one(doc! {
                "policy_id": policy_id,
                "status": PaymentStatus::Created.as_str()
            })
            .await?)
    }

    pub async fn find_with_filter(
        &self,
        filter: Document,
        skip: u64,
        limit: i64,
    ) -> Result<Vec<PaymentLog>, ApiError> {
        debug!("Repository: Finding payments with filter: {:?}", filter);
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

    /// Record a successful payment unless the log is already `paid`.
    pub async fn mark_paid(
        &self,
        order_id: &str,
        payment_id: &str,
        signature: Option<&str>,
    ) -> Result<Option<PaymentLog>, ApiError> {
        let now = mongodb::bson::DateTime::now();
        let mut set = doc! {
            "status": PaymentStatus::Paid.as_str(),
            "payment_id": payment_id,
            "paid_at": now,
            "updated_at": now,
        };
        if let Some(signature) = signature {
            set.insert("signature", signature);
        }

        Ok(self
            .collection
            .find_one_and_update(
                doc! {
                    "order_id": order_id,
                    "status": { "$ne": PaymentStatus::Paid.as_str() }
                },
                doc! { "$set": set, "$unset": { "failure_reason": "" } },
            )
            .return_document(ReturnDocument::After)
            .await?)
    }

    /// Record a failure unless the order has already been paid.
    pub async fn mark_failed(&self, order_id: &str, reason: &str) -> Result<(), ApiError> {
        self.collection
            .update_one(
                doc! {
                    "order_id": order_id,
                    "status": { "$ne": PaymentStatus::Paid.as_str() }
                },
                doc! { "$set": {
                    "status": PaymentStatus::Failed.as_str(),
                    "failure_reason": reason,
                    "updated_at": mongodb::bson::DateTime::now()
                }},
            )
            .await?;
        Ok(())
    }

    /// Close every still-open order for a policy, e.g. once it is cancelled.
    pub async fn fail_open_for_policy(&self, policy_id: ObjectId, reason: &str) -> Result<u64, ApiError> {
        let result = self
            .collection
            .update_many(
                doc! {
                    "policy_id": policy_id,
                    "status": PaymentStatus::Created.as_str()
                },
                doc! { "$set": {
                    "status": PaymentStatus::Failed.as_str(),
                    "failure_reason": reason,
                    "updated_at": mongodb::bson::DateTime::now()
                }},
            )
            .await?;
        Ok(result.modified_count)
    }

    /// Sum of all paid premiums.
    pub async fn paid_total(&self) -> Result<i64, ApiError> {
        let pipeline = vec![
            doc! { "$match": { "status": PaymentStatus::Paid.as_str() } },
            doc! { "$group": { "_id": null, "total": { "$sum": "$amount" } } },
        ];
        let groups: Vec<Document> = self.collection.aggregate(pipeline).await?.try_collect().await?;
        Ok(groups.first().map(|g| numeric(g, "total")).unwrap_or(0))
    }
}
