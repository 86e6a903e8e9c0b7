//! Policy persistence, including the lazy expiry sweep.

use std::collections::HashMap;

use chrono::NaiveDate;
use futures::TryStreamExt;
use log::{debug, info};
use mongodb::bson::{doc, oid::ObjectId, Document};
use mongodb::options::ReturnDocument;
use mongodb::{Collection, Database};

use super::{counts_by_id, index, inserted_object_id, unique_index};
use crate::constants::COLLECTION_POLICIES;
use crate::errors::ApiError;
use crate::models::{Policy, PolicyStatus};

pub struct PolicyRepository {
    collection: Collection<Policy>,
}

fn live_statuses() -> Vec<&'static str> {
    PolicyStatus::live().iter().map(|s| s.as_str()).collect()
}

impl PolicyRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection(COLLECTION_POLICIES),
        }
    }

    pub async fn create_indexes(&self) -> Result<(), ApiError> {
        info!("Creating database indexes for policies collection...");
        self.collection
            .create_indexes(vec![
                unique_index(doc! { "policy_number": 1 }),
                index(doc! { "user_id": 1, "status": 1 }),
                index(doc! { "shipment_id": 1 }),
                index(doc! { "company_id": 1 }),
                index(doc! { "status": 1, "end_date": 1 }),
            ])
            .await?;
        Ok(())
    }

    pub async fn insert(&self, policy: &Policy) -> Result<ObjectId, ApiError> {
        let result = self.collection.insert_one(policy).await?;
        inserted_object_id(result)
    }

    pub async fn find_by_id(&self, id: ObjectId) -> Result<Option<Policy>, ApiError> {
        Ok(self.collection.find_one(doc! { "_id": id }).await?)
    }

    /// A policy that still holds the shipment (pending payment, active or claimed).
    pub async fn find_live_for_shipment(&self, shipment_id: ObjectId) -> Result<Option<Policy>, ApiError> {
        Ok(self
            .collection
            .find_one(doc! {
                "shipment_id": shipment_id,
                "status": { "$in": live_statuses() }
            })
            .await?)
    }

    pub async fn exists_for_company(&self, company_id: ObjectId) -> Result<bool, ApiError> {
        Ok(self
            .collection
            .find_one(doc! { "company_id": company_id })
            .await?
            .is_some())
    }

    pub async fn find_with_filter(
        &self,
        filter: Document,
        skip: u64,
        limit: i64,
    ) -> Result<Vec<Policy>, ApiError> {
        debug!("Repository: Finding policies with filter: {:?}", filter);
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

    /// Mark every active policy whose cover ended before `today` as expired.
    pub async fn expire_lapsed(&self, today: NaiveDate) -> Result<u64, ApiError> {
        let result = self
            .collection
            .update_many(
                doc! {
                    "status": PolicyStatus::Active.as_str(),
                    "end_date": { "$lt": today.to_string() }
                },
                doc! { "$set": {
                    "status": PolicyStatus::Expired.as_str(),
                    "updated_at": mongodb::bson::DateTime::now()
                }},
            )
            .await?;
        Ok(result.modified_count)
    }

    /// Conditional status change; `None` when the policy was not in `from`.
    pub async fn transition(
        &self,
        id: ObjectId,
        from: PolicyStatus,
        mut set: Document,
    ) -> Result<Option<Policy>, ApiError> {
        set.insert("updated_at", mongodb::bson::DateTime::now());
        Ok(self
            .collection
            .find_one_and_update(doc! { "_id": id, "status": from.as_str() }, doc! { "$set": set })
            .return_document(ReturnDocument::After)
            .await?)
    }

    /// Activate a policy after its premium was paid.
    pub async fn activate(&self, id: ObjectId, payment_id: &str) -> Result<Option<Policy>, ApiError> {
        self.transition(
            id,
            PolicyStatus::PendingPayment,
            doc! {
                "status": PolicyStatus::Active.as_str(),
                "payment_id": payment_id,
                "activated_at": mongodb::bson::DateTime::now()
            },
        )
        .await
    }

    /// Mark a policy as claimed once a claim on it is settled.
    pub async fn mark_claimed(&self, id: ObjectId) -> Result<Option<Policy>, ApiError> {
        let claimable = vec![PolicyStatus::Active.as_str(), PolicyStatus::Expired.as_str()];
        Ok(self
            .collection
            .find_one_and_update(
                doc! { "_id": id, "status": { "$in": claimable } },
                doc! { "$set": {
                    "status": PolicyStatus::Claimed.as_str(),
                    "updated_at": mongodb::bson::DateTime::now()
                }},
            )
            .return_document(ReturnDocument::After)
            .await?)
    }

    pub async fn count_by_status(&self) -> Result<HashMap<String, u64>, ApiError> {
        let pipeline = vec![doc! { "$group": { "_id": "$status", "count": { "$sum": 1 } } }];
        let groups = self.collection.aggregate(pipeline).await?.try_collect().await?;
        Ok(counts_by_id(groups))
    }
}
