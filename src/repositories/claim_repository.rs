//! Claim persistence. Every status change is a compare-and-set on the current status.

use std::collections::HashMap;

use futures::TryStreamExt;
use log::{debug, info};
use mongodb::bson::{doc, oid::ObjectId, Document};
use mongodb::options::ReturnDocument;
use mongodb::{Collection, Database};

use super::{counts_by_id, index, inserted_object_id, numeric, unique_index};
use crate::constants::COLLECTION_CLAIMS;
use crate::errors::ApiError;
use crate::models::{Claim, ClaimStatus, ClaimStatusChange};

pub struct ClaimRepository {
    collection: Collection<Claim>,
}

impl ClaimRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection(COLLECTION_CLAIMS),
        }
    }

    pub async fn create_indexes(&self) -> Result<(), ApiError> {
        info!("Creating database indexes for claims collection...");
        self.collection
            .create_indexes(vec![
                unique_index(doc! { "claim_number": 1 }),
                index(doc! { "status": 1, "created_at": -1 }),
                index(doc! { "policy_id": 1 }),
                index(doc! { "user_id": 1, "created_at": -1 }),
            ])
            .await?;
        Ok(())
    }

    pub async fn insert(&self, claim: &Claim) -> Result<ObjectId, ApiError> {
        let result = self.collection.insert_one(claim).await?;
        inserted_object_id(result)
    }

    pub async fn find_by_id(&self, id: ObjectId) -> Result<Option<Claim>, ApiError> {
        Ok(self.collection.find_one(doc! { "_id": id }).await?)
    }

    pub async fn has_open_claim(&self, policy_id: ObjectId) -> Result<bool, ApiError> {
        let open: Vec<&str> = ClaimStatus::open().iter().map(|s| s.as_str()).collect();
        Ok(self
            .collection
            .find_one(doc! { "policy_id": policy_id, "status": { "$in": open } })
            .await?
            .is_some())
    }

    pub async fn find_with_filter(
        &self,
        filter: Document,
        skip: u64,
        limit: i64,
    ) -> Result<Vec<Claim>, ApiError> {
        debug!("Repository: Finding claims with filter: {:?}", filter);
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

    /// Apply `set` and append `change` to the history, but only if the claim is
    /// still in `change.from`. `None` means another writer got there first.
    pub async fn transition(
        &self,
        id: ObjectId,
        change: &ClaimStatusChange,
        mut set: Document,
    ) -> Result<Option<Claim>, ApiError> {
        let from = change
            .from
            .ok_or_else(|| ApiError::internal("Claim transition without a source status"))?;

        set.insert("status", change.to.as_str());
        set.insert("updated_at", change.at);

        Ok(self
            .collection
            .find_one_and_update(
                doc! { "_id": id, "status": from.as_str() },
                doc! {
                    "$set": set,
                    "$push": { "history": mongodb::bson::to_bson(change)? }
                },
            )
            .return_document(ReturnDocument::After)
            .await?)
    }

    /// Append a document URL while the claim accepts documents and is under `max`.
    pub async fn push_document(
        &self,
        id: ObjectId,
        url: &str,
        max: usize,
    ) -> Result<Option<Claim>, ApiError> {
        let accepting = vec![ClaimStatus::Submitted.as_str(), ClaimStatus::UnderReview.as_str()];
        let mut filter = doc! { "_id": id, "status": { "$in": accepting } };
        // the slot at index max-1 must still be empty
        filter.insert(
            format!("documents.{}", max.saturating_sub(1)),
            doc! { "$exists": false },
        );

        Ok(self
            .collection
            .find_one_and_update(
                filter,
                doc! {
                    "$push": { "documents": url },
                    "$set": { "updated_at": mongodb::bson::DateTime::now() }
                },
            )
            .return_document(ReturnDocument::After)
            .await?)
    }

    pub async fn count_by_status(&self) -> Result<HashMap<String, u64>, ApiError> {
        let pipeline = vec![doc! { "$group": { "_id": "$status", "count": { "$sum": 1 } } }];
        let groups = self.collection.aggregate(pipeline).await?.try_collect().await?;
        Ok(counts_by_id(groups))
    }

    /// Sum of approved amounts across settled claims.
    pub async fn settled_total(&self) -> Result<i64, ApiError> {
        let pipeline = vec![
            doc! { "$match": { "status": ClaimStatus::Settled.as_str() } },
            doc! { "$group": { "_id": null, "total": { "$sum": "$approved_amount" } } },
        ];
        let groups: Vec<Document> = self.collection.aggregate(pipeline).await?.try_collect().await?;
        Ok(groups.first().map(|g| numeric(g, "total")).unwrap_or(0))
    }

    pub async fn recent(&self, limit: i64) -> Result<Vec<Claim>, ApiError> {
        self.find_with_filter(doc! {}, 0, limit).await
    }
}
