//! Company review persistence.

use futures::TryStreamExt;
use log::info;
use mongodb::bson::{doc, oid::ObjectId, Bson};
use mongodb::{Collection, Database};

use super::{index, inserted_object_id, numeric, unique_index};
use crate::constants::COLLECTION_REVIEWS;
use crate::errors::ApiError;
use crate::models::Review;

pub struct ReviewRepository {
    collection: Collection<Review>,
}

impl ReviewRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection(COLLECTION_REVIEWS),
        }
    }

    /// One review per customer per company.
    pub async fn create_indexes(&self) -> Result<(), ApiError> {
        info!("Creating database indexes for reviews collection...");
        self.collection
            .create_indexes(vec![
                unique_index(doc! { "company_id": 1, "user_id": 1 }),
                index(doc! { "company_id": 1, "created_at": -1 }),
            ])
            .await?;
        Ok(())
    }

    pub async fn insert(&self, review: &Review) -> Result<ObjectId, ApiError> {
        let result = self.collection.insert_one(review).await?;
        inserted_object_id(result)
    }

    pub async fn exists(&self, company_id: ObjectId, user_id: ObjectId) -> Result<bool, ApiError> {
        Ok(self
            .collection
            .find_one(doc! { "company_id": company_id, "user_id": user_id })
            .await?
            .is_some())
    }

    pub async fn find_by_company(
        &self,
        company_id: ObjectId,
        skip: u64,
        limit: i64,
    ) -> Result<Vec<Review>, ApiError> {
        let cursor = self
            .collection
            .find(doc! { "company_id": company_id })
            .sort(doc! { "created_at": -1 })
            .skip(skip)
            .limit(limit)
            .await?;
        Ok(cursor.try_collect().await?)
    }

    pub async fn count_by_company(&self, company_id: ObjectId) -> Result<u64, ApiError> {
        Ok(self
            .collection
            .count_documents(doc! { "company_id": company_id })
            .await?)
    }

    /// Average rating and review count for a company.
    pub async fn rating_summary(&self, company_id: ObjectId) -> Result<(f64, i64), ApiError> {
        let pipeline = vec![
            doc! { "$match": { "company_id": company_id } },
            doc! { "$group": {
                "_id": Bson::Null,
                "average": { "$avg": "$rating" },
                "count": { "$sum": 1 }
            }},
        ];
        let groups: Vec<_> = self.collection.aggregate(pipeline).await?.try_collect().await?;

        Ok(match groups.first() {
            Some(group) => (
                group.get_f64("average").unwrap_or(0.0),
                numeric(group, "count"),
            ),
            None => (0.0, 0),
        })
    }
}
