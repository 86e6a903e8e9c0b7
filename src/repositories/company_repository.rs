//! Insurer listings persistence.

use futures::TryStreamExt;
use log::{debug, info};
use mongodb::bson::{doc, oid::ObjectId, Document};
use mongodb::options::ReturnDocument;
use mongodb::results::DeleteResult;
use mongodb::{Collection, Database};

use super::{index, inserted_object_id, unique_index};
use crate::constants::COLLECTION_COMPANIES;
use crate::errors::ApiError;
use crate::models::Company;

pub struct CompanyRepository {
    collection: Collection<Company>,
}

impl CompanyRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection(COLLECTION_COMPANIES),
        }
    }

    /// Unique `slug`; `(is_active, rating)` backs the default public listing.
    pub async fn create_indexes(&self) -> Result<(), ApiError> {
        info!("Creating database indexes for companies collection...");
        self.collection
            .create_indexes(vec![
                unique_index(doc! { "slug": 1 }),
                index(doc! { "is_active": 1, "rating": -1 }),
                index(doc! { "coverage_types": 1 }),
                index(doc! { "cargo_types": 1 }),
            ])
            .await?;
        Ok(())
    }

    pub async fn insert(&self, company: &Company) -> Result<ObjectId, ApiError> {
        let result = self.collection.insert_one(company).await?;
        inserted_object_id(result)
    }

    pub async fn find_by_id(&self, id: ObjectId) -> Result<Option<Company>, ApiError> {
        Ok(self.collection.find_one(doc! { "_id": id }).await?)
    }

    pub async fn find_by_slug(&self, slug: &str) -> Result<Option<Company>, ApiError> {
        Ok(self.collection.find_one(doc! { "slug": slug }).await?)
    }

    pub async fn find_with_filter(
        &self,
        filter: Document,
        sort: Document,
        skip: u64,
        limit: i64,
    ) -> Result<Vec<Company>, ApiError> {
        debug!("Repository: Finding companies with filter: {:?}", filter);
        let cursor = self
            .collection
            .find(filter)
            .sort(sort)
            .skip(skip)
            .limit(limit)
            .await?;
        Ok(cursor.try_collect().await?)
    }

    pub async fn count(&self, filter: Document) -> Result<u64, ApiError> {
        Ok(self.collection.count_documents(filter).await?)
    }

    /// `$set` the given fields and return the updated company.
    pub async fn update(&self, id: ObjectId, mut set: Document) -> Result<Option<Company>, ApiError> {
        set.insert("updated_at", mongodb::bson::DateTime::now());
        Ok(self
            .collection
            .find_one_and_update(doc! { "_id": id }, doc! { "$set": set })
            .return_document(ReturnDocument::After)
            .await?)
    }

    pub async fn update_rating(&self, id: ObjectId, rating: f64, review_count: i64) -> Result<(), ApiError> {
        self.update(
            id,
            doc! { "rating": rating, "review_count": review_count },
        )
        .await?;
        Ok(())
    }

    pub async fn delete(&self, id: ObjectId) -> Result<DeleteResult, ApiError> {
        Ok(self.collection.delete_one(doc! { "_id": id }).await?)
    }
}
