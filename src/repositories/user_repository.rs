//! Customer account persistence.

use futures::TryStreamExt;
use log::{debug, info};
use mongodb::bson::{doc, oid::ObjectId, Document};
use mongodb::results::UpdateResult;
use mongodb::{Collection, Database};

use super::{index, inserted_object_id, unique_index};
use crate::constants::COLLECTION_USERS;
use crate::errors::ApiError;
use crate::models::User;

/// Repository for customer accounts.
pub struct UserRepository {
    collection: Collection<User>,
}

impl UserRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection(COLLECTION_USERS),
        }
    }

    /// Unique `email`, plus `(is_active, created_at)` for the admin listing.
    pub async fn create_indexes(&self) -> Result<(), ApiError> {
        info!("Creating database indexes for users collection...");
        self.collection
            .create_indexes(vec![
                unique_index(doc! { "email": 1 }),
                index(doc! { "is_active": 1, "created_at": -1 }),
            ])
            .await?;
        Ok(())
    }

    pub async fn insert(&self, user: &User) -> Result<ObjectId, ApiError> {
        let result = self.collection.insert_one(user).await?;
        inserted_object_id(result)
    }

    pub async fn find_by_id(&self, id: ObjectId) -> Result<Option<User>, ApiError> {
        debug!("Repository: Finding user by ID: {}", id);
        Ok(self.collection.find_one(doc! { "_id": id }).await?)
    }

    /// Emails are stored lowercased.
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, ApiError> {
        Ok(self
            .collection
            .find_one(doc! { "email": email.trim().to_lowercase() })
            .await?)
    }

    pub async fn find_with_filter(
        &self,
        filter: Document,
        skip: u64,
        limit: i64,
    ) -> Result<Vec<User>, ApiError> {
        debug!("Repository: Finding users with filter: {:?}", filter);
        let cursor = self
            .collection
            .find(filter)
            .skip(skip)
            .limit(limit)
            .sort(doc! { "created_at": -1 })
            .await?;

        Ok(cursor.try_collect().await?)
    }

    pub async fn count(&self, filter: Document) -> Result<u64, ApiError> {
        Ok(self.collection.count_documents(filter).await?)
    }

    /// `$set` the given fields and bump `updated_at`.
    pub async fn update(&self, id: ObjectId, mut set: Document) -> Result<UpdateResult, ApiError> {
        set.insert("updated_at", mongodb::bson::DateTime::now());
        Ok(self
            .collection
            .update_one(doc! { "_id": id }, doc! { "$set": set })
            .await?)
    }

    pub async fn update_last_login(&self, id: ObjectId) -> Result<(), ApiError> {
        self.collection
            .update_one(
                doc! { "_id": id },
                doc! { "$set": { "last_login": mongodb::bson::DateTime::now() } },
            )
            .await?;
        Ok(())
    }

    pub async fn update_password(&self, id: ObjectId, password_hash: &str) -> Result<(), ApiError> {
        self.update(id, doc! { "password_hash": password_hash }).await?;
        Ok(())
    }

    pub async fn update_status(&self, id: ObjectId, is_active: bool) -> Result<UpdateResult, ApiError> {
        self.update(id, doc! { "is_active": is_active }).await
    }
}
