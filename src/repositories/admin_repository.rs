//! Back-office account persistence.

use futures::TryStreamExt;
use log::info;
use mongodb::bson::{doc, oid::ObjectId};
use mongodb::results::UpdateResult;
use mongodb::{Collection, Database};

use super::{inserted_object_id, unique_index};
use crate::constants::COLLECTION_ADMINS;
use crate::errors::ApiError;
use crate::models::{Admin, AdminRole};

pub struct AdminRepository {
    collection: Collection<Admin>,
}

impl AdminRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection(COLLECTION_ADMINS),
        }
    }

    pub async fn create_indexes(&self) -> Result<(), ApiError> {
        info!("Creating database indexes for admins collection...");
        self.collection
            .create_indexes(vec![unique_index(doc! { "email": 1 })])
            .await?;
        Ok(())
    }

    pub async fn insert(&self, admin: &Admin) -> Result<ObjectId, ApiError> {
        let result = self.collection.insert_one(admin).await?;
        inserted_object_id(result)
    }

    pub async fn find_by_id(&self, id: ObjectId) -> Result<Option<Admin>, ApiError> {
        Ok(self.collection.find_one(doc! { "_id": id }).await?)
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<Admin>, ApiError> {
        Ok(self
            .collection
            .find_one(doc! { "email": email.trim().to_lowercase() })
            .await?)
    }

    pub async fn exists_with_role(&self, role: AdminRole) -> Result<bool, ApiError> {
        Ok(self
            .collection
            .find_one(doc! { "role": role.as_str() })
            .await?
            .is_some())
    }

    pub async fn find_page(&self, skip: u64, limit: i64) -> Result<Vec<Admin>, ApiError> {
        let cursor = self
            .collection
            .find(doc! {})
            .skip(skip)
            .limit(limit)
            .sort(doc! { "created_at": 1 })
            .await?;
        Ok(cursor.try_collect().await?)
    }

    pub async fn count(&self) -> Result<u64, ApiError> {
        Ok(self.collection.count_documents(doc! {}).await?)
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

    pub async fn update_status(&self, id: ObjectId, is_active: bool) -> Result<UpdateResult, ApiError> {
        Ok(self
            .collection
            .update_one(
                doc! { "_id": id },
                doc! {
                    "$set": {
                        "is_active": is_active,
                        "updated_at": mongodb::bson::DateTime::now()
                    }
                },
            )
            .await?)
    }
}
