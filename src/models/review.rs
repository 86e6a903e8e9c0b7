use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/// A customer's rating of a company
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Review {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub company_id: ObjectId,
    pub user_id: ObjectId,
    /// Reviewer name at the time of writing.
    pub user_name: String,
    pub rating: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    pub created_at: mongodb::bson::DateTime,
}
