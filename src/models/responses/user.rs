//! Customer-facing account response models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::User;
use crate::utils::time::{to_utc, to_utc_opt};

/// Customer data returned in API responses (without the password hash)
#[derive(Debug, Serialize, Deserialize, Clone, ToSchema)]
pub struct UserResponse {
    #[schema(example = "507f1f77bcf86cd799439011")]
    pub id: String,
    #[schema(example = "shipper@example.com")]
    pub email: String,
    #[schema(example = "Priya Shah")]
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
    #[schema(example = true)]
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_login: Option<DateTime<Utc>>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id.map(|id| id.to_hex()).unwrap_or_default(),
            email: user.email,
            name: user.name,
            phone: user.phone,
            company_name: user.company_name,
            is_active: user.is_active,
            created_at: to_utc(user.created_at),
            last_login: to_utc_opt(user.last_login),
        }
    }
}

/// Response for successful customer authentication
#[derive(Debug, Serialize, ToSchema)]
pub struct AuthResponse {
    pub success: bool,
    pub message: String,
    /// JWT token for authentication
    #[schema(example = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...")]
    pub token: String,
    pub user: UserResponse,
}

/// Result of a single account update in a bulk operation
#[derive(Debug, Serialize, ToSchema)]
pub struct BulkUpdateResult {
    pub user_id: String,
    pub success: bool,
    pub message: String,
}

/// Response for bulk update operations
#[derive(Debug, Serialize, ToSchema)]
pub struct BulkUpdateResponse {
    pub total_requested: usize,
    pub successful: usize,
    pub failed: usize,
    pub results: Vec<BulkUpdateResult>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::oid::ObjectId;

    #[test]
    fn test_user_response_hides_password_hash() {
        let now = mongodb::bson::DateTime::now();
        let id = ObjectId::new();
        let user = User {
            id: Some(id),
            email: "shipper@example.com".into(),
            name: "Priya".into(),
            phone: None,
            company_name: Some("Shah Exports".into()),
            password_hash: "$2b$12$secret".into(),
            is_active: true,
            created_at: now,
            updated_at: now,
            last_login: None,
        };

        let json = serde_json::to_value(UserResponse::from(user)).unwrap();
        assert_eq!(json["id"], id.to_hex());
        assert_eq!(json["company_name"], "Shah Exports");
        assert!(json.get("password_hash").is_none());
        assert!(json.get("last_login").is_none());
    }
}
