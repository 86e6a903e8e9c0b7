//! Back-office account response models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::{Admin, AdminRole};
use crate::utils::time::{to_utc, to_utc_opt};

#[derive(Debug, Serialize, Deserialize, Clone, ToSchema)]
pub struct AdminResponse {
    pub id: String,
    pub email: String,
    pub name: String,
    pub role: AdminRole,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_login: Option<DateTime<Utc>>,
}

impl From<Admin> for AdminResponse {
    fn from(admin: Admin) -> Self {
        Self {
            id: admin.id.map(|id| id.to_hex()).unwrap_or_default(),
            email: admin.email,
            name: admin.name,
            role: admin.role,
            is_active: admin.is_active,
            created_at: to_utc(admin.created_at),
            last_login: to_utc_opt(admin.last_login),
        }
    }
}

/// Response for successful admin authentication
#[derive(Debug, Serialize, ToSchema)]
pub struct AdminAuthResponse {
    pub success: bool,
    pub message: String,
    pub token: String,
    pub admin: AdminResponse,
}
