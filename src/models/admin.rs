use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;

use crate::constants::{ROLE_ADMIN, ROLE_SUPERADMIN};

/// Back-office roles
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum AdminRole {
    #[default]
    Admin,
    SuperAdmin,
}

impl AdminRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            AdminRole::Admin => ROLE_ADMIN,
            AdminRole::SuperAdmin => ROLE_SUPERADMIN,
        }
    }
}

impl fmt::Display for AdminRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Admin account stored in MongoDB
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Admin {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub email: String,
    pub name: String,
    pub password_hash: String,
    #[serde(default)]
    pub role: AdminRole,
    pub is_active: bool,
    pub created_at: mongodb::bson::DateTime,
    pub updated_at: mongodb::bson::DateTime,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_login: Option<mongodb::bson::DateTime>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_wire_format_matches_token_roles() {
        assert_eq!(
            serde_json::to_value(AdminRole::SuperAdmin).unwrap(),
            serde_json::json!(ROLE_SUPERADMIN)
        );
        assert_eq!(AdminRole::Admin.to_string(), ROLE_ADMIN);
    }
}
