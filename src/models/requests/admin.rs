//! Back-office account request models.

use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::models::AdminRole;
use crate::validators::{validate_not_blank, validate_password_strength};

/// Request payload for creating an admin (superadmin only)
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateAdminRequest {
    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "ops@cargoinsure.local")]
    pub email: String,
    #[validate(
        length(min = 2, max = 100, message = "Name must be between 2 and 100 characters"),
        custom(function = "validate_not_blank")
    )]
    pub name: String,
    #[validate(custom(function = "validate_password_strength"))]
    pub password: String,
    #[serde(default)]
    pub role: AdminRole,
}
