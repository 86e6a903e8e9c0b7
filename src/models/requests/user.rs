//! Customer account request models.

use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::validators::{validate_not_blank, validate_password_strength};

/// Request payload for updating the caller's profile
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateProfileRequest {
    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "new@example.com")]
    pub email: Option<String>,
    #[validate(
        length(min = 2, max = 100, message = "Name must be between 2 and 100 characters"),
        custom(function = "validate_not_blank")
    )]
    pub name: Option<String>,
    #[validate(length(max = 20, message = "Phone must be at most 20 characters"))]
    pub phone: Option<String>,
    #[validate(length(max = 100, message = "Company name must be at most 100 characters"))]
    pub company_name: Option<String>,
}

/// Request payload for changing password
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ChangePasswordRequest {
    #[validate(length(min = 1, message = "Current password is required"))]
    #[schema(example = "CurrentPass123!")]
    pub current_password: String,
    #[validate(custom(function = "validate_password_strength"))]
    #[schema(example = "NewSecurePass456!")]
    pub new_password: String,
    #[schema(example = "NewSecurePass456!")]
    pub confirm_password: String,
}

/// Request payload for activating or deactivating an account (admin only)
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateStatusRequest {
    #[schema(example = true)]
    pub is_active: bool,
}

/// Request payload for bulk updating customer status (admin only)
#[derive(Debug, Deserialize, ToSchema)]
pub struct BulkUpdateStatusRequest {
    #[schema(example = json!(["507f1f77bcf86cd799439011", "507f1f77bcf86cd799439012"]))]
    pub user_ids: Vec<String>,
    #[schema(example = false)]
    pub is_active: bool,
}

/// Query parameters for the admin customer listing
#[derive(Debug, Deserialize)]
pub struct UserListQuery {
    pub page: Option<u64>,
    pub per_page: Option<u64>,
    pub is_active: Option<bool>,
    /// Matches email or name
    pub search: Option<String>,
}
