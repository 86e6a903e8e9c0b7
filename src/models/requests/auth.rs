//! Authentication request models.

use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::validators::{validate_not_blank, validate_password_strength};

/// Request payload for customer registration
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    /// Customer's email address
    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "shipper@example.com")]
    pub email: String,
    /// Full name (2-100 characters)
    #[validate(
        length(min = 2, max = 100, message = "Name must be between 2 and 100 characters"),
        custom(function = "validate_not_blank")
    )]
    #[schema(example = "Priya Shah")]
    pub name: String,
    /// Password (minimum 8 characters with uppercase, lowercase, digit, and special character)
    #[validate(custom(function = "validate_password_strength"))]
    #[schema(example = "SecurePass123!")]
    pub password: String,
    #[validate(length(max = 20, message = "Phone must be at most 20 characters"))]
    #[schema(example = "+919876543210")]
    pub phone: Option<String>,
    /// Trading name of the shipper's business
    #[validate(length(max = 100, message = "Company name must be at most 100 characters"))]
    #[schema(example = "Shah Exports")]
    pub company_name: Option<String>,
}

/// Request payload for customer or admin login
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "shipper@example.com")]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    #[schema(example = "SecurePass123!")]
    pub password: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_validation() {
        let ok = RegisterRequest {
            email: "a@b.com".into(),
            name: "Priya".into(),
            password: "SecurePass123!".into(),
            phone: None,
            company_name: None,
        };
        assert!(ok.validate().is_ok());

        let bad = RegisterRequest {
            email: "not-an-email".into(),
            name: "  ".into(),
            password: "weak".into(),
            phone: Some("1".repeat(30)),
            company_name: None,
        };
        let errors = bad.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("email"));
        assert!(fields.contains_key("name"));
        assert!(fields.contains_key("password"));
        assert!(fields.contains_key("phone"));
    }
}
