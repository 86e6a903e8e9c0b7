//! Common validation utilities and helpers.

use mongodb::bson::oid::ObjectId;
use validator::ValidationErrors;

use crate::constants::{
    CODE_BULK_LIMIT_EXCEEDED, CODE_BULK_REQUIRED, CODE_FORBIDDEN, CODE_INVALID_ID,
    CODE_PASSWORD_MISMATCH, CODE_SAME_PASSWORD, CODE_VALIDATION_FAILED, ERR_AT_LEAST_ONE_USER_ID,
    ERR_INVALID_ID, ERR_NOT_OWNER, ERR_PASSWORD_MISMATCH, ERR_SAME_PASSWORD,
};
use crate::errors::ApiError;

/// Maximum number of accounts for bulk operations.
pub const MAX_BULK_SIZE: usize = 100;

/// Convert validator errors to ApiError::ValidationError.
///
/// This helper function extracts error messages from ValidationErrors
/// and converts them into a format suitable for API responses.
///
/// # Example
/// ```ignore
/// body.validate().map_err(validation_errors_to_api_error)?;
/// ```
pub fn validation_errors_to_api_error(e: ValidationErrors) -> ApiError {
    let mut errors: Vec<String> = e
        .field_errors()
        .iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| match &e.message {
                Some(message) => message.to_string(),
                None => format!("{} is invalid", field),
            })
        })
        .collect();
    errors.sort();
    ApiError::ValidationError {
        code: CODE_VALIDATION_FAILED.to_string(),
        errors,
    }
}

/// Parse a hex ObjectId coming from a path or body.
pub fn parse_object_id(id: &str) -> Result<ObjectId, ApiError> {
    ObjectId::parse_str(id.trim()).map_err(|_| ApiError::bad_request(CODE_INVALID_ID, ERR_INVALID_ID))
}

/// Reject access to a record owned by another account.
pub fn ensure_owner(owner_id: ObjectId, user_id: &str) -> Result<(), ApiError> {
    if owner_id.to_hex() != user_id {
        return Err(ApiError::forbidden(CODE_FORBIDDEN, ERR_NOT_OWNER));
    }
    Ok(())
}

/// Validate that password confirmation matches the new password.
pub fn validate_password_match(new_password: &str, confirm_password: &str) -> Result<(), ApiError> {
    if new_password != confirm_password {
        return Err(ApiError::bad_request(CODE_PASSWORD_MISMATCH, ERR_PASSWORD_MISMATCH));
    }
    Ok(())
}

/// Validate that new password is different from current password.
pub fn validate_password_different(
    current_password: &str,
    new_password: &str,
) -> Result<(), ApiError> {
    if current_password == new_password {
        return Err(ApiError::bad_request(CODE_SAME_PASSWORD, ERR_SAME_PASSWORD));
    }
    Ok(())
}

/// Validate bulk account IDs for bulk operations.
///
/// Returns an error if the list is empty or exceeds the maximum size.
pub fn validate_bulk_ids(ids: &[String]) -> Result<(), ApiError> {
    if ids.is_empty() {
        return Err(ApiError::bad_request(CODE_BULK_REQUIRED, ERR_AT_LEAST_ONE_USER_ID));
    }

    if ids.len() > MAX_BULK_SIZE {
        return Err(ApiError::bad_request(
            CODE_BULK_LIMIT_EXCEEDED,
            format!("Maximum {} accounts can be updated at once", MAX_BULK_SIZE),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use validator::Validate;

    #[derive(Debug, Deserialize, Validate)]
    struct Sample {
        #[validate(email(message = "Invalid email format"))]
        email: String,
        #[validate(length(min = 3))]
        name: String,
    }

    #[test]
    fn test_validation_errors_are_collected() {
        let sample = Sample {
            email: "nope".into(),
            name: "x".into(),
        };
        let err = validation_errors_to_api_error(sample.validate().unwrap_err());
        match err {
            ApiError::ValidationError { code, errors } => {
                assert_eq!(code, CODE_VALIDATION_FAILED);
                assert_eq!(errors.len(), 2);
                assert!(errors.contains(&"Invalid email format".to_string()));
                assert!(errors.contains(&"name is invalid".to_string()));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_parse_object_id() {
        assert!(parse_object_id("507f1f77bcf86cd799439011").is_ok());
        assert_eq!(parse_object_id("nope").unwrap_err().code(), CODE_INVALID_ID);
    }

    #[test]
    fn test_ensure_owner() {
        let owner = ObjectId::new();
        assert!(ensure_owner(owner, &owner.to_hex()).is_ok());
        assert_eq!(
            ensure_owner(owner, &ObjectId::new().to_hex()).unwrap_err().code(),
            CODE_FORBIDDEN
        );
    }

    #[test]
    fn test_password_helpers() {
        assert!(validate_password_match("A", "A").is_ok());
        assert_eq!(
            validate_password_match("A", "B").unwrap_err().code(),
            CODE_PASSWORD_MISMATCH
        );
        assert_eq!(
            validate_password_different("A", "A").unwrap_err().code(),
            CODE_SAME_PASSWORD
        );
    }

    #[test]
    fn test_bulk_limits() {
        assert_eq!(validate_bulk_ids(&[]).unwrap_err().code(), CODE_BULK_REQUIRED);
        let too_many: Vec<String> = (0..=MAX_BULK_SIZE).map(|i| i.to_string()).collect();
        assert_eq!(
            validate_bulk_ids(&too_many).unwrap_err().code(),
            CODE_BULK_LIMIT_EXCEEDED
        );
        assert!(validate_bulk_ids(&["a".to_string()]).is_ok());
    }
}
