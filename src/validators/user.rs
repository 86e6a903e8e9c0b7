//! Account-related custom validators.

use validator::ValidationError;

use crate::constants::ERR_WEAK_PASSWORD;

/// Minimum password length accepted for any account.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Require at least eight characters with an uppercase letter, a lowercase letter,
/// a digit and a special character.
pub fn validate_password_strength(password: &str) -> Result<(), ValidationError> {
    let long_enough = password.chars().count() >= MIN_PASSWORD_LENGTH;
    let has_upper = password.chars().any(|c| c.is_uppercase());
    let has_lower = password.chars().any(|c| c.is_lowercase());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());
    let has_special = password
        .chars()
        .any(|c| !c.is_alphanumeric() && !c.is_whitespace());

    if long_enough && has_upper && has_lower && has_digit && has_special {
        return Ok(());
    }

    let mut error = ValidationError::new("weak_password");
    error.message = Some(ERR_WEAK_PASSWORD.into());
    Err(error)
}

/// Reject names made only of whitespace.
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut error = ValidationError::new("blank");
        error.message = Some("Value cannot be blank".into());
        return Err(error);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strong_password_accepted() {
        assert!(validate_password_strength("Secure#Pass1").is_ok());
    }

    #[test]
    fn test_weak_passwords_rejected() {
        assert!(validate_password_strength("short1!").is_err());
        assert!(validate_password_strength("alllowercase1!").is_err());
        assert!(validate_password_strength("ALLUPPERCASE1!").is_err());
        assert!(validate_password_strength("NoDigitsHere!").is_err());
        assert!(validate_password_strength("NoSpecial123").is_err());
    }

    #[test]
    fn test_blank_rejected() {
        assert!(validate_not_blank("   ").is_err());
        assert!(validate_not_blank(" Acme ").is_ok());
    }
}
