//! Log sanitization utilities for masking sensitive data.
//!
//! This module provides functions to mask sensitive information like emails
//! and payment references before logging, preventing accidental exposure of PII.

/// Mask an email address for safe logging.
///
/// Shows only the first 3 characters (or fewer if the local part is shorter)
/// followed by asterisks and the domain.
///
/// # Examples
/// ```ignore
/// assert_eq!(mask_email("user@example.com"), "use***@example.com");
/// assert_eq!(mask_email("ab@test.org"), "ab***@test.org");
/// ```
pub fn mask_email(email: &str) -> String {
    match email.split_once('@') {
        Some((local_part, domain)) => format!("{}***@{}", prefix(local_part, 3), domain),
        None => format!("{}***", prefix(email, 3)),
    }
}

/// Mask a gateway reference (order or payment id), keeping the last 4 characters.
pub fn mask_reference(reference: &str) -> String {
    let count = reference.chars().count();
    if count <= 4 {
        return "****".to_string();
    }
    let tail: String = reference.chars().skip(count - 4).collect();
    format!("****{}", tail)
}

fn prefix(value: &str, chars: usize) -> &str {
    match value.char_indices().nth(chars) {
        Some((idx, _)) => &value[..idx],
        None => value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_email_normal() {
        assert_eq!(mask_email("user@example.com"), "use***@example.com");
        assert_eq!(mask_email("johndoe@test.org"), "joh***@test.org");
    }

    #[test]
    fn test_mask_email_short_local_part() {
        assert_eq!(mask_email("ab@test.org"), "ab***@test.org");
        assert_eq!(mask_email("a@test.org"), "a***@test.org");
    }

    #[test]
    fn test_mask_email_invalid() {
        assert_eq!(mask_email("notanemail"), "not***");
    }

    #[test]
    fn test_mask_email_multibyte() {
        assert_eq!(mask_email("éèêë@test.org"), "éèê***@test.org");
    }

    #[test]
    fn test_mask_reference() {
        assert_eq!(mask_reference("order_JrR3mK9xYz12"), "****Yz12");
        assert_eq!(mask_reference("abc"), "****");
    }
}
