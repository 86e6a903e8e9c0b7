//! Human-facing reference numbers and URL slugs.

use chrono::NaiveDate;
use uuid::Uuid;

pub const TRACKING_PREFIX: &str = "SHP";
pub const POLICY_PREFIX: &str = "POL";
pub const CLAIM_PREFIX: &str = "CLM";

/// Build a reference such as `POL-20261019-3FA85F64`.
pub fn generate_reference(prefix: &str, date: NaiveDate) -> String {
    let random = Uuid::new_v4().simple().to_string();
    format!(
        "{}-{}-{}",
        prefix,
        date.format("%Y%m%d"),
        random[..8].to_uppercase()
    )
}

/// Lowercase the name and collapse every run of non-alphanumeric characters into `-`.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_dash = false;

    for c in name.chars() {
        if c.is_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.extend(c.to_lowercase());
        } else {
            pending_dash = true;
        }
    }

    slug
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_format() {
        let date = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
        let reference = generate_reference(POLICY_PREFIX, date);
        assert!(reference.starts_with("POL-20261019-"));
        let suffix = reference.rsplit('-').next().unwrap();
        assert_eq!(suffix.len(), 8);
        assert!(suffix
            .chars()
            .all(|c| c.is_ascii_digit() || c.is_ascii_uppercase()));
    }

    #[test]
    fn test_references_are_unique() {
        let date = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        assert_ne!(
            generate_reference(CLAIM_PREFIX, date),
            generate_reference(CLAIM_PREFIX, date)
        );
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Oceanic Marine & Cargo Co."), "oceanic-marine-cargo-co");
        assert_eq!(slugify("  --Blue   Star-- "), "blue-star");
        assert_eq!(slugify("ACME"), "acme");
        assert_eq!(slugify("!!"), "");
    }
}
