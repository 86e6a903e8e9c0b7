//! Business-rule checks on shipments, policies and claims that go beyond
//! per-field validation.

use chrono::NaiveDate;

use crate::constants::{
    CODE_INVALID_AMOUNT, CODE_INVALID_DATE, CODE_VALIDATION_FAILED, ERR_APPROVED_AMOUNT_REQUIRED,
    ERR_ARRIVAL_BEFORE_DEPARTURE, ERR_CLAIM_EXCEEDS_COVERAGE, ERR_DEPARTURE_IN_PAST,
    ERR_INCIDENT_IN_FUTURE, ERR_INCIDENT_OUTSIDE_COVER, ERR_SAME_ORIGIN_DESTINATION,
};
use crate::errors::ApiError;
use crate::models::Policy;

/// Validate a shipment's route and schedule.
///
/// `check_departure` is false when an update leaves the departure date untouched,
/// so a shipment created yesterday can still have its description edited.
pub fn validate_route_and_dates(
    origin: &str,
    destination: &str,
    departure: NaiveDate,
    arrival: NaiveDate,
    today: NaiveDate,
    check_departure: bool,
) -> Result<(), ApiError> {
    if origin.trim().eq_ignore_ascii_case(destination.trim()) {
        return Err(ApiError::bad_request(
            CODE_VALIDATION_FAILED,
            ERR_SAME_ORIGIN_DESTINATION,
        ));
    }
    if arrival < departure {
        return Err(ApiError::bad_request(
            CODE_INVALID_DATE,
            ERR_ARRIVAL_BEFORE_DEPARTURE,
        ));
    }
    if check_departure && departure < today {
        return Err(ApiError::bad_request(CODE_INVALID_DATE, ERR_DEPARTURE_IN_PAST));
    }
    Ok(())
}

/// Validate a new claim against the policy it is lodged on.
pub fn validate_claim_against_policy(
    policy: &Policy,
    incident_date: NaiveDate,
    claimed_amount: i64,
    today: NaiveDate,
) -> Result<(), ApiError> {
    if incident_date > today {
        return Err(ApiError::bad_request(CODE_INVALID_DATE, ERR_INCIDENT_IN_FUTURE));
    }
    if !policy.covers_date(incident_date) {
        return Err(ApiError::bad_request(
            CODE_INVALID_DATE,
            ERR_INCIDENT_OUTSIDE_COVER,
        ));
    }
    if claimed_amount <= 0 || claimed_amount > policy.coverage_amount {
        return Err(ApiError::bad_request(
            CODE_INVALID_AMOUNT,
            ERR_CLAIM_EXCEEDS_COVERAGE,
        ));
    }
    Ok(())
}

/// Largest amount a reviewer may approve: the claim less the policy deductible.
pub fn max_approvable(claimed_amount: i64, deductible: i64) -> i64 {
    (claimed_amount - deductible).max(0)
}

pub fn validate_approved_amount(
    approved_amount: Option<i64>,
    claimed_amount: i64,
    deductible: i64,
) -> Result<i64, ApiError> {
    match approved_amount {
        Some(amount) if amount > 0 && amount <= max_approvable(claimed_amount, deductible) => {
            Ok(amount)
        }
        _ => Err(ApiError::bad_request(
            CODE_INVALID_AMOUNT,
            ERR_APPROVED_AMOUNT_REQUIRED,
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CoverageType, PolicyStatus};
    use mongodb::bson::oid::ObjectId;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn policy() -> Policy {
        let now = mongodb::bson::DateTime::now();
        Policy {
            id: Some(ObjectId::new()),
            policy_number: "POL-20260101-ABCDEF01".into(),
            user_id: ObjectId::new(),
            company_id: ObjectId::new(),
            shipment_id: ObjectId::new(),
            coverage_type: CoverageType::Standard,
            coverage_amount: 1_000_000,
            premium: 5_000,
            deductible: 10_000,
            start_date: date("2026-01-10"),
            end_date: date("2026-02-10"),
            status: PolicyStatus::Active,
            payment_id: None,
            activated_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_route_rules() {
        let today = date("2026-01-01");
        assert!(validate_route_and_dates(
            "Mumbai",
            "Rotterdam",
            date("2026-01-05"),
            date("2026-02-01"),
            today,
            true
        )
        .is_ok());
        assert!(validate_route_and_dates(
            "Mumbai",
            " mumbai ",
            date("2026-01-05"),
            date("2026-02-01"),
            today,
            true
        )
        .is_err());
        assert!(validate_route_and_dates(
            "Mumbai",
            "Rotterdam",
            date("2026-02-05"),
            date("2026-02-01"),
            today,
            true
        )
        .is_err());
    }

    #[test]
    fn test_past_departure_only_checked_when_requested() {
        let today = date("2026-03-01");
        let dep = date("2026-01-05");
        let arr = date("2026-02-01");
        assert!(validate_route_and_dates("A", "B", dep, arr, today, true).is_err());
        assert!(validate_route_and_dates("A", "B", dep, arr, today, false).is_ok());
    }

    #[test]
    fn test_claim_must_fall_inside_cover() {
        let p = policy();
        let today = date("2026-03-01");
        assert!(validate_claim_against_policy(&p, date("2026-01-20"), 500_000, today).is_ok());
        assert!(validate_claim_against_policy(&p, date("2026-01-09"), 500_000, today).is_err());
        assert!(validate_claim_against_policy(&p, date("2026-02-11"), 500_000, today).is_err());
    }

    #[test]
    fn test_claim_amount_bounds() {
        let p = policy();
        let today = date("2026-03-01");
        assert!(validate_claim_against_policy(&p, date("2026-01-20"), 0, today).is_err());
        assert!(validate_claim_against_policy(&p, date("2026-01-20"), 1_000_001, today).is_err());
        assert!(validate_claim_against_policy(&p, date("2026-01-20"), 1_000_000, today).is_ok());
    }

    #[test]
    fn test_incident_cannot_be_in_future() {
        let p = policy();
        let today = date("2026-01-15");
        assert!(validate_claim_against_policy(&p, date("2026-01-20"), 100, today).is_err());
    }

    #[test]
    fn test_approved_amount_respects_deductible() {
        assert_eq!(validate_approved_amount(Some(90_000), 100_000, 10_000).unwrap(), 90_000);
        assert!(validate_approved_amount(Some(90_001), 100_000, 10_000).is_err());
        assert!(validate_approved_amount(None, 100_000, 10_000).is_err());
        assert!(validate_approved_amount(Some(1), 5_000, 10_000).is_err());
        assert_eq!(max_approvable(5_000, 10_000), 0);
    }
}
