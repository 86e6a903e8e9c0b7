//! Quotes, policy issuance and the policy lifecycle.
//!
//! Premiums are integer minor units. All intermediate products are computed in
//! `i128` so large cargo values cannot overflow before the final division.

use std::sync::Arc;

use chrono::Duration;
use log::{debug, info};
use mongodb::bson::{doc, Document};

use crate::config::CONFIG;
use crate::constants::{
    CODE_BAD_REQUEST, CODE_COMPANY_NOT_FOUND, CODE_COVERAGE_EXCEEDED, CODE_COVERAGE_UNSUPPORTED,
    CODE_INVALID_TRANSITION, CODE_POLICY_NOT_FOUND, CODE_SHIPMENT_ALREADY_INSURED,
    ERR_COMPANY_NOT_FOUND, ERR_COVERAGE_EXCEEDED, ERR_COVERAGE_UNSUPPORTED, ERR_POLICY_NOT_FOUND,
    ERR_POLICY_NOT_PENDING, ERR_SHIPMENT_ALREADY_INSURED, ERR_SHIPMENT_NOT_INSURABLE,
};
use crate::errors::ApiError;
use crate::models::{
    Company, CoverageType, PageParams, PaginatedResponse, Policy, PolicyListQuery, PolicyResponse,
    PolicyStatus, QuoteRequest, QuoteResponse, Shipment,
};
use crate::repositories::{CompanyRepository, PaymentRepository, PolicyRepository};
use crate::services::ShipmentService;
use crate::utils::{generate_reference, today, POLICY_PREFIX};
use crate::validators::{ensure_owner, parse_object_id};

const BPS_SCALE: i128 = 10_000;
const PERCENT_SCALE: i128 = 100;

fn ceil_div(numerator: i128, denominator: i128) -> i128 {
    (numerator + denominator - 1) / denominator
}

fn to_i64(value: i128) -> Result<i64, ApiError> {
    i64::try_from(value).map_err(|_| ApiError::internal("Premium exceeds the representable range"))
}

/// Price cover for `shipment` with `company` and check the company will write it.
///
/// The premium is `cargo_value * base_rate_bps / 10000` scaled by the coverage,
/// cargo and transport loadings, rounded up and floored at the company minimum.
pub fn build_quote(
    shipment: &Shipment,
    company: &Company,
    coverage_type: CoverageType,
    grace_days: i64,
) -> Result<QuoteResponse, ApiError> {
    if !company.covers(coverage_type, shipment.cargo_type) {
        return Err(ApiError::bad_request(
            CODE_COVERAGE_UNSUPPORTED,
            ERR_COVERAGE_UNSUPPORTED,
        ));
    }
    if shipment.cargo_value > company.max_coverage {
        return Err(ApiError::bad_request(CODE_COVERAGE_EXCEEDED, ERR_COVERAGE_EXCEEDED));
    }

    let cargo_value = shipment.cargo_value as i128;
    let rate = company.base_rate_bps as i128;
    let coverage_factor = coverage_type.factor_percent();
    let cargo_factor = shipment.cargo_type.factor_percent();
    let transport_factor = shipment.transport_mode.factor_percent();

    let base_premium = ceil_div(cargo_value * rate, BPS_SCALE);
    let loaded = ceil_div(
        cargo_value
            * rate
            * coverage_factor as i128
            * cargo_factor as i128
            * transport_factor as i128,
        BPS_SCALE * PERCENT_SCALE * PERCENT_SCALE * PERCENT_SCALE,
    );
    let loaded = to_i64(loaded)?;
    let min_premium_applied = loaded < company.min_premium;
    let premium = loaded.max(company.min_premium);

    let coverage_amount = shipment.cargo_value;
    let deductible = to_i64(coverage_amount as i128 * company.deductible_bps as i128 / BPS_SCALE)?;

    Ok(QuoteResponse {
        shipment_id: shipment.id.map(|id| id.to_hex()).unwrap_or_default(),
        company_id: company.id.map(|id| id.to_hex()).unwrap_or_default(),
        company_name: company.name.clone(),
        coverage_type,
        cargo_value: shipment.cargo_value,
        base_rate_bps: company.base_rate_bps,
        base_premium: to_i64(base_premium)?,
        coverage_factor_percent: coverage_factor,
        cargo_factor_percent: cargo_factor,
        transport_factor_percent: transport_factor,
        premium,
        min_premium_applied,
        coverage_amount,
        deductible,
        start_date: shipment.departure_date,
        end_date: shipment.arrival_date + Duration::days(grace_days),
        currency: CONFIG.payment_currency.clone(),
    })
}

/// Failure reason stamped on orders left open when their policy is cancelled.
pub const POLICY_CANCELLED_REASON: &str = "policy cancelled";

pub struct PolicyService {
    policies: Arc<PolicyRepository>,
    companies: Arc<CompanyRepository>,
    shipments: Arc<ShipmentService>,
    payments: Arc<PaymentRepository>,
}

impl PolicyService {
    pub fn new(
        policies: Arc<PolicyRepository>,
        companies: Arc<CompanyRepository>,
        shipments: Arc<ShipmentService>,
        payments: Arc<PaymentRepository>,
    ) -> Self {
        Self {
            policies,
            companies,
            shipments,
            payments,
        }
    }

    async fn prepare(
        &self,
        user_id: &str,
        req: &QuoteRequest,
    ) -> Result<(Shipment, QuoteResponse), ApiError> {
        let shipment = self.shipments.get_owned(&req.shipment_id, user_id).await?;
        if !shipment.status.is_insurable() {
            return Err(ApiError::bad_request(CODE_BAD_REQUEST, ERR_SHIPMENT_NOT_INSURABLE));
        }

        let company = self
            .companies
            .find_by_id(parse_object_id(&req.company_id)?)
            .await?
            .filter(|c| c.is_active)
            .ok_or_else(|| ApiError::not_found(CODE_COMPANY_NOT_FOUND, ERR_COMPANY_NOT_FOUND))?;

        let quote = build_quote(&shipment, &company, req.coverage_type, CONFIG.policy_grace_days)?;
        Ok((shipment, quote))
    }

    pub async fn quote(&self, user_id: &str, req: &QuoteRequest) -> Result<QuoteResponse, ApiError> {
        let (_, quote) = self.prepare(user_id, req).await?;
        Ok(quote)
    }

    /// Issue a policy awaiting payment.
    pub async fn create(&self, user_id: &str, req: &QuoteRequest) -> Result<Policy, ApiError> {
        let (shipment, quote) = self.prepare(user_id, req).await?;
        let shipment_id = shipment
            .id
            .ok_or_else(|| ApiError::internal("Shipment without an id"))?;

        if self.policies.find_live_for_shipment(shipment_id).await?.is_some() {
            return Err(ApiError::conflict(
                CODE_SHIPMENT_ALREADY_INSURED,
                ERR_SHIPMENT_ALREADY_INSURED,
            ));
        }

        let now = mongodb::bson::DateTime::now();
        let policy = Policy {
            id: None,
            policy_number: generate_reference(POLICY_PREFIX, today()),
            user_id: shipment.user_id,
            company_id: parse_object_id(&req.company_id)?,
            shipment_id,
            coverage_type: quote.coverage_type,
            coverage_amount: quote.coverage_amount,
            premium: quote.premium,
            deductible: quote.deductible,
            start_date: quote.start_date,
            end_date: quote.end_date,
            status: PolicyStatus::PendingPayment,
            payment_id: None,
            activated_at: None,
            created_at: now,
            updated_at: now,
        };

        let id = self.policies.insert(&policy).await?;
        info!(
            "Policy {} issued for shipment {} (premium {})",
            policy.policy_number, shipment.tracking_number, policy.premium
        );
        Ok(Policy {
            id: Some(id),
            ..policy
        })
    }

    async fn expire_lapsed(&self) -> Result<(), ApiError> {
        let expired = self.policies.expire_lapsed(today()).await?;
        if expired > 0 {
            info!("Expired {} lapsed policies", expired);
        }
        Ok(())
    }

    pub async fn list_for_user(
        &self,
        user_id: &str,
        query: &PolicyListQuery,
    ) -> Result<PaginatedResponse<PolicyResponse>, ApiError> {
        let mut filter = doc! { "user_id": parse_object_id(user_id)? };
        if let Some(status) = query.status {
            filter.insert("status", status.as_str());
        }
        self.page(filter, PageParams::new(query.page, query.per_page)).await
    }

    pub async fn list_admin(
        &self,
        query: &PolicyListQuery,
    ) -> Result<PaginatedResponse<PolicyResponse>, ApiError> {
        let mut filter = doc! {};
        if let Some(status) = query.status {
            filter.insert("status", status.as_str());
        }
        if let Some(company_id) = query.company_id.as_deref() {
            filter.insert("company_id", parse_object_id(company_id)?);
        }
        self.page(filter, PageParams::new(query.page, query.per_page)).await
    }

    async fn page(
        &self,
        filter: Document,
        params: PageParams,
    ) -> Result<PaginatedResponse<PolicyResponse>, ApiError> {
        self.expire_lapsed().await?;
        let total = self.policies.count(filter.clone()).await?;
        let policies = self
            .policies
            .find_with_filter(filter, params.skip(), params.limit())
            .await?;
        Ok(PaginatedResponse::new(
            policies.into_iter().map(PolicyResponse::from).collect(),
            total,
            params,
        ))
    }

    pub async fn get(&self, policy_id: &str) -> Result<Policy, ApiError> {
        let object_id = parse_object_id(policy_id)?;
        self.expire_lapsed().await?;
        self.policies
            .find_by_id(object_id)
            .await?
            .ok_or_else(|| ApiError::not_found(CODE_POLICY_NOT_FOUND, ERR_POLICY_NOT_FOUND))
    }

    pub async fn get_owned(&self, policy_id: &str, user_id: &str) -> Result<Policy, ApiError> {
        let policy = self.get(policy_id).await?;
        ensure_owner(policy.user_id, user_id)?;
        Ok(policy)
    }

    /// Cancel a policy that has not been paid for yet.
    pub async fn cancel(&self, policy_id: &str, user_id: &str) -> Result<Policy, ApiError> {
        let policy = self.get_owned(policy_id, user_id).await?;
        let id = policy
            .id
            .ok_or_else(|| ApiError::not_found(CODE_POLICY_NOT_FOUND, ERR_POLICY_NOT_FOUND))?;

        let cancelled = self
            .policies
            .transition(
                id,
                PolicyStatus::PendingPayment,
                doc! { "status": PolicyStatus::Cancelled.as_str() },
            )
            .await?
            .ok_or_else(|| ApiError::conflict(CODE_INVALID_TRANSITION, ERR_POLICY_NOT_PENDING))?;

        let closed = self
            .payments
            .fail_open_for_policy(id, POLICY_CANCELLED_REASON)
            .await?;
        if closed > 0 {
            debug!(
                "Closed {} open order(s) for policy {}",
                closed, cancelled.policy_number
            );
        }

        info!("Policy {} cancelled by its owner", cancelled.policy_number);
        Ok(cancelled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CargoType, ShipmentStatus, TransportMode};
    use chrono::NaiveDate;
    use mongodb::bson::oid::ObjectId;

    fn company() -> Company {
        let now = mongodb::bson::DateTime::now();
        Company {
            id: Some(ObjectId::new()),
            name: "Oceanic Marine".into(),
            slug: "oceanic-marine".into(),
            description: "Marine cargo specialists".into(),
            logo_url: None,
            website: None,
            contact_email: "desk@oceanic.example".into(),
            contact_phone: None,
            headquarters: None,
            founded_year: None,
            coverage_types: vec![CoverageType::Basic, CoverageType::Standard],
            cargo_types: vec![CargoType::General, CargoType::Electronics],
            base_rate_bps: 45,
            min_premium: 50_000,
            max_coverage: 500_000_000,
            deductible_bps: 100,
            claim_settlement_ratio: 96.5,
            rating: 0.0,
            review_count: 0,
            is_verified: true,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    fn shipment(cargo_value: i64) -> Shipment {
        let now = mongodb::bson::DateTime::now();
        Shipment {
            id: Some(ObjectId::new()),
            user_id: ObjectId::new(),
            tracking_number: "SHP-20261019-ABCDEF01".into(),
            origin: "Nhava Sheva".into(),
            destination: "Rotterdam".into(),
            cargo_type: CargoType::General,
            description: "Machine parts".into(),
            cargo_value,
            weight_kg: 18_500.0,
            transport_mode: TransportMode::Sea,
            departure_date: NaiveDate::from_ymd_opt(2026, 11, 1).unwrap(),
            arrival_date: NaiveDate::from_ymd_opt(2026, 11, 28).unwrap(),
            status: ShipmentStatus::Pending,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_premium_breakdown() {
        let quote = build_quote(&shipment(250_000_000), &company(), CoverageType::Standard, 30).unwrap();

        assert_eq!(quote.base_premium, 1_125_000);
        assert_eq!(quote.coverage_factor_percent, 135);
        assert_eq!(quote.cargo_factor_percent, 100);
        assert_eq!(quote.transport_factor_percent, 110);
        assert_eq!(quote.premium, 1_670_625);
        assert!(!quote.min_premium_applied);
        assert_eq!(quote.coverage_amount, 250_000_000);
        assert_eq!(quote.deductible, 2_500_000);
    }

    #[test]
    fn test_premium_rounds_up() {
        let mut cheap = company();
        cheap.min_premium = 0;
        let quote = build_quote(&shipment(12_345), &cheap, CoverageType::Basic, 0).unwrap();
        assert_eq!(quote.premium, 62);
        assert_eq!(quote.base_premium, 56);
    }

    #[test]
    fn test_min_premium_floor() {
        let quote = build_quote(&shipment(1_000_000), &company(), CoverageType::Basic, 30).unwrap();
        assert_eq!(quote.premium, 50_000);
        assert!(quote.min_premium_applied);
    }

    #[test]
    fn test_cover_dates_include_grace_period() {
        let quote = build_quote(&shipment(1_000_000), &company(), CoverageType::Basic, 30).unwrap();
        assert_eq!(quote.start_date, NaiveDate::from_ymd_opt(2026, 11, 1).unwrap());
        assert_eq!(quote.end_date, NaiveDate::from_ymd_opt(2026, 12, 28).unwrap());
    }

    #[test]
    fn test_large_values_do_not_overflow() {
        let mut big = company();
        big.max_coverage = i64::MAX;
        big.base_rate_bps = 10_000;
        let quote = build_quote(&shipment(1_000_000_000_000_000), &big, CoverageType::Standard, 0).unwrap();
        assert_eq!(quote.premium, 1_485_000_000_000_000);

        // cargo_value * rate * loadings is ~8.9e28 here, far past i64
        let quote =
            build_quote(&shipment(6_000_000_000_000_000_000), &big, CoverageType::Standard, 0).unwrap();
        assert_eq!(quote.premium, 8_910_000_000_000_000_000);
        assert_eq!(quote.base_premium, 6_000_000_000_000_000_000);
        assert_eq!(quote.deductible, 60_000_000_000_000_000);
    }

    #[test]
    fn test_premium_past_i64_is_an_error_not_a_panic() {
        let mut big = company();
        big.max_coverage = i64::MAX;
        big.base_rate_bps = 10_000;
        let err = build_quote(&shipment(i64::MAX), &big, CoverageType::Standard, 0).unwrap_err();
        assert_eq!(err.code(), crate::constants::CODE_INTERNAL_ERROR);
    }

    #[test]
    fn test_unsupported_coverage_and_limits() {
        let err = build_quote(&shipment(1_000), &company(), CoverageType::Comprehensive, 0).unwrap_err();
        assert_eq!(err.code(), CODE_COVERAGE_UNSUPPORTED);

        let mut hazardous = shipment(1_000);
        hazardous.cargo_type = CargoType::Hazardous;
        let err = build_quote(&hazardous, &company(), CoverageType::Basic, 0).unwrap_err();
        assert_eq!(err.code(), CODE_COVERAGE_UNSUPPORTED);

        let err = build_quote(&shipment(500_000_001), &company(), CoverageType::Basic, 0).unwrap_err();
        assert_eq!(err.code(), CODE_COVERAGE_EXCEEDED);
    }
}
