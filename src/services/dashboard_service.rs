//! Aggregated figures for the admin dashboard.

use std::sync::Arc;

use log::debug;
use mongodb::bson::doc;

use crate::constants::DASHBOARD_RECENT_CLAIMS;
use crate::errors::ApiError;
use crate::models::{ClaimResponse, CountSummary, DashboardStats};
use crate::repositories::{
    ClaimRepository, CompanyRepository, PaymentRepository, PolicyRepository, ShipmentRepository,
    UserRepository,
};
use crate::utils::today;

pub struct DashboardService {
    users: Arc<UserRepository>,
    companies: Arc<CompanyRepository>,
    shipments: Arc<ShipmentRepository>,
    policies: Arc<PolicyRepository>,
    claims: Arc<ClaimRepository>,
    payments: Arc<PaymentRepository>,
}

impl DashboardService {
    pub fn new(
        users: Arc<UserRepository>,
        companies: Arc<CompanyRepository>,
        shipments: Arc<ShipmentRepository>,
        policies: Arc<PolicyRepository>,
        claims: Arc<ClaimRepository>,
        payments: Arc<PaymentRepository>,
    ) -> Self {
        Self {
            users,
            companies,
            shipments,
            policies,
            claims,
            payments,
        }
    }

    pub async fn stats(&self) -> Result<DashboardStats, ApiError> {
        // Lapsed policies are only swept lazily, so count after a sweep.
        let expired = self.policies.expire_lapsed(today()).await?;
        debug!("Dashboard sweep expired {} policies", expired);

        let (
            users_total,
            users_active,
            companies_total,
            companies_active,
            shipments,
            policies_by_status,
            claims_by_status,
            premium_collected,
            claims_settled_amount,
            recent_claims,
        ) = futures::try_join!(
            self.users.count(doc! {}),
            self.users.count(doc! { "is_active": true }),
            self.companies.count(doc! {}),
            self.companies.count(doc! { "is_active": true }),
            self.shipments.count(doc! {}),
            self.policies.count_by_status(),
            self.claims.count_by_status(),
            self.payments.paid_total(),
            self.claims.settled_total(),
            self.claims.recent(DASHBOARD_RECENT_CLAIMS),
        )?;

        Ok(DashboardStats {
            users: CountSummary {
                total: users_total,
                active: users_active,
            },
            companies: CountSummary {
                total: companies_total,
                active: companies_active,
            },
            shipments,
            policies_by_status,
            claims_by_status,
            premium_collected,
            claims_settled_amount,
            recent_claims: recent_claims.into_iter().map(ClaimResponse::from).collect(),
        })
    }
}
