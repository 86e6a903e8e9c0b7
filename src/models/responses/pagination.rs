//! Pagination response models.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{
    AdminResponse, ClaimResponse, CompanyResponse, PaymentResponse, PolicyResponse,
    ReviewResponse, ShipmentResponse, UserResponse,
};
use crate::constants::{DEFAULT_PAGE_NUMBER, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};

/// Paginated list response
#[derive(Debug, Serialize, Deserialize, Clone, ToSchema)]
#[aliases(
    PaginatedUsers = PaginatedResponse<UserResponse>,
    PaginatedAdmins = PaginatedResponse<AdminResponse>,
    PaginatedCompanies = PaginatedResponse<CompanyResponse>,
    PaginatedReviews = PaginatedResponse<ReviewResponse>,
    PaginatedShipments = PaginatedResponse<ShipmentResponse>,
    PaginatedPolicies = PaginatedResponse<PolicyResponse>,
    PaginatedClaims = PaginatedResponse<ClaimResponse>,
    PaginatedPayments = PaginatedResponse<PaymentResponse>
)]
pub struct PaginatedResponse<T> {
    /// Whether the request was successful
    pub success: bool,
    /// List of items
    pub data: Vec<T>,
    /// Total number of items
    pub total: u64,
    /// Current page number
    pub page: u64,
    /// Items per page
    pub per_page: u64,
    /// Total number of pages
    pub total_pages: u64,
}

impl<T> PaginatedResponse<T> {
    pub fn new(data: Vec<T>, total: u64, params: PageParams) -> Self {
        Self {
            success: true,
            data,
            total,
            page: params.page,
            per_page: params.per_page,
            total_pages: total.div_ceil(params.per_page),
        }
    }
}

/// Normalized `page` / `per_page` query values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageParams {
    pub page: u64,
    pub per_page: u64,
}

impl PageParams {
    /// Clamp raw query values: page starts at 1, per_page is capped at `MAX_PAGE_SIZE`.
    ///
    /// Page is also capped so the resulting skip never exceeds `i64::MAX`,
    /// the largest offset MongoDB accepts. Such a page is simply empty.
    pub fn new(page: Option<u64>, per_page: Option<u64>) -> Self {
        let per_page = per_page.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE);
        let last_page = i64::MAX as u64 / per_page + 1;
        Self {
            page: page.unwrap_or(DEFAULT_PAGE_NUMBER).clamp(1, last_page),
            per_page,
        }
    }

    pub fn skip(&self) -> u64 {
        (self.page - 1).saturating_mul(self.per_page)
    }

    pub fn limit(&self) -> i64 {
        self.per_page as i64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_params_defaults_and_clamping() {
        let params = PageParams::new(None, None);
        assert_eq!(params.page, DEFAULT_PAGE_NUMBER);
        assert_eq!(params.per_page, DEFAULT_PAGE_SIZE);

        let params = PageParams::new(Some(0), Some(10_000));
        assert_eq!(params.page, 1);
        assert_eq!(params.per_page, MAX_PAGE_SIZE);

        let params = PageParams::new(Some(3), Some(0));
        assert_eq!(params.per_page, 1);
        assert_eq!(params.skip(), 2);
    }

    #[test]
    fn test_huge_page_is_capped_to_a_valid_offset() {
        let params = PageParams::new(Some(u64::MAX), Some(100));
        assert!(params.skip() <= i64::MAX as u64);
        assert_eq!(params.page, i64::MAX as u64 / 100 + 1);

        let params = PageParams::new(Some(u64::MAX), Some(1));
        assert_eq!(params.skip(), i64::MAX as u64);

        let params = PageParams::new(Some(u64::MAX), None);
        assert!(params.skip() <= i64::MAX as u64);
    }

    #[test]
    fn test_total_pages_rounds_up() {
        let page = PaginatedResponse::new(vec![1, 2, 3], 21, PageParams::new(Some(1), Some(10)));
        assert_eq!(page.total_pages, 3);

        let empty: PaginatedResponse<i32> =
            PaginatedResponse::new(vec![], 0, PageParams::new(None, None));
        assert_eq!(empty.total_pages, 0);
    }
}
