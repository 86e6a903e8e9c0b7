use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::models::{
    AdminAuthResponse, AdminResponse, AdminRole, AuthResponse, BulkUpdateResponse,
    BulkUpdateResult, BulkUpdateStatusRequest, CargoType, ChangePasswordRequest,
    ClaimHistoryEntry, ClaimResponse, ClaimStatus, CompanyResponse, CountSummary, CoverageType,
    CreateAdminRequest, CreateClaimRequest, CreateCompanyRequest, CreateOrderRequest,
    CreateReviewRequest, CreateShipmentRequest, DashboardStats, ErrorResponse, HealthResponse,
    IncidentType, LoginRequest, OrderResponse, PaginatedAdmins, PaginatedClaims,
    PaginatedCompanies, PaginatedPayments, PaginatedPolicies, PaginatedReviews,
    PaginatedShipments, PaginatedUsers, PaymentResponse, PaymentStatus, PolicyResponse,
    PolicyStatus, QuoteRequest, QuoteResponse, RegisterRequest, ReviewClaimRequest,
    ReviewResponse, ShipmentResponse, ShipmentStatus, TransportMode, UpdateCompanyRequest,
    UpdateProfileRequest, UpdateShipmentRequest, UpdateShipmentStatusRequest,
    UpdateStatusRequest, UserResponse, VerifyPaymentRequest,
};

/// OpenAPI documentation for the Cargo Insurance API
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Cargo Insurance API",
        version = "1.0.0",
        description = "Compare cargo insurers, buy cover for a shipment, pay the premium and file claims. Back-office endpoints manage the catalogue and review claims.",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT"),
        contact(name = "API Support", email = "support@cargoinsure.local")
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development server")
    ),
    tags(
        (name = "Health", description = "Health check endpoints"),
        (name = "Authentication", description = "Registration, login and logout"),
        (name = "Users", description = "Customer self-service"),
        (name = "Companies", description = "Public insurer catalogue and reviews"),
        (name = "Shipments", description = "Shipments to insure"),
        (name = "Policies", description = "Quotes and policies"),
        (name = "Claims", description = "Claims against active policies"),
        (name = "Payments", description = "Premium payments and gateway webhook"),
        (name = "Admin", description = "Back-office endpoints")
    ),
    paths(
        crate::routes::health_check,
        crate::handlers::register,
        crate::handlers::login,
        crate::handlers::admin_login,
        crate::handlers::logout,
        crate::handlers::get_current_user,
        crate::handlers::update_current_user,
        crate::handlers::change_password,
        crate::handlers::list_companies,
        crate::handlers::get_company,
        crate::handlers::list_reviews,
        crate::handlers::create_review,
        crate::handlers::create_shipment,
        crate::handlers::list_shipments,
        crate::handlers::get_shipment,
        crate::handlers::update_shipment,
        crate::handlers::delete_shipment,
        crate::handlers::quote_policy,
        crate::handlers::create_policy,
        crate::handlers::list_policies,
        crate::handlers::get_policy,
        crate::handlers::cancel_policy,
        crate::handlers::create_claim,
        crate::handlers::list_claims,
        crate::handlers::get_claim,
        crate::handlers::upload_claim_document,
        crate::handlers::withdraw_claim,
        crate::handlers::create_order,
        crate::handlers::verify_payment,
        crate::handlers::payment_webhook,
        crate::handlers::list_payments,
        crate::handlers::get_current_admin,
        crate::handlers::get_dashboard,
        crate::handlers::list_users,
        crate::handlers::update_user_status,
        crate::handlers::bulk_update_user_status,
        crate::handlers::list_admins,
        crate::handlers::create_admin,
        crate::handlers::update_admin_status,
        crate::handlers::admin_list_companies,
        crate::handlers::create_company,
        crate::handlers::update_company,
        crate::handlers::update_company_status,
        crate::handlers::delete_company,
        crate::handlers::upload_logo,
        crate::handlers::admin_list_shipments,
        crate::handlers::admin_get_shipment,
        crate::handlers::update_shipment_status,
        crate::handlers::admin_list_policies,
        crate::handlers::admin_list_claims,
        crate::handlers::admin_get_claim,
        crate::handlers::review_claim,
        crate::handlers::admin_list_payments
    ),
    components(
        schemas(
            RegisterRequest,
            LoginRequest,
            UpdateProfileRequest,
            ChangePasswordRequest,
            UpdateStatusRequest,
            BulkUpdateStatusRequest,
            CreateAdminRequest,
            CreateCompanyRequest,
            UpdateCompanyRequest,
            CreateReviewRequest,
            CreateShipmentRequest,
            UpdateShipmentRequest,
            UpdateShipmentStatusRequest,
            QuoteRequest,
            CreateClaimRequest,
            ReviewClaimRequest,
            CreateOrderRequest,
            VerifyPaymentRequest,
            AdminRole,
            CoverageType,
            CargoType,
            TransportMode,
            ShipmentStatus,
            PolicyStatus,
            ClaimStatus,
            IncidentType,
            PaymentStatus,
            UserResponse,
            AuthResponse,
            AdminResponse,
            AdminAuthResponse,
            BulkUpdateResponse,
            BulkUpdateResult,
            CompanyResponse,
            ReviewResponse,
            ShipmentResponse,
            QuoteResponse,
            PolicyResponse,
            ClaimResponse,
            ClaimHistoryEntry,
            OrderResponse,
            PaymentResponse,
            CountSummary,
            DashboardStats,
            PaginatedUsers,
            PaginatedAdmins,
            PaginatedCompanies,
            PaginatedReviews,
            PaginatedShipments,
            PaginatedPolicies,
            PaginatedClaims,
            PaginatedPayments,
            ErrorResponse,
            HealthResponse
        )
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

/// Security configuration for Bearer token authentication
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some(
                            "JWT obtained from /api/auth/login or /api/admin/auth/login",
                        ))
                        .build(),
                ),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bearer_scheme_registered() {
        let doc = ApiDoc::openapi();
        let components = doc.components.unwrap();
        assert!(components.security_schemes.contains_key("bearer_auth"));
        assert!(components.schemas.contains_key("PaginatedPolicies"));
    }

    #[test]
    fn test_webhook_is_documented_without_security() {
        let doc = ApiDoc::openapi();
        let webhook = doc.paths.paths.get("/api/payments/webhook").unwrap();
        let post = webhook.operations.values().next().unwrap();
        assert!(post.security.is_none());
    }
}
