//! Services organized by domain concern.

pub mod admin_service;
pub mod auth_service;
pub mod cache_service;
pub mod claim_service;
pub mod company_service;
pub mod dashboard_service;
pub mod file_service;
pub mod payment_gateway;
pub mod payment_service;
pub mod policy_service;
pub mod shipment_service;
pub mod token_blacklist;
pub mod user_service;

pub use admin_service::AdminService;
pub use auth_service::AuthService;
pub use cache_service::CacheService;
pub use claim_service::ClaimService;
pub use company_service::CompanyService;
pub use dashboard_service::DashboardService;
pub use file_service::FileService;
pub use payment_gateway::{HttpPaymentGateway, PaymentGateway};
pub use payment_service::PaymentService;
pub use policy_service::PolicyService;
pub use shipment_service::ShipmentService;
pub use token_blacklist::TokenBlacklist;
pub use user_service::UserService;
