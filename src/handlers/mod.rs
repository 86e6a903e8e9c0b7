//! HTTP request handlers organized by domain.

pub mod admin_handler;
pub mod auth_handler;
pub mod claim_handler;
pub mod company_handler;
pub mod payment_handler;
pub mod policy_handler;
pub mod shipment_handler;
pub mod user_handler;

pub use admin_handler::*;
pub use auth_handler::*;
pub use claim_handler::*;
pub use company_handler::*;
pub use payment_handler::*;
pub use policy_handler::*;
pub use shipment_handler::*;
pub use user_handler::*;
