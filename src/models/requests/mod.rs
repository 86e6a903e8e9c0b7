//! Request models for API endpoints.

pub mod admin;
pub mod auth;
pub mod claim;
pub mod company;
pub mod pagination;
pub mod payment;
pub mod policy;
pub mod shipment;
pub mod user;

pub use admin::*;
pub use auth::*;
pub use claim::*;
pub use company::*;
pub use pagination::*;
pub use payment::*;
pub use policy::*;
pub use shipment::*;
pub use user::*;
