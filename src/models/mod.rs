//! Data models organized by type.
//!
//! Documents stored in MongoDB live at this level; request payloads and
//! response shapes are kept in `requests` and `responses`.

pub mod admin;
pub mod claim;
pub mod company;
pub mod payment;
pub mod policy;
pub mod requests;
pub mod responses;
pub mod review;
pub mod shipment;
pub mod token_claims;
pub mod user;

pub use admin::*;
pub use claim::*;
pub use company::*;
pub use payment::*;
pub use policy::*;
pub use requests::*;
pub use responses::*;
pub use review::*;
pub use shipment::*;
pub use token_claims::*;
pub use user::*;
