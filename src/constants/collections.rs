//! MongoDB collection names.

pub const COLLECTION_USERS: &str = "users";
pub const COLLECTION_ADMINS: &str = "admins";
pub const COLLECTION_COMPANIES: &str = "companies";
pub const COLLECTION_REVIEWS: &str = "reviews";
pub const COLLECTION_SHIPMENTS: &str = "shipments";
pub const COLLECTION_POLICIES: &str = "policies";
pub const COLLECTION_CLAIMS: &str = "claims";
pub const COLLECTION_PAYMENT_LOGS: &str = "payment_logs";
