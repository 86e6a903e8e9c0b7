//! Repository layer for database operations.
//!
//! Each repository owns one MongoDB collection. Services hold them behind `Arc`
//! and never touch collections directly.

pub mod admin_repository;
pub mod claim_repository;
pub mod company_repository;
pub mod payment_repository;
pub mod policy_repository;
pub mod review_repository;
pub mod shipment_repository;
pub mod user_repository;

pub use admin_repository::AdminRepository;
pub use claim_repository::ClaimRepository;
pub use company_repository::CompanyRepository;
pub use payment_repository::PaymentRepository;
pub use policy_repository::PolicyRepository;
pub use review_repository::ReviewRepository;
pub use shipment_repository::ShipmentRepository;
pub use user_repository::UserRepository;

use std::collections::HashMap;

use mongodb::bson::{oid::ObjectId, Bson, Document};
use mongodb::options::IndexOptions;
use mongodb::results::InsertOneResult;
use mongodb::IndexModel;

use crate::errors::ApiError;

/// Extract the generated `_id` from an insert.
pub(crate) fn inserted_object_id(result: InsertOneResult) -> Result<ObjectId, ApiError> {
    result
        .inserted_id
        .as_object_id()
        .ok_or_else(|| ApiError::internal("Inserted document has no ObjectId"))
}

/// Read an aggregation number regardless of the BSON width the server chose.
pub(crate) fn numeric(doc: &Document, key: &str) -> i64 {
    match doc.get(key) {
        Some(Bson::Int32(v)) => *v as i64,
        Some(Bson::Int64(v)) => *v,
        Some(Bson::Double(v)) => v.round() as i64,
        _ => 0,
    }
}

/// Fold `{ _id: "<status>", count: n }` group results into a map.
pub(crate) fn counts_by_id(groups: Vec<Document>) -> HashMap<String, u64> {
    groups
        .iter()
        .filter_map(|group| {
            let key = group.get_str("_id").ok()?;
            Some((key.to_string(), numeric(group, "count").max(0) as u64))
        })
        .collect()
}

pub(crate) fn unique_index(keys: Document) -> IndexModel {
    IndexModel::builder()
        .keys(keys)
        .options(IndexOptions::builder().unique(true).build())
        .build()
}

pub(crate) fn index(keys: Document) -> IndexModel {
    IndexModel::builder().keys(keys).build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::doc;

    #[test]
    fn test_numeric_accepts_every_width() {
        let d = doc! { "a": 3_i32, "b": 4_i64, "c": 2.6_f64, "d": "x" };
        assert_eq!(numeric(&d, "a"), 3);
        assert_eq!(numeric(&d, "b"), 4);
        assert_eq!(numeric(&d, "c"), 3);
        assert_eq!(numeric(&d, "d"), 0);
        assert_eq!(numeric(&d, "missing"), 0);
    }

    #[test]
    fn test_counts_by_id() {
        let groups = vec![
            doc! { "_id": "active", "count": 4_i32 },
            doc! { "_id": "expired", "count": 1_i64 },
            doc! { "_id": Bson::Null, "count": 9_i32 },
        ];
        let counts = counts_by_id(groups);
        assert_eq!(counts.len(), 2);
        assert_eq!(counts["active"], 4);
        assert_eq!(counts["expired"], 1);
    }
}
