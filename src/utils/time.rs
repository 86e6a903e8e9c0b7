//! Conversions between BSON timestamps and chrono types.

use chrono::{DateTime, NaiveDate, Utc};

pub fn to_utc(dt: mongodb::bson::DateTime) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(dt.timestamp_millis()).unwrap_or_default()
}

pub fn to_utc_opt(dt: Option<mongodb::bson::DateTime>) -> Option<DateTime<Utc>> {
    dt.map(to_utc)
}

/// Current UTC calendar date.
pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_utc_keeps_millis() {
        let bson = mongodb::bson::DateTime::from_millis(1_767_225_600_123);
        assert_eq!(to_utc(bson).timestamp_millis(), 1_767_225_600_123);
    }
}
