//! Time and receipt-number utilities

use crate::types::Timestamp;
use chrono::{DateTime, Utc};

/// Current UTC time
pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// Current UTC timestamp in milliseconds
pub fn now_millis() -> Timestamp {
    Utc::now().timestamp_millis()
}

/// Generate a time-ordered human-readable receipt number.
///
/// Format: `{PREFIX}-{yyyyMMddHHmmss}-{6 uppercase hex}`, e.g.
/// `ORD-20250614193042-9FC21A`. The timestamp keeps numbers sortable by
/// creation time; the random suffix avoids collisions within one second.
/// Global uniqueness is enforced by a storage-level constraint, not here.
pub fn receipt_number(prefix: &str) -> String {
    let timestamp = Utc::now().format("%Y%m%d%H%M%S");
    let suffix = uuid::Uuid::new_v4().simple().to_string()[..6].to_uppercase();
    format!("{prefix}-{timestamp}-{suffix}")
}

/// Order number (`ORD-` prefix)
pub fn order_number() -> String {
    receipt_number("ORD")
}

/// Reservation number (`RES-` prefix)
pub fn reservation_number() -> String {
    receipt_number("RES")
}

/// Table session number (`SES-` prefix)
pub fn session_number() -> String {
    receipt_number("SES")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_receipt_number_format() {
        let n = receipt_number("ORD");
        let parts: Vec<&str> = n.split('-').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "ORD");
        assert_eq!(parts[1].len(), 14);
        assert!(parts[1].chars().all(|c| c.is_ascii_digit()));
        assert_eq!(parts[2].len(), 6);
        assert!(parts[2].chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()));
    }

    #[test]
    fn test_prefixes() {
        assert!(order_number().starts_with("ORD-"));
        assert!(reservation_number().starts_with("RES-"));
        assert!(session_number().starts_with("SES-"));
    }

    #[test]
    fn test_numbers_differ() {
        let a = order_number();
        let b = order_number();
        assert_ne!(a, b);
    }
}
