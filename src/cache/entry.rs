//! Cache Entry Module
//!
//! Defines a single cached payload together with the moment it was stored.

use chrono::{DateTime, Duration, Utc};
use serde_json::Value;

// == Cache Entry ==
/// A cached JSON payload and its storage timestamp.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// The stored response body
    pub payload: Value,
    /// When the payload was stored
    pub stored_at: DateTime<Utc>,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates a new entry stamped with the current time.
    pub fn new(payload: Value) -> Self {
        Self {
            payload,
            stored_at: Utc::now(),
        }
    }

    // == Age ==
    /// Returns how long ago the entry was stored.
    ///
    /// Clamped at zero if the wall clock moved backwards.
    pub fn age(&self) -> Duration {
        let age = Utc::now() - self.stored_at;
        if age < Duration::zero() {
            Duration::zero()
        } else {
            age
        }
    }

    // == Is Stale ==
    /// Checks whether the entry outlived the given TTL.
    ///
    /// Boundary condition: an entry whose age equals the TTL exactly is still
    /// fresh. It only becomes stale once its age is strictly greater.
    pub fn is_stale(&self, ttl: Duration) -> bool {
        self.age() > ttl
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::thread::sleep;

    #[test]
    fn test_entry_creation() {
        let entry = CacheEntry::new(json!({"name": "Dunk Low"}));

        assert_eq!(entry.payload["name"], "Dunk Low");
        assert!(entry.stored_at <= Utc::now());
    }

    #[test]
    fn test_fresh_entry_is_not_stale() {
        let entry = CacheEntry::new(json!([1, 2, 3]));
        assert!(!entry.is_stale(Duration::minutes(10)));
    }

    #[test]
    fn test_entry_goes_stale() {
        let entry = CacheEntry::new(json!("value"));

        sleep(std::time::Duration::from_millis(30));

        assert!(entry.is_stale(Duration::milliseconds(10)));
    }

    #[test]
    fn test_stale_boundary_condition() {
        // Stored well in the past, TTL far longer than the age
        let entry = CacheEntry {
            payload: json!(null),
            stored_at: Utc::now() - Duration::seconds(5),
        };
        assert!(!entry.is_stale(Duration::seconds(60)));
        assert!(entry.is_stale(Duration::seconds(1)));
    }

    #[test]
    fn test_age_never_negative() {
        let entry = CacheEntry {
            payload: json!(null),
            stored_at: Utc::now() + Duration::seconds(30),
        };
        assert_eq!(entry.age(), Duration::zero());
        assert!(!entry.is_stale(Duration::zero()));
    }
}
