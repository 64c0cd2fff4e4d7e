//! Response DTOs for the proxy API
//!
//! Defines the structure of outgoing HTTP response bodies.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::cache::CacheStats;

/// Size-major price table: size -> marketplace -> price
pub type PricesBySize = BTreeMap<SizeKey, BTreeMap<String, Value>>;

/// Shoe size label as sent by the marketplaces ("9", "9.5", "10", "4Y").
///
/// Numeric labels sort by value ahead of any other label, which sort as text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SizeKey(String);

impl SizeKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn numeric(&self) -> Option<f64> {
        self.0.trim().parse::<f64>().ok().filter(|n| n.is_finite())
    }
}

impl From<&str> for SizeKey {
    fn from(label: &str) -> Self {
        Self(label.to_string())
    }
}

impl Ord for SizeKey {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.numeric(), other.numeric()) {
            (Some(a), Some(b)) => a.total_cmp(&b).then_with(|| self.0.cmp(&other.0)),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => self.0.cmp(&other.0),
        }
    }
}

impl PartialOrd for SizeKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// One product in the `GET /search` result list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductSummary {
    pub name: Option<Value>,
    pub brand: Option<Value>,
    pub sku: Option<Value>,
    pub colorway: Option<Value>,
    pub retail_price: Option<Value>,
    pub release_date: Option<Value>,
    pub thumbnail: Option<Value>,
    /// StockX listing, null when the upstream has none
    pub stockx_id: Option<Value>,
    /// GOAT listing, null when the upstream has none
    pub goat_id: Option<Value>,
}

/// Lowest asks on the three tracked marketplaces
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LowestAsks {
    pub stockx: Option<Value>,
    pub goat: Option<Value>,
    pub flight_club: Option<Value>,
}

/// Response body of `GET /prices`
///
/// A degraded body (price step failed) carries `error_prices` and an empty
/// `prices_by_size`; a complete one omits `error_prices`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductPriceDetail {
    pub name: Option<Value>,
    pub brand: Option<Value>,
    pub sku: Option<Value>,
    pub colorway: Option<Value>,
    pub retail_price: Option<Value>,
    pub thumbnail: Option<Value>,
    /// Marketplace -> listing link
    pub resell_links: Value,
    pub lowest_asks: LowestAsks,
    pub prices_by_size: PricesBySize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_prices: Option<String>,
}

impl ProductPriceDetail {
    pub fn is_degraded(&self) -> bool {
        self.error_prices.is_some()
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
    /// Keys currently held, including stale ones not yet read
    pub cache_size: usize,
}

impl HealthResponse {
    pub fn ok(cache_size: usize) -> Self {
        Self {
            status: "ok".to_string(),
            cache_size,
        }
    }
}

/// Response body for the liveness probe (GET /test)
#[derive(Debug, Clone, Serialize)]
pub struct LivenessResponse {
    pub status: String,
}

impl LivenessResponse {
    pub fn alive() -> Self {
        Self {
            status: "alive".to_string(),
        }
    }
}

/// Response body for the stats endpoint (GET /stats)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    pub hits: u64,
    pub misses: u64,
    pub expirations: u64,
    pub evictions: u64,
    pub total_entries: usize,
    pub capacity: usize,
    /// Hit rate (hits / (hits + misses))
    pub hit_rate: f64,
}

impl StatsResponse {
    /// Creates a new StatsResponse from cache statistics
    pub fn new(stats: &CacheStats, capacity: usize) -> Self {
        Self {
            hits: stats.hits,
            misses: stats.misses,
            expirations: stats.expirations,
            evictions: stats.evictions,
            total_entries: stats.total_entries,
            capacity,
            hit_rate: stats.hit_rate(),
        }
    }
}

/// Error response body for all error conditions
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error message describing what went wrong
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: None,
        }
    }

    pub fn with_details(error: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: Some(details.into()),
        }
    }
}
