//! Request DTOs for the proxy API
//!
//! Query strings of the lookup endpoints. Every field is optional at the
//! extractor level so a missing parameter is reported by the handler as a
//! JSON 400 instead of an extractor rejection.

use serde::Deserialize;

/// Query string of `GET /search`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchParams {
    /// Free text or SKU-like search string
    #[serde(default)]
    pub query: Option<String>,
    /// Requested result count, kept raw so junk falls back to the default
    #[serde(default)]
    pub limit: Option<String>,
}

impl SearchParams {
    /// Returns the query if present and not blank.
    pub fn query(&self) -> Option<&str> {
        non_blank(self.query.as_deref())
    }

    /// Parses `limit` as a positive integer, or returns `default`.
    pub fn limit_or(&self, default: u32) -> u32 {
        self.limit
            .as_deref()
            .and_then(|raw| raw.trim().parse::<u32>().ok())
            .filter(|n| *n > 0)
            .unwrap_or(default)
    }
}

/// Query string of `GET /prices`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PricesParams {
    #[serde(default)]
    pub sku: Option<String>,
}

impl PricesParams {
    /// Returns the SKU if present and not blank.
    pub fn sku(&self) -> Option<&str> {
        non_blank(self.sku.as_deref())
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}
