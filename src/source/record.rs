//! Raw upstream product record.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Loosely typed product record as returned by the upstream source.
///
/// Every field is optional and kept as raw JSON, so a record with an odd
/// value in one field (a numeric name, an array of prices) still decodes and
/// is dealt with during shaping. Fields the proxy does not read are kept in
/// `extra` and sent back untouched on price enrichment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawProduct {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shoe_name: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<Value>,
    #[serde(default, rename = "styleID", skip_serializing_if = "Option::is_none")]
    pub style_id: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub colorway: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retail_price: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_date: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resell_links: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resell_prices: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lowest_resell_price: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl RawProduct {
    /// Whether the record's style ID equals `sku`, ignoring ASCII case.
    pub fn matches_sku(&self, sku: &str) -> bool {
        self.style_id
            .as_ref()
            .and_then(Value::as_str)
            .is_some_and(|style| style.eq_ignore_ascii_case(sku))
    }

    /// Marketplace link for `platform` (e.g. `stockX`), if set and non-empty.
    pub fn resell_link(&self, platform: &str) -> Option<Value> {
        nested(self.resell_links.as_ref(), platform)
    }

    /// Lowest ask on `platform` (e.g. `flightClub`), if set.
    pub fn lowest_ask(&self, platform: &str) -> Option<Value> {
        nested(self.lowest_resell_price.as_ref(), platform)
    }
}

/// Looks up `field` in an optional JSON object, treating null, false, zero
/// and empty strings as absent.
fn nested(block: Option<&Value>, field: &str) -> Option<Value> {
    block
        .and_then(Value::as_object)
        .and_then(|map| map.get(field))
        .filter(|value| is_present(value))
        .cloned()
}

fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
