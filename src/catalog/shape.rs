//! Response shaping
//!
//! Turns loosely typed upstream records into the stable response schema.

use std::collections::BTreeMap;

use serde_json::{json, Value};

use crate::models::{LowestAsks, PricesBySize, ProductPriceDetail, ProductSummary, SizeKey};
use crate::source::RawProduct;

/// Maps a search hit onto the summary schema.
pub fn summarize(product: &RawProduct) -> ProductSummary {
    ProductSummary {
        name: product.shoe_name.clone(),
        brand: product.brand.clone(),
        sku: product.style_id.clone(),
        colorway: product.colorway.clone(),
        retail_price: product.retail_price.clone(),
        release_date: product.release_date.clone(),
        thumbnail: product.thumbnail.clone(),
        stockx_id: product.resell_link("stockX"),
        goat_id: product.resell_link("goat"),
    }
}

/// Picks the candidate whose style ID matches `sku` (ignoring case), falling
/// back to the first one. Returns `None` only for an empty slice.
pub fn select_candidate<'a>(candidates: &'a [RawProduct], sku: &str) -> Option<&'a RawProduct> {
    candidates
        .iter()
        .find(|product| product.matches_sku(sku))
        .or_else(|| candidates.first())
}

/// Builds the full price detail of an enriched record.
pub fn price_detail(product: &RawProduct) -> ProductPriceDetail {
    ProductPriceDetail {
        prices_by_size: format_prices_by_size(product.resell_prices.as_ref()),
        ..base_detail(product)
    }
}

/// Builds the partial detail returned when price enrichment failed.
pub fn degraded_detail(product: &RawProduct, reason: impl Into<String>) -> ProductPriceDetail {
    ProductPriceDetail {
        error_prices: Some(reason.into()),
        ..base_detail(product)
    }
}

fn base_detail(product: &RawProduct) -> ProductPriceDetail {
    let resell_links = match &product.resell_links {
        Some(links @ Value::Object(_)) => links.clone(),
        _ => json!({}),
    };

    ProductPriceDetail {
        name: product.shoe_name.clone(),
        brand: product.brand.clone(),
        sku: product.style_id.clone(),
        colorway: product.colorway.clone(),
        retail_price: product.retail_price.clone(),
        thumbnail: product.thumbnail.clone(),
        resell_links,
        lowest_asks: LowestAsks {
            stockx: product.lowest_ask("stockX"),
            goat: product.lowest_ask("goat"),
            flight_club: product.lowest_ask("flightClub"),
        },
        prices_by_size: PricesBySize::new(),
        error_prices: None,
    }
}

/// Inverts a marketplace-major price block into a size-major table.
///
/// `{stockX: {"9": 100}, goat: {"9": 95}}` becomes
/// `{"9": {stockX: 100, goat: 95}}`. Marketplaces whose value is not an
/// object are skipped.
pub fn format_prices_by_size(resell_prices: Option<&Value>) -> PricesBySize {
    let mut sizes: PricesBySize = BTreeMap::new();

    let Some(platforms) = resell_prices.and_then(Value::as_object) else {
        return sizes;
    };

    for (platform, price_map) in platforms {
        let Some(price_map) = price_map.as_object() else {
            continue;
        };
        for (size, price) in price_map {
            sizes
                .entry(SizeKey::from(size.as_str()))
                .or_default()
                .insert(platform.clone(), price.clone());
        }
    }

    sizes
}
