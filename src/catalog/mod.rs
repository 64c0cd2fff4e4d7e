//! Catalog Module
//!
//! The lookup flows behind `/search` and `/prices`: cache check, upstream
//! delegation, response shaping and cache population.
//!
//! # Flows
//! - search: cache -> upstream search -> summaries -> cache
//! - prices: cache -> upstream search for candidates -> pick the SKU match
//!   -> upstream price enrichment -> size-major table -> cache. When only
//!   the enrichment step fails the caller still gets the product fields, as
//!   a degraded result that is never cached.
//!
//! Identical lookups that miss the cache at the same time share one upstream
//! round-trip and its outcome (see [`InFlight`]).

mod flight;
pub mod shape;

pub use flight::InFlight;

use std::any::Any;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use serde::Serialize;
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::cache::CacheStore;
use crate::config::Config;
use crate::error::{ProxyError, Result};
use crate::models::{ProductPriceDetail, ProductSummary};
use crate::source::{ProductSource, RawProduct};

/// Knobs of the lookup flows.
#[derive(Debug, Clone)]
pub struct CatalogSettings {
    /// Result count used when the client gives no usable `limit`
    pub default_search_limit: u32,
    /// Largest result count forwarded to the upstream search
    pub max_search_limit: u32,
    /// Candidates requested from upstream when resolving a SKU
    pub price_candidates: u32,
}

impl Default for CatalogSettings {
    fn default() -> Self {
        Self {
            default_search_limit: 5,
            max_search_limit: 50,
            price_candidates: 3,
        }
    }
}

impl From<&Config> for CatalogSettings {
    fn from(config: &Config) -> Self {
        Self {
            default_search_limit: config.default_search_limit,
            max_search_limit: config.max_search_limit,
            price_candidates: config.price_candidates,
        }
    }
}

/// Outcome of a price lookup.
#[derive(Debug, Clone)]
pub enum PriceLookup {
    /// Served from the cache
    Cached(Value),
    /// Fresh and complete; stored in the cache
    Complete(ProductPriceDetail),
    /// Product found but price detail unavailable; not cached
    Degraded(ProductPriceDetail),
}

impl PriceLookup {
    pub fn is_degraded(&self) -> bool {
        matches!(self, PriceLookup::Degraded(_))
    }

    /// Renders the outcome as the JSON response body.
    pub fn into_value(self) -> Result<Value> {
        match self {
            PriceLookup::Cached(value) => Ok(value),
            PriceLookup::Complete(detail) | PriceLookup::Degraded(detail) => to_payload(&detail),
        }
    }
}

/// Result of the price enrichment step.
enum Enrichment {
    Priced(RawProduct),
    Unavailable(String),
}

// == Catalog Service ==
/// Cached product lookups backed by a [`ProductSource`].
pub struct CatalogService {
    upstream: Upstream,
    settings: CatalogSettings,
    searches: InFlight<Result<Value>>,
    price_lookups: InFlight<Result<PriceLookup>>,
}

impl CatalogService {
    pub fn new(
        source: Arc<dyn ProductSource>,
        cache: Arc<RwLock<CacheStore>>,
        settings: CatalogSettings,
    ) -> Self {
        Self {
            upstream: Upstream { source, cache },
            settings,
            searches: InFlight::new(),
            price_lookups: InFlight::new(),
        }
    }

    pub fn settings(&self) -> &CatalogSettings {
        &self.settings
    }

    // == Search ==
    /// Returns up to `limit` product summaries matching `query`.
    ///
    /// `limit` is capped at the configured maximum before it reaches the
    /// cache key or the upstream.
    ///
    /// # Errors
    /// - `NotFound` when the upstream returns no products
    /// - `Upstream` when the upstream call fails
    /// - `Internal` when the upstream call panics
    pub async fn search(&self, query: &str, limit: u32) -> Result<Value> {
        let limit = limit.min(self.settings.max_search_limit);
        let key = search_key(query, limit);

        if let Some(cached) = self.upstream.cached(&key).await {
            return Ok(cached);
        }

        let call = self
            .upstream
            .clone()
            .search(key.clone(), query.to_string(), limit);
        self.searches.run(&key, call).await
    }

    // == Prices ==
    /// Resolves `sku` to a product and returns its per-size resell prices.
    ///
    /// # Errors
    /// - `NotFound` when no candidate product comes back
    /// - `Upstream` when the candidate search fails
    /// - `Internal` when the candidate search panics
    ///
    /// Failures of the price step itself produce [`PriceLookup::Degraded`].
    pub async fn prices(&self, sku: &str) -> Result<PriceLookup> {
        let key = prices_key(sku);

        if let Some(cached) = self.upstream.cached(&key).await {
            return Ok(PriceLookup::Cached(cached));
        }

        let call = self.upstream.clone().prices(
            key.clone(),
            sku.to_string(),
            self.settings.price_candidates,
        );
        self.price_lookups.run(&key, call).await
    }
}

/// Owned handles the upstream half of a lookup runs on.
#[derive(Clone)]
struct Upstream {
    source: Arc<dyn ProductSource>,
    cache: Arc<RwLock<CacheStore>>,
}

impl Upstream {
    async fn search(self, key: String, query: String, limit: u32) -> Result<Value> {
        // A lookup for this key may have finished since the caller's miss
        if let Some(cached) = self.cache.read().await.peek(&key) {
            return Ok(cached);
        }

        let products = shielded(self.source.search(&query, limit))
            .await?
            .map_err(|err| {
                warn!(%query, limit, error = %err, "product search failed");
                ProxyError::from(err)
            })?;

        if products.is_empty() {
            info!(%query, limit, "no products found");
            return Err(ProxyError::NotFound(format!(
                "No products found for '{}'",
                query
            )));
        }

        let summaries: Vec<ProductSummary> = products.iter().map(shape::summarize).collect();
        let payload = to_payload(&summaries)?;
        self.cache.write().await.set(key, payload.clone());

        Ok(payload)
    }

    async fn prices(self, key: String, sku: String, candidates: u32) -> Result<PriceLookup> {
        if let Some(cached) = self.cache.read().await.peek(&key) {
            return Ok(PriceLookup::Cached(cached));
        }

        let candidates = shielded(self.source.search(&sku, candidates))
            .await?
            .map_err(|err| {
                warn!(%sku, error = %err, "candidate search failed");
                ProxyError::from(err)
            })?;

        let Some(product) = shape::select_candidate(&candidates, &sku) else {
            info!(%sku, "no candidate product found");
            return Err(ProxyError::NotFound(format!("Product not found: {}", sku)));
        };

        match self.enrich(product).await {
            Enrichment::Priced(priced) => {
                let detail = shape::price_detail(&priced);
                let payload = to_payload(&detail)?;
                self.cache.write().await.set(key, payload);
                Ok(PriceLookup::Complete(detail))
            }
            Enrichment::Unavailable(reason) => {
                warn!(%sku, %reason, "price detail unavailable, serving product fields only");
                Ok(PriceLookup::Degraded(shape::degraded_detail(product, reason)))
            }
        }
    }

    async fn enrich(&self, product: &RawProduct) -> Enrichment {
        match shielded(self.source.fetch_prices(product)).await {
            Ok(Ok(Some(priced))) => Enrichment::Priced(priced),
            Ok(Ok(None)) => Enrichment::Unavailable("No price data returned by upstream".into()),
            Ok(Err(err)) => Enrichment::Unavailable(format!("Price lookup failed: {}", err)),
            Err(err) => Enrichment::Unavailable(err.to_string()),
        }
    }

    async fn cached(&self, key: &str) -> Option<Value> {
        let hit = self.cache.write().await.get(key);
        match &hit {
            Some(_) => debug!(key, "cache hit"),
            None => debug!(key, "cache miss"),
        }
        hit
    }
}

/// Cache key of a search lookup.
pub fn search_key(query: &str, limit: u32) -> String {
    format!("search:{}:{}", query, limit)
}

/// Cache key of a price lookup.
pub fn prices_key(sku: &str) -> String {
    format!("prices:{}", sku)
}

/// Runs an upstream call, turning a panic inside it into `Internal`.
async fn shielded<F: Future>(call: F) -> Result<F::Output> {
    AssertUnwindSafe(call)
        .catch_unwind()
        .await
        .map_err(|panic| ProxyError::Internal(panic_message(panic.as_ref())))
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    let detail = panic
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| panic.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string());
    format!("upstream call panicked: {}", detail)
}

fn to_payload<T: Serialize>(body: &T) -> Result<Value> {
    serde_json::to_value(body).map_err(|e| ProxyError::Internal(e.to_string()))
}
