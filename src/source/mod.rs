//! Product Source Module
//!
//! The upstream collaborator the proxy forwards lookups to. It offers two
//! fallible async operations: a bounded free-text product search, and price
//! enrichment for one product record.

mod http;
mod record;

pub use http::HttpProductSource;
pub use record::RawProduct;

use async_trait::async_trait;
use thiserror::Error;

// == Source Error ==
/// Failure reported by a product source.
#[derive(Error, Debug)]
pub enum SourceError {
    /// The request never produced a response (connect, timeout, ...)
    #[error("request to upstream failed: {0}")]
    Transport(String),

    /// The upstream answered with a non-success status
    #[error("upstream responded with status {0}")]
    Status(u16),

    /// The upstream body could not be decoded
    #[error("could not decode upstream response: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for SourceError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            SourceError::Decode(err.to_string())
        } else if let Some(status) = err.status() {
            SourceError::Status(status.as_u16())
        } else {
            SourceError::Transport(err.to_string())
        }
    }
}

// == Product Source Trait ==
#[async_trait]
pub trait ProductSource: Send + Sync {
    /// Searches products by free text, returning at most `limit` records.
    async fn search(&self, query: &str, limit: u32) -> Result<Vec<RawProduct>, SourceError>;

    /// Fetches resell price detail for `product`.
    ///
    /// `Ok(None)` means the upstream answered without usable price data.
    async fn fetch_prices(&self, product: &RawProduct) -> Result<Option<RawProduct>, SourceError>;
}

#[cfg(test)]
pub(crate) mod testing {
    //! Scriptable in-process source for unit tests.

    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[derive(Clone)]
    pub enum PriceBehavior {
        Enrich(serde_json::Value),
        Empty,
        Fail,
        Panic,
    }

    pub struct FakeSource {
        pub products: Vec<RawProduct>,
        pub search_error: bool,
        pub search_panics: bool,
        pub price_behavior: PriceBehavior,
        pub delay: Duration,
        pub search_calls: AtomicUsize,
        pub price_calls: AtomicUsize,
    }

    impl FakeSource {
        pub fn with_products(products: Vec<RawProduct>) -> Self {
            Self {
                products,
                search_error: false,
                search_panics: false,
                price_behavior: PriceBehavior::Empty,
                delay: Duration::ZERO,
                search_calls: AtomicUsize::new(0),
                price_calls: AtomicUsize::new(0),
            }
        }

        pub fn searches(&self) -> usize {
            self.search_calls.load(Ordering::SeqCst)
        }

        pub fn price_fetches(&self) -> usize {
            self.price_calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ProductSource for FakeSource {
        async fn search(&self, _query: &str, limit: u32) -> Result<Vec<RawProduct>, SourceError> {
            self.search_calls.fetch_add(1, Ordering::SeqCst);
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            if self.search_panics {
                panic!("search exploded");
            }
            if self.search_error {
                return Err(SourceError::Transport("connection refused".to_string()));
            }
            Ok(self.products.iter().take(limit as usize).cloned().collect())
        }

        async fn fetch_prices(
            &self,
            product: &RawProduct,
        ) -> Result<Option<RawProduct>, SourceError> {
            self.price_calls.fetch_add(1, Ordering::SeqCst);
            match &self.price_behavior {
                PriceBehavior::Enrich(resell_prices) => {
                    let mut priced = product.clone();
                    priced.resell_prices = Some(resell_prices.clone());
                    Ok(Some(priced))
                }
                PriceBehavior::Empty => Ok(None),
                PriceBehavior::Fail => Err(SourceError::Status(500)),
                PriceBehavior::Panic => panic!("price lookup exploded"),
            }
        }
    }

    pub fn product(name: &str, style_id: &str) -> RawProduct {
        RawProduct {
            shoe_name: Some(serde_json::json!(name)),
            brand: Some(serde_json::json!("Nike")),
            style_id: Some(serde_json::json!(style_id)),
            colorway: Some(serde_json::json!("White/Black")),
            retail_price: Some(serde_json::json!(110)),
            release_date: Some(serde_json::json!("2021-03-10")),
            thumbnail: Some(serde_json::json!(format!(
                "https://images.example/{}.png",
                style_id
            ))),
            ..RawProduct::default()
        }
    }
}
