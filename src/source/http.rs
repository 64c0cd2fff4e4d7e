//! HTTP Product Source
//!
//! Talks to a sidecar service exposing the sneaker scraping library over
//! JSON:
//! - `GET  {base}/products?query=..&limit=..` returns an array of records
//! - `POST {base}/products/prices` takes a record and returns it enriched

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use tracing::debug;

use super::{ProductSource, RawProduct, SourceError};
use crate::config::Config;

/// reqwest-backed [`ProductSource`].
#[derive(Debug, Clone)]
pub struct HttpProductSource {
    http: Client,
    base_url: String,
}

impl HttpProductSource {
    /// Creates a client for the upstream at `base_url`.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, SourceError> {
        let http = Client::builder().timeout(timeout).build()?;
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self { http, base_url })
    }

    /// Creates a client from the upstream settings in `config`.
    pub fn from_config(config: &Config) -> Result<Self, SourceError> {
        Self::new(
            config.upstream_url.clone(),
            Duration::from_secs(config.upstream_timeout_secs),
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl ProductSource for HttpProductSource {
    async fn search(&self, query: &str, limit: u32) -> Result<Vec<RawProduct>, SourceError> {
        let url = format!("{}/products", self.base_url);
        let limit = limit.to_string();
        debug!(%url, query, %limit, "searching upstream products");

        let response = self
            .http
            .get(&url)
            .query(&[("query", query), ("limit", limit.as_str())])
            .send()
            .await?;

        match response.status() {
            StatusCode::NOT_FOUND => return Ok(Vec::new()),
            status if !status.is_success() => return Err(SourceError::Status(status.as_u16())),
            _ => {}
        }

        let products: Option<Vec<RawProduct>> = response.json().await?;
        Ok(products.unwrap_or_default())
    }

    async fn fetch_prices(&self, product: &RawProduct) -> Result<Option<RawProduct>, SourceError> {
        let url = format!("{}/products/prices", self.base_url);
        debug!(%url, style_id = ?product.style_id, "fetching upstream prices");

        let response = self.http.post(&url).json(product).send().await?;

        match response.status() {
            StatusCode::NOT_FOUND | StatusCode::NO_CONTENT => return Ok(None),
            status if !status.is_success() => return Err(SourceError::Status(status.as_u16())),
            _ => {}
        }

        let body = response.bytes().await?;
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(None);
        }
        serde_json::from_slice::<Option<RawProduct>>(&body)
            .map_err(|e| SourceError::Decode(e.to_string()))
    }
}
