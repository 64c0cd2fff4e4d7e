//! Sneaks Proxy - A caching HTTP proxy for sneaker lookups
//!
//! Forwards product searches and resell price lookups to an upstream
//! product source and keeps shaped responses in a bounded in-memory cache.

pub mod api;
pub mod cache;
pub mod catalog;
pub mod config;
pub mod error;
pub mod models;
pub mod source;

pub use api::AppState;
pub use catalog::CatalogService;
pub use config::Config;
pub use source::{HttpProductSource, ProductSource};
