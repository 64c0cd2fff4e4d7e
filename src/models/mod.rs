//! Request and Response models for the proxy API
//!
//! This module defines the DTOs (Data Transfer Objects) used for
//! deserializing query strings and serializing HTTP response bodies.

pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use requests::{PricesParams, SearchParams};
pub use responses::{
    ErrorResponse, HealthResponse, LivenessResponse, LowestAsks, PricesBySize,
    ProductPriceDetail, ProductSummary, SizeKey, StatsResponse,
};
