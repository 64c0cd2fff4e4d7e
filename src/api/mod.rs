//! API Module
//!
//! HTTP handlers and routing for the proxy REST API.
//!
//! # Endpoints
//! - `GET /search` - Product search
//! - `GET /prices` - Resell prices by size
//! - `GET /health` - Health check endpoint
//! - `GET /stats` - Cache statistics
//! - `GET /test` - Liveness marker

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
