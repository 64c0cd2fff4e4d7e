//! Cache Module
//!
//! In-memory response cache with lazy TTL expiry and insertion-order
//! eviction on overflow.

mod entry;
mod fifo;
mod stats;
mod store;


// Re-export public types
pub use entry::CacheEntry;
pub use fifo::InsertionOrder;
pub use stats::CacheStats;
pub use store::CacheStore;

// == Public Constants ==
/// Default maximum number of cached keys
pub const DEFAULT_CAPACITY: usize = 500;

/// Default entry lifetime in milliseconds (10 minutes)
pub const DEFAULT_TTL_MS: u64 = 10 * 60 * 1000;
