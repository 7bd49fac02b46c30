//! Semantic query cache domain
//!
//! A lookup embeds the incoming query, takes the single nearest stored query
//! and serves its response only when the confidence `1 / (1 + distance)`
//! reaches the threshold and the entry is younger than the TTL.

mod config;
mod entry;
mod fault;
mod policy;
mod stats;

pub use config::QueryCacheConfig;
pub use entry::{epoch_seconds_now, CacheEntry};
pub use fault::CacheFault;
pub use policy::{confidence_from_distance, evaluate, CacheHit, LookupOutcome};
pub use stats::CacheStats;

/// Collection name of the cache index
pub const CACHE_COLLECTION: &str = "query_cache";
