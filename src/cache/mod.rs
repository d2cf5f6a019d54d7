//! In-process caching for the pool-listing read path

pub mod rate_cache;

pub use rate_cache::{Clock, RateCache, SystemClock, DEFAULT_RATE_TTL_SECS};
