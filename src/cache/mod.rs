//! Local snapshot persistence for offline use.

pub mod manager;

pub use manager::{CacheAges, CacheManager, CachedData};
