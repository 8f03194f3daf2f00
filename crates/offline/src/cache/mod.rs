//! # Cache System
//!
//! Named, versioned cache partitions holding frozen request/response pairs.
//! Two partitions exist per version: one for static assets and documents,
//! one for API responses. Partitions are created on install, superseded
//! (never mutated in place) on version bump, and deleted wholesale when a
//! newer version activates.

mod disk;
mod partition;
mod store;
mod types;

pub use disk::DiskStore;
pub use partition::CachePartition;
pub use store::CacheStore;
pub use types::{CacheKey, CacheResult};
