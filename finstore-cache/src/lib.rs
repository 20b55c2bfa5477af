//! finstore-cache
//!
//! Explicit static data cache shared by the finstore orchestrator.
//!
//! The cache is an ordinary value: build it once from a
//! [`CacheConfig`](finstore_types::CacheConfig), inject it where needed and
//! invalidate it through its methods. Nothing is held in global state.
#![warn(missing_docs)]

mod cache;

pub use cache::{HistoryKey, InstrumentsKey, StaticDataCache};
