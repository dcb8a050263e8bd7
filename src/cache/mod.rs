//! Cache Module
//!
//! Provides the in-memory store with lazily evaluated deadlines.

mod clock;
mod entry;
mod stats;
mod store;

#[cfg(test)]
mod property_tests;

// Re-export public types
pub use clock::{Clock, ManualClock, SystemClock};
pub(crate) use entry::Entry;
pub use stats::StoreStats;
pub use store::Store;
