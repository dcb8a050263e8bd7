//! Deadline Store - A thread-safe in-memory key/value store
//!
//! Entries may carry a deadline after which they are no longer observable.
//! Expiration is evaluated lazily on access; nothing is ever reaped.

pub mod cache;
pub mod config;
pub mod error;

pub use cache::{Clock, ManualClock, Store, StoreStats, SystemClock};
pub use config::StoreConfig;
pub use error::{Result, StoreError};
