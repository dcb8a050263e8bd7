//! Error types for the store
//!
//! The core read/write operations never fail. Errors only come from the
//! convenience layers: relative TTL conversion and environment configuration.

use thiserror::Error;

// == Store Error Enum ==
/// Unified error type for the store.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// A relative TTL cannot be turned into an absolute deadline
    #[error("TTL out of range: {0}")]
    TtlOutOfRange(String),

    /// A configuration value could not be parsed
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

// == Result Type Alias ==
/// Convenience Result type for the store.
pub type Result<T> = std::result::Result<T, StoreError>;
