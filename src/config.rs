//! Configuration Module
//!
//! Handles loading store configuration from environment variables.

use std::env;

use crate::error::{Result, StoreError};

/// Environment variable holding the initial map capacity.
pub const INITIAL_CAPACITY_VAR: &str = "STORE_INITIAL_CAPACITY";

const DEFAULT_INITIAL_CAPACITY: usize = 64;

/// Store configuration parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Number of entries the map pre-allocates room for. Not a limit.
    pub initial_capacity: usize,
}

impl StoreConfig {
    /// Creates a new StoreConfig by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `STORE_INITIAL_CAPACITY` - Pre-allocated map capacity (default: 64)
    ///
    /// Unset variables fall back to defaults; set but unparsable ones are an
    /// error.
    pub fn from_env() -> Result<Self> {
        let initial_capacity = match env::var(INITIAL_CAPACITY_VAR) {
            Ok(raw) => raw.trim().parse().map_err(|_| {
                StoreError::InvalidConfig(format!(
                    "{} must be a non-negative integer, got {:?}",
                    INITIAL_CAPACITY_VAR, raw
                ))
            })?,
            Err(_) => DEFAULT_INITIAL_CAPACITY,
        };

        Ok(Self { initial_capacity })
    }

    /// Overrides the initial map capacity.
    pub fn with_initial_capacity(mut self, initial_capacity: usize) -> Self {
        self.initial_capacity = initial_capacity;
        self
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            initial_capacity: DEFAULT_INITIAL_CAPACITY,
        }
    }
}
