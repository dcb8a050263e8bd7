//! Store Module
//!
//! Thread-safe map from keys to entries with lazily evaluated deadlines.

use std::collections::HashMap;
use std::fmt;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::{debug, trace, warn};

use crate::cache::stats::Counters;
use crate::cache::{Clock, Entry, StoreStats, SystemClock};
use crate::config::StoreConfig;
use crate::error::{Result, StoreError};

// == Store ==
/// In-memory key/value store where entries may carry a deadline.
///
/// Writes take the lock in exclusive mode, reads in shared mode. Expired
/// entries are never removed; they simply stop being observable and stay in
/// the map until the same key is written again.
///
/// Share it between threads with an `Arc`:
///
/// ```
/// use std::sync::Arc;
/// use std::thread;
/// use deadline_store::Store;
///
/// let store = Arc::new(Store::new());
/// let writer = {
///     let store = Arc::clone(&store);
///     thread::spawn(move || store.put("a", "1"))
/// };
/// writer.join().unwrap();
///
/// assert_eq!(store.get("a").as_deref(), Some("1"));
/// assert_eq!(store.keys(), vec!["a".to_string()]);
/// ```
pub struct Store<C: Clock = SystemClock> {
    data: RwLock<HashMap<String, Entry>>,
    counters: Counters,
    clock: C,
}

impl Store<SystemClock> {
    // == Constructors ==
    /// Creates an empty store driven by the wall clock.
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }

    /// Creates an empty store sized from `config`, driven by the wall clock.
    pub fn from_config(config: &StoreConfig) -> Self {
        Self::with_config_and_clock(config, SystemClock)
    }
}

impl Default for Store<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> Store<C> {
    /// Creates an empty store that reads time from `clock`.
    pub fn with_clock(clock: C) -> Self {
        Self::with_config_and_clock(&StoreConfig::default(), clock)
    }

    /// Creates an empty store sized from `config` that reads time from `clock`.
    pub fn with_config_and_clock(config: &StoreConfig, clock: C) -> Self {
        Self {
            data: RwLock::new(HashMap::with_capacity(config.initial_capacity)),
            counters: Counters::default(),
            clock,
        }
    }

    // == Put ==
    /// Stores `value` under `key` with no deadline, replacing any previous entry.
    ///
    /// # Arguments
    /// * `key` - The key to store
    /// * `value` - The value to store
    pub fn put(&self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        debug!(key = %key, "put without deadline");
        self.replace(key, Entry::new(value.into()));
    }

    // == Put Till ==
    /// Stores `value` under `key` until `deadline`, replacing any previous entry.
    ///
    /// A deadline that is not in the future makes the entry invisible right away.
    ///
    /// # Arguments
    /// * `key` - The key to store
    /// * `value` - The value to store
    /// * `deadline` - Absolute instant at which the entry stops being visible
    pub fn put_till(
        &self,
        key: impl Into<String>,
        value: impl Into<String>,
        deadline: DateTime<Utc>,
    ) {
        let key = key.into();
        debug!(key = %key, deadline = %deadline, "put with deadline");
        self.replace(key, Entry::with_deadline(value.into(), deadline));
    }

    // == Put For ==
    /// Stores `value` under `key` for `ttl` from now.
    ///
    /// Fails without touching the map when `now + ttl` cannot be represented.
    ///
    /// # Arguments
    /// * `key` - The key to store
    /// * `value` - The value to store
    /// * `ttl` - How long after the store's current time the entry stays visible
    pub fn put_for(
        &self,
        key: impl Into<String>,
        value: impl Into<String>,
        ttl: Duration,
    ) -> Result<()> {
        let delta = chrono::Duration::from_std(ttl).map_err(|_| {
            StoreError::TtlOutOfRange(format!("{:?} exceeds the supported range", ttl))
        })?;
        let deadline = self.clock.now().checked_add_signed(delta).ok_or_else(|| {
            StoreError::TtlOutOfRange(format!("{:?} from now overflows the calendar", ttl))
        })?;

        self.put_till(key, value, deadline);
        Ok(())
    }

    // == Get ==
    /// Returns the value under `key` if it exists and has not expired.
    ///
    /// Hits and misses are counted; an expired entry counts as a miss.
    ///
    /// # Arguments
    /// * `key` - The key to retrieve
    pub fn get(&self, key: &str) -> Option<String> {
        let data = self.read_map();
        let now = self.clock.now();

        match data.get(key).filter(|entry| entry.is_live_at(now)) {
            Some(entry) => {
                self.counters.record_hit();
                trace!(key, "get hit");
                Some(entry.value().to_string())
            }
            None => {
                self.counters.record_miss();
                trace!(key, "get miss");
                None
            }
        }
    }

    // == Keys ==
    /// Returns every key whose entry is live, in no particular order.
    ///
    /// Liveness of all entries is judged against one instant taken at the
    /// start of the call.
    pub fn keys(&self) -> Vec<String> {
        let now = self.clock.now();
        let data = self.read_map();

        let keys: Vec<String> = data
            .iter()
            .filter(|(_, entry)| entry.is_live_at(now))
            .map(|(key, _)| key.clone())
            .collect();

        trace!(live = keys.len(), total = data.len(), "keys enumerated");
        keys
    }

    // == Stats ==
    /// Returns current store statistics.
    pub fn stats(&self) -> StoreStats {
        let now = self.clock.now();
        let data = self.read_map();

        StoreStats {
            hits: self.counters.hits(),
            misses: self.counters.misses(),
            total_entries: data.len(),
            live_entries: data.values().filter(|entry| entry.is_live_at(now)).count(),
        }
    }

    /// Returns the clock the store reads time from.
    pub fn clock(&self) -> &C {
        &self.clock
    }

    // == Lock Helpers ==
    // Every map access goes through these guards; they release on drop.

    fn replace(&self, key: String, entry: Entry) {
        self.write_map().insert(key, entry);
    }

    fn read_map(&self) -> RwLockReadGuard<'_, HashMap<String, Entry>> {
        self.data.read().unwrap_or_else(|poisoned| {
            warn!("recovering store map from a poisoned lock");
            PoisonError::into_inner(poisoned)
        })
    }

    fn write_map(&self) -> RwLockWriteGuard<'_, HashMap<String, Entry>> {
        self.data.write().unwrap_or_else(|poisoned| {
            warn!("recovering store map from a poisoned lock");
            PoisonError::into_inner(poisoned)
        })
    }
}

impl<C: Clock> fmt::Debug for Store<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Store")
            .field("entries", &self.read_map().len())
            .field("hits", &self.counters.hits())
            .field("misses", &self.counters.misses())
            .finish()
    }
}
