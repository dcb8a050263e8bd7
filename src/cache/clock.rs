//! Clock Module
//!
//! Abstracts "current time" so expiration can be driven deterministically.

use std::sync::{Arc, Mutex, PoisonError};

use chrono::{DateTime, Duration, Utc};

// == Clock Trait ==
/// Source of the current instant used for liveness checks.
pub trait Clock: Send + Sync {
    /// Returns the current instant.
    fn now(&self) -> DateTime<Utc>;
}

impl<C: Clock + ?Sized> Clock for Arc<C> {
    fn now(&self) -> DateTime<Utc> {
        (**self).now()
    }
}

// == System Clock ==
/// Wall clock backed by `Utc::now()`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

// == Manual Clock ==
/// Clock that only moves when told to.
///
/// Share it with a store through an `Arc` and keep a handle to advance it:
///
/// ```
/// use std::sync::Arc;
/// use chrono::{Duration, Utc};
/// use deadline_store::{ManualClock, Store};
///
/// let clock = Arc::new(ManualClock::new(Utc::now()));
/// let store = Store::with_clock(Arc::clone(&clock));
///
/// store.put_till("session", "abc", clock.now_plus(Duration::seconds(30)));
/// assert_eq!(store.get("session").as_deref(), Some("abc"));
///
/// clock.advance(Duration::seconds(30));
/// assert_eq!(store.get("session"), None);
/// ```
#[derive(Debug)]
pub struct ManualClock {
    current: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    /// Creates a clock frozen at `start`.
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            current: Mutex::new(start),
        }
    }

    /// Moves the clock to `instant`, forwards or backwards.
    pub fn set(&self, instant: DateTime<Utc>) {
        *self.current.lock().unwrap_or_else(PoisonError::into_inner) = instant;
    }

    /// Moves the clock forward by `delta`.
    pub fn advance(&self, delta: Duration) {
        let mut current = self.current.lock().unwrap_or_else(PoisonError::into_inner);
        *current += delta;
    }

    /// Returns the current instant offset by `delta`.
    pub fn now_plus(&self, delta: Duration) -> DateTime<Utc> {
        self.now() + delta
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.current.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
