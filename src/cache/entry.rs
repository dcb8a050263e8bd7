//! Store Entry Module
//!
//! Defines the structure for individual entries with an optional deadline.

use chrono::{DateTime, Utc};

// == Entry ==
/// A single stored value and the instant after which it stops being visible.
///
/// Expiration is never stored; it is derived from `deadline` each time the
/// entry is looked at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Entry {
    value: String,
    deadline: Option<DateTime<Utc>>,
}

impl Entry {
    // == Constructors ==
    /// Creates an entry that never expires.
    pub fn new(value: String) -> Self {
        Self {
            value,
            deadline: None,
        }
    }

    /// Creates an entry that expires at `deadline`.
    pub fn with_deadline(value: String, deadline: DateTime<Utc>) -> Self {
        Self {
            value,
            deadline: Some(deadline),
        }
    }

    /// Returns the stored value.
    pub fn value(&self) -> &str {
        &self.value
    }

    // == Liveness ==
    /// Checks whether the entry is visible at `now`.
    ///
    /// Boundary condition: an entry whose deadline equals `now` is already
    /// expired. Only a deadline strictly after `now` keeps it live.
    pub fn is_live_at(&self, now: DateTime<Utc>) -> bool {
        match self.deadline {
            Some(deadline) => deadline > now,
            None => true,
        }
    }
}
