//! Property-Based Tests for Cache Module
//!
//! Uses proptest with a manual clock, so expiry is exercised without sleeping.

use proptest::prelude::*;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use chrono::{DateTime, Duration, TimeZone, Utc};

use crate::cache::{Clock, ManualClock, Store};

// == Helpers ==
fn epoch() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap()
}

fn manual_store() -> (Arc<ManualClock>, Store<Arc<ManualClock>>) {
    let clock = Arc::new(ManualClock::new(epoch()));
    let store = Store::with_clock(Arc::clone(&clock));
    (clock, store)
}

// == Strategies ==
/// Generates arbitrary keys, empty and unicode included
fn key_strategy() -> impl Strategy<Value = String> {
    "\\PC{0,32}"
}

/// Generates keys from a tiny alphabet so operations collide often
fn colliding_key_strategy() -> impl Strategy<Value = String> {
    "[a-d]{1,2}"
}

fn value_strategy() -> impl Strategy<Value = String> {
    "\\PC{0,64}"
}

/// Operations applied to both the store and a reference model
#[derive(Debug, Clone)]
enum StoreOp {
    Put { key: String, value: String },
    PutTill { key: String, value: String, offset_secs: i64 },
    Get { key: String },
    Advance { secs: i64 },
}

fn store_op_strategy() -> impl Strategy<Value = StoreOp> {
    prop_oneof![
        (colliding_key_strategy(), value_strategy())
            .prop_map(|(key, value)| StoreOp::Put { key, value }),
        (colliding_key_strategy(), value_strategy(), -30i64..30)
            .prop_map(|(key, value, offset_secs)| StoreOp::PutTill { key, value, offset_secs }),
        colliding_key_strategy().prop_map(|key| StoreOp::Get { key }),
        (0i64..20).prop_map(|secs| StoreOp::Advance { secs }),
    ]
}

fn model_is_live(deadline: Option<DateTime<Utc>>, now: DateTime<Utc>) -> bool {
    deadline.map_or(true, |deadline| deadline > now)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // Write-then-read: a fresh put is always readable.
    #[test]
    fn prop_put_then_get(key in key_strategy(), value in value_strategy()) {
        let (_clock, store) = manual_store();

        store.put(key.clone(), value.clone());

        prop_assert_eq!(store.get(&key), Some(value));
    }

    // Overwrite: the second write wins, deadline and all.
    #[test]
    fn prop_overwrite_semantics(
        key in key_strategy(),
        value1 in value_strategy(),
        value2 in value_strategy(),
        first_offset in -60i64..60,
    ) {
        let (_clock, store) = manual_store();

        store.put_till(key.clone(), value1, epoch() + Duration::seconds(first_offset));
        store.put(key.clone(), value2.clone());

        prop_assert_eq!(store.get(&key), Some(value2));
        prop_assert_eq!(store.stats().total_entries, 1);
    }

    // Expiry: a deadline at or before now hides the entry from get and keys.
    #[test]
    fn prop_past_deadline_is_invisible(
        key in key_strategy(),
        value in value_strategy(),
        age_secs in 0i64..1_000_000,
    ) {
        let (_clock, store) = manual_store();

        store.put_till(key.clone(), value, epoch() - Duration::seconds(age_secs));

        prop_assert_eq!(store.get(&key), None);
        prop_assert!(!store.keys().contains(&key));
    }

    // Infinite TTL: no amount of elapsed time hides a plain put.
    #[test]
    fn prop_put_never_expires(
        key in key_strategy(),
        value in value_strategy(),
        elapsed_days in 0i64..100_000,
    ) {
        let (clock, store) = manual_store();

        store.put(key.clone(), value.clone());
        clock.advance(Duration::days(elapsed_days));

        prop_assert_eq!(store.get(&key), Some(value));
        prop_assert!(store.keys().contains(&key));
    }

    // Miss: keys that were never written are never found.
    #[test]
    fn prop_miss_on_unknown_key(
        written in prop::collection::hash_set("[a-m]{1,8}", 0..20),
        probe in "[n-z]{1,8}",
    ) {
        let (_clock, store) = manual_store();
        for key in &written {
            store.put(key.clone(), "v");
        }

        prop_assert_eq!(store.get(&probe), None);
    }

    // Any interleaving of writes, reads and clock movement matches a plain
    // map filtered by deadline.
    #[test]
    fn prop_matches_reference_model(ops in prop::collection::vec(store_op_strategy(), 1..60)) {
        let (clock, store) = manual_store();
        let mut model: HashMap<String, (String, Option<DateTime<Utc>>)> = HashMap::new();
        let mut expected_hits: u64 = 0;
        let mut expected_misses: u64 = 0;

        for op in ops {
            match op {
                StoreOp::Put { key, value } => {
                    store.put(key.clone(), value.clone());
                    model.insert(key, (value, None));
                }
                StoreOp::PutTill { key, value, offset_secs } => {
                    let deadline = clock.now_plus(Duration::seconds(offset_secs));
                    store.put_till(key.clone(), value.clone(), deadline);
                    model.insert(key, (value, Some(deadline)));
                }
                StoreOp::Get { key } => {
                    let now = clock.now();
                    let expected = model
                        .get(&key)
                        .filter(|(_, deadline)| model_is_live(*deadline, now))
                        .map(|(value, _)| value.clone());
                    match &expected {
                        Some(_) => expected_hits += 1,
                        None => expected_misses += 1,
                    }
                    prop_assert_eq!(store.get(&key), expected);
                }
                StoreOp::Advance { secs } => clock.advance(Duration::seconds(secs)),
            }
        }

        let now = clock.now();
        let expected_keys: HashSet<String> = model
            .iter()
            .filter(|(_, (_, deadline))| model_is_live(*deadline, now))
            .map(|(key, _)| key.clone())
            .collect();
        let actual_keys: HashSet<String> = store.keys().into_iter().collect();
        prop_assert_eq!(actual_keys, expected_keys.clone());

        let stats = store.stats();
        prop_assert_eq!(stats.hits, expected_hits, "Hits mismatch");
        prop_assert_eq!(stats.misses, expected_misses, "Misses mismatch");
        prop_assert_eq!(stats.total_entries, model.len(), "Total entries mismatch");
        prop_assert_eq!(stats.live_entries, expected_keys.len(), "Live entries mismatch");
    }
}
