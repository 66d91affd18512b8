// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Mock store implementation for testing.
//!
//! This module provides `MockStore`, an in-memory store that records every
//! command it receives and supports failure injection for testing error paths.

use std::{
    collections::HashMap,
    sync::Arc,
    time::{Duration, Instant},
};

use parking_lot::Mutex;
use tick::Clock;

use crate::{Error, Store};

/// Recorded store command with full context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreOp {
    /// A plain value was read.
    Get {
        /// The key that was read.
        key: String,
    },
    /// A plain value was written without expiration.
    Set {
        /// The key that was written.
        key: String,
        /// The value that was written.
        value: String,
    },
    /// A plain value was written with an expiration.
    SetWithExpiration {
        /// The key that was written.
        key: String,
        /// The value that was written.
        value: String,
        /// The requested time-to-live.
        ttl: Duration,
    },
    /// A hash field was read.
    GetField {
        /// The hash key.
        key: String,
        /// The field within the hash.
        field: String,
    },
    /// A hash field was written.
    SetField {
        /// The hash key.
        key: String,
        /// The field within the hash.
        field: String,
        /// The value that was written.
        value: String,
    },
}

impl StoreOp {
    /// Returns `true` for commands that write to the store.
    #[must_use]
    pub fn is_write(&self) -> bool {
        matches!(self, Self::Set { .. } | Self::SetWithExpiration { .. } | Self::SetField { .. })
    }
}

type FailPredicate = Box<dyn Fn(&StoreOp) -> bool + Send + Sync>;

#[derive(Debug)]
struct PlainValue {
    value: String,
    expires_at: Option<Instant>,
}

impl PlainValue {
    fn is_live(&self, now: Instant) -> bool {
        self.expires_at.is_none_or(|deadline| now < deadline)
    }
}

#[derive(Debug, Default)]
struct Data {
    values: HashMap<String, PlainValue>,
    hashes: HashMap<String, HashMap<String, String>>,
}

/// A configurable mock store for testing.
///
/// Plain values honor their expiration against the store's [`Clock`]: once the
/// deadline passes they read as absent. [`MockStore::new`] uses a frozen clock, so
/// nothing expires unless the store is built with [`MockStore::with_clock`] over a
/// `ClockControl` that the test advances.
///
/// Every command is recorded for later verification, including commands that were
/// made to fail. Clones share the same data, clock and recordings.
///
/// # Examples
///
/// ```
/// use cache_aside_store::{testing::{MockStore, StoreOp}, Store};
///
/// # futures::executor::block_on(async {
/// let store = MockStore::new();
///
/// store.set("key", "value").await.unwrap();
/// assert_eq!(store.get("key").await.unwrap().as_deref(), Some("value"));
///
/// assert_eq!(store.operations(), vec![
///     StoreOp::Set { key: "key".to_string(), value: "value".to_string() },
///     StoreOp::Get { key: "key".to_string() },
/// ]);
/// # });
/// ```
///
/// # Expiration
///
/// ```
/// use std::time::Duration;
///
/// use cache_aside_store::{testing::MockStore, Store};
/// use tick::ClockControl;
///
/// # futures::executor::block_on(async {
/// let control = ClockControl::new();
/// let store = MockStore::with_clock(control.to_clock());
///
/// store.set_with_expiration("key", "value", Duration::from_secs(60)).await.unwrap();
/// assert!(store.get("key").await.unwrap().is_some());
///
/// control.advance(Duration::from_secs(61));
/// assert!(store.get("key").await.unwrap().is_none());
/// # });
/// ```
///
/// # Failure Injection
///
/// ```
/// use cache_aside_store::{testing::{MockStore, StoreOp}, Store};
///
/// # futures::executor::block_on(async {
/// let store = MockStore::new();
///
/// // Fail every write
/// store.fail_when(StoreOp::is_write);
/// assert!(store.set("key", "value").await.is_err());
///
/// // Fail reads of one key only
/// store.fail_when(|op| matches!(op, StoreOp::Get { key } if key == "forbidden"));
/// assert!(store.get("forbidden").await.is_err());
/// assert!(store.get("allowed").await.is_ok());
/// # });
/// ```
#[derive(Clone)]
pub struct MockStore {
    clock: Clock,
    data: Arc<Mutex<Data>>,
    operations: Arc<Mutex<Vec<StoreOp>>>,
    fail_when: Arc<Mutex<Option<FailPredicate>>>,
}

impl std::fmt::Debug for MockStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockStore")
            .field("clock", &self.clock)
            .field("data", &self.data)
            .field("operations", &self.operations)
            .field("fail_when", &self.fail_when.lock().is_some())
            .finish()
    }
}

impl Default for MockStore {
    fn default() -> Self {
        Self::with_clock(Clock::new_frozen())
    }
}

impl MockStore {
    /// Creates a new empty mock store over a frozen clock.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new empty mock store whose expirations follow `clock`.
    #[must_use]
    pub fn with_clock(clock: Clock) -> Self {
        Self {
            clock,
            data: Arc::default(),
            operations: Arc::default(),
            fail_when: Arc::default(),
        }
    }

    /// Sets a predicate that decides which commands fail.
    ///
    /// A failing command is still recorded but does not touch the stored data.
    pub fn fail_when<F>(&self, predicate: F)
    where
        F: Fn(&StoreOp) -> bool + Send + Sync + 'static,
    {
        *self.fail_when.lock() = Some(Box::new(predicate));
    }

    /// Clears the failure predicate, allowing all commands to succeed.
    pub fn clear_failures(&self) {
        *self.fail_when.lock() = None;
    }

    /// Returns a clone of all recorded commands.
    #[must_use]
    pub fn operations(&self) -> Vec<StoreOp> {
        self.operations.lock().clone()
    }

    /// Returns the number of recorded write commands.
    #[must_use]
    pub fn write_count(&self) -> usize {
        self.operations.lock().iter().filter(|op| op.is_write()).count()
    }

    /// Clears all recorded commands.
    pub fn clear_operations(&self) {
        self.operations.lock().clear();
    }

    /// Returns the live plain value under `key` without recording a command.
    #[must_use]
    pub fn peek(&self, key: &str) -> Option<String> {
        let now = self.clock.instant();
        self.data
            .lock()
            .values
            .get(key)
            .filter(|v| v.is_live(now))
            .map(|v| v.value.clone())
    }

    /// Returns the hash field under `key` without recording a command.
    #[must_use]
    pub fn peek_field(&self, key: &str, field: &str) -> Option<String> {
        self.data.lock().hashes.get(key).and_then(|hash| hash.get(field)).cloned()
    }

    fn check(&self, op: StoreOp) -> Result<(), Error> {
        let fail = self.fail_when.lock().as_ref().is_some_and(|predicate| predicate(&op));
        self.operations.lock().push(op);
        if fail {
            return Err(Error::caused_by("mock: command failed"));
        }
        Ok(())
    }

    fn put(&self, key: &str, value: &str, expires_at: Option<Instant>) {
        self.data.lock().values.insert(
            key.to_owned(),
            PlainValue {
                value: value.to_owned(),
                expires_at,
            },
        );
    }
}

impl Store for MockStore {
    async fn get(&self, key: &str) -> Result<Option<String>, Error> {
        self.check(StoreOp::Get { key: key.to_owned() })?;

        let now = self.clock.instant();
        let mut data = self.data.lock();
        match data.values.get(key) {
            Some(v) if v.is_live(now) => Ok(Some(v.value.clone())),
            Some(_) => {
                data.values.remove(key);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), Error> {
        self.check(StoreOp::Set {
            key: key.to_owned(),
            value: value.to_owned(),
        })?;
        self.put(key, value, None);
        Ok(())
    }

    async fn set_with_expiration(&self, key: &str, value: &str, ttl: Duration) -> Result<(), Error> {
        self.check(StoreOp::SetWithExpiration {
            key: key.to_owned(),
            value: value.to_owned(),
            ttl,
        })?;
        self.put(key, value, self.clock.instant().checked_add(ttl));
        Ok(())
    }

    async fn get_field(&self, key: &str, field: &str) -> Result<Option<String>, Error> {
        self.check(StoreOp::GetField {
            key: key.to_owned(),
            field: field.to_owned(),
        })?;
        Ok(self.peek_field(key, field))
    }

    async fn set_field(&self, key: &str, field: &str, value: &str) -> Result<(), Error> {
        self.check(StoreOp::SetField {
            key: key.to_owned(),
            field: field.to_owned(),
            value: value.to_owned(),
        })?;
        self.data
            .lock()
            .hashes
            .entry(key.to_owned())
            .or_default()
            .insert(field.to_owned(), value.to_owned());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use tick::ClockControl;

    use super::*;

    fn block_on<F: std::future::Future>(f: F) -> F::Output {
        futures::executor::block_on(f)
    }

    #[test]
    fn assert_types() {
        static_assertions::assert_impl_all!(MockStore: Send, Sync, Clone);
    }

    #[test]
    fn get_missing_key_returns_none() {
        block_on(async {
            let store = MockStore::new();
            assert_eq!(store.get("missing").await.expect("get failed"), None);
        });
    }

    #[test]
    fn expired_value_reads_as_absent() {
        block_on(async {
            let control = ClockControl::new();
            let store = MockStore::with_clock(control.to_clock());
            store
                .set_with_expiration("key", "value", Duration::from_millis(10))
                .await
                .expect("set failed");

            control.advance(Duration::from_millis(9));
            assert_eq!(store.peek("key").as_deref(), Some("value"));

            control.advance(Duration::from_millis(1));
            assert_eq!(store.get("key").await.expect("get failed"), None);
            assert_eq!(store.peek("key"), None);
        });
    }

    #[test]
    fn frozen_clock_never_expires() {
        block_on(async {
            let store = MockStore::new();
            store
                .set_with_expiration("key", "value", Duration::from_nanos(1))
                .await
                .expect("set failed");

            assert_eq!(store.get("key").await.expect("get failed").as_deref(), Some("value"));
        });
    }

    #[test]
    fn plain_set_ignores_clock() {
        block_on(async {
            let control = ClockControl::new();
            let store = MockStore::with_clock(control.to_clock());
            store.set("key", "value").await.expect("set failed");

            control.advance(Duration::from_secs(3600));

            assert_eq!(store.peek("key").as_deref(), Some("value"));
        });
    }

    #[test]
    fn failed_write_is_recorded_but_not_applied() {
        block_on(async {
            let store = MockStore::new();
            store.fail_when(StoreOp::is_write);

            store.set("key", "value").await.expect_err("set should fail");

            assert_eq!(store.peek("key"), None);
            assert_eq!(store.write_count(), 1);

            store.clear_failures();
            store.set("key", "value").await.expect("set failed");
            assert_eq!(store.peek("key").as_deref(), Some("value"));
        });
    }

    #[test]
    fn fields_are_isolated_per_hash() {
        block_on(async {
            let store = MockStore::new();
            store.set_field("hash", "a", "1").await.expect("set_field failed");
            store.set_field("hash", "b", "2").await.expect("set_field failed");
            store.set_field("other", "a", "3").await.expect("set_field failed");

            assert_eq!(store.get_field("hash", "a").await.expect("get_field failed").as_deref(), Some("1"));
            assert_eq!(store.get_field("hash", "b").await.expect("get_field failed").as_deref(), Some("2"));
            assert_eq!(store.get_field("other", "a").await.expect("get_field failed").as_deref(), Some("3"));
            assert_eq!(store.get_field("other", "b").await.expect("get_field failed"), None);
        });
    }

    #[test]
    fn clones_share_state() {
        block_on(async {
            let store = MockStore::new();
            let clone = store.clone();

            clone.set("key", "value").await.expect("set failed");

            assert_eq!(store.peek("key").as_deref(), Some("value"));
            assert_eq!(store.operations().len(), 1);

            store.clear_operations();
            assert!(clone.operations().is_empty());
        });
    }
}
