// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
#![cfg_attr(docsrs, feature(doc_cfg))]

//! Cache-aside lookups against a key/value store.
//!
//! A cache entry binds a key, a generator and a store. Fetching the entry reads the
//! key from the store; on a miss it calls the generator, writes the result to the
//! store and returns it. Values are stored as strings and decoded into whatever
//! destination the caller passes in.
//!
//! # Storage shapes
//!
//! - [`PlainEntry`] stores the value under its own key and may expire.
//! - [`HashFieldEntry`] stores the value as one field of a keyed hash and never expires.
//!
//! [`CacheEntry`] wraps either one.
//!
//! # Examples
//!
//! ```
//! use std::time::Duration;
//!
//! use cache_aside::CacheEntry;
//! use cache_aside_store::testing::MockStore;
//!
//! # futures::executor::block_on(async {
//! let store = MockStore::new();
//! let entry = CacheEntry::with_ttl(
//!     &store,
//!     "answer",
//!     || async { Ok::<_, std::convert::Infallible>("42".to_string()) },
//!     Duration::from_secs(30),
//! );
//!
//! let mut answer = 0_i32;
//! entry.fetch(&mut answer).await?;
//! assert_eq!(answer, 42);
//! # Ok::<(), cache_aside::Error>(())
//! # });
//! ```
//!
//! # Concurrency
//!
//! Fetches take no locks. Two callers that miss the same key at the same time both
//! run the generator and both write the result; the last write wins. Generators
//! should be idempotent.
//!
//! # Features
//!
//! - `logs`: emits `tracing` events at DEBUG level for hits, misses and writes.
//! - `test-util`: re-exports [`MockStore`] and [`StoreOp`] for tests.

mod destination;
mod entry;
pub mod error;
pub mod generate;
mod key;
mod telemetry;

#[doc(inline)]
pub use cache_aside_store::Store;
#[cfg(any(feature = "test-util", test))]
#[doc(inline)]
pub use cache_aside_store::testing::{MockStore, StoreOp};
#[doc(inline)]
pub use destination::{DecodeJson, DecodeText, Destination, JsonSlot, RawJson};
#[doc(inline)]
pub use entry::{CacheEntry, HashFieldEntry, PlainEntry};
#[doc(inline)]
pub use error::{BoxError, Error, Result};
#[doc(inline)]
pub use generate::Generate;
#[doc(inline)]
pub use key::{EncodeText, Key};
