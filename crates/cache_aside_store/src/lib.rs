// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
#![cfg_attr(docsrs, feature(doc_cfg))]

//! Key/value store abstraction for cache-aside lookups.
//!
//! This crate defines the [`Store`] trait that the `cache_aside` crate issues its
//! reads and writes against, along with the opaque [`Error`] type those operations
//! return. A store exposes two storage shapes:
//!
//! - **Plain values** stored under a single key, optionally with an expiration.
//! - **Hash fields** stored as one field inside a keyed collection, without expiration.
//!
//! Connection management, the wire protocol and persistence all belong to the
//! implementation. The trait only describes the five commands a cache-aside
//! lookup needs.
//!
//! # Implementing a Store
//!
//! ```
//! use std::collections::HashMap;
//! use std::sync::Mutex;
//! use std::time::Duration;
//!
//! use cache_aside_store::{Error, Store};
//!
//! #[derive(Default)]
//! struct MapStore {
//!     values: Mutex<HashMap<String, String>>,
//!     fields: Mutex<HashMap<(String, String), String>>,
//! }
//!
//! impl Store for MapStore {
//!     async fn get(&self, key: &str) -> Result<Option<String>, Error> {
//!         Ok(self.values.lock().unwrap().get(key).cloned())
//!     }
//!
//!     async fn set(&self, key: &str, value: &str) -> Result<(), Error> {
//!         self.values.lock().unwrap().insert(key.to_owned(), value.to_owned());
//!         Ok(())
//!     }
//!
//!     async fn set_with_expiration(&self, key: &str, value: &str, _ttl: Duration) -> Result<(), Error> {
//!         self.set(key, value).await
//!     }
//!
//!     async fn get_field(&self, key: &str, field: &str) -> Result<Option<String>, Error> {
//!         Ok(self.fields.lock().unwrap().get(&(key.to_owned(), field.to_owned())).cloned())
//!     }
//!
//!     async fn set_field(&self, key: &str, field: &str, value: &str) -> Result<(), Error> {
//!         self.fields
//!             .lock()
//!             .unwrap()
//!             .insert((key.to_owned(), field.to_owned()), value.to_owned());
//!         Ok(())
//!     }
//! }
//! ```
//!
//! # Testing
//!
//! Enable the `test-util` feature for [`testing::MockStore`], an in-memory store that
//! records every command and supports failure injection.

pub mod error;
mod store;
#[cfg(any(feature = "test-util", test))]
pub mod testing;

#[doc(inline)]
pub use error::{Error, Result};
#[doc(inline)]
pub use store::Store;
