// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
#![cfg_attr(docsrs, feature(doc_cfg))]

//! Redis-backed [`Store`](cache_aside_store::Store) for cache-aside lookups.
//!
//! [`RedisStore`] maps the store commands onto `GET`, `SET`, `PSETEX`, `HGET` and
//! `HSET` over a multiplexed, automatically reconnecting connection.
//!
//! # Examples
//!
//! ```no_run
//! use cache_aside::CacheEntry;
//! use cache_aside_redis::RedisStore;
//!
//! # async fn example() -> Result<(), cache_aside::Error> {
//! let store = RedisStore::builder("redis://127.0.0.1:6379/0")
//!     .key_prefix("myapp:")
//!     .build()
//!     .await?;
//!
//! let entry = CacheEntry::new(&store, "greeting", || async {
//!     Ok::<_, std::convert::Infallible>("hello world".to_string())
//! });
//!
//! let mut greeting = String::new();
//! entry.fetch(&mut greeting).await?;
//! # Ok(())
//! # }
//! ```

mod builder;
mod store;

#[doc(inline)]
pub use builder::RedisStoreBuilder;
#[doc(inline)]
pub use store::RedisStore;
