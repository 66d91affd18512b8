// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! The trait for key/value store backends.

use std::{sync::Arc, time::Duration};

use crate::Error;

/// Trait for key/value stores that back cache-aside lookups.
///
/// Every method is one request/response round-trip. A missing key or field is
/// reported as `Ok(None)`; `Err` is reserved for failures of the store itself.
///
/// Implementations must be safe to share between concurrent callers. Callers never
/// mutate connection state through this trait, they only issue independent requests.
pub trait Store: Send + Sync {
    /// Reads the plain value stored under `key`.
    fn get(&self, key: &str) -> impl Future<Output = Result<Option<String>, Error>> + Send;

    /// Stores a plain value under `key` without expiration.
    fn set(&self, key: &str, value: &str) -> impl Future<Output = Result<(), Error>> + Send;

    /// Stores a plain value under `key` that expires after `ttl`.
    fn set_with_expiration(&self, key: &str, value: &str, ttl: Duration) -> impl Future<Output = Result<(), Error>> + Send;

    /// Reads `field` from the hash stored under `key`.
    fn get_field(&self, key: &str, field: &str) -> impl Future<Output = Result<Option<String>, Error>> + Send;

    /// Stores `field` in the hash under `key`. Hash fields never expire.
    fn set_field(&self, key: &str, field: &str, value: &str) -> impl Future<Output = Result<(), Error>> + Send;
}

impl<S> Store for &S
where
    S: Store,
{
    fn get(&self, key: &str) -> impl Future<Output = Result<Option<String>, Error>> + Send {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> impl Future<Output = Result<(), Error>> + Send {
        (**self).set(key, value)
    }

    fn set_with_expiration(&self, key: &str, value: &str, ttl: Duration) -> impl Future<Output = Result<(), Error>> + Send {
        (**self).set_with_expiration(key, value, ttl)
    }

    fn get_field(&self, key: &str, field: &str) -> impl Future<Output = Result<Option<String>, Error>> + Send {
        (**self).get_field(key, field)
    }

    fn set_field(&self, key: &str, field: &str, value: &str) -> impl Future<Output = Result<(), Error>> + Send {
        (**self).set_field(key, field, value)
    }
}

impl<S> Store for Arc<S>
where
    S: Store,
{
    fn get(&self, key: &str) -> impl Future<Output = Result<Option<String>, Error>> + Send {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> impl Future<Output = Result<(), Error>> + Send {
        (**self).set(key, value)
    }

    fn set_with_expiration(&self, key: &str, value: &str, ttl: Duration) -> impl Future<Output = Result<(), Error>> + Send {
        (**self).set_with_expiration(key, value, ttl)
    }

    fn get_field(&self, key: &str, field: &str) -> impl Future<Output = Result<Option<String>, Error>> + Send {
        (**self).get_field(key, field)
    }

    fn set_field(&self, key: &str, field: &str, value: &str) -> impl Future<Output = Result<(), Error>> + Send {
        (**self).set_field(key, field, value)
    }
}
