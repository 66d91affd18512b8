// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::{borrow::Cow, time::Duration};

use cache_aside_store::{Error, Store};
use redis::{AsyncCommands, Client, aio::ConnectionManager};

use crate::RedisStoreBuilder;

/// A [`Store`] backed by a Redis server.
///
/// Cloning is cheap; clones share the underlying multiplexed connection, which
/// reconnects on its own after connection failures.
#[derive(Clone)]
pub struct RedisStore {
    connection: ConnectionManager,
    key_prefix: Option<String>,
}

impl RedisStore {
    /// Creates a builder that connects to `url`.
    #[must_use]
    pub fn builder(url: impl Into<String>) -> RedisStoreBuilder {
        RedisStoreBuilder::new(url)
    }

    /// Connects using an existing client.
    ///
    /// The resulting store applies no key prefix.
    ///
    /// ```no_run
    /// use cache_aside_redis::RedisStore;
    ///
    /// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let client = redis::Client::open("redis://127.0.0.1:6379/0")?;
    /// let store = RedisStore::connect(client).await?;
    /// assert_eq!(store.key_prefix(), None);
    /// # Ok(())
    /// # }
    /// ```
    ///
    /// # Errors
    ///
    /// Returns an error if the server cannot be reached.
    pub async fn connect(client: Client) -> Result<Self, Error> {
        let connection = ConnectionManager::new(client).await.map_err(Error::caused_by)?;
        Ok(Self::from_connection(connection))
    }

    /// Wraps an already established connection.
    #[must_use]
    pub fn from_connection(connection: ConnectionManager) -> Self {
        Self::with_prefix(connection, None)
    }

    pub(crate) fn with_prefix(connection: ConnectionManager, key_prefix: Option<String>) -> Self {
        Self { connection, key_prefix }
    }

    /// Returns the prefix applied to every key, if any.
    ///
    /// ```no_run
    /// use cache_aside_redis::RedisStore;
    ///
    /// # async fn example() -> Result<(), cache_aside_store::Error> {
    /// let store = RedisStore::builder("redis://127.0.0.1:6379/0")
    ///     .key_prefix("myapp:")
    ///     .build()
    ///     .await?;
    /// assert_eq!(store.key_prefix(), Some("myapp:"));
    /// # Ok(())
    /// # }
    /// ```
    #[must_use]
    pub fn key_prefix(&self) -> Option<&str> {
        self.key_prefix.as_deref()
    }

    fn key<'k>(&self, key: &'k str) -> Cow<'k, str> {
        prefixed(self.key_prefix.as_deref(), key)
    }
}

fn prefixed<'k>(prefix: Option<&str>, key: &'k str) -> Cow<'k, str> {
    match prefix {
        Some(prefix) => Cow::Owned(format!("{prefix}{key}")),
        None => Cow::Borrowed(key),
    }
}

/// Converts a TTL into the millisecond argument of `PSETEX`, which rejects zero.
fn expire_millis(ttl: Duration) -> u64 {
    u64::try_from(ttl.as_millis()).unwrap_or(u64::MAX).max(1)
}

impl std::fmt::Debug for RedisStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisStore")
            .field("key_prefix", &self.key_prefix)
            .finish_non_exhaustive()
    }
}

impl Store for RedisStore {
    async fn get(&self, key: &str) -> Result<Option<String>, Error> {
        let mut connection = self.connection.clone();
        connection
            .get::<_, Option<String>>(self.key(key).as_ref())
            .await
            .map_err(Error::caused_by)
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), Error> {
        let mut connection = self.connection.clone();
        connection
            .set::<_, _, ()>(self.key(key).as_ref(), value)
            .await
            .map_err(Error::caused_by)
    }

    async fn set_with_expiration(&self, key: &str, value: &str, ttl: Duration) -> Result<(), Error> {
        let mut connection = self.connection.clone();
        connection
            .pset_ex::<_, _, ()>(self.key(key).as_ref(), value, expire_millis(ttl))
            .await
            .map_err(Error::caused_by)
    }

    async fn get_field(&self, key: &str, field: &str) -> Result<Option<String>, Error> {
        let mut connection = self.connection.clone();
        connection
            .hget::<_, _, Option<String>>(self.key(key).as_ref(), field)
            .await
            .map_err(Error::caused_by)
    }

    async fn set_field(&self, key: &str, field: &str, value: &str) -> Result<(), Error> {
        let mut connection = self.connection.clone();
        connection
            .hset::<_, _, _, ()>(self.key(key).as_ref(), field, value)
            .await
            .map_err(Error::caused_by)
    }
}
