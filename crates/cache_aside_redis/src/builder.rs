// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Builder for configuring Redis stores.

use cache_aside_store::Error;
use redis::{Client, aio::ConnectionManager};

use crate::RedisStore;

/// Builder for a [`RedisStore`].
///
/// # Examples
///
/// ```no_run
/// use cache_aside_redis::RedisStore;
///
/// # async fn example() -> Result<(), cache_aside_store::Error> {
/// let store = RedisStore::builder("redis://127.0.0.1:6379/15")
///     .key_prefix("cache:")
///     .build()
///     .await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct RedisStoreBuilder {
    url: String,
    key_prefix: Option<String>,
}

impl RedisStoreBuilder {
    /// Creates a builder that connects to `url`.
    ///
    /// The URL follows the `redis://[user:password@]host[:port][/db]` scheme.
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            key_prefix: None,
        }
    }

    /// Prepends `prefix` to every key the store reads or writes.
    ///
    /// Hash fields are not prefixed.
    #[must_use]
    pub fn key_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.key_prefix = Some(prefix.into()).filter(|p: &String| !p.is_empty());
        self
    }

    /// Opens the connection and builds the store.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid or the server cannot be reached.
    pub async fn build(self) -> Result<RedisStore, Error> {
        let client = Client::open(self.url.as_str()).map_err(Error::caused_by)?;
        let connection = ConnectionManager::new(client).await.map_err(Error::caused_by)?;
        Ok(RedisStore::with_prefix(connection, self.key_prefix))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_prefix_is_ignored() {
        let builder = RedisStoreBuilder::new("redis://localhost").key_prefix("");
        assert_eq!(builder.key_prefix, None);
    }

    #[test]
    fn prefix_is_kept() {
        let builder = RedisStoreBuilder::new("redis://localhost").key_prefix("app:");
        assert_eq!(builder.key_prefix.as_deref(), Some("app:"));
        assert_eq!(builder.url, "redis://localhost");
    }

    #[tokio::test]
    async fn invalid_url_fails_to_build() {
        let error = RedisStoreBuilder::new("not a url").build().await.expect_err("url is invalid");
        assert!(error.cause_as::<redis::RedisError>().is_some());
    }
}
