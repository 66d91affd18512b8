// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Integration tests for the `Store` trait forwarding implementations.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use cache_aside_store::{Error, Store};

/// Minimal store that only tracks plain values and the last TTL it saw.
#[derive(Default)]
struct MinimalStore {
    values: Mutex<HashMap<String, String>>,
    last_ttl: Mutex<Option<Duration>>,
}

impl Store for MinimalStore {
    async fn get(&self, key: &str) -> Result<Option<String>, Error> {
        Ok(self.values.lock().expect("lock poisoned").get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), Error> {
        self.values.lock().expect("lock poisoned").insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    async fn set_with_expiration(&self, key: &str, value: &str, ttl: Duration) -> Result<(), Error> {
        *self.last_ttl.lock().expect("lock poisoned") = Some(ttl);
        self.set(key, value).await
    }

    async fn get_field(&self, _key: &str, _field: &str) -> Result<Option<String>, Error> {
        Err(Error::caused_by("hashes are not supported"))
    }

    async fn set_field(&self, _key: &str, _field: &str, _value: &str) -> Result<(), Error> {
        Err(Error::caused_by("hashes are not supported"))
    }
}

async fn roundtrip(store: impl Store) -> Option<String> {
    store.set("key", "value").await.expect("set failed");
    store.get("key").await.expect("get failed")
}

#[test]
fn reference_forwards_to_store() {
    futures::executor::block_on(async {
        let store = MinimalStore::default();
        assert_eq!(roundtrip(&store).await.as_deref(), Some("value"));
        assert_eq!(store.get("key").await.expect("get failed").as_deref(), Some("value"));
    });
}

#[test]
fn arc_forwards_to_store() {
    futures::executor::block_on(async {
        let store = Arc::new(MinimalStore::default());
        assert_eq!(roundtrip(Arc::clone(&store)).await.as_deref(), Some("value"));

        Arc::clone(&store)
            .set_with_expiration("other", "x", Duration::from_secs(5))
            .await
            .expect("set_with_expiration failed");
        assert_eq!(*store.last_ttl.lock().expect("lock poisoned"), Some(Duration::from_secs(5)));
    });
}

#[test]
fn forwarded_errors_are_preserved() {
    futures::executor::block_on(async {
        let store = Arc::new(MinimalStore::default());
        let error = store.get_field("key", "field").await.expect_err("get_field should fail");
        assert!(error.to_string().contains("hashes are not supported"));
    });
}
