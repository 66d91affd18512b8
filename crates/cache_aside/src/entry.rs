// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Cache entries: a key bound to a store and a generator.

use std::{
    fmt::{self, Debug},
    time::Duration,
};

use cache_aside_store::Store;

use crate::{
    Destination, Error, Generate, Key,
    telemetry::{self, Activity, Shape},
};

/// A value stored under a single key, optionally with an expiration.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
///
/// use cache_aside::PlainEntry;
/// use cache_aside_store::testing::MockStore;
///
/// # futures::executor::block_on(async {
/// let store = MockStore::new();
/// let entry = PlainEntry::new(&store, "greeting", || async {
///     Ok::<_, std::convert::Infallible>("hello world".to_string())
/// })
/// .with_ttl(Duration::from_secs(60));
///
/// let mut greeting = String::new();
/// entry.fetch(&mut greeting).await?;
/// assert_eq!(greeting, "hello world");
/// # Ok::<(), cache_aside::Error>(())
/// # });
/// ```
pub struct PlainEntry<S, G> {
    store: S,
    key: Key,
    generator: G,
    ttl: Option<Duration>,
}

impl<S, G> PlainEntry<S, G> {
    /// Creates an entry that never expires.
    pub fn new(store: S, key: impl Into<Key>, generator: G) -> Self {
        Self {
            store,
            key: key.into(),
            generator,
            ttl: None,
        }
    }

    /// Sets the expiration applied when the entry is populated.
    ///
    /// A zero duration means no expiration.
    #[must_use]
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = (!ttl.is_zero()).then_some(ttl);
        self
    }

    /// Returns the key descriptor.
    #[must_use]
    pub fn key(&self) -> &Key {
        &self.key
    }

    /// Returns the expiration applied when the entry is populated.
    #[must_use]
    pub fn ttl(&self) -> Option<Duration> {
        self.ttl
    }

    /// Returns the store the entry reads from and writes to.
    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }
}

impl<S, G> PlainEntry<S, G>
where
    S: Store,
    G: Generate,
{
    /// Decodes the cached value into `destination`, generating and storing it first
    /// if the key is absent.
    ///
    /// The destination is written only after everything else succeeded.
    ///
    /// # Errors
    ///
    /// Returns an error if the key cannot be resolved, the store fails, the generator
    /// fails, or the value does not decode into `destination`. A generator failure
    /// writes nothing to the store.
    pub async fn fetch<'d>(&self, destination: impl Into<Destination<'d>>) -> Result<(), Error> {
        let destination = destination.into();
        let key = self.key.resolve()?;

        if let Some(value) = self.store.get(&key).await? {
            telemetry::emit(Shape::Plain, Activity::Hit, &key, None);
            return destination.decode(&value);
        }
        telemetry::emit(Shape::Plain, Activity::Miss, &key, None);

        let value = self.generator.generate().await.map_err(Error::Generator)?;
        match self.ttl {
            Some(ttl) => self.store.set_with_expiration(&key, &value, ttl).await?,
            None => self.store.set(&key, &value).await?,
        }
        telemetry::emit(Shape::Plain, Activity::Populated, &key, None);

        destination.decode(&value)
    }
}

impl<S, G> Debug for PlainEntry<S, G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlainEntry")
            .field("key", &self.key)
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

/// A value stored as one field of a keyed hash.
///
/// Hash fields have no expiration, so this entry type does not accept a TTL.
///
/// # Examples
///
/// ```
/// use cache_aside::HashFieldEntry;
/// use cache_aside_store::testing::MockStore;
///
/// # futures::executor::block_on(async {
/// let store = MockStore::new();
/// let entry = HashFieldEntry::new(&store, "users", 42_i64, || async {
///     Ok::<_, std::convert::Infallible>("12345".to_string())
/// });
///
/// let mut visits = 0_i64;
/// entry.fetch(&mut visits).await?;
/// assert_eq!(visits, 12345);
/// assert_eq!(store.peek_field("users", "42").as_deref(), Some("12345"));
/// # Ok::<(), cache_aside::Error>(())
/// # });
/// ```
pub struct HashFieldEntry<S, G> {
    store: S,
    key: Key,
    field: Key,
    generator: G,
}

impl<S, G> HashFieldEntry<S, G> {
    /// Creates an entry for `field` within the hash stored under `key`.
    pub fn new(store: S, key: impl Into<Key>, field: impl Into<Key>, generator: G) -> Self {
        Self {
            store,
            key: key.into(),
            field: field.into(),
            generator,
        }
    }

    /// Returns the key descriptor of the hash.
    #[must_use]
    pub fn key(&self) -> &Key {
        &self.key
    }

    /// Returns the field descriptor.
    #[must_use]
    pub fn field(&self) -> &Key {
        &self.field
    }

    /// Returns the store the entry reads from and writes to.
    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }
}

impl<S, G> HashFieldEntry<S, G>
where
    S: Store,
    G: Generate,
{
    /// Decodes the cached field into `destination`, generating and storing it first
    /// if the field is absent.
    ///
    /// # Errors
    ///
    /// Same as [`PlainEntry::fetch`].
    pub async fn fetch<'d>(&self, destination: impl Into<Destination<'d>>) -> Result<(), Error> {
        let destination = destination.into();
        let key = self.key.resolve()?;
        let field = self.field.resolve()?;

        if let Some(value) = self.store.get_field(&key, &field).await? {
            telemetry::emit(Shape::HashField, Activity::Hit, &key, Some(&field));
            return destination.decode(&value);
        }
        telemetry::emit(Shape::HashField, Activity::Miss, &key, Some(&field));

        let value = self.generator.generate().await.map_err(Error::Generator)?;
        self.store.set_field(&key, &field, &value).await?;
        telemetry::emit(Shape::HashField, Activity::Populated, &key, Some(&field));

        destination.decode(&value)
    }
}

impl<S, G> Debug for HashFieldEntry<S, G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HashFieldEntry")
            .field("key", &self.key)
            .field("field", &self.field)
            .finish_non_exhaustive()
    }
}

/// A cache entry of either storage shape.
///
/// The shape is fixed at construction: [`CacheEntry::new`] and
/// [`CacheEntry::with_ttl`] build plain entries, [`CacheEntry::hash_field`] builds a
/// hash-field entry.
///
/// An entry holds no mutable state. All state lives in the store, so entries can be
/// built right before use and dropped afterwards, or kept and fetched repeatedly.
pub enum CacheEntry<S, G> {
    /// Stored under a single key.
    Plain(PlainEntry<S, G>),
    /// Stored as a field of a keyed hash.
    HashField(HashFieldEntry<S, G>),
}

impl<S, G> CacheEntry<S, G> {
    /// Creates a plain entry that never expires.
    pub fn new(store: S, key: impl Into<Key>, generator: G) -> Self {
        Self::Plain(PlainEntry::new(store, key, generator))
    }

    /// Creates a plain entry that expires `ttl` after being populated.
    ///
    /// A zero `ttl` means no expiration.
    pub fn with_ttl(store: S, key: impl Into<Key>, generator: G, ttl: Duration) -> Self {
        Self::Plain(PlainEntry::new(store, key, generator).with_ttl(ttl))
    }

    /// Creates an entry for `field` within the hash stored under `key`.
    pub fn hash_field(store: S, key: impl Into<Key>, field: impl Into<Key>, generator: G) -> Self {
        Self::HashField(HashFieldEntry::new(store, key, field, generator))
    }

    /// Returns the key descriptor.
    #[must_use]
    pub fn key(&self) -> &Key {
        match self {
            Self::Plain(entry) => entry.key(),
            Self::HashField(entry) => entry.key(),
        }
    }
}

impl<S, G> CacheEntry<S, G>
where
    S: Store,
    G: Generate,
{
    /// Decodes the cached value into `destination`, generating and storing it first
    /// if absent.
    ///
    /// # Errors
    ///
    /// Same as [`PlainEntry::fetch`].
    pub async fn fetch<'d>(&self, destination: impl Into<Destination<'d>>) -> Result<(), Error> {
        match self {
            Self::Plain(entry) => entry.fetch(destination).await,
            Self::HashField(entry) => entry.fetch(destination).await,
        }
    }
}

impl<S, G> Debug for CacheEntry<S, G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Plain(entry) => entry.fmt(f),
            Self::HashField(entry) => entry.fmt(f),
        }
    }
}

impl<S, G> From<PlainEntry<S, G>> for CacheEntry<S, G> {
    fn from(entry: PlainEntry<S, G>) -> Self {
        Self::Plain(entry)
    }
}

impl<S, G> From<HashFieldEntry<S, G>> for CacheEntry<S, G> {
    fn from(entry: HashFieldEntry<S, G>) -> Self {
        Self::HashField(entry)
    }
}
