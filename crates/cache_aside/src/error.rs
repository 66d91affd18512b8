// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Error types for cache-aside lookups.

/// Boxed error produced by generators and custom decoders.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// An error that aborts a [`fetch`](crate::CacheEntry::fetch).
///
/// Every failure is returned to the caller as soon as it happens. Nothing is retried
/// and nothing is logged.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// The key or field descriptor has a shape that cannot be turned into a store key.
    #[error("unsupported key type {type_name} ({debug})")]
    UnsupportedKey {
        /// Name of the unrecognized type.
        type_name: &'static str,
        /// Debug rendering of the unrecognized value.
        debug: String,
    },

    /// A byte key is not valid UTF-8, or a text-encodable key failed to encode itself.
    #[error("key could not be encoded as text")]
    InvalidKey(#[source] BoxError),

    /// The stored or generated value does not parse into the destination.
    #[error("cannot decode {value:?} into {target}")]
    Decode {
        /// Name of the destination shape.
        target: &'static str,
        /// The raw value that failed to decode.
        value: String,
        /// The parser's error.
        #[source]
        source: BoxError,
    },

    /// The destination has a shape that no decoding rule accepts.
    #[error("unsupported type {type_name} ({debug}) from {value}")]
    UnsupportedDestination {
        /// Name of the destination type.
        type_name: &'static str,
        /// Debug rendering of the destination.
        debug: String,
        /// The raw value that was being decoded.
        value: String,
        /// The JSON error, when the generic JSON fallback was attempted.
        #[source]
        source: Option<serde_json::Error>,
    },

    /// The generator failed. Nothing was written to the store.
    #[error("value generation failed")]
    Generator(#[source] BoxError),

    /// The store failed to read or write.
    #[error(transparent)]
    Store(#[from] cache_aside_store::Error),
}

impl Error {
    /// Returns the generator's error if this is a [`Error::Generator`] wrapping an `E`.
    #[must_use]
    pub fn generator_error<E>(&self) -> Option<&E>
    where
        E: std::error::Error + 'static,
    {
        match self {
            Self::Generator(source) => source.downcast_ref::<E>(),
            _ => None,
        }
    }
}

/// A specialized [`Result`] type for cache-aside lookups.
pub type Result<T> = std::result::Result<T, Error>;
