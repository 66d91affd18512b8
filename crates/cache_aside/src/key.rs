// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Key descriptors and their conversion into store keys.

use std::{
    any::{Any, type_name},
    fmt::{self, Debug, Display},
    sync::Arc,
};

use crate::{BoxError, Error};

/// A value that can render itself as key text.
///
/// Implement this for domain types that already have a canonical textual form,
/// such as identifiers that serialize to a fixed format.
pub trait EncodeText: Send + Sync {
    /// Renders the value as text.
    ///
    /// # Errors
    ///
    /// Returns an error when the value has no valid textual form.
    fn encode_text(&self) -> Result<String, BoxError>;
}

/// Describes how the store key (or hash field) of an entry is produced.
///
/// Keys are resolved lazily, on every fetch, so a [`Key::Func`] can yield a different
/// key each time it is asked. Most callers build keys through the `From` conversions:
///
/// ```
/// use cache_aside::Key;
///
/// let literal = Key::from("user:42");
/// let bytes = Key::from(b"user:42".as_slice());
/// let number = Key::from(42_i64);
/// let computed = Key::func(|| format!("user:{}", 40 + 2));
///
/// for key in [literal, bytes, number, computed] {
///     assert!(key.resolve().unwrap().ends_with("42"));
/// }
/// ```
#[derive(Clone)]
#[non_exhaustive]
pub enum Key {
    /// Used as-is.
    Literal(String),
    /// Interpreted as UTF-8 text. Resolving fails if the bytes are not valid UTF-8.
    Bytes(Vec<u8>),
    /// Rendered through [`Display`].
    Display(Arc<dyn Display + Send + Sync>),
    /// Called with no arguments on every resolution.
    Func(Arc<dyn Fn() -> String + Send + Sync>),
    /// Formatted in base 10.
    Signed(i64),
    /// Formatted in base 10.
    Unsigned(u64),
    /// Rendered through [`EncodeText`].
    Text(Arc<dyn EncodeText>),
    /// A value of a shape no other variant accepts. Resolving it fails.
    Unsupported {
        /// Name of the unrecognized type.
        type_name: &'static str,
        /// Debug rendering of the unrecognized value.
        debug: String,
    },
}

impl Key {
    /// Creates a key rendered through the value's [`Display`] implementation.
    pub fn display(value: impl Display + Send + Sync + 'static) -> Self {
        Self::Display(Arc::new(value))
    }

    /// Creates a key produced by calling `f` at fetch time.
    pub fn func(f: impl Fn() -> String + Send + Sync + 'static) -> Self {
        Self::Func(Arc::new(f))
    }

    /// Creates a key rendered through the value's [`EncodeText`] implementation.
    pub fn text(value: impl EncodeText + 'static) -> Self {
        Self::Text(Arc::new(value))
    }

    /// Creates a key from a value whose type is only known at runtime.
    ///
    /// Strings, byte vectors and the primitive integer types map onto their matching
    /// variants. Anything else becomes [`Key::Unsupported`] and fails on resolution.
    ///
    /// ```
    /// use cache_aside::Key;
    ///
    /// assert_eq!(Key::from_any(7_u32).resolve().unwrap(), "7");
    /// assert!(Key::from_any(1.5_f64).resolve().is_err());
    /// ```
    pub fn from_any<T>(value: T) -> Self
    where
        T: Any + Debug,
    {
        let any: &dyn Any = &value;

        if let Some(s) = any.downcast_ref::<String>() {
            return Self::Literal(s.clone());
        }
        if let Some(s) = any.downcast_ref::<&'static str>() {
            return Self::Literal((*s).to_owned());
        }
        if let Some(b) = any.downcast_ref::<Vec<u8>>() {
            return Self::Bytes(b.clone());
        }
        if let Some(b) = any.downcast_ref::<&'static [u8]>() {
            return Self::Bytes(b.to_vec());
        }
        if let Some(n) = any.downcast_ref::<i64>() {
            return Self::Signed(*n);
        }
        if let Some(n) = any.downcast_ref::<i32>() {
            return Self::Signed(i64::from(*n));
        }
        if let Some(n) = any.downcast_ref::<isize>() {
            return i64::try_from(*n).map_or_else(|_| Self::Literal(n.to_string()), Self::Signed);
        }
        if let Some(n) = any.downcast_ref::<u64>() {
            return Self::Unsigned(*n);
        }
        if let Some(n) = any.downcast_ref::<u32>() {
            return Self::Unsigned(u64::from(*n));
        }
        if let Some(n) = any.downcast_ref::<usize>() {
            return u64::try_from(*n).map_or_else(|_| Self::Literal(n.to_string()), Self::Unsigned);
        }

        Self::Unsupported {
            type_name: type_name::<T>(),
            debug: format!("{value:?}"),
        }
    }

    /// Produces the store key string.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedKey`] for [`Key::Unsupported`], and
    /// [`Error::InvalidKey`] for bytes that are not valid UTF-8 or when an
    /// [`EncodeText`] value fails to encode.
    pub fn resolve(&self) -> Result<String, Error> {
        match self {
            Self::Literal(s) => Ok(s.clone()),
            Self::Bytes(b) => String::from_utf8(b.clone()).map_err(|e| Error::InvalidKey(Box::new(e))),
            Self::Display(d) => Ok(d.to_string()),
            Self::Func(f) => Ok(f()),
            Self::Signed(n) => Ok(n.to_string()),
            Self::Unsigned(n) => Ok(n.to_string()),
            Self::Text(t) => t.encode_text().map_err(Error::InvalidKey),
            Self::Unsupported { type_name, debug } => Err(Error::UnsupportedKey {
                type_name: *type_name,
                debug: debug.clone(),
            }),
        }
    }
}

impl Debug for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(s) => f.debug_tuple("Literal").field(s).finish(),
            Self::Bytes(b) => f.debug_tuple("Bytes").field(&String::from_utf8_lossy(b)).finish(),
            Self::Display(d) => f.debug_tuple("Display").field(&d.to_string()).finish(),
            Self::Func(_) => f.debug_tuple("Func").finish_non_exhaustive(),
            Self::Signed(n) => f.debug_tuple("Signed").field(n).finish(),
            Self::Unsigned(n) => f.debug_tuple("Unsigned").field(n).finish(),
            Self::Text(_) => f.debug_tuple("Text").finish_non_exhaustive(),
            Self::Unsupported { type_name, debug } => f
                .debug_struct("Unsupported")
                .field("type_name", type_name)
                .field("debug", debug)
                .finish(),
        }
    }
}

impl From<&str> for Key {
    fn from(value: &str) -> Self {
        Self::Literal(value.to_owned())
    }
}

impl From<String> for Key {
    fn from(value: String) -> Self {
        Self::Literal(value)
    }
}

impl From<&String> for Key {
    fn from(value: &String) -> Self {
        Self::Literal(value.clone())
    }
}

impl From<Vec<u8>> for Key {
    fn from(value: Vec<u8>) -> Self {
        Self::Bytes(value)
    }
}

impl From<&[u8]> for Key {
    fn from(value: &[u8]) -> Self {
        Self::Bytes(value.to_vec())
    }
}

impl From<i64> for Key {
    fn from(value: i64) -> Self {
        Self::Signed(value)
    }
}

impl From<i32> for Key {
    fn from(value: i32) -> Self {
        Self::Signed(i64::from(value))
    }
}

impl From<u64> for Key {
    fn from(value: u64) -> Self {
        Self::Unsigned(value)
    }
}

impl From<u32> for Key {
    fn from(value: u32) -> Self {
        Self::Unsigned(u64::from(value))
    }
}
