// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Error type for store operations.

/// Boxed error cause carried by [`Error`].
type Cause = Box<dyn std::error::Error + Send + Sync + 'static>;

/// An error from a store operation.
///
/// This is an opaque error that wraps whatever the store implementation failed with,
/// such as a dropped connection or a rejected command. Use
/// [`std::error::Error::source()`] to reach the underlying cause.
///
/// # Examples
///
/// ```
/// use cache_aside_store::Error;
///
/// let error = Error::caused_by("connection reset");
/// assert_eq!(error.to_string(), "store operation failed: connection reset");
/// ```
#[derive(Debug, thiserror::Error)]
#[error("store operation failed: {cause}")]
pub struct Error {
    #[source]
    cause: Cause,
}

impl Error {
    /// Creates a new error from anything that converts into a boxed error.
    pub fn caused_by(cause: impl Into<Cause>) -> Self {
        Self { cause: cause.into() }
    }

    /// Returns the underlying cause if it is of type `E`.
    #[must_use]
    pub fn cause_as<E>(&self) -> Option<&E>
    where
        E: std::error::Error + 'static,
    {
        self.cause.downcast_ref::<E>()
    }
}

/// A specialized [`Result`] type for store operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use std::error::Error as _;

    use super::*;

    #[test]
    fn assert_types() {
        static_assertions::assert_impl_all!(Error: Send, Sync);
    }

    #[test]
    fn display_contains_cause_message() {
        let error = Error::caused_by("connection refused");
        assert_eq!(error.to_string(), "store operation failed: connection refused");
    }

    #[test]
    fn source_exposes_cause() {
        let error = Error::caused_by(std::io::Error::new(std::io::ErrorKind::TimedOut, "timed out"));

        let source = error.source().expect("error should have a source");
        assert_eq!(source.to_string(), "timed out");

        let io = error.cause_as::<std::io::Error>().expect("cause should be an io error");
        assert_eq!(io.kind(), std::io::ErrorKind::TimedOut);
    }

    #[test]
    fn cause_as_wrong_type_is_none() {
        let error = Error::caused_by(std::fmt::Error);
        assert!(error.cause_as::<std::io::Error>().is_none());
    }
}
