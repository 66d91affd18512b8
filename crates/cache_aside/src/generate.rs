// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Producers of values for missing entries.

use std::fmt::{self, Debug};

use crate::BoxError;

/// Produces the value to cache when a lookup misses.
///
/// This is implemented for every `Fn() -> impl Future<Output = Result<String, E>>`,
/// so async closures work directly. Use [`from_fn`] to wrap a synchronous function.
///
/// Generators may run more than once for the same key: two callers that miss at the
/// same time both generate and both write. Generators should therefore be idempotent.
pub trait Generate: Send + Sync {
    /// Produces a fresh value.
    fn generate(&self) -> impl Future<Output = Result<String, BoxError>> + Send;
}

impl<F, Fut, E> Generate for F
where
    F: Fn() -> Fut + Send + Sync,
    Fut: Future<Output = Result<String, E>> + Send,
    E: Into<BoxError>,
{
    fn generate(&self) -> impl Future<Output = Result<String, BoxError>> + Send {
        let pending = self();
        async move { pending.await.map_err(Into::into) }
    }
}

/// A [`Generate`] implementation over a synchronous function.
///
/// Created by [`from_fn`].
#[derive(Clone)]
pub struct FnGenerator<F>(F);

/// Wraps a synchronous function as a [`Generate`] implementation.
///
/// ```
/// use cache_aside::{Generate, generate};
///
/// let generator = generate::from_fn(|| Ok::<_, std::fmt::Error>("hello world".to_string()));
/// # futures::executor::block_on(async {
/// assert_eq!(generator.generate().await.unwrap(), "hello world");
/// # });
/// ```
pub fn from_fn<F, E>(f: F) -> FnGenerator<F>
where
    F: Fn() -> Result<String, E> + Send + Sync,
    E: Into<BoxError>,
{
    FnGenerator(f)
}

impl<F, E> Generate for FnGenerator<F>
where
    F: Fn() -> Result<String, E> + Send + Sync,
    E: Into<BoxError>,
{
    fn generate(&self) -> impl Future<Output = Result<String, BoxError>> + Send {
        std::future::ready((self.0)().map_err(Into::into))
    }
}

impl<F> Debug for FnGenerator<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnGenerator").finish_non_exhaustive()
    }
}
