// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Debug-level events for cache-aside lookups.
//!
//! With the `logs` feature enabled every fetch emits one event when it hits and two
//! when it misses (the miss, then the write that populated the store). Failures are
//! never logged here; they are returned to the caller.

#[cfg(test)]
pub(crate) mod attributes;
#[cfg(test)]
pub(crate) mod testing;

/// Storage shape of the entry being fetched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Shape {
    Plain,
    HashField,
}

impl Shape {
    #[cfg_attr(
        not(any(feature = "logs", test)),
        expect(dead_code, reason = "Only read when the logs feature is enabled")
    )]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Plain => "plain",
            Self::HashField => "hash_field",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Activity {
    Hit,
    Miss,
    Populated,
}

impl Activity {
    #[cfg_attr(
        not(any(feature = "logs", test)),
        expect(dead_code, reason = "Only read when the logs feature is enabled")
    )]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Hit => "cache_aside.hit",
            Self::Miss => "cache_aside.miss",
            Self::Populated => "cache_aside.populated",
        }
    }
}

#[cfg_attr(
    not(any(feature = "logs", test)),
    expect(unused_variables, reason = "No-op when the logs feature is disabled")
)]
pub(crate) fn emit(shape: Shape, activity: Activity, key: &str, field: Option<&str>) {
    #[cfg(any(feature = "logs", test))]
    tracing::debug!(
        cache.shape = shape.as_str(),
        cache.key = key,
        cache.field = field,
        cache.activity = activity.as_str(),
        "cache_aside.event"
    );
}
