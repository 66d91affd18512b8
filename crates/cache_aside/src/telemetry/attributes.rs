// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

// Field names must match the `tracing::debug!` call in `mod.rs`.
pub(crate) const CACHE_SHAPE_NAME: &str = "cache.shape";
pub(crate) const CACHE_KEY_NAME: &str = "cache.key";
pub(crate) const CACHE_FIELD_NAME: &str = "cache.field";
pub(crate) const CACHE_ACTIVITY_NAME: &str = "cache.activity";
pub(crate) const CACHE_EVENT_NAME: &str = "cache_aside.event";
