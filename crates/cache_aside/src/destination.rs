// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Destinations that a fetched value is decoded into.

use std::{
    any::{Any, TypeId, type_name},
    fmt::{self, Debug},
    num::ParseIntError,
    str::FromStr,
};

use serde::de::DeserializeOwned;

use crate::{BoxError, Error};

/// A type that can parse itself from raw text.
pub trait DecodeText {
    /// Replaces `self` with the value parsed from `text`.
    ///
    /// # Errors
    ///
    /// Returns an error when `text` is not a valid representation.
    fn decode_text(&mut self, text: &[u8]) -> Result<(), BoxError>;
}

/// A type that can parse itself from a JSON document.
pub trait DecodeJson {
    /// Replaces `self` with the value parsed from `json`.
    ///
    /// # Errors
    ///
    /// Returns an error when `json` is not a valid representation.
    fn decode_json(&mut self, json: &[u8]) -> Result<(), BoxError>;
}

/// An opaque JSON payload, passed through without parsing.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct RawJson(Vec<u8>);

impl RawJson {
    /// Returns the payload bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Consumes the payload and returns its bytes.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }
}

impl From<&str> for RawJson {
    fn from(value: &str) -> Self {
        Self(value.as_bytes().to_vec())
    }
}

trait FillFromJson: Send {
    fn fill(&mut self, value: &str) -> Result<(), Error>;
}

struct TypedSlot<'a, T>(&'a mut T);

impl<T> FillFromJson for TypedSlot<'_, T>
where
    T: DeserializeOwned + Debug + Send,
{
    fn fill(&mut self, value: &str) -> Result<(), Error> {
        match serde_json::from_str::<T>(value) {
            Ok(parsed) => {
                *self.0 = parsed;
                Ok(())
            }
            Err(e) => Err(Error::UnsupportedDestination {
                type_name: type_name::<T>(),
                debug: format!("{:?}", self.0),
                value: value.to_owned(),
                source: Some(e),
            }),
        }
    }
}

/// A destination decoded through `serde_json`.
///
/// Created by [`Destination::json`].
pub struct JsonSlot<'a> {
    type_name: &'static str,
    inner: Box<dyn FillFromJson + 'a>,
}

/// A mutable output slot that a fetched value is decoded into.
///
/// Each variant is one destination shape. Decoding assigns to the slot only on
/// success, so a failed fetch leaves the caller's value untouched.
///
/// ```
/// use cache_aside::Destination;
///
/// let mut count = 0_i64;
/// Destination::from(&mut count).decode("12345").unwrap();
/// assert_eq!(count, 12345);
///
/// let mut count = 0_i32;
/// assert!(Destination::from(&mut count).decode("not a number").is_err());
/// assert_eq!(count, 0);
/// ```
#[non_exhaustive]
pub enum Destination<'a> {
    /// Receives the raw value.
    String(&'a mut String),
    /// Receives the raw bytes of the value.
    Bytes(&'a mut Vec<u8>),
    /// Receives the raw bytes of the value as an opaque JSON payload.
    RawJson(&'a mut RawJson),
    /// Parsed as a base-10 64-bit integer.
    I64(&'a mut i64),
    /// Parsed as a base-10 32-bit integer.
    I32(&'a mut i32),
    /// Parsed as a base-10 platform integer.
    Isize(&'a mut isize),
    /// Parsed by the slot's [`DecodeText`] implementation.
    Text(&'a mut (dyn DecodeText + Send)),
    /// Parsed by the slot's [`DecodeJson`] implementation.
    Json(&'a mut (dyn DecodeJson + Send)),
    /// Deserialized with `serde_json`.
    Serde(JsonSlot<'a>),
    /// A slot of a shape no other variant accepts. Decoding into it fails.
    Unsupported {
        /// Name of the unrecognized type.
        type_name: &'static str,
        /// Debug rendering of the slot.
        debug: String,
    },
}

impl<'a> Destination<'a> {
    /// Creates a destination parsed through [`DecodeText`].
    pub fn text(slot: &'a mut (impl DecodeText + Send)) -> Self {
        Self::Text(slot)
    }

    /// Creates a destination parsed through [`DecodeJson`].
    pub fn json_decoder(slot: &'a mut (impl DecodeJson + Send)) -> Self {
        Self::Json(slot)
    }

    /// Creates a destination deserialized with `serde_json`.
    ///
    /// If the value is not valid JSON for `T`, decoding fails with
    /// [`Error::UnsupportedDestination`].
    ///
    /// ```
    /// use cache_aside::Destination;
    /// use serde::Deserialize;
    ///
    /// #[derive(Debug, Default, Deserialize, PartialEq)]
    /// struct Pair {
    ///     a: i32,
    ///     b: String,
    /// }
    ///
    /// let mut pair = Pair::default();
    /// Destination::json(&mut pair).decode(r#"{"a": 1, "b": "qqq"}"#).unwrap();
    /// assert_eq!(pair, Pair { a: 1, b: "qqq".to_string() });
    /// ```
    pub fn json<T>(slot: &'a mut T) -> Self
    where
        T: DeserializeOwned + Debug + Send,
    {
        Self::Serde(JsonSlot {
            type_name: type_name::<T>(),
            inner: Box::new(TypedSlot(slot)),
        })
    }

    /// Creates a destination from a slot whose type is only known at runtime.
    ///
    /// `String`, `Vec<u8>`, [`RawJson`], `i64`, `i32` and `isize` map onto their
    /// matching variants. Anything else becomes [`Destination::Unsupported`].
    ///
    /// ```
    /// use cache_aside::Destination;
    ///
    /// let (mut tx, _rx) = std::sync::mpsc::channel::<i32>();
    /// assert!(Destination::from_any(&mut tx).is_unsupported());
    /// ```
    pub fn from_any<T>(slot: &'a mut T) -> Self
    where
        T: Any + Debug,
    {
        macro_rules! downcast_into {
            ($($ty:ty => $variant:ident),+ $(,)?) => {
                $(
                    if TypeId::of::<T>() == TypeId::of::<$ty>() {
                        let any: &mut dyn Any = slot;
                        return any
                            .downcast_mut::<$ty>()
                            .map_or_else(Self::unsupported_type::<T>, Self::$variant);
                    }
                )+
            };
        }

        downcast_into! {
            String => String,
            Vec<u8> => Bytes,
            RawJson => RawJson,
            i64 => I64,
            i32 => I32,
            isize => Isize,
        }

        Self::Unsupported {
            type_name: type_name::<T>(),
            debug: format!("{slot:?}"),
        }
    }

    fn unsupported_type<T>() -> Self {
        Self::Unsupported {
            type_name: type_name::<T>(),
            debug: String::new(),
        }
    }

    /// Returns `true` if no decoding rule accepts this destination.
    #[must_use]
    pub fn is_unsupported(&self) -> bool {
        matches!(self, Self::Unsupported { .. })
    }

    /// Returns a short name for the destination shape.
    #[must_use]
    pub fn shape(&self) -> &'static str {
        match self {
            Self::String(_) => "string",
            Self::Bytes(_) => "bytes",
            Self::RawJson(_) => "raw json",
            Self::I64(_) => "i64",
            Self::I32(_) => "i32",
            Self::Isize(_) => "isize",
            Self::Text(_) => "text",
            Self::Json(_) => "json",
            Self::Serde(slot) => slot.type_name,
            Self::Unsupported { type_name, .. } => type_name,
        }
    }

    /// Decodes `value` into the destination.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Decode`] when an integer, [`DecodeText`] or [`DecodeJson`]
    /// destination rejects the value, and [`Error::UnsupportedDestination`] for
    /// unsupported destinations and failed JSON deserialization.
    pub fn decode(self, value: &str) -> Result<(), Error> {
        match self {
            Self::String(out) => value.clone_into(out),
            Self::Bytes(out) => *out = value.as_bytes().to_vec(),
            Self::RawJson(out) => *out = RawJson::from(value),
            Self::I64(out) => *out = parse_int(value, "i64")?,
            Self::I32(out) => *out = parse_int(value, "i32")?,
            Self::Isize(out) => *out = parse_int(value, "isize")?,
            Self::Text(out) => out.decode_text(value.as_bytes()).map_err(|source| Error::Decode {
                target: "text",
                value: value.to_owned(),
                source,
            })?,
            Self::Json(out) => out.decode_json(value.as_bytes()).map_err(|source| Error::Decode {
                target: "json",
                value: value.to_owned(),
                source,
            })?,
            Self::Serde(mut slot) => slot.inner.fill(value)?,
            Self::Unsupported { type_name, debug } => {
                return Err(Error::UnsupportedDestination {
                    type_name,
                    debug,
                    value: value.to_owned(),
                    source: None,
                });
            }
        }
        Ok(())
    }
}

fn parse_int<N>(value: &str, target: &'static str) -> Result<N, Error>
where
    N: FromStr<Err = ParseIntError>,
{
    value.parse().map_err(|e| Error::Decode {
        target,
        value: value.to_owned(),
        source: Box::new(e),
    })
}

impl Debug for Destination<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Destination").field(&self.shape()).finish()
    }
}

impl Debug for JsonSlot<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("JsonSlot").field(&self.type_name).finish()
    }
}

impl<'a> From<&'a mut String> for Destination<'a> {
    fn from(slot: &'a mut String) -> Self {
        Self::String(slot)
    }
}

impl<'a> From<&'a mut Vec<u8>> for Destination<'a> {
    fn from(slot: &'a mut Vec<u8>) -> Self {
        Self::Bytes(slot)
    }
}

impl<'a> From<&'a mut RawJson> for Destination<'a> {
    fn from(slot: &'a mut RawJson) -> Self {
        Self::RawJson(slot)
    }
}

impl<'a> From<&'a mut i64> for Destination<'a> {
    fn from(slot: &'a mut i64) -> Self {
        Self::I64(slot)
    }
}

impl<'a> From<&'a mut i32> for Destination<'a> {
    fn from(slot: &'a mut i32) -> Self {
        Self::I32(slot)
    }
}

impl<'a> From<&'a mut isize> for Destination<'a> {
    fn from(slot: &'a mut isize) -> Self {
        Self::Isize(slot)
    }
}

#[cfg(test)]
mod tests {
    use std::error::Error as _;

    use serde::Deserialize;

    use super::*;

    #[derive(Debug, Default, PartialEq, Eq)]
    struct Upper(String);

    impl DecodeText for Upper {
        fn decode_text(&mut self, text: &[u8]) -> Result<(), BoxError> {
            let text = std::str::from_utf8(text)?;
            self.0 = text.to_uppercase();
            Ok(())
        }
    }

    #[derive(Debug, Default)]
    struct Strict(Option<u8>);

    impl DecodeJson for Strict {
        fn decode_json(&mut self, json: &[u8]) -> Result<(), BoxError> {
            self.0 = Some(serde_json::from_slice(json)?);
            Ok(())
        }
    }

    #[derive(Debug, Default, Deserialize, PartialEq, Eq)]
    struct Pair {
        a: i64,
        b: String,
    }

    #[test]
    fn string_receives_raw_value() {
        let mut out = String::from("old");
        Destination::from(&mut out).decode("hello world").expect("decode failed");
        assert_eq!(out, "hello world");
    }

    #[test]
    fn bytes_and_raw_json_receive_raw_bytes() {
        let mut bytes = Vec::<u8>::new();
        Destination::from(&mut bytes).decode("hello").expect("decode failed");
        assert_eq!(bytes, b"hello");

        let mut raw = RawJson::default();
        Destination::from(&mut raw).decode("{not json at all").expect("decode failed");
        assert_eq!(raw.as_bytes(), b"{not json at all");
    }

    #[test]
    fn integers_parse_base_ten() {
        let mut a = 0_i64;
        let mut b = 0_i32;
        let mut c = 0_isize;
        Destination::from(&mut a).decode("12345").expect("decode failed");
        Destination::from(&mut b).decode("12345").expect("decode failed");
        Destination::from(&mut c).decode("-12345").expect("decode failed");
        assert_eq!((a, b, c), (12345, 12345, -12345));
    }

    #[test]
    fn non_numeric_text_is_decode_error() {
        let mut out = 7_i64;
        let error = Destination::from(&mut out).decode("twelve").expect_err("decode should fail");

        assert!(matches!(error, Error::Decode { target: "i64", ref value, .. } if value == "twelve"));
        assert!(error.source().is_some());
        assert_eq!(out, 7);
    }

    #[test]
    fn i32_overflow_is_decode_error() {
        let mut out = 0_i32;
        let error = Destination::from(&mut out).decode("2147483648").expect_err("decode should fail");
        assert!(matches!(error, Error::Decode { target: "i32", .. }));
    }

    #[test]
    fn text_decoder_receives_raw_bytes() {
        let mut out = Upper::default();
        Destination::text(&mut out).decode("hello world").expect("decode failed");
        assert_eq!(out, Upper("HELLO WORLD".to_string()));
    }

    #[test]
    fn json_decoder_error_propagates() {
        let mut out = Strict::default();
        Destination::json_decoder(&mut out).decode("300").expect_err("300 does not fit a u8");
        assert_eq!(out.0, None);

        Destination::json_decoder(&mut out).decode("30").expect("decode failed");
        assert_eq!(out.0, Some(30));
    }

    #[test]
    fn serde_fallback_decodes_structs() {
        let mut out = Pair::default();
        Destination::json(&mut out).decode(r#"{"a":1,"b":"qqq"}"#).expect("decode failed");
        assert_eq!(
            out,
            Pair {
                a: 1,
                b: "qqq".to_string()
            }
        );
    }

    #[test]
    fn serde_fallback_failure_is_unsupported_destination() {
        let mut out = Pair::default();
        let error = Destination::json(&mut out).decode("plain text").expect_err("decode should fail");

        match error {
            Error::UnsupportedDestination {
                type_name, value, source, ..
            } => {
                assert!(type_name.ends_with("Pair"));
                assert_eq!(value, "plain text");
                assert!(source.is_some());
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn from_any_maps_known_slots() {
        let mut s = String::new();
        let mut v = Vec::<u8>::new();
        let mut n = 0_i64;
        assert_eq!(Destination::from_any(&mut s).shape(), "string");
        assert_eq!(Destination::from_any(&mut v).shape(), "bytes");
        assert_eq!(Destination::from_any(&mut n).shape(), "i64");

        Destination::from_any(&mut n).decode("42").expect("decode failed");
        assert_eq!(n, 42);
    }

    #[test]
    fn unsupported_slot_names_its_type() {
        let (mut tx, _rx) = std::sync::mpsc::channel::<i32>();
        let destination = Destination::from_any(&mut tx);
        assert!(destination.is_unsupported());

        let error = destination.decode("value").expect_err("decode should fail");
        let message = error.to_string();
        assert!(message.contains("Sender<i32>"), "got: {message}");
        assert!(message.contains("from value"), "got: {message}");
    }

    #[test]
    fn function_pointer_slot_is_unsupported() {
        let mut f: fn() -> i32 = || 1;
        assert!(Destination::from_any(&mut f).is_unsupported());
    }
}
