//! JSON codec for request and response messages
//!
//! Decoding is lenient: response types flatten an
//! [`UnknownFields`](crate::message::UnknownFields) bag, so payloads carrying members the type
//! does not declare still decode. Only malformed JSON or a mismatch on a declared attribute
//! fails.

use crate::error::{Error, Result};
use serde::Serialize;
use serde::de::DeserializeOwned;

/// Serialize a message to JSON text
pub fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    serde_json::to_string(value).map_err(Error::Serialization)
}

/// Parse JSON bytes into a message
pub fn from_json<T: DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    serde_json::from_slice(bytes).map_err(Error::Deserialization)
}

/// Parse JSON text into a message
pub fn from_json_str<T: DeserializeOwned>(text: &str) -> Result<T> {
    from_json(text.as_bytes())
}
