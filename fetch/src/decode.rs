//! Payload boundary: raw body bytes to a structured document.

use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid payload: {0}")]
pub struct DecodeError(String);

impl DecodeError {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

impl From<serde_json::Error> for DecodeError {
    fn from(err: serde_json::Error) -> Self {
        Self(err.to_string())
    }
}

pub trait Decode: Send + Sync {
    fn decode(&self, body: &[u8]) -> Result<Value, DecodeError>;
}

/// Structured-text decoding with serde_json.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonDecoder;

impl Decode for JsonDecoder {
    fn decode(&self, body: &[u8]) -> Result<Value, DecodeError> {
        Ok(serde_json::from_slice(body)?)
    }
}
