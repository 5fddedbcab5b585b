//! Error types shared by adapters and serializer instances.
//!
//! Registration and serializer construction accept all inputs unconditionally and
//! have no error paths; failures only surface from actual encode/decode work and
//! propagate unmodified to the caller.

use thiserror::Error;

/// Error returned when a value cannot be encoded.
#[derive(Error, Debug)]
pub enum SerializationError {
  /// An adapter received a value whose runtime type it does not handle.
  #[error("invalid type for adapter: expected {expected}")]
  InvalidType {
    /// Fully-qualified name of the expected type.
    expected: &'static str,
  },
  /// Failure reported by the JSON backend.
  #[error("serialization failed: {0}")]
  Backend(#[from] serde_json::Error),
  /// Additional error reported by an adapter implementation.
  #[error("serialization failed: {0}")]
  Custom(String),
}

impl SerializationError {
  /// Constructs a custom serialization error from the provided message.
  #[must_use]
  pub fn custom(message: impl Into<String>) -> Self {
    SerializationError::Custom(message.into())
  }
}

/// Error returned when a payload cannot be decoded.
#[derive(Error, Debug)]
pub enum DeserializationError {
  /// An adapter produced a value whose runtime type does not match the request.
  #[error("invalid type for adapter: expected {expected}")]
  InvalidType {
    /// Fully-qualified name of the expected type.
    expected: &'static str,
  },
  /// The payload is not valid JSON or does not match the target shape.
  #[error("malformed payload: {0}")]
  Malformed(#[from] serde_json::Error),
  /// No adapter is registered for the requested type.
  #[error("no adapter registered for {type_name}")]
  UnknownType {
    /// Fully-qualified name of the requested type.
    type_name: &'static str,
  },
  /// Additional error reported by an adapter implementation.
  #[error("deserialization failed: {0}")]
  Custom(String),
}

impl DeserializationError {
  /// Constructs a custom deserialization error from the provided message.
  #[must_use]
  pub fn custom(message: impl Into<String>) -> Self {
    DeserializationError::Custom(message.into())
  }
}
