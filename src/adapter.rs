//! Type adapters overriding the default encoding of a specific type.

use std::any::Any;
use std::marker::PhantomData;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::error::{DeserializationError, SerializationError};
use crate::tag::TypeTag;

/// Custom encoder/decoder pair for one concrete type.
///
/// Adapters are dispatched dynamically: the serializer hands them values as
/// `&dyn Any` and expects the implementation to downcast to the type reported by
/// [`TypeAdapter::type_tag`]. A value of any other runtime type is rejected with
/// [`SerializationError::InvalidType`].
pub trait TypeAdapter: Send + Sync {
  /// The type this adapter handles.
  fn type_tag(&self) -> TypeTag;

  /// Encodes the provided value into a JSON tree.
  fn encode(&self, value: &dyn Any) -> Result<Value, SerializationError>;

  /// Decodes a JSON tree back into a boxed value of the handled type.
  fn decode(&self, value: &Value) -> Result<Box<dyn Any>, DeserializationError>;
}

/// Stock adapter delegating both directions to serde.
#[derive(Debug)]
pub struct SerdeTypeAdapter<T> {
  _phantom: PhantomData<T>,
}

impl<T> Default for SerdeTypeAdapter<T> {
  fn default() -> Self {
    Self { _phantom: PhantomData }
  }
}

impl<T> SerdeTypeAdapter<T> {
  /// Creates a new serde-backed adapter for `T`.
  #[must_use]
  pub fn new() -> Self {
    Self::default()
  }
}

impl<T: Serialize + DeserializeOwned + Send + Sync + 'static> TypeAdapter for SerdeTypeAdapter<T> {
  fn type_tag(&self) -> TypeTag {
    TypeTag::of::<T>()
  }

  fn encode(&self, value: &dyn Any) -> Result<Value, SerializationError> {
    let typed = value.downcast_ref::<T>().ok_or(SerializationError::InvalidType {
      expected: std::any::type_name::<T>(),
    })?;
    Ok(serde_json::to_value(typed)?)
  }

  fn decode(&self, value: &Value) -> Result<Box<dyn Any>, DeserializationError> {
    let typed: T = serde_json::from_value(value.clone())?;
    Ok(Box::new(typed))
  }
}
