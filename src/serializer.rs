//! JSON serializer facade over serde_json.
//!
//! The builder mirrors the configuration surface the matchers need (pretty printing,
//! structured map keys, adapters, exclusion strategies); the built instance is
//! immutable and shareable across test threads.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::Value;

use crate::adapter::TypeAdapter;
use crate::error::{DeserializationError, SerializationError};
use crate::exclusion::{ExclusionStrategy, FieldAttributes};
use crate::tag::TypeTag;
use crate::tree::{TreeEncoder, TreeSerializable};

/// Configures and produces [`JsonSerializer`] instances.
#[derive(Default)]
pub struct JsonSerializerBuilder {
  pretty: bool,
  structured_map_keys: bool,
  adapters: HashMap<TypeId, Arc<dyn TypeAdapter>>,
  exclusion_strategies: Vec<Arc<dyn ExclusionStrategy>>,
}

impl JsonSerializerBuilder {
  /// Creates a builder with every option disabled.
  #[must_use]
  pub fn new() -> Self {
    Self::default()
  }

  /// Enables human-readable, indented output.
  #[must_use]
  pub fn pretty_printing(mut self) -> Self {
    self.pretty = true;
    self
  }

  /// Encodes complex map keys as structured JSON instead of stringifying them.
  #[must_use]
  pub fn structured_map_keys(mut self) -> Self {
    self.structured_map_keys = true;
    self
  }

  /// Installs a type adapter; a later adapter for the same type replaces it.
  #[must_use]
  pub fn with_adapter(mut self, adapter: Arc<dyn TypeAdapter>) -> Self {
    self.adapters.insert(adapter.type_tag().id(), adapter);
    self
  }

  /// Attaches an exclusion strategy; a candidate is skipped when any attached
  /// strategy skips it.
  #[must_use]
  pub fn with_exclusion_strategy(mut self, strategy: Arc<dyn ExclusionStrategy>) -> Self {
    self.exclusion_strategies.push(strategy);
    self
  }

  /// Finalizes the configuration into an immutable serializer instance.
  #[must_use]
  pub fn build(self) -> JsonSerializer {
    tracing::debug!(
      "building serializer: adapters = {}, exclusion_strategies = {}, pretty = {}, structured_map_keys = {}",
      self.adapters.len(),
      self.exclusion_strategies.len(),
      self.pretty,
      self.structured_map_keys
    );
    JsonSerializer {
      pretty: self.pretty,
      structured_map_keys: self.structured_map_keys,
      adapters: self.adapters,
      exclusion_strategies: self.exclusion_strategies,
    }
  }
}

/// Immutable, fully-configured serializer instance.
///
/// Holds the adapters installed at build time plus the exclusion strategies attached
/// by the construction call. Registrations made after a build never affect an
/// already-built instance.
pub struct JsonSerializer {
  pretty: bool,
  structured_map_keys: bool,
  adapters: HashMap<TypeId, Arc<dyn TypeAdapter>>,
  exclusion_strategies: Vec<Arc<dyn ExclusionStrategy>>,
}

impl JsonSerializer {
  /// Encodes a value into a JSON tree.
  ///
  /// Returns `Ok(None)` when the value's type is excluded.
  pub fn to_value(&self, value: &dyn TreeSerializable) -> Result<Option<Value>, SerializationError> {
    TreeEncoder::new(self).encode(value)
  }

  /// Encodes a value into a JSON string.
  ///
  /// Output is indented with two spaces when pretty printing is enabled. Returns
  /// `Ok(None)` when the value's type is excluded.
  pub fn to_json(&self, value: &dyn TreeSerializable) -> Result<Option<String>, SerializationError> {
    let Some(tree) = self.to_value(value)? else {
      return Ok(None);
    };
    if !self.pretty {
      return Ok(Some(serde_json::to_string(&tree)?));
    }
    let mut buffer = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"  ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
    tree.serialize(&mut serializer)?;
    let text = String::from_utf8(buffer).map_err(|err| SerializationError::custom(err.to_string()))?;
    Ok(Some(text))
  }

  /// Decodes a JSON tree into `T`.
  ///
  /// Returns `Ok(None)` when `T` is excluded, the read-side counterpart of omitting
  /// the type on write. A registered adapter for `T` takes precedence over serde.
  pub fn from_value<T>(&self, value: &Value) -> Result<Option<T>, DeserializationError>
  where
    T: DeserializeOwned + Any, {
    let tag = TypeTag::of::<T>();
    if self.is_ignored(&tag) {
      return Ok(None);
    }
    if self.adapter_for(&tag).is_some() {
      return self.decode_value(value);
    }
    Ok(Some(serde_json::from_value(value.clone())?))
  }

  /// Decodes a JSON tree through the adapter registered for `T`.
  ///
  /// This is the read path for types without serde implementations. Returns
  /// `Ok(None)` when `T` is excluded and [`DeserializationError::UnknownType`] when no
  /// adapter for `T` was installed at build time.
  pub fn decode_value<T>(&self, value: &Value) -> Result<Option<T>, DeserializationError>
  where
    T: Any, {
    let tag = TypeTag::of::<T>();
    if self.is_ignored(&tag) {
      return Ok(None);
    }
    let adapter = self
      .adapter_for(&tag)
      .ok_or(DeserializationError::UnknownType { type_name: tag.name() })?;
    let decoded = adapter.decode(value)?;
    let typed = decoded
      .downcast::<T>()
      .map_err(|_| DeserializationError::InvalidType { expected: tag.name() })?;
    Ok(Some(*typed))
  }

  /// Decodes a JSON string into `T`.
  ///
  /// Same contract as [`JsonSerializer::from_value`].
  pub fn from_json<T>(&self, json: &str) -> Result<Option<T>, DeserializationError>
  where
    T: DeserializeOwned + Any, {
    let tag = TypeTag::of::<T>();
    if self.is_ignored(&tag) {
      return Ok(None);
    }
    if self.adapter_for(&tag).is_some() {
      let tree: Value = serde_json::from_str(json)?;
      return self.from_value(&tree);
    }
    Ok(Some(serde_json::from_str(json)?))
  }

  /// Returns `true` when the provided type is excluded by this instance.
  #[must_use]
  pub fn is_ignored(&self, tag: &TypeTag) -> bool {
    self.exclusion_strategies.iter().any(|strategy| strategy.should_skip_type(tag))
  }

  pub(crate) fn skips_field(&self, field: &FieldAttributes<'_>) -> bool {
    self.exclusion_strategies.iter().any(|strategy| strategy.should_skip_field(field))
  }

  pub(crate) fn adapter_for(&self, tag: &TypeTag) -> Option<Arc<dyn TypeAdapter>> {
    self.adapters.get(&tag.id()).cloned()
  }

  pub(crate) fn structured_map_keys(&self) -> bool {
    self.structured_map_keys
  }
}

static_assertions::assert_impl_all!(JsonSerializer: Send, Sync);

#[cfg(test)]
mod tests {
  use super::*;
  use crate::adapter::SerdeTypeAdapter;
  use crate::exclusion::IgnoredTypes;
  use serde::Deserialize;
  use serde_json::json;

  #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
  struct Point {
    x: i64,
    y: i64,
  }

  impl TreeSerializable for Point {
    fn type_tag(&self) -> TypeTag {
      TypeTag::of::<Point>()
    }

    fn as_any(&self) -> &dyn Any {
      self
    }

    fn encode(&self, encoder: &TreeEncoder<'_>) -> Result<Value, SerializationError> {
      let mut object = encoder.object(self.type_tag());
      object.field("x", &self.x)?.field("y", &self.y)?;
      Ok(object.finish())
    }
  }

  #[test]
  fn compact_output_by_default() {
    let serializer = JsonSerializerBuilder::new().build();
    let json = serializer.to_json(&7_i64).expect("encode").expect("present");
    assert_eq!(json, "7");
  }

  #[test]
  fn pretty_output_uses_two_space_indent() {
    let serializer = JsonSerializerBuilder::new().pretty_printing().build();

    let json = serializer
      .to_json(&Point { x: 1, y: 2 })
      .expect("encode")
      .expect("present");
    assert_eq!(json, "{\n  \"x\": 1,\n  \"y\": 2\n}");
  }

  struct OriginAdapter;

  impl TypeAdapter for OriginAdapter {
    fn type_tag(&self) -> TypeTag {
      TypeTag::of::<Point>()
    }

    fn encode(&self, _value: &dyn Any) -> Result<Value, SerializationError> {
      Ok(json!("origin"))
    }

    fn decode(&self, _value: &Value) -> Result<Box<dyn Any>, DeserializationError> {
      Ok(Box::new(Point { x: 0, y: 0 }))
    }
  }

  #[test]
  fn adapters_take_precedence_over_the_default_encoding() {
    let serializer = JsonSerializerBuilder::new().with_adapter(Arc::new(OriginAdapter)).build();

    let tree = serializer.to_value(&Point { x: 1, y: 2 }).expect("encode").expect("present");
    assert_eq!(tree, json!("origin"));
  }

  #[test]
  fn stock_serde_adapter_encodes_the_serde_shape() {
    let serializer = JsonSerializerBuilder::new()
      .with_adapter(Arc::new(SerdeTypeAdapter::<Point>::new()))
      .build();

    let tree = serializer.to_value(&Point { x: 1, y: 2 }).expect("encode").expect("present");
    assert_eq!(tree, json!({ "x": 1, "y": 2 }));
  }

  #[test]
  fn excluded_types_encode_to_none() {
    let serializer = JsonSerializerBuilder::new()
      .with_exclusion_strategy(Arc::new(IgnoredTypes::new(vec![TypeTag::of::<i64>()])))
      .build();

    assert!(serializer.is_ignored(&TypeTag::of::<i64>()));
    assert_eq!(serializer.to_json(&7_i64).expect("encode"), None);
  }

  #[test]
  fn excluded_types_decode_to_none() {
    let serializer = JsonSerializerBuilder::new()
      .with_exclusion_strategy(Arc::new(IgnoredTypes::new(vec![TypeTag::of::<Point>()])))
      .build();

    let decoded: Option<Point> = serializer.from_value(&json!({ "x": 1, "y": 2 })).expect("decode");
    assert_eq!(decoded, None);
  }

  #[test]
  fn adapters_take_precedence_over_serde_on_read() {
    let serializer = JsonSerializerBuilder::new().with_adapter(Arc::new(OriginAdapter)).build();

    let decoded: Point = serializer
      .from_json("{ \"x\": 9, \"y\": 9 }")
      .expect("decode")
      .expect("present");
    assert_eq!(decoded, Point { x: 0, y: 0 });
  }

  #[test]
  fn serde_decodes_types_without_adapters() {
    let serializer = JsonSerializerBuilder::new().build();
    let decoded: Point = serializer
      .from_json("{ \"x\": 3, \"y\": 4 }")
      .expect("decode")
      .expect("present");
    assert_eq!(decoded, Point { x: 3, y: 4 });
  }

  #[test]
  fn malformed_payloads_surface_backend_errors() {
    let serializer = JsonSerializerBuilder::new().build();
    let err = serializer.from_json::<Point>("{ \"x\": }").expect_err("malformed");
    assert!(matches!(err, DeserializationError::Malformed(_)));
  }
}
