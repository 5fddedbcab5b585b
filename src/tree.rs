//! Tree-serializable values and the encoder that walks them.
//!
//! There is no runtime reflection to lean on, so values describe their own JSON shape
//! through [`TreeSerializable`]. The encoder owns the traversal: it consults the
//! configured exclusion strategies once per candidate type and once per candidate
//! field, routes values with a registered adapter through that adapter, and otherwise
//! recurses into the value's default encoding. Leaves delegate to serde.

use std::any::Any;
use std::collections::{BTreeMap, HashMap};

use serde_json::{Map, Value};

use crate::error::SerializationError;
use crate::exclusion::FieldAttributes;
use crate::serializer::JsonSerializer;
use crate::tag::TypeTag;

/// A value that can present itself to the tree encoder.
pub trait TreeSerializable: Any {
  /// The runtime type of this value.
  fn type_tag(&self) -> TypeTag;

  /// Upcast used by adapters to downcast to the concrete type.
  fn as_any(&self) -> &dyn Any;

  /// Encodes the value's default JSON shape.
  ///
  /// Implementations describe fields, elements and entries through the encoder and
  /// must not apply exclusion themselves; the encoder does.
  fn encode(&self, encoder: &TreeEncoder<'_>) -> Result<Value, SerializationError>;
}

/// Walks object graphs, applying exclusion strategies and registered adapters.
pub struct TreeEncoder<'a> {
  serializer: &'a JsonSerializer,
}

impl<'a> TreeEncoder<'a> {
  pub(crate) fn new(serializer: &'a JsonSerializer) -> Self {
    Self { serializer }
  }

  /// Encodes one value.
  ///
  /// Returns `Ok(None)` when the value's type is excluded; callers omit the value
  /// from their output in that case.
  pub fn encode(&self, value: &dyn TreeSerializable) -> Result<Option<Value>, SerializationError> {
    let tag = value.type_tag();
    if self.serializer.is_ignored(&tag) {
      return Ok(None);
    }
    if let Some(adapter) = self.serializer.adapter_for(&tag) {
      return adapter.encode(value.as_any()).map(Some);
    }
    value.encode(self).map(Some)
  }

  /// Starts an object encoding owned by `declaring_type`.
  #[must_use]
  pub fn object(&self, declaring_type: TypeTag) -> ObjectEncoder<'_, 'a> {
    ObjectEncoder {
      encoder: self,
      declaring_type,
      fields: Map::new(),
    }
  }

  /// Starts a map encoding.
  #[must_use]
  pub fn map(&self) -> MapEncoder<'_, 'a> {
    MapEncoder {
      encoder: self,
      entries: Vec::new(),
    }
  }
}

/// Collects the named fields of one object.
pub struct ObjectEncoder<'e, 'a> {
  encoder: &'e TreeEncoder<'a>,
  declaring_type: TypeTag,
  fields: Map<String, Value>,
}

impl ObjectEncoder<'_, '_> {
  /// Encodes one field, honoring field-level and type-level exclusion.
  ///
  /// Fields whose value type is excluded are omitted from the object entirely.
  pub fn field(&mut self, name: &str, value: &dyn TreeSerializable) -> Result<&mut Self, SerializationError> {
    let attributes = FieldAttributes::new(self.declaring_type, name);
    if self.encoder.serializer.skips_field(&attributes) {
      return Ok(self);
    }
    if let Some(encoded) = self.encoder.encode(value)? {
      self.fields.insert(name.to_string(), encoded);
    }
    Ok(self)
  }

  /// Finishes the object.
  #[must_use]
  pub fn finish(self) -> Value {
    Value::Object(self.fields)
  }
}

/// Collects the entries of one map, deferring the key representation.
pub struct MapEncoder<'e, 'a> {
  encoder: &'e TreeEncoder<'a>,
  entries: Vec<(Value, Value)>,
}

impl MapEncoder<'_, '_> {
  /// Encodes one entry. Entries whose key or value type is excluded are dropped.
  pub fn entry(
    &mut self,
    key: &dyn TreeSerializable,
    value: &dyn TreeSerializable,
  ) -> Result<&mut Self, SerializationError> {
    let (Some(key), Some(value)) = (self.encoder.encode(key)?, self.encoder.encode(value)?) else {
      return Ok(self);
    };
    self.entries.push((key, value));
    Ok(self)
  }

  /// Finishes the map.
  ///
  /// All-string keys produce a JSON object. Other keys produce an array of
  /// `[key, value]` pairs when structured map keys are enabled, and stringified keys
  /// otherwise.
  #[must_use]
  pub fn finish(self) -> Value {
    if self.entries.iter().all(|(key, _)| key.is_string()) {
      let fields = self
        .entries
        .into_iter()
        .map(|(key, value)| match key {
          Value::String(key) => (key, value),
          _ => unreachable!(),
        })
        .collect::<Map<_, _>>();
      return Value::Object(fields);
    }
    if self.encoder.serializer.structured_map_keys() {
      let pairs = self
        .entries
        .into_iter()
        .map(|(key, value)| Value::Array(vec![key, value]))
        .collect();
      return Value::Array(pairs);
    }
    let fields = self
      .entries
      .into_iter()
      .map(|(key, value)| (stringify_key(&key), value))
      .collect::<Map<_, _>>();
    Value::Object(fields)
  }
}

fn stringify_key(key: &Value) -> String {
  match key {
    Value::String(text) => text.clone(),
    other => other.to_string(),
  }
}

macro_rules! leaf_tree_serializable {
  ($($ty:ty),* $(,)?) => {
    $(
      impl TreeSerializable for $ty {
        fn type_tag(&self) -> TypeTag {
          TypeTag::of::<$ty>()
        }

        fn as_any(&self) -> &dyn Any {
          self
        }

        fn encode(&self, _encoder: &TreeEncoder<'_>) -> Result<Value, SerializationError> {
          Ok(serde_json::to_value(self)?)
        }
      }
    )*
  };
}

leaf_tree_serializable!(bool, char, i8, i16, i32, i64, u8, u16, u32, u64, f32, f64, String);

impl<T: TreeSerializable> TreeSerializable for Option<T> {
  fn type_tag(&self) -> TypeTag {
    TypeTag::of::<Option<T>>()
  }

  fn as_any(&self) -> &dyn Any {
    self
  }

  fn encode(&self, encoder: &TreeEncoder<'_>) -> Result<Value, SerializationError> {
    match self {
      Some(value) => Ok(encoder.encode(value)?.unwrap_or(Value::Null)),
      None => Ok(Value::Null),
    }
  }
}

impl<T: TreeSerializable> TreeSerializable for Vec<T> {
  fn type_tag(&self) -> TypeTag {
    TypeTag::of::<Vec<T>>()
  }

  fn as_any(&self) -> &dyn Any {
    self
  }

  fn encode(&self, encoder: &TreeEncoder<'_>) -> Result<Value, SerializationError> {
    let mut elements = Vec::with_capacity(self.len());
    for element in self {
      if let Some(encoded) = encoder.encode(element)? {
        elements.push(encoded);
      }
    }
    Ok(Value::Array(elements))
  }
}

impl<K: TreeSerializable, V: TreeSerializable> TreeSerializable for BTreeMap<K, V> {
  fn type_tag(&self) -> TypeTag {
    TypeTag::of::<BTreeMap<K, V>>()
  }

  fn as_any(&self) -> &dyn Any {
    self
  }

  fn encode(&self, encoder: &TreeEncoder<'_>) -> Result<Value, SerializationError> {
    let mut map = encoder.map();
    for (key, value) in self {
      map.entry(key, value)?;
    }
    Ok(map.finish())
  }
}

impl<K: TreeSerializable, V: TreeSerializable> TreeSerializable for HashMap<K, V> {
  fn type_tag(&self) -> TypeTag {
    TypeTag::of::<HashMap<K, V>>()
  }

  fn as_any(&self) -> &dyn Any {
    self
  }

  fn encode(&self, encoder: &TreeEncoder<'_>) -> Result<Value, SerializationError> {
    let mut map = encoder.map();
    for (key, value) in self {
      map.entry(key, value)?;
    }
    Ok(map.finish())
  }
}
