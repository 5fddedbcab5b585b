//! Shared registry of type adapters.

use std::any::TypeId;
use std::sync::Arc;

use dashmap::DashMap;

use crate::adapter::TypeAdapter;
use crate::tag::TypeTag;

/// Shared, mutable mapping from a type to its custom adapter.
///
/// Cloning the registry produces another handle to the same underlying map, so a
/// provider and the surrounding test harness observe the same registrations. Entries
/// are never removed; registering a second adapter for the same type replaces the
/// first. The map is internally synchronized, so concurrent registration and
/// serializer construction are safe.
#[derive(Clone)]
pub struct TypeAdapterRegistry {
  inner: Arc<DashMap<TypeId, Arc<dyn TypeAdapter>>>,
}

impl TypeAdapterRegistry {
  /// Creates a new, empty registry.
  #[must_use]
  pub fn new() -> Self {
    Self {
      inner: Arc::new(DashMap::new()),
    }
  }

  /// Inserts or overwrites the adapter for the type it reports via
  /// [`TypeAdapter::type_tag`].
  pub fn register(&self, adapter: Arc<dyn TypeAdapter>) {
    let tag = adapter.type_tag();
    let replaced = self.inner.insert(tag.id(), adapter);
    tracing::debug!("registering type adapter: type = {}, replaced = {}", tag, replaced.is_some());
  }

  /// Retrieves the adapter registered for `tag`, if any.
  #[must_use]
  pub fn get(&self, tag: &TypeTag) -> Option<Arc<dyn TypeAdapter>> {
    self.inner.get(&tag.id()).map(|entry| entry.value().clone())
  }

  /// Copies the current contents for a serializer build.
  #[must_use]
  pub fn snapshot(&self) -> Vec<Arc<dyn TypeAdapter>> {
    self.inner.iter().map(|entry| entry.value().clone()).collect()
  }

  /// Returns the number of registered adapters.
  #[must_use]
  pub fn len(&self) -> usize {
    self.inner.len()
  }

  /// Returns `true` when no adapter has been registered.
  #[must_use]
  pub fn is_empty(&self) -> bool {
    self.inner.is_empty()
  }
}

impl Default for TypeAdapterRegistry {
  fn default() -> Self {
    Self::new()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::error::{DeserializationError, SerializationError};
  use serde_json::Value;
  use std::any::Any;

  struct LabelAdapter {
    label: &'static str,
  }

  impl TypeAdapter for LabelAdapter {
    fn type_tag(&self) -> TypeTag {
      TypeTag::of::<String>()
    }

    fn encode(&self, _value: &dyn Any) -> Result<Value, SerializationError> {
      Ok(Value::String(self.label.to_string()))
    }

    fn decode(&self, _value: &Value) -> Result<Box<dyn Any>, DeserializationError> {
      Ok(Box::new(self.label.to_string()))
    }
  }

  #[test]
  fn registers_and_resolves_adapter() {
    let registry = TypeAdapterRegistry::new();
    assert!(registry.is_empty());

    registry.register(Arc::new(LabelAdapter { label: "first" }));
    let resolved = registry.get(&TypeTag::of::<String>()).expect("resolve");
    let encoded = resolved.encode(&"ignored".to_string()).expect("encode");
    assert_eq!(encoded, Value::String("first".to_string()));
  }

  #[test]
  fn last_registration_for_a_type_wins() {
    let registry = TypeAdapterRegistry::new();
    registry.register(Arc::new(LabelAdapter { label: "first" }));
    registry.register(Arc::new(LabelAdapter { label: "second" }));

    assert_eq!(registry.len(), 1);
    let resolved = registry.get(&TypeTag::of::<String>()).expect("resolve");
    let encoded = resolved.encode(&"ignored".to_string()).expect("encode");
    assert_eq!(encoded, Value::String("second".to_string()));
  }

  #[test]
  fn clones_share_the_same_entries() {
    let registry = TypeAdapterRegistry::new();
    let handle = registry.clone();
    handle.register(Arc::new(LabelAdapter { label: "shared" }));

    assert_eq!(registry.len(), 1);
    assert!(registry.get(&TypeTag::of::<String>()).is_some());
  }
}
