//! Serializer provider wiring the shared registry to per-call serializer builds.

use std::sync::Arc;

use crate::adapter::TypeAdapter;
use crate::exclusion::IgnoredTypes;
use crate::registry::TypeAdapterRegistry;
use crate::serializer::{JsonSerializer, JsonSerializerBuilder};
use crate::tag::TypeTag;

/// Builds configured [`JsonSerializer`] instances for the deep-equality matchers.
///
/// The provider owns no hidden state: the adapter registry is injected at
/// construction time and stays shared with the surrounding harness, and every
/// [`SerializerProvider::serializer_for`] call produces a fresh instance reflecting
/// the registry contents at that moment.
pub struct SerializerProvider {
  registry: TypeAdapterRegistry,
}

impl SerializerProvider {
  /// Creates a provider over the given registry.
  #[must_use]
  pub fn new(registry: TypeAdapterRegistry) -> Self {
    Self { registry }
  }

  /// Returns the shared registry handle.
  #[must_use]
  pub fn registry(&self) -> &TypeAdapterRegistry {
    &self.registry
  }

  /// Inserts or overwrites the adapter for its reported type in the shared registry.
  ///
  /// Visible to every subsequent [`SerializerProvider::serializer_for`] call made
  /// through the same registry.
  pub fn register_type_adapter(&self, adapter: Arc<dyn TypeAdapter>) {
    self.registry.register(adapter);
  }

  /// Builds a serializer skipping exactly the types in `types_to_ignore`.
  ///
  /// The instance pretty-prints, encodes complex map keys as structured JSON, and
  /// contains every adapter currently registered. An empty ignore list attaches no
  /// exclusion strategy.
  #[must_use]
  pub fn serializer_for(&self, types_to_ignore: &[TypeTag]) -> JsonSerializer {
    let mut builder = JsonSerializerBuilder::new().pretty_printing().structured_map_keys();
    for adapter in self.registry.snapshot() {
      builder = builder.with_adapter(adapter);
    }
    if !types_to_ignore.is_empty() {
      builder = builder.with_exclusion_strategy(Arc::new(IgnoredTypes::new(types_to_ignore)));
    }
    builder.build()
  }
}

impl Default for SerializerProvider {
  fn default() -> Self {
    Self::new(TypeAdapterRegistry::new())
  }
}
