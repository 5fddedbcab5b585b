//! Serialization support for the DeepMatch deep-equality matchers.
//!
//! The crate builds JSON serializer instances with optional type-level exclusion
//! rules. A shared [`TypeAdapterRegistry`] holds custom encoder/decoder pairs, and
//! [`SerializerProvider::serializer_for`] turns the registry plus a per-call ignore
//! list into an immutable, fully-configured [`JsonSerializer`] that pretty-prints and
//! encodes complex map keys as structured JSON.

pub mod adapter;
pub mod error;
pub mod exclusion;
pub mod provider;
pub mod registry;
pub mod serializer;
pub mod tag;
pub mod tree;

pub use adapter::{SerdeTypeAdapter, TypeAdapter};
pub use error::{DeserializationError, SerializationError};
pub use exclusion::{ExclusionStrategy, FieldAttributes, IgnoredTypes};
pub use provider::SerializerProvider;
pub use registry::TypeAdapterRegistry;
pub use serializer::{JsonSerializer, JsonSerializerBuilder};
pub use tag::TypeTag;
pub use tree::{MapEncoder, ObjectEncoder, TreeEncoder, TreeSerializable};
