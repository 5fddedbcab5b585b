//! Exclusion strategies deciding which candidates are skipped.

use crate::tag::TypeTag;

/// Attributes of a field candidate offered to an exclusion strategy.
#[derive(Clone, Debug)]
pub struct FieldAttributes<'a> {
  declaring_type: TypeTag,
  name: &'a str,
}

impl<'a> FieldAttributes<'a> {
  /// Creates the attributes for a field of `declaring_type` named `name`.
  #[must_use]
  pub fn new(declaring_type: TypeTag, name: &'a str) -> Self {
    Self { declaring_type, name }
  }

  /// The type declaring the field.
  #[must_use]
  pub fn declaring_type(&self) -> &TypeTag {
    &self.declaring_type
  }

  /// The field name.
  #[must_use]
  pub fn name(&self) -> &str {
    self.name
  }
}

/// Predicate pair consulted by the serializer to decide whether to skip a candidate
/// during serialization or deserialization.
pub trait ExclusionStrategy: Send + Sync {
  /// Returns `true` when every instance of `tag` must be skipped.
  fn should_skip_type(&self, tag: &TypeTag) -> bool;

  /// Returns `true` when the described field must be skipped.
  fn should_skip_field(&self, field: &FieldAttributes<'_>) -> bool;
}

/// Exclusion strategy skipping exactly the types present in an ignore list.
///
/// Field candidates are never skipped; this strategy only ever answers at whole-type
/// granularity.
pub struct IgnoredTypes {
  types: Vec<TypeTag>,
}

impl IgnoredTypes {
  /// Creates a strategy from the types to ignore.
  #[must_use]
  pub fn new(types: impl Into<Vec<TypeTag>>) -> Self {
    Self { types: types.into() }
  }
}

impl ExclusionStrategy for IgnoredTypes {
  fn should_skip_type(&self, tag: &TypeTag) -> bool {
    self.types.contains(tag)
  }

  fn should_skip_field(&self, _field: &FieldAttributes<'_>) -> bool {
    false
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use rstest::rstest;

  #[rstest]
  #[case(TypeTag::of::<String>(), true)]
  #[case(TypeTag::of::<u64>(), true)]
  #[case(TypeTag::of::<i64>(), false)]
  fn skips_exactly_the_listed_types(#[case] tag: TypeTag, #[case] expected: bool) {
    let strategy = IgnoredTypes::new(vec![TypeTag::of::<String>(), TypeTag::of::<u64>()]);
    assert_eq!(strategy.should_skip_type(&tag), expected);
  }

  #[rstest]
  #[case("name")]
  #[case("count")]
  #[case("")]
  fn never_skips_fields(#[case] name: &str) {
    let strategy = IgnoredTypes::new(vec![TypeTag::of::<String>()]);
    let field = FieldAttributes::new(TypeTag::of::<String>(), name);
    assert!(!strategy.should_skip_field(&field));
  }

  #[test]
  fn empty_list_skips_nothing() {
    let strategy = IgnoredTypes::new(Vec::new());
    assert!(!strategy.should_skip_type(&TypeTag::of::<String>()));
  }
}
