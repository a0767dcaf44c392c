//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Value objects have **no identity**: two instances with the same attribute
/// values are interchangeable. Count proposals are the canonical example in this
/// workspace; a proposal for the same location, rule and date is the same
/// proposal no matter which evaluation produced it.
///
/// ```ignore
/// #[derive(Debug, Clone, PartialEq, Eq)]
/// struct Threshold {
///     value: rust_decimal::Decimal,
/// }
///
/// impl ValueObject for Threshold {}
/// ```
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
