//! Entity trait: identity + continuity across state changes.

/// Entity marker + minimal interface.
///
/// Rules, locations and count/movement records are entities; two records with
/// the same identifier describe the same thing even if their fields differ.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the entity identifier.
    fn id(&self) -> &Self::Id;
}
