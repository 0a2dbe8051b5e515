//! Entity trait: identity + continuity across state changes.
//!
//! Catalog records (medicines, categories) are owned by external collaborators;
//! the engine only needs their identity to group and join facts.

/// Entity marker + minimal interface.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Clone + Eq + Ord + core::hash::Hash + core::fmt::Debug;

    /// Returns the entity identifier.
    fn id(&self) -> &Self::Id;
}
