//! Entity trait: identity + continuity across state changes.

use chrono::{DateTime, Utc};

/// A stored record with a stable identity and creation time.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the entity identifier.
    fn id(&self) -> &Self::Id;

    /// When the record was first stored. Listings are ordered newest first on this.
    fn created_at(&self) -> DateTime<Utc>;
}

/// Sort entities newest first (ties broken by id for a stable order).
pub fn sort_newest_first<E>(items: &mut [E])
where
    E: Entity,
    E::Id: Ord,
{
    items.sort_by(|a, b| {
        b.created_at()
            .cmp(&a.created_at())
            .then_with(|| b.id().cmp(a.id()))
    });
}
