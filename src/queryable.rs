//! The backend seam: everything the pipeline is allowed to know about the
//! storage engine.

use crate::definition::Predicate;
use crate::models::FilterValue;
use crate::parameter::Direction;

/// A collection that filter and sort operations can be applied to.
///
/// Chained calls must accumulate: applying a second filter narrows the
/// result of the first, and a second sort key becomes a lower-priority
/// tiebreaker for the first.
pub trait Queryable: Sized {
    /// Narrow the collection to rows where `attribute` satisfies
    /// `predicate` against `value`.
    #[must_use]
    fn apply_filter(self, attribute: &str, predicate: Predicate, value: &FilterValue) -> Self;

    /// Add `attribute` as the next sort key.
    #[must_use]
    fn apply_sort(self, attribute: &str, direction: Direction) -> Self;
}

/// Supplies the starting collection for every call.
pub trait ResourceProvider {
    type Collection: Queryable;

    fn all(&self) -> Self::Collection;
}
