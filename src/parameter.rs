//! Request-time parameters resolved against registered definitions.

use crate::definition::{FilterDefinition, Predicate, SortDefinition};
use crate::models::FilterValue;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;

/// Requested sort direction, already normalized for `reverse_direction`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Asc,
    Desc,
}

impl Direction {
    #[must_use]
    pub const fn flip(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Asc => f.write_str("asc"),
            Self::Desc => f.write_str("desc"),
        }
    }
}

/// What a request parameter resolved to: a registered definition, or the
/// external name verbatim when nothing matched.
#[derive(Debug, Clone)]
pub enum Binding<D> {
    Defined(Arc<D>),
    Undefined(String),
}

impl<D> Binding<D> {
    #[must_use]
    pub fn is_defined(&self) -> bool {
        matches!(self, Self::Defined(_))
    }

    #[must_use]
    pub fn definition(&self) -> Option<&D> {
        match self {
            Self::Defined(def) => Some(def),
            Self::Undefined(_) => None,
        }
    }
}

/// One filter extracted from the request.
#[derive(Debug, Clone)]
pub struct FilterParameter {
    binding: Binding<FilterDefinition>,
    predicate: Predicate,
    value: FilterValue,
}

impl FilterParameter {
    #[must_use]
    pub fn new(
        binding: Binding<FilterDefinition>,
        predicate: Predicate,
        value: FilterValue,
    ) -> Self {
        Self {
            binding,
            predicate,
            value,
        }
    }

    #[must_use]
    pub fn binding(&self) -> &Binding<FilterDefinition> {
        &self.binding
    }

    /// External name this parameter was supplied under.
    #[must_use]
    pub fn external_alias(&self) -> &str {
        match &self.binding {
            Binding::Defined(def) => def.external_alias(),
            Binding::Undefined(name) => name,
        }
    }

    #[must_use]
    pub fn predicate(&self) -> Predicate {
        self.predicate
    }

    #[must_use]
    pub fn value(&self) -> &FilterValue {
        &self.value
    }

    /// Defined with an allowed predicate, so it may reach the query backend.
    #[must_use]
    pub fn applicable(&self) -> bool {
        self.binding
            .definition()
            .is_some_and(|def| def.allows(self.predicate))
    }
}

/// One sort key extracted from the request.
#[derive(Debug, Clone)]
pub struct SortParameter {
    binding: Binding<SortDefinition>,
    direction: Direction,
}

impl SortParameter {
    #[must_use]
    pub fn new(binding: Binding<SortDefinition>, direction: Direction) -> Self {
        Self { binding, direction }
    }

    #[must_use]
    pub fn binding(&self) -> &Binding<SortDefinition> {
        &self.binding
    }

    /// External name this sort key was supplied under.
    #[must_use]
    pub fn external_alias(&self) -> &str {
        match &self.binding {
            Binding::Defined(def) => def.external_alias(),
            Binding::Undefined(name) => name,
        }
    }

    #[must_use]
    pub fn direction(&self) -> Direction {
        self.direction
    }
}
