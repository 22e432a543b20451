//! Declarations of which fields may be filtered or sorted.
//!
//! Definitions are registered once at startup through a
//! [`ConfigBuilder`](crate::fetcher::ConfigBuilder) and are immutable
//! afterwards. Matching a request parameter to a definition is exact string
//! equality on the external alias.

use serde::Serialize;
use std::fmt;

/// A comparison operator a filter definition may allow.
///
/// The wire token is the suffix appended to the field name in a composite
/// filter key, e.g. `name_eq` or `created_at_gte`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Predicate {
    Eq,
    Neq,
    Lt,
    Lte,
    Gt,
    Gte,
    In,
    NotIn,
    Cont,
}

impl Predicate {
    /// All predicates, longest token first so that suffix matching never
    /// mistakes `not_in` for `in`.
    pub const ALL: [Self; 9] = [
        Self::NotIn,
        Self::Cont,
        Self::Neq,
        Self::Lte,
        Self::Gte,
        Self::Eq,
        Self::Lt,
        Self::Gt,
        Self::In,
    ];

    #[must_use]
    pub const fn token(self) -> &'static str {
        match self {
            Self::Eq => "eq",
            Self::Neq => "neq",
            Self::Lt => "lt",
            Self::Lte => "lte",
            Self::Gt => "gt",
            Self::Gte => "gte",
            Self::In => "in",
            Self::NotIn => "not_in",
            Self::Cont => "cont",
        }
    }

    /// Split a composite filter key into its base field name and predicate.
    ///
    /// A key without a recognized suffix is the bare field name with implied
    /// equality.
    #[must_use]
    pub fn split_key(key: &str) -> (&str, Self) {
        for predicate in Self::ALL {
            if let Some(base) = key.strip_suffix(predicate.token())
                && let Some(base) = base.strip_suffix('_')
                && !base.is_empty()
            {
                return (base, predicate);
            }
        }
        (key, Self::Eq)
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// A validation rule attached to a definition, run in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    /// The parameter must be present with a non-empty value.
    Required,
}

impl Rule {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Required => "required",
        }
    }
}

/// Declaration of one filterable attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterDefinition {
    name: String,
    alias: Option<String>,
    predicates: Vec<Predicate>,
    rules: Vec<Rule>,
}

impl FilterDefinition {
    /// A definition allowing equality and inclusion by default.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            alias: None,
            predicates: vec![Predicate::Eq, Predicate::In],
            rules: Vec::new(),
        }
    }

    /// Expose the field under a different name in the query string.
    #[must_use]
    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    /// Replace the allowed predicate set.
    #[must_use]
    pub fn predicates(mut self, predicates: impl IntoIterator<Item = Predicate>) -> Self {
        self.predicates = predicates.into_iter().collect();
        self
    }

    /// Require the parameter to be present with a non-empty value.
    #[must_use]
    pub fn required(mut self) -> Self {
        self.rules.push(Rule::Required);
        self
    }

    /// Canonical name handed to the query backend.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// External name matched against request parameters.
    #[must_use]
    pub fn external_alias(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.name)
    }

    #[must_use]
    pub fn allows(&self, predicate: Predicate) -> bool {
        self.predicates.contains(&predicate)
    }

    #[must_use]
    pub fn allowed_predicates(&self) -> &[Predicate] {
        &self.predicates
    }

    #[must_use]
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }
}

/// Declaration of one sortable attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortDefinition {
    name: String,
    alias: Option<String>,
    reverse_direction: bool,
    rules: Vec<Rule>,
}

impl SortDefinition {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            alias: None,
            reverse_direction: false,
            rules: Vec::new(),
        }
    }

    /// Expose the field under a different name in the sort string.
    #[must_use]
    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    /// Invert the meaning of the requested direction. Useful when the stored
    /// value orders opposite to its user-facing meaning, e.g. a `position`
    /// column exposed as `relevance`.
    #[must_use]
    pub fn reverse_direction(mut self) -> Self {
        self.reverse_direction = true;
        self
    }

    /// Require a sort token for this field to be present.
    #[must_use]
    pub fn required(mut self) -> Self {
        self.rules.push(Rule::Required);
        self
    }

    /// Canonical name handed to the query backend.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// External name matched against sort tokens.
    #[must_use]
    pub fn external_alias(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.name)
    }

    #[must_use]
    pub fn reverses(&self) -> bool {
        self.reverse_direction
    }

    #[must_use]
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }
}
