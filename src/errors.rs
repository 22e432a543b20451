//! Error types for the parameter pipeline.
//!
//! Three classes are kept apart on purpose:
//! - [`ParamError`] — recoverable, user-facing descriptors accumulated during
//!   validation and returned inside a `Failure` result.
//! - [`FetchError`] — fatal conditions inside one call (undefined parameter
//!   under the reject policy, strict fetch miss). These unwind the stage
//!   chain and are converted to a single `ParamError` at the fetcher
//!   boundary, so malformed user input never escapes as a Rust error.
//! - [`ConfigError`] — programmer misconfiguration, reported at build time
//!   and never from `call`.

use crate::definition::Predicate;
use serde::Serialize;
use std::fmt;

/// User-facing validation error descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParamError {
    /// External alias of the offending field.
    pub field: String,
    /// Machine-readable rule name, e.g. `required` or `undefined`.
    pub rule: String,
    /// Human-readable message.
    pub message: String,
}

impl ParamError {
    #[must_use]
    pub fn new(
        field: impl Into<String>,
        rule: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            field: field.into(),
            rule: rule.into(),
            message: message.into(),
        }
    }

    #[must_use]
    pub fn required(field: &str) -> Self {
        Self::new(field, "required", format!("{field} is required"))
    }
}

impl fmt::Display for ParamError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ParamError {}

/// Fatal error raised while running a single call's stage chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// A filter name with no matching definition, under the reject policy.
    UndefinedFilter { name: String },
    /// A sort key with no matching definition, under the reject policy.
    UndefinedSort { name: String },
    /// A predicate the matched definition does not allow.
    DisallowedPredicate { field: String, predicate: Predicate },
    /// Strict fetch on the parameter set missed.
    ParameterNotFound { name: String },
}

impl FetchError {
    /// The user-facing descriptor this error surfaces as in a failure result.
    #[must_use]
    pub fn to_param_error(&self) -> ParamError {
        match self {
            Self::UndefinedFilter { name } => ParamError::new(
                name.clone(),
                "undefined",
                format!("{name} is not a known filter"),
            ),
            Self::UndefinedSort { name } => ParamError::new(
                name.clone(),
                "undefined",
                format!("{name} is not a known sort key"),
            ),
            Self::DisallowedPredicate { field, predicate } => ParamError::new(
                field.clone(),
                "disallowed_predicate",
                format!("{field} does not allow the {predicate} predicate"),
            ),
            Self::ParameterNotFound { name } => ParamError::new(
                name.clone(),
                "not_found",
                format!("parameter not found: {name}"),
            ),
        }
    }
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UndefinedFilter { name } => write!(f, "undefined filter: {name}"),
            Self::UndefinedSort { name } => write!(f, "undefined sort key: {name}"),
            Self::DisallowedPredicate { field, predicate } => {
                write!(f, "predicate {predicate} is not allowed for {field}")
            }
            Self::ParameterNotFound { name } => write!(f, "parameter not found: {name}"),
        }
    }
}

impl std::error::Error for FetchError {}

/// Configuration error, detected when a config or fetcher is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Two definitions of the same kind share an external alias.
    DuplicateAlias { kind: &'static str, alias: String },
    /// A filter definition with an empty predicate set can never match.
    EmptyPredicates { name: String },
    /// A middleware splice referenced a stage that is not in the pipeline.
    StageNotFound { name: String },
    /// A middleware splice referenced an index past the end of the pipeline.
    IndexOutOfBounds { index: usize, len: usize },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateAlias { kind, alias } => {
                write!(f, "duplicate {kind} alias: {alias}")
            }
            Self::EmptyPredicates { name } => {
                write!(f, "filter {name} allows no predicates")
            }
            Self::StageNotFound { name } => write!(f, "no such pipeline stage: {name}"),
            Self::IndexOutOfBounds { index, len } => {
                write!(f, "stage index {index} out of bounds for pipeline of {len}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}
