//! Stages that validate the extracted parameters.
//!
//! Two disciplines run side by side, per error class:
//! - Declared rules (`required`) accumulate descriptors into the context's
//!   error list and processing continues, so one response can report every
//!   rule violation at once.
//! - Undefined names and disallowed predicates are governed by
//!   [`UnknownPolicy`]; under the default `Reject` policy they abort the call
//!   fatally, because forwarding an unknown operation to the query backend is
//!   unsafe.

use crate::definition::{FilterDefinition, Rule, SortDefinition};
use crate::errors::{FetchError, ParamError};
use crate::parameter::Binding;
use crate::pipeline::{Next, Stage};
use crate::stages::ParamContext;
use std::sync::Arc;
use tracing::warn;

/// What to do with a parameter that matches no definition, or a predicate its
/// definition does not allow.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UnknownPolicy {
    /// Abort the call with a fatal error. The default: silently ignoring
    /// unknown filters masks caller mistakes.
    #[default]
    Reject,
    /// Drop the offending parameter and continue.
    Ignore,
    /// Keep the parameter visible in the parameter set; the application
    /// stages never forward it to the backend.
    PassThrough,
}

/// Validates the extracted filter parameters against their definitions.
pub struct FilterValidator {
    definitions: Arc<Vec<Arc<FilterDefinition>>>,
    policy: UnknownPolicy,
}

impl FilterValidator {
    pub const NAME: &'static str = "filter_validator";

    #[must_use]
    pub fn new(definitions: Arc<Vec<Arc<FilterDefinition>>>, policy: UnknownPolicy) -> Self {
        Self {
            definitions,
            policy,
        }
    }
}

impl Stage<ParamContext> for FilterValidator {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn call(&self, mut ctx: ParamContext, next: Next<'_, ParamContext>) -> Result<ParamContext, FetchError> {
        // Rule violations accumulate across all definitions before any
        // policy decision is taken.
        for def in self.definitions.iter() {
            for rule in def.rules() {
                match rule {
                    Rule::Required => {
                        let present = ctx
                            .filters
                            .iter()
                            .any(|p| p.external_alias() == def.external_alias() && !p.value().is_empty());
                        if !present {
                            ctx.errors.push(ParamError::required(def.external_alias()));
                        }
                    }
                }
            }
        }

        match self.policy {
            UnknownPolicy::Reject => {
                for param in &ctx.filters {
                    match param.binding() {
                        Binding::Undefined(name) => {
                            warn!(%name, "rejecting undefined filter");
                            return Err(FetchError::UndefinedFilter { name: name.clone() });
                        }
                        Binding::Defined(def) => {
                            if !def.allows(param.predicate()) {
                                warn!(
                                    field = def.external_alias(),
                                    predicate = %param.predicate(),
                                    "rejecting disallowed predicate"
                                );
                                return Err(FetchError::DisallowedPredicate {
                                    field: def.external_alias().to_string(),
                                    predicate: param.predicate(),
                                });
                            }
                        }
                    }
                }
            }
            UnknownPolicy::Ignore => {
                ctx.filters.retain(|p| p.applicable());
            }
            UnknownPolicy::PassThrough => {}
        }

        next.run(ctx)
    }
}

/// Validates the extracted sort parameters against their definitions.
pub struct SortValidator {
    definitions: Arc<Vec<Arc<SortDefinition>>>,
    policy: UnknownPolicy,
}

impl SortValidator {
    pub const NAME: &'static str = "sort_validator";

    #[must_use]
    pub fn new(definitions: Arc<Vec<Arc<SortDefinition>>>, policy: UnknownPolicy) -> Self {
        Self {
            definitions,
            policy,
        }
    }
}

impl Stage<ParamContext> for SortValidator {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn call(&self, mut ctx: ParamContext, next: Next<'_, ParamContext>) -> Result<ParamContext, FetchError> {
        for def in self.definitions.iter() {
            for rule in def.rules() {
                match rule {
                    Rule::Required => {
                        let present = ctx
                            .sorts
                            .iter()
                            .any(|p| p.external_alias() == def.external_alias());
                        if !present {
                            ctx.errors.push(ParamError::required(def.external_alias()));
                        }
                    }
                }
            }
        }

        match self.policy {
            UnknownPolicy::Reject => {
                if let Some(param) = ctx.sorts.iter().find(|p| !p.binding().is_defined()) {
                    let name = param.external_alias().to_string();
                    warn!(%name, "rejecting undefined sort key");
                    return Err(FetchError::UndefinedSort { name });
                }
            }
            UnknownPolicy::Ignore => {
                ctx.sorts.retain(|p| p.binding().is_defined());
            }
            UnknownPolicy::PassThrough => {}
        }

        next.run(ctx)
    }
}
