//! Stages that parse the raw request values into parameters.
//!
//! Extraction never rejects: names that match no definition become undefined
//! bindings, and the validators decide what happens to them.

use crate::definition::{FilterDefinition, Predicate, SortDefinition};
use crate::errors::FetchError;
use crate::parameter::{Binding, Direction, FilterParameter, SortParameter};
use crate::pipeline::{Next, Stage};
use crate::stages::ParamContext;
use std::sync::Arc;
use tracing::debug;

/// Splits composite `<field>_<predicate>` keys and resolves each base name
/// against the registered filter definitions.
pub struct FilterExtractor {
    definitions: Arc<Vec<Arc<FilterDefinition>>>,
}

impl FilterExtractor {
    pub const NAME: &'static str = "filter_extractor";

    #[must_use]
    pub fn new(definitions: Arc<Vec<Arc<FilterDefinition>>>) -> Self {
        Self { definitions }
    }

    fn resolve(&self, name: &str) -> Binding<FilterDefinition> {
        self.definitions
            .iter()
            .find(|def| def.external_alias() == name)
            .map_or_else(
                || Binding::Undefined(name.to_string()),
                |def| Binding::Defined(Arc::clone(def)),
            )
    }
}

impl Stage<ParamContext> for FilterExtractor {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn call(&self, mut ctx: ParamContext, next: Next<'_, ParamContext>) -> Result<ParamContext, FetchError> {
        // BTreeMap keys arrive in lexicographic order, so repeated calls are
        // deterministic.
        for (key, value) in &ctx.raw.filter {
            let (name, predicate) = Predicate::split_key(key);
            let binding = self.resolve(name);
            debug!(key = %key, name, %predicate, defined = binding.is_defined(), "extracted filter");
            ctx.filters
                .push(FilterParameter::new(binding, predicate, value.clone()));
        }
        next.run(ctx)
    }
}

/// Parses the comma-separated sort string and resolves each token against the
/// registered sort definitions, flipping the requested direction for
/// definitions declared with `reverse_direction`.
pub struct SortExtractor {
    definitions: Arc<Vec<Arc<SortDefinition>>>,
}

impl SortExtractor {
    pub const NAME: &'static str = "sort_extractor";

    #[must_use]
    pub fn new(definitions: Arc<Vec<Arc<SortDefinition>>>) -> Self {
        Self { definitions }
    }

    fn extract(&self, token: &str) -> SortParameter {
        let (name, requested) = token.strip_prefix('-').map_or(
            (token, Direction::Asc),
            |name| (name, Direction::Desc),
        );

        match self.definitions.iter().find(|def| def.external_alias() == name) {
            Some(def) => {
                let direction = if def.reverses() {
                    requested.flip()
                } else {
                    requested
                };
                SortParameter::new(Binding::Defined(Arc::clone(def)), direction)
            }
            None => SortParameter::new(Binding::Undefined(name.to_string()), requested),
        }
    }
}

impl Stage<ParamContext> for SortExtractor {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn call(&self, mut ctx: ParamContext, next: Next<'_, ParamContext>) -> Result<ParamContext, FetchError> {
        if let Some(sort) = &ctx.raw.sort {
            let parameters: Vec<SortParameter> = sort
                .split(',')
                .map(str::trim)
                .filter(|token| !token.is_empty())
                .map(|token| self.extract(token))
                .collect();
            debug!(%sort, count = parameters.len(), "extracted sort keys");
            ctx.sorts = parameters;
        }
        next.run(ctx)
    }
}
