//! The fetcher: declarative configuration plus the single entry point that
//! turns raw parameters into a filtered, sorted collection.
//!
//! Configure once at startup:
//!
//! ```rust,ignore
//! use fetchcrate::{FetcherConfig, Fetcher, FilterDefinition, SortDefinition, RawParams};
//!
//! let config = FetcherConfig::builder()
//!     .filter(FilterDefinition::new("name").required())
//!     .filter(FilterDefinition::new("kind").alias("type"))
//!     .sort(SortDefinition::new("name"))
//!     .sort(SortDefinition::new("position").alias("relevance").reverse_direction())
//!     .build()?;
//!
//! let fetcher = Fetcher::new(EntityProvider::<pages::Entity>::new(), &config)?;
//! match fetcher.call(raw) {
//!     FetchResult::Success(select) => { /* run the select */ }
//!     FetchResult::Failure(errors) => { /* report them */ }
//! }
//! ```
//!
//! A derived resource copies and extends its parent's configuration with
//! [`FetcherConfig::extend`]; the parent is never mutated.

use crate::definition::{FilterDefinition, SortDefinition};
use crate::errors::{ConfigError, ParamError};
use crate::models::RawParams;
use crate::params::ParameterSet;
use crate::pipeline::Pipeline;
use crate::queryable::{Queryable, ResourceProvider};
use crate::stages::apply::{CollectionHook, CollectionParamsHook, FilterApply, SortApply};
use crate::stages::extract::{FilterExtractor, SortExtractor};
use crate::stages::validate::{FilterValidator, SortValidator, UnknownPolicy};
use crate::stages::{ParamContext, QueryContext};
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::debug;

/// Outcome of one fetcher invocation.
#[derive(Debug)]
pub enum FetchResult<Q> {
    /// The filtered, sorted collection.
    Success(Q),
    /// Every validation error the parameters produced, in detection order.
    Failure(Vec<ParamError>),
}

impl<Q> FetchResult<Q> {
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    #[must_use]
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failure(_))
    }

    #[must_use]
    pub fn success(self) -> Option<Q> {
        match self {
            Self::Success(collection) => Some(collection),
            Self::Failure(_) => None,
        }
    }

    #[must_use]
    pub fn errors(&self) -> &[ParamError] {
        match self {
            Self::Success(_) => &[],
            Self::Failure(errors) => errors,
        }
    }

    /// Lift into a plain `Result` for `?`-style handling.
    ///
    /// # Errors
    /// The accumulated validation errors of a failed call.
    pub fn into_result(self) -> Result<Q, Vec<ParamError>> {
        match self {
            Self::Success(collection) => Ok(collection),
            Self::Failure(errors) => Err(errors),
        }
    }
}

type MiddlewareChange<Q> =
    dyn Fn(&mut Pipeline<QueryContext<Q>>) -> Result<(), ConfigError> + Send + Sync;

/// Immutable per-resource configuration: which fields may be filtered and
/// sorted, how unknowns are treated, and any query-pipeline customization.
///
/// Built once at startup via [`FetcherConfig::builder`] and shared read-only
/// across concurrent calls.
pub struct FetcherConfig<Q> {
    filters: Arc<Vec<Arc<FilterDefinition>>>,
    sorts: Arc<Vec<Arc<SortDefinition>>>,
    policy: UnknownPolicy,
    changes: Vec<Arc<MiddlewareChange<Q>>>,
}

impl<Q> std::fmt::Debug for FetcherConfig<Q> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FetcherConfig")
            .field("filters", &self.filters)
            .field("sorts", &self.sorts)
            .field("policy", &self.policy)
            .field("changes", &self.changes.len())
            .finish()
    }
}

impl<Q> Clone for FetcherConfig<Q> {
    fn clone(&self) -> Self {
        Self {
            filters: Arc::clone(&self.filters),
            sorts: Arc::clone(&self.sorts),
            policy: self.policy,
            changes: self.changes.clone(),
        }
    }
}

impl<Q> FetcherConfig<Q> {
    #[must_use]
    pub fn builder() -> ConfigBuilder<Q> {
        ConfigBuilder::new()
    }

    /// A builder seeded with a copy of this configuration. Definitions and
    /// middleware changes added to it never touch the parent.
    #[must_use]
    pub fn extend(&self) -> ConfigBuilder<Q> {
        ConfigBuilder {
            filters: self.filters.iter().map(|d| (**d).clone()).collect(),
            sorts: self.sorts.iter().map(|d| (**d).clone()).collect(),
            policy: self.policy,
            changes: self.changes.clone(),
        }
    }

    #[must_use]
    pub fn filter_definitions(&self) -> &[Arc<FilterDefinition>] {
        &self.filters
    }

    #[must_use]
    pub fn sort_definitions(&self) -> &[Arc<SortDefinition>] {
        &self.sorts
    }

    #[must_use]
    pub fn unknown_policy(&self) -> UnknownPolicy {
        self.policy
    }
}

/// Registration API for [`FetcherConfig`].
pub struct ConfigBuilder<Q> {
    filters: Vec<FilterDefinition>,
    sorts: Vec<SortDefinition>,
    policy: UnknownPolicy,
    changes: Vec<Arc<MiddlewareChange<Q>>>,
}

impl<Q> Default for ConfigBuilder<Q> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Q> ConfigBuilder<Q> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            filters: Vec::new(),
            sorts: Vec::new(),
            policy: UnknownPolicy::default(),
            changes: Vec::new(),
        }
    }

    /// Register a filterable field.
    #[must_use]
    pub fn filter(mut self, definition: FilterDefinition) -> Self {
        self.filters.push(definition);
        self
    }

    /// Register a sortable field.
    #[must_use]
    pub fn sort(mut self, definition: SortDefinition) -> Self {
        self.sorts.push(definition);
        self
    }

    /// How parameters matching no definition (and disallowed predicates) are
    /// treated. Defaults to [`UnknownPolicy::Reject`].
    #[must_use]
    pub fn on_unknown(mut self, policy: UnknownPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Alter the query pipeline directly: splice custom stages before or
    /// after the defaults by name or index. Changes run, in registration
    /// order, when a fetcher is built; a bad anchor fails construction, not
    /// a request.
    #[must_use]
    pub fn middleware(
        mut self,
        change: impl Fn(&mut Pipeline<QueryContext<Q>>) -> Result<(), ConfigError>
        + Send
        + Sync
        + 'static,
    ) -> Self {
        self.changes.push(Arc::new(change));
        self
    }

    /// Validate and freeze the configuration.
    ///
    /// # Errors
    /// Duplicate external aliases within a kind and filters with empty
    /// predicate sets are programmer errors, rejected here rather than
    /// surfacing per request.
    pub fn build(self) -> Result<FetcherConfig<Q>, ConfigError> {
        let mut seen = BTreeSet::new();
        for def in &self.filters {
            if def.allowed_predicates().is_empty() {
                return Err(ConfigError::EmptyPredicates {
                    name: def.name().to_string(),
                });
            }
            if !seen.insert(def.external_alias().to_string()) {
                return Err(ConfigError::DuplicateAlias {
                    kind: "filter",
                    alias: def.external_alias().to_string(),
                });
            }
        }

        let mut seen = BTreeSet::new();
        for def in &self.sorts {
            if !seen.insert(def.external_alias().to_string()) {
                return Err(ConfigError::DuplicateAlias {
                    kind: "sort",
                    alias: def.external_alias().to_string(),
                });
            }
        }

        Ok(FetcherConfig {
            filters: Arc::new(self.filters.into_iter().map(Arc::new).collect()),
            sorts: Arc::new(self.sorts.into_iter().map(Arc::new).collect()),
            policy: self.policy,
            changes: self.changes,
        })
    }
}

impl<Q: Send + Sync + 'static> ConfigBuilder<Q> {
    /// Run a hook over the collection before the default query stages. The
    /// parameter set passes through untouched.
    #[must_use]
    pub fn before_collection(self, hook: impl Fn(Q) -> Q + Send + Sync + 'static) -> Self {
        let hook: Arc<dyn Fn(Q) -> Q + Send + Sync> = Arc::new(hook);
        self.middleware(move |pipeline| {
            pipeline.insert_before(0, CollectionHook::new(Arc::clone(&hook)))
        })
    }

    /// Run a hook over the collection and the parameter set before the
    /// default query stages.
    #[must_use]
    pub fn before(
        self,
        hook: impl Fn(Q, ParameterSet) -> (Q, ParameterSet) + Send + Sync + 'static,
    ) -> Self {
        let hook: Arc<crate::stages::apply::HookFn<Q>> = Arc::new(hook);
        self.middleware(move |pipeline| {
            pipeline.insert_before(0, CollectionParamsHook::new(Arc::clone(&hook)))
        })
    }

    /// Run a hook over the collection after the default query stages. The
    /// parameter set passes through untouched.
    #[must_use]
    pub fn after_collection(self, hook: impl Fn(Q) -> Q + Send + Sync + 'static) -> Self {
        let hook: Arc<dyn Fn(Q) -> Q + Send + Sync> = Arc::new(hook);
        self.middleware(move |pipeline| {
            pipeline.use_stage(CollectionHook::new(Arc::clone(&hook)));
            Ok(())
        })
    }

    /// Run a hook over the collection and the parameter set after the
    /// default query stages.
    #[must_use]
    pub fn after(
        self,
        hook: impl Fn(Q, ParameterSet) -> (Q, ParameterSet) + Send + Sync + 'static,
    ) -> Self {
        let hook: Arc<crate::stages::apply::HookFn<Q>> = Arc::new(hook);
        self.middleware(move |pipeline| {
            pipeline.use_stage(CollectionParamsHook::new(Arc::clone(&hook)));
            Ok(())
        })
    }
}

/// Runs the parameter pipeline and, when it comes back clean, the query
/// pipeline over the provider's collection.
pub struct Fetcher<P: ResourceProvider> {
    provider: P,
    param_pipeline: Pipeline<ParamContext>,
    query_pipeline: Pipeline<QueryContext<P::Collection>>,
}

impl<P: ResourceProvider> std::fmt::Debug for Fetcher<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Fetcher").finish_non_exhaustive()
    }
}

impl<P> Fetcher<P>
where
    P: ResourceProvider,
    P::Collection: Queryable + Send + Sync + 'static,
{
    /// Materialize both pipelines for the given configuration.
    ///
    /// # Errors
    /// A middleware change referencing a stage or index that does not exist.
    pub fn new(provider: P, config: &FetcherConfig<P::Collection>) -> Result<Self, ConfigError> {
        let mut param_pipeline = Pipeline::new();
        param_pipeline.use_stage(FilterExtractor::new(Arc::clone(&config.filters)));
        param_pipeline.use_stage(FilterValidator::new(
            Arc::clone(&config.filters),
            config.policy,
        ));
        param_pipeline.use_stage(SortExtractor::new(Arc::clone(&config.sorts)));
        param_pipeline.use_stage(SortValidator::new(
            Arc::clone(&config.sorts),
            config.policy,
        ));

        let mut query_pipeline = Pipeline::new();
        query_pipeline.use_stage(FilterApply);
        query_pipeline.use_stage(SortApply);
        for change in &config.changes {
            change(&mut query_pipeline)?;
        }

        Ok(Self {
            provider,
            param_pipeline,
            query_pipeline,
        })
    }

    /// Process the raw parameters and apply them to the collection.
    ///
    /// Malformed user input never fails this method: it comes back as
    /// [`FetchResult::Failure`]. When the parameter pipeline reports errors
    /// the query pipeline is skipped entirely.
    #[must_use]
    pub fn call(&self, raw: RawParams) -> FetchResult<P::Collection> {
        let ctx = match self.param_pipeline.call(ParamContext::new(raw)) {
            Ok(ctx) => ctx,
            Err(fatal) => return FetchResult::Failure(vec![fatal.to_param_error()]),
        };

        let (params, errors) = ctx.into_parts();
        if !errors.is_empty() {
            debug!(count = errors.len(), "parameter validation failed");
            return FetchResult::Failure(errors);
        }

        let seed = QueryContext::new(self.provider.all(), params);
        match self.query_pipeline.call(seed) {
            Ok(ctx) => FetchResult::Success(ctx.collection),
            Err(fatal) => FetchResult::Failure(vec![fatal.to_param_error()]),
        }
    }

    /// Run `call` and hand the result to a continuation, returning its value.
    pub fn call_with<R>(
        &self,
        raw: RawParams,
        f: impl FnOnce(FetchResult<P::Collection>) -> R,
    ) -> R {
        f(self.call(raw))
    }
}
