//! Stages that apply validated parameters to the collection.
//!
//! These are the only stages allowed to touch the backend seam, and they do
//! so exclusively through [`Queryable`]. The parameter set travels through
//! unchanged so later stages can still inspect what was applied.

use crate::errors::FetchError;
use crate::parameter::Binding;
use crate::pipeline::{Next, Stage};
use crate::queryable::Queryable;
use crate::stages::QueryContext;
use std::sync::Arc;
use tracing::debug;

/// Applies every applicable filter parameter; the backend accumulates the
/// conditions, so multiple filters compose with logical AND.
pub struct FilterApply;

impl FilterApply {
    pub const NAME: &'static str = "filter_apply";
}

impl<Q> Stage<QueryContext<Q>> for FilterApply
where
    Q: Queryable + Send + Sync,
{
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn call(
        &self,
        ctx: QueryContext<Q>,
        next: Next<'_, QueryContext<Q>>,
    ) -> Result<QueryContext<Q>, FetchError> {
        let QueryContext {
            mut collection,
            params,
        } = ctx;
        for param in params.filters() {
            if let Binding::Defined(def) = param.binding()
                && param.applicable()
            {
                debug!(attribute = def.name(), predicate = %param.predicate(), "applying filter");
                collection = collection.apply_filter(def.name(), param.predicate(), param.value());
            }
        }
        next.run(QueryContext { collection, params })
    }
}

/// Applies sort keys in input order; the first key is the primary sort.
pub struct SortApply;

impl SortApply {
    pub const NAME: &'static str = "sort_apply";
}

impl<Q> Stage<QueryContext<Q>> for SortApply
where
    Q: Queryable + Send + Sync,
{
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn call(
        &self,
        ctx: QueryContext<Q>,
        next: Next<'_, QueryContext<Q>>,
    ) -> Result<QueryContext<Q>, FetchError> {
        let QueryContext {
            mut collection,
            params,
        } = ctx;
        for param in params.sorts() {
            if let Binding::Defined(def) = param.binding() {
                debug!(attribute = def.name(), direction = %param.direction(), "applying sort");
                collection = collection.apply_sort(def.name(), param.direction());
            }
        }
        next.run(QueryContext { collection, params })
    }
}

/// A user hook over the collection alone; the parameter set passes through
/// untouched.
pub struct CollectionHook<Q> {
    hook: Arc<dyn Fn(Q) -> Q + Send + Sync>,
}

impl<Q> CollectionHook<Q> {
    pub const NAME: &'static str = "collection_hook";

    #[must_use]
    pub fn new(hook: Arc<dyn Fn(Q) -> Q + Send + Sync>) -> Self {
        Self { hook }
    }
}

impl<Q: Send + Sync> Stage<QueryContext<Q>> for CollectionHook<Q> {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn call(
        &self,
        ctx: QueryContext<Q>,
        next: Next<'_, QueryContext<Q>>,
    ) -> Result<QueryContext<Q>, FetchError> {
        let QueryContext { collection, params } = ctx;
        next.run(QueryContext {
            collection: (self.hook)(collection),
            params,
        })
    }
}

/// A user hook over both the collection and the parameter set.
pub struct CollectionParamsHook<Q> {
    hook: Arc<HookFn<Q>>,
}

pub type HookFn<Q> = dyn Fn(Q, crate::params::ParameterSet) -> (Q, crate::params::ParameterSet)
    + Send
    + Sync;

impl<Q> CollectionParamsHook<Q> {
    pub const NAME: &'static str = "collection_params_hook";

    #[must_use]
    pub fn new(hook: Arc<HookFn<Q>>) -> Self {
        Self { hook }
    }
}

impl<Q: Send + Sync> Stage<QueryContext<Q>> for CollectionParamsHook<Q> {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn call(
        &self,
        ctx: QueryContext<Q>,
        next: Next<'_, QueryContext<Q>>,
    ) -> Result<QueryContext<Q>, FetchError> {
        let (collection, params) = (self.hook)(ctx.collection, ctx.params);
        next.run(QueryContext { collection, params })
    }
}
