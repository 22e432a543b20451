//! The built-in pipeline stages and the contexts they thread.

pub mod apply;
pub mod extract;
pub mod validate;

use crate::errors::ParamError;
use crate::models::RawParams;
use crate::parameter::{FilterParameter, SortParameter};
use crate::params::ParameterSet;

/// Context threaded through the parameter pipeline: the raw input, the
/// parameters extracted from it so far, and the accumulated validation
/// errors.
#[derive(Debug, Default)]
pub struct ParamContext {
    pub raw: RawParams,
    pub filters: Vec<FilterParameter>,
    pub sorts: Vec<SortParameter>,
    pub errors: Vec<ParamError>,
}

impl ParamContext {
    #[must_use]
    pub fn new(raw: RawParams) -> Self {
        Self {
            raw,
            filters: Vec::new(),
            sorts: Vec::new(),
            errors: Vec::new(),
        }
    }

    /// Consume the context into the per-call parameter set and whatever
    /// errors were accumulated.
    #[must_use]
    pub fn into_parts(self) -> (ParameterSet, Vec<ParamError>) {
        (ParameterSet::new(self.filters, self.sorts), self.errors)
    }
}

/// Context threaded through the query pipeline: the collection under
/// construction and the validated parameters driving it.
#[derive(Debug)]
pub struct QueryContext<Q> {
    pub collection: Q,
    pub params: ParameterSet,
}

impl<Q> QueryContext<Q> {
    #[must_use]
    pub fn new(collection: Q, params: ParameterSet) -> Self {
        Self { collection, params }
    }
}
