//! Per-request lookup over the extracted parameters.

use crate::errors::FetchError;
use crate::parameter::{FilterParameter, SortParameter};

/// The parameters of one call, keyed by external alias.
///
/// Built once per invocation after extraction and discarded with it. One
/// field may carry several filter parameters under different predicates (the
/// range idiom, `age_gte` plus `age_lte`); only a later entry under the same
/// alias AND predicate replaces an earlier one. Sort parameters keep their
/// left-to-right input order, which is their application priority.
#[derive(Debug, Clone, Default)]
pub struct ParameterSet {
    filters: Vec<FilterParameter>,
    sorts: Vec<SortParameter>,
}

impl ParameterSet {
    #[must_use]
    pub fn new(filters: Vec<FilterParameter>, sorts: Vec<SortParameter>) -> Self {
        let mut set = Self {
            filters: Vec::with_capacity(filters.len()),
            sorts,
        };
        for filter in filters {
            set.insert_filter(filter);
        }
        set
    }

    /// Insert a filter, replacing any existing entry under the same alias
    /// and predicate. Distinct predicates on one field coexist.
    pub fn insert_filter(&mut self, filter: FilterParameter) {
        match self.filters.iter_mut().find(|existing| {
            existing.external_alias() == filter.external_alias()
                && existing.predicate() == filter.predicate()
        }) {
            Some(existing) => *existing = filter,
            None => self.filters.push(filter),
        }
    }

    /// Soft lookup; absent aliases yield `None`.
    #[must_use]
    pub fn filter(&self, alias: &str) -> Option<&FilterParameter> {
        self.filters.iter().find(|p| p.external_alias() == alias)
    }

    /// Strict lookup; absent aliases are an error carrying the missing name.
    pub fn fetch_filter(&self, alias: &str) -> Result<&FilterParameter, FetchError> {
        self.filter(alias).ok_or_else(|| FetchError::ParameterNotFound {
            name: alias.to_string(),
        })
    }

    /// Soft lookup; absent aliases yield `None`.
    #[must_use]
    pub fn sort(&self, alias: &str) -> Option<&SortParameter> {
        self.sorts.iter().find(|p| p.external_alias() == alias)
    }

    /// Strict lookup; absent aliases are an error carrying the missing name.
    pub fn fetch_sort(&self, alias: &str) -> Result<&SortParameter, FetchError> {
        self.sort(alias).ok_or_else(|| FetchError::ParameterNotFound {
            name: alias.to_string(),
        })
    }

    #[must_use]
    pub fn filters(&self) -> &[FilterParameter] {
        &self.filters
    }

    /// Sort parameters in application-priority order.
    #[must_use]
    pub fn sorts(&self) -> &[SortParameter] {
        &self.sorts
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.filters.is_empty() && self.sorts.is_empty()
    }
}
