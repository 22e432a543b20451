use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Raw, untrusted request parameters for filtering and sorting resources.
///
/// # Filtering
/// The `filter` map uses composite keys of the form `<field>_<predicate>`,
/// each mapped to a string or an array of strings:
/// ```json
/// {"name_eq": "Foo", "id_in": ["1", "2"]}
/// ```
/// A key without a recognized predicate suffix is treated as the bare field
/// name with implied equality.
///
/// # Sorting
/// The `sort` parameter is a single comma-separated string. A leading `-` on
/// a token requests descending order:
/// ```text
/// sort=-priority,name
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct RawParams {
    /// Composite filter keys mapped to their raw values.
    #[serde(default)]
    pub filter: BTreeMap<String, FilterValue>,
    /// Comma-separated sort tokens, optional leading `-` per token.
    #[serde(default)]
    pub sort: Option<String>,
}

impl RawParams {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a single raw filter entry under its composite key.
    #[must_use]
    pub fn with_filter(mut self, key: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        self.filter.insert(key.into(), value.into());
        self
    }

    /// Set the raw sort string.
    #[must_use]
    pub fn with_sort(mut self, sort: impl Into<String>) -> Self {
        self.sort = Some(sort.into());
        self
    }
}

/// A raw filter value: either a single string or an array of strings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum FilterValue {
    One(String),
    Many(Vec<String>),
}

impl FilterValue {
    /// Whether the value is empty for presence purposes: an empty string, an
    /// empty array, or an array of blank strings.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::One(v) => v.trim().is_empty(),
            Self::Many(vs) => vs.iter().all(|v| v.trim().is_empty()),
        }
    }

    /// The value as a list, regardless of wire shape.
    #[must_use]
    pub fn values(&self) -> Vec<&str> {
        match self {
            Self::One(v) => vec![v.as_str()],
            Self::Many(vs) => vs.iter().map(String::as_str).collect(),
        }
    }

    /// The value as a single scalar; multi-valued input yields its first
    /// element.
    #[must_use]
    pub fn scalar(&self) -> Option<&str> {
        match self {
            Self::One(v) => Some(v.as_str()),
            Self::Many(vs) => vs.first().map(String::as_str),
        }
    }
}

impl From<&str> for FilterValue {
    fn from(v: &str) -> Self {
        Self::One(v.to_string())
    }
}

impl From<String> for FilterValue {
    fn from(v: String) -> Self {
        Self::One(v)
    }
}

impl From<Vec<String>> for FilterValue {
    fn from(vs: Vec<String>) -> Self {
        Self::Many(vs)
    }
}

impl From<Vec<&str>> for FilterValue {
    fn from(vs: Vec<&str>) -> Self {
        Self::Many(vs.into_iter().map(String::from).collect())
    }
}
