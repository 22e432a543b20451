//! Declarative filter/sort parameter pipelines for query APIs.
//!
//! Declare, per resource, which query-string filters and sort keys are
//! legal; `fetchcrate` converts untrusted request parameters into validated,
//! typed operations and applies them to a queryable collection — a Sea-ORM
//! select out of the box, or anything implementing [`Queryable`].

pub mod definition;
pub mod errors;
pub mod fetcher;
pub mod models;
pub mod parameter;
pub mod params;
pub mod pipeline;
pub mod queryable;
pub mod seaorm;
pub mod stages;

pub use definition::{FilterDefinition, Predicate, Rule, SortDefinition};
pub use errors::{ConfigError, FetchError, ParamError};
pub use fetcher::{ConfigBuilder, FetchResult, Fetcher, FetcherConfig};
pub use models::{FilterValue, RawParams};
pub use parameter::{Binding, Direction, FilterParameter, SortParameter};
pub use params::ParameterSet;
pub use pipeline::{Anchor, Next, Pipeline, Stage};
pub use queryable::{Queryable, ResourceProvider};
pub use seaorm::EntityProvider;
pub use stages::validate::UnknownPolicy;
pub use stages::{ParamContext, QueryContext};
