//! Ordered, pluggable chain of processing stages.
//!
//! A [`Pipeline`] threads a single owned context value through every stage.
//! Each stage receives the context and a [`Next`] continuation; calling
//! `next.run(ctx)` forwards to the rest of the chain, returning without it
//! short-circuits, and returning `Err` aborts the call fatally. Stages share
//! no state beyond the context itself.

use crate::errors::{ConfigError, FetchError};

/// One link in a pipeline over contexts of type `C`.
pub trait Stage<C>: Send + Sync {
    /// Stable name used to locate the stage when splicing user middleware.
    fn name(&self) -> &'static str;

    /// Process the context, optionally forwarding to the rest of the chain.
    ///
    /// # Errors
    /// A fatal condition aborts the whole call; recoverable problems belong
    /// in the context's error list instead.
    fn call(&self, ctx: C, next: Next<'_, C>) -> Result<C, FetchError>;
}

/// Continuation over the remaining stages of a pipeline.
pub struct Next<'a, C> {
    rest: &'a [Box<dyn Stage<C>>],
}

impl<C> Next<'_, C> {
    /// Run the remainder of the chain. With no stages left, the context is
    /// returned unchanged.
    ///
    /// # Errors
    /// Propagates the first fatal error from a downstream stage.
    pub fn run(self, ctx: C) -> Result<C, FetchError> {
        match self.rest.split_first() {
            Some((stage, rest)) => stage.call(ctx, Next { rest }),
            None => Ok(ctx),
        }
    }
}

/// Where to splice a stage relative to the existing chain.
#[derive(Debug, Clone, Copy)]
pub enum Anchor<'a> {
    /// Literal position in the chain.
    Index(usize),
    /// First stage with this name.
    Stage(&'a str),
}

impl From<usize> for Anchor<'_> {
    fn from(index: usize) -> Self {
        Self::Index(index)
    }
}

impl<'a> From<&'a str> for Anchor<'a> {
    fn from(name: &'a str) -> Self {
        Self::Stage(name)
    }
}

/// Ordered chain of stages over contexts of type `C`.
pub struct Pipeline<C> {
    stages: Vec<Box<dyn Stage<C>>>,
}

impl<C> Default for Pipeline<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> Pipeline<C> {
    #[must_use]
    pub fn new() -> Self {
        Self { stages: Vec::new() }
    }

    /// Append a stage to the end of the chain.
    pub fn use_stage<S: Stage<C> + 'static>(&mut self, stage: S) {
        self.stages.push(Box::new(stage));
    }

    /// Insert a stage immediately before the anchored one.
    ///
    /// # Errors
    /// The anchor must name a stage present in the chain or an index no
    /// greater than its length.
    pub fn insert_before<'a, S: Stage<C> + 'static>(
        &mut self,
        anchor: impl Into<Anchor<'a>>,
        stage: S,
    ) -> Result<(), ConfigError> {
        let at = self.locate(anchor.into(), true)?;
        self.stages.insert(at, Box::new(stage));
        Ok(())
    }

    /// Insert a stage immediately after the anchored one.
    ///
    /// # Errors
    /// The anchor must name a stage present in the chain or a valid index.
    pub fn insert_after<'a, S: Stage<C> + 'static>(
        &mut self,
        anchor: impl Into<Anchor<'a>>,
        stage: S,
    ) -> Result<(), ConfigError> {
        let at = self.locate(anchor.into(), false)?;
        self.stages.insert(at + 1, Box::new(stage));
        Ok(())
    }

    fn locate(&self, anchor: Anchor<'_>, allow_end: bool) -> Result<usize, ConfigError> {
        match anchor {
            Anchor::Index(index) => {
                let len = self.stages.len();
                let valid = if allow_end { index <= len } else { index < len };
                if valid {
                    Ok(index)
                } else {
                    Err(ConfigError::IndexOutOfBounds { index, len })
                }
            }
            Anchor::Stage(name) => self
                .stages
                .iter()
                .position(|s| s.name() == name)
                .ok_or_else(|| ConfigError::StageNotFound {
                    name: name.to_string(),
                }),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.stages.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Names of the stages in invocation order.
    #[must_use]
    pub fn stage_names(&self) -> Vec<&'static str> {
        self.stages.iter().map(|s| s.name()).collect()
    }

    /// Run the chain over the given context.
    ///
    /// # Errors
    /// Propagates the first fatal error raised by a stage.
    pub fn call(&self, ctx: C) -> Result<C, FetchError> {
        Next { rest: &self.stages }.run(ctx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Append {
        name: &'static str,
        forward: bool,
    }

    impl Append {
        fn new(name: &'static str) -> Self {
            Self {
                name,
                forward: true,
            }
        }

        fn short_circuit(name: &'static str) -> Self {
            Self {
                name,
                forward: false,
            }
        }
    }

    impl Stage<Vec<&'static str>> for Append {
        fn name(&self) -> &'static str {
            self.name
        }

        fn call(
            &self,
            mut ctx: Vec<&'static str>,
            next: Next<'_, Vec<&'static str>>,
        ) -> Result<Vec<&'static str>, FetchError> {
            ctx.push(self.name);
            if self.forward {
                next.run(ctx)
            } else {
                Ok(ctx)
            }
        }
    }

    #[test]
    fn stages_run_in_insertion_order() {
        let mut pipeline = Pipeline::new();
        pipeline.use_stage(Append::new("a"));
        pipeline.use_stage(Append::new("b"));
        pipeline.use_stage(Append::new("c"));
        assert_eq!(pipeline.call(vec![]).unwrap(), vec!["a", "b", "c"]);
    }

    #[test]
    fn skipping_next_short_circuits_the_rest() {
        let mut pipeline = Pipeline::new();
        pipeline.use_stage(Append::new("a"));
        pipeline.use_stage(Append::short_circuit("stop"));
        pipeline.use_stage(Append::new("never"));
        assert_eq!(pipeline.call(vec![]).unwrap(), vec!["a", "stop"]);
    }

    #[test]
    fn insert_before_by_name_and_index() {
        let mut pipeline = Pipeline::new();
        pipeline.use_stage(Append::new("a"));
        pipeline.use_stage(Append::new("c"));
        pipeline.insert_before("c", Append::new("b")).unwrap();
        pipeline.insert_before(0, Append::new("first")).unwrap();
        assert_eq!(pipeline.stage_names(), vec!["first", "a", "b", "c"]);
    }

    #[test]
    fn insert_after_by_name() {
        let mut pipeline = Pipeline::new();
        pipeline.use_stage(Append::new("a"));
        pipeline.use_stage(Append::new("c"));
        pipeline.insert_after("a", Append::new("b")).unwrap();
        assert_eq!(pipeline.stage_names(), vec!["a", "b", "c"]);
    }

    #[test]
    fn unknown_anchor_is_a_config_error() {
        let mut pipeline: Pipeline<Vec<&'static str>> = Pipeline::new();
        pipeline.use_stage(Append::new("a"));
        let err = pipeline.insert_before("missing", Append::new("b")).unwrap_err();
        assert_eq!(
            err,
            ConfigError::StageNotFound {
                name: "missing".into()
            }
        );
    }

    #[test]
    fn empty_pipeline_returns_context_unchanged() {
        let pipeline: Pipeline<Vec<&'static str>> = Pipeline::new();
        assert_eq!(pipeline.call(vec!["x"]).unwrap(), vec!["x"]);
    }
}
