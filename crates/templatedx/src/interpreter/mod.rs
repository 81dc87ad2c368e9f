//! Expression evaluation and tree transformation.
//!
//! This module provides the evaluator that runs parsed expressions against
//! a [`Scope`], the registries of filters and tag plugins, and the
//! [`NodeTransformer`] that rewrites document trees. [`Engine`] ties them
//! together.

mod builtins;
mod context;
mod engine;
mod error;
mod evaluator;
mod filters;
mod operators;
mod scope;
mod tags;
mod transformer;

pub(crate) use builtins::builtin_filters;
pub use context::{NodeHelpers, PluginContext};
pub use engine::{Engine, transform_tree};
pub use error::{EvalError, TransformError, compute_suggestions};
pub use evaluator::{Evaluator, ExpressionCache, evaluate};
pub use filters::{FilterFn, FilterRegistry};
pub use scope::Scope;
pub use tags::{Props, TagPlugin, TagRegistry};
pub use transformer::{DEFAULT_MAX_DEPTH, NodeTransformer, Transformed};
