//! Error types for expression evaluation and tree transformation.

use strsim::levenshtein;
use thiserror::Error;

use crate::parser::SyntaxError;

/// An error that occurred while evaluating an expression.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvalError {
    /// The expression text could not be tokenized or parsed.
    #[error("failed to parse expression '{expression}': {source}")]
    Syntax {
        expression: String,
        #[source]
        source: SyntaxError,
    },

    /// Member access to a name beginning with `_`.
    #[error("private attribute access not allowed: '{name}'")]
    PrivateAttribute { name: String },

    /// A call whose callee is not a bare identifier.
    #[error("only calls to registered filters are allowed")]
    NonIdentifierCallee,

    /// A call to a name with no registered filter.
    #[error("unknown filter '{name}'{}", did_you_mean(.suggestions))]
    UnknownFilter {
        name: String,
        suggestions: Vec<String>,
    },

    /// A filter called with no arguments at all.
    #[error("filter '{name}' requires at least one argument")]
    MissingFilterArgument { name: String },

    /// A filter's extra argument was missing or had the wrong type.
    #[error("filter '{filter}': {message}")]
    FilterArgument { filter: String, message: String },

    #[error("division by zero")]
    DivisionByZero,

    #[error("modulo by zero")]
    ModuloByZero,

    /// A binary operator applied to operands it does not support.
    #[error("operator '{operator}' cannot be applied to {left} and {right}")]
    InvalidOperands {
        operator: &'static str,
        left: &'static str,
        right: &'static str,
    },

    /// A unary operator applied to an operand it does not support.
    #[error("operator '{operator}' cannot be applied to {operand}")]
    InvalidOperand {
        operator: &'static str,
        operand: &'static str,
    },
}

impl EvalError {
    /// Shorthand for [`EvalError::FilterArgument`].
    pub fn filter_argument(filter: &str, message: impl Into<String>) -> Self {
        EvalError::FilterArgument {
            filter: filter.to_string(),
            message: message.into(),
        }
    }
}

/// An error that occurred while transforming a node tree.
#[derive(Debug, Error)]
pub enum TransformError {
    /// An expression node failed to evaluate.
    #[error("error evaluating expression '{expression}': {source}")]
    Expression {
        expression: String,
        #[source]
        source: EvalError,
    },

    /// Processing an element failed; wraps the underlying cause.
    #[error("error processing element <{name}>: {source}")]
    Element {
        name: String,
        #[source]
        source: Box<TransformError>,
    },

    /// An attribute expression failed to evaluate.
    #[error("error evaluating attribute '{name}': {source}")]
    Attribute {
        name: String,
        #[source]
        source: EvalError,
    },

    /// A spread attribute on a plugin element.
    #[error("unsupported attribute type in component <{element}>")]
    UnsupportedAttribute { element: String },

    #[error("ForEach expects exactly one child function, found {found}")]
    ForEachChildCount { found: usize },

    #[error("ForEach child must be a function expression such as {{(item) => ...}}")]
    ForEachNotFunction,

    /// A markup body given only as source text, with no parsed children
    /// and no ESTree program.
    #[error("ForEach body markup must be provided as parsed children or an ESTree program")]
    ForEachMarkupBody,

    /// An ESTree node in a ForEach body with no document equivalent.
    #[error("ForEach body contains unsupported {kind} syntax")]
    ForEachUnsupportedSyntax { kind: String },

    #[error("maximum tree depth of {max_depth} exceeded")]
    MaxDepthExceeded { max_depth: usize },

    /// A failure reported by a custom tag plugin.
    #[error("{message}")]
    Plugin { message: String },
}

impl TransformError {
    /// Shorthand for [`TransformError::Plugin`].
    pub fn plugin(message: impl Into<String>) -> Self {
        TransformError::Plugin {
            message: message.into(),
        }
    }

    /// The error underneath any [`TransformError::Element`] wrappers.
    pub fn innermost(&self) -> &TransformError {
        let mut current = self;
        while let TransformError::Element { source, .. } = current {
            current = source.as_ref();
        }
        current
    }

    /// The evaluation error at the root of this failure, if there is one.
    pub fn eval_error(&self) -> Option<&EvalError> {
        match self.innermost() {
            TransformError::Expression { source, .. } | TransformError::Attribute { source, .. } => {
                Some(source)
            }
            _ => None,
        }
    }
}

/// Compute typo suggestions using Levenshtein distance.
///
/// - distance <= 1 for names of at most 3 characters
/// - distance <= 2 for longer names
/// - at most 3 suggestions, closest first
pub fn compute_suggestions(name: &str, available: &[String]) -> Vec<String> {
    let max_distance = if name.chars().count() <= 3 { 1 } else { 2 };
    let mut suggestions: Vec<(usize, &String)> = available
        .iter()
        .filter_map(|candidate| {
            let distance = levenshtein(name, candidate);
            (distance > 0 && distance <= max_distance).then_some((distance, candidate))
        })
        .collect();
    suggestions.sort();
    suggestions
        .into_iter()
        .take(3)
        .map(|(_, candidate)| candidate.clone())
        .collect()
}

fn did_you_mean(suggestions: &[String]) -> String {
    if suggestions.is_empty() {
        String::new()
    } else {
        format!("; did you mean: {}?", suggestions.join(", "))
    }
}
