//! Expression evaluator.
//!
//! Walks a parsed [`Expr`] against a [`Scope`] and a [`FilterRegistry`].
//! Lookups never fail: unbound names are null and missing members are the
//! empty string. Errors come only from syntax, filter calls, private member
//! access and operator type mismatches.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use tracing::trace;

use crate::interpreter::error::compute_suggestions;
use crate::interpreter::operators::{apply_binary, apply_unary};
use crate::interpreter::{EvalError, FilterRegistry, Scope};
use crate::parser::{BinaryOperator, Expr, Property, SyntaxError, parse_expression};
use crate::types::{Value, ValueMap};

/// Upper bound on cached expressions per cache.
const MAX_CACHED_EXPRESSIONS: usize = 4096;

/// Evaluate an expression string against a scope.
///
/// An empty or all-whitespace expression evaluates to the empty string.
///
/// # Example
///
/// ```
/// use templatedx::{FilterRegistry, Scope, Value, evaluate, props};
///
/// let scope = Scope::new(props! { "count" => 2 }, props! {});
/// let filters = FilterRegistry::from_global();
/// let value = evaluate("count * 3 + 1", &scope, &filters).unwrap();
/// assert_eq!(value, Value::Number(7));
/// ```
pub fn evaluate(
    expression: &str,
    scope: &Scope<'_>,
    filters: &FilterRegistry,
) -> Result<Value, EvalError> {
    Evaluator::new(scope, filters).evaluate(expression)
}

/// Parsed expressions keyed by source text.
///
/// Only successful parses are stored, so a cache hit always yields the same
/// tree a fresh parse would.
#[derive(Debug, Default)]
pub struct ExpressionCache {
    entries: RwLock<HashMap<String, Arc<Expr>>>,
}

impl ExpressionCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse `source`, reusing an earlier result when there is one.
    pub fn parse(&self, source: &str) -> Result<Arc<Expr>, SyntaxError> {
        if let Some(expr) = self
            .entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(source)
        {
            return Ok(Arc::clone(expr));
        }

        let expr = Arc::new(parse_expression(source)?);
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        if entries.len() < MAX_CACHED_EXPRESSIONS {
            entries.insert(source.to_string(), Arc::clone(&expr));
        }
        Ok(expr)
    }

    pub fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

/// Evaluates expressions against one scope and filter registry.
#[derive(Debug, Clone, Copy)]
pub struct Evaluator<'a> {
    scope: &'a Scope<'a>,
    filters: &'a FilterRegistry,
    cache: Option<&'a ExpressionCache>,
}

impl<'a> Evaluator<'a> {
    pub fn new(scope: &'a Scope<'a>, filters: &'a FilterRegistry) -> Self {
        Self {
            scope,
            filters,
            cache: None,
        }
    }

    /// Use `cache` to avoid re-parsing repeated expressions.
    pub fn with_cache(mut self, cache: Option<&'a ExpressionCache>) -> Self {
        self.cache = cache;
        self
    }

    /// Parse and evaluate an expression string.
    pub fn evaluate(&self, expression: &str) -> Result<Value, EvalError> {
        let source = expression.trim();
        if source.is_empty() {
            return Ok(Value::empty());
        }
        trace!(expression = source, "evaluating expression");

        let syntax_error = |source_error| EvalError::Syntax {
            expression: source.to_string(),
            source: source_error,
        };
        match self.cache {
            Some(cache) => {
                let expr = cache.parse(source).map_err(syntax_error)?;
                self.eval(&expr)
            }
            None => {
                let expr = parse_expression(source).map_err(syntax_error)?;
                self.eval(&expr)
            }
        }
    }

    /// Evaluate a parsed expression.
    pub fn eval(&self, expr: &Expr) -> Result<Value, EvalError> {
        match expr {
            Expr::Literal(value) => Ok(value.clone()),
            Expr::Identifier(name) => Ok(self.scope.get(name)),
            Expr::Member { object, property } => self.member(object, property),
            Expr::Call { callee, arguments } => self.call(callee, arguments),
            Expr::Binary {
                operator,
                left,
                right,
            } => self.binary(*operator, left, right),
            Expr::Unary { operator, argument } => apply_unary(*operator, &self.eval(argument)?),
            Expr::Array(elements) => elements.iter().map(|element| self.eval(element)).collect(),
            Expr::Object(entries) => {
                let mut map = ValueMap::with_capacity(entries.len());
                for (key, value) in entries {
                    map.insert(key.clone(), self.eval(value)?);
                }
                Ok(Value::from(map))
            }
        }
    }

    /// Member access. Anything that does not resolve to a non-null value is
    /// the empty string.
    fn member(&self, object: &Expr, property: &Property) -> Result<Value, EvalError> {
        let target = self.eval(object)?;
        if target.is_null() {
            return Ok(Value::empty());
        }
        let key = match property {
            Property::Named(name) => Value::String(name.clone()),
            Property::Computed(index) => self.eval(index)?,
        };
        if let Value::String(name) = &key
            && name.starts_with('_')
        {
            return Err(EvalError::PrivateAttribute { name: name.clone() });
        }

        let found = match (&target, &key) {
            (Value::Map(map), Value::String(name)) => map.get(name),
            (Value::List(items), Value::Number(index)) => {
                usize::try_from(*index).ok().and_then(|i| items.get(i))
            }
            _ => None,
        };
        Ok(match found {
            Some(value) if !value.is_null() => value.clone(),
            _ => Value::empty(),
        })
    }

    /// A filter call. The filter must exist before any argument is evaluated.
    fn call(&self, callee: &Expr, arguments: &[Expr]) -> Result<Value, EvalError> {
        let Expr::Identifier(name) = callee else {
            return Err(EvalError::NonIdentifierCallee);
        };
        let filter = self
            .filters
            .get(name)
            .ok_or_else(|| EvalError::UnknownFilter {
                name: name.clone(),
                suggestions: compute_suggestions(name, &self.filters.names()),
            })?;

        let values = arguments
            .iter()
            .map(|argument| self.eval(argument))
            .collect::<Result<Vec<_>, _>>()?;
        let Some((subject, extra)) = values.split_first() else {
            return Err(EvalError::MissingFilterArgument { name: name.clone() });
        };
        trace!(filter = %name, arguments = extra.len(), "applying filter");
        filter(subject, extra)
    }

    fn binary(
        &self,
        operator: BinaryOperator,
        left: &Expr,
        right: &Expr,
    ) -> Result<Value, EvalError> {
        let left = self.eval(left)?;
        match operator {
            BinaryOperator::And if !left.is_truthy() => Ok(left),
            BinaryOperator::Or if left.is_truthy() => Ok(left),
            BinaryOperator::And | BinaryOperator::Or => self.eval(right),
            _ => apply_binary(operator, &left, &self.eval(right)?),
        }
    }
}
