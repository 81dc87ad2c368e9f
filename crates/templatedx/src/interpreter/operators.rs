//! Arithmetic, comparison and unary operator semantics.
//!
//! Integer arithmetic stays integral until it overflows, then falls back to
//! floating point. Division always produces a float.

use std::cmp::Ordering;
use std::sync::Arc;

use crate::interpreter::EvalError;
use crate::parser::{BinaryOperator, UnaryOperator};
use crate::types::Value;

/// Apply a non-short-circuiting binary operator to evaluated operands.
pub(crate) fn apply_binary(
    operator: BinaryOperator,
    left: &Value,
    right: &Value,
) -> Result<Value, EvalError> {
    match operator {
        BinaryOperator::Add => add(left, right),
        BinaryOperator::Subtract => {
            arithmetic(operator, left, right, i64::checked_sub, |a, b| a - b)
        }
        BinaryOperator::Multiply => {
            arithmetic(operator, left, right, i64::checked_mul, |a, b| a * b)
        }
        BinaryOperator::Divide => divide(left, right),
        BinaryOperator::Remainder => remainder(left, right),
        BinaryOperator::Equal | BinaryOperator::StrictEqual => Ok(Value::Bool(left == right)),
        BinaryOperator::NotEqual | BinaryOperator::StrictNotEqual => Ok(Value::Bool(left != right)),
        BinaryOperator::Less => compare(operator, left, right, Ordering::is_lt),
        BinaryOperator::Greater => compare(operator, left, right, Ordering::is_gt),
        BinaryOperator::LessEqual => compare(operator, left, right, Ordering::is_le),
        BinaryOperator::GreaterEqual => compare(operator, left, right, Ordering::is_ge),
        // The evaluator short-circuits these before reaching here.
        BinaryOperator::And => Ok(if left.is_truthy() { right.clone() } else { left.clone() }),
        BinaryOperator::Or => Ok(if left.is_truthy() { left.clone() } else { right.clone() }),
    }
}

pub(crate) fn apply_unary(operator: UnaryOperator, operand: &Value) -> Result<Value, EvalError> {
    match (operator, operand) {
        (UnaryOperator::Not, value) => Ok(Value::Bool(!value.is_truthy())),
        (UnaryOperator::Negate, Value::Number(n)) => {
            Ok(n.checked_neg().map_or(Value::Float(-(*n as f64)), Value::Number))
        }
        (UnaryOperator::Negate, Value::Float(n)) => Ok(Value::Float(-n)),
        (UnaryOperator::Plus, Value::Number(_) | Value::Float(_)) => Ok(operand.clone()),
        (UnaryOperator::Negate | UnaryOperator::Plus, value) => Err(EvalError::InvalidOperand {
            operator: operator.symbol(),
            operand: value.type_name(),
        }),
    }
}

/// A number operand, integral or floating.
#[derive(Clone, Copy)]
enum Numeric {
    Integer(i64),
    Float(f64),
}

impl Numeric {
    fn of(value: &Value) -> Option<Numeric> {
        match value {
            Value::Number(n) => Some(Numeric::Integer(*n)),
            Value::Float(n) => Some(Numeric::Float(*n)),
            _ => None,
        }
    }

    fn to_f64(self) -> f64 {
        match self {
            Numeric::Integer(n) => n as f64,
            Numeric::Float(n) => n,
        }
    }

    fn is_zero(self) -> bool {
        match self {
            Numeric::Integer(n) => n == 0,
            Numeric::Float(n) => n == 0.0,
        }
    }
}

fn operands(
    operator: BinaryOperator,
    left: &Value,
    right: &Value,
) -> Result<(Numeric, Numeric), EvalError> {
    match (Numeric::of(left), Numeric::of(right)) {
        (Some(a), Some(b)) => Ok((a, b)),
        _ => Err(invalid(operator, left, right)),
    }
}

fn invalid(operator: BinaryOperator, left: &Value, right: &Value) -> EvalError {
    EvalError::InvalidOperands {
        operator: operator.symbol(),
        left: left.type_name(),
        right: right.type_name(),
    }
}

fn arithmetic(
    operator: BinaryOperator,
    left: &Value,
    right: &Value,
    integer_op: fn(i64, i64) -> Option<i64>,
    float_op: fn(f64, f64) -> f64,
) -> Result<Value, EvalError> {
    let (a, b) = operands(operator, left, right)?;
    if let (Numeric::Integer(x), Numeric::Integer(y)) = (a, b)
        && let Some(result) = integer_op(x, y)
    {
        return Ok(Value::Number(result));
    }
    Ok(Value::Float(float_op(a.to_f64(), b.to_f64())))
}

/// `+` concatenates when either side is a string, joins two lists, and
/// otherwise adds numbers.
fn add(left: &Value, right: &Value) -> Result<Value, EvalError> {
    match (left, right) {
        (Value::String(_), _) | (_, Value::String(_)) => {
            Ok(Value::String(format!("{left}{right}")))
        }
        (Value::List(a), Value::List(b)) => {
            let mut items = Vec::with_capacity(a.len() + b.len());
            items.extend(a.iter().cloned());
            items.extend(b.iter().cloned());
            Ok(Value::List(Arc::new(items)))
        }
        _ => arithmetic(BinaryOperator::Add, left, right, i64::checked_add, |a, b| a + b),
    }
}

fn divide(left: &Value, right: &Value) -> Result<Value, EvalError> {
    let (a, b) = operands(BinaryOperator::Divide, left, right)?;
    if b.is_zero() {
        return Err(EvalError::DivisionByZero);
    }
    Ok(Value::Float(a.to_f64() / b.to_f64()))
}

/// Floored remainder: a non-zero result takes the sign of the divisor.
fn remainder(left: &Value, right: &Value) -> Result<Value, EvalError> {
    let (a, b) = operands(BinaryOperator::Remainder, left, right)?;
    if b.is_zero() {
        return Err(EvalError::ModuloByZero);
    }
    if let (Numeric::Integer(x), Numeric::Integer(y)) = (a, b)
        && let Some(result) = x.checked_rem(y)
    {
        let floored = if result != 0 && (result < 0) != (y < 0) {
            result + y
        } else {
            result
        };
        return Ok(Value::Number(floored));
    }
    let (x, y) = (a.to_f64(), b.to_f64());
    let result = x % y;
    if result != 0.0 && (result < 0.0) != (y < 0.0) {
        return Ok(Value::Float(result + y));
    }
    Ok(Value::Float(result))
}

fn compare(
    operator: BinaryOperator,
    left: &Value,
    right: &Value,
    accept: fn(Ordering) -> bool,
) -> Result<Value, EvalError> {
    let ordering = match (left, right) {
        (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
        (Value::Number(a), Value::Number(b)) => Some(a.cmp(b)),
        _ => {
            let (a, b) = operands(operator, left, right)?;
            a.to_f64().partial_cmp(&b.to_f64())
        }
    };
    // NaN compares false under every operator.
    Ok(Value::Bool(ordering.is_some_and(accept)))
}
