//! AST types for the expression language.

use crate::types::Value;

use super::token::Operator;

/// A parsed expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// A literal value: number, string, boolean or null.
    Literal(Value),

    /// A bare name resolved against the scope.
    Identifier(String),

    /// `object.name` or `object[expr]`.
    Member {
        object: Box<Expr>,
        property: Property,
    },

    /// `callee(arguments...)`. Only bare identifiers naming filters can be
    /// called.
    Call {
        callee: Box<Expr>,
        arguments: Vec<Expr>,
    },

    Binary {
        operator: BinaryOperator,
        left: Box<Expr>,
        right: Box<Expr>,
    },

    Unary {
        operator: UnaryOperator,
        argument: Box<Expr>,
    },

    /// `[a, b, ...]`.
    Array(Vec<Expr>),

    /// `{key: value, ...}` with keys in source order.
    Object(Vec<(String, Expr)>),
}

/// The property part of a member access.
#[derive(Debug, Clone, PartialEq)]
pub enum Property {
    /// `.name`
    Named(String),
    /// `[expr]`
    Computed(Box<Expr>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
    Or,
    And,
    Equal,
    NotEqual,
    StrictEqual,
    StrictNotEqual,
    Less,
    Greater,
    LessEqual,
    GreaterEqual,
    Add,
    Subtract,
    Multiply,
    Divide,
    Remainder,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOperator {
    Not,
    Negate,
    Plus,
}

impl BinaryOperator {
    /// Binding strength; higher binds tighter.
    pub fn precedence(self) -> u8 {
        match self {
            BinaryOperator::Or => 1,
            BinaryOperator::And => 2,
            BinaryOperator::Equal
            | BinaryOperator::NotEqual
            | BinaryOperator::StrictEqual
            | BinaryOperator::StrictNotEqual => 3,
            BinaryOperator::Less
            | BinaryOperator::Greater
            | BinaryOperator::LessEqual
            | BinaryOperator::GreaterEqual => 4,
            BinaryOperator::Add | BinaryOperator::Subtract => 5,
            BinaryOperator::Multiply | BinaryOperator::Divide | BinaryOperator::Remainder => 6,
        }
    }

    pub fn symbol(self) -> &'static str {
        self.operator().symbol()
    }

    /// The binary operator a token stands for, if any.
    pub fn from_operator(operator: Operator) -> Option<BinaryOperator> {
        Some(match operator {
            Operator::Or => BinaryOperator::Or,
            Operator::And => BinaryOperator::And,
            Operator::Equal => BinaryOperator::Equal,
            Operator::NotEqual => BinaryOperator::NotEqual,
            Operator::StrictEqual => BinaryOperator::StrictEqual,
            Operator::StrictNotEqual => BinaryOperator::StrictNotEqual,
            Operator::Less => BinaryOperator::Less,
            Operator::Greater => BinaryOperator::Greater,
            Operator::LessEqual => BinaryOperator::LessEqual,
            Operator::GreaterEqual => BinaryOperator::GreaterEqual,
            Operator::Plus => BinaryOperator::Add,
            Operator::Minus => BinaryOperator::Subtract,
            Operator::Star => BinaryOperator::Multiply,
            Operator::Slash => BinaryOperator::Divide,
            Operator::Percent => BinaryOperator::Remainder,
            Operator::Not => return None,
        })
    }

    fn operator(self) -> Operator {
        match self {
            BinaryOperator::Or => Operator::Or,
            BinaryOperator::And => Operator::And,
            BinaryOperator::Equal => Operator::Equal,
            BinaryOperator::NotEqual => Operator::NotEqual,
            BinaryOperator::StrictEqual => Operator::StrictEqual,
            BinaryOperator::StrictNotEqual => Operator::StrictNotEqual,
            BinaryOperator::Less => Operator::Less,
            BinaryOperator::Greater => Operator::Greater,
            BinaryOperator::LessEqual => Operator::LessEqual,
            BinaryOperator::GreaterEqual => Operator::GreaterEqual,
            BinaryOperator::Add => Operator::Plus,
            BinaryOperator::Subtract => Operator::Minus,
            BinaryOperator::Multiply => Operator::Star,
            BinaryOperator::Divide => Operator::Slash,
            BinaryOperator::Remainder => Operator::Percent,
        }
    }
}

impl UnaryOperator {
    pub fn symbol(self) -> &'static str {
        match self {
            UnaryOperator::Not => "!",
            UnaryOperator::Negate => "-",
            UnaryOperator::Plus => "+",
        }
    }

    pub fn from_operator(operator: Operator) -> Option<UnaryOperator> {
        match operator {
            Operator::Not => Some(UnaryOperator::Not),
            Operator::Minus => Some(UnaryOperator::Negate),
            Operator::Plus => Some(UnaryOperator::Plus),
            _ => None,
        }
    }
}
