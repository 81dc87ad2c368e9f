//! Expression lexer and parser.
//!
//! Expressions are the small JavaScript-like language embedded in `{...}`
//! nodes and attribute values. The lexer produces [`Token`]s and the parser
//! builds an [`Expr`] tree for the evaluator.

pub mod ast;
pub mod error;
mod expression;
mod lexer;
mod token;

pub use ast::{BinaryOperator, Expr, Property, UnaryOperator};
pub use error::{LexError, ParseError, SyntaxError};
pub use expression::{MAX_NESTING, parse, parse_expression};
pub use lexer::tokenize;
pub use token::{Operator, Token, TokenKind};
