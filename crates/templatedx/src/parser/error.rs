//! Lexer and parser error types for expressions.

use thiserror::Error;

/// An error that occurred while tokenizing an expression.
///
/// Positions are character offsets into the expression source.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexError {
    #[error("unexpected character '{character}' at position {position}")]
    UnexpectedCharacter { character: char, position: usize },

    #[error("unknown operator at position {position}")]
    UnknownOperator { position: usize },

    #[error("unterminated string starting at position {position}")]
    UnterminatedString { position: usize },

    #[error("invalid number '{text}' at position {position}")]
    InvalidNumber { text: String, position: usize },
}

/// An error that occurred while parsing a token stream.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// A token that cannot start an expression.
    #[error("unexpected {found} at position {position}")]
    UnexpectedToken { found: String, position: usize },

    /// A specific token was required.
    #[error("expected {expected}, found {found} at position {position}")]
    Expected {
        expected: &'static str,
        found: String,
        position: usize,
    },

    /// Tokens remain after a complete expression.
    #[error("unexpected {found} after end of expression at position {position}")]
    TrailingInput { found: String, position: usize },

    /// Parenthesized, bracketed or unary nesting is too deep.
    #[error("expression nesting exceeds {limit} levels")]
    TooDeep { limit: usize },
}

/// Either kind of syntax error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyntaxError {
    #[error(transparent)]
    Lex(#[from] LexError),

    #[error(transparent)]
    Parse(#[from] ParseError),
}
