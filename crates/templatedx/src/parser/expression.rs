//! Recursive-descent parser for expressions.
//!
//! Binary operators are handled by precedence climbing over the levels
//! defined by [`BinaryOperator::precedence`]; everything tighter than a
//! binary operator (unary prefixes, postfix member/index/call chains and
//! primaries) is plain recursive descent.

use crate::types::Value;

use super::ast::{BinaryOperator, Expr, Property, UnaryOperator};
use super::error::{ParseError, SyntaxError};
use super::lexer::tokenize;
use super::token::{Token, TokenKind};

/// Maximum nesting of parentheses, brackets, braces and unary prefixes.
pub const MAX_NESTING: usize = 64;

static EOF: Token = Token {
    kind: TokenKind::Eof,
    position: 0,
};

/// Tokenize and parse an expression string.
pub fn parse_expression(source: &str) -> Result<Expr, SyntaxError> {
    let tokens = tokenize(source)?;
    Ok(parse(&tokens)?)
}

/// Parse a token stream into an expression, consuming every token.
pub fn parse(tokens: &[Token]) -> Result<Expr, ParseError> {
    let mut parser = Parser {
        tokens,
        position: 0,
        depth: 0,
    };
    let expr = parser.expression(0)?;
    let rest = parser.current();
    if rest.kind != TokenKind::Eof {
        return Err(ParseError::TrailingInput {
            found: rest.kind.to_string(),
            position: rest.position,
        });
    }
    Ok(expr)
}

struct Parser<'t> {
    tokens: &'t [Token],
    position: usize,
    depth: usize,
}

impl<'t> Parser<'t> {
    fn current(&self) -> &'t Token {
        self.tokens
            .get(self.position)
            .or_else(|| self.tokens.last())
            .unwrap_or(&EOF)
    }

    /// Returns the current token and moves past it. Never moves past EOF.
    fn advance(&mut self) -> &'t Token {
        let token = self.current();
        if token.kind != TokenKind::Eof {
            self.position += 1;
        }
        token
    }

    /// Consumes the current token if it has the given kind.
    fn eat(&mut self, kind: &TokenKind) -> bool {
        if &self.current().kind == kind {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: &TokenKind, expected: &'static str) -> Result<(), ParseError> {
        if self.eat(kind) {
            return Ok(());
        }
        let token = self.current();
        Err(ParseError::Expected {
            expected,
            found: token.kind.to_string(),
            position: token.position,
        })
    }

    fn enter(&mut self) -> Result<(), ParseError> {
        self.depth += 1;
        if self.depth > MAX_NESTING {
            return Err(ParseError::TooDeep { limit: MAX_NESTING });
        }
        Ok(())
    }

    fn leave(&mut self) {
        self.depth -= 1;
    }

    /// Parses a binary expression whose operators all bind at least as
    /// tightly as `min_precedence`.
    fn expression(&mut self, min_precedence: u8) -> Result<Expr, ParseError> {
        self.enter()?;
        let mut left = self.unary()?;
        while let TokenKind::Operator(op) = self.current().kind {
            let Some(operator) = BinaryOperator::from_operator(op) else {
                break;
            };
            let precedence = operator.precedence();
            if precedence < min_precedence {
                break;
            }
            self.advance();
            let right = self.expression(precedence + 1)?;
            left = Expr::Binary {
                operator,
                left: Box::new(left),
                right: Box::new(right),
            };
        }
        self.leave();
        Ok(left)
    }

    fn unary(&mut self) -> Result<Expr, ParseError> {
        let TokenKind::Operator(op) = self.current().kind else {
            return self.postfix();
        };
        let Some(operator) = UnaryOperator::from_operator(op) else {
            return self.postfix();
        };
        self.advance();
        self.enter()?;
        let argument = self.unary()?;
        self.leave();
        Ok(Expr::Unary {
            operator,
            argument: Box::new(argument),
        })
    }

    fn postfix(&mut self) -> Result<Expr, ParseError> {
        let mut expr = self.primary()?;
        loop {
            match self.current().kind {
                TokenKind::Dot => {
                    self.advance();
                    let token = self.advance();
                    let TokenKind::Identifier(name) = &token.kind else {
                        return Err(ParseError::Expected {
                            expected: "property name",
                            found: token.kind.to_string(),
                            position: token.position,
                        });
                    };
                    expr = Expr::Member {
                        object: Box::new(expr),
                        property: Property::Named(name.clone()),
                    };
                }
                TokenKind::LeftBracket => {
                    self.advance();
                    let index = self.expression(0)?;
                    self.expect(&TokenKind::RightBracket, "']'")?;
                    expr = Expr::Member {
                        object: Box::new(expr),
                        property: Property::Computed(Box::new(index)),
                    };
                }
                TokenKind::LeftParen => {
                    self.advance();
                    let arguments = self.arguments()?;
                    expr = Expr::Call {
                        callee: Box::new(expr),
                        arguments,
                    };
                }
                _ => return Ok(expr),
            }
        }
    }

    /// Parses call arguments after the opening parenthesis.
    fn arguments(&mut self) -> Result<Vec<Expr>, ParseError> {
        let mut arguments = Vec::new();
        if self.eat(&TokenKind::RightParen) {
            return Ok(arguments);
        }
        loop {
            arguments.push(self.expression(0)?);
            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }
        self.expect(&TokenKind::RightParen, "')'")?;
        Ok(arguments)
    }

    fn primary(&mut self) -> Result<Expr, ParseError> {
        let token = self.advance();
        match &token.kind {
            TokenKind::Integer(n) => Ok(Expr::Literal(Value::Number(*n))),
            TokenKind::Float(n) => Ok(Expr::Literal(Value::Float(*n))),
            TokenKind::String(s) => Ok(Expr::Literal(Value::String(s.clone()))),
            TokenKind::Boolean(b) => Ok(Expr::Literal(Value::Bool(*b))),
            TokenKind::Null => Ok(Expr::Literal(Value::Null)),
            TokenKind::Identifier(name) => Ok(Expr::Identifier(name.clone())),
            TokenKind::LeftParen => {
                let inner = self.expression(0)?;
                self.expect(&TokenKind::RightParen, "')'")?;
                Ok(inner)
            }
            TokenKind::LeftBracket => self.array(),
            TokenKind::LeftBrace => self.object(),
            other => Err(ParseError::UnexpectedToken {
                found: other.to_string(),
                position: token.position,
            }),
        }
    }

    /// Parses array elements after `[`. A trailing comma is allowed.
    fn array(&mut self) -> Result<Expr, ParseError> {
        self.enter()?;
        let mut elements = Vec::new();
        while !self.eat(&TokenKind::RightBracket) {
            elements.push(self.expression(0)?);
            if !self.eat(&TokenKind::Comma) {
                self.expect(&TokenKind::RightBracket, "']'")?;
                break;
            }
        }
        self.leave();
        Ok(Expr::Array(elements))
    }

    /// Parses object entries after `{`. A trailing comma is allowed.
    fn object(&mut self) -> Result<Expr, ParseError> {
        self.enter()?;
        let mut entries = Vec::new();
        while !self.eat(&TokenKind::RightBrace) {
            let token = self.advance();
            let key = match &token.kind {
                TokenKind::Identifier(name) | TokenKind::String(name) => name.clone(),
                other => {
                    return Err(ParseError::Expected {
                        expected: "property key",
                        found: other.to_string(),
                        position: token.position,
                    });
                }
            };
            self.expect(&TokenKind::Colon, "':'")?;
            entries.push((key, self.expression(0)?));
            if !self.eat(&TokenKind::Comma) {
                self.expect(&TokenKind::RightBrace, "'}'")?;
                break;
            }
        }
        self.leave();
        Ok(Expr::Object(entries))
    }
}
