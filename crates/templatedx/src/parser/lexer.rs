//! Expression tokenizer using winnow.
//!
//! Each token kind has its own small combinator; [`tokenize`] skips
//! whitespace between tokens and dispatches on the next character so that
//! errors can name the exact position where lexing failed.

use winnow::ascii::{digit0, digit1};
use winnow::combinator::{alt, opt};
use winnow::prelude::*;
use winnow::token::{any, one_of, take_while};

use super::error::LexError;
use super::token::{Operator, Token, TokenKind};

/// Characters that begin an operator.
const OPERATOR_START: &str = "+-*/%=!<>&|";

/// Tokenize an expression into a sequence terminated by [`TokenKind::Eof`].
pub fn tokenize(source: &str) -> Result<Vec<Token>, LexError> {
    let mut input = source;
    let mut tokens = Vec::new();

    loop {
        skip_whitespace(&mut input);
        let position = char_offset(source, input);
        let Some(next) = input.chars().next() else {
            break;
        };

        let kind = match next {
            '"' | '\'' => string_literal(&mut input)
                .map(TokenKind::String)
                .map_err(|_| LexError::UnterminatedString { position })?,
            '-' if starts_number(&input[1..]) => number(&mut input, position)?,
            c if c.is_ascii_digit() => number(&mut input, position)?,
            c if is_identifier_start(c) => {
                identifier_or_keyword(&mut input).map_err(|_| LexError::UnexpectedCharacter {
                    character: c,
                    position,
                })?
            }
            c => match punctuation(&mut input) {
                Ok(kind) => kind,
                Err(_) if OPERATOR_START.contains(c) => operator(&mut input)
                    .map(TokenKind::Operator)
                    .map_err(|_| LexError::UnknownOperator { position })?,
                Err(_) => {
                    return Err(LexError::UnexpectedCharacter {
                        character: c,
                        position,
                    });
                }
            },
        };
        tokens.push(Token { kind, position });
    }

    tokens.push(Token {
        kind: TokenKind::Eof,
        position: source.chars().count(),
    });
    Ok(tokens)
}

fn skip_whitespace(input: &mut &str) {
    let _: ModalResult<&str> = take_while(0.., char::is_whitespace).parse_next(input);
}

/// Character offset of `remaining` within `original`.
fn char_offset(original: &str, remaining: &str) -> usize {
    original[..original.len() - remaining.len()].chars().count()
}

fn starts_number(rest: &str) -> bool {
    rest.starts_with(|c: char| c.is_ascii_digit())
}

fn is_identifier_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_identifier_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Parse a quoted string, resolving escapes.
fn string_literal(input: &mut &str) -> ModalResult<String> {
    let quote = one_of(['"', '\'']).parse_next(input)?;
    let mut value = String::new();
    loop {
        let c: char = any.parse_next(input)?;
        if c == quote {
            return Ok(value);
        }
        if c == '\\' {
            let escaped: char = any.parse_next(input)?;
            value.push(match escaped {
                'n' => '\n',
                't' => '\t',
                'r' => '\r',
                other => other,
            });
        } else {
            value.push(c);
        }
    }
}

/// Recognize `-?digits(.digits*)?([eE][+-]?digits*)?`.
///
/// The exponent digits are optional here so that `1e` is reported as an
/// invalid number instead of a number followed by an identifier.
fn number_text<'i>(input: &mut &'i str) -> ModalResult<&'i str> {
    (
        opt('-'),
        digit1,
        opt(('.', digit0)),
        opt((one_of(['e', 'E']), opt(one_of(['+', '-'])), digit0)),
    )
        .take()
        .parse_next(input)
}

fn number(input: &mut &str, position: usize) -> Result<TokenKind, LexError> {
    let text = number_text(input).map_err(|_| LexError::InvalidNumber {
        text: input.chars().take(1).collect(),
        position,
    })?;
    let invalid = || LexError::InvalidNumber {
        text: text.to_string(),
        position,
    };

    if text.contains(['.', 'e', 'E']) {
        return text.parse().map(TokenKind::Float).map_err(|_| invalid());
    }
    match text.parse::<i64>() {
        Ok(n) => Ok(TokenKind::Integer(n)),
        // Out of i64 range
        Err(_) => text.parse().map(TokenKind::Float).map_err(|_| invalid()),
    }
}

fn identifier_or_keyword(input: &mut &str) -> ModalResult<TokenKind> {
    let word = (
        one_of(is_identifier_start),
        take_while(0.., is_identifier_continue),
    )
        .take()
        .parse_next(input)?;
    Ok(match word {
        "true" => TokenKind::Boolean(true),
        "false" => TokenKind::Boolean(false),
        "null" | "undefined" => TokenKind::Null,
        name => TokenKind::Identifier(name.to_string()),
    })
}

fn punctuation(input: &mut &str) -> ModalResult<TokenKind> {
    alt((
        '('.value(TokenKind::LeftParen),
        ')'.value(TokenKind::RightParen),
        '['.value(TokenKind::LeftBracket),
        ']'.value(TokenKind::RightBracket),
        '{'.value(TokenKind::LeftBrace),
        '}'.value(TokenKind::RightBrace),
        '.'.value(TokenKind::Dot),
        ','.value(TokenKind::Comma),
        ':'.value(TokenKind::Colon),
    ))
    .parse_next(input)
}

/// Longest match first.
fn operator(input: &mut &str) -> ModalResult<Operator> {
    alt((
        alt((
            "===".value(Operator::StrictEqual),
            "!==".value(Operator::StrictNotEqual),
        )),
        alt((
            "==".value(Operator::Equal),
            "!=".value(Operator::NotEqual),
            ">=".value(Operator::GreaterEqual),
            "<=".value(Operator::LessEqual),
            "&&".value(Operator::And),
            "||".value(Operator::Or),
        )),
        alt((
            '+'.value(Operator::Plus),
            '-'.value(Operator::Minus),
            '*'.value(Operator::Star),
            '/'.value(Operator::Slash),
            '%'.value(Operator::Percent),
            '>'.value(Operator::Greater),
            '<'.value(Operator::Less),
            '!'.value(Operator::Not),
        )),
    ))
    .parse_next(input)
}
