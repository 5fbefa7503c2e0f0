//! Recursive-descent parser.
//!
//! Every nonterminal is a function from `(input, pos)` to a parsed value and
//! the position just past it. Nothing is consumed on failure: callers that
//! want to backtrack simply retry from the position they already hold, and
//! the restartable lexer makes re-reading a position free.

mod expr;
mod formula;
mod types;


use std::rc::Rc;

use crate::ast::expr::Expr;
use crate::ast::logic::{Formula, Term};
use crate::ast::types::{DependentType, RefinementType};
use crate::error::{ParseError, ParseErrorKind};
use crate::lexer::next_token;
use crate::token::{Token, TokenKind};

pub(crate) type ParseResult<T> = Result<T, ParseError>;

/// Whether an alternative may recover from this error by backtracking.
/// Lexical errors never recover: no other production can make sense of a
/// character the lexer rejected.
fn recoverable(err: &ParseError) -> bool {
    !matches!(err.kind, ParseErrorKind::UnknownToken)
}

/// Read one token and insist on its kind. Returns the token and the
/// position just past it.
fn expect(input: &str, pos: usize, kind: TokenKind) -> ParseResult<(Token, usize)> {
    let token = next_token(input, pos)?;
    if token.kind != kind {
        return Err(ParseError::unexpected(
            kind.describe(),
            found_lexeme(&token),
            token.span,
        ));
    }
    let next = token.end();
    Ok((token, next))
}

/// How a token reads in a diagnostic.
fn found_lexeme(token: &Token) -> String {
    if token.kind == TokenKind::Eof {
        "end of input".to_string()
    } else {
        format!("'{}'", token.lexeme)
    }
}

/// Integer literal tokens always hold digits (with an optional sign), so the
/// only way this fails is a literal too large for `i64`.
fn int_value(token: &Token) -> ParseResult<i64> {
    token.lexeme.parse().map_err(|_| {
        ParseError::unexpected(
            "an integer that fits in 64 bits",
            found_lexeme(token),
            token.span,
        )
    })
}

/// Parse a program: a single expression.
pub fn parse(input: &str) -> ParseResult<Rc<Expr>> {
    expr::expr(input, 0).map(|(e, _)| e)
}

pub fn parse_formula(input: &str) -> ParseResult<Rc<Formula>> {
    formula::formula(input, 0).map(|(f, _)| f)
}

pub fn parse_term(input: &str) -> ParseResult<Rc<Term>> {
    formula::term(input, 0).map(|(t, _)| t)
}

pub fn parse_reftype(input: &str) -> ParseResult<RefinementType> {
    types::refinement_type(input, 0).map(|(ty, _)| ty)
}

pub fn parse_deptype(input: &str) -> ParseResult<DependentType> {
    types::dependent_type(input, 0).map(|(ty, _)| ty)
}
