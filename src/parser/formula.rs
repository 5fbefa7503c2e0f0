//! Grammar of logic terms and formulas.
//!
//! Precedence, loosest first: `=>`, `\/`, `/\`, `not`, comparisons; terms
//! have the usual `+ -` over `* /` split. All binary operators associate to
//! the left.

use std::rc::Rc;

use super::{expect, found_lexeme, int_value, ParseResult};
use crate::ast::logic::{Formula, Term};
use crate::error::ParseError;
use crate::lexer::next_token;
use crate::token::TokenKind;

pub(super) fn term(input: &str, pos: usize) -> ParseResult<(Rc<Term>, usize)> {
    additive_term(input, pos)
}

fn primary_term(input: &str, pos: usize) -> ParseResult<(Rc<Term>, usize)> {
    let token = next_token(input, pos)?;
    match token.kind {
        TokenKind::Ident => Ok((Rc::new(Term::Var(token.lexeme.clone())), token.end())),
        TokenKind::Int => {
            let n = int_value(&token)?;
            Ok((Rc::new(Term::Int(n)), token.end()))
        }
        TokenKind::LParen => {
            let (inner, pos) = term(input, token.end())?;
            let (_, pos) = expect(input, pos, TokenKind::RParen)?;
            Ok((inner, pos))
        }
        TokenKind::Prob => {
            let (_, pos) = expect(input, token.end(), TokenKind::LParen)?;
            let (inner, pos) = formula(input, pos)?;
            let (_, pos) = expect(input, pos, TokenKind::RParen)?;
            Ok((Rc::new(Term::Prob(inner)), pos))
        }
        _ => Err(ParseError::unexpected(
            "a term",
            found_lexeme(&token),
            token.span,
        )),
    }
}

fn multive_term(input: &str, pos: usize) -> ParseResult<(Rc<Term>, usize)> {
    let (mut acc, mut pos) = primary_term(input, pos)?;
    loop {
        let op = next_token(input, pos)?;
        if op.kind != TokenKind::Star && op.kind != TokenKind::Slash {
            break;
        }
        let (rhs, next) = primary_term(input, op.end())?;
        acc = match op.kind {
            TokenKind::Star => Rc::new(Term::Mul(acc, rhs)),
            _ => Rc::new(Term::Div(acc, rhs)),
        };
        pos = next;
    }
    Ok((acc, pos))
}

fn additive_term(input: &str, pos: usize) -> ParseResult<(Rc<Term>, usize)> {
    let (mut acc, mut pos) = multive_term(input, pos)?;
    loop {
        let op = next_token(input, pos)?;
        if op.kind != TokenKind::Plus && op.kind != TokenKind::Minus {
            break;
        }
        let (rhs, next) = multive_term(input, op.end())?;
        acc = match op.kind {
            TokenKind::Plus => Rc::new(Term::Add(acc, rhs)),
            _ => Rc::new(Term::Sub(acc, rhs)),
        };
        pos = next;
    }
    Ok((acc, pos))
}

pub(super) fn formula(input: &str, pos: usize) -> ParseResult<(Rc<Formula>, usize)> {
    impl_formula(input, pos)
}

fn comparison_formula(input: &str, pos: usize) -> ParseResult<(Rc<Formula>, usize)> {
    let (lhs, pos) = term(input, pos)?;
    let op = next_token(input, pos)?;
    let build: fn(Rc<Term>, Rc<Term>) -> Formula = match op.kind {
        TokenKind::Eq => Formula::Eq,
        TokenKind::Less => Formula::Lt,
        TokenKind::Leq => Formula::Leq,
        TokenKind::Geq => Formula::Geq,
        TokenKind::Greater => Formula::Gt,
        _ => {
            return Err(ParseError::unexpected(
                "a comparison operator",
                found_lexeme(&op),
                op.span,
            ))
        }
    };
    let (rhs, pos) = term(input, op.end())?;
    Ok((Rc::new(build(lhs, rhs)), pos))
}

fn primary_formula(input: &str, pos: usize) -> ParseResult<(Rc<Formula>, usize)> {
    let token = next_token(input, pos)?;
    match token.kind {
        TokenKind::True => Ok((Rc::new(Formula::Top), token.end())),
        TokenKind::False => Ok((Rc::new(Formula::Bot), token.end())),
        TokenKind::LParen => {
            let (inner, pos) = formula(input, token.end())?;
            let (_, pos) = expect(input, pos, TokenKind::RParen)?;
            Ok((inner, pos))
        }
        _ => {
            // A comparison over terms, or failing that a bare formula
            // variable.
            match comparison_formula(input, pos) {
                Ok(parsed) => return Ok(parsed),
                Err(err) if !super::recoverable(&err) => return Err(err),
                Err(_) => {}
            }
            if token.kind == TokenKind::Ident {
                return Ok((Rc::new(Formula::Var(token.lexeme.clone())), token.end()));
            }
            Err(ParseError::unexpected(
                "a formula",
                found_lexeme(&token),
                token.span,
            ))
        }
    }
}

fn neg_formula(input: &str, pos: usize) -> ParseResult<(Rc<Formula>, usize)> {
    let token = next_token(input, pos)?;
    if token.kind != TokenKind::Not {
        return primary_formula(input, pos);
    }
    let (inner, pos) = neg_formula(input, token.end())?;
    Ok((Rc::new(Formula::Neg(inner)), pos))
}

fn and_formula(input: &str, pos: usize) -> ParseResult<(Rc<Formula>, usize)> {
    let (mut acc, mut pos) = neg_formula(input, pos)?;
    loop {
        let op = next_token(input, pos)?;
        if op.kind != TokenKind::And {
            break;
        }
        let (rhs, next) = neg_formula(input, op.end())?;
        acc = Rc::new(Formula::And(acc, rhs));
        pos = next;
    }
    Ok((acc, pos))
}

fn or_formula(input: &str, pos: usize) -> ParseResult<(Rc<Formula>, usize)> {
    let (mut acc, mut pos) = and_formula(input, pos)?;
    loop {
        let op = next_token(input, pos)?;
        if op.kind != TokenKind::Or {
            break;
        }
        let (rhs, next) = and_formula(input, op.end())?;
        acc = Rc::new(Formula::Or(acc, rhs));
        pos = next;
    }
    Ok((acc, pos))
}

fn impl_formula(input: &str, pos: usize) -> ParseResult<(Rc<Formula>, usize)> {
    let (mut acc, mut pos) = or_formula(input, pos)?;
    loop {
        let op = next_token(input, pos)?;
        if op.kind != TokenKind::FatArrow {
            break;
        }
        let (rhs, next) = or_formula(input, op.end())?;
        acc = Rc::new(Formula::Impl(acc, rhs));
        pos = next;
    }
    Ok((acc, pos))
}
