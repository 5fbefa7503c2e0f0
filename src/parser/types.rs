//! Grammar of refinement and dependent types.

use super::formula::formula;
use super::{expect, found_lexeme, ParseResult};
use crate::ast::types::{DependentType, Domain, RefinementType, ANON_BINDER};
use crate::error::ParseError;
use crate::lexer::next_token;
use crate::token::TokenKind;

/// `int` or `bool`, written as plain identifiers.
fn domain(input: &str, pos: usize) -> ParseResult<(Domain, usize)> {
    let (token, pos) = expect(input, pos, TokenKind::Ident)?;
    match token.lexeme.as_str() {
        "int" => Ok((Domain::Int, pos)),
        "bool" => Ok((Domain::Bool, pos)),
        _ => Err(ParseError::unexpected(
            "'int' or 'bool'",
            found_lexeme(&token),
            token.span,
        )),
    }
}

// {x:int|phi}
fn refinement_type_full(input: &str, pos: usize) -> ParseResult<(RefinementType, usize)> {
    let (_, pos) = expect(input, pos, TokenKind::LBrace)?;
    let (name_token, pos) = expect(input, pos, TokenKind::Ident)?;
    let (_, pos) = expect(input, pos, TokenKind::Colon)?;
    let (dom, pos) = domain(input, pos)?;
    let (_, pos) = expect(input, pos, TokenKind::Bar)?;
    let (constraint, pos) = formula(input, pos)?;
    let (_, pos) = expect(input, pos, TokenKind::RBrace)?;
    Ok((
        RefinementType::new(name_token.lexeme, dom, constraint),
        pos,
    ))
}

// Abbreviations with a trivially true constraint:
//   x:int  for {x:int|true}
//   int    for {@blah:int|true}
fn refinement_type_abbreviation(input: &str, pos: usize) -> ParseResult<(RefinementType, usize)> {
    match domain(input, pos) {
        Ok((dom, next)) => return Ok((RefinementType::unconstrained(ANON_BINDER, dom), next)),
        Err(err) if !super::recoverable(&err) => return Err(err),
        Err(_) => {}
    }
    let (name_token, next) = expect(input, pos, TokenKind::Ident)?;
    let (_, next) = expect(input, next, TokenKind::Colon)?;
    let (dom, next) = domain(input, next)?;
    Ok((RefinementType::unconstrained(name_token.lexeme, dom), next))
}

pub(super) fn refinement_type(input: &str, pos: usize) -> ParseResult<(RefinementType, usize)> {
    match refinement_type_full(input, pos) {
        Ok(parsed) => Ok(parsed),
        Err(err) if !super::recoverable(&err) => Err(err),
        Err(_) => refinement_type_abbreviation(input, pos),
    }
}

// ({n:int|phi}, {b:bool|psi}) -> {x:int|chi}
// {n:int|phi} -> {x:int|chi}
pub(super) fn dependent_type(input: &str, pos: usize) -> ParseResult<(DependentType, usize)> {
    let token = next_token(input, pos)?;
    let mut args = Vec::new();
    let mut pos = pos;
    if token.kind == TokenKind::LParen {
        let (arg, next) = refinement_type(input, token.end())?;
        args.push(arg);
        pos = next;
        loop {
            if next_token(input, pos)?.kind != TokenKind::Comma {
                break;
            }
            let (_, next) = expect(input, pos, TokenKind::Comma)?;
            let (arg, next) = refinement_type(input, next)?;
            args.push(arg);
            pos = next;
        }
        let (_, next) = expect(input, pos, TokenKind::RParen)?;
        pos = next;
    } else {
        let (arg, next) = refinement_type(input, pos)?;
        args.push(arg);
        pos = next;
    }
    let (_, pos) = expect(input, pos, TokenKind::Arrow)?;
    let (ret, pos) = refinement_type(input, pos)?;
    Ok((DependentType { args, ret }, pos))
}
