//! Grammar of surface expressions.
//!
//! Precedence, loosest first: `|`, `&`, the comparisons `== != <= >=`,
//! `+ -`, `* /`, application, ascription `:`, `not`, primaries. Application
//! binds tighter than arithmetic, and ascription tighter than application,
//! so ascribed subterms can be application operands.

use std::rc::Rc;

use super::types::refinement_type;
use super::{expect, found_lexeme, int_value, ParseResult};
use crate::ast::expr::{BinOpKind, Expr};
use crate::error::ParseError;
use crate::lexer::next_token;
use crate::token::TokenKind;

pub(super) fn expr(input: &str, pos: usize) -> ParseResult<(Rc<Expr>, usize)> {
    let token = next_token(input, pos)?;
    match token.kind {
        TokenKind::Let => let_expr(input, pos),
        TokenKind::LetFun => letfun_expr(input, pos),
        TokenKind::If => if_expr(input, pos),
        _ => or_expr(input, pos),
    }
}

// let [ident] = [expr] in [expr]
fn let_expr(input: &str, pos: usize) -> ParseResult<(Rc<Expr>, usize)> {
    let (_, pos) = expect(input, pos, TokenKind::Let)?;
    let (name_token, pos) = expect(input, pos, TokenKind::Ident)?;
    let (_, pos) = expect(input, pos, TokenKind::Eq)?;
    let (init, pos) = expr(input, pos)?;
    let (_, pos) = expect(input, pos, TokenKind::In)?;
    let (body, pos) = expr(input, pos)?;
    Ok((
        Rc::new(Expr::Let {
            name: name_token.lexeme,
            init,
            body,
        }),
        pos,
    ))
}

// letfun [ident] [deptype] = [expr] in [expr]
fn letfun_expr(input: &str, pos: usize) -> ParseResult<(Rc<Expr>, usize)> {
    let (_, pos) = expect(input, pos, TokenKind::LetFun)?;
    let (name_token, pos) = expect(input, pos, TokenKind::Ident)?;
    let (ty, pos) = super::types::dependent_type(input, pos)?;
    let (_, pos) = expect(input, pos, TokenKind::Eq)?;
    let (init, pos) = expr(input, pos)?;
    let (_, pos) = expect(input, pos, TokenKind::In)?;
    let (body, pos) = expr(input, pos)?;
    Ok((
        Rc::new(Expr::LetFun {
            name: name_token.lexeme,
            ty,
            init,
            body,
        }),
        pos,
    ))
}

// if [expr] then [expr] else [expr]
fn if_expr(input: &str, pos: usize) -> ParseResult<(Rc<Expr>, usize)> {
    let (_, pos) = expect(input, pos, TokenKind::If)?;
    let (cond, pos) = expr(input, pos)?;
    let (_, pos) = expect(input, pos, TokenKind::Then)?;
    let (then, pos) = expr(input, pos)?;
    let (_, pos) = expect(input, pos, TokenKind::Else)?;
    let (els, pos) = expr(input, pos)?;
    Ok((Rc::new(Expr::If { cond, then, els }), pos))
}

fn primary_expr(input: &str, pos: usize) -> ParseResult<(Rc<Expr>, usize)> {
    let token = next_token(input, pos)?;
    match token.kind {
        TokenKind::Int => {
            let n = int_value(&token)?;
            Ok((Rc::new(Expr::Int(n)), token.end()))
        }
        TokenKind::True => Ok((Rc::new(Expr::Bool(true)), token.end())),
        TokenKind::False => Ok((Rc::new(Expr::Bool(false)), token.end())),
        TokenKind::Ident => Ok((Rc::new(Expr::Var(token.lexeme.clone())), token.end())),
        TokenKind::Rand => {
            let (_, pos) = expect(input, token.end(), TokenKind::LParen)?;
            let (start_token, pos) = expect(input, pos, TokenKind::Int)?;
            let (_, pos) = expect(input, pos, TokenKind::Comma)?;
            let (end_token, pos) = expect(input, pos, TokenKind::Int)?;
            let (_, pos) = expect(input, pos, TokenKind::RParen)?;
            Ok((
                Rc::new(Expr::Rand {
                    start: int_value(&start_token)?,
                    end: int_value(&end_token)?,
                }),
                pos,
            ))
        }
        TokenKind::LParen => {
            let (inner, pos) = expr(input, token.end())?;
            let (_, pos) = expect(input, pos, TokenKind::RParen)?;
            Ok((inner, pos))
        }
        _ => Err(ParseError::unexpected(
            "a number, boolean, identifier, 'rand', or '('",
            found_lexeme(&token),
            token.span,
        )),
    }
}

fn neg_expr(input: &str, pos: usize) -> ParseResult<(Rc<Expr>, usize)> {
    let token = next_token(input, pos)?;
    if token.kind != TokenKind::Not {
        return primary_expr(input, pos);
    }
    let (inner, pos) = neg_expr(input, token.end())?;
    Ok((Rc::new(Expr::Neg(inner)), pos))
}

// [neg] (':' [reftype])?
fn typed_expr(input: &str, pos: usize) -> ParseResult<(Rc<Expr>, usize)> {
    let (e, pos) = neg_expr(input, pos)?;
    let token = next_token(input, pos)?;
    if token.kind != TokenKind::Colon {
        return Ok((e, pos));
    }
    let (ty, pos) = refinement_type(input, token.end())?;
    Ok((Rc::new(Expr::Typed { expr: e, ty }), pos))
}

// Leftmost-function application: [typed] [typed]*
fn app_expr(input: &str, pos: usize) -> ParseResult<(Rc<Expr>, usize)> {
    let (f, mut pos) = typed_expr(input, pos)?;
    let mut args = Vec::new();
    loop {
        match typed_expr(input, pos) {
            Ok((arg, next)) => {
                args.push(arg);
                pos = next;
            }
            Err(err) if !super::recoverable(&err) => return Err(err),
            Err(_) => break,
        }
    }
    if args.is_empty() {
        Ok((f, pos))
    } else {
        Ok((Rc::new(Expr::App { f, args }), pos))
    }
}

fn multive_expr(input: &str, pos: usize) -> ParseResult<(Rc<Expr>, usize)> {
    let (mut acc, mut pos) = app_expr(input, pos)?;
    loop {
        let op = next_token(input, pos)?;
        let kind = match op.kind {
            TokenKind::Star => BinOpKind::Mul,
            TokenKind::Slash => BinOpKind::Div,
            _ => break,
        };
        let (rhs, next) = app_expr(input, op.end())?;
        acc = Expr::binop(kind, acc, rhs);
        pos = next;
    }
    Ok((acc, pos))
}

fn additive_expr(input: &str, pos: usize) -> ParseResult<(Rc<Expr>, usize)> {
    let (mut acc, mut pos) = multive_expr(input, pos)?;
    loop {
        let op = next_token(input, pos)?;
        let kind = match op.kind {
            TokenKind::Plus => BinOpKind::Add,
            TokenKind::Minus => BinOpKind::Sub,
            _ => break,
        };
        let (rhs, next) = multive_expr(input, op.end())?;
        acc = Expr::binop(kind, acc, rhs);
        pos = next;
    }
    Ok((acc, pos))
}

fn equiv_expr(input: &str, pos: usize) -> ParseResult<(Rc<Expr>, usize)> {
    let (mut acc, mut pos) = additive_expr(input, pos)?;
    loop {
        let op = next_token(input, pos)?;
        let kind = match op.kind {
            TokenKind::DoubleEq => BinOpKind::Eq,
            TokenKind::Neq => BinOpKind::Neq,
            TokenKind::Leq => BinOpKind::Leq,
            TokenKind::Geq => BinOpKind::Geq,
            _ => break,
        };
        let (rhs, next) = additive_expr(input, op.end())?;
        acc = Expr::binop(kind, acc, rhs);
        pos = next;
    }
    Ok((acc, pos))
}

fn and_expr(input: &str, pos: usize) -> ParseResult<(Rc<Expr>, usize)> {
    let (mut acc, mut pos) = equiv_expr(input, pos)?;
    loop {
        let op = next_token(input, pos)?;
        if op.kind != TokenKind::Amp {
            break;
        }
        let (rhs, next) = equiv_expr(input, op.end())?;
        acc = Expr::binop(BinOpKind::And, acc, rhs);
        pos = next;
    }
    Ok((acc, pos))
}

fn or_expr(input: &str, pos: usize) -> ParseResult<(Rc<Expr>, usize)> {
    let (mut acc, mut pos) = and_expr(input, pos)?;
    loop {
        let op = next_token(input, pos)?;
        if op.kind != TokenKind::Bar {
            break;
        }
        let (rhs, next) = and_expr(input, op.end())?;
        acc = Expr::binop(BinOpKind::Or, acc, rhs);
        pos = next;
    }
    Ok((acc, pos))
}
