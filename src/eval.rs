//! Call-by-value evaluator.
//!
//! A debugging aid, not part of the checking pipeline: after a program
//! passes its checks the CLI runs it once and prints the value. `rand`
//! really draws, so the printed value varies between runs.

use std::fmt;
use std::rc::Rc;

use rand::Rng;

use crate::ast::expr::{BinOpKind, Expr};
use crate::env::Env;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvalError(pub String);

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "evaluation error: {}", self.0)
    }
}

impl std::error::Error for EvalError {}

pub type EvalResult = Result<Rc<Expr>, EvalError>;

pub fn eval(expr: &Rc<Expr>) -> EvalResult {
    eval_in(expr, &Env::new())
}

fn eval_in(expr: &Rc<Expr>, env: &Env<Expr>) -> EvalResult {
    match expr.as_ref() {
        Expr::Int(_) | Expr::Bool(_) | Expr::Fun { .. } => Ok(Rc::clone(expr)),
        Expr::Var(name) => env
            .lookup(name)
            .ok_or_else(|| EvalError(format!("unbound variable \"{}\"", name))),
        Expr::Let { name, init, body } => {
            let value = eval_in(init, env)?;
            eval_in(body, &env.append(name, value))
        }
        Expr::LetFun {
            name,
            ty,
            init,
            body,
        } => {
            let fun = Rc::new(Expr::Fun {
                ty: ty.clone(),
                body: Rc::clone(init),
            });
            eval_in(body, &env.append(name, fun))
        }
        Expr::If { cond, then, els } => {
            let cond_value = eval_in(cond, env)?;
            match cond_value.as_ref() {
                Expr::Bool(true) => eval_in(then, env),
                Expr::Bool(false) => eval_in(els, env),
                other => Err(EvalError(format!(
                    "if-condition must be boolean, got \"{}\"",
                    other
                ))),
            }
        }
        Expr::App { f, args } => {
            let f_value = eval_in(f, env)?;
            let Expr::Fun { ty, body } = f_value.as_ref() else {
                return Err(EvalError(format!("applied a non-function \"{}\"", f)));
            };
            if ty.args.len() != args.len() {
                return Err(EvalError(format!(
                    "expected {} arguments but got {}",
                    ty.args.len(),
                    args.len()
                )));
            }
            let mut call_env = env.clone();
            for (param, arg) in ty.args.iter().zip(args) {
                call_env = call_env.append(&param.name, eval_in(arg, env)?);
            }
            eval_in(body, &call_env)
        }
        Expr::Rand { start, end } => {
            if end < start {
                return Err(EvalError(format!(
                    "rand({}, {}) has an empty range",
                    start, end
                )));
            }
            let n = rand::thread_rng().gen_range(*start..=*end);
            Ok(Rc::new(Expr::Int(n)))
        }
        Expr::Neg(inner) => {
            let value = eval_in(inner, env)?;
            match value.as_ref() {
                Expr::Bool(b) => Ok(Rc::new(Expr::Bool(!b))),
                other => Err(EvalError(format!(
                    "can not negate non-boolean \"{}\"",
                    other
                ))),
            }
        }
        Expr::Typed { expr: inner, .. } => eval_in(inner, env),
        Expr::BinOp { op, lhs, rhs } => {
            let lhs_value = eval_in(lhs, env)?;
            let rhs_value = eval_in(rhs, env)?;
            apply_binop(*op, &lhs_value, &rhs_value)
        }
    }
}

fn int_of(value: &Expr) -> Result<i64, EvalError> {
    match value {
        Expr::Int(n) => Ok(*n),
        other => Err(EvalError(format!("expected an integer, got \"{}\"", other))),
    }
}

fn bool_of(value: &Expr) -> Result<bool, EvalError> {
    match value {
        Expr::Bool(b) => Ok(*b),
        other => Err(EvalError(format!("expected a boolean, got \"{}\"", other))),
    }
}

fn apply_binop(op: BinOpKind, lhs: &Rc<Expr>, rhs: &Rc<Expr>) -> EvalResult {
    let result = match op {
        BinOpKind::Eq => Expr::Bool(lhs == rhs),
        BinOpKind::Neq => Expr::Bool(lhs != rhs),
        BinOpKind::Leq => Expr::Bool(int_of(lhs)? <= int_of(rhs)?),
        BinOpKind::Geq => Expr::Bool(int_of(lhs)? >= int_of(rhs)?),
        BinOpKind::Add => Expr::Int(int_of(lhs)? + int_of(rhs)?),
        BinOpKind::Sub => Expr::Int(int_of(lhs)? - int_of(rhs)?),
        BinOpKind::Mul => Expr::Int(int_of(lhs)? * int_of(rhs)?),
        BinOpKind::Div => {
            let divisor = int_of(rhs)?;
            if divisor == 0 {
                return Err(EvalError("division by zero".to_string()));
            }
            Expr::Int(int_of(lhs)? / divisor)
        }
        BinOpKind::And => Expr::Bool(bool_of(lhs)? && bool_of(rhs)?),
        BinOpKind::Or => Expr::Bool(bool_of(lhs)? || bool_of(rhs)?),
    };
    Ok(Rc::new(result))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    fn evaluated(input: &str) -> Rc<Expr> {
        let expr = parse(input).expect("parses");
        eval(&expr).expect("evaluates")
    }

    #[test]
    fn arithmetic() {
        assert_eq!(*evaluated("1 +(2+3*4) - 3"), Expr::Int(12));
        assert_eq!(*evaluated("1-(-3)"), Expr::Int(4));
        assert_eq!(*evaluated("5-4/2"), Expr::Int(3));
    }

    #[test]
    fn comparisons() {
        assert_eq!(*evaluated("1+2 == 4"), Expr::Bool(false));
        assert_eq!(*evaluated("1+2 != 4"), Expr::Bool(true));
        assert_eq!(*evaluated("1+2 <= 4"), Expr::Bool(true));
        assert_eq!(*evaluated("1+2 >= 4"), Expr::Bool(false));
    }

    #[test]
    fn let_binds_its_value() {
        assert_eq!(*evaluated("let a = 1+2 in a + 3"), Expr::Int(6));
    }

    #[test]
    fn if_selects_a_branch() {
        assert_eq!(*evaluated("if true then 42 else 1"), Expr::Int(42));
        assert_eq!(
            *evaluated("let x = false in if x then 31 else 21"),
            Expr::Int(21)
        );
    }

    #[test]
    fn negation() {
        assert_eq!(*evaluated("not true"), Expr::Bool(false));
        assert_eq!(*evaluated("not not false"), Expr::Bool(false));
    }

    #[test]
    fn rand_stays_in_range() {
        for _ in 0..16 {
            let value = evaluated("rand(1, 4)");
            let Expr::Int(n) = *value else {
                panic!("rand produced a non-integer")
            };
            assert!((1..=4).contains(&n), "rand(1, 4) produced {}", n);
        }
    }

    #[test]
    fn rand_in_arithmetic() {
        let value = evaluated("rand(1, 4) + 42");
        let Expr::Int(n) = *value else {
            panic!("non-integer")
        };
        assert!((43..=46).contains(&n), "got {}", n);
    }

    #[test]
    fn letfun_applies() {
        assert_eq!(
            *evaluated("letfun plus4 (a:int, b:int) -> int = a+4 in plus4 (1+3) 0"),
            Expr::Int(8)
        );
    }

    #[test]
    fn ascription_is_transparent_to_evaluation() {
        assert_eq!(*evaluated("1:{x:int | true}"), Expr::Int(1));
    }

    #[test]
    fn division_by_zero_is_an_error() {
        let expr = parse("1/0").expect("parses");
        assert!(eval(&expr).is_err());
    }

    #[test]
    fn non_boolean_condition_is_an_error() {
        let expr = parse("if 1 then 2 else 3").expect("parses");
        assert!(eval(&expr).is_err());
    }
}
