//! Simple typing.
//!
//! Assigns each expression a monomorphic type in {Int, Bool, Fun}. This is
//! the precondition for refinement checking: the MDP translator trusts it
//! and treats any residual type confusion as an internal error.

use std::fmt;
use std::rc::Rc;

use crate::ast::expr::{BinOpKind, Expr};
use crate::ast::types::{DependentType, Domain, RefinementType};
use crate::env::Env;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimpleType {
    Int,
    Bool,
    Fun {
        args: Vec<Rc<SimpleType>>,
        ret: Rc<SimpleType>,
    },
}

impl SimpleType {
    /// Erase a refinement type to its domain.
    pub fn from_refinement(ty: &RefinementType) -> Rc<SimpleType> {
        match ty.domain {
            Domain::Int => Rc::new(SimpleType::Int),
            Domain::Bool => Rc::new(SimpleType::Bool),
        }
    }

    /// Erase a dependent type to a simple function type.
    pub fn from_dependent(ty: &DependentType) -> Rc<SimpleType> {
        let args = ty.args.iter().map(SimpleType::from_refinement).collect();
        let ret = SimpleType::from_refinement(&ty.ret);
        Rc::new(SimpleType::Fun { args, ret })
    }
}

impl fmt::Display for SimpleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimpleType::Int => f.write_str("Int"),
            SimpleType::Bool => f.write_str("Bool"),
            SimpleType::Fun { args, ret } => {
                write!(f, "(")?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", arg)?;
                }
                write!(f, ") -> {}", ret)
            }
        }
    }
}

pub type TypingResult = Result<Rc<SimpleType>, String>;

pub fn simple_typing(expr: &Expr) -> TypingResult {
    typing(expr, &Env::new())
}

fn typing(expr: &Expr, env: &Env<SimpleType>) -> TypingResult {
    match expr {
        Expr::Int(_) => Ok(Rc::new(SimpleType::Int)),
        Expr::Bool(_) => Ok(Rc::new(SimpleType::Bool)),
        Expr::Rand { .. } => Ok(Rc::new(SimpleType::Int)),
        Expr::Var(name) => env
            .lookup(name)
            .ok_or_else(|| format!("unbound variable \"{}\"", name)),
        Expr::Let { name, init, body } => {
            let init_ty = typing(init, env)?;
            typing(body, &env.append(name, init_ty))
        }
        Expr::LetFun {
            name,
            ty,
            init,
            body,
        } => {
            let fun_ty = SimpleType::from_dependent(ty);
            let mut init_env = env.append(name, Rc::clone(&fun_ty));
            for arg in &ty.args {
                init_env = init_env.append(&arg.name, SimpleType::from_refinement(arg));
            }
            typing(init, &init_env)?;
            typing(body, &env.append(name, fun_ty))
        }
        Expr::If { cond, then, els } => {
            let cond_ty = typing(cond, env)?;
            let then_ty = typing(then, env)?;
            let els_ty = typing(els, env)?;
            if *cond_ty != SimpleType::Bool {
                return Err(format!(
                    "condition of if expression must be boolean in \"{}\"",
                    expr
                ));
            }
            if then_ty != els_ty {
                return Err(format!(
                    "branches of if expression have different types in \"{}\"",
                    expr
                ));
            }
            Ok(then_ty)
        }
        Expr::App { f, args } => {
            let f_ty = typing(f, env)?;
            let SimpleType::Fun {
                args: param_tys,
                ret,
            } = f_ty.as_ref()
            else {
                return Err(format!("applied a non-function in \"{}\"", expr));
            };
            if param_tys.len() != args.len() {
                return Err(format!(
                    "expected {} arguments but got {} in \"{}\"",
                    param_tys.len(),
                    args.len(),
                    expr
                ));
            }
            for (arg, param_ty) in args.iter().zip(param_tys) {
                let arg_ty = typing(arg, env)?;
                if arg_ty != *param_ty {
                    return Err(format!(
                        "argument has type {} but the parameter expects {} in \"{}\"",
                        arg_ty, param_ty, expr
                    ));
                }
            }
            Ok(Rc::clone(ret))
        }
        Expr::Neg(inner) => {
            let inner_ty = typing(inner, env)?;
            if *inner_ty != SimpleType::Bool {
                return Err(format!(
                    "can not negate a non-boolean expression in \"{}\"",
                    expr
                ));
            }
            Ok(Rc::new(SimpleType::Bool))
        }
        Expr::Typed { expr: inner, ty } => {
            let inner_ty = typing(inner, env)?;
            let ascribed = SimpleType::from_refinement(ty);
            if inner_ty == ascribed {
                Ok(inner_ty)
            } else {
                Err(format!(
                    "\"{}\" has simple type {}, but the ascription expects {}",
                    inner, inner_ty, ascribed
                ))
            }
        }
        Expr::BinOp { op, lhs, rhs } => {
            let lhs_ty = typing(lhs, env)?;
            let rhs_ty = typing(rhs, env)?;
            match op {
                BinOpKind::Add | BinOpKind::Sub | BinOpKind::Mul | BinOpKind::Div => {
                    if *lhs_ty != SimpleType::Int || *rhs_ty != SimpleType::Int {
                        return Err(format!(
                            "can not apply an arithmetic operation to a non-integer expression in \"{}\"",
                            expr
                        ));
                    }
                    Ok(Rc::new(SimpleType::Int))
                }
                BinOpKind::Eq | BinOpKind::Neq | BinOpKind::Leq | BinOpKind::Geq => {
                    if *lhs_ty != SimpleType::Int || *rhs_ty != SimpleType::Int {
                        return Err(format!(
                            "can not compare non-integer expressions in \"{}\"",
                            expr
                        ));
                    }
                    Ok(Rc::new(SimpleType::Bool))
                }
                BinOpKind::And | BinOpKind::Or => {
                    if *lhs_ty != SimpleType::Bool || *rhs_ty != SimpleType::Bool {
                        return Err(format!(
                            "can not apply a logical operation to a non-boolean expression in \"{}\"",
                            expr
                        ));
                    }
                    Ok(Rc::new(SimpleType::Bool))
                }
            }
        }
        // Function values only exist at evaluation time.
        Expr::Fun { .. } => Err("function value can not appear in source".to_string()),
    }
}
