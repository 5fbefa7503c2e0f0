//! The expression AST.
//!
//! Nodes are immutable after parsing and shared through `Rc`, so later
//! passes can hold onto subtrees without copying them.

use std::fmt;
use std::rc::Rc;

use crate::ast::types::{DependentType, RefinementType};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOpKind {
    Add,
    Sub,
    Mul,
    Div,
    Eq,
    Neq,
    Leq,
    Geq,
    And,
    Or,
}

impl BinOpKind {
    /// Constructor name used by the canonical debug form.
    pub fn name(self) -> &'static str {
        match self {
            BinOpKind::Add => "Add",
            BinOpKind::Sub => "Sub",
            BinOpKind::Mul => "Mul",
            BinOpKind::Div => "Div",
            BinOpKind::Eq => "Eq",
            BinOpKind::Neq => "Neq",
            BinOpKind::Leq => "Leq",
            BinOpKind::Geq => "Geq",
            BinOpKind::And => "And",
            BinOpKind::Or => "Or",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    Int(i64),
    Bool(bool),
    Var(String),
    Let {
        name: String,
        init: Rc<Expr>,
        body: Rc<Expr>,
    },
    LetFun {
        name: String,
        ty: DependentType,
        init: Rc<Expr>,
        body: Rc<Expr>,
    },
    If {
        cond: Rc<Expr>,
        then: Rc<Expr>,
        els: Rc<Expr>,
    },
    App {
        f: Rc<Expr>,
        args: Vec<Rc<Expr>>,
    },
    Rand {
        start: i64,
        end: i64,
    },
    /// Function value; built by the evaluator, never by the parser.
    Fun {
        ty: DependentType,
        body: Rc<Expr>,
    },
    /// Boolean negation.
    Neg(Rc<Expr>),
    /// Ascription; the one construct that triggers model checking.
    Typed {
        expr: Rc<Expr>,
        ty: RefinementType,
    },
    BinOp {
        op: BinOpKind,
        lhs: Rc<Expr>,
        rhs: Rc<Expr>,
    },
}

impl Expr {
    pub fn binop(op: BinOpKind, lhs: Rc<Expr>, rhs: Rc<Expr>) -> Rc<Expr> {
        Rc::new(Expr::BinOp { op, lhs, rhs })
    }

    pub fn int(n: i64) -> Rc<Expr> {
        Rc::new(Expr::Int(n))
    }

    pub fn var(name: impl Into<String>) -> Rc<Expr> {
        Rc::new(Expr::Var(name.into()))
    }

    /// True for the normal forms the evaluator can stop at.
    pub fn is_value(&self) -> bool {
        matches!(
            self,
            Expr::Int(_) | Expr::Bool(_) | Expr::Var(_) | Expr::Fun { .. }
        )
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Int(n) => write!(f, "{}", n),
            Expr::Bool(true) => f.write_str("true"),
            Expr::Bool(false) => f.write_str("false"),
            Expr::Var(name) => f.write_str(name),
            Expr::Let { name, init, body } => write!(f, "Let({}, {}, {})", name, init, body),
            Expr::LetFun {
                name,
                ty,
                init,
                body,
            } => {
                write!(f, "LetFun({}, [", name)?;
                for (i, arg) in ty.args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    f.write_str(&arg.name)?;
                }
                write!(f, "], {}, {})", init, body)
            }
            Expr::If { cond, then, els } => write!(f, "If({}, {}, {})", cond, then, els),
            Expr::App { f: fun, args } => {
                write!(f, "App({}, [", fun)?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", arg)?;
                }
                write!(f, "])")
            }
            Expr::Rand { start, end } => write!(f, "Rand({}, {})", start, end),
            Expr::Fun { ty, body } => {
                write!(f, "Fun([")?;
                for (i, arg) in ty.args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    f.write_str(&arg.name)?;
                }
                write!(f, "], {})", body)
            }
            Expr::Neg(inner) => write!(f, "Neg({})", inner),
            Expr::Typed { expr, ty } => write!(f, "Typed({}, {})", expr, ty),
            Expr::BinOp { op, lhs, rhs } => write!(f, "{}({}, {})", op.name(), lhs, rhs),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literals_print_bare() {
        assert_eq!(Expr::Int(-3).to_string(), "-3");
        assert_eq!(Expr::Bool(true).to_string(), "true");
        assert_eq!(Expr::Var("coin".into()).to_string(), "coin");
    }

    #[test]
    fn nested_arithmetic_debug_form() {
        let e = Expr::binop(
            BinOpKind::Sub,
            Expr::binop(BinOpKind::Add, Expr::int(1), Expr::int(2)),
            Expr::int(3),
        );
        assert_eq!(e.to_string(), "Sub(Add(1, 2), 3)");
    }

    #[test]
    fn let_debug_form() {
        let e = Expr::Let {
            name: "a".into(),
            init: Expr::int(1),
            body: Expr::var("a"),
        };
        assert_eq!(e.to_string(), "Let(a, 1, a)");
    }

    #[test]
    fn structural_equality_ignores_sharing() {
        let shared = Expr::int(7);
        let a = Expr::binop(BinOpKind::Add, Rc::clone(&shared), Rc::clone(&shared));
        let b = Expr::binop(BinOpKind::Add, Expr::int(7), Expr::int(7));
        assert_eq!(a, b);
    }

    #[test]
    fn values_are_literals_and_functions() {
        assert!(Expr::Int(1).is_value());
        assert!(Expr::Bool(false).is_value());
        assert!(!Expr::Rand { start: 0, end: 1 }.is_value());
    }
}
