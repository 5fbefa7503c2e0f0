//! Expressions of the PRISM guard/update language.

use std::fmt;
use std::rc::Rc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Mul,
    Div,
    Add,
    Sub,
    Lt,
    Leq,
    Geq,
    Gt,
    Eq,
    Neq,
    And,
    Or,
    Iff,
    Impl,
}

impl fmt::Display for BinOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self {
            BinOp::Mul => "*",
            BinOp::Div => "/",
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Lt => "<",
            BinOp::Leq => "<=",
            BinOp::Geq => ">=",
            BinOp::Gt => ">",
            BinOp::Eq => "=",
            BinOp::Neq => "!=",
            BinOp::And => "&",
            BinOp::Or => "|",
            BinOp::Iff => "<=>",
            BinOp::Impl => "=>",
        };
        f.write_str(symbol)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum MdpExpr {
    Int(i64),
    Real(f64),
    Bool(bool),
    Var(String),
    Neg(Rc<MdpExpr>),
    BinOp {
        op: BinOp,
        lhs: Rc<MdpExpr>,
        rhs: Rc<MdpExpr>,
    },
    If {
        cond: Rc<MdpExpr>,
        then: Rc<MdpExpr>,
        els: Rc<MdpExpr>,
    },
    Min(Vec<Rc<MdpExpr>>),
    Max(Vec<Rc<MdpExpr>>),
    Floor(Rc<MdpExpr>),
    Ceil(Rc<MdpExpr>),
    Pow { x: Rc<MdpExpr>, y: Rc<MdpExpr> },
    Mod { i: Rc<MdpExpr>, n: Rc<MdpExpr> },
    Log { x: Rc<MdpExpr>, b: Rc<MdpExpr> },
}

impl MdpExpr {
    pub fn int(n: i64) -> Rc<MdpExpr> {
        Rc::new(MdpExpr::Int(n))
    }

    pub fn var(name: impl Into<String>) -> Rc<MdpExpr> {
        Rc::new(MdpExpr::Var(name.into()))
    }

    pub fn neg(inner: Rc<MdpExpr>) -> Rc<MdpExpr> {
        Rc::new(MdpExpr::Neg(inner))
    }

    pub fn binop(op: BinOp, lhs: Rc<MdpExpr>, rhs: Rc<MdpExpr>) -> Rc<MdpExpr> {
        Rc::new(MdpExpr::BinOp { op, lhs, rhs })
    }

    pub fn eq(lhs: Rc<MdpExpr>, rhs: Rc<MdpExpr>) -> Rc<MdpExpr> {
        MdpExpr::binop(BinOp::Eq, lhs, rhs)
    }

    pub fn and(lhs: Rc<MdpExpr>, rhs: Rc<MdpExpr>) -> Rc<MdpExpr> {
        MdpExpr::binop(BinOp::And, lhs, rhs)
    }
}

fn write_args(f: &mut fmt::Formatter<'_>, name: &str, args: &[Rc<MdpExpr>]) -> fmt::Result {
    write!(f, "{}(", name)?;
    for (i, arg) in args.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{}", arg)?;
    }
    write!(f, ")")
}

impl fmt::Display for MdpExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MdpExpr::Int(n) => write!(f, "{}", n),
            MdpExpr::Real(d) => write!(f, "{}", d),
            // PRISM booleans in expression position are 0/1.
            MdpExpr::Bool(b) => write!(f, "{}", *b as i32),
            MdpExpr::Var(name) => f.write_str(name),
            MdpExpr::Neg(inner) => write!(f, "!({})", inner),
            // Only equalities are parenthesised; the translation relies on
            // this shape for updates like (x'=1)&(y'=2).
            MdpExpr::BinOp { op, lhs, rhs } => {
                if *op == BinOp::Eq {
                    write!(f, "({}{}{})", lhs, op, rhs)
                } else {
                    write!(f, "{}{}{}", lhs, op, rhs)
                }
            }
            MdpExpr::If { cond, then, els } => write!(f, "({}?{}:{})", cond, then, els),
            MdpExpr::Min(args) => write_args(f, "min", args),
            MdpExpr::Max(args) => write_args(f, "max", args),
            MdpExpr::Floor(inner) => write!(f, "floor({})", inner),
            MdpExpr::Ceil(inner) => write!(f, "ceil({})", inner),
            MdpExpr::Pow { x, y } => write!(f, "pow({}, {})", x, y),
            MdpExpr::Mod { i, n } => write!(f, "mod({}, {})", i, n),
            MdpExpr::Log { x, b } => write!(f, "log({}, {})", x, b),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equality_is_parenthesised_other_binops_are_not() {
        let eq = MdpExpr::eq(MdpExpr::var("location"), MdpExpr::int(0));
        assert_eq!(eq.to_string(), "(location=0)");

        let div = MdpExpr::binop(BinOp::Div, MdpExpr::int(1), MdpExpr::int(2));
        assert_eq!(div.to_string(), "1/2");
    }

    #[test]
    fn updates_render_as_conjoined_equalities() {
        let update = MdpExpr::and(
            MdpExpr::eq(MdpExpr::var("location'"), MdpExpr::int(1)),
            MdpExpr::eq(MdpExpr::var("v0'"), MdpExpr::int(2)),
        );
        assert_eq!(update.to_string(), "(location'=1)&(v0'=2)");
    }

    #[test]
    fn negation_parenthesises_its_operand() {
        let e = MdpExpr::neg(MdpExpr::var("v1"));
        assert_eq!(e.to_string(), "!(v1)");
    }

    #[test]
    fn builtins_render_in_prism_syntax() {
        let e = MdpExpr::Min(vec![MdpExpr::int(1), MdpExpr::var("x")]);
        assert_eq!(e.to_string(), "min(1, x)");
        let m = MdpExpr::Mod {
            i: MdpExpr::var("x"),
            n: MdpExpr::int(2),
        };
        assert_eq!(m.to_string(), "mod(x, 2)");
    }

    #[test]
    fn booleans_render_numerically() {
        assert_eq!(MdpExpr::Bool(true).to_string(), "1");
        assert_eq!(MdpExpr::Bool(false).to_string(), "0");
    }
}
