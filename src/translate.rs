//! Translation from expressions to MDPs.
//!
//! Evaluation of an expression corresponds to a path of the compiled MDP
//! from the fragment's init location to its accept location; on arrival the
//! expression's value is readable from the fragment's value variable (or
//! constant, or inline PRISM expression). Probabilistic choice appears only
//! through `rand`, whose single command fans out into equiprobable
//! branches.

use std::fmt;
use std::rc::Rc;

use crate::ast::expr::{BinOpKind, Expr};
use crate::bound::Bound;
use crate::env::Env;
use crate::mdp::{Branch, Command, Constant, Mdp, MdpExpr, Variable, LOCATION};

/// Where a fragment's result lives: `name` is a variable, constant, or
/// inline PRISM expression; `bound` is `Some` for integers, `None` for
/// booleans.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueInfo {
    pub name: String,
    pub bound: Option<Bound>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TranslationResult {
    pub mdp: Mdp,
    pub init: i64,
    pub accept: i64,
    pub value: ValueInfo,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranslateError {
    /// The construct is outside the checkable fragment.
    Unimplemented(&'static str),
    /// An invariant the simple-type checker should have enforced does not
    /// hold; this is a bug, not a user error.
    Internal(String),
}

impl fmt::Display for TranslateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TranslateError::Unimplemented(what) => {
                write!(f, "translation of {} is not implemented", what)
            }
            TranslateError::Internal(msg) => write!(f, "internal translation error: {}", msg),
        }
    }
}

impl std::error::Error for TranslateError {}

pub type TranslateResult = Result<TranslationResult, TranslateError>;

const MODULE_NAME: &str = "default";

fn primed(name: &str) -> String {
    format!("{}'", name)
}

/// Guard fragment `(location=at)`.
fn at_location(at: i64) -> Rc<MdpExpr> {
    MdpExpr::eq(MdpExpr::var(LOCATION), MdpExpr::int(at))
}

/// `[] location=from -> 1 : (location'=to) & update ;`
fn bridge(from: i64, to: i64, update: Option<Rc<MdpExpr>>) -> Command {
    let jump = MdpExpr::eq(MdpExpr::var(primed(LOCATION)), MdpExpr::int(to));
    let update = match update {
        Some(extra) => MdpExpr::and(jump, extra),
        None => jump,
    };
    Command {
        guard: at_location(from),
        branches: vec![Branch {
            prob: MdpExpr::int(1),
            update,
        }],
    }
}

/// `[] location=from & cond -> 1 : (location'=to) ;`
fn bridge_when(cond: Rc<MdpExpr>, from: i64, to: i64) -> Command {
    Command {
        guard: MdpExpr::and(at_location(from), cond),
        branches: vec![Branch {
            prob: MdpExpr::int(1),
            update: MdpExpr::eq(MdpExpr::var(primed(LOCATION)), MdpExpr::int(to)),
        }],
    }
}

/// The fresh-name supply and translation entry point. The counters are
/// instance state so independent translations never observe each other.
#[derive(Debug, Default)]
pub struct Translator {
    location_count: i64,
    var_count: i64,
}

impl Translator {
    pub fn new() -> Self {
        Translator::default()
    }

    fn fresh_location(&mut self) -> i64 {
        let location = self.location_count;
        self.location_count += 1;
        location
    }

    /// The location a leaf lives at without claiming a new one.
    fn current_location(&self) -> i64 {
        self.location_count
    }

    fn fresh_var(&mut self) -> String {
        let name = format!("v{}", self.var_count);
        self.var_count += 1;
        name
    }

    /// Translate a whole program. Counters restart at zero and the
    /// `location` variable is rewritten to cover `[0, accept]`.
    pub fn translate(&mut self, expr: &Expr) -> TranslateResult {
        self.location_count = 0;
        self.var_count = 0;
        let mut result = self.trans(expr, &Env::new())?;
        for var in &mut result.mdp.variables {
            if var.name == LOCATION {
                *var = Variable::int(LOCATION, Bound::new(0, result.accept), 0);
            }
        }
        Ok(result)
    }

    fn trans(&mut self, expr: &Expr, env: &Env<ValueInfo>) -> TranslateResult {
        match expr {
            Expr::Int(n) => Ok(self.trans_int(*n)),
            Expr::Bool(b) => Ok(self.trans_bool(*b)),
            Expr::Var(name) => self.trans_var(name, env),
            Expr::Rand { start, end } => self.trans_rand(*start, *end),
            Expr::Let { name, init, body } => self.trans_let(name, init, body, env),
            Expr::If { cond, then, els } => self.trans_if(cond, then, els, env),
            Expr::BinOp { op, lhs, rhs } => self.trans_binop(*op, lhs, rhs, env),
            Expr::Neg(inner) => self.trans_neg(inner, env),
            Expr::Typed { expr, .. } => self.trans(expr, env),
            Expr::LetFun { .. } => Err(TranslateError::Unimplemented("letfun")),
            Expr::App { .. } => Err(TranslateError::Unimplemented("function application")),
            Expr::Fun { .. } => Err(TranslateError::Unimplemented("function values")),
        }
    }

    fn trans_int(&self, n: i64) -> TranslationResult {
        let const_name = format!("c{}", n);
        let current = self.current_location();
        let mut mdp = Mdp::empty(MODULE_NAME);
        mdp.constants.push(Constant::int(const_name.clone(), n));
        TranslationResult {
            mdp,
            init: current,
            accept: current,
            value: ValueInfo {
                name: const_name,
                bound: Some(Bound::point(n)),
            },
        }
    }

    fn trans_bool(&self, b: bool) -> TranslationResult {
        let const_name = format!("c{}", b as i32);
        let current = self.current_location();
        let mut mdp = Mdp::empty(MODULE_NAME);
        mdp.constants.push(Constant::bool(const_name.clone(), b));
        TranslationResult {
            mdp,
            init: current,
            accept: current,
            value: ValueInfo {
                name: const_name,
                bound: None,
            },
        }
    }

    fn trans_var(&self, name: &str, env: &Env<ValueInfo>) -> TranslateResult {
        let info = env.lookup(name).ok_or_else(|| {
            TranslateError::Internal(format!("variable \"{}\" escaped simple typing", name))
        })?;
        let current = self.current_location();
        Ok(TranslationResult {
            mdp: Mdp::empty(MODULE_NAME),
            init: current,
            accept: current,
            value: ValueInfo {
                name: name.to_string(),
                bound: info.bound,
            },
        })
    }

    fn trans_rand(&mut self, start: i64, end: i64) -> TranslateResult {
        if end < start {
            return Err(TranslateError::Internal(format!(
                "rand({}, {}) has an empty range",
                start, end
            )));
        }
        let from = self.fresh_location();
        let to = self.fresh_location();
        let var = self.fresh_var();

        let prob = MdpExpr::binop(
            crate::mdp::BinOp::Div,
            MdpExpr::int(1),
            MdpExpr::int(end - start + 1),
        );
        let jump = MdpExpr::eq(MdpExpr::var(primed(LOCATION)), MdpExpr::int(to));
        let branches = (start..=end)
            .map(|i| Branch {
                prob: Rc::clone(&prob),
                update: MdpExpr::and(
                    Rc::clone(&jump),
                    MdpExpr::eq(MdpExpr::var(primed(&var)), MdpExpr::int(i)),
                ),
            })
            .collect();
        let command = Command {
            guard: at_location(from),
            branches,
        };

        let mdp = Mdp {
            module_name: MODULE_NAME.to_string(),
            variables: vec![
                Variable::int(LOCATION, Bound::new(from, to), from),
                Variable::int(var.clone(), Bound::new(start, end), start),
            ],
            constants: vec![],
            commands: vec![command],
        };

        Ok(TranslationResult {
            mdp,
            init: from,
            accept: to,
            value: ValueInfo {
                name: var,
                bound: Some(Bound::new(start, end)),
            },
        })
    }

    fn trans_let(
        &mut self,
        name: &str,
        init: &Expr,
        body: &Expr,
        env: &Env<ValueInfo>,
    ) -> TranslateResult {
        let init_ = self.trans(init, env)?;
        let body_env = env.append(name, Rc::new(init_.value.clone()));
        let body_ = self.trans(body, &body_env)?;

        // Step from the init fragment's accept into the body, storing the
        // init value under the bound name on the way.
        let concat = bridge(
            init_.accept,
            body_.init,
            Some(MdpExpr::eq(
                MdpExpr::var(primed(name)),
                MdpExpr::var(init_.value.name.clone()),
            )),
        );

        let mut mdp = Mdp::merge(init_.mdp, body_.mdp);
        mdp.commands.push(concat);
        mdp.variables.push(match init_.value.bound {
            Some(bound) => Variable::int(name, bound, 0),
            // Arbitrary: the bridge command writes the variable before any
            // command reads it.
            None => Variable::bool(name, true),
        });

        Ok(TranslationResult {
            mdp,
            init: init_.init,
            accept: body_.accept,
            value: body_.value,
        })
    }

    fn trans_if(
        &mut self,
        cond: &Expr,
        then: &Expr,
        els: &Expr,
        env: &Env<ValueInfo>,
    ) -> TranslateResult {
        let cond_ = self.trans(cond, env)?;
        let then_ = self.trans(then, env)?;
        let els_ = self.trans(els, env)?;

        let accept = self.fresh_location();
        let result_var = self.fresh_var();

        let cond_value = MdpExpr::var(cond_.value.name.clone());
        let into_then = bridge_when(Rc::clone(&cond_value), cond_.accept, then_.init);
        let into_els = bridge_when(MdpExpr::neg(cond_value), cond_.accept, els_.init);
        let join_then = bridge(
            then_.accept,
            accept,
            Some(MdpExpr::eq(
                MdpExpr::var(primed(&result_var)),
                MdpExpr::var(then_.value.name.clone()),
            )),
        );
        let join_els = bridge(
            els_.accept,
            accept,
            Some(MdpExpr::eq(
                MdpExpr::var(primed(&result_var)),
                MdpExpr::var(els_.value.name.clone()),
            )),
        );

        let mut mdp = Mdp::merge(Mdp::merge(cond_.mdp, then_.mdp), els_.mdp);
        mdp.commands.push(into_then);
        mdp.commands.push(into_els);
        mdp.commands.push(join_then);
        mdp.commands.push(join_els);

        let bound = match (then_.value.bound, els_.value.bound) {
            (Some(then_bound), Some(els_bound)) => Some(then_bound.union(els_bound)),
            (None, None) => None,
            _ => {
                return Err(TranslateError::Internal(
                    "branches of an if expression disagree about their domain".to_string(),
                ))
            }
        };
        mdp.variables.push(match bound {
            Some(bound) => Variable::int(result_var.clone(), bound, 0),
            None => Variable::bool(result_var.clone(), true),
        });

        Ok(TranslationResult {
            mdp,
            init: cond_.init,
            accept,
            value: ValueInfo {
                name: result_var,
                bound,
            },
        })
    }

    fn trans_binop(
        &mut self,
        op: BinOpKind,
        lhs: &Expr,
        rhs: &Expr,
        env: &Env<ValueInfo>,
    ) -> TranslateResult {
        let lhs_ = self.trans(lhs, env)?;
        let rhs_ = self.trans(rhs, env)?;

        let value = symbolic_binop(&lhs_.value, &rhs_.value, op)?;
        let init = lhs_.init;
        let accept = rhs_.accept;
        let mdp = Mdp::merge(lhs_.mdp, rhs_.mdp);

        Ok(TranslationResult {
            mdp,
            init,
            accept,
            value,
        })
    }

    fn trans_neg(&mut self, inner: &Expr, env: &Env<ValueInfo>) -> TranslateResult {
        let inner_ = self.trans(inner, env)?;
        let accept = self.fresh_location();
        let result_var = self.fresh_var();

        let concat = bridge(
            inner_.accept,
            accept,
            Some(MdpExpr::eq(
                MdpExpr::var(primed(&result_var)),
                MdpExpr::neg(MdpExpr::var(inner_.value.name.clone())),
            )),
        );

        let mut mdp = inner_.mdp;
        mdp.commands.push(concat);
        mdp.variables.push(Variable::bool(result_var.clone(), true));

        Ok(TranslationResult {
            mdp,
            init: inner_.init,
            accept,
            value: ValueInfo {
                name: result_var,
                bound: None,
            },
        })
    }
}

/// A binary operation allocates nothing in the module; its value is the
/// inline PRISM expression over the operand values, with bounds propagated
/// for the arithmetic operators.
fn symbolic_binop(
    lhs: &ValueInfo,
    rhs: &ValueInfo,
    op: BinOpKind,
) -> Result<ValueInfo, TranslateError> {
    let int_bounds = || -> Result<(Bound, Bound), TranslateError> {
        match (lhs.bound, rhs.bound) {
            (Some(l), Some(r)) => Ok((l, r)),
            _ => Err(TranslateError::Internal(format!(
                "arithmetic on boolean values \"{}\" and \"{}\"",
                lhs.name, rhs.name
            ))),
        }
    };
    let info = match op {
        BinOpKind::Add => {
            let (l, r) = int_bounds()?;
            ValueInfo {
                name: format!("({}+{})", lhs.name, rhs.name),
                bound: Some(l + r),
            }
        }
        BinOpKind::Sub => {
            let (l, r) = int_bounds()?;
            ValueInfo {
                name: format!("({}-{})", lhs.name, rhs.name),
                bound: Some(l - r),
            }
        }
        BinOpKind::Mul => {
            let (l, r) = int_bounds()?;
            ValueInfo {
                name: format!("({}*{})", lhs.name, rhs.name),
                bound: Some(l * r),
            }
        }
        BinOpKind::Div => {
            let (l, r) = int_bounds()?;
            ValueInfo {
                name: format!("({}/{})", lhs.name, rhs.name),
                bound: Some(l / r),
            }
        }
        // PRISM's equality is spelled without surrounding parentheses so a
        // guard can splice it directly.
        BinOpKind::Eq => ValueInfo {
            name: format!("{}={}", lhs.name, rhs.name),
            bound: None,
        },
        BinOpKind::Neq => ValueInfo {
            name: format!("({}!={})", lhs.name, rhs.name),
            bound: None,
        },
        BinOpKind::Leq => ValueInfo {
            name: format!("({}<={})", lhs.name, rhs.name),
            bound: None,
        },
        BinOpKind::Geq => ValueInfo {
            name: format!("({}>={})", lhs.name, rhs.name),
            bound: None,
        },
        BinOpKind::And => ValueInfo {
            name: format!("({}&{})", lhs.name, rhs.name),
            bound: None,
        },
        BinOpKind::Or => ValueInfo {
            name: format!("({}|{})", lhs.name, rhs.name),
            bound: None,
        },
    };
    Ok(info)
}

/// Translate with a fresh counter pair.
pub fn translate_to_mdp(expr: &Expr) -> TranslateResult {
    Translator::new().translate(expr)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mdp::{BinOp, VarData};
    use crate::parser::parse;

    fn translated(input: &str) -> TranslationResult {
        let expr = parse(input).expect("parses");
        translate_to_mdp(&expr).expect("translates")
    }

    #[test]
    fn integer_literal_becomes_a_constant() {
        let result = translated("42");
        assert!(result.mdp.variables.is_empty());
        assert!(result.mdp.commands.is_empty());
        assert_eq!(result.mdp.constants, vec![Constant::int("c42", 42)]);
        assert_eq!(result.init, 0);
        assert_eq!(result.accept, 0);
        assert_eq!(result.value.name, "c42");
        assert_eq!(result.value.bound, Some(Bound::point(42)));
    }

    #[test]
    fn boolean_literal_becomes_a_numeric_constant() {
        let result = translated("false");
        assert_eq!(result.mdp.constants, vec![Constant::bool("c0", false)]);
        assert_eq!(result.value.name, "c0");
        assert_eq!(result.value.bound, None);
    }

    #[test]
    fn rand_structure() {
        let result = translated("rand(1, 2)");
        assert_eq!(result.init, 0);
        assert_eq!(result.accept, 1);
        assert_eq!(result.value.name, "v0");
        assert_eq!(result.value.bound, Some(Bound::new(1, 2)));

        assert_eq!(
            result.mdp.variables,
            vec![
                Variable::int(LOCATION, Bound::new(0, 1), 0),
                Variable::int("v0", Bound::new(1, 2), 1),
            ]
        );
        assert!(result.mdp.constants.is_empty());

        assert_eq!(result.mdp.commands.len(), 1);
        let command = &result.mdp.commands[0];
        assert_eq!(command.guard.to_string(), "(location=0)");
        assert_eq!(command.branches.len(), 2);
        for (i, branch) in command.branches.iter().enumerate() {
            assert_eq!(
                *branch.prob,
                MdpExpr::BinOp {
                    op: BinOp::Div,
                    lhs: MdpExpr::int(1),
                    rhs: MdpExpr::int(2),
                }
            );
            assert_eq!(
                branch.update.to_string(),
                format!("(location'=1)&(v0'={})", i + 1)
            );
        }
    }

    #[test]
    fn rand_has_one_branch_per_outcome() {
        let result = translated("rand(-1, 3)");
        let command = &result.mdp.commands[0];
        assert_eq!(command.branches.len(), 5);
        for (branch, i) in command.branches.iter().zip(-1..=3) {
            assert_eq!(branch.prob.to_string(), "1/5");
            assert!(
                branch.update.to_string().ends_with(&format!("(v0'={})", i)),
                "branch {}: {}",
                i,
                branch.update
            );
        }
    }

    #[test]
    fn let_bridges_init_to_body_and_declares_the_binding() {
        let result = translated("let a = rand(0, 1) in a");
        assert_eq!(result.init, 0);
        assert_eq!(result.accept, 2);
        assert_eq!(result.value.name, "a");
        assert_eq!(result.value.bound, Some(Bound::new(0, 1)));

        let names: Vec<&str> = result.mdp.variables.iter().map(|v| v.name.as_str()).collect();
        assert_eq!(names, ["location", "v0", "a"]);
        assert_eq!(
            result.mdp.variables[2].data,
            VarData::Int {
                bound: Bound::new(0, 1),
                init: 0
            }
        );

        let bridge = result.mdp.commands.last().expect("bridge command");
        assert_eq!(bridge.to_string(), "[] (location=1) -> 1 : (location'=2)&(a'=v0);");
    }

    #[test]
    fn let_of_boolean_declares_a_bool_variable() {
        let result = translated("let b = true in b");
        let var = result
            .mdp
            .variables
            .iter()
            .find(|v| v.name == "b")
            .expect("declared");
        assert_eq!(var.data, VarData::Bool { init: true });
        assert_eq!(result.value.bound, None);
    }

    #[test]
    fn binop_value_is_symbolic() {
        let result = translated("1 + 2");
        assert_eq!(result.value.name, "(c1+c2)");
        assert_eq!(result.value.bound, Some(Bound::point(3)));
        assert!(result.mdp.commands.is_empty());
        assert_eq!(result.mdp.constants.len(), 2);
    }

    #[test]
    fn equality_value_has_no_parentheses() {
        let result = translated("1 == 2");
        assert_eq!(result.value.name, "c1=c2");
        assert_eq!(result.value.bound, None);
    }

    #[test]
    fn binop_bound_arithmetic_follows_the_operands() {
        let result = translated("rand(1, 2) + rand(10, 20)");
        assert_eq!(result.value.name, "(v0+v1)");
        assert_eq!(result.value.bound, Some(Bound::new(11, 22)));
        // Two rand fragments, one command each.
        assert_eq!(result.mdp.commands.len(), 2);
        assert_eq!(result.init, 0);
        assert_eq!(result.accept, 3);
    }

    #[test]
    fn if_allocates_join_location_and_result_variable() {
        let result = translated("if true then 42 else 1");
        assert_eq!(result.accept, 0);
        assert_eq!(result.value.name, "v0");
        // union of the branch constants
        assert_eq!(result.value.bound, Some(Bound::new(1, 42)));

        assert_eq!(result.mdp.commands.len(), 4);
        assert_eq!(
            result.mdp.commands[0].to_string(),
            "[] (location=0)&c1 -> 1 : (location'=0);"
        );
        assert_eq!(
            result.mdp.commands[1].to_string(),
            "[] (location=0)&!(c1) -> 1 : (location'=0);"
        );
        assert_eq!(
            result.mdp.commands[2].to_string(),
            "[] (location=0) -> 1 : (location'=0)&(v0'=c42);"
        );
        assert_eq!(
            result.mdp.commands[3].to_string(),
            "[] (location=0) -> 1 : (location'=0)&(v0'=c1);"
        );
    }

    #[test]
    fn if_over_rand_branches_unions_bounds() {
        let result = translated("if rand(0,1) == 0 then rand(1, 2) else rand(10, 20)");
        let var = result
            .mdp
            .variables
            .iter()
            .find(|v| v.name == "v3")
            .expect("result variable");
        assert_eq!(
            var.data,
            VarData::Int {
                bound: Bound::new(1, 20),
                init: 0
            }
        );
        assert_eq!(result.value.bound, Some(Bound::new(1, 20)));
    }

    #[test]
    fn neg_allocates_result_variable() {
        let result = translated("not true");
        assert_eq!(result.value.name, "v0");
        assert_eq!(result.value.bound, None);
        let command = result.mdp.commands.last().expect("bridge");
        assert_eq!(command.to_string(), "[] (location=0) -> 1 : (location'=0)&(v0'=!(c1));");
    }

    #[test]
    fn ascription_translates_its_subject() {
        let with = translated("rand(1, 2) : {x:int | true}");
        let without = translated("rand(1, 2)");
        assert_eq!(with, without);
    }

    #[test]
    fn location_envelope_after_finalisation() {
        let result = translated("let a = rand(0, 1) in let b = rand(0, 1) in a + b");
        let location = &result.mdp.variables[0];
        assert_eq!(location.name, LOCATION);
        assert_eq!(
            location.data,
            VarData::Int {
                bound: Bound::new(0, result.accept),
                init: 0
            }
        );
    }

    #[test]
    fn translation_is_deterministic() {
        let expr = parse("let a = rand(0, 3) in if a <= 1 then a else rand(0, 1)").expect("parses");
        let first = translate_to_mdp(&expr).expect("translates");
        let second = translate_to_mdp(&expr).expect("translates");
        assert_eq!(first, second);
        assert_eq!(first.mdp.to_string(), second.mdp.to_string());
    }

    #[test]
    fn letfun_is_not_translatable() {
        let expr = parse("letfun f int -> int = 1 in f 2").expect("parses");
        assert_eq!(
            translate_to_mdp(&expr),
            Err(TranslateError::Unimplemented("letfun"))
        );
    }

    #[test]
    fn empty_rand_range_is_an_internal_error() {
        let expr = parse("rand(3, 1)").expect("parses");
        assert!(matches!(
            translate_to_mdp(&expr),
            Err(TranslateError::Internal(_))
        ));
    }

    #[test]
    fn unbound_variable_is_an_internal_error() {
        let expr = parse("oops").expect("parses");
        assert!(matches!(
            translate_to_mdp(&expr),
            Err(TranslateError::Internal(_))
        ));
    }
}
