//! Translation from refinement predicates to PCTL properties.
//!
//! The refinement binder is replaced by a reference to the MDP's result
//! variable, and `Prob` is lowered to `Pmin=?`/`Pmax=?` over reachability
//! of the accept location. Which of the two is chosen depends on the
//! polarity of the surrounding context: a `Prob` under positive polarity
//! must be a worst-case lower bound (`Pmin`), under negative polarity a
//! worst-case upper bound (`Pmax`). Polarity flips across the antecedent of
//! an implication, the left side of `<` and `<=`, and the right side of
//! `>=` and `>`.

use std::fmt;
use std::rc::Rc;

use crate::ast::logic::{Formula, Term};
use crate::ast::types::{Domain, RefinementType};
use crate::subst::{subst_formula_with_formula, subst_formula_with_term};
use crate::translate::TranslationResult;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pctl {
    pub final_location: i64,
    pub constraint: Rc<Formula>,
}

/// Rewrite the refinement into the property checked against the MDP. The
/// binder is substituted as a term variable for integer refinements and as
/// a formula variable for boolean ones.
pub fn translate_to_pctl(ty: &RefinementType, translated: &TranslationResult) -> Pctl {
    let result_name = &translated.value.name;
    let constraint = match ty.domain {
        Domain::Int => subst_formula_with_term(
            &ty.constraint,
            &ty.name,
            &Rc::new(Term::Var(result_name.clone())),
        ),
        Domain::Bool => subst_formula_with_formula(
            &ty.constraint,
            &ty.name,
            &Rc::new(Formula::Var(result_name.clone())),
        ),
    };
    Pctl {
        final_location: translated.accept,
        constraint,
    }
}

impl Pctl {
    /// The property in PRISM syntax.
    pub fn property(&self) -> String {
        render_formula(&self.constraint, self.final_location, true)
    }
}

impl fmt::Display for Pctl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.property())
    }
}

fn render_term(term: &Term, accept: i64, pos: bool) -> String {
    match term {
        Term::Var(name) => name.clone(),
        Term::Int(n) => n.to_string(),
        Term::Add(lhs, rhs) => format!(
            "({}+{})",
            render_term(lhs, accept, pos),
            render_term(rhs, accept, pos)
        ),
        Term::Sub(lhs, rhs) => format!(
            "({}-{})",
            render_term(lhs, accept, pos),
            render_term(rhs, accept, pos)
        ),
        Term::Mul(lhs, rhs) => format!(
            "({}*{})",
            render_term(lhs, accept, pos),
            render_term(rhs, accept, pos)
        ),
        Term::Div(lhs, rhs) => format!(
            "({}/{})",
            render_term(lhs, accept, pos),
            render_term(rhs, accept, pos)
        ),
        Term::Prob(inner) => {
            let operator = if pos { "Pmin" } else { "Pmax" };
            format!(
                "{}=? [F location={} & {}]",
                operator,
                accept,
                render_formula(inner, accept, pos)
            )
        }
    }
}

fn render_formula(formula: &Formula, accept: i64, pos: bool) -> String {
    match formula {
        Formula::Var(name) => name.clone(),
        Formula::Top => "(1=1)".to_string(),
        Formula::Bot => "(1=2)".to_string(),
        Formula::Neg(inner) => format!("!({})", render_formula(inner, accept, pos)),
        Formula::And(lhs, rhs) => format!(
            "({}&{})",
            render_formula(lhs, accept, pos),
            render_formula(rhs, accept, pos)
        ),
        Formula::Or(lhs, rhs) => format!(
            "({}|{})",
            render_formula(lhs, accept, pos),
            render_formula(rhs, accept, pos)
        ),
        Formula::Impl(lhs, rhs) => format!(
            "({}=>{})",
            render_formula(lhs, accept, !pos),
            render_formula(rhs, accept, pos)
        ),
        Formula::Eq(lhs, rhs) => format!(
            "({}={})",
            render_term(lhs, accept, pos),
            render_term(rhs, accept, pos)
        ),
        Formula::Lt(lhs, rhs) => format!(
            "({}<{})",
            render_term(lhs, accept, !pos),
            render_term(rhs, accept, pos)
        ),
        Formula::Leq(lhs, rhs) => format!(
            "({}<={})",
            render_term(lhs, accept, !pos),
            render_term(rhs, accept, pos)
        ),
        Formula::Geq(lhs, rhs) => format!(
            "({}>={})",
            render_term(lhs, accept, pos),
            render_term(rhs, accept, !pos)
        ),
        Formula::Gt(lhs, rhs) => format!(
            "({}>{})",
            render_term(lhs, accept, pos),
            render_term(rhs, accept, !pos)
        ),
    }
}
