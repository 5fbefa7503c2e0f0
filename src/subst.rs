//! Captureless substitution over the logic layer.
//!
//! Terms and formulas contain no binders, so substitution is a plain
//! structural rewrite with no renaming. Inputs are never mutated; untouched
//! subtrees are shared with the result.
//!
//! Term variables and formula variables live in separate namespaces, which
//! is why four operations exist: substituting a formula into a term only
//! descends through `Prob`, and substituting a term into a formula leaves
//! formula variables alone.

use std::rc::Rc;

use crate::ast::logic::{Formula, Term};

pub fn subst_term_with_term(term: &Rc<Term>, var: &str, replacement: &Rc<Term>) -> Rc<Term> {
    match term.as_ref() {
        Term::Add(lhs, rhs) => Rc::new(Term::Add(
            subst_term_with_term(lhs, var, replacement),
            subst_term_with_term(rhs, var, replacement),
        )),
        Term::Sub(lhs, rhs) => Rc::new(Term::Sub(
            subst_term_with_term(lhs, var, replacement),
            subst_term_with_term(rhs, var, replacement),
        )),
        Term::Mul(lhs, rhs) => Rc::new(Term::Mul(
            subst_term_with_term(lhs, var, replacement),
            subst_term_with_term(rhs, var, replacement),
        )),
        Term::Div(lhs, rhs) => Rc::new(Term::Div(
            subst_term_with_term(lhs, var, replacement),
            subst_term_with_term(rhs, var, replacement),
        )),
        Term::Prob(inner) => Rc::new(Term::Prob(subst_formula_with_term(inner, var, replacement))),
        Term::Var(name) => {
            if name == var {
                Rc::clone(replacement)
            } else {
                Rc::clone(term)
            }
        }
        Term::Int(_) => Rc::clone(term),
    }
}

pub fn subst_term_with_formula(term: &Rc<Term>, var: &str, replacement: &Rc<Formula>) -> Rc<Term> {
    match term.as_ref() {
        Term::Add(lhs, rhs) => Rc::new(Term::Add(
            subst_term_with_formula(lhs, var, replacement),
            subst_term_with_formula(rhs, var, replacement),
        )),
        Term::Sub(lhs, rhs) => Rc::new(Term::Sub(
            subst_term_with_formula(lhs, var, replacement),
            subst_term_with_formula(rhs, var, replacement),
        )),
        Term::Mul(lhs, rhs) => Rc::new(Term::Mul(
            subst_term_with_formula(lhs, var, replacement),
            subst_term_with_formula(rhs, var, replacement),
        )),
        Term::Div(lhs, rhs) => Rc::new(Term::Div(
            subst_term_with_formula(lhs, var, replacement),
            subst_term_with_formula(rhs, var, replacement),
        )),
        Term::Prob(inner) => Rc::new(Term::Prob(subst_formula_with_formula(
            inner,
            var,
            replacement,
        ))),
        // A term variable can not be replaced by a formula.
        Term::Var(_) | Term::Int(_) => Rc::clone(term),
    }
}

pub fn subst_formula_with_term(
    formula: &Rc<Formula>,
    var: &str,
    replacement: &Rc<Term>,
) -> Rc<Formula> {
    let comparison = |lhs: &Rc<Term>, rhs: &Rc<Term>| {
        (
            subst_term_with_term(lhs, var, replacement),
            subst_term_with_term(rhs, var, replacement),
        )
    };
    match formula.as_ref() {
        Formula::Neg(inner) => Rc::new(Formula::Neg(subst_formula_with_term(
            inner,
            var,
            replacement,
        ))),
        Formula::And(lhs, rhs) => Rc::new(Formula::And(
            subst_formula_with_term(lhs, var, replacement),
            subst_formula_with_term(rhs, var, replacement),
        )),
        Formula::Or(lhs, rhs) => Rc::new(Formula::Or(
            subst_formula_with_term(lhs, var, replacement),
            subst_formula_with_term(rhs, var, replacement),
        )),
        Formula::Impl(lhs, rhs) => Rc::new(Formula::Impl(
            subst_formula_with_term(lhs, var, replacement),
            subst_formula_with_term(rhs, var, replacement),
        )),
        Formula::Eq(lhs, rhs) => {
            let (lhs, rhs) = comparison(lhs, rhs);
            Rc::new(Formula::Eq(lhs, rhs))
        }
        Formula::Lt(lhs, rhs) => {
            let (lhs, rhs) = comparison(lhs, rhs);
            Rc::new(Formula::Lt(lhs, rhs))
        }
        Formula::Leq(lhs, rhs) => {
            let (lhs, rhs) = comparison(lhs, rhs);
            Rc::new(Formula::Leq(lhs, rhs))
        }
        Formula::Geq(lhs, rhs) => {
            let (lhs, rhs) = comparison(lhs, rhs);
            Rc::new(Formula::Geq(lhs, rhs))
        }
        Formula::Gt(lhs, rhs) => {
            let (lhs, rhs) = comparison(lhs, rhs);
            Rc::new(Formula::Gt(lhs, rhs))
        }
        // Formula variables belong to the other namespace.
        Formula::Var(_) | Formula::Top | Formula::Bot => Rc::clone(formula),
    }
}

pub fn subst_formula_with_formula(
    formula: &Rc<Formula>,
    var: &str,
    replacement: &Rc<Formula>,
) -> Rc<Formula> {
    let comparison = |lhs: &Rc<Term>, rhs: &Rc<Term>| {
        (
            subst_term_with_formula(lhs, var, replacement),
            subst_term_with_formula(rhs, var, replacement),
        )
    };
    match formula.as_ref() {
        Formula::Var(name) => {
            if name == var {
                Rc::clone(replacement)
            } else {
                Rc::clone(formula)
            }
        }
        Formula::Neg(inner) => Rc::new(Formula::Neg(subst_formula_with_formula(
            inner,
            var,
            replacement,
        ))),
        Formula::And(lhs, rhs) => Rc::new(Formula::And(
            subst_formula_with_formula(lhs, var, replacement),
            subst_formula_with_formula(rhs, var, replacement),
        )),
        Formula::Or(lhs, rhs) => Rc::new(Formula::Or(
            subst_formula_with_formula(lhs, var, replacement),
            subst_formula_with_formula(rhs, var, replacement),
        )),
        Formula::Impl(lhs, rhs) => Rc::new(Formula::Impl(
            subst_formula_with_formula(lhs, var, replacement),
            subst_formula_with_formula(rhs, var, replacement),
        )),
        Formula::Eq(lhs, rhs) => {
            let (lhs, rhs) = comparison(lhs, rhs);
            Rc::new(Formula::Eq(lhs, rhs))
        }
        Formula::Lt(lhs, rhs) => {
            let (lhs, rhs) = comparison(lhs, rhs);
            Rc::new(Formula::Lt(lhs, rhs))
        }
        Formula::Leq(lhs, rhs) => {
            let (lhs, rhs) = comparison(lhs, rhs);
            Rc::new(Formula::Leq(lhs, rhs))
        }
        Formula::Geq(lhs, rhs) => {
            let (lhs, rhs) = comparison(lhs, rhs);
            Rc::new(Formula::Geq(lhs, rhs))
        }
        Formula::Gt(lhs, rhs) => {
            let (lhs, rhs) = comparison(lhs, rhs);
            Rc::new(Formula::Gt(lhs, rhs))
        }
        Formula::Top | Formula::Bot => Rc::clone(formula),
    }
}
