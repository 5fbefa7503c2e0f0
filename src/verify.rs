//! Refinement checking.
//!
//! Walks the program and fires one model-checking query per ascription: the
//! ascribed expression is rewrapped in its surrounding `let` bindings,
//! compiled to an MDP, the refinement is rewritten to PCTL, and the pair is
//! handed to PRISM. A query holds exactly when PRISM's stdout reports
//! `Result: true`.

use std::fmt;
use std::fs;
use std::io::{self, Write};
use std::path::Path;
use std::process::Command;
use std::rc::Rc;

use crate::ast::expr::Expr;
use crate::ast::types::RefinementType;
use crate::env::Env;
use crate::mdp::Mdp;
use crate::pctl::{translate_to_pctl, Pctl};
use crate::translate::{translate_to_mdp, TranslateError};

const MDP_FILE: &str = "output.mdp";
const PCTL_FILE: &str = "output.pctl";

#[derive(Debug)]
pub enum VerifyError {
    /// `letfun` bodies and applications are not checkable yet.
    Unimplemented(&'static str),
    Translate(TranslateError),
    Io(io::Error),
    /// PRISM could not be spawned at all.
    Checker(String),
}

impl fmt::Display for VerifyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VerifyError::Unimplemented(what) => {
                write!(f, "checking of {} is not implemented", what)
            }
            VerifyError::Translate(err) => write!(f, "{}", err),
            VerifyError::Io(err) => write!(f, "io error: {}", err),
            VerifyError::Checker(msg) => write!(f, "can not run the model checker: {}", msg),
        }
    }
}

impl std::error::Error for VerifyError {}

impl From<TranslateError> for VerifyError {
    fn from(err: TranslateError) -> Self {
        VerifyError::Translate(err)
    }
}

impl From<io::Error> for VerifyError {
    fn from(err: io::Error) -> Self {
        VerifyError::Io(err)
    }
}

/// Check every ascription in the program. `true` means all refinements
/// hold; `false` means some query came back unverified.
pub fn typecheck(expr: &Rc<Expr>) -> Result<bool, VerifyError> {
    typecheck_in(expr, &Env::new())
}

fn typecheck_in(expr: &Rc<Expr>, env: &Env<Expr>) -> Result<bool, VerifyError> {
    match expr.as_ref() {
        Expr::LetFun { .. } => Err(VerifyError::Unimplemented("letfun")),
        Expr::App { .. } => Err(VerifyError::Unimplemented("function application")),
        Expr::Typed { expr: inner, ty } => model_checking(&add_bindings(inner, env), ty),
        Expr::Let { name, init, body } => {
            if !typecheck_in(init, env)? {
                return Ok(false);
            }
            typecheck_in(body, &env.append(name, Rc::clone(init)))
        }
        Expr::If { cond, then, els } => Ok(typecheck_in(cond, env)?
            && typecheck_in(then, env)?
            && typecheck_in(els, env)?),
        Expr::Neg(inner) => typecheck_in(inner, env),
        Expr::BinOp { lhs, rhs, .. } => Ok(typecheck_in(lhs, env)? && typecheck_in(rhs, env)?),
        Expr::Int(_) | Expr::Bool(_) | Expr::Var(_) | Expr::Rand { .. } | Expr::Fun { .. } => {
            Ok(true)
        }
    }
}

/// Rewrap the bindings in scope as nested `let`s so the ascribed expression
/// can be compiled standalone. The newest binding ends up innermost.
fn add_bindings(expr: &Rc<Expr>, env: &Env<Expr>) -> Rc<Expr> {
    let mut acc = Rc::clone(expr);
    for (name, init) in env.elems().iter().rev() {
        acc = Rc::new(Expr::Let {
            name: name.clone(),
            init: Rc::clone(init),
            body: acc,
        });
    }
    acc
}

fn model_checking(expr: &Rc<Expr>, ty: &RefinementType) -> Result<bool, VerifyError> {
    print!("    converting the program to MDP .. ");
    io::stdout().flush()?;
    let translated = translate_to_mdp(expr)?;
    println!("done!");

    print!("    converting the type to PCTL .. ");
    io::stdout().flush()?;
    let pctl = translate_to_pctl(ty, &translated);
    println!("done!");

    print!("    checking with PRISM .. ");
    io::stdout().flush()?;
    let verdict = check_by_prism(&translated.mdp, &pctl)?;
    println!("done!");
    Ok(verdict)
}

/// Write the query files and run `prism`. Everything short of a stdout line
/// containing `Result: true` counts as unverified.
fn check_by_prism(mdp: &Mdp, pctl: &Pctl) -> Result<bool, VerifyError> {
    write_query(Path::new(MDP_FILE), Path::new(PCTL_FILE), mdp, pctl)?;

    let output = Command::new("prism")
        .arg(MDP_FILE)
        .arg(PCTL_FILE)
        .output()
        .map_err(|err| VerifyError::Checker(err.to_string()))?;

    if !output.status.success() {
        return Ok(false);
    }
    let stdout = String::from_utf8_lossy(&output.stdout);
    Ok(stdout.lines().any(|line| line.contains("Result: true")))
}

/// The query serialisation shared by the real runner and the tests.
pub fn write_query(mdp_path: &Path, pctl_path: &Path, mdp: &Mdp, pctl: &Pctl) -> io::Result<()> {
    fs::write(mdp_path, format!("{}\n", mdp))?;
    fs::write(pctl_path, format!("{}\n", pctl))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{parse, parse_reftype};

    #[test]
    fn add_bindings_wraps_newest_innermost() {
        let env: Env<Expr> = Env::new()
            .append("a", Expr::int(1))
            .append("b", Expr::var("a"));
        let wrapped = add_bindings(&Expr::var("b"), &env);
        assert_eq!(wrapped.to_string(), "Let(a, 1, Let(b, a, b))");
    }

    #[test]
    fn add_bindings_of_empty_env_is_identity() {
        let env: Env<Expr> = Env::new();
        let expr = Expr::int(3);
        assert_eq!(add_bindings(&expr, &env), expr);
    }

    #[test]
    fn letfun_is_not_checkable() {
        let expr = parse("letfun f int -> int = 1 in 2").expect("parses");
        assert!(matches!(
            typecheck(&expr),
            Err(VerifyError::Unimplemented("letfun"))
        ));
    }

    #[test]
    fn programs_without_ascriptions_hold_trivially() {
        let expr = parse("let a = rand(0, 1) in a + 1").expect("parses");
        assert!(typecheck(&expr).expect("checks"));
    }

    #[test]
    fn query_files_round_trip() {
        let dir = tempfile::tempdir().expect("tempdir");
        let expr = parse("let a = rand(0, 1) in a").expect("parses");
        let ty = parse_reftype("{x:int | Prob(x=0) = 1/2}").expect("parses");
        let translated = translate_to_mdp(&expr).expect("translates");
        let pctl = translate_to_pctl(&ty, &translated);

        let mdp_path = dir.path().join("query.mdp");
        let pctl_path = dir.path().join("query.pctl");
        write_query(&mdp_path, &pctl_path, &translated.mdp, &pctl).expect("writes");

        let mdp_text = std::fs::read_to_string(&mdp_path).expect("reads");
        assert!(mdp_text.starts_with("mdp\n\nmodule default\n"), "{}", mdp_text);
        assert!(mdp_text.trim_end().ends_with("endmodule"), "{}", mdp_text);

        let pctl_text = std::fs::read_to_string(&pctl_path).expect("reads");
        assert_eq!(pctl_text, "(Pmin=? [F location=2 & (a=0)]=(1/2))\n");
    }
}
