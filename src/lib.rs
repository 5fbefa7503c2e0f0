//! Probity: a refinement-type checker for a small probabilistic functional
//! language.
//!
//! A program is a pure expression extended with `rand(a,b)` and type
//! ascriptions `e : {x:t | phi}` whose refinements may quote probabilities
//! via `Prob(psi)`. Checking an ascription is a probabilistic
//! model-checking query: the expression compiles to a PRISM MDP module, the
//! refinement rewrites to a PCTL property, and PRISM's verdict is the type
//! checker's verdict.
//!
//! Pipeline: [`lexer`]/[`parser`] build the AST, [`typing`] establishes
//! simple types, [`translate`] compiles to the MDP, [`pctl`] produces the
//! property, and [`verify`] drives the external checker. [`eval`] is a
//! debugging evaluator the CLI runs after a successful check.

pub mod ast;
pub mod bound;
pub mod cli;
pub mod env;
pub mod error;
pub mod eval;
pub mod lexer;
pub mod mdp;
pub mod parser;
pub mod pctl;
pub mod style;
pub mod subst;
pub mod token;
pub mod translate;
pub mod typing;
pub mod verify;

pub use ast::{Expr, Formula, Term};
pub use error::{ParseError, ParseErrorKind};
pub use pctl::{translate_to_pctl, Pctl};
pub use translate::{translate_to_mdp, TranslationResult, Translator};
pub use typing::{simple_typing, SimpleType};
