pub mod expr;
pub mod logic;
pub mod types;

pub use expr::{BinOpKind, Expr};
pub use logic::{Formula, Term};
pub use types::{DependentType, Domain, RefinementType, ANON_BINDER};
