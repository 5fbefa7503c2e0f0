//! The MDP model: a single PRISM module of guarded probabilistic commands.

pub mod constant;
pub mod expr;
pub mod variable;

use std::fmt;
use std::rc::Rc;

pub use constant::{ConstValue, Constant};
pub use expr::{BinOp, MdpExpr};
pub use variable::{VarData, Variable};

/// Name of the distinguished program-counter variable.
pub const LOCATION: &str = "location";

#[derive(Debug, Clone, PartialEq)]
pub struct Branch {
    pub prob: Rc<MdpExpr>,
    pub update: Rc<MdpExpr>,
}

/// `[] guard -> p1 : u1 + p2 : u2 + ... ;`
#[derive(Debug, Clone, PartialEq)]
pub struct Command {
    pub guard: Rc<MdpExpr>,
    pub branches: Vec<Branch>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Mdp {
    pub module_name: String,
    pub variables: Vec<Variable>,
    pub constants: Vec<Constant>,
    pub commands: Vec<Command>,
}

impl Mdp {
    pub fn empty(module_name: impl Into<String>) -> Self {
        Mdp {
            module_name: module_name.into(),
            variables: Vec::new(),
            constants: Vec::new(),
            commands: Vec::new(),
        }
    }

    /// Combine two fragments. Declarations deduplicate by name and the
    /// right fragment's `location` is dropped so the result keeps exactly
    /// one; commands concatenate unconditionally.
    pub fn merge(mut lhs: Mdp, rhs: Mdp) -> Mdp {
        for var in rhs.variables {
            if var.is_int() && var.name == LOCATION {
                continue;
            }
            if lhs.variables.iter().any(|v| v.name == var.name) {
                continue;
            }
            lhs.variables.push(var);
        }
        for constant in rhs.constants {
            if lhs.constants.iter().any(|c| c.name == constant.name) {
                continue;
            }
            lhs.constants.push(constant);
        }
        lhs.commands.extend(rhs.commands);
        lhs
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.branches.is_empty() {
            return Ok(());
        }
        write!(f, "[] {} -> ", self.guard)?;
        for (i, branch) in self.branches.iter().enumerate() {
            if i > 0 {
                write!(f, "+")?;
            }
            write!(f, "{} : {}", branch.prob, branch.update)?;
        }
        write!(f, ";")
    }
}

impl fmt::Display for Mdp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "mdp")?;
        writeln!(f)?;
        writeln!(f, "module {}", self.module_name)?;
        writeln!(f)?;
        for var in &self.variables {
            writeln!(f, "{}", var)?;
        }
        for constant in &self.constants {
            writeln!(f, "{}", constant)?;
        }
        writeln!(f)?;
        for command in &self.commands {
            writeln!(f, "{}", command)?;
        }
        writeln!(f)?;
        write!(f, "endmodule")
    }
}
