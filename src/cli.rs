//! Command-line interface.

use clap::Parser;
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

use crate::eval::eval;
use crate::parser;
use crate::typing::simple_typing;
use crate::verify::{typecheck, VerifyError};

#[derive(Parser)]
#[command(name = "probity")]
#[command(about = "Refinement-type checker for a probabilistic language", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to the source program
    pub file: PathBuf,
}

/// Entry point for the CLI.
pub fn run_cli() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let source = fs::read_to_string(&cli.file)
        .map_err(|err| format!("can not open file {}: {}", cli.file.display(), err))?;

    run_source(&source)
}

/// Run the pipeline on source text. Parse failures are the only errors of
/// this stage; failed checks report on stdout and return `Ok`.
pub fn run_source(source: &str) -> Result<(), Box<dyn std::error::Error>> {
    print!("parsing .. ");
    io::stdout().flush()?;
    let expr = match parser::parse(source) {
        Ok(expr) => expr,
        Err(err) => {
            println!();
            eprintln!("{}", err.display_with_source(source));
            return Err("parse failed".into());
        }
    };
    println!("passed!");

    println!("type checking ..");
    if let Err(msg) = simple_typing(&expr) {
        println!("failed at simple typing : {}", msg);
        return Ok(());
    }
    match typecheck(&expr) {
        Ok(true) => println!("passed!"),
        Ok(false) => {
            println!("failed");
            return Ok(());
        }
        Err(err @ VerifyError::Checker(_)) => {
            println!("failed : {}", err);
            return Ok(());
        }
        Err(err) => return Err(err.into()),
    }

    match eval(&expr) {
        Ok(value) => println!("=> {}", value),
        Err(err) => println!("{}", err),
    }
    Ok(())
}
