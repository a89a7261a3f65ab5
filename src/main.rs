//! Command-line driver: compile a source file and run it.
//!
//! Exit code is nonzero on any lexical, parse, or runtime error; the
//! error message goes to standard error.

use std::fs;
use std::io::{self, IsTerminal, Read};
use std::path::PathBuf;
use std::process;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use opslang::vm::{Executor, ExecutorConfig, QueuedInput};
use opslang::Repl;

/// Compile and run a program, or start an interactive session.
#[derive(Parser, Debug)]
#[command(name = "opslang")]
#[command(version)]
#[command(about = "A teaching compiler and stack machine for a Pascal-like toy language")]
struct Cli {
    /// Source file to run; reads standard input when omitted
    path: Option<PathBuf>,

    /// Only report errors
    #[arg(short, long)]
    quiet: bool,

    /// Print the compiled postfix program before running it
    #[arg(long)]
    emit_ops: bool,

    /// Compile only, do not execute
    #[arg(long)]
    no_run: bool,

    /// Queue a value for INPUT (repeatable)
    #[arg(long = "input", value_name = "N", allow_negative_numbers = true)]
    input: Vec<i64>,

    /// Start an interactive session
    #[arg(long)]
    repl: bool,
}

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.quiet { "error" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    if cli.repl {
        if let Err(e) = Repl::new().run() {
            eprintln!("{}", e);
            process::exit(1);
        }
        return;
    }

    if let Err(e) = run(&cli) {
        eprintln!("{}", e);
        process::exit(1);
    }
}

fn read_source(path: Option<&std::path::Path>) -> io::Result<String> {
    match path {
        Some(path) => fs::read_to_string(path),
        None => {
            if io::stdin().is_terminal() {
                eprintln!("reading program from standard input, end with EOF");
            }
            let mut source = String::new();
            io::stdin().read_to_string(&mut source)?;
            Ok(source)
        }
    }
}

fn run(cli: &Cli) -> opslang::Result<()> {
    let source = read_source(cli.path.as_deref())?;
    let program = opslang::compile(&source)?;

    if cli.emit_ops {
        println!("{}", program);
    }
    if cli.no_run {
        return Ok(());
    }

    let mut executor = Executor::with_config(ExecutorConfig { immediate_output: true });
    if !cli.input.is_empty() {
        executor = executor.with_input(QueuedInput::new(cli.input.clone()));
    }
    executor.run(&program)?;
    Ok(())
}
