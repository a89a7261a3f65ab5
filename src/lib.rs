//! A teaching compiler and stack machine for a Pascal-like toy language.
//!
//! Source text is tokenized, parsed by a predictive parser driven by an
//! action-annotated grammar table, and lowered to a linear postfix
//! program which a stack machine then executes:
//!
//! ```text
//! source → lexer → tokens → parser (grammar + FIRST/FOLLOW) → postfix → executor
//! ```
//!
//! ```
//! let output = opslang::run_source("VAR a := 10; OUTPUT a;", Vec::new()).unwrap();
//! assert_eq!(output, vec!["a=10"]);
//! ```

pub mod error;
pub mod lexer;
pub mod grammar;
pub mod first_follow;
pub mod ops;
pub mod parser;
pub mod vm;
pub mod repl;

pub use error::{LexError, OpsError, ParseError, Result, RuntimeError};
pub use first_follow::Analysis;
pub use grammar::{Grammar, Rule};
pub use lexer::{tokenize, Token, TokenKind};
pub use ops::{OpsElem, OpsKind, OpsProgram};
pub use parser::Parser;
pub use repl::{Repl, ReplConfig};
pub use vm::{Binding, Executor, ExecutorConfig, InputSource, QueuedInput, StdinInput, Value};

use std::sync::OnceLock;

/// The language tables, built once and shared by every parse.
fn tables() -> &'static (Grammar, Analysis) {
    static TABLES: OnceLock<(Grammar, Analysis)> = OnceLock::new();
    TABLES.get_or_init(|| {
        let grammar = Grammar::language();
        let analysis = Analysis::of(&grammar);
        (grammar, analysis)
    })
}

/// Tokenize and parse source text into a postfix program.
pub fn compile(source: &str) -> Result<OpsProgram> {
    let (grammar, analysis) = tables();
    let tokens = tokenize(source)?;
    Ok(Parser::new(grammar, analysis, &tokens).parse()?)
}

/// Compile and run source text with pre-queued input, collecting the
/// output lines.
pub fn run_source(source: &str, input: Vec<i64>) -> Result<Vec<String>> {
    let program = compile(source)?;
    let mut executor = Executor::new().with_input(QueuedInput::new(input));
    Ok(executor.run(&program)?)
}

mod tests;
