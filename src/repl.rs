//! Interactive shell for the toy language.
//!
//! Each entered line is compiled and executed as a complete statement
//! list. The variable table persists across lines, so declarations made
//! on one line are visible to the next.

use std::io::{self, Write};

use crate::ops::OpsProgram;
use crate::vm::{Executor, ExecutorConfig};

/// REPL configuration.
#[derive(Debug, Clone)]
pub struct ReplConfig {
    /// Prompt string.
    pub prompt: String,
    /// Print the compiled postfix program before running it.
    pub show_ops: bool,
}

impl Default for ReplConfig {
    fn default() -> Self {
        Self {
            prompt: "ops> ".to_string(),
            show_ops: false,
        }
    }
}

/// Interactive evaluator with a persistent variable table.
pub struct Repl {
    config: ReplConfig,
    executor: Executor,
    last_program: Option<OpsProgram>,
    history: Vec<String>,
}

impl Repl {
    /// Create a new REPL with default config.
    pub fn new() -> Self {
        Self::with_config(ReplConfig::default())
    }

    pub fn with_config(config: ReplConfig) -> Self {
        Self {
            config,
            executor: Executor::with_config(ExecutorConfig { immediate_output: true }),
            last_program: None,
            history: Vec::new(),
        }
    }

    /// Run the interactive loop until `:quit` or end of input.
    pub fn run(&mut self) -> io::Result<()> {
        println!("opslang {}", env!("CARGO_PKG_VERSION"));
        println!("Type :help for commands, :quit to exit");
        println!();

        let stdin = io::stdin();
        let mut stdout = io::stdout();
        let mut input = String::new();

        loop {
            print!("{}", self.config.prompt);
            stdout.flush()?;

            input.clear();
            if stdin.read_line(&mut input)? == 0 {
                break; // EOF
            }

            let line = input.trim();
            if line.is_empty() {
                continue;
            }

            if line.starts_with(':') {
                if self.handle_command(line) {
                    break;
                }
                continue;
            }

            self.eval(line);
            self.history.push(line.to_string());
        }

        Ok(())
    }

    /// Handle a `:command`. Returns true when the REPL should exit.
    fn handle_command(&mut self, cmd: &str) -> bool {
        match cmd {
            ":quit" | ":q" => return true,
            ":help" | ":h" => {
                println!("Commands:");
                println!("  :quit, :q     Exit");
                println!("  :help, :h     Show this help");
                println!("  :vars, :v     Show the variable table");
                println!("  :ops          Show the last compiled program");
                println!("  :clear, :c    Drop all variables");
                println!("  :history      Show entered lines");
                println!();
                println!("Anything else is compiled and run as a statement list.");
            }
            ":vars" | ":v" => self.show_variables(),
            ":ops" => match &self.last_program {
                Some(program) => println!("{}", program),
                None => println!("Nothing compiled yet."),
            },
            ":clear" | ":c" => {
                self.executor.clear_variables();
                println!("Variables cleared.");
            }
            ":history" => {
                for (i, line) in self.history.iter().enumerate() {
                    println!("{}: {}", i + 1, line);
                }
            }
            _ => println!("Unknown command: {}", cmd),
        }
        false
    }

    /// Compile and run one line. Output lines are printed as produced;
    /// the collected lines are also returned for embedders.
    pub fn eval(&mut self, line: &str) -> Option<Vec<String>> {
        let program = match crate::compile(line) {
            Ok(program) => program,
            Err(e) => {
                println!("{}", e);
                return None;
            }
        };

        if self.config.show_ops {
            println!("{}", program);
        }

        let result = self.executor.run(&program);
        self.last_program = Some(program);
        match result {
            Ok(output) => Some(output),
            Err(e) => {
                println!("runtime error: {}", e);
                None
            }
        }
    }

    fn show_variables(&self) {
        let mut names: Vec<&String> = self.executor.variables().keys().collect();
        if names.is_empty() {
            println!("(no variables)");
            return;
        }
        names.sort();
        for name in names {
            println!("  {} = {}", name, self.executor.variables()[name]);
        }
    }
}

impl Default for Repl {
    fn default() -> Self {
        Self::new()
    }
}
