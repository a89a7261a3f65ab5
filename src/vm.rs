//! Stack machine for postfix program execution.
//!
//! The executor walks the program element by element. Identifiers,
//! numbers and labels push themselves onto the operand stack; operation
//! elements pop their operands, dispatch on the opcode, and may
//! overwrite the instruction pointer (jumps). The operand stack is
//! heterogeneous: integers, booleans, bare names, labels and array
//! references all travel through it, and each opcode coerces what it
//! pops.
//!
//! Names are late-bound. An identifier element pushes the *name*; only
//! the consuming opcode decides whether it wants the name itself (`n`,
//! `ar`, `i`, `s`, assignment targets) or the bound value (arithmetic,
//! comparisons, assignment sources).

use crate::error::RuntimeError;
use crate::ops::{label_target, OpsKind, OpsProgram};
use std::collections::HashMap;
use std::fmt;
use std::io::{self, BufRead, Write};
use tracing::trace;

/// A value on the operand stack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Int(i64),
    Bool(bool),
    /// A bare identifier, not yet looked up.
    Name(String),
    /// A jump target in textual form, `M<n>`.
    Label(String),
    /// A reference to one array slot, built by `i`.
    ArrayRef { name: String, index: i64 },
}

impl Value {
    /// Human-readable shape name for error messages.
    fn shape(&self) -> String {
        match self {
            Value::Int(v) => format!("integer {}", v),
            Value::Bool(v) => format!("boolean {}", v),
            Value::Name(n) => format!("identifier '{}'", n),
            Value::Label(l) => format!("label '{}'", l),
            Value::ArrayRef { name, index } => format!("array reference '{}[{}]'", name, index),
        }
    }
}

/// A variable table entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Binding {
    Int(i64),
    Bool(bool),
    /// Fixed-length integer array.
    Array(Vec<i64>),
}

impl fmt::Display for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Binding::Int(v) => write!(f, "{}", v),
            Binding::Bool(v) => write!(f, "{}", v),
            Binding::Array(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
        }
    }
}

/// Source of integers for the `s` (INPUT) instruction.
pub trait InputSource {
    /// Produce the next input integer. `prompt_hint` names the variable
    /// being read; interactive sources may show it.
    fn next_integer(&mut self, prompt_hint: &str) -> Result<i64, RuntimeError>;
}

/// Interactive input from standard input. Prompts with the variable
/// name and retries until a line parses as an integer.
#[derive(Debug, Default)]
pub struct StdinInput;

impl InputSource for StdinInput {
    fn next_integer(&mut self, prompt_hint: &str) -> Result<i64, RuntimeError> {
        let stdin = io::stdin();
        let mut line = String::new();
        loop {
            print!("{}? ", prompt_hint);
            io::stdout().flush().ok();
            line.clear();
            let read = stdin
                .lock()
                .read_line(&mut line)
                .map_err(|e| RuntimeError::Input(e.to_string()))?;
            if read == 0 {
                return Err(RuntimeError::Input("end of input".to_string()));
            }
            match line.trim().parse() {
                Ok(value) => return Ok(value),
                Err(_) => println!("expected an integer, try again"),
            }
        }
    }
}

/// Pre-queued input values, consumed front to back. Used by tests and
/// the `--input` command-line flag.
#[derive(Debug, Clone, Default)]
pub struct QueuedInput {
    values: Vec<i64>,
    cursor: usize,
}

impl QueuedInput {
    pub fn new(values: Vec<i64>) -> Self {
        Self { values, cursor: 0 }
    }
}

impl InputSource for QueuedInput {
    fn next_integer(&mut self, _prompt_hint: &str) -> Result<i64, RuntimeError> {
        match self.values.get(self.cursor) {
            Some(value) => {
                self.cursor += 1;
                Ok(*value)
            }
            None => Err(RuntimeError::Input("input queue exhausted".to_string())),
        }
    }
}

/// Configuration for the executor.
#[derive(Debug, Clone, Default)]
pub struct ExecutorConfig {
    /// Print each output line as it is produced.
    pub immediate_output: bool,
}

/// The postfix program executor.
///
/// The variable table survives across runs so an embedder (the REPL)
/// can execute several programs against the same state. The operand
/// and initialization stacks are per-run.
pub struct Executor {
    pub config: ExecutorConfig,
    variables: HashMap<String, Binding>,
    input: Box<dyn InputSource>,
}

impl Executor {
    /// Executor with default configuration and interactive input.
    pub fn new() -> Self {
        Self::with_config(ExecutorConfig::default())
    }

    pub fn with_config(config: ExecutorConfig) -> Self {
        Self {
            config,
            variables: HashMap::new(),
            input: Box::new(StdinInput),
        }
    }

    /// Replace the input collaborator.
    pub fn with_input(mut self, input: impl InputSource + 'static) -> Self {
        self.input = Box::new(input);
        self
    }

    /// Current value of one variable.
    pub fn variable(&self, name: &str) -> Option<&Binding> {
        self.variables.get(name)
    }

    /// Snapshot of the whole variable table.
    pub fn variables(&self) -> &HashMap<String, Binding> {
        &self.variables
    }

    /// Drop all variables.
    pub fn clear_variables(&mut self) {
        self.variables.clear();
    }

    /// Run a program to completion, returning the output lines.
    pub fn run(&mut self, program: &OpsProgram) -> Result<Vec<String>, RuntimeError> {
        let mut stack: Vec<Value> = Vec::new();
        let mut inits: Vec<String> = Vec::new();
        let mut output: Vec<String> = Vec::new();
        let mut ip = 0;

        while ip < program.len() {
            let elem = &program[ip];
            trace!(ip, value = %elem.value, kind = ?elem.kind, depth = stack.len(), "step");
            match elem.kind {
                OpsKind::Identifier => stack.push(Value::Name(elem.value.clone())),
                OpsKind::Number => {
                    let parsed = elem
                        .value
                        .parse()
                        .map_err(|_| RuntimeError::BadNumber(elem.value.clone()))?;
                    stack.push(Value::Int(parsed));
                }
                OpsKind::Label | OpsKind::LabelPlaceholder => {
                    stack.push(Value::Label(elem.value.clone()));
                }
                OpsKind::Operation => {
                    let jump = self.execute_op(
                        &elem.value,
                        ip,
                        program.len(),
                        &mut stack,
                        &mut inits,
                        &mut output,
                    )?;
                    if let Some(target) = jump {
                        ip = target;
                        continue;
                    }
                }
            }
            ip += 1;
        }

        Ok(output)
    }

    /// Execute one operation. Returns the new instruction pointer when
    /// the operation is a taken jump.
    fn execute_op(
        &mut self,
        op: &str,
        ip: usize,
        program_len: usize,
        stack: &mut Vec<Value>,
        inits: &mut Vec<String>,
        output: &mut Vec<String>,
    ) -> Result<Option<usize>, RuntimeError> {
        match op {
            // Binary arithmetic, integer operands, wrapping.
            "+" | "-" | "*" | "/" => {
                let b = self.as_integer(pop(stack, ip)?)?;
                let a = self.as_integer(pop(stack, ip)?)?;
                let result = match op {
                    "+" => a.wrapping_add(b),
                    "-" => a.wrapping_sub(b),
                    "*" => a.wrapping_mul(b),
                    _ => {
                        if b == 0 {
                            return Err(RuntimeError::DivisionByZero);
                        }
                        a.wrapping_div(b)
                    }
                };
                stack.push(Value::Int(result));
            }

            // Unary negation.
            "-'" => {
                let a = self.as_integer(pop(stack, ip)?)?;
                stack.push(Value::Int(a.wrapping_neg()));
            }

            // Comparisons, integer operands.
            "<" | ">" | "<=" | ">=" | "==" | "!=" => {
                let b = self.as_integer(pop(stack, ip)?)?;
                let a = self.as_integer(pop(stack, ip)?)?;
                let result = match op {
                    "<" => a < b,
                    ">" => a > b,
                    "<=" => a <= b,
                    ">=" => a >= b,
                    "==" => a == b,
                    _ => a != b,
                };
                stack.push(Value::Bool(result));
            }

            // Boolean connectives. Both operands are already on the
            // stack, so evaluation is never short-circuit.
            "AND" | "OR" => {
                let b = self.as_boolean(pop(stack, ip)?)?;
                let a = self.as_boolean(pop(stack, ip)?)?;
                stack.push(Value::Bool(if op == "AND" { a && b } else { a || b }));
            }

            "!" => {
                let a = self.as_boolean(pop(stack, ip)?)?;
                stack.push(Value::Bool(!a));
            }

            // Conditional jump, taken when the condition is false.
            "jf" => {
                let target = self.as_label(pop(stack, ip)?, program_len)?;
                let cond = self.as_boolean(pop(stack, ip)?)?;
                if !cond {
                    return Ok(Some(target));
                }
            }

            // Unconditional jump.
            "j" => {
                let target = self.as_label(pop(stack, ip)?, program_len)?;
                return Ok(Some(target));
            }

            // Declare a scalar. Redeclaration keeps the current value.
            "n" => {
                let name = self.pop_name(stack, ip)?;
                self.variables.entry(name.clone()).or_insert(Binding::Int(0));
                inits.push(name);
            }

            // Declare a zero-filled array of the given length.
            "ar" => {
                let size = self.as_integer(pop(stack, ip)?)?;
                let name = self.pop_name(stack, ip)?;
                if size < 0 {
                    return Err(RuntimeError::InvalidArrayLength(size));
                }
                self.variables.insert(name.clone(), Binding::Array(vec![0; size as usize]));
                inits.push(name);
            }

            // Store into the most recently declared variable. The
            // initialization stack is peeked, not popped.
            "f" => {
                let name = inits.last().ok_or(RuntimeError::InitStackEmpty)?.clone();
                let value = self.resolve(pop(stack, ip)?)?;
                let binding = self.to_binding(value)?;
                self.variables.insert(name, binding);
            }

            // Build an array reference from name and index.
            "i" => {
                let index = self.as_integer(pop(stack, ip)?)?;
                let name = self.pop_name(stack, ip)?;
                stack.push(Value::ArrayRef { name, index });
            }

            // Read one integer into a scalar and leave it on the stack.
            "s" => {
                let name = self.pop_name(stack, ip)?;
                let value = self.input.next_integer(&name)?;
                self.variables.insert(name, Binding::Int(value));
                stack.push(Value::Int(value));
            }

            // Emit one output line. A bound bare name prints as
            // `name=value`; everything else prints as the bare value.
            "o" => {
                let value = pop(stack, ip)?;
                let line = match &value {
                    Value::Name(name) if self.variables.contains_key(name) => {
                        format!("{}={}", name, self.variables[name])
                    }
                    _ => match self.resolve(value)? {
                        Value::Int(v) => v.to_string(),
                        Value::Bool(v) => v.to_string(),
                        Value::Name(n) => n,
                        Value::Label(l) => l,
                        Value::ArrayRef { name, index } => format!("{}[{}]", name, index),
                    },
                };
                if self.config.immediate_output {
                    println!("{}", line);
                }
                output.push(line);
            }

            // Assignment. The source is resolved to a value, the target
            // is either an array slot or a scalar name.
            ":=" | "=" => {
                let source = self.resolve(pop(stack, ip)?)?;
                let target = pop(stack, ip)?;
                match target {
                    Value::ArrayRef { name, index } => {
                        let value = match source {
                            Value::Int(v) => v,
                            other => {
                                return Err(RuntimeError::TypeMismatch {
                                    expected: "integer",
                                    found: other.shape(),
                                })
                            }
                        };
                        self.array_set(&name, index, value)?;
                    }
                    Value::Name(name) => {
                        let binding = self.to_binding(source)?;
                        self.variables.insert(name, binding);
                    }
                    other => {
                        return Err(RuntimeError::TypeMismatch {
                            expected: "assignable target",
                            found: other.shape(),
                        })
                    }
                }
            }

            // Syntactic marker, does nothing at runtime.
            ":" => {}

            other => return Err(RuntimeError::UnknownOpcode(other.to_string())),
        }

        Ok(None)
    }

    /// Coerce an operand to an integer.
    fn as_integer(&self, value: Value) -> Result<i64, RuntimeError> {
        match value {
            Value::Int(v) => Ok(v),
            Value::Name(name) => match self.variables.get(&name) {
                Some(Binding::Int(v)) => Ok(*v),
                Some(other) => Err(RuntimeError::TypeMismatch {
                    expected: "integer",
                    found: format!("'{}' bound to {}", name, other),
                }),
                None => Err(RuntimeError::Uninitialized(name)),
            },
            Value::ArrayRef { name, index } => self.array_get(&name, index),
            other => Err(RuntimeError::TypeMismatch {
                expected: "integer",
                found: other.shape(),
            }),
        }
    }

    /// Coerce an operand to a boolean. Integers count as true when
    /// nonzero; nothing else converts.
    fn as_boolean(&self, value: Value) -> Result<bool, RuntimeError> {
        match value {
            Value::Bool(v) => Ok(v),
            Value::Int(v) => Ok(v != 0),
            other => Err(RuntimeError::TypeMismatch {
                expected: "boolean",
                found: other.shape(),
            }),
        }
    }

    /// Coerce an operand to a jump target index.
    fn as_label(&self, value: Value, program_len: usize) -> Result<usize, RuntimeError> {
        let text = match value {
            Value::Label(text) => text,
            other => {
                return Err(RuntimeError::TypeMismatch {
                    expected: "label",
                    found: other.shape(),
                })
            }
        };
        let target = label_target(&text).ok_or_else(|| RuntimeError::MalformedLabel(text.clone()))?;
        if target > program_len {
            return Err(RuntimeError::MalformedLabel(text));
        }
        Ok(target)
    }

    /// Resolve an operand to its value: array references are read, bound
    /// names are dereferenced, and an *unbound* name stays a name. The
    /// last case lets `o` print unbound identifiers literally; assignment
    /// converts the leftover name into an uninitialized-variable error.
    fn resolve(&self, value: Value) -> Result<Value, RuntimeError> {
        match value {
            Value::ArrayRef { name, index } => Ok(Value::Int(self.array_get(&name, index)?)),
            Value::Name(name) => match self.variables.get(&name) {
                Some(Binding::Int(v)) => Ok(Value::Int(*v)),
                Some(Binding::Bool(v)) => Ok(Value::Bool(*v)),
                Some(Binding::Array(_)) => Err(RuntimeError::TypeMismatch {
                    expected: "scalar",
                    found: format!("array '{}'", name),
                }),
                None => Ok(Value::Name(name)),
            },
            other => Ok(other),
        }
    }

    /// Convert a resolved value into a variable binding.
    fn to_binding(&self, value: Value) -> Result<Binding, RuntimeError> {
        match value {
            Value::Int(v) => Ok(Binding::Int(v)),
            Value::Bool(v) => Ok(Binding::Bool(v)),
            Value::Name(name) => Err(RuntimeError::Uninitialized(name)),
            other => Err(RuntimeError::TypeMismatch {
                expected: "integer or boolean",
                found: other.shape(),
            }),
        }
    }

    fn pop_name(&self, stack: &mut Vec<Value>, ip: usize) -> Result<String, RuntimeError> {
        match pop(stack, ip)? {
            Value::Name(name) => Ok(name),
            other => Err(RuntimeError::TypeMismatch {
                expected: "identifier",
                found: other.shape(),
            }),
        }
    }

    fn array_get(&self, name: &str, index: i64) -> Result<i64, RuntimeError> {
        match self.variables.get(name) {
            Some(Binding::Array(items)) => {
                if index < 0 || index as usize >= items.len() {
                    return Err(RuntimeError::IndexOutOfRange {
                        name: name.to_string(),
                        index,
                        len: items.len(),
                    });
                }
                Ok(items[index as usize])
            }
            Some(other) => Err(RuntimeError::TypeMismatch {
                expected: "array",
                found: format!("'{}' bound to {}", name, other),
            }),
            None => Err(RuntimeError::Uninitialized(name.to_string())),
        }
    }

    fn array_set(&mut self, name: &str, index: i64, value: i64) -> Result<(), RuntimeError> {
        match self.variables.get_mut(name) {
            Some(Binding::Array(items)) => {
                if index < 0 || index as usize >= items.len() {
                    return Err(RuntimeError::IndexOutOfRange {
                        name: name.to_string(),
                        index,
                        len: items.len(),
                    });
                }
                items[index as usize] = value;
                Ok(())
            }
            Some(other) => Err(RuntimeError::TypeMismatch {
                expected: "array",
                found: format!("'{}' bound to {}", name, other),
            }),
            None => Err(RuntimeError::Uninitialized(name.to_string())),
        }
    }
}

impl Default for Executor {
    fn default() -> Self {
        Self::new()
    }
}

/// Pop the operand stack or report underflow at the given instruction.
fn pop(stack: &mut Vec<Value>, ip: usize) -> Result<Value, RuntimeError> {
    stack.pop().ok_or(RuntimeError::StackUnderflow { ip })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::first_follow::Analysis;
    use crate::grammar::Grammar;
    use crate::lexer::tokenize;
    use crate::ops::OpsElem;
    use crate::parser::Parser;

    fn compile(source: &str) -> OpsProgram {
        let grammar = Grammar::language();
        let analysis = Analysis::of(&grammar);
        let tokens = tokenize(source).expect("lexing failed");
        Parser::new(&grammar, &analysis, &tokens).parse().expect("parsing failed")
    }

    fn run(source: &str) -> Result<Vec<String>, RuntimeError> {
        Executor::new().run(&compile(source))
    }

    fn run_with_input(source: &str, input: Vec<i64>) -> Result<Vec<String>, RuntimeError> {
        Executor::new().with_input(QueuedInput::new(input)).run(&compile(source))
    }

    #[test]
    fn test_scalar_declaration_and_output() {
        assert_eq!(run("VAR a := 10; OUTPUT a;").unwrap(), vec!["a=10"]);
    }

    #[test]
    fn test_arithmetic_with_parentheses() {
        let output = run("VAR x := 3; VAR y := 4; VAR z := (x + y) * 2; OUTPUT z;").unwrap();
        assert_eq!(output, vec!["z=14"]);
    }

    #[test]
    fn test_if_taken() {
        assert_eq!(run("VAR a := 7; IF (a >= 5) THEN { OUTPUT a; } ;").unwrap(), vec!["a=7"]);
    }

    #[test]
    fn test_if_not_taken() {
        assert!(run("VAR a := 2; IF (a >= 5) THEN { OUTPUT a; } ;").unwrap().is_empty());
    }

    #[test]
    fn test_while_counts_up() {
        let output = run("VAR a := 0; VAR n := 5; WHILE (a < n) DO { a := a + 1; } ; OUTPUT a;")
            .unwrap();
        assert_eq!(output, vec!["a=5"]);
    }

    #[test]
    fn test_array_sum() {
        let source = "ARRAY v (3); v[0] := 10; v[1] := 20; v[2] := v[0] + v[1]; OUTPUT v[2];";
        // Array-reference output carries no name= prefix.
        assert_eq!(run(source).unwrap(), vec!["30"]);
    }

    #[test]
    fn test_input_round_trip() {
        let output = run_with_input("VAR a; INPUT a; OUTPUT a;", vec![42]).unwrap();
        assert_eq!(output, vec!["a=42"]);
    }

    #[test]
    fn test_output_expression_is_bare() {
        assert_eq!(run("VAR a := 10; OUTPUT a + 1;").unwrap(), vec!["11"]);
    }

    #[test]
    fn test_output_unbound_name_prints_literally() {
        assert_eq!(run("OUTPUT hello;").unwrap(), vec!["hello"]);
    }

    #[test]
    fn test_else_branch_runs_unconditionally() {
        // The ELSE marker is a passthrough: when the condition holds,
        // both branches run; when it fails, only the else branch does.
        let source = "VAR a := 1; IF (a == 1) THEN { OUTPUT 1; } ELSE { OUTPUT 2; } ;";
        assert_eq!(run(source).unwrap(), vec!["1", "2"]);
        let source = "VAR a := 0; IF (a == 1) THEN { OUTPUT 1; } ELSE { OUTPUT 2; } ;";
        assert_eq!(run(source).unwrap(), vec!["2"]);
    }

    #[test]
    fn test_nested_loops() {
        let source = "VAR i := 0; VAR total := 0; \
                      WHILE (i < 3) DO { \
                        VAR j := 0; \
                        WHILE (j < 2) DO { total := total + 1; j := j + 1; } ; \
                        i := i + 1; \
                      } ; \
                      OUTPUT total;";
        assert_eq!(run(source).unwrap(), vec!["total=6"]);
    }

    #[test]
    fn test_condition_connectives_and_negation() {
        let source = "VAR a := 3; IF ((a > 0) AND (a < 5)) THEN { OUTPUT a; } ;";
        assert_eq!(run(source).unwrap(), vec!["a=3"]);
        let source = "VAR a := 3; IF (!(a == 3)) THEN { OUTPUT a; } ;";
        assert!(run(source).unwrap().is_empty());
    }

    #[test]
    fn test_division_truncates_toward_zero() {
        assert_eq!(run("OUTPUT 7 / 2;").unwrap(), vec!["3"]);
        assert_eq!(run("OUTPUT -7 / 2;").unwrap(), vec!["-3"]);
    }

    #[test]
    fn test_division_by_zero() {
        assert_eq!(run("OUTPUT 1 / 0;").unwrap_err(), RuntimeError::DivisionByZero);
    }

    #[test]
    fn test_uninitialized_read_in_arithmetic() {
        assert_eq!(
            run("OUTPUT x + 1;").unwrap_err(),
            RuntimeError::Uninitialized("x".to_string())
        );
    }

    #[test]
    fn test_index_out_of_range() {
        let err = run("ARRAY v (3); OUTPUT v[5];").unwrap_err();
        assert_eq!(
            err,
            RuntimeError::IndexOutOfRange { name: "v".to_string(), index: 5, len: 3 }
        );
        assert!(err.to_string().contains("index 5 out of range"));
    }

    #[test]
    fn test_negative_index_is_out_of_range() {
        let err = run("ARRAY v (3); VAR k := 0 - 1; OUTPUT v[k];").unwrap_err();
        assert!(matches!(err, RuntimeError::IndexOutOfRange { index: -1, .. }));
    }

    #[test]
    fn test_input_into_array_slot_is_rejected() {
        let err = run_with_input("ARRAY v (2); INPUT v[0];", vec![1]).unwrap_err();
        assert!(matches!(err, RuntimeError::TypeMismatch { expected: "identifier", .. }));
    }

    #[test]
    fn test_declared_scalar_defaults_to_zero() {
        assert_eq!(run("VAR a; OUTPUT a;").unwrap(), vec!["a=0"]);
    }

    #[test]
    fn test_init_stack_is_peeked_not_popped() {
        // A hand-built program with two `f` stores after one `n`
        // declaration: both hit the same name.
        let mut program = OpsProgram::new();
        program.push(OpsElem::identifier("x"));
        program.push(OpsElem::operation("n"));
        program.push(OpsElem::number("1"));
        program.push(OpsElem::operation("f"));
        program.push(OpsElem::number("2"));
        program.push(OpsElem::operation("f"));
        let mut executor = Executor::new();
        executor.run(&program).unwrap();
        assert_eq!(executor.variable("x"), Some(&Binding::Int(2)));
    }

    #[test]
    fn test_init_stack_empty_at_f() {
        let mut program = OpsProgram::new();
        program.push(OpsElem::number("1"));
        program.push(OpsElem::operation("f"));
        let err = Executor::new().run(&program).unwrap_err();
        assert_eq!(err, RuntimeError::InitStackEmpty);
    }

    #[test]
    fn test_bare_equals_assigns() {
        // The `=` opcode emitted without a pending `:` still stores.
        let mut program = OpsProgram::new();
        program.push(OpsElem::identifier("x"));
        program.push(OpsElem::number("5"));
        program.push(OpsElem::operation("="));
        let mut executor = Executor::new();
        executor.run(&program).unwrap();
        assert_eq!(executor.variable("x"), Some(&Binding::Int(5)));
    }

    #[test]
    fn test_stack_underflow() {
        let mut program = OpsProgram::new();
        program.push(OpsElem::operation("+"));
        let err = Executor::new().run(&program).unwrap_err();
        assert_eq!(err, RuntimeError::StackUnderflow { ip: 0 });
    }

    #[test]
    fn test_unknown_opcode() {
        let mut program = OpsProgram::new();
        program.push(OpsElem::operation("frobnicate"));
        let err = Executor::new().run(&program).unwrap_err();
        assert_eq!(err, RuntimeError::UnknownOpcode("frobnicate".to_string()));
    }

    #[test]
    fn test_malformed_label() {
        let mut program = OpsProgram::new();
        program.push(OpsElem::placeholder());
        program.push(OpsElem::operation("j"));
        let err = Executor::new().run(&program).unwrap_err();
        assert_eq!(err, RuntimeError::MalformedLabel("M?".to_string()));
    }

    #[test]
    fn test_jump_past_end_is_rejected() {
        let mut program = OpsProgram::new();
        program.push(OpsElem::label(99));
        program.push(OpsElem::operation("j"));
        let err = Executor::new().run(&program).unwrap_err();
        assert_eq!(err, RuntimeError::MalformedLabel("M99".to_string()));
    }

    #[test]
    fn test_variables_persist_across_runs() {
        let mut executor = Executor::new();
        executor.run(&compile("VAR a := 1;")).unwrap();
        let output = executor.run(&compile("a := a + 1; OUTPUT a;")).unwrap();
        assert_eq!(output, vec!["a=2"]);
    }
}
