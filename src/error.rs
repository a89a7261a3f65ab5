//! Error types for the compilation and execution pipeline.
//!
//! Each phase has its own error enum; every error is fatal to its phase
//! and carries enough context to be reported without the source text.

use thiserror::Error;

/// Lexical errors produced while scanning source text.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LexError {
    /// The scanner hit a character outside the language's alphabet.
    #[error("unknown character '{ch}' at line {line}, column {column}")]
    UnknownChar { ch: char, line: usize, column: usize },
}

/// Syntax errors produced by the predictive parser.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// A terminal in the chosen rule did not match the lookahead.
    #[error("expected '{expected}' but found '{found}' at line {line}, column {column}")]
    UnexpectedToken {
        expected: String,
        found: String,
        line: usize,
        column: usize,
    },

    /// No rule for the non-terminal applies to the current lookahead.
    #[error("no rule for '{non_terminal}' applies to '{lookahead}' at line {line}, column {column}")]
    NoRule {
        non_terminal: String,
        lookahead: String,
        line: usize,
        column: usize,
    },

    /// Tokens remained after the start symbol was fully derived.
    #[error("trailing input after program: '{found}' at line {line}, column {column}")]
    TrailingInput {
        found: String,
        line: usize,
        column: usize,
    },

    /// A back-patch action ran with an empty patch stack.
    #[error("back-patch stack empty at action '{action}'")]
    PatchUnderflow { action: String },
}

/// Runtime errors raised by the stack machine.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RuntimeError {
    /// An operation needed more operands than the stack holds.
    #[error("operand stack underflow at instruction {ip}")]
    StackUnderflow { ip: usize },

    /// `f` ran with no declared-but-uninitialized variable pending.
    #[error("initialization stack empty at 'f'")]
    InitStackEmpty,

    /// A variable was read before any value was bound to it.
    #[error("variable '{0}' is not initialized")]
    Uninitialized(String),

    /// An operand had the wrong shape for the operation consuming it.
    #[error("type mismatch: expected {expected}, found {found}")]
    TypeMismatch {
        expected: &'static str,
        found: String,
    },

    /// A number element could not be parsed as a 64-bit integer.
    #[error("malformed number literal '{0}'")]
    BadNumber(String),

    #[error("division by zero")]
    DivisionByZero,

    /// An array access fell outside the array's bounds.
    #[error("index {index} out of range for array '{name}' of length {len}")]
    IndexOutOfRange {
        name: String,
        index: i64,
        len: usize,
    },

    /// `ar` was asked to create an array with a negative length.
    #[error("invalid array length {0}")]
    InvalidArrayLength(i64),

    /// A jump consumed a label that does not have the form `M<n>`.
    #[error("malformed label '{0}'")]
    MalformedLabel(String),

    /// An operation element carried a value outside the instruction set.
    #[error("unknown opcode '{0}'")]
    UnknownOpcode(String),

    /// The input collaborator failed to produce an integer.
    #[error("failed to read input: {0}")]
    Input(String),
}

/// Umbrella error for embedders driving the whole pipeline.
#[derive(Debug, Error)]
pub enum OpsError {
    #[error("lexical error: {0}")]
    Lex(#[from] LexError),

    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("runtime error: {0}")]
    Runtime(#[from] RuntimeError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, OpsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lex_error_display() {
        let err = LexError::UnknownChar { ch: '@', line: 2, column: 7 };
        assert_eq!(err.to_string(), "unknown character '@' at line 2, column 7");
    }

    #[test]
    fn test_runtime_error_display() {
        let err = RuntimeError::IndexOutOfRange {
            name: "v".to_string(),
            index: 5,
            len: 3,
        };
        assert_eq!(err.to_string(), "index 5 out of range for array 'v' of length 3");
    }

    #[test]
    fn test_umbrella_conversion() {
        let err: OpsError = RuntimeError::DivisionByZero.into();
        assert!(matches!(err, OpsError::Runtime(_)));
        assert_eq!(err.to_string(), "runtime error: division by zero");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
        let err: OpsError = io_err.into();
        assert!(matches!(err, OpsError::Io(_)));
        assert_eq!(err.to_string(), "io error: no such file");
    }
}
