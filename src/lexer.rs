//! Lexical scanner for opslang source text.
//!
//! The scanner turns source text into an ordered sequence of tokens, each
//! a `(lexeme, kind)` pair with the line and column where it started.
//!
//! Syntax:
//! - Identifiers: letter or `_`, then letters, digits or `_`
//! - Numbers: runs of decimal digits
//! - Keywords: VAR, ARRAY, IF, THEN, ELSE, WHILE, DO, OUTPUT, INPUT,
//!   AND, OR (case-insensitive)
//! - Operators: `; ( ) [ ] { } + - * / < > <= >= == != ! : =`
//! - Comments: # line comment
//!
//! `:` and `=` are always scanned as two separate tokens, so `:=` in
//! source reaches the parser as the pair `:` `=`. The two-character
//! comparisons `<= >= == !=` are single tokens.

use crate::error::LexError;

/// The lexical class of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// A reserved word (case-insensitive).
    Keyword,
    /// A punctuation or operator lexeme.
    Operator,
    /// A decimal integer literal.
    Number,
    /// A user-chosen name (case-sensitive).
    Identifier,
}

/// A single token: lexeme, class, and source position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub lexeme: String,
    pub kind: TokenKind,
    pub line: usize,
    pub column: usize,
}

impl Token {
    /// The grammar terminal this token matches against.
    ///
    /// Keywords map to their uppercased lexeme, operators map to the
    /// lexeme verbatim, every number maps to `k` and every identifier
    /// maps to `a`.
    pub fn terminal(&self) -> String {
        match self.kind {
            TokenKind::Keyword => self.lexeme.to_uppercase(),
            TokenKind::Operator => self.lexeme.clone(),
            TokenKind::Number => "k".to_string(),
            TokenKind::Identifier => "a".to_string(),
        }
    }
}

/// Reserved words of the surface language.
const KEYWORDS: &[&str] = &[
    "VAR", "ARRAY", "IF", "THEN", "ELSE", "WHILE", "DO", "OUTPUT", "INPUT", "AND", "OR",
];

/// Tokenize source text into an ordered token sequence.
pub fn tokenize(input: &str) -> Result<Vec<Token>, LexError> {
    let chars: Vec<char> = input.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;
    let mut line = 1;
    let mut column = 1;

    while i < chars.len() {
        let c = chars[i];
        match c {
            '\n' => {
                i += 1;
                line += 1;
                column = 1;
            }

            ' ' | '\t' | '\r' => {
                i += 1;
                column += 1;
            }

            // Line comment
            '#' => {
                while i < chars.len() && chars[i] != '\n' {
                    i += 1;
                    column += 1;
                }
            }

            // Numeric literal
            c if c.is_ascii_digit() => {
                let start = i;
                let start_col = column;
                while i < chars.len() && chars[i].is_ascii_digit() {
                    i += 1;
                    column += 1;
                }
                let lexeme: String = chars[start..i].iter().collect();
                tokens.push(Token {
                    lexeme,
                    kind: TokenKind::Number,
                    line,
                    column: start_col,
                });
            }

            // Word (keyword or identifier)
            c if c.is_alphabetic() || c == '_' => {
                let start = i;
                let start_col = column;
                while i < chars.len() && (chars[i].is_alphanumeric() || chars[i] == '_') {
                    i += 1;
                    column += 1;
                }
                let lexeme: String = chars[start..i].iter().collect();
                let kind = if KEYWORDS.contains(&lexeme.to_uppercase().as_str()) {
                    TokenKind::Keyword
                } else {
                    TokenKind::Identifier
                };
                tokens.push(Token {
                    lexeme,
                    kind,
                    line,
                    column: start_col,
                });
            }

            // Two-character comparisons win over their one-character prefixes.
            '<' | '>' | '=' | '!' => {
                let start_col = column;
                let mut op = String::new();
                op.push(c);
                i += 1;
                column += 1;
                if i < chars.len() && chars[i] == '=' {
                    op.push('=');
                    i += 1;
                    column += 1;
                }
                tokens.push(Token {
                    lexeme: op,
                    kind: TokenKind::Operator,
                    line,
                    column: start_col,
                });
            }

            // Single-character operators. `:` never merges with a
            // following `=`; the grammar consumes the pair itself.
            ';' | '(' | ')' | '[' | ']' | '{' | '}' | '+' | '-' | '*' | '/' | ':' => {
                tokens.push(Token {
                    lexeme: c.to_string(),
                    kind: TokenKind::Operator,
                    line,
                    column,
                });
                i += 1;
                column += 1;
            }

            other => {
                return Err(LexError::UnknownChar {
                    ch: other,
                    line,
                    column,
                });
            }
        }
    }

    Ok(tokens)
}
