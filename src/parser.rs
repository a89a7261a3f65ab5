//! Predictive parser with embedded semantic actions.
//!
//! The parser walks the token stream under control of the grammar
//! table: for every non-terminal it selects the first applicable rule
//! (FIRST match, or FOLLOW match for a nullable right-hand side) and
//! derives it symbol by symbol. The action tag attached to each symbol
//! runs right after that symbol has been processed and appends zero or
//! more elements to the postfix output.
//!
//! Control flow is resolved by back-patching. Action `7` emits a
//! conditional forward jump whose target is unknown and parks the
//! placeholder's position on the exit-label stack; `8` patches it to
//! the current end of output. For loops, `9` records where the
//! condition starts and `10` emits the back jump and patches the exit
//! past it.

use crate::error::ParseError;
use crate::first_follow::Analysis;
use crate::grammar::{Grammar, END, LAMBDA, NO_ACTION};
use crate::lexer::{Token, TokenKind};
use crate::ops::{OpsElem, OpsProgram};
use tracing::trace;

/// The predictive parser. One instance parses one token sequence; the
/// grammar and its analysis are shared and read-only.
pub struct Parser<'g, 't> {
    grammar: &'g Grammar,
    analysis: &'g Analysis,
    tokens: &'t [Token],
    position: usize,
    output: OpsProgram,
    /// Positions of unresolved forward-jump placeholders.
    exit_labels: Vec<usize>,
    /// Positions where loop conditions start.
    loop_starts: Vec<usize>,
    /// Set by action `:`, consumed by action `=`.
    pending_assign: bool,
    last_lexeme: String,
    last_kind: TokenKind,
}

impl<'g, 't> Parser<'g, 't> {
    pub fn new(grammar: &'g Grammar, analysis: &'g Analysis, tokens: &'t [Token]) -> Self {
        Self {
            grammar,
            analysis,
            tokens,
            position: 0,
            output: OpsProgram::new(),
            exit_labels: Vec::new(),
            loop_starts: Vec::new(),
            pending_assign: false,
            last_lexeme: String::new(),
            last_kind: TokenKind::Identifier,
        }
    }

    /// Parse the whole token sequence into a postfix program.
    pub fn parse(mut self) -> Result<OpsProgram, ParseError> {
        self.parse_non_terminal(self.grammar.start())?;
        if self.lookahead() != END {
            let (line, column) = self.current_position();
            return Err(ParseError::TrailingInput {
                found: self.lookahead(),
                line,
                column,
            });
        }
        Ok(self.output)
    }

    /// The terminal the current token maps to, or `$` past the end.
    fn lookahead(&self) -> String {
        match self.tokens.get(self.position) {
            Some(token) => token.terminal(),
            None => END.to_string(),
        }
    }

    fn current_position(&self) -> (usize, usize) {
        match self.tokens.get(self.position).or_else(|| self.tokens.last()) {
            Some(token) => (token.line, token.column),
            None => (1, 1),
        }
    }

    fn parse_non_terminal(&mut self, non_terminal: &str) -> Result<(), ParseError> {
        let lookahead = self.lookahead();
        let rule = self
            .analysis
            .select_rule(self.grammar, non_terminal, &lookahead)
            .ok_or_else(|| {
                let (line, column) = self.current_position();
                ParseError::NoRule {
                    non_terminal: non_terminal.to_string(),
                    lookahead: lookahead.clone(),
                    line,
                    column,
                }
            })?;
        trace!(non_terminal, %lookahead, rule = rule.comment, "rule selected");

        // The recursion below needs self mutably; rules are short, so
        // cloning the two symbol lists is cheap.
        let symbols = rule.symbols.clone();
        let actions = rule.actions.clone();

        for (i, sym) in symbols.iter().enumerate() {
            if *sym != LAMBDA {
                if self.grammar.is_non_terminal(sym) {
                    self.parse_non_terminal(sym)?;
                } else {
                    self.match_terminal(sym)?;
                }
            }
            if let Some(action) = actions.get(i) {
                if !action.is_empty() && *action != NO_ACTION {
                    self.apply_action(action)?;
                }
            }
        }
        Ok(())
    }

    /// Match the lookahead against an expected terminal and advance,
    /// recording the consumed token as the most recently matched one.
    fn match_terminal(&mut self, expected: &str) -> Result<(), ParseError> {
        if self.lookahead() != expected {
            let (line, column) = self.current_position();
            return Err(ParseError::UnexpectedToken {
                expected: expected.to_string(),
                found: self.lookahead(),
                line,
                column,
            });
        }
        let token = &self.tokens[self.position];
        self.last_lexeme = token.lexeme.clone();
        self.last_kind = token.kind;
        self.position += 1;
        Ok(())
    }

    /// Resolve one action tag into output elements and side effects.
    fn apply_action(&mut self, tag: &str) -> Result<(), ParseError> {
        trace!(tag, lexeme = %self.last_lexeme, kind = ?self.last_kind, "action");
        match tag {
            // Emit the last matched lexeme.
            "a" => self.output.push(OpsElem::identifier(self.last_lexeme.clone())),
            "k" => self.output.push(OpsElem::number(self.last_lexeme.clone())),

            // `:` arms the pending flag; `=` later fuses the pair into
            // a single `:=` element, or emits a bare `=` when unarmed.
            ":" => self.pending_assign = true,
            "=" => {
                if self.pending_assign {
                    self.pending_assign = false;
                    self.output.push(OpsElem::operation(":="));
                } else {
                    self.output.push(OpsElem::operation("="));
                }
            }

            // Conditional forward jump with an unresolved target.
            "7" => {
                self.exit_labels.push(self.output.len());
                self.output.push(OpsElem::placeholder());
                self.output.push(OpsElem::operation("jf"));
            }

            // Resolve the most recent forward jump to "here".
            "8" => {
                let at = self.pop_exit_label("8")?;
                let target = self.output.len();
                self.output.patch(at, OpsElem::label(target));
            }

            // Remember where the loop condition starts.
            "9" => self.loop_starts.push(self.output.len()),

            // Close a loop: patch the exit jump past the two elements
            // emitted here, then jump back to the condition start.
            "10" => {
                let start = self.loop_starts.pop().ok_or_else(|| ParseError::PatchUnderflow {
                    action: "10".to_string(),
                })?;
                let at = self.pop_exit_label("10")?;
                let exit_target = self.output.len() + 2;
                self.output.patch(at, OpsElem::label(exit_target));
                self.output.push(OpsElem::label(start));
                self.output.push(OpsElem::operation("j"));
            }

            // ELSE marker; reserved, currently a passthrough.
            "2" => {}

            // Any other tag is an operation emitted verbatim.
            other => self.output.push(OpsElem::operation(other)),
        }
        Ok(())
    }

    fn pop_exit_label(&mut self, action: &str) -> Result<usize, ParseError> {
        self.exit_labels.pop().ok_or_else(|| ParseError::PatchUnderflow {
            action: action.to_string(),
        })
    }
}
