//! The annotated grammar table for the surface language.
//!
//! Every production pairs its right-hand side with a parallel list of
//! action tags. The action at index `i` runs after the symbol at index
//! `i` has been processed, so a tag can be attached to the exact point
//! in the derivation where its emission belongs. `λ` entries match no
//! input but still carry their action, which lets a rule emit an
//! element between two consumed symbols.
//!
//! Rule order within a non-terminal is load-bearing: the parser commits
//! to the first rule whose FIRST set admits the lookahead. The two
//! condition rules that both start with `(` are deliberately ordered so
//! that a parenthesis at condition head always opens a nested condition.

use std::collections::HashMap;

/// The empty production marker.
pub const LAMBDA: &str = "λ";

/// The end-of-input sentinel appended to the token stream.
pub const END: &str = "$";

/// The "no action" tag in a rule's action list.
pub const NO_ACTION: &str = "□";

/// A single production with its semantic actions.
#[derive(Debug, Clone)]
pub struct Rule {
    /// The non-terminal this rule derives.
    pub lhs: &'static str,
    /// Right-hand side symbols, in derivation order.
    pub symbols: Vec<&'static str>,
    /// Action tags, parallel to `symbols`. `□` means "no action".
    pub actions: Vec<&'static str>,
    /// Human-readable description of the rule.
    pub comment: &'static str,
}

/// The immutable rule set: an ordered mapping from non-terminal to its
/// ordered list of productions.
#[derive(Debug)]
pub struct Grammar {
    order: Vec<&'static str>,
    rules: HashMap<&'static str, Vec<Rule>>,
}

impl Grammar {
    /// The start symbol.
    pub fn start(&self) -> &'static str {
        self.order[0]
    }

    /// Productions for one non-terminal, in insertion order.
    pub fn rules_for(&self, non_terminal: &str) -> &[Rule] {
        self.rules
            .get(non_terminal)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// All `(non-terminal, rules)` pairs, in insertion order.
    pub fn all_rules(&self) -> impl Iterator<Item = (&'static str, &[Rule])> + '_ {
        self.order
            .iter()
            .map(move |nt| (*nt, self.rules[nt].as_slice()))
    }

    /// Non-terminals in insertion order.
    pub fn non_terminals(&self) -> &[&'static str] {
        &self.order
    }

    pub fn is_non_terminal(&self, symbol: &str) -> bool {
        self.rules.contains_key(symbol)
    }

    fn push(&mut self, lhs: &'static str, symbols: &[&'static str], actions: &[&'static str], comment: &'static str) {
        debug_assert!(actions.len() <= symbols.len(), "rule {lhs}: more actions than symbols");
        if !self.rules.contains_key(lhs) {
            self.order.push(lhs);
            self.rules.insert(lhs, Vec::new());
        }
        self.rules.get_mut(lhs).unwrap().push(Rule {
            lhs,
            symbols: symbols.to_vec(),
            actions: actions.to_vec(),
            comment,
        });
    }

    /// The fixed grammar of the surface language.
    ///
    /// Start symbol `A` derives a statement list; `a` stands for any
    /// identifier token and `k` for any number token.
    pub fn language() -> Self {
        let mut g = Grammar {
            order: Vec::new(),
            rules: HashMap::new(),
        };

        // Statement list
        g.push("A", &["S", "A"], &["□", "□"], "statement followed by more statements");
        g.push("A", &[LAMBDA], &["□"], "empty statement list");

        // Statements
        g.push(
            "S",
            &["VAR", "a", LAMBDA, "Q", ";"],
            &["□", "a", "n", "□", "□"],
            "scalar declaration with optional initializer",
        );
        g.push(
            "S",
            &["ARRAY", "a", "(", "E", ")", ";"],
            &["□", "a", "□", "□", "ar", "□"],
            "array declaration of the given length",
        );
        g.push(
            "S",
            &["IF", "(", "C", ")", "THEN", "{", "A", "}", "W", ";"],
            &["□", "□", "□", "7", "□", "□", "□", "8", "□", "□"],
            "conditional: 7 emits the forward jump, 8 patches it past the body",
        );
        g.push(
            "S",
            &["WHILE", "(", "C", ")", "DO", "{", "A", "}", ";"],
            &["□", "9", "□", "7", "□", "□", "□", "10", "□"],
            "loop: 9 marks the condition start, 7 the exit jump, 10 closes the loop",
        );
        g.push(
            "S",
            &["a", "I", ":", "=", "E", LAMBDA, ";"],
            &["a", "□", ":", "□", "□", "=", "□"],
            "assignment: ':' arms the pending flag, '=' after the expression fuses ':='",
        );
        g.push("S", &["OUTPUT", "E", ";"], &["□", "o", "□"], "output statement");
        g.push("S", &["INPUT", "a", "I", ";"], &["□", "a", "□", "s"], "input statement");

        // Optional initializer in a scalar declaration
        g.push(
            "Q",
            &[":", "=", "E"],
            &["□", "□", "f"],
            "initializer: f stores into the just-declared name",
        );
        g.push("Q", &[LAMBDA], &["□"], "no initializer");

        // Optional index
        g.push("I", &["[", "E", "]"], &["□", "□", "i"], "array index");
        g.push("I", &[LAMBDA], &["□"], "no index");

        // Optional ELSE branch. Tag 2 is a passthrough marker; the body
        // runs unconditionally after the THEN branch.
        g.push("W", &["ELSE", "{", "A", "}"], &["2", "□", "□", "□"], "else branch");
        g.push("W", &[LAMBDA], &["□"], "no else branch");

        // Expressions
        g.push("E", &["T", "U"], &["□", "□"], "expression");
        g.push("U", &["+", "T", "U"], &["□", "+", "□"], "addition tail");
        g.push("U", &["-", "T", "U"], &["□", "-", "□"], "subtraction tail");
        g.push("U", &[LAMBDA], &["□"], "end of additive tail");
        g.push("T", &["F", "V"], &["□", "□"], "term");
        g.push("V", &["*", "F", "V"], &["□", "*", "□"], "multiplication tail");
        g.push("V", &["/", "F", "V"], &["□", "/", "□"], "division tail");
        g.push("V", &[LAMBDA], &["□"], "end of multiplicative tail");
        g.push("F", &["a", "I"], &["a", "□"], "identifier factor, optionally indexed");
        g.push("F", &["k"], &["k"], "number factor");
        g.push("F", &["(", "E", ")"], &["□", "□", "□"], "parenthesised factor");
        g.push("F", &["-", "F"], &["□", "-'"], "unary negation");

        // Conditions. The parenthesis rule must come before the
        // expression rule: first match wins.
        g.push("C", &["(", "C", ")", "Z"], &["□", "□", "□", "□"], "grouped condition");
        g.push("C", &["!", "(", "C", ")", "Z"], &["□", "□", "□", "!", "□"], "negated condition");
        g.push("C", &["E", "K"], &["□", "□"], "comparison");
        g.push("K", &["<", "E", "Z"], &["□", "<", "□"], "less-than");
        g.push("K", &[">", "E", "Z"], &["□", ">", "□"], "greater-than");
        g.push("K", &["<=", "E", "Z"], &["□", "<=", "□"], "less-or-equal");
        g.push("K", &[">=", "E", "Z"], &["□", ">=", "□"], "greater-or-equal");
        g.push("K", &["==", "E", "Z"], &["□", "==", "□"], "equality");
        g.push("K", &["!=", "E", "Z"], &["□", "!=", "□"], "inequality");
        g.push("Z", &["AND", "C"], &["□", "AND"], "conjunction tail");
        g.push("Z", &["OR", "C"], &["□", "OR"], "disjunction tail");
        g.push("Z", &[LAMBDA], &["□"], "end of condition");

        g
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_symbol() {
        let g = Grammar::language();
        assert_eq!(g.start(), "A");
    }

    #[test]
    fn test_rule_order_is_preserved() {
        let g = Grammar::language();
        let conds = g.rules_for("C");
        assert_eq!(conds.len(), 3);
        assert_eq!(conds[0].symbols[0], "(");
        assert_eq!(conds[1].symbols[0], "!");
        assert_eq!(conds[2].symbols[0], "E");
    }

    #[test]
    fn test_actions_align_with_symbols() {
        let g = Grammar::language();
        for (nt, rules) in g.all_rules() {
            for rule in rules {
                assert!(
                    rule.actions.len() <= rule.symbols.len(),
                    "rule for {} has {} actions but {} symbols",
                    nt,
                    rule.actions.len(),
                    rule.symbols.len(),
                );
            }
        }
    }

    #[test]
    fn test_every_rhs_symbol_is_known() {
        let g = Grammar::language();
        let terminals = [
            "VAR", "ARRAY", "IF", "THEN", "ELSE", "WHILE", "DO", "OUTPUT", "INPUT",
            "AND", "OR", "a", "k", ";", ":", "=", "(", ")", "[", "]", "{", "}",
            "+", "-", "*", "/", "<", ">", "<=", ">=", "==", "!=", "!", LAMBDA,
        ];
        for (_, rules) in g.all_rules() {
            for rule in rules {
                for sym in &rule.symbols {
                    assert!(
                        g.is_non_terminal(sym) || terminals.contains(sym),
                        "unknown symbol '{}' in rule for {}",
                        sym,
                        rule.lhs,
                    );
                }
            }
        }
    }

    #[test]
    fn test_statement_rules_cover_all_forms() {
        let g = Grammar::language();
        let heads: Vec<&str> = g.rules_for("S").iter().map(|r| r.symbols[0]).collect();
        assert_eq!(heads, vec!["VAR", "ARRAY", "IF", "WHILE", "a", "OUTPUT", "INPUT"]);
    }
}
