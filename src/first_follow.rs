//! FIRST and FOLLOW set computation over the grammar table.
//!
//! Both families of sets are computed once by fixed-point iteration and
//! memoized; rule selection during parsing is then a couple of set
//! lookups. FIRST of a `λ` entry is `{λ}`, and `λ` entries contribute
//! nothing to FOLLOW propagation (they derive the empty string).

use crate::grammar::{Grammar, Rule, END, LAMBDA};
use std::collections::{HashMap, HashSet};

/// Symbol sets keyed by grammar symbol.
pub type SymbolSet = HashSet<&'static str>;

/// Memoized FIRST/FOLLOW analysis of one grammar.
#[derive(Debug)]
pub struct Analysis {
    first: HashMap<&'static str, SymbolSet>,
    follow: HashMap<&'static str, SymbolSet>,
    /// FIRST of each rule's right-hand side, parallel to
    /// `Grammar::rules_for` order.
    rule_first: HashMap<&'static str, Vec<SymbolSet>>,
}

impl Analysis {
    /// Compute FIRST and FOLLOW for the given grammar.
    pub fn of(grammar: &Grammar) -> Self {
        let first = compute_first(grammar);
        let follow = compute_follow(grammar, &first);

        let mut rule_first = HashMap::new();
        for (nt, rules) in grammar.all_rules() {
            let sets = rules
                .iter()
                .map(|rule| first_of_sequence(&first, &rule.symbols))
                .collect();
            rule_first.insert(nt, sets);
        }

        Self { first, follow, rule_first }
    }

    /// FIRST set of a single symbol.
    pub fn first(&self, symbol: &str) -> Option<&SymbolSet> {
        self.first.get(symbol)
    }

    /// FOLLOW set of a non-terminal.
    pub fn follow(&self, non_terminal: &str) -> Option<&SymbolSet> {
        self.follow.get(non_terminal)
    }

    /// Pick the production to apply for `non_terminal` on `lookahead`.
    ///
    /// Scans the rules in insertion order and commits to the first one
    /// whose RHS FIRST set contains the lookahead, or whose nullable RHS
    /// is admitted by FOLLOW of the non-terminal.
    pub fn select_rule<'g>(
        &self,
        grammar: &'g Grammar,
        non_terminal: &str,
        lookahead: &str,
    ) -> Option<&'g Rule> {
        let firsts = self.rule_first.get(non_terminal)?;
        let follow = self.follow.get(non_terminal)?;
        for (rule, rhs_first) in grammar.rules_for(non_terminal).iter().zip(firsts) {
            if rhs_first.contains(lookahead) {
                return Some(rule);
            }
            if rhs_first.contains(LAMBDA) && follow.contains(lookahead) {
                return Some(rule);
            }
        }
        None
    }
}

/// FIRST sets by fixed point: terminals seed themselves, then every rule
/// folds FIRST of its right-hand side into FIRST of its left-hand side
/// until nothing changes.
fn compute_first(grammar: &Grammar) -> HashMap<&'static str, SymbolSet> {
    let mut first: HashMap<&'static str, SymbolSet> = HashMap::new();

    for nt in grammar.non_terminals() {
        first.insert(*nt, SymbolSet::new());
    }
    for (_, rules) in grammar.all_rules() {
        for rule in rules {
            for sym in &rule.symbols {
                if !grammar.is_non_terminal(sym) {
                    first.entry(*sym).or_insert_with(|| HashSet::from([*sym]));
                }
            }
        }
    }

    let mut changed = true;
    while changed {
        changed = false;
        for (nt, rules) in grammar.all_rules() {
            for rule in rules {
                let rhs_first = first_of_sequence(&first, &rule.symbols);
                let set = first.get_mut(nt).unwrap();
                let before = set.len();
                set.extend(rhs_first);
                if set.len() != before {
                    changed = true;
                }
            }
        }
    }

    first
}

/// FIRST of a symbol sequence: accumulate `FIRST(symᵢ) \ {λ}` left to
/// right, stopping at the first symbol that cannot derive the empty
/// string; if every symbol can, the sequence itself is nullable.
fn first_of_sequence(
    first: &HashMap<&'static str, SymbolSet>,
    symbols: &[&'static str],
) -> SymbolSet {
    let mut result = SymbolSet::new();
    let mut nullable = true;

    for sym in symbols {
        if !nullable {
            break;
        }
        let sym_first = match first.get(sym) {
            Some(set) => set,
            None => break,
        };
        result.extend(sym_first.iter().copied().filter(|s| *s != LAMBDA));
        nullable = sym_first.contains(LAMBDA);
    }

    if nullable {
        result.insert(LAMBDA);
    }
    result
}

/// FOLLOW sets by fixed point: seed the start symbol with `$`, then for
/// every rule walk the right-hand side right to left carrying a trailer
/// set of what can follow the current position.
fn compute_follow(
    grammar: &Grammar,
    first: &HashMap<&'static str, SymbolSet>,
) -> HashMap<&'static str, SymbolSet> {
    let mut follow: HashMap<&'static str, SymbolSet> = HashMap::new();
    for nt in grammar.non_terminals() {
        follow.insert(*nt, SymbolSet::new());
    }
    follow.get_mut(grammar.start()).unwrap().insert(END);

    let mut changed = true;
    while changed {
        changed = false;
        for (nt, rules) in grammar.all_rules() {
            for rule in rules {
                let mut trailer = follow[nt].clone();
                for sym in rule.symbols.iter().rev() {
                    if *sym == LAMBDA {
                        continue;
                    }
                    if grammar.is_non_terminal(sym) {
                        let set = follow.get_mut(sym).unwrap();
                        let before = set.len();
                        set.extend(trailer.iter().copied());
                        if set.len() != before {
                            changed = true;
                        }
                        let sym_first = &first[sym];
                        if sym_first.contains(LAMBDA) {
                            trailer.extend(sym_first.iter().copied().filter(|s| *s != LAMBDA));
                        } else {
                            trailer = sym_first
                                .iter()
                                .copied()
                                .filter(|s| *s != LAMBDA)
                                .collect();
                        }
                    } else {
                        trailer = HashSet::from([*sym]);
                    }
                }
            }
        }
    }

    follow
}
