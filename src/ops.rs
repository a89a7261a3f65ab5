//! The linear postfix intermediate representation.
//!
//! A compiled program is a flat, ordered sequence of elements. Indices
//! into the sequence are 0-based; a label `M<n>` names index `n`.

use std::fmt;
use std::ops::Index;

/// The shape of a single program element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpsKind {
    /// A variable name, pushed onto the operand stack as a name.
    Identifier,
    /// An integer literal, pushed as a signed 64-bit integer.
    Number,
    /// A resolved jump target `M<n>`.
    Label,
    /// An unresolved forward-jump target, `M?`. Must not survive parsing.
    LabelPlaceholder,
    /// An instruction dispatched by the executor.
    Operation,
}

/// One element of the postfix program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpsElem {
    pub value: String,
    pub kind: OpsKind,
}

impl OpsElem {
    pub fn identifier(name: impl Into<String>) -> Self {
        Self { value: name.into(), kind: OpsKind::Identifier }
    }

    pub fn number(literal: impl Into<String>) -> Self {
        Self { value: literal.into(), kind: OpsKind::Number }
    }

    /// A resolved label pointing at program index `target`.
    pub fn label(target: usize) -> Self {
        Self { value: format!("M{}", target), kind: OpsKind::Label }
    }

    /// The `M?` placeholder emitted before a forward target is known.
    pub fn placeholder() -> Self {
        Self { value: "M?".to_string(), kind: OpsKind::LabelPlaceholder }
    }

    pub fn operation(op: impl Into<String>) -> Self {
        Self { value: op.into(), kind: OpsKind::Operation }
    }
}

/// Parse a label value of the form `M<n>` into the index `n`.
pub fn label_target(value: &str) -> Option<usize> {
    value.strip_prefix('M')?.parse().ok()
}

/// A complete postfix program.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OpsProgram {
    elems: Vec<OpsElem>,
}

impl OpsProgram {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.elems.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elems.is_empty()
    }

    pub fn push(&mut self, elem: OpsElem) {
        self.elems.push(elem);
    }

    /// Overwrite the element at `index`; used by back-patching.
    pub fn patch(&mut self, index: usize, elem: OpsElem) {
        self.elems[index] = elem;
    }

    pub fn get(&self, index: usize) -> Option<&OpsElem> {
        self.elems.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &OpsElem> {
        self.elems.iter()
    }
}

impl Index<usize> for OpsProgram {
    type Output = OpsElem;

    fn index(&self, index: usize) -> &OpsElem {
        &self.elems[index]
    }
}

impl fmt::Display for OpsProgram {
    /// The textual form: element values joined by single spaces, in
    /// emission order.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, elem) in self.elems.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{}", elem.value)?;
        }
        Ok(())
    }
}
