//! Pattern term model
//!
//! A compiled pattern is an ordered list of alternatives, each an ordered
//! sequence of terms. The tree is produced by an external pattern compiler
//! (or the `build` module) and is never mutated during matching.

use crate::class::CharClass;

/// One branch of a disjunction: an ordered concatenation of terms
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alternative {
    pub terms: Vec<Term>,
}

impl Alternative {
    /// Create an alternative from a term sequence
    pub fn new(terms: Vec<Term>) -> Self {
        Self { terms }
    }

    /// The empty alternative (matches the empty string)
    pub fn empty() -> Self {
        Self { terms: Vec::new() }
    }
}

/// Capture bookkeeping for a capturing group
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureSlot {
    /// 1-based capture index, assigned left-to-right by the compiler
    pub index: u32,
    /// Group name, when the group is named
    pub name: Option<String>,
}

/// Target of a backreference
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackrefTarget {
    /// Numbered reference (`\1`)
    Index(u32),
    /// Named reference (`\k<name>`); may resolve to several indices when
    /// the same name is declared in distinct alternatives
    Name(String),
}

/// Zero-width position assertions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnchorKind {
    /// `^` - start of input, or after a line terminator in multiline mode
    TextStart,
    /// `$` - end of input, or before a line terminator in multiline mode
    TextEnd,
    /// `\b`
    WordBoundary,
    /// `\B`
    NotWordBoundary,
}

/// Lookaround assertion kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssertionKind {
    Lookahead,
    NegativeLookahead,
    Lookbehind,
    NegativeLookbehind,
}

impl AssertionKind {
    /// Whether the assertion body consumes input right-to-left
    pub fn is_behind(self) -> bool {
        matches!(self, Self::Lookbehind | Self::NegativeLookbehind)
    }

    /// Whether the assertion succeeds when its body fails
    pub fn is_negative(self) -> bool {
        matches!(self, Self::NegativeLookahead | Self::NegativeLookbehind)
    }
}

/// One pattern element
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Term {
    /// A fixed sequence of code points
    Literal(Vec<u32>),
    /// A character class (set of code-point ranges, possibly inverted)
    Class(CharClass),
    /// A group; capturing when `capture` is present
    Group {
        body: Vec<Alternative>,
        capture: Option<CaptureSlot>,
    },
    /// A backreference; matches zero-width while the target is unset
    Backreference(BackrefTarget),
    /// A counted repetition of `body`
    Quantifier {
        body: Box<Term>,
        min: u32,
        /// `None` for unbounded (`*`, `+`, `{n,}`)
        max: Option<u32>,
        greedy: bool,
    },
    /// Ordered alternation
    Alternation(Vec<Alternative>),
    /// Zero-width position anchor
    Anchor(AnchorKind),
    /// Lookaround assertion
    Assertion {
        kind: AssertionKind,
        body: Vec<Alternative>,
    },
}

impl Term {
    /// Collect every capture index declared inside this term, in tree order
    pub fn collect_captures(&self, out: &mut Vec<u32>) {
        match self {
            Term::Literal(_) | Term::Class(_) | Term::Backreference(_) | Term::Anchor(_) => {}
            Term::Group { body, capture } => {
                if let Some(slot) = capture {
                    out.push(slot.index);
                }
                collect_alternatives(body, out);
            }
            Term::Quantifier { body, .. } => body.collect_captures(out),
            Term::Alternation(branches) => collect_alternatives(branches, out),
            Term::Assertion { body, .. } => collect_alternatives(body, out),
        }
    }
}

pub(crate) fn collect_alternatives(alternatives: &[Alternative], out: &mut Vec<u32>) {
    for alternative in alternatives {
        for term in &alternative.terms {
            term.collect_captures(out);
        }
    }
}
