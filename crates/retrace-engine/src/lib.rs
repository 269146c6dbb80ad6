//! retrace-engine
//!
//! Backtracking matcher for compiled retrace patterns: an input cursor with
//! surrogate-pair awareness, a capture table with undo-log backtracking, an
//! explicit backtrack-frame stack, and the match loop implementing
//! ECMA-style backreference and quantifier semantics.
//!
//! Match failure is a normal outcome, not an error; the only other
//! non-match outcome is cooperative interruption via [`Budget`].

mod budget;
mod captures;
mod engine;
mod input;
mod ops;
mod scan;

pub use budget::Budget;
pub use captures::{CaptureSnapshot, CaptureTable, EMPTY};
pub use engine::Matcher;
pub use input::{utf16, Input, ReadChar};

// The pattern-side API, re-exported so hosts depend on one crate
pub use retrace_pattern::{
    build, casefold, Alternative, AnchorKind, AssertionKind, BackrefTarget, CaptureSlot,
    CharClass, Flags, Pattern, PatternError, Term,
};

/// Result of one match call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The pattern matched; capture bounds are in code units
    Match(MatchData),
    /// All alternatives were exhausted at every start position
    NoMatch,
    /// The cancellation budget tripped before an answer was reached
    Interrupted,
}

impl Outcome {
    /// Whether this outcome is a match
    pub fn is_match(&self) -> bool {
        matches!(self, Outcome::Match(_))
    }

    /// The match data, when matched
    pub fn into_match(self) -> Option<MatchData> {
        match self {
            Outcome::Match(data) => Some(data),
            _ => None,
        }
    }
}

/// A successful match: overall bounds, per-group bounds, and the name table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchData {
    /// Match start in code units
    pub start: usize,
    /// Match end in code units (exclusive)
    pub end: usize,
    /// Bounds per capture index; slot 0 is the whole match
    pub captures: Vec<Option<(usize, usize)>>,
    /// Group name to the capture indices declared under it
    pub named: Vec<(String, Vec<u32>)>,
}

impl MatchData {
    /// Bounds of one capture group
    pub fn group(&self, index: u32) -> Option<(usize, usize)> {
        self.captures.get(index as usize).copied().flatten()
    }

    /// Bounds of a named group: whichever of its indices captured
    pub fn named_group(&self, name: &str) -> Option<(usize, usize)> {
        let (_, indices) = self.named.iter().find(|(n, _)| n == name)?;
        indices.iter().find_map(|&index| self.group(index))
    }

    /// Extract a group's text from the subject's code units
    pub fn group_text(&self, index: u32, units: &[u16]) -> Option<String> {
        let (start, end) = self.group(index)?;
        Some(String::from_utf16_lossy(&units[start..end]))
    }
}
