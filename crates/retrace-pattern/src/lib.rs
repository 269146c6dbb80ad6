//! retrace-pattern
//!
//! Compiled pattern representation for the retrace matching engine: the term
//! tree an external pattern compiler produces, validation of its invariants,
//! case canonicalization tables, and the prefix-scan analysis the matcher
//! uses to skip ahead in long inputs.

mod analysis;
mod builder;
mod class;
mod fold;
mod pattern;
mod term;

pub use analysis::{AsciiSet, PrefixScan};
pub use class::{CharClass, MAX_CODE_POINT};
pub use pattern::{Flags, Pattern};
pub use term::{Alternative, AnchorKind, AssertionKind, BackrefTarget, CaptureSlot, Term};

/// Term-tree combinators for assembling patterns without a parser
pub mod build {
    pub use crate::builder::*;
}

/// Case canonicalization used by both analysis and the matcher
pub mod casefold {
    pub use crate::fold::{canonicalize, canonicalize_non_unicode, orbit, simple_fold};
}

/// Pattern validation error
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PatternError {
    #[error("capture index 0 is reserved for the whole match")]
    ZeroCaptureIndex,

    #[error("capture index {index} declared more than once")]
    DuplicateCaptureIndex { index: u32 },

    #[error("capture numbering has a gap: index {index} is never declared")]
    MissingCaptureIndex { index: u32 },

    #[error("backreference targets unknown group {target}")]
    UnknownBackreference { target: String },

    #[error("quantifier bounds are inverted: {{{min},{max}}}")]
    InvalidQuantifier { min: u32, max: u32 },
}
