//! Combinator builder for term trees
//!
//! The textual pattern parser lives upstream of this crate; hosts and tests
//! assemble trees with these combinators instead. Capture indices are passed
//! explicitly because numbering is assigned by the external compiler
//! (left-to-right by opening parenthesis).

use crate::class::CharClass;
use crate::term::{Alternative, AnchorKind, AssertionKind, BackrefTarget, CaptureSlot, Term};

/// A literal code-point sequence
pub fn lit(text: &str) -> Term {
    Term::Literal(text.chars().map(|c| c as u32).collect())
}

/// A single-character literal
pub fn ch(c: char) -> Term {
    Term::Literal(vec![c as u32])
}

/// A character class over the given members, e.g. `class_of("abc")`
pub fn class_of(members: &str) -> Term {
    Term::Class(CharClass::of(&members.chars().map(|c| c as u32).collect::<Vec<_>>()))
}

/// A character class over inclusive ranges
pub fn class(ranges: &[(char, char)]) -> Term {
    Term::Class(CharClass::new(
        ranges.iter().map(|&(lo, hi)| (lo as u32, hi as u32)).collect(),
        false,
    ))
}

/// An inverted character class over inclusive ranges
pub fn not_class(ranges: &[(char, char)]) -> Term {
    Term::Class(
        CharClass::new(ranges.iter().map(|&(lo, hi)| (lo as u32, hi as u32)).collect(), false)
            .negated(),
    )
}

/// `.` for the given dot-all mode
pub fn dot(dot_all: bool) -> Term {
    Term::Class(CharClass::dot(dot_all))
}

/// An alternative from a term sequence
pub fn seq(terms: Vec<Term>) -> Alternative {
    Alternative::new(terms)
}

/// A numbered capturing group over a single term
pub fn cap(index: u32, body: Term) -> Term {
    Term::Group {
        body: vec![Alternative::new(vec![body])],
        capture: Some(CaptureSlot { index, name: None }),
    }
}

/// A numbered capturing group over alternatives
pub fn cap_alt(index: u32, branches: Vec<Alternative>) -> Term {
    Term::Group { body: branches, capture: Some(CaptureSlot { index, name: None }) }
}

/// A named capturing group
pub fn named(index: u32, name: &str, body: Term) -> Term {
    Term::Group {
        body: vec![Alternative::new(vec![body])],
        capture: Some(CaptureSlot { index, name: Some(name.to_string()) }),
    }
}

/// A non-capturing group
pub fn group(body: Term) -> Term {
    Term::Group { body: vec![Alternative::new(vec![body])], capture: None }
}

/// A non-capturing group over a term sequence
pub fn group_seq(terms: Vec<Term>) -> Term {
    Term::Group { body: vec![Alternative::new(terms)], capture: None }
}

/// Ordered alternation over branches
pub fn alt(branches: Vec<Alternative>) -> Term {
    Term::Alternation(branches)
}

/// Alternation where each branch is a single term
pub fn alt_terms(branches: Vec<Term>) -> Term {
    Term::Alternation(branches.into_iter().map(|t| Alternative::new(vec![t])).collect())
}

/// A numbered backreference (`\1`)
pub fn backref(index: u32) -> Term {
    Term::Backreference(BackrefTarget::Index(index))
}

/// A named backreference (`\k<name>`)
pub fn named_backref(name: &str) -> Term {
    Term::Backreference(BackrefTarget::Name(name.to_string()))
}

/// General repetition: `body{min,max}` (`max == None` for unbounded)
pub fn rep(body: Term, min: u32, max: Option<u32>, greedy: bool) -> Term {
    Term::Quantifier { body: Box::new(body), min, max, greedy }
}

/// `body*`
pub fn star(body: Term) -> Term {
    rep(body, 0, None, true)
}

/// `body*?`
pub fn lazy_star(body: Term) -> Term {
    rep(body, 0, None, false)
}

/// `body+`
pub fn plus(body: Term) -> Term {
    rep(body, 1, None, true)
}

/// `body?`
pub fn opt(body: Term) -> Term {
    rep(body, 0, Some(1), true)
}

/// `body??`
pub fn lazy_opt(body: Term) -> Term {
    rep(body, 0, Some(1), false)
}

/// `^`
pub fn text_start() -> Term {
    Term::Anchor(AnchorKind::TextStart)
}

/// `$`
pub fn text_end() -> Term {
    Term::Anchor(AnchorKind::TextEnd)
}

/// `\b`
pub fn word_boundary() -> Term {
    Term::Anchor(AnchorKind::WordBoundary)
}

/// `\B`
pub fn not_word_boundary() -> Term {
    Term::Anchor(AnchorKind::NotWordBoundary)
}

/// `(?=body)`
pub fn ahead(terms: Vec<Term>) -> Term {
    Term::Assertion { kind: AssertionKind::Lookahead, body: vec![Alternative::new(terms)] }
}

/// `(?!body)`
pub fn not_ahead(terms: Vec<Term>) -> Term {
    Term::Assertion { kind: AssertionKind::NegativeLookahead, body: vec![Alternative::new(terms)] }
}

/// `(?<=body)`
pub fn behind(terms: Vec<Term>) -> Term {
    Term::Assertion { kind: AssertionKind::Lookbehind, body: vec![Alternative::new(terms)] }
}

/// `(?<!body)`
pub fn not_behind(terms: Vec<Term>) -> Term {
    Term::Assertion { kind: AssertionKind::NegativeLookbehind, body: vec![Alternative::new(terms)] }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lit_records_code_points() {
        assert_eq!(lit("a\u{10000}"), Term::Literal(vec![0x61, 0x10000]));
    }

    #[test]
    fn alt_terms_wraps_each_branch() {
        let term = alt_terms(vec![lit("ab"), lit("a")]);
        match term {
            Term::Alternation(branches) => assert_eq!(branches.len(), 2),
            other => panic!("expected alternation, got {other:?}"),
        }
    }

    #[test]
    fn quantifier_shorthands() {
        assert_eq!(star(ch('a')), rep(ch('a'), 0, None, true));
        assert_eq!(plus(ch('a')), rep(ch('a'), 1, None, true));
        assert_eq!(lazy_opt(ch('a')), rep(ch('a'), 0, Some(1), false));
    }
}
