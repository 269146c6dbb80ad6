//! Unicode-mode tests
//!
//! Surrogate-pair reads, case folding under `iu` (including the fold
//! exceptions the simple uppercase rule misses), and word-boundary
//! classification on decoded code points.

use retrace_engine::build::*;
use retrace_engine::{utf16, Flags, Input, Matcher, Pattern};

fn exec(pattern: &Pattern, text: &str) -> Option<Vec<Option<String>>> {
    let units = utf16(text);
    let mut matcher = Matcher::new(pattern);
    matcher.find(&Input::new(&units), 0).into_match().map(|m| {
        m.captures
            .iter()
            .map(|c| c.map(|(s, e)| String::from_utf16_lossy(&units[s..e])))
            .collect()
    })
}

fn find(pattern: &Pattern, text: &str) -> Option<(usize, usize)> {
    let units = utf16(text);
    let mut matcher = Matcher::new(pattern);
    matcher.find(&Input::new(&units), 0).into_match().map(|m| (m.start, m.end))
}

fn is_match(pattern: &Pattern, text: &str) -> bool {
    let units = utf16(text);
    Matcher::new(pattern).is_match(&Input::new(&units), 0)
}

// ============================================================================
// SURROGATE PAIRS
// ============================================================================

#[test]
fn dot_consumes_a_whole_pair_in_unicode_mode() {
    let pattern = Pattern::new(vec![seq(vec![dot(false)])], Flags::unicode()).unwrap();
    // "\u{10000}" is [D800, DC00]; the match spans both units
    assert_eq!(find(&pattern, "\u{10000}"), Some((0, 2)));
}

#[test]
fn dot_consumes_one_unit_without_the_unicode_flag() {
    let pattern = Pattern::new(vec![seq(vec![dot(false)])], Flags::default()).unwrap();
    assert_eq!(find(&pattern, "\u{10000}"), Some((0, 1)));
}

#[test]
fn failed_reference_before_a_pair_leaves_the_cursor_intact() {
    // (a)\1*(.) against "a\u{10000}": the reference loop probes at the lead
    // surrogate, fails, and the dot must still read the full pair
    let pattern = Pattern::new(
        vec![seq(vec![cap(1, lit("a")), star(backref(1)), cap(2, dot(false))])],
        Flags::unicode(),
    )
    .unwrap();
    assert_eq!(
        exec(&pattern, "a\u{10000}"),
        Some(vec![
            Some("a\u{10000}".into()),
            Some("a".into()),
            Some("\u{10000}".into()),
        ])
    );
}

#[test]
fn astral_class_ranges() {
    let emoji = Pattern::new(
        vec![seq(vec![class(&[('\u{1F300}', '\u{1F5FF}')])])],
        Flags::unicode(),
    )
    .unwrap();
    assert_eq!(find(&emoji, "a\u{1F389}b"), Some((1, 3)));
    assert!(!is_match(&emoji, "abc"));
}

#[test]
fn class_mixing_bmp_and_astral_members() {
    let pattern = Pattern::new(
        vec![seq(vec![class(&[('a', 'a'), ('\u{10000}', '\u{10000}')])])],
        Flags::unicode(),
    )
    .unwrap();
    assert_eq!(find(&pattern, "a"), Some((0, 1)));
    assert_eq!(find(&pattern, "\u{10000}"), Some((0, 2)));
    assert!(!is_match(&pattern, "b"));
}

// ============================================================================
// CASE FOLDING EXCEPTIONS
// ============================================================================

#[test]
fn kelvin_sign_folds_to_k_in_unicode_mode() {
    // K folds to 'k' only under iu; plain i uses uppercasing, which
    // never maps a non-ASCII character into ASCII
    let kelvin = Pattern::new(
        vec![seq(vec![cap(1, ch('\u{212A}')), backref(1)])],
        Flags::ignore_case_unicode(),
    )
    .unwrap();
    assert!(is_match(&kelvin, "\u{212A}k"));
    assert!(is_match(&kelvin, "\u{212A}K"));
    assert!(is_match(&kelvin, "k\u{212A}"));

    let ascii_side = Pattern::new(
        vec![seq(vec![cap(1, ch('K')), backref(1)])],
        Flags::ignore_case_unicode(),
    )
    .unwrap();
    assert!(is_match(&ascii_side, "K\u{212A}"));

    let non_unicode = Pattern::new(
        vec![seq(vec![cap(1, ch('\u{212A}')), backref(1)])],
        Flags { ignore_case: true, ..Flags::default() },
    )
    .unwrap();
    assert!(!is_match(&non_unicode, "\u{212A}k"));
}

#[test]
fn long_s_folds_to_s_in_unicode_mode() {
    let long_s = Pattern::new(
        vec![seq(vec![cap(1, ch('\u{17F}')), backref(1)])],
        Flags::ignore_case_unicode(),
    )
    .unwrap();
    assert!(is_match(&long_s, "\u{17F}s"));
    assert!(is_match(&long_s, "\u{17F}S"));

    let ascii_side = Pattern::new(
        vec![seq(vec![cap(1, ch('S')), backref(1)])],
        Flags::ignore_case_unicode(),
    )
    .unwrap();
    assert!(is_match(&ascii_side, "S\u{17F}"));
}

#[test]
fn sigma_variants_are_one_equivalence_class() {
    let pattern = Pattern::new(
        vec![seq(vec![cap(1, ch('\u{3C3}')), backref(1), backref(1)])],
        Flags::ignore_case_unicode(),
    )
    .unwrap();
    // lowercase sigma, final sigma, capital sigma
    assert!(is_match(&pattern, "\u{3C3}\u{3C2}\u{3A3}"));
}

#[test]
fn classes_admit_fold_equivalent_members() {
    // [k] under iu accepts the Kelvin sign; without iu it does not
    let folded =
        Pattern::new(vec![seq(vec![class(&[('k', 'k')])])], Flags::ignore_case_unicode()).unwrap();
    assert!(is_match(&folded, "\u{212A}"));
    assert!(is_match(&folded, "K"));

    let plain = Pattern::new(
        vec![seq(vec![class(&[('k', 'k')])])],
        Flags { ignore_case: true, ..Flags::default() },
    )
    .unwrap();
    assert!(is_match(&plain, "K"));
    assert!(!is_match(&plain, "\u{212A}"));
}

// ============================================================================
// WORD BOUNDARIES OVER DECODED CODE POINTS
// ============================================================================

#[test]
fn non_boundary_between_two_astral_characters() {
    // \B. in unicode mode: the only non-boundary positions in
    // "\u{10000}\u{10000}" are inside the text, between non-word characters
    let pattern =
        Pattern::new(vec![seq(vec![not_word_boundary(), dot(false)])], Flags::unicode()).unwrap();
    assert_eq!(find(&pattern, "\u{10000}\u{10000}"), Some((0, 2)));

    let boundary =
        Pattern::new(vec![seq(vec![word_boundary(), dot(false)])], Flags::unicode()).unwrap();
    assert_eq!(find(&boundary, "\u{10000}\u{10000}"), None);
}

#[test]
fn boundary_between_word_char_and_astral_char() {
    // "a\u{10000}": the boundary sits after 'a'; \B. finds nothing because
    // the remaining non-boundary position has no character after it
    let pattern =
        Pattern::new(vec![seq(vec![not_word_boundary(), dot(false)])], Flags::unicode()).unwrap();
    assert_eq!(find(&pattern, "a\u{10000}"), None);
}

#[test]
fn kelvin_and_long_s_are_word_chars_only_under_iu() {
    let folded =
        Pattern::new(vec![seq(vec![word_boundary()])], Flags::ignore_case_unicode()).unwrap();
    assert!(is_match(&folded, "\u{212A}"));
    assert!(is_match(&folded, "\u{17F}"));

    let plain = Pattern::new(vec![seq(vec![word_boundary()])], Flags::unicode()).unwrap();
    assert!(!is_match(&plain, "\u{212A}"));
    assert!(!is_match(&plain, "\u{17F}"));
}

// ============================================================================
// SEARCH ADVANCEMENT
// ============================================================================

#[test]
fn search_advances_by_code_point_in_unicode_mode() {
    // 'b' after two astral characters; the scan must not start inside a pair
    let pattern = Pattern::new(vec![seq(vec![lit("b")])], Flags::unicode()).unwrap();
    assert_eq!(find(&pattern, "\u{10000}\u{10001}b"), Some((4, 5)));
}

#[test]
fn supplementary_literal_matches_either_mode() {
    // In non-unicode mode the literal lowers to its two surrogate units
    let unicode = Pattern::new(vec![seq(vec![lit("\u{10000}")])], Flags::unicode()).unwrap();
    let plain = Pattern::new(vec![seq(vec![lit("\u{10000}")])], Flags::default()).unwrap();
    assert_eq!(find(&unicode, "x\u{10000}"), Some((1, 3)));
    assert_eq!(find(&plain, "x\u{10000}"), Some((1, 3)));
}
