//! Backtracking correctness tests
//!
//! Focused on the retry-from-begin-index rule: when an alternative inside a
//! quantified group fails, the next alternative must be tried at the
//! iteration's start offset, not wherever the failed alternative stopped.

use retrace_engine::build::*;
use retrace_engine::{utf16, Flags, Input, Matcher, Pattern};

/// Match and render every group as an owned string (None = unset group)
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

fn groups(values: &[&str]) -> Option<Vec<Option<String>>> {
    Some(values.iter().map(|v| Some(v.to_string())).collect())
}

// ============================================================================
// ALTERNATIVES OF DIFFERENT LENGTHS
// ============================================================================

#[test]
fn longer_alternative_fails_shorter_retries_at_same_offset() {
    // (ab|a){2}c against "abac": iteration 2 must retry "a" at offset 2
    let single = Pattern::new(
        vec![seq(vec![
            cap_alt(1, vec![seq(vec![lit("ab")]), seq(vec![lit("a")])]),
            lit("c"),
        ])],
        Flags::default(),
    )
    .unwrap();
    let repeated = Pattern::new(
        vec![seq(vec![
            rep(cap_alt(1, vec![seq(vec![lit("ab")]), seq(vec![lit("a")])]), 2, Some(2), true),
            lit("c"),
        ])],
        Flags::default(),
    )
    .unwrap();
    assert_eq!(exec(&single, "abc"), groups(&["abc", "ab"]));
    assert_eq!(exec(&repeated, "abac"), groups(&["abac", "a"]));
    assert_eq!(exec(&repeated, "ababc"), groups(&["ababc", "ab"]));
    assert_eq!(exec(&repeated, "aac"), groups(&["aac", "a"]));
}

#[test]
fn three_alternatives_of_decreasing_length() {
    // (abc|ab|a){2}d
    let pattern = Pattern::new(
        vec![seq(vec![
            rep(
                cap_alt(1, vec![seq(vec![lit("abc")]), seq(vec![lit("ab")]), seq(vec![lit("a")])]),
                2,
                Some(2),
                true,
            ),
            lit("d"),
        ])],
        Flags::default(),
    )
    .unwrap();
    assert_eq!(exec(&pattern, "abcabd"), groups(&["abcabd", "ab"]));
    assert_eq!(exec(&pattern, "aad"), groups(&["aad", "a"]));
    assert_eq!(exec(&pattern, "abcabcd"), groups(&["abcabcd", "abc"]));
    assert_eq!(exec(&pattern, "ad"), None);
}

#[test]
fn shorter_alternative_first() {
    // (a|ab){2}c - ordered choice prefers "a", backtracking grows it
    let pattern = Pattern::new(
        vec![seq(vec![
            rep(cap_alt(1, vec![seq(vec![lit("a")]), seq(vec![lit("ab")])]), 2, Some(2), true),
            lit("c"),
        ])],
        Flags::default(),
    )
    .unwrap();
    assert_eq!(exec(&pattern, "abac"), groups(&["abac", "a"]));
    assert_eq!(exec(&pattern, "aac"), groups(&["aac", "a"]));
}

// ============================================================================
// SINGLE-CHARACTER ALTERNATIVES WITH AN END ANCHOR
// ============================================================================

#[test]
fn round_trip_three_alternatives_anchored() {
    // (a|b|c){2}$ against "cb" and "ad"
    let pattern = Pattern::new(
        vec![seq(vec![
            rep(
                cap_alt(1, vec![seq(vec![lit("a")]), seq(vec![lit("b")]), seq(vec![lit("c")])]),
                2,
                Some(2),
                true,
            ),
            text_end(),
        ])],
        Flags::default(),
    )
    .unwrap();
    assert_eq!(exec(&pattern, "cb"), groups(&["cb", "b"]));
    assert_eq!(exec(&pattern, "ad"), None);
    assert_eq!(exec(&pattern, "ba"), groups(&["ba", "a"]));
}

// ============================================================================
// INTER-ITERATION BACKTRACKING
// ============================================================================

#[test]
fn failing_second_iteration_reopens_the_first() {
    // (ab|a){2}x: "abx" forces iteration 1 to settle on "a"
    let pattern = Pattern::new(
        vec![seq(vec![
            rep(cap_alt(1, vec![seq(vec![lit("ab")]), seq(vec![lit("a")])]), 2, Some(2), true),
            lit("x"),
        ])],
        Flags::default(),
    )
    .unwrap();
    assert_eq!(exec(&pattern, "abax"), groups(&["abax", "a"]));
    assert_eq!(exec(&pattern, "aax"), groups(&["aax", "a"]));
    assert_eq!(exec(&pattern, "abx"), None);
}

#[test]
fn three_iterations_chain_their_backtracking() {
    // (ab|a){3}c
    let pattern = Pattern::new(
        vec![seq(vec![
            rep(cap_alt(1, vec![seq(vec![lit("ab")]), seq(vec![lit("a")])]), 3, Some(3), true),
            lit("c"),
        ])],
        Flags::default(),
    )
    .unwrap();
    assert_eq!(exec(&pattern, "ababac"), groups(&["ababac", "a"]));
    assert_eq!(exec(&pattern, "aaac"), groups(&["aaac", "a"]));
    assert_eq!(exec(&pattern, "abababc"), groups(&["abababc", "ab"]));
}

// ============================================================================
// PARTIAL CONSUMPTION BEFORE FAILURE
// ============================================================================

#[test]
fn partially_consumed_alternative_does_not_shift_the_retry() {
    // (xy|x){2}z: "xy" consumes "x" before failing on "y"
    let pattern = Pattern::new(
        vec![seq(vec![
            rep(cap_alt(1, vec![seq(vec![lit("xy")]), seq(vec![lit("x")])]), 2, Some(2), true),
            lit("z"),
        ])],
        Flags::default(),
    )
    .unwrap();
    assert_eq!(exec(&pattern, "xxz"), groups(&["xxz", "x"]));
    assert_eq!(exec(&pattern, "xyxz"), groups(&["xyxz", "x"]));
    assert_eq!(exec(&pattern, "xyxyz"), groups(&["xyxyz", "xy"]));
}

// ============================================================================
// BACKTRACKABLE CONTENT WITHIN ALTERNATIVES
// ============================================================================

#[test]
fn greedy_content_inside_an_alternative() {
    // (a+|b){2}c
    let pattern = Pattern::new(
        vec![seq(vec![
            rep(cap_alt(1, vec![seq(vec![plus(ch('a'))]), seq(vec![lit("b")])]), 2, Some(2), true),
            lit("c"),
        ])],
        Flags::default(),
    )
    .unwrap();
    assert_eq!(exec(&pattern, "aabc"), groups(&["aabc", "b"]));
    assert_eq!(exec(&pattern, "aac"), groups(&["aac", "a"]));
    assert_eq!(exec(&pattern, "bbc"), groups(&["bbc", "b"]));
}

#[test]
fn empty_capable_alternative_first() {
    // (a*x|b){2}c
    let pattern = Pattern::new(
        vec![seq(vec![
            rep(
                cap_alt(1, vec![seq(vec![star(ch('a')), lit("x")]), seq(vec![lit("b")])]),
                2,
                Some(2),
                true,
            ),
            lit("c"),
        ])],
        Flags::default(),
    )
    .unwrap();
    assert_eq!(exec(&pattern, "axbc"), groups(&["axbc", "b"]));
    assert_eq!(exec(&pattern, "aaxxc"), groups(&["aaxxc", "x"]));
}

// ============================================================================
// NESTED QUANTIFIED GROUPS
// ============================================================================

#[test]
fn nested_fixed_counts() {
    // ((a|b){2}){2}$
    let pattern = Pattern::new(
        vec![seq(vec![
            rep(
                cap_alt(
                    1,
                    vec![seq(vec![rep(
                        cap_alt(2, vec![seq(vec![lit("a")]), seq(vec![lit("b")])]),
                        2,
                        Some(2),
                        true,
                    )])],
                ),
                2,
                Some(2),
                true,
            ),
            text_end(),
        ])],
        Flags::default(),
    )
    .unwrap();
    assert_eq!(exec(&pattern, "abba"), groups(&["abba", "ba", "a"]));
    assert_eq!(exec(&pattern, "abb"), None);
}

#[test]
fn nested_group_frame_state_resets_on_branch_entry() {
    // (a|b|c(){2}$){2}$ - the inner (){2} lives only in the third branch;
    // entering it after branches a/b already ran must see fresh state
    let inner = rep(cap_alt(2, vec![seq(vec![])]), 2, Some(2), true);
    let pattern = Pattern::new(
        vec![seq(vec![
            rep(
                cap_alt(
                    1,
                    vec![
                        seq(vec![lit("a")]),
                        seq(vec![lit("b")]),
                        seq(vec![lit("c"), inner, text_end()]),
                    ],
                ),
                2,
                Some(2),
                true,
            ),
            text_end(),
        ])],
        Flags::default(),
    )
    .unwrap();

    assert_eq!(
        exec(&pattern, "aa"),
        Some(vec![Some("aa".into()), Some("a".into()), None])
    );
    assert_eq!(
        exec(&pattern, "bc"),
        Some(vec![Some("bc".into()), Some("c".into()), Some("".into())])
    );
    // the original crash case: branch c entered after a and b failed
    assert_eq!(
        exec(&pattern, "abc"),
        Some(vec![Some("bc".into()), Some("c".into()), Some("".into())])
    );
    assert_eq!(exec(&pattern, "cc"), None);
    assert_eq!(exec(&pattern, "aabbbccc"), None);
}
