//! Case canonicalization
//!
//! Two regimes, per the ECMA-262 Canonicalize operation:
//!
//! - without `unicode`: simple uppercase mapping, except that a non-ASCII
//!   character whose uppercase form is ASCII is left unchanged (so `\u{17F}`
//!   does not match `s` under plain `i`);
//! - with `unicode`: Unicode simple case folding, i.e. the lowercase mapping
//!   plus the folds that diverge from lowercasing (Kelvin sign to `k`, long
//!   s to `s`, final sigma to sigma, the Cherokee and Greek-symbol blocks).

/// Folds that differ from the single-char lowercase mapping, sorted by key
const FOLD_EXCEPTIONS: [(u32, u32); 24] = [
    (0x00B5, 0x03BC), // micro sign -> greek mu
    (0x017F, 0x0073), // long s -> s
    (0x0345, 0x03B9), // ypogegrammeni -> iota
    (0x03C2, 0x03C3), // final sigma -> sigma
    (0x03D0, 0x03B2),
    (0x03D1, 0x03B8),
    (0x03D5, 0x03C6),
    (0x03D6, 0x03C0),
    (0x03F0, 0x03BA),
    (0x03F1, 0x03C1),
    (0x03F5, 0x03B5),
    (0x1C80, 0x0432),
    (0x1C81, 0x0434),
    (0x1C82, 0x043E),
    (0x1C83, 0x0441),
    (0x1C84, 0x0442),
    (0x1C85, 0x0442),
    (0x1C86, 0x044A),
    (0x1C87, 0x0463),
    (0x1C88, 0xA64B),
    (0x1E9B, 0x1E61),
    (0x1FBE, 0x03B9), // prosgegrammeni -> iota
    (0x212A, 0x006B), // Kelvin sign -> k
    (0x212B, 0x00E5), // Angstrom sign -> a-with-ring
];

fn lower1(cp: u32) -> Option<u32> {
    let c = char::from_u32(cp)?;
    let mut it = c.to_lowercase();
    let first = it.next()? as u32;
    if it.next().is_some() { None } else { Some(first) }
}

fn upper1(cp: u32) -> Option<u32> {
    let c = char::from_u32(cp)?;
    let mut it = c.to_uppercase();
    let first = it.next()? as u32;
    if it.next().is_some() { None } else { Some(first) }
}

/// Unicode simple case folding of one code point
pub fn simple_fold(cp: u32) -> u32 {
    if cp < 0x80 {
        return if (b'A' as u32..=b'Z' as u32).contains(&cp) { cp + 32 } else { cp };
    }
    // Cherokee folds uppercase-ward, against the lowercase default
    if (0x13A0..=0x13F5).contains(&cp) {
        return cp;
    }
    if (0x13F8..=0x13FD).contains(&cp) {
        return cp - 8;
    }
    if (0xAB70..=0xABBF).contains(&cp) {
        return cp - 0x97D0;
    }
    if let Ok(at) = FOLD_EXCEPTIONS.binary_search_by_key(&cp, |&(k, _)| k) {
        return FOLD_EXCEPTIONS[at].1;
    }
    lower1(cp).unwrap_or(cp)
}

/// ECMA Canonicalize without the `unicode` flag: uppercase-based
pub fn canonicalize_non_unicode(cp: u32) -> u32 {
    if cp < 0x80 {
        return if (b'a' as u32..=b'z' as u32).contains(&cp) { cp - 32 } else { cp };
    }
    match upper1(cp) {
        // A non-ASCII character never canonicalizes into ASCII
        Some(u) if u < 0x80 => cp,
        Some(u) => u,
        None => cp,
    }
}

/// Canonical form of a code point under the given flags
pub fn canonicalize(cp: u32, unicode: bool, ignore_case: bool) -> u32 {
    if !ignore_case {
        cp
    } else if unicode {
        simple_fold(cp)
    } else {
        canonicalize_non_unicode(cp)
    }
}

/// Collect the code points that share a canonical form with `cp`
///
/// Used for case-aware class membership: `c` matches a class iff some
/// member of its orbit is in the class's raw ranges.
pub fn orbit(cp: u32, unicode: bool, ignore_case: bool, out: &mut Vec<u32>) {
    out.clear();
    out.push(cp);
    if !ignore_case {
        return;
    }
    let canon = canonicalize(cp, unicode, true);
    let mut push = |candidate: u32, out: &mut Vec<u32>| {
        if canonicalize(candidate, unicode, true) == canon && !out.contains(&candidate) {
            out.push(candidate);
        }
    };
    push(canon, out);
    if let Some(lo) = lower1(canon) {
        push(lo, out);
    }
    if let Some(up) = upper1(canon) {
        push(up, out);
    }
    if unicode {
        for &(from, to) in &FOLD_EXCEPTIONS {
            if to == canon {
                push(from, out);
            }
        }
        if (0x13A0..=0x13F5).contains(&canon) {
            push(canon + 0x97D0, out);
            if (0x13F0..=0x13F5).contains(&canon) {
                push(canon + 8, out);
            }
        }
        // titlecase forms of the Latin digraphs sit between their pair
        if matches!(canon, 0x01C6 | 0x01C9 | 0x01CC | 0x01F3) {
            push(canon - 1, out);
        }
    }
}
