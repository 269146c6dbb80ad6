//! Prefix-scan analysis
//!
//! For patterns with a fixed-width prefix of literals and small character
//! classes, pick the prefix position with the fewest candidate code units
//! and build an ASCII membership table for it. The matcher then skips ahead
//! to candidate positions instead of attempting a match at every offset.
//!
//! The chosen position may sit anywhere in the prefix, so the matcher must
//! read at `candidate + offset`, never at offset 0.

use crate::fold;
use crate::pattern::Flags;
use crate::term::{Alternative, Term};

/// Longest prefix, in code units, considered for a scan position
const MAX_PREFIX_UNITS: usize = 16;

/// Largest class (member count) expanded into a candidate set
const MAX_CLASS_MEMBERS: u64 = 64;

/// A 128-bit ASCII membership set
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AsciiSet {
    bits: [u64; 2],
}

impl AsciiSet {
    /// Insert a code point; returns false when it is outside ASCII
    pub fn insert(&mut self, cp: u32) -> bool {
        if cp >= 0x80 {
            return false;
        }
        self.bits[(cp >> 6) as usize] |= 1u64 << (cp & 63);
        true
    }

    /// Membership test for one UTF-16 code unit
    pub fn contains_unit(&self, unit: u16) -> bool {
        unit < 0x80 && (self.bits[(unit >> 6) as usize] >> (unit & 63)) & 1 != 0
    }

    /// Number of members
    pub fn len(&self) -> u32 {
        self.bits[0].count_ones() + self.bits[1].count_ones()
    }

    /// Whether the set is empty
    pub fn is_empty(&self) -> bool {
        self.bits == [0, 0]
    }
}

/// A scan table anchored at a fixed offset into the match prefix
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrefixScan {
    /// Code-unit offset from the match start to the scanned position
    pub offset: usize,
    /// Candidate units at that position
    pub set: AsciiSet,
}

pub(crate) fn compute_prefix_scan(
    alternatives: &[Alternative],
    flags: Flags,
) -> Option<PrefixScan> {
    // Only a single top-level alternative makes every prefix offset mandatory
    let [alternative] = alternatives else {
        return None;
    };

    let mut best: Option<PrefixScan> = None;
    let mut offset = 0usize;
    let mut orbit_buf = Vec::new();

    'walk: for term in &alternative.terms {
        if offset >= MAX_PREFIX_UNITS {
            break;
        }
        match term {
            Term::Literal(cps) => {
                for &cp in cps {
                    if offset >= MAX_PREFIX_UNITS {
                        break 'walk;
                    }
                    if cp <= 0xFFFF {
                        consider(&mut best, offset, [cp].iter().copied(), flags, &mut orbit_buf);
                        offset += 1;
                    } else {
                        // Supplementary literal: two units, neither scannable as ASCII
                        offset += 2;
                    }
                }
            }
            Term::Class(class) => {
                if flags.unicode && !(class.bounded_by(0x10000) && !class.is_inverted()) {
                    // May consume a surrogate pair: width is no longer fixed
                    break 'walk;
                }
                if !class.is_inverted() && class.len() <= MAX_CLASS_MEMBERS {
                    consider(&mut best, offset, class.iter_members(), flags, &mut orbit_buf);
                }
                offset += 1;
            }
            // Anything else ends the fixed-width prefix
            _ => break 'walk,
        }
    }

    best
}

/// Record `offset` as a scan candidate if all members (and their case
/// orbits) fit in ASCII and it beats the best position so far
fn consider(
    best: &mut Option<PrefixScan>,
    offset: usize,
    members: impl Iterator<Item = u32>,
    flags: Flags,
    orbit_buf: &mut Vec<u32>,
) {
    let mut set = AsciiSet::default();
    for member in members {
        fold::orbit(member, flags.unicode, flags.ignore_case, orbit_buf);
        for &candidate in orbit_buf.iter() {
            if !set.insert(candidate) {
                return;
            }
        }
    }
    if set.is_empty() {
        return;
    }
    match best {
        Some(current) if current.set.len() <= set.len() => {}
        _ => *best = Some(PrefixScan { offset, set }),
    }
}
