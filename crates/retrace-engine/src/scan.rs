//! Candidate skip-scan
//!
//! When the pattern analysis produced a `PrefixScan`, the search loop skips
//! to positions whose unit at `candidate + offset` is in the table instead
//! of attempting a match everywhere. The scan walks 16 units per chunk with
//! an exact tail, and is bounded so a candidate always leaves at least
//! `min_width` units of input.

use retrace_pattern::PrefixScan;

use crate::input::Input;

const CHUNK: usize = 16;

/// Smallest match-start candidate in `[at, max_start]`, or `None`
pub(crate) fn next_candidate(
    input: &Input<'_>,
    at: usize,
    max_start: usize,
    prefix: &PrefixScan,
) -> Option<usize> {
    let units = input.units();
    // Scanned unit index range for start positions in [at, max_start]
    let mut q = at + prefix.offset;
    // offset is inside the mandatory prefix, so q_end stays in bounds
    let q_end = max_start + prefix.offset;
    debug_assert!(q_end < units.len());

    while q + CHUNK <= q_end + 1 {
        for i in 0..CHUNK {
            if prefix.set.contains_unit(units[q + i]) {
                return Some(q + i - prefix.offset);
            }
        }
        q += CHUNK;
    }
    while q <= q_end {
        if prefix.set.contains_unit(units[q]) {
            return Some(q - prefix.offset);
        }
        q += 1;
    }
    None
}
