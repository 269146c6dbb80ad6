//! Character classes
//!
//! A class is a sorted, merged list of inclusive code-point ranges plus an
//! inversion flag. Inversion is applied by the matcher after case-aware
//! membership testing, so the raw ranges here are always the positive set.

/// Maximum Unicode scalar value
pub const MAX_CODE_POINT: u32 = 0x10FFFF;

const LINE_TERMINATORS: [(u32, u32); 3] = [(0x0A, 0x0A), (0x0D, 0x0D), (0x2028, 0x2029)];

/// A set of code-point ranges, possibly inverted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharClass {
    ranges: Vec<(u32, u32)>,
    inverted: bool,
}

impl CharClass {
    /// Build a class from inclusive ranges; ranges are sorted and merged
    pub fn new(mut ranges: Vec<(u32, u32)>, inverted: bool) -> Self {
        ranges.retain(|&(lo, hi)| lo <= hi);
        ranges.sort_unstable();
        let mut merged: Vec<(u32, u32)> = Vec::with_capacity(ranges.len());
        for (lo, hi) in ranges {
            match merged.last_mut() {
                Some(last) if lo <= last.1.saturating_add(1) => last.1 = last.1.max(hi),
                _ => merged.push((lo, hi)),
            }
        }
        Self { ranges: merged, inverted }
    }

    /// Class containing exactly the given code points
    pub fn of(code_points: &[u32]) -> Self {
        Self::new(code_points.iter().map(|&cp| (cp, cp)).collect(), false)
    }

    /// `\d`
    pub fn digit() -> Self {
        Self::new(vec![(b'0' as u32, b'9' as u32)], false)
    }

    /// `\w`
    pub fn word() -> Self {
        Self::new(
            vec![
                (b'0' as u32, b'9' as u32),
                (b'A' as u32, b'Z' as u32),
                (b'_' as u32, b'_' as u32),
                (b'a' as u32, b'z' as u32),
            ],
            false,
        )
    }

    /// `\s` - whitespace and line terminators
    pub fn space() -> Self {
        Self::new(
            vec![
                (0x09, 0x0D),
                (0x20, 0x20),
                (0xA0, 0xA0),
                (0x1680, 0x1680),
                (0x2000, 0x200A),
                (0x2028, 0x2029),
                (0x202F, 0x202F),
                (0x205F, 0x205F),
                (0x3000, 0x3000),
                (0xFEFF, 0xFEFF),
            ],
            false,
        )
    }

    /// `.` - everything except line terminators unless `dot_all`
    pub fn dot(dot_all: bool) -> Self {
        if dot_all {
            Self::new(vec![(0, MAX_CODE_POINT)], false)
        } else {
            Self::new(LINE_TERMINATORS.to_vec(), true)
        }
    }

    /// Return the inverted version of this class
    pub fn negated(mut self) -> Self {
        self.inverted = !self.inverted;
        self
    }

    /// Whether the inversion flag is set
    pub fn is_inverted(&self) -> bool {
        self.inverted
    }

    /// The positive ranges, ignoring inversion
    pub fn ranges(&self) -> &[(u32, u32)] {
        &self.ranges
    }

    /// Raw range membership, ignoring inversion and case rules
    pub fn contains_raw(&self, cp: u32) -> bool {
        self.ranges
            .binary_search_by(|&(lo, hi)| {
                if cp < lo {
                    std::cmp::Ordering::Greater
                } else if cp > hi {
                    std::cmp::Ordering::Less
                } else {
                    std::cmp::Ordering::Equal
                }
            })
            .is_ok()
    }

    /// Case-blind membership with inversion applied
    pub fn contains(&self, cp: u32) -> bool {
        self.contains_raw(cp) != self.inverted
    }

    /// Whether every member is below the given bound
    pub fn bounded_by(&self, limit: u32) -> bool {
        self.ranges.last().is_none_or(|&(_, hi)| hi < limit)
    }

    /// Total number of code points in the positive set
    pub fn len(&self) -> u64 {
        self.ranges.iter().map(|&(lo, hi)| (hi - lo + 1) as u64).sum()
    }

    /// Whether the positive set is empty
    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// Iterate the members of the positive set
    pub fn iter_members(&self) -> impl Iterator<Item = u32> + '_ {
        self.ranges.iter().flat_map(|&(lo, hi)| lo..=hi)
    }
}
