//! Input cursor
//!
//! A flat view over UTF-16 code units. In Unicode mode a read at a lead
//! surrogate followed by a trail surrogate yields the combined code point
//! with width 2; otherwise reads yield the lone code unit with width 1.
//!
//! Reads never mutate shared state: the match position is a plain value
//! owned by the engine, so a failed comparison simply never commits the
//! advanced copy. This is what guarantees the restore-exactly contract for
//! failed backreference reads.

/// One decoded character: the code point and its width in code units
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadChar {
    pub cp: u32,
    pub width: usize,
}

fn is_lead_surrogate(unit: u16) -> bool {
    (0xD800..=0xDBFF).contains(&unit)
}

fn is_trail_surrogate(unit: u16) -> bool {
    (0xDC00..=0xDFFF).contains(&unit)
}

fn combine(lead: u16, trail: u16) -> u32 {
    0x10000 + (((lead as u32 - 0xD800) << 10) | (trail as u32 - 0xDC00))
}

/// Read-only code-unit view of the subject string
#[derive(Debug, Clone, Copy)]
pub struct Input<'a> {
    units: &'a [u16],
}

impl<'a> Input<'a> {
    /// Wrap a code-unit slice
    pub fn new(units: &'a [u16]) -> Self {
        Self { units }
    }

    /// Length in code units
    pub fn len(&self) -> usize {
        self.units.len()
    }

    /// Whether the input is empty
    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// The underlying code units
    pub fn units(&self) -> &'a [u16] {
        self.units
    }

    /// The code unit at `pos`; panics when out of bounds (upstream bug)
    pub fn unit(&self, pos: usize) -> u16 {
        self.units[pos]
    }

    /// Whether `pos` is the start of input
    pub fn at_start(&self, pos: usize) -> bool {
        pos == 0
    }

    /// Whether `pos` is the end of input
    pub fn at_end(&self, pos: usize) -> bool {
        pos >= self.units.len()
    }

    /// Decode the character starting at `pos`
    pub fn read(&self, pos: usize, unicode: bool) -> Option<ReadChar> {
        let &unit = self.units.get(pos)?;
        if unicode && is_lead_surrogate(unit) {
            if let Some(&next) = self.units.get(pos + 1) {
                if is_trail_surrogate(next) {
                    return Some(ReadChar { cp: combine(unit, next), width: 2 });
                }
            }
        }
        Some(ReadChar { cp: unit as u32, width: 1 })
    }

    /// Decode the character ending at `pos` (exclusive)
    pub fn read_back(&self, pos: usize, unicode: bool) -> Option<ReadChar> {
        if pos == 0 || pos > self.units.len() {
            return None;
        }
        let unit = self.units[pos - 1];
        if unicode && is_trail_surrogate(unit) && pos >= 2 {
            let prev = self.units[pos - 2];
            if is_lead_surrogate(prev) {
                return Some(ReadChar { cp: combine(prev, unit), width: 2 });
            }
        }
        Some(ReadChar { cp: unit as u32, width: 1 })
    }

    /// Next attempt position after `pos`: one code point in Unicode mode
    pub fn next_position(&self, pos: usize, unicode: bool) -> usize {
        match self.read(pos, unicode) {
            Some(rc) => pos + rc.width,
            None => pos + 1,
        }
    }
}

/// Encode a Rust string as UTF-16 code units
pub fn utf16(s: &str) -> Vec<u16> {
    s.encode_utf16().collect()
}
