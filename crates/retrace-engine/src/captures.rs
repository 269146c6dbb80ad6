//! Capture table
//!
//! Two capture points per group (start and end), `EMPTY` when unset. The
//! engine's hot path undoes writes through restore entries on the backtrack
//! stack; `snapshot`/`restore` exist for hosts that want whole-table
//! checkpoints and must be called symmetrically around a decision point.

/// Sentinel for an unset capture point
pub const EMPTY: usize = usize::MAX;

/// Saved capture state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureSnapshot(Vec<usize>);

/// Start/end offsets for every capture group of one match attempt
#[derive(Debug, Clone)]
pub struct CaptureTable {
    points: Vec<usize>,
}

impl CaptureTable {
    /// Table for a pattern with `capture_count` groups (slot 0 is the match)
    pub fn new(capture_count: u32) -> Self {
        Self { points: vec![EMPTY; 2 * (capture_count as usize + 1)] }
    }

    /// Number of groups, excluding slot 0
    pub fn capture_count(&self) -> u32 {
        (self.points.len() / 2) as u32 - 1
    }

    /// Raw capture point value
    pub fn point(&self, point: u32) -> usize {
        self.points[point as usize]
    }

    /// Write a raw capture point
    pub fn set_point(&mut self, point: u32, value: usize) {
        self.points[point as usize] = value;
    }

    /// Set both bounds of a group
    pub fn set(&mut self, index: u32, start: usize, end: usize) {
        self.points[2 * index as usize] = start;
        self.points[2 * index as usize + 1] = end;
    }

    /// Unset a group
    pub fn clear(&mut self, index: u32) {
        self.points[2 * index as usize] = EMPTY;
        self.points[2 * index as usize + 1] = EMPTY;
    }

    /// The group's [start, end) bounds, when fully set
    pub fn get(&self, index: u32) -> Option<(usize, usize)> {
        let start = self.points[2 * index as usize];
        let end = self.points[2 * index as usize + 1];
        if start == EMPTY || end == EMPTY {
            None
        } else {
            Some((start, end))
        }
    }

    /// Unset every group
    pub fn reset(&mut self) {
        self.points.fill(EMPTY);
    }

    /// Checkpoint the whole table
    pub fn snapshot(&self) -> CaptureSnapshot {
        CaptureSnapshot(self.points.clone())
    }

    /// Restore a checkpoint taken on this table
    pub fn restore(&mut self, snapshot: &CaptureSnapshot) {
        debug_assert_eq!(self.points.len(), snapshot.0.len());
        self.points.copy_from_slice(&snapshot.0);
    }

    /// Materialize per-group bounds, including slot 0
    pub fn to_groups(&self) -> Vec<Option<(usize, usize)>> {
        (0..=self.capture_count()).map(|i| self.get(i)).collect()
    }
}
