//! Cooperative cancellation
//!
//! Pathological backtracking is not an error; bounding it is the host's
//! job. The engine checks a budget at every backtrack-frame push and
//! reports `Outcome::Interrupted` when it trips. No timers, no threads.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Step/cancellation budget for one match call
#[derive(Debug, Clone, Default)]
pub struct Budget {
    step_limit: Option<u64>,
    cancel: Option<Arc<AtomicBool>>,
    steps: u64,
}

impl Budget {
    /// No limits
    pub fn unlimited() -> Self {
        Self::default()
    }

    /// Trip after `limit` backtrack-frame pushes
    pub fn with_step_limit(limit: u64) -> Self {
        Self { step_limit: Some(limit), ..Self::default() }
    }

    /// Trip when the shared flag becomes true
    pub fn with_cancel_flag(flag: Arc<AtomicBool>) -> Self {
        Self { cancel: Some(flag), ..Self::default() }
    }

    /// Add a cancellation flag to an existing budget
    pub fn cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    /// Steps consumed by the last match call
    pub fn steps_used(&self) -> u64 {
        self.steps
    }

    pub(crate) fn reset(&mut self) {
        self.steps = 0;
    }

    /// Account one backtrack-frame push; false means stop matching
    pub(crate) fn tick(&mut self) -> bool {
        self.steps += 1;
        if let Some(limit) = self.step_limit {
            if self.steps > limit {
                return false;
            }
        }
        if let Some(flag) = &self.cancel {
            // Poll the flag sparingly; a relaxed load is enough for a hint
            if self.steps & 0x3F == 0 && flag.load(Ordering::Relaxed) {
                return false;
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unlimited_budget_never_trips() {
        let mut budget = Budget::unlimited();
        for _ in 0..10_000 {
            assert!(budget.tick());
        }
    }

    #[test]
    fn step_limit_trips() {
        let mut budget = Budget::with_step_limit(3);
        assert!(budget.tick());
        assert!(budget.tick());
        assert!(budget.tick());
        assert!(!budget.tick());
    }

    #[test]
    fn cancel_flag_trips_within_a_poll_window() {
        let flag = Arc::new(AtomicBool::new(true));
        let mut budget = Budget::with_cancel_flag(flag);
        let mut tripped = false;
        for _ in 0..128 {
            if !budget.tick() {
                tripped = true;
                break;
            }
        }
        assert!(tripped);
    }
}
