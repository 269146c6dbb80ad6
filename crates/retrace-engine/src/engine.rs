//! The backtracking match loop
//!
//! One op at a time, with an explicit frame stack instead of native
//! recursion. Every mutation of captures, counters, or iteration-start
//! registers pushes an undo entry, so unwinding to a resume point restores
//! the exact state at the time the choice was made - including the
//! "retry an alternative from the iteration's begin index" rule. Lookaround
//! runs as a sub-execution over the same stack with a saved base; resume
//! entries above the base are discarded on exit (assertions are atomic),
//! undo entries are kept so later backtracking still rolls captures back.

use retrace_pattern::{casefold, CharClass, Flags, Pattern};

use crate::budget::Budget;
use crate::captures::{CaptureTable, EMPTY};
use crate::input::Input;
use crate::ops::{self, Dir, Op, Program};
use crate::scan;
use crate::{MatchData, Outcome};

/// One backtrack-stack entry: either a resume point or an undo record
#[derive(Debug, Clone, Copy)]
enum Frame {
    Resume { op: u32, pos: usize },
    RestorePoint { point: u32, prev: usize },
    RestoreCounter { reg: u32, prev: u32 },
    RestoreStart { reg: u32, prev: usize },
}

#[derive(Debug)]
struct EngineState {
    stack: Vec<Frame>,
    captures: CaptureTable,
    counters: Vec<u32>,
    starts: Vec<usize>,
    budget: Budget,
    orbit: Vec<u32>,
}

enum RunResult {
    Matched(usize),
    Failed,
    Interrupted,
}

/// A matcher instance: one in-flight match call's mutable state
///
/// The compiled `Pattern` is shared and read-only; each thread gets its own
/// `Matcher`.
pub struct Matcher<'p> {
    pattern: &'p Pattern,
    program: Program,
    state: EngineState,
}

impl<'p> Matcher<'p> {
    /// Lower the pattern and set up match state
    pub fn new(pattern: &'p Pattern) -> Self {
        let program = ops::lower(pattern);
        tracing::debug!(
            ops = program.ops.len(),
            captures = program.capture_count,
            scan = program.prefix_scan.is_some(),
            "lowered pattern"
        );
        let state = EngineState {
            stack: Vec::new(),
            captures: CaptureTable::new(program.capture_count),
            counters: vec![0; program.register_count as usize],
            starts: vec![0; program.register_count as usize],
            budget: Budget::unlimited(),
            orbit: Vec::new(),
        };
        Self { pattern, program, state }
    }

    /// Lower the pattern with a cancellation budget
    pub fn with_budget(pattern: &'p Pattern, budget: Budget) -> Self {
        let mut matcher = Self::new(pattern);
        matcher.state.budget = budget;
        matcher
    }

    /// Replace the cancellation budget
    pub fn set_budget(&mut self, budget: Budget) {
        self.state.budget = budget;
    }

    /// Steps consumed by the most recent `find`
    pub fn steps_used(&self) -> u64 {
        self.state.budget.steps_used()
    }

    /// Search for the leftmost match at or after `start` (in code units)
    pub fn find(&mut self, input: &Input<'_>, start: usize) -> Outcome {
        let program = &self.program;
        let st = &mut self.state;
        st.stack.clear();
        st.captures.reset();
        st.budget.reset();

        let len = input.len();
        let unicode = program.flags.unicode;
        let mut at = start;

        loop {
            if at > len || len - at < program.min_width {
                return Outcome::NoMatch;
            }
            if let Some(prefix) = &program.prefix_scan {
                match scan::next_candidate(input, at, len - program.min_width, prefix) {
                    Some(candidate) => at = candidate,
                    None => return Outcome::NoMatch,
                }
            }
            match run(program, st, input, 0, at, Dir::Forward) {
                RunResult::Matched(end) => {
                    tracing::trace!(start = at, end, "match");
                    let mut captures = st.captures.to_groups();
                    captures[0] = Some((at, end));
                    return Outcome::Match(MatchData {
                        start: at,
                        end,
                        captures,
                        named: self.pattern.named_groups().to_vec(),
                    });
                }
                RunResult::Interrupted => return Outcome::Interrupted,
                RunResult::Failed => {
                    if program.anchored_start {
                        return Outcome::NoMatch;
                    }
                    at = input.next_position(at, unicode);
                }
            }
        }
    }

    /// Whether the pattern matches anywhere at or after `start`
    pub fn is_match(&mut self, input: &Input<'_>, start: usize) -> bool {
        matches!(self.find(input, start), Outcome::Match(_))
    }
}

fn run(
    program: &Program,
    st: &mut EngineState,
    input: &Input<'_>,
    entry: u32,
    start_pos: usize,
    dir: Dir,
) -> RunResult {
    let base = st.stack.len();
    let flags = program.flags;
    let mut op_idx = entry as usize;
    let mut pos = start_pos;

    macro_rules! fail {
        () => {
            match unwind(st, base) {
                Some((op, p)) => {
                    op_idx = op as usize;
                    pos = p;
                    continue;
                }
                None => return RunResult::Failed,
            }
        };
    }

    loop {
        match &program.ops[op_idx] {
            Op::Literal { cp } => {
                let read = read_dir(input, pos, flags.unicode, dir);
                match read {
                    Some(rc) if canon(rc.cp, flags) == canon(*cp, flags) => {
                        pos = step(pos, rc.width, dir);
                    }
                    _ => fail!(),
                }
            }
            Op::Class { class } => match read_dir(input, pos, flags.unicode, dir) {
                Some(rc) if class_matches(class, rc.cp, flags, &mut st.orbit) => {
                    pos = step(pos, rc.width, dir);
                }
                _ => fail!(),
            },
            Op::TextStart => {
                let ok = pos == 0
                    || (flags.multiline && is_line_terminator(input.unit(pos - 1) as u32));
                if !ok {
                    fail!();
                }
            }
            Op::TextEnd => {
                let ok = pos == input.len()
                    || (flags.multiline && is_line_terminator(input.unit(pos) as u32));
                if !ok {
                    fail!();
                }
            }
            Op::WordBoundary { negate } => {
                let before = input
                    .read_back(pos, flags.unicode)
                    .is_some_and(|rc| is_word_char(rc.cp, flags));
                let after = input
                    .read(pos, flags.unicode)
                    .is_some_and(|rc| is_word_char(rc.cp, flags));
                if (before != after) == *negate {
                    fail!();
                }
            }
            Op::Mark { point } => {
                st.stack.push(Frame::RestorePoint {
                    point: *point,
                    prev: st.captures.point(*point),
                });
                st.captures.set_point(*point, pos);
            }
            Op::ClearCaptures { slots } => {
                for &slot in slots.iter() {
                    for point in [2 * slot, 2 * slot + 1] {
                        let prev = st.captures.point(point);
                        if prev != EMPTY {
                            st.stack.push(Frame::RestorePoint { point, prev });
                            st.captures.set_point(point, EMPTY);
                        }
                    }
                }
            }
            Op::Fork { alternate } => {
                if !st.budget.tick() {
                    return RunResult::Interrupted;
                }
                st.stack.push(Frame::Resume { op: *alternate, pos });
            }
            Op::Jump { target } => {
                op_idx = *target as usize;
                continue;
            }
            Op::ResetCounter { reg } => {
                st.stack.push(Frame::RestoreCounter {
                    reg: *reg,
                    prev: st.counters[*reg as usize],
                });
                st.counters[*reg as usize] = 0;
            }
            Op::CounterGate { reg, min, max, greedy, exit } => {
                let count = st.counters[*reg as usize];
                if count < *min {
                    // mandatory iteration, no choice point
                } else if max.is_some_and(|m| count >= m) {
                    op_idx = *exit as usize;
                    continue;
                } else {
                    if !st.budget.tick() {
                        return RunResult::Interrupted;
                    }
                    if *greedy {
                        st.stack.push(Frame::Resume { op: *exit, pos });
                    } else {
                        st.stack.push(Frame::Resume { op: op_idx as u32 + 1, pos });
                        op_idx = *exit as usize;
                        continue;
                    }
                }
            }
            Op::MarkStart { reg } => {
                st.stack.push(Frame::RestoreStart {
                    reg: *reg,
                    prev: st.starts[*reg as usize],
                });
                st.starts[*reg as usize] = pos;
            }
            Op::LoopBack { reg, min, gate } => {
                // A zero-width iteration past the minimum cannot make
                // progress; fail it instead of looping
                if pos == st.starts[*reg as usize] && st.counters[*reg as usize] >= *min {
                    fail!();
                }
                st.stack.push(Frame::RestoreCounter {
                    reg: *reg,
                    prev: st.counters[*reg as usize],
                });
                st.counters[*reg as usize] += 1;
                op_idx = *gate as usize;
                continue;
            }
            Op::Backref { slots } => {
                let resolved = slots.iter().find_map(|&slot| st.captures.get(slot));
                if let Some((cap_start, cap_end)) = resolved {
                    match consume_backref(input, pos, cap_start, cap_end, flags, dir) {
                        Some(next) => pos = next,
                        None => fail!(),
                    }
                }
                // unset target: matches empty, unconditionally
            }
            Op::Lookaround { kind, body } => {
                let kind = *kind;
                let body = *body;
                let sub_base = st.stack.len();
                let sub_dir = if kind.is_behind() { Dir::Backward } else { Dir::Forward };
                match run(program, st, input, body, pos, sub_dir) {
                    RunResult::Interrupted => return RunResult::Interrupted,
                    RunResult::Matched(_) => {
                        // Assertions are atomic: drop their resume points,
                        // keep their undo records
                        strip_resumes(st, sub_base);
                        if kind.is_negative() {
                            fail!();
                        }
                    }
                    RunResult::Failed => {
                        if !kind.is_negative() {
                            fail!();
                        }
                    }
                }
            }
            Op::Accept => return RunResult::Matched(pos),
        }
        op_idx += 1;
    }
}

/// Pop frames applying undo records until a resume point (or the base)
fn unwind(st: &mut EngineState, base: usize) -> Option<(u32, usize)> {
    while st.stack.len() > base {
        match st.stack.pop().expect("stack length checked") {
            Frame::Resume { op, pos } => return Some((op, pos)),
            Frame::RestorePoint { point, prev } => st.captures.set_point(point, prev),
            Frame::RestoreCounter { reg, prev } => st.counters[reg as usize] = prev,
            Frame::RestoreStart { reg, prev } => st.starts[reg as usize] = prev,
        }
    }
    None
}

/// Remove resume points above `base`, preserving undo records in order
fn strip_resumes(st: &mut EngineState, base: usize) {
    let tail = st.stack.split_off(base);
    st.stack
        .extend(tail.into_iter().filter(|frame| !matches!(frame, Frame::Resume { .. })));
}

fn read_dir(
    input: &Input<'_>,
    pos: usize,
    unicode: bool,
    dir: Dir,
) -> Option<crate::input::ReadChar> {
    if dir.forward() {
        input.read(pos, unicode)
    } else {
        input.read_back(pos, unicode)
    }
}

fn step(pos: usize, width: usize, dir: Dir) -> usize {
    if dir.forward() { pos + width } else { pos - width }
}

fn canon(cp: u32, flags: Flags) -> u32 {
    casefold::canonicalize(cp, flags.unicode, flags.ignore_case)
}

fn class_matches(class: &CharClass, cp: u32, flags: Flags, orbit: &mut Vec<u32>) -> bool {
    let found = if flags.ignore_case {
        casefold::orbit(cp, flags.unicode, true, orbit);
        orbit.iter().any(|&candidate| class.contains_raw(candidate))
    } else {
        class.contains_raw(cp)
    };
    found != class.is_inverted()
}

/// Compare input against a captured range, canonicalizing per the flags.
/// Returns the committed position; `None` leaves the caller's position
/// untouched (the restore-exactly contract).
fn consume_backref(
    input: &Input<'_>,
    pos: usize,
    cap_start: usize,
    cap_end: usize,
    flags: Flags,
    dir: Dir,
) -> Option<usize> {
    let unicode = flags.unicode;
    if dir.forward() {
        let mut cap = cap_start;
        let mut cur = pos;
        while cap < cap_end {
            let expected = input.read(cap, unicode)?;
            if cur >= input.len() {
                return None; // insufficient input
            }
            let actual = input.read(cur, unicode)?;
            if canon(expected.cp, flags) != canon(actual.cp, flags) {
                return None;
            }
            cap += expected.width;
            cur += actual.width;
        }
        Some(cur)
    } else {
        let mut cap = cap_end;
        let mut cur = pos;
        while cap > cap_start {
            let expected = input.read_back(cap, unicode)?;
            if cur == 0 {
                return None;
            }
            let actual = input.read_back(cur, unicode)?;
            if canon(expected.cp, flags) != canon(actual.cp, flags) {
                return None;
            }
            cap -= expected.width;
            cur -= actual.width;
        }
        Some(cur)
    }
}

fn is_line_terminator(cp: u32) -> bool {
    matches!(cp, 0x0A | 0x0D | 0x2028 | 0x2029)
}

/// Word characters for `\b`/`\B`, classified on full code points
fn is_word_char(cp: u32, flags: Flags) -> bool {
    let ascii_word = matches!(cp, 0x30..=0x39 | 0x41..=0x5A | 0x5F | 0x61..=0x7A);
    if ascii_word {
        return true;
    }
    // With ignore_case + unicode, the fold closure of [A-Za-z] gains two members
    flags.ignore_case && flags.unicode && matches!(cp, 0x017F | 0x212A)
}
