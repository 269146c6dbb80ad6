//! Pattern lowering
//!
//! `Matcher::new` lowers the term tree once into a flat op list with
//! explicit jump targets. The tree stays the public interface; the ops are
//! what the backtracking loop dispatches on. Control shape per construct:
//!
//! - alternation: `Fork` chains, first branch preferred;
//! - quantifier: `ResetCounter`, a `CounterGate` head deciding
//!   enter/exit/fork, `MarkStart` recording the iteration's begin position
//!   (always, before the body can fail), a per-iteration `ClearCaptures`,
//!   the body, and a `LoopBack` edge with the zero-width guard;
//! - lookaround: a `Lookaround` op pointing at a separately lowered body
//!   region (reversed term order for lookbehind) ending in `Accept`.

use retrace_pattern::{
    Alternative, AnchorKind, AssertionKind, BackrefTarget, CharClass, Flags, Pattern, PrefixScan,
    Term,
};

/// Direction a region consumes input in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Dir {
    Forward,
    Backward,
}

impl Dir {
    pub(crate) fn forward(self) -> bool {
        self == Dir::Forward
    }
}

#[derive(Debug, Clone)]
pub(crate) enum Op {
    /// Consume one code point equal (under canonicalization) to `cp`
    Literal { cp: u32 },
    /// Consume one code point matching the class
    Class { class: CharClass },
    /// Match the text of the first set slot, zero-width when none is set
    Backref { slots: Box<[u32]> },
    TextStart,
    TextEnd,
    WordBoundary { negate: bool },
    /// Record the current position in a capture point
    Mark { point: u32 },
    /// Unset the listed groups (start of a quantifier iteration)
    ClearCaptures { slots: Box<[u32]> },
    /// Try the next op; on backtrack resume at `alternate`
    Fork { alternate: u32 },
    Jump { target: u32 },
    ResetCounter { reg: u32 },
    /// Quantifier head: mandatory entry below `min`, exit at `max`,
    /// otherwise fork between body and exit per greediness
    CounterGate { reg: u32, min: u32, max: Option<u32>, greedy: bool, exit: u32 },
    /// Record the iteration's begin position for the zero-width guard
    MarkStart { reg: u32 },
    /// Quantifier back-edge: fail on zero-width repeats past `min`
    LoopBack { reg: u32, min: u32, gate: u32 },
    /// Run a sub-execution at `body`; zero-width at the current position
    Lookaround { kind: AssertionKind, body: u32 },
    Accept,
}

/// A lowered pattern plus the metadata the match loop needs
#[derive(Debug)]
pub(crate) struct Program {
    pub ops: Vec<Op>,
    pub flags: Flags,
    pub capture_count: u32,
    pub register_count: u32,
    pub min_width: usize,
    pub anchored_start: bool,
    pub prefix_scan: Option<PrefixScan>,
}

pub(crate) fn lower(pattern: &Pattern) -> Program {
    let mut lowerer = Lowerer {
        ops: Vec::new(),
        next_reg: 0,
        pattern,
        pending: Vec::new(),
    };
    lowerer.alternation(pattern.alternatives(), Dir::Forward);
    lowerer.ops.push(Op::Accept);
    while let Some((at, body, dir)) = lowerer.pending.pop() {
        let entry = lowerer.ops.len() as u32;
        let Op::Lookaround { body: slot, .. } = &mut lowerer.ops[at] else {
            unreachable!("pending entry must point at a lookaround op");
        };
        *slot = entry;
        lowerer.alternation(body, dir);
        lowerer.ops.push(Op::Accept);
    }
    debug_assert!(lowerer.next_reg <= pattern.quantifier_count());

    Program {
        ops: lowerer.ops,
        flags: pattern.flags(),
        capture_count: pattern.capture_count(),
        register_count: pattern.quantifier_count(),
        min_width: pattern.min_width(),
        anchored_start: pattern.anchored_start(),
        prefix_scan: pattern.prefix_scan().copied(),
    }
}

struct Lowerer<'p> {
    ops: Vec<Op>,
    next_reg: u32,
    pattern: &'p Pattern,
    pending: Vec<(usize, &'p [Alternative], Dir)>,
}

impl<'p> Lowerer<'p> {
    fn alternation(&mut self, branches: &'p [Alternative], dir: Dir) {
        match branches {
            [] => {}
            [single] => self.alternative(single, dir),
            _ => {
                let last = branches.len() - 1;
                let mut jumps = Vec::with_capacity(last);
                for (i, branch) in branches.iter().enumerate() {
                    if i < last {
                        let fork_at = self.ops.len();
                        self.ops.push(Op::Fork { alternate: u32::MAX });
                        self.alternative(branch, dir);
                        jumps.push(self.ops.len());
                        self.ops.push(Op::Jump { target: u32::MAX });
                        let next = self.ops.len() as u32;
                        let Op::Fork { alternate } = &mut self.ops[fork_at] else {
                            unreachable!()
                        };
                        *alternate = next;
                    } else {
                        self.alternative(branch, dir);
                    }
                }
                let end = self.ops.len() as u32;
                for at in jumps {
                    let Op::Jump { target } = &mut self.ops[at] else { unreachable!() };
                    *target = end;
                }
            }
        }
    }

    fn alternative(&mut self, alternative: &'p Alternative, dir: Dir) {
        if dir.forward() {
            for term in &alternative.terms {
                self.term(term, dir);
            }
        } else {
            for term in alternative.terms.iter().rev() {
                self.term(term, dir);
            }
        }
    }

    fn term(&mut self, term: &'p Term, dir: Dir) {
        match term {
            Term::Literal(cps) => self.literal(cps, dir),
            Term::Class(class) => self.ops.push(Op::Class { class: class.clone() }),
            Term::Anchor(kind) => self.ops.push(match kind {
                AnchorKind::TextStart => Op::TextStart,
                AnchorKind::TextEnd => Op::TextEnd,
                AnchorKind::WordBoundary => Op::WordBoundary { negate: false },
                AnchorKind::NotWordBoundary => Op::WordBoundary { negate: true },
            }),
            Term::Backreference(target) => {
                let slots: Box<[u32]> = match target {
                    BackrefTarget::Index(index) => Box::new([*index]),
                    BackrefTarget::Name(name) => self
                        .pattern
                        .name_indices(name)
                        .expect("backreference name validated by Pattern::new")
                        .into(),
                };
                self.ops.push(Op::Backref { slots });
            }
            Term::Group { body, capture } => match capture {
                Some(slot) => {
                    let (first, second) = if dir.forward() {
                        (2 * slot.index, 2 * slot.index + 1)
                    } else {
                        (2 * slot.index + 1, 2 * slot.index)
                    };
                    self.ops.push(Op::Mark { point: first });
                    self.alternation(body, dir);
                    self.ops.push(Op::Mark { point: second });
                }
                None => self.alternation(body, dir),
            },
            Term::Alternation(branches) => self.alternation(branches, dir),
            Term::Assertion { kind, body } => {
                let at = self.ops.len();
                self.ops.push(Op::Lookaround { kind: *kind, body: u32::MAX });
                let sub_dir = if kind.is_behind() { Dir::Backward } else { Dir::Forward };
                self.pending.push((at, body.as_slice(), sub_dir));
            }
            Term::Quantifier { body, min, max, greedy } => {
                self.quantifier(body, *min, *max, *greedy, dir)
            }
        }
    }

    fn literal(&mut self, cps: &[u32], dir: Dir) {
        let mut units: Vec<u32> = Vec::with_capacity(cps.len());
        for &cp in cps {
            if !self.pattern.flags().unicode && cp > 0xFFFF {
                // Without the unicode flag a supplementary literal is just
                // its two surrogate units
                units.push(0xD800 + ((cp - 0x10000) >> 10));
                units.push(0xDC00 + ((cp - 0x10000) & 0x3FF));
            } else {
                units.push(cp);
            }
        }
        if !dir.forward() {
            units.reverse();
        }
        for cp in units {
            self.ops.push(Op::Literal { cp });
        }
    }

    fn quantifier(&mut self, body: &'p Term, min: u32, max: Option<u32>, greedy: bool, dir: Dir) {
        let reg = self.next_reg;
        self.next_reg += 1;
        if max == Some(0) {
            return;
        }

        let mut clear_slots = Vec::new();
        body.collect_captures(&mut clear_slots);

        self.ops.push(Op::ResetCounter { reg });
        let gate = self.ops.len();
        self.ops.push(Op::CounterGate { reg, min, max, greedy, exit: u32::MAX });
        self.ops.push(Op::MarkStart { reg });
        if !clear_slots.is_empty() {
            self.ops.push(Op::ClearCaptures { slots: clear_slots.into() });
        }
        self.term(body, dir);
        self.ops.push(Op::LoopBack { reg, min, gate: gate as u32 });

        let exit = self.ops.len() as u32;
        let Op::CounterGate { exit: slot, .. } = &mut self.ops[gate] else { unreachable!() };
        *slot = exit;
    }
}
