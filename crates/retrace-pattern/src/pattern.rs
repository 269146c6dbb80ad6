//! Validated, immutable patterns
//!
//! `Pattern::new` checks the invariants the matcher relies on (dense capture
//! numbering, resolvable backreferences, sane quantifier bounds), then
//! freezes the tree together with derived metadata: capture and quantifier
//! counts, the named-group table, the minimum match width, and the optional
//! prefix-scan acceleration table.

use std::collections::BTreeMap;

use crate::analysis;
use crate::term::{collect_alternatives, Alternative, AnchorKind, BackrefTarget, Term};
use crate::PatternError;

/// Match-relevant pattern flags
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Flags {
    /// `i` - canonicalize characters before comparison
    pub ignore_case: bool,
    /// `m` - `^`/`$` also match at line terminators
    pub multiline: bool,
    /// `s` - `.` matches line terminators
    pub dot_all: bool,
    /// `u` - code-point reads decode surrogate pairs
    pub unicode: bool,
}

impl Flags {
    /// Flag set with only `unicode` on
    pub fn unicode() -> Self {
        Self { unicode: true, ..Self::default() }
    }

    /// Flag set with `ignore_case` and `unicode` on
    pub fn ignore_case_unicode() -> Self {
        Self { ignore_case: true, unicode: true, ..Self::default() }
    }
}

/// A validated, immutable compiled pattern
///
/// Safe to share across threads; a `Pattern` is read-only for its entire
/// life, so any number of matcher instances may walk it concurrently.
#[derive(Debug, Clone)]
pub struct Pattern {
    alternatives: Vec<Alternative>,
    flags: Flags,
    capture_count: u32,
    named_groups: Vec<(String, Vec<u32>)>,
    quantifier_count: u32,
    min_width: usize,
    anchored_start: bool,
    prefix_scan: Option<analysis::PrefixScan>,
}

impl Pattern {
    /// Validate and freeze a term tree
    pub fn new(alternatives: Vec<Alternative>, flags: Flags) -> Result<Self, PatternError> {
        let mut declared = Vec::new();
        collect_alternatives(&alternatives, &mut declared);

        let mut seen = vec![false; declared.len() + 1];
        for &index in &declared {
            if index == 0 {
                return Err(PatternError::ZeroCaptureIndex);
            }
            let slot = index as usize;
            if slot <= declared.len() {
                if seen[slot] {
                    return Err(PatternError::DuplicateCaptureIndex { index });
                }
                seen[slot] = true;
            }
            // an index past the declaration count leaves a gap below it,
            // found by the scan after this loop
        }
        if let Some(missing) = (1..=declared.len()).find(|&slot| !seen[slot]) {
            return Err(PatternError::MissingCaptureIndex { index: missing as u32 });
        }
        let capture_count = declared.len() as u32;

        let mut named: BTreeMap<String, Vec<u32>> = BTreeMap::new();
        collect_named(&alternatives, &mut named);
        let named_groups: Vec<(String, Vec<u32>)> = named.into_iter().collect();

        let mut quantifier_count = 0;
        for alternative in &alternatives {
            for term in &alternative.terms {
                validate_term(term, capture_count, &named_groups, &mut quantifier_count)?;
            }
        }

        let min_width = min_width_alternatives(&alternatives, flags.unicode);
        let anchored_start = !flags.multiline
            && !alternatives.is_empty()
            && alternatives.iter().all(|alternative| {
                matches!(alternative.terms.first(), Some(Term::Anchor(AnchorKind::TextStart)))
            });
        let prefix_scan = analysis::compute_prefix_scan(&alternatives, flags);

        Ok(Self {
            alternatives,
            flags,
            capture_count,
            named_groups,
            quantifier_count,
            min_width,
            anchored_start,
            prefix_scan,
        })
    }

    /// Top-level alternatives
    pub fn alternatives(&self) -> &[Alternative] {
        &self.alternatives
    }

    /// Pattern flags
    pub fn flags(&self) -> Flags {
        self.flags
    }

    /// Number of capturing groups (excluding the whole-match slot 0)
    pub fn capture_count(&self) -> u32 {
        self.capture_count
    }

    /// Name table: name to the list of capture indices declared under it
    pub fn named_groups(&self) -> &[(String, Vec<u32>)] {
        &self.named_groups
    }

    /// Capture indices registered for a group name
    pub fn name_indices(&self, name: &str) -> Option<&[u32]> {
        self.named_groups
            .binary_search_by(|(n, _)| n.as_str().cmp(name))
            .ok()
            .map(|at| self.named_groups[at].1.as_slice())
    }

    /// Number of quantifiers in the tree (sizes the matcher's registers)
    pub fn quantifier_count(&self) -> u32 {
        self.quantifier_count
    }

    /// Minimum match width in code units
    pub fn min_width(&self) -> usize {
        self.min_width
    }

    /// Whether every alternative begins with a non-multiline `^`
    pub fn anchored_start(&self) -> bool {
        self.anchored_start
    }

    /// Prefix-scan acceleration table, when the prefix admits one
    pub fn prefix_scan(&self) -> Option<&analysis::PrefixScan> {
        self.prefix_scan.as_ref()
    }
}

fn validate_term(
    term: &Term,
    capture_count: u32,
    named: &[(String, Vec<u32>)],
    quantifiers: &mut u32,
) -> Result<(), PatternError> {
    match term {
        Term::Literal(_) | Term::Class(_) | Term::Anchor(_) => Ok(()),
        Term::Backreference(target) => match target {
            BackrefTarget::Index(index) => {
                if *index == 0 || *index > capture_count {
                    Err(PatternError::UnknownBackreference { target: index.to_string() })
                } else {
                    Ok(())
                }
            }
            BackrefTarget::Name(name) => {
                if named.iter().any(|(n, _)| n == name) {
                    Ok(())
                } else {
                    Err(PatternError::UnknownBackreference { target: name.clone() })
                }
            }
        },
        Term::Group { body, .. } | Term::Alternation(body) | Term::Assertion { body, .. } => {
            for alternative in body {
                for term in &alternative.terms {
                    validate_term(term, capture_count, named, quantifiers)?;
                }
            }
            Ok(())
        }
        Term::Quantifier { body, min, max, .. } => {
            if let Some(max) = max {
                if min > max {
                    return Err(PatternError::InvalidQuantifier { min: *min, max: *max });
                }
            }
            *quantifiers += 1;
            validate_term(body, capture_count, named, quantifiers)
        }
    }
}

fn collect_named(alternatives: &[Alternative], out: &mut BTreeMap<String, Vec<u32>>) {
    for alternative in alternatives {
        for term in &alternative.terms {
            collect_named_term(term, out);
        }
    }
}

fn collect_named_term(term: &Term, out: &mut BTreeMap<String, Vec<u32>>) {
    match term {
        Term::Group { body, capture } => {
            if let Some(slot) = capture {
                if let Some(name) = &slot.name {
                    out.entry(name.clone()).or_default().push(slot.index);
                }
            }
            collect_named(body, out);
        }
        Term::Quantifier { body, .. } => collect_named_term(body, out),
        Term::Alternation(body) | Term::Assertion { body, .. } => collect_named(body, out),
        _ => {}
    }
}

/// Width of one code point in code units
fn unit_width(cp: u32) -> usize {
    if cp > 0xFFFF { 2 } else { 1 }
}

pub(crate) fn min_width_alternatives(alternatives: &[Alternative], unicode: bool) -> usize {
    alternatives
        .iter()
        .map(|alternative| {
            alternative
                .terms
                .iter()
                .map(|term| min_width_term(term, unicode))
                .fold(0usize, usize::saturating_add)
        })
        .min()
        .unwrap_or(0)
}

fn min_width_term(term: &Term, unicode: bool) -> usize {
    match term {
        Term::Literal(cps) => cps.iter().map(|&cp| unit_width(cp)).sum(),
        Term::Class(_) => 1,
        Term::Group { body, .. } | Term::Alternation(body) => {
            min_width_alternatives(body, unicode)
        }
        Term::Quantifier { body, min, .. } => {
            (*min as usize).saturating_mul(min_width_term(body, unicode))
        }
        Term::Backreference(_) | Term::Anchor(_) | Term::Assertion { .. } => 0,
    }
}
