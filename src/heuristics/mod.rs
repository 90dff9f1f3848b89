// src/heuristics/mod.rs

mod status;

use crate::catalog::{self, Requirement};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

/// Lines longer than this are not scanned.
pub const MAX_LINE_CHARS: usize = 500;

/// Fields seeded when a document yields no field codes at all.
const FALLBACK_TAGS: &[&str] = &["ISA", "GS", "ST"];
const FALLBACK_CODES: &[&str] = &["BIG01", "BIG02", "CTT01", "SE01", "SE02"];

/// Usage letter found in a trading-partner specification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum StatusLetter {
    /// Mandatory
    M,
    /// Optional
    O,
    /// Conditional, not used unless the condition applies
    X,
}

impl StatusLetter {
    pub fn parse(token: &str) -> Option<Self> {
        match token {
            "M" => Some(Self::M),
            "O" => Some(Self::O),
            "X" => Some(Self::X),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::M => "M",
            Self::O => "O",
            Self::X => "X",
        }
    }

    pub fn is_required(self) -> bool {
        self == Self::M
    }

    /// Display label shown in front of a field's usage text.
    pub fn label(self) -> &'static str {
        match self {
            Self::M => "Must Use",
            Self::O => "Optional",
            Self::X => "Conditional",
        }
    }
}

impl From<Requirement> for StatusLetter {
    fn from(req: Requirement) -> Self {
        match req {
            Requirement::Mandatory => Self::M,
            Requirement::Optional => Self::O,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    TooLong,
    NoSegmentTag,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusSource {
    /// Letter found on the line itself.
    Explicit,
    /// No letter on the line; each code took its catalog default.
    CatalogDefault,
}

/// What a single specification line contributed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineOutcome {
    Skipped(SkipReason),
    NoKnownCodes,
    Matched {
        source: StatusSource,
        statuses: Vec<(String, StatusLetter)>,
    },
}

/// Requirements inferred from one specification document.
#[derive(Debug, Clone, Default)]
pub struct Inference {
    pub requirements: BTreeMap<String, bool>,
    pub status_map: BTreeMap<String, StatusLetter>,
    pub found_fields: BTreeSet<String>,
    /// True when nothing was found and the minimal header set was seeded.
    pub used_fallback: bool,
}

impl Inference {
    fn record(&mut self, code: String, letter: StatusLetter) {
        self.requirements.insert(code.clone(), letter.is_required());
        self.status_map.insert(code.clone(), letter);
        self.found_fields.insert(code);
    }

    fn seed_fallback(&mut self) {
        for field in catalog::all_fields() {
            let by_tag = catalog::tag_of(field.code).is_some_and(|t| FALLBACK_TAGS.contains(&t));
            if by_tag || FALLBACK_CODES.contains(&field.code) {
                self.record(field.code.to_string(), field.default_status.into());
            }
        }
        self.used_fallback = true;
    }
}

/// Classify a single line of specification text.
///
/// Precedence: a delimited letter (`M`, then `O`, then `X`), then a bare letter
/// among the last three tokens, then each code's catalog default.
pub fn infer_line(line: &str) -> LineOutcome {
    if line.chars().count() > MAX_LINE_CHARS {
        return LineOutcome::Skipped(SkipReason::TooLong);
    }
    if !catalog::segment_tags().any(|tag| line.contains(tag)) {
        return LineOutcome::Skipped(SkipReason::NoSegmentTag);
    }

    let codes = status::codes_in_line(line);
    if codes.is_empty() {
        return LineOutcome::NoKnownCodes;
    }

    match status::delimited_letter(line).or_else(|| status::trailing_letter(line)) {
        Some(letter) => LineOutcome::Matched {
            source: StatusSource::Explicit,
            statuses: codes.into_iter().map(|c| (c, letter)).collect(),
        },
        None => LineOutcome::Matched {
            source: StatusSource::CatalogDefault,
            statuses: codes
                .into_iter()
                .filter_map(|c| {
                    let letter = catalog::lookup(&c)?.default_status.into();
                    Some((c, letter))
                })
                .collect(),
        },
    }
}

/// Infer per-field requirement status from specification text lines.
///
/// Later lines overwrite earlier ones for the same code.
pub fn infer_requirements<I, S>(lines: I) -> Inference
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut inference = Inference::default();
    let (mut scanned, mut too_long, mut defaulted) = (0usize, 0usize, 0usize);

    for line in lines {
        scanned += 1;
        match infer_line(line.as_ref()) {
            LineOutcome::Matched { source, statuses } => {
                if source == StatusSource::CatalogDefault {
                    defaulted += statuses.len();
                }
                for (code, letter) in statuses {
                    inference.record(code, letter);
                }
            }
            LineOutcome::Skipped(SkipReason::TooLong) => too_long += 1,
            LineOutcome::Skipped(SkipReason::NoSegmentTag) | LineOutcome::NoKnownCodes => {}
        }
    }

    if inference.found_fields.is_empty() {
        debug!(scanned, "No field codes in specification, seeding header set");
        inference.seed_fallback();
    }

    debug!(
        scanned,
        too_long,
        defaulted,
        fields = inference.found_fields.len(),
        mandatory = inference.requirements.values().filter(|r| **r).count(),
        "Inferred requirements"
    );
    inference
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_letters() {
        let inf = infer_requirements([
            "BIG01 Invoice Date M DT 8/8",
            "BIG04 Purchase Order Number (O) AN 1/22",
            "REF03 Description [X]",
        ]);
        assert_eq!(inf.requirements["BIG01"], true);
        assert_eq!(inf.requirements["BIG04"], false);
        assert_eq!(inf.requirements["REF03"], false);
        assert_eq!(inf.status_map["REF03"], StatusLetter::X);
        assert!(!inf.used_fallback);
    }

    #[test]
    fn test_catalog_default_when_no_letter() {
        let inf = infer_requirements(["Segment BIG: BIG02 and BIG05 are described here"]);
        assert_eq!(inf.status_map["BIG02"], StatusLetter::M);
        assert_eq!(inf.status_map["BIG05"], StatusLetter::O);
        assert_eq!(inf.found_fields.len(), 2);
    }

    #[test]
    fn test_later_lines_win() {
        let inf = infer_requirements(["BIG04 Purchase Order Number (O)", "BIG04 (M)"]);
        assert_eq!(inf.requirements["BIG04"], true);
        assert_eq!(inf.status_map["BIG04"], StatusLetter::M);
    }

    #[test]
    fn test_line_outcomes() {
        let long = format!("BIG02 {}", "x".repeat(MAX_LINE_CHARS));
        assert_eq!(infer_line(&long), LineOutcome::Skipped(SkipReason::TooLong));
        assert_eq!(
            infer_line("nothing to see here"),
            LineOutcome::Skipped(SkipReason::NoSegmentTag)
        );
        assert_eq!(infer_line("BIG segment notes"), LineOutcome::NoKnownCodes);
        assert_eq!(
            infer_line("N104 Identification Code X"),
            LineOutcome::Matched {
                source: StatusSource::Explicit,
                statuses: vec![("N104".to_string(), StatusLetter::X)],
            }
        );
    }

    #[test]
    fn test_empty_input_seeds_header_set() {
        let inf = infer_requirements(Vec::<String>::new());
        assert!(inf.used_fallback);
        for code in ["ISA01", "ISA16", "GS08", "ST01", "ST02", "BIG01", "BIG02", "CTT01", "SE01", "SE02"] {
            assert!(inf.found_fields.contains(code), "{code}");
            assert_eq!(inf.requirements[code], true);
        }
        assert!(!inf.found_fields.contains("BIG03"));
        assert!(inf.status_map.values().all(|l| *l != StatusLetter::X));
        assert_eq!(
            inf.requirements.keys().collect::<Vec<_>>(),
            inf.found_fields.iter().collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_fallback_is_stable() {
        let a = infer_requirements(Vec::<String>::new());
        let b = infer_requirements(["no codes at all", "", "   "]);
        assert_eq!(a.status_map, b.status_map);
    }
}
