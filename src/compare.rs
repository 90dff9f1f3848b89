// src/compare.rs

use crate::catalog::{self, FieldRef, Requirement};
use crate::heuristics::StatusLetter;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

/// Above this many values, only catalog-mandatory fields are length checked.
pub const LENGTH_CHECK_CEILING: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LengthError {
    pub code: String,
    pub actual_length: usize,
    pub min: usize,
    pub max: usize,
}

impl std::fmt::Display for LengthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: length {} outside {}..={}",
            self.code, self.actual_length, self.min, self.max
        )
    }
}

/// Result of length checking a single value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LengthCheck {
    Within,
    Violation(LengthError),
    /// The catalog range is missing or malformed.
    Unconstrained,
    NotInCatalog,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ClassificationResult {
    pub mandatory_present: BTreeSet<String>,
    pub mandatory_missing: BTreeSet<String>,
    pub optional_present: BTreeSet<String>,
    pub optional_missing: BTreeSet<String>,
    /// Present but not in the requirement map, sorted.
    pub additional_fields: Vec<String>,
    pub length_errors: Vec<LengthError>,
    /// Values of present fields, kept for display.
    #[serde(skip)]
    pub values: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Bucket {
    MandatoryPresent,
    MandatoryMissing,
    OptionalPresent,
    OptionalMissing,
    Additional,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DisplayColor {
    Violation,
    Satisfied,
    Supplied,
    Unset,
    Extra,
}

/// One row of the field table shown to the user.
#[derive(Debug, Clone, Serialize)]
pub struct FieldDisplayRecord {
    pub code: String,
    pub name: Option<&'static str>,
    pub usage: String,
    pub cardinality: Option<&'static str>,
    pub data_type: Option<&'static str>,
    pub length: Option<&'static str>,
    pub value: Option<String>,
    pub bucket: Bucket,
    pub status: Option<StatusLetter>,
    pub color: DisplayColor,
    pub length_error: Option<LengthError>,
}

fn parse_range(spec: &str) -> Option<(usize, usize)> {
    let (min, max) = spec.split_once('/')?;
    let (min, max) = (min.trim().parse().ok()?, max.trim().parse().ok()?);
    (min <= max).then_some((min, max))
}

/// Check a value against the catalog length range of its code.
pub fn check_length(code: &str, value: &str) -> LengthCheck {
    let Some(field) = catalog::lookup(code) else {
        return LengthCheck::NotInCatalog;
    };
    let Some((min, max)) = parse_range(field.length) else {
        return LengthCheck::Unconstrained;
    };
    let actual_length = value.chars().count();
    if (min..=max).contains(&actual_length) {
        LengthCheck::Within
    } else {
        LengthCheck::Violation(LengthError {
            code: code.to_string(),
            actual_length,
            min,
            max,
        })
    }
}

/// Length errors for all catalogued values, in code order.
pub fn validate_lengths(field_values: &BTreeMap<String, String>) -> Vec<LengthError> {
    let mandatory_only = field_values.len() > LENGTH_CHECK_CEILING;
    if mandatory_only {
        debug!(
            values = field_values.len(),
            "Large document, checking mandatory field lengths only"
        );
    }

    field_values
        .iter()
        .filter(|(code, _)| {
            !mandatory_only
                || catalog::lookup(code)
                    .is_some_and(|f| f.default_status == Requirement::Mandatory)
        })
        .filter_map(|(code, value)| match check_length(code, value) {
            LengthCheck::Violation(err) => Some(err),
            LengthCheck::Within | LengthCheck::Unconstrained | LengthCheck::NotInCatalog => None,
        })
        .collect()
}

/// Partition the requirement map by presence and check value lengths.
pub fn classify(
    present_fields: &BTreeSet<String>,
    requirements: &BTreeMap<String, bool>,
    field_values: &BTreeMap<String, String>,
) -> ClassificationResult {
    let mut result = ClassificationResult::default();

    for (code, &required) in requirements {
        let bucket = match (required, present_fields.contains(code)) {
            (true, true) => &mut result.mandatory_present,
            (true, false) => &mut result.mandatory_missing,
            (false, true) => &mut result.optional_present,
            (false, false) => &mut result.optional_missing,
        };
        bucket.insert(code.clone());
    }

    result.additional_fields = present_fields
        .iter()
        .filter(|code| !requirements.contains_key(*code))
        .cloned()
        .collect();
    result.length_errors = validate_lengths(field_values);
    result.values = field_values
        .iter()
        .filter(|(code, _)| present_fields.contains(*code))
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();

    debug!(
        mandatory_present = result.mandatory_present.len(),
        mandatory_missing = result.mandatory_missing.len(),
        optional_present = result.optional_present.len(),
        optional_missing = result.optional_missing.len(),
        additional = result.additional_fields.len(),
        length_errors = result.length_errors.len(),
        "Classified fields"
    );
    result
}

fn color_for(bucket: Bucket, has_length_error: bool) -> DisplayColor {
    if has_length_error {
        return DisplayColor::Violation;
    }
    match bucket {
        Bucket::MandatoryPresent => DisplayColor::Satisfied,
        Bucket::MandatoryMissing => DisplayColor::Violation,
        Bucket::OptionalPresent => DisplayColor::Supplied,
        Bucket::OptionalMissing => DisplayColor::Unset,
        Bucket::Additional => DisplayColor::Extra,
    }
}

fn usage_text(field: Option<&FieldRef>, status: Option<StatusLetter>, present: bool) -> String {
    let usage = field.map(|f| f.usage).unwrap_or_default();
    let Some(letter) = status else {
        return usage.to_string();
    };
    let label = match letter {
        StatusLetter::X if present => format!("{} (present)", letter.label()),
        _ => letter.label().to_string(),
    };
    if usage.is_empty() {
        label
    } else {
        format!("{label}: {usage}")
    }
}

/// Combine classification buckets with catalog metadata for display.
pub fn decorate_for_display(
    result: &ClassificationResult,
    status_map: &BTreeMap<String, StatusLetter>,
) -> Vec<FieldDisplayRecord> {
    let errors: BTreeMap<&str, &LengthError> = result
        .length_errors
        .iter()
        .map(|e| (e.code.as_str(), e))
        .collect();

    let buckets = [
        (Bucket::MandatoryPresent, &result.mandatory_present),
        (Bucket::MandatoryMissing, &result.mandatory_missing),
        (Bucket::OptionalPresent, &result.optional_present),
        (Bucket::OptionalMissing, &result.optional_missing),
    ];
    let codes = buckets
        .into_iter()
        .flat_map(|(bucket, codes)| codes.iter().map(move |c| (bucket, c)))
        .chain(
            result
                .additional_fields
                .iter()
                .map(|c| (Bucket::Additional, c)),
        );

    let mut records: Vec<FieldDisplayRecord> = codes
        .map(|(bucket, code)| {
            let field = catalog::lookup(code);
            let status = status_map.get(code).copied();
            let value = result.values.get(code).cloned();
            let length_error = errors.get(code.as_str()).map(|e| (*e).clone());
            FieldDisplayRecord {
                code: code.clone(),
                name: field.map(|f| f.name),
                usage: usage_text(field, status, value.is_some()),
                cardinality: field.map(|f| f.cardinality),
                data_type: field.map(|f| f.data_type),
                length: field.map(|f| f.length),
                color: color_for(bucket, length_error.is_some()),
                value,
                bucket,
                status,
                length_error,
            }
        })
        .collect();
    records.sort_by(|a, b| a.code.cmp(&b.code));
    records
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(codes: &[&str]) -> BTreeSet<String> {
        codes.iter().map(|c| c.to_string()).collect()
    }

    fn reqs(pairs: &[(&str, bool)]) -> BTreeMap<String, bool> {
        pairs.iter().map(|(c, r)| (c.to_string(), *r)).collect()
    }

    fn values(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(c, v)| (c.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_partition_is_complete_and_disjoint() {
        let requirements = reqs(&[
            ("BIG01", true),
            ("BIG02", true),
            ("BIG03", false),
            ("BIG04", false),
            ("TDS01", true),
        ]);
        let present = set(&["BIG01", "BIG03", "N101", "ZZ01"]);
        let result = classify(&present, &requirements, &BTreeMap::new());

        assert_eq!(result.mandatory_present, set(&["BIG01"]));
        assert_eq!(result.mandatory_missing, set(&["BIG02", "TDS01"]));
        assert_eq!(result.optional_present, set(&["BIG03"]));
        assert_eq!(result.optional_missing, set(&["BIG04"]));
        assert_eq!(result.additional_fields, vec!["N101", "ZZ01"]);

        for code in requirements.keys() {
            let hits = [
                &result.mandatory_present,
                &result.mandatory_missing,
                &result.optional_present,
                &result.optional_missing,
            ]
            .iter()
            .filter(|b| b.contains(code))
            .count();
            assert_eq!(hits, 1, "{code}");
            assert!(!result.additional_fields.contains(code));
        }
    }

    #[test]
    fn test_every_requirement_combination_lands_in_one_bucket() {
        let codes = ["BIG01", "BIG02", "BIG03"];
        // Each code is unlisted, optional or mandatory (base 3), and present or not (base 2).
        for (req_mask, present_mask) in (0..27u32).flat_map(|r| (0..8u32).map(move |p| (r, p))) {
            let mask = format!("{req_mask}/{present_mask}");
            let mut requirements = BTreeMap::new();
            let mut present = set(&["ZZ01"]);
            for (i, code) in codes.iter().enumerate() {
                match req_mask / 3u32.pow(i as u32) % 3 {
                    1 => {
                        requirements.insert(code.to_string(), false);
                    }
                    2 => {
                        requirements.insert(code.to_string(), true);
                    }
                    _ => {}
                }
                if present_mask >> i & 1 == 1 {
                    present.insert(code.to_string());
                }
            }

            let result = classify(&present, &requirements, &BTreeMap::new());
            let buckets = [
                &result.mandatory_present,
                &result.mandatory_missing,
                &result.optional_present,
                &result.optional_missing,
            ];
            assert_eq!(
                buckets.iter().map(|b| b.len()).sum::<usize>(),
                requirements.len(),
                "mask {mask}"
            );
            for (code, &required) in &requirements {
                let is_present = present.contains(code);
                let expected = match (required, is_present) {
                    (true, true) => 0,
                    (true, false) => 1,
                    (false, true) => 2,
                    (false, false) => 3,
                };
                for (i, bucket) in buckets.iter().enumerate() {
                    assert_eq!(bucket.contains(code), i == expected, "mask {mask} {code}");
                }
                assert!(!result.additional_fields.contains(code), "mask {mask} {code}");
            }
            let expected_additional: Vec<String> = present
                .iter()
                .filter(|c| !requirements.contains_key(*c))
                .cloned()
                .collect();
            assert_eq!(result.additional_fields, expected_additional, "mask {mask}");
            assert!(result.additional_fields.contains(&"ZZ01".to_string()));
        }
    }

    #[test]
    fn test_empty_requirements_make_everything_additional() {
        let present = set(&["BIG02", "BIG01"]);
        let result = classify(&present, &BTreeMap::new(), &BTreeMap::new());
        assert_eq!(result.additional_fields, vec!["BIG01", "BIG02"]);
        assert!(result.mandatory_present.is_empty());
    }

    #[test]
    fn test_length_boundary() {
        let ok = "A".repeat(22);
        assert_eq!(check_length("BIG02", &ok), LengthCheck::Within);

        let long = "A".repeat(23);
        let errors = validate_lengths(&values(&[("BIG02", long.as_str())]));
        assert_eq!(
            errors,
            vec![LengthError {
                code: "BIG02".into(),
                actual_length: 23,
                min: 1,
                max: 22
            }]
        );
    }

    #[test]
    fn test_length_check_outcomes() {
        assert_eq!(check_length("ZZZ01", "anything"), LengthCheck::NotInCatalog);
        assert!(matches!(check_length("BIG01", "2024"), LengthCheck::Violation(_)));
        assert_eq!(parse_range("1/22"), Some((1, 22)));
        assert_eq!(parse_range("22"), None);
        assert_eq!(parse_range("a/b"), None);
        assert_eq!(parse_range("9/1"), None);
    }

    #[test]
    fn test_large_documents_check_mandatory_only() {
        let mut many: BTreeMap<String, String> = (0..LENGTH_CHECK_CEILING)
            .map(|i| (format!("ZZ{i:03}"), "x".to_string()))
            .collect();
        many.insert("BIG04".into(), "P".repeat(30));
        many.insert("BIG02".into(), "I".repeat(30));

        let errors = validate_lengths(&many);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].code, "BIG02");
    }

    #[test]
    fn test_display_colors() {
        let requirements = reqs(&[
            ("BIG01", true),
            ("BIG02", true),
            ("BIG04", false),
            ("BIG05", false),
            ("TDS01", true),
        ]);
        let present = set(&["BIG01", "BIG02", "BIG04"]);
        let big02 = "9".repeat(25);
        let vals = values(&[("BIG01", "20240101"), ("BIG02", big02.as_str()), ("BIG04", "PO1")]);
        let result = classify(&present, &requirements, &vals);
        let records = decorate_for_display(&result, &BTreeMap::new());

        let color = |code: &str| records.iter().find(|r| r.code == code).unwrap().color;
        assert_eq!(color("BIG01"), DisplayColor::Satisfied);
        assert_eq!(color("BIG02"), DisplayColor::Violation);
        assert_eq!(color("BIG04"), DisplayColor::Supplied);
        assert_eq!(color("BIG05"), DisplayColor::Unset);
        assert_eq!(color("TDS01"), DisplayColor::Violation);
        assert_eq!(records.len(), 5);
    }

    #[test]
    fn test_usage_labels() {
        let requirements = reqs(&[
            ("BIG01", true),
            ("REF03", false),
            ("REF01", false),
            ("BIG04", false),
            ("BIG05", false),
        ]);
        let present = set(&["BIG01", "REF03"]);
        let result = classify(&present, &requirements, &values(&[("BIG01", "20240101"), ("REF03", "x")]));
        let status_map: BTreeMap<String, StatusLetter> = [
            ("BIG01".to_string(), StatusLetter::M),
            ("REF03".to_string(), StatusLetter::X),
            ("REF01".to_string(), StatusLetter::X),
            ("BIG04".to_string(), StatusLetter::O),
        ]
        .into_iter()
        .collect();
        let records = decorate_for_display(&result, &status_map);
        let usage = |code: &str| records.iter().find(|r| r.code == code).unwrap().usage.clone();

        assert_eq!(usage("BIG01"), "Must Use: Must use");
        assert_eq!(usage("REF03"), "Conditional (present): Used when applicable");
        assert_eq!(usage("REF01"), "Conditional: Used when applicable");
        assert_eq!(usage("BIG04"), "Optional: Used when applicable");
        assert_eq!(usage("BIG05"), "Used when applicable");
    }
}
