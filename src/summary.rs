// src/summary.rs

use crate::catalog::{self, Requirement};
use crate::compare::ClassificationResult;
use regex::Regex;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::LazyLock;

fn round1(x: f64) -> f64 {
    (x * 10.0).round() / 10.0
}

/// Points deducted per length error, and the most that can be deducted.
const LENGTH_ERROR_PENALTY: f64 = 5.0;
const MAX_LENGTH_PENALTY: f64 = 25.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SegmentStatus {
    Present,
    Missing,
    NotUsed,
}

impl SegmentStatus {
    pub fn label(self) -> &'static str {
        match self {
            Self::Present => "Present",
            Self::Missing => "Missing",
            Self::NotUsed => "Not Used",
        }
    }
}

/// Per-segment rollup of one document.
#[derive(Debug, Clone, Serialize)]
pub struct SegmentSummaryRow {
    pub tag: &'static str,
    pub name: &'static str,
    pub x12_requirement: Requirement,
    pub company_usage: &'static str,
    pub min_use: u32,
    /// `">1"` when unbounded.
    pub max_use: String,
    pub present: bool,
    /// Any field of this segment is mandatory in the requirement map.
    pub required_by_spec: bool,
    pub status: SegmentStatus,
    pub status_label: &'static str,
}

/// One row for every registered segment, whether or not the document uses it.
pub fn segment_summary(
    present_fields: &BTreeSet<String>,
    requirements: &BTreeMap<String, bool>,
) -> Vec<SegmentSummaryRow> {
    let present_tags: BTreeSet<&str> = present_fields
        .iter()
        .filter_map(|code| catalog::tag_of(code))
        .collect();
    let required_tags: BTreeSet<&str> = requirements
        .iter()
        .filter(|(_, required)| **required)
        .filter_map(|(code, _)| catalog::tag_of(code))
        .collect();

    catalog::SEGMENTS
        .iter()
        .map(|seg| {
            let present = present_tags.contains(seg.tag);
            let required_by_spec = required_tags.contains(seg.tag);
            let status = if present {
                SegmentStatus::Present
            } else if seg.x12_requirement == Requirement::Mandatory || required_by_spec {
                SegmentStatus::Missing
            } else {
                SegmentStatus::NotUsed
            };
            SegmentSummaryRow {
                tag: seg.tag,
                name: catalog::segment_name(seg.tag).unwrap_or(seg.tag),
                x12_requirement: seg.x12_requirement,
                company_usage: seg.company_usage,
                min_use: seg.min_use,
                max_use: seg.max_use.map_or_else(|| ">1".to_string(), |m| m.to_string()),
                present,
                required_by_spec,
                status,
                status_label: status.label(),
            }
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ComplianceStatus {
    Excellent,
    Good,
    NeedsImprovement,
    CriticalIssues,
}

#[derive(Debug, Clone, Serialize)]
pub struct ComplianceScore {
    pub score: f64,
    pub status: ComplianceStatus,
    /// `"present/total"` mandatory fields.
    pub mandatory_completion: String,
    pub optional_fields_used: usize,
    pub length_errors: usize,
}

/// Share of mandatory fields present, less a capped penalty for length errors.
pub fn compliance_score(
    result: &ClassificationResult,
    requirements: &BTreeMap<String, bool>,
) -> ComplianceScore {
    let total_mandatory = requirements.values().filter(|r| **r).count();
    let mandatory_present = result.mandatory_present.len();

    let base = if total_mandatory == 0 {
        100.0
    } else {
        mandatory_present as f64 / total_mandatory as f64 * 100.0
    };
    let penalty = (result.length_errors.len() as f64 * LENGTH_ERROR_PENALTY).min(MAX_LENGTH_PENALTY);
    let score = round1((base - penalty).max(0.0));

    let status = match score {
        s if s >= 95.0 => ComplianceStatus::Excellent,
        s if s >= 85.0 => ComplianceStatus::Good,
        s if s >= 70.0 => ComplianceStatus::NeedsImprovement,
        _ => ComplianceStatus::CriticalIssues,
    };

    ComplianceScore {
        score,
        status,
        mandatory_completion: format!("{mandatory_present}/{total_mandatory}"),
        optional_fields_used: result.optional_present.len(),
        length_errors: result.length_errors.len(),
    }
}

// Structured compliance analysis

/// Fields whose absence gets a document rejected.
const CRITICAL_FIELDS: &[(&str, &str)] = &[
    ("ST01", "Transaction Set Identifier (must be 810)"),
    ("ST02", "Transaction Set Control Number"),
    ("BIG01", "Invoice Date"),
    ("BIG02", "Invoice Number"),
    ("SE01", "Number of Included Segments"),
    ("SE02", "Transaction Set Control Number"),
    ("CTT01", "Number of Line Items"),
    ("TDS01", "Total Invoice Amount"),
];

/// Fields that slow processing down when absent.
const IMPORTANT_FIELDS: &[(&str, &str)] = &[
    ("N101", "Entity Identifier Code"),
    ("N102", "Name"),
    ("N301", "Address Information"),
    ("N401", "City Name"),
    ("N402", "State or Province Code"),
    ("N403", "Postal Code"),
    ("IT102", "Quantity Invoiced"),
    ("IT103", "Unit or Basis for Measurement Code"),
    ("IT104", "Unit Price"),
    ("ITD01", "Terms Type Code"),
    ("ITD03", "Terms Discount Percent"),
    ("ITD07", "Terms Net Days"),
    ("REF01", "Reference Identification Qualifier"),
    ("REF02", "Reference Identification"),
];

/// Envelope and routing fields.
const CONTROL_FIELDS: &[(&str, &str)] = &[
    ("ISA01", "Authorization Information Qualifier"),
    ("ISA06", "Interchange Sender ID"),
    ("ISA08", "Interchange Receiver ID"),
    ("ISA09", "Interchange Date"),
    ("ISA13", "Interchange Control Number"),
    ("GS01", "Functional Identifier Code"),
    ("GS02", "Application Sender's Code"),
    ("GS03", "Application Receiver's Code"),
    ("GS04", "Date"),
    ("GS06", "Group Control Number"),
    ("GE01", "Number of Transaction Sets Included"),
    ("GE02", "Group Control Number"),
    ("IEA01", "Number of Included Functional Groups"),
    ("IEA02", "Interchange Control Number"),
];

/// Business categories and the fields that make each one complete.
const CATEGORIES: &[(&str, &[&str])] = &[
    ("invoice_integrity", &["ST01", "ST02", "BIG01", "BIG02", "TDS01", "SE01", "SE02"]),
    ("party_identification", &["N101", "N102", "N301", "N401", "N402", "N403"]),
    ("item_details", &["IT102", "IT103", "IT104", "CTT01"]),
    ("financial_totals", &["TDS01", "CTT01"]),
    ("payment_terms", &["ITD01", "ITD03", "ITD07"]),
    ("control_structure", &["ISA13", "GS06", "ST02", "SE02"]),
    ("reference_data", &["REF01", "REF02", "BIG03", "BIG04"]),
];

/// Fewer optional fields than this earns an enrichment recommendation.
const OPTIONAL_ENRICHMENT_THRESHOLD: usize = 5;

static CCYYMMDD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{8}$").expect("date pattern is valid"));
static YYMMDD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{6}$").expect("date pattern is valid"));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tier {
    Critical,
    Important,
    Control,
}

impl Tier {
    fn of(code: &str) -> Option<(Self, &'static str)> {
        [
            (Self::Critical, CRITICAL_FIELDS),
            (Self::Important, IMPORTANT_FIELDS),
            (Self::Control, CONTROL_FIELDS),
        ]
        .into_iter()
        .find_map(|(tier, table)| {
            table
                .iter()
                .find(|(c, _)| *c == code)
                .map(|(_, desc)| (tier, *desc))
        })
    }

    fn severity(self) -> Severity {
        match self {
            Self::Critical => Severity::Critical,
            Self::Important => Severity::High,
            Self::Control => Severity::Medium,
        }
    }

    fn name(self) -> &'static str {
        match self {
            Self::Critical => "critical",
            Self::Important => "important",
            Self::Control => "control",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    Critical,
    High,
    Medium,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IssueKind {
    MissingCriticalField,
    MissingImportantField,
    MissingControlField,
    CriticalLengthError,
    ImportantLengthError,
    ControlLengthError,
    InvalidTransactionType,
    InvalidDateFormat,
}

/// A compliance problem that needs attention before the invoice is sent.
#[derive(Debug, Clone, Serialize)]
pub struct Issue {
    #[serde(rename = "type")]
    pub kind: IssueKind,
    pub field: String,
    pub description: String,
    pub severity: Severity,
    pub impact: &'static str,
}

/// Missing and over-long fields of the tiered sets, then business-rule violations.
pub fn identify_issues(
    result: &ClassificationResult,
    field_values: &BTreeMap<String, String>,
) -> Vec<Issue> {
    let mut issues = Vec::new();

    for code in &result.mandatory_missing {
        let Some((tier, desc)) = Tier::of(code) else {
            continue;
        };
        let (kind, impact) = match tier {
            Tier::Critical => (
                IssueKind::MissingCriticalField,
                "Document will likely be rejected by trading partner",
            ),
            Tier::Important => (
                IssueKind::MissingImportantField,
                "May cause processing delays or issues",
            ),
            Tier::Control => (
                IssueKind::MissingControlField,
                "May affect document routing or validation",
            ),
        };
        issues.push(Issue {
            kind,
            field: code.clone(),
            description: format!("Missing {} field: {desc}", tier.name()),
            severity: tier.severity(),
            impact,
        });
    }

    for err in &result.length_errors {
        let Some((tier, _)) = Tier::of(&err.code) else {
            continue;
        };
        let (kind, impact) = match tier {
            Tier::Critical => (IssueKind::CriticalLengthError, "Will likely cause processing errors"),
            Tier::Important => (IssueKind::ImportantLengthError, "May cause processing issues"),
            Tier::Control => (IssueKind::ControlLengthError, "May affect document validation"),
        };
        issues.push(Issue {
            kind,
            field: err.code.clone(),
            description: format!("Length error in {} field: {err}", tier.name()),
            severity: tier.severity(),
            impact,
        });
    }

    issues.extend(check_business_rules(field_values));
    issues
}

/// ST01 must name an 810; BIG01 and GS04 are CCYYMMDD, ISA09 is YYMMDD.
pub fn check_business_rules(field_values: &BTreeMap<String, String>) -> Vec<Issue> {
    let mut issues = Vec::new();

    if let Some(st01) = field_values.get("ST01").filter(|v| *v != "810") {
        issues.push(Issue {
            kind: IssueKind::InvalidTransactionType,
            field: "ST01".to_string(),
            description: format!("Invalid transaction type: {st01}. Must be 810 for invoices."),
            severity: Severity::Critical,
            impact: "Document will be rejected",
        });
    }

    let date_rules: [(&str, &Regex); 3] =
        [("BIG01", &*CCYYMMDD), ("GS04", &*CCYYMMDD), ("ISA09", &*YYMMDD)];
    for (code, pattern) in date_rules {
        let Some(value) = field_values.get(code) else {
            continue;
        };
        if !pattern.is_match(value) {
            issues.push(Issue {
                kind: IssueKind::InvalidDateFormat,
                field: code.to_string(),
                description: format!("Invalid date format in {code}: {value}"),
                severity: Severity::Medium,
                impact: "May cause processing delays",
            });
        }
    }
    issues
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
}

#[derive(Debug, Clone, Serialize)]
pub struct BusinessImpact {
    pub risk_level: RiskLevel,
    /// 10 per missing mandatory field plus 5 per length error.
    pub impact_score: usize,
    pub factors: Vec<String>,
    pub processing_likelihood: &'static str,
}

pub fn business_impact(result: &ClassificationResult) -> BusinessImpact {
    let missing = result.mandatory_missing.len();
    let length_errors = result.length_errors.len();
    let impact_score = missing * 10 + length_errors * 5;

    let mut factors = Vec::new();
    if missing > 0 {
        factors.push(format!("{missing} mandatory fields missing"));
    }
    if length_errors > 0 {
        factors.push(format!("{length_errors} field length violations"));
    }

    let risk_level = match impact_score {
        0..20 => RiskLevel::Low,
        20..50 => RiskLevel::Medium,
        50..100 => RiskLevel::High,
        _ => RiskLevel::Critical,
    };
    let processing_likelihood = match impact_score {
        0..10 => "Very High (>95%)",
        10..30 => "High (85-95%)",
        30..60 => "Medium (70-85%)",
        60..100 => "Low (50-70%)",
        _ => "Very Low (<50%)",
    };

    BusinessImpact {
        risk_level,
        impact_score,
        factors,
        processing_likelihood,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Priority {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, Serialize)]
pub struct Recommendation {
    pub priority: Priority,
    pub category: &'static str,
    pub title: &'static str,
    pub description: String,
    pub action: &'static str,
}

pub fn recommendations(result: &ClassificationResult) -> Vec<Recommendation> {
    let mut out = Vec::new();

    let critical_missing: Vec<&str> = result
        .mandatory_missing
        .iter()
        .filter(|code| matches!(Tier::of(code), Some((Tier::Critical, _))))
        .map(String::as_str)
        .collect();
    if !critical_missing.is_empty() {
        out.push(Recommendation {
            priority: Priority::High,
            category: "MISSING_FIELDS",
            title: "Add Critical Missing Fields",
            description: format!("Add these critical fields: {}", critical_missing.join(", ")),
            action: "Review your EDI mapping and ensure all mandatory fields are populated",
        });
    }

    if !result.length_errors.is_empty() {
        out.push(Recommendation {
            priority: Priority::Medium,
            category: "DATA_VALIDATION",
            title: "Fix Field Length Issues",
            description: format!(
                "Correct length violations in {} fields",
                result.length_errors.len()
            ),
            action: "Review field specifications and adjust data to meet length requirements",
        });
    }

    if result.optional_present.len() < OPTIONAL_ENRICHMENT_THRESHOLD {
        out.push(Recommendation {
            priority: Priority::Low,
            category: "OPTIMIZATION",
            title: "Consider Adding Optional Fields",
            description: "Adding relevant optional fields can improve data richness".to_string(),
            action: "Review optional fields that might benefit your trading partners",
        });
    }
    out
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CategoryCompleteness {
    pub present: usize,
    pub total: usize,
    pub percentage: f64,
}

/// Share of each business category's fields present in the document.
pub fn completeness_by_category(
    present_fields: &BTreeSet<String>,
) -> BTreeMap<&'static str, CategoryCompleteness> {
    CATEGORIES
        .iter()
        .map(|(category, codes)| {
            let present = codes.iter().filter(|c| present_fields.contains(**c)).count();
            let total = codes.len();
            let percentage = round1(present as f64 / total as f64 * 100.0);
            (
                *category,
                CategoryCompleteness {
                    present,
                    total,
                    percentage,
                },
            )
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DataDensity {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DataQuality {
    pub completeness_rate: f64,
    pub empty_fields: usize,
    pub average_field_length: f64,
    pub data_density: DataDensity,
}

/// Emptiness and length of the extracted values; `None` when there are none.
pub fn data_quality(field_values: &BTreeMap<String, String>) -> Option<DataQuality> {
    if field_values.is_empty() {
        return None;
    }
    let total = field_values.len();
    let empty_fields = field_values.values().filter(|v| v.trim().is_empty()).count();
    let chars: usize = field_values.values().map(|v| v.chars().count()).sum();

    let empty = empty_fields as f64;
    let data_density = if empty < total as f64 * 0.1 {
        DataDensity::High
    } else if empty < total as f64 * 0.3 {
        DataDensity::Medium
    } else {
        DataDensity::Low
    };

    Some(DataQuality {
        completeness_rate: round1((total - empty_fields) as f64 / total as f64 * 100.0),
        empty_fields,
        average_field_length: round1(chars as f64 / total as f64),
        data_density,
    })
}

/// Number of present fields per segment tag.
pub fn segment_distribution(present_fields: &BTreeSet<String>) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for tag in present_fields.iter().filter_map(|code| catalog::tag_of(code)) {
        *counts.entry(tag.to_string()).or_insert(0) += 1;
    }
    counts
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PresenceTally {
    pub present: usize,
    pub missing: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ValidationSummary {
    pub total_fields_validated: usize,
    pub mandatory_fields: PresenceTally,
    pub optional_fields: PresenceTally,
    pub validation_errors: usize,
    pub additional_fields: usize,
}

pub fn validation_summary(result: &ClassificationResult) -> ValidationSummary {
    let mandatory_fields = PresenceTally {
        present: result.mandatory_present.len(),
        missing: result.mandatory_missing.len(),
    };
    let optional_fields = PresenceTally {
        present: result.optional_present.len(),
        missing: result.optional_missing.len(),
    };
    ValidationSummary {
        total_fields_validated: mandatory_fields.present
            + mandatory_fields.missing
            + optional_fields.present
            + optional_fields.missing,
        mandatory_fields,
        optional_fields,
        validation_errors: result.length_errors.len(),
        additional_fields: result.additional_fields.len(),
    }
}

/// Everything the analysis stage derives from one classification.
#[derive(Debug, Clone, Serialize)]
pub struct ComplianceAnalysis {
    pub critical_issues: Vec<Issue>,
    pub business_impact: BusinessImpact,
    pub recommendations: Vec<Recommendation>,
    pub segment_distribution: BTreeMap<String, usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_quality: Option<DataQuality>,
    pub completeness_by_category: BTreeMap<&'static str, CategoryCompleteness>,
    pub validation_summary: ValidationSummary,
}

pub fn analyze(
    result: &ClassificationResult,
    present_fields: &BTreeSet<String>,
    field_values: &BTreeMap<String, String>,
) -> ComplianceAnalysis {
    ComplianceAnalysis {
        critical_issues: identify_issues(result, field_values),
        business_impact: business_impact(result),
        recommendations: recommendations(result),
        segment_distribution: segment_distribution(present_fields),
        data_quality: data_quality(field_values),
        completeness_by_category: completeness_by_category(present_fields),
        validation_summary: validation_summary(result),
    }
}
