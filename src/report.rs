// src/report.rs

use crate::compare::{self, ClassificationResult, FieldDisplayRecord};
use crate::heuristics::{self, Inference};
use crate::interchange;
use crate::summary::{self, ComplianceAnalysis, ComplianceScore, SegmentSummaryRow};
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::fmt::Write as _;
use tracing::{info, warn};

/// Everything produced for one interchange / specification pair.
#[derive(Debug, Serialize)]
pub struct ValidationReport {
    pub fingerprint: String,
    pub is_810: bool,
    pub message: String,
    pub present_fields: Vec<String>,
    pub mandatory_fields: Vec<String>,
    pub optional_fields: Vec<String>,
    pub used_fallback: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub classification: Option<ClassificationResult>,
    pub fields: Vec<FieldDisplayRecord>,
    pub segments: Vec<SegmentSummaryRow>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compliance: Option<ComplianceScore>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analysis: Option<ComplianceAnalysis>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub projection: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spec_projection: Option<String>,
}

/// SHA-256 of the submitted interchange, used to correlate log lines.
pub fn fingerprint(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}

/// Render inferred requirements as `<Spec><Field .../></Spec>`.
pub fn spec_projection(inference: &Inference) -> String {
    let mut out = String::from("<Spec>\n");
    for (code, required) in &inference.requirements {
        let status = inference
            .status_map
            .get(code)
            .map(|l| l.as_str())
            .unwrap_or_default();
        let _ = writeln!(
            out,
            "  <Field name=\"{code}\" required=\"{required}\" status=\"{status}\"/>"
        );
    }
    out.push_str("</Spec>");
    out
}

/// Parse, infer, classify and summarise one submission.
pub fn build_report(
    interchange_text: &str,
    spec_lines: &[String],
    include_projection: bool,
) -> ValidationReport {
    let fingerprint = fingerprint(interchange_text.as_bytes());

    let parsed = match interchange::parse_interchange(interchange_text) {
        Ok(parsed) => parsed,
        Err(e) => {
            warn!(error = %e, "Interchange rejected");
            return ValidationReport {
                fingerprint,
                is_810: false,
                message: e.to_string(),
                present_fields: Vec::new(),
                mandatory_fields: Vec::new(),
                optional_fields: Vec::new(),
                used_fallback: false,
                classification: None,
                fields: Vec::new(),
                segments: Vec::new(),
                compliance: None,
                analysis: None,
                projection: None,
                spec_projection: None,
            };
        }
    };

    let inference = heuristics::infer_requirements(spec_lines);
    let result = compare::classify(
        &parsed.field_codes,
        &inference.requirements,
        &parsed.field_values,
    );
    let fields = compare::decorate_for_display(&result, &inference.status_map);
    let segments = summary::segment_summary(&parsed.field_codes, &inference.requirements);
    let compliance = summary::compliance_score(&result, &inference.requirements);
    let analysis = summary::analyze(&result, &parsed.field_codes, &parsed.field_values);

    info!(
        present = parsed.field_codes.len(),
        requirements = inference.requirements.len(),
        mandatory_missing = result.mandatory_missing.len(),
        length_errors = result.length_errors.len(),
        score = compliance.score,
        issues = analysis.critical_issues.len(),
        "Comparison complete"
    );

    let split = |required: bool| -> Vec<String> {
        inference
            .requirements
            .iter()
            .filter(|(_, r)| **r == required)
            .map(|(code, _)| code.clone())
            .collect()
    };

    ValidationReport {
        fingerprint,
        is_810: true,
        message: "Comparison complete".to_string(),
        present_fields: parsed.field_codes.iter().cloned().collect(),
        mandatory_fields: split(true),
        optional_fields: split(false),
        used_fallback: inference.used_fallback,
        fields,
        segments,
        compliance: Some(compliance),
        analysis: Some(analysis),
        projection: include_projection.then(|| parsed.projection.clone()),
        spec_projection: include_projection.then(|| spec_projection(&inference)),
        classification: Some(result),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interchange::tests::{isa, sample_invoice};

    fn lines(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|l| l.to_string()).collect()
    }

    #[test]
    fn test_fingerprint_is_stable() {
        assert_eq!(fingerprint(b"ISA*00"), fingerprint(b"ISA*00"));
        assert_ne!(fingerprint(b"ISA*00"), fingerprint(b"ISA*01"));
        assert_eq!(fingerprint(b"").len(), 64);
    }

    #[test]
    fn test_end_to_end_report() {
        let spec = lines(&[
            "BIG01 Invoice Date M DT 8/8",
            "BIG02 Invoice Number M AN 1/22",
            "BIG04 Purchase Order Number (O)",
            "REF01 Reference Identification Qualifier (M)",
            "TDS01 Total Invoice Amount (M)",
        ]);
        let report = build_report(&sample_invoice(), &spec, true);

        assert!(report.is_810);
        assert!(!report.used_fallback);
        let result = report.classification.as_ref().unwrap();
        assert!(result.mandatory_present.contains("BIG01"));
        assert!(result.mandatory_present.contains("TDS01"));
        assert!(result.mandatory_missing.contains("REF01"));
        assert!(result.optional_missing.contains("BIG04"));
        assert!(result.additional_fields.contains(&"IT101".to_string()));
        assert_eq!(report.mandatory_fields, vec!["BIG01", "BIG02", "REF01", "TDS01"]);
        assert_eq!(report.optional_fields, vec!["BIG04"]);
        assert_eq!(report.segments.len(), 25);
        assert_eq!(report.compliance.as_ref().unwrap().mandatory_completion, "3/4");
        assert!(report.projection.as_ref().unwrap().contains("Invoice Information"));
        assert!(report
            .spec_projection
            .as_ref()
            .unwrap()
            .contains("<Field name=\"REF01\" required=\"true\" status=\"M\"/>"));
    }

    #[test]
    fn test_rejected_interchange_report() {
        let text = format!("{}GS*PO~ST*850*0001~", isa('*', '~'));
        let report = build_report(&text, &[], false);
        assert!(!report.is_810);
        assert_eq!(report.message, "transaction set 850 is not an 810 invoice");
        assert!(report.classification.is_none());
        assert!(report.analysis.is_none());
        assert!(report.fields.is_empty());
    }

    #[test]
    fn test_report_serializes() {
        let report = build_report(&sample_invoice(), &[], false);
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["is_810"], true);
        assert_eq!(json["used_fallback"], true);
        assert!(json.get("projection").is_none());
        assert_eq!(json["segments"].as_array().unwrap().len(), 25);
    }

    #[test]
    fn test_standard_interchange_meets_header_fallback() {
        let report = build_report(&sample_invoice(), &[], false);
        assert!(report.used_fallback);
        let result = report.classification.as_ref().unwrap();
        assert!(result.mandatory_missing.is_empty(), "{:?}", result.mandatory_missing);
        assert!(result.optional_missing.contains("ISA02"));
        assert!(result.optional_missing.contains("ISA04"));
        assert_eq!(report.compliance.as_ref().unwrap().score, 100.0);
    }

    #[test]
    fn test_report_carries_analysis() {
        let report = build_report(&sample_invoice(), &[], false);
        let analysis = report.analysis.as_ref().unwrap();
        assert!(analysis.critical_issues.is_empty());
        assert_eq!(analysis.business_impact.risk_level, summary::RiskLevel::Low);
        assert_eq!(analysis.segment_distribution["BIG"], 2);
        assert_eq!(analysis.completeness_by_category["financial_totals"].percentage, 100.0);
        assert_eq!(analysis.data_quality.as_ref().unwrap().empty_fields, 0);

        let spec = lines(&["REF01 Reference Identification Qualifier (M)", "ST01 (M)"]);
        let report = build_report(&sample_invoice(), &spec, false);
        let analysis = report.analysis.as_ref().unwrap();
        let issue = &analysis.critical_issues[0];
        assert_eq!(issue.field, "REF01");
        assert_eq!(issue.severity, summary::Severity::High);
        assert_eq!(analysis.business_impact.impact_score, 10);

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["analysis"]["critical_issues"][0]["type"], "MISSING_IMPORTANT_FIELD");
        assert_eq!(json["analysis"]["business_impact"]["risk_level"], "LOW");
    }
}
