// src/interchange.rs

use crate::catalog;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Write as _;
use tracing::debug;

/// Fixed offsets of the delimiters inside a 106-character ISA header.
const ISA_ELEMENT_SEP_OFFSET: usize = 3;
const ISA_SEGMENT_SEP_OFFSET: usize = 105;

const DEFAULT_ELEMENT_SEP: char = '*';
const DEFAULT_SEGMENT_SEP: char = '~';

const INVOICE_TRANSACTION: &str = "810";

/// Reasons an interchange is rejected before any field is extracted.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StructuralError {
    #[error("not an X12 interchange: no ISA, GS or ST segment found")]
    NotEnvelopeAtAll,
    #[error("transaction set {0} is not an 810 invoice")]
    WrongTransactionType(String),
    #[error("missing ISA interchange control header")]
    MissingEnvelopeHeader,
    #[error("missing GS functional group header")]
    MissingFunctionalGroup,
    #[error("missing ST transaction set header for an 810 invoice")]
    MissingTransactionSet,
    #[error("found {0} 810 transaction sets, expected exactly one")]
    MultipleTransactionSets(usize),
}

/// Element and segment delimiters in force for one interchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Delimiters {
    pub element: char,
    pub segment: char,
}

impl Default for Delimiters {
    fn default() -> Self {
        Self {
            element: DEFAULT_ELEMENT_SEP,
            segment: DEFAULT_SEGMENT_SEP,
        }
    }
}

/// Successful parse of an 810 interchange.
#[derive(Debug, Clone)]
pub struct ParsedInterchange {
    /// XML-like tree rendering, for inspection only.
    pub projection: String,
    pub field_codes: BTreeSet<String>,
    pub field_values: BTreeMap<String, String>,
}

struct Segment<'a> {
    tag: &'a str,
    elements: Vec<&'a str>,
}

impl Segment<'_> {
    fn element(&self, position: usize) -> Option<&str> {
        self.elements
            .get(position.checked_sub(1)?)
            .map(|e| e.trim())
            .filter(|e| !e.is_empty())
    }
}

/// Read the delimiters out of the ISA header, or fall back to `*` / `~`.
pub fn detect_delimiters(text: &str) -> Delimiters {
    if !text.starts_with("ISA") {
        return Delimiters::default();
    }
    let element = text.chars().nth(ISA_ELEMENT_SEP_OFFSET);
    let segment = text.chars().nth(ISA_SEGMENT_SEP_OFFSET);
    match (element, segment) {
        (Some(element), Some(segment)) => Delimiters { element, segment },
        _ => Delimiters::default(),
    }
}

fn split_segments(text: &str, delims: Delimiters) -> Vec<Segment<'_>> {
    text.split(delims.segment)
        .map(str::trim)
        .filter(|raw| !raw.is_empty())
        .map(|raw| {
            let mut parts = raw.split(delims.element);
            let tag = parts.next().unwrap_or_default().trim();
            Segment {
                tag,
                elements: parts.collect(),
            }
        })
        .collect()
}

fn validate_structure(segments: &[Segment<'_>]) -> Result<(), StructuralError> {
    let has = |tag: &str| segments.iter().any(|s| s.tag == tag);
    let (has_isa, has_gs) = (has("ISA"), has("GS"));
    let headers: Vec<&Segment<'_>> = segments.iter().filter(|s| s.tag == "ST").collect();

    if !has_isa && !has_gs && headers.is_empty() {
        return Err(StructuralError::NotEnvelopeAtAll);
    }
    if let Some(found) = headers
        .iter()
        .filter_map(|st| st.element(1))
        .find(|id| *id != INVOICE_TRANSACTION)
    {
        return Err(StructuralError::WrongTransactionType(found.to_string()));
    }
    if !has_isa {
        return Err(StructuralError::MissingEnvelopeHeader);
    }
    if !has_gs {
        return Err(StructuralError::MissingFunctionalGroup);
    }
    match headers
        .iter()
        .filter(|st| st.element(1) == Some(INVOICE_TRANSACTION))
        .count()
    {
        0 => Err(StructuralError::MissingTransactionSet),
        1 => Ok(()),
        n => Err(StructuralError::MultipleTransactionSets(n)),
    }
}

fn escape(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn render_projection(segments: &[Segment<'_>]) -> String {
    let mut out = String::from("<Interchange>\n");
    for segment in segments {
        let tag = escape(segment.tag);
        let name = catalog::segment_name(segment.tag).unwrap_or(segment.tag);
        let _ = writeln!(
            out,
            "  <Segment tag=\"{tag}\" name=\"{}\">",
            escape(name)
        );
        for (idx, value) in segment.elements.iter().enumerate() {
            let _ = writeln!(
                out,
                "    <Element code=\"{tag}{:02}\">{}</Element>",
                idx + 1,
                escape(value.trim())
            );
        }
        out.push_str("  </Segment>\n");
    }
    out.push_str("</Interchange>");
    out
}

/// Tokenize an 810 interchange and collect its field codes and values.
///
/// Structural checks run first; nothing is extracted from an interchange
/// that fails them.
pub fn parse_interchange(text: &str) -> Result<ParsedInterchange, StructuralError> {
    let delims = detect_delimiters(text);
    let segments = split_segments(text, delims);
    debug!(
        element = %delims.element,
        segment = %delims.segment,
        segments = segments.len(),
        "Tokenized interchange"
    );

    validate_structure(&segments)?;

    let mut field_codes = BTreeSet::new();
    let mut field_values = BTreeMap::new();
    for segment in &segments {
        for position in 1..=segment.elements.len() {
            let Some(value) = segment.element(position) else {
                continue;
            };
            let code = format!("{}{:02}", segment.tag, position);
            field_values
                .entry(code.clone())
                .or_insert_with(|| value.to_string());
            field_codes.insert(code);
        }
    }
    debug!(codes = field_codes.len(), "Extracted field codes");

    Ok(ParsedInterchange {
        projection: render_projection(&segments),
        field_codes,
        field_values,
    })
}
