// src/catalog/mod.rs

mod fields;

use serde::Serialize;
use std::collections::HashMap;
use std::sync::LazyLock;

use Requirement::{Mandatory as M, Optional as O};

/// Default requirement of a field when no specification document says otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Requirement {
    Mandatory,
    Optional,
}

/// Reference metadata for a single element position (`BIG02`, `N104`, ...).
#[derive(Debug, Clone)]
pub struct FieldRef {
    pub code: &'static str,
    pub name: &'static str,
    pub usage: &'static str,
    /// Occurrences as `"min/max"`.
    pub cardinality: &'static str,
    pub data_type: &'static str,
    /// Characters as `"min/max"`.
    pub length: &'static str,
    pub default_status: Requirement,
}

/// One row of the known-segment registry.
#[derive(Debug, Clone, Copy)]
pub struct SegmentRef {
    pub tag: &'static str,
    pub x12_requirement: Requirement,
    pub company_usage: &'static str,
    pub min_use: u32,
    /// `None` means unbounded (`>1`).
    pub max_use: Option<u32>,
}

static BY_CODE: LazyLock<HashMap<&'static str, &'static FieldRef>> =
    LazyLock::new(|| fields::FIELDS.iter().map(|f| (f.code, f)).collect());

/// Look up a field code in the reference catalog.
pub fn lookup(code: &str) -> Option<&'static FieldRef> {
    BY_CODE.get(code).copied()
}

pub fn all_fields() -> &'static [FieldRef] {
    fields::FIELDS
}

/// The segment tag portion of a field code (`"IT102"` -> `"IT1"`).
pub fn tag_of(code: &str) -> Option<&str> {
    let split = code.len().checked_sub(2)?;
    let (tag, pos) = code.split_at_checked(split)?;
    (!tag.is_empty() && pos.bytes().all(|b| b.is_ascii_digit())).then_some(tag)
}

/// Long-form names used when rendering segments.
const SEGMENT_NAMES: &[(&str, &str)] = &[
    ("ISA", "Interchange Control Header"),
    ("GS", "Functional Group Header"),
    ("ST", "Transaction Set Header"),
    ("BIG", "Invoice Information"),
    ("NTE", "Note/Special Instruction"),
    ("CUR", "Currency"),
    ("REF", "Reference Identification"),
    ("PER", "Administrative Communications Contact"),
    ("N1", "Party Identification"),
    ("N2", "Additional Name Information"),
    ("N3", "Party Location"),
    ("N4", "Geographic Location"),
    ("ITD", "Terms of Sale"),
    ("DTM", "Date/Time Reference"),
    ("FOB", "FOB Related Instructions"),
    ("IT1", "Baseline Item Data"),
    ("PID", "Product/Item Description"),
    ("PO4", "Item Physical Details"),
    ("CAD", "Carrier Detail"),
    ("TDS", "Total Monetary Value Summary"),
    ("TXI", "Tax Information"),
    ("SAC", "Service, Promotion, Allowance, or Charge Information"),
    ("ISS", "Invoice Shipment Summary"),
    ("CTT", "Transaction Totals"),
    ("SE", "Transaction Set Trailer"),
    ("GE", "Functional Group Trailer"),
    ("IEA", "Interchange Control Trailer"),
];

pub fn segment_name(tag: &str) -> Option<&'static str> {
    SEGMENT_NAMES
        .iter()
        .find(|(t, _)| *t == tag)
        .map(|(_, name)| *name)
}

const fn seg(
    tag: &'static str,
    x12_requirement: Requirement,
    company_usage: &'static str,
    min_use: u32,
    max_use: Option<u32>,
) -> SegmentRef {
    SegmentRef {
        tag,
        x12_requirement,
        company_usage,
        min_use,
        max_use,
    }
}

/// The 25 segments tracked by the segment summary, in document order.
pub static SEGMENTS: &[SegmentRef] = &[
    seg("ISA", M, "Must Use", 1, Some(1)),
    seg("GS", M, "Must Use", 1, Some(1)),
    seg("ST", M, "Must Use", 1, Some(1)),
    seg("BIG", M, "Must Use", 1, Some(1)),
    seg("NTE", O, "Used", 0, Some(100)),
    seg("CUR", O, "Used", 0, Some(1)),
    seg("REF", O, "Used", 0, Some(12)),
    seg("PER", O, "Used", 0, Some(3)),
    seg("N1", O, "Must Use", 0, Some(200)),
    seg("N2", O, "Used", 0, Some(2)),
    seg("N3", O, "Used", 0, Some(2)),
    seg("N4", O, "Used", 0, Some(1)),
    seg("ITD", O, "Used", 0, None),
    seg("DTM", O, "Used", 0, Some(10)),
    seg("FOB", O, "Used", 0, Some(1)),
    seg("IT1", O, "Must Use", 0, Some(200_000)),
    seg("PID", O, "Used", 0, Some(1000)),
    seg("TDS", M, "Must Use", 1, Some(1)),
    seg("TXI", O, "Used", 0, Some(10)),
    seg("SAC", O, "Used", 0, Some(25)),
    seg("ISS", O, "Used", 0, None),
    seg("CTT", O, "Must Use", 0, Some(1)),
    seg("SE", M, "Must Use", 1, Some(1)),
    seg("GE", M, "Must Use", 1, Some(1)),
    seg("IEA", M, "Must Use", 1, Some(1)),
];

/// Tags used as a cheap pre-filter when scanning specification text.
pub fn segment_tags() -> impl Iterator<Item = &'static str> {
    SEGMENTS.iter().map(|s| s.tag)
}
