// src/spec_extract.rs

use crate::config::ExtractionConfig;
use lopdf::{Dictionary, Document};
use tracing::{debug, info, warn};

/// Share of image-only pages at which a PDF counts as a scan.
const SCANNED_PAGE_RATIO: f64 = 0.8;

/// Result of turning an uploaded specification into text lines.
#[derive(Debug)]
pub enum SpecContent {
    /// Trimmed, non-blank lines, capped at the configured maximum.
    Lines(Vec<String>),
    /// The PDF appears to be scanned / image-only and needs OCR.
    ScannedImage,
    /// Something went wrong during extraction.
    Error(String),
}

fn is_pdf(bytes: &[u8]) -> bool {
    bytes.starts_with(b"%PDF")
}

/// Main entry point: takes raw specification bytes and returns its lines.
///
/// PDFs go through text extraction; anything else is decoded as UTF-8 with
/// invalid sequences dropped.
pub fn extract_spec_lines(bytes: &[u8], cfg: &ExtractionConfig) -> SpecContent {
    let content = if is_pdf(bytes) {
        extract_pdf_lines(bytes, cfg)
    } else {
        let head = &bytes[..bytes.len().min(cfg.max_bytes)];
        SpecContent::Lines(cap_lines(&decode_lossy(head), cfg.max_lines))
    };

    if let SpecContent::Lines(lines) = &content {
        info!(lines = lines.len(), "Specification text extracted");
    }
    content
}

/// Trimmed non-blank lines, at most `max_lines` of them.
pub fn cap_lines(text: &str, max_lines: usize) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .take(max_lines)
        .map(str::to_string)
        .collect()
}

fn decode_lossy(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).replace(char::REPLACEMENT_CHARACTER, "")
}

fn extract_pdf_lines(bytes: &[u8], cfg: &ExtractionConfig) -> SpecContent {
    let doc = match Document::load_mem(bytes) {
        Ok(doc) => doc,
        Err(e) => return SpecContent::Error(format!("unreadable PDF: {e}")),
    };

    let ratio = image_only_ratio(&doc);
    if ratio >= SCANNED_PAGE_RATIO {
        info!(ratio, "Specification PDF is image-only");
        return SpecContent::ScannedImage;
    }

    let text = match pdf_extract::extract_text_from_mem(bytes) {
        Ok(text) => text,
        Err(e) => {
            warn!(error = %e, "No text layer could be extracted from specification PDF");
            return SpecContent::ScannedImage;
        }
    };

    let visible = text.chars().filter(|c| !c.is_whitespace()).count();
    if visible < cfg.min_text_chars {
        info!(visible, "Specification PDF text layer is nearly empty");
        return SpecContent::ScannedImage;
    }
    SpecContent::Lines(cap_lines(&text, cfg.max_lines))
}

/// Fraction of pages that carry images but no fonts. Zero for a PDF without pages.
fn image_only_ratio(doc: &Document) -> f64 {
    let pages = doc.get_pages();
    if pages.is_empty() {
        return 0.0;
    }

    let image_only = pages
        .values()
        .filter_map(|id| doc.get_dictionary(*id).ok())
        .filter(|page| page_is_image_only(doc, page))
        .count();

    debug!(pages = pages.len(), image_only, "Checked PDF pages for text resources");
    image_only as f64 / pages.len() as f64
}

fn page_is_image_only(doc: &Document, page: &Dictionary) -> bool {
    let resources = page
        .get(b"Resources")
        .ok()
        .and_then(|r| doc.dereference(r).ok())
        .and_then(|(_, resolved)| resolved.as_dict().ok());

    let non_empty = |key: &[u8]| {
        resources
            .and_then(|res| res.get(key).ok())
            .and_then(|o| doc.dereference(o).ok())
            .and_then(|(_, resolved)| resolved.as_dict().ok())
            .is_some_and(|dict| !dict.is_empty())
    };

    non_empty(b"XObject") && !non_empty(b"Font")
}
