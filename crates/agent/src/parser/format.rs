//! Shallow format inspection of a free-text completion: does it carry
//! lists, figures, headers, tables or code, and which sections does it
//! declare. The dashboard picks its renderer from this report.

use albo_core::types::FormatReport;
use once_cell::sync::Lazy;
use regex::Regex;

static BULLET_LIST_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^[-•*]\s").expect("bullet list pattern"));
static NUMBERED_LIST_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^\d+\.\s").expect("numbered list pattern"));
static FIGURE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\d+[.,]\d+\s*(?:€|EUR|%)").expect("figure pattern"));
static UPPER_HEADER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^[A-ZÄÖÜ][A-ZÄÖÜ\s-]+:").expect("upper header pattern"));
static MARKDOWN_HEADER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^#{1,3}\s").expect("markdown header pattern"));
static SECTION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^([A-ZÄÖÜ][^:\n]+):").expect("section pattern"));

pub fn analyze_format(text: &str) -> FormatReport {
    let has_tables = text.contains('|')
        && text.lines().any(|line| line.split('|').count() > 2);
    let has_code =
        text.contains("```") || text.lines().any(|line| line.starts_with("    "));

    FormatReport {
        has_lists: BULLET_LIST_RE.is_match(text) || NUMBERED_LIST_RE.is_match(text),
        has_numbers: FIGURE_RE.is_match(text),
        has_headers: UPPER_HEADER_RE.is_match(text) || MARKDOWN_HEADER_RE.is_match(text),
        has_tables,
        has_code,
        sections: SECTION_RE
            .captures_iter(text)
            .map(|caps| caps[1].trim().to_string())
            .collect(),
    }
}
