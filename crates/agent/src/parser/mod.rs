//! Turns a completion that follows the section-header contract back into a
//! typed record. The contract is data: one ordered list of headers, each
//! section ending at the next known header. Headers the completion omits
//! leave their field at its documented default; a completion with no known
//! header at all degrades to a record that carries only `full_analysis`.

pub mod format;

use crate::registry;
use albo_core::types::{AgentId, Priority, StructuredAnalysis};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;

/// The eight headers the analysis prompt demands, in canonical order.
/// Prompt construction and parsing both read from this table.
pub const SECTION_HEADERS: [&str; 8] = [
    "ZUSAMMENFASSUNG",
    "ERKANNTE DETAILS",
    "ACTION ITEMS",
    "NÄCHSTE SCHRITTE",
    "KATEGORIEN",
    "PRIORITÄT",
    "GESCHÄTZTER ZEITAUFWAND",
    "SAP-RELEVANZ",
];

pub const DEFAULT_ESTIMATED_TIME: &str = "30 Minuten";
pub const MAX_ACTION_ITEMS: usize = 5;

static ACTION_ITEM_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*\d+[.)]\s*(.*)$").expect("action item pattern"));

pub fn has_known_header(raw: &str) -> bool {
    SECTION_HEADERS.iter().any(|h| raw.contains(h))
}

/// Non-greedy section slice: from this header to the next known header or
/// the end of text.
fn section<'a>(raw: &'a str, header: &str) -> Option<&'a str> {
    let start = raw.find(header)?;
    let mut body_start = start + header.len();
    if raw[body_start..].starts_with(':') {
        body_start += 1;
    }
    let rest = &raw[body_start..];
    let end = SECTION_HEADERS
        .iter()
        .filter(|h| **h != header)
        .filter_map(|h| rest.find(h))
        .min()
        .unwrap_or(rest.len());
    Some(rest[..end].trim())
}

fn parse_details(body: &str, agent: AgentId) -> BTreeMap<String, String> {
    let mut details = BTreeMap::new();
    for label in registry::profile(agent).detail_fields {
        for line in body.lines() {
            let line = line
                .trim_start()
                .trim_start_matches(['-', '*', '•'])
                .trim_start();
            if let Some(rest) = line.strip_prefix(label) {
                if let Some(value) = rest.trim_start().strip_prefix(':') {
                    let value = value.trim();
                    // A label without a usable value must not abort the
                    // remaining fields.
                    if !value.is_empty() && !value.eq_ignore_ascii_case("unbekannt") {
                        details.insert(label.to_string(), value.to_string());
                    }
                    break;
                }
            }
        }
    }
    details
}

fn parse_action_items(body: &str) -> Vec<String> {
    let mut items: Vec<String> = Vec::new();
    for line in body.lines() {
        if let Some(caps) = ACTION_ITEM_RE.captures(line) {
            items.push(caps[1].trim().to_string());
        } else if let Some(current) = items.last_mut() {
            // Continuation line of a multi-line item; the section boundary
            // already stopped us at the next header.
            let continuation = line.trim();
            if !continuation.is_empty() {
                current.push(' ');
                current.push_str(continuation);
            }
        }
    }
    items.truncate(MAX_ACTION_ITEMS);
    items
}

fn parse_categories(body: &str) -> Vec<String> {
    body.split(['\n', ','])
        .map(|part| part.trim().trim_start_matches(['-', '*']).trim())
        .filter(|part| !part.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_sap(body: &str) -> Option<bool> {
    let lowered = body.trim().to_lowercase();
    if lowered.starts_with("ja") {
        Some(true)
    } else if lowered.starts_with("nein") {
        Some(false)
    } else {
        None
    }
}

/// Never fails: missing sections keep their defaults, an out-of-vocabulary
/// priority keeps Mittel, and the verbatim input always lands in
/// `full_analysis`.
pub fn parse(raw: &str, agent: AgentId) -> StructuredAnalysis {
    let mut analysis = StructuredAnalysis::default();

    if let Some(body) = section(raw, "ZUSAMMENFASSUNG") {
        analysis.summary = body.to_string();
    }
    if let Some(body) = section(raw, "ERKANNTE DETAILS") {
        analysis.extracted_details = parse_details(body, agent);
    }
    if let Some(body) = section(raw, "ACTION ITEMS") {
        analysis.action_items = parse_action_items(body);
    }
    if let Some(body) = section(raw, "NÄCHSTE SCHRITTE") {
        analysis.next_steps = body.to_string();
    }
    if let Some(body) = section(raw, "KATEGORIEN") {
        analysis.categories = parse_categories(body);
    }
    if let Some(priority) = section(raw, "PRIORITÄT").and_then(Priority::from_german) {
        analysis.priority = priority;
    }
    if let Some(body) = section(raw, "GESCHÄTZTER ZEITAUFWAND") {
        if !body.is_empty() {
            analysis.estimated_time = body.to_string();
        }
    }
    analysis.sap_relevant = section(raw, "SAP-RELEVANZ").and_then(parse_sap);
    analysis.full_analysis = raw.to_string();
    analysis
}

/// Reconstructs canonical header text from a record. Mock mode renders its
/// deterministic analysis through this so `full_analysis` stays re-parseable.
pub fn render(analysis: &StructuredAnalysis) -> String {
    let mut out = String::new();
    out.push_str("ZUSAMMENFASSUNG:\n");
    out.push_str(&analysis.summary);
    out.push_str("\n\nERKANNTE DETAILS:\n");
    for (label, value) in &analysis.extracted_details {
        out.push_str(&format!("- {label}: {value}\n"));
    }
    out.push_str("\nACTION ITEMS:\n");
    for (index, item) in analysis.action_items.iter().enumerate() {
        out.push_str(&format!("{}. {item}\n", index + 1));
    }
    out.push_str("\nNÄCHSTE SCHRITTE:\n");
    out.push_str(&analysis.next_steps);
    out.push_str("\n\nKATEGORIEN:\n");
    out.push_str(&analysis.categories.join(", "));
    out.push_str("\n\nPRIORITÄT:\n");
    out.push_str(analysis.priority.as_german());
    out.push_str("\n\nGESCHÄTZTER ZEITAUFWAND:\n");
    out.push_str(&analysis.estimated_time);
    out.push_str("\n\nSAP-RELEVANZ:\n");
    out.push_str(match analysis.sap_relevant {
        Some(true) => "Ja",
        Some(false) => "Nein",
        None => "Unbekannt",
    });
    out.push('\n');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const COMPLETION: &str = "\
ZUSAMMENFASSUNG:
Eingangsrechnung der Firma Meier über 1.250,00 EUR, fällig zum 15.09.

ERKANNTE DETAILS:
- Rechnungsnummer: RE-2024-017
- Betrag: 1.250,00 EUR
- Fälligkeitsdatum: 15.09.2026
- Lieferant: Meier GmbH
- Skonto: unbekannt

ACTION ITEMS:
1. Rechnung sachlich prüfen
2. Bestellbezug herstellen
3. Zur Zahlung freigeben

NÄCHSTE SCHRITTE:
Freigabe durch die Abteilungsleitung einholen.

KATEGORIEN:
Rechnung, Zahllauf

PRIORITÄT:
Hoch

GESCHÄTZTER ZEITAUFWAND:
15 Minuten

SAP-RELEVANZ:
Ja
";

    #[test]
    fn parses_all_sections() {
        let analysis = parse(COMPLETION, AgentId::Kreditor);
        assert!(analysis.summary.starts_with("Eingangsrechnung"));
        assert_eq!(
            analysis.extracted_details.get("Rechnungsnummer").unwrap(),
            "RE-2024-017"
        );
        assert_eq!(
            analysis.extracted_details.get("Lieferant").unwrap(),
            "Meier GmbH"
        );
        // "unbekannt" is not a value
        assert!(!analysis.extracted_details.contains_key("Skonto"));
        assert_eq!(analysis.action_items.len(), 3);
        assert_eq!(analysis.action_items[0], "Rechnung sachlich prüfen");
        assert_eq!(analysis.next_steps, "Freigabe durch die Abteilungsleitung einholen.");
        assert_eq!(analysis.categories, vec!["Rechnung", "Zahllauf"]);
        assert_eq!(analysis.priority, Priority::High);
        assert_eq!(analysis.estimated_time, "15 Minuten");
        assert_eq!(analysis.sap_relevant, Some(true));
        assert_eq!(analysis.full_analysis, COMPLETION);
    }

    #[test]
    fn missing_sections_keep_defaults() {
        let analysis = parse("ZUSAMMENFASSUNG:\nNur eine Zusammenfassung.", AgentId::Controller);
        assert_eq!(analysis.summary, "Nur eine Zusammenfassung.");
        assert_eq!(analysis.priority, Priority::Medium);
        assert_eq!(analysis.estimated_time, DEFAULT_ESTIMATED_TIME);
        assert!(analysis.action_items.is_empty());
        assert!(analysis.sap_relevant.is_none());
    }

    #[test]
    fn completion_without_headers_degrades_to_full_analysis_only() {
        let raw = "Das Modell hat das Format ignoriert und frei geantwortet.";
        assert!(!has_known_header(raw));
        let analysis = parse(raw, AgentId::Kreditor);
        assert_eq!(analysis.full_analysis, raw);
        assert!(analysis.summary.is_empty());
        assert!(analysis.extracted_details.is_empty());
        assert_eq!(analysis.priority, Priority::Medium);
    }

    #[test]
    fn out_of_vocabulary_priority_keeps_default() {
        let raw = "PRIORITÄT:\nsehr dringend";
        let analysis = parse(raw, AgentId::Controller);
        assert_eq!(analysis.priority, Priority::Medium);
    }

    #[test]
    fn action_items_cap_at_five_and_keep_order() {
        let raw = "\
ACTION ITEMS:
1. erstens
2. zweitens
3. drittens
4. viertens
5. fünftens
6. sechstens
7. siebtens
";
        let analysis = parse(raw, AgentId::Controller);
        assert_eq!(analysis.action_items.len(), MAX_ACTION_ITEMS);
        assert_eq!(analysis.action_items[0], "erstens");
        assert_eq!(analysis.action_items[4], "fünftens");
    }

    #[test]
    fn multi_line_action_items_are_preserved_up_to_the_next_header() {
        let raw = "\
ACTION ITEMS:
1. Rücksprache mit dem Einkauf halten
   und das Ergebnis dokumentieren
2. Zahlung freigeben

NÄCHSTE SCHRITTE:
Wiedervorlage in einer Woche.
";
        let analysis = parse(raw, AgentId::Controller);
        assert_eq!(analysis.action_items.len(), 2);
        assert_eq!(
            analysis.action_items[0],
            "Rücksprache mit dem Einkauf halten und das Ergebnis dokumentieren"
        );
        assert_eq!(analysis.next_steps, "Wiedervorlage in einer Woche.");
    }

    #[test]
    fn render_parse_round_trip_recovers_core_fields() {
        let mut original = StructuredAnalysis::default();
        original.summary = "Mahnung der Volksbank über 480,00 EUR.".to_string();
        original
            .extracted_details
            .insert("Betrag".to_string(), "480,00 EUR".to_string());
        original
            .extracted_details
            .insert("Mahnstufe".to_string(), "2".to_string());
        original.action_items = vec!["Zahlung veranlassen".to_string()];
        original.next_steps = "Konto auf Zahlungseingang prüfen.".to_string();
        original.categories = vec!["Mahnung".to_string(), "Forderung".to_string()];
        original.priority = Priority::High;
        original.estimated_time = "10 Minuten".to_string();
        original.sap_relevant = Some(false);

        let rendered = render(&original);
        let reparsed = parse(&rendered, AgentId::Debitor);

        assert_eq!(reparsed.summary, original.summary);
        assert_eq!(reparsed.priority, original.priority);
        assert_eq!(reparsed.categories, original.categories);
        assert_eq!(reparsed.extracted_details, original.extracted_details);
        assert_eq!(reparsed.action_items, original.action_items);
        assert_eq!(reparsed.sap_relevant, original.sap_relevant);
        assert_eq!(reparsed.full_analysis, rendered);
    }
}
