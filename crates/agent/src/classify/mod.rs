//! Keyword-driven email classification and agent suggestion. Pure, total
//! functions: every input yields a result, the AI never gets involved.

use albo_core::types::{
    AgentId, AgentSuggestion, Category, ClassificationResult, EmailMessage, Priority,
};
use once_cell::sync::Lazy;
use regex::Regex;

struct CategoryRule {
    keywords: &'static [&'static str],
    category: Category,
    priority: Priority,
    confidence: f32,
    suggested_action: &'static str,
}

// Ordered and mutually exclusive: first match wins. Dunning outranks
// invoice because an overdue payment is always more urgent than a fresh
// invoice.
const CATEGORY_RULES: &[CategoryRule] = &[
    CategoryRule {
        keywords: &["mahnung", "überfällig", "zahlungserinnerung", "reminder"],
        category: Category::Dunning,
        priority: Priority::High,
        confidence: 0.90,
        suggested_action: "Sofortige Zahlung veranlassen oder Zahlungsplan vereinbaren",
    },
    CategoryRule {
        keywords: &["rechnung", "invoice"],
        category: Category::Invoice,
        priority: Priority::Medium,
        confidence: 0.85,
        suggested_action: "Rechnung prüfen und zur Zahlung freigeben",
    },
    CategoryRule {
        keywords: &["angebot", "quote", "offerte"],
        category: Category::Quote,
        priority: Priority::Low,
        confidence: 0.80,
        suggested_action: "Angebot bewerten und Entscheidung treffen",
    },
];

const DEFAULT_ACTION: &str = "E-Mail zur weiteren Bearbeitung weiterleiten";

struct AgentRule {
    keywords: &'static [&'static str],
    agent: AgentId,
    confidence: f32,
    reason: &'static str,
}

// Order is part of the contract: invoice terms route to Kreditor before
// the dunning terms can claim them for Debitor.
const AGENT_RULES: &[AgentRule] = &[
    AgentRule {
        keywords: &["rechnung", "invoice", "lieferant"],
        agent: AgentId::Kreditor,
        confidence: 0.90,
        reason: "Rechnungsbezogene Schlüsselwörter erkannt",
    },
    AgentRule {
        keywords: &["mahnung", "forderung", "überfällig"],
        agent: AgentId::Debitor,
        confidence: 0.85,
        reason: "Mahnungsbezogene Inhalte erkannt",
    },
    AgentRule {
        keywords: &["budget", "forecast", "kpi"],
        agent: AgentId::Controller,
        confidence: 0.80,
        reason: "Controlling-relevante Themen erkannt",
    },
    AgentRule {
        keywords: &["strategie", "board", "investor"],
        agent: AgentId::Treasury,
        confidence: 0.75,
        reason: "Strategische Themen erkannt",
    },
];

// Digits with optional thousands/decimal separators followed by a
// currency token, e.g. "1.250,00 EUR".
static AMOUNT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(\d{1,3}(?:[.,]\d{3})*(?:[.,]\d{2})?)\s*(?:eur|euro|€)")
        .expect("amount pattern")
});

/// Assigns category, priority, confidence and an optional monetary amount
/// from raw text. Defaults to general/medium/0.75.
pub fn classify(text: &str) -> ClassificationResult {
    let lowered = text.to_lowercase();

    let rule = CATEGORY_RULES
        .iter()
        .find(|rule| rule.keywords.iter().any(|kw| lowered.contains(kw)));

    let amount = AMOUNT_RE
        .captures(&lowered)
        .map(|caps| caps[1].to_string());

    match rule {
        Some(rule) => ClassificationResult {
            category: rule.category,
            priority: rule.priority,
            confidence: rule.confidence,
            amount,
            suggested_action: rule.suggested_action.to_string(),
        },
        None => ClassificationResult {
            category: Category::General,
            priority: Priority::Medium,
            confidence: 0.75,
            amount,
            suggested_action: DEFAULT_ACTION.to_string(),
        },
    }
}

pub fn classify_email(email: &EmailMessage) -> ClassificationResult {
    classify(&email.combined_text())
}

/// Assigns one of the fixed financial roles. Default is Controller at 0.60.
pub fn suggest_agent(text: &str) -> AgentSuggestion {
    let lowered = text.to_lowercase();

    AGENT_RULES
        .iter()
        .find(|rule| rule.keywords.iter().any(|kw| lowered.contains(kw)))
        .map(|rule| AgentSuggestion {
            agent: rule.agent,
            confidence: rule.confidence,
            reasoning: rule.reason.to_string(),
        })
        .unwrap_or(AgentSuggestion {
            agent: AgentId::Controller,
            confidence: 0.60,
            reasoning: "Standard-Zuweisung".to_string(),
        })
}

pub fn suggest_agent_for(email: &EmailMessage) -> AgentSuggestion {
    suggest_agent(&email.combined_text())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dunning_keyword_wins_regardless_of_casing() {
        for text in ["MAHNUNG wegen Rechnung 4711", "Zahlung ÜBERFÄLLIG", "Reminder: invoice"] {
            let result = classify(text);
            assert_eq!(result.category, Category::Dunning, "text: {text}");
            assert_eq!(result.priority, Priority::High);
            assert_eq!(result.confidence, 0.90);
        }
    }

    #[test]
    fn dunning_outranks_invoice() {
        // Both keyword sets present; the ordered table must pick dunning.
        let result = classify("Mahnung zur Rechnung 2024-017");
        assert_eq!(result.category, Category::Dunning);
    }

    #[test]
    fn unrecognized_text_defaults_to_general() {
        let result = classify("Einladung zum Sommerfest");
        assert_eq!(result.category, Category::General);
        assert_eq!(result.priority, Priority::Medium);
        assert_eq!(result.confidence, 0.75);
        assert_eq!(result.suggested_action, DEFAULT_ACTION);
        assert!(result.amount.is_none());
    }

    #[test]
    fn amount_with_german_separators_is_extracted() {
        let result = classify("Rechnungsbetrag: 1.250,00 EUR");
        assert_eq!(result.category, Category::Invoice);
        assert_eq!(result.amount.as_deref(), Some("1.250,00"));
    }

    #[test]
    fn amount_accepts_euro_sign_and_plain_values() {
        assert_eq!(classify("Summe 500 €").amount.as_deref(), Some("500"));
        assert_eq!(
            classify("insgesamt 12.000 Euro offen").amount.as_deref(),
            Some("12.000")
        );
    }

    #[test]
    fn quote_keywords_yield_low_priority() {
        let result = classify("Unser Angebot für Projekt X");
        assert_eq!(result.category, Category::Quote);
        assert_eq!(result.priority, Priority::Low);
    }

    #[test]
    fn suggest_agent_is_total_with_controller_default() {
        let suggestion = suggest_agent("");
        assert_eq!(suggestion.agent, AgentId::Controller);
        assert_eq!(suggestion.confidence, 0.60);
        assert_eq!(suggestion.reasoning, "Standard-Zuweisung");
    }

    #[test]
    fn invoice_terms_route_to_kreditor_before_debitor() {
        // "rechnung" appears in both rule rows conceptually; order decides.
        let suggestion = suggest_agent("Rechnung von Lieferant Meier, überfällig");
        assert_eq!(suggestion.agent, AgentId::Kreditor);
        assert_eq!(suggestion.confidence, 0.90);
    }

    #[test]
    fn strategic_topics_route_to_treasury() {
        let suggestion = suggest_agent("Board-Präsentation zur Strategie 2027");
        assert_eq!(suggestion.agent, AgentId::Treasury);
    }

    #[test]
    fn controlling_terms_route_to_controller() {
        let suggestion = suggest_agent("Bitte den Forecast für Q3 aktualisieren");
        assert_eq!(suggestion.agent, AgentId::Controller);
        assert_eq!(suggestion.confidence, 0.80);
    }
}
