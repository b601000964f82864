//! Built-in prompt-template catalog. Loaded once at startup, read-only;
//! templates carry `{{placeholder}}` tokens that request-time answers fill.

use albo_core::types::{AgentId, PromptQuestion, PromptTemplate, QuestionType};
use once_cell::sync::Lazy;
use std::collections::BTreeMap;

/// Literal marker for a declared question the caller left unanswered.
pub const UNANSWERED: &str = "Nicht angegeben";

fn question(
    id: &str,
    label: &str,
    question_type: QuestionType,
    placeholder: Option<&str>,
) -> PromptQuestion {
    PromptQuestion {
        id: id.to_string(),
        label: label.to_string(),
        question_type,
        required: true,
        options: None,
        placeholder: placeholder.map(str::to_string),
        default_value: None,
    }
}

static TEMPLATES: Lazy<Vec<PromptTemplate>> = Lazy::new(|| {
    vec![
        PromptTemplate {
            id: "ctrl-001".into(),
            title: "Business Case für Produktinvestitionen".into(),
            role: AgentId::Controller,
            category: "Investment & Business Cases".into(),
            complexity: "high".into(),
            estimated_time: "25 min".into(),
            description: "Erstellt einen vollständigen Business Case mit NPV, IRR, \
                Amortisation und Entscheidungsvorlage für CAPEX-Freigaben"
                .into(),
            tags: vec![
                "CAPEX".into(),
                "NPV".into(),
                "IRR".into(),
                "Investment".into(),
                "Business Case".into(),
            ],
            questions: vec![
                question(
                    "investment_object",
                    "Was ist der Investitionsgegenstand?",
                    QuestionType::Text,
                    Some("z.B. CNC-Fräse für Produktlinie XY"),
                ),
                question(
                    "investment_volume",
                    "Investitionsvolumen (€)",
                    QuestionType::Number,
                    Some("850000"),
                ),
                PromptQuestion {
                    id: "calculation_period".into(),
                    label: "Berechnungszeitraum".into(),
                    question_type: QuestionType::Select,
                    required: true,
                    options: Some(vec![
                        "3 Jahre".into(),
                        "5 Jahre".into(),
                        "8 Jahre".into(),
                        "10 Jahre".into(),
                    ]),
                    placeholder: None,
                    default_value: None,
                },
                question(
                    "expected_returns",
                    "Jährliche Erlöse/Einsparungen (€)",
                    QuestionType::Number,
                    Some("180000"),
                ),
                PromptQuestion {
                    id: "discount_rate".into(),
                    label: "Kalkulationszins (%)".into(),
                    question_type: QuestionType::Number,
                    required: true,
                    options: None,
                    placeholder: None,
                    default_value: Some("6".into()),
                },
            ],
            prompt_template: "Du bist ein erfahrener Controller mit Spezialisierung auf \
Investitionsrechnungen.

INVESTITIONSDATEN:
- Investitionsgegenstand: {{investment_object}}
- Investitionsvolumen: {{investment_volume}} €
- Berechnungszeitraum: {{calculation_period}}
- Erwartete jährliche Erlöse/Einsparungen: {{expected_returns}} €
- Kalkulationszins: {{discount_rate}}%

AUFGABE:
1. Erstelle eine Cashflow-Tabelle über die Laufzeit
2. Berechne Kapitalwert (NPV), internen Zinsfuß (IRR), Amortisationsdauer
3. Bewerte die Investition qualitativ
4. Gib eine klare Empfehlung

FORMAT:
- Professionelle Tabellen
- Klare Kennzahlen
- Executive Summary
- Entscheidungsempfehlung"
                .into(),
        },
        PromptTemplate {
            id: "kred-001".into(),
            title: "Skonto-Prüfung für Eingangsrechnung".into(),
            role: AgentId::Kreditor,
            category: "Rechnungsprüfung".into(),
            complexity: "low".into(),
            estimated_time: "10 min".into(),
            description: "Prüft, ob die Skontofrist einer Eingangsrechnung noch \
                nutzbar ist und berechnet den Skontovorteil"
                .into(),
            tags: vec!["Skonto".into(), "Eingangsrechnung".into(), "Zahllauf".into()],
            questions: vec![
                question(
                    "invoice_number",
                    "Rechnungsnummer",
                    QuestionType::Text,
                    Some("RE-2024-017"),
                ),
                question(
                    "invoice_amount",
                    "Rechnungsbetrag (€)",
                    QuestionType::Number,
                    Some("1250,00"),
                ),
                question(
                    "skonto_terms",
                    "Skontobedingungen",
                    QuestionType::Text,
                    Some("2% bei Zahlung innerhalb 14 Tagen"),
                ),
            ],
            prompt_template: "Du bist Kreditorenbuchhalter.

RECHNUNGSDATEN:
- Rechnungsnummer: {{invoice_number}}
- Betrag: {{invoice_amount}} €
- Skontobedingungen: {{skonto_terms}}

AUFGABE:
1. Berechne den Skontovorteil in Euro
2. Prüfe, ob die Frist ab heute noch einzuhalten ist
3. Gib eine Zahlungsempfehlung"
                .into(),
        },
        PromptTemplate {
            id: "deb-001".into(),
            title: "Mahnschreiben vorbereiten".into(),
            role: AgentId::Debitor,
            category: "Mahnwesen".into(),
            complexity: "medium".into(),
            estimated_time: "15 min".into(),
            description: "Formuliert ein Mahnschreiben passend zur Mahnstufe mit \
                neuem Zahlungsziel"
                .into(),
            tags: vec!["Mahnung".into(), "Forderung".into()],
            questions: vec![
                question("customer", "Kunde", QuestionType::Text, Some("Muster GmbH")),
                question(
                    "open_amount",
                    "Offener Betrag (€)",
                    QuestionType::Number,
                    Some("480,00"),
                ),
                PromptQuestion {
                    id: "dunning_level".into(),
                    label: "Mahnstufe".into(),
                    question_type: QuestionType::Select,
                    required: true,
                    options: Some(vec!["1".into(), "2".into(), "3".into()]),
                    placeholder: None,
                    default_value: Some("1".into()),
                },
            ],
            prompt_template: "Du bist Debitorenbuchhalter.

FORDERUNGSDATEN:
- Kunde: {{customer}}
- Offener Betrag: {{open_amount}} €
- Mahnstufe: {{dunning_level}}

AUFGABE:
Formuliere ein professionelles Mahnschreiben auf Deutsch mit neuem \
Zahlungsziel (14 Tage) und dem Hinweis auf die nächste Mahnstufe."
                .into(),
        },
    ]
});

pub fn all() -> &'static [PromptTemplate] {
    &TEMPLATES
}

pub fn find(id: &str) -> Option<&'static PromptTemplate> {
    TEMPLATES.iter().find(|t| t.id == id)
}

/// Ids of the catalog templates belonging to a role, for envelope
/// recommendations.
pub fn template_ids_for(role: AgentId) -> Vec<String> {
    TEMPLATES
        .iter()
        .filter(|t| t.role == role)
        .map(|t| t.id.clone())
        .collect()
}

/// Replaces every `{{id}}` of a declared question with the answer value, or
/// the literal "Nicht angegeben" when the answer is missing. `{{...}}`
/// tokens that match no declared question are left verbatim.
pub fn fill_template(template: &PromptTemplate, answers: &BTreeMap<String, String>) -> String {
    let mut filled = template.prompt_template.clone();
    for question in &template.questions {
        let token = format!("{{{{{}}}}}", question.id);
        let value = answers
            .get(&question.id)
            .map(String::as_str)
            .unwrap_or(UNANSWERED);
        filled = filled.replace(&token, value);
    }
    filled
}
