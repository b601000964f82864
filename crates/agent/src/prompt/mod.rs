//! System/user prompt construction. The analysis prompt reproduces the
//! section-header vocabulary exactly as the parser expects it; a completion
//! that ignores the contract degrades to a full-analysis-only record, so the
//! header block below must stay in lockstep with `parser::SECTION_HEADERS`.

use crate::parser::SECTION_HEADERS;
use crate::registry;
use albo_core::types::{AgentId, EmailMessage, ExecuteRequest};
use std::fmt::Write;

#[derive(Debug, Clone)]
pub struct BuiltPrompt {
    pub system_prompt: String,
    pub user_message: String,
}

const BASE_SYSTEM_PROMPT: &str = "\
Du bist ein hochspezialisierter {role} AI-Agent für das deutsche Finanzwesen bei ALBO Solutions.

Deine Aufgaben:
- Präzise und professionelle Finanzanalysen
- Compliance mit deutschen Steuer- und Handelsgesetzen
- Klare, strukturierte Antworten
- Praktische, umsetzbare Empfehlungen

Antworte immer auf Deutsch und verwende deutsche Fachbegriffe.";

fn base_system_prompt(agent: AgentId) -> String {
    BASE_SYSTEM_PROMPT.replace("{role}", registry::profile(agent).display_name)
}

/// Role-specific analysis prompt: responsibilities, the agent's labeled
/// detail blanks, the strict eight-header output contract and the role's
/// extra instructions.
pub fn build_analysis_prompt(agent: AgentId, email: &EmailMessage) -> BuiltPrompt {
    let profile = registry::profile(agent);
    let mut system_prompt = base_system_prompt(agent);

    let _ = write!(
        system_prompt,
        "\n\nDeine Verantwortlichkeiten:\n{}\n\n\
         Analysiere die E-Mail und antworte AUSSCHLIESSLICH in folgendem Format \
         mit genau diesen Abschnittsüberschriften:\n",
        profile.responsibilities
    );

    let _ = write!(system_prompt, "\n{}:\n<kurze Zusammenfassung in zwei Sätzen>\n", SECTION_HEADERS[0]);

    let _ = write!(system_prompt, "\n{}:\n", SECTION_HEADERS[1]);
    for field in profile.detail_fields {
        let _ = writeln!(system_prompt, "- {field}: <Wert oder unbekannt>");
    }

    let _ = write!(
        system_prompt,
        "\n{}:\n1. <erste Maßnahme>\n2. <weitere Maßnahmen, maximal fünf>\n",
        SECTION_HEADERS[2]
    );
    let _ = write!(system_prompt, "\n{}:\n<empfohlenes Vorgehen>\n", SECTION_HEADERS[3]);
    let _ = write!(
        system_prompt,
        "\n{}:\n<passende Kategorien aus: {}, kommagetrennt>\n",
        SECTION_HEADERS[4],
        profile.categories.join(", ")
    );
    let _ = write!(system_prompt, "\n{}:\n<Hoch, Mittel oder Niedrig>\n", SECTION_HEADERS[5]);
    let _ = write!(system_prompt, "\n{}:\n<z.B. 30 Minuten>\n", SECTION_HEADERS[6]);
    let _ = write!(system_prompt, "\n{}:\n<Ja oder Nein>\n", SECTION_HEADERS[7]);

    let _ = write!(system_prompt, "\n{}", profile.extra_instructions);

    BuiltPrompt {
        system_prompt,
        user_message: email_context(email),
    }
}

fn email_context(email: &EmailMessage) -> String {
    let body = if email.body.is_empty() {
        "Kein Inhalt"
    } else {
        email.body.as_str()
    };
    format!(
        "E-Mail von: {}\nBetreff: {}\nInhalt: {}",
        email.from, email.subject, body
    )
}

/// Prompt for the free-form execute path. Email context is appended to the
/// system prompt; a bare context string is stitched into the user message.
pub fn build_execute_prompt(request: &ExecuteRequest) -> BuiltPrompt {
    let agent = request.agent.unwrap_or(AgentId::Controller);
    let mut system_prompt = base_system_prompt(agent);
    let user_message;

    if let Some(email) = &request.email {
        let _ = write!(
            system_prompt,
            "\n\nKontext: Du bearbeitest gerade eine E-Mail mit folgenden Details:\n\
             - Betreff: {}\n- Von: {}\n- Inhalt: {}",
            email.subject, email.from, email.body
        );
        user_message = format!("Im Kontext der oben genannten E-Mail: {}", request.prompt);
    } else if let Some(context) = &request.context {
        user_message = format!("Kontext: {context}\n\nAufgabe: {}", request.prompt);
    } else {
        user_message = request.prompt.clone();
    }

    BuiltPrompt {
        system_prompt,
        user_message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn email() -> EmailMessage {
        EmailMessage {
            subject: "Rechnung RE-2024-017".into(),
            from: "buchhaltung@meier.de".into(),
            to: None,
            body: "Anbei unsere Rechnung über 1.250,00 EUR.".into(),
        }
    }

    #[test]
    fn analysis_prompt_contains_every_section_header() {
        let built = build_analysis_prompt(AgentId::Kreditor, &email());
        for header in SECTION_HEADERS {
            assert!(
                built.system_prompt.contains(&format!("{header}:")),
                "missing header {header}"
            );
        }
    }

    #[test]
    fn analysis_prompt_embeds_role_and_detail_fields() {
        let built = build_analysis_prompt(AgentId::Kreditor, &email());
        assert!(built.system_prompt.contains("Kreditorenbuchhalter"));
        assert!(built.system_prompt.contains("- Rechnungsnummer: <Wert oder unbekannt>"));
        assert!(built.system_prompt.contains("Skontofristen"));
        assert!(built.user_message.contains("Betreff: Rechnung RE-2024-017"));
    }

    #[test]
    fn empty_body_becomes_kein_inhalt() {
        let mut mail = email();
        mail.body.clear();
        let built = build_analysis_prompt(AgentId::Controller, &mail);
        assert!(built.user_message.ends_with("Inhalt: Kein Inhalt"));
    }

    #[test]
    fn execute_prompt_with_email_prefixes_user_message() {
        let request = ExecuteRequest {
            prompt: "Fasse die Rechnung zusammen.".into(),
            context: None,
            email: Some(email()),
            agent: Some(AgentId::Kreditor),
            temperature: None,
            max_tokens: None,
        };
        let built = build_execute_prompt(&request);
        assert!(built.system_prompt.contains("- Betreff: Rechnung RE-2024-017"));
        assert!(built
            .user_message
            .starts_with("Im Kontext der oben genannten E-Mail:"));
    }

    #[test]
    fn execute_prompt_with_plain_context_stitches_user_message() {
        let request = ExecuteRequest {
            prompt: "Erstelle den Forecast.".into(),
            context: Some("Q3-Planung".into()),
            email: None,
            agent: None,
            temperature: None,
            max_tokens: None,
        };
        let built = build_execute_prompt(&request);
        assert_eq!(
            built.user_message,
            "Kontext: Q3-Planung\n\nAufgabe: Erstelle den Forecast."
        );
        // default role
        assert!(built.system_prompt.contains("Controller"));
    }
}
