//! Per-agent reply drafts for the Outlook compose surface. Static German
//! templates; roles without a dedicated template fall back to the
//! Controller wording.

use albo_core::types::{AgentId, DraftReply, EmailMessage};
use chrono::Utc;

fn template_body(agent: AgentId) -> &'static str {
    match agent {
        AgentId::Kreditor => {
            "Sehr geehrte Damen und Herren,\n\n\
             vielen Dank für die Übersendung der Rechnung.\n\
             Die Rechnung wird geprüft und nach Freigabe zur Zahlung angewiesen.\n\n\
             Mit freundlichen Grüßen\n\
             Kreditorenbuchhaltung\n\
             ALBO Finance Team"
        }
        AgentId::Debitor => {
            "Sehr geehrte Damen und Herren,\n\n\
             wir haben Ihre Zahlungserinnerung erhalten.\n\
             Die Zahlung wird umgehend veranlasst.\n\n\
             Mit freundlichen Grüßen\n\
             Debitorenbuchhaltung\n\
             ALBO Finance Team"
        }
        _ => {
            "Sehr geehrte Damen und Herren,\n\n\
             vielen Dank für Ihre Nachricht.\n\
             Ihr Anliegen wurde an unser Controlling weitergeleitet.\n\n\
             Mit freundlichen Grüßen\n\
             Controlling\n\
             ALBO Finance Team"
        }
    }
}

pub fn draft_reply(email: &EmailMessage, agent: AgentId) -> DraftReply {
    DraftReply {
        to: email.from.clone(),
        subject: format!("RE: {}", email.subject),
        body: template_body(agent).to_string(),
        generated_by: agent,
        timestamp: Utc::now(),
    }
}
