use albo_core::types::AgentId;

/// Static description of a financial role: what it is responsible for, which
/// categories it handles, which labeled details the analysis prompt asks the
/// model to extract, and role-specific extra instructions.
///
/// Loaded once, read-only for the process lifetime.
#[derive(Debug)]
pub struct AgentProfile {
    pub id: AgentId,
    pub display_name: &'static str,
    pub responsibilities: &'static str,
    pub categories: &'static [&'static str],
    /// Ordered: the parser walks these labels when decomposing the
    /// ERKANNTE DETAILS section.
    pub detail_fields: &'static [&'static str],
    pub extra_instructions: &'static str,
}

const PROFILES: [AgentProfile; 6] = [
    AgentProfile {
        id: AgentId::Kreditor,
        display_name: "Kreditorenbuchhalter",
        responsibilities: "Prüfung und Verbuchung von Eingangsrechnungen, Pflege der \
            Lieferantenstammdaten, Überwachung von Zahlläufen und Skontofristen.",
        categories: &["Rechnung", "Gutschrift", "Lieferantenanfrage", "Zahllauf"],
        detail_fields: &[
            "Rechnungsnummer",
            "Betrag",
            "Fälligkeitsdatum",
            "Lieferant",
            "Skonto",
        ],
        extra_instructions: "Achte besonders auf Skontofristen und weise auf fehlende \
            Bestellnummern hin.",
    },
    AgentProfile {
        id: AgentId::Debitor,
        display_name: "Debitorenbuchhalter",
        responsibilities: "Überwachung offener Forderungen, Mahnwesen, Klärung von \
            Zahlungseingängen und Pflege der Kundenkonten.",
        categories: &["Mahnung", "Zahlungseingang", "Forderung", "Kundenanfrage"],
        detail_fields: &[
            "Kundennummer",
            "Rechnungsnummer",
            "Betrag",
            "Mahnstufe",
            "Zahlungsziel",
        ],
        extra_instructions: "Nenne bei Mahnungen immer die Mahnstufe und das neue \
            Zahlungsziel.",
    },
    AgentProfile {
        id: AgentId::Controller,
        display_name: "Controller",
        responsibilities: "Budgetplanung, Forecasts, Abweichungsanalysen und \
            KPI-Reporting für das Management.",
        categories: &["Budget", "Forecast", "Reporting", "Abweichungsanalyse"],
        detail_fields: &["Kostenstelle", "Zeitraum", "Betrag", "Abweichung"],
        extra_instructions: "Quantifiziere Abweichungen wo möglich in Prozent und in \
            absoluten Werten.",
    },
    AgentProfile {
        id: AgentId::Treasury,
        display_name: "Treasury & Strategische Finanzen",
        responsibilities: "Liquiditätssteuerung, Finanzierungen, Bankbeziehungen sowie \
            Vorbereitung strategischer Entscheidungen für Vorstand und Investoren.",
        categories: &["Liquidität", "Finanzierung", "Strategie", "Investor Relations"],
        detail_fields: &["Bank", "Betrag", "Laufzeit", "Zinssatz"],
        extra_instructions: "Kennzeichne Vorgänge mit Vorstandsrelevanz ausdrücklich.",
    },
    AgentProfile {
        id: AgentId::MergersAcquisitions,
        display_name: "M&A-Spezialist",
        responsibilities: "Begleitung von Unternehmenskäufen und -verkäufen, Due \
            Diligence und Bewertung von Zielunternehmen.",
        categories: &["Due Diligence", "Bewertung", "Transaktion"],
        detail_fields: &["Zielunternehmen", "Transaktionsvolumen", "Phase", "Frist"],
        extra_instructions: "Behandle alle Informationen als streng vertraulich.",
    },
    AgentProfile {
        id: AgentId::Anlagen,
        display_name: "Anlagenbuchhalter",
        responsibilities: "Aktivierung und Abschreibung von Anlagegütern, \
            Anlageninventur und Pflege des Anlagenspiegels.",
        categories: &["Aktivierung", "Abschreibung", "Inventur"],
        detail_fields: &[
            "Anlagennummer",
            "Anschaffungswert",
            "Nutzungsdauer",
            "Standort",
        ],
        extra_instructions: "Prüfe, ob die Aktivierungsgrenze überschritten ist.",
    },
];

pub fn profile(id: AgentId) -> &'static AgentProfile {
    PROFILES
        .iter()
        .find(|p| p.id == id)
        .expect("every AgentId has a profile")
}

pub fn all_profiles() -> &'static [AgentProfile] {
    &PROFILES
}
