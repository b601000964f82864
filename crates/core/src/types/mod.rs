use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Inbound email as delivered by the Outlook add-in. Immutable input,
/// never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailMessage {
    pub subject: String,
    pub from: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
    #[serde(default)]
    pub body: String,
}

impl EmailMessage {
    /// Subject and body joined the way the heuristics expect them.
    pub fn combined_text(&self) -> String {
        format!("{} {}", self.subject, self.body)
    }
}

/// The fixed set of financial roles. Determines prompt framing, expected
/// detail fields and draft templates.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum_macros::Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum AgentId {
    Kreditor,
    Debitor,
    Controller,
    Treasury,
    MergersAcquisitions,
    Anlagen,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum_macros::Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Category {
    Invoice,
    Dunning,
    Quote,
    General,
}

impl Category {
    pub fn as_german(&self) -> &'static str {
        match self {
            Category::Invoice => "Rechnung",
            Category::Dunning => "Mahnung",
            Category::Quote => "Angebot",
            Category::General => "Allgemein",
        }
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum_macros::Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    pub fn as_german(&self) -> &'static str {
        match self {
            Priority::High => "Hoch",
            Priority::Medium => "Mittel",
            Priority::Low => "Niedrig",
        }
    }

    /// Closed vocabulary: anything outside Hoch/Mittel/Niedrig is rejected.
    pub fn from_german(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "hoch" => Some(Priority::High),
            "mittel" => Some(Priority::Medium),
            "niedrig" => Some(Priority::Low),
            _ => None,
        }
    }
}

/// Keyword-based classification, produced without any AI call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassificationResult {
    pub category: Category,
    pub priority: Priority,
    /// Canonical unit 0.0..=1.0 on every path.
    pub confidence: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<String>,
    pub suggested_action: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentSuggestion {
    pub agent: AgentId,
    pub confidence: f32,
    pub reasoning: String,
}

/// Typed record extracted from an AI completion that follows the
/// section-header contract. `full_analysis` always carries the verbatim
/// completion text so the record can be re-parsed without a second AI call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StructuredAnalysis {
    pub summary: String,
    pub extracted_details: BTreeMap<String, String>,
    pub action_items: Vec<String>,
    pub next_steps: String,
    pub categories: Vec<String>,
    pub priority: Priority,
    pub estimated_time: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sap_relevant: Option<bool>,
    pub full_analysis: String,
}

impl Default for StructuredAnalysis {
    fn default() -> Self {
        Self {
            summary: String::new(),
            extracted_details: BTreeMap::new(),
            action_items: Vec::new(),
            next_steps: String::new(),
            categories: Vec::new(),
            priority: Priority::Medium,
            estimated_time: "30 Minuten".to_string(),
            sap_relevant: None,
            full_analysis: String::new(),
        }
    }
}

/// Free-text completion plus a shallow format report, returned by the
/// execute-prompt path where no section contract applies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionResult {
    pub result: String,
    pub formatting: FormatReport,
}

/// What kind of structure a free-text completion carries. The dashboard
/// uses this to pick a renderer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormatReport {
    pub has_lists: bool,
    pub has_numbers: bool,
    pub has_headers: bool,
    pub has_tables: bool,
    pub has_code: bool,
    pub sections: Vec<String>,
}

/// How the analysis in an envelope was produced. The front-end branches
/// on this tag.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum_macros::Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Source {
    Openai,
    Mock,
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnalysisBody {
    Structured(StructuredAnalysis),
    Classification(ClassificationResult),
    Completion(CompletionResult),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseMetadata {
    pub agent: AgentId,
    pub model: String,
    pub request_id: Uuid,
    pub tokens_used: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt_length: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_length: Option<usize>,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendations {
    pub suggested_prompts: Vec<String>,
    pub automation_possible: bool,
    pub sap_relevant: bool,
}

/// Outer contract returned to the caller. Constructed per request, never
/// cached. Errors are carried as data (`success: false` plus guidance
/// text), never as transport failures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseEnvelope {
    pub success: bool,
    pub source: Source,
    pub analysis: AnalysisBody,
    pub metadata: ResponseMetadata,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<AgentSuggestion>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recommendations: Option<Recommendations>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionType {
    Text,
    Number,
    Select,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptQuestion {
    pub id: String,
    pub label: String,
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
}

/// Catalog entry: a reusable role prompt with `{{placeholder}}` tokens
/// that the questions' answers fill at request time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptTemplate {
    pub id: String,
    pub title: String,
    pub role: AgentId,
    pub category: String,
    pub complexity: String,
    pub estimated_time: String,
    pub description: String,
    pub tags: Vec<String>,
    pub questions: Vec<PromptQuestion>,
    pub prompt_template: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilledPrompt {
    pub prompt_id: String,
    pub filled_prompt: String,
}

/// Per-agent reply draft for the Outlook compose surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftReply {
    pub to: String,
    pub subject: String,
    pub body: String,
    pub generated_by: AgentId,
    pub timestamp: DateTime<Utc>,
}

// Request bodies, already deserialized by the (external) routing layer.

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeRequest {
    #[serde(alias = "emailContent")]
    pub email: EmailMessage,
    #[serde(default)]
    pub agent: Option<AgentId>,
    /// Collapses the old agent-detection handler variant into a flag.
    #[serde(default, alias = "needsAgentDetection")]
    pub detect_agent: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecuteRequest {
    pub prompt: String,
    #[serde(default)]
    pub context: Option<String>,
    #[serde(default, alias = "emailData")]
    pub email: Option<EmailMessage>,
    #[serde(default)]
    pub agent: Option<AgentId>,
    #[serde(default)]
    pub temperature: Option<f32>,
    #[serde(default)]
    pub max_tokens: Option<u32>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FillRequest {
    pub prompt_id: String,
    #[serde(default)]
    pub answers: BTreeMap<String, String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn priority_from_german_rejects_unknown_values() {
        assert_eq!(Priority::from_german("Hoch"), Some(Priority::High));
        assert_eq!(Priority::from_german("  mittel "), Some(Priority::Medium));
        assert_eq!(Priority::from_german("NIEDRIG"), Some(Priority::Low));
        assert_eq!(Priority::from_german("dringend"), None);
        assert_eq!(Priority::from_german(""), None);
    }

    #[test]
    fn analyze_request_accepts_legacy_field_names() {
        let json = r#"{
            "emailContent": {"subject": "Rechnung 4711", "from": "a@b.de", "body": ""},
            "needsAgentDetection": true
        }"#;
        let req: AnalyzeRequest = serde_json::from_str(json).unwrap();
        assert!(req.detect_agent);
        assert_eq!(req.email.subject, "Rechnung 4711");
        assert!(req.agent.is_none());
    }

    #[test]
    fn envelope_serializes_camel_case_and_drops_empty_options() {
        let envelope = ResponseEnvelope {
            success: true,
            source: Source::Mock,
            analysis: AnalysisBody::Classification(ClassificationResult {
                category: Category::Invoice,
                priority: Priority::Medium,
                confidence: 0.85,
                amount: None,
                suggested_action: "Rechnung prüfen".into(),
            }),
            metadata: ResponseMetadata {
                agent: AgentId::Kreditor,
                model: "mock".into(),
                request_id: Uuid::nil(),
                tokens_used: 0,
                prompt_length: None,
                response_length: None,
                timestamp: Utc::now(),
            },
            suggestion: None,
            recommendations: None,
            error: None,
        };
        let json = serde_json::to_value(&envelope).unwrap();
        assert_eq!(json["source"], "mock");
        assert_eq!(json["analysis"]["suggestedAction"], "Rechnung prüfen");
        assert!(json.get("error").is_none());
        assert!(json["analysis"].get("amount").is_none());
    }
}
