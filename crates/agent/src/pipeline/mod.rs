//! Request orchestration: heuristics, prompt construction, the one AI call,
//! parsing and envelope assembly. Every failure mode ends as envelope data;
//! the absence of a credential is the single condition that switches to
//! mock mode instead of an error.

pub mod draft;

use crate::{catalog, classify, parser, prompt, registry};
use albo_ai::config::AiConfig;
use albo_ai::provider::{AiProvider, ChatRequest, Message, OpenAiProvider};
use albo_core::error::{AlboError, Result};
use albo_core::types::{
    AgentId, AgentSuggestion, AnalysisBody, AnalyzeRequest, Category, ClassificationResult,
    CompletionResult, DraftReply, EmailMessage, ExecuteRequest, FillRequest, FilledPrompt,
    Recommendations, ResponseEnvelope, ResponseMetadata, Source, StructuredAnalysis,
};
use chrono::Utc;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

pub const MOCK_MODEL: &str = "mock";

const MOCK_EXECUTE_RESULT: &str = "⚠️ OpenAI API Key nicht konfiguriert. Dies ist eine \
    Mock-Antwort. Bitte OPENAI_API_KEY in der Umgebung hinterlegen.";

pub struct AnalysisPipeline {
    ai: Option<Arc<dyn AiProvider>>,
    config: AiConfig,
}

impl AnalysisPipeline {
    pub fn new(ai: Option<Arc<dyn AiProvider>>, config: AiConfig) -> Self {
        Self { ai, config }
    }

    /// Builds the OpenAI provider when a credential is present, otherwise a
    /// pipeline that serves deterministic mock envelopes.
    pub fn from_env() -> Self {
        let config = AiConfig::from_env();
        let ai = match OpenAiProvider::new(&config) {
            Ok(provider) => Some(Arc::new(provider) as Arc<dyn AiProvider>),
            Err(_) => {
                warn!("no OpenAI credential configured, running in mock mode");
                None
            }
        };
        Self::new(ai, config)
    }

    /// Full analysis path: classification always runs; the AI call only when
    /// configured. `detect_agent` replaces the old separate handler variant.
    pub async fn analyze_email(&self, request: &AnalyzeRequest) -> ResponseEnvelope {
        let suggestion = request
            .detect_agent
            .then(|| classify::suggest_agent_for(&request.email));
        let agent = request
            .agent
            .or(suggestion.as_ref().map(|s| s.agent))
            .unwrap_or(AgentId::Controller);
        let classification = classify::classify_email(&request.email);
        info!(
            agent = %agent,
            category = %classification.category,
            "analyzing email"
        );

        let Some(provider) = &self.ai else {
            return self.mock_envelope(agent, &request.email, classification, suggestion);
        };

        let built = prompt::build_analysis_prompt(agent, &request.email);
        let chat = ChatRequest {
            messages: vec![
                Message::system(built.system_prompt),
                Message::user(built.user_message),
            ],
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
            model: None,
        };

        match provider.chat_completion(chat).await {
            Ok(response) => {
                if !parser::has_known_header(&response.content) {
                    warn!("completion ignored the section contract, fields fall back to defaults");
                }
                let analysis = parser::parse(&response.content, agent);
                let recommendations =
                    recommendations(agent, &classification, analysis.sap_relevant);
                ResponseEnvelope {
                    success: true,
                    source: Source::Openai,
                    analysis: AnalysisBody::Structured(analysis),
                    metadata: self.metadata(
                        agent,
                        &self.config.model,
                        response.usage.total_tokens,
                        None,
                        None,
                    ),
                    suggestion,
                    recommendations: Some(recommendations),
                    error: None,
                }
            }
            Err(err) => {
                warn!(error = %err, "AI call failed, returning error envelope");
                ResponseEnvelope {
                    success: false,
                    source: Source::Error,
                    analysis: AnalysisBody::Classification(classification),
                    metadata: self.metadata(agent, &self.config.model, 0, None, None),
                    suggestion,
                    recommendations: None,
                    error: Some(guidance(&err)),
                }
            }
        }
    }

    /// Free-form prompt execution with optional email or context stitching.
    pub async fn execute_prompt(&self, request: &ExecuteRequest) -> ResponseEnvelope {
        let agent = request.agent.unwrap_or(AgentId::Controller);

        if request.prompt.trim().is_empty() {
            return ResponseEnvelope {
                success: false,
                source: Source::Error,
                analysis: completion_body("❌ Prompt is required"),
                metadata: self.metadata(agent, &self.config.model, 0, None, None),
                suggestion: None,
                recommendations: None,
                error: Some("Prompt is required".into()),
            };
        }

        let Some(provider) = &self.ai else {
            return ResponseEnvelope {
                success: true,
                source: Source::Mock,
                analysis: completion_body(MOCK_EXECUTE_RESULT),
                metadata: self.metadata(
                    agent,
                    MOCK_MODEL,
                    0,
                    Some(request.prompt.len()),
                    None,
                ),
                suggestion: None,
                recommendations: None,
                error: None,
            };
        };

        let built = prompt::build_execute_prompt(request);
        let chat = ChatRequest {
            messages: vec![
                Message::system(built.system_prompt),
                Message::user(built.user_message),
            ],
            temperature: request.temperature.unwrap_or(self.config.temperature),
            max_tokens: request.max_tokens.unwrap_or(self.config.max_tokens),
            model: None,
        };
        info!(agent = %agent, prompt_length = request.prompt.len(), "executing prompt");

        match provider.chat_completion(chat).await {
            Ok(response) => {
                let response_length = response.content.len();
                ResponseEnvelope {
                    success: true,
                    source: Source::Openai,
                    analysis: completion_body(&response.content),
                    metadata: self.metadata(
                        agent,
                        &self.config.model,
                        response.usage.total_tokens,
                        Some(request.prompt.len()),
                        Some(response_length),
                    ),
                    suggestion: None,
                    recommendations: None,
                    error: None,
                }
            }
            Err(err) => {
                warn!(error = %err, "prompt execution failed");
                let message = guidance(&err);
                ResponseEnvelope {
                    success: false,
                    source: Source::Error,
                    analysis: completion_body(&format!("❌ {message}")),
                    metadata: self.metadata(
                        agent,
                        &self.config.model,
                        0,
                        Some(request.prompt.len()),
                        None,
                    ),
                    suggestion: None,
                    recommendations: None,
                    error: Some(message),
                }
            }
        }
    }

    /// Keyword classification without any AI involvement.
    pub fn classify_email(&self, email: &EmailMessage) -> ClassificationResult {
        classify::classify_email(email)
    }

    pub fn suggest_agent(&self, email: &EmailMessage) -> AgentSuggestion {
        classify::suggest_agent_for(email)
    }

    pub fn draft_reply(&self, email: &EmailMessage, agent: AgentId) -> DraftReply {
        draft::draft_reply(email, agent)
    }

    /// Fills a catalog template; unknown ids are a validation error the
    /// router maps to a 404.
    pub fn fill_prompt(&self, request: &FillRequest) -> Result<FilledPrompt> {
        let template = catalog::find(&request.prompt_id).ok_or_else(|| {
            AlboError::Validation(format!("Prompt not found: {}", request.prompt_id))
        })?;
        Ok(FilledPrompt {
            prompt_id: template.id.clone(),
            filled_prompt: catalog::fill_template(template, &request.answers),
        })
    }

    fn mock_envelope(
        &self,
        agent: AgentId,
        email: &EmailMessage,
        classification: ClassificationResult,
        suggestion: Option<AgentSuggestion>,
    ) -> ResponseEnvelope {
        info!(agent = %agent, "serving mock analysis, no credential configured");
        let analysis = mock_analysis(agent, email, &classification);
        let recommendations = recommendations(agent, &classification, analysis.sap_relevant);
        ResponseEnvelope {
            success: true,
            source: Source::Mock,
            analysis: AnalysisBody::Structured(analysis),
            metadata: self.metadata(agent, MOCK_MODEL, 0, None, None),
            suggestion,
            recommendations: Some(recommendations),
            error: None,
        }
    }

    fn metadata(
        &self,
        agent: AgentId,
        model: &str,
        tokens_used: u32,
        prompt_length: Option<usize>,
        response_length: Option<usize>,
    ) -> ResponseMetadata {
        ResponseMetadata {
            agent,
            model: model.to_string(),
            request_id: Uuid::new_v4(),
            tokens_used,
            prompt_length,
            response_length,
            timestamp: Utc::now(),
        }
    }
}

fn completion_body(result: &str) -> AnalysisBody {
    AnalysisBody::Completion(CompletionResult {
        result: result.to_string(),
        formatting: parser::format::analyze_format(result),
    })
}

/// Deterministic placeholder analysis for mock mode, rendered through the
/// canonical header text so `full_analysis` stays re-parseable.
fn mock_analysis(
    agent: AgentId,
    email: &EmailMessage,
    classification: &ClassificationResult,
) -> StructuredAnalysis {
    let profile = registry::profile(agent);
    let mut analysis = StructuredAnalysis::default();
    analysis.summary = format!(
        "Mock-Analyse ({}): {} von {} erkannt, zur Bearbeitung vorgemerkt.",
        profile.display_name,
        classification.category.as_german(),
        email.from
    );
    if let Some(amount) = &classification.amount {
        analysis
            .extracted_details
            .insert("Betrag".to_string(), format!("{amount} EUR"));
    }
    analysis.action_items = vec![classification.suggested_action.clone()];
    analysis.next_steps =
        "E-Mail manuell prüfen, sobald der AI-Dienst konfiguriert ist.".to_string();
    analysis.categories = vec![classification.category.as_german().to_string()];
    analysis.priority = classification.priority;
    analysis.sap_relevant = Some(matches!(
        classification.category,
        Category::Invoice | Category::Dunning
    ));
    analysis.full_analysis = parser::render(&analysis);
    analysis
}

fn recommendations(
    agent: AgentId,
    classification: &ClassificationResult,
    sap_relevant: Option<bool>,
) -> Recommendations {
    let bookable = matches!(
        classification.category,
        Category::Invoice | Category::Dunning
    );
    Recommendations {
        suggested_prompts: catalog::template_ids_for(agent),
        automation_possible: bookable,
        sap_relevant: sap_relevant.unwrap_or(bookable),
    }
}

/// German guidance text for the caller, mirrors the HTTP status taxonomy of
/// the completion API.
fn guidance(err: &AlboError) -> String {
    match err {
        AlboError::Unauthorized => {
            "API Key ungültig: Bitte prüfen Sie den OpenAI API Key".to_string()
        }
        AlboError::RateLimited => {
            "Rate Limit erreicht: Zu viele Anfragen - bitte warten Sie einen Moment".to_string()
        }
        AlboError::Connection(_) => {
            "OpenAI Verbindungsfehler: Konnte keine Verbindung zu OpenAI herstellen".to_string()
        }
        AlboError::Parse(detail) => format!("Antwort unvollständig: {detail}"),
        other => format!("Fehler bei der Prompt-Ausführung: {other}"),
    }
}
