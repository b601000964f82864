use crate::config::AiConfig;
use albo_core::error::{AlboError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

#[async_trait]
pub trait AiProvider: Send + Sync {
    async fn chat_completion(&self, request: ChatRequest) -> Result<ChatResponse>;
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    pub messages: Vec<Message>,
    pub temperature: f32,
    pub max_tokens: u32,
    // Optional: falls back to the provider's configured model
    pub model: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub role: String,
    pub content: String,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".into(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".into(),
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    pub content: String,
    pub usage: Usage,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// Chat-completions client for OpenAI and compatible endpoints. One outbound
/// call per invocation, hard timeout, every failure mode mapped to the error
/// taxonomy so the pipeline can turn it into envelope data.
#[derive(Debug)]
pub struct OpenAiProvider {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
    timeout: Duration,
}

impl OpenAiProvider {
    /// Fails with `NotConfigured` when the config carries no key; callers
    /// are expected to check `AiConfig::is_configured` first and degrade.
    pub fn new(config: &AiConfig) -> Result<Self> {
        let api_key = config.api_key.clone().ok_or(AlboError::NotConfigured)?;
        Ok(Self {
            client: reqwest::Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key,
            model: config.model.clone(),
            timeout: Duration::from_secs(config.timeout_secs),
        })
    }

    fn request_body(&self, request: &ChatRequest) -> serde_json::Value {
        let model = request.model.clone().unwrap_or_else(|| self.model.clone());
        serde_json::json!({
            "model": model,
            "messages": request.messages,
            "temperature": request.temperature,
            "max_tokens": request.max_tokens,
        })
    }
}

#[async_trait]
impl AiProvider for OpenAiProvider {
    async fn chat_completion(&self, request: ChatRequest) -> Result<ChatResponse> {
        let url = format!("{}/chat/completions", self.base_url);
        debug!(%url, "calling chat completion endpoint");

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .timeout(self.timeout)
            .json(&self.request_body(&request))
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    AlboError::Connection("Zeitüberschreitung beim OpenAI-Aufruf".into())
                } else {
                    AlboError::Connection(e.to_string())
                }
            })?;

        let status = response.status();
        match status.as_u16() {
            401 => return Err(AlboError::Unauthorized),
            429 => return Err(AlboError::RateLimited),
            _ if !status.is_success() => {
                let detail = response.text().await.unwrap_or_default();
                warn!(%status, "chat completion returned error status");
                return Err(AlboError::Connection(format!("HTTP {status}: {detail}")));
            }
            _ => {}
        }

        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| AlboError::Parse(e.to_string()))?;

        let content = body["choices"][0]["message"]["content"]
            .as_str()
            .ok_or_else(|| AlboError::Parse("Antwort enthält keinen Inhalt".into()))?
            .to_string();

        let prompt_tokens = body["usage"]["prompt_tokens"].as_u64().unwrap_or(0) as u32;
        let completion_tokens = body["usage"]["completion_tokens"].as_u64().unwrap_or(0) as u32;
        let total_tokens = body["usage"]["total_tokens"]
            .as_u64()
            .map(|t| t as u32)
            .unwrap_or(prompt_tokens + completion_tokens);

        Ok(ChatResponse {
            content,
            usage: Usage {
                prompt_tokens,
                completion_tokens,
                total_tokens,
            },
        })
    }
}

/// Deterministic provider for tests and offline runs: echoes a fixed
/// completion regardless of input.
pub struct MockProvider {
    pub content: String,
}

impl MockProvider {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
        }
    }
}

#[async_trait]
impl AiProvider for MockProvider {
    async fn chat_completion(&self, _request: ChatRequest) -> Result<ChatResponse> {
        Ok(ChatResponse {
            content: self.content.clone(),
            usage: Usage::default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider() -> OpenAiProvider {
        let config = AiConfig {
            api_key: Some("sk-test".into()),
            ..AiConfig::default()
        };
        OpenAiProvider::new(&config).unwrap()
    }

    #[test]
    fn new_without_key_is_not_configured() {
        let err = OpenAiProvider::new(&AiConfig::default()).unwrap_err();
        assert!(matches!(err, AlboError::NotConfigured));
    }

    #[test]
    fn request_body_uses_configured_model_as_fallback() {
        let request = ChatRequest {
            messages: vec![Message::system("a"), Message::user("b")],
            temperature: 0.3,
            max_tokens: 200,
            model: None,
        };
        let body = provider().request_body(&request);
        assert_eq!(body["model"], "gpt-4o-mini");
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["max_tokens"], 200);
    }

    #[test]
    fn request_body_prefers_explicit_model() {
        let request = ChatRequest {
            messages: vec![Message::user("b")],
            temperature: 0.7,
            max_tokens: 100,
            model: Some("gpt-3.5-turbo".into()),
        };
        let body = provider().request_body(&request);
        assert_eq!(body["model"], "gpt-3.5-turbo");
    }

    #[tokio::test]
    async fn mock_provider_is_deterministic() {
        let mock = MockProvider::new("ZUSAMMENFASSUNG:\nTest");
        let request = ChatRequest {
            messages: vec![Message::user("x")],
            temperature: 0.0,
            max_tokens: 10,
            model: None,
        };
        let first = mock.chat_completion(request.clone()).await.unwrap();
        let second = mock.chat_completion(request).await.unwrap();
        assert_eq!(first.content, second.content);
        assert_eq!(first.usage.total_tokens, 0);
    }
}
