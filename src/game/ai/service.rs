//! Move-generation service seam
//!
//! [`MoveService`] is the only way the crate talks to a language model. The
//! production implementation speaks the OpenAI-compatible chat-completions
//! protocol; tests substitute scripted doubles.

use super::prompts::ServiceRequest;
use crate::core::resources::ServiceSettings;
use crate::game::error::ServiceError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// A black box that turns a request into free-form text
#[async_trait]
pub trait MoveService: Send + Sync {
    /// Send one request and return the trimmed response text
    async fn complete(&self, request: &ServiceRequest) -> Result<String, ServiceError>;
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Debug, Deserialize)]
struct ChatReply {
    content: Option<String>,
}

/// Chat-completions client
///
/// The API key is resolved when the service is built. A missing key is not an
/// error until the first request, so a game can start and report the problem
/// through the usual error channel.
#[derive(Debug, Clone)]
pub struct ChatCompletionService {
    client: reqwest::Client,
    endpoint: String,
    model: String,
    api_key: Option<String>,
    api_key_env: String,
}

impl ChatCompletionService {
    pub fn new(
        endpoint: impl Into<String>,
        model: impl Into<String>,
        api_key: Option<String>,
        api_key_env: impl Into<String>,
    ) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
            model: model.into(),
            api_key: api_key.filter(|key| !key.trim().is_empty()),
            api_key_env: api_key_env.into(),
        }
    }

    /// Build from settings, reading the key from the configured variable
    pub fn from_settings(settings: &ServiceSettings) -> Self {
        let api_key = std::env::var(&settings.api_key_env).ok();
        if api_key.is_none() {
            warn!(
                "[AI] {} is not set; opponent moves will fail until it is configured",
                settings.api_key_env
            );
        }
        Self::new(
            settings.endpoint.clone(),
            settings.model.clone(),
            api_key,
            settings.api_key_env.clone(),
        )
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl MoveService for ChatCompletionService {
    async fn complete(&self, request: &ServiceRequest) -> Result<String, ServiceError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| ServiceError::MissingCredential {
                var: self.api_key_env.clone(),
            })?;

        let body = ChatRequest {
            model: &self.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: &request.system,
                },
                ChatMessage {
                    role: "user",
                    content: &request.instruction,
                },
            ],
            temperature: request.temperature,
            max_tokens: request.max_tokens,
        };

        debug!("[AI] POST {} (model {})", self.endpoint, self.model);
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ServiceError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let reply: ChatResponse = response.json().await?;
        Ok(reply
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|content| content.trim().to_string())
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> ServiceRequest {
        ServiceRequest {
            system: "system".to_string(),
            instruction: "instruction".to_string(),
            temperature: 0.5,
            max_tokens: 50,
        }
    }

    #[tokio::test]
    async fn test_missing_key_fails_before_any_request() {
        //! An unreachable endpoint proves no connection is attempted
        let service = ChatCompletionService::new(
            "http://127.0.0.1:9/never",
            "gpt-4o-mini",
            None,
            "LLMCHESS_TEST_KEY",
        );
        match service.complete(&request()).await {
            Err(ServiceError::MissingCredential { var }) => assert_eq!(var, "LLMCHESS_TEST_KEY"),
            other => panic!("Expected MissingCredential, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_blank_key_counts_as_missing() {
        let service = ChatCompletionService::new(
            "http://127.0.0.1:9/never",
            "gpt-4o-mini",
            Some("   ".to_string()),
            "OPENAI_API_KEY",
        );
        assert!(matches!(
            service.complete(&request()).await,
            Err(ServiceError::MissingCredential { .. })
        ));
    }

    #[test]
    fn test_chat_request_shape() {
        let req = request();
        let body = ChatRequest {
            model: "gpt-4o-mini",
            messages: [
                ChatMessage {
                    role: "system",
                    content: &req.system,
                },
                ChatMessage {
                    role: "user",
                    content: &req.instruction,
                },
            ],
            temperature: req.temperature,
            max_tokens: req.max_tokens,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["model"], "gpt-4o-mini");
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][1]["content"], "instruction");
        assert_eq!(json["max_tokens"], 50);
    }

    #[test]
    fn test_chat_response_without_content() {
        let reply: ChatResponse =
            serde_json::from_str(r#"{"choices":[{"message":{"content":null}}]}"#).unwrap();
        assert!(reply.choices[0].message.content.is_none());

        let empty: ChatResponse = serde_json::from_str("{}").unwrap();
        assert!(empty.choices.is_empty());
    }
}
