use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::error::{AppError, Result};

const OPENAI_API_URL: &str = "https://api.openai.com/v1/chat/completions";

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

#[derive(Debug, Deserialize)]
pub struct ChatResponse {
    // Absent and empty choices are the same "nothing generated" case
    #[serde(default)]
    pub choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
pub struct ChatChoice {
    pub message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: Option<ApiErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
}

/// The single remote dependency: one chat-completion request per call,
/// authenticated with a bearer credential supplied by the caller.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    async fn complete(&self, api_key: &str, system: &str, prompt: &str) -> Result<ChatResponse>;
}

pub struct OpenAiClient {
    client: Client,
    model: String,
    max_tokens: u32,
    temperature: f32,
}

impl OpenAiClient {
    pub fn new(config: &Config) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .expect("Failed to create HTTP client");
        Self {
            client,
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
        }
    }
}

#[async_trait]
impl CompletionProvider for OpenAiClient {
    async fn complete(&self, api_key: &str, system: &str, prompt: &str) -> Result<ChatResponse> {
        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: system.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: prompt.to_string(),
                },
            ],
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        };

        let response = self
            .client
            .post(OPENAI_API_URL)
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<ApiErrorBody>()
                .await
                .ok()
                .and_then(|body| body.error)
                .map(|detail| detail.message)
                .unwrap_or_else(|| "Unknown error".to_string());
            return Err(AppError::OpenAiApi {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.json().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn response_missing_choices_field_parses_as_empty() {
        let response: ChatResponse = serde_json::from_str("{}").unwrap();
        assert!(response.choices.is_empty());
    }

    #[test]
    fn error_body_message_is_optional() {
        let body: ApiErrorBody = serde_json::from_str("{}").unwrap();
        assert!(body.error.is_none());

        let body: ApiErrorBody =
            serde_json::from_str(r#"{"error": {"message": "Incorrect API key"}}"#).unwrap();
        assert_eq!(body.error.unwrap().message, "Incorrect API key");
    }
}
