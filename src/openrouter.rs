use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::{BotError, Result};
use crate::types::MessageRole;

const OPENROUTER_API_URL: &str = "https://openrouter.ai/api/v1/chat/completions";

// Replies are split into 2000 character Discord messages downstream,
// so this only caps cost. Roughly 1 token ≈ 4 characters, 1024 tokens
// stays within three messages.
const MAX_TOKENS: u32 = 1024;

#[derive(Debug, Serialize)]
struct OpenRouterRequest<'a> {
    model: &'a str,
    messages: Vec<Message>,
    max_tokens: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct Message {
    pub role: MessageRole,
    pub content: Option<String>,
}

impl Message {
    #[must_use]
    pub fn new(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: Some(content.into()),
        }
    }
}

#[derive(Debug, Deserialize)]
struct OpenRouterResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ReplyMessage,
}

/// Only the text of the reply matters; its role is ignored.
#[derive(Debug, Deserialize)]
struct ReplyMessage {
    #[serde(default)]
    content: Option<String>,
}

pub struct OpenRouterClient {
    api_key: String,
    client: reqwest::Client,
    model: String,
    endpoint: String,
}

impl OpenRouterClient {
    #[must_use]
    pub fn new(api_key: String, model: String) -> Self {
        Self::with_endpoint(api_key, model, OPENROUTER_API_URL.to_string())
    }

    /// Build a client that talks to a chat-completions compatible endpoint
    /// other than the public `OpenRouter` one.
    #[must_use]
    pub fn with_endpoint(api_key: String, model: String, endpoint: String) -> Self {
        Self {
            api_key,
            client: reqwest::Client::new(),
            model,
            endpoint,
        }
    }

    /// Send a single chat completion request and return the reply text.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, a non-success status, or a
    /// response without choices.
    pub async fn chat(&self, messages: Vec<Message>) -> Result<String> {
        debug!(
            "Sending request to OpenRouter API with {} messages",
            messages.len()
        );

        let request = OpenRouterRequest {
            model: &self.model,
            messages,
            max_tokens: MAX_TOKENS,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let message = response
                .text()
                .await
                .unwrap_or_else(|e| format!("Failed to read error response: {e}"));
            return Err(BotError::OpenRouterApi { status, message });
        }

        let api_response: OpenRouterResponse = response.json().await?;

        let reply = api_response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| BotError::OpenRouterResponse("No choices in response".to_string()))?
            .message
            .content
            .unwrap_or_default();

        debug!("Received response from OpenRouter API ({} bytes)", reply.len());
        Ok(reply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reply_role_is_ignored() {
        let body = r#"{"choices":[{"message":{"role":"assistant","content":"hi"}},{"message":{"role":"tool"}}]}"#;
        let response: OpenRouterResponse = serde_json::from_str(body).expect("decode");
        assert_eq!(response.choices[0].message.content.as_deref(), Some("hi"));
        assert_eq!(response.choices[1].message.content, None);
    }

    #[test]
    fn request_roles_serialize_lowercase() {
        let message = Message::new(MessageRole::System, "persona");
        let value = serde_json::to_value(&message).expect("encode");
        assert_eq!(value["role"], "system");
        assert_eq!(value["content"], "persona");
    }
}
