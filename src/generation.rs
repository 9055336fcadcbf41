//! Dispatching persona-framed questions to the text-generation backend.

use std::fmt;
use std::future::Future;

use log::{debug, warn};
use reqwest::StatusCode;

use crate::error::{BotError, Result};
use crate::openrouter::{Message, OpenRouterClient};
use crate::types::MessageRole;

/// One question for the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub persona_prompt: String,
    pub author_name: String,
    pub query: String,
}

impl GenerationRequest {
    /// The system and user turns sent to the backend.
    #[must_use]
    pub fn messages(&self) -> Vec<Message> {
        vec![
            Message::new(MessageRole::System, self.persona_prompt.clone()),
            Message::new(
                MessageRole::User,
                format!("{} asks: {}", self.author_name, self.query),
            ),
        ]
    }
}

/// Why a generation attempt failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The backend could not be reached or the transfer broke off.
    Unavailable,
    /// The backend rejected our credentials.
    Authentication,
    /// The backend answered, but with an error or an unusable body.
    Backend,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FailureKind::Unavailable => "backend unavailable",
            FailureKind::Authentication => "backend authentication failed",
            FailureKind::Backend => "backend error",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationOutcome {
    Success(String),
    Failure { kind: FailureKind, detail: String },
}

impl From<BotError> for GenerationOutcome {
    fn from(error: BotError) -> Self {
        let kind = match &error {
            BotError::OpenRouterApi { status, .. }
                if matches!(*status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN) =>
            {
                FailureKind::Authentication
            }
            BotError::Reqwest(e) if !e.is_decode() && !e.is_status() => FailureKind::Unavailable,
            _ => FailureKind::Backend,
        };
        GenerationOutcome::Failure {
            kind,
            detail: error.to_string(),
        }
    }
}

/// A text-generation service answering one request at a time.
pub trait GenerationBackend: Send + Sync {
    fn complete(&self, request: &GenerationRequest) -> impl Future<Output = Result<String>> + Send;
}

impl GenerationBackend for OpenRouterClient {
    async fn complete(&self, request: &GenerationRequest) -> Result<String> {
        self.chat(request.messages()).await
    }
}

/// Ask the backend exactly once. Errors never escape; they come back as
/// [`GenerationOutcome::Failure`].
pub async fn generate<B: GenerationBackend>(
    backend: &B,
    request: &GenerationRequest,
) -> GenerationOutcome {
    debug!(
        "Dispatching generation request for {} ({} chars)",
        request.author_name,
        request.query.chars().count()
    );

    match backend.complete(request).await {
        Ok(text) => GenerationOutcome::Success(text),
        Err(e) => {
            warn!("Generation request failed: {e}");
            e.into()
        }
    }
}
