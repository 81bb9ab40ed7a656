//! Google Gemini adapter for the [`GenerationClient`] contract.
//!
//! Talks to the Generative Language REST API
//! (`models/{model}:generateContent`). The adapter owns the only reliability
//! handling in the generation path: a per-request timeout and a bounded
//! retry with exponential backoff on transport errors, 429 and 5xx. Retries
//! happen entirely inside this client, before any caller persistence.

use std::env;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tokio::time::sleep;
use tracing::{debug, warn};

use super::{ChatTurn, GenerationClient};
use crate::errors::AppError;

const GEMINI_API_KEY_ENV: &str = "GEMINI_API_KEY";
const GEMINI_MODEL_ENV: &str = "GEMINI_MODEL";
const DEFAULT_MODEL: &str = "gemini-1.5-flash";
const API_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_MAX_RETRIES: u32 = 2;
const INITIAL_BACKOFF_MS: u64 = 250;

/// Gemini client configuration.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    pub timeout: Duration,
    pub max_retries: u32,
}

impl GeminiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            base_url: API_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }

    /// Read configuration from `GEMINI_API_KEY` and `GEMINI_MODEL`.
    pub fn from_env() -> Result<Self, AppError> {
        let api_key = env::var(GEMINI_API_KEY_ENV).map_err(|_| {
            AppError::Config(format!("{GEMINI_API_KEY_ENV} environment variable not set"))
        })?;
        let mut config = Self::new(api_key);
        if let Ok(model) = env::var(GEMINI_MODEL_ENV) {
            config.model = model;
        }
        Ok(config)
    }
}

// ============================================================================
// API request/response types
// ============================================================================

#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

impl Content {
    fn user(text: &str) -> Self {
        Self {
            role: Some("user".to_string()),
            parts: vec![Part {
                text: Some(text.to_string()),
            }],
        }
    }

    fn from_turn(turn: &ChatTurn) -> Self {
        Self {
            role: Some(turn.role.as_str().to_string()),
            parts: vec![Part {
                text: Some(turn.text.clone()),
            }],
        }
    }
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Option<Vec<Candidate>>,
    #[serde(default)]
    error: Option<ApiErrorBody>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// Extract the first candidate's first content part as plain text.
fn extract_text(response: GenerateContentResponse) -> Result<String, AppError> {
    response
        .candidates
        .and_then(|candidates| candidates.into_iter().next())
        .and_then(|candidate| candidate.content)
        .and_then(|content| content.parts.into_iter().next())
        .and_then(|part| part.text)
        .ok_or_else(|| AppError::Generation("no text in generation response".to_string()))
}

fn api_error_message(body: &str) -> String {
    #[derive(Deserialize)]
    struct ErrorEnvelope {
        error: Option<ApiErrorBody>,
    }

    serde_json::from_str::<ErrorEnvelope>(body)
        .ok()
        .and_then(|envelope| envelope.error)
        .map_or_else(|| body.to_string(), |e| e.message)
}

/// One attempt either failed in a way worth retrying (transport, 429, 5xx)
/// or failed terminally.
enum RequestFailure {
    Retryable(String),
    Fatal(AppError),
}

// ============================================================================
// Client
// ============================================================================

/// Gemini implementation of [`GenerationClient`].
pub struct GeminiClient {
    config: GeminiConfig,
    client: Client,
}

impl GeminiClient {
    pub fn new(config: GeminiConfig) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| AppError::Config(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { config, client })
    }

    pub fn from_env() -> Result<Self, AppError> {
        Self::new(GeminiConfig::from_env()?)
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent?key={}",
            self.config.base_url, self.config.model, self.config.api_key
        )
    }

    async fn generate(&self, contents: Vec<Content>) -> Result<String, AppError> {
        let request = GenerateContentRequest { contents };
        let mut backoff_ms = INITIAL_BACKOFF_MS;
        let mut attempt = 0;

        loop {
            match self.dispatch(&request).await {
                Ok(text) => return Ok(text),
                Err(RequestFailure::Fatal(err)) => return Err(err),
                Err(RequestFailure::Retryable(reason)) => {
                    if attempt >= self.config.max_retries {
                        return Err(AppError::Generation(reason));
                    }
                    attempt += 1;
                    warn!(attempt, "generation request failed, retrying: {reason}");
                    sleep(Duration::from_millis(backoff_ms)).await;
                    backoff_ms *= 2;
                }
            }
        }
    }

    async fn dispatch(&self, request: &GenerateContentRequest) -> Result<String, RequestFailure> {
        let response = self
            .client
            .post(self.endpoint())
            .json(request)
            .send()
            .await
            .map_err(|e| {
                RequestFailure::Retryable(format!("request to generation backend failed: {e}"))
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            RequestFailure::Retryable(format!("failed to read generation response: {e}"))
        })?;

        if status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error() {
            return Err(RequestFailure::Retryable(format!(
                "generation backend returned {status}: {}",
                api_error_message(&body)
            )));
        }
        if !status.is_success() {
            return Err(RequestFailure::Fatal(AppError::Generation(format!(
                "generation backend returned {status}: {}",
                api_error_message(&body)
            ))));
        }

        let parsed: GenerateContentResponse = serde_json::from_str(&body).map_err(|e| {
            RequestFailure::Fatal(AppError::Generation(format!(
                "malformed generation response: {e}"
            )))
        })?;
        if let Some(error) = parsed.error {
            return Err(RequestFailure::Fatal(AppError::Generation(error.message)));
        }

        extract_text(parsed).map_err(RequestFailure::Fatal)
    }
}

#[async_trait]
impl GenerationClient for GeminiClient {
    async fn complete(&self, prompt: &str) -> Result<String, AppError> {
        debug!("sending single-turn generation request");
        self.generate(vec![Content::user(prompt)]).await
    }

    async fn complete_with_history(
        &self,
        turns: &[ChatTurn],
        final_prompt: &str,
    ) -> Result<String, AppError> {
        debug!(history_turns = turns.len(), "sending conversational generation request");
        let mut contents: Vec<Content> = turns.iter().map(Content::from_turn).collect();
        contents.push(Content::user(final_prompt));
        self.generate(contents).await
    }
}
