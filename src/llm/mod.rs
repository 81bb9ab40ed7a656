//! Generation backend integration: the client contract, the Gemini adapter
//! and prompt construction.

mod gemini;
pub mod prompts;

pub use gemini::{GeminiClient, GeminiConfig};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::errors::AppError;

/// Side of a conversation turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnRole {
    User,
    Model,
}

impl TurnRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            TurnRole::User => "user",
            TurnRole::Model => "model",
        }
    }
}

/// A single turn in a generation conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: TurnRole,
    pub text: String,
}

impl ChatTurn {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: TurnRole::User,
            text: text.into(),
        }
    }

    pub fn model(text: impl Into<String>) -> Self {
        Self {
            role: TurnRole::Model,
            text: text.into(),
        }
    }
}

/// Single point of contact with the external generative backend.
///
/// Implementations return the first candidate's first content part as plain
/// text and surface every backend problem (unreachable service, empty
/// candidate list, candidate without text) as [`AppError::Generation`]. The
/// text itself is passed through unvalidated; downstream consumers parse the
/// requested JSON shape themselves.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GenerationClient: Send + Sync {
    /// Single-turn completion.
    async fn complete(&self, prompt: &str) -> Result<String, AppError>;

    /// Conversational completion seeded with `turns`, then `final_prompt`
    /// sent as the next user turn.
    async fn complete_with_history(
        &self,
        turns: &[ChatTurn],
        final_prompt: &str,
    ) -> Result<String, AppError>;
}
