//! Chat Completions wire format.
//!
//! Request: `{ model, messages: [system, user], temperature }`.
//! Response: `choices[0].message.content`.

use serde::{Deserialize, Serialize};

use scribe_types::{PromptPair, Settings};

use crate::CompletionError;

pub const CHAT_COMPLETIONS_PATH: &str = "/v1/chat/completions";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
}

#[derive(Debug, Serialize)]
pub struct ChatMessage<'a> {
    pub role: Role,
    pub content: &'a str,
}

#[derive(Debug, Serialize)]
pub struct ChatRequest<'a> {
    pub model: &'a str,
    pub messages: [ChatMessage<'a>; 2],
    pub temperature: f64,
}

impl<'a> ChatRequest<'a> {
    /// System instruction first, then the user instruction.
    #[must_use]
    pub fn new(settings: &'a Settings, prompt: &'a PromptPair) -> Self {
        Self {
            model: settings.model.as_str(),
            messages: [
                ChatMessage {
                    role: Role::System,
                    content: prompt.system(),
                },
                ChatMessage {
                    role: Role::User,
                    content: prompt.user(),
                },
            ],
            temperature: settings.temperature.value(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Option<ChoiceMessage>,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// Pull the generated text out of a successful response body, trimmed.
pub fn parse_completion(body: &str) -> Result<String, CompletionError> {
    let response: ChatResponse =
        serde_json::from_str(body).map_err(|e| CompletionError::Decode(e.to_string()))?;
    let choice = response
        .choices
        .into_iter()
        .next()
        .ok_or(CompletionError::EmptyChoices)?;
    let content = choice
        .message
        .and_then(|message| message.content)
        .ok_or_else(|| CompletionError::Decode("choice has no message content".to_string()))?;
    Ok(content.trim().to_string())
}

/// Provider error message from an error body, if it has the usual envelope.
#[must_use]
pub fn parse_error_message(body: &str) -> Option<String> {
    serde_json::from_str::<ErrorEnvelope>(body)
        .ok()
        .and_then(|envelope| envelope.error.message)
        .filter(|message| !message.trim().is_empty())
}
