//! Core domain types for Scribe.
//!
//! This crate contains pure domain types with no IO, no async, and minimal dependencies.
//! Everything here can be used from any layer of the application, including the
//! prompt builder, which is a set of pure functions over these types.

mod prompts;
mod sanitize;
mod task;
pub mod ui;

pub use prompts::{
    PromptPair, explain, idea_generator, rewrite, sentiment_analysis, summarize,
};
pub use sanitize::sanitize_terminal_text;
pub use task::{AudienceLevel, IdeaCount, ModeKind, Task, Tone};

use thiserror::Error;

/// Model used when neither the settings file, the environment, nor the form
/// names one.
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";

/// Prefix that marks a displayed result as a failed completion call.
pub const LLM_ERROR_PREFIX: &str = "LLM error: ";

// ============================================================================
// API Key
// ============================================================================

/// Completion API key.
///
/// Note: `Debug` is manually implemented to redact the key value, preventing accidental
/// credential disclosure in logs or error messages. There is no `Serialize` impl.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    /// Parse a key from user or environment input. Blank input yields `None`.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ApiKey(<redacted>)")
    }
}

// ============================================================================
// Model Name
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("model name must not be empty")]
pub struct EmptyModelError;

/// Non-empty model identifier forwarded verbatim to the completion API.
///
/// No allow-list is applied: unknown identifiers are the provider's to reject.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelName(String);

impl ModelName {
    pub fn parse(raw: &str) -> Result<Self, EmptyModelError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(EmptyModelError);
        }
        Ok(Self(trimmed.to_string()))
    }

    #[must_use]
    pub fn default_model() -> Self {
        Self(DEFAULT_MODEL.to_string())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for ModelName {
    fn default() -> Self {
        Self::default_model()
    }
}

impl std::fmt::Display for ModelName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

// ============================================================================
// Temperature
// ============================================================================

/// Sampling temperature in `[0.0, 1.0]` with a fixed `0.1` step.
///
/// Stored as tenths so every representable value is exactly on the slider's
/// grid and the bounds cannot be exceeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Temperature(u8);

impl Temperature {
    pub const MIN: Self = Self(0);
    pub const MAX: Self = Self(10);
    pub const DEFAULT: Self = Self(7);

    /// Clamp `value` into range and snap it to the nearest step.
    /// Non-finite input falls back to the default.
    #[must_use]
    pub fn new(value: f64) -> Self {
        if !value.is_finite() {
            return Self::DEFAULT;
        }
        let tenths = (value.clamp(0.0, 1.0) * 10.0).round();
        Self(tenths as u8)
    }

    #[must_use]
    pub const fn tenths(self) -> u8 {
        self.0
    }

    #[must_use]
    pub fn value(self) -> f64 {
        f64::from(self.0) / 10.0
    }

    #[must_use]
    pub const fn step_up(self) -> Self {
        if self.0 >= Self::MAX.0 {
            Self::MAX
        } else {
            Self(self.0 + 1)
        }
    }

    #[must_use]
    pub const fn step_down(self) -> Self {
        Self(self.0.saturating_sub(1))
    }
}

impl Default for Temperature {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl std::fmt::Display for Temperature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.0 / 10, self.0 % 10)
    }
}

// ============================================================================
// Settings
// ============================================================================

/// Settings resolved for exactly one run.
///
/// Built fresh from the form when the user triggers a run and passed by value
/// into the completion client. A missing key is representable; the controller
/// refuses to call with one.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub api_key: Option<ApiKey>,
    pub model: ModelName,
    pub temperature: Temperature,
}

impl Settings {
    #[must_use]
    pub fn new(api_key: Option<ApiKey>, model: ModelName, temperature: Temperature) -> Self {
        Self {
            api_key,
            model,
            temperature,
        }
    }
}

// ============================================================================
// Completion Outcome
// ============================================================================

/// Result of one completion call. Failures never propagate past the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompletionOutcome {
    /// Generated text, already trimmed.
    Success(String),
    /// Human-readable failure detail, without the display prefix.
    Failure(String),
}

impl CompletionOutcome {
    #[must_use]
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failure(_))
    }

    /// Text shown in the results area.
    #[must_use]
    pub fn display_text(&self) -> String {
        match self {
            Self::Success(text) => text.clone(),
            Self::Failure(detail) => format!("{LLM_ERROR_PREFIX}{detail}"),
        }
    }
}
