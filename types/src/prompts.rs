//! Prompt builder: one pure function per mode.
//!
//! Each builder returns the exact `(system, user)` instruction pair that is sent
//! to the completion API and shown in the prompt preview. The user's text is
//! embedded verbatim; no escaping or trimming is applied here.

use crate::task::{AudienceLevel, IdeaCount, Task, Tone};

/// The two instruction strings sent for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptPair {
    system: String,
    user: String,
}

impl PromptPair {
    #[must_use]
    pub fn new(system: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            system: system.into(),
            user: user.into(),
        }
    }

    #[must_use]
    pub fn system(&self) -> &str {
        &self.system
    }

    #[must_use]
    pub fn user(&self) -> &str {
        &self.user
    }
}

impl Task {
    /// Build the instruction pair for this task.
    #[must_use]
    pub fn prompt(&self) -> PromptPair {
        match self {
            Task::Summarize { text } => summarize(text),
            Task::Rewrite { text, tone } => rewrite(text, *tone),
            Task::Explain { text, audience } => explain(text, *audience),
            Task::IdeaGenerator { topic, count } => idea_generator(topic, *count),
            Task::SentimentAnalysis { text } => sentiment_analysis(text),
        }
    }
}

#[must_use]
pub fn summarize(text: &str) -> PromptPair {
    PromptPair::new(
        "You are a concise assistant. Always respond with exactly three bullet points \
         that capture the key ideas of the text you are given.",
        format!("Summarize the following text in exactly 3 bullet points:\n\n{text}"),
    )
}

#[must_use]
pub fn rewrite(text: &str, tone: Tone) -> PromptPair {
    PromptPair::new(
        "You are a skilled editor. You rewrite text while preserving its original meaning.",
        format!(
            "Rewrite the following text in a {} tone. Keep it clear and concise.\n\n{text}",
            tone.as_str()
        ),
    )
}

#[must_use]
pub fn explain(text: &str, audience: AudienceLevel) -> PromptPair {
    PromptPair::new(
        "You are an expert teacher who explains complex topics using simple words and \
         concrete examples.",
        format!(
            "Explain the following to {} using short sentences and examples:\n\n{text}",
            audience.as_str()
        ),
    )
}

#[must_use]
pub fn idea_generator(topic: &str, count: IdeaCount) -> PromptPair {
    PromptPair::new(
        "You are a creative brainstorming partner. You respond with a numbered list of ideas.",
        format!(
            "Generate exactly {} distinct, creative ideas for the following topic: {topic}",
            count.get()
        ),
    )
}

#[must_use]
pub fn sentiment_analysis(text: &str) -> PromptPair {
    PromptPair::new(
        "You are a precise sentiment classifier. You output only one word: Positive, \
         Negative, or Neutral.",
        format!(
            "Classify the sentiment of the following text. Output only one word \
             (Positive, Negative, or Neutral).\n\n{text}"
        ),
    )
}
