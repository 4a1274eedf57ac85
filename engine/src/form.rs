//! Form state: the settings panel and the task inputs.

use unicode_segmentation::UnicodeSegmentation;

use scribe_config::InitialSettings;
use scribe_types::{
    ApiKey, AudienceLevel, IdeaCount, ModeKind, ModelName, Settings, Task, Temperature, Tone,
};

/// Settings panel fields. The highest-priority settings layer.
#[derive(Clone, Default)]
pub struct SettingsForm {
    pub(crate) api_key: String,
    pub(crate) model: String,
    pub(crate) temperature: Temperature,
}

// Manual Debug impl to prevent leaking the API key in logs.
impl std::fmt::Debug for SettingsForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SettingsForm")
            .field("api_key", &if self.api_key.is_empty() { "" } else { "[REDACTED]" })
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .finish()
    }
}

impl SettingsForm {
    #[must_use]
    pub fn from_initial(initial: &InitialSettings) -> Self {
        Self {
            api_key: initial.api_key.clone(),
            model: initial.model.clone(),
            temperature: initial.temperature,
        }
    }

    /// Resolve the fields into the settings for one run.
    /// A blank model field falls back to the default model.
    #[must_use]
    pub fn resolve(&self) -> Settings {
        Settings::new(
            ApiKey::parse(&self.api_key),
            ModelName::parse(&self.model).unwrap_or_default(),
            self.temperature,
        )
    }

    #[must_use]
    pub fn api_key_len(&self) -> usize {
        self.api_key.graphemes(true).count()
    }

    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    #[must_use]
    pub fn temperature(&self) -> Temperature {
        self.temperature
    }
}

/// Mode selector, input area, and the per-mode option controls.
///
/// Options for every mode are kept so switching modes back and forth does not
/// lose a selection; only the selected mode's options reach the [`Task`].
#[derive(Debug, Clone, Default)]
pub struct TaskForm {
    pub(crate) mode: ModeKind,
    pub(crate) input: String,
    pub(crate) tone: Tone,
    pub(crate) audience: AudienceLevel,
    pub(crate) idea_count: IdeaCount,
}

impl TaskForm {
    /// The task for the selected mode. Input is passed through verbatim.
    #[must_use]
    pub fn task(&self) -> Task {
        let text = self.input.clone();
        match self.mode {
            ModeKind::Summarize => Task::Summarize { text },
            ModeKind::Rewrite => Task::Rewrite {
                text,
                tone: self.tone,
            },
            ModeKind::Explain => Task::Explain {
                text,
                audience: self.audience,
            },
            ModeKind::IdeaGenerator => Task::IdeaGenerator {
                topic: text,
                count: self.idea_count,
            },
            ModeKind::SentimentAnalysis => Task::SentimentAnalysis { text },
        }
    }

    #[must_use]
    pub fn mode(&self) -> ModeKind {
        self.mode
    }

    #[must_use]
    pub fn input(&self) -> &str {
        &self.input
    }

    #[must_use]
    pub fn tone(&self) -> Tone {
        self.tone
    }

    #[must_use]
    pub fn audience(&self) -> AudienceLevel {
        self.audience
    }

    #[must_use]
    pub fn idea_count(&self) -> IdeaCount {
        self.idea_count
    }
}

/// Remove the last grapheme cluster.
pub(crate) fn pop_grapheme(text: &mut String) {
    if let Some((index, _)) = text.grapheme_indices(true).next_back() {
        text.truncate(index);
    }
}

pub(crate) fn normalize_line_endings(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\r', "\n")
}
