//! Task selection: the five modes and the options each one carries.

/// The mode selector. Fixed order, matching the on-screen option list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ModeKind {
    #[default]
    Summarize,
    Rewrite,
    Explain,
    IdeaGenerator,
    SentimentAnalysis,
}

impl ModeKind {
    pub const ALL: [ModeKind; 5] = [
        ModeKind::Summarize,
        ModeKind::Rewrite,
        ModeKind::Explain,
        ModeKind::IdeaGenerator,
        ModeKind::SentimentAnalysis,
    ];

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            ModeKind::Summarize => "Summarize",
            ModeKind::Rewrite => "Rewrite",
            ModeKind::Explain => "Explain",
            ModeKind::IdeaGenerator => "Idea Generator",
            ModeKind::SentimentAnalysis => "Sentiment Analysis",
        }
    }

    /// Label for the primary input area. Idea generation takes a topic.
    #[must_use]
    pub const fn input_label(self) -> &'static str {
        match self {
            ModeKind::IdeaGenerator => "Topic",
            _ => "Text",
        }
    }

    /// Whether this mode shows an extra option control.
    #[must_use]
    pub const fn has_options(self) -> bool {
        matches!(
            self,
            ModeKind::Rewrite | ModeKind::Explain | ModeKind::IdeaGenerator
        )
    }

    #[must_use]
    pub fn index(self) -> usize {
        Self::ALL.iter().position(|m| *m == self).unwrap_or(0)
    }

    #[must_use]
    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    #[must_use]
    pub fn prev(self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

/// Target tone for the Rewrite mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Tone {
    #[default]
    Professional,
    Friendly,
    Casual,
    Formal,
    Persuasive,
}

impl Tone {
    pub const ALL: [Tone; 5] = [
        Tone::Professional,
        Tone::Friendly,
        Tone::Casual,
        Tone::Formal,
        Tone::Persuasive,
    ];

    /// Lowercase word embedded in the prompt.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Tone::Professional => "professional",
            Tone::Friendly => "friendly",
            Tone::Casual => "casual",
            Tone::Formal => "formal",
            Tone::Persuasive => "persuasive",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Tone::Professional => "Professional",
            Tone::Friendly => "Friendly",
            Tone::Casual => "Casual",
            Tone::Formal => "Formal",
            Tone::Persuasive => "Persuasive",
        }
    }

    #[must_use]
    pub fn next(self) -> Self {
        cycle(&Self::ALL, self, 1)
    }

    #[must_use]
    pub fn prev(self) -> Self {
        cycle(&Self::ALL, self, Self::ALL.len() - 1)
    }
}

/// Audience for the Explain mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AudienceLevel {
    Child,
    #[default]
    Beginner,
    Student,
    Expert,
}

impl AudienceLevel {
    pub const ALL: [AudienceLevel; 4] = [
        AudienceLevel::Child,
        AudienceLevel::Beginner,
        AudienceLevel::Student,
        AudienceLevel::Expert,
    ];

    /// Audience phrase embedded in the prompt ("explain this to ...").
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            AudienceLevel::Child => "a 10-year-old",
            AudienceLevel::Beginner => "a complete beginner",
            AudienceLevel::Student => "a high school student",
            AudienceLevel::Expert => "an expert",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            AudienceLevel::Child => "10-year-old",
            AudienceLevel::Beginner => "Beginner",
            AudienceLevel::Student => "High school student",
            AudienceLevel::Expert => "Expert",
        }
    }

    #[must_use]
    pub fn next(self) -> Self {
        cycle(&Self::ALL, self, 1)
    }

    #[must_use]
    pub fn prev(self) -> Self {
        cycle(&Self::ALL, self, Self::ALL.len() - 1)
    }
}

/// Number of ideas requested, always within `[3, 10]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct IdeaCount(u8);

impl IdeaCount {
    pub const MIN: u8 = 3;
    pub const MAX: u8 = 10;

    #[must_use]
    pub fn new(count: u8) -> Self {
        Self(count.clamp(Self::MIN, Self::MAX))
    }

    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }

    #[must_use]
    pub fn increment(self) -> Self {
        Self::new(self.0.saturating_add(1))
    }

    #[must_use]
    pub fn decrement(self) -> Self {
        Self::new(self.0.saturating_sub(1))
    }
}

impl Default for IdeaCount {
    fn default() -> Self {
        Self(5)
    }
}

/// A fully specified task: the selected mode plus exactly the inputs it needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Task {
    Summarize { text: String },
    Rewrite { text: String, tone: Tone },
    Explain { text: String, audience: AudienceLevel },
    IdeaGenerator { topic: String, count: IdeaCount },
    SentimentAnalysis { text: String },
}

impl Task {
    #[must_use]
    pub fn kind(&self) -> ModeKind {
        match self {
            Task::Summarize { .. } => ModeKind::Summarize,
            Task::Rewrite { .. } => ModeKind::Rewrite,
            Task::Explain { .. } => ModeKind::Explain,
            Task::IdeaGenerator { .. } => ModeKind::IdeaGenerator,
            Task::SentimentAnalysis { .. } => ModeKind::SentimentAnalysis,
        }
    }

    /// The user-supplied text (or topic) this task operates on.
    #[must_use]
    pub fn input(&self) -> &str {
        match self {
            Task::Summarize { text }
            | Task::Rewrite { text, .. }
            | Task::Explain { text, .. }
            | Task::SentimentAnalysis { text } => text,
            Task::IdeaGenerator { topic, .. } => topic,
        }
    }
}

fn cycle<T: Copy + PartialEq>(all: &[T], current: T, offset: usize) -> T {
    let index = all.iter().position(|v| *v == current).unwrap_or(0);
    all[(index + offset) % all.len()]
}
