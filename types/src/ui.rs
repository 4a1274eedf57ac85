//! UI state types shared by the engine (state ownership) and tui (rendering/input).

/// UI configuration options derived from config.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UiOptions {
    pub ascii_only: bool,
    pub high_contrast: bool,
}

/// Which control currently receives keyboard input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Focus {
    ApiKey,
    Model,
    Temperature,
    Mode,
    Input,
    /// Tone, audience, or idea count, depending on the selected mode.
    ModeOption,
    Run,
    /// The results area; scroll keys move it.
    Result,
    Preview,
}

impl Focus {
    /// Tab order. `ModeOption` is skipped by callers when the mode has none.
    pub const ORDER: [Focus; 9] = [
        Focus::ApiKey,
        Focus::Model,
        Focus::Temperature,
        Focus::Mode,
        Focus::Input,
        Focus::ModeOption,
        Focus::Run,
        Focus::Result,
        Focus::Preview,
    ];

    /// Help line shown under the settings panel while this control is focused.
    #[must_use]
    pub const fn help(self) -> Option<&'static str> {
        match self {
            Focus::ApiKey => Some("Your key is kept only in this session."),
            Focus::Model => Some("e.g., gpt-3.5-turbo or gpt-4o-mini (if available)"),
            Focus::Temperature => Some("Higher value = more creative but less deterministic."),
            _ => None,
        }
    }
}

/// Severity of the status line message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    /// Blocking problem; the run did not happen.
    Error,
    /// Recoverable problem with the user's input.
    Warning,
    Success,
    Info,
}
