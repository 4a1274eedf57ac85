//! Run lifecycle: validation and the state of the current run.

use std::time::Instant;

use tokio::sync::oneshot;

use scribe_types::{CompletionOutcome, PromptPair, Settings, Task, ui::StatusKind};

pub const MISSING_API_KEY_MESSAGE: &str =
    "Please enter your OpenAI API key in the settings panel.";
pub const EMPTY_INPUT_MESSAGE: &str = "Please enter some text (or a topic) first.";

/// Why a run stopped before any network call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunHalt {
    MissingApiKey,
    EmptyInput,
}

impl RunHalt {
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            RunHalt::MissingApiKey => MISSING_API_KEY_MESSAGE,
            RunHalt::EmptyInput => EMPTY_INPUT_MESSAGE,
        }
    }

    /// A missing key blocks every run; empty input is only a warning.
    #[must_use]
    pub const fn status_kind(self) -> StatusKind {
        match self {
            RunHalt::MissingApiKey => StatusKind::Error,
            RunHalt::EmptyInput => StatusKind::Warning,
        }
    }
}

/// Checks, in order: API key present, then non-blank input.
pub fn validate(settings: &Settings, task: &Task) -> Result<(), RunHalt> {
    if settings.api_key.is_none() {
        return Err(RunHalt::MissingApiKey);
    }
    if task.input().trim().is_empty() {
        return Err(RunHalt::EmptyInput);
    }
    Ok(())
}

/// A call in flight. Existence proves the controller is busy.
#[derive(Debug)]
pub struct InFlight {
    pub(crate) prompt: PromptPair,
    pub(crate) receiver: oneshot::Receiver<CompletionOutcome>,
    pub(crate) started: Instant,
}

/// A finished run: the exact prompt sent and what came back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completed {
    prompt: PromptPair,
    outcome: CompletionOutcome,
}

impl Completed {
    pub(crate) fn new(prompt: PromptPair, outcome: CompletionOutcome) -> Self {
        Self { prompt, outcome }
    }

    #[must_use]
    pub fn prompt(&self) -> &PromptPair {
        &self.prompt
    }

    #[must_use]
    pub fn outcome(&self) -> &CompletionOutcome {
        &self.outcome
    }
}

#[derive(Debug, Default)]
pub(crate) enum RunState {
    #[default]
    Idle,
    Calling(InFlight),
    Displaying(Completed),
    Halted(RunHalt),
}

/// Observable phase of the controller.
///
/// `Displaying` and `Halted` are resting states: like `Idle`, they accept the
/// next Run trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunPhase {
    Idle,
    Calling,
    Displaying,
    Halted(RunHalt),
}

impl RunState {
    pub(crate) fn phase(&self) -> RunPhase {
        match self {
            RunState::Idle => RunPhase::Idle,
            RunState::Calling(_) => RunPhase::Calling,
            RunState::Displaying(_) => RunPhase::Displaying,
            RunState::Halted(halt) => RunPhase::Halted(*halt),
        }
    }
}
