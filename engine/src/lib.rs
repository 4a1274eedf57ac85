//! Core engine for Scribe - the interaction controller.
//!
//! This crate contains the [`App`] state machine without TUI dependencies.
//!
//! ```text
//! Idle ──Run──> validate ──ok──> Calling ──outcome──> Displaying
//!                  │
//!                  └──halt──> Halted (missing key / empty input, no call made)
//! ```
//!
//! `Displaying` and `Halted` accept the next Run trigger exactly like `Idle`.
//! While `Calling`, further triggers are refused; there is at most one call in
//! flight per session and it is never cancelled.

use std::time::{Duration, Instant};

use tokio::sync::oneshot;

pub use scribe_config::{InitialSettings, ScribeConfig};
pub use scribe_providers::{self, CompletionClient};
pub use scribe_types::{
    AudienceLevel, CompletionOutcome, IdeaCount, LLM_ERROR_PREFIX, ModeKind, PromptPair, Settings,
    Task, Temperature, Tone,
    ui::{Focus, StatusKind, UiOptions},
};

mod form;
mod run;
mod scroll;

pub use form::{SettingsForm, TaskForm};
pub use run::{
    Completed, EMPTY_INPUT_MESSAGE, MISSING_API_KEY_MESSAGE, RunHalt, RunPhase, validate,
};

pub use scroll::{PanelScroll, ScrollMotion, ScrollPanel};

use form::{normalize_line_endings, pop_grapheme};
use run::{InFlight, RunState};

/// Direction for selectors and sliders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Prev,
    Next,
}

#[derive(Debug)]
pub struct App {
    settings: SettingsForm,
    task: TaskForm,
    focus: Focus,
    preview_expanded: bool,
    result_scroll: PanelScroll,
    preview_scroll: PanelScroll,
    run: RunState,
    status: Option<(StatusKind, String)>,
    client: CompletionClient,
    ui: UiOptions,
    tick: usize,
    should_quit: bool,
}

impl App {
    #[must_use]
    pub fn new(initial: &InitialSettings) -> Self {
        Self::with_client(initial, CompletionClient::new(&initial.base_url))
    }

    /// Build with an explicit client (e.g. one pointed at a local gateway).
    #[must_use]
    pub fn with_client(initial: &InitialSettings, client: CompletionClient) -> Self {
        tracing::info!(
            model = %initial.model,
            temperature = %initial.temperature,
            endpoint = client.endpoint(),
            has_api_key = !initial.api_key.trim().is_empty(),
            "Scribe initialized"
        );
        Self {
            settings: SettingsForm::from_initial(initial),
            task: TaskForm::default(),
            focus: Focus::Input,
            preview_expanded: false,
            result_scroll: PanelScroll::default(),
            preview_scroll: PanelScroll::default(),
            run: RunState::Idle,
            status: None,
            client,
            ui: initial.ui,
            tick: 0,
            should_quit: false,
        }
    }

    // ------------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------------

    #[must_use]
    pub fn settings_form(&self) -> &SettingsForm {
        &self.settings
    }

    #[must_use]
    pub fn task_form(&self) -> &TaskForm {
        &self.task
    }

    #[must_use]
    pub fn focus(&self) -> Focus {
        self.focus
    }

    #[must_use]
    pub fn ui_options(&self) -> UiOptions {
        self.ui
    }

    #[must_use]
    pub fn tick_count(&self) -> usize {
        self.tick
    }

    #[must_use]
    pub fn phase(&self) -> RunPhase {
        self.run.phase()
    }

    #[must_use]
    pub fn is_busy(&self) -> bool {
        matches!(self.run, RunState::Calling(_))
    }

    /// Time since the in-flight call started.
    #[must_use]
    pub fn busy_for(&self) -> Option<Duration> {
        match &self.run {
            RunState::Calling(in_flight) => Some(in_flight.started.elapsed()),
            _ => None,
        }
    }

    #[must_use]
    pub fn completed(&self) -> Option<&Completed> {
        match &self.run {
            RunState::Displaying(completed) => Some(completed),
            _ => None,
        }
    }

    #[must_use]
    pub fn halt(&self) -> Option<RunHalt> {
        match self.run {
            RunState::Halted(halt) => Some(halt),
            _ => None,
        }
    }

    /// Text for the results area, including the failure prefix when the call failed.
    #[must_use]
    pub fn result_text(&self) -> Option<String> {
        self.completed()
            .map(|completed| completed.outcome().display_text())
    }

    #[must_use]
    pub fn preview_expanded(&self) -> bool {
        self.preview_expanded
    }

    #[must_use]
    pub fn scroll_offset(&self, panel: ScrollPanel) -> u16 {
        self.panel_scroll(panel).offset()
    }

    fn panel_scroll(&self, panel: ScrollPanel) -> &PanelScroll {
        match panel {
            ScrollPanel::Result => &self.result_scroll,
            ScrollPanel::Preview => &self.preview_scroll,
        }
    }

    fn panel_scroll_mut(&mut self, panel: ScrollPanel) -> &mut PanelScroll {
        match panel {
            ScrollPanel::Result => &mut self.result_scroll,
            ScrollPanel::Preview => &mut self.preview_scroll,
        }
    }

    #[must_use]
    pub fn status_message(&self) -> Option<&str> {
        self.status.as_ref().map(|(_, message)| message.as_str())
    }

    #[must_use]
    pub fn status_kind(&self) -> Option<StatusKind> {
        self.status.as_ref().map(|(kind, _)| *kind)
    }

    #[must_use]
    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    // ------------------------------------------------------------------------
    // Lifecycle
    // ------------------------------------------------------------------------

    pub fn request_quit(&mut self) {
        self.should_quit = true;
    }

    pub fn tick(&mut self) {
        self.tick = self.tick.wrapping_add(1);
    }

    pub fn set_status(&mut self, kind: StatusKind, message: impl Into<String>) {
        self.status = Some((kind, message.into()));
    }

    pub fn clear_status(&mut self) {
        self.status = None;
    }

    // ------------------------------------------------------------------------
    // Run
    // ------------------------------------------------------------------------

    /// Handle the Run trigger.
    ///
    /// Settings are resolved from the form right here, once per run, and moved
    /// into the call. Validation failures halt without touching the network.
    pub fn run(&mut self) {
        if self.is_busy() {
            self.set_status(StatusKind::Info, "Busy: a request is already running");
            return;
        }

        let settings = self.settings.resolve();
        let task = self.task.task();

        if let Err(halt) = validate(&settings, &task) {
            tracing::info!(?halt, mode = ?task.kind(), "Run halted before calling");
            self.set_status(halt.status_kind(), halt.message());
            self.run = RunState::Halted(halt);
            return;
        }

        let prompt = task.prompt();
        let (tx, receiver) = oneshot::channel();
        let client = self.client.clone();
        let call_prompt = prompt.clone();

        tracing::info!(
            mode = ?task.kind(),
            model = %settings.model,
            temperature = %settings.temperature,
            "Starting completion"
        );

        tokio::spawn(async move {
            let outcome = client.complete(&settings, &call_prompt).await;
            let _ = tx.send(outcome);
        });

        self.preview_expanded = false;
        self.result_scroll.reset();
        self.preview_scroll.reset();
        self.clear_status();
        self.run = RunState::Calling(InFlight {
            prompt,
            receiver,
            started: Instant::now(),
        });
    }

    /// Move a finished call into `Displaying`. Call once per frame.
    pub fn poll_completion(&mut self) {
        let RunState::Calling(in_flight) = &mut self.run else {
            return;
        };

        let outcome = match in_flight.receiver.try_recv() {
            Ok(outcome) => outcome,
            Err(oneshot::error::TryRecvError::Empty) => return,
            Err(oneshot::error::TryRecvError::Closed) => {
                tracing::error!("Completion task ended without a result");
                CompletionOutcome::Failure("completion task ended without a result".to_string())
            }
        };

        let RunState::Calling(in_flight) = std::mem::take(&mut self.run) else {
            return;
        };
        let elapsed = in_flight.started.elapsed();

        if outcome.is_failure() {
            self.set_status(StatusKind::Error, "The completion request failed");
        } else {
            self.set_status(
                StatusKind::Success,
                format!("Done in {:.1}s", elapsed.as_secs_f64()),
            );
        }
        self.run = RunState::Displaying(Completed::new(in_flight.prompt, outcome));
    }

    pub fn toggle_preview(&mut self) {
        if self.completed().is_some() {
            self.preview_expanded = !self.preview_expanded;
            self.preview_scroll.reset();
        }
    }

    // ------------------------------------------------------------------------
    // Scrolling
    // ------------------------------------------------------------------------

    /// Called by the renderer each frame with the panel's largest offset and
    /// its visible height in rows.
    pub fn update_scroll_max(&mut self, panel: ScrollPanel, max: u16, page: u16) {
        self.panel_scroll_mut(panel).update_max(max, page);
    }

    /// The panel that scroll keys move, if the focused control is one.
    #[must_use]
    pub fn scroll_target(&self) -> Option<ScrollPanel> {
        match self.focus {
            Focus::Result => Some(ScrollPanel::Result),
            Focus::Preview if self.preview_expanded => Some(ScrollPanel::Preview),
            _ => None,
        }
    }

    pub fn scroll(&mut self, motion: ScrollMotion) {
        if let Some(panel) = self.scroll_target() {
            self.panel_scroll_mut(panel).apply(motion);
        }
    }

    // ------------------------------------------------------------------------
    // Focus
    // ------------------------------------------------------------------------

    fn focusable(&self, focus: Focus) -> bool {
        focus != Focus::ModeOption || self.task.mode.has_options()
    }

    pub fn focus_next(&mut self) {
        self.focus = self.cycle_focus(1);
    }

    pub fn focus_prev(&mut self) {
        self.focus = self.cycle_focus(Focus::ORDER.len() - 1);
    }

    fn cycle_focus(&self, offset: usize) -> Focus {
        let len = Focus::ORDER.len();
        let mut index = Focus::ORDER
            .iter()
            .position(|f| *f == self.focus)
            .unwrap_or(0);
        for _ in 0..len {
            index = (index + offset) % len;
            if self.focusable(Focus::ORDER[index]) {
                break;
            }
        }
        Focus::ORDER[index]
    }

    pub fn set_focus(&mut self, focus: Focus) {
        if self.focusable(focus) {
            self.focus = focus;
        }
    }

    // ------------------------------------------------------------------------
    // Editing
    // ------------------------------------------------------------------------

    fn focused_text(&mut self) -> Option<&mut String> {
        match self.focus {
            Focus::ApiKey => Some(&mut self.settings.api_key),
            Focus::Model => Some(&mut self.settings.model),
            Focus::Input => Some(&mut self.task.input),
            _ => None,
        }
    }

    pub fn insert_char(&mut self, c: char) {
        if c == '\n' || c == '\r' {
            self.insert_newline();
            return;
        }
        if let Some(text) = self.focused_text() {
            text.push(c);
        }
    }

    /// Insert pasted text. Single-line fields drop line breaks.
    pub fn insert_str(&mut self, pasted: &str) {
        let single_line = self.focus != Focus::Input;
        let Some(text) = self.focused_text() else {
            return;
        };
        let normalized = normalize_line_endings(pasted);
        if single_line {
            text.extend(normalized.chars().filter(|c| *c != '\n'));
        } else {
            text.push_str(&normalized);
        }
    }

    pub fn insert_newline(&mut self) {
        if self.focus == Focus::Input {
            self.task.input.push('\n');
        }
    }

    pub fn backspace(&mut self) {
        if let Some(text) = self.focused_text() {
            pop_grapheme(text);
        }
    }

    /// Clear the focused text field.
    pub fn clear_field(&mut self) {
        if let Some(text) = self.focused_text() {
            text.clear();
        }
    }

    /// Left/Right on a selector or slider.
    pub fn adjust(&mut self, step: Step) {
        match self.focus {
            Focus::Temperature => {
                let t = self.settings.temperature;
                self.settings.temperature = match step {
                    Step::Prev => t.step_down(),
                    Step::Next => t.step_up(),
                };
            }
            Focus::Mode => {
                let mode = self.task.mode;
                self.task.mode = match step {
                    Step::Prev => mode.prev(),
                    Step::Next => mode.next(),
                };
            }
            Focus::ModeOption => self.adjust_mode_option(step),
            _ => {}
        }
    }

    fn adjust_mode_option(&mut self, step: Step) {
        let task = &mut self.task;
        match (task.mode, step) {
            (ModeKind::Rewrite, Step::Prev) => task.tone = task.tone.prev(),
            (ModeKind::Rewrite, Step::Next) => task.tone = task.tone.next(),
            (ModeKind::Explain, Step::Prev) => task.audience = task.audience.prev(),
            (ModeKind::Explain, Step::Next) => task.audience = task.audience.next(),
            (ModeKind::IdeaGenerator, Step::Prev) => task.idea_count = task.idea_count.decrement(),
            (ModeKind::IdeaGenerator, Step::Next) => task.idea_count = task.idea_count.increment(),
            (ModeKind::Summarize | ModeKind::SentimentAnalysis, _) => {}
        }
    }

    /// Enter on the focused control.
    pub fn activate(&mut self) {
        match self.focus {
            Focus::Run => self.run(),
            Focus::Preview => self.toggle_preview(),
            Focus::Input => self.insert_newline(),
            _ => self.focus_next(),
        }
    }
}
