//! Input handling for Scribe TUI.

use anyhow::{Result, anyhow};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::{
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    time::Duration,
};
use tokio::sync::mpsc;

use scribe_engine::{App, Focus, ScrollMotion, StatusKind, Step};

const INPUT_POLL_TIMEOUT: Duration = Duration::from_millis(25); // shutdown responsiveness
const INPUT_CHANNEL_CAPACITY: usize = 1024;
const MAX_EVENTS_PER_FRAME: usize = 64; // never starve rendering

enum InputMsg {
    Event(Event),
    Error(String),
}

/// Reads terminal events on a blocking task and hands them to the frame loop.
pub struct InputPump {
    rx: mpsc::Receiver<InputMsg>,
    stop: Arc<AtomicBool>,
    join: Option<tokio::task::JoinHandle<()>>,
}

impl InputPump {
    #[must_use]
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel(INPUT_CHANNEL_CAPACITY);
        let stop = Arc::new(AtomicBool::new(false));
        let stop2 = stop.clone();

        let join = tokio::task::spawn_blocking(move || input_loop(&stop2, &tx));
        Self {
            rx,
            stop,
            join: Some(join),
        }
    }

    pub async fn shutdown(&mut self) {
        // Close first so a sender blocked on capacity wakes up.
        self.rx.close();

        self.stop.store(true, Ordering::Release);
        if let Some(join) = self.join.take() {
            let _ = tokio::time::timeout(Duration::from_secs(2), join).await;
        }
    }
}

impl Default for InputPump {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for InputPump {
    fn drop(&mut self) {
        // Best-effort stop; do not block in Drop.
        self.rx.close();
        self.stop.store(true, Ordering::Release);
    }
}

fn input_loop(stop: &AtomicBool, tx: &mpsc::Sender<InputMsg>) {
    while !stop.load(Ordering::Acquire) {
        match event::poll(INPUT_POLL_TIMEOUT) {
            Ok(true) => match event::read() {
                Ok(ev) => {
                    if tx.blocking_send(InputMsg::Event(ev)).is_err() {
                        break;
                    }
                }
                Err(e) => {
                    let _ = tx.blocking_send(InputMsg::Error(e.to_string()));
                    break;
                }
            },
            Ok(false) => {}
            Err(e) => {
                let _ = tx.blocking_send(InputMsg::Error(e.to_string()));
                break;
            }
        }
    }
}

/// Drain pending input into the app. Returns `true` when the app should quit.
pub fn handle_events(app: &mut App, input: &mut InputPump) -> Result<bool> {
    for _ in 0..MAX_EVENTS_PER_FRAME {
        let ev = match input.rx.try_recv() {
            Ok(InputMsg::Event(ev)) => ev,
            Ok(InputMsg::Error(msg)) => return Err(anyhow!("input error: {msg}")),
            Err(mpsc::error::TryRecvError::Empty) => break,
            Err(mpsc::error::TryRecvError::Disconnected) => {
                return Err(anyhow!("input pump disconnected"));
            }
        };

        if apply_event(app, ev) {
            return Ok(true);
        }
    }
    Ok(app.should_quit())
}

/// Apply one terminal event. Returns `true` when the app should quit.
pub fn apply_event(app: &mut App, event: Event) -> bool {
    match event {
        Event::Key(key) if key.kind != KeyEventKind::Release => handle_key(app, key),
        Event::Paste(text) => app.insert_str(&text),
        _ => {}
    }
    app.should_quit()
}

fn handle_key(app: &mut App, key: KeyEvent) {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    if ctrl {
        match key.code {
            KeyCode::Char('c' | 'q') => app.request_quit(),
            KeyCode::Char('r') => app.run(),
            KeyCode::Char('y') => copy_result(app),
            KeyCode::Char('u') => app.clear_field(),
            _ => {}
        }
        return;
    }

    match key.code {
        KeyCode::Tab => app.focus_next(),
        KeyCode::BackTab => app.focus_prev(),
        KeyCode::Left => app.adjust(Step::Prev),
        KeyCode::Right => app.adjust(Step::Next),
        KeyCode::Up => app.scroll(ScrollMotion::LineUp),
        KeyCode::Down => app.scroll(ScrollMotion::LineDown),
        KeyCode::PageUp => app.scroll(ScrollMotion::PageUp),
        KeyCode::PageDown => app.scroll(ScrollMotion::PageDown),
        KeyCode::Home => app.scroll(ScrollMotion::Top),
        KeyCode::End => app.scroll(ScrollMotion::Bottom),
        KeyCode::Enter => app.activate(),
        KeyCode::Backspace => app.backspace(),
        KeyCode::Esc => app.clear_status(),
        KeyCode::Char(' ') if app.focus() == Focus::Preview => app.toggle_preview(),
        KeyCode::Char(c) => app.insert_char(c),
        _ => {}
    }
}

fn copy_result(app: &mut App) {
    let Some(text) = app.result_text() else {
        app.set_status(StatusKind::Info, "Nothing to copy yet");
        return;
    };

    match arboard::Clipboard::new().and_then(|mut cb| cb.set_text(text)) {
        Ok(()) => app.set_status(StatusKind::Success, "Result copied to clipboard"),
        Err(e) => {
            tracing::warn!("Clipboard copy failed: {e}");
            app.set_status(StatusKind::Warning, format!("Could not copy: {e}"));
        }
    }
}
