//! Controller behavior through keyboard events, the way a user drives it.

use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers};
use wiremock::MockServer;

use scribe_engine::{
    EMPTY_INPUT_MESSAGE, Focus, LLM_ERROR_PREFIX, MISSING_API_KEY_MESSAGE, ModeKind, RunHalt,
    RunPhase, ScrollPanel, StatusKind, Temperature,
};
use scribe_tui::apply_event;

use crate::common::{app_for, mount_chat_response, mount_no_calls, refused_base_url, settle};

fn key(code: KeyCode) -> Event {
    Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
}

fn ctrl(c: char) -> Event {
    Event::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL))
}

fn type_text(app: &mut scribe_engine::App, text: &str) {
    for c in text.chars() {
        apply_event(app, key(KeyCode::Char(c)));
    }
}

#[tokio::test]
async fn missing_key_never_calls_the_api() {
    let server = MockServer::start().await;
    mount_no_calls(&server).await;

    let mut app = app_for("", &server.uri());
    type_text(&mut app, "Please summarize this.");
    apply_event(&mut app, ctrl('r'));

    assert_eq!(app.phase(), RunPhase::Halted(RunHalt::MissingApiKey));
    assert_eq!(app.status_message(), Some(MISSING_API_KEY_MESSAGE));
    assert_eq!(app.status_kind(), Some(StatusKind::Error));
    server.verify().await;
}

#[tokio::test]
async fn blank_input_never_calls_the_api() {
    let server = MockServer::start().await;
    mount_no_calls(&server).await;

    let mut app = app_for("sk-test", &server.uri());
    type_text(&mut app, "   ");
    apply_event(&mut app, key(KeyCode::Enter));
    apply_event(&mut app, ctrl('r'));

    assert_eq!(app.phase(), RunPhase::Halted(RunHalt::EmptyInput));
    assert_eq!(app.status_message(), Some(EMPTY_INPUT_MESSAGE));
    assert_eq!(app.status_kind(), Some(StatusKind::Warning));
    server.verify().await;
}

#[tokio::test]
async fn run_button_submits_and_result_is_displayed() {
    let server = MockServer::start().await;
    mount_chat_response(&server, "Positive").await;

    let mut app = app_for("sk-test", &server.uri());
    assert_eq!(app.task_form().mode(), ModeKind::Summarize);
    type_text(&mut app, "I love this product!");

    // Input -> Run (Summarize has no option control).
    apply_event(&mut app, key(KeyCode::Tab));
    assert_eq!(app.focus(), Focus::Run);
    apply_event(&mut app, key(KeyCode::Enter));
    assert!(app.is_busy());

    settle(&mut app).await;
    assert_eq!(app.phase(), RunPhase::Displaying);
    assert_eq!(app.result_text().as_deref(), Some("Positive"));

    apply_event(&mut app, key(KeyCode::Tab));
    assert_eq!(app.focus(), Focus::Result);
    apply_event(&mut app, key(KeyCode::Tab));
    assert_eq!(app.focus(), Focus::Preview);
    assert!(!app.preview_expanded());
    apply_event(&mut app, key(KeyCode::Char(' ')));
    assert!(app.preview_expanded());
}

#[tokio::test]
async fn transport_failure_is_displayed_with_prefix() {
    let mut app = app_for("sk-test", &refused_base_url());
    type_text(&mut app, "hello");
    apply_event(&mut app, ctrl('r'));
    settle(&mut app).await;

    assert_eq!(app.phase(), RunPhase::Displaying);
    let text = app.result_text().unwrap();
    assert!(text.starts_with(LLM_ERROR_PREFIX), "{text}");
    let detail = &text[LLM_ERROR_PREFIX.len()..];
    assert!(detail.starts_with("request failed"), "{text}");
    // The io error at the bottom of the source chain makes it into the text.
    assert!(detail.to_lowercase().contains("refused"), "{text}");
}

#[tokio::test]
async fn arrow_and_page_keys_scroll_the_result() {
    let server = MockServer::start().await;
    mount_chat_response(&server, "a\nb\nc").await;

    let mut app = app_for("sk-test", &server.uri());
    type_text(&mut app, "hello");
    apply_event(&mut app, ctrl('r'));
    settle(&mut app).await;

    // What the renderer would report for a 30-row result in an 8-row panel.
    app.update_scroll_max(ScrollPanel::Result, 22, 8);

    apply_event(&mut app, key(KeyCode::Down));
    assert_eq!(app.scroll_offset(ScrollPanel::Result), 0, "input has focus");

    app.set_focus(Focus::Result);
    apply_event(&mut app, key(KeyCode::Down));
    apply_event(&mut app, key(KeyCode::PageDown));
    assert_eq!(app.scroll_offset(ScrollPanel::Result), 9);
    apply_event(&mut app, key(KeyCode::Up));
    assert_eq!(app.scroll_offset(ScrollPanel::Result), 8);
    apply_event(&mut app, key(KeyCode::End));
    assert_eq!(app.scroll_offset(ScrollPanel::Result), 22);
    apply_event(&mut app, key(KeyCode::Home));
    assert_eq!(app.scroll_offset(ScrollPanel::Result), 0);
}

#[test]
fn temperature_slider_stays_in_range() {
    let mut app = app_for("", "http://127.0.0.1:9");
    app.set_focus(Focus::Temperature);

    for _ in 0..15 {
        apply_event(&mut app, key(KeyCode::Right));
        let t = app.settings_form().temperature().value();
        assert!((0.0..=1.0).contains(&t), "{t}");
    }
    assert_eq!(app.settings_form().temperature(), Temperature::MAX);

    for _ in 0..15 {
        apply_event(&mut app, key(KeyCode::Left));
    }
    assert_eq!(app.settings_form().temperature(), Temperature::MIN);
}

#[test]
fn shift_tab_walks_focus_backwards() {
    let mut app = app_for("", "http://127.0.0.1:9");
    assert_eq!(app.focus(), Focus::Input);
    apply_event(&mut app, key(KeyCode::BackTab));
    assert_eq!(app.focus(), Focus::Mode);
    apply_event(&mut app, key(KeyCode::Right));
    assert_eq!(app.task_form().mode(), ModeKind::Rewrite);
}

#[test]
fn paste_event_goes_to_focused_field() {
    let mut app = app_for("", "http://127.0.0.1:9");
    apply_event(&mut app, Event::Paste("first\r\nsecond".to_string()));
    assert_eq!(app.task_form().input(), "first\nsecond");

    app.set_focus(Focus::ApiKey);
    apply_event(&mut app, Event::Paste("sk-pasted\n".to_string()));
    assert_eq!(app.settings_form().api_key_len(), "sk-pasted".len());
}

#[test]
fn ctrl_q_and_ctrl_c_quit() {
    let mut app = app_for("", "http://127.0.0.1:9");
    assert!(!apply_event(&mut app, key(KeyCode::Char('q'))));
    assert!(apply_event(&mut app, ctrl('q')));

    let mut app = app_for("", "http://127.0.0.1:9");
    assert!(apply_event(&mut app, ctrl('c')));
}

#[test]
fn copy_before_any_result_reports_nothing_to_copy() {
    let mut app = app_for("", "http://127.0.0.1:9");
    apply_event(&mut app, ctrl('y'));
    assert_eq!(app.status_kind(), Some(StatusKind::Info));
}
