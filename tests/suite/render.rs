//! Page rendering into a `TestBackend`.

use wiremock::MockServer;

use scribe_engine::{App, CompletionClient, Focus, ModeKind, ScrollMotion, Step, UiOptions};
use scribe_tui::{CAPTION, THINKING, TITLE};

use crate::common::{app_for, initial_settings, mount_chat_response, render, settle};

const WIDTH: u16 = 140;
const HEIGHT: u16 = 40;

fn select_mode(app: &mut App, mode: ModeKind) {
    app.set_focus(Focus::Mode);
    while app.task_form().mode() != mode {
        app.adjust(Step::Next);
    }
}

#[test]
fn page_shows_header_settings_and_modes() {
    let mut app = app_for("", "http://127.0.0.1:9");
    let screen = render(&mut app, WIDTH, HEIGHT);

    assert!(screen.contains(TITLE), "{screen}");
    assert!(screen.contains(CAPTION), "{screen}");
    assert!(screen.contains("OpenAI API Key"), "{screen}");
    assert!(screen.contains("(not set)"), "{screen}");
    assert!(screen.contains("gpt-3.5-turbo"), "{screen}");
    assert!(screen.contains("Temperature: 0.7"), "{screen}");
    for mode in ModeKind::ALL {
        assert!(screen.contains(mode.label()), "missing {}: {screen}", mode.label());
    }
    assert!(screen.contains("Results will appear here."), "{screen}");
}

#[test]
fn api_key_is_masked() {
    let mut app = app_for("sk-super-secret", "http://127.0.0.1:9");
    let screen = render(&mut app, WIDTH, HEIGHT);
    assert!(!screen.contains("sk-super-secret"), "{screen}");
    assert!(screen.contains(&"•".repeat("sk-super-secret".len())), "{screen}");
}

#[test]
fn ascii_mode_uses_ascii_glyphs() {
    let mut initial = initial_settings("sk-abc", "http://127.0.0.1:9");
    initial.ui = UiOptions {
        ascii_only: true,
        high_contrast: true,
    };
    let mut app = App::with_client(&initial, CompletionClient::new(&initial.base_url));
    let screen = render(&mut app, WIDTH, HEIGHT);

    assert!(screen.contains("******"), "{screen}");
    assert!(screen.contains("(*) Summarize"), "{screen}");
    assert!(!screen.contains('◉'), "{screen}");
}

#[test]
fn help_line_follows_focus() {
    let mut app = app_for("", "http://127.0.0.1:9");
    let help = "Your key is kept only in this session.";
    assert!(!render(&mut app, WIDTH, HEIGHT).contains(help));

    app.set_focus(Focus::ApiKey);
    assert!(render(&mut app, WIDTH, HEIGHT).contains(help));

    app.set_focus(Focus::Temperature);
    let screen = render(&mut app, WIDTH, HEIGHT);
    assert!(screen.contains("Higher value = more creative"), "{screen}");
}

#[test]
fn option_row_matches_mode() {
    let mut app = app_for("", "http://127.0.0.1:9");

    let screen = render(&mut app, WIDTH, HEIGHT);
    assert!(!screen.contains("Tone:"), "{screen}");

    select_mode(&mut app, ModeKind::Rewrite);
    assert!(render(&mut app, WIDTH, HEIGHT).contains("Tone: < Professional >"));

    select_mode(&mut app, ModeKind::Explain);
    assert!(render(&mut app, WIDTH, HEIGHT).contains("Explain to: < Beginner >"));

    select_mode(&mut app, ModeKind::IdeaGenerator);
    let screen = render(&mut app, WIDTH, HEIGHT);
    assert!(screen.contains("Number of ideas: < 5 >"), "{screen}");
    assert!(screen.contains(" Topic "), "{screen}");
}

#[test]
fn halt_message_shows_in_status_bar() {
    let mut app = app_for("", "http://127.0.0.1:9");
    app.insert_str("some text");
    app.run();
    let screen = render(&mut app, WIDTH, HEIGHT);
    assert!(
        screen.contains("Error: Please enter your OpenAI API key in the settings panel."),
        "{screen}"
    );
}

#[tokio::test]
async fn result_and_collapsible_preview() {
    let server = MockServer::start().await;
    mount_chat_response(&server, "Positive").await;

    let mut app = app_for("sk-test", &server.uri());
    select_mode(&mut app, ModeKind::SentimentAnalysis);
    app.set_focus(Focus::Input);
    app.insert_str("What a lovely day");
    app.run();

    let screen = render(&mut app, WIDTH, HEIGHT);
    assert!(screen.contains(THINKING), "{screen}");

    settle(&mut app).await;
    let screen = render(&mut app, WIDTH, HEIGHT);
    assert!(screen.contains("Positive"), "{screen}");
    assert!(screen.contains("Prompt preview"), "{screen}");
    assert!(!screen.contains("System:"), "preview starts collapsed: {screen}");

    app.toggle_preview();
    let screen = render(&mut app, WIDTH, HEIGHT);
    assert!(screen.contains("System:"), "{screen}");
    assert!(screen.contains("User:"), "{screen}");
    assert!(screen.contains("precise sentiment classifier"), "{screen}");
}

#[tokio::test]
async fn escape_sequences_in_results_are_not_rendered() {
    let server = MockServer::start().await;
    mount_chat_response(&server, "clean\u{1b}]52;c;ZXZpbA==\u{7}text").await;

    let mut app = app_for("sk-test", &server.uri());
    app.insert_str("anything");
    app.run();
    settle(&mut app).await;

    let screen = render(&mut app, WIDTH, HEIGHT);
    assert!(screen.contains("cleantext"), "{screen}");
    assert!(!screen.contains("ZXZpbA"), "{screen}");
}

#[tokio::test]
async fn long_result_scrolls_to_its_last_line() {
    let reply: Vec<String> = (1..=40).map(|i| format!("line-{i:02}")).collect();
    let server = MockServer::start().await;
    mount_chat_response(&server, &reply.join("\n")).await;

    let mut app = app_for("sk-test", &server.uri());
    app.insert_str("anything");
    app.run();
    settle(&mut app).await;

    let screen = render(&mut app, WIDTH, HEIGHT);
    assert!(screen.contains("line-01"), "{screen}");
    assert!(!screen.contains("line-40"), "{screen}");

    app.set_focus(Focus::Result);
    app.scroll(ScrollMotion::PageDown);
    let screen = render(&mut app, WIDTH, HEIGHT);
    assert!(!screen.contains("line-01"), "{screen}");
    assert!(screen.contains("line-21"), "{screen}");

    app.scroll(ScrollMotion::Bottom);
    let screen = render(&mut app, WIDTH, HEIGHT);
    assert!(screen.contains("line-40"), "{screen}");
    assert!(screen.contains(" 40/40 "), "{screen}");

    app.scroll(ScrollMotion::Top);
    let screen = render(&mut app, WIDTH, HEIGHT);
    assert!(screen.contains("line-01"), "{screen}");
}

#[tokio::test]
async fn expanded_preview_scrolls_through_a_long_prompt() {
    let paragraphs: Vec<String> = (1..=30).map(|i| format!("para-{i:02}")).collect();
    let server = MockServer::start().await;
    mount_chat_response(&server, "- one\n- two\n- three").await;

    let mut app = app_for("sk-test", &server.uri());
    assert_eq!(app.task_form().mode(), ModeKind::Summarize);
    app.insert_str(&paragraphs.join("\n"));
    app.run();
    settle(&mut app).await;

    app.set_focus(Focus::Preview);
    app.activate();
    assert!(app.preview_expanded());

    // The input panel only shows the tail of the text (para-25 onwards).
    let screen = render(&mut app, WIDTH, HEIGHT);
    assert!(screen.contains("System:"), "{screen}");
    assert!(!screen.contains("para-10"), "{screen}");

    app.scroll(ScrollMotion::PageDown);
    let screen = render(&mut app, WIDTH, HEIGHT);
    assert!(screen.contains("para-10"), "{screen}");

    app.scroll(ScrollMotion::Bottom);
    let screen = render(&mut app, WIDTH, HEIGHT);
    assert!(screen.contains("para-21"), "{screen}");
    assert!(!screen.contains("System:"), "{screen}");
}

#[test]
fn tiny_terminal_does_not_panic() {
    let mut app = app_for("sk-test", "http://127.0.0.1:9");
    let _ = render(&mut app, 20, 6);
}
