//! Shared test utilities and fixtures
//!
//! Common infrastructure for integration tests.

#![allow(dead_code)]

use std::time::Duration;

use ratatui::{Terminal, backend::TestBackend};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use scribe_engine::{App, CompletionClient, InitialSettings, Temperature, UiOptions};

pub const CHAT_PATH: &str = "/v1/chat/completions";

/// Mount a Chat Completions reply with the given assistant text.
pub async fn mount_chat_response(server: &MockServer, content: &str) {
    Mock::given(method("POST"))
        .and(path(CHAT_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": "chatcmpl-test",
            "object": "chat.completion",
            "model": "gpt-3.5-turbo",
            "choices": [{
                "index": 0,
                "message": {"role": "assistant", "content": content},
                "finish_reason": "stop"
            }]
        })))
        .mount(server)
        .await;
}

/// Mount a handler that fails the test if any request reaches it.
pub async fn mount_no_calls(server: &MockServer) {
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(server)
        .await;
}

pub fn initial_settings(api_key: &str, base_url: &str) -> InitialSettings {
    InitialSettings {
        api_key: api_key.to_string(),
        model: "gpt-3.5-turbo".to_string(),
        temperature: Temperature::DEFAULT,
        base_url: base_url.to_string(),
        ui: UiOptions::default(),
    }
}

pub fn app_for(api_key: &str, base_url: &str) -> App {
    App::with_client(
        &initial_settings(api_key, base_url),
        CompletionClient::new(base_url),
    )
}

/// Frame-loop stand-in: poll until the call in flight lands.
pub async fn settle(app: &mut App) {
    for _ in 0..500 {
        app.poll_completion();
        if !app.is_busy() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("completion never arrived");
}

/// A port with nothing listening on it.
pub fn refused_base_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind ephemeral port");
    let port = listener.local_addr().expect("local addr").port();
    drop(listener);
    format!("http://127.0.0.1:{port}")
}

/// Render one frame and return the screen as text, one row per line.
pub fn render(app: &mut App, width: u16, height: u16) -> String {
    let mut terminal = Terminal::new(TestBackend::new(width, height)).expect("test terminal");
    terminal
        .draw(|frame| scribe_tui::draw(frame, app))
        .expect("draw");

    let buffer = terminal.backend().buffer();
    let mut out = String::new();
    for y in 0..buffer.area.height {
        for x in 0..buffer.area.width {
            out.push_str(buffer[(x, y)].symbol());
        }
        out.push('\n');
    }
    out
}
