//! Settings layering from file to form to request.

use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use scribe_config::{EnvOverrides, InitialSettings, ScribeConfig};
use scribe_engine::{App, Focus, Step};

use crate::common::{CHAT_PATH, settle};

fn write_config(dir: &tempfile::TempDir, base_url: &str) -> ScribeConfig {
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        format!(
            r#"
            [app]
            model = "gpt-4o-mini"
            temperature = 0.2

            [api_keys]
            openai = "sk-from-file"

            [openai]
            base_url = "{base_url}"
            "#
        ),
    )
    .unwrap();
    ScribeConfig::load_from(&path).unwrap().unwrap()
}

async fn mount_reply(server: &MockServer, expected: serde_json::Value, key: &str) {
    Mock::given(method("POST"))
        .and(path(CHAT_PATH))
        .and(header("authorization", format!("Bearer {key}").as_str()))
        .and(body_partial_json(expected))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"choices": [{"message": {"content": "Neutral"}}]})),
        )
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn config_file_settings_reach_the_request() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(&dir, &server.uri());

    mount_reply(
        &server,
        json!({"model": "gpt-4o-mini", "temperature": 0.2}),
        "sk-from-file",
    )
    .await;

    let initial = InitialSettings::resolve(Some(&config), &EnvOverrides::default());
    let mut app = App::new(&initial);
    app.set_focus(Focus::Input);
    app.insert_str("The chair is brown.");
    app.run();
    settle(&mut app).await;

    assert_eq!(app.result_text().as_deref(), Some("Neutral"));
}

#[tokio::test]
async fn form_edits_override_every_lower_layer() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(&dir, &server.uri());

    mount_reply(
        &server,
        json!({"model": "gpt-4o", "temperature": 0.4}),
        "sk-typed",
    )
    .await;

    let env = EnvOverrides {
        api_key: Some("sk-from-env".to_string()),
        ..EnvOverrides::default()
    };
    let initial = InitialSettings::resolve(Some(&config), &env);
    assert_eq!(initial.api_key, "sk-from-env");

    let mut app = App::new(&initial);
    app.set_focus(Focus::ApiKey);
    app.clear_field();
    app.insert_str("sk-typed");
    app.set_focus(Focus::Model);
    app.clear_field();
    app.insert_str("gpt-4o");
    app.set_focus(Focus::Temperature);
    app.adjust(Step::Next);
    app.adjust(Step::Next);

    app.set_focus(Focus::Input);
    app.insert_str("The chair is brown.");
    app.run();
    settle(&mut app).await;

    assert_eq!(app.result_text().as_deref(), Some("Neutral"));
}

#[test]
fn broken_config_file_is_an_error_not_a_panic() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "temperature = = 1").unwrap();

    let err = ScribeConfig::load_from(&path).unwrap_err();
    assert!(err.to_string().contains("config.toml"), "{err}");
}
