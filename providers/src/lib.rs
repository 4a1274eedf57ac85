//! Completion Client for Scribe.
//!
//! # Architecture
//!
//! - [`CompletionClient::complete`] - the single outbound call. It takes the
//!   [`Settings`] resolved for this run and the [`PromptPair`] built for it, and
//!   always returns a [`CompletionOutcome`].
//! - [`openai`] - Chat Completions request/response wire types.
//!
//! # Error Handling
//!
//! Every failure (transport, non-2xx status, undecodable body) is a
//! [`CompletionError`] internally and is folded into
//! [`CompletionOutcome::Failure`] at the public boundary. Nothing is retried.

pub mod openai;

use std::sync::OnceLock;
use std::time::{Duration, Instant};

use scribe_types::{CompletionOutcome, PromptPair, Settings};

pub use scribe_types;

use openai::{CHAT_COMPLETIONS_PATH, ChatRequest, parse_completion, parse_error_message};

const CONNECT_TIMEOUT_SECS: u64 = 30;
const TCP_KEEPALIVE_SECS: u64 = 60;
const MAX_ERROR_BODY_BYTES: usize = 32 * 1024;

#[derive(Debug, thiserror::Error)]
pub enum CompletionError {
    #[error("no API key configured")]
    MissingApiKey,
    #[error("request failed: {}", error_chain(.0))]
    Transport(#[source] reqwest::Error),
    #[error("API error {status}: {message}")]
    Status {
        status: reqwest::StatusCode,
        message: String,
    },
    #[error("malformed response: {0}")]
    Decode(String),
    #[error("response contained no choices")]
    EmptyChoices,
}

/// Render an error with its full `source()` chain, so transport failures say
/// *why* (e.g. "Connection refused") and not only which URL failed.
fn error_chain(err: &(dyn std::error::Error + 'static)) -> String {
    let mut out = err.to_string();
    let mut source = err.source();
    while let Some(inner) = source {
        let text = inner.to_string();
        if !out.contains(&text) {
            out.push_str(": ");
            out.push_str(&text);
        }
        source = inner.source();
    }
    out
}

/// Shared hardened client for HTTPS endpoints.
pub fn http_client() -> &'static reqwest::Client {
    static CLIENT: OnceLock<reqwest::Client> = OnceLock::new();
    CLIENT.get_or_init(|| {
        base_client_builder()
            .https_only(true)
            .build()
            .unwrap_or_else(|e| {
                tracing::error!("Failed to build hardened HTTP client: {e}. Using defaults.");
                reqwest::Client::new()
            })
    })
}

fn base_client_builder() -> reqwest::ClientBuilder {
    reqwest::Client::builder()
        .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
        .redirect(reqwest::redirect::Policy::none())
        .tcp_keepalive(Some(Duration::from_secs(TCP_KEEPALIVE_SECS)))
        .user_agent(concat!("scribe/", env!("CARGO_PKG_VERSION")))
}

/// Client for one Chat Completions endpoint.
///
/// Cheap to clone; clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct CompletionClient {
    endpoint: String,
    http: reqwest::Client,
}

impl CompletionClient {
    /// `base_url` is the API origin, e.g. `https://api.openai.com`.
    ///
    /// HTTPS origins share [`http_client`]. Plain HTTP origins (local gateways,
    /// test servers) get their own client without the https-only guard.
    #[must_use]
    pub fn new(base_url: &str) -> Self {
        let base = base_url.trim().trim_end_matches('/');
        let endpoint = format!("{base}{CHAT_COMPLETIONS_PATH}");

        let http = if base.starts_with("https://") {
            http_client().clone()
        } else {
            tracing::warn!(base_url = %base, "Using a non-HTTPS completion endpoint");
            base_client_builder().build().unwrap_or_else(|e| {
                tracing::error!("Failed to build HTTP client: {e}. Using defaults.");
                reqwest::Client::new()
            })
        };

        Self { endpoint, http }
    }

    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Issue the completion call. Never fails: errors become
    /// [`CompletionOutcome::Failure`] carrying the error detail.
    pub async fn complete(&self, settings: &Settings, prompt: &PromptPair) -> CompletionOutcome {
        let started = Instant::now();
        let result = self.try_complete(settings, prompt).await;
        let elapsed_ms = started.elapsed().as_millis() as u64;

        match result {
            Ok(text) => {
                tracing::info!(
                    model = %settings.model,
                    temperature = %settings.temperature,
                    elapsed_ms,
                    chars = text.len(),
                    "Completion succeeded"
                );
                CompletionOutcome::Success(text)
            }
            Err(e) => {
                tracing::warn!(
                    model = %settings.model,
                    elapsed_ms,
                    "Completion failed: {e}"
                );
                CompletionOutcome::Failure(e.to_string())
            }
        }
    }

    async fn try_complete(
        &self,
        settings: &Settings,
        prompt: &PromptPair,
    ) -> Result<String, CompletionError> {
        let api_key = settings
            .api_key
            .as_ref()
            .ok_or(CompletionError::MissingApiKey)?;

        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(api_key.as_str())
            .json(&ChatRequest::new(settings, prompt))
            .send()
            .await
            .map_err(CompletionError::Transport)?;

        let status = response.status();
        if !status.is_success() {
            let body = read_capped_error_body(response).await;
            let message = parse_error_message(&body).unwrap_or(body);
            return Err(CompletionError::Status { status, message });
        }

        let body = response.text().await.map_err(CompletionError::Transport)?;
        parse_completion(&body)
    }
}

async fn read_capped_error_body(mut response: reqwest::Response) -> String {
    let mut body = Vec::new();
    loop {
        match response.chunk().await {
            Ok(Some(chunk)) => {
                body.extend_from_slice(&chunk);
                if body.len() > MAX_ERROR_BODY_BYTES {
                    body.truncate(MAX_ERROR_BODY_BYTES);
                    let text = String::from_utf8_lossy(&body);
                    return format!("{text}...(truncated)");
                }
            }
            Ok(None) => break,
            Err(e) => {
                tracing::debug!(
                    read_bytes = body.len(),
                    "Error body read ended early: {}",
                    error_chain(&e)
                );
                break;
            }
        }
    }
    String::from_utf8_lossy(&body).trim().to_string()
}
