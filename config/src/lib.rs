//! Settings Provider for Scribe.
//!
//! Resolves the initial values of the settings form by layering, in increasing
//! priority:
//!
//! 1. Built-in defaults ([`DEFAULT_MODEL`], [`Temperature::DEFAULT`])
//! 2. The optional settings file `~/.scribe/config.toml`
//! 3. Environment variables (`OPENAI_API_KEY`, `OPENAI_MODEL`, `SCRIBE_API_BASE_URL`),
//!    including anything loaded from `.env.local` / `.env`
//!
//! The form itself is the fourth and highest layer; it lives in the engine.
//!
//! This crate never writes anything. API keys stay in memory for the session.

use serde::Deserialize;
use std::{
    env,
    path::{Path, PathBuf},
};

use scribe_types::{DEFAULT_MODEL, Temperature, ui::UiOptions};

pub const API_KEY_ENV: &str = "OPENAI_API_KEY";
pub const MODEL_ENV: &str = "OPENAI_MODEL";
pub const BASE_URL_ENV: &str = "SCRIBE_API_BASE_URL";

/// Canonical API origin. The client appends `/v1/chat/completions`.
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com";

const ENV_FILES: [&str; 2] = [".env.local", ".env"];

#[derive(Debug, Default, Deserialize)]
pub struct ScribeConfig {
    pub app: Option<AppConfig>,
    pub api_keys: Option<ApiKeys>,
    pub openai: Option<OpenAIConfig>,
}

/// ```toml
/// [app]
/// model = "gpt-4o-mini"
/// temperature = 0.5
/// ascii_only = false
/// high_contrast = false
/// ```
#[derive(Debug, Default, Deserialize)]
pub struct AppConfig {
    pub model: Option<String>,
    pub temperature: Option<f64>,
    /// Use ASCII-only glyphs for icons and spinners.
    #[serde(default)]
    pub ascii_only: bool,
    /// Enable a high-contrast color palette.
    #[serde(default)]
    pub high_contrast: bool,
}

#[derive(Default, Deserialize)]
pub struct ApiKeys {
    pub openai: Option<String>,
}

// Manual Debug impl to prevent leaking API keys in logs.
impl std::fmt::Debug for ApiKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let openai = if self.openai.is_some() {
            "[REDACTED]"
        } else {
            "None"
        };
        f.debug_struct("ApiKeys").field("openai", &openai).finish()
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct OpenAIConfig {
    /// Origin of a Chat Completions compatible endpoint.
    pub base_url: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

impl ScribeConfig {
    /// Load `~/.scribe/config.toml`. A missing file is `Ok(None)`.
    pub fn load() -> Result<Option<Self>, ConfigError> {
        match config_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(None),
        }
    }

    pub fn load_from(path: &Path) -> Result<Option<Self>, ConfigError> {
        if !path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(path).map_err(|source| {
            tracing::warn!("Failed to read config at {}: {}", path.display(), source);
            ConfigError::Read {
                path: path.to_path_buf(),
                source,
            }
        })?;

        let config = toml::from_str(&content).map_err(|source| {
            tracing::warn!("Failed to parse config at {}: {}", path.display(), source);
            ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            }
        })?;
        Ok(Some(config))
    }

    #[must_use]
    pub fn path() -> Option<PathBuf> {
        config_path()
    }

    #[must_use]
    pub fn ui_options(&self) -> UiOptions {
        self.app
            .as_ref()
            .map(|app| UiOptions {
                ascii_only: app.ascii_only,
                high_contrast: app.high_contrast,
            })
            .unwrap_or_default()
    }
}

pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".scribe").join("config.toml"))
}

/// Expand `${VAR}` references from the process environment.
/// Unset variables expand to nothing; an unclosed `${` is kept literally.
pub fn expand_env_vars(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut rest = value;

    while let Some(start) = rest.find("${") {
        let Some(len) = rest[start + 2..].find('}') else {
            break;
        };
        out.push_str(&rest[..start]);
        let name = &rest[start + 2..start + 2 + len];
        if !name.is_empty() {
            out.push_str(&env::var(name).unwrap_or_default());
        }
        rest = &rest[start + 2 + len + 1..];
    }

    out.push_str(rest);
    out
}

/// Load the first of `.env.local` / `.env` found in `dir` into the process
/// environment. Existing variables are not overridden.
///
/// Returns the loaded path, if any. Parse failures are logged and skipped.
pub fn load_dotenv(dir: &Path) -> Option<PathBuf> {
    for name in ENV_FILES {
        let path = dir.join(name);
        if !path.exists() {
            continue;
        }
        match dotenvy::from_path(&path) {
            Ok(()) => {
                tracing::info!(path = %path.display(), "Loaded environment file");
                return Some(path);
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), "Failed to load environment file: {e}");
                return None;
            }
        }
    }
    None
}

/// Values read from the process environment.
#[derive(Default, Clone)]
pub struct EnvOverrides {
    pub api_key: Option<String>,
    pub model: Option<String>,
    pub base_url: Option<String>,
}

impl EnvOverrides {
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            api_key: env::var(API_KEY_ENV).ok(),
            model: env::var(MODEL_ENV).ok(),
            base_url: env::var(BASE_URL_ENV).ok(),
        }
    }
}

impl std::fmt::Debug for EnvOverrides {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EnvOverrides")
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .finish()
    }
}

/// Initial contents of the settings form, before any user edit.
#[derive(Clone)]
pub struct InitialSettings {
    pub api_key: String,
    pub model: String,
    pub temperature: Temperature,
    pub base_url: String,
    pub ui: UiOptions,
}

impl std::fmt::Debug for InitialSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InitialSettings")
            .field("api_key", &if self.api_key.is_empty() { "" } else { "[REDACTED]" })
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("base_url", &self.base_url)
            .field("ui", &self.ui)
            .finish()
    }
}

impl InitialSettings {
    /// Layer defaults, the settings file, and the environment.
    ///
    /// Blank values never mask a lower layer.
    #[must_use]
    pub fn resolve(file: Option<&ScribeConfig>, env: &EnvOverrides) -> Self {
        let app = file.and_then(|cfg| cfg.app.as_ref());

        let file_key = file
            .and_then(|cfg| cfg.api_keys.as_ref())
            .and_then(|keys| keys.openai.as_deref())
            .map(expand_env_vars);
        let api_key = pick([env.api_key.clone(), file_key]).unwrap_or_default();

        let model = pick([
            env.model.clone(),
            app.and_then(|app| app.model.clone()),
        ])
        .unwrap_or_else(|| DEFAULT_MODEL.to_string());

        let temperature = match app.and_then(|app| app.temperature) {
            Some(raw) => {
                let clamped = Temperature::new(raw);
                if (clamped.value() - raw).abs() > 0.05 {
                    tracing::warn!(
                        requested = raw,
                        applied = %clamped,
                        "Config temperature outside [0.0, 1.0]; clamped"
                    );
                }
                clamped
            }
            None => Temperature::DEFAULT,
        };

        let base_url = pick([
            env.base_url.clone(),
            file.and_then(|cfg| cfg.openai.as_ref())
                .and_then(|openai| openai.base_url.clone()),
        ])
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        Self {
            api_key,
            model,
            temperature,
            base_url,
            ui: file.map(ScribeConfig::ui_options).unwrap_or_default(),
        }
    }
}

/// First non-blank candidate, trimmed.
fn pick<const N: usize>(candidates: [Option<String>; N]) -> Option<String> {
    candidates
        .into_iter()
        .flatten()
        .map(|value| value.trim().to_string())
        .find(|value| !value.is_empty())
}
