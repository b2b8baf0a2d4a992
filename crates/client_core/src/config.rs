use std::{collections::HashMap, env, fs};

use serde::Deserialize;
use tracing::warn;
use url::Url;

/// Client settings: defaults, overridden by an optional `console.toml`,
/// overridden in turn by environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub api_url: String,
    pub session_path: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:5000".into(),
            session_path: "./data/session.json".into(),
        }
    }
}

pub fn load_settings() -> Settings {
    let mut settings = Settings::default();

    if let Ok(raw) = fs::read_to_string("console.toml") {
        apply_file_config(&mut settings, &raw);
    }

    apply_env_overrides(&mut settings, |key| env::var(key).ok());

    settings.api_url = normalize_api_url(&settings.api_url);
    settings
}

fn apply_file_config(settings: &mut Settings, raw: &str) {
    if let Ok(file_cfg) = toml::from_str::<HashMap<String, String>>(raw) {
        if let Some(v) = file_cfg.get("api_url") {
            settings.api_url = v.clone();
        }
        if let Some(v) = file_cfg.get("session_path") {
            settings.session_path = v.clone();
        }
    }
}

fn apply_env_overrides(settings: &mut Settings, get: impl Fn(&str) -> Option<String>) {
    if let Some(v) = get("QUIZ_API_URL") {
        settings.api_url = v;
    }
    if let Some(v) = get("QUIZ_SESSION_PATH") {
        settings.session_path = v;
    }
}

/// Accepts only an absolute http(s) URL and strips any trailing slash so
/// endpoint paths can be appended verbatim. Anything unparsable falls back
/// to the default.
fn normalize_api_url(raw: &str) -> String {
    let raw = raw.trim();
    match Url::parse(raw) {
        Ok(url) if url.scheme() == "http" || url.scheme() == "https" => {
            raw.trim_end_matches('/').to_string()
        }
        _ => {
            warn!(api_url = raw, "ignoring invalid api url, using default");
            Settings::default().api_url
        }
    }
}
