use std::{collections::HashMap, fs, path::PathBuf, time::Duration};

use anyhow::Context;
use client_core::{DateStyle, DEFAULT_API_BASE_URL, DEFAULT_DATE_FORMAT};
use url::Url;

pub const SETTINGS_FILE: &str = "admin.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub api_base_url: String,
    pub token_path: PathBuf,
    pub date_format: String,
    pub request_timeout_secs: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.into(),
            token_path: default_token_path(),
            date_format: DEFAULT_DATE_FORMAT.into(),
            request_timeout_secs: None,
        }
    }
}

impl Settings {
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
    }

    pub fn date_style(&self) -> anyhow::Result<DateStyle> {
        DateStyle::new(self.date_format.clone()).context("invalid date_format setting")
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        let url = Url::parse(&self.api_base_url)
            .with_context(|| format!("invalid api_base_url '{}'", self.api_base_url))?;
        if !matches!(url.scheme(), "http" | "https") {
            anyhow::bail!("api_base_url must use http or https, got '{}'", url.scheme());
        }
        self.date_style()?;
        Ok(())
    }
}

fn default_token_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("sneaker-admin")
        .join("token")
}

pub fn load_settings() -> Settings {
    let raw = fs::read_to_string(SETTINGS_FILE).ok();
    let env: HashMap<String, String> = std::env::vars().collect();
    resolve_settings(raw.as_deref(), &env)
}

/// Defaults, then the flat `admin.toml` keys, then environment overrides.
pub fn resolve_settings(file_contents: Option<&str>, env: &HashMap<String, String>) -> Settings {
    let mut settings = Settings::default();

    if let Some(raw) = file_contents {
        match toml::from_str::<HashMap<String, toml::Value>>(raw) {
            Ok(file_cfg) => apply_file_values(&mut settings, &file_cfg),
            Err(err) => tracing::warn!(error = %err, "config: ignoring unreadable {SETTINGS_FILE}"),
        }
    }

    if let Some(v) = env.get("ADMIN_API_BASE_URL") {
        settings.api_base_url = v.clone();
    }
    if let Some(v) = env.get("APP__API_BASE_URL") {
        settings.api_base_url = v.clone();
    }
    if let Some(v) = env.get("APP__TOKEN_PATH") {
        settings.token_path = PathBuf::from(v);
    }
    if let Some(v) = env.get("APP__DATE_FORMAT") {
        settings.date_format = v.clone();
    }
    if let Some(v) = env.get("APP__REQUEST_TIMEOUT_SECS") {
        if let Ok(parsed) = v.parse::<u64>() {
            settings.request_timeout_secs = Some(parsed);
        }
    }

    settings
}

fn apply_file_values(settings: &mut Settings, file_cfg: &HashMap<String, toml::Value>) {
    if let Some(v) = file_cfg.get("api_base_url").and_then(toml::Value::as_str) {
        settings.api_base_url = v.to_string();
    }
    if let Some(v) = file_cfg.get("token_path").and_then(toml::Value::as_str) {
        settings.token_path = PathBuf::from(v);
    }
    if let Some(v) = file_cfg.get("date_format").and_then(toml::Value::as_str) {
        settings.date_format = v.to_string();
    }
    if let Some(v) = file_cfg
        .get("request_timeout_secs")
        .and_then(toml::Value::as_integer)
    {
        settings.request_timeout_secs = u64::try_from(v).ok();
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
