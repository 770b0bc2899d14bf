use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use serde::Deserialize;
use thiserror::Error;
use url::Url;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8080";
pub const DEFAULT_JIRA_PROJECT_KEY: &str = "SASS";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_SETTINGS_FILE: &str = "goinsight.toml";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings file '{path}': {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid settings file '{path}': {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("invalid api base url '{value}': {reason}")]
    InvalidBaseUrl { value: String, reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub api_base_url: String,
    pub jira_project_key: String,
    pub request_timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.into(),
            jira_project_key: DEFAULT_JIRA_PROJECT_KEY.into(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    api_base_url: Option<String>,
    jira_project_key: Option<String>,
    request_timeout_secs: Option<u64>,
}

impl Settings {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Parsed base URL; only http and https are accepted.
    pub fn base_url(&self) -> Result<Url, SettingsError> {
        let invalid = |reason: String| SettingsError::InvalidBaseUrl {
            value: self.api_base_url.clone(),
            reason,
        };
        let url = Url::parse(self.api_base_url.trim()).map_err(|err| invalid(err.to_string()))?;
        match url.scheme() {
            "http" | "https" => Ok(url),
            other => Err(invalid(format!("unsupported scheme '{other}'"))),
        }
    }

    /// Overlay values from a TOML document. Missing or blank keys keep the current value.
    pub fn merge_toml(&mut self, raw: &str, path: &Path) -> Result<(), SettingsError> {
        let file_cfg: FileSettings = toml::from_str(raw).map_err(|source| SettingsError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        if let Some(v) = non_blank(file_cfg.api_base_url) {
            self.api_base_url = v;
        }
        if let Some(v) = non_blank(file_cfg.jira_project_key) {
            self.jira_project_key = v;
        }
        if let Some(v) = file_cfg.request_timeout_secs.filter(|secs| *secs > 0) {
            self.request_timeout_secs = v;
        }
        Ok(())
    }

    /// Overlay environment values. `APP__`-prefixed names win over the bare ones.
    pub fn merge_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let pick = |names: &[&str]| {
            names
                .iter()
                .rev()
                .find_map(|name| non_blank(lookup(name)))
        };

        if let Some(v) = pick(&["API_BASE_URL", "APP__API_BASE_URL"]) {
            self.api_base_url = v;
        }
        if let Some(v) = pick(&["JIRA_PROJECT_KEY", "APP__JIRA_PROJECT_KEY"]) {
            self.jira_project_key = v;
        }
        if let Some(v) = pick(&["APP__REQUEST_TIMEOUT_SECS"]) {
            if let Ok(parsed) = v.parse::<u64>() {
                if parsed > 0 {
                    self.request_timeout_secs = parsed;
                }
            }
        }
    }
}

/// Defaults, then the settings file (explicit path or `goinsight.toml` when present), then the
/// process environment.
pub fn load_settings(path: Option<&Path>) -> Result<Settings, SettingsError> {
    let mut settings = Settings::default();

    let (path, required) = match path {
        Some(path) => (path.to_path_buf(), true),
        None => (PathBuf::from(DEFAULT_SETTINGS_FILE), false),
    };

    match fs::read_to_string(&path) {
        Ok(raw) => settings.merge_toml(&raw, &path)?,
        Err(err) if !required && err.kind() == std::io::ErrorKind::NotFound => {}
        Err(source) => return Err(SettingsError::Read { path, source }),
    }

    settings.merge_env(|name| std::env::var(name).ok());
    settings.base_url()?;
    Ok(settings)
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn defaults_match_documented_fallbacks() {
        let settings = Settings::default();
        assert_eq!(settings.api_base_url, "http://localhost:8080");
        assert_eq!(settings.jira_project_key, "SASS");
        assert_eq!(settings.request_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn file_values_override_defaults_and_blank_keys_are_ignored() {
        let mut settings = Settings::default();
        settings
            .merge_toml(
                "api_base_url = \"https://insight.example.com\"\njira_project_key = \"  \"\n",
                Path::new("goinsight.toml"),
            )
            .expect("merge");
        assert_eq!(settings.api_base_url, "https://insight.example.com");
        assert_eq!(settings.jira_project_key, "SASS");
    }

    #[test]
    fn malformed_file_is_reported() {
        let mut settings = Settings::default();
        let err = settings
            .merge_toml("api_base_url = ", Path::new("broken.toml"))
            .expect_err("should fail");
        assert!(matches!(err, SettingsError::Parse { .. }));
    }

    #[test]
    fn prefixed_env_wins_over_bare_name() {
        let vars = env(&[
            ("API_BASE_URL", "http://bare:1"),
            ("APP__API_BASE_URL", "http://prefixed:2"),
            ("JIRA_PROJECT_KEY", "OPS"),
            ("APP__REQUEST_TIMEOUT_SECS", "5"),
        ]);
        let mut settings = Settings::default();
        settings.merge_env(|name| vars.get(name).cloned());

        assert_eq!(settings.api_base_url, "http://prefixed:2");
        assert_eq!(settings.jira_project_key, "OPS");
        assert_eq!(settings.request_timeout_secs, 5);
    }

    #[test]
    fn unparsable_timeout_keeps_default() {
        let vars = env(&[("APP__REQUEST_TIMEOUT_SECS", "soon")]);
        let mut settings = Settings::default();
        settings.merge_env(|name| vars.get(name).cloned());
        assert_eq!(settings.request_timeout_secs, DEFAULT_REQUEST_TIMEOUT_SECS);
    }

    #[test]
    fn base_url_rejects_non_http_schemes() {
        let settings = Settings {
            api_base_url: "ftp://files.example.com".into(),
            ..Settings::default()
        };
        assert!(matches!(
            settings.base_url(),
            Err(SettingsError::InvalidBaseUrl { .. })
        ));
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let err = load_settings(Some(Path::new("/nonexistent/goinsight.toml")))
            .expect_err("should fail");
        assert!(matches!(err, SettingsError::Read { .. }));
    }
}
