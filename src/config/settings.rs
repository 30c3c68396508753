//! Configuration settings for Scout.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub http: HttpSettings,
    pub web_search: WebSearchSettings,
    pub scholar: ScholarSettings,
    pub responder: ResponderSettings,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            log_level: "warn".to_string(),
        }
    }
}

/// Settings shared by every outbound provider request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpSettings {
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
    /// User agent sent with every request.
    pub user_agent: String,
    /// Retries after the first attempt for transient failures.
    pub max_retries: u32,
    /// Delay before the first retry, in milliseconds.
    pub initial_backoff_ms: u64,
    /// Upper bound for any single retry delay, in milliseconds.
    pub max_backoff_ms: u64,
    /// Exponential factor applied per attempt.
    pub backoff_multiplier: f64,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            user_agent: concat!("scout/", env!("CARGO_PKG_VERSION")).to_string(),
            max_retries: 3,
            initial_backoff_ms: 500,
            max_backoff_ms: 30_000,
            backoff_multiplier: 2.0,
        }
    }
}

impl HttpSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Web search backend settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WebSearchSettings {
    /// DuckDuckGo HTML endpoint.
    pub endpoint: String,
    /// Number of results when the caller does not ask for a count.
    pub default_results: usize,
}

impl Default for WebSearchSettings {
    fn default() -> Self {
        Self {
            endpoint: "https://html.duckduckgo.com/html/".to_string(),
            default_results: 5,
        }
    }
}

/// Google Scholar (via SerpAPI) settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScholarSettings {
    /// SerpAPI search endpoint.
    pub endpoint: String,
    /// SerpAPI key. Falls back to the SERPAPI_API_KEY environment variable.
    pub api_key: Option<String>,
    /// Results requested per page (Google Scholar caps this at 20).
    pub page_size: usize,
}

impl Default for ScholarSettings {
    fn default() -> Self {
        Self {
            endpoint: "https://serpapi.com/search.json".to_string(),
            api_key: None,
            page_size: 20,
        }
    }
}

impl ScholarSettings {
    /// Resolve the API key from config or environment.
    pub fn resolved_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .filter(|k| !k.is_empty())
            .or_else(|| std::env::var("SERPAPI_API_KEY").ok())
            .filter(|k| !k.is_empty())
    }
}

/// Canned-answer table for the static responder.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ResponderSettings {
    /// Answer returned for any question not in the table.
    pub fallback: String,
    /// Exact question to answer mapping.
    pub answers: BTreeMap<String, String>,
}

impl Default for ResponderSettings {
    fn default() -> Self {
        let answers = [
            (
                "Hi! Tell me something about George Mason NLP group!",
                "The George Mason NLP group focuses on research in natural language processing and machine learning, aiming to improve the way computers understand human language.",
            ),
            (
                "Who is/are leading the group?",
                "The group is led by several faculty members, including prominent researchers in the field of NLP.",
            ),
            (
                "Who is/are leading George Mason NLP group?",
                "The NLP group at George Mason University is led by distinguished faculty members with a strong background in natural language processing and computational linguistics.",
            ),
            (
                "Find papers written by Ziyu Yao at George Mason University",
                "Ziyu Yao has authored numerous papers on topics related to natural language processing and machine learning. For the most up-to-date list, please refer to academic databases.",
            ),
        ]
        .into_iter()
        .map(|(q, a)| (q.to_string(), a.to_string()))
        .collect();

        Self {
            fallback: "Sorry, I don't have information on that.".to_string(),
            answers,
        }
    }
}

impl Settings {
    /// Load settings from the default configuration file.
    pub fn load() -> crate::error::Result<Self> {
        Self::load_from(None)
    }

    /// Load settings from a specific path, or default location if None.
    pub fn load_from(path: Option<&PathBuf>) -> crate::error::Result<Self> {
        let config_path = match path {
            Some(p) => Self::expand_path(&p.to_string_lossy()),
            None => Self::default_config_path(),
        };

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let settings: Settings = toml::from_str(&content)?;
            Ok(settings)
        } else {
            Ok(Settings::default())
        }
    }

    /// Save settings to the default configuration file.
    pub fn save(&self) -> crate::error::Result<()> {
        self.save_to(&Self::default_config_path())
    }

    /// Save settings to a specific path.
    pub fn save_to(&self, path: &PathBuf) -> crate::error::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| crate::error::ScoutError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get the default configuration file path.
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("scout")
            .join("config.toml")
    }

    /// Expand shell variables in paths (e.g., ~).
    pub fn expand_path(path: &str) -> PathBuf {
        PathBuf::from(shellexpand::tilde(path).to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let settings: Settings = toml::from_str(
            r#"
            [http]
            max_retries = 1

            [scholar]
            api_key = "abc"
            "#,
        )
        .unwrap();

        assert_eq!(settings.http.max_retries, 1);
        assert_eq!(settings.http.timeout_secs, 30);
        assert_eq!(settings.scholar.resolved_api_key().as_deref(), Some("abc"));
        assert_eq!(settings.web_search.default_results, 5);
        assert_eq!(settings.responder.answers.len(), 4);
    }

    #[test]
    fn test_responder_table_override() {
        let settings: Settings = toml::from_str(
            r#"
            [responder]
            fallback = "no idea"

            [responder.answers]
            "ping?" = "pong"
            "#,
        )
        .unwrap();

        assert_eq!(settings.responder.fallback, "no idea");
        assert_eq!(settings.responder.answers.len(), 1);
        assert_eq!(settings.responder.answers["ping?"], "pong");
    }

    #[test]
    fn test_save_and_load_roundtrip_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut settings = Settings::default();
        settings.web_search.default_results = 9;
        settings.save_to(&path).unwrap();

        let loaded = Settings::load_from(Some(&path)).unwrap();
        assert_eq!(loaded.web_search.default_results, 9);
        assert_eq!(loaded.responder.fallback, settings.responder.fallback);
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");
        let settings = Settings::load_from(Some(&path)).unwrap();
        assert_eq!(settings.scholar.page_size, 20);
    }
}
