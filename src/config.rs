use serde::{Deserialize, Serialize};
use std::fs;
use std::env;
use anyhow::{Result, Context};

use crate::models::ViewMode;
use crate::sort::SortKey;

pub const CONFIG_PATH: &str = "data/config.yaml";

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Config {
    #[serde(default = "default_search_delay_ms")]
    pub search_delay_ms: u64,
    #[serde(default = "default_tracing_level")]
    pub tracing_level: String,
    #[serde(default)]
    pub default_sort: SortKey,
    #[serde(default)]
    pub default_view: ViewMode,
    /// Base URL of a search backend; the built-in sample listings are used when unset
    #[serde(default)]
    pub remote_url: Option<String>,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_search_delay_ms() -> u64 {
    1000 // simulated network round trip
}

fn default_tracing_level() -> String {
    "info".to_string()
}

fn default_user_agent() -> String {
    concat!("colocsearch/", env!("CARGO_PKG_VERSION")).to_string()
}

fn default_request_timeout_secs() -> u64 {
    30
}

impl Default for Config {
    fn default() -> Self {
        Config {
            search_delay_ms: default_search_delay_ms(),
            tracing_level: default_tracing_level(),
            default_sort: SortKey::default(),
            default_view: ViewMode::default(),
            remote_url: None,
            user_agent: default_user_agent(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl Config {
    /// Loads `data/config.yaml` if present, then applies environment overrides.
    pub fn load() -> Result<Self> {
        Self::load_from(CONFIG_PATH)
    }

    pub fn load_from(path: &str) -> Result<Self> {
        let config: Config = match fs::read_to_string(path) {
            Ok(config_str) => serde_yaml::from_str(&config_str)
                .with_context(|| format!("Failed to parse {}", path))?,
            Err(_) => Config::default(),
        };

        config.with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Result<Self> {
        if let Ok(delay) = env::var("SEARCH_DELAY_MS") {
            self.search_delay_ms = delay.parse()
                .context("Failed to parse SEARCH_DELAY_MS environment variable")?;
        }

        if let Ok(tracing_level) = env::var("TRACING_LEVEL") {
            self.tracing_level = tracing_level;
        }

        if let Ok(sort) = env::var("DEFAULT_SORT") {
            self.default_sort = SortKey::from_name(&sort);
        }

        if let Ok(view) = env::var("DEFAULT_VIEW") {
            self.default_view = view.parse()
                .context("Failed to parse DEFAULT_VIEW environment variable")?;
        }

        if let Ok(remote_url) = env::var("REMOTE_URL") {
            let remote_url = remote_url.trim().to_string();
            self.remote_url = (!remote_url.is_empty()).then_some(remote_url);
        }

        if let Ok(user_agent) = env::var("USER_AGENT") {
            self.user_agent = user_agent;
        }

        if let Ok(timeout) = env::var("REQUEST_TIMEOUT_SECS") {
            self.request_timeout_secs = timeout.parse()
                .context("Failed to parse REQUEST_TIMEOUT_SECS environment variable")?;
        }

        if self.request_timeout_secs == 0 {
            anyhow::bail!("request_timeout_secs must be greater than zero");
        }

        Ok(self)
    }

    pub fn create_default() -> Result<()> {
        std::fs::create_dir_all("data")?;

        let config_str = serde_yaml::to_string(&Config::default())?;
        fs::write(CONFIG_PATH, config_str)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_use_defaults() {
        let config: Config = serde_yaml::from_str("search_delay_ms: 250\n").unwrap();
        assert_eq!(config.search_delay_ms, 250);
        assert_eq!(config.tracing_level, "info");
        assert_eq!(config.default_sort, SortKey::Relevance);
        assert_eq!(config.default_view, ViewMode::Grid);
        assert_eq!(config.remote_url, None);
        assert_eq!(config.request_timeout_secs, 30);
    }

    #[test]
    fn test_parse_full_file() {
        let yaml = "\
search_delay_ms: 0
tracing_level: debug
default_sort: date
default_view: list
remote_url: http://localhost:8001
user_agent: test
request_timeout_secs: 5
";
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.default_sort, SortKey::Date);
        assert_eq!(config.default_view, ViewMode::List);
        assert_eq!(config.remote_url.as_deref(), Some("http://localhost:8001"));
    }

    #[test]
    fn test_default_round_trips_through_yaml() {
        let yaml = serde_yaml::to_string(&Config::default()).unwrap();
        let parsed: Config = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(parsed, Config::default());
    }

    #[test]
    fn test_invalid_yaml_is_an_error() {
        let dir = std::env::temp_dir().join(format!("colocsearch-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.yaml");
        std::fs::write(&path, "search_delay_ms: [not, a, number]\n").unwrap();

        let result = Config::load_from(path.to_str().unwrap());
        assert!(result.is_err());

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
