use crate::session::{Settings, RESULTS_PER_PAGE, SCROLL_THRESHOLD};
use crate::source::{RandomUserSource, DEFAULT_ENDPOINT};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default, rename_all = "kebab-case")]
pub struct Config {
    pub endpoint: String,
    pub results_per_page: usize,
    pub scroll_threshold: u32,
    pub pool_pages: usize,
    pub request_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            results_per_page: RESULTS_PER_PAGE,
            scroll_threshold: SCROLL_THRESHOLD,
            pool_pages: 1,
            request_timeout_secs: 10,
        }
    }
}

impl Config {
    /// Read a JSON config file; keys that are left out keep their defaults.
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config = serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        Ok(config)
    }

    pub fn settings(&self) -> Settings {
        Settings {
            results_per_page: self.results_per_page.max(1),
            scroll_threshold: self.scroll_threshold,
            pool_pages: self.pool_pages.max(1),
        }
    }

    pub fn source(&self) -> anyhow::Result<RandomUserSource> {
        let source = RandomUserSource::new(
            self.endpoint.clone(),
            Duration::from_secs(self.request_timeout_secs),
        )?;
        Ok(source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("profiledeck.json");
        std::fs::write(&path, r#"{ "pool-pages": 4, "endpoint": "http://localhost:9000/api/" }"#)
            .unwrap();

        let config = Config::from_file(&path).unwrap();

        assert_eq!(config.pool_pages, 4);
        assert_eq!(config.endpoint, "http://localhost:9000/api/");
        assert_eq!(config.results_per_page, 25);
        assert_eq!(config.settings().batch_size(), 100);
    }

    #[test]
    fn zero_page_size_is_clamped() {
        let config = Config {
            results_per_page: 0,
            ..Default::default()
        };
        assert_eq!(config.settings().results_per_page, 1);
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(Config::from_file("/definitely/not/here.json").is_err());
    }
}
