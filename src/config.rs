//! Runtime configuration
//!
//! Resolution order, later wins: built-in defaults, YAML file,
//! `MARMITE_*` environment variables, command-line flags (applied by the
//! binary).

use serde::Deserialize;
use std::fmt::Display;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::nutrition::OPEN_FOOD_FACTS_URL;

pub const ENV_DB: &str = "MARMITE_DB";
pub const ENV_OFF_URL: &str = "MARMITE_OFF_URL";
pub const ENV_HTTP_TIMEOUT_MS: &str = "MARMITE_HTTP_TIMEOUT_MS";
pub const ENV_SEARCH_LIMIT: &str = "MARMITE_SEARCH_LIMIT";
pub const ENV_USER: &str = "MARMITE_USER";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config file: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// SQLite database file
    pub db_path: PathBuf,
    /// Base URL of the Open Food Facts instance
    pub off_url: String,
    /// Timeout for external nutrition lookups
    pub http_timeout_ms: u64,
    /// Default number of ingredient suggestions
    pub search_limit: usize,
    /// Acting user for the CLI and MCP server
    pub user: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            off_url: OPEN_FOOD_FACTS_URL.to_string(),
            http_timeout_ms: 3000,
            search_limit: 10,
            user: None,
        }
    }
}

impl Config {
    /// Load from `path` (or the default config file when present), then
    /// apply environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => match default_config_path().filter(|p| p.exists()) {
                Some(path) => Self::from_file(&path)?,
                None => Self::default(),
            },
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        info!(path = %path.display(), "loaded config file");
        Self::from_yaml_str(&text)
    }

    pub fn from_yaml_str(text: &str) -> Result<Self, ConfigError> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(text)?)
    }

    /// Override fields from `MARMITE_*` variables looked up through `lookup`.
    pub fn apply_env(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        if let Some(db) = lookup(ENV_DB) {
            self.db_path = PathBuf::from(db);
        }
        if let Some(url) = lookup(ENV_OFF_URL) {
            self.off_url = url;
        }
        if let Some(ms) = parse_var(&lookup, ENV_HTTP_TIMEOUT_MS)? {
            self.http_timeout_ms = ms;
        }
        if let Some(limit) = parse_var(&lookup, ENV_SEARCH_LIMIT)? {
            self.search_limit = limit;
        }
        if let Some(user) = lookup(ENV_USER) {
            self.user = Some(user);
        }
        Ok(())
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_millis(self.http_timeout_ms)
    }
}

fn parse_var<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
) -> Result<Option<T>, ConfigError>
where
    T::Err: Display,
{
    let Some(raw) = lookup(key) else {
        debug!("{key} not set, keeping configured value");
        return Ok(None);
    };
    raw.trim().parse().map(Some).map_err(|e: T::Err| {
        warn!("Invalid {key} value: {e}");
        ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        }
    })
}

/// `<data dir>/marmite/marmite.db`
pub fn default_db_path() -> PathBuf {
    let data_dir = dirs::data_dir()
        .unwrap_or_else(|| dirs::home_dir().unwrap_or_default().join(".local/share"));
    data_dir.join("marmite").join("marmite.db")
}

/// `<config dir>/marmite/config.yaml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("marmite").join("config.yaml"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults() {
        let config = Config::default();
        assert_eq!(config.off_url, OPEN_FOOD_FACTS_URL);
        assert_eq!(config.search_limit, 10);
        assert_eq!(config.http_timeout(), Duration::from_secs(3));
        assert!(config.db_path.ends_with("marmite/marmite.db"));
    }

    #[test]
    fn yaml_overrides_some_fields() {
        let config = Config::from_yaml_str("search_limit: 5\nuser: alice\n").unwrap();
        assert_eq!(config.search_limit, 5);
        assert_eq!(config.user.as_deref(), Some("alice"));
        assert_eq!(config.http_timeout_ms, 3000);
    }

    #[test]
    fn empty_yaml_is_default() {
        assert_eq!(Config::from_yaml_str("  \n").unwrap(), Config::default());
    }

    #[test]
    fn bad_yaml_is_rejected() {
        assert!(matches!(
            Config::from_yaml_str("search_limit: lots"),
            Err(ConfigError::Yaml(_))
        ));
    }

    #[test]
    fn env_overrides_yaml() {
        let mut config = Config::from_yaml_str("search_limit: 5").unwrap();
        config
            .apply_env(env(&[
                (ENV_SEARCH_LIMIT, "8"),
                (ENV_DB, "/tmp/m.db"),
                (ENV_HTTP_TIMEOUT_MS, " 250 "),
            ]))
            .unwrap();
        assert_eq!(config.search_limit, 8);
        assert_eq!(config.db_path, PathBuf::from("/tmp/m.db"));
        assert_eq!(config.http_timeout_ms, 250);
    }

    #[test]
    fn invalid_env_value_is_an_error() {
        let mut config = Config::default();
        let err = config
            .apply_env(env(&[(ENV_HTTP_TIMEOUT_MS, "soon")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref key, .. } if key == ENV_HTTP_TIMEOUT_MS));
    }

    #[test]
    fn from_file_reads_yaml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "off_url: http://localhost:8080\n").unwrap();
        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.off_url, "http://localhost:8080");

        let missing = Config::from_file(&dir.path().join("nope.yaml"));
        assert!(matches!(missing, Err(ConfigError::Io { .. })));
    }
}
