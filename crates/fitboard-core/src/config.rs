//! Configuration for fitboard
//!
//! Where the modeling service lives and which datasets the catalog offers.
//! Loaded from TOML; JSON helpers are kept for embedding hosts.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use fitboard_io::Catalog;

use crate::error::ConfigError;

/// Environment variable naming an explicit config file
pub const CONFIG_ENV: &str = "FITBOARD_CONFIG";

/// Directory (relative to the working dir or home) holding `config.toml`
pub const CONFIG_DIR: &str = ".fitboard";

/// Top-level configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// Remote modeling service
    #[serde(default)]
    pub service: ServiceConfig,
    /// Static dataset catalog
    #[serde(default)]
    pub catalog: Catalog,
}

/// Modeling service settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Base URL; the model kind is appended as a path segment
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_base_url() -> String {
    "http://127.0.0.1:8080/d3mLm".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_user_agent() -> String {
    format!("fitboard/{}", env!("CARGO_PKG_VERSION"))
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

impl DashboardConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from a TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml_str).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Serialize configuration to TOML
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Load configuration from a JSON string
    pub fn from_json(json_str: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json_str).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Serialize configuration to JSON
    pub fn to_json(&self) -> Result<String, ConfigError> {
        serde_json::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Read and validate a TOML file
    ///
    /// A relative `data_dir` is taken relative to the file's directory.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(format!("{}: {}", path.display(), e)))?;
        let mut config = Self::from_toml(&text)?;
        if config.catalog.data_dir.is_relative() {
            if let Some(parent) = path.parent() {
                config.catalog.data_dir = parent.join(&config.catalog.data_dir);
            }
        }
        config.validate()?;
        Ok(config)
    }

    /// Find and load the config file
    ///
    /// Order: `explicit`, then `$FITBOARD_CONFIG`, then
    /// `./.fitboard/config.toml`, then `~/.fitboard/config.toml`. Falls back
    /// to defaults when none exists; an explicit path that is missing is an
    /// error.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let env = std::env::var_os(CONFIG_ENV).map(PathBuf::from);
        Self::resolve_from(explicit, env.as_deref(), dirs::home_dir().as_deref())
    }

    fn resolve_from(
        explicit: Option<&Path>,
        env: Option<&Path>,
        home: Option<&Path>,
    ) -> Result<Self, ConfigError> {
        if let Some(path) = explicit.or(env) {
            return Self::load(path);
        }

        let local = Path::new(CONFIG_DIR).join("config.toml");
        let candidates = std::iter::once(local)
            .chain(home.map(|h| h.join(CONFIG_DIR).join("config.toml")));
        for candidate in candidates {
            if candidate.is_file() {
                debug!(path = %candidate.display(), "loading config");
                return Self::load(&candidate);
            }
        }

        debug!("no config file found, using defaults");
        Ok(Self::default())
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.service.base_url.trim().is_empty() {
            return Err(ConfigError::MissingField("service.base_url".to_string()));
        }

        if url::Url::parse(&self.service.base_url).is_err() {
            return Err(ConfigError::OutOfRange(format!(
                "service.base_url is not a valid URL: {}",
                self.service.base_url
            )));
        }

        if self.service.timeout_secs == 0 {
            return Err(ConfigError::OutOfRange(
                "service.timeout_secs must be positive".to_string(),
            ));
        }

        if let Some(identity) = self.catalog.duplicate_identities().first() {
            return Err(ConfigError::DuplicateDataset(identity.to_string()));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fitboard_io::DatasetMeta;

    const SAMPLE: &str = r#"
[service]
base_url = "http://models.example.org/d3mLm"
timeout_secs = 5

[catalog]
data_dir = "csv"
datasets = [
    { name = "Iris" },
    { name = "Cars", key = "mtcars" },
]
"#;

    #[test]
    fn test_default_config() {
        let config = DashboardConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.service.base_url, "http://127.0.0.1:8080/d3mLm");
        assert_eq!(config.service.timeout_secs, 30);
        assert_eq!(config.catalog.data_dir, PathBuf::from("data/csv"));
    }

    #[test]
    fn test_from_toml() {
        let config = DashboardConfig::from_toml(SAMPLE).unwrap();
        assert_eq!(config.service.base_url, "http://models.example.org/d3mLm");
        assert_eq!(config.service.timeout_secs, 5);
        assert!(config.service.user_agent.starts_with("fitboard/"));
        assert_eq!(config.catalog.datasets.len(), 2);
        assert_eq!(config.catalog.datasets[1].identity(), "mtcars");
    }

    #[test]
    fn test_missing_sections_use_defaults() {
        let config = DashboardConfig::from_toml("").unwrap();
        assert_eq!(config.service.timeout_secs, 30);
        assert!(config.catalog.datasets.is_empty());
    }

    #[test]
    fn test_json_serialization() {
        let config = DashboardConfig::from_toml(SAMPLE).unwrap();
        let json = config.to_json().unwrap();
        let parsed = DashboardConfig::from_json(&json).unwrap();
        assert_eq!(parsed.service.base_url, config.service.base_url);
        assert_eq!(parsed.catalog.datasets, config.catalog.datasets);
    }

    #[test]
    fn test_toml_serialization() {
        let config = DashboardConfig::from_toml(SAMPLE).unwrap();
        let text = config.to_toml().unwrap();
        let parsed = DashboardConfig::from_toml(&text).unwrap();
        assert_eq!(parsed.catalog.datasets, config.catalog.datasets);
    }

    #[test]
    fn test_invalid_values() {
        let mut config = DashboardConfig::default();
        config.service.timeout_secs = 0;
        assert!(matches!(config.validate(), Err(ConfigError::OutOfRange(_))));

        let mut config = DashboardConfig::default();
        config.service.base_url = "  ".to_string();
        assert!(matches!(config.validate(), Err(ConfigError::MissingField(_))));

        let mut config = DashboardConfig::default();
        config.service.base_url = "localhost d3mLm".to_string();
        assert!(matches!(config.validate(), Err(ConfigError::OutOfRange(_))));
    }

    #[test]
    fn test_duplicate_identities() {
        let mut config = DashboardConfig::default();
        config.catalog.datasets = vec![
            DatasetMeta::new("Iris"),
            DatasetMeta::new("Other").with_key("Iris"),
        ];
        assert!(matches!(
            config.validate(),
            Err(ConfigError::DuplicateDataset(id)) if id == "Iris"
        ));
    }

    #[test]
    fn test_load_relative_data_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, SAMPLE).unwrap();

        let config = DashboardConfig::load(&path).unwrap();
        assert_eq!(config.catalog.data_dir, dir.path().join("csv"));
    }

    #[test]
    fn test_resolve_prefers_explicit() {
        let dir = tempfile::tempdir().unwrap();
        let explicit = dir.path().join("explicit.toml");
        std::fs::write(&explicit, "[service]\ntimeout_secs = 7\n").unwrap();
        let env = dir.path().join("env.toml");
        std::fs::write(&env, "[service]\ntimeout_secs = 9\n").unwrap();

        let config = DashboardConfig::resolve_from(Some(&explicit), Some(&env), None).unwrap();
        assert_eq!(config.service.timeout_secs, 7);

        let config = DashboardConfig::resolve_from(None, Some(&env), None).unwrap();
        assert_eq!(config.service.timeout_secs, 9);
    }

    #[test]
    fn test_resolve_home_fallback() {
        let home = tempfile::tempdir().unwrap();
        let config_dir = home.path().join(CONFIG_DIR);
        std::fs::create_dir_all(&config_dir).unwrap();
        std::fs::write(config_dir.join("config.toml"), "[service]\ntimeout_secs = 11\n").unwrap();

        // Assumes the test's working directory has no ./.fitboard/config.toml
        let config = DashboardConfig::resolve_from(None, None, Some(home.path())).unwrap();
        assert_eq!(config.service.timeout_secs, 11);
    }

    #[test]
    fn test_resolve_missing_explicit_fails() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        assert!(matches!(
            DashboardConfig::resolve_from(Some(&missing), None, None),
            Err(ConfigError::Io(_))
        ));
    }
}
