//! Configuration loading
//!
//! Resolves the TOML config file in priority order: explicit path argument,
//! `SENSORWEB_CONFIG` environment variable, then the platform config
//! directory. A missing file is not fatal — compiled defaults apply and a
//! warning is logged.

use crate::error::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::warn;

pub const CONFIG_ENV_VAR: &str = "SENSORWEB_CONFIG";

/// Crate configuration
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// SQLite connection URL of the backing store
    pub database_url: String,
    /// External URL the platform collection is served under; base for
    /// generated hrefs unless a query overrides it
    pub external_url: String,
    /// Locale used for label selection when a query names none
    pub default_locale: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: "sqlite://sensorweb.db".to_string(),
            external_url: "http://localhost:8080/api".to_string(),
            default_locale: None,
        }
    }
}

impl Config {
    /// Load configuration, falling back to compiled defaults when no config
    /// file can be found.
    pub fn load(cli_path: Option<&Path>) -> Result<Self> {
        match resolve_config_path(cli_path) {
            Some(path) => Self::from_file(&path),
            None => {
                warn!("No config file found, using compiled defaults");
                Ok(Self::default())
            }
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content)
            .map_err(|e| Error::Config(format!("Failed to parse {}: {}", path.display(), e)))
    }
}

/// Config file path in priority order: explicit argument, environment
/// variable, platform config directory.
fn resolve_config_path(cli_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = cli_path {
        return Some(path.to_path_buf());
    }
    if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
        return Some(PathBuf::from(path));
    }
    dirs::config_dir()
        .map(|dir| dir.join("sensorweb").join("config.toml"))
        .filter(|path| path.exists())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_apply_for_missing_keys() {
        let config: Config = toml::from_str(r#"external_url = "https://sensors.example.org/api""#)
            .unwrap();
        assert_eq!(config.external_url, "https://sensors.example.org/api");
        assert_eq!(config.database_url, Config::default().database_url);
        assert_eq!(config.default_locale, None);
    }

    #[test]
    fn loads_full_config_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
            database_url = "sqlite://monitoring.db"
            external_url = "https://sensors.example.org/api"
            default_locale = "de"
            "#
        )
        .unwrap();

        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.database_url, "sqlite://monitoring.db");
        assert_eq!(config.default_locale.as_deref(), Some("de"));
    }

    #[test]
    fn malformed_config_is_a_config_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "database_url = [1, 2]").unwrap();

        match Config::from_file(file.path()) {
            Err(Error::Config(_)) => {}
            other => panic!("expected Config error, got {:?}", other),
        }
    }

    #[test]
    fn explicit_path_wins() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, r#"database_url = "sqlite://explicit.db""#).unwrap();

        let config = Config::load(Some(file.path())).unwrap();
        assert_eq!(config.database_url, "sqlite://explicit.db");
    }
}
