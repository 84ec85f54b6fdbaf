use crate::utils::error::Result;
use serde::{Deserialize, Serialize};
use std::fs;

/// Optional TOML config file. Every field is optional; CLI flags win over the
/// file, the file wins over built-in defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    pub database: Option<DatabaseConfig>,
    pub content: Option<ContentConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContentConfig {
    pub root: Option<String>,
}

impl TomlConfig {
    pub fn from_file(path: &str) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    }

    pub fn database_url(&self) -> Option<&str> {
        self.database.as_ref()?.url.as_deref()
    }

    pub fn content_root(&self) -> Option<&str> {
        self.content.as_ref()?.root.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_config() {
        let config: TomlConfig = toml::from_str(
            r#"
            [database]
            url = "sqlite:import.db?mode=rwc"

            [content]
            root = "./content"
            "#,
        )
        .unwrap();

        assert_eq!(config.database_url(), Some("sqlite:import.db?mode=rwc"));
        assert_eq!(config.content_root(), Some("./content"));
    }

    #[test]
    fn test_empty_config_is_valid() {
        let config: TomlConfig = toml::from_str("").unwrap();
        assert_eq!(config.database_url(), None);
        assert_eq!(config.content_root(), None);
    }

    #[test]
    fn test_missing_file_is_an_error() {
        assert!(TomlConfig::from_file("/nonexistent/config.toml").is_err());
    }
}
