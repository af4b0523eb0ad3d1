use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ChatError;
use crate::personality::Personality;

pub const PERSONALITY_ENV_VAR: &str = "PERSONA_CHAT_PERSONALITY";

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    pub default_personality: Option<String>,
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load from the user config directory. A missing file yields defaults.
    pub fn load() -> Result<Self, ChatError> {
        let config_path = Self::get_config_path()?;
        Self::load_from(&config_path)
    }

    pub fn load_from(path: &Path) -> Result<Self, ChatError> {
        if !path.exists() {
            return Ok(Self::new());
        }

        let content = fs::read_to_string(path).map_err(|source| ChatError::ReadConfig {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| ChatError::ParseConfig {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Environment first, then the file
    pub fn with_env_overrides(self) -> Self {
        self.apply_personality_override(std::env::var(PERSONALITY_ENV_VAR).ok())
    }

    pub fn apply_personality_override(mut self, value: Option<String>) -> Self {
        if let Some(value) = value.filter(|v| !v.trim().is_empty()) {
            self.default_personality = Some(value);
        }
        self
    }

    /// Map the configured value onto the catalog, falling back to the default.
    pub fn resolve_personality(&self) -> Personality {
        match self.default_personality.as_deref() {
            None => Personality::default(),
            Some(value) => Personality::from_value(value).unwrap_or_else(|| {
                tracing::warn!(value, "unknown personality in config, using default");
                Personality::default()
            }),
        }
    }

    fn get_config_path() -> Result<PathBuf, ChatError> {
        Ok(config_dir()?.join("config.json"))
    }
}

pub fn config_dir() -> Result<PathBuf, ChatError> {
    let base = dirs::config_dir().ok_or(ChatError::NoConfigDir)?;
    Ok(base.join("persona-chat"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("config.json")).unwrap();
        assert_eq!(config, Config::new());
        assert_eq!(config.resolve_personality(), Personality::Friendly);
    }

    #[test]
    fn test_load_reads_default_personality() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"default_personality": "polite"}"#).unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.resolve_personality(), Personality::Polite);
    }

    #[test]
    fn test_invalid_json_is_a_parse_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "{not json").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(matches!(err, ChatError::ParseConfig { .. }));
    }

    #[test]
    fn test_unknown_personality_falls_back_to_friendly() {
        let config = Config {
            default_personality: Some("grumpy".to_string()),
        };
        assert_eq!(config.resolve_personality(), Personality::Friendly);
    }

    #[test]
    fn test_env_override_wins_over_file() {
        let config = Config {
            default_personality: Some("polite".to_string()),
        }
        .apply_personality_override(Some("mirror".to_string()));
        assert_eq!(config.resolve_personality(), Personality::Mirror);

        let unchanged = Config {
            default_personality: Some("polite".to_string()),
        }
        .apply_personality_override(Some("  ".to_string()));
        assert_eq!(unchanged.resolve_personality(), Personality::Polite);
    }
}
