use crate::error::{GrepsError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

const CONFIG_FILENAME: &str = "config.json";

/// Configuration for greps, stored in `<data dir>/config.json`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GrepsConfig {
    /// Extensions of the files in a document directory that count as stories
    #[serde(default = "default_story_extensions")]
    pub story_extensions: Vec<String>,
}

fn default_story_extensions() -> Vec<String> {
    vec![".txt".to_string(), ".md".to_string(), ".text".to_string()]
}

impl Default for GrepsConfig {
    fn default() -> Self {
        Self {
            story_extensions: default_story_extensions(),
        }
    }
}

impl GrepsConfig {
    /// Load config from the given directory, or return defaults if not found
    pub fn load<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_path = config_dir.as_ref().join(CONFIG_FILENAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path).map_err(GrepsError::Io)?;
        let config: GrepsConfig =
            serde_json::from_str(&content).map_err(GrepsError::Serialization)?;
        Ok(config)
    }

    /// Save config to the given directory
    pub fn save<P: AsRef<Path>>(&self, config_dir: P) -> Result<()> {
        let config_dir = config_dir.as_ref();

        if !config_dir.exists() {
            fs::create_dir_all(config_dir).map_err(GrepsError::Io)?;
        }

        let config_path = config_dir.join(CONFIG_FILENAME);
        let content = serde_json::to_string_pretty(self).map_err(GrepsError::Serialization)?;
        fs::write(config_path, content).map_err(GrepsError::Io)?;
        Ok(())
    }

    pub fn keys() -> &'static [&'static str] {
        &["story-extensions"]
    }

    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "story-extensions" => Some(self.story_extensions.join(",")),
            _ => None,
        }
    }

    pub fn set(&mut self, key: &str, value: &str) -> std::result::Result<(), String> {
        match key {
            "story-extensions" => {
                let extensions: Vec<String> = value
                    .split(',')
                    .map(str::trim)
                    .filter(|ext| !ext.is_empty() && *ext != ".")
                    .map(|ext| {
                        if ext.starts_with('.') {
                            ext.to_lowercase()
                        } else {
                            format!(".{}", ext.to_lowercase())
                        }
                    })
                    .collect();
                if extensions.is_empty() {
                    return Err("story-extensions needs at least one extension".to_string());
                }
                self.story_extensions = extensions;
                Ok(())
            }
            _ => Err(format!("Unknown config key: {}", key)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = GrepsConfig::default();
        assert_eq!(config.story_extensions, vec![".txt", ".md", ".text"]);
    }

    #[test]
    fn test_set_extensions_normalizes_dots() {
        let mut config = GrepsConfig::default();
        config.set("story-extensions", "md, .TXT,,rst").unwrap();
        assert_eq!(config.story_extensions, vec![".md", ".txt", ".rst"]);
        assert_eq!(config.get("story-extensions").unwrap(), ".md,.txt,.rst");
    }

    #[test]
    fn test_set_rejects_empty_and_unknown() {
        let mut config = GrepsConfig::default();
        assert!(config.set("story-extensions", " , ").is_err());
        assert!(config.set("colour", "red").is_err());
        assert_eq!(config, GrepsConfig::default());
    }

    #[test]
    fn test_load_missing_config() {
        let dir = TempDir::new().unwrap();
        let config = GrepsConfig::load(dir.path().join("nowhere")).unwrap();
        assert_eq!(config, GrepsConfig::default());
    }

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let mut config = GrepsConfig::default();
        config.set("story-extensions", "lex").unwrap();
        config.save(dir.path().join("data")).unwrap();

        let loaded = GrepsConfig::load(dir.path().join("data")).unwrap();
        assert_eq!(loaded.story_extensions, vec![".lex"]);
    }

    #[test]
    fn test_missing_fields_take_defaults() {
        let parsed: GrepsConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(parsed, GrepsConfig::default());
    }
}
