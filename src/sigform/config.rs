use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;

const CONFIG_FILENAME: &str = "config.json";

/// Profile settings, stored next to the documents in config.json.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProfileConfig {
    /// Known account names, in the order the account selector shows them.
    #[serde(default)]
    pub accounts: Vec<String>,
}

impl ProfileConfig {
    /// Loads config from a profile directory, or defaults if not found.
    pub fn load<P: AsRef<Path>>(profile_dir: P) -> Result<Self> {
        let config_path = profile_dir.as_ref().join(CONFIG_FILENAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path)?;
        let config: ProfileConfig = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Saves config to a profile directory, creating it if needed.
    pub fn save<P: AsRef<Path>>(&self, profile_dir: P) -> Result<()> {
        let profile_dir = profile_dir.as_ref();

        if !profile_dir.exists() {
            fs::create_dir_all(profile_dir)?;
        }

        let config_path = profile_dir.join(CONFIG_FILENAME);
        let content = serde_json::to_string_pretty(self)?;
        fs::write(config_path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_config_loads_defaults() {
        let dir = TempDir::new().unwrap();
        let config = ProfileConfig::load(dir.path()).unwrap();
        assert_eq!(config, ProfileConfig::default());
        assert!(config.accounts.is_empty());
    }

    #[test]
    fn save_and_load_round_trips() {
        let dir = TempDir::new().unwrap();
        let config = ProfileConfig {
            accounts: vec!["personal".to_string(), "work".to_string()],
        };
        config.save(dir.path()).unwrap();
        let loaded = ProfileConfig::load(dir.path()).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn save_creates_the_profile_directory() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("profile");
        ProfileConfig::default().save(&nested).unwrap();
        assert!(nested.join("config.json").exists());
    }

    #[test]
    fn missing_fields_default() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("config.json"), "{}").unwrap();
        let config = ProfileConfig::load(dir.path()).unwrap();
        assert!(config.accounts.is_empty());
    }

    #[test]
    fn malformed_config_is_an_error() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("config.json"), "not json").unwrap();
        assert!(ProfileConfig::load(dir.path()).is_err());
    }
}
