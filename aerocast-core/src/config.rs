use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{env, fs, path::PathBuf};

use crate::error::Error;

/// Name of the environment variable holding the Gemini credential.
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Top-level configuration stored on disk.
///
/// The environment variable always wins over the stored key, so a key
/// exported in the shell never silently loses to a stale config file.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Example TOML:
    /// [gemini]
    /// api_key = "..."
    pub gemini: Option<GeminiConfig>,
}

/// Credential section for the Gemini backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiConfig {
    pub api_key: String,
}

impl Config {
    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            // First run: no config file, return empty.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_file_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(&path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("pro", "aerocast", "aerocast-cli")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Store or replace the Gemini API key.
    pub fn set_api_key(&mut self, api_key: String) {
        self.gemini = Some(GeminiConfig { api_key });
    }

    /// Returns the stored API key, if present and non-empty.
    pub fn stored_api_key(&self) -> Option<&str> {
        self.gemini.as_ref().map(|g| g.api_key.as_str()).filter(|k| !k.is_empty())
    }

    /// Resolve the credential to use: `GEMINI_API_KEY` from the
    /// environment first, then the config file.
    ///
    /// An empty environment value counts as unset.
    pub fn resolve_api_key(&self) -> Result<String, Error> {
        match env::var(API_KEY_ENV) {
            Ok(key) if !key.is_empty() => return Ok(key),
            _ => {}
        }

        self.stored_api_key().map(str::to_owned).ok_or(Error::MissingApiKey)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // resolve_api_key reads the real process environment; env-var
    // precedence is left untested here to keep tests parallel-safe.

    #[test]
    fn stored_key_absent_by_default() {
        let cfg = Config::default();
        assert!(cfg.stored_api_key().is_none());
    }

    #[test]
    fn set_api_key_round_trips() {
        let mut cfg = Config::default();
        cfg.set_api_key("STORED_KEY".into());
        assert_eq!(cfg.stored_api_key(), Some("STORED_KEY"));
    }

    #[test]
    fn empty_stored_key_counts_as_unset() {
        let mut cfg = Config::default();
        cfg.set_api_key(String::new());
        assert!(cfg.stored_api_key().is_none());
    }

    #[test]
    fn config_serializes_to_expected_toml_shape() {
        let mut cfg = Config::default();
        cfg.set_api_key("abc".into());

        let toml = toml::to_string_pretty(&cfg).expect("config must serialize");
        assert!(toml.contains("[gemini]"));
        assert!(toml.contains("api_key = \"abc\""));

        let back: Config = toml::from_str(&toml).expect("config must parse back");
        assert_eq!(back.stored_api_key(), Some("abc"));
    }
}
