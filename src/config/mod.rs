//! Configuration and credential storage

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::assistant::AssistantSettings;

/// Default Gemini model.
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
/// Default Gemini REST endpoint.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Environment variables consulted for the API key, in order.
pub const API_KEY_ENV_VARS: [&str; 2] = ["API_KEY", "GEMINI_API_KEY"];

/// Application configuration
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Stored Gemini API key (used when no env var or flag supplies one)
    pub api_key: Option<String>,
    /// Model name override
    pub model: Option<String>,
    /// Endpoint base URL override
    pub base_url: Option<String>,
}

/// Where the effective API key came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeySource {
    Flag,
    Env(&'static str),
    ConfigFile,
    Session,
}

impl std::fmt::Display for KeySource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            KeySource::Flag => write!(f, "--api-key flag"),
            KeySource::Env(name) => write!(f, "${}", name),
            KeySource::ConfigFile => write!(f, "config file"),
            KeySource::Session => write!(f, "entered this session"),
        }
    }
}

/// An API key together with its origin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedKey {
    pub key: String,
    pub source: KeySource,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty()).map(|v| v.trim().to_string())
}

impl Config {
    /// Get config directory path
    fn config_dir() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("com", "ephemeral-chat", "ephemeral-chat")
            .context("Could not determine config directory")?;
        Ok(proj_dirs.config_dir().to_path_buf())
    }

    /// Get config file path
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Load configuration from disk
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load configuration from `path`; a missing file means defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).context("Failed to read config file")?;
        Self::parse(&content)
    }

    fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse config file")
    }

    /// Save configuration to disk
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    /// Save configuration to `path`, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).context("Failed to create config directory")?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(path, content).context("Failed to write config file")?;

        // Config file holds the API key.
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let perms = fs::Permissions::from_mode(0o600);
            fs::set_permissions(path, perms).context("Failed to set config permissions")?;
        }

        Ok(())
    }

    pub fn set_api_key(&mut self, key: String) {
        self.api_key = Some(key);
    }

    pub fn clear_api_key(&mut self) {
        self.api_key = None;
    }

    /// Resolve the API key from the process environment.
    pub fn resolve_api_key(&self, flag: Option<String>) -> Option<ResolvedKey> {
        self.resolve_api_key_with(flag, |name| std::env::var(name).ok())
    }

    /// Resolve the API key: flag, then env vars, then the config file.
    /// Blank values count as absent.
    pub fn resolve_api_key_with<F>(&self, flag: Option<String>, env: F) -> Option<ResolvedKey>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = non_blank(flag) {
            return Some(ResolvedKey {
                key,
                source: KeySource::Flag,
            });
        }
        for name in API_KEY_ENV_VARS {
            if let Some(key) = non_blank(env(name)) {
                return Some(ResolvedKey {
                    key,
                    source: KeySource::Env(name),
                });
            }
        }
        non_blank(self.api_key.clone()).map(|key| ResolvedKey {
            key,
            source: KeySource::ConfigFile,
        })
    }

    /// Model and endpoint for the assistant client.
    pub fn assistant_settings(&self) -> AssistantSettings {
        AssistantSettings {
            model: non_blank(self.model.clone()).unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            base_url: non_blank(self.base_url.clone())
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
        }
    }
}

/// Mask a key for display, keeping the last four characters.
pub fn mask_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 4 {
        return "*".repeat(chars.len());
    }
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}{}", "*".repeat(chars.len() - 4), tail)
}
