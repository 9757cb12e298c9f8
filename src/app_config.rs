//! # Application Configuration Module
//!
//! Settings for the command-line front end, read from the environment (and a
//! `.env` file when present).

use anyhow::{Context, Result};
use std::env;
use std::path::PathBuf;

// Defaults
pub const DEFAULT_FREE_SEARCH_LIMIT: u32 = 3;
pub const DEFAULT_STORAGE_PATH: &str = "copycat-storage.json";
pub const DEFAULT_LANGUAGE: &str = "en";

// Environment variable names
pub const FREE_SEARCH_LIMIT_VAR: &str = "COPYCAT_FREE_SEARCH_LIMIT";
pub const STORAGE_PATH_VAR: &str = "COPYCAT_STORAGE_PATH";
pub const LANGUAGE_VAR: &str = "COPYCAT_LANGUAGE";

/// Configuration structure for the application
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// Free searches allowed per calendar day
    pub free_search_limit: u32,
    /// JSON file backing the key-value store
    pub storage_path: PathBuf,
    /// Language for status messages ("en", "fr")
    pub language: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            free_search_limit: DEFAULT_FREE_SEARCH_LIMIT,
            storage_path: PathBuf::from(DEFAULT_STORAGE_PATH),
            language: DEFAULT_LANGUAGE.to_string(),
        }
    }
}

impl AppConfig {
    /// Load `.env` (if any), then read the environment
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build a config from an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(raw) = lookup(FREE_SEARCH_LIMIT_VAR) {
            config.free_search_limit = raw.trim().parse().with_context(|| {
                format!("{} must be a non-negative integer, got '{}'", FREE_SEARCH_LIMIT_VAR, raw)
            })?;
        }

        if let Some(path) = lookup(STORAGE_PATH_VAR).filter(|p| !p.trim().is_empty()) {
            config.storage_path = PathBuf::from(path);
        }

        if let Some(language) = lookup(LANGUAGE_VAR).filter(|l| !l.trim().is_empty()) {
            config.language = language.trim().to_string();
        }

        Ok(config)
    }
}
