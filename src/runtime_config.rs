//! # Runtime Configuration Module
//!
//! Settings that change how the dispatcher resolves requests, loaded from the
//! environment and optionally from a YAML file.
//!
//! ## Environment Variables
//!
//! ### `CAKE_CONTEXT_PREFIX`
//!
//! Literal path prefix the application is mounted under (e.g. `/api`). Used by
//! callers that build requests from raw targets, such as the CLI.
//!
//! Default: empty
//!
//! ### `CAKE_TYPE_CACHE` / `CAKE_METHOD_CACHE`
//!
//! `on` or `off`. Turning a cache off never changes a result, only how many
//! registry lookups and method scans a request costs.
//!
//! Default: `on`
//!
//! ### `CAKE_INJECT_SUFFIXES`
//!
//! Comma-separated suffixes stripped from a parent result's type name when
//! looking for a setter to inject it through (`CustomerResult` → `setCustomer`).
//!
//! Default: `Result,DTO,Entity`
//!
//! ## Usage
//!
//! ```rust
//! use cakerouter::runtime_config::RuntimeConfig;
//!
//! let config = RuntimeConfig::from_env();
//! println!("Type cache enabled: {}", config.type_cache);
//! ```
//!
//! ## YAML
//!
//! ```yaml
//! context_prefix: /api
//! method_cache: false
//! inject_suffixes: [Result, Dto]
//! ```

use anyhow::{Context, Result};
use serde::Deserialize;
use std::env;
use std::path::Path;

fn default_suffixes() -> Vec<String> {
    vec!["Result".to_string(), "DTO".to_string(), "Entity".to_string()]
}

/// Dispatcher configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Default context prefix for requests built from raw targets
    pub context_prefix: String,
    /// Memoize qualified-name to type resolutions
    pub type_cache: bool,
    /// Memoize verb-method candidate lists
    pub method_cache: bool,
    /// Suffixes stripped from parent type names during injection, in priority order
    pub inject_suffixes: Vec<String>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            context_prefix: String::new(),
            type_cache: true,
            method_cache: true,
            inject_suffixes: default_suffixes(),
        }
    }
}

fn parse_switch(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "on" | "true" | "1" | "yes" => Some(true),
        "off" | "false" | "0" | "no" => Some(false),
        _ => None,
    }
}

impl RuntimeConfig {
    /// Load configuration from environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_env();
        config
    }

    /// Load a YAML file, then apply environment overrides on top.
    ///
    /// # Errors
    ///
    /// Fails when the file cannot be read or is not valid configuration YAML.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let mut config = Self::from_yaml_str(&text)
            .with_context(|| format!("Invalid config file {}", path.display()))?;
        config.apply_env();
        Ok(config)
    }

    /// Parse YAML without looking at the environment.
    ///
    /// # Errors
    ///
    /// Fails when the text is not valid configuration YAML.
    pub fn from_yaml_str(text: &str) -> Result<Self> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(text).context("Failed to parse runtime configuration")
    }

    fn apply_env(&mut self) {
        if let Ok(prefix) = env::var("CAKE_CONTEXT_PREFIX") {
            self.context_prefix = prefix;
        }
        if let Some(on) = env::var("CAKE_TYPE_CACHE").ok().and_then(|v| parse_switch(&v)) {
            self.type_cache = on;
        }
        if let Some(on) = env::var("CAKE_METHOD_CACHE").ok().and_then(|v| parse_switch(&v)) {
            self.method_cache = on;
        }
        if let Ok(list) = env::var("CAKE_INJECT_SUFFIXES") {
            self.inject_suffixes = list
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect();
        }
    }
}
