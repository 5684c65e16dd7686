//! TOML configuration file support.
//!
//! Settings shared across runs can live in a config file instead of flags:
//!
//! ```toml
//! # matchannels.toml
//! [channels]
//! pattern = "(?<!team_)pmanifold|anathrott|rpm"
//! buffer_capacity = 262144
//! ```
//!
//! A `--pattern` given on the command line replaces the file's pattern.

use anyhow::{Context, Result};
use matchannels::ChannelConfig;
use serde::Deserialize;
use std::path::Path;

/// Root configuration structure for matchannels.toml files.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// Channel loading settings.
    #[serde(default)]
    pub channels: ChannelConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::parse(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse TOML configuration")
    }
}

/// Merge the optional config file with command-line overrides.
pub fn resolve(pattern: Option<String>, config_path: Option<&Path>) -> Result<ChannelConfig> {
    let mut config = match config_path {
        Some(path) => Config::from_file(path)?.channels,
        None => ChannelConfig::default(),
    };

    if let Some(pattern) = pattern {
        config = config.with_pattern(pattern);
    }

    Ok(config)
}
