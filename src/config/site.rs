//! Site configuration (_config.yml)

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Site title, shown on the index page
    pub title: String,
    /// Author written into newly created posts
    pub author: String,

    // Directories, relative to the site base directory
    pub raw_dir: String,
    pub build_dir: String,
    pub template_dir: String,

    pub index: IndexConfig,
    pub highlight: HighlightConfig,
    pub server: ServerConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "inkpress".to_string(),
            author: "anonymous".to_string(),
            raw_dir: "posts".to_string(),
            build_dir: "build".to_string(),
            template_dir: "templates".to_string(),
            index: IndexConfig::default(),
            highlight: HighlightConfig::default(),
            server: ServerConfig::default(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a YAML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("Invalid config {}", path.display()))
    }

    /// Parse configuration from YAML text. An empty document gives defaults.
    pub fn parse(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }
}

/// Index page generation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexConfig {
    /// Write `index.html` listing every post on a full build
    pub enable: bool,
    /// Also rebuild the index whenever a single post is created, saved or
    /// deleted, so it never lags behind one edit
    pub refresh_on_write: bool,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            enable: true,
            refresh_on_write: true,
        }
    }
}

/// Code highlighting in rendered markdown
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HighlightConfig {
    pub enable: bool,
    /// syntect theme name
    pub theme: String,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            enable: true,
            theme: "base16-ocean.dark".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub ip: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            ip: "localhost".to_string(),
            port: 8080,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SiteConfig::parse("").unwrap();
        assert_eq!(config.raw_dir, "posts");
        assert_eq!(config.build_dir, "build");
        assert!(config.index.enable);
        assert!(config.index.refresh_on_write);
        assert_eq!(config.server.port, 8080);
    }

    #[test]
    fn test_partial_config() {
        let yaml = r#"
title: My Notes
author: Ana
index:
  refresh_on_write: false
server:
  port: 4000
"#;
        let config = SiteConfig::parse(yaml).unwrap();
        assert_eq!(config.title, "My Notes");
        assert_eq!(config.author, "Ana");
        assert!(config.index.enable);
        assert!(!config.index.refresh_on_write);
        assert_eq!(config.server.ip, "localhost");
        assert_eq!(config.server.port, 4000);
        assert!(config.highlight.enable);
    }

    #[test]
    fn test_invalid_config() {
        assert!(SiteConfig::parse("server: [1, 2]").is_err());
    }
}
