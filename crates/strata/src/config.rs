// File: src/config.rs
// Purpose: Configuration parsing from strata.toml

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable that overrides the config file location
pub const CONFIG_ENV: &str = "STRATA_CONFIG";

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub project: ProjectConfig,

    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub routing: RoutingConfig,

    #[serde(default)]
    pub layout: LayoutConfig,

    /// Page metadata keyed by logical URI; `default` is the fallback
    #[serde(default = "default_metadata")]
    pub metadata: HashMap<String, PageMetadata>,
}

/// Project metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectConfig {
    #[serde(default = "default_name")]
    pub name: String,

    #[serde(default = "default_version")]
    pub version: String,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_host")]
    pub host: String,
}

/// Routing configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutingConfig {
    /// Routes root mirrored by URLs (default: "src/app")
    #[serde(default = "default_app_dir")]
    pub app_dir: PathBuf,

    /// Advisory inventory listing written on every scan
    #[serde(default = "default_cache_file")]
    pub cache_file: PathBuf,

    /// Base path stripped from request paths (e.g., "/my-project")
    #[serde(default)]
    pub base_path: Option<String>,

    /// Extension of layout and not-found documents (default: "html")
    #[serde(default = "default_template_extension")]
    pub template_extension: String,

    /// Prefix marking a directory as private (default: "_")
    #[serde(default = "default_private_marker")]
    pub private_marker: String,

    /// Value of `{base_url}` in templates
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

/// Layout placeholder configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutConfig {
    /// Placeholder the root layout must contain (default: "{content}")
    #[serde(default = "default_content_placeholder")]
    pub content_placeholder: String,

    /// Placeholder every nested layout must contain (default: "{child_content}")
    #[serde(default = "default_child_placeholder")]
    pub child_placeholder: String,
}

/// Title and description exposed as `{metadata.*}`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PageMetadata {
    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub description: String,
}

// Default values
fn default_name() -> String {
    "strata-app".to_string()
}

fn default_version() -> String {
    "0.1.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_app_dir() -> PathBuf {
    PathBuf::from("src/app")
}

fn default_cache_file() -> PathBuf {
    PathBuf::from("settings/files-list.json")
}

fn default_template_extension() -> String {
    "html".to_string()
}

fn default_private_marker() -> String {
    "_".to_string()
}

fn default_base_url() -> String {
    "/".to_string()
}

fn default_content_placeholder() -> String {
    "{content}".to_string()
}

fn default_child_placeholder() -> String {
    "{child_content}".to_string()
}

fn default_metadata() -> HashMap<String, PageMetadata> {
    HashMap::from([(
        "default".to_string(),
        PageMetadata {
            title: default_name(),
            description: String::new(),
        },
    )])
}

// Default implementations
impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            version: default_version(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            host: default_host(),
        }
    }
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            app_dir: default_app_dir(),
            cache_file: default_cache_file(),
            base_path: None,
            template_extension: default_template_extension(),
            private_marker: default_private_marker(),
            base_url: default_base_url(),
        }
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            content_placeholder: default_content_placeholder(),
            child_placeholder: default_child_placeholder(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        // If file doesn't exist or is empty, return default config
        if !path.exists() {
            return Ok(Self::default_with_metadata());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;

        if content.trim().is_empty() {
            return Ok(Self::default_with_metadata());
        }

        let mut config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path))?;
        config.metadata.entry("default".to_string()).or_insert_with(|| PageMetadata {
            title: config.project.name.clone(),
            description: String::new(),
        });

        Ok(config)
    }

    /// Load configuration from `$STRATA_CONFIG`, or ./strata.toml
    pub fn load_default() -> Result<Self> {
        let path = std::env::var(CONFIG_ENV).unwrap_or_else(|_| "strata.toml".to_string());
        Self::load(path)
    }

    /// Defaults including the fallback metadata entry
    pub fn default_with_metadata() -> Self {
        Self {
            metadata: default_metadata(),
            ..Self::default()
        }
    }

    /// Metadata for a logical URI, falling back to `default`
    pub fn metadata_for(&self, uri: &str) -> PageMetadata {
        let key = if uri.is_empty() { "/" } else { uri };
        self.metadata
            .get(key)
            .or_else(|| self.metadata.get("default"))
            .cloned()
            .unwrap_or_else(|| PageMetadata {
                title: self.project.name.clone(),
                description: String::new(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default_with_metadata();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.routing.app_dir, PathBuf::from("src/app"));
        assert_eq!(config.routing.private_marker, "_");
        assert_eq!(config.routing.template_extension, "html");
        assert_eq!(config.layout.content_placeholder, "{content}");
        assert_eq!(config.layout.child_placeholder, "{child_content}");
        assert_eq!(config.metadata_for("anything").title, "strata-app");
    }

    #[test]
    fn test_empty_config() {
        let config = toml::from_str::<Config>("").unwrap_or_default();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.routing.cache_file, PathBuf::from("settings/files-list.json"));
    }

    #[test]
    fn test_custom_routing_and_metadata() {
        let toml = r#"
            [routing]
            app_dir = "app"
            base_path = "/shop"

            [layout]
            child_placeholder = "<!-- children -->"

            [metadata.default]
            title = "Shop"
            description = "Things for sale"

            [metadata.about]
            title = "About us"
        "#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.routing.app_dir, PathBuf::from("app"));
        assert_eq!(config.routing.base_path.as_deref(), Some("/shop"));
        assert_eq!(config.layout.child_placeholder, "<!-- children -->");
        assert_eq!(config.metadata_for("about").title, "About us");
        assert_eq!(config.metadata_for("about").description, "");
        assert_eq!(config.metadata_for("contact").description, "Things for sale");
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(dir.path().join("strata.toml")).unwrap();
        assert_eq!(config.project.name, "strata-app");
        assert!(config.metadata.contains_key("default"));
    }

    #[test]
    fn test_load_invalid_file_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("strata.toml");
        fs::write(&path, "[server]\nport = \"not a number\"").unwrap();
        assert!(Config::load(&path).is_err());
    }
}
