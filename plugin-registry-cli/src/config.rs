//! Configuration file loading and management
//!
//! This module handles loading and parsing the CLI configuration from
//! `$XDG_CONFIG_HOME/plugin-registry/config.toml`. If the configuration file
//! doesn't exist, a default configuration is created with documented comments.

use anyhow::{Context, Result};
use plugin_registry_core::{CategoryPalette, ColorTag};
use plugin_registry_loader::LoaderConfig;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Main CLI configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Config {
    /// Output and logging settings
    #[serde(default)]
    pub cli: CliConfig,
    /// Where the registry is loaded from
    #[serde(default)]
    pub source: LoaderConfig,
    /// Category color overrides, merged over the built-in palette
    #[serde(default)]
    pub palette: BTreeMap<String, ColorTag>,
}

/// Output and logging settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CliConfig {
    /// Log level (trace, debug, info, warn, error)
    /// Default: "warn"
    pub log_level: String,
    /// Default output format
    /// Default: "text"
    pub output: OutputFormat,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            log_level: "warn".to_string(),
            output: OutputFormat::Text,
        }
    }
}

impl Config {
    /// Load configuration from the specified path
    ///
    /// # Arguments
    /// * `path` - Path to the configuration file
    ///
    /// # Returns
    /// The parsed configuration or an error if loading/parsing fails
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from the default XDG config location
    ///
    /// If the configuration file doesn't exist, creates a default configuration
    /// file with documented comments.
    pub fn load_default() -> Result<Self> {
        let config_path = Self::default_config_path()?;

        if !config_path.exists() {
            Self::create_default_file(&config_path)?;
        }

        Self::load(&config_path)
    }

    /// Get the default configuration file path
    ///
    /// Returns `$XDG_CONFIG_HOME/plugin-registry/config.toml`
    pub fn default_config_path() -> Result<PathBuf> {
        let dirs = directories::ProjectDirs::from("", "", "plugin-registry")
            .context("Failed to determine project directories")?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Create a default configuration file with documented comments
    fn create_default_file(path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        fs::write(path, Self::default_config_content())
            .with_context(|| format!("Failed to write default config file: {}", path.display()))?;

        tracing::info!("Created default configuration file at: {}", path.display());
        Ok(())
    }

    /// Generate the default configuration file content with comments
    fn default_config_content() -> String {
        format!(
            r#"# Plugin Registry Configuration

[cli]
# Log level: trace, debug, info, warn, error
# RUST_LOG takes precedence when set.
# Default: "warn"
log_level = "warn"

# Output format for commands: text or json
# Default: "text"
output = "text"

[source]
# Where to load the registry from:
# - "production": the hosted copy ([source.remote])
# - "development": a local marketplace checkout ([source.local])
mode = "production"

[source.remote]
registry_url = "{registry_url}"
# {{name}} is replaced with the plugin name
document_url_template = "{document_url}"

[source.local]
# Root of the marketplace checkout
root = "."
registry_path = "{registry_path}"
document_path_template = "{document_path}"

# Category colors: blue, purple, green, yellow, pink, red, orange, teal, gray
# Entries here are merged over the built-in table; unknown categories are gray.
[palette]
# data = "orange"
"#,
            registry_url = plugin_registry_loader::config::DEFAULT_REGISTRY_URL,
            document_url = plugin_registry_loader::config::DEFAULT_DOCUMENT_URL_TEMPLATE,
            registry_path = plugin_registry_loader::config::DEFAULT_REGISTRY_PATH,
            document_path = plugin_registry_loader::config::DEFAULT_DOCUMENT_PATH_TEMPLATE,
        )
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&self.cli.log_level.as_str()) {
            anyhow::bail!(
                "Invalid log_level: {}. Must be one of: {}",
                self.cli.log_level,
                valid_log_levels.join(", ")
            );
        }

        self.source
            .validate()
            .context("Invalid [source] configuration")?;

        Ok(())
    }

    /// Build the category palette: built-in table plus configured overrides.
    pub fn palette(&self) -> CategoryPalette {
        let mut palette = CategoryPalette::default();
        palette.extend(self.palette.iter().map(|(k, v)| (k.as_str(), *v)));
        palette
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use plugin_registry_loader::SourceMode;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.cli.log_level, "warn");
        assert_eq!(config.cli.output, OutputFormat::Text);
        assert_eq!(config.source.mode, SourceMode::Production);
        assert!(config.palette.is_empty());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_default_content_parses() {
        let config: Config = toml::from_str(&Config::default_config_content()).unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.source, LoaderConfig::default());
    }

    #[test]
    fn test_load_valid_config() {
        let config_content = r#"
[cli]
log_level = "debug"
output = "json"

[source]
mode = "development"

[source.local]
root = "/srv/marketplace"

[palette]
Data = "orange"
ai = "green"
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(config_content.as_bytes()).unwrap();

        let config = Config::load(temp_file.path()).unwrap();
        assert_eq!(config.cli.log_level, "debug");
        assert_eq!(config.cli.output, OutputFormat::Json);
        assert!(config.source.is_development());
        assert_eq!(config.source.local.root, PathBuf::from("/srv/marketplace"));

        let palette = config.palette();
        assert_eq!(palette.color_for(Some("data")), ColorTag::Orange);
        assert_eq!(palette.color_for(Some("AI")), ColorTag::Green);
        assert_eq!(palette.color_for(Some("cloud")), ColorTag::Purple);
    }

    #[test]
    fn test_load_empty_config_uses_defaults() {
        let temp_file = NamedTempFile::new().unwrap();
        let config = Config::load(temp_file.path()).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_partial_cli_section() {
        let config: Config = toml::from_str("[cli]\noutput = \"json\"\n").unwrap();
        assert_eq!(config.cli.log_level, "warn");
        assert_eq!(config.cli.output, OutputFormat::Json);
    }

    #[test]
    fn test_validate_invalid_log_level() {
        let mut config = Config::default();
        config.cli.log_level = "loud".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_invalid_source() {
        let mut config = Config::default();
        config.source.remote.document_url_template = "https://example.com/README.md".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_palette_color_fails_to_parse() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(b"[palette]\nai = \"magenta\"\n").unwrap();
        assert!(Config::load(temp_file.path()).is_err());
    }

    #[test]
    fn test_config_roundtrip() {
        let mut config = Config::default();
        config.cli.output = OutputFormat::Json;
        config.palette.insert("music".to_string(), ColorTag::Teal);

        let toml_str = toml::to_string(&config).unwrap();
        let deserialized: Config = toml::from_str(&toml_str).unwrap();

        assert_eq!(config, deserialized);
    }
}
