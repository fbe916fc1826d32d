//! Loader configuration.
//!
//! The loader never reads process state to decide where the registry lives.
//! Callers build a [`LoaderConfig`] (directly, or deserialized from TOML) and
//! hand it over at construction time.

use crate::error::{LoaderError, LoaderResult};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use url::Url;

/// Placeholder substituted with the plugin name in document templates.
pub const NAME_PLACEHOLDER: &str = "{name}";

/// Canonical hosted copy of the registry manifest.
pub const DEFAULT_REGISTRY_URL: &str =
    "https://raw.githubusercontent.com/agent-skills/marketplace/main/.claude-plugin/marketplace.json";

/// Canonical hosted location of per-plugin READMEs.
pub const DEFAULT_DOCUMENT_URL_TEMPLATE: &str =
    "https://raw.githubusercontent.com/agent-skills/marketplace/main/plugins/{name}/README.md";

pub const DEFAULT_REGISTRY_PATH: &str = ".claude-plugin/marketplace.json";
pub const DEFAULT_DOCUMENT_PATH_TEMPLATE: &str = "plugins/{name}/README.md";

/// Which source the loader reads from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceMode {
    /// Read from a local checkout of the marketplace.
    Development,
    /// Read from the hosted copy.
    #[default]
    Production,
}

/// Configuration for [`RegistryLoader`](crate::RegistryLoader).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    /// Source selection
    /// Default: "production"
    pub mode: SourceMode,

    /// User agent sent with HTTP requests
    pub user_agent: String,

    /// Local source, used in development mode
    pub local: LocalSource,

    /// Remote source, used in production mode
    pub remote: RemoteSource,
}

/// Paths relative to a local marketplace checkout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocalSource {
    /// Root of the checkout; relative paths below are joined onto it
    pub root: PathBuf,
    /// Registry manifest path
    pub registry_path: String,
    /// Per-plugin document path, with a `{name}` placeholder
    pub document_path_template: String,
}

/// URLs of the hosted registry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteSource {
    pub registry_url: String,
    /// Per-plugin document URL, with a `{name}` placeholder
    pub document_url_template: String,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            mode: SourceMode::default(),
            user_agent: format!("plugin-registry/{}", env!("CARGO_PKG_VERSION")),
            local: LocalSource::default(),
            remote: RemoteSource::default(),
        }
    }
}

impl Default for LocalSource {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            registry_path: DEFAULT_REGISTRY_PATH.to_string(),
            document_path_template: DEFAULT_DOCUMENT_PATH_TEMPLATE.to_string(),
        }
    }
}

impl Default for RemoteSource {
    fn default() -> Self {
        Self {
            registry_url: DEFAULT_REGISTRY_URL.to_string(),
            document_url_template: DEFAULT_DOCUMENT_URL_TEMPLATE.to_string(),
        }
    }
}

impl RemoteSource {
    /// Remote source laid out like a marketplace checkout under `base`.
    pub fn from_base(base: &str) -> Self {
        let base = base.trim_end_matches('/');
        Self {
            registry_url: format!("{base}/{DEFAULT_REGISTRY_PATH}"),
            document_url_template: format!("{base}/{DEFAULT_DOCUMENT_PATH_TEMPLATE}"),
        }
    }
}

impl LoaderConfig {
    /// Development configuration reading from the checkout at `root`.
    pub fn development(root: impl Into<PathBuf>) -> Self {
        Self {
            mode: SourceMode::Development,
            local: LocalSource {
                root: root.into(),
                ..LocalSource::default()
            },
            ..Self::default()
        }
    }

    /// Production configuration reading from `remote`.
    pub fn production(remote: RemoteSource) -> Self {
        Self {
            mode: SourceMode::Production,
            remote,
            ..Self::default()
        }
    }

    pub fn is_development(&self) -> bool {
        self.mode == SourceMode::Development
    }

    /// Validate the configuration.
    ///
    /// Templates must contain the `{name}` placeholder and remote URLs must
    /// parse. Both sources are checked regardless of the active mode.
    pub fn validate(&self) -> LoaderResult<()> {
        if self.local.registry_path.is_empty() {
            return Err(LoaderError::InvalidConfig(
                "local.registry_path cannot be empty".to_string(),
            ));
        }

        for (key, template) in [
            ("local.document_path_template", &self.local.document_path_template),
            ("remote.document_url_template", &self.remote.document_url_template),
        ] {
            if !template.contains(NAME_PLACEHOLDER) {
                return Err(LoaderError::InvalidConfig(format!(
                    "{key} must contain the {NAME_PLACEHOLDER} placeholder"
                )));
            }
        }

        Url::parse(&self.remote.registry_url)?;
        Url::parse(&self.remote.document_url_template.replace(NAME_PLACEHOLDER, "plugin"))?;

        Ok(())
    }
}
