//! The registry loader.

use crate::config::LoaderConfig;
use crate::error::{LoaderError, LoaderResult};
use crate::source::SourceLocation;
use plugin_registry_core::{EnrichedRegistryDocument, Enricher, RegistryDocument};
use reqwest::Client;
use tracing::{debug, error, info, warn};

/// Fetches the registry manifest and per-plugin documents.
///
/// Every call is independent: nothing is cached between calls and the loader
/// holds no mutable state, so one instance can be shared behind an `Arc` and
/// used from concurrent tasks.
///
/// # Example
///
/// ```no_run
/// use plugin_registry_loader::{LoaderConfig, RegistryLoader};
///
/// # async fn example() -> Result<(), plugin_registry_loader::LoaderError> {
/// let loader = RegistryLoader::new(LoaderConfig::development("."));
///
/// let registry = loader.load_registry().await?;
/// for plugin in registry.plugins() {
///     println!("{} ({} skills)", plugin.name(), plugin.skill_count());
/// }
///
/// if let Some(readme) = loader.load_plugin_document("memory-demo").await {
///     println!("{readme}");
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct RegistryLoader {
    config: LoaderConfig,
    client: Client,
    enricher: Enricher,
}

impl RegistryLoader {
    /// Create a loader using the default category palette.
    pub fn new(config: LoaderConfig) -> Self {
        Self::with_enricher(config, Enricher::default())
    }

    /// Create a loader with a custom enricher.
    pub fn with_enricher(config: LoaderConfig, enricher: Enricher) -> Self {
        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .build()
            .unwrap_or_default();

        Self {
            config,
            client,
            enricher,
        }
    }

    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    pub fn enricher(&self) -> &Enricher {
        &self.enricher
    }

    /// Load and enrich the registry.
    ///
    /// A failure status, an unreadable body or a malformed manifest is logged
    /// and returned; there is no fallback to an empty registry.
    pub async fn load_registry(&self) -> LoaderResult<EnrichedRegistryDocument> {
        let document = self.load_raw_registry().await?;
        Ok(self.enricher.enrich(document))
    }

    /// Load and parse the registry without enriching it.
    pub async fn load_raw_registry(&self) -> LoaderResult<RegistryDocument> {
        let location = match self.config.registry_location() {
            Ok(location) => location,
            Err(e) => {
                error!("Failed to resolve plugin registry location: {}", e);
                return Err(e);
            }
        };

        match self.fetch_registry(&location).await {
            Ok(document) => {
                info!(
                    "Loaded {} plugins from {}",
                    document.plugins.len(),
                    location
                );
                Ok(document)
            }
            Err(e) => {
                error!("Failed to load plugin registry from {}: {}", location, e);
                Err(e)
            }
        }
    }

    async fn fetch_registry(&self, location: &SourceLocation) -> LoaderResult<RegistryDocument> {
        let body = location.fetch(&self.client).await?;
        Ok(RegistryDocument::from_slice(&body)?)
    }

    /// Load a plugin's supplementary document (its README).
    ///
    /// Returns `None` when the document does not exist or cannot be loaded.
    /// Missing documents are expected and only logged at debug level; any other
    /// failure is logged as a warning.
    pub async fn load_plugin_document(&self, plugin_name: &str) -> Option<String> {
        let location = match self.config.document_location(plugin_name) {
            Ok(location) => location,
            Err(e) => {
                warn!("Cannot resolve document for plugin {:?}: {}", plugin_name, e);
                return None;
            }
        };

        let result = location
            .fetch(&self.client)
            .await
            .and_then(|bytes| String::from_utf8(bytes).map_err(LoaderError::from));

        match result {
            Ok(text) => {
                debug!("Loaded document for plugin {} ({} bytes)", plugin_name, text.len());
                Some(text)
            }
            Err(LoaderError::Fetch { status, .. }) => {
                debug!("No document for plugin {} at {} ({})", plugin_name, location, status);
                None
            }
            Err(e) => {
                warn!(
                    "Failed to load document for plugin {} from {}: {}",
                    plugin_name, location, e
                );
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn test_loader_is_shareable() {
        assert_send_sync::<RegistryLoader>();
    }

    #[test]
    fn test_loader_keeps_config() {
        let loader = RegistryLoader::new(LoaderConfig::development("/srv/marketplace"));
        assert!(loader.config().is_development());
        assert_eq!(loader.enricher().palette().len(), 6);
    }

    #[tokio::test]
    async fn test_invalid_plugin_name_is_none() {
        let loader = RegistryLoader::new(LoaderConfig::development("/srv/marketplace"));
        assert_eq!(loader.load_plugin_document("../../etc/passwd").await, None);
    }
}
