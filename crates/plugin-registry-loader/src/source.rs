//! Source resolution and raw fetching.
//!
//! A [`SourceLocation`] is either a file in a local checkout or a remote URL.
//! Both are fetched the same way from the loader's point of view: bytes on
//! success, [`LoaderError::Fetch`] with a status when the resource is not
//! there.

use crate::config::{LoaderConfig, SourceMode, NAME_PLACEHOLDER};
use crate::error::{LoaderError, LoaderResult};
use reqwest::{Client, StatusCode};
use std::fmt;
use std::io::ErrorKind;
use std::path::PathBuf;
use tracing::debug;
use url::Url;

/// A resolved place to fetch from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceLocation {
    Local(PathBuf),
    Remote(Url),
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Local(path) => write!(f, "{}", path.display()),
            Self::Remote(url) => write!(f, "{url}"),
        }
    }
}

impl SourceLocation {
    /// Fetch the raw bytes at this location.
    ///
    /// Non-success HTTP statuses become [`LoaderError::Fetch`]. A missing local
    /// file maps to `404 Not Found` and an unreadable one to `403 Forbidden`.
    pub async fn fetch(&self, client: &Client) -> LoaderResult<Vec<u8>> {
        debug!("Fetching {}", self);

        match self {
            Self::Remote(url) => {
                let response = client.get(url.clone()).send().await?;

                let status = response.status();
                if !status.is_success() {
                    return Err(self.fetch_error(status));
                }

                Ok(response.bytes().await?.to_vec())
            }
            Self::Local(path) => match tokio::fs::read(path).await {
                Ok(bytes) => Ok(bytes),
                Err(e) if e.kind() == ErrorKind::NotFound => {
                    Err(self.fetch_error(StatusCode::NOT_FOUND))
                }
                Err(e) if e.kind() == ErrorKind::PermissionDenied => {
                    Err(self.fetch_error(StatusCode::FORBIDDEN))
                }
                Err(e) => Err(e.into()),
            },
        }
    }

    fn fetch_error(&self, status: StatusCode) -> LoaderError {
        LoaderError::Fetch {
            location: self.to_string(),
            status,
        }
    }
}

impl LoaderConfig {
    /// Where the registry manifest lives for the configured mode.
    pub fn registry_location(&self) -> LoaderResult<SourceLocation> {
        match self.mode {
            SourceMode::Development => Ok(SourceLocation::Local(
                self.local.root.join(&self.local.registry_path),
            )),
            SourceMode::Production => Ok(SourceLocation::Remote(Url::parse(
                &self.remote.registry_url,
            )?)),
        }
    }

    /// Where `plugin_name`'s supplementary document lives for the configured
    /// mode.
    pub fn document_location(&self, plugin_name: &str) -> LoaderResult<SourceLocation> {
        check_plugin_name(plugin_name)?;

        match self.mode {
            SourceMode::Development => {
                let relative = self
                    .local
                    .document_path_template
                    .replace(NAME_PLACEHOLDER, plugin_name);
                Ok(SourceLocation::Local(self.local.root.join(relative)))
            }
            SourceMode::Production => {
                let template = &self.remote.document_url_template;
                let url = Url::parse(&template.replace(NAME_PLACEHOLDER, plugin_name))?;

                // The parser normalizes dot segments, so compare the resolved
                // URL against the resolved template prefix.
                let prefix = template.split(NAME_PLACEHOLDER).next().unwrap_or_default();
                if let Ok(base) = Url::parse(prefix) {
                    if !url.as_str().starts_with(base.as_str()) {
                        return Err(LoaderError::InvalidPluginName(plugin_name.to_string()));
                    }
                }

                Ok(SourceLocation::Remote(url))
            }
        }
    }
}

/// Reject names that would escape the document directory once substituted.
///
/// `%` is refused outright: a URL parser decodes `%2e%2e` into a `..` segment.
fn check_plugin_name(name: &str) -> LoaderResult<()> {
    let escapes = name.is_empty()
        || name == "."
        || name.contains("..")
        || name.contains(['/', '\\', '?', '#', '%']);

    if escapes {
        return Err(LoaderError::InvalidPluginName(name.to_string()));
    }

    Ok(())
}
