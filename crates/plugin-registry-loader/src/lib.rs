//! # plugin-registry-loader
//!
//! Retrieval side of the plugin registry.
//!
//! [`RegistryLoader`] resolves where the registry lives (a local checkout in
//! development, the hosted copy in production), fetches it, parses it and
//! hands it to the [`Enricher`](plugin_registry_core::Enricher). It also loads
//! per-plugin README documents on a best-effort basis.
//!
//! ## Error policy
//!
//! - The registry is required: fetch and parse failures are logged and
//!   returned as [`LoaderError`].
//! - Plugin documents are optional: every failure resolves to `None`.
//!
//! ## Configuration
//!
//! ```rust
//! use plugin_registry_loader::{LoaderConfig, RemoteSource, SourceMode};
//!
//! let dev = LoaderConfig::development("/path/to/marketplace");
//! assert_eq!(dev.mode, SourceMode::Development);
//!
//! let prod = LoaderConfig::production(RemoteSource::from_base("https://example.com/marketplace"));
//! assert!(prod.validate().is_ok());
//! ```

pub mod config;
pub mod error;
pub mod loader;
pub mod source;

pub use config::{LoaderConfig, LocalSource, RemoteSource, SourceMode};
pub use error::{LoaderError, LoaderResult};
pub use loader::RegistryLoader;
pub use source::SourceLocation;
