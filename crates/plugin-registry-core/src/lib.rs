//! # plugin-registry-core
//!
//! Data model and pure transformations for plugin registry manifests.
//!
//! This crate provides:
//! - The manifest model ([`RegistryDocument`], [`PluginEntry`]) with
//!   capability fields decoded into an explicit [`CapabilityField`] union
//! - The [`Enricher`], which derives capability counts, a search blob and a
//!   category color for every entry
//! - A [`CategoryPalette`] that can be swapped for alternate color schemes
//! - Structural validation of manifests ([`validate_document`])
//!
//! Nothing here performs I/O; fetching lives in `plugin-registry-loader`.
//!
//! ## Example
//!
//! ```rust
//! use plugin_registry_core::prelude::*;
//!
//! let doc = RegistryDocument::from_str(
//!     r#"{"plugins": [{"name": "x", "skills": ["a", "b"], "category": "AI"}]}"#,
//! )
//! .unwrap();
//!
//! let enriched = Enricher::default().enrich(doc);
//! let entry = &enriched.plugins()[0];
//! assert_eq!(entry.skill_count(), 2);
//! assert_eq!(entry.category_color(), ColorTag::Pink);
//! ```

pub mod enrich;
pub mod error;
pub mod manifest;
pub mod palette;
pub mod validation;

pub use enrich::{search_terms, EnrichedPluginEntry, EnrichedRegistryDocument, Enricher};
pub use error::{ManifestError, ManifestResult};
pub use manifest::{CapabilityField, LabelList, PluginEntry, RegistryDocument};
pub use palette::{CategoryPalette, ColorTag};
pub use validation::{
    is_valid_plugin_name, validate_document, Severity, ValidationIssue, ValidationReport,
    ValidationStatus,
};

pub mod prelude {
    pub use crate::enrich::{EnrichedPluginEntry, EnrichedRegistryDocument, Enricher};
    pub use crate::error::{ManifestError, ManifestResult};
    pub use crate::manifest::{CapabilityField, PluginEntry, RegistryDocument};
    pub use crate::palette::{CategoryPalette, ColorTag};
    pub use crate::validation::{validate_document, ValidationReport, ValidationStatus};
}
