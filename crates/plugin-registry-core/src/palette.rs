//! Category color palette.
//!
//! Maps free-text plugin categories to a small set of symbolic color tags.
//! Lookups are case-insensitive and never fail: unknown categories get the
//! palette's fallback color.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Symbolic color tag attached to an enriched entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorTag {
    Blue,
    Purple,
    Green,
    Yellow,
    Pink,
    Red,
    Orange,
    Teal,
    Gray,
}

impl ColorTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Blue => "blue",
            Self::Purple => "purple",
            Self::Green => "green",
            Self::Yellow => "yellow",
            Self::Pink => "pink",
            Self::Red => "red",
            Self::Orange => "orange",
            Self::Teal => "teal",
            Self::Gray => "gray",
        }
    }
}

impl fmt::Display for ColorTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable category-to-color table.
///
/// Keys are stored lower-cased, so `"AI"`, `"ai"` and `"Ai"` all resolve to
/// the same color.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryPalette {
    colors: HashMap<String, ColorTag>,
    fallback: ColorTag,
}

impl CategoryPalette {
    /// Create an empty palette that resolves every category to `fallback`.
    pub fn new(fallback: ColorTag) -> Self {
        Self {
            colors: HashMap::new(),
            fallback,
        }
    }

    /// Builder-style insert.
    pub fn with(mut self, category: &str, color: ColorTag) -> Self {
        self.insert(category, color);
        self
    }

    /// Map `category` to `color`, replacing any previous mapping.
    pub fn insert(&mut self, category: &str, color: ColorTag) {
        self.colors.insert(category.to_lowercase(), color);
    }

    /// Resolve the color for an optional category.
    pub fn color_for(&self, category: Option<&str>) -> ColorTag {
        category
            .and_then(|c| self.colors.get(&c.to_lowercase()))
            .copied()
            .unwrap_or(self.fallback)
    }

    /// Color used for absent or unmapped categories.
    pub fn fallback(&self) -> ColorTag {
        self.fallback
    }

    /// Whether `category` has an explicit mapping.
    pub fn contains(&self, category: &str) -> bool {
        self.colors.contains_key(&category.to_lowercase())
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }
}

impl Default for CategoryPalette {
    fn default() -> Self {
        Self::new(ColorTag::Gray)
            .with("development", ColorTag::Blue)
            .with("cloud", ColorTag::Purple)
            .with("productivity", ColorTag::Green)
            .with("tools", ColorTag::Yellow)
            .with("ai", ColorTag::Pink)
            .with("security", ColorTag::Red)
    }
}

impl<S: AsRef<str>> Extend<(S, ColorTag)> for CategoryPalette {
    fn extend<I: IntoIterator<Item = (S, ColorTag)>>(&mut self, iter: I) {
        for (category, color) in iter {
            self.insert(category.as_ref(), color);
        }
    }
}
