//! Registry manifest model.
//!
//! A registry manifest is a JSON document with a top-level `plugins` array and
//! any number of metadata fields (`name`, `owner`, `metadata`, ...). Fields the
//! model does not name are carried through verbatim, both at the top level and
//! on each plugin entry.

use crate::error::{ManifestError, ManifestResult};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A parsed registry manifest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegistryDocument {
    /// Plugin entries, in display order.
    pub plugins: Vec<PluginEntry>,

    /// Every other top-level field, untouched.
    #[serde(flatten)]
    pub metadata: Map<String, Value>,
}

impl RegistryDocument {
    /// Create a document with the given entries and no metadata.
    pub fn new(plugins: Vec<PluginEntry>) -> Self {
        Self {
            plugins,
            metadata: Map::new(),
        }
    }

    /// Parse a manifest from raw bytes.
    pub fn from_slice(bytes: &[u8]) -> ManifestResult<Self> {
        let value: Value = serde_json::from_slice(bytes)?;
        Self::from_value(value)
    }

    /// Parse a manifest from a JSON string.
    pub fn from_str(content: &str) -> ManifestResult<Self> {
        Self::from_slice(content.as_bytes())
    }

    /// Decode a manifest from an already-parsed JSON value.
    pub fn from_value(value: Value) -> ManifestResult<Self> {
        let object = match &value {
            Value::Object(object) => object,
            other => return Err(ManifestError::NotAnObject(json_type_name(other))),
        };

        if !object.contains_key("plugins") {
            return Err(ManifestError::MissingPlugins);
        }

        Ok(serde_json::from_value(value)?)
    }

    /// Look up a top-level metadata field.
    pub fn metadata_field(&self, key: &str) -> Option<&Value> {
        self.metadata.get(key)
    }
}

/// One plugin's registration record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PluginEntry {
    /// Unique, human-readable identifier.
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Free-text classification, compared case-insensitively.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<LabelList>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keywords: Option<LabelList>,

    #[serde(default, skip_serializing_if = "CapabilityField::is_absent")]
    pub skills: CapabilityField,

    #[serde(default, skip_serializing_if = "CapabilityField::is_absent")]
    pub commands: CapabilityField,

    #[serde(default, skip_serializing_if = "CapabilityField::is_absent")]
    pub agents: CapabilityField,

    /// Every other field (`source`, `version`, `author`, ...), untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl PluginEntry {
    /// Create an entry with only a name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            category: None,
            tags: None,
            keywords: None,
            skills: CapabilityField::Absent,
            commands: CapabilityField::Absent,
            agents: CapabilityField::Absent,
            extra: Map::new(),
        }
    }

    /// Tags, or an empty slice when the field is absent or malformed.
    pub fn tags(&self) -> &[String] {
        self.tags.as_ref().map_or(&[][..], LabelList::as_slice)
    }

    /// Keywords, or an empty slice when the field is absent or malformed.
    pub fn keywords(&self) -> &[String] {
        self.keywords.as_ref().map_or(&[][..], LabelList::as_slice)
    }

    /// Look up a field the model does not name.
    pub fn extra_field(&self, key: &str) -> Option<&Value> {
        self.extra.get(key)
    }
}

/// A `tags` or `keywords` field.
///
/// Anything other than an array of strings is kept as-is under
/// [`LabelList::Malformed`] so the entry still decodes and validation can
/// report the shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "Value", into = "Value")]
pub enum LabelList {
    Strings(Vec<String>),
    Malformed(Value),
}

impl LabelList {
    /// The labels, or an empty slice for a malformed field.
    pub fn as_slice(&self) -> &[String] {
        match self {
            Self::Strings(labels) => labels,
            Self::Malformed(_) => &[],
        }
    }
}

impl From<Vec<String>> for LabelList {
    fn from(labels: Vec<String>) -> Self {
        Self::Strings(labels)
    }
}

impl From<Value> for LabelList {
    fn from(value: Value) -> Self {
        match value {
            Value::Array(items) if items.iter().all(Value::is_string) => Self::Strings(
                items
                    .into_iter()
                    .filter_map(|item| match item {
                        Value::String(label) => Some(label),
                        _ => None,
                    })
                    .collect(),
            ),
            other => Self::Malformed(other),
        }
    }
}

impl From<LabelList> for Value {
    fn from(list: LabelList) -> Self {
        match list {
            LabelList::Strings(labels) => {
                Value::Array(labels.into_iter().map(Value::String).collect())
            }
            LabelList::Malformed(value) => value,
        }
    }
}

/// A declared capability field (`skills`, `commands`, `agents`).
///
/// Registries disagree on the shape of these fields, so the raw JSON value is
/// classified once at decode time and kept, which lets the entry serialize
/// back exactly as it arrived.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "Value", into = "Value")]
pub enum CapabilityField {
    /// The field was not present.
    #[default]
    Absent,
    /// The field was present with an explicit `null`.
    Null,
    /// A sequence of capability declarations (usually relative paths).
    List(Vec<Value>),
    /// A single declaration.
    Single(String),
    /// Declarations keyed by capability name.
    Keyed(Map<String, Value>),
    /// Any other JSON shape (number, boolean).
    Unrecognized(Value),
}

impl CapabilityField {
    /// Number of declared capabilities. Shapes that carry no declarations,
    /// including an empty string, count as zero.
    pub fn count(&self) -> usize {
        match self {
            Self::List(items) => items.len(),
            Self::Single(path) => usize::from(!path.is_empty()),
            Self::Keyed(map) => map.len(),
            Self::Absent | Self::Null | Self::Unrecognized(_) => 0,
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }

    /// Short name of the decoded shape, used in diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Absent => "absent",
            Self::Null => "null",
            Self::List(_) => "array",
            Self::Single(_) => "string",
            Self::Keyed(_) => "object",
            Self::Unrecognized(value) => json_type_name(value),
        }
    }

    /// String declarations, in order. Non-string list items are skipped.
    pub fn paths(&self) -> Vec<&str> {
        match self {
            Self::List(items) => items.iter().filter_map(Value::as_str).collect(),
            Self::Single(path) => vec![path.as_str()],
            _ => Vec::new(),
        }
    }
}

impl From<Value> for CapabilityField {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Array(items) => Self::List(items),
            Value::String(path) => Self::Single(path),
            Value::Object(map) => Self::Keyed(map),
            other => Self::Unrecognized(other),
        }
    }
}

impl From<CapabilityField> for Value {
    fn from(field: CapabilityField) -> Self {
        match field {
            CapabilityField::Absent | CapabilityField::Null => Value::Null,
            CapabilityField::List(items) => Value::Array(items),
            CapabilityField::Single(path) => Value::String(path),
            CapabilityField::Keyed(map) => Value::Object(map),
            CapabilityField::Unrecognized(value) => value,
        }
    }
}

pub(crate) fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
