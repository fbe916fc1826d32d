//! Manifest enrichment.
//!
//! Derives the read-only display fields of every plugin entry once, at load
//! time: capability counts, a normalized search blob, and a category color.
//! Enrichment is additive; the original entry is kept whole.

use crate::manifest::{PluginEntry, RegistryDocument};
use crate::palette::{CategoryPalette, ColorTag};
use serde::ser::{Error as _, Serializer};
use serde::Serialize;
use serde_json::{Map, Value};
use std::iter;
use tracing::debug;

/// Keys added to every enriched entry when it is serialized.
pub const DERIVED_FIELDS: [&str; 5] = [
    "skillCount",
    "commandCount",
    "agentCount",
    "searchTerms",
    "categoryColor",
];

/// A plugin entry together with its derived fields.
///
/// Serializes as the original entry's fields followed by the derived ones.
/// An original field that shares a derived key is replaced in the output; it
/// stays readable through [`EnrichedPluginEntry::entry`].
#[derive(Debug, Clone, PartialEq)]
pub struct EnrichedPluginEntry {
    entry: PluginEntry,
    skill_count: usize,
    command_count: usize,
    agent_count: usize,
    search_terms: String,
    category_color: ColorTag,
}

impl EnrichedPluginEntry {
    /// The original entry, unchanged.
    pub fn entry(&self) -> &PluginEntry {
        &self.entry
    }

    pub fn into_entry(self) -> PluginEntry {
        self.entry
    }

    pub fn name(&self) -> &str {
        &self.entry.name
    }

    pub fn skill_count(&self) -> usize {
        self.skill_count
    }

    pub fn command_count(&self) -> usize {
        self.command_count
    }

    pub fn agent_count(&self) -> usize {
        self.agent_count
    }

    /// Lower-cased blob of tags, keywords, name, description and category.
    pub fn search_terms(&self) -> &str {
        &self.search_terms
    }

    pub fn category_color(&self) -> ColorTag {
        self.category_color
    }

    /// Case-insensitive substring match against the search blob. A blank
    /// query matches every entry.
    pub fn matches(&self, query: &str) -> bool {
        let query = query.trim();
        query.is_empty() || self.search_terms.contains(&query.to_lowercase())
    }

    /// Whether the entry's category equals `category`, ignoring case.
    pub fn in_category(&self, category: &str) -> bool {
        self.entry
            .category
            .as_deref()
            .is_some_and(|c| c.to_lowercase() == category.to_lowercase())
    }
}

impl Serialize for EnrichedPluginEntry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut fields = match serde_json::to_value(&self.entry).map_err(S::Error::custom)? {
            Value::Object(fields) => fields,
            _ => return Err(S::Error::custom("plugin entry did not serialize to an object")),
        };

        let derived = [
            Value::from(self.skill_count),
            Value::from(self.command_count),
            Value::from(self.agent_count),
            Value::from(self.search_terms.as_str()),
            Value::from(self.category_color.as_str()),
        ];
        for (key, value) in DERIVED_FIELDS.into_iter().zip(derived) {
            fields.insert(key.to_string(), value);
        }

        fields.serialize(serializer)
    }
}

/// A registry document whose entries have been enriched.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnrichedRegistryDocument {
    plugins: Vec<EnrichedPluginEntry>,
    #[serde(flatten)]
    metadata: Map<String, Value>,
}

impl EnrichedRegistryDocument {
    /// Enriched entries, in the order of the source document.
    pub fn plugins(&self) -> &[EnrichedPluginEntry] {
        &self.plugins
    }

    /// Top-level metadata carried over from the source document.
    pub fn metadata(&self) -> &Map<String, Value> {
        &self.metadata
    }

    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }

    /// Find an entry by exact name.
    pub fn find(&self, name: &str) -> Option<&EnrichedPluginEntry> {
        self.plugins.iter().find(|p| p.name() == name)
    }

    /// Entries whose search blob contains `query`.
    pub fn search(&self, query: &str) -> Vec<&EnrichedPluginEntry> {
        self.plugins.iter().filter(|p| p.matches(query)).collect()
    }

    /// Entries in `category`, compared case-insensitively.
    pub fn in_category(&self, category: &str) -> Vec<&EnrichedPluginEntry> {
        self.plugins
            .iter()
            .filter(|p| p.in_category(category))
            .collect()
    }

    /// Distinct lower-cased categories, in first-seen order.
    pub fn categories(&self) -> Vec<String> {
        let mut seen: Vec<String> = Vec::new();
        for category in self.plugins.iter().filter_map(|p| p.entry.category.as_deref()) {
            let category = category.to_lowercase();
            if !category.is_empty() && !seen.contains(&category) {
                seen.push(category);
            }
        }
        seen
    }
}

/// Pure transformation from a parsed document to an enriched one.
#[derive(Debug, Clone, Default)]
pub struct Enricher {
    palette: CategoryPalette,
}

impl Enricher {
    /// Create an enricher that colors categories with `palette`.
    pub fn new(palette: CategoryPalette) -> Self {
        Self { palette }
    }

    pub fn palette(&self) -> &CategoryPalette {
        &self.palette
    }

    /// Enrich every entry of `document`, preserving order and metadata.
    pub fn enrich(&self, document: RegistryDocument) -> EnrichedRegistryDocument {
        let plugins: Vec<EnrichedPluginEntry> = document
            .plugins
            .into_iter()
            .map(|entry| self.enrich_entry(entry))
            .collect();

        debug!("Enriched {} plugin entries", plugins.len());

        EnrichedRegistryDocument {
            plugins,
            metadata: document.metadata,
        }
    }

    /// Enrich a single entry.
    pub fn enrich_entry(&self, entry: PluginEntry) -> EnrichedPluginEntry {
        for key in DERIVED_FIELDS {
            if entry.extra.contains_key(key) {
                debug!(
                    "Plugin {} carries a {} field; the derived value replaces it",
                    entry.name, key
                );
            }
        }

        EnrichedPluginEntry {
            skill_count: entry.skills.count(),
            command_count: entry.commands.count(),
            agent_count: entry.agents.count(),
            search_terms: search_terms(&entry),
            category_color: self.palette.color_for(entry.category.as_deref()),
            entry,
        }
    }
}

/// Build the search blob for an entry.
///
/// Order is tags, keywords, name, description, category. Empty strings are
/// dropped before joining.
pub fn search_terms(entry: &PluginEntry) -> String {
    entry
        .tags()
        .iter()
        .map(String::as_str)
        .chain(entry.keywords().iter().map(String::as_str))
        .chain(iter::once(entry.name.as_str()))
        .chain(entry.description.as_deref())
        .chain(iter::once(entry.category.as_deref().unwrap_or_default()))
        .filter(|term| !term.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn entry(value: Value) -> PluginEntry {
        serde_json::from_value(value).unwrap()
    }

    fn document(value: Value) -> RegistryDocument {
        RegistryDocument::from_value(value).unwrap()
    }

    #[test]
    fn test_list_skills_and_known_category() {
        let enriched = Enricher::default().enrich_entry(entry(json!({
            "name": "x",
            "skills": ["a", "b"],
            "category": "AI"
        })));

        assert_eq!(enriched.skill_count(), 2);
        assert_eq!(enriched.category_color(), ColorTag::Pink);
    }

    #[test]
    fn test_bare_entry_defaults() {
        let enriched = Enricher::default().enrich_entry(entry(json!({"name": "y"})));

        assert_eq!(enriched.skill_count(), 0);
        assert_eq!(enriched.command_count(), 0);
        assert_eq!(enriched.agent_count(), 0);
        assert_eq!(enriched.category_color(), ColorTag::Gray);
        assert_eq!(enriched.search_terms(), "y");
    }

    #[test]
    fn test_empty_string_skills_count_zero() {
        let enriched = Enricher::default().enrich_entry(entry(json!({"name": "p", "skills": ""})));
        assert_eq!(enriched.skill_count(), 0);
    }

    #[test]
    fn test_derived_fields_replace_same_named_input() {
        let enriched = Enricher::default().enrich_entry(entry(json!({
            "name": "stale",
            "skills": ["./a"],
            "skillCount": 99,
            "categoryColor": "blue"
        })));

        let text = serde_json::to_string(&enriched).unwrap();
        assert_eq!(text.matches("\"skillCount\"").count(), 1);
        assert_eq!(text.matches("\"categoryColor\"").count(), 1);

        let serialized: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(serialized["skillCount"], json!(1));
        assert_eq!(serialized["categoryColor"], json!("gray"));
        assert_eq!(enriched.entry().extra_field("skillCount"), Some(&json!(99)));
    }

    #[test]
    fn test_keyed_skills_count_keys() {
        let enriched = Enricher::default().enrich_entry(entry(json!({
            "name": "z",
            "skills": {"lint": {"path": "./lint"}, "test": {"path": "./test"}}
        })));

        assert_eq!(enriched.skill_count(), 2);
    }

    #[test]
    fn test_single_string_and_odd_shapes() {
        let enriched = Enricher::default().enrich_entry(entry(json!({
            "name": "w",
            "commands": "./commands",
            "agents": true,
            "skills": null
        })));

        assert_eq!(enriched.command_count(), 1);
        assert_eq!(enriched.agent_count(), 0);
        assert_eq!(enriched.skill_count(), 0);
    }

    #[test]
    fn test_search_terms_order_and_case() {
        let enriched = Enricher::default().enrich_entry(entry(json!({
            "name": "LangGraph-Agents",
            "description": "Deploy LangGraph agents",
            "category": "Cloud",
            "tags": ["AWS", ""],
            "keywords": ["Bedrock", "AgentCore"]
        })));

        assert_eq!(
            enriched.search_terms(),
            "aws bedrock agentcore langgraph-agents deploy langgraph agents cloud"
        );
        assert_eq!(enriched.search_terms(), enriched.search_terms().to_lowercase());
    }

    #[test]
    fn test_search_terms_contains_name_and_description() {
        let e = entry(json!({"name": "Memory-Demo", "description": "Persistent MEMORY store"}));
        let terms = search_terms(&e);
        assert!(terms.contains("memory-demo"));
        assert!(terms.contains("persistent memory store"));
    }

    #[test]
    fn test_color_is_case_insensitive() {
        let enricher = Enricher::default();
        for category in ["security", "SECURITY", "Security"] {
            let e = enricher.enrich_entry(entry(json!({"name": "s", "category": category})));
            assert_eq!(e.category_color(), ColorTag::Red);
        }
        let unknown = enricher.enrich_entry(entry(json!({"name": "u", "category": "Music"})));
        assert_eq!(unknown.category_color(), ColorTag::Gray);
    }

    #[test]
    fn test_injected_palette() {
        let palette = CategoryPalette::new(ColorTag::Teal).with("music", ColorTag::Orange);
        let enricher = Enricher::new(palette);

        let music = enricher.enrich_entry(entry(json!({"name": "m", "category": "Music"})));
        let ai = enricher.enrich_entry(entry(json!({"name": "a", "category": "ai"})));
        assert_eq!(music.category_color(), ColorTag::Orange);
        assert_eq!(ai.category_color(), ColorTag::Teal);
    }

    #[test]
    fn test_enrich_preserves_order_and_metadata() {
        let doc = document(json!({
            "name": "agent-skills",
            "owner": {"name": "maintainers"},
            "plugins": [{"name": "c"}, {"name": "a"}, {"name": "b"}]
        }));

        let enriched = Enricher::default().enrich(doc);
        let names: Vec<&str> = enriched.plugins().iter().map(|p| p.name()).collect();
        assert_eq!(names, vec!["c", "a", "b"]);
        assert_eq!(enriched.metadata().get("name"), Some(&json!("agent-skills")));
    }

    #[test]
    fn test_enrich_keeps_original_fields() {
        let raw = json!({
            "name": "keep",
            "source": "./plugins/keep",
            "version": "0.3.1",
            "skills": ["./skills/one"],
            "category": "Tools"
        });
        let doc = document(json!({"plugins": [raw.clone()]}));

        let enriched = Enricher::default().enrich(doc);
        let serialized = serde_json::to_value(&enriched.plugins()[0]).unwrap();

        for (key, value) in raw.as_object().unwrap() {
            assert_eq!(serialized.get(key), Some(value), "field {key} changed");
        }
        assert_eq!(serialized["skillCount"], json!(1));
        assert_eq!(serialized["commandCount"], json!(0));
        assert_eq!(serialized["categoryColor"], json!("yellow"));
        assert_eq!(serialized["searchTerms"], json!("keep tools"));
    }

    #[test]
    fn test_query_helpers() {
        let doc = document(json!({
            "plugins": [
                {"name": "aws-agentcore", "category": "Cloud", "tags": ["bedrock"]},
                {"name": "baml-extraction", "category": "AI", "description": "Typed output"},
                {"name": "code-interpreter", "category": "cloud"},
                {"name": "uncategorized"}
            ]
        }));
        let enriched = Enricher::default().enrich(doc);

        assert_eq!(enriched.search("BEDROCK").len(), 1);
        assert_eq!(enriched.search("extraction").len(), 1);
        assert_eq!(enriched.search("  ").len(), 4);
        assert_eq!(enriched.in_category("CLOUD").len(), 2);
        assert_eq!(enriched.categories(), vec!["cloud".to_string(), "ai".to_string()]);
        assert!(enriched.find("baml-extraction").is_some());
        assert!(enriched.find("missing").is_none());
    }
}
