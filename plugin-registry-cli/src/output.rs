//! Plain-text rendering for command output.

use plugin_registry_core::{EnrichedPluginEntry, Severity, ValidationReport, ValidationStatus};
use std::fmt::Write;

/// One summary line per plugin.
pub fn plugin_line(plugin: &EnrichedPluginEntry) -> String {
    format!(
        "{:<36} {:<7} skills={:<3} commands={:<3} agents={}",
        plugin.name(),
        plugin.category_color().as_str(),
        plugin.skill_count(),
        plugin.command_count(),
        plugin.agent_count()
    )
}

/// Full entry view, followed by the README when one exists.
pub fn plugin_detail(plugin: &EnrichedPluginEntry, document: Option<&str>) -> String {
    let entry = plugin.entry();
    let mut out = String::new();

    let _ = writeln!(out, "{}", entry.name);
    if let Some(description) = &entry.description {
        let _ = writeln!(out, "  {description}");
    }
    let _ = writeln!(
        out,
        "  category: {} ({})",
        entry.category.as_deref().unwrap_or("-"),
        plugin.category_color()
    );
    let _ = writeln!(
        out,
        "  skills: {}  commands: {}  agents: {}",
        plugin.skill_count(),
        plugin.command_count(),
        plugin.agent_count()
    );

    let labels: Vec<&str> = entry
        .tags()
        .iter()
        .chain(entry.keywords())
        .map(String::as_str)
        .collect();
    if !labels.is_empty() {
        let _ = writeln!(out, "  tags: {}", labels.join(", "));
    }

    out.push('\n');
    match document {
        Some(text) => out.push_str(text),
        None => out.push_str("(no README available)\n"),
    }

    out
}

/// Human-readable validation report.
pub fn validation_report(report: &ValidationReport) -> String {
    let mut out = String::new();

    let headline = match report.status() {
        ValidationStatus::Passed => "passed",
        ValidationStatus::Warning => "passed with warnings",
        ValidationStatus::Failed => "failed",
    };
    let _ = writeln!(out, "Registry validation {headline}");

    for issue in report.issues() {
        let label = match issue.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Info => "info",
        };
        match &issue.plugin {
            Some(plugin) => {
                let _ = writeln!(out, "  [{label}] {plugin}: {} ({})", issue.message, issue.check);
            }
            None => {
                let _ = writeln!(out, "  [{label}] {} ({})", issue.message, issue.check);
            }
        }
    }

    let _ = writeln!(
        out,
        "{} errors, {} warnings",
        report.errors().count(),
        report.warnings().count()
    );

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use plugin_registry_core::{validate_document, Enricher, PluginEntry, RegistryDocument};
    use serde_json::json;

    fn enriched(value: serde_json::Value) -> EnrichedPluginEntry {
        let entry: PluginEntry = serde_json::from_value(value).unwrap();
        Enricher::default().enrich_entry(entry)
    }

    #[test]
    fn test_plugin_line() {
        let plugin = enriched(json!({"name": "baml", "category": "AI", "skills": ["./a"]}));
        let line = plugin_line(&plugin);
        assert!(line.starts_with("baml"));
        assert!(line.contains("pink"));
        assert!(line.contains("skills=1"));
        assert!(line.ends_with("agents=0"));
    }

    #[test]
    fn test_plugin_detail_with_and_without_readme() {
        let plugin = enriched(json!({
            "name": "memory-demo",
            "description": "Agent memory",
            "tags": ["memory"],
            "keywords": ["agentcore"]
        }));

        let with = plugin_detail(&plugin, Some("# Memory\n"));
        assert!(with.contains("Agent memory"));
        assert!(with.contains("category: - (gray)"));
        assert!(with.contains("tags: memory, agentcore"));
        assert!(with.ends_with("# Memory\n"));

        let without = plugin_detail(&plugin, None);
        assert!(without.contains("(no README available)"));
    }

    #[test]
    fn test_validation_report_text() {
        let doc = RegistryDocument::from_value(json!({
            "name": "m",
            "owner": {"name": "o"},
            "plugins": [{"name": "Bad Name", "source": "./x"}]
        }))
        .unwrap();

        let text = validation_report(&validate_document(&doc));
        assert!(text.starts_with("Registry validation failed"));
        assert!(text.contains("[error] Bad Name:"));
        assert!(text.contains("(name_format)"));
        assert!(text.trim_end().ends_with("1 errors, 0 warnings"));
    }
}
