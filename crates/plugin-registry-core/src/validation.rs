//! Registry manifest validation.
//!
//! Structural checks on a parsed manifest. Enrichment stays lenient about odd
//! shapes; this module is where they are reported. Validation never fails:
//! it always returns a [`ValidationReport`] whose status summarizes the worst
//! issue found.

use crate::manifest::{json_type_name, CapabilityField, LabelList, PluginEntry, RegistryDocument};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashSet;
use tracing::debug;

/// Plugin names are lowercase kebab-case and start with a letter.
static PLUGIN_NAME_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-z][a-z0-9]*(-[a-z0-9]+)*$").expect("Failed to compile plugin name regex")
});

/// Licenses accepted without a warning.
pub const COMMON_SPDX_LICENSES: [&str; 8] = [
    "Apache-2.0",
    "BSD-2-Clause",
    "BSD-3-Clause",
    "GPL-3.0",
    "ISC",
    "LGPL-3.0",
    "MIT",
    "MPL-2.0",
];

/// Severity of a single issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Info,
}

/// Overall outcome of a validation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationStatus {
    Passed,
    Warning,
    Failed,
}

/// One finding.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationIssue {
    pub severity: Severity,
    /// Stable identifier of the check that produced the issue.
    pub check: String,
    pub message: String,
    /// Plugin the issue belongs to, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plugin: Option<String>,
}

/// Collected findings for one document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationReport {
    status: ValidationStatus,
    issues: Vec<ValidationIssue>,
}

impl Default for ValidationReport {
    fn default() -> Self {
        Self {
            status: ValidationStatus::Passed,
            issues: Vec::new(),
        }
    }
}

impl ValidationReport {
    pub fn status(&self) -> ValidationStatus {
        self.status
    }

    pub fn issues(&self) -> &[ValidationIssue] {
        &self.issues
    }

    pub fn errors(&self) -> impl Iterator<Item = &ValidationIssue> {
        self.by_severity(Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &ValidationIssue> {
        self.by_severity(Severity::Warning)
    }

    pub fn infos(&self) -> impl Iterator<Item = &ValidationIssue> {
        self.by_severity(Severity::Info)
    }

    /// True unless an error was recorded.
    pub fn is_ok(&self) -> bool {
        self.status != ValidationStatus::Failed
    }

    /// Whether any issue came from `check`.
    pub fn has_check(&self, check: &str) -> bool {
        self.issues.iter().any(|i| i.check == check)
    }

    fn by_severity(&self, severity: Severity) -> impl Iterator<Item = &ValidationIssue> {
        self.issues.iter().filter(move |i| i.severity == severity)
    }

    fn push(
        &mut self,
        severity: Severity,
        check: impl Into<String>,
        message: String,
        plugin: Option<&str>,
    ) {
        match severity {
            Severity::Error => self.status = ValidationStatus::Failed,
            Severity::Warning if self.status == ValidationStatus::Passed => {
                self.status = ValidationStatus::Warning
            }
            _ => {}
        }

        self.issues.push(ValidationIssue {
            severity,
            check: check.into(),
            message,
            plugin: plugin.map(str::to_string),
        });
    }

    fn error(&mut self, check: impl Into<String>, message: String, plugin: Option<&str>) {
        self.push(Severity::Error, check, message, plugin);
    }

    fn warning(&mut self, check: impl Into<String>, message: String, plugin: Option<&str>) {
        self.push(Severity::Warning, check, message, plugin);
    }

    fn info(&mut self, check: impl Into<String>, message: String, plugin: Option<&str>) {
        self.push(Severity::Info, check, message, plugin);
    }
}

/// Check whether `name` is a well-formed plugin name.
pub fn is_valid_plugin_name(name: &str) -> bool {
    PLUGIN_NAME_PATTERN.is_match(name)
}

/// Validate a parsed registry document.
pub fn validate_document(document: &RegistryDocument) -> ValidationReport {
    let mut report = ValidationReport::default();

    for field in ["name", "owner"] {
        if document.metadata_field(field).is_none() {
            report.error("required_field", format!("Missing required field: {field}"), None);
        }
    }

    match document.metadata_field("owner") {
        Some(Value::Object(owner)) if !owner.contains_key("name") => {
            report.error("owner_name", "Owner must have \"name\" field".to_string(), None);
        }
        Some(Value::Object(_)) | None => {}
        Some(_) => report.error("owner_type", "Owner must be object".to_string(), None),
    }

    let mut seen = HashSet::new();
    for (index, plugin) in document.plugins.iter().enumerate() {
        validate_entry(plugin, index, &mut seen, &mut report);
    }

    debug!(
        "Validated {} plugin entries: {:?} ({} issues)",
        document.plugins.len(),
        report.status(),
        report.issues().len()
    );

    report
}

fn validate_entry(
    plugin: &PluginEntry,
    index: usize,
    seen: &mut HashSet<String>,
    report: &mut ValidationReport,
) {
    let name = plugin.name.as_str();
    if name.is_empty() {
        report.error(
            "plugin_name_missing",
            format!("Plugin at index {index} has an empty \"name\" field"),
            None,
        );
        return;
    }
    let owner = Some(name);

    if !is_valid_plugin_name(name) {
        report.error(
            "name_format",
            format!("Plugin name \"{name}\" must be kebab-case, lowercase, no spaces"),
            owner,
        );
    }

    if !seen.insert(name.to_string()) {
        report.error("duplicate_plugin", format!("Duplicate plugin name: \"{name}\""), owner);
    }

    match plugin.extra_field("source") {
        None => report.error(
            "plugin_source_missing",
            format!("Plugin \"{name}\" missing \"source\" field"),
            owner,
        ),
        Some(Value::String(_)) => {}
        Some(_) => report.error(
            "source_type",
            format!("Plugin \"{name}\" source must be string"),
            owner,
        ),
    }

    match plugin.extra_field("version") {
        None => {}
        Some(Value::String(version)) => {
            if semver::Version::parse(version).is_err() {
                report.error(
                    "version_format",
                    format!(
                        "Version \"{version}\" must follow semantic versioning (MAJOR.MINOR.PATCH)"
                    ),
                    owner,
                );
            }
        }
        Some(other) => report.error(
            "version_type",
            format!("Version must be string, got {}", json_type_name(other)),
            owner,
        ),
    }

    match plugin.extra_field("author") {
        None => {}
        Some(Value::String(author)) => {
            report.error(
                "author_format",
                format!(
                    "Author must be object with \"name\" field, not string. Found: \"{author}\""
                ),
                owner,
            );
            report.info(
                "author_fix",
                format!("Change to: {{\"name\": \"{author}\"}}"),
                owner,
            );
        }
        Some(Value::Object(author)) if !author.contains_key("name") => report.error(
            "author_name",
            "Author object must have \"name\" field".to_string(),
            owner,
        ),
        Some(Value::Object(_)) => {}
        Some(other) => report.error(
            "author_type",
            format!("Author must be object, got {}", json_type_name(other)),
            owner,
        ),
    }

    match plugin.extra_field("license") {
        None => {}
        Some(Value::String(license)) => {
            if !COMMON_SPDX_LICENSES.contains(&license.as_str()) {
                report.warning(
                    "license_spdx",
                    format!(
                        "License \"{license}\" not in common SPDX list. Consider: {}",
                        COMMON_SPDX_LICENSES.join(", ")
                    ),
                    owner,
                );
            }
        }
        Some(other) => report.error(
            "license_type",
            format!("License must be string, got {}", json_type_name(other)),
            owner,
        ),
    }

    match plugin.extra_field("repository") {
        None => {}
        Some(Value::String(repository)) => {
            if !(repository.starts_with("http://") || repository.starts_with("https://")) {
                report.warning(
                    "repository_url",
                    format!("Repository \"{repository}\" should be a valid http(s) URL"),
                    owner,
                );
            }
        }
        Some(other) => report.error(
            "repository_type",
            format!("Repository must be string, got {}", json_type_name(other)),
            owner,
        ),
    }

    for (field, item, labels) in [
        ("tags", "tag", &plugin.tags),
        ("keywords", "keyword", &plugin.keywords),
    ] {
        if let Some(labels) = labels {
            validate_labels(name, field, item, labels, report);
        }
    }

    for (field, value) in [
        ("skills", &plugin.skills),
        ("commands", &plugin.commands),
        ("agents", &plugin.agents),
    ] {
        validate_capability(name, field, value, report);
    }
}

fn validate_labels(
    name: &str,
    field: &str,
    item: &str,
    labels: &LabelList,
    report: &mut ValidationReport,
) {
    let owner = Some(name);

    match labels {
        LabelList::Strings(_) => {}
        LabelList::Malformed(Value::Array(items)) => {
            for (index, label) in items.iter().enumerate().filter(|(_, l)| !l.is_string()) {
                report.error(
                    format!("{item}_type"),
                    format!(
                        "{} at index {index} must be string, got {}",
                        capitalize(item),
                        json_type_name(label)
                    ),
                    owner,
                );
            }
        }
        LabelList::Malformed(other) => report.error(
            format!("{field}_type"),
            format!("{} must be array, got {}", capitalize(field), json_type_name(other)),
            owner,
        ),
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn validate_capability(
    name: &str,
    field: &str,
    value: &CapabilityField,
    report: &mut ValidationReport,
) {
    let owner = Some(name);

    match value {
        CapabilityField::Absent | CapabilityField::Null => return,
        CapabilityField::List(_) | CapabilityField::Single(_) => {}
        CapabilityField::Keyed(_) | CapabilityField::Unrecognized(_) => {
            report.warning(
                format!("{field}_type"),
                format!(
                    "{field} should be string or array, got {}; counted as {}",
                    value.kind(),
                    value.count()
                ),
                owner,
            );
            return;
        }
    }

    for path in value.paths() {
        if path.starts_with('/') {
            report.error(
                format!("{field}_absolute"),
                format!("Path \"{path}\" must be relative, not absolute"),
                owner,
            );
        }
        if !path.starts_with("./") {
            report.warning(
                format!("{field}_prefix"),
                format!("Path \"{path}\" should start with ./ prefix"),
                owner,
            );
        }
    }
}
