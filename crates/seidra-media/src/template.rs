//! `{placeholder}` substitution shared by prompts and command templates.
//!
//! Substitution is permissive: an unresolved placeholder renders as an empty
//! string. `{{` and `}}` render as literal braces. A placeholder may carry a
//! format suffix (`{seed:>4}`, `{name!r}`) which is ignored; lookup uses the
//! root name before any `.`, `[`, `:` or `!`.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::{Captures, Regex};
use seidra_core::error::DomainError;
use serde_json::Value;

static PLACEHOLDER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{|\}\}|\{([^{}]*)\}").expect("valid regex"));

fn root_name(field: &str) -> &str {
    let end = field
        .find(['.', '[', ':', '!'])
        .unwrap_or(field.len());
    field[..end].trim()
}

/// Replaces every placeholder in `template` with whatever `lookup` returns
/// for its root name, or an empty string.
pub fn substitute<F>(template: &str, mut lookup: F) -> String
where
    F: FnMut(&str) -> Option<String>,
{
    PLACEHOLDER_RE
        .replace_all(template, |caps: &Captures<'_>| match &caps[0] {
            "{{" => "{".to_owned(),
            "}}" => "}".to_owned(),
            _ => {
                let name = root_name(caps.get(1).map_or("", |m| m.as_str()));
                lookup(name).unwrap_or_default()
            }
        })
        .into_owned()
}

/// Root names of all placeholders in `template`, deduplicated, in order of
/// first appearance. Escaped braces and empty `{}` are skipped.
#[must_use]
pub fn placeholders(template: &str) -> Vec<String> {
    let mut seen = Vec::new();
    for caps in PLACEHOLDER_RE.captures_iter(template) {
        let Some(field) = caps.get(1) else { continue };
        let name = root_name(field.as_str());
        if !name.is_empty() && !seen.iter().any(|s: &String| s == name) {
            seen.push(name.to_owned());
        }
    }
    seen
}

/// Text form of a JSON variable. Strings are inserted raw, `null` is empty,
/// everything else uses its JSON rendering.
#[must_use]
pub fn value_to_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Operator-supplied template for an external generation command.
///
/// The rendered text is executed as-is; nothing is quoted or escaped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandTemplate {
    template: String,
}

impl CommandTemplate {
    /// Wraps a template string.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if `template` is blank.
    pub fn new(template: impl Into<String>) -> Result<Self, DomainError> {
        let template = template.into();
        if template.trim().is_empty() {
            return Err(DomainError::Validation(
                "command template must not be empty".into(),
            ));
        }
        Ok(Self { template })
    }

    /// The raw template.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.template
    }

    /// Renders the template; unknown placeholders become empty strings.
    #[must_use]
    pub fn render(&self, variables: &BTreeMap<String, String>) -> String {
        substitute(&self.template, |name| variables.get(name).cloned())
    }
}
