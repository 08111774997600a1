//! Message templates and placeholder substitution

use std::collections::HashMap;

use crate::core::rules;

/// Rendered when a failing rule has no template.
const FALLBACK: &str = "Validation error.";

/// Built-in template for every rule that can fail.
///
/// `between` renders both bounds through `:values`.
const DEFAULT_TEMPLATES: [(&str, &str); 19] = [
    ("required", "The :field field is required."),
    ("email", "The :field field must be a valid email address."),
    ("min", "The :field field must be at least :param characters."),
    ("max", "The :field field must not exceed :param characters."),
    ("between", "The :field field must be between :values characters."),
    ("numeric", "The :field field must be a number."),
    ("integer", "The :field field must be an integer."),
    ("url", "The :field field must be a valid URL."),
    ("date", "The :field field must be a valid date (Y-m-d)."),
    ("confirmed", "The :field confirmation does not match."),
    ("same", "The :field field must match the :param field."),
    ("unique", "The :field field must be unique."),
    ("exists", "The :field field does not exist."),
    (
        "in",
        "The :field field must be one of the following values: :values.",
    ),
    ("regex", "The :field field format is invalid."),
    ("size", "The :field field must be exactly :param characters."),
    (
        "date_format",
        "The :field field does not match the format :param.",
    ),
    ("file", "The :field field must be a valid uploaded file."),
    ("mimes", "The :field field must be a file of type: :types."),
];

/// The rule-name to message-template catalog.
///
/// Starts from the built-in templates; individual entries can be replaced
/// with [`set`](Messages::set) or merged in bulk from configuration.
#[derive(Debug, Clone)]
pub struct Messages {
    templates: HashMap<String, String>,
}

impl Default for Messages {
    fn default() -> Self {
        let templates = DEFAULT_TEMPLATES
            .iter()
            .map(|(rule, template)| (rule.to_string(), template.to_string()))
            .collect();
        Self { templates }
    }
}

impl Messages {
    /// Create a catalog holding the built-in templates
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the template registered for a rule, if any
    pub fn template(&self, rule: &str) -> Option<&str> {
        self.templates.get(rule).map(String::as_str)
    }

    /// Replace the template for one rule.
    ///
    /// A template set for a name outside the rule vocabulary is kept but
    /// can never render; a warning is logged so typos surface early.
    pub fn set(&mut self, rule: impl Into<String>, template: impl Into<String>) {
        let rule = rule.into();
        if !rules::is_rule_name(&rule) {
            tracing::warn!(rule = %rule, "message template set for unknown rule");
        }
        self.templates.insert(rule, template.into());
    }

    /// Merge a batch of overrides, typically loaded from configuration
    pub fn merge(&mut self, overrides: &HashMap<String, String>) {
        for (rule, template) in overrides {
            self.set(rule.clone(), template.clone());
        }
    }

    /// Render the message for a failed rule.
    ///
    /// Substitution is a literal text replace, applied in a fixed order:
    /// `:field`, then `:param` (the empty string when the rule has none),
    /// then `:values` and `:types` when the rule supplied a value list.
    /// Replacement text is never re-scanned and never escaped.
    pub fn render(&self, rule: &str, field: &str, param: Option<&str>, values: &[String]) -> String {
        let template = self.template(rule).unwrap_or(FALLBACK);
        let mut message = template.replace(":field", field);
        message = message.replace(":param", param.unwrap_or(""));
        if !values.is_empty() {
            let joined = values.join(", ");
            message = message.replace(":values", &joined);
            message = message.replace(":types", &joined);
        }
        message
    }
}
