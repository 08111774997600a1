//! The validation engine: rule specs, the error map and the evaluation loop

use std::sync::Arc;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::config::ValidatorConfig;
use crate::core::error::{Result, RuleParseError};
use crate::core::messages::Messages;
use crate::core::rules::{self, Checked, Rule};
use crate::core::sanitize::sanitize;
use crate::core::value::{Input, Value};
use crate::store::RowCount;

/// Ordered mapping from field name to its rule-chain string.
///
/// Fields are evaluated, and their errors reported, in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RuleSpec {
    bindings: IndexMap<String, String>,
}

impl RuleSpec {
    /// Create an empty spec
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a field to a rule chain, builder style.
    ///
    /// Binding a field twice replaces its chain but keeps its original
    /// position.
    pub fn field(mut self, name: impl Into<String>, chain: impl Into<String>) -> Self {
        self.bindings.insert(name.into(), chain.into());
        self
    }

    /// Parse the compact one-string form: `field:chain` bindings separated
    /// by `;`, e.g. `"username:required|min:3;email:required|email"`.
    ///
    /// Each binding splits on its first `:`, so chains keep their own
    /// colons. Empty segments from a trailing `;` are skipped; a binding
    /// without both a field name and a chain is an error.
    pub fn parse(spec: &str) -> Result<Self, RuleParseError> {
        let mut parsed = Self::new();
        for binding in spec.split(';') {
            if binding.is_empty() {
                continue;
            }
            let (field, chain) = binding.split_once(':').ok_or(RuleParseError::MalformedSpec {
                binding: binding.to_string(),
            })?;
            if field.is_empty() || chain.is_empty() {
                return Err(RuleParseError::MalformedSpec {
                    binding: binding.to_string(),
                });
            }
            parsed.bindings.insert(field.to_string(), chain.to_string());
        }
        Ok(parsed)
    }

    /// Iterate the bindings in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.bindings
            .iter()
            .map(|(field, chain)| (field.as_str(), chain.as_str()))
    }

    /// Number of bound fields
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

/// Validation messages collected for one pass, field by field.
///
/// Fields appear in evaluation order, and only when at least one of their
/// rules failed. With per-field short-circuiting each field holds at most
/// one message per pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Errors {
    fields: IndexMap<String, Vec<String>>,
}

impl Errors {
    pub(crate) fn add(&mut self, field: &str, message: String) {
        self.fields.entry(field.to_string()).or_default().push(message);
    }

    /// True when no field failed
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Number of fields with at least one message
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether this field failed
    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    /// The first message recorded for a field, if any
    pub fn first(&self, field: &str) -> Option<&str> {
        self.fields
            .get(field)
            .and_then(|messages| messages.first())
            .map(String::as_str)
    }

    /// All messages recorded for a field
    pub fn messages(&self, field: &str) -> &[String] {
        self.fields.get(field).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Iterate failed fields in evaluation order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.fields
            .iter()
            .map(|(field, messages)| (field.as_str(), messages.as_slice()))
    }
}

/// The validation engine.
///
/// Owns the message catalog, the optional row-count store backing `unique`
/// and `exists`, and the error map from the most recent
/// [`validate`](Validator::validate) call.
#[derive(Clone)]
pub struct Validator {
    messages: Messages,
    store: Option<Arc<dyn RowCount>>,
    errors: Errors,
}

impl Validator {
    /// Create a validator with the built-in message catalog and no store
    pub fn new() -> Self {
        Self {
            messages: Messages::new(),
            store: None,
            errors: Errors::default(),
        }
    }

    /// Replace the message catalog
    pub fn with_messages(mut self, messages: Messages) -> Self {
        self.messages = messages;
        self
    }

    /// Attach the row-count store consulted by `unique` and `exists`
    pub fn with_store(mut self, store: impl RowCount + 'static) -> Self {
        self.store = Some(Arc::new(store));
        self
    }

    /// Apply loaded configuration.
    ///
    /// Message overrides merge over the current catalog. Database settings
    /// are not consumed here: build your own [`RowCount`] from them and
    /// attach it with [`with_store`](Self::with_store).
    pub fn with_config(mut self, config: &ValidatorConfig) -> Self {
        self.messages.merge(&config.messages);
        self
    }

    /// The message catalog, for direct template tweaks
    pub fn messages_mut(&mut self) -> &mut Messages {
        &mut self.messages
    }

    /// Messages from the most recent validation pass
    pub fn errors(&self) -> &Errors {
        &self.errors
    }

    /// Validate `input` against `spec`.
    ///
    /// Returns `Ok(true)` when every field passed and `Ok(false)` when at
    /// least one rule failed; per-field messages are then in
    /// [`errors`](Self::errors). Input is sanitized first. Fields are
    /// evaluated in spec order and each field short-circuits on its first
    /// failed rule, so a field carries at most one message per pass. A
    /// `nullable` token ends the chain as valid when the field is empty.
    ///
    /// Rule names outside the vocabulary are skipped without any effect;
    /// that leniency is deliberate, so a typo in a rule name weakens a
    /// chain silently rather than failing it. Only misuse is an `Err`: a
    /// chain that cannot be parsed, a failing row-count store, or a
    /// store-backed rule with no store attached. Every call starts by
    /// discarding the previous call's error map; on `Err` the map is left
    /// empty, no partial verdict survives.
    pub fn validate(&mut self, input: &Input, spec: &RuleSpec) -> Result<bool> {
        self.errors = Errors::default();

        // Parse every chain before evaluation touches the data, so a bad
        // spec aborts with the error map still empty.
        let mut chains: Vec<(&str, Vec<Rule>)> = Vec::with_capacity(spec.len());
        for (field, chain) in spec.iter() {
            chains.push((field, rules::parse_chain(chain)?));
        }

        let data = sanitize(input);

        for (field, chain) in &chains {
            let field = *field;
            for rule in chain {
                if let Rule::Nullable = rule {
                    if data.get(field).is_none_or(Value::is_empty) {
                        tracing::trace!(field = %field, "empty nullable field, ending chain as valid");
                        break;
                    }
                    continue;
                }

                let checked = match rule.check(field, data.get(field), &data, self.store.as_deref())
                {
                    Ok(checked) => checked,
                    Err(e) => {
                        // No partial verdict survives a hard failure
                        self.errors = Errors::default();
                        return Err(e);
                    }
                };
                match checked {
                    Checked::Pass => {}
                    Checked::Fail(failure) => {
                        tracing::debug!(field = %field, rule = %failure.rule, "rule failed");
                        let message = self.messages.render(
                            failure.rule,
                            field,
                            failure.param.as_deref(),
                            &failure.values,
                        );
                        self.errors.add(field, message);
                        break;
                    }
                }
            }
        }

        Ok(self.errors.is_empty())
    }
}

impl Default for Validator {
    fn default() -> Self {
        Self::new()
    }
}
