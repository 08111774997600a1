//! The rule vocabulary: parsing chain strings into typed rules and
//! checking values against them

use std::fmt::Write as _;
use std::sync::OnceLock;

use chrono::format::{Item, StrftimeItems};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use regex::Regex;

use crate::core::error::{Result, RuleParseError, StoreError};
use crate::core::value::{Input, Value};
use crate::store::RowCount;

/// Every name the chain parser recognizes.
pub const RULE_NAMES: [&str; 20] = [
    "required",
    "email",
    "min",
    "max",
    "between",
    "numeric",
    "integer",
    "url",
    "date",
    "date_format",
    "confirmed",
    "same",
    "unique",
    "exists",
    "in",
    "regex",
    "size",
    "file",
    "mimes",
    "nullable",
];

pub(crate) fn is_rule_name(name: &str) -> bool {
    RULE_NAMES.contains(&name)
}

/// One parsed rule with its typed parameter.
///
/// Parameters are resolved once, when the chain string is parsed; a check
/// never re-reads parameter text.
#[derive(Debug, Clone)]
pub enum Rule {
    Required,
    Email,
    Min(usize),
    Max(usize),
    Between {
        min: usize,
        max: usize,
    },
    Numeric,
    Integer,
    Url,
    Date,
    DateFormat(String),
    Confirmed,
    Same(String),
    Unique {
        table: String,
        column: String,
        ignore: Option<String>,
    },
    Exists {
        table: String,
        column: String,
    },
    In(Vec<String>),
    Regex(Regex),
    Size(usize),
    File,
    Mimes(Vec<String>),
    /// Dispatcher directive: an empty value ends the chain as valid
    Nullable,
}

/// Outcome of one rule check
#[derive(Debug)]
pub enum Checked {
    Pass,
    Fail(Failure),
}

/// Message context carried by a failed check
#[derive(Debug)]
pub struct Failure {
    pub rule: &'static str,
    pub param: Option<String>,
    pub values: Vec<String>,
}

impl Failure {
    fn new(rule: &'static str) -> Self {
        Self {
            rule,
            param: None,
            values: Vec::new(),
        }
    }

    fn with_param(mut self, param: impl Into<String>) -> Self {
        self.param = Some(param.into());
        self
    }

    fn with_values(mut self, values: Vec<String>) -> Self {
        self.values = values;
        self
    }
}

/// Parse a `|`-delimited chain string into typed rules.
///
/// Each token splits on its first `:`; everything after it, further colons
/// included, is the raw parameter. Unknown rule names are skipped. A known
/// rule with a missing or malformed parameter is an error.
pub fn parse_chain(chain: &str) -> Result<Vec<Rule>, RuleParseError> {
    let mut rules = Vec::new();
    for token in chain.split('|') {
        if let Some(rule) = parse_token(token)? {
            rules.push(rule);
        }
    }
    Ok(rules)
}

fn parse_token(token: &str) -> Result<Option<Rule>, RuleParseError> {
    let (name, param) = match token.split_once(':') {
        Some((name, param)) => (name, Some(param)),
        None => (token, None),
    };

    let rule = match name {
        "required" => Rule::Required,
        "email" => Rule::Email,
        "min" => Rule::Min(parse_length("min", param)?),
        "max" => Rule::Max(parse_length("max", param)?),
        "between" => parse_between(param)?,
        "numeric" => Rule::Numeric,
        "integer" => Rule::Integer,
        "url" => Rule::Url,
        "date" => Rule::Date,
        "date_format" => parse_date_format(param)?,
        "confirmed" => Rule::Confirmed,
        "same" => Rule::Same(required_param("same", param)?.to_string()),
        "unique" => parse_store_param("unique", param)?,
        "exists" => parse_store_param("exists", param)?,
        "in" => Rule::In(split_list(required_param("in", param)?)),
        "regex" => parse_regex(param)?,
        "size" => Rule::Size(parse_length("size", param)?),
        "file" => Rule::File,
        "mimes" => Rule::Mimes(split_list(required_param("mimes", param)?)),
        "nullable" => Rule::Nullable,
        unknown => {
            tracing::trace!(rule = %unknown, "skipping unknown rule");
            return Ok(None);
        }
    };
    Ok(Some(rule))
}

impl Rule {
    /// The name this rule is written as in a chain string
    pub fn name(&self) -> &'static str {
        match self {
            Rule::Required => "required",
            Rule::Email => "email",
            Rule::Min(_) => "min",
            Rule::Max(_) => "max",
            Rule::Between { .. } => "between",
            Rule::Numeric => "numeric",
            Rule::Integer => "integer",
            Rule::Url => "url",
            Rule::Date => "date",
            Rule::DateFormat(_) => "date_format",
            Rule::Confirmed => "confirmed",
            Rule::Same(_) => "same",
            Rule::Unique { .. } => "unique",
            Rule::Exists { .. } => "exists",
            Rule::In(_) => "in",
            Rule::Regex(_) => "regex",
            Rule::Size(_) => "size",
            Rule::File => "file",
            Rule::Mimes(_) => "mimes",
            Rule::Nullable => "nullable",
        }
    }

    /// Check a value against this rule.
    ///
    /// `value` is the field's sanitized value, `None` when the field is
    /// absent from the input. `data` is the full sanitized input, consulted
    /// by the cross-field rules. `store` backs `unique` and `exists`; using
    /// either without one is a hard error, never a verdict.
    pub fn check(
        &self,
        field: &str,
        value: Option<&Value>,
        data: &Input,
        store: Option<&dyn RowCount>,
    ) -> Result<Checked> {
        let ok = match self {
            Rule::Nullable => true,
            Rule::Required => value.is_some_and(|v| !v.is_empty()),
            Rule::Email => is_email(&text_of(value)),
            Rule::Min(len) => text_len(value) >= *len,
            Rule::Max(len) => text_len(value) <= *len,
            Rule::Between { min, max } => {
                let len = text_len(value);
                len >= *min && len <= *max
            }
            Rule::Numeric => is_numeric_text(&text_of(value)),
            Rule::Integer => text_of(value).parse::<i64>().is_ok(),
            Rule::Url => is_url(&text_of(value)),
            Rule::Date => matches_date(&text_of(value)),
            Rule::DateFormat(format) => matches_format(&text_of(value), format),
            Rule::Confirmed => {
                let confirmation = format!("{}_confirmation", field);
                value_or_null(value) == value_or_null(data.get(&confirmation))
            }
            Rule::Same(other) => value_or_null(value) == value_or_null(data.get(other)),
            Rule::Unique {
                table,
                column,
                ignore,
            } => {
                let store = store.ok_or(StoreError::Unavailable { rule: "unique" })?;
                store.count(table, column, &text_of(value), ignore.as_deref())? == 0
            }
            Rule::Exists { table, column } => {
                let store = store.ok_or(StoreError::Unavailable { rule: "exists" })?;
                store.count(table, column, &text_of(value), None)? > 0
            }
            Rule::In(allowed) => {
                let text = text_of(value);
                allowed.iter().any(|candidate| candidate == &text)
            }
            Rule::Regex(pattern) => pattern.is_match(&text_of(value)),
            Rule::Size(len) => text_len(value) == *len,
            Rule::File => value
                .and_then(Value::as_file)
                .is_some_and(|f| !f.temp_path.is_empty()),
            // Non-file values pass; pair with `file` to insist on one
            Rule::Mimes(types) => match value.and_then(Value::as_file) {
                Some(file) => types.iter().any(|t| t == &file.mime_type),
                None => true,
            },
        };

        if ok {
            Ok(Checked::Pass)
        } else {
            Ok(Checked::Fail(self.failure()))
        }
    }

    fn failure(&self) -> Failure {
        let base = Failure::new(self.name());
        match self {
            Rule::Min(len) | Rule::Max(len) | Rule::Size(len) => base.with_param(len.to_string()),
            Rule::Between { min, max } => base
                .with_param(format!("{},{}", min, max))
                .with_values(vec![min.to_string(), max.to_string()]),
            Rule::DateFormat(format) => base.with_param(format.clone()),
            Rule::Same(other) => base.with_param(other.clone()),
            Rule::In(values) | Rule::Mimes(values) => base
                .with_param(values.join(","))
                .with_values(values.clone()),
            _ => base,
        }
    }
}

// =============================================================================
// Parameter parsing
// =============================================================================

fn required_param<'a>(
    rule: &'static str,
    param: Option<&'a str>,
) -> Result<&'a str, RuleParseError> {
    match param {
        Some(p) if !p.is_empty() => Ok(p),
        _ => Err(RuleParseError::MissingParam { rule }),
    }
}

fn parse_length(
    rule: &'static str,
    param: Option<&str>,
) -> Result<usize, RuleParseError> {
    let raw = required_param(rule, param)?;
    raw.parse().map_err(|_| RuleParseError::InvalidLength {
        rule,
        param: raw.to_string(),
    })
}

fn parse_between(param: Option<&str>) -> Result<Rule, RuleParseError> {
    let raw = required_param("between", param)?;
    let invalid = || RuleParseError::InvalidRange {
        param: raw.to_string(),
    };
    let (min, max) = raw.split_once(',').ok_or_else(invalid)?;
    let min: usize = min.parse().map_err(|_| invalid())?;
    let max: usize = max.parse().map_err(|_| invalid())?;
    if min > max {
        return Err(invalid());
    }
    Ok(Rule::Between { min, max })
}

fn parse_date_format(param: Option<&str>) -> Result<Rule, RuleParseError> {
    let format = required_param("date_format", param)?;
    if StrftimeItems::new(format).any(|item| matches!(item, Item::Error)) {
        return Err(RuleParseError::InvalidDateFormat {
            format: format.to_string(),
        });
    }
    Ok(Rule::DateFormat(format.to_string()))
}

fn parse_regex(param: Option<&str>) -> Result<Rule, RuleParseError> {
    let pattern = required_param("regex", param)?;
    let compiled = Regex::new(pattern).map_err(|source| RuleParseError::InvalidPattern {
        pattern: pattern.to_string(),
        source,
    })?;
    Ok(Rule::Regex(compiled))
}

/// `unique` takes `table,column` plus an optional ignore id; `exists`
/// takes exactly `table,column`.
fn parse_store_param(
    rule: &'static str,
    param: Option<&str>,
) -> Result<Rule, RuleParseError> {
    let raw = required_param(rule, param)?;
    let invalid = || RuleParseError::InvalidStoreParam {
        rule,
        param: raw.to_string(),
    };

    let parts: Vec<&str> = raw.split(',').collect();
    let expected_len = if rule == "unique" {
        parts.len() == 2 || parts.len() == 3
    } else {
        parts.len() == 2
    };
    if !expected_len || parts.iter().any(|p| p.is_empty()) {
        return Err(invalid());
    }

    let table = parts[0].to_string();
    let column = parts[1].to_string();
    if rule == "unique" {
        Ok(Rule::Unique {
            table,
            column,
            ignore: parts.get(2).map(|s| s.to_string()),
        })
    } else {
        Ok(Rule::Exists { table, column })
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',').map(str::to_string).collect()
}

// =============================================================================
// Check helpers
// =============================================================================

/// Text rendering of a possibly-missing value. Values with no text form,
/// and missing values, render as the empty string.
fn text_of(value: Option<&Value>) -> String {
    value.and_then(Value::as_text).unwrap_or_default()
}

/// Lengths count characters, not bytes.
fn text_len(value: Option<&Value>) -> usize {
    text_of(value).chars().count()
}

/// Missing and null compare as the same thing.
fn value_or_null(value: Option<&Value>) -> &Value {
    static NULL: Value = Value::Null;
    value.unwrap_or(&NULL)
}

fn is_email(text: &str) -> bool {
    static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = EMAIL_REGEX.get_or_init(|| {
        Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").unwrap()
    });
    regex.is_match(text)
}

fn is_url(text: &str) -> bool {
    static URL_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = URL_REGEX.get_or_init(|| Regex::new(r"^https?://[^\s/$.?#].[^\s]*$").unwrap());
    regex.is_match(text)
}

/// Plain decimal numbers only: no exponents, no infinities, no NaN.
fn is_numeric_text(text: &str) -> bool {
    static NUMERIC_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex =
        NUMERIC_REGEX.get_or_init(|| Regex::new(r"^[+-]?(\d+(\.\d*)?|\.\d+)$").unwrap());
    regex.is_match(text)
}

/// A calendar date in `%Y-%m-%d` form that renders back to the same text,
/// so `2023-1-5` and overflow dates are rejected.
fn matches_date(text: &str) -> bool {
    match NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        Ok(date) => round_trips(date.format("%Y-%m-%d"), text),
        Err(_) => false,
    }
}

/// Parse with a caller-supplied format, trying datetime, date, then time,
/// and require the parsed value to render back to the input text.
fn matches_format(text: &str, format: &str) -> bool {
    if let Ok(dt) = NaiveDateTime::parse_from_str(text, format) {
        return round_trips(dt.format(format), text);
    }
    if let Ok(date) = NaiveDate::parse_from_str(text, format) {
        return round_trips(date.format(format), text);
    }
    if let Ok(time) = NaiveTime::parse_from_str(text, format) {
        return round_trips(time.format(format), text);
    }
    false
}

/// Render through `write!` so a format the value cannot express comes back
/// as a failed check instead of a panic.
fn round_trips(rendered: impl std::fmt::Display, text: &str) -> bool {
    let mut out = String::new();
    if write!(out, "{}", rendered).is_err() {
        return false;
    }
    out == text
}

// =============================================================================
// Tests
// =============================================================================
