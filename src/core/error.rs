//! Typed error handling for fieldcheck
//!
//! Validation failures are not errors at this level: they land in the
//! per-field error map and [`validate`](crate::core::validator::Validator::validate)
//! returns `Ok(false)`. The types here cover the hard-failure tier only,
//! the situations where no validation verdict exists.
//!
//! # Error Categories
//!
//! - [`RuleParseError`]: a rule chain or rule spec that cannot be parsed
//! - [`StoreError`]: row-count collaborator failures
//! - [`ConfigError`]: configuration loading failures
//!
//! # Example
//!
//! ```rust,ignore
//! use fieldcheck::prelude::*;
//!
//! match validator.validate(&input, &spec) {
//!     Ok(true) => println!("all good"),
//!     Ok(false) => println!("rejected: {:?}", validator.errors()),
//!     Err(Error::Rule(e)) => eprintln!("bad rule spec: {}", e),
//!     Err(e) => eprintln!("validation could not run: {}", e),
//! }
//! ```

use thiserror::Error as ThisError;

/// The main error type for fieldcheck
///
/// Each variant wraps the specific error type for that category, so callers
/// can match on what actually went wrong.
#[derive(Debug, ThisError)]
pub enum Error {
    /// A rule chain or compact rule spec that cannot be parsed
    #[error(transparent)]
    Rule(#[from] RuleParseError),

    /// The row-count collaborator failed or is missing
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Configuration could not be loaded
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// A specialized Result type for fieldcheck operations.
///
/// The error type defaults to [`Error`] but stays overridable, so the alias
/// can shadow `std::result::Result` harmlessly.
pub type Result<T, E = Error> = std::result::Result<T, E>;

// =============================================================================
// Rule parse errors
// =============================================================================

/// Errors raised while turning rule-chain strings into typed rules.
///
/// These are caller mistakes in the rule spec, not properties of the data
/// under validation, so they abort the whole call.
#[derive(Debug, ThisError)]
pub enum RuleParseError {
    /// A rule that needs a parameter was written without one
    #[error("the '{rule}' rule requires a parameter")]
    MissingParam { rule: &'static str },

    /// A length parameter that is not a non-negative integer
    #[error("invalid length '{param}' for the '{rule}' rule")]
    InvalidLength { rule: &'static str, param: String },

    /// A range parameter that is not `min,max` with min <= max
    #[error("invalid range '{param}' for the 'between' rule, expected 'min,max'")]
    InvalidRange { param: String },

    /// A regex parameter that does not compile
    #[error("invalid pattern '{pattern}' for the 'regex' rule: {source}")]
    InvalidPattern {
        pattern: String,
        source: regex::Error,
    },

    /// A date format the strftime grammar rejects
    #[error("invalid date format '{format}' for the 'date_format' rule")]
    InvalidDateFormat { format: String },

    /// A store lookup parameter that is not `table,column` (plus an
    /// optional ignore id for `unique`)
    #[error("invalid parameter '{param}' for the '{rule}' rule, expected 'table,column'")]
    InvalidStoreParam { rule: &'static str, param: String },

    /// A compact spec binding without a field name or chain
    #[error("malformed rule spec binding '{binding}', expected 'field:chain'")]
    MalformedSpec { binding: String },
}

// =============================================================================
// Store errors
// =============================================================================

/// Errors from the row-count collaborator backing `unique` and `exists`.
///
/// Never mapped to a validation verdict: a store that cannot answer makes
/// the whole call fail.
#[derive(Debug, ThisError)]
pub enum StoreError {
    /// Connection error
    #[error("failed to connect to {backend}: {message}")]
    Connection { backend: String, message: String },

    /// Query execution error
    #[error("{backend} query error: {message}")]
    Query { backend: String, message: String },

    /// A store-backed rule was used but no store is configured
    #[error("no row-count store configured, required by the '{rule}' rule")]
    Unavailable { rule: &'static str },
}

// =============================================================================
// Config errors
// =============================================================================

/// Errors related to configuration loading
#[derive(Debug, ThisError)]
pub enum ConfigError {
    /// IO error while reading a configuration file
    #[error("failed to read config file '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    /// Failed to parse configuration content
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_yaml::Error),
}

// =============================================================================
// Tests
// =============================================================================
