//! # Fieldcheck
//!
//! Declarative field validation for Rust: bind each input field to a compact
//! rule chain like `"required|min:3|max:20"`, validate a set of values, and
//! get back templated, human-readable messages per field.
//!
//! ## Features
//!
//! - **Rule Chains**: 19 built-in checks composed with `|`, parameters after `:`
//! - **Short-Circuit Evaluation**: the first failing rule ends a field's chain
//! - **Input Sanitization**: tags stripped, markup escaped, whitespace trimmed before any rule runs
//! - **Templated Messages**: per-rule templates with `:field`, `:param` and `:values` placeholders
//! - **Store-Backed Rules**: `unique` and `exists` query an injected row-count store
//! - **Ordered Results**: fields validate and report in insertion order
//! - **Configuration-Based**: message overrides and database settings via YAML
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use fieldcheck::prelude::*;
//!
//! let spec = RuleSpec::new()
//!     .field("username", "required|min:3|max:20")
//!     .field("email", "required|email")
//!     .field("website", "nullable|url");
//!
//! let input: Input = serde_json::from_str(
//!     r#"{"username": "ana", "email": "ana@example.com", "website": ""}"#,
//! )?;
//!
//! let mut validator = Validator::new();
//! if !validator.validate(&input, &spec)? {
//!     for (field, messages) in validator.errors().iter() {
//!         println!("{}: {}", field, messages.join(" "));
//!     }
//! }
//! ```

pub mod config;
pub mod core;
pub mod store;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Engine ===
    pub use crate::core::validator::{Errors, RuleSpec, Validator};

    // === Values ===
    pub use crate::core::value::{FileUpload, Input, Value};

    // === Rules and messages ===
    pub use crate::core::messages::Messages;
    pub use crate::core::rules::{RULE_NAMES, Rule};

    // === Sanitization ===
    pub use crate::core::sanitize::{clean, sanitize};

    // === Errors ===
    pub use crate::core::error::{ConfigError, Error, Result, RuleParseError, StoreError};

    // === Store ===
    pub use crate::store::{MemoryStore, RowCount};

    // === Config ===
    pub use crate::config::{DatabaseConfig, ValidatorConfig};

    // === External dependencies ===
    pub use serde::{Deserialize, Serialize};
}
