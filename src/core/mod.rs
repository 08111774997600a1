//! Core module containing the value model, rule vocabulary and the engine

pub mod error;
pub mod messages;
pub mod rules;
pub mod sanitize;
pub mod validator;
pub mod value;

pub use error::{ConfigError, Error, Result, RuleParseError, StoreError};
pub use messages::Messages;
pub use rules::{Checked, Failure, Rule, RULE_NAMES};
pub use sanitize::{clean, sanitize};
pub use validator::{Errors, RuleSpec, Validator};
pub use value::{FileUpload, Input, Value};
