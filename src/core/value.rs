//! Input value types

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A set of named input values, in insertion order.
///
/// Field order is preserved end to end: rules are evaluated and errors are
/// reported in the order fields were inserted.
pub type Input = IndexMap<String, Value>;

/// A polymorphic input value that can hold different types.
///
/// Untagged for serde, so a JSON object like
/// `{"name": "ana", "age": 30}` deserializes straight into an [`Input`].
/// An object carrying `temp_path` and `mime_type` keys is recognized as a
/// [`FileUpload`] descriptor; any other object becomes a nested map.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum Value {
    String(String),
    Integer(i64),
    Float(f64),
    File(FileUpload),
    Map(Input),
    Null,
}

impl Value {
    /// Get the value as a string slice if it is one
    pub fn as_string(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Render the value as text, the form length and membership checks measure.
    ///
    /// Strings render as themselves, numbers through their decimal form.
    /// Files, maps and null have no text form.
    pub fn as_text(&self) -> Option<String> {
        match self {
            Value::String(s) => Some(s.clone()),
            Value::Integer(i) => Some(i.to_string()),
            Value::Float(f) => Some(f.to_string()),
            _ => None,
        }
    }

    /// Get the value as a file descriptor if it is one
    pub fn as_file(&self) -> Option<&FileUpload> {
        match self {
            Value::File(f) => Some(f),
            _ => None,
        }
    }

    /// Get the value as a nested map if it is one
    pub fn as_map(&self) -> Option<&Input> {
        match self {
            Value::Map(m) => Some(m),
            _ => None,
        }
    }

    /// Check if the value is null
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Check if the value counts as empty.
    ///
    /// Empty means null, the empty string, or an empty nested map. The
    /// string `"0"` is a present value, as are numbers and files.
    pub fn is_empty(&self) -> bool {
        match self {
            Value::Null => true,
            Value::String(s) => s.is_empty(),
            Value::Map(m) => m.is_empty(),
            _ => false,
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Integer(i)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<FileUpload> for Value {
    fn from(f: FileUpload) -> Self {
        Value::File(f)
    }
}

/// Descriptor for an uploaded file.
///
/// Carries transport metadata only; file bytes are never read here.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FileUpload {
    /// Where the transport layer parked the upload
    pub temp_path: String,
    /// MIME type as declared by the client
    pub mime_type: String,
    /// Original file name, when the transport supplies one
    pub name: Option<String>,
    /// Size in bytes, when the transport supplies one
    pub size: Option<u64>,
}

impl FileUpload {
    /// Create a descriptor from the two fields every transport provides
    pub fn new(temp_path: impl Into<String>, mime_type: impl Into<String>) -> Self {
        Self {
            temp_path: temp_path.into(),
            mime_type: mime_type.into(),
            name: None,
            size: None,
        }
    }
}
