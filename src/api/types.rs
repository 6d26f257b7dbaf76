//! Wire types for the category tree API.
//!
//! Request bodies are flat JSON objects (field name → string or bool).
//! Responses are `{data, sqls, time}` on success and `{type, message}` on
//! failure.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// One category row as returned by the server.
///
/// `getAll` reports the parent as `parentId`, the query endpoints as
/// `parent`; both land in the same field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryNode {
    pub id: i64,
    pub name: String,
    #[serde(default, alias = "parentId")]
    pub parent: Option<i64>,
}

impl CategoryNode {
    pub fn new(id: i64, name: impl Into<String>, parent: Option<i64>) -> Self {
        Self {
            id,
            name: name.into(),
            parent,
        }
    }
}

/// A single request argument. Form input is never coerced to a number;
/// the server is authoritative about types.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ArgValue {
    Text(String),
    Flag(bool),
}

impl fmt::Display for ArgValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgValue::Text(s) => f.write_str(s),
            ArgValue::Flag(b) => write!(f, "{b}"),
        }
    }
}

impl From<&str> for ArgValue {
    fn from(s: &str) -> Self {
        ArgValue::Text(s.to_string())
    }
}

impl From<bool> for ArgValue {
    fn from(b: bool) -> Self {
        ArgValue::Flag(b)
    }
}

/// Argument mapping sent as the request body.
pub type Args = BTreeMap<String, ArgValue>;

/// Successful call: result data plus the statements the server executed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallResult {
    #[serde(default)]
    pub data: serde_json::Value,
    #[serde(default)]
    pub sqls: Vec<String>,
    /// Elapsed server time in milliseconds.
    #[serde(default)]
    pub time: u64,
}

impl CallResult {
    /// Interpret `data` as a list of category rows.
    pub fn nodes(&self) -> Result<Vec<CategoryNode>, serde_json::Error> {
        serde_json::from_value(self.data.clone())
    }
}

/// Failed call. `kind` is opaque and shown verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResult {
    #[serde(rename = "type")]
    pub kind: String,
    /// Exceptions without a message arrive as `null`.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub message: String,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Either outcome of a call that reached the server.
#[derive(Debug, Clone, PartialEq)]
pub enum CallResponse {
    Success(CallResult),
    Failure(ErrorResult),
}
