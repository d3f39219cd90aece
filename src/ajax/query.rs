//! Query parameters appended to dispatched requests
//!
//! Callers may pass structured `name`/`value` pairs or raw `"name=value"`
//! strings. Both forms end up URL-encoded on the request URL, in caller order.

use std::fmt;
use std::str::FromStr;

/// A single query parameter
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryParam {
    /// Structured name/value pair
    Pair { name: String, value: String },
    /// Raw `name=value` text, split at the first `=`
    Raw(String),
}

impl QueryParam {
    pub fn pair(name: impl Into<String>, value: impl ToString) -> Self {
        QueryParam::Pair {
            name: name.into(),
            value: value.to_string(),
        }
    }

    pub fn raw(text: impl Into<String>) -> Self {
        QueryParam::Raw(text.into())
    }

    /// Split into `(name, value)`.
    ///
    /// A raw parameter without `=` is treated as a bare name with an empty value.
    pub fn split(&self) -> (String, String) {
        match self {
            QueryParam::Pair { name, value } => (name.clone(), value.clone()),
            QueryParam::Raw(text) => match text.split_once('=') {
                Some((name, value)) => (name.to_string(), value.to_string()),
                None => (text.clone(), String::new()),
            },
        }
    }
}

impl fmt::Display for QueryParam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (name, value) = self.split();
        write!(f, "{}={}", name, value)
    }
}

impl FromStr for QueryParam {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err("empty query parameter".to_string());
        }
        Ok(QueryParam::Raw(s.to_string()))
    }
}

impl From<&str> for QueryParam {
    fn from(s: &str) -> Self {
        QueryParam::Raw(s.to_string())
    }
}

/// Flatten parameters into ordered `(name, value)` pairs
pub fn to_pairs(params: &[QueryParam]) -> Vec<(String, String)> {
    params.iter().map(QueryParam::split).collect()
}
