use serde::{Deserialize, Serialize};
use std::fmt;

/// Идентификатор записи бэкенда.
///
/// Roles and routes are keyed by integers, bus units by their plate/code, so
/// the id is either of the two. On the wire it is a bare JSON number or string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Int(i64),
    Text(String),
}

impl RecordId {
    /// Numeric value, if the id is an integer
    pub fn as_int(&self) -> Option<i64> {
        match self {
            RecordId::Int(v) => Some(*v),
            RecordId::Text(_) => None,
        }
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordId::Int(v) => write!(f, "{}", v),
            RecordId::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for RecordId {
    fn from(value: i64) -> Self {
        RecordId::Int(value)
    }
}

impl From<&str> for RecordId {
    fn from(value: &str) -> Self {
        RecordId::Text(value.to_string())
    }
}

impl From<String> for RecordId {
    fn from(value: String) -> Self {
        RecordId::Text(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_untagged() {
        let int: RecordId = serde_json::from_str("7").unwrap();
        assert_eq!(int, RecordId::Int(7));
        let text: RecordId = serde_json::from_str("\"AB-123\"").unwrap();
        assert_eq!(text, RecordId::Text("AB-123".to_string()));
    }
}
