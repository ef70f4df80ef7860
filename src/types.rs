//! Shared aliases and small helpers

use serde::{Deserialize, Serialize};

pub type JsonValue = serde_json::Value;

/// Insertion-ordered JSON object; rows keep column order through it
pub type JsonObject = serde_json::Map<String, JsonValue>;

/// How the delay between HTTP retries grows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackoffType {
    Constant,
    Linear,
    #[default]
    Exponential,
}

/// Treat an empty credential or setting the same as a missing one
pub trait OptionStringExt {
    fn none_if_empty(self) -> Option<String>;
}

impl OptionStringExt for Option<String> {
    fn none_if_empty(self) -> Option<String> {
        self.filter(|s| !s.is_empty())
    }
}

impl OptionStringExt for String {
    fn none_if_empty(self) -> Option<String> {
        Some(self).none_if_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backoff_from_config_string() {
        let b: BackoffType = serde_yaml::from_str("linear").unwrap();
        assert_eq!(b, BackoffType::Linear);
        assert_eq!(BackoffType::default(), BackoffType::Exponential);
    }

    #[test]
    fn test_none_if_empty() {
        assert_eq!(Some("tok".to_string()).none_if_empty().as_deref(), Some("tok"));
        assert_eq!(Some(String::new()).none_if_empty(), None);
        assert_eq!(None::<String>.none_if_empty(), None);
        assert_eq!(String::new().none_if_empty(), None);
    }
}
