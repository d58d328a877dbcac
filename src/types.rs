//! Core request types shared by every transport

use serde::{Deserialize, Serialize};

/// The text operations Munin exposes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Translate,
    Format,
    Summarize,
}

impl Operation {
    /// Stable lowercase name, used for routes, logs and metric labels.
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Translate => "translate",
            Operation::Format => "format",
            Operation::Summarize => "summarize",
        }
    }

    /// Whether results of this operation are persisted in the cache store.
    ///
    /// Only translations are cached: a (keyword, context) pair identifies a
    /// translation, while format and summarize act on throwaway text.
    pub fn cached(&self) -> bool {
        matches!(self, Operation::Translate)
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single client request, decoded from the transport layer
#[derive(Debug, Clone)]
pub struct OperationRequest {
    pub operation: Operation,
    /// The primary text the operation acts on.
    pub keyword: String,
    /// Surrounding context; empty unless the client supplied one.
    pub context: String,
}

impl OperationRequest {
    pub fn new(
        operation: Operation,
        keyword: impl Into<String>,
        context: impl Into<String>,
    ) -> Self {
        Self {
            operation,
            keyword: keyword.into(),
            context: context.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_translate_is_cached() {
        assert!(Operation::Translate.cached());
        assert!(!Operation::Format.cached());
        assert!(!Operation::Summarize.cached());
    }

    #[test]
    fn operation_names_are_lowercase() {
        assert_eq!(Operation::Translate.as_str(), "translate");
        assert_eq!(Operation::Summarize.to_string(), "summarize");
        let parsed: Operation = serde_json::from_str("\"format\"").unwrap();
        assert_eq!(parsed, Operation::Format);
    }
}
