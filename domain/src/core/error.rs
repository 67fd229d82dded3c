//! Domain error types

use thiserror::Error;

/// Domain-level errors
///
/// Only [`DomainError::ToolNotFound`] escapes `dispatch` as a hard
/// failure — an unknown tool name is a configuration or programming
/// error, not a recoverable runtime condition. Every other dispatch
/// outcome is normalized into an `ExecutionResult`.
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Tool not found: {0}")]
    ToolNotFound(String),

    #[error("Invalid approval pair: {0}")]
    InvalidToolPair(String),
}

impl DomainError {
    /// Check whether this error is a missing-tool lookup failure
    pub fn is_not_found(&self) -> bool {
        matches!(self, DomainError::ToolNotFound(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_not_found_display() {
        let error = DomainError::ToolNotFound("delete_email".to_string());
        assert_eq!(error.to_string(), "Tool not found: delete_email");
        assert!(error.is_not_found());
    }

    #[test]
    fn test_invalid_pair_is_not_not_found() {
        let error = DomainError::InvalidToolPair("missing executor".to_string());
        assert!(!error.is_not_found());
    }
}
