//! Tool domain value objects — results, errors, and execution context
//!
//! These types form the **output side** of the tool pipeline. Every
//! dispatch produces an [`ExecutionResult`]; a proposing tool produces
//! one whose `result` payload is an [`ApprovalRequest`] ticket.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Fixed error string set on every approval-required result.
///
/// The ticket in `result` is the machine-readable signal; this string
/// exists for consumers that only look at `success`/`error`.
pub const APPROVAL_REQUIRED_ERROR: &str =
    "approval required: this call describes the action but does not perform it";

/// Error produced by a tool handler.
///
/// Error codes classify the failure for the agent loop:
///
/// | Code | Description |
/// |------|-------------|
/// | `INVALID_ARGUMENT` | Missing/wrong parameters |
/// | `NOT_FOUND` | Resource the handler needed is absent |
/// | `EXECUTION_FAILED` | Runtime failure (I/O error, process error) |
/// | `PERMISSION_DENIED` | Access denied |
/// | `TIMEOUT` | Handler-enforced bound exceeded |
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolError {
    /// Error code (e.g., "NOT_FOUND", "PERMISSION_DENIED")
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ToolError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    // Common error constructors
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::new(
            "NOT_FOUND",
            format!("Resource not found: {}", resource.into()),
        )
    }

    pub fn permission_denied(resource: impl Into<String>) -> Self {
        Self::new(
            "PERMISSION_DENIED",
            format!("Permission denied: {}", resource.into()),
        )
    }

    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::new("INVALID_ARGUMENT", message)
    }

    pub fn execution_failed(message: impl Into<String>) -> Self {
        Self::new("EXECUTION_FAILED", message)
    }

    pub fn timeout(operation: impl Into<String>) -> Self {
        Self::new(
            "TIMEOUT",
            format!("Operation timed out: {}", operation.into()),
        )
    }
}

impl std::fmt::Display for ToolError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        if let Some(details) = &self.details {
            write!(f, " ({})", details)?;
        }
        Ok(())
    }
}

impl std::error::Error for ToolError {}

/// Context passed unchanged from the caller through dispatch into the
/// handler.
///
/// Handlers use it to scope state: the working directory for shell
/// commands, per-conversation caches, and so on. Anything beyond the
/// well-known identifiers rides in `extensions`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExecutionContext {
    /// Identifier of the agent performing the call
    pub agent_id: String,
    /// Conversation the call belongs to, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conversation_id: Option<String>,
    /// User on whose behalf the agent acts, if known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    /// Free-form extension fields (e.g. "working_dir")
    #[serde(default)]
    pub extensions: HashMap<String, serde_json::Value>,
}

impl ExecutionContext {
    pub fn new(agent_id: impl Into<String>) -> Self {
        Self {
            agent_id: agent_id.into(),
            conversation_id: None,
            user_id: None,
            extensions: HashMap::new(),
        }
    }

    pub fn with_conversation(mut self, conversation_id: impl Into<String>) -> Self {
        self.conversation_id = Some(conversation_id.into());
        self
    }

    pub fn with_user(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    pub fn with_extension(
        mut self,
        key: impl Into<String>,
        value: impl Into<serde_json::Value>,
    ) -> Self {
        self.extensions.insert(key.into(), value.into());
        self
    }

    /// Get a string extension field
    pub fn extension_str(&self, key: &str) -> Option<&str> {
        self.extensions.get(key).and_then(|v| v.as_str())
    }
}

/// The ticket a proposing tool returns instead of acting.
///
/// Serialized with camelCase keys because this payload is what the
/// orchestrator and the LLM see on the wire. On confirmation the
/// orchestrator must dispatch `execute_tool_name` with `execute_args`
/// **unmodified** — re-deriving arguments by hand would allow drift
/// between what the user approved and what executes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApprovalRequest {
    /// Always true; present so consumers can test the payload directly
    pub approval_required: bool,
    /// Human-readable description of the action awaiting confirmation
    pub message: String,
    /// Name of the hidden executor tool to dispatch on confirmation
    pub execute_tool_name: String,
    /// Arguments to pass to the executor, verbatim
    pub execute_args: serde_json::Value,
}

impl ApprovalRequest {
    pub fn new(
        message: impl Into<String>,
        execute_tool_name: impl Into<String>,
        execute_args: serde_json::Value,
    ) -> Self {
        Self {
            approval_required: true,
            message: message.into(),
            execute_tool_name: execute_tool_name.into(),
            execute_args,
        }
    }
}

/// Result of a tool dispatch.
///
/// `result` carries the handler's output value on success, or the
/// [`ApprovalRequest`] ticket when confirmation is required. Handler
/// failures are normalized into `success: false` plus `error` at the
/// catalog boundary so one tool's failure never crashes a dispatch loop.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionResult {
    /// Whether the execution was successful
    pub success: bool,
    /// Output value (or approval ticket)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<serde_json::Value>,
    /// Error message (for failed execution)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ExecutionResult {
    /// Create a successful result
    pub fn success(result: impl Into<serde_json::Value>) -> Self {
        Self {
            success: true,
            result: Some(result.into()),
            error: None,
        }
    }

    /// Create a failed result
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            result: None,
            error: Some(error.into()),
        }
    }

    /// Create the terminal result of a proposing tool's dispatch.
    ///
    /// `success` is false and `error` is the fixed
    /// [`APPROVAL_REQUIRED_ERROR`] string; the ticket rides in `result`.
    pub fn approval_required(request: ApprovalRequest) -> Self {
        Self {
            success: false,
            result: serde_json::to_value(&request).ok(),
            error: Some(APPROVAL_REQUIRED_ERROR.to_string()),
        }
    }

    /// Check if execution was successful
    pub fn is_success(&self) -> bool {
        self.success
    }

    /// Extract the approval ticket, if this result carries one
    pub fn approval_request(&self) -> Option<ApprovalRequest> {
        let value = self.result.as_ref()?;
        let request: ApprovalRequest = serde_json::from_value(value.clone()).ok()?;
        request.approval_required.then_some(request)
    }

    /// Get the output value
    pub fn value(&self) -> Option<&serde_json::Value> {
        self.result.as_ref()
    }

    /// Get the error message
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}
