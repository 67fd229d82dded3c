//! Tool domain entities

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::traits::{ApprovalMessageSource, OpenSchema, ParameterSchema, SchemaValidator, ToolHandler};

/// Risk level of a tool operation.
///
/// Drives the auto-approval policy in automated (non-interactive)
/// workflows: read-only and low-risk proposals may be confirmed without
/// a human, high-risk proposals never are.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RiskLevel {
    /// No state modification (e.g., read_file, provider queries)
    ReadOnly,
    /// Reversible or low-impact modification
    LowRisk,
    /// Irreversible or dangerous operations (e.g., run_command)
    HighRisk,
}

impl RiskLevel {
    pub fn as_str(&self) -> &str {
        match self {
            RiskLevel::ReadOnly => "read-only",
            RiskLevel::LowRisk => "low-risk",
            RiskLevel::HighRisk => "high-risk",
        }
    }

    /// Whether a proposal at this level may bypass interactive
    /// confirmation in automated workflows.
    pub fn allows_auto_approval(&self) -> bool {
        !matches!(self, RiskLevel::HighRisk)
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Organizational grouping for catalog listings.
///
/// Purely cosmetic for users; a tool belongs to at most one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolCategory {
    /// Stable identifier (e.g., "files", "mcp:atlas-local")
    pub id: String,
    /// Name shown in listings (e.g., "Files", "atlas-local (MCP)")
    pub display_name: String,
}

impl ToolCategory {
    pub fn new(id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
        }
    }
}

/// Parameter specification for a tool
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolParameter {
    /// Parameter name
    pub name: String,
    /// Parameter description
    pub description: String,
    /// Whether this parameter is required
    pub required: bool,
    /// Parameter type hint (e.g., "string", "path", "number")
    pub param_type: String,
}

impl ToolParameter {
    pub fn new(name: impl Into<String>, description: impl Into<String>, required: bool) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            required,
            param_type: "string".to_string(),
        }
    }

    pub fn with_type(mut self, param_type: impl Into<String>) -> Self {
        self.param_type = param_type.into();
        self
    }
}

/// The approval descriptor carried by a proposing tool.
///
/// `execute_args` must be a pure function of the validated proposal
/// arguments: dispatching the same proposal twice must produce the same
/// executor arguments both times, even if the message text varies with
/// live state.
#[derive(Clone)]
pub struct ApprovalSpec {
    /// Name of the hidden executor tool
    pub execute_tool_name: String,
    /// Builds the human-facing confirmation message
    pub message: Arc<dyn ApprovalMessageSource>,
    /// Maps validated proposal arguments to executor arguments
    pub execute_args: Arc<dyn Fn(&serde_json::Value) -> serde_json::Value + Send + Sync>,
}

impl std::fmt::Debug for ApprovalSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApprovalSpec")
            .field("execute_tool_name", &self.execute_tool_name)
            .finish_non_exhaustive()
    }
}

/// Whether a tool acts directly or proposes an action for confirmation.
///
/// The two shapes are discriminated at the type level: a hidden
/// executor is a `Direct` tool, and only `Proposing` tools carry an
/// [`ApprovalSpec`] — chained proposals cannot be expressed.
#[derive(Debug, Clone)]
pub enum ToolKind {
    /// Runs its handler on dispatch
    Direct,
    /// Returns an approval ticket on dispatch; never runs a side effect
    Proposing(ApprovalSpec),
}

/// A named capability the agent may invoke.
#[derive(Clone)]
pub struct Tool {
    /// Unique name within a catalog (e.g., "read_file")
    pub name: String,
    /// Human-readable description shown to the LLM and to users
    pub description: String,
    /// Risk classification for auto-approval policy
    pub risk_level: RiskLevel,
    /// Excluded from user-facing listings but always dispatchable
    pub hidden: bool,
    /// Argument validator
    pub schema: Arc<dyn SchemaValidator>,
    /// Direct execution or approval proposal
    pub kind: ToolKind,
    /// Effectful handler body
    pub handler: Arc<dyn ToolHandler>,
}

impl Tool {
    /// Create a plain (directly executing) tool.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        risk_level: RiskLevel,
        handler: Arc<dyn ToolHandler>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            risk_level,
            hidden: false,
            schema: Arc::new(OpenSchema),
            kind: ToolKind::Direct,
            handler,
        }
    }

    pub fn with_schema(mut self, schema: Arc<dyn SchemaValidator>) -> Self {
        self.schema = schema;
        self
    }

    pub fn with_parameters(mut self, parameters: Vec<ToolParameter>) -> Self {
        self.schema = Arc::new(ParameterSchema::new(parameters));
        self
    }

    pub fn with_risk_level(mut self, risk_level: RiskLevel) -> Self {
        self.risk_level = risk_level;
        self
    }

    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    /// Whether this tool proposes rather than acts.
    pub fn is_proposing(&self) -> bool {
        matches!(self.kind, ToolKind::Proposing(_))
    }

    /// The approval descriptor, if this is a proposing tool.
    pub fn approval(&self) -> Option<&ApprovalSpec> {
        match &self.kind {
            ToolKind::Proposing(spec) => Some(spec),
            ToolKind::Direct => None,
        }
    }
}

impl std::fmt::Debug for Tool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tool")
            .field("name", &self.name)
            .field("risk_level", &self.risk_level)
            .field("hidden", &self.hidden)
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}
