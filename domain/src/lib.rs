//! Domain layer for gatehouse
//!
//! This crate contains the core business logic, entities, and value objects.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Tool Catalog
//!
//! Every capability an agent may invoke is a [`Tool`]: a named,
//! schema-validated handler with a risk level. Tools live in a
//! [`ToolCatalog`] which owns lookup, listing, and dispatch.
//!
//! ## Approval Gate
//!
//! Dangerous tools are split into a *proposing* tool and a *hidden
//! executor* tool. Calling the proposing tool never performs the side
//! effect; it returns an [`ApprovalRequest`] ticket. After human
//! confirmation the orchestrator dispatches the executor with the
//! exact arguments carried in the ticket.
//!
//! ## Provider Naming
//!
//! Tools sourced from external capability providers (MCP servers) are
//! addressed as `mcp_<server>_<tool>`. The parser in
//! [`provider::naming`] recovers the server identifier from such names.

pub mod core;
pub mod provider;
pub mod tool;

// Re-export commonly used types
pub use core::error::DomainError;
pub use provider::{
    entities::{ConnectionConfig, ConnectionState, DiscoveredCapability, ProviderRecord},
    naming::{MCP_TOOL_PREFIX, ParsedToolName, ProviderNameParseError, parse_provider_tool_name, prefixed_tool_name},
};
pub use tool::{
    approval::ApprovalPair,
    catalog::ToolCatalog,
    entities::{ApprovalSpec, RiskLevel, Tool, ToolCategory, ToolKind, ToolParameter},
    traits::{ApprovalMessageSource, OpenSchema, ParameterSchema, SchemaValidator, ToolHandler},
    value_objects::{
        APPROVAL_REQUIRED_ERROR, ApprovalRequest, ExecutionContext, ExecutionResult, ToolError,
    },
};
