//! Capability provider domain
//!
//! Entities and naming rules for external capability providers (MCP
//! servers). Connection handling itself lives behind ports in the
//! application layer; this module only knows provider records, the
//! shapes they discover, and the `mcp_<provider>_<capability>` naming
//! convention.

pub mod entities;
pub mod naming;

pub use entities::{ConnectionConfig, ConnectionState, DiscoveredCapability, ProviderRecord};
pub use naming::{
    MCP_TOOL_PREFIX, ParsedToolName, ProviderNameParseError, parse_provider_tool_name,
    prefixed_tool_name,
};
