//! Provider tool naming
//!
//! Provider-sourced tools are addressed as `mcp_<provider>_<capability>`.
//! Provider identifiers routinely contain the separator themselves
//! (`atlas-local` is fine, but so is `atlas_local`), while capability
//! names typically do not, so parsing splits on the **last** underscore
//! after the prefix rather than the first.

/// Prefix marking a tool name as provider-sourced.
pub const MCP_TOOL_PREFIX: &str = "mcp_";

/// Successful decomposition of a provider tool name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedToolName {
    /// Provider identifier (may itself contain underscores)
    pub provider: String,
    /// Capability name local to the provider
    pub capability: String,
}

/// Structured failure from [`parse_provider_tool_name`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("cannot parse provider tool name '{tool_name}': {reason} ({suggestion})")]
pub struct ProviderNameParseError {
    /// The name that failed to parse
    pub tool_name: String,
    /// What was wrong with it
    pub reason: String,
    /// How to fix it
    pub suggestion: String,
}

impl ProviderNameParseError {
    fn new(tool_name: &str, reason: impl Into<String>, suggestion: impl Into<String>) -> Self {
        Self {
            tool_name: tool_name.to_string(),
            reason: reason.into(),
            suggestion: suggestion.into(),
        }
    }
}

/// Build the catalog-wide name for a provider capability.
pub fn prefixed_tool_name(provider: &str, capability: &str) -> String {
    format!("{}{}_{}", MCP_TOOL_PREFIX, provider, capability)
}

/// Decompose a `mcp_<provider>_<capability>` tool name.
///
/// The split is right-anchored: everything before the **last**
/// underscore in the remainder is the provider identifier, everything
/// after it is the capability. Fails if the prefix is absent, no
/// separator follows the prefix, or either portion comes out empty.
pub fn parse_provider_tool_name(
    tool_name: &str,
) -> Result<ParsedToolName, ProviderNameParseError> {
    let remainder = tool_name.strip_prefix(MCP_TOOL_PREFIX).ok_or_else(|| {
        ProviderNameParseError::new(
            tool_name,
            format!("missing '{}' prefix", MCP_TOOL_PREFIX),
            format!("expected a name like '{}<provider>_<capability>'", MCP_TOOL_PREFIX),
        )
    })?;

    let split_at = remainder.rfind('_').ok_or_else(|| {
        ProviderNameParseError::new(
            tool_name,
            "no separator between provider and capability",
            format!("expected a name like '{}<provider>_<capability>'", MCP_TOOL_PREFIX),
        )
    })?;

    let provider = &remainder[..split_at];
    let capability = &remainder[split_at + 1..];

    if provider.is_empty() {
        return Err(ProviderNameParseError::new(
            tool_name,
            "empty provider identifier",
            "the provider portion before the last '_' must be non-empty",
        ));
    }
    if capability.is_empty() {
        return Err(ProviderNameParseError::new(
            tool_name,
            "empty capability name",
            "the capability portion after the last '_' must be non-empty",
        ));
    }

    Ok(ParsedToolName {
        provider: provider.to_string(),
        capability: capability.to_string(),
    })
}
