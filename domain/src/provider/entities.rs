//! Capability provider entities

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// How to launch/reach a capability provider.
///
/// Providers are spawned as subprocesses speaking JSON-RPC over stdio,
/// so the connection config is a command line plus environment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionConfig {
    /// Executable to spawn
    pub command: String,
    /// Arguments passed to the executable
    #[serde(default)]
    pub args: Vec<String>,
    /// Extra environment variables for the provider process
    #[serde(default)]
    pub env: HashMap<String, String>,
}

impl ConnectionConfig {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            args: Vec::new(),
            env: HashMap::new(),
        }
    }

    pub fn with_args(mut self, args: Vec<String>) -> Self {
        self.args = args;
        self
    }

    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }
}

/// A configured capability provider, as read from configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderRecord {
    /// Provider name used in tool addressing (e.g., "atlas-local")
    pub name: String,
    /// Disabled providers are skipped during discovery
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// How to connect to this provider
    pub connection: ConnectionConfig,
}

fn default_enabled() -> bool {
    true
}

impl ProviderRecord {
    pub fn new(name: impl Into<String>, connection: ConnectionConfig) -> Self {
        Self {
            name: name.into(),
            enabled: true,
            connection,
        }
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }
}

/// Lifecycle of a provider connection during a discovery cycle.
///
/// Transient; never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionState {
    #[default]
    Disconnected,
    Connecting,
    Connected,
    Failed,
}

/// A tool as reported by a provider's `tools/list`.
///
/// The name is capability-local (unprefixed); the catalog-wide
/// `mcp_<provider>_<capability>` name is assigned at registration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscoveredCapability {
    /// Capability-local name (e.g., "query")
    pub name: String,
    /// Human-readable description
    #[serde(default)]
    pub description: String,
    /// Provider-side JSON Schema for the arguments, if published
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_schema: Option<serde_json::Value>,
}

impl DiscoveredCapability {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            input_schema: None,
        }
    }

    pub fn with_input_schema(mut self, schema: serde_json::Value) -> Self {
        self.input_schema = Some(schema);
        self
    }
}
