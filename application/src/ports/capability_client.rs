//! Capability provider client port
//!
//! Defines how the application layer talks to an external capability
//! provider (an MCP server). The adapter (a subprocess speaking JSON-RPC
//! over stdio) lives in the infrastructure layer.

use async_trait::async_trait;
use gatehouse_domain::{ConnectionConfig, DiscoveredCapability};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Error from a provider operation.
///
/// The variants split along the retry boundary: spawn, transport, and
/// timeout failures are transient and worth retrying; configuration and
/// protocol failures are permanent.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ProviderError {
    #[error("failed to spawn provider process: {0}")]
    Spawn(String),

    #[error("provider transport error: {0}")]
    Transport(String),

    #[error("provider request timed out: {0}")]
    Timeout(String),

    #[error("provider protocol error: {0}")]
    Protocol(String),

    #[error("unknown provider: {0}")]
    UnknownProvider(String),

    #[error("provider configuration error: {0}")]
    Config(String),

    #[error("provider is not connected")]
    NotConnected,
}

impl ProviderError {
    /// Whether retrying the same operation could plausibly succeed.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            ProviderError::Spawn(_) | ProviderError::Transport(_) | ProviderError::Timeout(_)
        )
    }
}

/// Port for a connection to one capability provider.
///
/// Tool names returned by `list_tools` are capability-local
/// (unprefixed); the discovery layer applies the
/// `mcp_<provider>_<capability>` convention at registration.
#[async_trait]
pub trait CapabilityClient: Send + Sync {
    /// Establish the connection (spawn the process, handshake).
    async fn connect(&mut self, config: &ConnectionConfig) -> Result<(), ProviderError>;

    /// Discover the provider's tool catalog.
    async fn list_tools(&mut self) -> Result<Vec<DiscoveredCapability>, ProviderError>;

    /// Invoke a capability by its provider-local name.
    async fn call_tool(
        &mut self,
        name: &str,
        args: serde_json::Value,
    ) -> Result<serde_json::Value, ProviderError>;

    /// Tear down the connection.
    async fn disconnect(&mut self) -> Result<(), ProviderError>;
}

/// A client handle shared between the discovery cycle and the tool
/// handlers registered from it.
///
/// Handlers keep the provider connection alive by holding a clone; the
/// mutex serializes requests on the single stdio transport.
pub type SharedClient = Arc<Mutex<Box<dyn CapabilityClient>>>;

/// Factory for provider clients, one per provider per discovery cycle.
pub trait CapabilityClientFactory: Send + Sync {
    fn create(&self, provider_name: &str) -> SharedClient;
}
