//! Application layer for gatehouse
//!
//! Use cases and ports. The central use case is [`CapabilityDiscovery`]:
//! given the tool names an agent is configured to use and the set of
//! configured external providers, connect only to the providers that
//! are actually needed, discover their tools, and register the subset
//! the agent asked for into a [`ToolCatalog`](gatehouse_domain::ToolCatalog).
//!
//! Infrastructure adapters (the stdio JSON-RPC client, the config-file
//! provider store) implement the traits in [`ports`].

pub mod discovery;
pub mod ports;
pub mod retry;

pub use discovery::{CapabilityDiscovery, DiscoveryMode, DiscoveryReport};
pub use ports::{CapabilityClient, CapabilityClientFactory, ProviderError, ProviderStore, SharedClient};
pub use retry::{RetryConfig, with_retry};
