//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure adapters must implement.

pub mod capability_client;
pub mod provider_store;

pub use capability_client::{CapabilityClient, CapabilityClientFactory, ProviderError, SharedClient};
pub use provider_store::ProviderStore;
