//! Infrastructure layer for gatehouse
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, including configuration file loading,
//! the stdio provider client, and the built-in tools.

pub mod config;
pub mod mcp;
pub mod providers;
pub mod tools;

// Re-export commonly used types
pub use config::{ConfigLoader, FileAgentConfig, FileConfig, FileProviderConfig};
pub use mcp::{StdioCapabilityClient, StdioClientFactory};
pub use providers::ConfigProviderStore;
pub use tools::register_builtin_tools;
