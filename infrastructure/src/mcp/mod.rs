//! MCP provider adapters (stdio JSON-RPC)

pub mod stdio_client;

pub use stdio_client::{StdioCapabilityClient, StdioClientFactory};
