//! Provider configuration adapters

pub mod store;

pub use store::ConfigProviderStore;
