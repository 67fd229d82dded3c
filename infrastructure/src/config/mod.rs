//! Configuration loading and file formats

pub mod file_config;
pub mod loader;

pub use file_config::{FileAgentConfig, FileConfig, FileProviderConfig};
pub use loader::ConfigLoader;
