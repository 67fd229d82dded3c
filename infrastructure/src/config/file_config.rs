//! Configuration file format (`gatehouse.toml`)
//!
//! Example configuration:
//!
//! ```toml
//! [agent]
//! tools = ["read_file", "write_file", "mcp_atlas-local_query"]
//!
//! [providers.atlas-local]
//! command = "atlas-mcp"
//! args = ["--stdio"]
//!
//! [providers.filesystem]
//! command = "npx"
//! args = ["-y", "@modelcontextprotocol/server-filesystem", "/data"]
//! enabled = false
//! ```

use gatehouse_domain::{ConnectionConfig, ProviderRecord};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::collections::HashMap;

/// Root configuration file structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Agent configuration (`[agent]` section)
    pub agent: FileAgentConfig,
    /// Capability providers (`[providers.<name>]` sections)
    pub providers: BTreeMap<String, FileProviderConfig>,
}

impl FileConfig {
    /// Convert the `[providers]` sections into domain records, in
    /// listing order.
    pub fn provider_records(&self) -> Vec<ProviderRecord> {
        self.providers
            .iter()
            .map(|(name, provider)| ProviderRecord {
                name: name.clone(),
                enabled: provider.enabled,
                connection: ConnectionConfig {
                    command: provider.command.clone(),
                    args: provider.args.clone(),
                    env: provider.env.clone(),
                },
            })
            .collect()
    }
}

/// Agent configuration from TOML (`[agent]` section)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileAgentConfig {
    /// Identifier used as `agent_id` in execution contexts
    pub id: String,
    /// Tool names this agent may use, including `mcp_`-prefixed
    /// provider tools
    pub tools: Vec<String>,
}

impl Default for FileAgentConfig {
    fn default() -> Self {
        Self {
            id: "gatehouse".to_string(),
            tools: vec![
                "read_file".to_string(),
                "write_file".to_string(),
                "run_command".to_string(),
            ],
        }
    }
}

/// One capability provider from TOML (`[providers.<name>]` section)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileProviderConfig {
    /// Disabled providers stay configured but are never connected
    pub enabled: bool,
    /// Executable to spawn
    pub command: String,
    /// Arguments passed to the executable
    pub args: Vec<String>,
    /// Extra environment variables for the provider process
    pub env: HashMap<String, String>,
}

impl Default for FileProviderConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            command: String::new(),
            args: Vec::new(),
            env: HashMap::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_config() {
        let config: FileConfig = toml::from_str(
            r#"
            [agent]
            id = "helper"
            tools = ["read_file", "mcp_atlas-local_query"]

            [providers.atlas-local]
            command = "atlas-mcp"
            args = ["--stdio"]

            [providers.legacy]
            command = "legacy-server"
            enabled = false
            "#,
        )
        .unwrap();

        assert_eq!(config.agent.id, "helper");
        assert_eq!(config.agent.tools.len(), 2);

        let records = config.provider_records();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].name, "atlas-local");
        assert!(records[0].enabled);
        assert_eq!(records[0].connection.args, vec!["--stdio"]);
        assert_eq!(records[1].name, "legacy");
        assert!(!records[1].enabled);
    }

    #[test]
    fn test_defaults() {
        let config = FileConfig::default();
        assert_eq!(config.agent.id, "gatehouse");
        assert!(config.agent.tools.contains(&"read_file".to_string()));
        assert!(config.providers.is_empty());
    }
}
