//! Lazy capability discovery
//!
//! Connects to external capability providers on demand. The agent's
//! configured tool list names the provider tools it wants as
//! `mcp_<provider>_<capability>`; discovery derives the provider set
//! from those names, connects only to the providers that are needed
//! and enabled, and registers only the tools the agent asked for.
//!
//! Providers are processed independently: one provider failing to
//! connect degrades the agent's tool set but never aborts the cycle.

use std::collections::BTreeSet;
use std::sync::Arc;

use async_trait::async_trait;
use gatehouse_domain::{
    DiscoveredCapability, ExecutionContext, RiskLevel, Tool, ToolCatalog, ToolCategory,
    ToolError, ToolHandler, parse_provider_tool_name, prefixed_tool_name, MCP_TOOL_PREFIX,
};

use crate::ports::{CapabilityClientFactory, ProviderStore, SharedClient};
use crate::retry::{RetryConfig, with_retry};

/// What to do with provider connections after discovery.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscoveryMode {
    /// Discover and disconnect — for listing available tools in a UI
    /// without holding idle connections.
    Selection,
    /// Discover and keep connected — the agent is about to use them.
    Usage,
}

/// Outcome of one discovery cycle.
#[derive(Debug, Clone, Default)]
pub struct DiscoveryReport {
    /// Providers that connected and were discovered
    pub connected: Vec<String>,
    /// Providers that failed, with the failure message
    pub failed: Vec<(String, String)>,
    /// Catalog-wide names of the tools registered this cycle
    pub registered_tools: Vec<String>,
}

impl DiscoveryReport {
    /// Whether any provider failed this cycle.
    pub fn is_degraded(&self) -> bool {
        !self.failed.is_empty()
    }
}

/// Use case: connect to needed providers and register their tools.
pub struct CapabilityDiscovery {
    store: Arc<dyn ProviderStore>,
    factory: Arc<dyn CapabilityClientFactory>,
    retry: RetryConfig,
}

impl CapabilityDiscovery {
    pub fn new(store: Arc<dyn ProviderStore>, factory: Arc<dyn CapabilityClientFactory>) -> Self {
        Self {
            store,
            factory,
            retry: RetryConfig::default(),
        }
    }

    pub fn with_retry_config(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// Extract the set of provider names an agent's tool list requires.
    ///
    /// Best-effort set union: a name that fails to parse is logged and
    /// skipped, never aborts the batch. Names without the provider
    /// prefix are built-in tools and are ignored here.
    pub fn required_providers(tool_names: &[String]) -> BTreeSet<String> {
        let mut providers = BTreeSet::new();
        for name in tool_names {
            if !name.starts_with(MCP_TOOL_PREFIX) {
                continue;
            }
            match parse_provider_tool_name(name) {
                Ok(parsed) => {
                    providers.insert(parsed.provider);
                }
                Err(error) => {
                    tracing::warn!(tool = %name, error = %error, "Skipping unparseable provider tool name");
                }
            }
        }
        providers
    }

    /// Run one discovery cycle for the given agent tool list.
    ///
    /// Connects to each needed, enabled provider, discovers its tools,
    /// and registers into `catalog` the subset whose prefixed name
    /// appears in `agent_tools`. Returns a report of what connected,
    /// what failed, and what was registered; provider failures are
    /// recorded there, not propagated.
    pub async fn prepare(
        &self,
        agent_tools: &[String],
        catalog: &mut ToolCatalog,
        mode: DiscoveryMode,
    ) -> DiscoveryReport {
        let mut report = DiscoveryReport::default();

        let needed = Self::required_providers(agent_tools);
        if needed.is_empty() {
            tracing::debug!("No provider tools requested, skipping discovery");
            return report;
        }
        let needed_lower: BTreeSet<String> = needed.iter().map(|n| n.to_lowercase()).collect();

        let providers = match self.store.list_providers().await {
            Ok(providers) => providers,
            Err(error) => {
                tracing::warn!(error = %error, "Failed to read provider configuration");
                report
                    .failed
                    .push(("<configuration>".to_string(), error.to_string()));
                return report;
            }
        };

        for provider in providers {
            if !needed_lower.contains(&provider.name.to_lowercase()) {
                tracing::debug!(provider = %provider.name, "Provider not needed by this agent, skipping");
                continue;
            }
            if !provider.enabled {
                tracing::debug!(provider = %provider.name, "Provider disabled, skipping");
                continue;
            }

            match self
                .discover_provider(&provider.name, &provider, agent_tools, catalog, mode)
                .await
            {
                Ok(registered) => {
                    report.connected.push(provider.name.clone());
                    report.registered_tools.extend(registered);
                }
                Err(error) => {
                    tracing::warn!(
                        provider = %provider.name,
                        error = %error,
                        "Provider discovery failed, continuing with remaining providers"
                    );
                    report.failed.push((provider.name.clone(), error.to_string()));
                }
            }
        }

        report
    }

    async fn discover_provider(
        &self,
        name: &str,
        provider: &gatehouse_domain::ProviderRecord,
        agent_tools: &[String],
        catalog: &mut ToolCatalog,
        mode: DiscoveryMode,
    ) -> Result<Vec<String>, crate::ports::ProviderError> {
        let client = self.factory.create(name);

        let connect_client = Arc::clone(&client);
        let config = provider.connection.clone();
        with_retry(
            &self.retry,
            "provider connect",
            |e: &crate::ports::ProviderError| e.is_transient(),
            move || {
                let client = Arc::clone(&connect_client);
                let config = config.clone();
                async move { client.lock().await.connect(&config).await }
            },
        )
        .await?;

        let list_client = Arc::clone(&client);
        let discovered = with_retry(
            &self.retry,
            "provider discover",
            |e: &crate::ports::ProviderError| e.is_transient(),
            move || {
                let client = Arc::clone(&list_client);
                async move { client.lock().await.list_tools().await }
            },
        )
        .await?;

        tracing::debug!(
            provider = name,
            tool_count = discovered.len(),
            "Provider discovery complete"
        );

        let category = provider_category(name);
        let mut registered = Vec::new();
        for capability in discovered {
            let full_name = prefixed_tool_name(name, &capability.name);
            // Match case-insensitively but register under the agent's
            // spelling, so the name the agent calls is the name found.
            let Some(requested) = agent_tools
                .iter()
                .find(|t| t.eq_ignore_ascii_case(&full_name))
            else {
                continue;
            };
            let tool = provider_tool(requested, name, &capability, Arc::clone(&client));
            catalog.register_in(tool, &category);
            registered.push(requested.clone());
        }

        if mode == DiscoveryMode::Selection {
            client.lock().await.disconnect().await?;
        }

        Ok(registered)
    }
}

/// Category for a provider's tools.
///
/// The well-known `filesystem` provider identity gets a friendlier
/// label; everything else is `"<name> (MCP)"`.
fn provider_category(provider: &str) -> ToolCategory {
    let display = if provider.eq_ignore_ascii_case("filesystem") {
        "File System".to_string()
    } else {
        format!("{} (MCP)", provider)
    };
    ToolCategory::new(format!("mcp:{}", provider), display)
}

fn provider_tool(
    full_name: &str,
    provider: &str,
    capability: &DiscoveredCapability,
    client: SharedClient,
) -> Tool {
    let description = if capability.description.is_empty() {
        format!("{} capability from provider {}", capability.name, provider)
    } else {
        capability.description.clone()
    };
    Tool::new(
        full_name,
        description,
        RiskLevel::LowRisk,
        Arc::new(McpToolHandler {
            client,
            capability: capability.name.clone(),
            provider: provider.to_string(),
        }),
    )
}

/// Handler that forwards a registered provider tool to its connection.
///
/// Holds a clone of the shared client, which keeps the connection alive
/// for as long as the tool stays registered. Arguments pass through
/// unvalidated; the provider applies its own schema.
struct McpToolHandler {
    client: SharedClient,
    capability: String,
    provider: String,
}

#[async_trait]
impl ToolHandler for McpToolHandler {
    async fn run(
        &self,
        args: serde_json::Value,
        _ctx: &ExecutionContext,
    ) -> Result<serde_json::Value, ToolError> {
        self.client
            .lock()
            .await
            .call_tool(&self.capability, args)
            .await
            .map_err(|e| {
                ToolError::execution_failed(format!(
                    "provider '{}' call failed: {}",
                    self.provider, e
                ))
            })
    }
}
