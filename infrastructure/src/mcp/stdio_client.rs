//! Stdio JSON-RPC client for capability providers
//!
//! Spawns the provider as a subprocess and speaks newline-delimited
//! JSON-RPC 2.0 over its stdin/stdout, following the MCP handshake:
//! `initialize`, then a `notifications/initialized` notification, then
//! `tools/list` / `tools/call` requests.

use async_trait::async_trait;
use futures::StreamExt;
use gatehouse_application::ports::{
    CapabilityClient, CapabilityClientFactory, ProviderError, SharedClient,
};
use gatehouse_domain::{ConnectionConfig, ConnectionState, DiscoveredCapability};
use serde_json::{Value, json};
use std::process::Stdio;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::process::{Child, ChildStdin, ChildStdout};
use tokio::sync::Mutex;
use tokio_util::codec::{FramedRead, LinesCodec};

const PROTOCOL_VERSION: &str = "2024-11-05";
const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

struct ProviderProcess {
    child: Child,
    stdin: ChildStdin,
    stdout: FramedRead<ChildStdout, LinesCodec>,
}

/// Capability client over a spawned subprocess.
pub struct StdioCapabilityClient {
    provider_name: String,
    request_timeout: Duration,
    process: Option<ProviderProcess>,
    state: ConnectionState,
    next_id: u64,
}

impl StdioCapabilityClient {
    pub fn new(provider_name: impl Into<String>) -> Self {
        Self {
            provider_name: provider_name.into(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            process: None,
            state: ConnectionState::Disconnected,
            next_id: 0,
        }
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    async fn send_line(&mut self, payload: &Value) -> Result<(), ProviderError> {
        let process = self.process.as_mut().ok_or(ProviderError::NotConnected)?;
        let mut line = payload.to_string();
        line.push('\n');
        process
            .stdin
            .write_all(line.as_bytes())
            .await
            .map_err(|e| ProviderError::Transport(format!("write to provider failed: {}", e)))?;
        process
            .stdin
            .flush()
            .await
            .map_err(|e| ProviderError::Transport(format!("flush to provider failed: {}", e)))?;
        Ok(())
    }

    /// Send a request and wait for the response with the matching id.
    ///
    /// Notifications arriving in between are logged and skipped; the
    /// single-request-at-a-time discipline comes from the mutex around
    /// the shared client, so out-of-order responses cannot happen.
    async fn request(&mut self, method: &str, params: Value) -> Result<Value, ProviderError> {
        self.next_id += 1;
        let id = self.next_id;
        self.send_line(&json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": method,
            "params": params,
        }))
        .await?;

        let timeout = self.request_timeout;
        tokio::time::timeout(timeout, self.read_response(id))
            .await
            .map_err(|_| {
                ProviderError::Timeout(format!(
                    "provider '{}' did not answer '{}' within {:?}",
                    self.provider_name, method, timeout
                ))
            })?
    }

    async fn read_response(&mut self, id: u64) -> Result<Value, ProviderError> {
        let process = self.process.as_mut().ok_or(ProviderError::NotConnected)?;
        loop {
            let line = process
                .stdout
                .next()
                .await
                .ok_or_else(|| {
                    ProviderError::Transport("provider closed its stdout".to_string())
                })?
                .map_err(|e| ProviderError::Transport(format!("read from provider failed: {}", e)))?;

            if line.trim().is_empty() {
                continue;
            }
            let message: Value = serde_json::from_str(&line).map_err(|e| {
                ProviderError::Protocol(format!("provider sent invalid JSON: {}", e))
            })?;

            if message.get("id").and_then(Value::as_u64) != Some(id) {
                tracing::debug!(
                    provider = %self.provider_name,
                    "Skipping unsolicited provider message"
                );
                continue;
            }

            if let Some(error) = message.get("error") {
                return Err(ProviderError::Protocol(format!(
                    "provider returned error: {}",
                    error
                )));
            }
            return Ok(message.get("result").cloned().unwrap_or(Value::Null));
        }
    }
}

#[async_trait]
impl CapabilityClient for StdioCapabilityClient {
    async fn connect(&mut self, config: &ConnectionConfig) -> Result<(), ProviderError> {
        self.state = ConnectionState::Connecting;
        match self.connect_inner(config).await {
            Ok(()) => {
                self.state = ConnectionState::Connected;
                Ok(())
            }
            Err(error) => {
                self.state = ConnectionState::Failed;
                self.process = None;
                Err(error)
            }
        }
    }

    async fn list_tools(&mut self) -> Result<Vec<DiscoveredCapability>, ProviderError> {
        let result = self.request("tools/list", json!({})).await?;
        parse_tools_result(&result)
    }

    async fn call_tool(
        &mut self,
        name: &str,
        args: Value,
    ) -> Result<Value, ProviderError> {
        let result = self
            .request(
                "tools/call",
                json!({
                    "name": name,
                    "arguments": args,
                }),
            )
            .await?;
        parse_call_result(name, result)
    }

    async fn disconnect(&mut self) -> Result<(), ProviderError> {
        if let Some(mut process) = self.process.take() {
            // Closing stdin tells a well-behaved provider to exit.
            drop(process.stdin);
            if let Err(e) = process.child.kill().await {
                tracing::debug!(
                    provider = %self.provider_name,
                    error = %e,
                    "Provider process already gone"
                );
            }
        }
        self.state = ConnectionState::Disconnected;
        Ok(())
    }
}

impl StdioCapabilityClient {
    async fn connect_inner(&mut self, config: &ConnectionConfig) -> Result<(), ProviderError> {
        let mut command = tokio::process::Command::new(&config.command);
        command
            .args(&config.args)
            .envs(&config.env)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true);

        let mut child = command.spawn().map_err(|e| {
            ProviderError::Spawn(format!("failed to spawn '{}': {}", config.command, e))
        })?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| ProviderError::Spawn("provider stdin unavailable".to_string()))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| ProviderError::Spawn("provider stdout unavailable".to_string()))?;

        self.process = Some(ProviderProcess {
            child,
            stdin,
            stdout: FramedRead::new(stdout, LinesCodec::new()),
        });

        let init_result = self
            .request(
                "initialize",
                json!({
                    "protocolVersion": PROTOCOL_VERSION,
                    "capabilities": {},
                    "clientInfo": {
                        "name": "gatehouse",
                        "version": env!("CARGO_PKG_VERSION"),
                    },
                }),
            )
            .await?;
        tracing::debug!(
            provider = %self.provider_name,
            server = %init_result
                .pointer("/serverInfo/name")
                .and_then(serde_json::Value::as_str)
                .unwrap_or("unknown"),
            "Provider handshake complete"
        );

        self.send_line(&json!({
            "jsonrpc": "2.0",
            "method": "notifications/initialized",
        }))
        .await
    }
}

/// Extract discovered capabilities from a `tools/list` result.
fn parse_tools_result(result: &Value) -> Result<Vec<DiscoveredCapability>, ProviderError> {
    let tools = result
        .get("tools")
        .and_then(Value::as_array)
        .ok_or_else(|| {
            ProviderError::Protocol("tools/list result missing 'tools' array".to_string())
        })?;

    tools
        .iter()
        .map(|tool| {
            let name = tool
                .get("name")
                .and_then(Value::as_str)
                .ok_or_else(|| ProviderError::Protocol("tool entry missing 'name'".to_string()))?;
            let mut capability = DiscoveredCapability::new(
                name,
                tool.get("description").and_then(Value::as_str).unwrap_or(""),
            );
            if let Some(schema) = tool.get("inputSchema") {
                capability = capability.with_input_schema(schema.clone());
            }
            Ok(capability)
        })
        .collect()
}

/// Normalize a `tools/call` result.
///
/// Text content is flattened into a single string value; anything else
/// passes through verbatim. A result flagged `isError` becomes a
/// protocol error so the handler reports a failed execution.
fn parse_call_result(name: &str, result: Value) -> Result<Value, ProviderError> {
    let text = result
        .get("content")
        .and_then(Value::as_array)
        .map(|content| {
            content
                .iter()
                .filter_map(|block| block.get("text").and_then(Value::as_str))
                .collect::<Vec<_>>()
                .join("\n")
        });

    if result.get("isError").and_then(Value::as_bool) == Some(true) {
        return Err(ProviderError::Protocol(format!(
            "tool '{}' failed: {}",
            name,
            text.unwrap_or_else(|| result.to_string())
        )));
    }

    match text {
        Some(text) if !text.is_empty() => Ok(Value::String(text)),
        _ => Ok(result),
    }
}

/// Factory producing one stdio client per provider.
pub struct StdioClientFactory {
    request_timeout: Duration,
}

impl StdioClientFactory {
    pub fn new() -> Self {
        Self {
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}

impl Default for StdioClientFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl CapabilityClientFactory for StdioClientFactory {
    fn create(&self, provider_name: &str) -> SharedClient {
        Arc::new(Mutex::new(Box::new(
            StdioCapabilityClient::new(provider_name).with_request_timeout(self.request_timeout),
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_connect_missing_command_is_spawn_error() {
        let mut client = StdioCapabilityClient::new("ghost");
        assert_eq!(client.state(), ConnectionState::Disconnected);

        let err = client
            .connect(&ConnectionConfig::new("gatehouse-test-no-such-binary"))
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::Spawn(_)));
        assert!(err.is_transient());
        assert_eq!(client.state(), ConnectionState::Failed);

        client.disconnect().await.unwrap();
        assert_eq!(client.state(), ConnectionState::Disconnected);
    }

    #[tokio::test]
    async fn test_request_without_connection() {
        let mut client = StdioCapabilityClient::new("ghost");
        let err = client.list_tools().await.unwrap_err();
        assert!(matches!(err, ProviderError::NotConnected));
    }

    #[test]
    fn test_parse_tools_result() {
        let result = json!({
            "tools": [
                {"name": "query", "description": "Run a query", "inputSchema": {"type": "object"}},
                {"name": "fetch"}
            ]
        });
        let tools = parse_tools_result(&result).unwrap();
        assert_eq!(tools.len(), 2);
        assert_eq!(tools[0].name, "query");
        assert_eq!(tools[0].description, "Run a query");
        assert!(tools[0].input_schema.is_some());
        assert_eq!(tools[1].description, "");
    }

    #[test]
    fn test_parse_tools_result_missing_array() {
        let err = parse_tools_result(&json!({})).unwrap_err();
        assert!(matches!(err, ProviderError::Protocol(_)));
    }

    #[test]
    fn test_parse_call_result_flattens_text() {
        let result = json!({
            "content": [
                {"type": "text", "text": "line one"},
                {"type": "text", "text": "line two"}
            ]
        });
        assert_eq!(
            parse_call_result("query", result).unwrap(),
            json!("line one\nline two")
        );
    }

    #[test]
    fn test_parse_call_result_error_flag() {
        let result = json!({
            "isError": true,
            "content": [{"type": "text", "text": "index unavailable"}]
        });
        let err = parse_call_result("query", result).unwrap_err();
        assert!(err.to_string().contains("index unavailable"));
    }

    #[test]
    fn test_parse_call_result_passthrough() {
        let result = json!({"structured": {"rows": 3}});
        assert_eq!(
            parse_call_result("query", result.clone()).unwrap(),
            result
        );
    }
}
