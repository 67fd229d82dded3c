//! Tool Catalog
//!
//! The [`ToolCatalog`] owns the mapping of tool name → [`Tool`] and of
//! category → tool names, and implements dispatch: lookup, schema
//! validation, and either direct handler execution or the proposing
//! half of the approval gate.
//!
//! # Registration
//!
//! Re-registering an existing name silently overwrites the previous
//! entry (last write wins). This is load-bearing: provider tool sets
//! are refreshed by re-running discovery, which re-registers the same
//! names.
//!
//! # Listing Determinism
//!
//! All registries are BTreeMap-backed, so `list()` and friends return
//! lexically ordered, stable output suitable for snapshot assertions.
//!
//! # Hidden Tools
//!
//! Hidden tools (approval executors) never appear in any name listing,
//! but their category membership is retained: a category whose only
//! tools are hidden still shows up in `list_by_category` (with an empty
//! name list) because connection bookkeeping needs to know the category
//! exists. `list_categories` is stricter and requires a visible tool.

use std::collections::BTreeMap;

use crate::core::error::DomainError;

use super::entities::{Tool, ToolCategory, ToolKind};
use super::value_objects::{ApprovalRequest, ExecutionContext, ExecutionResult};

/// Fallback bucket for tools registered without a category.
pub const OTHER_CATEGORY: &str = "Other";

struct RegisteredTool {
    tool: Tool,
    category_id: Option<String>,
}

/// Registry of tools with schema-validated, approval-aware dispatch.
///
/// Constructed once at process startup and passed by handle to all
/// call sites; there is no ambient global instance. A fresh catalog is
/// the unit of teardown — tools live for its lifetime.
#[derive(Default)]
pub struct ToolCatalog {
    tools: BTreeMap<String, RegisteredTool>,
    categories: BTreeMap<String, ToolCategory>,
}

impl ToolCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool without a category. Last write wins.
    pub fn register(&mut self, tool: Tool) {
        self.insert(tool, None);
    }

    /// Register a tool under a category. Last write wins.
    pub fn register_in(&mut self, tool: Tool, category: &ToolCategory) {
        self.categories
            .entry(category.id.clone())
            .or_insert_with(|| category.clone());
        self.insert(tool, Some(category.id.clone()));
    }

    /// Curried registration: all tools from one call site share one
    /// category.
    pub fn registrar(&mut self, category: ToolCategory) -> impl FnMut(Tool) + '_ {
        self.categories
            .entry(category.id.clone())
            .or_insert_with(|| category.clone());
        let category_id = category.id;
        move |tool| self.insert(tool, Some(category_id.clone()))
    }

    fn insert(&mut self, tool: Tool, category_id: Option<String>) {
        if self.tools.contains_key(&tool.name) {
            tracing::debug!(tool = %tool.name, "Overwriting existing tool registration");
        }
        self.tools
            .insert(tool.name.clone(), RegisteredTool { tool, category_id });
    }

    /// Look up a tool by name. Unknown names are a hard failure.
    pub fn get(&self, name: &str) -> Result<&Tool, DomainError> {
        self.tools
            .get(name)
            .map(|r| &r.tool)
            .ok_or_else(|| DomainError::ToolNotFound(name.to_string()))
    }

    /// Whether a tool with this name is registered (hidden or not).
    pub fn contains(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    /// Names of all visible tools, lexically ordered.
    pub fn list(&self) -> Vec<&str> {
        self.tools
            .values()
            .filter(|r| !r.tool.hidden)
            .map(|r| r.tool.name.as_str())
            .collect()
    }

    /// Visible tool names grouped by category display name.
    ///
    /// Uncategorized tools land in the fixed [`OTHER_CATEGORY`] bucket.
    /// Hidden tools contribute their category's presence but not their
    /// name.
    pub fn list_by_category(&self) -> BTreeMap<String, Vec<String>> {
        let mut grouped: BTreeMap<String, Vec<String>> = BTreeMap::new();

        for registered in self.tools.values() {
            let display = registered
                .category_id
                .as_ref()
                .and_then(|id| self.categories.get(id))
                .map(|c| c.display_name.clone())
                .unwrap_or_else(|| OTHER_CATEGORY.to_string());

            let names = grouped.entry(display).or_default();
            if !registered.tool.hidden {
                names.push(registered.tool.name.clone());
            }
        }

        grouped
    }

    /// Categories with at least one visible tool, sorted by display
    /// name.
    pub fn list_categories(&self) -> Vec<ToolCategory> {
        let mut visible: Vec<ToolCategory> = self
            .categories
            .values()
            .filter(|category| {
                self.tools.values().any(|r| {
                    !r.tool.hidden && r.category_id.as_deref() == Some(category.id.as_str())
                })
            })
            .cloned()
            .collect();
        visible.sort_by(|a, b| a.display_name.cmp(&b.display_name));
        visible
    }

    /// Dispatch a tool call by name.
    ///
    /// Order is fixed: lookup (hard failure), validation (terminal
    /// failed result, handler never invoked), then either direct
    /// execution with handler failures caught at this boundary, or the
    /// proposing half of the approval protocol.
    pub async fn dispatch(
        &self,
        name: &str,
        raw_args: serde_json::Value,
        ctx: &ExecutionContext,
    ) -> Result<ExecutionResult, DomainError> {
        let tool = self.get(name)?;

        let validated = match tool.schema.validate(&raw_args) {
            Ok(value) => value,
            Err(errors) => {
                tracing::debug!(tool = name, "Argument validation failed");
                return Ok(ExecutionResult::failure(errors.join("; ")));
            }
        };

        match &tool.kind {
            ToolKind::Direct => {
                let result = match tool.handler.run(validated, ctx).await {
                    Ok(value) => ExecutionResult::success(value),
                    Err(error) => {
                        tracing::warn!(tool = name, error = %error, "Tool handler failed");
                        ExecutionResult::failure(error.to_string())
                    }
                };
                Ok(result)
            }
            ToolKind::Proposing(spec) => {
                let message = match spec.message.build(&validated, ctx).await {
                    Ok(message) => message,
                    Err(error) => {
                        tracing::debug!(
                            tool = name,
                            error = %error,
                            "Approval message builder failed, using fallback"
                        );
                        format!("Approve execution of '{}'?", name)
                    }
                };
                let execute_args = (spec.execute_args)(&validated);
                Ok(ExecutionResult::approval_required(ApprovalRequest::new(
                    message,
                    spec.execute_tool_name.clone(),
                    execute_args,
                )))
            }
        }
    }

    /// Optional per-tool summary of a result (pure).
    pub fn summary_for(&self, name: &str, result: &ExecutionResult) -> Option<String> {
        let tool = self.tools.get(name)?;
        let value = result.result.as_ref()?;
        tool.tool.handler.summarize(value)
    }

    /// Verify the approval invariant across the catalog: every
    /// proposing tool's executor exists, is hidden, and is not itself
    /// proposing.
    pub fn verify(&self) -> Result<(), DomainError> {
        for registered in self.tools.values() {
            let tool = &registered.tool;
            let Some(spec) = tool.approval() else {
                continue;
            };
            let executor = self.tools.get(&spec.execute_tool_name).ok_or_else(|| {
                DomainError::InvalidToolPair(format!(
                    "'{}' names missing executor '{}'",
                    tool.name, spec.execute_tool_name
                ))
            })?;
            if !executor.tool.hidden {
                return Err(DomainError::InvalidToolPair(format!(
                    "executor '{}' must be hidden",
                    spec.execute_tool_name
                )));
            }
            if executor.tool.is_proposing() {
                return Err(DomainError::InvalidToolPair(format!(
                    "executor '{}' must not carry its own approval",
                    spec.execute_tool_name
                )));
            }
        }
        Ok(())
    }
}

impl std::fmt::Debug for ToolCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolCatalog")
            .field("tools", &self.tools.keys().collect::<Vec<_>>())
            .field("categories", &self.categories.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tool::approval::ApprovalPair;
    use crate::tool::entities::{RiskLevel, ToolParameter};
    use crate::tool::traits::ToolHandler;
    use crate::tool::value_objects::{APPROVAL_REQUIRED_ERROR, ToolError};
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Handler that counts invocations, for asserting what never ran.
    struct CountingHandler {
        calls: Arc<AtomicUsize>,
        output: serde_json::Value,
    }

    impl CountingHandler {
        fn new(output: serde_json::Value) -> (Self, Arc<AtomicUsize>) {
            let calls = Arc::new(AtomicUsize::new(0));
            (
                Self {
                    calls: Arc::clone(&calls),
                    output,
                },
                calls,
            )
        }
    }

    #[async_trait]
    impl ToolHandler for CountingHandler {
        async fn run(
            &self,
            _args: serde_json::Value,
            _ctx: &ExecutionContext,
        ) -> Result<serde_json::Value, ToolError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.output.clone())
        }

        fn summarize(&self, result: &serde_json::Value) -> Option<String> {
            result.as_str().map(|s| format!("-> {}", s))
        }
    }

    struct FailingHandler;

    #[async_trait]
    impl ToolHandler for FailingHandler {
        async fn run(
            &self,
            _args: serde_json::Value,
            _ctx: &ExecutionContext,
        ) -> Result<serde_json::Value, ToolError> {
            Err(ToolError::execution_failed("disk on fire"))
        }
    }

    fn ctx() -> ExecutionContext {
        ExecutionContext::new("agent-test")
    }

    fn plain_tool(name: &str) -> (Tool, Arc<AtomicUsize>) {
        let (handler, calls) = CountingHandler::new(json!("ok"));
        let tool = Tool::new(name, format!("Tool {}", name), RiskLevel::ReadOnly, Arc::new(handler))
            .with_parameters(vec![ToolParameter::new("path", "Path", true)]);
        (tool, calls)
    }

    #[tokio::test]
    async fn test_dispatch_unknown_tool_is_hard_failure() {
        let catalog = ToolCatalog::new();
        let err = catalog
            .dispatch("missing", json!({}), &ctx())
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::ToolNotFound(_)));
    }

    #[tokio::test]
    async fn test_dispatch_validation_failure_never_runs_handler() {
        let mut catalog = ToolCatalog::new();
        let (tool, calls) = plain_tool("read_file");
        catalog.register(tool);

        let result = catalog
            .dispatch("read_file", json!({"wrong": 1}), &ctx())
            .await
            .unwrap();

        assert!(!result.is_success());
        let error = result.error().unwrap();
        assert!(error.contains("Missing required parameter 'path'"));
        assert!(error.contains("Unknown parameter 'wrong'"));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_dispatch_plain_tool_success() {
        let mut catalog = ToolCatalog::new();
        let (tool, calls) = plain_tool("read_file");
        catalog.register(tool);

        let result = catalog
            .dispatch("read_file", json!({"path": "/a"}), &ctx())
            .await
            .unwrap();

        assert!(result.is_success());
        assert_eq!(result.value(), Some(&json!("ok")));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_dispatch_catches_handler_failure() {
        let mut catalog = ToolCatalog::new();
        catalog.register(Tool::new(
            "explode",
            "Always fails",
            RiskLevel::ReadOnly,
            Arc::new(FailingHandler),
        ));

        let result = catalog.dispatch("explode", json!({}), &ctx()).await.unwrap();

        assert!(!result.is_success());
        assert!(result.error().unwrap().contains("disk on fire"));
    }

    #[tokio::test]
    async fn test_proposing_dispatch_returns_ticket_without_side_effect() {
        let mut catalog = ToolCatalog::new();
        let (handler, calls) = CountingHandler::new(json!("Email 123 deleted permanently"));
        let (propose, execute) =
            ApprovalPair::new("delete_email", "Delete an email", Arc::new(handler))
                .parameters(vec![ToolParameter::new("emailId", "Email id", true)])
                .message_fn(|args| {
                    format!(
                        "Permanently delete email {}?",
                        args["emailId"].as_str().unwrap_or("?")
                    )
                })
                .build();
        catalog.register(propose);
        catalog.register(execute);

        let result = catalog
            .dispatch("delete_email", json!({"emailId": "123"}), &ctx())
            .await
            .unwrap();

        assert!(!result.is_success());
        assert_eq!(result.error(), Some(APPROVAL_REQUIRED_ERROR));
        let ticket = result.approval_request().unwrap();
        assert_eq!(ticket.execute_tool_name, "execute_delete_email");
        assert_eq!(ticket.execute_args, json!({"emailId": "123"}));
        assert_eq!(ticket.message, "Permanently delete email 123?");
        // The side effect must not have run.
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_confirm_then_execute_round_trip() {
        let mut catalog = ToolCatalog::new();
        let (handler, calls) = CountingHandler::new(json!("Email 123 deleted permanently"));
        let (propose, execute) =
            ApprovalPair::new("delete_email", "Delete an email", Arc::new(handler))
                .parameters(vec![ToolParameter::new("emailId", "Email id", true)])
                .build();
        catalog.register(propose);
        catalog.register(execute);

        let proposal = catalog
            .dispatch("delete_email", json!({"emailId": "123"}), &ctx())
            .await
            .unwrap();
        let ticket = proposal.approval_request().unwrap();

        // Orchestrator confirms: dispatch the executor with the ticket
        // arguments, unmodified.
        let result = catalog
            .dispatch(&ticket.execute_tool_name, ticket.execute_args, &ctx())
            .await
            .unwrap();

        assert!(result.is_success());
        assert_eq!(result.value(), Some(&json!("Email 123 deleted permanently")));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_proposing_dispatch_is_idempotent_on_execute_args() {
        let mut catalog = ToolCatalog::new();
        let (handler, _) = CountingHandler::new(json!(null));
        let (propose, execute) =
            ApprovalPair::new("delete_email", "Delete an email", Arc::new(handler)).build();
        catalog.register(propose);
        catalog.register(execute);

        let first = catalog
            .dispatch("delete_email", json!({"emailId": "123"}), &ctx())
            .await
            .unwrap();
        let second = catalog
            .dispatch("delete_email", json!({"emailId": "123"}), &ctx())
            .await
            .unwrap();

        assert_eq!(
            first.approval_request().unwrap().execute_args,
            second.approval_request().unwrap().execute_args
        );
    }

    #[tokio::test]
    async fn test_message_builder_failure_falls_back() {
        struct BrokenMessage;

        #[async_trait]
        impl crate::tool::traits::ApprovalMessageSource for BrokenMessage {
            async fn build(
                &self,
                _args: &serde_json::Value,
                _ctx: &ExecutionContext,
            ) -> Result<String, ToolError> {
                Err(ToolError::execution_failed("live state unavailable"))
            }
        }

        let mut catalog = ToolCatalog::new();
        let (handler, _) = CountingHandler::new(json!(null));
        let (propose, execute) =
            ApprovalPair::new("delete_email", "Delete an email", Arc::new(handler))
                .message(Arc::new(BrokenMessage))
                .build();
        catalog.register(propose);
        catalog.register(execute);

        let result = catalog
            .dispatch("delete_email", json!({"emailId": "123"}), &ctx())
            .await
            .unwrap();

        let ticket = result.approval_request().unwrap();
        assert_eq!(ticket.message, "Approve execution of 'delete_email'?");
        // Ticket is still fully usable despite the message fallback.
        assert_eq!(ticket.execute_args, json!({"emailId": "123"}));
    }

    #[test]
    fn test_register_overwrites_silently() {
        let mut catalog = ToolCatalog::new();
        let (first, _) = plain_tool("read_file");
        catalog.register(first);

        let (handler, _) = CountingHandler::new(json!("refreshed"));
        catalog.register(Tool::new(
            "read_file",
            "Refreshed registration",
            RiskLevel::LowRisk,
            Arc::new(handler),
        ));

        let tool = catalog.get("read_file").unwrap();
        assert_eq!(tool.description, "Refreshed registration");
        assert_eq!(tool.risk_level, RiskLevel::LowRisk);
        assert_eq!(catalog.list().len(), 1);
    }

    #[test]
    fn test_list_excludes_hidden_and_is_sorted() {
        let mut catalog = ToolCatalog::new();
        let (b, _) = plain_tool("beta");
        let (a, _) = plain_tool("alpha");
        catalog.register(b);
        catalog.register(a);
        let (handler, _) = CountingHandler::new(json!(null));
        catalog.register(
            Tool::new("aaa_hidden", "Hidden", RiskLevel::ReadOnly, Arc::new(handler)).hidden(),
        );

        assert_eq!(catalog.list(), vec!["alpha", "beta"]);
    }

    #[test]
    fn test_list_by_category_other_bucket() {
        let mut catalog = ToolCatalog::new();
        let files = ToolCategory::new("files", "Files");
        let (a, _) = plain_tool("read_file");
        catalog.register_in(a, &files);
        let (b, _) = plain_tool("mystery_tool");
        catalog.register(b);

        let grouped = catalog.list_by_category();
        assert_eq!(grouped["Files"], vec!["read_file".to_string()]);
        assert_eq!(grouped[OTHER_CATEGORY], vec!["mystery_tool".to_string()]);
    }

    #[test]
    fn test_hidden_only_category_appears_empty_in_grouping() {
        // A category whose only tool is hidden must still appear in
        // list_by_category (connection bookkeeping), with no names, and
        // must NOT appear in list_categories.
        let mut catalog = ToolCatalog::new();
        let ghost = ToolCategory::new("mcp:ghost", "ghost (MCP)");
        let (handler, _) = CountingHandler::new(json!(null));
        catalog.register_in(
            Tool::new("execute_spook", "Hidden executor", RiskLevel::HighRisk, Arc::new(handler))
                .hidden(),
            &ghost,
        );

        let grouped = catalog.list_by_category();
        assert_eq!(grouped["ghost (MCP)"], Vec::<String>::new());
        assert!(catalog.list_categories().is_empty());
    }

    #[test]
    fn test_list_categories_sorted_by_display_name() {
        let mut catalog = ToolCatalog::new();
        let shell = ToolCategory::new("shell", "Shell");
        let files = ToolCategory::new("files", "Files");
        let (a, _) = plain_tool("run_thing");
        catalog.register_in(a, &shell);
        let (b, _) = plain_tool("read_file");
        catalog.register_in(b, &files);

        let names: Vec<String> = catalog
            .list_categories()
            .into_iter()
            .map(|c| c.display_name)
            .collect();
        assert_eq!(names, vec!["Files".to_string(), "Shell".to_string()]);
    }

    #[test]
    fn test_registrar_curried_registration() {
        let mut catalog = ToolCatalog::new();
        let files = ToolCategory::new("files", "Files");
        {
            let mut register = catalog.registrar(files);
            let (a, _) = plain_tool("read_file");
            let (b, _) = plain_tool("stat_file");
            register(a);
            register(b);
        }

        let grouped = catalog.list_by_category();
        assert_eq!(
            grouped["Files"],
            vec!["read_file".to_string(), "stat_file".to_string()]
        );
    }

    #[test]
    fn test_verify_accepts_built_pairs() {
        let mut catalog = ToolCatalog::new();
        let (handler, _) = CountingHandler::new(json!(null));
        let (propose, execute) =
            ApprovalPair::new("delete_email", "Delete an email", Arc::new(handler)).build();
        catalog.register(propose);
        catalog.register(execute);

        assert!(catalog.verify().is_ok());
    }

    #[test]
    fn test_verify_rejects_missing_executor() {
        let mut catalog = ToolCatalog::new();
        let (handler, _) = CountingHandler::new(json!(null));
        let (propose, _execute) =
            ApprovalPair::new("delete_email", "Delete an email", Arc::new(handler)).build();
        // Executor deliberately not registered.
        catalog.register(propose);

        let err = catalog.verify().unwrap_err();
        assert!(matches!(err, DomainError::InvalidToolPair(_)));
    }

    #[test]
    fn test_verify_rejects_visible_executor() {
        let mut catalog = ToolCatalog::new();
        let (handler, _) = CountingHandler::new(json!(null));
        let (propose, execute) =
            ApprovalPair::new("delete_email", "Delete an email", Arc::new(handler)).build();
        catalog.register(propose);
        // Strip the hidden flag, violating the invariant.
        let mut visible = execute;
        visible.hidden = false;
        catalog.register(visible);

        let err = catalog.verify().unwrap_err();
        assert!(err.to_string().contains("must be hidden"));
    }

    #[tokio::test]
    async fn test_summary_for_delegates_to_handler() {
        let mut catalog = ToolCatalog::new();
        let (tool, _) = plain_tool("read_file");
        catalog.register(tool);

        let result = catalog
            .dispatch("read_file", json!({"path": "/a"}), &ctx())
            .await
            .unwrap();

        assert_eq!(catalog.summary_for("read_file", &result), Some("-> ok".to_string()));
        assert_eq!(catalog.summary_for("missing", &result), None);
    }
}
