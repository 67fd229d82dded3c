//! Approval pair construction
//!
//! A dangerous operation is split into two catalog entries: a visible
//! *proposing* tool whose dispatch only describes the action, and a
//! hidden *executor* tool that performs it after confirmation. The two
//! are one logical operation split across two calls, and the invariants
//! between them (executor exists, is hidden, carries no approval spec
//! of its own) are easy to get wrong when the tools are assembled by
//! hand. [`ApprovalPair`] builds both from one description so the shape
//! holds by construction.

use std::sync::Arc;

use super::entities::{ApprovalSpec, RiskLevel, Tool, ToolKind, ToolParameter};
use super::traits::{ApprovalMessageSource, SchemaValidator, ToolHandler};

/// Builder for a (proposing, executor) tool pair.
///
/// The proposing tool defaults to [`RiskLevel::HighRisk`]; call
/// [`risk_level`](Self::risk_level) to downgrade deliberately. The
/// executor argument mapping defaults to identity — the executor
/// receives exactly the validated proposal arguments.
///
/// ```ignore
/// let (propose, execute) = ApprovalPair::new("delete_email", "Delete an email", handler)
///     .parameters(vec![ToolParameter::new("emailId", "Email to delete", true)])
///     .message_fn(|args| format!("Permanently delete email {}?", args["emailId"]))
///     .build();
/// catalog.register(propose);
/// catalog.register(execute);
/// ```
pub struct ApprovalPair {
    name: String,
    description: String,
    risk_level: RiskLevel,
    handler: Arc<dyn ToolHandler>,
    schema: Option<Arc<dyn SchemaValidator>>,
    parameters: Option<Vec<ToolParameter>>,
    message: Option<Arc<dyn ApprovalMessageSource>>,
    execute_args: Option<Arc<dyn Fn(&serde_json::Value) -> serde_json::Value + Send + Sync>>,
    executor_name: Option<String>,
}

impl ApprovalPair {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        handler: Arc<dyn ToolHandler>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            risk_level: RiskLevel::HighRisk,
            handler,
            schema: None,
            parameters: None,
            message: None,
            execute_args: None,
            executor_name: None,
        }
    }

    /// Downgrade (or restate) the risk level of the proposing tool.
    pub fn risk_level(mut self, risk_level: RiskLevel) -> Self {
        self.risk_level = risk_level;
        self
    }

    /// Declare the parameter list; installs the default parameter schema.
    pub fn parameters(mut self, parameters: Vec<ToolParameter>) -> Self {
        self.parameters = Some(parameters);
        self
    }

    /// Install a custom argument schema instead of a parameter list.
    pub fn schema(mut self, schema: Arc<dyn SchemaValidator>) -> Self {
        self.schema = Some(schema);
        self
    }

    /// Set the confirmation-message source.
    pub fn message(mut self, source: Arc<dyn ApprovalMessageSource>) -> Self {
        self.message = Some(source);
        self
    }

    /// Set the confirmation message as a pure function of the arguments.
    pub fn message_fn<F>(mut self, f: F) -> Self
    where
        F: Fn(&serde_json::Value) -> String + Send + Sync + 'static,
    {
        self.message = Some(Arc::new(super::traits::FnMessage(f)));
        self
    }

    /// Override the proposal → executor argument mapping (default: identity).
    pub fn execute_args_fn<F>(mut self, f: F) -> Self
    where
        F: Fn(&serde_json::Value) -> serde_json::Value + Send + Sync + 'static,
    {
        self.execute_args = Some(Arc::new(f));
        self
    }

    /// Override the executor tool name (default: `execute_<name>`).
    pub fn executor_name(mut self, name: impl Into<String>) -> Self {
        self.executor_name = Some(name.into());
        self
    }

    /// Build the (proposing, executor) pair.
    ///
    /// Both tools share the schema: the executor re-validates the
    /// ticket arguments on dispatch. The handler is attached only to
    /// the executor; the proposing tool's handler is never invoked by
    /// the catalog and is wired to the same body solely so the pair
    /// stays one logical operation.
    pub fn build(self) -> (Tool, Tool) {
        let executor_name = self
            .executor_name
            .unwrap_or_else(|| format!("execute_{}", self.name));

        let schema: Arc<dyn SchemaValidator> = match (self.schema, self.parameters) {
            (Some(schema), _) => schema,
            (None, Some(parameters)) => {
                Arc::new(super::traits::ParameterSchema::new(parameters))
            }
            (None, None) => Arc::new(super::traits::OpenSchema),
        };

        let message: Arc<dyn ApprovalMessageSource> = self.message.unwrap_or_else(|| {
            Arc::new(super::traits::StaticMessage(format!(
                "Approve execution of '{}'?",
                self.name
            )))
        });

        let execute_args = self
            .execute_args
            .unwrap_or_else(|| Arc::new(|args: &serde_json::Value| args.clone()));

        let executor = Tool::new(
            executor_name.clone(),
            format!("{} (runs after confirmation)", self.description),
            self.risk_level,
            Arc::clone(&self.handler),
        )
        .with_schema(Arc::clone(&schema))
        .hidden();

        let proposing = Tool {
            name: self.name,
            description: self.description,
            risk_level: self.risk_level,
            hidden: false,
            schema,
            kind: ToolKind::Proposing(ApprovalSpec {
                execute_tool_name: executor_name,
                message,
                execute_args,
            }),
            handler: self.handler,
        };

        (proposing, executor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tool::value_objects::{ExecutionContext, ToolError};
    use async_trait::async_trait;
    use serde_json::json;

    struct NoopHandler;

    #[async_trait]
    impl ToolHandler for NoopHandler {
        async fn run(
            &self,
            _args: serde_json::Value,
            _ctx: &ExecutionContext,
        ) -> Result<serde_json::Value, ToolError> {
            Ok(json!("done"))
        }
    }

    #[test]
    fn test_pair_shape() {
        let (propose, execute) =
            ApprovalPair::new("delete_email", "Delete an email", Arc::new(NoopHandler)).build();

        assert_eq!(propose.name, "delete_email");
        assert!(!propose.hidden);
        assert!(propose.is_proposing());
        assert_eq!(
            propose.approval().unwrap().execute_tool_name,
            "execute_delete_email"
        );

        assert_eq!(execute.name, "execute_delete_email");
        assert!(execute.hidden);
        assert!(execute.approval().is_none());
    }

    #[test]
    fn test_pair_defaults_high_risk() {
        let (propose, execute) =
            ApprovalPair::new("delete_email", "Delete an email", Arc::new(NoopHandler)).build();
        assert_eq!(propose.risk_level, RiskLevel::HighRisk);
        assert_eq!(execute.risk_level, RiskLevel::HighRisk);
    }

    #[test]
    fn test_pair_explicit_downgrade() {
        let (propose, _) =
            ApprovalPair::new("touch_scratch", "Touch scratch file", Arc::new(NoopHandler))
                .risk_level(RiskLevel::LowRisk)
                .build();
        assert_eq!(propose.risk_level, RiskLevel::LowRisk);
    }

    #[test]
    fn test_default_execute_args_is_identity() {
        let (propose, _) =
            ApprovalPair::new("delete_email", "Delete an email", Arc::new(NoopHandler)).build();
        let spec = propose.approval().unwrap();
        let args = json!({"emailId": "123"});
        assert_eq!((spec.execute_args)(&args), args);
        // Pure: same input, same output, every time.
        assert_eq!((spec.execute_args)(&args), (spec.execute_args)(&args));
    }

    #[test]
    fn test_custom_executor_name_and_args() {
        let (propose, execute) =
            ApprovalPair::new("send_reply", "Send a reply", Arc::new(NoopHandler))
                .executor_name("send_reply_confirmed")
                .execute_args_fn(|args| json!({"payload": args.clone(), "confirmed": true}))
                .build();

        let spec = propose.approval().unwrap();
        assert_eq!(spec.execute_tool_name, "send_reply_confirmed");
        assert_eq!(execute.name, "send_reply_confirmed");

        let mapped = (spec.execute_args)(&json!({"to": "a@b.c"}));
        assert_eq!(mapped["confirmed"], json!(true));
        assert_eq!(mapped["payload"]["to"], json!("a@b.c"));
    }

    #[test]
    fn test_pair_shares_schema() {
        let (propose, execute) =
            ApprovalPair::new("delete_email", "Delete an email", Arc::new(NoopHandler))
                .parameters(vec![ToolParameter::new("emailId", "Email to delete", true)])
                .build();

        assert!(propose.schema.validate(&json!({})).is_err());
        assert!(execute.schema.validate(&json!({})).is_err());
        assert!(execute.schema.validate(&json!({"emailId": "1"})).is_ok());
    }
}
