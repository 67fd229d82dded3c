//! Tool domain traits
//!
//! Validation, handler, and approval-message contracts. The schema
//! contract is deliberately opaque: the catalog only relies on
//! `validate(raw) -> value | errors`, so parameter lists, JSON Schema,
//! or provider-side validation can all sit behind the same trait.

use async_trait::async_trait;

use super::entities::ToolParameter;
use super::value_objects::{ExecutionContext, ToolError};

/// Validator for raw tool arguments.
///
/// On success the validator returns the (possibly normalized) argument
/// value that is handed to the handler; on failure it returns every
/// problem found, not just the first.
pub trait SchemaValidator: Send + Sync {
    fn validate(&self, raw: &serde_json::Value) -> Result<serde_json::Value, Vec<String>>;
}

/// Parameter-list validator — the default schema for built-in tools.
///
/// Checks that arguments form a JSON object, that every required
/// parameter is present, that no unknown parameter is supplied, and
/// that each value matches its declared type hint.
#[derive(Debug, Clone, Default)]
pub struct ParameterSchema {
    parameters: Vec<ToolParameter>,
}

impl ParameterSchema {
    pub fn new(parameters: Vec<ToolParameter>) -> Self {
        Self { parameters }
    }

    pub fn with_parameter(mut self, param: ToolParameter) -> Self {
        self.parameters.push(param);
        self
    }

    pub fn parameters(&self) -> &[ToolParameter] {
        &self.parameters
    }

    fn type_matches(param_type: &str, value: &serde_json::Value) -> bool {
        match param_type {
            "string" | "path" => value.is_string(),
            "number" => value.is_number(),
            "integer" => value.is_i64() || value.is_u64(),
            "boolean" => value.is_boolean(),
            _ => true,
        }
    }
}

impl SchemaValidator for ParameterSchema {
    fn validate(&self, raw: &serde_json::Value) -> Result<serde_json::Value, Vec<String>> {
        let object = match raw.as_object() {
            Some(o) => o,
            None => return Err(vec!["arguments must be a JSON object".to_string()]),
        };

        let mut errors = Vec::new();

        for param in &self.parameters {
            match object.get(&param.name) {
                None if param.required => {
                    errors.push(format!("Missing required parameter '{}'", param.name));
                }
                Some(value) if !Self::type_matches(&param.param_type, value) => {
                    errors.push(format!(
                        "Parameter '{}' must be of type {}",
                        param.name, param.param_type
                    ));
                }
                _ => {}
            }
        }

        let known: std::collections::HashSet<&str> =
            self.parameters.iter().map(|p| p.name.as_str()).collect();
        for arg_name in object.keys() {
            if !known.contains(arg_name.as_str()) {
                errors.push(format!("Unknown parameter '{}'", arg_name));
            }
        }

        if errors.is_empty() {
            Ok(raw.clone())
        } else {
            Err(errors)
        }
    }
}

/// Passthrough schema for tools validated elsewhere.
///
/// Provider-sourced tools carry their own schema on the provider side;
/// the catalog accepts any object-shaped argument value for them.
#[derive(Debug, Clone, Default)]
pub struct OpenSchema;

impl SchemaValidator for OpenSchema {
    fn validate(&self, raw: &serde_json::Value) -> Result<serde_json::Value, Vec<String>> {
        if raw.is_object() || raw.is_null() {
            Ok(raw.clone())
        } else {
            Err(vec!["arguments must be a JSON object".to_string()])
        }
    }
}

/// The effectful body of a tool.
///
/// Handlers receive validated arguments and the caller's context, and
/// must convert their own internal failures into `Err(ToolError)` —
/// the catalog turns that into a failed result rather than letting it
/// escape dispatch.
#[async_trait]
pub trait ToolHandler: Send + Sync {
    async fn run(
        &self,
        args: serde_json::Value,
        ctx: &ExecutionContext,
    ) -> Result<serde_json::Value, ToolError>;

    /// Optional pure summary of a successful result for display.
    fn summarize(&self, _result: &serde_json::Value) -> Option<String> {
        None
    }
}

/// Builds the confirmation message shown to a human for a proposing
/// tool.
///
/// Message building may depend on live state (e.g. fetching the current
/// value of the thing about to be changed) and is therefore async and
/// fallible. Dispatch substitutes a generic fallback when it fails.
#[async_trait]
pub trait ApprovalMessageSource: Send + Sync {
    async fn build(
        &self,
        args: &serde_json::Value,
        ctx: &ExecutionContext,
    ) -> Result<String, ToolError>;
}

/// Static approval message (ignores arguments and context).
#[derive(Debug, Clone)]
pub struct StaticMessage(pub String);

#[async_trait]
impl ApprovalMessageSource for StaticMessage {
    async fn build(
        &self,
        _args: &serde_json::Value,
        _ctx: &ExecutionContext,
    ) -> Result<String, ToolError> {
        Ok(self.0.clone())
    }
}

/// Approval message computed by a pure closure over the arguments.
pub struct FnMessage<F>(pub F);

#[async_trait]
impl<F> ApprovalMessageSource for FnMessage<F>
where
    F: Fn(&serde_json::Value) -> String + Send + Sync,
{
    async fn build(
        &self,
        args: &serde_json::Value,
        _ctx: &ExecutionContext,
    ) -> Result<String, ToolError> {
        Ok((self.0)(args))
    }
}
