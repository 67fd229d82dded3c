//! File operation tools: read_file, write_file

use async_trait::async_trait;
use gatehouse_domain::{
    ApprovalPair, ExecutionContext, RiskLevel, Tool, ToolError, ToolHandler, ToolParameter,
};
use serde_json::{Value, json};
use std::path::Path;
use std::sync::Arc;

/// Maximum file size to read (10 MB)
const MAX_READ_SIZE: u64 = 10 * 1024 * 1024;

/// Build the `read_file` tool.
pub fn read_file_tool() -> Tool {
    Tool::new(
        "read_file",
        "Read the contents of a file at the specified path",
        RiskLevel::ReadOnly,
        Arc::new(ReadFileHandler),
    )
    .with_parameters(vec![
        ToolParameter::new("path", "Path to the file to read", true).with_type("path"),
        ToolParameter::new("offset", "Line number to start reading from (0-indexed)", false)
            .with_type("integer"),
        ToolParameter::new("limit", "Maximum number of lines to read", false).with_type("integer"),
    ])
}

/// Build the `write_file` approval pair.
pub fn write_file_pair() -> (Tool, Tool) {
    ApprovalPair::new(
        "write_file",
        "Write content to a file at the specified path. Creates the file if it doesn't exist, or overwrites if it does.",
        Arc::new(WriteFileHandler),
    )
    .parameters(vec![
        ToolParameter::new("path", "Path to the file to write", true).with_type("path"),
        ToolParameter::new("content", "Content to write to the file", true).with_type("string"),
        ToolParameter::new("create_dirs", "Create parent directories if they don't exist", false)
            .with_type("boolean"),
    ])
    .message_fn(|args| {
        let path = args["path"].as_str().unwrap_or("?");
        let bytes = args["content"].as_str().map(str::len).unwrap_or(0);
        format!("Write {} bytes to '{}'?", bytes, path)
    })
    .build()
}

struct ReadFileHandler;

#[async_trait]
impl ToolHandler for ReadFileHandler {
    async fn run(&self, args: Value, _ctx: &ExecutionContext) -> Result<Value, ToolError> {
        let path_str = args["path"]
            .as_str()
            .ok_or_else(|| ToolError::invalid_argument("'path' must be a string"))?;
        let path = Path::new(path_str);

        if !path.exists() {
            return Err(ToolError::not_found(path_str));
        }
        if !path.is_file() {
            return Err(ToolError::invalid_argument(format!(
                "'{}' is not a file",
                path_str
            )));
        }

        let metadata = tokio::fs::metadata(path)
            .await
            .map_err(|e| ToolError::execution_failed(format!("Failed to stat file: {}", e)))?;
        if metadata.len() > MAX_READ_SIZE {
            return Err(ToolError::invalid_argument(format!(
                "File too large ({} bytes). Maximum size is {} bytes",
                metadata.len(),
                MAX_READ_SIZE
            )));
        }

        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::PermissionDenied {
                ToolError::permission_denied(path_str)
            } else {
                ToolError::execution_failed(format!("Failed to read file: {}", e))
            }
        })?;

        let offset = args["offset"].as_u64().unwrap_or(0) as usize;
        let limit = args["limit"].as_u64().map(|l| l as usize);

        let output = if offset > 0 || limit.is_some() {
            let lines: Vec<&str> = content.lines().collect();
            let end = limit
                .map(|l| offset.saturating_add(l).min(lines.len()))
                .unwrap_or(lines.len());
            lines[offset.min(lines.len())..end].join("\n")
        } else {
            content
        };

        Ok(json!(output))
    }

    fn summarize(&self, result: &Value) -> Option<String> {
        result
            .as_str()
            .map(|s| format!("Read {} lines", s.lines().count()))
    }
}

struct WriteFileHandler;

#[async_trait]
impl ToolHandler for WriteFileHandler {
    async fn run(&self, args: Value, _ctx: &ExecutionContext) -> Result<Value, ToolError> {
        let path_str = args["path"]
            .as_str()
            .ok_or_else(|| ToolError::invalid_argument("'path' must be a string"))?;
        let content = args["content"]
            .as_str()
            .ok_or_else(|| ToolError::invalid_argument("'content' must be a string"))?;
        let create_dirs = args["create_dirs"].as_bool().unwrap_or(false);

        let path = Path::new(path_str);
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                if !create_dirs {
                    return Err(ToolError::not_found(format!(
                        "Parent directory does not exist: {}",
                        parent.display()
                    )));
                }
                tokio::fs::create_dir_all(parent).await.map_err(|e| {
                    ToolError::execution_failed(format!("Failed to create directories: {}", e))
                })?;
            }
        }

        tokio::fs::write(path, content).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::PermissionDenied {
                ToolError::permission_denied(path_str)
            } else {
                ToolError::execution_failed(format!("Failed to write file: {}", e))
            }
        })?;

        Ok(json!(format!(
            "Wrote {} bytes to {}",
            content.len(),
            path_str
        )))
    }
}
