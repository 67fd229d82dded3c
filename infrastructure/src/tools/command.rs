//! Command execution tool: run_command

use async_trait::async_trait;
use gatehouse_domain::{
    ApprovalPair, ExecutionContext, Tool, ToolError, ToolHandler, ToolParameter,
};
use serde_json::{Value, json};
use std::process::Stdio;
use std::sync::Arc;
use std::time::Duration;

/// Default timeout for command execution (60 seconds)
const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Maximum captured output size (1 MB)
const MAX_OUTPUT_SIZE: usize = 1024 * 1024;

/// Build the `run_command` approval pair.
pub fn run_command_pair() -> (Tool, Tool) {
    ApprovalPair::new(
        "run_command",
        "Execute a shell command and return its output. Use with caution.",
        Arc::new(RunCommandHandler),
    )
    .parameters(vec![
        ToolParameter::new("command", "The command to execute", true).with_type("string"),
        ToolParameter::new("working_dir", "Working directory for the command", false)
            .with_type("path"),
        ToolParameter::new("timeout_secs", "Timeout in seconds (default: 60)", false)
            .with_type("integer"),
    ])
    .message_fn(|args| {
        format!(
            "Run shell command: {} ?",
            args["command"].as_str().unwrap_or("?")
        )
    })
    .build()
}

struct RunCommandHandler;

#[async_trait]
impl ToolHandler for RunCommandHandler {
    async fn run(&self, args: Value, ctx: &ExecutionContext) -> Result<Value, ToolError> {
        let command_str = args["command"]
            .as_str()
            .ok_or_else(|| ToolError::invalid_argument("'command' must be a string"))?;
        let timeout_secs = args["timeout_secs"].as_u64().unwrap_or(DEFAULT_TIMEOUT_SECS);

        // Explicit argument wins over the context's working directory.
        let working_dir = args["working_dir"]
            .as_str()
            .or_else(|| ctx.extension_str("working_dir"));

        let mut command = if cfg!(target_os = "windows") {
            let mut c = tokio::process::Command::new("cmd");
            c.args(["/C", command_str]);
            c
        } else {
            let mut c = tokio::process::Command::new("sh");
            c.args(["-c", command_str]);
            c
        };

        if let Some(dir) = working_dir {
            let path = std::path::Path::new(dir);
            if !path.exists() {
                return Err(ToolError::not_found(format!(
                    "Working directory does not exist: {}",
                    dir
                )));
            }
            if !path.is_dir() {
                return Err(ToolError::invalid_argument(format!(
                    "'{}' is not a directory",
                    dir
                )));
            }
            command.current_dir(path);
        }

        command
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let output = tokio::time::timeout(
            Duration::from_secs(timeout_secs),
            command.output(),
        )
        .await
        .map_err(|_| {
            ToolError::timeout(format!(
                "Command timed out after {} seconds: {}",
                timeout_secs, command_str
            ))
        })?
        .map_err(|e| ToolError::execution_failed(format!("Failed to spawn command: {}", e)))?;

        let exit_code = output.status.code().unwrap_or(-1);
        Ok(json!({
            "exit_code": exit_code,
            "stdout": truncate(&String::from_utf8_lossy(&output.stdout)),
            "stderr": truncate(&String::from_utf8_lossy(&output.stderr)),
        }))
    }

    fn summarize(&self, result: &Value) -> Option<String> {
        result["exit_code"]
            .as_i64()
            .map(|code| format!("Command exited with code {}", code))
    }
}

fn truncate(output: &str) -> String {
    if output.len() > MAX_OUTPUT_SIZE {
        let mut end = MAX_OUTPUT_SIZE;
        while !output.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}\n... (output truncated)", &output[..end])
    } else {
        output.to_string()
    }
}
