//! Built-in tools
//!
//! Local tools that ship with the binary: file operations and shell
//! command execution. The effectful ones (`write_file`, `run_command`)
//! are registered as approval pairs, so calling them only ever
//! produces a confirmation ticket until the hidden executor runs.

pub mod command;
pub mod file;

use gatehouse_domain::{ToolCatalog, ToolCategory};

/// Register all built-in tools into a catalog.
pub fn register_builtin_tools(catalog: &mut ToolCatalog) {
    let files = ToolCategory::new("files", "Files");
    catalog.register_in(file::read_file_tool(), &files);
    let (propose, execute) = file::write_file_pair();
    catalog.register_in(propose, &files);
    catalog.register_in(execute, &files);

    let shell = ToolCategory::new("shell", "Shell");
    let (propose, execute) = command::run_command_pair();
    catalog.register_in(propose, &shell);
    catalog.register_in(execute, &shell);
}
