//! Tool handlers module for the file gateway.
//!
//! Dispatches parsed tool calls to the sandboxed file operations and turns
//! their results into responses.

use crate::error::handlers::{error_kind, handle_error};
use crate::error::{ErrorKind, GatewayError};
use crate::protocol::commands::{ToolCall, parse_request};
use crate::protocol::responses::{ToolData, ToolResponse};
use crate::protocol::tools::available_tools;
use crate::storage::{DirEntryInfo, FileOps};

/// Dispatches a tool call to its handler.
pub fn handle_tool_call(ops: &FileOps, call: &ToolCall) -> ToolResponse {
    let result = match call {
        ToolCall::ReadFile { path } => handle_read_file(ops, path),
        ToolCall::WriteFile { path, content } => handle_write_file(ops, path, content),
        ToolCall::ListDirectory { path } => handle_list_directory(ops, path),
        ToolCall::CreateDirectory { path } => handle_create_directory(ops, path),
        ToolCall::SearchFiles {
            path,
            pattern,
            exclude_patterns,
        } => handle_search_files(ops, path, pattern, exclude_patterns),
        ToolCall::ListTools => Ok(handle_list_tools()),
        ToolCall::ListAllowedDirectories => Ok(handle_list_allowed_directories(ops)),
    };

    result.unwrap_or_else(|err| {
        handle_error(&err);
        ToolResponse::error(error_kind(&err), format!("{} failed: {}", call.name(), err))
    })
}

/// Parses and dispatches one raw request line.
pub fn handle_request_line(ops: &FileOps, line: &str) -> ToolResponse {
    match parse_request(line) {
        Ok(call) => handle_tool_call(ops, &call),
        Err(msg) => ToolResponse::error(ErrorKind::InvalidRequest, msg),
    }
}

fn handle_read_file(ops: &FileOps, path: &str) -> Result<ToolResponse, GatewayError> {
    let content = ops.read_file(path)?;
    Ok(ToolResponse::ok(
        format!("File read successfully from: {}", path),
        Some(ToolData::Text { text: content }),
    ))
}

fn handle_write_file(ops: &FileOps, path: &str, content: &str) -> Result<ToolResponse, GatewayError> {
    let target = ops.write_file(path, content)?;
    Ok(ToolResponse::ok(
        format!("File written successfully to: {}", target.as_path().display()),
        None,
    ))
}

/// Lists a directory; the message carries the `[DIR]`/`[FILE]` text form.
fn handle_list_directory(ops: &FileOps, path: &str) -> Result<ToolResponse, GatewayError> {
    let entries = ops.list_directory(path)?;
    Ok(ToolResponse::ok(
        format_listing(&entries),
        Some(ToolData::Entries { entries }),
    ))
}

fn handle_create_directory(ops: &FileOps, path: &str) -> Result<ToolResponse, GatewayError> {
    let target = ops.create_directory(path)?;
    Ok(ToolResponse::ok(
        format!("Directory created: {}", target.as_path().display()),
        None,
    ))
}

fn handle_search_files(
    ops: &FileOps,
    path: &str,
    pattern: &str,
    exclude_patterns: &[String],
) -> Result<ToolResponse, GatewayError> {
    let outcome = ops.search_files(path, pattern, exclude_patterns)?;
    let message = if outcome.matches.is_empty() {
        "No matches found".to_string()
    } else {
        outcome
            .matches
            .iter()
            .map(|p| p.display().to_string())
            .collect::<Vec<_>>()
            .join("\n")
    };
    Ok(ToolResponse::ok(
        message,
        Some(ToolData::Search {
            matches: outcome.matches,
            skipped: outcome.skipped,
        }),
    ))
}

fn handle_list_tools() -> ToolResponse {
    let tools = available_tools().to_vec();
    ToolResponse::ok(
        format!("{} tools available", tools.len()),
        Some(ToolData::Tools { tools }),
    )
}

fn handle_list_allowed_directories(ops: &FileOps) -> ToolResponse {
    let paths = ops.guard().roots().paths();
    ToolResponse::ok(
        format!(
            "Allowed directories:\n{}",
            paths
                .iter()
                .map(|p| p.display().to_string())
                .collect::<Vec<_>>()
                .join("\n")
        ),
        Some(ToolData::Paths { paths }),
    )
}

/// One line per entry: `[DIR] name` or `[FILE] name`.
pub fn format_listing(entries: &[DirEntryInfo]) -> String {
    entries
        .iter()
        .map(|entry| {
            let tag = if entry.is_directory { "[DIR]" } else { "[FILE]" };
            format!("{} {}", tag, entry.name)
        })
        .collect::<Vec<_>>()
        .join("\n")
}
