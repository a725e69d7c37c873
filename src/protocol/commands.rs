//! Module `commands`
//!
//! Defines the tool calls a client can send and how a request line is
//! parsed into one.

use serde::Deserialize;

/// A tool invocation received from a client.
///
/// Requests are JSON objects naming the tool and carrying its arguments:
/// `{"tool": "read_file", "arguments": {"path": "~/notes.txt"}}`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "tool", content = "arguments", rename_all = "snake_case")]
pub enum ToolCall {
    ReadFile {
        path: String,
    },
    WriteFile {
        path: String,
        content: String,
    },
    ListDirectory {
        path: String,
    },
    CreateDirectory {
        path: String,
    },
    SearchFiles {
        path: String,
        pattern: String,
        #[serde(default, alias = "excludePatterns")]
        exclude_patterns: Vec<String>,
    },
    ListTools,
    ListAllowedDirectories,
}

impl ToolCall {
    /// Tool name as it appears on the wire
    pub fn name(&self) -> &'static str {
        match self {
            ToolCall::ReadFile { .. } => "read_file",
            ToolCall::WriteFile { .. } => "write_file",
            ToolCall::ListDirectory { .. } => "list_directory",
            ToolCall::CreateDirectory { .. } => "create_directory",
            ToolCall::SearchFiles { .. } => "search_files",
            ToolCall::ListTools => "list_tools",
            ToolCall::ListAllowedDirectories => "list_allowed_directories",
        }
    }
}

/// Parses one request line into a `ToolCall`.
pub fn parse_request(raw: &str) -> Result<ToolCall, String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err("Empty request".into());
    }
    serde_json::from_str(trimmed).map_err(|e| format!("Malformed request: {}", e))
}
